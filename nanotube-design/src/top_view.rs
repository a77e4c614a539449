/*
nanotube-design, a strand topology engine for DNA nanotube structures.

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU General Public License as published by
    the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU General Public License for more details.

    You should have received a copy of the GNU General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/
//! Top view layout of the domain axes.
//!
//! Converts the sequence of domain-to-domain turn angles into 2D centerline
//! coordinates. The whole layout is recomputed from scratch whenever any
//! domain's multiples change; with tens of domains there is nothing to gain
//! from incremental updates.

use ultraviolet::DVec2;

use super::domains::Domains;
use super::parameters::NucleicAcidProfile;

/// The computed 2D layout: one entry per domain boundary, seeded at the
/// origin with a zero angle delta.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopView {
    pub u_coords: Vec<f64>,
    pub v_coords: Vec<f64>,
    pub theta_deltas: Vec<f64>,
}

impl TopView {
    /// Compute the layout. Each domain's position depends on the *previous*
    /// domain's joint configuration, so entry `i` is derived from domain
    /// `i - 1`'s multiples, wrapping to the last domain for the first entry.
    pub fn new(domains: &Domains, profile: &NucleicAcidProfile) -> Self {
        let count = domains.count();
        let mut theta_deltas = vec![0.0];
        let mut u_coords = vec![0.0];
        let mut v_coords = vec![0.0];

        for index in 0..count {
            let previous = domains
                .get((index + count - 1) % count)
                .expect("domain index in range");

            let theta_switch = previous.theta_switch_multiple as f64 * profile.theta_s;
            let interior_angle =
                previous.theta_interior_multiple as f64 * profile.theta_c() - theta_switch;

            let theta_delta = theta_deltas.last().copied().unwrap_or(0.0) + 180. - interior_angle;
            theta_deltas.push(theta_delta);

            let radians = theta_delta.to_radians();
            u_coords.push(u_coords.last().copied().unwrap_or(0.0) + profile.d * radians.cos());
            v_coords.push(v_coords.last().copied().unwrap_or(0.0) + profile.d * radians.sin());
        }

        Self {
            u_coords,
            v_coords,
            theta_deltas,
        }
    }

    /// The centerline coordinate of boundary `index`.
    pub fn coord(&self, index: usize) -> Option<DVec2> {
        match (self.u_coords.get(index), self.v_coords.get(index)) {
            (Some(&u), Some(&v)) => Some(DVec2::new(u, v)),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.u_coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.u_coords.is_empty()
    }
}
