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
//! Helices and per-domain double helices.
//!
//! A `DoubleHelix` pairs the up and down point sequences of one domain. A
//! given helix can be referenced by its direction (up or down), by the
//! domain's helical joint side (left or right), or by its zeroedness (the
//! zeroed helix is the one lined up with the previous domain).

use std::collections::VecDeque;

use super::domains::{Domain, Domains};
use super::parameters::NucleicAcidProfile;
use super::points::{Direction, Point, PointIdAllocator};

/// One directed sequence of points on a domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Helix {
    pub direction: Direction,
    /// Index of the owning domain.
    pub domain: usize,
    points: VecDeque<Point>,
}

impl Helix {
    pub fn new(direction: Direction, domain: usize) -> Self {
        Self {
            direction,
            domain,
            points: VecDeque::new(),
        }
    }

    /// Resize the point buffer to `count` points, deriving coordinates from
    /// the profile: points are `z_b` apart vertically and `theta_b` apart in
    /// azimuth; the down helix is offset by the mate distance `z_mate` and
    /// the mate angle `g`.
    pub fn resize(&mut self, count: usize, profile: &NucleicAcidProfile, ids: &mut PointIdAllocator) {
        self.points.truncate(count);
        while self.points.len() < count {
            let i = self.points.len() as f64;
            let (z_offset, angle_offset) = match self.direction {
                Direction::Up => (0., 0.),
                Direction::Down => (profile.z_mate, profile.g),
            };
            let point = Point::new(
                ids.next_id(),
                self.domain as f64 * profile.d,
                i * profile.z_b() + z_offset,
                (i * profile.theta_b() + angle_offset) % 360.,
                self.direction,
                self.domain,
            );
            self.points.push_back(point);
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = &Point> {
        self.points.iter()
    }

    pub(crate) fn into_points(self) -> VecDeque<Point> {
        self.points
    }
}

/// The two helices of one domain, keyed by direction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoubleHelix {
    pub domain: Domain,
    helices: [Helix; 2],
}

impl DoubleHelix {
    /// Build the double helix of a domain and size both point buffers: the
    /// helix on the left helical joint gets `left_helix_count` points, the
    /// other helix `other_helix_count`.
    pub fn new(domain: Domain, profile: &NucleicAcidProfile, ids: &mut PointIdAllocator) -> Self {
        let mut double_helix = Self {
            domain,
            helices: [
                Helix::new(Direction::Up, domain.index),
                Helix::new(Direction::Down, domain.index),
            ],
        };
        let zeroed: usize = domain.left_helix_joint.into();
        let other: usize = domain.left_helix_joint.inverse().into();
        double_helix.helices[zeroed].resize(domain.left_helix_count, profile, ids);
        double_helix.helices[other].resize(domain.other_helix_count, profile, ids);
        double_helix
    }

    /// The helix that progresses upwards from its 5' to its 3' end.
    pub fn up_helix(&self) -> &Helix {
        &self.helices[usize::from(Direction::Up)]
    }

    /// The helix that progresses downwards from its 5' to its 3' end.
    pub fn down_helix(&self) -> &Helix {
        &self.helices[usize::from(Direction::Down)]
    }

    /// The helix on the domain's left helical joint, lined up with the
    /// previous domain's right helical joint.
    pub fn left_helix(&self) -> &Helix {
        &self.helices[usize::from(self.domain.left_helix_joint)]
    }

    /// The helix on the domain's right helical joint, lined up with the next
    /// domain's left helical joint.
    pub fn right_helix(&self) -> &Helix {
        &self.helices[usize::from(self.domain.right_helix_joint)]
    }

    /// The helix lined up with the previous double helix. Same as
    /// `left_helix`.
    pub fn zeroed_helix(&self) -> &Helix {
        self.left_helix()
    }

    /// The helix that is not the zeroed helix.
    pub fn other_helix(&self) -> &Helix {
        &self.helices[usize::from(self.domain.left_helix_joint.inverse())]
    }

    pub(crate) fn into_helices(self) -> [Helix; 2] {
        self.helices
    }
}

/// One double helix per domain of a design.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoubleHelices(Vec<DoubleHelix>);

impl DoubleHelices {
    pub fn from_domains(domains: &Domains, profile: &NucleicAcidProfile) -> Self {
        let mut ids = PointIdAllocator::default();
        Self(
            domains
                .iter()
                .map(|domain| DoubleHelix::new(*domain, profile, &mut ids))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DoubleHelix> {
        self.0.iter()
    }

    pub(crate) fn into_vec(self) -> Vec<DoubleHelix> {
        self.0
    }
}
