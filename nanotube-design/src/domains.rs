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
//! Domains: parallel helix pairs occupying one position each in the
//! nanostructure's cross section.

use super::parameters::NucleicAcidProfile;
use super::points::Direction;

/// The description of one domain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    /// Stable index of the domain within its `Domains` container.
    pub index: usize,
    /// Direction of the helix lined up with the previous domain's right
    /// helical joint.
    pub left_helix_joint: Direction,
    /// Direction of the helix lined up with the next domain's left helical
    /// joint.
    pub right_helix_joint: Direction,
    /// The interior angle between this domain and the next is this multiple
    /// of the profile's characteristic angle.
    pub theta_interior_multiple: i32,
    /// The strand switch contribution is this multiple of the profile's
    /// switch angle.
    pub theta_switch_multiple: i32,
    /// Number of points on the helix of the left helical joint.
    pub left_helix_count: usize,
    /// Number of points on the other helix.
    pub other_helix_count: usize,
}

impl Domain {
    pub fn new(
        index: usize,
        left_helix_joint: Direction,
        right_helix_joint: Direction,
        theta_interior_multiple: i32,
        theta_switch_multiple: i32,
        left_helix_count: usize,
        other_helix_count: usize,
    ) -> Self {
        Self {
            index,
            left_helix_joint,
            right_helix_joint,
            theta_interior_multiple,
            theta_switch_multiple,
            left_helix_count,
            other_helix_count,
        }
    }
}

/// An ordered sequence of domains, with the rotational symmetry of the
/// nanostructure they describe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Domains {
    domains: Vec<Domain>,
    pub symmetry: usize,
}

impl Domains {
    /// Build a container from domain descriptors. Indices are rewritten to
    /// match the position of each domain in the sequence.
    pub fn new(mut domains: Vec<Domain>, symmetry: usize) -> Self {
        for (index, domain) in domains.iter_mut().enumerate() {
            domain.index = index;
        }
        Self { domains, symmetry }
    }

    pub fn count(&self) -> usize {
        self.domains.len()
    }

    pub fn get(&self, index: usize) -> Option<&Domain> {
        self.domains.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Domain> {
        self.domains.iter()
    }

    /// Sum of the interior angle multiples over all domains.
    pub fn interior_sum(&self) -> i32 {
        self.domains
            .iter()
            .map(|domain| domain.theta_interior_multiple)
            .sum()
    }

    /// The interior sum required for the cross section to close into a tube:
    /// `B * (N - 2) / 2`, where `N` is the domain count.
    pub fn target_interior_sum(&self, profile: &NucleicAcidProfile) -> f64 {
        let n = self.count() as f64;
        (profile.b as f64 * (n - 2.)) / 2.
    }

    /// Whether the interior angle multiples close the cross section.
    pub fn closes(&self, profile: &NucleicAcidProfile) -> bool {
        (self.interior_sum() as f64 - self.target_interior_sum(profile)).abs() < f64::EPSILON
    }
}
