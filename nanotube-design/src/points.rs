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
//! Points along the helices of a design.
//!
//! A `Point` is a discrete coordinate on one helix of a domain where a strand
//! may be manipulated (joined at a junction, nicked, linked). Points carry an
//! immutable identity; the strand that owns a point is tracked by the strand
//! collection, not by the point itself.

use num_enum::{IntoPrimitive, TryFromPrimitive};
use ultraviolet::DVec2;

/// The direction in which a helix progresses from its 5' to its 3' end.
///
/// The two helices of a domain always have opposite directions. The `usize`
/// representation is used to index `[T; 2]` helix pairs.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    IntoPrimitive,
    TryFromPrimitive,
)]
#[repr(usize)]
pub enum Direction {
    Up = 0,
    Down = 1,
}

impl Direction {
    pub fn inverse(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }
}

/// The identity of a point. Allocated once, never reused, stable across all
/// strand splicing operations.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct PointId(pub usize);

/// Allocates point identifiers from a monotonically increasing counter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PointIdAllocator(usize);

impl PointIdAllocator {
    pub fn next_id(&mut self) -> PointId {
        let id = PointId(self.0);
        self.0 += 1;
        id
    }
}

/// A single helical coordinate.
///
/// `domain` and `direction` never change after creation. The junction state
/// (`junctable`, `junction`, `juncmate`) is maintained by the strand
/// collection; `juncmate` is an identifier, not an owning reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Point {
    pub id: PointId,
    /// Horizontal coordinate, in nanometers.
    pub x_coord: f64,
    /// Vertical coordinate, in nanometers.
    pub z_coord: f64,
    /// Helical azimuth, in degrees.
    pub angle: f64,
    pub direction: Direction,
    /// Index of the owning domain.
    pub domain: usize,
    /// Whether this point meets the geometric precondition to participate in
    /// a junction.
    #[serde(default)]
    pub junctable: bool,
    /// Whether this point is currently part of a junction. Recomputed after
    /// every splice.
    #[serde(default)]
    pub junction: bool,
    /// The partner point at a junction site, if any.
    #[serde(default)]
    pub juncmate: Option<PointId>,
    /// The nucleoside base at this point, if assigned.
    #[serde(default)]
    pub base: Option<char>,
}

impl Point {
    pub fn new(
        id: PointId,
        x_coord: f64,
        z_coord: f64,
        angle: f64,
        direction: Direction,
        domain: usize,
    ) -> Self {
        Self {
            id,
            x_coord,
            z_coord,
            angle,
            direction,
            domain,
            junctable: false,
            junction: false,
            juncmate: None,
            base: None,
        }
    }

    pub fn position(&self) -> DVec2 {
        DVec2::new(self.x_coord, self.z_coord)
    }

    /// The Watson-Crick complement of this point's base, if a base is set.
    pub fn complement(&self) -> Option<char> {
        self.base.and_then(complement)
    }
}

/// The Watson-Crick complement of a base.
pub fn complement(base: char) -> Option<char> {
    match base {
        'A' => Some('T'),
        'T' => Some('A'),
        'C' => Some('G'),
        'G' => Some('C'),
        _ => None,
    }
}
