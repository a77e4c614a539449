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
//! Strand topology for DNA nanotube designs.
//!
//! A design is a cross section of domains, each carrying a double helix of
//! points; strands thread through those points and are rewritten by the
//! splicing operations of [`Strands`]: `conjunct` toggles a junction between
//! two points, `nick` severs a strand at a point, `unnick` undoes a nick,
//! and `link` joins two strand ends with a synthetic connector.

#[macro_use]
extern crate serde_derive;

pub mod domains;
pub mod helices;
pub mod parameters;
pub mod points;
pub mod strands;
pub mod top_view;
mod utils;

#[cfg(test)]
mod tests;

pub use domains::{Domain, Domains};
pub use helices::{DoubleHelices, DoubleHelix, Helix};
pub use parameters::NucleicAcidProfile;
pub use points::{Direction, Point, PointId, PointIdAllocator};
pub use strands::{
    AutoValue, BoundingBox, ErrOperation, Item, Linkage, Nick, Strand, StrandStyle, Strands,
};
pub use top_view::TopView;

/// A complete design: the profile, the cross section, and the strands
/// threaded through it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Design {
    pub profile: NucleicAcidProfile,
    pub domains: Domains,
    pub strands: Strands,
}

impl Design {
    /// Build a design from a cross section: every helix of every domain
    /// starts out as one open strand.
    pub fn new(profile: NucleicAcidProfile, domains: Domains) -> Self {
        let double_helices = DoubleHelices::from_domains(&domains, &profile);
        let strands = Strands::from_double_helices(profile, double_helices);
        Self {
            profile,
            domains,
            strands,
        }
    }

    /// The 2D centerline layout of the cross section.
    pub fn top_view(&self) -> TopView {
        TopView::new(&self.domains, &self.profile)
    }
}
