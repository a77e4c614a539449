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
//! Nucleic acid geometric parameters.

use std::fs::File;
use std::io;
use std::path::Path;

/// Geometric parameters of a nucleic acid.
///
/// The profile is stored as a flat key-value document; derived values are
/// computed, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NucleicAcidProfile {
    /// Diameter of a domain, in nanometers.
    pub d: f64,
    /// Height of one turn of the helical axis, in nanometers.
    pub h: f64,
    /// Angle about the helical axis between a nucleoside and its mate, in
    /// degrees.
    pub g: f64,
    /// There are `t` turns every `b` bases.
    pub t: u32,
    /// There are `b` bases every `t` turns.
    pub b: u32,
    /// Characteristic height, in nanometers.
    pub z_c: f64,
    /// Vertical distance between a point and its mate on the other helix, in
    /// nanometers.
    pub z_mate: f64,
    /// Strand switch angle, in degrees.
    pub theta_s: f64,
}

impl NucleicAcidProfile {
    /// Default values for B-DNA, from the literature.
    pub const DEFAULT: NucleicAcidProfile = NucleicAcidProfile {
        d: 2.2,
        h: 3.549,
        g: 134.8,
        t: 2,
        b: 21,
        z_c: 0.17,
        z_mate: 0.094,
        theta_s: 2.343,
    };

    /// The height between two consecutive points on a helix, in nanometers.
    pub fn z_b(&self) -> f64 {
        (self.t as f64 * self.h) / self.b as f64
    }

    /// The angle about the helical axis between two consecutive points on a
    /// helix, in degrees.
    pub fn theta_b(&self) -> f64 {
        360. * (self.t as f64 / self.b as f64)
    }

    /// The characteristic angle, in degrees.
    pub fn theta_c(&self) -> f64 {
        360. / self.b as f64
    }

    /// Write the profile to a flat JSON document.
    pub fn to_file(&self, path: &Path) -> io::Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Read a profile from a flat JSON document.
    pub fn from_file(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        serde_json::from_reader(file).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

impl std::default::Default for NucleicAcidProfile {
    fn default() -> Self {
        Self::DEFAULT
    }
}
