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
//! Compact text rendering of strands, used by logs and tests.

use std::fmt;

use super::{Item, Strand};
use crate::points::Direction;

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Item::Point(point) => {
                let arrow = match point.direction {
                    Direction::Up => '^',
                    Direction::Down => 'v',
                };
                write!(f, "[P{} d{} {}]", point.id.0, point.domain, arrow)
            }
            Item::Linkage(linkage) => {
                let nb = linkage.sequence.as_ref().map(|s| s.len()).unwrap_or(0);
                write!(f, "[@{}]", nb)
            }
        }
    }
}

impl Strand {
    /// One bracketed token per item, with a `[cycle]` marker on closed
    /// strands.
    pub fn formated_items(&self) -> String {
        let mut ret = String::new();
        for item in self.iter() {
            ret.push_str(&item.to_string());
        }
        if self.closed {
            ret.push_str("[cycle]");
        }
        ret
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.formated_items())
    }
}
