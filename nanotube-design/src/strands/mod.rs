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
//! Strands and the strand collection.
//!
//! This module contains the topology engine of the design: strands as
//! ordered sequences of points and linkage markers, and the collection-level
//! splicing operations (`conjunct`, `nick`, `unnick`, `link`) that rewrite
//! strand membership while keeping the collection consistent.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, VecDeque};

use log::debug;
use rand::seq::SliceRandom;
use ultraviolet::DVec2;

use super::helices::DoubleHelices;
use super::parameters::NucleicAcidProfile;
use super::points::{Point, PointId};
use super::utils::{is_false, shuffled_indices};

mod formating;

/// Candidate colors for interdomain strands, searched first-fit when
/// restyling.
pub const STRAND_COLORS: [u32; 8] = [
    0xE84855, 0xF29E4C, 0xF1C40F, 0x2ECC71, 0x16A085, 0x3498DB, 0x9B59B6, 0xE56399,
];

/// Color of strands whose points all progress upwards.
pub const UP_STRAND_GREY: u32 = 0xB8B8B8;
/// Color of every other non-interdomain strand.
pub const DOWN_STRAND_GREY: u32 = 0x4F4F4F;

pub const INTERDOMAIN_THICKNESS: f64 = 9.5;
pub const DEFAULT_THICKNESS: f64 = 2.0;

/// Two strands closer than this (in nanometers) are considered touching.
pub const TOUCHING_DISTANCE: f64 = 0.2;

/// Maximum distance between two points for `Strands::junct`, in nanometers.
pub const JUNCTION_DISTANCE_CUTOFF: f64 = 0.2;

const BASES: [char; 4] = ['A', 'T', 'C', 'G'];

/// An error that occured when trying to apply an operation to the strand
/// collection. A returned error always leaves the collection unmodified.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ErrOperation {
    /// The points fail the junctable/distance precondition.
    IneligibleJunction { p1: PointId, p2: PointId },
    /// The point is not owned by this collection.
    ForeignPoint(PointId),
    /// The strand identifier is not owned by this collection.
    ForeignStrand(usize),
    /// The nick identifier is not owned by this collection.
    ForeignNick(usize),
    /// The point is not a strand terminus, or the strand orientations match
    /// when they must differ.
    InvalidLinkEndpoint(PointId),
    /// The point has no neighbour on each side to record as a cut end.
    InvalidNickPoint(PointId),
}

impl std::fmt::Display for ErrOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrOperation::IneligibleJunction { p1, p2 } => {
                write!(f, "points {:?} and {:?} are not junctable", p1, p2)
            }
            ErrOperation::ForeignPoint(id) => {
                write!(f, "point {:?} is not in this collection", id)
            }
            ErrOperation::ForeignStrand(id) => {
                write!(f, "strand {} is not in this collection", id)
            }
            ErrOperation::ForeignNick(id) => {
                write!(f, "nick {} is not in this collection", id)
            }
            ErrOperation::InvalidLinkEndpoint(id) => {
                write!(f, "point {:?} cannot be linked", id)
            }
            ErrOperation::InvalidNickPoint(id) => {
                write!(f, "point {:?} cannot be nicked", id)
            }
        }
    }
}

impl std::error::Error for ErrOperation {}

/// A style attribute that is either managed automatically by `style()` or
/// pinned to a user-chosen value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AutoValue<T> {
    pub automatic: bool,
    pub value: T,
}

impl<T> AutoValue<T> {
    pub fn auto(value: T) -> Self {
        Self {
            automatic: true,
            value,
        }
    }

    pub fn pinned(value: T) -> Self {
        Self {
            automatic: false,
            value,
        }
    }

    /// Overwrite the value only if it is automatically managed.
    pub fn set_auto(&mut self, value: T) {
        if self.automatic {
            self.value = value;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrandStyle {
    pub color: AutoValue<u32>,
    pub thickness: AutoValue<f64>,
}

impl Default for StrandStyle {
    fn default() -> Self {
        Self {
            color: AutoValue::auto(DOWN_STRAND_GREY),
            thickness: AutoValue::auto(DEFAULT_THICKNESS),
        }
    }
}

/// A synthetic connector joining two strand endpoints end to end. Counted as
/// an item but not a point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Linkage {
    pub coord_one: DVec2,
    pub coord_two: DVec2,
    #[serde(default)]
    pub sequence: Option<String>,
}

/// An item of a strand: either a point on a helix or a linkage marker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Item {
    Point(Point),
    Linkage(Linkage),
}

impl Item {
    pub fn as_point(&self) -> Option<&Point> {
        match self {
            Item::Point(point) => Some(point),
            Item::Linkage(_) => None,
        }
    }

    pub(crate) fn as_point_mut(&mut self) -> Option<&mut Point> {
        match self {
            Item::Point(point) => Some(point),
            Item::Linkage(_) => None,
        }
    }

    pub fn is_point(&self) -> bool {
        matches!(self, Item::Point(_))
    }
}

/// A severed adjacency: the removed point and the two points now at the cut
/// ends. Created by `nick`, consumed by `unnick`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Nick {
    pub point: Point,
    pub previous: PointId,
    pub next: PointId,
}

/// Axis-aligned bounding box of a strand's points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub x_min: f64,
    pub x_max: f64,
    pub z_min: f64,
    pub z_max: f64,
}

impl BoundingBox {
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.z_max - self.z_min
    }

    /// Whether the two boxes, each inflated by `margin`, overlap.
    pub fn overlaps(&self, other: &BoundingBox, margin: f64) -> bool {
        self.x_min - margin <= other.x_max
            && other.x_min - margin <= self.x_max
            && self.z_min - margin <= other.z_max
            && other.z_min - margin <= self.z_max
    }
}

#[derive(Debug, Clone, Copy)]
struct Derived {
    up_strand: bool,
    down_strand: bool,
    interdomain: bool,
    bounds: Option<BoundingBox>,
}

/// An ordered, orientable sequence of items.
///
/// Derived properties (orientation, interdomain-ness, bounding box) are
/// memoized against a mutation counter; every mutating method invalidates
/// them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Strand {
    items: VecDeque<Item>,
    /// Whether the strand is a ring. A closed strand has no defined start or
    /// end point.
    #[serde(default, skip_serializing_if = "is_false")]
    pub closed: bool,
    #[serde(default)]
    pub style: StrandStyle,
    #[serde(skip, default)]
    mutations: u64,
    #[serde(skip, default)]
    cache: RefCell<Option<(u64, Derived)>>,
}

impl Strand {
    pub fn from_items(items: impl IntoIterator<Item = Item>, closed: bool) -> Self {
        Self {
            items: items.into_iter().collect(),
            closed,
            ..Default::default()
        }
    }

    pub fn from_points(points: impl IntoIterator<Item = Point>) -> Self {
        Self::from_items(points.into_iter().map(Item::Point), false)
    }

    fn invalidate(&mut self) {
        self.mutations += 1;
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn append(&mut self, item: Item) {
        self.invalidate();
        self.items.push_back(item);
    }

    pub fn appendleft(&mut self, item: Item) {
        self.invalidate();
        self.items.push_front(item);
    }

    pub fn extend(&mut self, items: impl IntoIterator<Item = Item>) {
        self.invalidate();
        self.items.extend(items);
    }

    /// Extend on the left. As with a deque, the extension ends up in reverse
    /// order at the front.
    pub fn extendleft(&mut self, items: impl IntoIterator<Item = Item>) {
        self.invalidate();
        for item in items {
            self.items.push_front(item);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    pub fn item(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    /// A read-only view of the items in `[start, end)`; an absent `end`
    /// means "to the end of the strand".
    pub fn sliced(&self, start: usize, end: Option<usize>) -> impl Iterator<Item = &Item> {
        let end = end.unwrap_or_else(|| self.items.len());
        self.items.iter().skip(start).take(end.saturating_sub(start))
    }

    pub fn points(&self) -> impl Iterator<Item = &Point> {
        self.items.iter().filter_map(|item| item.as_point())
    }

    pub(crate) fn points_mut(&mut self) -> impl Iterator<Item = &mut Point> {
        self.invalidate();
        self.items.iter_mut().filter_map(|item| item.as_point_mut())
    }

    pub fn first_point(&self) -> Option<&Point> {
        self.points().next()
    }

    pub fn last_point(&self) -> Option<&Point> {
        self.items.iter().rev().filter_map(|item| item.as_point()).next()
    }

    /// The item index of the point with the given identity.
    pub fn index_of(&self, id: PointId) -> Option<usize> {
        self.items.iter().position(|item| match item {
            Item::Point(point) => point.id == id,
            Item::Linkage(_) => false,
        })
    }

    pub fn point(&self, id: PointId) -> Option<&Point> {
        self.points().find(|point| point.id == id)
    }

    pub(crate) fn point_mut(&mut self, id: PointId) -> Option<&mut Point> {
        self.points_mut().find(|point| point.id == id)
    }

    /// Split into the prefix before `point` (exclusive) and the suffix from
    /// `point` (inclusive). `None` if the point is not on this strand.
    pub fn split(self, point: PointId) -> Option<(Strand, Strand)> {
        let index = self.index_of(point)?;
        let style = self.style;
        let mut head: Vec<Item> = self.items.into_iter().collect();
        let tail = head.split_off(index);
        let mut prefix = Strand::from_items(head, false);
        let mut suffix = Strand::from_items(tail, false);
        prefix.style = style;
        suffix.style = style;
        Some((prefix, suffix))
    }

    pub(crate) fn into_items(self) -> VecDeque<Item> {
        self.items
    }

    fn derived(&self) -> Derived {
        if let Some((at, derived)) = *self.cache.borrow() {
            if at == self.mutations {
                return derived;
            }
        }
        let derived = self.compute_derived();
        *self.cache.borrow_mut() = Some((self.mutations, derived));
        derived
    }

    fn compute_derived(&self) -> Derived {
        let mut up_strand = true;
        let mut down_strand = true;
        let mut first_domain = None;
        let mut interdomain = false;
        let mut bounds: Option<BoundingBox> = None;

        for point in self.points() {
            match point.direction {
                super::points::Direction::Up => down_strand = false,
                super::points::Direction::Down => up_strand = false,
            }
            match first_domain {
                None => first_domain = Some(point.domain),
                Some(domain) if domain != point.domain => interdomain = true,
                Some(_) => {}
            }
            bounds = Some(match bounds {
                None => BoundingBox {
                    x_min: point.x_coord,
                    x_max: point.x_coord,
                    z_min: point.z_coord,
                    z_max: point.z_coord,
                },
                Some(b) => BoundingBox {
                    x_min: b.x_min.min(point.x_coord),
                    x_max: b.x_max.max(point.x_coord),
                    z_min: b.z_min.min(point.z_coord),
                    z_max: b.z_max.max(point.z_coord),
                },
            });
        }

        Derived {
            up_strand,
            down_strand,
            interdomain,
            bounds,
        }
    }

    /// Whether every point of this strand progresses upwards.
    pub fn up_strand(&self) -> bool {
        self.derived().up_strand
    }

    /// Whether every point of this strand progresses downwards.
    pub fn down_strand(&self) -> bool {
        self.derived().down_strand
    }

    /// Whether the points of this strand span more than one domain.
    pub fn interdomain(&self) -> bool {
        self.derived().interdomain
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.derived().bounds
    }

    /// Overall (width, height) of the strand, in nanometers.
    pub fn size(&self) -> (f64, f64) {
        match self.bounding_box() {
            Some(bounds) => (bounds.width(), bounds.height()),
            None => (0., 0.),
        }
    }

    /// Whether any point of this strand is within `threshold` nanometers of
    /// any point of `other`. Rejects via bounding boxes before the pairwise
    /// scan; the scan order is randomized to break up degenerate symmetric
    /// layouts.
    pub fn touching(&self, other: &Strand, threshold: f64) -> bool {
        let (ours_box, theirs_box) = match (self.bounding_box(), other.bounding_box()) {
            (Some(a), Some(b)) => (a, b),
            _ => return false,
        };
        if !ours_box.overlaps(&theirs_box, threshold) {
            return false;
        }

        let ours: Vec<DVec2> = self.points().map(|point| point.position()).collect();
        let theirs: Vec<DVec2> = other.points().map(|point| point.position()).collect();
        let their_order = shuffled_indices(theirs.len());
        for i in shuffled_indices(ours.len()) {
            for &j in &their_order {
                if (ours[i] - theirs[j]).mag() < threshold {
                    return true;
                }
            }
        }
        false
    }

    /// The strand's sequence, one character per point; unset bases read as
    /// `X`.
    pub fn sequence(&self) -> String {
        self.points().map(|point| point.base.unwrap_or('X')).collect()
    }

    /// Assign a random base to each point; existing bases are kept unless
    /// `overwrite` is set.
    pub fn randomize_sequence(&mut self, overwrite: bool) {
        let mut rng = rand::thread_rng();
        for point in self.points_mut() {
            if overwrite || point.base.is_none() {
                if let Some(&base) = BASES.choose(&mut rng) {
                    point.base = Some(base);
                }
            }
        }
    }

    pub fn clear_sequence(&mut self) {
        for point in self.points_mut() {
            point.base = None;
        }
    }
}

fn split2(items: VecDeque<Item>, at: usize) -> (Vec<Item>, Vec<Item>) {
    let mut head: Vec<Item> = items.into_iter().collect();
    let tail = head.split_off(at);
    (head, tail)
}

fn split3(items: VecDeque<Item>, lo: usize, hi: usize) -> (Vec<Item>, Vec<Item>, Vec<Item>) {
    let mut head: Vec<Item> = items.into_iter().collect();
    let tail = head.split_off(hi);
    let mid = head.split_off(lo);
    (head, mid, tail)
}

/// The collection of all strands of a design, with the nick records and the
/// point-ownership index.
///
/// Every point reachable from an owned strand has an entry in the ownership
/// index pointing at its strand; no point is ever shared between two
/// strands. All mutating operations validate their preconditions before
/// touching the member set, so a returned error leaves the collection
/// unmodified.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Strands {
    pub profile: NucleicAcidProfile,
    strands: BTreeMap<usize, Strand>,
    nicks: BTreeMap<usize, Nick>,
    #[serde(default)]
    strand_of: HashMap<PointId, usize, ahash::RandomState>,
}

impl Strands {
    pub fn new(profile: NucleicAcidProfile, strands: Vec<Strand>) -> Self {
        let mut ret = Self {
            profile,
            strands: BTreeMap::new(),
            nicks: BTreeMap::new(),
            strand_of: HashMap::default(),
        };
        for strand in strands {
            ret.push(strand);
        }
        ret.style();
        ret
    }

    /// Unpack every helix of every double helix into one open strand.
    pub fn from_double_helices(
        profile: NucleicAcidProfile,
        double_helices: DoubleHelices,
    ) -> Self {
        let mut strands = Vec::new();
        for double_helix in double_helices.into_vec() {
            for helix in double_helix.into_helices() {
                strands.push(Strand::from_points(helix.into_points()));
            }
        }
        Self::new(profile, strands)
    }

    // Collection methods
    //============================================================================================
    pub fn len(&self) -> usize {
        self.strands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strands.is_empty()
    }

    pub fn get(&self, id: &usize) -> Option<&Strand> {
        self.strands.get(id)
    }

    pub fn keys(&self) -> impl Iterator<Item = &usize> {
        self.strands.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&usize, &Strand)> {
        self.strands.iter()
    }

    pub fn values(&self) -> impl Iterator<Item = &Strand> {
        self.strands.values()
    }

    /// Add a strand to the collection, indexing its points. Returns the new
    /// strand's identifier.
    pub fn push(&mut self, strand: Strand) -> usize {
        let id = self.strands.keys().max().map(|m| m + 1).unwrap_or(0);
        for point in strand.points() {
            self.strand_of.insert(point.id, id);
        }
        self.strands.insert(id, strand);
        id
    }

    pub fn append(&mut self, strand: Strand) -> usize {
        self.push(strand)
    }

    pub fn extend(&mut self, strands: impl IntoIterator<Item = Strand>) {
        for strand in strands {
            self.push(strand);
        }
    }

    /// Remove a strand, deindexing its points.
    pub fn remove(&mut self, s_id: usize) -> Result<Strand, ErrOperation> {
        let strand = self
            .strands
            .remove(&s_id)
            .ok_or(ErrOperation::ForeignStrand(s_id))?;
        for point in strand.points() {
            self.strand_of.remove(&point.id);
        }
        Ok(strand)
    }
    //============================================================================================

    /// The identifier of the strand owning the given point.
    pub fn strand_of(&self, id: PointId) -> Option<usize> {
        self.strand_of.get(&id).copied()
    }

    pub fn point(&self, id: PointId) -> Option<&Point> {
        let s_id = self.strand_of.get(&id)?;
        self.strands.get(s_id)?.point(id)
    }

    fn point_mut(&mut self, id: PointId) -> Option<&mut Point> {
        let s_id = *self.strand_of.get(&id)?;
        self.strands.get_mut(&s_id)?.point_mut(id)
    }

    pub fn points(&self) -> impl Iterator<Item = &Point> {
        self.strands.values().flat_map(|strand| strand.points())
    }

    pub fn point_count(&self) -> usize {
        self.points().count()
    }

    pub fn nicks(&self) -> impl Iterator<Item = (&usize, &Nick)> {
        self.nicks.iter()
    }

    /// Identifiers of the strands whose points all progress upwards.
    pub fn up_strands(&self) -> Vec<usize> {
        self.strands
            .iter()
            .filter(|(_, strand)| strand.up_strand())
            .map(|(id, _)| *id)
            .collect()
    }

    /// Identifiers of the strands whose points all progress downwards.
    pub fn down_strands(&self) -> Vec<usize> {
        self.strands
            .iter()
            .filter(|(_, strand)| strand.down_strand())
            .map(|(id, _)| *id)
            .collect()
    }

    /// Overall (width, height) of all strands laid out next to one another.
    pub fn size(&self) -> (f64, f64) {
        let mut bounds: Option<BoundingBox> = None;
        for strand in self.strands.values() {
            if let Some(b) = strand.bounding_box() {
                bounds = Some(match bounds {
                    None => b,
                    Some(acc) => BoundingBox {
                        x_min: acc.x_min.min(b.x_min),
                        x_max: acc.x_max.max(b.x_max),
                        z_min: acc.z_min.min(b.z_min),
                        z_max: acc.z_max.max(b.z_max),
                    },
                });
            }
        }
        match bounds {
            Some(b) => (b.width(), b.height()),
            None => (0., 0.),
        }
    }

    fn locate(&self, id: PointId) -> Result<(usize, usize), ErrOperation> {
        let s_id = *self
            .strand_of
            .get(&id)
            .ok_or(ErrOperation::ForeignPoint(id))?;
        let strand = self
            .strands
            .get(&s_id)
            .ok_or(ErrOperation::ForeignStrand(s_id))?;
        let index = strand.index_of(id).ok_or(ErrOperation::ForeignPoint(id))?;
        Ok((s_id, index))
    }

    fn take_strand(&mut self, s_id: usize) -> Strand {
        self.strands
            .remove(&s_id)
            .expect("strand located before removal")
    }

    /// Mark as junctable every pair of points from different domains within
    /// `threshold` nanometers of each other.
    pub fn assign_junctability(&mut self, threshold: f64) {
        let snapshot: Vec<(PointId, usize, DVec2)> = self
            .points()
            .map(|point| (point.id, point.domain, point.position()))
            .collect();

        let mut eligible = Vec::new();
        for i in 0..snapshot.len() {
            for j in (i + 1)..snapshot.len() {
                let (a, domain_a, pos_a) = snapshot[i];
                let (b, domain_b, pos_b) = snapshot[j];
                if domain_a != domain_b && (pos_a - pos_b).mag() < threshold {
                    eligible.push(a);
                    eligible.push(b);
                }
            }
        }

        for strand in self.strands.values_mut() {
            for point in strand.points_mut() {
                point.junctable = false;
            }
        }
        for id in eligible {
            if let Some(point) = self.point_mut(id) {
                point.junctable = true;
            }
        }
    }

    /// Toggle a cross-strand junction at two eligible points.
    ///
    /// The point with the smaller x coordinate plays the role of `p1`; the
    /// order of the arguments does not matter. Unless `skip_checks` is set,
    /// both points must be junctable.
    pub fn conjunct(
        &mut self,
        p1: PointId,
        p2: PointId,
        skip_checks: bool,
    ) -> Result<(), ErrOperation> {
        let (mut p1, mut p2) = (p1, p2);
        let (mut s1, mut i1) = self.locate(p1)?;
        let (mut s2, mut i2) = self.locate(p2)?;

        if !skip_checks {
            let junctable =
                |id: PointId| self.point(id).map(|point| point.junctable).unwrap_or(false);
            if !junctable(p1) || !junctable(p2) {
                return Err(ErrOperation::IneligibleJunction { p1, p2 });
            }
        }

        // Canonicalize: the lefter point is p1.
        let x = |id: PointId| self.point(id).map(|point| point.x_coord).unwrap_or(0.);
        if x(p1) > x(p2) {
            std::mem::swap(&mut p1, &mut p2);
            std::mem::swap(&mut s1, &mut s2);
            std::mem::swap(&mut i1, &mut i2);
        }

        debug!(
            "conjunct: same_strand={} i1={} i2={} closed=({}, {}) lengths=({}, {})",
            s1 == s2,
            i1,
            i2,
            self.strands[&s1].closed,
            self.strands[&s2].closed,
            self.strands[&s1].len(),
            self.strands[&s2].len(),
        );

        let mut new_strands: Vec<Strand> = Vec::with_capacity(2);

        if s1 == s2 {
            let strand = self.take_strand(s1);
            let closed = strand.closed;
            let style = strand.style;
            let (lo, hi) = (i1.min(i2), i1.max(i2));
            let (head, mid, tail) = split3(strand.into_items(), lo, hi);

            if closed {
                // Cut the ring at both points: the wrapping arc stays a
                // ring, the interior arc becomes an open strand.
                let mut ring = Strand::from_items(head, true);
                ring.extend(tail);
                ring.style = style;
                new_strands.push(ring);
                new_strands.push(Strand::from_items(mid, false));
            } else {
                // The interior arc closes into a loop; the two outer arcs
                // join into one residual open strand.
                new_strands.push(Strand::from_items(mid, true));
                let mut residual = Strand::from_items(head, false);
                residual.extend(tail);
                residual.style = style;
                new_strands.push(residual);
            }
        } else {
            let closed1 = self.strands[&s1].closed;
            let closed2 = self.strands[&s2].closed;
            let strand1 = self.take_strand(s1);
            let strand2 = self.take_strand(s2);

            match (closed1, closed2) {
                (true, true) => {
                    // Rotate each ring so its junction point comes last,
                    // then concatenate into one larger ring. This case has a
                    // single output strand.
                    let mut items1 = strand1.into_items();
                    let len1 = items1.len();
                    items1.rotate_left((i1 + 1) % len1);
                    let mut items2 = strand2.into_items();
                    let len2 = items2.len();
                    items2.rotate_left((i2 + 1) % len2);
                    let mut ring = Strand::from_items(items1, true);
                    ring.extend(items2);
                    new_strands.push(ring);
                }
                (true, false) => {
                    new_strands.push(splice_ring_into_open(strand2, i2, strand1, i1));
                }
                (false, true) => {
                    new_strands.push(splice_ring_into_open(strand1, i1, strand2, i2));
                }
                (false, false) => {
                    // Cross the two strands at the junction.
                    let (head1, tail1) = split2(strand1.into_items(), i1);
                    let (head2, tail2) = split2(strand2.into_items(), i2);
                    let mut crossed1 = Strand::from_items(head1, false);
                    crossed1.extend(tail2);
                    let mut crossed2 = Strand::from_items(head2, false);
                    crossed2.extend(tail1);
                    new_strands.push(crossed1);
                    new_strands.push(crossed2);
                }
            }
        }

        for strand in new_strands {
            if !strand.is_empty() {
                self.push(strand);
            }
        }

        // A point is a junction iff its strand now leaves its domain.
        for id in [p1, p2] {
            let interdomain = self
                .strand_of
                .get(&id)
                .and_then(|s_id| self.strands.get(s_id))
                .map(|strand| strand.interdomain())
                .unwrap_or(false);
            if let Some(point) = self.point_mut(id) {
                point.junction = interdomain;
            }
        }
        if let Some(point) = self.point_mut(p1) {
            point.juncmate = Some(p2);
        }
        if let Some(point) = self.point_mut(p2) {
            point.juncmate = Some(p1);
        }

        self.style();
        Ok(())
    }

    /// Junction helper for interactively picked points: the two points must
    /// overlap within `JUNCTION_DISTANCE_CUTOFF`.
    pub fn junct(&mut self, p1: PointId, p2: PointId) -> Result<(), ErrOperation> {
        let a = self.point(p1).ok_or(ErrOperation::ForeignPoint(p1))?;
        let b = self.point(p2).ok_or(ErrOperation::ForeignPoint(p2))?;
        if (a.position() - b.position()).mag() > JUNCTION_DISTANCE_CUTOFF {
            return Err(ErrOperation::IneligibleJunction { p1, p2 });
        }
        self.conjunct(p1, p2, true)
    }

    /// Split a strand in two at `point`, removing the point and recording a
    /// nick. Returns the nick's identifier.
    pub fn nick(&mut self, point: PointId) -> Result<usize, ErrOperation> {
        let (s_id, index) = self.locate(point)?;
        let strand = &self.strands[&s_id];
        let len = strand.len();

        let (prev_index, next_index) = if strand.closed {
            if len < 3 {
                return Err(ErrOperation::InvalidNickPoint(point));
            }
            ((index + len - 1) % len, (index + 1) % len)
        } else {
            if index == 0 || index + 1 == len {
                return Err(ErrOperation::InvalidNickPoint(point));
            }
            (index - 1, index + 1)
        };
        let neighbour = |at: usize| {
            strand
                .item(at)
                .and_then(Item::as_point)
                .map(|p| p.id)
                .ok_or(ErrOperation::InvalidNickPoint(point))
        };
        let previous = neighbour(prev_index)?;
        let next = neighbour(next_index)?;

        debug!("nick: point={:?} strand={} index={}", point, s_id, index);

        let strand = self.take_strand(s_id);
        let closed = strand.closed;
        let style = strand.style;
        let mut items = strand.into_items();

        if closed {
            // A nicked ring becomes a single open strand starting at the
            // removed point's successor.
            items.rotate_left(index);
            let removed = match items.pop_front() {
                Some(Item::Point(point)) => point,
                _ => unreachable!("nick target located as a point"),
            };
            self.strand_of.remove(&removed.id);
            let mut open = Strand::from_items(items, false);
            open.style = style;
            let nick_id = self.push_nick(Nick {
                point: removed,
                previous,
                next,
            });
            self.push(open);
            self.style();
            Ok(nick_id)
        } else {
            let mut tail = items.split_off(index);
            let removed = match tail.pop_front() {
                Some(Item::Point(point)) => point,
                _ => unreachable!("nick target located as a point"),
            };
            self.strand_of.remove(&removed.id);
            let mut first = Strand::from_items(items, false);
            first.style = style;
            let mut second = Strand::from_items(tail, false);
            second.style = style;
            let nick_id = self.push_nick(Nick {
                point: removed,
                previous,
                next,
            });
            self.push(first);
            self.push(second);
            self.style();
            Ok(nick_id)
        }
    }

    /// Rebuild one strand from the two strands adjoining the recorded cut,
    /// reinserting the removed point. The longer strand's style attributes
    /// are preserved onto the merged result (ties prefer the first operand).
    pub fn unnick(&mut self, nick_id: usize) -> Result<(), ErrOperation> {
        let (previous, next) = {
            let nick = self
                .nicks
                .get(&nick_id)
                .ok_or(ErrOperation::ForeignNick(nick_id))?;
            (nick.previous, nick.next)
        };
        let (s_prev, _) = self.locate(previous)?;
        let (s_next, _) = self.locate(next)?;

        let nick = self
            .nicks
            .remove(&nick_id)
            .expect("nick id checked above");

        if s_prev == s_next {
            // Both cut ends are on the same open strand: restore the ring.
            let mut strand = self.take_strand(s_prev);
            strand.append(Item::Point(nick.point));
            strand.closed = true;
            self.push(strand);
        } else {
            let first = self.take_strand(s_prev);
            let second = self.take_strand(s_next);
            let style = if second.len() > first.len() {
                second.style
            } else {
                first.style
            };
            let mut merged = first;
            merged.append(Item::Point(nick.point));
            merged.extend(second.into_items());
            merged.closed = false;
            merged.style = style;
            self.push(merged);
        }

        self.style();
        Ok(())
    }

    /// Join two strand endpoints with a linkage between them. The two
    /// strands must have opposite orientations and both points must be
    /// strand termini. Returns the merged strand's identifier.
    pub fn link(&mut self, p1: PointId, p2: PointId) -> Result<usize, ErrOperation> {
        let (s1, _) = self.locate(p1)?;
        let (s2, _) = self.locate(p2)?;
        if s1 == s2 {
            return Err(ErrOperation::InvalidLinkEndpoint(p1));
        }

        let terminus = |strand: &Strand, id: PointId| {
            strand.first_point().map(|p| p.id) == Some(id)
                || strand.last_point().map(|p| p.id) == Some(id)
        };
        {
            let strand1 = &self.strands[&s1];
            let strand2 = &self.strands[&s2];
            if strand1.closed || !terminus(strand1, p1) {
                return Err(ErrOperation::InvalidLinkEndpoint(p1));
            }
            if strand2.closed || !terminus(strand2, p2) {
                return Err(ErrOperation::InvalidLinkEndpoint(p2));
            }
            let opposite = (strand1.up_strand() && strand2.down_strand())
                || (strand1.down_strand() && strand2.up_strand());
            if !opposite {
                return Err(ErrOperation::InvalidLinkEndpoint(p2));
            }
        }

        // Canonicalize: p1 belongs to the upward strand.
        let (p1, p2, s1, s2) = if self.strands[&s1].down_strand() {
            (p2, p1, s2, s1)
        } else {
            (p1, p2, s1, s2)
        };

        // The strand that ends at the junction side comes first.
        let (begin_id, end_id) = if self.strands[&s1].last_point().map(|p| p.id) == Some(p1) {
            if self.strands[&s2].first_point().map(|p| p.id) != Some(p2) {
                return Err(ErrOperation::InvalidLinkEndpoint(p2));
            }
            (s1, s2)
        } else {
            if self.strands[&s2].last_point().map(|p| p.id) != Some(p2) {
                return Err(ErrOperation::InvalidLinkEndpoint(p2));
            }
            (s2, s1)
        };

        let coord_one = self.strands[&begin_id]
            .last_point()
            .map(|p| p.position())
            .ok_or(ErrOperation::InvalidLinkEndpoint(p1))?;
        let coord_two = self.strands[&end_id]
            .first_point()
            .map(|p| p.position())
            .ok_or(ErrOperation::InvalidLinkEndpoint(p2))?;

        debug!("link: {:?} -> {:?}", p1, p2);

        let begin = self.take_strand(begin_id);
        let end = self.take_strand(end_id);
        let style = if end.len() > begin.len() {
            end.style
        } else {
            begin.style
        };
        let mut merged = begin;
        merged.append(Item::Linkage(Linkage {
            coord_one,
            coord_two,
            sequence: None,
        }));
        merged.extend(end.into_items());
        merged.style = style;
        let id = self.push(merged);
        self.style();
        Ok(id)
    }

    /// Recompute automatic colors and thicknesses for all strands. Touching
    /// interdomain strands never share a color.
    pub fn style(&mut self) {
        let ids: Vec<usize> = self.strands.keys().copied().collect();
        for s_id in ids {
            let (interdomain, up_strand) = {
                let strand = &self.strands[&s_id];
                (strand.interdomain(), strand.up_strand())
            };

            let thickness = if interdomain {
                INTERDOMAIN_THICKNESS
            } else {
                DEFAULT_THICKNESS
            };

            let color = if interdomain {
                let strand = &self.strands[&s_id];
                let mut illegal = Vec::new();
                for (other_id, other) in self.strands.iter() {
                    if *other_id != s_id && strand.touching(other, TOUCHING_DISTANCE) {
                        illegal.push(other.style.color.value);
                    }
                }
                STRAND_COLORS
                    .iter()
                    .copied()
                    .find(|candidate| !illegal.contains(candidate))
            } else if up_strand {
                Some(UP_STRAND_GREY)
            } else {
                Some(DOWN_STRAND_GREY)
            };

            if let Some(strand) = self.strands.get_mut(&s_id) {
                strand.style.thickness.set_auto(thickness);
                if let Some(color) = color {
                    strand.style.color.set_auto(color);
                }
            }
        }
    }

    pub fn randomize_sequences(&mut self, overwrite: bool) {
        for strand in self.strands.values_mut() {
            strand.randomize_sequence(overwrite);
        }
    }

    pub fn clear_sequences(&mut self) {
        for strand in self.strands.values_mut() {
            strand.clear_sequence();
        }
    }

    fn push_nick(&mut self, nick: Nick) -> usize {
        let id = self.nicks.keys().max().map(|m| m + 1).unwrap_or(0);
        self.nicks.insert(id, nick);
        id
    }
}

/// Splice the open strand's two halves around the ring at the junction
/// point. The ring's point order is rotated so its junction point becomes
/// the splice seam; the absorbed ring disappears as a strand.
fn splice_ring_into_open(open: Strand, open_index: usize, ring: Strand, ring_index: usize) -> Strand {
    let style = open.style;
    let (head, tail) = split2(open.into_items(), open_index);
    let (ring_head, ring_tail) = split2(ring.into_items(), ring_index);
    let mut out = Strand::from_items(head, false);
    out.extend(ring_tail);
    out.extend(ring_head);
    out.extend(tail);
    out.style = style;
    out
}
