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
//! Scenario tests exercising the splicing operations end to end.

use super::*;
use crate::strands::{
    DEFAULT_THICKNESS, DOWN_STRAND_GREY, INTERDOMAIN_THICKNESS, STRAND_COLORS, UP_STRAND_GREY,
};
use regex::Regex;

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Compare a strand's formated items against an objective, token by token.
/// Whitespace between the objective's bracketed tokens is ignored.
fn assert_good_strand<S: AsRef<str>>(strand: &Strand, objective: S) {
    let token = Regex::new(r"\[[^\]]*\]").expect("valid regex");
    let formated = strand.formated_items();
    let got: Vec<&str> = token.find_iter(&formated).map(|m| m.as_str()).collect();
    let expected: Vec<&str> = token
        .find_iter(objective.as_ref())
        .map(|m| m.as_str())
        .collect();
    assert_eq!(got, expected, "strand was {}", formated);
}

fn strand_on(
    ids: &mut PointIdAllocator,
    domain: usize,
    direction: Direction,
    count: usize,
) -> Strand {
    let profile = NucleicAcidProfile::DEFAULT;
    let mut points = Vec::new();
    for i in 0..count {
        points.push(Point::new(
            ids.next_id(),
            domain as f64 * profile.d,
            i as f64 * profile.z_b(),
            0.,
            direction,
            domain,
        ));
    }
    Strand::from_points(points)
}

fn ring_on(
    ids: &mut PointIdAllocator,
    domain: usize,
    direction: Direction,
    count: usize,
) -> Strand {
    let open = strand_on(ids, domain, direction, count);
    Strand::from_items(open.into_items(), true)
}

fn ids_of(strand: &Strand) -> Vec<usize> {
    strand.points().map(|point| point.id.0).collect()
}

fn nth_id(strand: &Strand, n: usize) -> PointId {
    strand.points().nth(n).map(|point| point.id).expect("point in range")
}

fn strand_containing(strands: &Strands, id: PointId) -> &Strand {
    let s_id = strands.strand_of(id).expect("point is owned");
    strands.get(&s_id).expect("owner exists")
}

fn total_points(strands: &Strands) -> usize {
    strands.point_count() + strands.nicks().count()
}

/// Every point of every strand must be indexed back to that strand, and the
/// index must not contain stale entries.
fn assert_index_consistent(strands: &Strands) {
    let mut count = 0;
    for (id, strand) in strands.iter() {
        for point in strand.points() {
            assert_eq!(strands.strand_of(point.id), Some(*id));
            count += 1;
        }
    }
    assert_eq!(strands.point_count(), count);
}

fn snapshot(strands: &Strands) -> Vec<(usize, String)> {
    strands
        .iter()
        .map(|(id, strand)| (*id, strand.formated_items()))
        .collect()
}

#[test]
fn design_unpacks_one_strand_per_helix() {
    init();
    let profile = NucleicAcidProfile::DEFAULT;
    let domain = |interior| Domain::new(0, Direction::Up, Direction::Down, interior, 0, 6, 6);
    let domains = Domains::new(vec![domain(4), domain(4)], 1);
    let design = Design::new(profile, domains);

    assert_eq!(design.strands.len(), 4);
    assert_eq!(design.strands.point_count(), 24);
    assert_index_consistent(&design.strands);
    assert_eq!(design.top_view().len(), 3);
}

#[test]
fn conjunct_crosses_two_open_strands() {
    init();
    let mut ids = PointIdAllocator::default();
    let s1 = strand_on(&mut ids, 0, Direction::Up, 4);
    let s2 = strand_on(&mut ids, 1, Direction::Down, 4);
    let (a, b) = (nth_id(&s1, 2), nth_id(&s2, 2));
    let mut strands = Strands::new(NucleicAcidProfile::DEFAULT, vec![s1, s2]);

    strands.conjunct(a, b, true).expect("conjunct succeeds");

    assert_eq!(strands.len(), 2);
    assert_eq!(ids_of(strand_containing(&strands, b)), vec![0, 1, 6, 7]);
    assert_eq!(ids_of(strand_containing(&strands, a)), vec![4, 5, 2, 3]);
    assert_index_consistent(&strands);
    assert_eq!(total_points(&strands), 8);

    // Both junction points now sit on interdomain strands.
    for id in [a, b] {
        let point = strands.point(id).expect("point is owned");
        assert!(point.junction);
    }
    assert_eq!(strands.point(a).and_then(|p| p.juncmate), Some(b));
    assert_eq!(strands.point(b).and_then(|p| p.juncmate), Some(a));
}

#[test]
fn conjunct_is_symmetric_in_its_arguments() {
    init();
    let build = || {
        let mut ids = PointIdAllocator::default();
        let s1 = strand_on(&mut ids, 0, Direction::Up, 4);
        let s2 = strand_on(&mut ids, 1, Direction::Down, 4);
        let (a, b) = (nth_id(&s1, 2), nth_id(&s2, 2));
        (Strands::new(NucleicAcidProfile::DEFAULT, vec![s1, s2]), a, b)
    };

    let (mut forward, a, b) = build();
    forward.conjunct(a, b, true).expect("conjunct succeeds");
    let (mut backward, a, b) = build();
    backward.conjunct(b, a, true).expect("conjunct succeeds");

    assert_eq!(snapshot(&forward), snapshot(&backward));
}

#[test]
fn conjunct_twice_restores_the_original_strands() {
    init();
    let mut ids = PointIdAllocator::default();
    let s1 = strand_on(&mut ids, 0, Direction::Up, 4);
    let s2 = strand_on(&mut ids, 1, Direction::Down, 4);
    let (a, b) = (nth_id(&s1, 2), nth_id(&s2, 2));
    let mut strands = Strands::new(NucleicAcidProfile::DEFAULT, vec![s1, s2]);

    strands.conjunct(a, b, true).expect("conjunct succeeds");
    strands.conjunct(a, b, true).expect("conjunct succeeds");

    assert_eq!(ids_of(strand_containing(&strands, a)), vec![0, 1, 2, 3]);
    assert_eq!(ids_of(strand_containing(&strands, b)), vec![4, 5, 6, 7]);
    assert_index_consistent(&strands);
}

#[test]
fn conjunct_on_one_open_strand_pinches_off_a_loop() {
    init();
    let mut ids = PointIdAllocator::default();
    let strand = strand_on(&mut ids, 0, Direction::Up, 6);
    let (a, b) = (nth_id(&strand, 1), nth_id(&strand, 4));
    let mut strands = Strands::new(NucleicAcidProfile::DEFAULT, vec![strand]);

    strands.conjunct(a, b, true).expect("conjunct succeeds");

    assert_eq!(strands.len(), 2);
    let loop_strand = strand_containing(&strands, a);
    assert!(loop_strand.closed);
    assert_eq!(ids_of(loop_strand), vec![1, 2, 3]);
    assert_good_strand(loop_strand, "[P1 d0 ^] [P2 d0 ^] [P3 d0 ^] [cycle]");

    let residual = strands
        .values()
        .find(|s| !s.closed)
        .expect("one residual open strand");
    assert_eq!(ids_of(residual), vec![0, 4, 5]);
    assert_index_consistent(&strands);
    assert_eq!(total_points(&strands), 6);
}

#[test]
fn conjunct_on_one_closed_strand_splits_the_ring() {
    init();
    let mut ids = PointIdAllocator::default();
    let ring = ring_on(&mut ids, 0, Direction::Up, 6);
    let (a, b) = (nth_id(&ring, 1), nth_id(&ring, 4));
    let mut strands = Strands::new(NucleicAcidProfile::DEFAULT, vec![ring]);

    strands.conjunct(a, b, true).expect("conjunct succeeds");

    assert_eq!(strands.len(), 2);
    let ring = strands.values().find(|s| s.closed).expect("wrap arc ring");
    assert_eq!(ids_of(ring), vec![0, 4, 5]);
    let open = strands.values().find(|s| !s.closed).expect("interior arc");
    assert_eq!(ids_of(open), vec![1, 2, 3]);
    assert_index_consistent(&strands);
}

#[test]
fn conjunct_merges_two_rings_into_one() {
    init();
    let mut ids = PointIdAllocator::default();
    let ring1 = ring_on(&mut ids, 0, Direction::Up, 4);
    let ring2 = ring_on(&mut ids, 1, Direction::Down, 4);
    let (a, b) = (nth_id(&ring1, 1), nth_id(&ring2, 1));
    let mut strands = Strands::new(NucleicAcidProfile::DEFAULT, vec![ring1, ring2]);

    strands.conjunct(a, b, true).expect("conjunct succeeds");

    assert_eq!(strands.len(), 1);
    let merged = strands.values().next().expect("merged ring");
    assert!(merged.closed);
    // Each ring is rotated so its junction point comes last.
    assert_eq!(ids_of(merged), vec![2, 3, 0, 1, 6, 7, 4, 5]);
    assert!(merged.interdomain());
    assert_index_consistent(&strands);
}

#[test]
fn conjunct_absorbs_a_ring_into_an_open_strand() {
    init();
    let mut ids = PointIdAllocator::default();
    let open = strand_on(&mut ids, 0, Direction::Up, 6);
    let ring = ring_on(&mut ids, 1, Direction::Down, 4);
    let (a, b) = (nth_id(&open, 2), nth_id(&ring, 2));
    let mut strands = Strands::new(NucleicAcidProfile::DEFAULT, vec![open, ring]);

    strands.conjunct(a, b, true).expect("conjunct succeeds");

    assert_eq!(strands.len(), 1);
    let spliced = strands.values().next().expect("spliced strand");
    assert!(!spliced.closed);
    assert_eq!(ids_of(spliced), vec![0, 1, 8, 9, 6, 7, 2, 3, 4, 5]);
    assert_index_consistent(&strands);
    assert_eq!(total_points(&strands), 10);
}

#[test]
fn conjunct_requires_junctable_points() {
    init();
    let mut ids = PointIdAllocator::default();
    let s1 = strand_on(&mut ids, 0, Direction::Up, 4);
    let s2 = strand_on(&mut ids, 1, Direction::Down, 4);
    let (a, b) = (nth_id(&s1, 2), nth_id(&s2, 2));
    let mut strands = Strands::new(NucleicAcidProfile::DEFAULT, vec![s1, s2]);

    let before = snapshot(&strands);
    assert_eq!(
        strands.conjunct(a, b, false),
        Err(ErrOperation::IneligibleJunction { p1: a, p2: b })
    );
    assert_eq!(snapshot(&strands), before);
}

#[test]
fn foreign_points_are_rejected_without_modification() {
    init();
    let mut ids = PointIdAllocator::default();
    let s1 = strand_on(&mut ids, 0, Direction::Up, 4);
    let a = nth_id(&s1, 0);
    let mut strands = Strands::new(NucleicAcidProfile::DEFAULT, vec![s1]);

    let foreign = PointId(999);
    let before = snapshot(&strands);
    assert_eq!(
        strands.conjunct(a, foreign, true),
        Err(ErrOperation::ForeignPoint(foreign))
    );
    assert_eq!(strands.nick(foreign), Err(ErrOperation::ForeignPoint(foreign)));
    assert_eq!(
        strands.link(a, foreign),
        Err(ErrOperation::ForeignPoint(foreign))
    );
    assert_eq!(strands.unnick(42), Err(ErrOperation::ForeignNick(42)));
    assert_eq!(snapshot(&strands), before);
}

#[test]
fn junct_enforces_the_distance_cutoff() {
    init();
    let mut ids = PointIdAllocator::default();
    let profile = NucleicAcidProfile::DEFAULT;
    // Two strands in different domains with one coincident point pair.
    let mut s1 = strand_on(&mut ids, 0, Direction::Up, 3);
    let s2 = strand_on(&mut ids, 1, Direction::Down, 3);
    for point in s1.points_mut() {
        point.x_coord = profile.d;
    }
    let (near1, near2) = (nth_id(&s1, 1), nth_id(&s2, 1));
    let (far1, far2) = (nth_id(&s1, 0), nth_id(&s2, 2));
    let mut strands = Strands::new(profile, vec![s1, s2]);

    assert_eq!(
        strands.junct(far1, far2),
        Err(ErrOperation::IneligibleJunction { p1: far1, p2: far2 })
    );
    strands.junct(near1, near2).expect("coincident points junct");
    assert_index_consistent(&strands);
}

#[test]
fn assign_junctability_marks_close_cross_domain_pairs() {
    init();
    let mut ids = PointIdAllocator::default();
    let profile = NucleicAcidProfile::DEFAULT;
    let mut s1 = strand_on(&mut ids, 0, Direction::Up, 3);
    let s2 = strand_on(&mut ids, 1, Direction::Down, 3);
    // Move one point of s1 next to s2's matching point.
    let target = nth_id(&s2, 1);
    let moved = nth_id(&s1, 1);
    for point in s1.points_mut() {
        if point.id == moved {
            point.x_coord = profile.d + 0.01;
        }
    }
    let mut strands = Strands::new(profile, vec![s1, s2]);

    strands.assign_junctability(0.1);

    for point in strands.points() {
        let expected = point.id == moved || point.id == target;
        assert_eq!(point.junctable, expected, "point {:?}", point.id);
    }
}

#[test]
fn nick_then_unnick_is_the_identity_on_an_open_strand() {
    init();
    let mut ids = PointIdAllocator::default();
    let strand = strand_on(&mut ids, 0, Direction::Up, 6);
    let target = nth_id(&strand, 2);
    let original = ids_of(&strand);
    let mut strands = Strands::new(NucleicAcidProfile::DEFAULT, vec![strand]);

    let nick_id = strands.nick(target).expect("nick succeeds");
    assert_eq!(strands.len(), 2);
    assert_eq!(total_points(&strands), 6);
    assert_index_consistent(&strands);

    strands.unnick(nick_id).expect("unnick succeeds");
    assert_eq!(strands.len(), 1);
    assert_eq!(ids_of(strands.values().next().expect("merged")), original);
    assert_eq!(strands.nicks().count(), 0);
    assert_index_consistent(&strands);
}

#[test]
fn nick_severs_a_ring_into_one_open_strand() {
    init();
    let mut ids = PointIdAllocator::default();
    let ring = ring_on(&mut ids, 0, Direction::Up, 5);
    // A ring has no terminus, so every point is a valid nick target.
    let target = nth_id(&ring, 2);
    let mut strands = Strands::new(NucleicAcidProfile::DEFAULT, vec![ring]);

    let nick_id = strands.nick(target).expect("nick succeeds");

    assert_eq!(strands.len(), 1);
    let open = strands.values().next().expect("opened strand");
    assert!(!open.closed);
    // The opened strand starts at the removed point's successor.
    assert_eq!(ids_of(open), vec![3, 4, 0, 1]);
    assert_index_consistent(&strands);

    strands.unnick(nick_id).expect("unnick succeeds");
    assert_eq!(strands.len(), 1);
    let restored = strands.values().next().expect("restored ring");
    assert!(restored.closed);
    assert_eq!(ids_of(restored), vec![3, 4, 0, 1, 2]);
}

#[test]
fn nick_rejects_a_terminus() {
    init();
    let mut ids = PointIdAllocator::default();
    let strand = strand_on(&mut ids, 0, Direction::Up, 4);
    let (first, last) = (nth_id(&strand, 0), nth_id(&strand, 3));
    let mut strands = Strands::new(NucleicAcidProfile::DEFAULT, vec![strand]);

    let before = snapshot(&strands);
    assert_eq!(strands.nick(first), Err(ErrOperation::InvalidNickPoint(first)));
    assert_eq!(strands.nick(last), Err(ErrOperation::InvalidNickPoint(last)));
    assert_eq!(snapshot(&strands), before);
}

#[test]
fn pinned_style_survives_nick_and_unnick() {
    init();
    let mut ids = PointIdAllocator::default();
    let mut strand = strand_on(&mut ids, 0, Direction::Up, 6);
    strand.style.color = AutoValue::pinned(0x123456);
    let target = nth_id(&strand, 2);
    let mut strands = Strands::new(NucleicAcidProfile::DEFAULT, vec![strand]);

    let nick_id = strands.nick(target).expect("nick succeeds");
    strands.unnick(nick_id).expect("unnick succeeds");

    let merged = strands.values().next().expect("merged strand");
    assert_eq!(merged.style.color, AutoValue::pinned(0x123456));
}

#[test]
fn link_joins_opposite_strand_ends_with_a_linkage() {
    init();
    let mut ids = PointIdAllocator::default();
    let up = strand_on(&mut ids, 0, Direction::Up, 3);
    let down = strand_on(&mut ids, 1, Direction::Down, 3);
    let (a, b) = (nth_id(&up, 2), nth_id(&down, 0));
    let mut strands = Strands::new(NucleicAcidProfile::DEFAULT, vec![up, down]);

    strands.link(a, b).expect("link succeeds");

    assert_eq!(strands.len(), 1);
    let merged = strands.values().next().expect("merged strand");
    assert_eq!(merged.len(), 7);
    assert_eq!(merged.points().count(), 6);
    assert_good_strand(
        merged,
        "[P0 d0 ^] [P1 d0 ^] [P2 d0 ^] [@0] [P3 d1 v] [P4 d1 v] [P5 d1 v]",
    );
    assert_index_consistent(&strands);
}

#[test]
fn link_rejects_matching_orientations_and_interior_points() {
    init();
    let mut ids = PointIdAllocator::default();
    let up1 = strand_on(&mut ids, 0, Direction::Up, 3);
    let up2 = strand_on(&mut ids, 1, Direction::Up, 3);
    let down = strand_on(&mut ids, 2, Direction::Down, 3);
    let (a, b) = (nth_id(&up1, 2), nth_id(&up2, 0));
    let interior = nth_id(&down, 1);
    let mut strands = Strands::new(NucleicAcidProfile::DEFAULT, vec![up1, up2, down]);

    let before = snapshot(&strands);
    assert_eq!(strands.link(a, b), Err(ErrOperation::InvalidLinkEndpoint(b)));
    assert_eq!(
        strands.link(a, interior),
        Err(ErrOperation::InvalidLinkEndpoint(interior))
    );
    assert_eq!(snapshot(&strands), before);
}

#[test]
fn style_distinguishes_touching_interdomain_strands() {
    init();
    let profile = NucleicAcidProfile::DEFAULT;
    let mut ids = PointIdAllocator::default();
    let mut near = |x: f64, z: f64, domain: usize| {
        Point::new(ids.next_id(), x, z, 0., Direction::Up, domain)
    };
    // Two interdomain strands running within touching distance.
    let a = Strand::from_points(vec![near(0., 0., 0), near(0.05, 0., 1)]);
    let b = Strand::from_points(vec![near(0., 0.05, 0), near(0.05, 0.05, 1)]);
    let strands = Strands::new(profile, vec![a, b]);

    let colors: Vec<u32> = strands
        .values()
        .map(|strand| strand.style.color.value)
        .collect();
    assert_ne!(colors[0], colors[1]);
    for color in colors {
        assert!(STRAND_COLORS.contains(&color));
    }
    for strand in strands.values() {
        assert_eq!(strand.style.thickness.value, INTERDOMAIN_THICKNESS);
    }
}

#[test]
fn style_greys_intra_domain_strands_by_direction() {
    init();
    let mut ids = PointIdAllocator::default();
    let up = strand_on(&mut ids, 0, Direction::Up, 3);
    let down = strand_on(&mut ids, 0, Direction::Down, 3);
    let strands = Strands::new(NucleicAcidProfile::DEFAULT, vec![up, down]);

    let styles: Vec<StrandStyle> = strands.values().map(|s| s.style).collect();
    assert_eq!(styles[0].color.value, UP_STRAND_GREY);
    assert_eq!(styles[1].color.value, DOWN_STRAND_GREY);
    for style in styles {
        assert_eq!(style.thickness.value, DEFAULT_THICKNESS);
    }
}

#[test]
fn orientation_listings_do_not_cross() {
    init();
    let mut ids = PointIdAllocator::default();
    let up = strand_on(&mut ids, 0, Direction::Up, 3);
    let down = strand_on(&mut ids, 1, Direction::Down, 3);
    let strands = Strands::new(NucleicAcidProfile::DEFAULT, vec![up, down]);

    let ups = strands.up_strands();
    let downs = strands.down_strands();
    assert_eq!(ups.len(), 1);
    assert_eq!(downs.len(), 1);
    assert!(strands.get(&ups[0]).expect("up strand").up_strand());
    assert!(strands.get(&downs[0]).expect("down strand").down_strand());
}

#[test]
fn sequences_randomize_and_clear() {
    init();
    let mut ids = PointIdAllocator::default();
    let mut strand = strand_on(&mut ids, 0, Direction::Up, 8);
    let pinned = nth_id(&strand, 0);
    if let Some(point) = strand.point_mut(pinned) {
        point.base = Some('A');
    }
    let mut strands = Strands::new(NucleicAcidProfile::DEFAULT, vec![strand]);

    strands.randomize_sequences(false);
    let sequence = strands.values().next().expect("strand").sequence();
    assert_eq!(sequence.len(), 8);
    assert!(sequence.chars().all(|c| "ATCG".contains(c)));
    // Without overwrite the pre-assigned base is kept.
    assert_eq!(sequence.chars().next(), Some('A'));

    strands.clear_sequences();
    let cleared = strands.values().next().expect("strand").sequence();
    assert_eq!(cleared, "XXXXXXXX");
}

#[test]
fn split_partitions_a_strand_at_a_point() {
    init();
    let mut ids = PointIdAllocator::default();
    let strand = strand_on(&mut ids, 0, Direction::Up, 5);
    let target = nth_id(&strand, 2);

    let (prefix, suffix) = strand.split(target).expect("point on strand");
    assert_eq!(ids_of(&prefix), vec![0, 1]);
    assert_eq!(ids_of(&suffix), vec![2, 3, 4]);
}

#[test]
fn bounding_boxes_gate_the_touching_scan() {
    init();
    let mut ids = PointIdAllocator::default();
    let near = strand_on(&mut ids, 0, Direction::Up, 3);
    let mut far = strand_on(&mut ids, 0, Direction::Up, 3);
    for point in far.points_mut() {
        point.x_coord += 100.;
    }

    assert!(near.touching(&near.clone(), 0.2));
    assert!(!near.touching(&far, 0.2));
}
