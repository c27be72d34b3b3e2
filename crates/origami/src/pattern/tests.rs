use std::cell::RefCell;
use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_2, PI, SQRT_2};
use std::rc::Rc;

use nalgebra::{vector, Vector2};
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::*;
use crate::error::PatternError;
use crate::geom2::{cross, Ray};
use crate::graph::FaceId;
use crate::io::{Base, FoldFile};

fn v(x: f64, y: f64) -> Vector2<f64> {
    vector![x, y]
}

fn polar(c: Vector2<f64>, r: f64, th: f64) -> Vector2<f64> {
    c + vector![th.cos(), th.sin()] * r
}

/// Creases from `center` outwards along each angle; returns the center node.
fn star(cp: &mut CreasePattern, center: Vector2<f64>, angles: &[f64]) -> NodeId {
    for th in angles {
        cp.crease_points(center, polar(center, 0.3, *th)).unwrap();
    }
    cp.clean();
    cp.graph().nearest_node(center).unwrap()
}

/// Interior vertex joined to the four edge midpoints of the unit square.
fn cross_pattern(p: Vector2<f64>, orientations: [Orientation; 4]) -> CreasePattern {
    let mut cp = CreasePattern::new();
    let ends = [v(0.5, 0.0), v(1.0, 0.5), v(0.5, 1.0), v(0.0, 0.5)];
    for (end, o) in ends.iter().zip(orientations) {
        let id = cp.crease_points(p, *end).unwrap();
        cp.crease_at_mut(id).unwrap().orientation = o;
    }
    cp.clean();
    cp
}

fn events(cp: &mut CreasePattern) -> Rc<RefCell<Vec<PatternEvent>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    cp.subscribe(move |e| sink.borrow_mut().push(e.clone()));
    log
}

// ---- construction ----

#[test]
fn diagonal_splits_square_into_two_triangles() {
    let mut cp = CreasePattern::new();
    cp.crease_points(v(0.0, 0.0), v(1.0, 1.0)).unwrap();
    cp.clean();
    let faces = cp.graph().faces();
    assert_eq!(faces.len(), 2);
    assert!(faces.iter().all(|f| f.nodes.len() == 3));
    assert_eq!(cp.count(Orientation::Border), 4);
    assert_eq!(cp.count(Orientation::Mark), 1);
    assert!(cp.flat_foldable());
}

#[test]
fn crease_outside_sheet_is_absent() {
    let mut cp = CreasePattern::new();
    assert!(cp.crease_points(v(2.0, 2.0), v(3.0, 2.5)).is_none());
    assert!(cp.crease(Ray::new(v(2.0, 0.5), v(1.0, 0.0))).is_none());
    assert_eq!(cp.count(Orientation::Mark), 0);
}

#[test]
fn new_creases_default_to_marks_and_can_be_reoriented() {
    let mut cp = CreasePattern::new();
    let id = cp.crease(Line::new(v(0.5, 0.5), v(1.0, 0.0))).unwrap();
    assert_eq!(cp.crease_at(id).unwrap().orientation, Orientation::Mark);
    cp.crease_at_mut(id).unwrap().valley();
    assert_eq!(cp.count(Orientation::Valley), 1);
    let seg = cp.segment(id).unwrap();
    assert!((seg.length() - 1.0).abs() < 1e-12);
}

#[test]
fn symmetry_mirrors_and_notifies_once() {
    let mut cp = CreasePattern::new();
    cp.book_symmetry();
    let log = events(&mut cp);
    let id = cp.crease_points(v(0.1, 0.0), v(0.3, 1.0)).unwrap();

    let log = log.borrow();
    assert_eq!(log.len(), 1);
    let PatternEvent::Creased { edges } = &log[0] else {
        panic!("unexpected event {:?}", log[0]);
    };
    assert_eq!(edges.len(), 2);
    assert!(edges.contains(&id));

    let mirror = Segment::new(v(0.9, 0.0), v(0.7, 1.0));
    let found = edges
        .iter()
        .filter(|e| **e != id)
        .filter_map(|e| cp.segment(*e))
        .any(|s| s.equivalent(&mirror, 1e-9));
    assert!(found);
}

#[test]
fn crease_on_symmetry_line_is_not_doubled() {
    let mut cp = CreasePattern::new();
    cp.book_symmetry();
    cp.crease(Line::new(v(0.5, 0.3), v(0.0, 1.0))).unwrap();
    assert_eq!(cp.count(Orientation::Mark), 1);
}

#[test]
fn crease_and_stop_ends_at_first_crease() {
    let mut cp = CreasePattern::new();
    cp.crease_points(v(0.5, 0.0), v(0.5, 1.0)).unwrap();

    let hit = cp
        .crease_and_stop(Ray::new(v(0.1, 0.5), v(1.0, 0.0)))
        .unwrap();
    assert!((cp.segment(hit).unwrap().length() - 0.4).abs() < 1e-9);

    // nothing in the way: runs to the border
    let free = cp
        .crease_and_stop(Ray::new(v(0.1, 0.5), v(-1.0, 0.0)))
        .unwrap();
    assert!((cp.segment(free).unwrap().length() - 0.1).abs() < 1e-9);

    // a segment crossing the crease is cut short
    let cut = cp
        .crease_and_stop(Segment::new(v(0.2, 0.8), v(0.9, 0.8)))
        .unwrap();
    assert!((cp.segment(cut).unwrap().length() - 0.3).abs() < 1e-9);
}

#[test]
fn ray_repeat_bounces_off_creases_and_stops_at_border() {
    let mut cp = CreasePattern::new();
    cp.crease_points(v(0.5, 0.0), v(0.5, 1.0)).unwrap();
    let legs = cp.crease_ray_repeat(&Ray::new(v(0.2, 0.3), v(1.0, 0.0)), None);
    assert_eq!(legs.len(), 2);
    let total: f64 = legs.iter().filter_map(|e| cp.segment(*e)).map(|s| s.length()).sum();
    assert!((total - 0.8).abs() < 1e-9);

    let short = cp.crease_ray_repeat(&Ray::new(v(0.2, 0.6), v(1.0, 0.0)), Some(v(0.4, 0.6)));
    assert_eq!(short.len(), 1);
    assert!((cp.segment(short[0]).unwrap().length() - 0.2).abs() < 1e-9);
}

#[test]
fn polyline_drops_pieces_outside_the_sheet() {
    let mut cp = CreasePattern::new();
    let ids = cp.crease_polyline(&[v(0.2, 0.2), v(0.8, 0.2), v(3.0, 3.0), v(4.0, 3.0)]);
    // last leg is fully outside; the middle one is clipped
    assert_eq!(ids.len(), 2);
}

#[test]
fn mirror_leaving_the_sheet_keeps_the_primary_crease() {
    let mut cp = CreasePattern::new();
    // mirror about the right border: every image lands outside
    cp.set_symmetry_line(Line::new(v(1.0, 0.0), v(0.0, 1.0)));
    assert!(cp.symmetry().is_some());
    let log = events(&mut cp);
    let id = cp.crease_points(v(0.2, 0.5), v(0.4, 0.5)).unwrap();

    assert_eq!(cp.count(Orientation::Mark), 1);
    assert_eq!(
        log.borrow().as_slice(),
        &[PatternEvent::Creased { edges: vec![id] }]
    );
}

#[test]
fn zero_direction_clears_the_symmetry_line() {
    let mut cp = CreasePattern::new();
    cp.book_symmetry();
    cp.set_symmetry_line(Line::new(v(0.5, 0.5), v(0.0, 0.0)));
    assert!(cp.symmetry().is_none());
    cp.crease_points(v(0.1, 0.0), v(0.3, 1.0)).unwrap();
    assert_eq!(cp.count(Orientation::Mark), 1);
}

#[test]
fn diagonal_symmetry_swaps_coordinates() {
    let mut cp = CreasePattern::new();
    cp.diagonal_symmetry();
    cp.crease_points(v(0.2, 0.0), v(0.2, 0.3)).unwrap();
    assert_eq!(cp.count(Orientation::Mark), 2);
    let image = Segment::new(v(0.0, 0.2), v(0.3, 0.2));
    assert!(cp
        .creases()
        .filter(|(_, e)| e.data.orientation == Orientation::Mark)
        .filter_map(|(id, _)| cp.segment(id))
        .any(|s| s.equivalent(&image, 1e-9)));
}

#[test]
fn crease_and_stop_line_spans_between_neighbouring_creases() {
    let mut cp = CreasePattern::new();
    cp.crease_points(v(0.3, 0.0), v(0.3, 1.0)).unwrap();
    cp.crease_points(v(0.7, 0.0), v(0.7, 1.0)).unwrap();

    let mid = cp
        .crease_and_stop(Line::new(v(0.5, 0.5), v(1.0, 0.0)))
        .unwrap();
    let s = cp.segment(mid).unwrap();
    assert!(s.equivalent(&Segment::new(v(0.3, 0.5), v(0.7, 0.5)), 1e-9));

    // the border counts as the nearest crease on the open side
    let side = cp
        .crease_and_stop(Line::new(v(0.1, 0.2), v(1.0, 0.0)))
        .unwrap();
    assert!((cp.segment(side).unwrap().length() - 0.3).abs() < 1e-9);
}

#[test]
fn crease_and_stop_segment_starting_off_the_sheet() {
    let mut cp = CreasePattern::new();
    let whole = cp
        .crease_and_stop(Segment::new(v(-0.5, 0.5), v(0.5, 0.5)))
        .unwrap();
    let s = cp.segment(whole).unwrap();
    assert!(s.equivalent(&Segment::new(v(0.0, 0.5), v(0.5, 0.5)), 1e-9));

    cp.crease_points(v(0.3, 0.0), v(0.3, 1.0)).unwrap();
    let cut = cp
        .crease_and_stop(Segment::new(v(-0.5, 0.2), v(0.5, 0.2)))
        .unwrap();
    assert!((cp.segment(cut).unwrap().length() - 0.3).abs() < 1e-9);
    assert!(cp
        .crease_and_stop(Segment::new(v(2.0, 0.2), v(3.0, 0.2)))
        .is_none());
}

#[test]
fn line_repeat_bounces_both_ways_and_notifies_once() {
    let mut cp = CreasePattern::new();
    cp.crease_points(v(0.5, 0.0), v(0.5, 1.0)).unwrap();
    let log = events(&mut cp);
    let legs = cp.crease_line_repeat(&Line::new(v(0.2, 0.3), v(1.0, 0.0)));
    // forward: to the crease and back to the left border; backward: to the left border
    assert_eq!(legs.len(), 3);
    let total: f64 = legs.iter().filter_map(|e| cp.segment(*e)).map(|s| s.length()).sum();
    assert!((total - 1.0).abs() < 1e-9);
    assert_eq!(log.borrow().len(), 1);
}

#[test]
fn crease_and_reflect_dispatches_on_input() {
    let mut cp = CreasePattern::new();
    cp.crease_points(v(0.5, 0.0), v(0.5, 1.0)).unwrap();
    assert_eq!(
        cp.crease_and_reflect(Ray::new(v(0.2, 0.7), v(1.0, 0.0))).len(),
        2
    );
    assert_eq!(
        cp.crease_and_reflect(Line::new(v(0.2, 0.4), v(1.0, 0.0))).len(),
        3
    );
    assert!(cp
        .crease_and_reflect(Segment::new(v(0.1, 0.9), v(0.4, 0.9)))
        .is_empty());
}

// ---- boundary ----

#[test]
fn set_boundary_rebuilds_border_creases() {
    let mut cp = CreasePattern::new();
    cp.crease_points(v(0.2, 0.2), v(0.8, 0.8)).unwrap();
    cp.rectangle(2.0, 1.0).unwrap();
    assert_eq!(cp.count(Orientation::Border), 4);
    assert_eq!(cp.count(Orientation::Mark), 1);
    assert!(cp.contains(v(1.5, 0.5)));
    assert!(!cp.contains(v(2.5, 0.5)));

    let pts = [v(0.0, 0.0), v(1.0, 0.0), v(0.5, 0.2), v(0.5, 1.0)];
    cp.set_boundary(&pts, false).unwrap();
    assert_eq!(cp.boundary().vertices().len(), 3);
    assert!(cp.set_boundary(&[v(0.0, 0.0), v(1.0, 1.0)], false).is_err());
}

#[test]
fn clear_and_remove_marks_keep_the_border() {
    let mut cp = CreasePattern::new();
    cp.crease_points(v(0.0, 0.5), v(1.0, 0.5)).unwrap();
    let id = cp.crease_points(v(0.5, 0.0), v(0.5, 1.0)).unwrap();
    cp.crease_at_mut(id).unwrap().mountain();
    assert_eq!(cp.remove_all_marks(), 1);
    assert_eq!(cp.count(Orientation::Mark), 0);
    assert_eq!(cp.count(Orientation::Mountain), 1);
    cp.clear();
    assert_eq!(cp.count(Orientation::Mountain), 0);
    assert_eq!(cp.count(Orientation::Border), 4);
    assert_eq!(cp.graph().faces().len(), 1);
}

#[test]
fn minimum_rect_boundary_wraps_the_nodes() {
    let mut cp = CreasePattern::new();
    cp.regular_polygon(4).unwrap();
    assert!(!cp.contains(v(0.9, 0.9)));
    cp.set_minimum_rect_boundary().unwrap();
    assert_eq!(cp.boundary().vertices().len(), 4);
    assert_eq!(cp.count(Orientation::Border), 4);
    assert!(cp.contains(v(0.9, 0.9)));
    let r = cp.bounds().unwrap();
    assert!((r.width() - 2.0).abs() < 1e-9);
    assert!((r.height() - 2.0).abs() < 1e-9);
}

#[test]
fn border_edges_by_side() {
    let mut cp = CreasePattern::new();
    cp.rectangle(2.0, 1.0).unwrap();
    let mid = |id: Option<EdgeId>| cp.segment(id.unwrap()).unwrap().midpoint();
    // y grows downwards
    assert!((mid(cp.bottom_edge()) - v(1.0, 1.0)).norm() < 1e-9);
    assert!((mid(cp.top_edge()) - v(1.0, 0.0)).norm() < 1e-9);
    assert!((mid(cp.left_edge()) - v(0.0, 0.5)).norm() < 1e-9);
    assert!((mid(cp.right_edge()) - v(2.0, 0.5)).norm() < 1e-9);
    let bottom = cp.bottom_edge().unwrap();
    assert_eq!(cp.crease_at(bottom).unwrap().orientation, Orientation::Border);
}

// ---- axioms ----

#[test]
fn edge_to_edge_on_crossing_diagonals_gives_two_bisectors() {
    let mut cp = CreasePattern::new();
    let a = cp.crease_points(v(0.0, 0.0), v(1.0, 1.0)).unwrap();
    let b = cp.crease_points(v(0.0, 1.0), v(1.0, 0.0)).unwrap();
    let ids = cp.crease_edge_to_edge(a, b);
    assert_eq!(ids.len(), 2);
    for id in ids {
        let c = cp.crease_at(id).unwrap();
        assert_eq!(c.provenance.as_ref().map(Provenance::axiom), Some(3));
        assert!((cp.segment(id).unwrap().length() - 1.0).abs() < 1e-9);
    }
}

#[test]
fn perpendicular_and_point_to_line_folds() {
    let mut cp = CreasePattern::new();
    let base = cp.crease_points(v(0.0, 0.25), v(1.0, 0.25)).unwrap();
    let perp = cp
        .crease_perpendicular_through_point(base, v(0.3, 0.6))
        .unwrap();
    let s = cp.segment(perp).unwrap();
    assert!(s.vector().x.abs() < 1e-9);
    assert!((s.a.x - 0.3).abs() < 1e-9);

    // circle about (0.5, 0.5) through (0.5, 0.9) meets y = 0.25 twice
    let ids = cp.crease_point_to_line(v(0.5, 0.5), v(0.5, 0.9), base);
    assert_eq!(ids.len(), 2);
    assert!(cp.crease_point_to_line(v(0.5, 0.5), v(0.5, 0.6), base).is_empty());

    let up = cp.crease_points(v(0.9, 0.0), v(0.9, 1.0)).unwrap();
    let seven = cp
        .crease_perpendicular_point_onto_line(v(0.2, 0.8), base, up)
        .unwrap();
    assert_eq!(
        cp.crease_at(seven).unwrap().provenance.as_ref().map(Provenance::axiom),
        Some(7)
    );
}

#[test]
fn enumerators_do_not_mutate() {
    let cp = CreasePattern::new();
    let edges = cp.graph().edge_count();
    // the two diagonals; border-aligned lines have no chord
    assert_eq!(cp.available_axiom1_folds().len(), 2);
    // two midlines (each twice) and two diagonals
    assert_eq!(cp.available_axiom2_folds().len(), 6);
    let all = cp.available_axiom_folds();
    assert!(all.len() >= 8);
    assert!(all
        .iter()
        .all(|c| matches!(c.provenance.axiom(), 1 | 2 | 3)));
    // perpendiculars through corners run along the border
    assert!(cp.available_axiom4_folds().is_empty());
    assert_eq!(cp.graph().edge_count(), edges);

    let mut cp = CreasePattern::new();
    cp.crease_points(v(0.2, 0.2), v(0.8, 0.2)).unwrap();
    cp.clean();
    let edges = cp.graph().edge_count();
    assert!(!cp.available_axiom4_folds().is_empty());
    assert_eq!(cp.graph().edge_count(), edges);
}

// ---- pleats ----

#[test]
fn pleat_between_parallel_creases_is_evenly_spaced() {
    let mut cp = CreasePattern::new();
    let a = cp.crease_points(v(0.2, 0.0), v(0.2, 1.0)).unwrap();
    let b = cp.crease_points(v(0.8, 0.0), v(0.8, 1.0)).unwrap();
    let ids = cp.pleat(3, a, b);
    assert_eq!(ids.len(), 2);
    let mut xs: Vec<f64> = ids.iter().map(|e| cp.segment(*e).unwrap().a.x).collect();
    xs.sort_by(|p, q| p.partial_cmp(q).unwrap());
    assert!((xs[0] - 0.4).abs() < 1e-9);
    assert!((xs[1] - 0.6).abs() < 1e-9);
}

#[test]
fn pleat_of_perpendicular_creases_halves_the_angle() {
    let mut cp = CreasePattern::new();
    let a = cp.crease_points(v(0.5, 0.0), v(0.5, 1.0)).unwrap();
    let b = cp.crease_points(v(0.0, 0.5), v(1.0, 0.5)).unwrap();
    let ids = cp.pleat(2, a, b);
    assert_eq!(ids.len(), 1);
    let s = cp.segment(ids[0]).unwrap();
    assert!((s.length() - SQRT_2).abs() < 1e-9);
    assert!((s.midpoint() - v(0.5, 0.5)).norm() < 1e-9);
}

#[test]
fn glitch_pleat_interpolates_points() {
    let mut cp = CreasePattern::new();
    let a = cp.crease_points(v(0.2, 0.0), v(0.2, 1.0)).unwrap();
    let b = cp.crease_points(v(0.8, 0.0), v(0.8, 1.0)).unwrap();
    assert!(cp.glitch_pleat(a, b, 1).is_empty());
    let ids = cp.glitch_pleat(a, b, 3);
    assert_eq!(ids.len(), 2);
    for id in &ids {
        assert!(cp.segment(*id).unwrap().vector().x.abs() < 1e-9);
    }
}

// ---- foldability ----

#[test]
fn maekawa_counts_mountains_and_valleys() {
    use Orientation::{Mountain as M, Valley as V};
    let good = cross_pattern(v(0.5, 0.5), [M, M, M, V]);
    let n = good.graph().nearest_node(v(0.5, 0.5)).unwrap();
    assert!(good.kawasaki(n, 1e-4));
    assert!(good.maekawa(n));
    assert!(good.flat_foldable());

    let bad = cross_pattern(v(0.5, 0.5), [M, M, V, V]);
    let n = bad.graph().nearest_node(v(0.5, 0.5)).unwrap();
    assert!(bad.kawasaki(n, 1e-4));
    assert!(!bad.maekawa(n));
    assert!(!bad.flat_foldable());
}

#[test]
fn kawasaki_solution_reports_group_differences() {
    let mut cp = CreasePattern::new();
    let n = star(&mut cp, v(0.5, 0.5), &[0.0, 1.0, 2.0, PI + 1.2]);
    let [even, odd] = cp.kawasaki_solution(n).unwrap();
    assert_eq!(even.sectors.len(), 2);
    assert_eq!(odd.sectors.len(), 2);
    assert!((even.difference + odd.difference).abs() < 1e-9);
    assert!((cp.kawasaki_rating(n).unwrap() - 0.4).abs() < 1e-9);
    assert!(!cp.kawasaki(n, 1e-4));
}

#[test]
fn free_ends_fail_and_border_vertices_pass() {
    let mut cp = CreasePattern::new();
    cp.crease_points(v(0.2, 0.2), v(0.4, 0.3)).unwrap();
    cp.clean();
    // one crease: odd valence
    let end = cp.graph().nearest_node(v(0.2, 0.2)).unwrap();
    assert!(!cp.kawasaki(end, 1e-4));
    let corner = cp.graph().nearest_node(v(0.0, 0.0)).unwrap();
    assert!(cp.is_boundary_node(corner));
    assert!(cp.flat_foldable_node(corner));
}

#[test]
fn collapse_finds_the_missing_crease() {
    let mut cp = CreasePattern::new();
    let c = v(0.5, 0.5);
    let n = star(&mut cp, c, &[FRAC_PI_2, 0.0, 1.25 * PI]);
    assert!(cp.kawasaki_rating(n).is_none());
    assert!(!cp.kawasaki(n, 1e-4));

    let j = cp.graph().junction_of(n).unwrap();
    assert_eq!(j.sectors.len(), 3);
    let wide = j
        .sectors
        .iter()
        .copied()
        .find(|s| {
            let sec = cp.graph().sector(*s).unwrap();
            let d = cp.graph().edge_vector_from(sec.edges[0], n);
            d.x < 0.0 && d.y < 0.0
        })
        .unwrap();
    let ray = cp.kawasaki_collapse(n, wide).unwrap();
    assert!((ray.origin - c).norm() < 1e-9);
    let dir = ray.dir.normalize();
    assert!((dir - v(-FRAC_1_SQRT_2, FRAC_1_SQRT_2)).norm() < 1e-9);

    cp.crease_and_stop(ray).unwrap();
    cp.clean();
    let n = cp.graph().nearest_node(c).unwrap();
    assert!(cp.kawasaki(n, 1e-6));
}

#[test]
fn collapse_needs_odd_valence() {
    let mut cp = CreasePattern::new();
    let n = star(&mut cp, v(0.5, 0.5), &[0.0, FRAC_PI_2, PI, 1.5 * PI]);
    let s = cp.graph().junction_of(n).unwrap().sectors[0];
    assert!(cp.kawasaki_collapse(n, s).is_none());
    let bisector = cp.sector_bisector(s).unwrap();
    let d = bisector.dir.normalize();
    assert!((d.x.abs() - FRAC_1_SQRT_2).abs() < 1e-9);
    assert!((d.y.abs() - FRAC_1_SQRT_2).abs() < 1e-9);
}

#[test]
fn rabbit_ear_creases_three_corners() {
    let mut cp = CreasePattern::new();
    cp.crease_points(v(0.0, 0.0), v(1.0, 1.0)).unwrap();
    cp.clean();
    let face = cp.graph().face_at(v(0.75, 0.25)).unwrap();
    let ids = cp.rabbit_ear(face);
    assert_eq!(ids.len(), 3);
    cp.clean();
    assert_eq!(cp.graph().faces().len(), 4);
}

#[test]
fn wiggle_is_reproducible_and_bounded() {
    use Orientation::{Mountain as M, Valley as V};
    let p = v(0.4, 0.55);
    let mut a = cross_pattern(p, [M, M, M, V]);
    let mut b = a.clone();
    let n = a.graph().nearest_node(p).unwrap();
    let rating = a.kawasaki_rating(n).unwrap();
    assert!(rating > 1e-3);

    let cfg = WiggleCfg::default();
    let moved = a.wiggle(&cfg, &mut StdRng::seed_from_u64(7));
    assert_eq!(moved, 1);
    assert_eq!(b.wiggle(&cfg, &mut StdRng::seed_from_u64(7)), 1);

    let pa = a.position(a.graph().nearest_node(p).unwrap()).unwrap();
    let pb = b.position(b.graph().nearest_node(p).unwrap()).unwrap();
    assert_eq!(pa, pb);
    assert!((pa - p).norm() <= rating * cfg.step + 1e-12);
}

#[test]
fn wiggle_leaves_flat_foldable_patterns_alone() {
    let mut cp = CreasePattern::base(Base::Bird).unwrap();
    let log = events(&mut cp);
    assert_eq!(cp.wiggle(&WiggleCfg::default(), &mut StdRng::seed_from_u64(1)), 0);
    assert!(log.borrow().is_empty());
}

#[test]
fn classic_bases_are_flat_foldable() {
    for base in Base::ALL {
        let cp = CreasePattern::base(base).unwrap();
        assert!(cp.is_clean(), "{base}");
        assert!(cp.flat_foldable(), "{base} is not flat-foldable");
        assert!(cp.count(Orientation::Border) >= 4, "{base}");
    }
}

// ---- fold simulation ----

#[test]
fn folding_without_creases_is_identity() {
    let mut cp = CreasePattern::new();
    cp.crease_points(v(0.1, 0.1), v(0.9, 0.4)).unwrap();
    cp.clean();
    let folded = cp.folded(None).unwrap();
    assert_eq!(folded.count(Orientation::Mark), 0);
    for n in folded.graph().nodes() {
        assert!(cp.graph().nodes().iter().any(|m| (m.pos - n.pos).norm() < 1e-12));
    }
}

#[test]
fn folding_a_valley_reflects_the_far_half() {
    let mut cp = CreasePattern::new();
    let id = cp.crease_points(v(0.5, 0.0), v(0.5, 1.0)).unwrap();
    cp.crease_at_mut(id).unwrap().valley();
    cp.clean();
    let left = cp.graph().face_at(v(0.25, 0.5)).unwrap();
    let folded = cp.folded(Some(left)).unwrap();
    assert_eq!(folded.graph().node_count(), cp.graph().node_count());
    for n in folded.graph().nodes() {
        assert!(n.pos.x <= 0.5 + 1e-9 && n.pos.x >= -1e-9);
    }
    // the source is untouched
    assert!(cp.graph().nodes().iter().any(|n| (n.pos.x - 1.0).abs() < 1e-12));
    assert!(matches!(
        cp.folded(Some(FaceId(99))),
        Err(PatternError::UnknownFace(FaceId(99)))
    ));
}

// ---- interchange ----

#[test]
fn fold_round_trip_preserves_vertices_edges_and_orientations() {
    let mut cp = CreasePattern::new();
    let m = cp.crease_points(v(0.0, 0.0), v(1.0, 1.0)).unwrap();
    cp.crease_at_mut(m).unwrap().mountain();
    let vv = cp.crease_points(v(0.0, 1.0), v(1.0, 0.0)).unwrap();
    cp.crease_at_mut(vv).unwrap().valley();
    cp.crease_points(v(0.5, 0.0), v(0.5, 0.25)).unwrap();

    let doc = cp.export_fold();
    let json = doc.to_json().unwrap();
    let back = CreasePattern::from_fold_str(&json).unwrap();

    assert_eq!(back.graph().node_count(), cp.graph().node_count());
    assert_eq!(back.graph().edge_count(), cp.graph().edge_count());
    for o in [
        Orientation::Border,
        Orientation::Mountain,
        Orientation::Valley,
        Orientation::Mark,
    ] {
        assert_eq!(back.count(o), cp.count(o), "{o:?}");
    }
    for n in cp.graph().nodes() {
        assert!(back
            .graph()
            .nodes()
            .iter()
            .any(|m| (m.pos - n.pos).norm() < 1e-9));
    }
    for (_, e) in cp.creases() {
        let (a, b) = (cp.graph().position(e.nodes[0]), cp.graph().position(e.nodes[1]));
        let s = Segment::new(a, b);
        assert!(back.creases().any(|(id, f)| {
            f.data.orientation == e.data.orientation
                && back.segment(id).is_some_and(|t| t.equivalent(&s, 1e-9))
        }));
    }
}

#[test]
fn export_carries_metadata_and_faces() {
    let mut cp = CreasePattern::base(Base::Kite).unwrap();
    let doc = cp.export_fold();
    assert_eq!(doc.file_spec, Some(serde_json::Value::from(1)));
    assert_eq!(doc.file_classes, Some(vec!["singleModel".to_string()]));
    assert_eq!(doc.frame_attributes, Some(vec!["2D".to_string()]));
    assert_eq!(doc.faces_vertices.as_ref().map(Vec::len), Some(4));
    let assignments = doc.edges_assignment.unwrap();
    assert_eq!(assignments.iter().filter(|a| *a == "B").count(), 6);
    assert_eq!(assignments.iter().filter(|a| *a == "V").count(), 1);
    assert_eq!(assignments.iter().filter(|a| *a == "M").count(), 2);
}

#[test]
fn import_validates_before_mutating() {
    let mut cp = CreasePattern::new();
    cp.crease_points(v(0.2, 0.2), v(0.8, 0.7)).unwrap();
    cp.clean();
    let log = events(&mut cp);
    let before = cp.to_fold();

    let missing = FoldFile {
        vertices_coords: Some(vec![vec![0.0, 0.0], vec![1.0, 0.0]]),
        ..FoldFile::default()
    };
    assert!(matches!(
        cp.import_fold(&missing),
        Err(PatternError::MissingField("edges_vertices"))
    ));

    let short = FoldFile {
        vertices_coords: Some(vec![vec![0.0, 0.0], vec![1.0]]),
        edges_vertices: Some(vec![vec![0, 1]]),
        ..FoldFile::default()
    };
    assert!(matches!(
        cp.import_fold(&short),
        Err(PatternError::MalformedVertex(1))
    ));

    assert!(matches!(
        CreasePattern::from_fold_str("{ not json"),
        Err(PatternError::Json(_))
    ));
    assert_eq!(cp.to_fold(), before);
    assert!(log.borrow().is_empty());
}

#[test]
fn import_accepts_3d_and_derives_missing_border() {
    let json = r#"{
        "frame_attributes": ["3D"],
        "vertices_coords": [[0,0,0],[2,0,0],[2,2,0],[0,2,0]],
        "edges_vertices": [[0,2],[1,7]],
        "edges_assignment": ["M","V"]
    }"#;
    let mut cp = CreasePattern::new();
    cp.book_symmetry();
    let log = events(&mut cp);
    cp.import_fold(&FoldFile::from_json(json).unwrap()).unwrap();

    assert_eq!(log.borrow().as_slice(), &[PatternEvent::Imported]);
    assert!(cp.symmetry().is_none());
    assert_eq!(cp.count(Orientation::Mountain), 1);
    assert_eq!(cp.count(Orientation::Valley), 0);
    assert_eq!(cp.count(Orientation::Border), 4);
    assert!(cp.contains(v(1.5, 1.5)));
    assert_eq!(cp.graph().faces().len(), 2);
}

#[test]
fn import_clips_creases_to_the_derived_border() {
    let json = r#"{
        "vertices_coords": [[0,0],[1,0],[1,1],[0,1],[0.5,0.5],[2,0.5],[3,3],[4,3]],
        "edges_vertices": [[0,1],[1,2],[2,3],[3,0],[4,5],[6,7]],
        "edges_assignment": ["B","B","B","B","F","M"],
        "faces_vertices": [[0,1,2,3]]
    }"#;
    let mut cp = CreasePattern::new();
    let log = events(&mut cp);
    cp.import_fold(&FoldFile::from_json(json).unwrap()).unwrap();

    assert_eq!(log.borrow().as_slice(), &[PatternEvent::Imported]);
    assert_eq!(cp.count(Orientation::Mountain), 0);
    assert_eq!(cp.count(Orientation::Mark), 1);
    for n in cp.graph().nodes() {
        assert!(cp.boundary().contains(n.pos, 1e-9), "{:?}", n.pos);
    }
    let (id, _) = cp
        .creases()
        .find(|(_, e)| e.data.orientation == Orientation::Mark)
        .unwrap();
    let s = cp.segment(id).unwrap();
    assert!(s.equivalent(&Segment::new(v(0.5, 0.5), v(1.0, 0.5)), 1e-9));
    assert_eq!(cp.graph().faces().len(), 1);
}

#[test]
fn unknown_assignments_read_as_marks() {
    assert_eq!(Orientation::from_assignment("U"), Orientation::Mark);
    assert_eq!(Orientation::from_assignment("F"), Orientation::Mark);
    assert_eq!(Orientation::from_assignment("V"), Orientation::Valley);
    assert_eq!(Orientation::Mark.assignment(), "F");
    assert_eq!("Bird".parse::<Base>().unwrap(), Base::Bird);
    assert!("crane".parse::<Base>().is_err());
}

#[test]
fn clone_does_not_carry_observers() {
    let mut cp = CreasePattern::new();
    let log = events(&mut cp);
    let mut copy = cp.clone();
    copy.crease_points(v(0.1, 0.1), v(0.9, 0.9)).unwrap();
    assert!(log.borrow().is_empty());
    assert_eq!(cp.count(Orientation::Mark), 0);
}

mod properties {
    use std::f64::consts::PI;

    use proptest::prelude::*;

    use super::{polar, star, v};
    use crate::geom2::{cross, Line};
    use crate::pattern::{CreasePattern, Orientation, Provenance};

proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn line_crease_spans_the_boundary(
            sides in 3usize..9,
            r in 0.0f64..0.4,
            phi in 0.0f64..6.28,
            th in 0.0f64..3.14,
        ) {
            let mut cp = CreasePattern::new();
            cp.regular_polygon(sides).unwrap();
            let before = cp.count(Orientation::Mark);
            let id = cp.crease(Line::new(polar(v(0.0, 0.0), r, phi), polar(v(0.0, 0.0), 1.0, th)));
            let id = id.expect("line through the interior has a chord");
            prop_assert_eq!(cp.count(Orientation::Mark), before + 1);
            let s = cp.segment(id).unwrap();
            prop_assert!(cp.boundary().lies_on_edge(s.a, 1e-7));
            prop_assert!(cp.boundary().lies_on_edge(s.b, 1e-7));
        }

        #[test]
        fn axiom1_crease_is_colinear(
            px in 0.05f64..0.95, py in 0.05f64..0.95,
            qx in 0.05f64..0.95, qy in 0.05f64..0.95,
        ) {
            let (p, q) = (v(px, py), v(qx, qy));
            prop_assume!((q - p).norm() > 1e-3);
            let mut cp = CreasePattern::new();
            let id = cp.crease_through_points(p, q).unwrap();
            let s = cp.segment(id).unwrap();
            prop_assert!(cross(s.vector().normalize(), (q - p).normalize()).abs() < 1e-9);
            prop_assert!(s.infinite_line().distance_to(p) < 1e-9);
            prop_assert_eq!(cp.crease_at(id).unwrap().provenance.as_ref().map(Provenance::axiom), Some(1));
        }

        #[test]
        fn axiom2_crease_is_equidistant(
            px in 0.05f64..0.95, py in 0.05f64..0.95,
            qx in 0.05f64..0.95, qy in 0.05f64..0.95,
        ) {
            let (p, q) = (v(px, py), v(qx, qy));
            prop_assume!((q - p).norm() > 1e-3);
            let mut cp = CreasePattern::new();
            let id = cp.crease_point_to_point(p, q).unwrap();
            let s = cp.segment(id).unwrap();
            for i in 0..=10 {
                let x = s.a + s.vector() * (i as f64 / 10.0);
                prop_assert!(((x - p).norm() - (x - q).norm()).abs() < 1e-9);
            }
        }

        #[test]
        fn four_sector_kawasaki_law(
            a in 0.3f64..2.8,
            b in 0.3f64..2.8,
            skew in prop_oneof![Just(0.0), 0.01f64..0.1],
            turn in 0.0f64..6.28,
        ) {
            // sectors a, b, π − a + skew, π − b − skew (counter-clockwise)
            let c = PI - a + skew;
            let angles = [turn, turn + a, turn + a + b, turn + a + b + c];
            let mut cp = CreasePattern::new();
            let n = star(&mut cp, v(0.5, 0.5), &angles);
            prop_assert_eq!(cp.graph().junction_of(n).unwrap().sectors.len(), 4);
            prop_assert_eq!(cp.kawasaki(n, 1e-4), skew == 0.0);
        }
    }
}
