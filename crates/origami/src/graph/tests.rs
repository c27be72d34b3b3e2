use super::*;
use crate::geom2::{GeomCfg, Segment};
use nalgebra::vector;
use std::f64::consts::{FRAC_PI_2, PI, TAU};

#[derive(Clone, Debug, PartialEq)]
struct W(u8);

impl EdgeData for W {
    fn precedence(&self) -> u8 {
        self.0
    }
}

fn unit_square(g: &mut PlanarGraph<W>) {
    let c = [
        vector![0.0, 0.0],
        vector![1.0, 0.0],
        vector![1.0, 1.0],
        vector![0.0, 1.0],
    ];
    for i in 0..4 {
        g.add_segment(&Segment::new(c[i], c[(i + 1) % 4]), W(3));
    }
}

#[test]
fn square_merges_corners_into_one_face() {
    let mut g = PlanarGraph::new();
    unit_square(&mut g);
    assert!(!g.is_clean());
    let report = g.clean(&GeomCfg::default());
    assert!(g.is_clean());
    assert_eq!(report.merged_nodes, 4);
    assert_eq!(g.node_count(), 4);
    assert_eq!(g.edge_count(), 4);
    assert_eq!(g.faces().len(), 1);
    assert_eq!(g.faces()[0].nodes.len(), 4);
}

#[test]
fn crossing_diagonals_split_into_four_faces() {
    let mut g = PlanarGraph::new();
    unit_square(&mut g);
    g.add_segment(&Segment::new(vector![0.0, 0.0], vector![1.0, 1.0]), W(1));
    g.add_segment(&Segment::new(vector![1.0, 0.0], vector![0.0, 1.0]), W(1));
    let report = g.clean(&GeomCfg::default());
    assert_eq!(report.split_edges, 2);
    assert_eq!(g.node_count(), 5);
    assert_eq!(g.edge_count(), 8);
    assert_eq!(g.faces().len(), 4);

    let center = g.nearest_node(vector![0.5, 0.5]).unwrap();
    assert!((g.position(center) - vector![0.5, 0.5]).norm() < 1e-12);
    let j = g.junction_of(center).unwrap();
    assert_eq!(j.edges.len(), 4);
    for s in &j.sectors {
        let a = g.sector_angle(g.sector(*s).unwrap());
        assert!((a - FRAC_PI_2).abs() < 1e-12);
    }
    // split pieces keep their payload
    let marks = g.edges().iter().filter(|e| e.data == W(1)).count();
    assert_eq!(marks, 4);
}

#[test]
fn faces_are_counter_clockwise() {
    let mut g = PlanarGraph::new();
    unit_square(&mut g);
    g.add_segment(&Segment::new(vector![0.0, 0.0], vector![1.0, 1.0]), W(1));
    g.clean(&GeomCfg::default());
    assert_eq!(g.faces().len(), 2);
    for f in 0..g.faces().len() {
        let poly = g.face_polygon(FaceId(f)).unwrap();
        assert!(crate::geom2::signed_area(&poly) > 0.0);
        assert_eq!(poly.len(), 3);
    }
}

#[test]
fn t_junction_splits_the_through_edge() {
    let mut g = PlanarGraph::new();
    unit_square(&mut g);
    // ends on the bottom edge interior
    g.add_segment(&Segment::new(vector![0.5, 1.0], vector![0.5, 0.0]), W(1));
    g.clean(&GeomCfg::default());
    assert_eq!(g.node_count(), 6);
    assert_eq!(g.edge_count(), 7);
    assert_eq!(g.faces().len(), 2);
}

#[test]
fn duplicate_edges_keep_the_higher_precedence() {
    let mut g = PlanarGraph::new();
    let seg = Segment::new(vector![0.0, 0.0], vector![1.0, 0.0]);
    g.add_segment(&seg, W(1));
    g.add_segment(&seg, W(2));
    g.add_segment(&Segment::new(seg.b, seg.a), W(0));
    let report = g.clean(&GeomCfg::default());
    assert_eq!(report.removed_edges, 2);
    assert_eq!(g.edge_count(), 1);
    assert_eq!(g.edges()[0].data, W(2));
}

#[test]
fn overlapping_colinear_edges_are_fragmented() {
    let mut g = PlanarGraph::new();
    g.add_segment(&Segment::new(vector![0.0, 0.0], vector![2.0, 0.0]), W(1));
    g.add_segment(&Segment::new(vector![1.0, 0.0], vector![3.0, 0.0]), W(1));
    g.clean(&GeomCfg::default());
    assert_eq!(g.node_count(), 4);
    assert_eq!(g.edge_count(), 3);
}

#[test]
fn near_nodes_merge_and_zero_length_edges_vanish() {
    let cfg = GeomCfg::default();
    let mut g = PlanarGraph::new();
    g.add_segment(&Segment::new(vector![0.0, 0.0], vector![1e-10, 0.0]), W(1));
    g.add_segment(&Segment::new(vector![1e-10, 0.0], vector![1.0, 0.0]), W(1));
    let report = g.clean(&cfg);
    assert_eq!(g.node_count(), 2);
    assert_eq!(g.edge_count(), 1);
    assert_eq!(report.removed_edges, 1);
    // the first-added position survives
    assert_eq!(g.position(NodeId(0)), vector![0.0, 0.0]);
}

#[test]
fn lone_edge_end_has_full_turn_sector() {
    let mut g = PlanarGraph::new();
    g.add_segment(&Segment::new(vector![0.0, 0.0], vector![1.0, 0.0]), W(1));
    g.clean(&GeomCfg::default());
    assert!(g.faces().is_empty());
    let j = g.junction_of(NodeId(0)).unwrap();
    assert_eq!(j.sectors.len(), 1);
    let s = g.sector(j.sectors[0]).unwrap();
    assert!((g.sector_angle(s) - TAU).abs() < 1e-12);
}

#[test]
fn sectors_are_clockwise_and_sum_to_full_turn() {
    let mut g = PlanarGraph::new();
    let o = vector![0.0, 0.0];
    for d in [vector![1.0, 0.0], vector![0.0, 1.0], vector![-1.0, -1.0]] {
        g.add_segment(&Segment::new(o, d), W(1));
    }
    g.clean(&GeomCfg::default());
    let j = g.junction_of(NodeId(0)).unwrap();
    let angles: Vec<f64> = j
        .sectors
        .iter()
        .map(|s| g.sector_angle(g.sector(*s).unwrap()))
        .collect();
    assert!((angles.iter().sum::<f64>() - TAU).abs() < 1e-12);
    // first edge is the one with the largest polar angle (pointing at (-1,-1) is -3π/4)
    let first = g.edge_vector_from(j.edges[0], NodeId(0));
    assert!((first.y.atan2(first.x) - FRAC_PI_2).abs() < 1e-12);
    assert!((angles[0] - FRAC_PI_2).abs() < 1e-12);
    assert!((angles[1] - 3.0 * PI / 4.0).abs() < 1e-12);
}

#[test]
fn isolated_nodes_are_removed_and_renumbered() {
    let mut g: PlanarGraph<W> = PlanarGraph::new();
    g.add_node(vector![5.0, 5.0]);
    let a = g.add_node(vector![0.0, 0.0]);
    let b = g.add_node(vector![1.0, 0.0]);
    g.add_edge(a, b, W(1)).unwrap();
    assert_eq!(g.remove_isolated_nodes(), 1);
    assert_eq!(g.node_count(), 2);
    assert_eq!(g.edges()[0].nodes, [NodeId(0), NodeId(1)]);
    assert!(g.add_edge(NodeId(0), NodeId(7), W(0)).is_none());
}

#[test]
fn face_lookup_and_adjacency() {
    let mut g = PlanarGraph::new();
    unit_square(&mut g);
    g.add_segment(&Segment::new(vector![0.0, 0.0], vector![1.0, 1.0]), W(1));
    g.clean(&GeomCfg::default());
    let below = g.face_at(vector![0.8, 0.2]).unwrap();
    let above = g.face_at(vector![0.2, 0.8]).unwrap();
    assert_ne!(below, above);
    let ef = g.edge_faces();
    let n = g.face_neighbors(below, &ef);
    assert_eq!(n.len(), 1);
    assert_eq!(n[0].0, above);
    let shared = g.segment(n[0].1).unwrap();
    assert!(shared.equivalent(
        &Segment::new(vector![0.0, 0.0], vector![1.0, 1.0]),
        1e-12
    ));
}
