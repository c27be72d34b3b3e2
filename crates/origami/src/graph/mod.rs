//! Planar straight-line graph stored in index arenas.
//!
//! Purpose
//! - Own nodes and edges (with a generic payload) and derive faces, sectors
//!   and junctions from them in one consistency pass (`clean`).
//! - Entities reference each other by `usize` newtype ids; there are no
//!   back-references to the owning graph.
//!
//! Invariants
//! - Derived state (`faces`, `sectors`, `junctions`) is valid only while
//!   `is_clean()` holds. Adding or removing nodes/edges clears the flag.
//! - Ids may be renumbered by `clean` and by removals.
//!
//! Note
//! - Node positions may be edited in place (`set_position`) without clearing
//!   the flag: topology stays valid and angles are always computed live.

mod clean;
mod query;
mod types;

use std::f64::consts::TAU;

use nalgebra::Vector2;

use crate::geom2::Segment;

pub use types::{
    CleanReport, Edge, EdgeData, EdgeId, Face, FaceId, Junction, JunctionId, Node, NodeId, Sector,
    SectorId,
};

#[derive(Clone, Debug)]
pub struct PlanarGraph<E> {
    nodes: Vec<Node>,
    edges: Vec<Edge<E>>,
    faces: Vec<Face>,
    sectors: Vec<Sector>,
    junctions: Vec<Junction>,
    node_junction: Vec<Option<JunctionId>>,
    clean: bool,
}

impl<E> Default for PlanarGraph<E> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            faces: Vec::new(),
            sectors: Vec::new(),
            junctions: Vec::new(),
            node_junction: Vec::new(),
            clean: true,
        }
    }
}

impl<E: EdgeData> PlanarGraph<E> {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_clean(&self) -> bool {
        self.clean
    }

    fn touch(&mut self) {
        self.clean = false;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn add_node(&mut self, pos: Vector2<f64>) -> NodeId {
        self.touch();
        self.nodes.push(Node { pos });
        NodeId(self.nodes.len() - 1)
    }

    /// Edge between existing nodes; `None` if either id is out of range.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId, data: E) -> Option<EdgeId> {
        if a.0 >= self.nodes.len() || b.0 >= self.nodes.len() {
            return None;
        }
        self.touch();
        self.edges.push(Edge {
            nodes: [a, b],
            data,
        });
        Some(EdgeId(self.edges.len() - 1))
    }

    /// Edge between two fresh nodes; coincident nodes are merged by `clean`.
    pub fn add_segment(&mut self, seg: &Segment, data: E) -> EdgeId {
        let a = self.add_node(seg.a);
        let b = self.add_node(seg.b);
        self.touch();
        self.edges.push(Edge {
            nodes: [a, b],
            data,
        });
        EdgeId(self.edges.len() - 1)
    }

    /// Keep only edges matching `keep`; returns how many were removed.
    pub fn retain_edges<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&Edge<E>) -> bool,
    {
        let before = self.edges.len();
        self.edges.retain(|e| keep(e));
        let removed = before - self.edges.len();
        if removed > 0 {
            self.touch();
        }
        removed
    }

    /// Drop nodes without incident edges (renumbers nodes).
    pub fn remove_isolated_nodes(&mut self) -> usize {
        let mut used = vec![false; self.nodes.len()];
        for e in &self.edges {
            used[e.nodes[0].0] = true;
            used[e.nodes[1].0] = true;
        }
        let removed = used.iter().filter(|u| !**u).count();
        if removed > 0 {
            let keep: Vec<Option<usize>> = {
                let mut next = 0;
                used.iter()
                    .map(|&u| {
                        u.then(|| {
                            next += 1;
                            next - 1
                        })
                    })
                    .collect()
            };
            self.compact_nodes(&keep);
        }
        removed
    }

    /// Renumber nodes by `map[old] = Some(new)`; edges must not reference dropped nodes.
    fn compact_nodes(&mut self, map: &[Option<usize>]) {
        let old = std::mem::take(&mut self.nodes);
        self.nodes = old
            .into_iter()
            .zip(map)
            .filter_map(|(n, m)| m.map(|_| n))
            .collect();
        for e in &mut self.edges {
            for k in 0..2 {
                if let Some(i) = map[e.nodes[k].0] {
                    e.nodes[k] = NodeId(i);
                }
            }
        }
        self.touch();
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }
    #[inline]
    pub fn edges(&self) -> &[Edge<E>] {
        &self.edges
    }
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }
    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> {
        (0..self.edges.len()).map(EdgeId)
    }
    #[inline]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }
    #[inline]
    pub fn edge(&self, id: EdgeId) -> Option<&Edge<E>> {
        self.edges.get(id.0)
    }
    #[inline]
    pub fn edge_mut(&mut self, id: EdgeId) -> Option<&mut Edge<E>> {
        self.edges.get_mut(id.0)
    }
    #[inline]
    pub fn position(&self, id: NodeId) -> Vector2<f64> {
        self.nodes[id.0].pos
    }
    /// Move a node without invalidating topology (see module note).
    pub fn set_position(&mut self, id: NodeId, pos: Vector2<f64>) {
        if let Some(n) = self.nodes.get_mut(id.0) {
            n.pos = pos;
        }
    }

    pub fn segment(&self, id: EdgeId) -> Option<Segment> {
        let e = self.edges.get(id.0)?;
        Some(Segment::new(
            self.nodes[e.nodes[0].0].pos,
            self.nodes[e.nodes[1].0].pos,
        ))
    }

    /// Vector from `from` along edge `id` to its other endpoint.
    pub fn edge_vector_from(&self, id: EdgeId, from: NodeId) -> Vector2<f64> {
        let e = &self.edges[id.0];
        self.position(e.other(from)) - self.position(from)
    }

    /// Edge joining `a` and `b`, in either direction.
    pub fn edge_between(&self, a: NodeId, b: NodeId) -> Option<EdgeId> {
        self.edges
            .iter()
            .position(|e| e.touches(a) && e.other(a) == b && a != b)
            .map(EdgeId)
    }

    // ---- derived state (valid after `clean`) ----

    #[inline]
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }
    #[inline]
    pub fn sectors(&self) -> &[Sector] {
        &self.sectors
    }
    #[inline]
    pub fn junctions(&self) -> &[Junction] {
        &self.junctions
    }
    #[inline]
    pub fn face(&self, id: FaceId) -> Option<&Face> {
        self.faces.get(id.0)
    }
    #[inline]
    pub fn sector(&self, id: SectorId) -> Option<&Sector> {
        self.sectors.get(id.0)
    }
    pub fn junction_of(&self, n: NodeId) -> Option<&Junction> {
        let j = (*self.node_junction.get(n.0)?)?;
        self.junctions.get(j.0)
    }

    /// Replace derived faces (import path); ids must reference current edges.
    pub fn set_faces(&mut self, faces: Vec<Face>) {
        self.faces = faces;
    }

    /// Clockwise angle from `edges[0]` to `edges[1]`, from current positions.
    pub fn sector_angle(&self, s: &Sector) -> f64 {
        if s.edges[0] == s.edges[1] {
            return TAU;
        }
        let v0 = self.edge_vector_from(s.edges[0], s.origin);
        let v1 = self.edge_vector_from(s.edges[1], s.origin);
        let a = (v0.y.atan2(v0.x) - v1.y.atan2(v1.x)).rem_euclid(TAU);
        if a == 0.0 {
            TAU
        } else {
            a
        }
    }

    /// Does direction `dir` from the sector origin fall strictly inside the wedge?
    pub fn sector_contains_direction(&self, s: &Sector, dir: Vector2<f64>) -> bool {
        let v0 = self.edge_vector_from(s.edges[0], s.origin);
        let a = (v0.y.atan2(v0.x) - dir.y.atan2(dir.x)).rem_euclid(TAU);
        a > 0.0 && a < self.sector_angle(s)
    }

    /// Nodes joined to `n` by an edge.
    pub fn adjacent_nodes(&self, n: NodeId) -> Vec<NodeId> {
        self.edges
            .iter()
            .filter(|e| e.touches(n) && e.nodes[0] != e.nodes[1])
            .map(|e| e.other(n))
            .collect()
    }
}

#[cfg(test)]
mod tests;
