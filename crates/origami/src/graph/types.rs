//! Arena types for the planar graph.
//!
//! Kept small and explicit so that `clean` and `query` stay easy to read.

use nalgebra::Vector2;

/// Identifier types for clarity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub usize);
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FaceId(pub usize);
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SectorId(pub usize);
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JunctionId(pub usize);

/// Edge payload carried through splits and merges.
pub trait EdgeData: Clone {
    /// When two edges collapse onto the same node pair, the higher value survives.
    fn precedence(&self) -> u8 {
        0
    }
}

impl EdgeData for () {}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub pos: Vector2<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Edge<E> {
    pub nodes: [NodeId; 2],
    pub data: E,
}

impl<E> Edge<E> {
    /// The endpoint opposite `n` (or `nodes[0]` if `n` is not an endpoint).
    #[inline]
    pub fn other(&self, n: NodeId) -> NodeId {
        if self.nodes[0] == n {
            self.nodes[1]
        } else {
            self.nodes[0]
        }
    }
    #[inline]
    pub fn touches(&self, n: NodeId) -> bool {
        self.nodes[0] == n || self.nodes[1] == n
    }
}

/// Bounded region: CCW node cycle and the edges between consecutive nodes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Face {
    pub nodes: Vec<NodeId>,
    pub edges: Vec<EdgeId>,
}

/// Wedge at `origin` swept clockwise from `edges[0]` to `edges[1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sector {
    pub origin: NodeId,
    pub edges: [EdgeId; 2],
}

/// Incident edges at one node, clockwise, with the sectors between them.
///
/// `sectors[k]` spans `edges[k] → edges[k+1]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Junction {
    pub origin: NodeId,
    pub edges: Vec<EdgeId>,
    pub sectors: Vec<SectorId>,
}

/// Counts reported by one clean pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CleanReport {
    pub merged_nodes: usize,
    pub split_edges: usize,
    pub removed_edges: usize,
}
