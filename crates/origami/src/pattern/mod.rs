//! Crease pattern: a planar graph of creases on a convex sheet.
//!
//! Purpose
//! - Own the sheet boundary, the crease graph, the optional symmetry line and
//!   the change observers; every mutation goes through this type.
//! - Creases are graph edges carrying a `Crease` payload (orientation plus an
//!   optional provenance record).
//!
//! Submodules
//! - `construct`: clip-and-commit entry points, symmetry mirroring, bounce creasing.
//! - `axioms`: committed Huzita–Justin folds and the non-mutating enumerators.
//! - `pleat`: angular/strip subdivision between two creases.
//! - `foldable`: Kawasaki/Maekawa tests, ratings, collapse solutions, `wiggle`.
//! - `fold`: fold simulation over the face-adjacency tree.
//!
//! Invariants
//! - The boundary is convex and mirrored by `Border` creases in the graph.
//! - Derived faces/sectors/junctions are trusted only after `clean()`.
//!   Mutations leave the pattern unclean unless documented otherwise.
//! - `Clone` is a deep copy; observers are not carried over.

mod axioms;
mod construct;
mod fold;
mod foldable;
mod pleat;

use std::cmp::Ordering;
use std::fmt;

use nalgebra::Vector2;

use crate::boundary::{ConvexPolygon, Rect};
use crate::error::Result;
use crate::geom2::{GeomCfg, Line, Segment};
use crate::graph::{CleanReport, Edge, EdgeData, EdgeId, NodeId, PlanarGraph};

pub use axioms::CandidateCrease;
pub use construct::CreaseInput;
pub use foldable::{KawasakiGroup, WiggleCfg};

/// Fold direction of a crease.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Orientation {
    Mark,
    Border,
    Mountain,
    Valley,
}

impl Orientation {
    /// FOLD `edges_assignment` letter (marks export as flat, `F`).
    pub fn assignment(self) -> &'static str {
        match self {
            Orientation::Border => "B",
            Orientation::Mountain => "M",
            Orientation::Valley => "V",
            Orientation::Mark => "F",
        }
    }

    /// Inverse of `assignment`; `U` and unknown letters read as marks.
    pub fn from_assignment(code: &str) -> Self {
        match code {
            "B" | "b" => Orientation::Border,
            "M" | "m" => Orientation::Mountain,
            "V" | "v" => Orientation::Valley,
            _ => Orientation::Mark,
        }
    }
}

/// The construction that produced a crease.
#[derive(Clone, Debug, PartialEq)]
pub enum Provenance {
    ThroughPoints {
        a: Vector2<f64>,
        b: Vector2<f64>,
    },
    PointToPoint {
        a: Vector2<f64>,
        b: Vector2<f64>,
    },
    EdgeToEdge {
        a: Segment,
        b: Segment,
    },
    PerpendicularThroughPoint {
        line: Segment,
        point: Vector2<f64>,
    },
    PointToLine {
        pivot: Vector2<f64>,
        point: Vector2<f64>,
        line: Segment,
    },
    PerpendicularPointOntoLine {
        point: Vector2<f64>,
        onto: Segment,
        perp: Segment,
    },
}

impl Provenance {
    /// Huzita–Justin axiom number.
    pub fn axiom(&self) -> u8 {
        match self {
            Provenance::ThroughPoints { .. } => 1,
            Provenance::PointToPoint { .. } => 2,
            Provenance::EdgeToEdge { .. } => 3,
            Provenance::PerpendicularThroughPoint { .. } => 4,
            Provenance::PointToLine { .. } => 5,
            Provenance::PerpendicularPointOntoLine { .. } => 7,
        }
    }
}

/// Edge payload of the crease graph.
#[derive(Clone, Debug, PartialEq)]
pub struct Crease {
    pub orientation: Orientation,
    pub provenance: Option<Provenance>,
}

impl Crease {
    pub fn new(orientation: Orientation) -> Self {
        Self {
            orientation,
            provenance: None,
        }
    }
    pub fn mark(&mut self) -> &mut Self {
        self.orientation = Orientation::Mark;
        self
    }
    pub fn mountain(&mut self) -> &mut Self {
        self.orientation = Orientation::Mountain;
        self
    }
    pub fn valley(&mut self) -> &mut Self {
        self.orientation = Orientation::Valley;
        self
    }
    pub fn border(&mut self) -> &mut Self {
        self.orientation = Orientation::Border;
        self
    }
}

impl EdgeData for Crease {
    fn precedence(&self) -> u8 {
        match self.orientation {
            Orientation::Border => 3,
            Orientation::Mountain | Orientation::Valley => 2,
            Orientation::Mark => 1,
        }
    }
}

/// Change notification delivered synchronously to observers.
#[derive(Clone, Debug, PartialEq)]
pub enum PatternEvent {
    /// New creases were committed (mirror images included).
    Creased { edges: Vec<EdgeId> },
    BoundaryChanged,
    Imported,
    NodesMoved { count: usize },
}

type Observer = Box<dyn FnMut(&PatternEvent)>;

#[derive(Default)]
struct Observers(Vec<Observer>);

impl Clone for Observers {
    fn clone(&self) -> Self {
        Self::default()
    }
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Observers({})", self.0.len())
    }
}

#[derive(Clone, Debug)]
pub struct CreasePattern {
    graph: PlanarGraph<Crease>,
    boundary: ConvexPolygon,
    symmetry: Option<Line>,
    cfg: GeomCfg,
    observers: Observers,
}

impl Default for CreasePattern {
    fn default() -> Self {
        Self::new()
    }
}

impl CreasePattern {
    /// Unit-square sheet with default tolerances.
    pub fn new() -> Self {
        Self::with_cfg(GeomCfg::default())
    }

    pub fn with_cfg(cfg: GeomCfg) -> Self {
        let mut cp = Self {
            graph: PlanarGraph::new(),
            boundary: ConvexPolygon::default(),
            symmetry: None,
            cfg,
            observers: Observers::default(),
        };
        cp.install_boundary(ConvexPolygon::unit_square());
        cp
    }

    // ---- accessors ----

    #[inline]
    pub fn cfg(&self) -> &GeomCfg {
        &self.cfg
    }
    #[inline]
    pub fn graph(&self) -> &PlanarGraph<Crease> {
        &self.graph
    }
    #[inline]
    pub fn boundary(&self) -> &ConvexPolygon {
        &self.boundary
    }
    #[inline]
    pub fn symmetry(&self) -> Option<&Line> {
        self.symmetry.as_ref()
    }
    #[inline]
    pub fn is_clean(&self) -> bool {
        self.graph.is_clean()
    }
    pub fn creases(&self) -> impl Iterator<Item = (EdgeId, &Edge<Crease>)> {
        self.graph
            .edges()
            .iter()
            .enumerate()
            .map(|(i, e)| (EdgeId(i), e))
    }
    pub fn crease_at(&self, id: EdgeId) -> Option<&Crease> {
        self.graph.edge(id).map(|e| &e.data)
    }
    /// Payload access for re-orienting a crease (`cp.crease_at_mut(id)?.valley()`).
    pub fn crease_at_mut(&mut self, id: EdgeId) -> Option<&mut Crease> {
        self.graph.edge_mut(id).map(|e| &mut e.data)
    }
    pub fn segment(&self, id: EdgeId) -> Option<Segment> {
        self.graph.segment(id)
    }
    pub fn position(&self, id: NodeId) -> Option<Vector2<f64>> {
        self.graph.node(id).map(|n| n.pos)
    }
    /// Count of creases with the given orientation.
    pub fn count(&self, orientation: Orientation) -> usize {
        self.graph
            .edges()
            .iter()
            .filter(|e| e.data.orientation == orientation)
            .count()
    }

    /// Run the consistency pass.
    pub fn clean(&mut self) -> CleanReport {
        self.graph.clean(&self.cfg)
    }

    pub fn contains(&self, p: Vector2<f64>) -> bool {
        self.boundary.contains(p, self.cfg.eps)
    }

    /// Smallest axis-aligned rectangle around every node.
    pub fn bounds(&self) -> Option<Rect> {
        Rect::around(self.graph.nodes().iter().map(|n| &n.pos))
    }

    // ---- observers ----

    /// Register a callback run synchronously after every committed change.
    pub fn subscribe<F>(&mut self, f: F)
    where
        F: FnMut(&PatternEvent) + 'static,
    {
        self.observers.0.push(Box::new(f));
    }

    pub(crate) fn notify(&mut self, event: PatternEvent) {
        for obs in &mut self.observers.0 {
            obs(&event);
        }
    }

    pub(crate) fn graph_mut(&mut self) -> &mut PlanarGraph<Crease> {
        &mut self.graph
    }

    /// Replace everything with `points` and `edges` on the sheet `poly`.
    ///
    /// Edge endpoints index into `points` and must be in range. With
    /// `add_border` the outline is inserted as border creases as well.
    pub(crate) fn rebuild_from(
        &mut self,
        poly: ConvexPolygon,
        points: &[Vector2<f64>],
        edges: &[(usize, usize, Orientation)],
        add_border: bool,
    ) {
        self.graph.clear();
        self.symmetry = None;
        let ids: Vec<NodeId> = points.iter().map(|p| self.graph.add_node(*p)).collect();
        for &(a, b, o) in edges {
            self.graph.add_edge(ids[a], ids[b], Crease::new(o));
        }
        if add_border {
            for seg in poly.edges() {
                self.graph.add_segment(&seg, Crease::new(Orientation::Border));
            }
        }
        self.boundary = poly;
    }

    // ---- boundary ----

    /// Replace the sheet outline.
    ///
    /// `sorted` points are taken in order (either winding, a repeated closing
    /// point is dropped) and must be convex; otherwise their convex hull is
    /// used. Border creases are rebuilt and the pattern is cleaned.
    pub fn set_boundary(&mut self, points: &[Vector2<f64>], sorted: bool) -> Result<()> {
        let poly = if sorted {
            ConvexPolygon::from_sorted(points, self.cfg.eps_merge)?
        } else {
            ConvexPolygon::from_points(points, self.cfg.eps_merge)?
        };
        self.install_boundary(poly);
        self.notify(PatternEvent::BoundaryChanged);
        Ok(())
    }

    pub fn square(&mut self, width: f64) -> Result<()> {
        self.rectangle(width, width)
    }

    pub fn rectangle(&mut self, width: f64, height: f64) -> Result<()> {
        let poly = ConvexPolygon::rectangle(width, height)?;
        self.install_boundary(poly);
        self.notify(PatternEvent::BoundaryChanged);
        Ok(())
    }

    /// Regular polygon with unit circumradius about the origin.
    pub fn regular_polygon(&mut self, sides: usize) -> Result<()> {
        let poly = ConvexPolygon::regular(sides)?;
        self.install_boundary(poly);
        self.notify(PatternEvent::BoundaryChanged);
        Ok(())
    }

    /// Shrink-wrap the sheet to the bounding rectangle of all nodes.
    pub fn set_minimum_rect_boundary(&mut self) -> Result<()> {
        let r = self.bounds().ok_or_else(|| {
            crate::error::PatternError::InvalidBoundary("pattern has no nodes".to_string())
        })?;
        let corners = [
            r.min,
            Vector2::new(r.max.x, r.min.y),
            r.max,
            Vector2::new(r.min.x, r.max.y),
        ];
        self.set_boundary(&corners, true)
    }

    /// Swap the outline: drop border creases and now-isolated nodes, insert the
    /// new border, clean.
    fn install_boundary(&mut self, poly: ConvexPolygon) {
        self.graph
            .retain_edges(|e| e.data.orientation != Orientation::Border);
        self.graph.remove_isolated_nodes();
        for seg in poly.edges() {
            self.graph
                .add_segment(&seg, Crease::new(Orientation::Border));
        }
        self.boundary = poly;
        self.clean();
    }

    // ---- border queries ----

    /// Border crease whose midpoint minimises `key`; the first one on ties.
    fn border_extreme(&self, key: impl Fn(Vector2<f64>) -> f64) -> Option<EdgeId> {
        self.creases()
            .filter(|(_, e)| e.data.orientation == Orientation::Border)
            .filter_map(|(id, _)| self.segment(id).map(|s| (id, key(s.midpoint()))))
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal))
            .map(|(id, _)| id)
    }

    /// Border crease lowest on the page (y grows downwards).
    pub fn bottom_edge(&self) -> Option<EdgeId> {
        self.border_extreme(|m| -m.y)
    }

    pub fn top_edge(&self) -> Option<EdgeId> {
        self.border_extreme(|m| m.y)
    }

    pub fn left_edge(&self) -> Option<EdgeId> {
        self.border_extreme(|m| m.x)
    }

    pub fn right_edge(&self) -> Option<EdgeId> {
        self.border_extreme(|m| -m.x)
    }

    // ---- symmetry ----

    pub fn no_symmetry(&mut self) {
        self.symmetry = None;
    }

    /// Vertical mirror line through the sheet center.
    pub fn book_symmetry(&mut self) {
        self.symmetry = Some(Line::new(self.boundary.center(), Vector2::new(0.0, 1.0)));
    }

    /// 45° mirror line through the sheet center.
    pub fn diagonal_symmetry(&mut self) {
        let d = std::f64::consts::FRAC_1_SQRT_2;
        self.symmetry = Some(Line::new(self.boundary.center(), Vector2::new(d, d)));
    }

    /// Mirror every later crease about `line`; a zero direction clears symmetry.
    pub fn set_symmetry_line(&mut self, line: Line) {
        self.symmetry = (line.dir.norm() > self.cfg.eps).then_some(line);
    }

    // ---- removal ----

    /// Delete every mark crease and clean.
    pub fn remove_all_marks(&mut self) -> usize {
        let removed = self
            .graph
            .retain_edges(|e| e.data.orientation != Orientation::Mark);
        self.graph.remove_isolated_nodes();
        self.clean();
        removed
    }

    /// Remove all creases and the symmetry line, keeping the sheet outline.
    pub fn clear(&mut self) {
        self.graph.clear();
        self.symmetry = None;
        let poly = std::mem::take(&mut self.boundary);
        self.install_boundary(poly);
    }
}

#[cfg(test)]
mod tests;
