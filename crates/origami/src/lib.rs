//! Origami crease-pattern kernel.
//!
//! A crease pattern is a planar graph of creases on a convex sheet. The crate
//! layers, bottom-up:
//! - `geom2`: vector/line/ray/segment algebra, affine maps, intersections.
//! - `boundary`: the convex sheet outline and chord clipping.
//! - `graph`: arena planar graph with the clean pass (merge, split, dedupe)
//!   and derived faces, sectors and junctions.
//! - `axioms`: pure Huzita–Justin single-fold constructions.
//! - `pattern`: `CreasePattern`, the unit of mutation (construction API,
//!   symmetry, pleats, flat-foldability, fold simulation).
//! - `io`: FOLD documents, SVG output and classic base fixtures.
//!
//! API Policy
//! - Project-internal; breaking changes are fine when they improve the design.

pub mod axioms;
pub mod boundary;
pub mod error;
pub mod geom2;
pub mod graph;
pub mod io;
pub mod pattern;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use boundary::{ConvexPolygon, Rect};
pub use error::{PatternError, Result};
pub use geom2::GeomCfg;
pub use io::{Base, FoldFile, SvgCfg};
pub use nalgebra::Vector2 as Vec2;
pub use pattern::{Crease, CreasePattern, Orientation, PatternEvent, Provenance, WiggleCfg};

/// Common exports for callers building patterns.
pub mod prelude {
    pub use crate::geom2::{GeomCfg, Line, Ray, Segment};
    pub use crate::graph::{EdgeId, FaceId, NodeId, SectorId};
    pub use crate::io::{Base, FoldFile, SvgCfg};
    pub use crate::pattern::{
        Crease, CreaseInput, CreasePattern, Orientation, PatternEvent, WiggleCfg,
    };
    pub use nalgebra::Vector2 as Vec2;
}
