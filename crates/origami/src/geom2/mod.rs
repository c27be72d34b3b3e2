//! 2D geometry primitives for the crease-pattern kernel.
//!
//! Purpose
//! - Vector/line/ray/segment algebra, the affine maps that compose fold
//!   reflections, and the few constructions the kernel needs (intersection,
//!   bisection, angular subsection, circle cut, bounce reflection, hull).
//! - Keep the API minimal and numerically explicit (every predicate takes an
//!   eps, usually `GeomCfg::eps`).
//!
//! Code cross-refs: `Line`, `Ray`, `Segment`, `Affine2`, `GeomCfg`

pub mod intersect;
pub mod reflect;
mod types;
pub mod util;

pub use intersect::{bisect, line_circle, line_line, ray_segment, segment_segment, subsect};
pub use reflect::{ray_reflect_repeat, Mirror, MAX_BOUNCES};
pub use types::{cross, lerp, rotate90, Affine2, GeomCfg, Hs2, Line, Ray, Segment};
pub use util::{centroid, clean_number, convex_hull, point_in_polygon, signed_area};
