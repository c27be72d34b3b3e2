//! Huzita–Justin single-fold constructions (axioms 1–5 and 7) as pure geometry.
//!
//! Each function returns the unclipped fold line(s); clipping against the
//! sheet and committing is done by `CreasePattern`. No solution is an empty
//! result, never an error.
//!
//! References
//! - Huzita, "Axiomatic development of origami geometry" (1989).
//! - Lang, "Origami and Geometric Constructions" (2003), §2.

use nalgebra::Vector2;

use crate::geom2::{bisect, line_circle, line_line, rotate90, Line, Segment};

/// Axiom 1: the line through `p` and `q`.
pub fn axiom1(p: Vector2<f64>, q: Vector2<f64>, eps: f64) -> Option<Line> {
    Line::through(p, q, eps)
}

/// Axiom 2: the fold placing `p` onto `q` (their perpendicular bisector).
pub fn axiom2(p: Vector2<f64>, q: Vector2<f64>, eps: f64) -> Option<Line> {
    Segment::new(p, q).perpendicular_bisector(eps)
}

/// Axiom 3: the folds placing line `a` onto line `b` (one or two bisectors).
pub fn axiom3(a: &Line, b: &Line, eps: f64) -> Vec<Line> {
    bisect(a, b, eps)
}

/// Axiom 4: the fold through `p` perpendicular to `line`.
pub fn axiom4(line: &Line, p: Vector2<f64>, eps: f64) -> Option<Line> {
    if line.dir.norm() <= eps {
        return None;
    }
    Some(Line::new(p, rotate90(line.dir)))
}

/// Axiom 5: folds through `pivot` that place `point` onto `line`.
///
/// The images of `point` are where the circle about `pivot` through `point`
/// meets the line; each image gives an axiom-2 fold, so zero, one or two lines.
pub fn axiom5(pivot: Vector2<f64>, point: Vector2<f64>, line: &Line, eps: f64) -> Vec<Line> {
    let radius = (pivot - point).norm();
    line_circle(line, pivot, radius, eps)
        .into_iter()
        .filter_map(|image| axiom2(point, image, eps))
        .collect()
}

/// Axiom 7: the fold perpendicular to `perp` that places `point` onto `onto`.
pub fn axiom7(point: Vector2<f64>, onto: &Line, perp: &Line, eps: f64) -> Option<Line> {
    let travel = Line::new(point, perp.dir);
    let image = line_line(&travel, onto, eps)?;
    axiom2(point, image, eps)
}
