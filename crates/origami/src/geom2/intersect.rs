//! Intersections and line constructions (bisect, subsect, circle cut).
//!
//! All predicates are eps-aware: parallel tests scale `eps` by the direction
//! norms, and parametric bounds are widened by `eps` in length units so that
//! touching endpoints count as hits.

use std::f64::consts::{PI, TAU};

use nalgebra::Vector2;

use super::types::{cross, Line, Ray, Segment};

/// Solve `p + s·d = q + u·e` for `(s, u)`; `None` when `d ∥ e`.
fn solve_params(
    p: Vector2<f64>,
    d: Vector2<f64>,
    q: Vector2<f64>,
    e: Vector2<f64>,
    eps: f64,
) -> Option<(f64, f64)> {
    let denom = cross(d, e);
    if denom.abs() <= eps * d.norm() * e.norm() || denom == 0.0 {
        return None;
    }
    let w = q - p;
    Some((cross(w, e) / denom, cross(w, d) / denom))
}

#[inline]
fn within_unit(t: f64, len: f64, eps: f64) -> bool {
    let slack = if len > 0.0 { eps / len } else { 0.0 };
    t >= -slack && t <= 1.0 + slack
}

/// Intersection point of two infinite lines.
pub fn line_line(a: &Line, b: &Line, eps: f64) -> Option<Vector2<f64>> {
    let (s, _) = solve_params(a.point, a.dir, b.point, b.dir, eps)?;
    Some(a.point + a.dir * s)
}

/// Intersection of a ray with a segment, returned with its distance from the
/// ray origin.
pub fn ray_segment(r: &Ray, seg: &Segment, eps: f64) -> Option<(f64, Vector2<f64>)> {
    let e = seg.vector();
    let (s, u) = solve_params(r.origin, r.dir, seg.a, e, eps)?;
    let dn = r.dir.norm();
    if s * dn < -eps || !within_unit(u, e.norm(), eps) {
        return None;
    }
    let p = r.origin + r.dir * s;
    Some(((p - r.origin).norm(), p))
}

/// Intersection of two finite segments (touching endpoints included).
pub fn segment_segment(a: &Segment, b: &Segment, eps: f64) -> Option<Vector2<f64>> {
    let (d, e) = (a.vector(), b.vector());
    let (s, u) = solve_params(a.a, d, b.a, e, eps)?;
    if within_unit(s, d.norm(), eps) && within_unit(u, e.norm(), eps) {
        Some(a.a + d * s)
    } else {
        None
    }
}

/// Points where `line` meets the circle `|x - center| = radius` (0, 1 or 2).
pub fn line_circle(
    line: &Line,
    center: Vector2<f64>,
    radius: f64,
    eps: f64,
) -> Vec<Vector2<f64>> {
    let n = line.dir.norm();
    if n <= eps || radius < 0.0 {
        return Vec::new();
    }
    let d = line.dir / n;
    let foot = line.point + d * (center - line.point).dot(&d);
    let h = (center - foot).norm();
    if h > radius + eps {
        Vec::new()
    } else if (h - radius).abs() <= eps {
        vec![foot]
    } else {
        let off = (radius * radius - h * h).max(0.0).sqrt();
        vec![foot - d * off, foot + d * off]
    }
}

/// Angle bisectors of two lines.
///
/// Non-parallel lines give the two mutually perpendicular bisectors through
/// their crossing; distinct parallel lines give the single midline; coincident
/// lines give the line itself.
pub fn bisect(a: &Line, b: &Line, eps: f64) -> Vec<Line> {
    let (na, nb) = (a.dir.norm(), b.dir.norm());
    if na <= eps || nb <= eps {
        return Vec::new();
    }
    match line_line(a, b, eps) {
        Some(x) => {
            let (da, db) = (a.dir / na, b.dir / nb);
            vec![Line::new(x, da + db), Line::new(x, da - db)]
        }
        None => {
            if a.distance_to(b.point) <= eps {
                return vec![*a];
            }
            vec![Line::new((a.point + b.point) * 0.5, a.dir)]
        }
    }
}

/// `count − 1` lines dividing the space between `a` and `b` into `count`
/// equal parts.
///
/// Crossing lines are divided by angle, sweeping counter-clockwise from
/// `a.dir` to `b`; parallel lines are divided across the strip.
pub fn subsect(a: &Line, b: &Line, count: usize, eps: f64) -> Vec<Line> {
    if count < 2 || a.dir.norm() <= eps || b.dir.norm() <= eps {
        return Vec::new();
    }
    let k = count as f64;
    match line_line(a, b, eps) {
        Some(x) => {
            let a0 = a.dir.y.atan2(a.dir.x);
            let a1 = b.dir.y.atan2(b.dir.x);
            let sweep = (a1 - a0).rem_euclid(TAU).rem_euclid(PI);
            (1..count)
                .map(|i| {
                    let th = a0 + sweep * (i as f64) / k;
                    Line::new(x, Vector2::new(th.cos(), th.sin()))
                })
                .collect()
        }
        None => {
            let d = b.dir.normalize();
            let foot = b.point + d * (a.point - b.point).dot(&d);
            if (foot - a.point).norm() <= eps {
                return Vec::new();
            }
            (1..count)
                .map(|i| Line::new(super::types::lerp(a.point, foot, i as f64 / k), a.dir))
                .collect()
        }
    }
}
