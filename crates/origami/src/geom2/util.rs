use std::cmp::Ordering;

use nalgebra::Vector2;

use super::types::cross;

/// Andrew’s monotone chain convex hull (returns hull in CCW order).
///
/// Colinear points are dropped; `None` for fewer than three hull vertices.
pub fn convex_hull(points: &[Vector2<f64>], eps: f64) -> Option<Vec<Vector2<f64>>> {
    if points.len() < 3 {
        return None;
    }
    let mut pts: Vec<_> = points.to_vec();
    pts.sort_by(|a, b| match a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal) {
        Ordering::Equal => a.y.partial_cmp(&b.y).unwrap_or(Ordering::Equal),
        o => o,
    });
    pts.dedup_by(|a, b| (*a - *b).norm() < eps);
    if pts.len() < 3 {
        return None;
    }
    let mut lower: Vec<Vector2<f64>> = Vec::with_capacity(pts.len());
    for p in &pts {
        while lower.len() >= 2 && turn(lower[lower.len() - 2], lower[lower.len() - 1], *p) <= eps {
            lower.pop();
        }
        lower.push(*p);
    }
    let mut upper: Vec<Vector2<f64>> = Vec::with_capacity(pts.len());
    for p in pts.iter().rev() {
        while upper.len() >= 2 && turn(upper[upper.len() - 2], upper[upper.len() - 1], *p) <= eps {
            upper.pop();
        }
        upper.push(*p);
    }
    lower.pop();
    upper.pop();
    let mut hull = lower;
    hull.extend(upper);
    if hull.len() < 3 {
        None
    } else {
        Some(hull)
    }
}

/// Orientation of `a → b → c`: positive for a left (CCW) turn.
#[inline]
pub fn turn(a: Vector2<f64>, b: Vector2<f64>, c: Vector2<f64>) -> f64 {
    cross(b - a, c - a)
}

/// Signed area (shoelace); positive for CCW vertex order.
pub fn signed_area(verts: &[Vector2<f64>]) -> f64 {
    let n = verts.len();
    let mut a = 0.0;
    for i in 0..n {
        a += cross(verts[i], verts[(i + 1) % n]);
    }
    a * 0.5
}

/// Polygon area centroid; falls back to the vertex average for degenerate input.
pub fn centroid(verts: &[Vector2<f64>]) -> Option<Vector2<f64>> {
    if verts.is_empty() {
        return None;
    }
    let a = signed_area(verts);
    if a.abs() < 1e-18 {
        let sum: Vector2<f64> = verts.iter().sum();
        return Some(sum / verts.len() as f64);
    }
    let mut c = Vector2::zeros();
    for i in 0..verts.len() {
        let p = verts[i];
        let q = verts[(i + 1) % verts.len()];
        c += (p + q) * cross(p, q);
    }
    Some(c / (6.0 * a))
}

/// Strict point-in-polygon test (ray casting); boundary points are unspecified.
pub fn point_in_polygon(p: Vector2<f64>, verts: &[Vector2<f64>]) -> bool {
    let mut inside = false;
    let n = verts.len();
    let mut j = n.wrapping_sub(1);
    for i in 0..n {
        let (a, b) = (verts[i], verts[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Round away floating-point noise to `places` decimals; normalizes `-0.0`.
pub fn clean_number(x: f64, places: u32) -> f64 {
    if !x.is_finite() {
        return x;
    }
    let s = 10f64.powi(places as i32);
    let r = (x * s).round() / s;
    if !r.is_finite() {
        return x;
    }
    if r == 0.0 {
        0.0
    } else {
        r
    }
}
