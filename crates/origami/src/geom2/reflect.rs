//! Bounce reflection of a ray through a set of mirror segments.
//!
//! The ray travels to the nearest mirror, reflects across that mirror's
//! infinite line and continues from the hit point. A terminal mirror ends the
//! walk (the sheet boundary), as does reaching `target`, missing every mirror,
//! or `MAX_BOUNCES`.

use std::cmp::Ordering;

use nalgebra::Vector2;

use super::intersect::ray_segment;
use super::types::{cross, Affine2, Ray, Segment};

/// Upper bound on the number of emitted segments.
pub const MAX_BOUNCES: usize = 128;

/// A segment the ray can hit.
#[derive(Clone, Copy, Debug)]
pub struct Mirror {
    pub seg: Segment,
    /// Stop at this mirror instead of reflecting.
    pub terminal: bool,
}

/// Polyline of the bouncing ray, one segment per leg.
pub fn ray_reflect_repeat(
    ray: &Ray,
    mirrors: &[Mirror],
    target: Option<Vector2<f64>>,
    eps: f64,
) -> Vec<Segment> {
    let mut legs = Vec::new();
    let mut cur = *ray;
    while legs.len() < MAX_BOUNCES {
        if cur.dir.norm() <= eps {
            break;
        }
        let hit = mirrors
            .iter()
            .enumerate()
            .filter_map(|(i, m)| {
                ray_segment(&cur, &m.seg, eps)
                    .filter(|(d, _)| *d > eps)
                    .map(|(d, p)| (i, d, p))
            })
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
        let Some((i, dist, p)) = hit else {
            break;
        };
        if let Some(t) = target.filter(|t| reaches(&cur, *t, dist, eps)) {
            legs.push(Segment::new(cur.origin, t));
            break;
        }
        legs.push(Segment::new(cur.origin, p));
        if mirrors[i].terminal {
            break;
        }
        let refl = Affine2::reflection(&mirrors[i].seg.infinite_line());
        cur = Ray::new(p, refl.m * cur.dir);
    }
    legs
}

/// Does `t` lie on the ray strictly before distance `dist`?
fn reaches(ray: &Ray, t: Vector2<f64>, dist: f64, eps: f64) -> bool {
    let d = ray.dir.normalize();
    let w = t - ray.origin;
    let along = w.dot(&d);
    cross(d, w).abs() <= eps && along > eps && along <= dist + eps
}
