//! Convex sheet boundary and chord clipping.
//!
//! The polygon keeps both representations: CCW vertices (for rendering and
//! border creases) and one unit-normal half-space `n·x <= c` per edge (for
//! containment and clipping). Clipping narrows the parameter interval of
//! `p + t·d` against every half-space.
//!
//! A returned chord is maximal inside the polygon; disjoint, tangent, and
//! zero-length results are `None`.

use nalgebra::Vector2;

use crate::error::{PatternError, Result};
use crate::geom2::{convex_hull, signed_area, util::turn, Hs2, Line, Ray, Segment};

/// Convex polygon with CCW vertices.
#[derive(Clone, Debug, Default)]
pub struct ConvexPolygon {
    verts: Vec<Vector2<f64>>,
    hs: Vec<Hs2>,
}

/// Axis-aligned bounding rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub min: Vector2<f64>,
    pub max: Vector2<f64>,
}

impl Rect {
    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }
    #[inline]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
    #[inline]
    pub fn center(&self) -> Vector2<f64> {
        (self.min + self.max) * 0.5
    }
    /// Smallest rectangle containing `points`; `None` when empty.
    pub fn around<'a, I>(points: I) -> Option<Rect>
    where
        I: IntoIterator<Item = &'a Vector2<f64>>,
    {
        let mut it = points.into_iter();
        let first = *it.next()?;
        let (min, max) = it.fold((first, first), |(lo, hi), p| {
            (
                Vector2::new(lo.x.min(p.x), lo.y.min(p.y)),
                Vector2::new(hi.x.max(p.x), hi.y.max(p.y)),
            )
        });
        Some(Rect { min, max })
    }
}

impl ConvexPolygon {
    /// Polygon from an explicitly ordered vertex list (either winding).
    ///
    /// A trailing duplicate of the first point is dropped. Fails on fewer than
    /// three distinct points or a non-convex sequence.
    pub fn from_sorted(points: &[Vector2<f64>], eps: f64) -> Result<Self> {
        let mut verts: Vec<Vector2<f64>> = Vec::with_capacity(points.len());
        for p in points {
            if verts.last().is_none_or(|q| (q - p).norm() > eps) {
                verts.push(*p);
            }
        }
        if verts.len() > 1 && (verts[0] - verts[verts.len() - 1]).norm() <= eps {
            verts.pop();
        }
        if verts.len() < 3 {
            return Err(PatternError::InvalidBoundary(format!(
                "need at least 3 distinct points, got {}",
                verts.len()
            )));
        }
        if signed_area(&verts) < 0.0 {
            verts.reverse();
        }
        // drop colinear vertices, reject reflex ones
        let n = verts.len();
        let mut kept = Vec::with_capacity(n);
        for i in 0..n {
            let t = turn(verts[(i + n - 1) % n], verts[i], verts[(i + 1) % n]);
            if t < -eps {
                return Err(PatternError::InvalidBoundary(format!(
                    "vertex {i} makes the polygon non-convex"
                )));
            }
            if t > eps {
                kept.push(verts[i]);
            }
        }
        Self::from_ccw(kept)
    }

    /// Convex hull of an unordered point cloud.
    pub fn from_points(points: &[Vector2<f64>], eps: f64) -> Result<Self> {
        let hull = convex_hull(points, eps).ok_or_else(|| {
            PatternError::InvalidBoundary("points have no 2D convex hull".to_string())
        })?;
        Self::from_ccw(hull)
    }

    /// Axis-aligned rectangle with its lower-left corner at the origin.
    pub fn rectangle(width: f64, height: f64) -> Result<Self> {
        let (w, h) = (width.abs(), height.abs());
        Self::from_sorted(
            &[
                Vector2::new(0.0, 0.0),
                Vector2::new(w, 0.0),
                Vector2::new(w, h),
                Vector2::new(0.0, h),
            ],
            1e-12,
        )
    }

    /// Regular polygon with unit circumradius centered at the origin.
    pub fn regular(sides: usize) -> Result<Self> {
        if sides < 3 {
            return Err(PatternError::InvalidBoundary(format!(
                "a regular polygon needs at least 3 sides, got {sides}"
            )));
        }
        let step = std::f64::consts::TAU / sides as f64;
        let pts: Vec<_> = (0..sides)
            .map(|k| {
                let th = step * k as f64;
                Vector2::new(th.cos(), th.sin())
            })
            .collect();
        Self::from_sorted(&pts, 1e-12)
    }

    /// The unit square `[0, 1]²`, the default sheet.
    pub fn unit_square() -> Self {
        Self::with_normals(vec![
            Vector2::new(0.0, 0.0),
            Vector2::new(1.0, 0.0),
            Vector2::new(1.0, 1.0),
            Vector2::new(0.0, 1.0),
        ])
    }

    fn from_ccw(verts: Vec<Vector2<f64>>) -> Result<Self> {
        if verts.len() < 3 {
            return Err(PatternError::InvalidBoundary(
                "degenerate polygon".to_string(),
            ));
        }
        Ok(Self::with_normals(verts))
    }

    fn with_normals(verts: Vec<Vector2<f64>>) -> Self {
        let n = verts.len();
        let mut hs = Vec::with_capacity(n);
        for k in 0..n {
            let p = verts[k];
            let edge = verts[(k + 1) % n] - p;
            // For CCW order, outward normal is 90° CW: (edge.y, -edge.x)
            let nrm = Vector2::new(edge.y, -edge.x);
            let len = nrm.norm();
            if len > 0.0 {
                hs.push(Hs2::new(nrm / len, nrm.dot(&p) / len));
            }
        }
        Self { verts, hs }
    }

    #[inline]
    pub fn vertices(&self) -> &[Vector2<f64>] {
        &self.verts
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.verts.is_empty()
    }

    /// Border edges in CCW order.
    pub fn edges(&self) -> impl Iterator<Item = Segment> + '_ {
        let n = self.verts.len();
        (0..n).map(move |k| Segment::new(self.verts[k], self.verts[(k + 1) % n]))
    }

    /// Vertex average.
    pub fn center(&self) -> Vector2<f64> {
        if self.verts.is_empty() {
            return Vector2::zeros();
        }
        self.verts.iter().sum::<Vector2<f64>>() / self.verts.len() as f64
    }

    pub fn bounds(&self) -> Option<Rect> {
        Rect::around(&self.verts)
    }

    /// Inside or on the polygon (with slack `eps`).
    #[inline]
    pub fn contains(&self, p: Vector2<f64>, eps: f64) -> bool {
        !self.hs.is_empty() && self.hs.iter().all(|h| h.satisfies_eps(p, eps))
    }

    /// Within `eps` of some border edge.
    pub fn lies_on_edge(&self, p: Vector2<f64>, eps: f64) -> bool {
        self.edges().any(|e| e.distance_to(p) <= eps)
    }

    /// Narrow `[lo, hi]` so that `p + t·d` stays inside.
    fn clip_interval(
        &self,
        p: Vector2<f64>,
        d: Vector2<f64>,
        mut lo: f64,
        mut hi: f64,
        eps: f64,
    ) -> Option<(f64, f64)> {
        let dn = d.norm();
        if self.hs.is_empty() || dn <= eps {
            return None;
        }
        for h in &self.hs {
            let nd = h.n.dot(&d);
            let rhs = h.c - h.n.dot(&p);
            if nd.abs() <= eps * dn {
                // parallel: outside, or running along this border edge
                if rhs <= eps {
                    return None;
                }
            } else if nd > 0.0 {
                hi = hi.min(rhs / nd);
            } else {
                lo = lo.max(rhs / nd);
            }
        }
        // tangent or zero-length chords count as misses
        if !lo.is_finite() || !hi.is_finite() || (hi - lo) * dn <= eps {
            return None;
        }
        Some((lo, hi))
    }

    pub fn clip_segment(&self, seg: &Segment, eps: f64) -> Option<Segment> {
        let d = seg.vector();
        let (lo, hi) = self.clip_interval(seg.a, d, 0.0, 1.0, eps)?;
        Some(Segment::new(seg.a + d * lo, seg.a + d * hi))
    }

    /// Chord from the ray origin to the boundary; the origin must be inside or on.
    pub fn clip_ray(&self, ray: &Ray, eps: f64) -> Option<Segment> {
        if !self.contains(ray.origin, eps) {
            return None;
        }
        let (lo, hi) = self.clip_interval(ray.origin, ray.dir, 0.0, f64::INFINITY, eps)?;
        Some(Segment::new(
            ray.origin + ray.dir * lo,
            ray.origin + ray.dir * hi,
        ))
    }

    pub fn clip_line(&self, line: &Line, eps: f64) -> Option<Segment> {
        let (lo, hi) =
            self.clip_interval(line.point, line.dir, f64::NEG_INFINITY, f64::INFINITY, eps)?;
        Some(Segment::new(
            line.point + line.dir * lo,
            line.point + line.dir * hi,
        ))
    }
}
