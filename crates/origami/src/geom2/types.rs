//! Basic 2D types and tolerances used by the crease-pattern kernel.
//!
//! - `GeomCfg`: centralizes epsilons for predicates, vertex merging, Kawasaki
//!   checks, and the decimal precision of exported numbers.
//! - `Hs2`: closed half‑space `n·x <= c` with helper predicates.
//! - `Line`, `Ray`, `Segment`: the three crease input shapes.
//! - `Affine2`: 2D affine map used to compose fold reflections.
//!
//! Code cross-refs: `crate::boundary::ConvexPolygon`, `intersect`, `reflect`

use nalgebra::{Matrix2, Vector2};

/// Geometry configuration (tolerances).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeomCfg {
    /// Predicate slack for containment, parallelism and degenerate lengths.
    pub eps: f64,
    /// Two vertices closer than this are merged by the clean pass.
    pub eps_merge: f64,
    /// Default tolerance of the Kawasaki alternating-sum test.
    pub eps_kawasaki: f64,
    /// Decimal places kept when numbers are exported.
    pub precision: u32,
}

impl Default for GeomCfg {
    fn default() -> Self {
        Self {
            eps: 1e-9,
            eps_merge: 1e-8,
            eps_kawasaki: 1e-4,
            precision: 12,
        }
    }
}

/// Closed half‑space `n · x <= c` (unit `n` when built by `ConvexPolygon`).
#[derive(Clone, Copy, Debug)]
pub struct Hs2 {
    pub n: Vector2<f64>,
    pub c: f64,
}

impl Hs2 {
    #[inline]
    pub fn new(n: Vector2<f64>, c: f64) -> Self {
        Self { n, c }
    }
    #[inline]
    pub fn satisfies_eps(&self, p: Vector2<f64>, eps: f64) -> bool {
        self.n.dot(&p) <= self.c + eps
    }
}

/// Infinite line through `point` with direction `dir` (not normalized).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line {
    pub point: Vector2<f64>,
    pub dir: Vector2<f64>,
}

impl Line {
    #[inline]
    pub fn new(point: Vector2<f64>, dir: Vector2<f64>) -> Self {
        Self { point, dir }
    }

    /// Line through two points; `None` when they coincide.
    pub fn through(a: Vector2<f64>, b: Vector2<f64>, eps: f64) -> Option<Self> {
        let dir = b - a;
        if dir.norm() <= eps {
            return None;
        }
        Some(Self { point: a, dir })
    }

    /// The two opposite rays sharing `point`.
    #[inline]
    pub fn rays(&self) -> [Ray; 2] {
        [
            Ray::new(self.point, self.dir),
            Ray::new(self.point, -self.dir),
        ]
    }

    /// Mirror image of `p` across this line.
    pub fn reflect_point(&self, p: Vector2<f64>) -> Vector2<f64> {
        Affine2::reflection(self).apply(p)
    }

    /// Perpendicular distance from `p` to the line.
    pub fn distance_to(&self, p: Vector2<f64>) -> f64 {
        let n = self.dir.norm();
        if n == 0.0 {
            return (p - self.point).norm();
        }
        cross(self.dir, p - self.point).abs() / n
    }

    #[inline]
    pub fn is_parallel(&self, other: &Line, eps: f64) -> bool {
        let (a, b) = (self.dir.norm(), other.dir.norm());
        a <= eps || b <= eps || cross(self.dir, other.dir).abs() <= eps * a * b
    }
}

/// Ray from `origin` towards `dir` (not normalized).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vector2<f64>,
    pub dir: Vector2<f64>,
}

impl Ray {
    #[inline]
    pub fn new(origin: Vector2<f64>, dir: Vector2<f64>) -> Self {
        Self { origin, dir }
    }
    #[inline]
    pub fn flip(&self) -> Self {
        Self {
            origin: self.origin,
            dir: -self.dir,
        }
    }
    #[inline]
    pub fn line(&self) -> Line {
        Line::new(self.origin, self.dir)
    }
}

/// Finite segment `a → b`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub a: Vector2<f64>,
    pub b: Vector2<f64>,
}

impl Segment {
    #[inline]
    pub fn new(a: Vector2<f64>, b: Vector2<f64>) -> Self {
        Self { a, b }
    }
    #[inline]
    pub fn vector(&self) -> Vector2<f64> {
        self.b - self.a
    }
    #[inline]
    pub fn length(&self) -> f64 {
        self.vector().norm()
    }
    #[inline]
    pub fn midpoint(&self) -> Vector2<f64> {
        (self.a + self.b) * 0.5
    }
    /// Infinite extension (the line through both endpoints).
    #[inline]
    pub fn infinite_line(&self) -> Line {
        Line::new(self.a, self.vector())
    }
    /// Perpendicular bisector; `None` for a zero-length segment.
    pub fn perpendicular_bisector(&self, eps: f64) -> Option<Line> {
        let v = self.vector();
        if v.norm() <= eps {
            return None;
        }
        Some(Line::new(self.midpoint(), rotate90(v)))
    }
    /// Same endpoints in either order.
    pub fn equivalent(&self, other: &Segment, eps: f64) -> bool {
        ((self.a - other.a).norm() <= eps && (self.b - other.b).norm() <= eps)
            || ((self.a - other.b).norm() <= eps && (self.b - other.a).norm() <= eps)
    }
    /// Distance from `p` to the closest point of the segment.
    pub fn distance_to(&self, p: Vector2<f64>) -> f64 {
        let v = self.vector();
        let l2 = v.norm_squared();
        if l2 == 0.0 {
            return (p - self.a).norm();
        }
        let t = ((p - self.a).dot(&v) / l2).clamp(0.0, 1.0);
        (self.a + v * t - p).norm()
    }
}

/// 2D affine map: `x ↦ M x + t`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Affine2 {
    pub m: Matrix2<f64>,
    pub t: Vector2<f64>,
}

impl Affine2 {
    #[inline]
    pub fn identity() -> Self {
        Self {
            m: Matrix2::identity(),
            t: Vector2::zeros(),
        }
    }
    #[inline]
    pub fn inverse(&self) -> Option<Self> {
        self.m.try_inverse().map(|minv| Self {
            m: minv,
            t: -minv * self.t,
        })
    }
    /// Composition `self ∘ other`.
    #[inline]
    pub fn compose(&self, other: &Self) -> Self {
        Self {
            m: self.m * other.m,
            t: self.m * other.t + self.t,
        }
    }
    #[inline]
    pub fn apply(&self, p: Vector2<f64>) -> Vector2<f64> {
        self.m * p + self.t
    }
    #[inline]
    pub fn is_orientation_preserving(&self) -> bool {
        self.m.determinant() > 0.0
    }

    /// Reflection across `line`. A zero direction yields the identity.
    pub fn reflection(line: &Line) -> Self {
        let n = line.dir.norm();
        if n == 0.0 {
            return Self::identity();
        }
        let d = line.dir / n;
        let m = Matrix2::new(
            d.x * d.x - d.y * d.y,
            2.0 * d.x * d.y,
            2.0 * d.x * d.y,
            d.y * d.y - d.x * d.x,
        );
        Self {
            m,
            t: line.point - m * line.point,
        }
    }
}

/// z-component of the 3D cross product.
#[inline]
pub fn cross(a: Vector2<f64>, b: Vector2<f64>) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Counter-clockwise quarter turn.
#[inline]
pub fn rotate90(v: Vector2<f64>) -> Vector2<f64> {
    Vector2::new(-v.y, v.x)
}

#[inline]
pub fn lerp(a: Vector2<f64>, b: Vector2<f64>, t: f64) -> Vector2<f64> {
    a + (b - a) * t
}
