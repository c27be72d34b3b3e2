//! Local flat-foldability: Kawasaki and Maekawa at single vertices.
//!
//! Sectors at a junction are taken in clockwise order and split into two
//! alternating groups. Kawasaki asks both groups to sum to π; Maekawa asks
//! mountain and valley counts to differ by exactly two. Vertices on the sheet
//! border, and vertices without creases, pass both tests.
//!
//! All queries read derived junctions and expect a clean pattern.
//!
//! References
//! - Hull, "The combinatorics of flat folds: a survey" (2002).

use std::f64::consts::{PI, TAU};

use nalgebra::Vector2;
use rand::Rng;

use super::{Crease, CreasePattern, Orientation, PatternEvent};
use crate::geom2::{line_line, Line, Ray, Segment};
use crate::graph::{EdgeId, FaceId, Junction, NodeId, SectorId};

/// One parity group of a junction's sectors.
#[derive(Clone, Debug, PartialEq)]
pub struct KawasakiGroup {
    /// `π − Σ angles`: how far the group is from a half turn.
    pub difference: f64,
    pub sectors: Vec<SectorId>,
}

/// Knobs of the `wiggle` relaxation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WiggleCfg {
    /// Ratings at or below this are left alone.
    pub epsilon: f64,
    /// Random perturbations tried per vertex.
    pub samples: usize,
    /// Perturbation radius as a fraction of the vertex rating.
    pub step: f64,
}

impl Default for WiggleCfg {
    fn default() -> Self {
        Self {
            epsilon: 1e-5,
            samples: 12,
            step: 0.05,
        }
    }
}

impl CreasePattern {
    /// Does `n` sit on the sheet border?
    pub fn is_boundary_node(&self, n: NodeId) -> bool {
        self.position(n)
            .is_some_and(|p| self.boundary.lies_on_edge(p, self.cfg.eps_merge))
    }

    fn interior_junction(&self, n: NodeId) -> Option<&Junction> {
        if self.is_boundary_node(n) {
            return None;
        }
        self.graph.junction_of(n)
    }

    /// Angle sums of the even and odd sectors; `None` for odd valence.
    fn alternating_sums(&self, j: &Junction) -> Option<[f64; 2]> {
        if j.sectors.len() % 2 != 0 {
            return None;
        }
        let mut sums = [0.0; 2];
        for (i, s) in j.sectors.iter().enumerate() {
            sums[i % 2] += self.sector_angle(*s);
        }
        Some(sums)
    }

    /// Clockwise angle of a sector (`0` for an unknown id).
    pub fn sector_angle(&self, s: SectorId) -> f64 {
        self.graph
            .sector(s)
            .map(|s| self.graph.sector_angle(s))
            .unwrap_or(0.0)
    }

    /// Kawasaki's theorem at `n` within `eps`.
    pub fn kawasaki(&self, n: NodeId, eps: f64) -> bool {
        let Some(j) = self.interior_junction(n) else {
            return true;
        };
        match self.alternating_sums(j) {
            Some([even, odd]) => (even - odd).abs() < eps,
            None => false,
        }
    }

    /// Maekawa's theorem at `n` (marks are ignored).
    pub fn maekawa(&self, n: NodeId) -> bool {
        let Some(j) = self.interior_junction(n) else {
            return true;
        };
        let count = |o: Orientation| {
            j.edges
                .iter()
                .filter(|e| self.crease_at(**e).is_some_and(|c| c.orientation == o))
                .count() as i64
        };
        (count(Orientation::Mountain) - count(Orientation::Valley)).abs() == 2
    }

    /// Both theorems at `n`, Kawasaki with the configured tolerance.
    pub fn flat_foldable_node(&self, n: NodeId) -> bool {
        self.kawasaki(n, self.cfg.eps_kawasaki) && self.maekawa(n)
    }

    /// Every vertex is locally flat-foldable.
    pub fn flat_foldable(&self) -> bool {
        self.graph.node_ids().all(|n| self.flat_foldable_node(n))
    }

    /// `|Σ even − Σ odd|`; `0` is exact, `None` for odd valence or no creases.
    pub fn kawasaki_rating(&self, n: NodeId) -> Option<f64> {
        let j = self.graph.junction_of(n)?;
        self.alternating_sums(j).map(|[e, o]| (e - o).abs())
    }

    /// For each parity group, its distance from π and its sectors.
    pub fn kawasaki_solution(&self, n: NodeId) -> Option<[KawasakiGroup; 2]> {
        let j = self.graph.junction_of(n)?;
        let [even, odd] = self.alternating_sums(j)?;
        let pick = |parity: usize| {
            j.sectors
                .iter()
                .enumerate()
                .filter(|(i, _)| i % 2 == parity)
                .map(|(_, s)| *s)
                .collect()
        };
        Some([
            KawasakiGroup {
                difference: PI - even,
                sectors: pick(0),
            },
            KawasakiGroup {
                difference: PI - odd,
                sectors: pick(1),
            },
        ])
    }

    /// The sector at `n` bounded by creases `a` then `b` (clockwise).
    pub fn sector_between(&self, n: NodeId, a: EdgeId, b: EdgeId) -> Option<SectorId> {
        let j = self.graph.junction_of(n)?;
        j.sectors
            .iter()
            .copied()
            .find(|s| self.graph.sector(*s).is_some_and(|s| s.edges == [a, b]))
    }

    /// Direction of the one crease inside `sector` that would make an
    /// odd-valence vertex satisfy Kawasaki; `None` if it falls outside.
    pub fn kawasaki_collapse(&self, n: NodeId, sector: SectorId) -> Option<Ray> {
        let j = self.graph.junction_of(n)?;
        if j.edges.len() % 2 == 0 {
            return None;
        }
        let found = j.sectors.iter().position(|s| *s == sector)?;
        let k = j.sectors.len();
        // sectors after `found`, in clockwise order; even ones share parity
        // with the new wedge cut from `found`
        let sum_even: f64 = (0..k - 1)
            .filter(|i| i % 2 == 0)
            .map(|i| self.sector_angle(j.sectors[(found + 1 + i) % k]))
            .sum();
        let wedge = PI - sum_even;
        let s = self.graph.sector(sector)?;
        let v0 = self.graph.edge_vector_from(s.edges[0], s.origin);
        let angle = v0.y.atan2(v0.x) - wedge;
        let dir = Vector2::new(angle.cos(), angle.sin());
        self.graph
            .sector_contains_direction(s, dir)
            .then(|| Ray::new(self.graph.position(n), dir))
    }

    /// Ray halving the sector's clockwise wedge.
    pub fn sector_bisector(&self, sector: SectorId) -> Option<Ray> {
        let s = self.graph.sector(sector)?;
        let v0 = self.graph.edge_vector_from(s.edges[0], s.origin);
        let angle = v0.y.atan2(v0.x) - self.graph.sector_angle(s) * 0.5;
        Some(Ray::new(
            self.graph.position(s.origin),
            Vector2::new(angle.cos(), angle.sin()),
        ))
    }

    /// Crease a triangular face from each corner to its incenter.
    ///
    /// The incenter is where the corner bisectors meet. Other faces give no
    /// creases. The symmetry line is not applied.
    pub fn rabbit_ear(&mut self, face: FaceId) -> Vec<EdgeId> {
        let Some(poly) = self.graph.face_polygon(face) else {
            return Vec::new();
        };
        if poly.len() != 3 {
            return Vec::new();
        }
        let eps = self.cfg.eps;
        let bisector = |i: usize| {
            let (p, a, b) = (poly[i], poly[(i + 1) % 3], poly[(i + 2) % 3]);
            let d = (a - p).normalize() + (b - p).normalize();
            Line::new(p, d)
        };
        let Some(center) = line_line(&bisector(0), &bisector(1), eps) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        for corner in poly {
            let id = self
                .graph
                .add_segment(&Segment::new(corner, center), Crease::new(Orientation::Mark));
            out.push(id);
        }
        self.announce(out.clone());
        out
    }

    /// Best-effort relaxation towards Kawasaki.
    ///
    /// Each interior vertex rated above `cfg.epsilon` tries `cfg.samples`
    /// random moves of radius up to `cfg.step × rating` and keeps the move
    /// with the lowest own-plus-neighbours rating. Convergence is not
    /// guaranteed and creases may end up crossing. Returns how many vertices
    /// were moved. The pattern is cleaned before and after.
    pub fn wiggle<R: Rng + ?Sized>(&mut self, cfg: &WiggleCfg, rng: &mut R) -> usize {
        self.clean();
        let mut moved = 0;
        for n in self.graph.node_ids().collect::<Vec<_>>() {
            if self.is_boundary_node(n) {
                continue;
            }
            let Some(rating) = self.kawasaki_rating(n) else {
                continue;
            };
            if rating <= cfg.epsilon {
                continue;
            }
            moved += 1;
            let home = self.graph.position(n);
            let neighbors = self.graph.adjacent_nodes(n);
            let mut best: Option<(f64, Vector2<f64>)> = None;
            for _ in 0..cfg.samples {
                let angle = rng.gen::<f64>() * TAU;
                let radius = rng.gen::<f64>() * rating * cfg.step;
                let candidate = home + Vector2::new(angle.cos(), angle.sin()) * radius;
                self.graph.set_position(n, candidate);
                let score = self.kawasaki_rating(n).unwrap_or(0.0)
                    + neighbors
                        .iter()
                        .filter(|m| !self.is_boundary_node(**m))
                        .filter_map(|m| self.kawasaki_rating(*m))
                        .sum::<f64>();
                if best.map_or(true, |(s, _)| score < s) {
                    best = Some((score, candidate));
                }
            }
            let target = best.map_or(home, |(_, p)| p);
            self.graph.set_position(n, target);
        }
        tracing::debug!(moved, "wiggle pass");
        self.clean();
        if moved > 0 {
            self.notify(PatternEvent::NodesMoved { count: moved });
        }
        moved
    }
}
