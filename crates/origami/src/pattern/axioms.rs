//! Committed axiom folds and the candidate enumerators.
//!
//! Crease arguments are edge ids of the current graph; an unknown id yields
//! no crease. Enumerators never mutate: they return clipped candidates with
//! their provenance so a caller can preview before committing.

use nalgebra::Vector2;

use super::{CreasePattern, Provenance};
use crate::axioms::{axiom1, axiom2, axiom3, axiom4, axiom5, axiom7};
use crate::geom2::{Line, Segment};
use crate::graph::EdgeId;

/// A clipped fold that has not been committed.
#[derive(Clone, Debug, PartialEq)]
pub struct CandidateCrease {
    pub segment: Segment,
    pub provenance: Provenance,
}

impl CreasePattern {
    fn commit_line(&mut self, line: Option<Line>, provenance: Provenance) -> Option<EdgeId> {
        self.commit_lines(line, Some(provenance))
            .into_iter()
            .next()
    }

    /// Axiom 1: crease the line through `a` and `b`.
    pub fn crease_through_points(&mut self, a: Vector2<f64>, b: Vector2<f64>) -> Option<EdgeId> {
        let line = axiom1(a, b, self.cfg.eps);
        self.commit_line(line, Provenance::ThroughPoints { a, b })
    }

    /// Axiom 2: crease the fold bringing `a` onto `b`.
    pub fn crease_point_to_point(&mut self, a: Vector2<f64>, b: Vector2<f64>) -> Option<EdgeId> {
        let line = axiom2(a, b, self.cfg.eps);
        self.commit_line(line, Provenance::PointToPoint { a, b })
    }

    /// Axiom 3: crease the bisector(s) between two creases' lines.
    pub fn crease_edge_to_edge(&mut self, one: EdgeId, two: EdgeId) -> Vec<EdgeId> {
        let (Some(a), Some(b)) = (self.segment(one), self.segment(two)) else {
            return Vec::new();
        };
        let lines = axiom3(&a.infinite_line(), &b.infinite_line(), self.cfg.eps);
        self.commit_lines(lines, Some(Provenance::EdgeToEdge { a, b }))
    }

    /// Axiom 4: crease through `point` perpendicular to crease `edge`.
    pub fn crease_perpendicular_through_point(
        &mut self,
        edge: EdgeId,
        point: Vector2<f64>,
    ) -> Option<EdgeId> {
        let seg = self.segment(edge)?;
        let line = axiom4(&seg.infinite_line(), point, self.cfg.eps);
        self.commit_line(line, Provenance::PerpendicularThroughPoint { line: seg, point })
    }

    /// Axiom 5: creases through `pivot` placing `point` onto crease `edge`'s line.
    pub fn crease_point_to_line(
        &mut self,
        pivot: Vector2<f64>,
        point: Vector2<f64>,
        edge: EdgeId,
    ) -> Vec<EdgeId> {
        let Some(seg) = self.segment(edge) else {
            return Vec::new();
        };
        let lines = axiom5(pivot, point, &seg.infinite_line(), self.cfg.eps);
        self.commit_lines(
            lines,
            Some(Provenance::PointToLine {
                pivot,
                point,
                line: seg,
            }),
        )
    }

    /// Axiom 7: crease perpendicular to `perp` placing `point` onto `onto`'s line.
    pub fn crease_perpendicular_point_onto_line(
        &mut self,
        point: Vector2<f64>,
        onto: EdgeId,
        perp: EdgeId,
    ) -> Option<EdgeId> {
        let (onto_seg, perp_seg) = (self.segment(onto)?, self.segment(perp)?);
        let line = axiom7(
            point,
            &onto_seg.infinite_line(),
            &perp_seg.infinite_line(),
            self.cfg.eps,
        );
        self.commit_line(
            line,
            Provenance::PerpendicularPointOntoLine {
                point,
                onto: onto_seg,
                perp: perp_seg,
            },
        )
    }

    // ---- enumerators ----

    fn candidate(&self, line: Option<Line>, provenance: Provenance) -> Option<CandidateCrease> {
        let segment = self.boundary.clip_line(&line?, self.cfg.eps)?;
        Some(CandidateCrease {
            segment,
            provenance,
        })
    }

    fn node_pairs(&self) -> Vec<(Vector2<f64>, Vector2<f64>)> {
        let pts: Vec<Vector2<f64>> = self.graph.nodes().iter().map(|n| n.pos).collect();
        let mut pairs = Vec::new();
        for i in 0..pts.len() {
            for j in (i + 1)..pts.len() {
                pairs.push((pts[i], pts[j]));
            }
        }
        pairs
    }

    /// Axiom 1 over every pair of nodes.
    pub fn available_axiom1_folds(&self) -> Vec<CandidateCrease> {
        self.node_pairs()
            .into_iter()
            .filter_map(|(a, b)| {
                self.candidate(axiom1(a, b, self.cfg.eps), Provenance::ThroughPoints { a, b })
            })
            .collect()
    }

    /// Axiom 2 over every pair of nodes.
    pub fn available_axiom2_folds(&self) -> Vec<CandidateCrease> {
        self.node_pairs()
            .into_iter()
            .filter_map(|(a, b)| {
                self.candidate(axiom2(a, b, self.cfg.eps), Provenance::PointToPoint { a, b })
            })
            .collect()
    }

    /// Axiom 3 over every pair of creases.
    pub fn available_axiom3_folds(&self) -> Vec<CandidateCrease> {
        let segs: Vec<Segment> = self
            .graph
            .edge_ids()
            .filter_map(|e| self.graph.segment(e))
            .collect();
        let mut out = Vec::new();
        for i in 0..segs.len() {
            for j in (i + 1)..segs.len() {
                let (a, b) = (segs[i], segs[j]);
                for line in axiom3(&a.infinite_line(), &b.infinite_line(), self.cfg.eps) {
                    out.extend(self.candidate(Some(line), Provenance::EdgeToEdge { a, b }));
                }
            }
        }
        out
    }

    /// Axiom 4 over every crease and node.
    pub fn available_axiom4_folds(&self) -> Vec<CandidateCrease> {
        let mut out = Vec::new();
        for e in self.graph.edge_ids() {
            let Some(seg) = self.graph.segment(e) else {
                continue;
            };
            for n in self.graph.nodes() {
                let line = axiom4(&seg.infinite_line(), n.pos, self.cfg.eps);
                out.extend(self.candidate(
                    line,
                    Provenance::PerpendicularThroughPoint {
                        line: seg,
                        point: n.pos,
                    },
                ));
            }
        }
        out
    }

    /// Union of the axiom 1, 2 and 3 candidates.
    pub fn available_axiom_folds(&self) -> Vec<CandidateCrease> {
        let mut out = self.available_axiom1_folds();
        out.extend(self.available_axiom2_folds());
        out.extend(self.available_axiom3_folds());
        out
    }
}
