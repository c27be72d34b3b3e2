//! Clip-and-commit entry points.
//!
//! Every committed chord passes through `commit`: the symmetry image is
//! clipped and inserted first (when a symmetry line is set), then the chord
//! itself as a fresh mark crease. Public operations collect the new edge ids
//! and notify observers once per call.
//!
//! A mirror image that fails to clip is skipped; the primary chord is still
//! committed and nothing is rolled back. Batch operations return every edge
//! they added, mirror images included.

use std::cmp::Ordering;

use nalgebra::Vector2;

use super::{Crease, CreasePattern, Orientation, PatternEvent, Provenance};
use crate::geom2::{ray_reflect_repeat, ray_segment, Line, Mirror, Ray, Segment};
use crate::graph::EdgeId;

/// The three shapes a crease can be requested as.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CreaseInput {
    Segment(Segment),
    Line(Line),
    Ray(Ray),
}

impl From<Segment> for CreaseInput {
    fn from(s: Segment) -> Self {
        CreaseInput::Segment(s)
    }
}
impl From<Line> for CreaseInput {
    fn from(l: Line) -> Self {
        CreaseInput::Line(l)
    }
}
impl From<Ray> for CreaseInput {
    fn from(r: Ray) -> Self {
        CreaseInput::Ray(r)
    }
}

impl CreasePattern {
    /// Maximal chord of `input` inside the sheet.
    pub fn clip(&self, input: &CreaseInput) -> Option<Segment> {
        let eps = self.cfg.eps;
        match input {
            CreaseInput::Segment(s) => self.boundary.clip_segment(s, eps),
            CreaseInput::Line(l) => self.boundary.clip_line(l, eps),
            CreaseInput::Ray(r) => self.boundary.clip_ray(r, eps),
        }
    }

    /// Insert an already-clipped chord (and its mirror image) without notifying.
    pub(crate) fn commit(
        &mut self,
        chord: Segment,
        provenance: Option<Provenance>,
        out: &mut Vec<EdgeId>,
    ) -> EdgeId {
        if let Some(line) = self.symmetry {
            let image = Segment::new(line.reflect_point(chord.a), line.reflect_point(chord.b));
            match self.boundary.clip_segment(&image, self.cfg.eps) {
                Some(m) if !m.equivalent(&chord, self.cfg.eps_merge) => {
                    let id = self.graph.add_segment(
                        &m,
                        Crease {
                            orientation: Orientation::Mark,
                            provenance: provenance.clone(),
                        },
                    );
                    out.push(id);
                }
                Some(_) => {}
                None => tracing::debug!(?image, "mirror image left the sheet; kept primary only"),
            }
        }
        let id = self.graph.add_segment(
            &chord,
            Crease {
                orientation: Orientation::Mark,
                provenance,
            },
        );
        tracing::trace!(?chord, edge = id.0, "crease committed");
        out.push(id);
        id
    }

    /// Notify observers of a finished top-level operation.
    pub(crate) fn announce(&mut self, edges: Vec<EdgeId>) {
        if !edges.is_empty() {
            self.notify(PatternEvent::Creased { edges });
        }
    }

    /// Clip and commit each line, notifying once; returns the primary creases.
    pub(crate) fn commit_lines(
        &mut self,
        lines: impl IntoIterator<Item = Line>,
        provenance: Option<Provenance>,
    ) -> Vec<EdgeId> {
        let mut out = Vec::new();
        let mut primary = Vec::new();
        for line in lines {
            match self.boundary.clip_line(&line, self.cfg.eps) {
                Some(chord) => primary.push(self.commit(chord, provenance.clone(), &mut out)),
                None => tracing::debug!(?line, "fold line misses the sheet"),
            }
        }
        self.announce(out);
        primary
    }

    /// Commit one clipped chord as a mark crease and notify observers.
    pub fn new_crease(&mut self, chord: Segment, provenance: Option<Provenance>) -> EdgeId {
        let mut out = Vec::new();
        let id = self.commit(chord, provenance, &mut out);
        self.announce(out);
        id
    }

    /// Clip `input` against the sheet and commit it.
    pub fn crease(&mut self, input: impl Into<CreaseInput>) -> Option<EdgeId> {
        let chord = self.clip(&input.into())?;
        Some(self.new_crease(chord, None))
    }

    /// Segment from raw endpoints.
    pub fn crease_points(&mut self, a: Vector2<f64>, b: Vector2<f64>) -> Option<EdgeId> {
        self.crease(Segment::new(a, b))
    }

    /// First existing crease hit by `ray` past its origin.
    fn first_hit(&self, ray: &Ray) -> Option<(f64, Vector2<f64>)> {
        let eps = self.cfg.eps;
        let skip = self.cfg.eps_merge;
        self.graph
            .edge_ids()
            .filter_map(|e| self.graph.segment(e))
            .filter_map(|s| ray_segment(ray, &s, eps))
            .filter(|(d, _)| *d > skip)
            .min_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal))
    }

    /// Crease only as far as the nearest existing crease.
    ///
    /// - Ray: from the origin to the first crease it meets (the origin itself
    ///   excluded), or to the border if nothing is hit.
    /// - Line: between the first hits of its two rays, or the full chord if
    ///   either side has no hit.
    /// - Segment: clipped to the sheet, then from its first endpoint towards
    ///   the second, stopping early at the first crease crossed.
    pub fn crease_and_stop(&mut self, input: impl Into<CreaseInput>) -> Option<EdgeId> {
        match input.into() {
            CreaseInput::Ray(r) => match self.first_hit(&r) {
                Some((_, p)) => self.crease(Segment::new(r.origin, p)),
                None => self.crease(r),
            },
            CreaseInput::Line(l) => {
                let [fwd, back] = l.rays();
                match (self.first_hit(&fwd), self.first_hit(&back)) {
                    (Some((_, p)), Some((_, q))) => self.crease(Segment::new(q, p)),
                    _ => self.crease(l),
                }
            }
            CreaseInput::Segment(s) => {
                let s = self.boundary.clip_segment(&s, self.cfg.eps)?;
                let ray = Ray::new(s.a, s.vector());
                match self.first_hit(&ray) {
                    Some((d, p)) if d < s.length() => self.crease(Segment::new(s.a, p)),
                    _ => self.crease(s),
                }
            }
        }
    }

    /// Mirrors for bounce creasing: border creases stop, others reflect.
    fn mirrors(&self) -> Vec<Mirror> {
        self.graph
            .edges()
            .iter()
            .enumerate()
            .filter_map(|(i, e)| {
                self.graph.segment(EdgeId(i)).map(|seg| Mirror {
                    seg,
                    terminal: e.data.orientation == Orientation::Border,
                })
            })
            .collect()
    }

    /// Commit each leg of a polyline; legs that fail to clip are dropped.
    fn commit_legs(&mut self, legs: &[Segment], out: &mut Vec<EdgeId>) {
        for leg in legs {
            match self.boundary.clip_segment(leg, self.cfg.eps) {
                Some(chord) => {
                    self.commit(chord, None, out);
                }
                None => tracing::debug!(?leg, "dropped leg outside the sheet"),
            }
        }
    }

    fn bounce(&self, ray: &Ray, target: Option<Vector2<f64>>) -> Vec<Segment> {
        ray_reflect_repeat(ray, &self.mirrors(), target, self.cfg.eps)
    }

    /// Crease along `ray`, reflecting off existing creases until it reaches
    /// the border (or `target`).
    pub fn crease_ray_repeat(&mut self, ray: &Ray, target: Option<Vector2<f64>>) -> Vec<EdgeId> {
        let legs = self.bounce(ray, target);
        let mut out = Vec::new();
        self.commit_legs(&legs, &mut out);
        self.announce(out.clone());
        out
    }

    /// Bounce creasing in both directions from `line.point`.
    pub fn crease_line_repeat(&mut self, line: &Line) -> Vec<EdgeId> {
        // both walks see the same crease set
        let legs: Vec<Segment> = line
            .rays()
            .iter()
            .flat_map(|r| self.bounce(r, None))
            .collect();
        let mut out = Vec::new();
        self.commit_legs(&legs, &mut out);
        self.announce(out.clone());
        out
    }

    /// Bounce creasing for a line (both rays) or a ray; segments are not bounced.
    pub fn crease_and_reflect(&mut self, input: impl Into<CreaseInput>) -> Vec<EdgeId> {
        match input.into() {
            CreaseInput::Line(l) => self.crease_line_repeat(&l),
            CreaseInput::Ray(r) => self.crease_ray_repeat(&r, None),
            CreaseInput::Segment(_) => Vec::new(),
        }
    }

    /// Crease every edge of an open polyline; pieces outside the sheet are dropped.
    pub fn crease_polyline(&mut self, points: &[Vector2<f64>]) -> Vec<EdgeId> {
        let legs: Vec<Segment> = points
            .windows(2)
            .map(|w| Segment::new(w[0], w[1]))
            .collect();
        let mut out = Vec::new();
        self.commit_legs(&legs, &mut out);
        self.announce(out.clone());
        out
    }
}
