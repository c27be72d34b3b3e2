//! Pleats between two creases.

use super::CreasePattern;
use crate::geom2::{lerp, subsect, Line, Segment};
use crate::graph::EdgeId;

impl CreasePattern {
    /// `count − 1` creases dividing the wedge (or strip) between creases `a`
    /// and `b` into `count` equal parts.
    pub fn pleat(&mut self, count: usize, a: EdgeId, b: EdgeId) -> Vec<EdgeId> {
        let (Some(sa), Some(sb)) = (self.segment(a), self.segment(b)) else {
            return Vec::new();
        };
        let lines = subsect(&sa.infinite_line(), &sb.infinite_line(), count, self.cfg.eps);
        self.commit_lines(lines, None)
    }

    /// Approximate pleat: interpolates the first endpoint and the direction of
    /// `a` towards those of `b` at `count − 1` evenly spaced steps.
    ///
    /// Directions are blended linearly, not by angle, so the lines are only
    /// evenly spaced when the creases are parallel. Use `pleat` for an exact
    /// subdivision.
    pub fn glitch_pleat(&mut self, a: EdgeId, b: EdgeId, count: usize) -> Vec<EdgeId> {
        let (Some(sa), Some(sb)) = (self.segment(a), self.segment(b)) else {
            return Vec::new();
        };
        if count < 2 {
            return Vec::new();
        }
        let lines = glitch_lines(&sa, &sb, count);
        self.commit_lines(lines, None)
    }
}

fn glitch_lines(a: &Segment, b: &Segment, count: usize) -> Vec<Line> {
    let (u, v) = (a.a - a.b, b.a - b.b);
    (1..count)
        .map(|i| {
            let t = i as f64 / count as f64;
            Line::new(lerp(a.a, b.a, t), lerp(u, v, t))
        })
        .collect()
}
