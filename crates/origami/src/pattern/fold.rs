//! Fold simulation by reflection along the face-adjacency tree.
//!
//! Marks are removed from a deep copy, faces are visited breadth-first from
//! an anchor face, and every child face inherits its parent's transform
//! composed with the reflection across the crease they share. A vertex moves
//! once, with the first visited face that owns it. Layer order and
//! self-intersection are not modelled.

use std::collections::VecDeque;

use nalgebra::Vector2;

use super::CreasePattern;
use crate::error::{PatternError, Result};
use crate::geom2::Affine2;
use crate::graph::FaceId;

impl CreasePattern {
    /// Folded deep copy; `self` is untouched.
    ///
    /// `anchor` is a face of this (clean) pattern that stays fixed; by default
    /// the face under the center of the bounding box. The returned pattern is
    /// not cleaned again (folded faces overlap), and its boundary still
    /// describes the unfolded sheet.
    pub fn folded(&self, anchor: Option<FaceId>) -> Result<CreasePattern> {
        let anchor_point = match anchor {
            Some(f) => self
                .graph
                .face_centroid(f)
                .ok_or(PatternError::UnknownFace(f))?,
            None => self
                .bounds()
                .map(|r| r.center())
                .unwrap_or_else(Vector2::zeros),
        };

        let mut copy = self.clone();
        copy.remove_all_marks();
        let Some(root) = copy.graph.face_at(anchor_point) else {
            return Ok(copy);
        };

        let edge_faces = copy.graph.edge_faces();
        let face_count = copy.graph.faces().len();
        let mut transform: Vec<Option<Affine2>> = vec![None; face_count];
        let mut order = Vec::with_capacity(face_count);
        let mut queue = VecDeque::from([root]);
        transform[root.0] = Some(Affine2::identity());
        while let Some(f) = queue.pop_front() {
            order.push(f);
            let Some(parent) = transform[f.0] else {
                continue;
            };
            for (g, e) in copy.graph.face_neighbors(f, &edge_faces) {
                if transform[g.0].is_some() {
                    continue;
                }
                let Some(seg) = copy.graph.segment(e) else {
                    continue;
                };
                let local = Affine2::reflection(&seg.infinite_line());
                transform[g.0] = Some(parent.compose(&local));
                queue.push_back(g);
            }
        }

        let original: Vec<Vector2<f64>> = copy.graph.nodes().iter().map(|n| n.pos).collect();
        let mut moved = vec![false; original.len()];
        for f in order {
            let (Some(t), Some(face)) = (transform[f.0], copy.graph.face(f)) else {
                continue;
            };
            let nodes = face.nodes.clone();
            for n in nodes {
                if !moved[n.0] {
                    moved[n.0] = true;
                    copy.graph.set_position(n, t.apply(original[n.0]));
                }
            }
        }
        tracing::debug!(faces = face_count, "folded from face {}", root.0);
        Ok(copy)
    }
}
