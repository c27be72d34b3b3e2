//! Read-only lookups over a clean graph.

use std::cmp::Ordering;
use std::collections::HashMap;

use nalgebra::Vector2;

use super::types::{EdgeData, EdgeId, FaceId, NodeId};
use super::PlanarGraph;
use crate::geom2::{centroid, point_in_polygon};

impl<E: EdgeData> PlanarGraph<E> {
    /// Node closest to `p` (ties keep the lower id).
    pub fn nearest_node(&self, p: Vector2<f64>) -> Option<NodeId> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (i, (n.pos - p).norm_squared()))
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal))
            .map(|(i, _)| NodeId(i))
    }

    pub fn face_polygon(&self, f: FaceId) -> Option<Vec<Vector2<f64>>> {
        let face = self.faces.get(f.0)?;
        Some(face.nodes.iter().map(|n| self.nodes[n.0].pos).collect())
    }

    pub fn face_centroid(&self, f: FaceId) -> Option<Vector2<f64>> {
        centroid(&self.face_polygon(f)?)
    }

    /// Face whose interior holds `p`, else the face with the nearest centroid.
    pub fn face_at(&self, p: Vector2<f64>) -> Option<FaceId> {
        let ids = (0..self.faces.len()).map(FaceId);
        if let Some(f) = ids
            .clone()
            .find(|f| self.face_polygon(*f).is_some_and(|poly| point_in_polygon(p, &poly)))
        {
            return Some(f);
        }
        ids.filter_map(|f| self.face_centroid(f).map(|c| (f, (c - p).norm_squared())))
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal))
            .map(|(f, _)| f)
    }

    /// Faces on either side of each edge; edges on the outer boundary list one face.
    pub fn edge_faces(&self) -> HashMap<EdgeId, Vec<FaceId>> {
        let mut map: HashMap<EdgeId, Vec<FaceId>> = HashMap::new();
        for (fi, face) in self.faces.iter().enumerate() {
            for &e in &face.edges {
                let entry = map.entry(e).or_default();
                if !entry.contains(&FaceId(fi)) {
                    entry.push(FaceId(fi));
                }
            }
        }
        map
    }

    /// Neighbouring faces of `f` with the edge they share.
    pub fn face_neighbors(
        &self,
        f: FaceId,
        edge_faces: &HashMap<EdgeId, Vec<FaceId>>,
    ) -> Vec<(FaceId, EdgeId)> {
        let Some(face) = self.faces.get(f.0) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        for &e in &face.edges {
            if let Some(list) = edge_faces.get(&e) {
                for &g in list {
                    if g != f && !out.iter().any(|(h, _)| *h == g) {
                        out.push((g, e));
                    }
                }
            }
        }
        out
    }
}
