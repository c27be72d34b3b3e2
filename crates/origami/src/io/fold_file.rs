//! FOLD interchange documents (2D subset).
//!
//! Export writes vertices, faces, edges and assignments of a clean pattern,
//! rounding coordinates to `GeomCfg::precision` decimals. Import validates
//! the whole document before touching the pattern, then rebuilds it.

use serde::{Deserialize, Serialize};

use nalgebra::Vector2;

use crate::boundary::ConvexPolygon;
use crate::error::{PatternError, Result};
use crate::geom2::{clean_number, signed_area, Segment};
use crate::graph::{CleanReport, Face, NodeId};
use crate::pattern::{CreasePattern, Orientation, PatternEvent};

pub const FILE_CREATOR: &str = "origami";

/// A FOLD document. Unknown keys are ignored on read.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FoldFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_spec: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_creator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_classes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_attributes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertices_coords: Option<Vec<Vec<f64>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faces_vertices: Option<Vec<Vec<usize>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edges_vertices: Option<Vec<Vec<usize>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edges_assignment: Option<Vec<String>>,
}

impl FoldFile {
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn is_3d(&self) -> bool {
        self.frame_attributes
            .as_ref()
            .is_some_and(|a| a.iter().any(|s| s == "3D"))
    }
}

/// Clip non-border edges to the sheet. Endpoints outside are replaced by new
/// vertices on the chord and edges missing the sheet are dropped. Returns
/// whether anything changed.
fn clip_to_sheet(
    poly: &ConvexPolygon,
    points: &mut Vec<Vector2<f64>>,
    edges: &mut Vec<(usize, usize, Orientation)>,
    eps: f64,
) -> bool {
    let before = edges.len();
    let mut moved = false;
    edges.retain_mut(|(a, b, o)| {
        if *o == Orientation::Border {
            return true;
        }
        let (pa, pb) = (points[*a], points[*b]);
        if poly.contains(pa, eps) && poly.contains(pb, eps) {
            return true;
        }
        let Some(chord) = poly.clip_segment(&Segment::new(pa, pb), eps) else {
            tracing::warn!(a = *a, b = *b, "dropping edge outside the sheet");
            return false;
        };
        if (chord.a - pa).norm() > eps {
            points.push(chord.a);
            *a = points.len() - 1;
        }
        if (chord.b - pb).norm() > eps {
            points.push(chord.b);
            *b = points.len() - 1;
        }
        moved = true;
        true
    });
    moved || edges.len() != before
}

impl CreasePattern {
    /// Clean, then describe the pattern as a FOLD document.
    pub fn export_fold(&mut self) -> FoldFile {
        self.clean();
        self.to_fold()
    }

    /// Describe the current state as-is (no clean pass).
    pub fn to_fold(&self) -> FoldFile {
        let places = self.cfg().precision;
        let g = self.graph();
        FoldFile {
            file_spec: Some(serde_json::Value::from(1)),
            file_creator: Some(FILE_CREATOR.to_string()),
            file_author: Some(String::new()),
            file_classes: Some(vec!["singleModel".to_string()]),
            frame_attributes: Some(vec!["2D".to_string()]),
            vertices_coords: Some(
                g.nodes()
                    .iter()
                    .map(|n| vec![clean_number(n.pos.x, places), clean_number(n.pos.y, places)])
                    .collect(),
            ),
            faces_vertices: Some(
                g.faces()
                    .iter()
                    .map(|f| f.nodes.iter().map(|n| n.0).collect())
                    .collect(),
            ),
            edges_vertices: Some(
                g.edges()
                    .iter()
                    .map(|e| vec![e.nodes[0].0, e.nodes[1].0])
                    .collect(),
            ),
            edges_assignment: Some(
                g.edges()
                    .iter()
                    .map(|e| e.data.orientation.assignment().to_string())
                    .collect(),
            ),
        }
    }

    /// A fresh pattern (default tolerances) built from a FOLD document string.
    pub fn from_fold_str(json: &str) -> Result<Self> {
        let doc = FoldFile::from_json(json)?;
        let mut cp = CreasePattern::new();
        cp.import_fold(&doc)?;
        Ok(cp)
    }

    /// Replace this pattern's contents with `doc`.
    ///
    /// Fails without modifying anything when vertex coordinates or edge
    /// lists are missing, a vertex has fewer than two coordinates, or no
    /// sheet outline can be derived. Edges with unresolved endpoints are
    /// skipped. Creases overhanging the derived outline are clipped to it.
    /// Explicit faces are kept when neither clipping nor the clean pass
    /// changes the vertex and edge numbering; otherwise faces are derived.
    pub fn import_fold(&mut self, doc: &FoldFile) -> Result<()> {
        let coords = doc
            .vertices_coords
            .as_ref()
            .ok_or(PatternError::MissingField("vertices_coords"))?;
        let edges = doc
            .edges_vertices
            .as_ref()
            .ok_or(PatternError::MissingField("edges_vertices"))?;
        if doc.is_3d() {
            tracing::warn!("document is marked 3D; projecting onto the xy-plane");
        }
        let mut points = coords
            .iter()
            .enumerate()
            .map(|(i, c)| match c.as_slice() {
                [x, y, ..] => Ok(Vector2::new(*x, *y)),
                _ => Err(PatternError::MalformedVertex(i)),
            })
            .collect::<Result<Vec<_>>>()?;

        let assignment = |i: usize| {
            doc.edges_assignment
                .as_ref()
                .and_then(|a| a.get(i))
                .map_or(Orientation::Mark, |s| Orientation::from_assignment(s))
        };
        let mut resolved: Vec<(usize, usize, Orientation)> = edges
            .iter()
            .enumerate()
            .filter_map(|(i, e)| match e.as_slice() {
                [a, b] if *a < points.len() && *b < points.len() => Some((*a, *b, assignment(i))),
                _ => {
                    tracing::warn!(edge = i, "skipping edge with unresolved vertices");
                    None
                }
            })
            .collect();

        let border: Vec<Vector2<f64>> = resolved
            .iter()
            .filter(|(_, _, o)| *o == Orientation::Border)
            .flat_map(|(a, b, _)| [points[*a], points[*b]])
            .collect();
        let outline = if border.is_empty() { &points } else { &border };
        let poly = ConvexPolygon::from_points(outline, self.cfg().eps_merge)?;

        let eps = self.cfg().eps_merge;
        let clipped = clip_to_sheet(&poly, &mut points, &mut resolved, eps);

        // validated; rebuild
        self.rebuild_from(poly, &points, &resolved, border.is_empty());
        if clipped {
            self.graph_mut().remove_isolated_nodes();
        }
        let report = self.clean();
        if !clipped && report == CleanReport::default() {
            let explicit = doc
                .faces_vertices
                .as_ref()
                .and_then(|f| self.explicit_faces(f));
            if let Some(faces) = explicit {
                self.graph_mut().set_faces(faces);
            }
        }
        self.notify(PatternEvent::Imported);
        Ok(())
    }

    /// Faces from vertex lists; `None` if any list is not a cycle of edges.
    fn explicit_faces(&self, lists: &[Vec<usize>]) -> Option<Vec<Face>> {
        let g = self.graph();
        lists
            .iter()
            .map(|list| {
                if list.len() < 3 || list.iter().any(|i| *i >= g.node_count()) {
                    return None;
                }
                let mut nodes: Vec<NodeId> = list.iter().map(|i| NodeId(*i)).collect();
                let poly: Vec<Vector2<f64>> = nodes.iter().map(|n| g.position(*n)).collect();
                if signed_area(&poly) < 0.0 {
                    nodes.reverse();
                }
                let k = nodes.len();
                let edges = (0..k)
                    .map(|i| g.edge_between(nodes[i], nodes[(i + 1) % k]))
                    .collect::<Option<Vec<_>>>()?;
                Some(Face { nodes, edges })
            })
            .collect()
    }
}
