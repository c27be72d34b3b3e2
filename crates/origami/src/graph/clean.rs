//! The consistency pass: merge, fragment, dedupe, then derive topology.
//!
//! Order matters:
//! 1. merge nodes closer than `eps_merge` (lowest index wins, others renumbered),
//! 2. drop edges that collapsed to a point,
//! 3. split edges at mutual crossings and at nodes lying in their interior
//!    (pieces inherit the payload), then merge/drop again,
//! 4. collapse edges joining the same node pair (higher precedence survives),
//! 5. derive junctions, sectors and bounded faces.

use std::cmp::Ordering;
use std::collections::HashMap;

use nalgebra::Vector2;

use super::types::{
    CleanReport, Edge, EdgeData, EdgeId, Face, Junction, JunctionId, Node, NodeId, Sector, SectorId,
};
use super::PlanarGraph;
use crate::geom2::{segment_segment, signed_area, GeomCfg, Segment};

impl<E: EdgeData> PlanarGraph<E> {
    /// Run the full pass and mark the graph clean.
    pub fn clean(&mut self, cfg: &GeomCfg) -> CleanReport {
        let mut report = CleanReport::default();
        report.merged_nodes += self.merge_nodes(cfg.eps_merge);
        report.removed_edges += self.drop_collapsed_edges();
        report.split_edges += self.fragment(cfg);
        report.merged_nodes += self.merge_nodes(cfg.eps_merge);
        report.removed_edges += self.drop_collapsed_edges();
        report.removed_edges += self.dedupe_edges();
        self.derive(cfg);
        self.clean = true;
        tracing::debug!(
            nodes = self.nodes.len(),
            edges = self.edges.len(),
            faces = self.faces.len(),
            merged = report.merged_nodes,
            split = report.split_edges,
            removed = report.removed_edges,
            "graph cleaned"
        );
        report
    }

    fn merge_nodes(&mut self, eps: f64) -> usize {
        let n = self.nodes.len();
        if n < 2 {
            return 0;
        }
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| {
            self.nodes[a]
                .pos
                .x
                .partial_cmp(&self.nodes[b].pos.x)
                .unwrap_or(Ordering::Equal)
        });
        let mut rank = vec![0usize; n];
        for (r, &i) in order.iter().enumerate() {
            rank[i] = r;
        }

        let mut rep: Vec<Option<usize>> = vec![None; n];
        for i in 0..n {
            if rep[i].is_some() {
                continue;
            }
            rep[i] = Some(i);
            let p = self.nodes[i].pos;
            let r = rank[i];
            let absorb = |j: usize, rep: &mut [Option<usize>]| {
                if rep[j].is_none() && (self.nodes[j].pos - p).norm() <= eps {
                    rep[j] = Some(i);
                }
            };
            for &j in order[r + 1..].iter() {
                if self.nodes[j].pos.x - p.x > eps {
                    break;
                }
                absorb(j, &mut rep);
            }
            for &j in order[..r].iter().rev() {
                if p.x - self.nodes[j].pos.x > eps {
                    break;
                }
                absorb(j, &mut rep);
            }
        }

        let merged = rep.iter().enumerate().filter(|(i, r)| **r != Some(*i)).count();
        if merged == 0 {
            return 0;
        }
        // new index for each representative, in original order
        let mut new_index = vec![None; n];
        let mut next = 0;
        for i in 0..n {
            if rep[i] == Some(i) {
                new_index[i] = Some(next);
                next += 1;
            }
        }
        for e in &mut self.edges {
            for k in 0..2 {
                let old = e.nodes[k].0;
                let r = rep[old].unwrap_or(old);
                e.nodes[k] = NodeId(new_index[r].unwrap_or(r));
            }
        }
        let old = std::mem::take(&mut self.nodes);
        self.nodes = old
            .into_iter()
            .zip(&new_index)
            .filter_map(|(node, m)| m.map(|_| node))
            .collect();
        merged
    }

    fn drop_collapsed_edges(&mut self) -> usize {
        let before = self.edges.len();
        self.edges.retain(|e| e.nodes[0] != e.nodes[1]);
        before - self.edges.len()
    }

    /// Split edges at crossings and at interior nodes; returns the number of edges split.
    fn fragment(&mut self, cfg: &GeomCfg) -> usize {
        let tol = cfg.eps_merge;
        let segs: Vec<Segment> = self
            .edges
            .iter()
            .map(|e| Segment::new(self.nodes[e.nodes[0].0].pos, self.nodes[e.nodes[1].0].pos))
            .collect();
        let boxes: Vec<(Vector2<f64>, Vector2<f64>)> = segs
            .iter()
            .map(|s| (s.a.inf(&s.b), s.a.sup(&s.b)))
            .collect();
        let overlaps = |a: &(Vector2<f64>, Vector2<f64>), b: &(Vector2<f64>, Vector2<f64>)| {
            a.0.x <= b.1.x + tol && b.0.x <= a.1.x + tol && a.0.y <= b.1.y + tol && b.0.y <= a.1.y + tol
        };

        let mut cuts: Vec<Vec<(f64, NodeId)>> = vec![Vec::new(); self.edges.len()];
        let existing = self.nodes.len();

        for i in 0..segs.len() {
            for j in (i + 1)..segs.len() {
                if !overlaps(&boxes[i], &boxes[j]) {
                    continue;
                }
                let (ei, ej) = (&self.edges[i], &self.edges[j]);
                if ei.touches(ej.nodes[0]) || ei.touches(ej.nodes[1]) {
                    continue;
                }
                let Some(p) = segment_segment(&segs[i], &segs[j], cfg.eps) else {
                    continue;
                };
                let near_end = |s: &Segment| (p - s.a).norm() <= tol || (p - s.b).norm() <= tol;
                // T-junctions are picked up by the node pass below
                if near_end(&segs[i]) || near_end(&segs[j]) {
                    continue;
                }
                self.nodes.push(Node { pos: p });
                let id = NodeId(self.nodes.len() - 1);
                cuts[i].push((param(&segs[i], p), id));
                cuts[j].push((param(&segs[j], p), id));
            }
        }

        for (ni, node) in self.nodes.iter().enumerate().take(existing) {
            let p = node.pos;
            for (ei, e) in self.edges.iter().enumerate() {
                let b = &boxes[ei];
                if p.x < b.0.x - tol || p.x > b.1.x + tol || p.y < b.0.y - tol || p.y > b.1.y + tol {
                    continue;
                }
                if e.touches(NodeId(ni)) {
                    continue;
                }
                let s = &segs[ei];
                if s.distance_to(p) > tol {
                    continue;
                }
                if (p - s.a).norm() <= tol || (p - s.b).norm() <= tol {
                    continue;
                }
                cuts[ei].push((param(s, p), NodeId(ni)));
            }
        }

        let mut split = 0;
        let old = std::mem::take(&mut self.edges);
        for (e, mut c) in old.into_iter().zip(cuts) {
            if c.is_empty() {
                self.edges.push(e);
                continue;
            }
            split += 1;
            c.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
            let mut prev = e.nodes[0];
            for (_, n) in c {
                if n != prev {
                    self.edges.push(Edge {
                        nodes: [prev, n],
                        data: e.data.clone(),
                    });
                    prev = n;
                }
            }
            self.edges.push(Edge {
                nodes: [prev, e.nodes[1]],
                data: e.data,
            });
        }
        split
    }

    fn dedupe_edges(&mut self) -> usize {
        let mut seen: HashMap<(usize, usize), usize> = HashMap::new();
        let mut out: Vec<Edge<E>> = Vec::with_capacity(self.edges.len());
        let before = self.edges.len();
        for e in std::mem::take(&mut self.edges) {
            let (a, b) = (e.nodes[0].0, e.nodes[1].0);
            let key = (a.min(b), a.max(b));
            match seen.get(&key) {
                Some(&k) => {
                    if e.data.precedence() > out[k].data.precedence() {
                        out[k].data = e.data;
                    }
                }
                None => {
                    seen.insert(key, out.len());
                    out.push(e);
                }
            }
        }
        self.edges = out;
        before - self.edges.len()
    }

    /// Junctions, sectors and faces from the current nodes and edges.
    fn derive(&mut self, cfg: &GeomCfg) {
        let n = self.nodes.len();
        // outgoing half-edges per node, clockwise (descending angle);
        // half-edge 2e runs nodes[0] → nodes[1], 2e+1 the reverse
        let mut around: Vec<Vec<(f64, usize)>> = vec![Vec::new(); n];
        for (ei, e) in self.edges.iter().enumerate() {
            let (a, b) = (self.nodes[e.nodes[0].0].pos, self.nodes[e.nodes[1].0].pos);
            let d = b - a;
            around[e.nodes[0].0].push((d.y.atan2(d.x), 2 * ei));
            around[e.nodes[1].0].push(((-d.y).atan2(-d.x), 2 * ei + 1));
        }
        for list in &mut around {
            list.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
        }

        self.junctions.clear();
        self.sectors.clear();
        self.node_junction = vec![None; n];
        for (ni, list) in around.iter().enumerate() {
            if list.is_empty() {
                continue;
            }
            let edges: Vec<EdgeId> = list.iter().map(|&(_, h)| EdgeId(h / 2)).collect();
            let k = edges.len();
            let sectors = (0..k)
                .map(|i| {
                    self.sectors.push(Sector {
                        origin: NodeId(ni),
                        edges: [edges[i], edges[(i + 1) % k]],
                    });
                    SectorId(self.sectors.len() - 1)
                })
                .collect();
            self.node_junction[ni] = Some(JunctionId(self.junctions.len()));
            self.junctions.push(Junction {
                origin: NodeId(ni),
                edges,
                sectors,
            });
        }

        // half-edge walk: after arriving at v, leave along the edge clockwise-next
        // to the one we came in on; bounded faces come out counter-clockwise
        let halves = 2 * self.edges.len();
        let mut slot = vec![(0usize, 0usize); halves];
        for (ni, list) in around.iter().enumerate() {
            for (pos, &(_, h)) in list.iter().enumerate() {
                slot[h] = (ni, pos);
            }
        }
        let mut visited = vec![false; halves];
        self.faces.clear();
        for start in 0..halves {
            if visited[start] {
                continue;
            }
            let mut face = Face::default();
            let mut h = start;
            while !visited[h] {
                visited[h] = true;
                face.nodes.push(NodeId(slot[h].0));
                face.edges.push(EdgeId(h / 2));
                let (v, pos) = slot[h ^ 1];
                let list = &around[v];
                h = list[(pos + 1) % list.len()].1;
            }
            let poly: Vec<Vector2<f64>> = face.nodes.iter().map(|id| self.nodes[id.0].pos).collect();
            if signed_area(&poly) > cfg.eps {
                self.faces.push(face);
            }
        }
    }
}

/// Position of `p` along `s` as a fraction of its length.
fn param(s: &Segment, p: Vector2<f64>) -> f64 {
    let v = s.vector();
    let l2 = v.norm_squared();
    if l2 == 0.0 {
        0.0
    } else {
        (p - s.a).dot(&v) / l2
    }
}
