//! SVG rendering of a crease pattern.
//!
//! One `<line>` per crease, grouped by orientation in the fixed layer order
//! other, marks, valley, mountain, boundary. Empty layers are omitted.
//! Coordinates are shifted to the bounding box origin and scaled so the
//! box is `SvgCfg::size` pixels wide; stroke width and the valley dash length
//! follow that scale.

use std::fmt::Write;

use nalgebra::Vector2;

use super::fold_file::FILE_CREATOR;
use crate::geom2::clean_number;
use crate::graph::Edge;
use crate::pattern::{Crease, CreasePattern, Orientation};

const NO_STYLE: &str = r##"stroke="#000000" "##;
const MOUNTAIN_STYLE: &str = r##"stroke="#EE1032" "##;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SvgCfg {
    /// Output width in pixels.
    pub size: f64,
}

impl Default for SvgCfg {
    fn default() -> Self {
        Self { size: 600.0 }
    }
}

/// Layer name and the orientation it collects (`None` is the catch-all).
const LAYERS: [(&str, Option<Orientation>); 5] = [
    ("other", None),
    ("marks", Some(Orientation::Mark)),
    ("valley", Some(Orientation::Valley)),
    ("mountain", Some(Orientation::Mountain)),
    ("boundary", Some(Orientation::Border)),
];

impl CreasePattern {
    /// Clean, then render.
    pub fn export_svg(&mut self, cfg: &SvgCfg) -> String {
        self.clean();
        self.to_svg(cfg)
    }

    /// Render the current state as-is. A pattern without extent renders as
    /// an empty zero-sized document.
    pub fn to_svg(&self, cfg: &SvgCfg) -> String {
        let places = self.cfg().precision;
        let num = |x: f64| clean_number(x, places);
        let (origin, width, height) = match self.bounds() {
            Some(r) if r.width() > self.cfg().eps => (r.min, r.width(), r.height()),
            _ => (Vector2::zeros(), 0.0, 0.0),
        };
        let scale = if width > 0.0 { cfg.size / width } else { 0.0 };
        let dash = num(width * scale * 0.0025 * 4.0);
        let stroke = (width * scale * 0.0025 * 2.0).max(0.5);
        let stroke = num(stroke);
        let (w, h) = (num(width * scale), num(height * scale));

        let valley_style = format!(
            r##"stroke="#4379FF" stroke-linecap="round" stroke-dasharray="{dash},{dash}" "##
        );

        let mut out = String::new();
        out.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
        let _ = writeln!(out, "<!-- generated by {FILE_CREATOR} -->");
        let _ = writeln!(
            out,
            r#"<svg version="1.1" xmlns="http://www.w3.org/2000/svg" x="0px" y="0px" width="{w}px" height="{h}px" viewBox="0 0 {w} {h}">"#
        );

        let edges = self.graph().edges();
        for (name, orientation) in LAYERS {
            let members: Vec<&Edge<Crease>> = edges
                .iter()
                .filter(|e| orientation.is_some_and(|o| e.data.orientation == o))
                .collect();
            if members.is_empty() {
                continue;
            }
            let style = match orientation {
                Some(Orientation::Valley) => valley_style.as_str(),
                Some(Orientation::Mountain) => MOUNTAIN_STYLE,
                _ => NO_STYLE,
            };
            let _ = writeln!(out, "<g id=\"{name}\">");
            for e in members {
                let a = (self.graph().position(e.nodes[0]) - origin) * scale;
                let b = (self.graph().position(e.nodes[1]) - origin) * scale;
                let _ = writeln!(
                    out,
                    "\t<line {style}stroke-width=\"{stroke}\" x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\"/>",
                    num(a.x),
                    num(a.y),
                    num(b.x),
                    num(b.y)
                );
            }
            out.push_str("</g>\n");
        }
        out.push_str("</svg>\n");
        out
    }
}
