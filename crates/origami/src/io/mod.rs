//! Interchange: FOLD documents, SVG output and the classic base fixtures.
//!
//! Export entry points (`export_fold`, `export_svg`, `fold`, `fold_svg`)
//! clean the pattern first; the `to_*` variants serialise state as-is.

pub mod bases;
pub mod fold_file;
pub mod svg;

pub use bases::Base;
pub use fold_file::{FoldFile, FILE_CREATOR};
pub use svg::SvgCfg;

use crate::error::Result;
use crate::graph::FaceId;
use crate::pattern::CreasePattern;

impl CreasePattern {
    /// Folded state as a FOLD document; `self` is cleaned but not folded.
    pub fn fold(&mut self, anchor: Option<FaceId>) -> Result<FoldFile> {
        self.clean();
        Ok(self.folded(anchor)?.to_fold())
    }

    /// Folded state rendered to SVG; `self` is cleaned but not folded.
    pub fn fold_svg(&mut self, anchor: Option<FaceId>, cfg: &SvgCfg) -> Result<String> {
        self.clean();
        Ok(self.folded(anchor)?.to_svg(cfg))
    }
}
