//! Print a flat-foldability summary of the classic bases and the SVG of one.
//!
//! Usage:
//!   cargo run -p origami --example bases
//!   cargo run -p origami --example bases -- bird

use origami::{Base, CreasePattern, Orientation, SvgCfg};

fn main() -> origami::Result<()> {
    for base in Base::ALL {
        let cp = CreasePattern::base(base)?;
        println!(
            "{base:>5}: nodes={:>3} M={:>2} V={:>2} faces={:>3} flat_foldable={}",
            cp.graph().node_count(),
            cp.count(Orientation::Mountain),
            cp.count(Orientation::Valley),
            cp.graph().faces().len(),
            cp.flat_foldable()
        );
    }
    if let Some(name) = std::env::args().nth(1) {
        let base: Base = name.parse()?;
        let mut cp = CreasePattern::base(base)?;
        print!("{}", cp.export_svg(&SvgCfg::default()));
    }
    Ok(())
}
