use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use origami::prelude::*;
use provenance::{PatternSource, Sidecar, Step};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;

mod provenance;

#[derive(Parser)]
#[command(name = "cli")]
#[command(about = "Crease-pattern rendering, folding and checks")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

/// Where the pattern comes from: a FOLD file or a built-in base.
#[derive(Args, Debug)]
struct Source {
    /// FOLD document to import
    #[arg(long, conflicts_with = "base")]
    input: Option<PathBuf>,
    /// Built-in base: kite, fish, bird or frog
    #[arg(long)]
    base: Option<String>,
}

#[derive(Subcommand)]
enum Action {
    /// Render the pattern (or its folded state) to SVG
    Svg {
        #[command(flatten)]
        source: Source,
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value_t = 600.0)]
        size: f64,
        /// Render the folded state instead of the crease pattern
        #[arg(long)]
        folded: bool,
    },
    /// Write the pattern (or its folded state) as a FOLD document
    Fold {
        #[command(flatten)]
        source: Source,
        #[arg(long)]
        out: PathBuf,
        #[arg(long)]
        folded: bool,
    },
    /// Print a flat-foldability report as JSON
    Check {
        #[command(flatten)]
        source: Source,
    },
    /// Relax vertices towards Kawasaki and write the result
    Wiggle {
        #[command(flatten)]
        source: Source,
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value_t = 1)]
        rounds: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
}

fn main() -> Result<()> {
    SubscriberBuilder::default()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Svg {
            source,
            out,
            size,
            folded,
        } => svg(&source, &out, size, folded),
        Action::Fold {
            source,
            out,
            folded,
        } => fold(&source, &out, folded),
        Action::Check { source } => check(&source),
        Action::Wiggle {
            source,
            out,
            rounds,
            seed,
        } => wiggle(&source, &out, rounds, seed),
    }
}

fn load(source: &Source) -> Result<(CreasePattern, PatternSource)> {
    match (&source.input, &source.base) {
        (Some(path), _) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            let cp = CreasePattern::from_fold_str(&text)
                .with_context(|| format!("importing {}", path.display()))?;
            Ok((cp, PatternSource::Input(path.clone())))
        }
        (None, Some(name)) => {
            let base: Base = name.parse()?;
            Ok((CreasePattern::base(base)?, PatternSource::Base(base.to_string())))
        }
        (None, None) => bail!("either --input or --base is required"),
    }
}

/// Write `contents` to `out` (creating parent dirs) plus a sidecar describing `cp`.
fn emit(
    out: &Path,
    contents: &str,
    cp: &CreasePattern,
    origin: PatternSource,
    step: Step,
) -> Result<()> {
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    fs::write(out, contents).with_context(|| format!("writing {}", out.display()))?;
    let sidecar = Sidecar::describe(cp, origin, step, out).write()?;
    tracing::info!(out = %out.display(), sidecar = %sidecar.display(), "wrote");
    Ok(())
}

fn svg(source: &Source, out: &Path, size: f64, folded: bool) -> Result<()> {
    let (mut cp, origin) = load(source)?;
    let cfg = SvgCfg { size };
    let text = if folded {
        cp.fold_svg(None, &cfg)?
    } else {
        cp.export_svg(&cfg)
    };
    emit(out, &text, &cp, origin, Step::Svg { size, folded })
}

fn fold(source: &Source, out: &Path, folded: bool) -> Result<()> {
    let (mut cp, origin) = load(source)?;
    let doc = if folded {
        cp.fold(None)?
    } else {
        cp.export_fold()
    };
    emit(out, &doc.to_json()?, &cp, origin, Step::Fold { folded })
}

#[derive(Serialize)]
struct NodeReport {
    node: usize,
    x: f64,
    y: f64,
    kawasaki: bool,
    maekawa: bool,
    rating: Option<f64>,
}

#[derive(Serialize)]
struct CheckReport {
    nodes: usize,
    mountains: usize,
    valleys: usize,
    marks: usize,
    flat_foldable: bool,
    failing: Vec<NodeReport>,
}

fn check_report(cp: &CreasePattern) -> CheckReport {
    let eps = cp.cfg().eps_kawasaki;
    let failing: Vec<NodeReport> = cp
        .graph()
        .node_ids()
        .filter(|n| !cp.flat_foldable_node(*n))
        .map(|n| {
            let p = cp.graph().position(n);
            NodeReport {
                node: n.0,
                x: p.x,
                y: p.y,
                kawasaki: cp.kawasaki(n, eps),
                maekawa: cp.maekawa(n),
                rating: cp.kawasaki_rating(n),
            }
        })
        .collect();
    CheckReport {
        nodes: cp.graph().node_count(),
        mountains: cp.count(Orientation::Mountain),
        valleys: cp.count(Orientation::Valley),
        marks: cp.count(Orientation::Mark),
        flat_foldable: failing.is_empty(),
        failing,
    }
}

fn check(source: &Source) -> Result<()> {
    let (mut cp, _) = load(source)?;
    cp.clean();
    let report = check_report(&cp);
    tracing::info!(failing = report.failing.len(), "checked");
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn wiggle(source: &Source, out: &Path, rounds: usize, seed: u64) -> Result<()> {
    let (mut cp, origin) = load(source)?;
    let mut rng = StdRng::seed_from_u64(seed);
    let cfg = WiggleCfg::default();
    let mut total = 0;
    for round in 0..rounds {
        let moved = cp.wiggle(&cfg, &mut rng);
        tracing::info!(round, moved, "wiggle");
        total += moved;
        if moved == 0 {
            break;
        }
    }
    let doc = cp.export_fold();
    let step = Step::Wiggle {
        rounds,
        seed,
        moved: total,
    };
    emit(out, &doc.to_json()?, &cp, origin, step)
}
