//! Provenance sidecars: `<stem>.provenance.json` next to every written file.
//!
//! A sidecar records which pattern was loaded, what the command did to it,
//! and the state it was written in (crease totals by orientation,
//! flat-foldability, export precision), so an artifact can be traced back
//! without rerunning anything.

use anyhow::{Context, Result};
use origami::{CreasePattern, Orientation};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Where the pattern came from.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternSource {
    Base(String),
    Input(PathBuf),
}

/// The command that produced the artifact and its options.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Step {
    Svg { size: f64, folded: bool },
    Fold { folded: bool },
    Wiggle { rounds: usize, seed: u64, moved: usize },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CreaseCounts {
    pub border: usize,
    pub mountain: usize,
    pub valley: usize,
    pub mark: usize,
}

impl CreaseCounts {
    pub fn of(cp: &CreasePattern) -> Self {
        Self {
            border: cp.count(Orientation::Border),
            mountain: cp.count(Orientation::Mountain),
            valley: cp.count(Orientation::Valley),
            mark: cp.count(Orientation::Mark),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct Sidecar {
    pub code_rev: String,
    pub origami: &'static str,
    pub source: PatternSource,
    pub step: Step,
    pub precision: u32,
    pub creases: CreaseCounts,
    pub flat_foldable: bool,
    pub output: PathBuf,
}

impl Sidecar {
    /// Describe `cp` as it is being written to `output`.
    pub fn describe(cp: &CreasePattern, source: PatternSource, step: Step, output: &Path) -> Self {
        Self {
            code_rev: code_rev(),
            origami: origami::VERSION,
            source,
            step,
            precision: cp.cfg().precision,
            creases: CreaseCounts::of(cp),
            flat_foldable: cp.flat_foldable(),
            output: output.to_path_buf(),
        }
    }

    /// Write next to `output`; returns the sidecar path.
    pub fn write(&self) -> Result<PathBuf> {
        let path = sidecar_path(&self.output);
        fs::write(&path, serde_json::to_vec_pretty(self)?)
            .with_context(|| format!("writing {}", path.display()))?;
        Ok(path)
    }
}

fn sidecar_path(artifact: &Path) -> PathBuf {
    artifact.with_extension("provenance.json")
}

/// `GIT_COMMIT` (build time, then run time), else `git rev-parse`, else "unknown".
fn code_rev() -> String {
    option_env!("GIT_COMMIT")
        .map(str::to_string)
        .filter(|s| !s.is_empty())
        .or_else(|| std::env::var("GIT_COMMIT").ok().filter(|s| !s.is_empty()))
        .or_else(|| {
            let out = Command::new("git").args(["rev-parse", "HEAD"]).output().ok()?;
            out.status
                .success()
                .then(|| String::from_utf8_lossy(&out.stdout).trim().to_string())
        })
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use origami::Base;
    use serde_json::Value;
    use tempfile::tempdir;

    #[test]
    fn sidecar_replaces_the_extension() {
        assert_eq!(
            sidecar_path(Path::new("/tmp/output/frog.svg")),
            Path::new("/tmp/output/frog.provenance.json")
        );
        assert_eq!(
            sidecar_path(Path::new("out/frog")),
            Path::new("out/frog.provenance.json")
        );
    }

    #[test]
    fn sidecar_records_source_step_and_pattern_state() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("bird.fold");
        let mut cp = CreasePattern::base(Base::Bird).unwrap();
        cp.clean();
        let sidecar = Sidecar::describe(
            &cp,
            PatternSource::Base("bird".to_string()),
            Step::Fold { folded: false },
            &out,
        );
        let path = sidecar.write().unwrap();
        assert_eq!(path, dir.path().join("bird.provenance.json"));

        let parsed: Value = serde_json::from_slice(&fs::read(path).unwrap()).unwrap();
        assert_eq!(parsed["source"]["base"], "bird");
        assert_eq!(parsed["step"]["command"], "fold");
        assert_eq!(parsed["step"]["folded"], false);
        assert_eq!(parsed["origami"], origami::VERSION);
        assert_eq!(parsed["precision"], 12);
        assert_eq!(parsed["flat_foldable"], true);
        assert_eq!(
            parsed["creases"]["mountain"],
            cp.count(Orientation::Mountain)
        );
        assert!(parsed["creases"]["border"].as_u64().unwrap() >= 4);
    }
}
