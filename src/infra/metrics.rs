// ============================================================
// Layer 6 - Metrics Logger
// ============================================================
// Appends training and evaluation numbers to CSV files so loss
// curves can be plotted after a run:
//
//   <dir>/metrics.csv     step,epoch,loss          (one row per report)
//   <dir>/evaluation.csv  test_loss,test_accuracy,samples
//
// Headers are only written when a file is first created, so
// several runs can share one directory.

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use crate::ml::evaluator::Evaluation;

const STEP_HEADER: &str = "step,epoch,loss";
const EVAL_HEADER: &str = "test_loss,test_accuracy,samples";

pub struct MetricsLogger {
    steps_path: PathBuf,
    eval_path:  PathBuf,
}

impl MetricsLogger {
    /// Create the directory and any missing CSV headers.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir: PathBuf = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create metrics dir '{}'", dir.display()))?;

        let logger = Self {
            steps_path: dir.join("metrics.csv"),
            eval_path:  dir.join("evaluation.csv"),
        };
        write_header_if_new(&logger.steps_path, STEP_HEADER)?;
        write_header_if_new(&logger.eval_path, EVAL_HEADER)?;
        Ok(logger)
    }

    pub fn log_step(&self, step: usize, epoch: usize, loss: f64) -> Result<()> {
        append_row(&self.steps_path, &format!("{step},{epoch},{loss:.6}"))
    }

    pub fn log_evaluation(&self, eval: &Evaluation) -> Result<()> {
        append_row(
            &self.eval_path,
            &format!("{:.6},{:.6},{}", eval.loss, eval.accuracy, eval.samples),
        )?;
        tracing::debug!("Logged evaluation to '{}'", self.eval_path.display());
        Ok(())
    }

    pub fn steps_path(&self) -> &Path {
        &self.steps_path
    }
}

fn write_header_if_new(path: &Path, header: &str) -> Result<()> {
    if !path.exists() {
        let mut f = fs::File::create(path)
            .with_context(|| format!("Cannot create '{}'", path.display()))?;
        writeln!(f, "{header}")?;
        tracing::debug!("Created metrics CSV: '{}'", path.display());
    }
    Ok(())
}

fn append_row(path: &Path, row: &str) -> Result<()> {
    let mut f = OpenOptions::new()
        .append(true)
        .open(path)
        .with_context(|| format!("Cannot append to '{}'", path.display()))?;
    writeln!(f, "{row}")?;
    Ok(())
}
