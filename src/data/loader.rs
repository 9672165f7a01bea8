// ============================================================
// Layer 4 - Corpus Loader
// ============================================================
// Reads the pre-tokenised Reuters split from a directory:
//
//   <data_dir>/
//     train.jsonl   ← one labelled sequence per line
//     test.jsonl
//
// Line format (serde_json):
//   {"tokens": [1, 27, 595, 2], "label": 3}
//
// Blank lines are skipped. A malformed line aborts the load and
// the error names the file and the 1-based line number.

use anyhow::{Context, Result};
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use crate::domain::sample::{Corpus, LabeledSequence};
use crate::domain::traits::CorpusSource;

pub const TRAIN_FILE: &str = "train.jsonl";
pub const TEST_FILE:  &str = "test.jsonl";

/// Loads `train.jsonl` and `test.jsonl` from a directory.
pub struct JsonlCorpusLoader {
    dir: PathBuf,
}

impl JsonlCorpusLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl CorpusSource for JsonlCorpusLoader {
    fn load(&self) -> Result<Corpus> {
        let train = read_split(&self.dir.join(TRAIN_FILE))?;
        let test  = read_split(&self.dir.join(TEST_FILE))?;

        tracing::info!(
            "Loaded corpus from '{}': {} train, {} test",
            self.dir.display(),
            train.len(),
            test.len()
        );
        Ok(Corpus::new(train, test))
    }
}

/// Parse one JSON-lines split file.
fn read_split(path: &Path) -> Result<Vec<LabeledSequence>> {
    let file = File::open(path)
        .with_context(|| format!("Cannot open split file '{}'", path.display()))?;

    let mut samples = Vec::new();
    for (idx, line) in BufReader::new(file).lines().enumerate() {
        let line = line
            .with_context(|| format!("Cannot read '{}'", path.display()))?;
        if line.trim().is_empty() {
            continue;
        }

        let sample: LabeledSequence = serde_json::from_str(&line)
            .with_context(|| {
                format!("Malformed record at {}:{}", path.display(), idx + 1)
            })?;
        samples.push(sample);
    }

    tracing::debug!("Read {} records from '{}'", samples.len(), path.display());
    Ok(samples)
}
