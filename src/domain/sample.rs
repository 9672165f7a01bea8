// ============================================================
// Layer 3 - Labelled Sequence Domain Types
// ============================================================
// A Reuters newswire arrives already tokenised: an ordered
// list of vocabulary ids plus one topic class id.
//
// Example:
//   tokens: [1, 27, 595, 2, 37]   (variable length)
//   label:  3                     (one of N_CLASSES topics)

use serde::{Deserialize, Serialize};

/// One tokenised document with its topic class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledSequence {
    /// Token ids in reading order, before padding or truncation
    pub tokens: Vec<u32>,

    /// Topic class id in `[0, num_classes)`
    pub label: usize,
}

#[cfg(test)]
impl LabeledSequence {
    pub fn new(tokens: Vec<u32>, label: usize) -> Self {
        Self { tokens, label }
    }
}

/// The pre-split dataset handed over by a `CorpusSource`.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    pub train: Vec<LabeledSequence>,
    pub test:  Vec<LabeledSequence>,
}

impl Corpus {
    pub fn new(train: Vec<LabeledSequence>, test: Vec<LabeledSequence>) -> Self {
        Self { train, test }
    }

    /// Length of the longest sequence across both splits.
    /// This is the default padded width when none is configured.
    pub fn longest_sequence(&self) -> usize {
        self.train
            .iter()
            .chain(self.test.iter())
            .map(|s| s.tokens.len())
            .max()
            .unwrap_or(0)
    }

    pub fn train_sequences(&self) -> impl Iterator<Item = &[u32]> {
        self.train.iter().map(|s| s.tokens.as_slice())
    }
}
