// ============================================================
// Layer 3 - Error Taxonomy
// ============================================================
// Every failure here is fatal for a training run: the data and
// ml layers return these, the application layer wraps them in
// anyhow context and main exits non-zero.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifierError {
    /// A tensor width disagrees with the parameter it is multiplied by
    #[error("dimension mismatch in {context}: expected {expected}, got {actual}")]
    DimensionMismatch {
        context:  &'static str,
        expected: usize,
        actual:   usize,
    },

    #[error("token id {token} is outside the vocabulary (size {vocab_size})")]
    TokenOutOfRange { token: u32, vocab_size: usize },

    #[error("label {label} is outside [0, {num_classes})")]
    LabelOutOfRange { label: usize, num_classes: usize },

    #[error("sample index {index} is outside a split of {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("training corpus contains no tokens")]
    EmptyCorpus,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
