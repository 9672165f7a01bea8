// ============================================================
// Layer 1 - CLI Arguments
// ============================================================
// Every flag of the single `train` run. Hyperparameter defaults
// match the reference Reuters configuration; `--attention`
// switches from the flatten baseline to the attention model.

use clap::{Args, ValueEnum};

use crate::application::train_use_case::{BatchingMode, TrainConfig};
use crate::data::preprocessor::OovPolicy;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum BatchingArg {
    /// Every step draws a fresh random batch
    Random,
    /// Ordered passes over the training set in full batches
    Sequential,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OovArg {
    /// Abort when a test id was never seen in training
    Fail,
    /// Map unseen ids to one reserved embedding row
    Reserve,
}

#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Use the bidirectional GRU with attention pooling
    #[arg(long)]
    pub attention: bool,

    /// Directory holding train.jsonl and test.jsonl
    #[arg(long, default_value = "data/reuters")]
    pub data_dir: String,

    /// Padded sequence length (default: longest sequence in the corpus)
    #[arg(long)]
    pub max_len: Option<usize>,

    #[arg(long, default_value_t = 46)]
    pub num_classes: usize,

    #[arg(long, default_value_t = 200)]
    pub embedding_dim: usize,

    /// GRU units per direction
    #[arg(long, default_value_t = 100)]
    pub hidden_size: usize,

    #[arg(long, default_value_t = 50)]
    pub attention_size: usize,

    /// Adam learning rate
    #[arg(long, default_value_t = 1e-4)]
    pub lr: f64,

    #[arg(long, default_value_t = 100)]
    pub batch_size: usize,

    #[arg(long, value_enum, default_value_t = BatchingArg::Random)]
    pub batching: BatchingArg,

    /// Steps for random batching
    #[arg(long, default_value_t = 1000)]
    pub iterations: usize,

    /// Passes for sequential batching
    #[arg(long, default_value_t = 1)]
    pub epochs: usize,

    /// Print the training loss every N steps
    #[arg(long, default_value_t = 100)]
    pub report_every: usize,

    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Keep attention off padding positions
    #[arg(long)]
    pub mask_padding: bool,

    #[arg(long, value_enum, default_value_t = OovArg::Fail)]
    pub oov: OovArg,

    /// Append step and evaluation metrics as CSV under this directory
    #[arg(long)]
    pub metrics_dir: Option<String>,
}

impl From<BatchingArg> for BatchingMode {
    fn from(a: BatchingArg) -> Self {
        match a {
            BatchingArg::Random     => BatchingMode::Random,
            BatchingArg::Sequential => BatchingMode::Sequential,
        }
    }
}

impl From<OovArg> for OovPolicy {
    fn from(a: OovArg) -> Self {
        match a {
            OovArg::Fail    => OovPolicy::Fail,
            OovArg::Reserve => OovPolicy::Reserve,
        }
    }
}

/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            data_dir:       a.data_dir,
            attention:      a.attention,
            max_len:        a.max_len,
            num_classes:    a.num_classes,
            embedding_dim:  a.embedding_dim,
            hidden_size:    a.hidden_size,
            attention_size: a.attention_size,
            lr:             a.lr,
            batch_size:     a.batch_size,
            batching:       a.batching.into(),
            iterations:     a.iterations,
            epochs:         a.epochs,
            report_every:   a.report_every,
            seed:           a.seed,
            mask_padding:   a.mask_padding,
            oov:            a.oov.into(),
            metrics_dir:    a.metrics_dir,
        }
    }
}
