// ============================================================
// Layer 2 - TrainUseCase
// ============================================================
// Orchestrates one full run, in order:
//
//   Step 1: Validate the configuration
//   Step 2: Load the train/test corpus         (Layer 4 - data)
//   Step 3: Size the vocabulary from train     (Layer 4 - data)
//   Step 4: Pad, truncate and one-hot          (Layer 4 - data)
//   Step 5: Build the classifier               (Layer 5 - ml)
//   Step 6: Train under the batch policy       (Layer 5 - ml)
//   Step 7: Evaluate on the test split         (Layer 5 - ml)
//   Step 8: Report / log metrics               (Layer 6 - infra)
//
// The defaults reproduce the reference Reuters run: 46 topics,
// 200-d embeddings, 100-unit GRUs, 50-d attention, Adam at 1e-4,
// 1000 random batches of 100, loss printed every 100 steps.

use anyhow::{Context, Result};
use burn::{module::AutodiffModule, prelude::*, tensor::backend::AutodiffBackend};
use serde::{Deserialize, Serialize};

use crate::data::{
    dataset::TopicDataset,
    loader::JsonlCorpusLoader,
    preprocessor::{OovPolicy, SequencePreparer, Vocabulary},
    sampler::BatchPolicy,
};
use crate::domain::{error::ClassifierError, sample::Corpus, traits::CorpusSource};
use crate::infra::metrics::MetricsLogger;
use crate::ml::{
    evaluator::{evaluate, Evaluation},
    model::{ClassifierConfig, Topology},
    trainer::{run_training, TrainingSettings},
};

type MyBackend = burn::backend::Autodiff<burn::backend::Wgpu>;

/// How training batches are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchingMode {
    /// `iterations` steps, each a fresh random batch
    Random,
    /// `epochs` ordered passes in full batches
    Sequential,
}

// ─── Training Configuration ──────────────────────────────────────────────────
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub data_dir:       String,
    pub attention:      bool,
    /// None → longest sequence across both splits
    pub max_len:        Option<usize>,
    pub num_classes:    usize,
    pub embedding_dim:  usize,
    pub hidden_size:    usize,
    pub attention_size: usize,
    pub lr:             f64,
    pub batch_size:     usize,
    pub batching:       BatchingMode,
    pub iterations:     usize,
    pub epochs:         usize,
    pub report_every:   usize,
    pub seed:           u64,
    pub mask_padding:   bool,
    pub oov:            OovPolicy,
    pub metrics_dir:    Option<String>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            data_dir:       "data/reuters".to_string(),
            attention:      false,
            max_len:        None,
            num_classes:    46,
            embedding_dim:  200,
            hidden_size:    100,
            attention_size: 50,
            lr:             1e-4,
            batch_size:     100,
            batching:       BatchingMode::Random,
            iterations:     1000,
            epochs:         1,
            report_every:   100,
            seed:           42,
            mask_padding:   false,
            oov:            OovPolicy::Fail,
            metrics_dir:    None,
        }
    }
}

impl TrainConfig {
    pub fn topology(&self) -> Topology {
        if self.attention { Topology::Attention } else { Topology::Flatten }
    }

    pub fn batch_policy(&self) -> BatchPolicy {
        match self.batching {
            BatchingMode::Random => BatchPolicy::RandomSample {
                iterations: self.iterations,
                batch_size: self.batch_size,
            },
            BatchingMode::Sequential => BatchPolicy::SequentialEpochs {
                epochs:     self.epochs,
                batch_size: self.batch_size,
            },
        }
    }

    pub fn validate(&self) -> Result<(), ClassifierError> {
        let positive = [
            ("batch_size", self.batch_size),
            ("report_every", self.report_every),
            ("num_classes", self.num_classes),
            ("embedding_dim", self.embedding_dim),
            ("hidden_size", self.hidden_size),
            ("attention_size", self.attention_size),
        ];
        for (name, value) in positive {
            if value == 0 {
                return Err(ClassifierError::InvalidConfig(format!("{name} must be positive")));
            }
        }
        if self.max_len == Some(0) {
            return Err(ClassifierError::InvalidConfig("max_len must be positive".into()));
        }
        if !(self.lr.is_finite() && self.lr > 0.0) {
            return Err(ClassifierError::InvalidConfig(format!("lr must be positive, got {}", self.lr)));
        }
        if self.mask_padding && !self.attention {
            tracing::warn!("--mask-padding has no effect without --attention");
        }
        Ok(())
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Load the corpus from `data_dir` and run on the Wgpu backend.
    pub fn execute(&self) -> Result<Evaluation> {
        self.config.validate()?;

        let loader = JsonlCorpusLoader::new(&self.config.data_dir);
        let corpus = loader
            .load()
            .with_context(|| format!("Cannot load corpus from '{}'", self.config.data_dir))?;

        let device = burn::backend::wgpu::WgpuDevice::default();
        tracing::info!("Using WGPU device: {:?}", device);
        self.run_with_corpus::<MyBackend>(corpus, &device)
    }

    /// Everything after loading, on any autodiff backend.
    pub fn run_with_corpus<B: AutodiffBackend>(
        &self,
        corpus: Corpus,
        device: &B::Device,
    ) -> Result<Evaluation> {
        let cfg = &self.config;
        cfg.validate()?;

        // ── Vocabulary and padded width ───────────────────────────────────────
        let vocabulary = Vocabulary::from_training(corpus.train_sequences(), cfg.oov)
            .context("Cannot size the vocabulary from the training split")?;
        let max_len = match cfg.max_len {
            Some(n) => n,
            None => match corpus.longest_sequence() {
                0 => return Err(ClassifierError::EmptyCorpus.into()),
                n => n,
            },
        };
        tracing::info!(
            "vocab_size={} max_len={} oov={:?}",
            vocabulary.size(),
            max_len,
            cfg.oov
        );

        // ── Prepare both splits up front ──────────────────────────────────────
        // An unseen test id fails here, before any training time is spent.
        let preparer = SequencePreparer::new(max_len, cfg.num_classes, vocabulary);
        let train = TopicDataset::new(
            preparer.prepare_all(&corpus.train).context("Cannot prepare training split")?,
        );
        let test = TopicDataset::new(
            preparer.prepare_all(&corpus.test).context("Cannot prepare test split")?,
        );

        // ── Model ─────────────────────────────────────────────────────────────
        let model_cfg = ClassifierConfig::new(vocabulary.size(), max_len, cfg.num_classes, cfg.topology())
            .with_embedding_dim(cfg.embedding_dim)
            .with_hidden_size(cfg.hidden_size)
            .with_attention_size(cfg.attention_size)
            .with_mask_padding(cfg.mask_padding);
        let model = model_cfg.init::<B>(device);
        tracing::info!(
            "Model ready: {:?}, {} parameters",
            model.topology(),
            model.num_params()
        );

        let metrics = cfg
            .metrics_dir
            .as_ref()
            .map(MetricsLogger::new)
            .transpose()?;

        // ── Train ─────────────────────────────────────────────────────────────
        let settings = TrainingSettings {
            policy:       cfg.batch_policy(),
            lr:           cfg.lr,
            report_every: cfg.report_every,
            seed:         cfg.seed,
        };
        let outcome = run_training(model, &train, settings, device, metrics.as_ref())?;
        if let Some(loss) = outcome.last_loss {
            tracing::info!("Final training batch loss after {} steps: {:.6}", outcome.steps, loss);
        }

        // ── Evaluate on the inner backend (no autodiff graph) ─────────────────
        let model_valid = outcome.model.valid();
        let evaluation  = evaluate(&model_valid, &test, cfg.batch_size, device)
            .context("Evaluation on the test split failed")?;

        println!();
        println!("Loss: {}", evaluation.loss);
        println!("Accuracy: {}", evaluation.accuracy);

        if let Some(logger) = &metrics {
            logger.log_evaluation(&evaluation)?;
        }
        Ok(evaluation)
    }
}
