// ============================================================
// Layer 4 - Batch Policies
// ============================================================
// Two ways of walking the training set, both producing a stream
// of index batches:
//
//   RandomSample     - every step draws `batch_size` distinct
//                      indices uniformly at random; repeated for
//                      a fixed number of iterations.
//
//   SequentialEpochs - each epoch slices the set in order into
//                      non-overlapping batches. Only full batches
//                      are produced: 250 samples at batch 100
//                      gives 2 batches and the last 50 are never
//                      seen.
//
// Sampling without replacement uses rand::seq::index::sample,
// so a random batch can never be larger than the training set;
// `BatchPolicy::check` rejects that before any step is drawn.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::error::ClassifierError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchPolicy {
    RandomSample     { iterations: usize, batch_size: usize },
    SequentialEpochs { epochs: usize,     batch_size: usize },
}

/// One scheduled step: which samples to train on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchStep {
    /// 0-based global step counter
    pub step:    usize,
    /// 0-based epoch (always 0 for random sampling)
    pub epoch:   usize,
    pub indices: Vec<usize>,
}

impl BatchPolicy {
    pub fn batch_size(&self) -> usize {
        match *self {
            BatchPolicy::RandomSample { batch_size, .. }     => batch_size,
            BatchPolicy::SequentialEpochs { batch_size, .. } => batch_size,
        }
    }

    /// Fails when a random batch cannot be drawn without replacement
    /// from `len` samples.
    pub fn check(&self, len: usize) -> Result<(), ClassifierError> {
        let batch_size = self.batch_size();
        if batch_size == 0 {
            return Err(ClassifierError::InvalidConfig("batch_size must be positive".into()));
        }
        if let BatchPolicy::RandomSample { .. } = self {
            if len > 0 && batch_size > len {
                return Err(ClassifierError::InvalidConfig(format!(
                    "random batches of {batch_size} need at least {batch_size} training samples, got {len}"
                )));
            }
        }
        Ok(())
    }

    /// Number of steps the schedule yields for a training set of `len`.
    pub fn total_steps(&self, len: usize) -> usize {
        match *self {
            BatchPolicy::RandomSample { iterations, .. } => {
                if len == 0 { 0 } else { iterations }
            }
            BatchPolicy::SequentialEpochs { epochs, batch_size } => {
                epochs * full_batches(len, batch_size)
            }
        }
    }

    pub fn schedule<'r, R: Rng>(&self, len: usize, rng: &'r mut R) -> BatchSchedule<'r, R> {
        BatchSchedule {
            policy: *self,
            len,
            rng,
            step:  0,
            total: self.total_steps(len),
        }
    }
}

/// `len / batch_size`: the remainder never forms a batch.
pub fn full_batches(len: usize, batch_size: usize) -> usize {
    if batch_size == 0 { 0 } else { len / batch_size }
}

/// `amount` distinct indices from `0..len`; `amount <= len`.
pub fn sample_without_replacement<R: Rng>(rng: &mut R, len: usize, amount: usize) -> Vec<usize> {
    rand::seq::index::sample(rng, len, amount).into_vec()
}

// ─── BatchSchedule ────────────────────────────────────────────────────────────
pub struct BatchSchedule<'r, R: Rng> {
    policy: BatchPolicy,
    len:    usize,
    rng:    &'r mut R,
    step:   usize,
    total:  usize,
}

impl<R: Rng> Iterator for BatchSchedule<'_, R> {
    type Item = BatchStep;

    fn next(&mut self) -> Option<BatchStep> {
        if self.step >= self.total {
            return None;
        }
        let step = self.step;
        self.step += 1;

        let (epoch, indices) = match self.policy {
            BatchPolicy::RandomSample { batch_size, .. } => {
                (0, sample_without_replacement(&mut *self.rng, self.len, batch_size))
            }
            BatchPolicy::SequentialEpochs { batch_size, .. } => {
                let per_epoch = full_batches(self.len, batch_size);
                let b         = step % per_epoch;
                (step / per_epoch, (b * batch_size..(b + 1) * batch_size).collect())
            }
        };
        Some(BatchStep { step, epoch, indices })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.total - self.step;
        (left, Some(left))
    }
}
