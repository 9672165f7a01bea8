// ============================================================
// Layer 5 - Held-out Evaluation
// ============================================================
// Scores a model on a whole split, batch by batch. Intended for
// `model.valid()`, i.e. the inner backend without autodiff.
//
// The split is cut into consecutive chunks of `batch_size`; unlike
// sequential training, the last partial chunk is included. Each
// chunk's mean loss is weighted by its size so the reported loss
// is the mean over every example.

use burn::prelude::*;

use crate::data::{batcher::TopicBatcher, dataset::TopicDataset};
use crate::domain::error::ClassifierError;
use crate::ml::model::{count_correct, ClassifierModel};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub loss:     f64,
    pub accuracy: f64,
    pub samples:  usize,
}

pub fn evaluate<B: Backend>(
    model:      &ClassifierModel<B>,
    dataset:    &TopicDataset,
    batch_size: usize,
    device:     &B::Device,
) -> Result<Evaluation, ClassifierError> {
    let batcher = TopicBatcher::<B>::new(device.clone());
    let total   = dataset.sample_count();
    let chunk   = batch_size.max(1);

    let mut loss_sum = 0.0f64;
    let mut correct  = 0usize;

    let mut start = 0;
    while start < total {
        let end     = (start + chunk).min(total);
        let indices: Vec<usize> = (start..end).collect();
        let batch   = batcher.batch(&dataset.gather(&indices)?);
        let size    = batch.size();

        let (loss, logits) = model.forward_loss(batch.tokens, batch.targets)?;
        loss_sum += loss.into_scalar().elem::<f64>() * size as f64;
        correct  += count_correct(logits, batch.labels);

        start = end;
    }

    let evaluation = if total == 0 {
        Evaluation { loss: f64::NAN, accuracy: 0.0, samples: 0 }
    } else {
        Evaluation {
            loss:     loss_sum / total as f64,
            accuracy: correct as f64 / total as f64,
            samples:  total,
        }
    };

    tracing::debug!(
        "Evaluated {} samples: loss={:.4} acc={:.4}",
        evaluation.samples,
        evaluation.loss,
        evaluation.accuracy
    );
    Ok(evaluation)
}
