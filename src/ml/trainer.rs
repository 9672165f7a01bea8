// ============================================================
// Layer 5 - Training Loop
// ============================================================
// One step, strictly in this order:
//   1. forward pass + mean cross-entropy on the batch
//   2. loss.backward() through every parameter
//   3. Adam update of the whole model
//
// The loss printed every `report_every` steps is the one from
// step 1, i.e. measured on the batch before it is trained on.
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use anyhow::{Context, Result};
use burn::{
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::backend::AutodiffBackend,
};
use rand::{rngs::StdRng, SeedableRng};

use crate::data::{
    batcher::{TopicBatch, TopicBatcher},
    dataset::TopicDataset,
    sampler::BatchPolicy,
};
use crate::domain::error::ClassifierError;
use crate::infra::metrics::MetricsLogger;
use crate::ml::model::ClassifierModel;

#[derive(Debug, Clone, Copy)]
pub struct TrainingSettings {
    pub policy:       BatchPolicy,
    pub lr:           f64,
    pub report_every: usize,
    pub seed:         u64,
}

pub struct TrainingOutcome<B: AutodiffBackend> {
    pub model:     ClassifierModel<B>,
    pub steps:     usize,
    pub last_loss: Option<f64>,
}

/// Adam with TensorFlow's epsilon.
/// m = β1*m + (1-β1)*g, v = β2*v + (1-β2)*g², θ -= lr * m / (√v + ε)
pub fn adam<B: AutodiffBackend>() -> impl Optimizer<ClassifierModel<B>, B> {
    AdamConfig::new()
        .with_epsilon(1e-8)
        .init::<B, ClassifierModel<B>>()
}

/// Run one forward/backward/update cycle.
/// Returns the updated model and the loss measured before the update.
pub fn train_step<B, O>(
    model: ClassifierModel<B>,
    optim: &mut O,
    batch: TopicBatch<B>,
    lr:    f64,
) -> Result<(ClassifierModel<B>, f64), ClassifierError>
where
    B: AutodiffBackend,
    O: Optimizer<ClassifierModel<B>, B>,
{
    let (loss, _) = model.forward_loss(batch.tokens, batch.targets)?;
    let loss_val: f64 = loss.clone().into_scalar().elem::<f64>();

    let grads = loss.backward();
    let grads = GradientsParams::from_grads(grads, &model);
    Ok((optim.step(lr, model, grads), loss_val))
}

pub fn run_training<B: AutodiffBackend>(
    model:    ClassifierModel<B>,
    dataset:  &TopicDataset,
    settings: TrainingSettings,
    device:   &B::Device,
    metrics:  Option<&MetricsLogger>,
) -> Result<TrainingOutcome<B>> {
    let mut model = model;
    let mut optim = adam::<B>();
    let batcher   = TopicBatcher::<B>::new(device.clone());
    let mut rng   = StdRng::seed_from_u64(settings.seed);

    settings.policy.check(dataset.sample_count())?;
    if settings.report_every == 0 {
        return Err(ClassifierError::InvalidConfig("report_every must be positive".into()).into());
    }

    let total = settings.policy.total_steps(dataset.sample_count());
    if total == 0 {
        tracing::warn!(
            "Batch policy {:?} yields no steps for {} training samples",
            settings.policy,
            dataset.sample_count()
        );
    }
    tracing::info!("Training for {} steps ({:?})", total, settings.policy);
    println!("Training...\n");

    let mut last_loss = None;
    let mut steps     = 0usize;

    for step in settings.policy.schedule(dataset.sample_count(), &mut rng) {
        let items = dataset.gather(&step.indices)?;
        let batch = batcher.batch(&items);

        let (updated, loss) = train_step(model, &mut optim, batch, settings.lr)
            .with_context(|| format!("Training step {} failed", step.step))?;
        model     = updated;
        last_loss = Some(loss);
        steps    += 1;

        tracing::debug!("step={} epoch={} loss={:.6}", step.step, step.epoch, loss);

        if step.step % settings.report_every == 0 {
            println!("{} Loss: {:.6}", step.step, loss);
            if let Some(logger) = metrics {
                logger.log_step(step.step, step.epoch, loss)?;
            }
        }
    }

    tracing::info!("Training finished after {} steps", steps);
    Ok(TrainingOutcome { model, steps, last_loss })
}
