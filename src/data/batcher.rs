// ============================================================
// Layer 4 - Topic Batcher
// ============================================================
// Stacks prepared samples into the three tensors one training
// step needs:
//
//   tokens  [batch, max_length]   Int    → embedding lookup
//   targets [batch, num_classes]  Float  → cross-entropy
//   labels  [batch]               Int    → accuracy
//
// Samples are already padded to the same width, so batching is
// a flatten followed by a reshape:
//   [s1_t1, ..., s1_tT, s2_t1, ..., sN_tT] → [N, T]

use burn::prelude::*;

use crate::data::dataset::TopicSample;

#[derive(Debug, Clone)]
pub struct TopicBatch<B: Backend> {
    pub tokens:  Tensor<B, 2, Int>,
    pub targets: Tensor<B, 2>,
    pub labels:  Tensor<B, 1, Int>,
}

impl<B: Backend> TopicBatch<B> {
    pub fn size(&self) -> usize {
        self.tokens.dims()[0]
    }
}

/// Holds the target device so every batch lands on it.
#[derive(Clone, Debug)]
pub struct TopicBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> TopicBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }

    /// `items` must be non-empty and share one padded width.
    pub fn batch(&self, items: &[TopicSample]) -> TopicBatch<B> {
        let batch_size  = items.len();
        let seq_len     = items[0].tokens.len();
        let num_classes = items[0].target.len();

        let token_flat: Vec<i32> = items
            .iter()
            .flat_map(|s| s.tokens.iter().map(|&id| id as i32))
            .collect();
        let target_flat: Vec<f32> = items
            .iter()
            .flat_map(|s| s.target.iter().copied())
            .collect();
        let labels: Vec<i32> = items.iter().map(|s| s.label as i32).collect();

        let tokens = Tensor::<B, 1, Int>::from_ints(token_flat.as_slice(), &self.device)
            .reshape([batch_size, seq_len]);
        let targets = Tensor::<B, 1>::from_floats(target_flat.as_slice(), &self.device)
            .reshape([batch_size, num_classes]);
        let labels = Tensor::<B, 1, Int>::from_ints(labels.as_slice(), &self.device);

        TopicBatch { tokens, targets, labels }
    }
}
