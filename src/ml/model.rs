// ============================================================
// Layer 5 - Topic Classifier Model
// ============================================================
// token ids [B, T]
//     │ TokenEmbedding
//     ▼
// embedded  [B, T, E]
//     │ SequenceEncoder (GRU, one or two directions)
//     ▼
// states    [B, T, H] or [B, T, 2H]
//     │ AttentionPooling           │ flatten
//     ▼                            ▼
// pooled    [B, 2H]           flat [B, T*H]
//     │ ClassificationHead
//     ▼
// logits    [B, N_CLASSES]  → softmax → probabilities
//
// The topology is fixed when the model is built:
//   Topology::Attention → bidirectional encoder + attention pooling
//   Topology::Flatten   → forward-only encoder + flattened states
// The flatten variant is the weaker baseline.

use burn::{
    prelude::*,
    tensor::activation::log_softmax,
};
use serde::{Deserialize, Serialize};

use crate::domain::error::ClassifierError;
use crate::ml::{
    attention::{AttentionPooling, AttentionPoolingConfig},
    embedding::{TokenEmbedding, TokenEmbeddingConfig},
    encoder::{SequenceEncoder, SequenceEncoderConfig},
    head::{ClassificationHead, ClassificationHeadConfig},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Topology {
    /// Single-direction GRU, every hidden state flattened into the head
    Flatten,
    /// Bidirectional GRU reduced by attention pooling
    Attention,
}

#[derive(Config, Debug)]
pub struct ClassifierConfig {
    pub vocab_size:  usize,
    pub max_length:  usize,
    pub num_classes: usize,
    pub topology:    Topology,
    #[config(default = 200)]
    pub embedding_dim: usize,
    #[config(default = 100)]
    pub hidden_size: usize,
    #[config(default = 50)]
    pub attention_size: usize,
    #[config(default = false)]
    pub mask_padding: bool,
}

impl ClassifierConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> ClassifierModel<B> {
        let embedding = TokenEmbeddingConfig::new(self.vocab_size, self.embedding_dim).init(device);

        let bidirectional = self.topology == Topology::Attention;
        let encoder = SequenceEncoderConfig::new(embedding.embedding_dim(), self.hidden_size)
            .with_bidirectional(bidirectional)
            .init(device);

        let (attention, head_input) = match self.topology {
            Topology::Attention => {
                let pooling = AttentionPoolingConfig::new(encoder.output_size(), self.attention_size)
                    .with_mask_padding(self.mask_padding)
                    .init(device);
                let width = pooling.d_input();
                (Some(pooling), width)
            }
            Topology::Flatten => (None, self.max_length * encoder.output_size()),
        };

        let head = ClassificationHeadConfig::new(head_input, self.num_classes).init(device);

        ClassifierModel { embedding, encoder, attention, head }
    }
}

#[derive(Module, Debug)]
pub struct ClassifierModel<B: Backend> {
    pub embedding: TokenEmbedding<B>,
    pub encoder:   SequenceEncoder<B>,
    /// Present exactly when the topology is `Attention`
    pub attention: Option<AttentionPooling<B>>,
    pub head:      ClassificationHead<B>,
}

impl<B: Backend> ClassifierModel<B> {
    pub fn topology(&self) -> Topology {
        if self.attention.is_some() { Topology::Attention } else { Topology::Flatten }
    }

    /// tokens: [batch, max_length] → logits [batch, num_classes]
    pub fn forward(&self, tokens: Tensor<B, 2, Int>) -> Result<Tensor<B, 2>, ClassifierError> {
        let embedded = self.embedding.forward(tokens.clone())?;
        let encoded  = self.encoder.forward(embedded);

        let features = match &self.attention {
            Some(pooling) => {
                let padding = pooling.mask_padding.then(|| tokens.equal_elem(0));
                pooling.forward(encoded.features(), padding)?
            }
            None => encoded.flatten(),
        };

        self.head.forward(features)
    }

    /// Mean cross-entropy against one-hot targets, plus the logits.
    pub fn forward_loss(
        &self,
        tokens:  Tensor<B, 2, Int>,
        targets: Tensor<B, 2>,
    ) -> Result<(Tensor<B, 1>, Tensor<B, 2>), ClassifierError> {
        let logits = self.forward(tokens)?;
        let [_, num_classes] = logits.dims();
        let [_, target_width] = targets.dims();
        if target_width != num_classes {
            return Err(ClassifierError::DimensionMismatch {
                context:  "one-hot targets",
                expected: num_classes,
                actual:   target_width,
            });
        }
        let loss = cross_entropy(logits.clone(), targets);
        Ok((loss, logits))
    }
}

/// mean_b( -Σ_c y[b,c] · log softmax(logits)[b,c] )
pub fn cross_entropy<B: Backend>(logits: Tensor<B, 2>, targets: Tensor<B, 2>) -> Tensor<B, 1> {
    (targets * log_softmax(logits, 1)).sum_dim(1).mean().neg()
}

/// How many rows of `logits` have their argmax at `labels`.
pub fn count_correct<B: Backend>(logits: Tensor<B, 2>, labels: Tensor<B, 1, Int>) -> usize {
    // argmax(1) returns [batch, 1]; flatten to [batch] before comparing
    let predicted = logits.argmax(1).flatten::<1>(0, 1);
    predicted
        .equal(labels)
        .int()
        .sum()
        .into_scalar()
        .elem::<i64>() as usize
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use burn::{backend::NdArray, tensor::activation::softmax};

    type TestBackend = NdArray;

    fn tokens(ids: &[i32], batch: usize, time: usize) -> Tensor<TestBackend, 2, Int> {
        Tensor::<TestBackend, 1, Int>::from_ints(ids, &Default::default()).reshape([batch, time])
    }

    fn small_config(topology: Topology) -> ClassifierConfig {
        ClassifierConfig::new(10, 4, 3, topology)
            .with_embedding_dim(6)
            .with_hidden_size(5)
            .with_attention_size(2)
    }

    #[test]
    fn test_attention_model_layout() {
        let model = small_config(Topology::Attention).init::<TestBackend>(&Default::default());
        assert_eq!(model.topology(), Topology::Attention);
        assert!(model.encoder.is_bidirectional());
        assert_eq!(model.attention.as_ref().map(|a| a.d_input()), Some(10));
    }

    #[test]
    fn test_flatten_model_layout() {
        let model = small_config(Topology::Flatten).init::<TestBackend>(&Default::default());
        assert_eq!(model.topology(), Topology::Flatten);
        assert!(!model.encoder.is_bidirectional());
        assert!(model.attention.is_none());
        assert_eq!(model.head.weight.val().dims(), [4 * 5, 3]);
    }

    #[test]
    fn test_probabilities_are_distributions() {
        for topology in [Topology::Attention, Topology::Flatten] {
            let model = small_config(topology).init::<TestBackend>(&Default::default());
            let logits = model.forward(tokens(&[1, 2, 3, 0, 9, 0, 0, 0], 2, 4)).unwrap();
            let probs  = softmax(logits, 1);
            assert_eq!(probs.dims(), [2, 3]);
            let sums: Vec<f32> = probs.sum_dim(1).into_data().to_vec().unwrap();
            for s in sums {
                assert_abs_diff_eq!(s, 1.0, epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn test_masked_model_runs_on_all_padding() {
        let model = small_config(Topology::Attention)
            .with_mask_padding(true)
            .init::<TestBackend>(&Default::default());
        let logits: Vec<f32> = model
            .forward(tokens(&[0, 0, 0, 0], 1, 4))
            .unwrap()
            .into_data()
            .to_vec()
            .unwrap();
        assert!(logits.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_flatten_rejects_other_lengths() {
        let model = small_config(Topology::Flatten).init::<TestBackend>(&Default::default());
        let err = model.forward(tokens(&[1, 2, 3], 1, 3)).unwrap_err();
        assert!(matches!(err, ClassifierError::DimensionMismatch { context: "classification head", .. }));
    }

    #[test]
    fn test_out_of_vocabulary_token_fails() {
        let model = small_config(Topology::Attention).init::<TestBackend>(&Default::default());
        let err = model.forward(tokens(&[1, 10, 0, 0], 1, 4)).unwrap_err();
        assert_eq!(err, ClassifierError::TokenOutOfRange { token: 10, vocab_size: 10 });
    }

    #[test]
    fn test_cross_entropy_matches_hand_computation() {
        let device = Default::default();
        let logits  = Tensor::<TestBackend, 2>::from_floats([[0.0, 0.0], [2.0, 0.0]], &device);
        let targets = Tensor::<TestBackend, 2>::from_floats([[1.0, 0.0], [0.0, 1.0]], &device);

        let loss = cross_entropy(logits, targets).into_scalar();
        // row 0: ln 2; row 1: ln(1 + e^2)
        let expected = (2.0f32.ln() + (1.0 + 2.0f32.exp()).ln()) / 2.0;
        assert_abs_diff_eq!(loss, expected, epsilon = 1e-5);
    }

    #[test]
    fn test_target_width_mismatch_fails() {
        let device = Default::default();
        let model = small_config(Topology::Attention).init::<TestBackend>(&device);
        let targets = Tensor::<TestBackend, 2>::zeros([1, 5], &device);
        let err = model.forward_loss(tokens(&[1, 2, 0, 0], 1, 4), targets).unwrap_err();
        assert!(matches!(err, ClassifierError::DimensionMismatch { context: "one-hot targets", .. }));
    }

    #[test]
    fn test_count_correct() {
        let device = Default::default();
        let logits = Tensor::<TestBackend, 2>::from_floats([[0.1, 0.9], [0.8, 0.2], [0.3, 0.7]], &device);
        let labels = Tensor::<TestBackend, 1, Int>::from_ints([1, 1, 1].as_slice(), &device);
        assert_eq!(count_correct(logits, labels), 2);
    }
}
