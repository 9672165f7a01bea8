// ============================================================
// Layer 5 - Attention Pooling
// ============================================================
// Reduces per-timestep encoder states to one vector per example
// with a learned, input-dependent weighting:
//
//   features  [B, T, F]
//       │ reshape
//       ▼
//   flat      [B*T, F]
//       │ tanh(flat · W + b)            W: [F, A], b: [A]
//       ▼
//   score     [B*T, A]
//       │ score · u                     u: [A]
//       ▼
//   logits    [B, T]
//       │ softmax over T, per example
//       ▼
//   weights   [B, T]      each row sums to 1
//       │ Σ_t weights[b,t] · features[b,t,:]
//       ▼
//   pooled    [B, F]
//
// Padding timesteps take part in the softmax like any other
// position. An optional padding mask (off unless configured)
// pins their logits to MASK_LOGIT first; a row that is padding
// everywhere then gets a uniform distribution, as does any row
// whose logits are all equal.
//
// Reference: Yang et al. (2016) Hierarchical Attention Networks

use burn::{
    module::Param,
    prelude::*,
    tensor::{activation::softmax, Distribution},
};

use crate::domain::error::ClassifierError;

/// Logit given to masked padding positions.
pub const MASK_LOGIT: f32 = -1.0e9;

#[derive(Config, Debug)]
pub struct AttentionPoolingConfig {
    /// Feature width of the encoder output (2 * hidden when bidirectional)
    pub d_input:     usize,
    pub d_attention: usize,
    #[config(default = false)]
    pub mask_padding: bool,
    /// Std of the normal init; samples are clipped to ±2 std
    #[config(default = 0.1)]
    pub init_std: f64,
}

impl AttentionPoolingConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> AttentionPooling<B> {
        AttentionPooling {
            weight:       Param::from_tensor(self.truncated_normal([self.d_input, self.d_attention], device)),
            bias:         Param::from_tensor(self.truncated_normal([self.d_attention], device)),
            context:      Param::from_tensor(self.truncated_normal([self.d_attention], device)),
            mask_padding: self.mask_padding,
        }
    }

    fn truncated_normal<B: Backend, const D: usize>(
        &self,
        shape:  [usize; D],
        device: &B::Device,
    ) -> Tensor<B, D> {
        let limit = 2.0 * self.init_std;
        Tensor::random(shape, Distribution::Normal(0.0, self.init_std), device)
            .clamp(-limit, limit)
    }
}

#[derive(Module, Debug)]
pub struct AttentionPooling<B: Backend> {
    /// W: [d_input, d_attention]
    pub weight:  Param<Tensor<B, 2>>,
    /// b: [d_attention]
    pub bias:    Param<Tensor<B, 1>>,
    /// u: [d_attention]
    pub context: Param<Tensor<B, 1>>,
    pub mask_padding: bool,
}

impl<B: Backend> AttentionPooling<B> {
    /// features: [batch, time, d_input] → pooled [batch, d_input]
    pub fn forward(
        &self,
        features: Tensor<B, 3>,
        padding:  Option<Tensor<B, 2, Bool>>,
    ) -> Result<Tensor<B, 2>, ClassifierError> {
        let weights = self.weights(features.clone(), padding)?;
        Ok(weighted_sum(features, weights))
    }

    /// Per-example softmax weights over time, [batch, time]; rows sum to 1.
    ///
    /// `padding` marks padded positions ([batch, time], true = pad).
    /// It is only applied when the layer was built with `mask_padding`.
    pub fn weights(
        &self,
        features: Tensor<B, 3>,
        padding:  Option<Tensor<B, 2, Bool>>,
    ) -> Result<Tensor<B, 2>, ClassifierError> {
        let [batch, time, width] = features.dims();
        let [d_input, d_attention] = self.weight.val().dims();
        if width != d_input {
            return Err(ClassifierError::DimensionMismatch {
                context:  "attention projection",
                expected: d_input,
                actual:   width,
            });
        }

        let flat  = features.reshape([batch * time, width]);
        let score = (flat.matmul(self.weight.val())
            + self.bias.val().reshape([1, d_attention]))
            .tanh();
        let logits = score
            .matmul(self.context.val().reshape([d_attention, 1]))
            .reshape([batch, time]);

        let logits = match padding {
            Some(mask) if self.mask_padding => {
                let mask_dims = mask.dims();
                if mask_dims != [batch, time] {
                    return Err(ClassifierError::DimensionMismatch {
                        context:  "attention padding mask",
                        expected: batch * time,
                        actual:   mask_dims[0] * mask_dims[1],
                    });
                }
                logits.mask_fill(mask, MASK_LOGIT)
            }
            _ => logits,
        };

        Ok(softmax(logits, 1))
    }

    pub fn d_input(&self) -> usize {
        self.weight.val().dims()[0]
    }
}

/// Σ_t weights[b, t] · features[b, t, :]
///
/// features: [batch, time, width], weights: [batch, time] → [batch, width]
pub fn weighted_sum<B: Backend>(features: Tensor<B, 3>, weights: Tensor<B, 2>) -> Tensor<B, 2> {
    let [batch, time, width] = features.dims();
    (features * weights.reshape([batch, time, 1]))
        .sum_dim(1)
        .reshape([batch, width])
}
