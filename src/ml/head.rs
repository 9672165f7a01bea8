// ============================================================
// Layer 5 - Classification Head
// ============================================================
// logits = features · W + b, W: [d_input, num_classes]
//
// W starts from N(0, init_std) rather than zeros: with a zero W
// the first step sends no gradient back into the pooling,
// encoder or embedding. b starts at zero.

use burn::{module::Param, prelude::*, tensor::Distribution};

use crate::domain::error::ClassifierError;

#[derive(Config, Debug)]
pub struct ClassificationHeadConfig {
    pub d_input:     usize,
    pub num_classes: usize,
    #[config(default = 0.1)]
    pub init_std:    f64,
}

impl ClassificationHeadConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> ClassificationHead<B> {
        let weight = Tensor::random(
            [self.d_input, self.num_classes],
            Distribution::Normal(0.0, self.init_std),
            device,
        );
        ClassificationHead {
            weight: Param::from_tensor(weight),
            bias:   Param::from_tensor(Tensor::zeros([self.num_classes], device)),
        }
    }
}

#[derive(Module, Debug)]
pub struct ClassificationHead<B: Backend> {
    pub weight: Param<Tensor<B, 2>>,
    pub bias:   Param<Tensor<B, 1>>,
}

impl<B: Backend> ClassificationHead<B> {
    /// features: [batch, d_input] → logits [batch, num_classes]
    pub fn forward(&self, features: Tensor<B, 2>) -> Result<Tensor<B, 2>, ClassifierError> {
        let [_, width] = features.dims();
        let [d_input, num_classes] = self.weight.val().dims();
        if width != d_input {
            return Err(ClassifierError::DimensionMismatch {
                context:  "classification head",
                expected: d_input,
                actual:   width,
            });
        }
        Ok(features.matmul(self.weight.val()) + self.bias.val().reshape([1, num_classes]))
    }
}
