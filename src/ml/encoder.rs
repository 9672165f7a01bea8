// ============================================================
// Layer 5 - Recurrent Sequence Encoder
// ============================================================
// One or two GRUs over the embedded batch.
//
//   forward cell   reads t = 0 → T-1
//   backward cell  reads t = T-1 → 0, and its outputs are flipped
//                  back so index t of both tensors describes the
//                  same timestep
//
// Every call starts both recurrences from a zero hidden state;
// nothing is carried from one batch to the next.
//
// The GRU is Burn's (reset gate, update gate, candidate state).
// Padding is fed through the cells like any other id, so the
// backward cell of a right-padded sequence sees the padding first.

use burn::{
    nn::gru::{Gru, GruConfig},
    prelude::*,
};

#[derive(Config, Debug)]
pub struct SequenceEncoderConfig {
    pub d_input:  usize,
    pub d_hidden: usize,
    #[config(default = true)]
    pub bidirectional: bool,
}

impl SequenceEncoderConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> SequenceEncoder<B> {
        let cell = || GruConfig::new(self.d_input, self.d_hidden, true).init(device);
        SequenceEncoder {
            forward_cell:  cell(),
            backward_cell: self.bidirectional.then(cell),
            d_hidden:      self.d_hidden,
        }
    }
}

#[derive(Module, Debug)]
pub struct SequenceEncoder<B: Backend> {
    pub forward_cell:  Gru<B>,
    pub backward_cell: Option<Gru<B>>,
    pub d_hidden:      usize,
}

/// Per-timestep hidden states, one tensor per direction.
#[derive(Debug, Clone)]
pub struct EncoderOutput<B: Backend> {
    /// [batch, time, d_hidden]
    pub forward:  Tensor<B, 3>,
    /// [batch, time, d_hidden], present only in bidirectional mode
    pub backward: Option<Tensor<B, 3>>,
}

impl<B: Backend> EncoderOutput<B> {
    /// Concatenate the directions along the feature axis:
    /// [batch, time, d_hidden * directions]
    pub fn features(self) -> Tensor<B, 3> {
        match self.backward {
            Some(backward) => Tensor::cat(vec![self.forward, backward], 2),
            None           => self.forward,
        }
    }

    /// [batch, time * features], the input of the flattening head.
    pub fn flatten(self) -> Tensor<B, 2> {
        let features = self.features();
        let [batch, time, width] = features.dims();
        features.reshape([batch, time * width])
    }
}

impl<B: Backend> SequenceEncoder<B> {
    /// embedded: [batch, time, d_input]
    pub fn forward(&self, embedded: Tensor<B, 3>) -> EncoderOutput<B> {
        let backward = self.backward_cell.as_ref().map(|cell| {
            cell.forward(embedded.clone().flip([1]), None).flip([1])
        });
        let forward = self.forward_cell.forward(embedded, None);

        EncoderOutput { forward, backward }
    }

    pub fn is_bidirectional(&self) -> bool {
        self.backward_cell.is_some()
    }

    /// Feature width after concatenating directions.
    pub fn output_size(&self) -> usize {
        if self.is_bidirectional() { 2 * self.d_hidden } else { self.d_hidden }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;
    use burn::tensor::Distribution;

    type TestBackend = NdArray;

    #[test]
    fn test_bidirectional_shapes() {
        let device = Default::default();
        let enc = SequenceEncoderConfig::new(3, 5).init::<TestBackend>(&device);
        let x = Tensor::<TestBackend, 3>::random([2, 4, 3], Distribution::Default, &device);

        let out = enc.forward(x);
        assert_eq!(out.forward.dims(), [2, 4, 5]);
        assert_eq!(out.backward.as_ref().map(|t| t.dims()), Some([2, 4, 5]));
        assert_eq!(out.features().dims(), [2, 4, 10]);
        assert_eq!(enc.output_size(), 10);
    }

    #[test]
    fn test_single_direction_flatten() {
        let device = Default::default();
        let enc = SequenceEncoderConfig::new(3, 5)
            .with_bidirectional(false)
            .init::<TestBackend>(&device);
        let x = Tensor::<TestBackend, 3>::random([2, 4, 3], Distribution::Default, &device);

        let out = enc.forward(x);
        assert!(out.backward.is_none());
        assert_eq!(out.flatten().dims(), [2, 20]);
        assert_eq!(enc.output_size(), 5);
    }

    #[test]
    fn test_examples_do_not_share_state() {
        // Each row of a batch must encode exactly as it would alone
        let device = Default::default();
        let enc = SequenceEncoderConfig::new(3, 4).init::<TestBackend>(&device);
        let x = Tensor::<TestBackend, 3>::random([2, 5, 3], Distribution::Default, &device);

        let together: Vec<f32> = enc.forward(x.clone()).features().into_data().to_vec().unwrap();
        let second = x.slice([1..2, 0..5, 0..3]);
        let alone: Vec<f32> = enc.forward(second).features().into_data().to_vec().unwrap();

        for (a, b) in together[40..].iter().zip(alone.iter()) {
            assert!((a - b).abs() < 1e-5);
        }
    }

    #[test]
    fn test_backward_direction_is_time_aligned() {
        // The backward state at the last timestep has only seen that
        // timestep, so it must not depend on earlier inputs.
        let device = Default::default();
        let enc = SequenceEncoderConfig::new(2, 3).init::<TestBackend>(&device);
        let a = Tensor::<TestBackend, 3>::random([1, 4, 2], Distribution::Default, &device);
        let tail = a.clone().slice([0..1, 3..4, 0..2]);
        let b = Tensor::cat(
            vec![Tensor::<TestBackend, 3>::zeros([1, 3, 2], &device), tail],
            1,
        );

        let back_a: Vec<f32> = enc.forward(a).backward.unwrap()
            .slice([0..1, 3..4, 0..3]).into_data().to_vec().unwrap();
        let back_b: Vec<f32> = enc.forward(b).backward.unwrap()
            .slice([0..1, 3..4, 0..3]).into_data().to_vec().unwrap();

        for (x, y) in back_a.iter().zip(back_b.iter()) {
            assert!((x - y).abs() < 1e-5);
        }
    }
}
