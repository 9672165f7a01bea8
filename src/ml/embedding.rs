// ============================================================
// Layer 5 - Token Embedding
// ============================================================
// A trainable [vocab_size, embedding_dim] table, one row per id,
// initialised uniformly in [-1, 1].
//
// Burn's Embedding indexes the table without a bounds check on
// every backend, so the id range is validated here first: an id
// past the last row is an error, never a clamp or a wrap.

use burn::{
    nn::{Embedding, EmbeddingConfig, Initializer},
    prelude::*,
};

use crate::domain::error::ClassifierError;

#[derive(Config, Debug)]
pub struct TokenEmbeddingConfig {
    pub vocab_size:    usize,
    pub embedding_dim: usize,
    #[config(default = 1.0)]
    pub init_range:    f64,
}

impl TokenEmbeddingConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> TokenEmbedding<B> {
        let table = EmbeddingConfig::new(self.vocab_size, self.embedding_dim)
            .with_initializer(Initializer::Uniform {
                min: -self.init_range,
                max:  self.init_range,
            })
            .init(device);
        TokenEmbedding { table, vocab_size: self.vocab_size }
    }
}

#[derive(Module, Debug)]
pub struct TokenEmbedding<B: Backend> {
    pub table:      Embedding<B>,
    pub vocab_size: usize,
}

impl<B: Backend> TokenEmbedding<B> {
    /// ids: [batch, time] → [batch, time, embedding_dim]
    pub fn forward(&self, ids: Tensor<B, 2, Int>) -> Result<Tensor<B, 3>, ClassifierError> {
        let max_id = ids.clone().max().into_scalar().elem::<i64>();
        if max_id >= self.vocab_size as i64 {
            return Err(ClassifierError::TokenOutOfRange {
                token:      max_id as u32,
                vocab_size: self.vocab_size,
            });
        }
        Ok(self.table.forward(ids))
    }

    pub fn embedding_dim(&self) -> usize {
        self.table.weight.val().dims()[1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    #[test]
    fn test_lookup_shape() {
        let device = Default::default();
        let emb = TokenEmbeddingConfig::new(10, 6).init::<TestBackend>(&device);
        let ids = Tensor::<TestBackend, 1, Int>::from_ints([1, 2, 0, 9, 9, 3].as_slice(), &device)
            .reshape([2, 3]);
        let out = emb.forward(ids).unwrap();
        assert_eq!(out.dims(), [2, 3, 6]);
        assert_eq!(emb.embedding_dim(), 6);
    }

    #[test]
    fn test_rows_match_table() {
        let device = Default::default();
        let emb = TokenEmbeddingConfig::new(4, 3).init::<TestBackend>(&device);
        let ids = Tensor::<TestBackend, 1, Int>::from_ints([2, 2].as_slice(), &device).reshape([1, 2]);
        let out: Vec<f32> = emb.forward(ids).unwrap().into_data().to_vec().unwrap();
        let table: Vec<f32> = emb.table.weight.val().into_data().to_vec().unwrap();

        assert_eq!(&out[0..3], &table[6..9]);
        assert_eq!(&out[3..6], &table[6..9]);
    }

    #[test]
    fn test_initial_values_within_unit_range() {
        let device = Default::default();
        let emb = TokenEmbeddingConfig::new(50, 8).init::<TestBackend>(&device);
        let table: Vec<f32> = emb.table.weight.val().into_data().to_vec().unwrap();
        assert!(table.iter().all(|v| (-1.0..=1.0).contains(v)));
    }

    #[test]
    fn test_out_of_range_id_fails() {
        let device = Default::default();
        let emb = TokenEmbeddingConfig::new(5, 2).init::<TestBackend>(&device);
        let ids = Tensor::<TestBackend, 1, Int>::from_ints([1, 5].as_slice(), &device).reshape([1, 2]);
        assert_eq!(
            emb.forward(ids).unwrap_err(),
            ClassifierError::TokenOutOfRange { token: 5, vocab_size: 5 }
        );
    }
}
