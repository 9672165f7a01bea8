use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

use crate::domain::error::ClassifierError;

/// One prepared sample: fixed-width token ids plus its label in
/// both integer and one-hot form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicSample {
    /// Exactly `max_length` ids, zero-padded
    pub tokens: Vec<u32>,
    pub label:  usize,
    /// `one_hot(label, num_classes)`
    pub target: Vec<f32>,
}

pub struct TopicDataset {
    samples: Vec<TopicSample>,
}

impl TopicDataset {
    pub fn new(samples: Vec<TopicSample>) -> Self { Self { samples } }

    pub fn sample_count(&self) -> usize { self.samples.len() }

    /// Clone out the samples at `indices`, in that order.
    pub fn gather(&self, indices: &[usize]) -> Result<Vec<TopicSample>, ClassifierError> {
        indices
            .iter()
            .map(|&index| {
                self.get(index).ok_or(ClassifierError::IndexOutOfRange {
                    index,
                    len: self.samples.len(),
                })
            })
            .collect()
    }
}

impl Dataset<TopicSample> for TopicDataset {
    fn get(&self, index: usize) -> Option<TopicSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}
