// ============================================================
// Layer 4 - Sequence Preparer
// ============================================================
// Turns variable-length labelled sequences into fixed-width
// training samples:
//
//   tokens [5, 9, 2]   ──pad_or_truncate(5)──▶  [5, 9, 2, 0, 0]
//   label  2           ──one_hot(4)──────────▶  [0, 0, 1, 0]
//
// Id 0 doubles as the padding id and as a real vocabulary entry.
// Nothing here tells the two apart; the attention layer only
// does so when padding masking is switched on.
//
// Truncation keeps the head of a sequence and silently drops the
// tail. The preparer counts how many samples lost tokens and
// logs it once per split.

use serde::{Deserialize, Serialize};

use crate::data::dataset::TopicSample;
use crate::domain::error::ClassifierError;
use crate::domain::sample::LabeledSequence;

/// Keep the first `max_length` ids, or right-pad with zeros up to it.
pub fn pad_or_truncate(sequence: &[u32], max_length: usize) -> Vec<u32> {
    let mut out = Vec::with_capacity(max_length);
    out.extend(sequence.iter().copied().take(max_length));
    out.resize(max_length, 0);
    out
}

/// A `num_classes`-long vector with a single 1.0 at `class_id`.
pub fn one_hot(class_id: usize, num_classes: usize) -> Result<Vec<f32>, ClassifierError> {
    if class_id >= num_classes {
        return Err(ClassifierError::LabelOutOfRange { label: class_id, num_classes });
    }
    let mut vec = vec![0.0f32; num_classes];
    vec[class_id] = 1.0;
    Ok(vec)
}

/// One plus the largest token id found in the training sequences.
pub fn vocabulary_size<'a, I>(training_sequences: I) -> Result<usize, ClassifierError>
where
    I: IntoIterator<Item = &'a [u32]>,
{
    training_sequences
        .into_iter()
        .flat_map(|seq| seq.iter().copied())
        .max()
        .map(|max_id| max_id as usize + 1)
        .ok_or(ClassifierError::EmptyCorpus)
}

// ─── Vocabulary ───────────────────────────────────────────────────────────────
/// What to do with ids the training split never produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OovPolicy {
    /// Reject the sample with `TokenOutOfRange`
    #[default]
    Fail,
    /// Add one reserved row to the table and map unseen ids onto it
    Reserve,
}

/// Embedding-table sizing derived once from the training split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vocabulary {
    train_size: usize,
    policy:     OovPolicy,
}

impl Vocabulary {
    pub fn from_training<'a, I>(training_sequences: I, policy: OovPolicy) -> Result<Self, ClassifierError>
    where
        I: IntoIterator<Item = &'a [u32]>,
    {
        let train_size = vocabulary_size(training_sequences)?;
        Ok(Self { train_size, policy })
    }

    /// Row count of the embedding table.
    pub fn size(&self) -> usize {
        match self.policy {
            OovPolicy::Fail    => self.train_size,
            OovPolicy::Reserve => self.train_size + 1,
        }
    }

    pub fn oov_id(&self) -> Option<u32> {
        match self.policy {
            OovPolicy::Fail    => None,
            OovPolicy::Reserve => Some(self.train_size as u32),
        }
    }

    pub fn map_token(&self, token: u32) -> Result<u32, ClassifierError> {
        if (token as usize) < self.train_size {
            return Ok(token);
        }
        self.oov_id().ok_or(ClassifierError::TokenOutOfRange {
            token,
            vocab_size: self.train_size,
        })
    }
}

// ─── SequencePreparer ─────────────────────────────────────────────────────────
pub struct SequencePreparer {
    max_length:  usize,
    num_classes: usize,
    vocabulary:  Vocabulary,
}

impl SequencePreparer {
    pub fn new(max_length: usize, num_classes: usize, vocabulary: Vocabulary) -> Self {
        Self { max_length, num_classes, vocabulary }
    }

    /// Pad/truncate, map ids through the vocabulary and one-hot the label.
    /// Ids past `max_length` are dropped before the vocabulary check.
    pub fn prepare(&self, sample: &LabeledSequence) -> Result<TopicSample, ClassifierError> {
        let target = one_hot(sample.label, self.num_classes)?;
        let tokens = pad_or_truncate(&sample.tokens, self.max_length)
            .into_iter()
            .map(|id| self.vocabulary.map_token(id))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(TopicSample { tokens, label: sample.label, target })
    }

    pub fn prepare_all(&self, samples: &[LabeledSequence]) -> Result<Vec<TopicSample>, ClassifierError> {
        let truncated = samples
            .iter()
            .filter(|s| s.tokens.len() > self.max_length)
            .count();
        if truncated > 0 {
            tracing::warn!(
                "{} of {} sequences exceed max_length={} and lose their tail",
                truncated,
                samples.len(),
                self.max_length
            );
        }

        samples.iter().map(|s| self.prepare(s)).collect()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_sequence_is_zero_padded() {
        let input  = [7u32, 3, 9];
        let output = pad_or_truncate(&input, 6);
        assert_eq!(output.len(), 6);
        assert_eq!(&output[..3], &input);
        assert!(output[3..].iter().all(|&id| id == 0));
    }

    #[test]
    fn test_exact_length_is_unchanged() {
        assert_eq!(pad_or_truncate(&[1, 2, 3], 3), vec![1, 2, 3]);
    }

    #[test]
    fn test_long_sequence_keeps_its_head() {
        let input: Vec<u32> = (1..=10).collect();
        assert_eq!(pad_or_truncate(&input, 4), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_empty_sequence_is_all_padding() {
        assert_eq!(pad_or_truncate(&[], 3), vec![0, 0, 0]);
    }

    #[test]
    fn test_one_hot_has_single_one() {
        let v = one_hot(2, 5).unwrap();
        assert_eq!(v.len(), 5);
        assert_eq!(v.iter().filter(|&&x| x == 1.0).count(), 1);
        assert_eq!(v[2], 1.0);
        assert_eq!(v.iter().sum::<f32>(), 1.0);
    }

    #[test]
    fn test_one_hot_rejects_out_of_range_class() {
        assert_eq!(
            one_hot(46, 46),
            Err(ClassifierError::LabelOutOfRange { label: 46, num_classes: 46 })
        );
    }

    #[test]
    fn test_vocabulary_size_is_max_plus_one() {
        let seqs: Vec<Vec<u32>> = vec![vec![3, 1], vec![], vec![12, 4]];
        let size = vocabulary_size(seqs.iter().map(|s| s.as_slice())).unwrap();
        assert_eq!(size, 13);
    }

    #[test]
    fn test_vocabulary_size_of_empty_corpus() {
        let seqs: Vec<Vec<u32>> = vec![vec![], vec![]];
        assert_eq!(
            vocabulary_size(seqs.iter().map(|s| s.as_slice())),
            Err(ClassifierError::EmptyCorpus)
        );
    }

    #[test]
    fn test_fail_policy_rejects_unseen_ids() {
        let train = [vec![0u32, 4]];
        let vocab = Vocabulary::from_training(train.iter().map(|s| s.as_slice()), OovPolicy::Fail).unwrap();
        assert_eq!(vocab.size(), 5);
        assert_eq!(vocab.map_token(4), Ok(4));
        assert_eq!(
            vocab.map_token(5),
            Err(ClassifierError::TokenOutOfRange { token: 5, vocab_size: 5 })
        );
    }

    #[test]
    fn test_reserve_policy_maps_unseen_ids() {
        let train = [vec![2u32, 4]];
        let vocab = Vocabulary::from_training(train.iter().map(|s| s.as_slice()), OovPolicy::Reserve).unwrap();
        assert_eq!(vocab.size(), 6);
        assert_eq!(vocab.oov_id(), Some(5));
        assert_eq!(vocab.map_token(900), Ok(5));
        assert_eq!(vocab.map_token(3), Ok(3));
    }

    #[test]
    fn test_prepare_drops_tail_before_vocabulary_check() {
        let train = [vec![1u32, 2, 3]];
        let vocab = Vocabulary::from_training(train.iter().map(|s| s.as_slice()), OovPolicy::Fail).unwrap();
        let preparer = SequencePreparer::new(2, 3, vocab);

        // id 99 sits past max_length, so it never reaches the lookup
        let sample = preparer.prepare(&LabeledSequence::new(vec![1, 2, 99], 1)).unwrap();
        assert_eq!(sample.tokens, vec![1, 2]);
        assert_eq!(sample.target, vec![0.0, 1.0, 0.0]);
        assert_eq!(sample.label, 1);
    }

    #[test]
    fn test_prepare_rejects_bad_label() {
        let train = [vec![1u32]];
        let vocab = Vocabulary::from_training(train.iter().map(|s| s.as_slice()), OovPolicy::Fail).unwrap();
        let preparer = SequencePreparer::new(4, 2, vocab);
        let err = preparer.prepare(&LabeledSequence::new(vec![1], 2)).unwrap_err();
        assert_eq!(err, ClassifierError::LabelOutOfRange { label: 2, num_classes: 2 });
    }
}
