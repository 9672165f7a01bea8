// ============================================================
// Layer 4 - Data Pipeline
// ============================================================
// From pre-tokenised files to tensor batches:
//
//   train.jsonl / test.jsonl
//       │
//       ▼
//   JsonlCorpusLoader  → Vec<LabeledSequence> per split
//       │
//       ▼
//   SequencePreparer   → pad/truncate, vocabulary check, one-hot
//       │
//       ▼
//   TopicDataset       → implements Burn's Dataset trait
//       │
//       ▼
//   BatchPolicy        → which indices make up each step
//       │
//       ▼
//   TopicBatcher       → stacks samples into tensors

/// Reads the JSON-lines corpus from disk
pub mod loader;

/// Padding, truncation, one-hot labels and vocabulary sizing
pub mod preprocessor;

/// Prepared samples behind Burn's Dataset trait
pub mod dataset;

/// Random and sequential-epoch batch schedules
pub mod sampler;

/// Turns a slice of samples into tensors
pub mod batcher;
