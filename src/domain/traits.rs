// ============================================================
// Layer 3 - Core Traits
// ============================================================
// The application layer asks for a corpus through this trait,
// so the on-disk format stays a detail of the data layer.

use anyhow::Result;
use crate::domain::sample::Corpus;

// ─── CorpusSource ─────────────────────────────────────────────────────────────
/// Anything that can hand over the pre-tokenised train/test split.
///
/// Implementations:
///   - JsonlCorpusLoader → reads train.jsonl / test.jsonl from a directory
pub trait CorpusSource {
    fn load(&self) -> Result<Corpus>;
}
