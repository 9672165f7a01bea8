// ============================================================
// Layer 3 - Domain Layer
// ============================================================
// Plain Rust structs, traits and errors describing the
// classification problem. Nothing in here touches Burn,
// the filesystem or the terminal.
//
//   sample.rs - a labelled token sequence and the train/test corpus
//   traits.rs - where a corpus comes from
//   error.rs  - the failure taxonomy shared by data and ml layers

pub mod error;
pub mod sample;
pub mod traits;
