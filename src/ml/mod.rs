// ============================================================
// Layer 5 - ML / Model Layer (Burn)
// ============================================================
// Every Burn tensor and module lives in this layer.
//
//   embedding.rs - token id → dense vector table
//   encoder.rs   - forward / bidirectional GRU encoder
//   attention.rs - attention pooling over timesteps
//   head.rs      - affine classification head
//   model.rs     - the assembled classifier and its loss
//   trainer.rs   - batch loop, backward pass, Adam updates
//   evaluator.rs - held-out loss and accuracy
//
// Reference: Burn Book §3 (Building Blocks), §5 (Training)
//            Cho et al. (2014) GRU
//            Yang et al. (2016) Hierarchical Attention Networks

pub mod embedding;

pub mod encoder;

/// Learned, per-example softmax weighting of encoder states
pub mod attention;

pub mod head;

/// Embedding → encoder → pooling → head
pub mod model;

/// Training loop with periodic loss reports
pub mod trainer;

pub mod evaluator;
