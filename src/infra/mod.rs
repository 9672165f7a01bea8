// ============================================================
// Layer 6 - Infrastructure Layer
// ============================================================
// Cross-cutting concerns that belong to no single layer.
//
//   metrics.rs - CSV logs of reported training loss and of the
//                final held-out evaluation

/// Training and evaluation metrics CSV logger
pub mod metrics;
