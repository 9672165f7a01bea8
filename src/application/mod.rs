// ============================================================
// Layer 2 - Application / Use Cases
// ============================================================
// Workflow coordination only: no tensor math and no argument
// parsing. The single workflow loads, prepares, trains and
// evaluates.

pub mod train_use_case;
