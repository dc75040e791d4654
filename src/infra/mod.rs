// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns used by several other layers:
//
//   checkpoint.rs      — model records via Burn's CompactRecorder,
//                        plus the JSON side files (training config,
//                        latest epoch) needed to rebuild a model
//
//   tokenizer_store.rs — builds a word-level tokenizer on the
//                        corpus if none exists, or loads the saved
//                        one, so training and inference share ids
//
//   metrics.rs         — classification report for held-out data,
//                        and a per-epoch CSV log
//
// Reference: Rust Book §9 (Error Handling with anyhow)
//            Burn Book §5 (Checkpointing)

/// Model checkpoint saving and loading
pub mod checkpoint;

/// Tokenizer building, saving, and loading
pub mod tokenizer_store;

/// Evaluation report and training metrics CSV
pub mod metrics;
