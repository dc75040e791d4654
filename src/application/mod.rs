// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// This layer orchestrates all the other layers to accomplish
// one user-facing goal (training a classifier or checking a
// document).
//
// Rules for this layer:
//   - No ML math or model code here
//   - No printing here (that's Layer 1)
//   - Only workflow coordination
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// Loading the cleaned, labelled reference corpus
pub mod corpus;

// Chunk → classify → average
pub mod chunk_scoring;

// Similarity + chunked classification + verdict
pub mod check_use_case;

// Transformer training workflow
pub mod train_transformer_use_case;

// Bag-of-words training workflow
pub mod train_bow_use_case;

// Whole-text bag-of-words prediction
pub mod predict_bow_use_case;
