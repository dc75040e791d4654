// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// Everything that touches Burn tensors lives here, next to the
// lexical similarity scorer.
//
//   model.rs      — transformer encoder with a [CLS] head, and the
//                   logistic-regression head for TF-IDF rows
//   trainer.rs    — training loops (forward, loss, backward, Adam,
//                   validation, per-epoch checkpoints)
//   inferencer.rs — loads the transformer and scores token chunks
//   bow.rs        — TF-IDF + logistic regression, confidence bands
//   similarity.rs — max TF-IDF cosine against the reference corpus
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)
//            Vaswani et al. (2017) Attention Is All You Need
//            Devlin et al. (2019) BERT

/// Backend used for training runs (GPU through WGPU, with autodiff)
pub type TrainBackend = burn::backend::Autodiff<burn::backend::Wgpu>;

/// Backend used for inference
pub type InferBackend = burn::backend::Wgpu;

/// Model architectures
pub mod model;

/// Training loops with validation and checkpointing
pub mod trainer;

/// Transformer chunk classifier
pub mod inferencer;

/// Bag-of-words classifier
pub mod bow;

/// Corpus-wide cosine similarity
pub mod similarity;
