// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application layer programs against these traits so the
// chunked inference and the corpus loading can be exercised
// without a trained model or a dataset on disk.
//
//   DocumentSource   ← CorpusLoader (labelled dataset folders)
//   ChunkClassifier  ← Inferencer (transformer, subword ids)
//                    ← BowClassifier (TF-IDF, whitespace words)

use anyhow::Result;
use crate::domain::document::Document;

// ─── DocumentSource ───────────────────────────────────────────────────────────
/// Any component that can load documents from a source.
pub trait DocumentSource {
    /// Load all available documents from this source.
    fn load_all(&self) -> Result<Vec<Document>>;
}

// ─── ChunkClassifier ──────────────────────────────────────────────────────────
/// A binary classifier that scores windows of its own token stream.
///
/// `Token` is whatever unit the classifier chunks on: subword ids for
/// the transformer, words for the bag-of-words model.
pub trait ChunkClassifier {
    type Token: Clone;

    /// Split normalised text into the classifier's token stream
    fn tokenize(&self, text: &str) -> Result<Vec<Self::Token>>;

    /// Probability in [0, 1] that the chunk belongs to the plagiarised class
    fn plagiarism_probability(&self, chunk: &[Self::Token]) -> Result<f64>;
}
