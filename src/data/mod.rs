// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from raw files to tensor batches.
//
//   .txt / .docx / .pdf            dataset folders
//          │                             │
//          ▼                             ▼
//   extract_text_from_file          CorpusLoader
//          └──────────┬──────────────────┘
//                     ▼
//   Preprocessor      → Urdu normalisation + stop words
//                     │
//          ┌──────────┴──────────┐
//          ▼                     ▼
//   TfidfVectorizer         Tokenizer (infra)
//          │                     │
//          ▼                     ▼
//   FeatureSample           TokenSample ──► Chunker (inference)
//          │                     │
//          ▼                     ▼
//   FeatureBatcher          TokenBatcher  → DataLoader (training)

/// Text extraction from files and the labelled dataset loader
pub mod loader;

/// Urdu normalisation and stop-word removal
pub mod preprocessor;

/// Overlapping token windows
pub mod chunker;

/// TF-IDF vocabulary, weighting and cosine similarity
pub mod vectorizer;

/// Sample types and Burn's Dataset trait
pub mod dataset;

/// Burn's Batcher trait for both sample types
pub mod batcher;

/// Seeded shuffle and train/test split
pub mod splitter;
