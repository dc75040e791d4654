use std::path::PathBuf;

use thiserror::Error;

/// Failures that end the current invocation.
///
/// Most code propagates these through `anyhow::Result`; callers that
/// need to branch on the kind use `err.downcast_ref::<DetectError>()`.
#[derive(Debug, Error)]
pub enum DetectError {
    #[error("unsupported format '{extension}' (expected .txt, .docx or .pdf)")]
    UnsupportedFormat { extension: String },

    #[error("cannot read '{}': {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot extract text from '{}': {message}", path.display())]
    Extraction { path: PathBuf, message: String },

    #[error("empty input: no text left after normalisation")]
    EmptyInput,

    #[error("no reference documents found under '{}'", root.display())]
    EmptyCorpus { root: PathBuf },

    #[error("no reference documents to compare against")]
    NoReferences,

    #[error("invalid chunking: stride ({stride}) must be smaller than max_tokens ({max_tokens})")]
    InvalidChunking { max_tokens: usize, stride: usize },

    #[error("empty vocabulary: documents contain no terms of two or more characters")]
    EmptyVocabulary,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
