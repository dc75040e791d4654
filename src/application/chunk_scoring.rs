// ============================================================
// Layer 2 — Chunk Scoring
// ============================================================
// Scores a whole document with any ChunkClassifier:
//
//   text ─ tokenize ─► tokens ─ Chunker ─► windows
//        ─ plagiarism_probability ─► per-chunk % ─ mean ─► average %

use anyhow::Result;

use crate::data::chunker::Chunker;
use crate::domain::{error::DetectError, traits::ChunkClassifier};

/// Per-chunk plagiarism percentages in document order, and their mean.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkScores {
    pub per_chunk: Vec<f64>,
    pub average:   f64,
}

pub fn score_chunks<C: ChunkClassifier>(
    chunker:    &Chunker,
    text:       &str,
    classifier: &C,
) -> Result<ChunkScores> {
    let tokens = classifier.tokenize(text)?;
    // zero tokens would mean zero chunks and a 0/0 average
    if tokens.is_empty() {
        return Err(DetectError::EmptyInput.into());
    }

    let windows = chunker.chunk(&tokens)?;
    tracing::debug!("{} tokens → {} chunks", tokens.len(), windows.len());

    let per_chunk = windows
        .iter()
        .map(|window| classifier.plagiarism_probability(window).map(|p| p * 100.0))
        .collect::<Result<Vec<f64>>>()?;

    let average = per_chunk.iter().sum::<f64>() / per_chunk.len() as f64;
    Ok(ChunkScores { per_chunk, average })
}
