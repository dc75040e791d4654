// ============================================================
// Layer 5 — Lexical Similarity
// ============================================================
// How close is the input to anything already in the corpus?
//
//   fit TF-IDF on [input, corpus_1, ..., corpus_n]
//   similarity = max_i cos(v_input, v_i) × 100
//
// The vectorizer is refitted per input so the input's own terms
// are part of the vocabulary and the idf weights.

use crate::data::vectorizer::{cosine_similarity, TfidfVectorizer};
use crate::domain::error::DetectError;

/// Best cosine match between `input` and `corpus`, as a percentage.
///
/// An empty corpus is an error. Text with no usable terms (on either
/// side) scores 0 rather than failing.
pub fn max_similarity(input: &str, corpus: &[String]) -> Result<f64, DetectError> {
    if corpus.is_empty() {
        return Err(DetectError::NoReferences);
    }

    let mut documents = Vec::with_capacity(corpus.len() + 1);
    documents.push(input.to_string());
    documents.extend(corpus.iter().cloned());

    let (_, vectors) = match TfidfVectorizer::fit_transform(&documents, None) {
        Ok(fitted) => fitted,
        Err(DetectError::EmptyVocabulary) => return Ok(0.0),
        Err(e) => return Err(e),
    };

    let (query, references) = vectors.split_at(1);
    let best = references
        .iter()
        .map(|v| cosine_similarity(&query[0], v))
        .fold(0.0f32, f32::max);

    tracing::debug!("Max cosine similarity {:.4} over {} documents", best, corpus.len());
    Ok(best as f64 * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Vec<String> {
        vec![
            "لاہور پاکستان کا تاریخی شہر".to_string(),
            "کرکٹ مقبول کھیل".to_string(),
        ]
    }

    #[test]
    fn test_exact_copy_scores_hundred() {
        let score = max_similarity("کرکٹ مقبول کھیل", &corpus()).unwrap();
        assert!((score - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_unrelated_text_scores_zero() {
        let score = max_similarity("بارش موسم", &corpus()).unwrap();
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_partial_overlap_is_between() {
        let score = max_similarity("لاہور خوبصورت شہر", &corpus()).unwrap();
        assert!(score > 0.0 && score < 100.0);
    }

    #[test]
    fn test_empty_corpus_is_an_error() {
        assert!(matches!(max_similarity("کچھ", &[]), Err(DetectError::NoReferences)));
    }

    #[test]
    fn test_input_without_terms_scores_zero() {
        // single-character tokens never form a term
        assert_eq!(max_similarity("ا ب", &corpus()).unwrap(), 0.0);
    }
}
