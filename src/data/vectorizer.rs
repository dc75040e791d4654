// ============================================================
// Layer 4 — TF-IDF Vectorizer
// ============================================================
// Term-frequency / inverse-document-frequency vectors over a
// fitted vocabulary.
//
// Term extraction:   runs of two or more word characters
//                    (Unicode-aware, so Urdu letters and marks count),
//                    lowercased
// Vocabulary:        every term seen at fit time, or only the
//                    `max_features` most frequent ones; indices are
//                    assigned in lexicographic term order
// Weighting:         tf(t, d) * idf(t)
//                    idf(t) = ln((1 + n) / (1 + df(t))) + 1
// Normalisation:     each vector is scaled to unit L2 norm, so the
//                    cosine of two vectors is their dot product
//
// Vectors are sparse: (feature index, weight) pairs sorted by index.

use std::collections::{BTreeMap, HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::error::DetectError;

static TERM_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\w\w+\b").expect("term pattern is a valid regex"));

/// Sparse vector: (feature index, weight), sorted by index, no duplicates
pub type SparseVector = Vec<(usize, f32)>;

/// Split a document into lowercase terms of two or more word characters.
pub fn terms(text: &str) -> impl Iterator<Item = String> + '_ {
    TERM_PATTERN.find_iter(text).map(|m| m.as_str().to_lowercase())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    /// term → feature index
    vocabulary: HashMap<String, usize>,
    /// idf weight per feature index
    idf: Vec<f32>,
}

impl TfidfVectorizer {
    /// Learn vocabulary and idf weights from a set of documents.
    ///
    /// `max_features = None` keeps every term.
    pub fn fit(documents: &[String], max_features: Option<usize>) -> Result<Self, DetectError> {
        let mut term_counts: HashMap<String, usize> = HashMap::new();
        let mut doc_freq:    HashMap<String, usize> = HashMap::new();

        for doc in documents {
            let mut seen: HashSet<String> = HashSet::new();
            for term in terms(doc) {
                *term_counts.entry(term.clone()).or_insert(0) += 1;
                seen.insert(term);
            }
            for term in seen {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        if term_counts.is_empty() {
            return Err(DetectError::EmptyVocabulary);
        }

        // Keep the most frequent terms; ties broken alphabetically so the
        // selection does not depend on HashMap iteration order.
        let mut kept: Vec<(String, usize)> = term_counts.into_iter().collect();
        if let Some(limit) = max_features {
            kept.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
            kept.truncate(limit);
        }

        let ordered: BTreeMap<String, usize> = kept.into_iter().collect();
        let n_docs = documents.len() as f32;

        let mut vocabulary = HashMap::with_capacity(ordered.len());
        let mut idf        = Vec::with_capacity(ordered.len());
        for (index, term) in ordered.into_keys().enumerate() {
            let df = doc_freq.get(&term).copied().unwrap_or(0) as f32;
            idf.push(((1.0 + n_docs) / (1.0 + df)).ln() + 1.0);
            vocabulary.insert(term, index);
        }

        tracing::debug!("Fitted TF-IDF vocabulary with {} terms over {} documents", idf.len(), documents.len());
        Ok(Self { vocabulary, idf })
    }

    /// Fit on `documents` and return their vectors in the same order.
    pub fn fit_transform(
        documents:    &[String],
        max_features: Option<usize>,
    ) -> Result<(Self, Vec<SparseVector>), DetectError> {
        let vectorizer = Self::fit(documents, max_features)?;
        let vectors    = documents.iter().map(|d| vectorizer.transform(d)).collect();
        Ok((vectorizer, vectors))
    }

    /// Sparse, L2-normalised TF-IDF vector of one document.
    /// Terms outside the vocabulary are ignored; a document with no
    /// known terms maps to the empty vector.
    pub fn transform(&self, document: &str) -> SparseVector {
        let mut counts: BTreeMap<usize, f32> = BTreeMap::new();
        for term in terms(document) {
            if let Some(&index) = self.vocabulary.get(&term) {
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
        }

        let mut vector: SparseVector = counts
            .into_iter()
            .map(|(index, tf)| (index, tf * self.idf[index]))
            .collect();

        let norm = vector.iter().map(|(_, w)| w * w).sum::<f32>().sqrt();
        if norm > 0.0 {
            for (_, w) in &mut vector {
                *w /= norm;
            }
        }
        vector
    }

    /// Dense feature row of length `num_features()`, as fed to the
    /// bag-of-words model.
    pub fn transform_dense(&self, document: &str) -> Vec<f32> {
        to_dense(&self.transform(document), self.num_features())
    }

    pub fn num_features(&self) -> usize {
        self.idf.len()
    }

    #[cfg(test)]
    pub fn feature_index(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }
}

/// Expand a sparse vector into a dense row.
pub fn to_dense(vector: &SparseVector, len: usize) -> Vec<f32> {
    let mut row = vec![0.0f32; len];
    for &(index, weight) in vector {
        row[index] = weight;
    }
    row
}

/// Cosine similarity of two sparse vectors, in [0, 1] for TF-IDF input.
/// Zero vectors have similarity 0 with everything.
pub fn cosine_similarity(a: &SparseVector, b: &SparseVector) -> f32 {
    let (mut i, mut j) = (0usize, 0usize);
    let mut dot = 0.0f32;
    // Merge walk over the two index-sorted vectors
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            std::cmp::Ordering::Less    => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal   => {
                dot += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }

    let norm_a = a.iter().map(|(_, w)| w * w).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|(_, w)| w * w).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn docs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_terms_skip_single_characters() {
        let t: Vec<String> = terms("کتاب و قلم A Book").collect();
        assert_eq!(t, vec!["کتاب", "قلم", "book"]);
    }

    #[test]
    fn test_vocabulary_is_sorted() {
        let v = TfidfVectorizer::fit(&docs(&["beta alpha", "gamma"]), None).unwrap();
        assert_eq!(v.feature_index("alpha"), Some(0));
        assert_eq!(v.feature_index("beta"),  Some(1));
        assert_eq!(v.feature_index("gamma"), Some(2));
    }

    #[test]
    fn test_max_features_keeps_most_frequent() {
        let corpus = docs(&["نقل نقل نقل اصل", "نقل اصل متن"]);
        let v = TfidfVectorizer::fit(&corpus, Some(2)).unwrap();
        assert_eq!(v.num_features(), 2);
        assert!(v.feature_index("نقل").is_some());
        assert!(v.feature_index("اصل").is_some());
        assert!(v.feature_index("متن").is_none());
    }

    #[test]
    fn test_smooth_idf() {
        // "common" in both docs: idf = ln(3/3) + 1 = 1
        // "rare" in one doc:     idf = ln(3/2) + 1
        let v = TfidfVectorizer::fit(&docs(&["common rare", "common"]), None).unwrap();
        let common = v.idf[v.feature_index("common").unwrap()];
        let rare   = v.idf[v.feature_index("rare").unwrap()];
        assert!((common - 1.0).abs() < 1e-6);
        assert!((rare - (1.5f32.ln() + 1.0)).abs() < 1e-6);
    }

    #[test]
    fn test_vectors_have_unit_norm() {
        let (_, vectors) = TfidfVectorizer::fit_transform(&docs(&["ایک دو دو تین", "تین چار"]), None).unwrap();
        for v in &vectors {
            let norm: f32 = v.iter().map(|(_, w)| w * w).sum::<f32>().sqrt();
            assert!((norm - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_identical_documents_have_cosine_one() {
        let (_, v) = TfidfVectorizer::fit_transform(&docs(&["پاکستان زندہ باد", "پاکستان زندہ باد", "دیگر متن"]), None).unwrap();
        assert!((cosine_similarity(&v[0], &v[1]) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_disjoint_documents_have_cosine_zero() {
        let (_, v) = TfidfVectorizer::fit_transform(&docs(&["کتاب قلم", "دریا پہاڑ"]), None).unwrap();
        assert_eq!(cosine_similarity(&v[0], &v[1]), 0.0);
    }

    #[test]
    fn test_unknown_terms_give_empty_vector() {
        let v = TfidfVectorizer::fit(&docs(&["کتاب قلم"]), None).unwrap();
        assert!(v.transform("دریا").is_empty());
        assert_eq!(cosine_similarity(&v.transform("دریا"), &v.transform("کتاب")), 0.0);
    }

    #[test]
    fn test_empty_vocabulary_is_an_error() {
        assert!(matches!(
            TfidfVectorizer::fit(&docs(&["", "ا ب"]), None),
            Err(DetectError::EmptyVocabulary)
        ));
    }

    #[test]
    fn test_dense_row_matches_sparse() {
        let v     = TfidfVectorizer::fit(&docs(&["alpha beta", "beta gamma"]), None).unwrap();
        let dense = v.transform_dense("beta");
        assert_eq!(dense.len(), 3);
        assert!((dense[1] - 1.0).abs() < 1e-6);
        assert_eq!(dense[0], 0.0);
    }

    #[test]
    fn test_serde_round_trip_preserves_transform() {
        let v    = TfidfVectorizer::fit(&docs(&["کتاب قلم", "قلم دوات"]), Some(5000)).unwrap();
        let json = serde_json::to_string(&v).unwrap();
        let back: TfidfVectorizer = serde_json::from_str(&json).unwrap();
        assert_eq!(v.transform("قلم کتاب"), back.transform("قلم کتاب"));
    }
}
