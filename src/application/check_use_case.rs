// ============================================================
// Layer 2 — Check Use Case
// ============================================================
// One document in, one verdict out:
//
//   1. Extract text (file) or take it as typed
//   2. Clean it (normalise + stop words)
//   3. Max cosine similarity vs the cleaned reference corpus
//   4. Chunk + classify + average     (transformer or bag-of-words)
//   5. Fuse both signals into a Decision
//
// Both signals are always computed, even when the similarity
// alone already decides the verdict, so the report shows them.

use anyhow::Result;
use std::{
    fmt,
    path::{Path, PathBuf},
};

use crate::application::{
    chunk_scoring::{score_chunks, ChunkScores},
    corpus::load_clean_corpus,
};
use crate::data::{chunker::Chunker, loader::extract_text_from_file, preprocessor::Preprocessor};
use crate::domain::{
    error::DetectError,
    traits::ChunkClassifier,
    verdict::{Decision, FusionPolicy},
};
use crate::infra::{checkpoint::CheckpointManager, tokenizer_store::TokenizerStore};
use crate::ml::{bow::BowClassifier, inferencer::Inferencer, similarity::max_similarity, InferBackend};

/// Which chunk classifier scores the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifierKind {
    Transformer,
    BagOfWords,
}

impl ClassifierKind {
    pub fn default_model_dir(self) -> PathBuf {
        match self {
            Self::Transformer => PathBuf::from("models/transformer"),
            Self::BagOfWords  => PathBuf::from("models/bow"),
        }
    }
}

impl fmt::Display for ClassifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transformer => f.write_str("transformer"),
            Self::BagOfWords  => f.write_str("bag-of-words"),
        }
    }
}

/// What the user handed in
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckInput {
    File(PathBuf),
    Text(String),
}

impl CheckInput {
    /// A line that names an existing file, or looks like a path, is a file;
    /// anything else is text. A mistyped path therefore fails at extraction
    /// instead of being scored as Urdu text.
    pub fn from_line(line: &str) -> Self {
        let trimmed = line.trim().trim_matches(|c: char| c == '"' || c == '\'');
        let path = Path::new(trimmed);
        if !trimmed.is_empty() && (path.is_file() || looks_like_path(trimmed)) {
            Self::File(path.to_path_buf())
        } else {
            Self::Text(line.trim().to_string())
        }
    }

    /// Extracted file contents, or the typed text unchanged
    pub fn raw_text(&self) -> Result<String> {
        match self {
            Self::File(path) => extract_text_from_file(path),
            Self::Text(text) => Ok(text.clone()),
        }
    }
}

/// One whitespace-free token with a path separator or a supported extension.
fn looks_like_path(candidate: &str) -> bool {
    if candidate.chars().any(char::is_whitespace) {
        return false;
    }
    if candidate.contains(['/', '\\']) {
        return true;
    }
    Path::new(candidate)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| SUPPORTED_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
}

const SUPPORTED_EXTENSIONS: [&str; 3] = ["txt", "docx", "pdf"];

#[derive(Debug, Clone)]
pub struct CheckConfig {
    pub dataset_dir: PathBuf,
    pub model_dir:   Option<PathBuf>,
    pub classifier:  ClassifierKind,
    pub max_tokens:  usize,
    pub stride:      usize,
    pub policy:      FusionPolicy,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            dataset_dir: PathBuf::from("dataset"),
            model_dir:   None,
            classifier:  ClassifierKind::Transformer,
            max_tokens:  300,
            stride:      50,
            policy:      FusionPolicy::default(),
        }
    }
}

impl CheckConfig {
    pub fn model_dir(&self) -> PathBuf {
        self.model_dir
            .clone()
            .unwrap_or_else(|| self.classifier.default_model_dir())
    }
}

/// Everything the check found, in the order it is reported
#[derive(Debug, Clone)]
pub struct CheckReport {
    pub extracted:  String,
    pub cleaned:    String,
    pub classifier: ClassifierKind,
    pub similarity: f64,
    pub chunks:     ChunkScores,
    pub decision:   Decision,
}

pub struct CheckUseCase {
    config: CheckConfig,
}

impl CheckUseCase {
    pub fn new(config: CheckConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self, input: &CheckInput) -> Result<CheckReport> {
        let cfg = &self.config;
        // invalid chunking or thresholds fail before any model is loaded
        let chunker = Chunker::new(cfg.max_tokens, cfg.stride)?;
        cfg.policy.validate()?;

        let extracted = input.raw_text()?;
        let corpus: Vec<String> = load_clean_corpus(&cfg.dataset_dir)?
            .into_iter()
            .map(|d| d.text)
            .collect();

        let model_dir    = cfg.model_dir();
        let ckpt_manager = CheckpointManager::new(&model_dir);
        let device       = burn::backend::wgpu::WgpuDevice::default();

        match cfg.classifier {
            ClassifierKind::Transformer => {
                let tokenizer  = TokenizerStore::new(&model_dir).load()?;
                let inferencer = Inferencer::<InferBackend>::from_checkpoint(&ckpt_manager, tokenizer, device)?;
                inferencer.ensure_fits(cfg.max_tokens)?;
                assess(extracted, &corpus, &chunker, &inferencer, cfg.classifier, &cfg.policy)
            }
            ClassifierKind::BagOfWords => {
                let classifier = BowClassifier::<InferBackend>::load(&ckpt_manager, device)?;
                assess(extracted, &corpus, &chunker, &classifier, cfg.classifier, &cfg.policy)
            }
        }
    }
}

/// Score already-extracted text against a cleaned corpus with any classifier.
pub fn assess<C: ChunkClassifier>(
    extracted:  String,
    corpus:     &[String],
    chunker:    &Chunker,
    classifier: &C,
    kind:       ClassifierKind,
    policy:     &FusionPolicy,
) -> Result<CheckReport> {
    let cleaned = Preprocessor::new().clean(&extracted);
    if cleaned.is_empty() {
        return Err(DetectError::EmptyInput.into());
    }

    let similarity = max_similarity(&cleaned, corpus)?;
    tracing::info!("Max cosine similarity vs dataset: {:.2}%", similarity);

    let chunks = score_chunks(chunker, &cleaned, classifier)?;
    tracing::info!("Average {} plagiarism probability: {:.2}%", kind, chunks.average);

    let decision = policy.decide(similarity, chunks.average);
    tracing::info!("Decision: {:?} via {:?}", decision.verdict, decision.rule);

    Ok(CheckReport { extracted, cleaned, classifier: kind, similarity, chunks, decision })
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    use crate::domain::verdict::{DecisionRule, Verdict};

    /// Always returns the same probability.
    struct Fixed(f64);

    impl ChunkClassifier for Fixed {
        type Token = String;

        fn tokenize(&self, text: &str) -> Result<Vec<String>> {
            Ok(text.split_whitespace().map(str::to_string).collect())
        }

        fn plagiarism_probability(&self, _chunk: &[String]) -> Result<f64> {
            Ok(self.0)
        }
    }

    fn corpus() -> Vec<String> {
        vec!["لاہور تاریخی شہر".to_string(), "کرکٹ مقبول کھیل".to_string()]
    }

    fn run(text: &str, p: f64) -> Result<CheckReport> {
        let chunker = Chunker::new(300, 50).unwrap();
        assess(text.to_string(), &corpus(), &chunker, &Fixed(p), ClassifierKind::BagOfWords, &FusionPolicy::default())
    }

    #[test]
    fn test_copied_text_with_confident_classifier_is_plagiarized() {
        let report = run("کرکٹ مقبول کھیل", 0.9).unwrap();
        assert!(report.similarity > 99.0);
        assert!((report.chunks.average - 90.0).abs() < 1e-9);
        assert_eq!(report.decision.verdict, Verdict::Plagiarized);
    }

    #[test]
    fn test_dissimilar_text_is_original_whatever_the_classifier_says() {
        let report = run("بارش موسم سردی", 0.99).unwrap();
        assert_eq!(report.similarity, 0.0);
        assert_eq!(report.decision.verdict, Verdict::Original);
        assert_eq!(report.decision.rule, DecisionRule::SimilarityBelowFloor);
    }

    #[test]
    fn test_uncertain_classifier_needs_review() {
        let report = run("لاہور تاریخی شہر", 0.5).unwrap();
        assert_eq!(report.decision.verdict, Verdict::ManualReview);
    }

    #[test]
    fn test_text_of_only_stop_words_is_empty_input() {
        let err = run("اور کے کی ہے", 0.5).unwrap_err();
        assert!(matches!(err.downcast_ref::<DetectError>(), Some(DetectError::EmptyInput)));
    }

    #[test]
    fn test_line_naming_a_file_is_a_file() {
        let dir  = tempdir().unwrap();
        let path = dir.path().join("input.txt");
        fs::write(&path, "متن").unwrap();

        assert_eq!(CheckInput::from_line(path.to_str().unwrap()), CheckInput::File(path.clone()));
        assert_eq!(CheckInput::from_line("  یہ متن ہے "), CheckInput::Text("یہ متن ہے".to_string()));
    }

    #[test]
    fn test_line_that_looks_like_a_path_is_a_file() {
        assert_eq!(CheckInput::from_line("report.PDF"), CheckInput::File(PathBuf::from("report.PDF")));
        assert_eq!(CheckInput::from_line("\"notes/draft\""), CheckInput::File(PathBuf::from("notes/draft")));
        // a sentence ending in a file name is still text
        assert!(matches!(CheckInput::from_line("یہ فائل report.pdf ہے"), CheckInput::Text(_)));
    }

    #[test]
    fn test_missing_pdf_is_unreadable() {
        let dir  = tempdir().unwrap();
        let path = dir.path().join("missing").join("report.pdf");
        let input = CheckInput::from_line(path.to_str().unwrap());
        assert_eq!(input, CheckInput::File(path));

        let err = input.raw_text().unwrap_err();
        assert!(matches!(err.downcast_ref::<DetectError>(), Some(DetectError::Unreadable { .. })));
    }

    #[test]
    fn test_existing_file_of_unknown_format_is_unsupported() {
        let dir  = tempdir().unwrap();
        let path = dir.path().join("notes.rtf");
        fs::write(&path, "{\\rtf1 متن}").unwrap();

        let err = CheckInput::from_line(path.to_str().unwrap()).raw_text().unwrap_err();
        assert!(matches!(err.downcast_ref::<DetectError>(), Some(DetectError::UnsupportedFormat { .. })));
    }

    #[test]
    fn test_missing_input_file_aborts_the_check() {
        let dir = tempdir().unwrap();
        let cfg = CheckConfig { dataset_dir: dir.path().to_path_buf(), ..CheckConfig::default() };
        let err = CheckUseCase::new(cfg).execute(&CheckInput::from_line("nowhere/report.pdf")).unwrap_err();
        assert!(matches!(err.downcast_ref::<DetectError>(), Some(DetectError::Unreadable { .. })));
    }

    #[test]
    fn test_unreachable_threshold_row_fails_before_loading_anything() {
        let policy = FusionPolicy::new(30.0, 70.0, 90.0);
        let cfg = CheckConfig { policy, ..CheckConfig::default() };
        let err = CheckUseCase::new(cfg).execute(&CheckInput::Text("متن".to_string())).unwrap_err();
        assert!(matches!(err.downcast_ref::<DetectError>(), Some(DetectError::InvalidConfig(_))));
    }

    #[test]
    fn test_invalid_chunking_fails_before_loading_anything() {
        let cfg = CheckConfig { max_tokens: 50, stride: 50, ..CheckConfig::default() };
        let err = CheckUseCase::new(cfg).execute(&CheckInput::Text("متن".to_string())).unwrap_err();
        assert!(matches!(err.downcast_ref::<DetectError>(), Some(DetectError::InvalidChunking { .. })));
    }

    #[test]
    fn test_model_dir_follows_classifier() {
        let cfg = CheckConfig { classifier: ClassifierKind::BagOfWords, ..CheckConfig::default() };
        assert_eq!(cfg.model_dir(), PathBuf::from("models/bow"));
        let cfg = CheckConfig { model_dir: Some(PathBuf::from("x")), ..cfg };
        assert_eq!(cfg.model_dir(), PathBuf::from("x"));
    }
}
