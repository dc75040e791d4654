// ============================================================
// Layer 5 — Bag-of-Words Classifier
// ============================================================
// TF-IDF features fed to a logistic-regression head.
//
//   text ──► TfidfVectorizer::transform_dense ──► [1, F]
//        ──► BowModel::forward ──► softmax ──► [P(original), P(plagiarised)]
//
// Artifacts (models/bow/):
//   vectorizer.json     vocabulary + idf weights
//   model_config.json   BowModelConfig (feature count)
//   model.mpk           weights

use anyhow::{Context, Result};
use burn::prelude::*;
use std::fmt;

use crate::data::vectorizer::TfidfVectorizer;
use crate::domain::{document::Label, traits::ChunkClassifier};
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::model::{BowModel, BowModelConfig};

const VECTORIZER_FILE:   &str = "vectorizer.json";
const MODEL_CONFIG_FILE: &str = "model_config.json";
const MODEL_NAME:        &str = "model";

/// Confidence above which a prediction is reported without hedging
pub const CONFIDENT_ABOVE: f64 = 0.85;

// ─── Confidence bands ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceBand {
    HighlyPlagiarized,
    PossiblyPlagiarized,
    CleanText,
    LowConfidenceOriginal,
}

impl ConfidenceBand {
    pub fn classify(label: Label, confidence: f64) -> Self {
        let confident = confidence > CONFIDENT_ABOVE;
        match (label, confident) {
            (Label::Plagiarized, true)  => Self::HighlyPlagiarized,
            (Label::Plagiarized, false) => Self::PossiblyPlagiarized,
            (Label::Original,    true)  => Self::CleanText,
            (Label::Original,    false) => Self::LowConfidenceOriginal,
        }
    }
}

impl fmt::Display for ConfidenceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::HighlyPlagiarized     => "Highly Plagiarized",
            Self::PossiblyPlagiarized   => "Possibly Plagiarized, Review Advised",
            Self::CleanText             => "Clean Text",
            Self::LowConfidenceOriginal => "Looks Original, but Low Confidence – Manual Review Suggested",
        };
        f.write_str(s)
    }
}

/// Predicted class with the probability of that class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BowPrediction {
    pub label:      Label,
    pub confidence: f64,
    pub band:       ConfidenceBand,
}

impl BowPrediction {
    pub fn from_probabilities(probs: [f64; 2]) -> Self {
        // argmax; a tie goes to class 0
        let label = if probs[1] > probs[0] { Label::Plagiarized } else { Label::Original };
        let confidence = probs[label.class_index()];
        Self { label, confidence, band: ConfidenceBand::classify(label, confidence) }
    }
}

// ─── BowClassifier ────────────────────────────────────────────────────────────

pub struct BowClassifier<B: Backend> {
    vectorizer: TfidfVectorizer,
    model:      BowModel<B>,
    device:     B::Device,
}

impl<B: Backend> BowClassifier<B> {
    pub fn new(vectorizer: TfidfVectorizer, model: BowModel<B>, device: B::Device) -> Self {
        Self { vectorizer, model, device }
    }

    #[cfg(test)]
    pub fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }

    /// Write vectorizer, architecture and weights into the checkpoint directory.
    pub fn save(&self, ckpt_manager: &CheckpointManager) -> Result<()> {
        ckpt_manager.save_json(VECTORIZER_FILE, &self.vectorizer)?;
        ckpt_manager.save_json(MODEL_CONFIG_FILE, &BowModelConfig::new(self.vectorizer.num_features()))?;
        ckpt_manager.save_module(&self.model, MODEL_NAME)?;
        tracing::info!("Bag-of-words model saved to '{}'", ckpt_manager.dir().display());
        Ok(())
    }

    pub fn load(ckpt_manager: &CheckpointManager, device: B::Device) -> Result<Self> {
        let vectorizer: TfidfVectorizer = ckpt_manager.load_json(VECTORIZER_FILE)?;
        let model_cfg: BowModelConfig   = ckpt_manager.load_json(MODEL_CONFIG_FILE)?;
        anyhow::ensure!(
            model_cfg.num_features == vectorizer.num_features(),
            "vectorizer has {} features but the model expects {}",
            vectorizer.num_features(),
            model_cfg.num_features,
        );
        let model = ckpt_manager.load_module(model_cfg.init(&device), MODEL_NAME, &device)?;
        tracing::info!("Bag-of-words model loaded ({} features)", model_cfg.num_features);
        Ok(Self { vectorizer, model, device })
    }

    /// Softmax class probabilities for each dense feature row.
    pub fn predict_rows(&self, rows: &[Vec<f32>]) -> Result<Vec<[f64; 2]>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let num_features = self.vectorizer.num_features();
        let flat: Vec<f32> = rows.iter().flat_map(|r| r.iter().copied()).collect();
        let features = Tensor::<B, 1>::from_floats(flat.as_slice(), &self.device)
            .reshape([rows.len(), num_features]);

        let probs: Vec<f32> = burn::tensor::activation::softmax(self.model.forward(features), 1)
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| anyhow::anyhow!("Cannot read probabilities: {e:?}"))?;

        Ok(probs
            .chunks_exact(2)
            .map(|p| [p[0] as f64, p[1] as f64])
            .collect())
    }

    /// [P(original), P(plagiarised)] for one normalised text
    pub fn predict_proba(&self, text: &str) -> Result<[f64; 2]> {
        let row = self.vectorizer.transform_dense(text);
        self.predict_rows(std::slice::from_ref(&row))?
            .into_iter()
            .next()
            .context("model returned no prediction")
    }

    pub fn predict(&self, text: &str) -> Result<BowPrediction> {
        Ok(BowPrediction::from_probabilities(self.predict_proba(text)?))
    }
}

impl<B: Backend> ChunkClassifier for BowClassifier<B> {
    type Token = String;

    fn tokenize(&self, text: &str) -> Result<Vec<String>> {
        Ok(text.split_whitespace().map(str::to_string).collect())
    }

    fn plagiarism_probability(&self, chunk: &[String]) -> Result<f64> {
        let [_, plagiarized] = self.predict_proba(&chunk.join(" "))?;
        Ok(plagiarized)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;
    use tempfile::tempdir;

    type TestBackend = NdArray;

    fn classifier() -> BowClassifier<TestBackend> {
        let docs = vec!["کتاب اچھی".to_string(), "قلم نیا".to_string()];
        let vectorizer = TfidfVectorizer::fit(&docs, None).unwrap();
        let device = Default::default();
        let model = BowModelConfig::new(vectorizer.num_features()).init(&device);
        BowClassifier::new(vectorizer, model, device)
    }

    #[test]
    fn test_bands_cover_all_cases() {
        assert_eq!(ConfidenceBand::classify(Label::Plagiarized, 0.9), ConfidenceBand::HighlyPlagiarized);
        assert_eq!(ConfidenceBand::classify(Label::Plagiarized, 0.85), ConfidenceBand::PossiblyPlagiarized);
        assert_eq!(ConfidenceBand::classify(Label::Original, 0.99), ConfidenceBand::CleanText);
        assert_eq!(ConfidenceBand::classify(Label::Original, 0.6), ConfidenceBand::LowConfidenceOriginal);
        assert_eq!(ConfidenceBand::CleanText.to_string(), "Clean Text");
    }

    #[test]
    fn test_prediction_picks_larger_class() {
        let p = BowPrediction::from_probabilities([0.2, 0.8]);
        assert_eq!(p.label, Label::Plagiarized);
        assert!((p.confidence - 0.8).abs() < 1e-12);
        assert_eq!(p.band, ConfidenceBand::PossiblyPlagiarized);
    }

    #[test]
    fn test_probabilities_are_a_distribution() {
        let clf = classifier();
        let [p0, p1] = clf.predict_proba("کتاب اچھی ہے").unwrap();
        assert!((p0 + p1 - 1.0).abs() < 1e-5);

        let words = clf.tokenize("کتاب اچھی").unwrap();
        let p = clf.plagiarism_probability(&words).unwrap();
        assert!((0.0..=1.0).contains(&p));
    }

    #[test]
    fn test_save_and_load() {
        let dir  = tempdir().unwrap();
        let ckpt = CheckpointManager::new(dir.path());
        let clf  = classifier();
        clf.save(&ckpt).unwrap();

        let loaded = BowClassifier::<TestBackend>::load(&ckpt, Default::default()).unwrap();
        assert_eq!(loaded.vectorizer().num_features(), clf.vectorizer().num_features());

        let before = clf.predict_proba("قلم نیا").unwrap();
        let after  = loaded.predict_proba("قلم نیا").unwrap();
        assert!((before[1] - after[1]).abs() < 1e-2);
    }

    #[test]
    fn test_load_without_artifacts_fails() {
        let dir = tempdir().unwrap();
        assert!(BowClassifier::<TestBackend>::load(&CheckpointManager::new(dir.path()), Default::default()).is_err());
    }
}
