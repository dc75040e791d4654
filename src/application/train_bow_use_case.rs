// ============================================================
// Layer 2 — Train Bag-of-Words Use Case
// ============================================================
//   Step 1: Load + clean labelled corpus      (Layer 4 - data)
//   Step 2: Fit TF-IDF (max_features terms)   (Layer 4 - data)
//   Step 3: Seeded train/test split           (Layer 4 - data)
//   Step 4: Train logistic regression         (Layer 5 - ml)
//   Step 5: Classification report on test set (Layer 6 - infra)
//   Step 6: Save vectorizer + model           (Layer 6 - infra)

use anyhow::Result;
use burn::module::AutodiffModule;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::application::corpus::load_clean_corpus;
use crate::data::{
    dataset::{FeatureSample, SampleDataset},
    splitter::{split_train_test, DEFAULT_SPLIT_SEED},
    vectorizer::{to_dense, TfidfVectorizer},
};
use crate::domain::{document::Label, error::DetectError};
use crate::infra::{checkpoint::CheckpointManager, metrics::ClassificationReport};
use crate::ml::{
    bow::BowClassifier,
    model::{BowModel, BowModelConfig},
    trainer::train_bow,
    TrainBackend,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BowTrainConfig {
    pub dataset_dir:    PathBuf,
    pub model_dir:      PathBuf,
    pub max_features:   usize,
    pub epochs:         usize,
    pub batch_size:     usize,
    pub lr:             f64,
    pub train_fraction: f64,
    pub seed:           u64,
}

impl Default for BowTrainConfig {
    fn default() -> Self {
        Self {
            dataset_dir:    PathBuf::from("dataset"),
            model_dir:      PathBuf::from("models/bow"),
            max_features:   5000,
            epochs:         30,
            batch_size:     32,
            lr:             1e-2,
            train_fraction: 0.8,
            seed:           DEFAULT_SPLIT_SEED,
        }
    }
}

impl BowTrainConfig {
    pub fn validate(&self) -> Result<(), DetectError> {
        if self.max_features == 0 || self.batch_size == 0 {
            return Err(DetectError::InvalidConfig(
                "max_features and batch_size must be positive".to_string(),
            ));
        }
        if !(self.train_fraction > 0.0 && self.train_fraction < 1.0) {
            return Err(DetectError::InvalidConfig(format!(
                "train_fraction must be in (0, 1), got {}",
                self.train_fraction
            )));
        }
        Ok(())
    }
}

pub struct TrainBowUseCase {
    config: BowTrainConfig,
}

impl TrainBowUseCase {
    pub fn new(config: BowTrainConfig) -> Self {
        Self { config }
    }

    /// Train, evaluate and save. Returns the held-out report.
    pub fn execute(&self) -> Result<ClassificationReport> {
        let cfg = &self.config;
        cfg.validate()?;

        // ── Step 1: Load + clean ──────────────────────────────────────────────
        let docs = load_clean_corpus(&cfg.dataset_dir)?;
        let texts: Vec<String> = docs.iter().map(|d| d.text.clone()).collect();

        // ── Step 2: Vectorize ─────────────────────────────────────────────────
        let (vectorizer, vectors) = TfidfVectorizer::fit_transform(&texts, Some(cfg.max_features))?;
        let num_features = vectorizer.num_features();
        tracing::info!("TF-IDF vocabulary: {} features", num_features);

        let samples: Vec<FeatureSample> = vectors
            .iter()
            .zip(docs.iter())
            .map(|(v, d)| FeatureSample {
                features: to_dense(v, num_features),
                label:    d.label.unwrap_or(Label::Original).class_index(),
            })
            .collect();

        // ── Step 3: Split ─────────────────────────────────────────────────────
        let (train, test) = split_train_test(samples, cfg.train_fraction, cfg.seed);
        tracing::info!("Split: {} train, {} test", train.len(), test.len());

        // ── Step 4: Train ─────────────────────────────────────────────────────
        let device = burn::backend::wgpu::WgpuDevice::default();
        let model: BowModel<TrainBackend> = BowModelConfig::new(num_features).init(&device);
        let model = train_bow(cfg, model, SampleDataset::new(train), &device)?;

        // ── Step 5: Evaluate ──────────────────────────────────────────────────
        let classifier = BowClassifier::new(vectorizer, model.valid(), device);
        let report     = evaluate(&classifier, &test)?;

        // ── Step 6: Save ──────────────────────────────────────────────────────
        let ckpt_manager = CheckpointManager::new(&cfg.model_dir);
        ckpt_manager.save_config(cfg)?;
        classifier.save(&ckpt_manager)?;

        Ok(report)
    }
}

/// Classification report of `classifier` on labelled feature rows.
pub fn evaluate<B: burn::prelude::Backend>(
    classifier: &BowClassifier<B>,
    samples:    &[FeatureSample],
) -> Result<ClassificationReport> {
    let rows: Vec<Vec<f32>> = samples.iter().map(|s| s.features.clone()).collect();
    let predicted: Vec<usize> = classifier
        .predict_rows(&rows)?
        .into_iter()
        .map(|p| if p[1] > p[0] { 1 } else { 0 })
        .collect();
    let actual: Vec<usize> = samples.iter().map(|s| s.label).collect();
    Ok(ClassificationReport::from_predictions(&predicted, &actual))
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    #[test]
    fn test_default_config_is_valid() {
        assert!(BowTrainConfig::default().validate().is_ok());
        let bad = BowTrainConfig { train_fraction: 1.0, ..Default::default() };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_evaluate_counts_every_sample() {
        let docs = vec!["کتاب".to_string(), "قلم".to_string()];
        let vectorizer = TfidfVectorizer::fit(&docs, None).unwrap();
        let device = Default::default();
        let model = BowModelConfig::new(vectorizer.num_features()).init::<NdArray>(&device);
        let classifier = BowClassifier::new(vectorizer, model, device);

        let samples = vec![
            FeatureSample { features: classifier.vectorizer().transform_dense("کتاب"), label: 1 },
            FeatureSample { features: classifier.vectorizer().transform_dense("قلم"), label: 0 },
        ];
        let report = evaluate(&classifier, &samples).unwrap();
        assert_eq!(report.total, 2);
    }
}
