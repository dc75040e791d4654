// ============================================================
// Layer 2 — Predict Bag-of-Words Use Case
// ============================================================
// Whole-text prediction with the bag-of-words model, reported as
// one of four confidence bands. No chunking, no similarity.

use anyhow::Result;
use std::path::PathBuf;

use crate::application::check_use_case::CheckInput;
use crate::data::preprocessor::Preprocessor;
use crate::domain::error::DetectError;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::{bow::{BowClassifier, BowPrediction}, InferBackend};

pub struct PredictBowUseCase {
    classifier: BowClassifier<InferBackend>,
}

impl PredictBowUseCase {
    pub fn new(model_dir: PathBuf) -> Result<Self> {
        let device     = burn::backend::wgpu::WgpuDevice::default();
        let classifier = BowClassifier::load(&CheckpointManager::new(model_dir), device)?;
        Ok(Self { classifier })
    }

    pub fn predict(&self, input: &CheckInput) -> Result<BowPrediction> {
        let cleaned = Preprocessor::new().clean(&input.raw_text()?);
        if cleaned.is_empty() {
            return Err(DetectError::EmptyInput.into());
        }
        let prediction = self.classifier.predict(&cleaned)?;
        tracing::info!(
            "Bag-of-words prediction: {} ({:.2}% confidence)",
            prediction.label,
            prediction.confidence * 100.0
        );
        Ok(prediction)
    }
}
