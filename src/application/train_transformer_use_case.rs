// ============================================================
// Layer 2 — Train Transformer Use Case
// ============================================================
// Orchestrates the transformer training pipeline in order:
//
//   Step 1: Load + clean labelled corpus  (Layer 4 - data)
//   Step 2: Load / build tokenizer        (Layer 6 - infra)
//   Step 3: Encode [CLS] doc [SEP]        (Layer 4 - data)
//   Step 4: Seeded train/validation split (Layer 4 - data)
//   Step 5: Build or resume the model     (Layer 5 - ml, Layer 6 - infra)
//   Step 6: Save config                   (Layer 6 - infra)
//   Step 7: Run training loop             (Layer 5 - ml)
//
// Reference: Burn Book §5 (Training)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::application::corpus::load_clean_corpus;
use crate::data::{
    dataset::{SampleDataset, SpecialIds, TokenSample},
    splitter::{split_train_test, DEFAULT_SPLIT_SEED},
};
use crate::domain::{document::Label, error::DetectError};
use crate::infra::{
    checkpoint::CheckpointManager,
    metrics::MetricsLogger,
    tokenizer_store::{id_space, special_id, TokenizerStore, CLS_TOKEN, PAD_TOKEN, SEP_TOKEN},
};
use crate::ml::{
    model::{TransformerClassifier, TransformerClassifierConfig},
    trainer::train_transformer,
    TrainBackend,
};

// ─── Training Configuration ──────────────────────────────────────────────────
// All hyperparameters for a training run.
// Saved next to the checkpoints so inference can rebuild the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformerTrainConfig {
    pub dataset_dir:    PathBuf,
    pub model_dir:      PathBuf,
    /// Upper bound on vocabulary entries; replaced by the tokenizer's
    /// id space before the model is built
    pub vocab_size:     usize,
    pub max_seq_len:    usize,
    pub d_model:        usize,
    pub num_heads:      usize,
    pub num_layers:     usize,
    pub d_ff:           usize,
    pub dropout:        f64,
    /// Total epochs; a resumed run stops at the same number
    pub epochs:         usize,
    pub batch_size:     usize,
    pub lr:             f64,
    pub train_fraction: f64,
    pub seed:           u64,
    #[serde(skip)]
    pub resume:         bool,
}

impl Default for TransformerTrainConfig {
    fn default() -> Self {
        Self {
            dataset_dir:    PathBuf::from("dataset"),
            model_dir:      PathBuf::from("models/transformer"),
            vocab_size:     30_000,
            max_seq_len:    512,
            d_model:        256,
            num_heads:      8,
            num_layers:     4,
            d_ff:           1024,
            dropout:        0.1,
            epochs:         3,
            batch_size:     8,
            lr:             2e-4,
            train_fraction: 0.8,
            seed:           DEFAULT_SPLIT_SEED,
            resume:         false,
        }
    }
}

impl TransformerTrainConfig {
    pub fn validate(&self) -> Result<(), DetectError> {
        let invalid = |msg: String| Err(DetectError::InvalidConfig(msg));
        if self.max_seq_len < 3 {
            return invalid(format!("max_seq_len must be at least 3, got {}", self.max_seq_len));
        }
        if self.num_heads == 0 || self.d_model % self.num_heads != 0 {
            return invalid(format!(
                "d_model ({}) must be divisible by num_heads ({})",
                self.d_model, self.num_heads
            ));
        }
        if self.batch_size == 0 {
            return invalid("batch_size must be positive".to_string());
        }
        if !(0.0..1.0).contains(&self.train_fraction) || self.train_fraction == 0.0 {
            return invalid(format!("train_fraction must be in (0, 1), got {}", self.train_fraction));
        }
        Ok(())
    }

    pub fn model_config(&self) -> TransformerClassifierConfig {
        TransformerClassifierConfig::new(
            self.vocab_size, self.max_seq_len, self.d_model,
            self.num_heads, self.num_layers, self.d_ff, self.dropout,
        )
    }

    /// Keep this run's schedule but the saved run's architecture.
    fn with_architecture_of(&self, saved: &TransformerTrainConfig) -> Self {
        Self {
            vocab_size:  saved.vocab_size,
            max_seq_len: saved.max_seq_len,
            d_model:     saved.d_model,
            num_heads:   saved.num_heads,
            num_layers:  saved.num_layers,
            d_ff:        saved.d_ff,
            ..self.clone()
        }
    }
}

// ─── TrainTransformerUseCase ──────────────────────────────────────────────────
pub struct TrainTransformerUseCase {
    config: TransformerTrainConfig,
}

impl TrainTransformerUseCase {
    pub fn new(config: TransformerTrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full training pipeline end to end
    pub fn execute(&self) -> Result<()> {
        self.config.validate()?;
        let ckpt_manager = CheckpointManager::new(&self.config.model_dir);
        let resuming = self.config.resume && ckpt_manager.has_epoch_checkpoint();
        if self.config.resume && !resuming {
            tracing::warn!("--resume given but no checkpoint in '{}'; starting fresh", self.config.model_dir.display());
        }

        // ── Step 1: Load + clean corpus ───────────────────────────────────────
        tracing::info!("Loading dataset from '{}'", self.config.dataset_dir.display());
        let docs  = load_clean_corpus(&self.config.dataset_dir)?;
        let texts: Vec<String> = docs.iter().map(|d| d.text.clone()).collect();

        // ── Step 2: Build / load tokenizer ────────────────────────────────────
        let tokenizer = TokenizerStore::new(&self.config.model_dir)
            .load_or_build(&texts, self.config.vocab_size)?;
        let special = SpecialIds {
            cls: special_id(&tokenizer, CLS_TOKEN)?,
            sep: special_id(&tokenizer, SEP_TOKEN)?,
            pad: special_id(&tokenizer, PAD_TOKEN)?,
        };

        let cfg = if resuming {
            let saved: TransformerTrainConfig = ckpt_manager.load_config()?;
            self.config.with_architecture_of(&saved)
        } else {
            TransformerTrainConfig { vocab_size: id_space(&tokenizer), ..self.config.clone() }
        };
        cfg.validate()?;

        // ── Step 3: Encode documents ──────────────────────────────────────────
        let mut samples = Vec::with_capacity(docs.len());
        for doc in &docs {
            let label = doc.label.unwrap_or(Label::Original);
            let enc = tokenizer
                .encode(doc.text.as_str(), false)
                .map_err(|e| anyhow::anyhow!("Tokenisation error in '{}': {e}", doc.source))?;
            samples.push(TokenSample::encode(enc.get_ids(), special, cfg.max_seq_len, label.class_index()));
        }
        let truncated = samples.iter().filter(|s| s.real_len() == cfg.max_seq_len).count();
        tracing::info!("Encoded {} documents ({} reach max_seq_len={})", samples.len(), truncated, cfg.max_seq_len);

        // ── Step 4: Train / validation split ──────────────────────────────────
        let (train_samples, val_samples) = split_train_test(samples, cfg.train_fraction, cfg.seed);
        let train_dataset = SampleDataset::new(train_samples);
        let val_dataset   = SampleDataset::new(val_samples);
        tracing::info!(
            "Split: {} train, {} validation",
            train_dataset.sample_count(),
            val_dataset.sample_count()
        );

        // ── Step 5: Build or resume model ─────────────────────────────────────
        let device = burn::backend::wgpu::WgpuDevice::default();
        tracing::info!("Using WGPU device: {:?}", device);

        let model: TransformerClassifier<TrainBackend> = cfg.model_config().init(&device);
        let (model, completed_epochs) = if resuming {
            ckpt_manager
                .load_latest(model, &device)
                .context("Cannot resume transformer training")?
        } else {
            (model, 0)
        };
        tracing::info!(
            "Model ready: {} layers, d_model={}, vocab={}, starting after epoch {}",
            cfg.num_layers, cfg.d_model, cfg.vocab_size, completed_epochs,
        );

        // ── Step 6: Save config for inference ─────────────────────────────────
        ckpt_manager.save_config(&cfg)?;
        let metrics = MetricsLogger::new(&cfg.model_dir)?;

        // ── Step 7: Run training loop (Layer 5) ───────────────────────────────
        train_transformer(
            &cfg, model, completed_epochs,
            train_dataset, val_dataset,
            &ckpt_manager, &metrics, &device,
        )?;

        Ok(())
    }
}
