// ============================================================
// Layer 5 — Training Loops
// ============================================================
// Train + validation loops using Burn's DataLoader and Adam,
// one for each classifier.
//
// Burn backend notes:
//   - Training runs on an AutodiffBackend for gradients
//   - model.valid() returns the model on B::InnerBackend
//   - the validation batcher must also use B::InnerBackend
//   - argmax(1) returns [batch, 1], flattened before .equal()
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use anyhow::Result;
use burn::{
    data::dataloader::DataLoaderBuilder,
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::backend::AutodiffBackend,
};

use crate::application::{
    train_bow_use_case::BowTrainConfig,
    train_transformer_use_case::TransformerTrainConfig,
};
use crate::data::{
    batcher::{FeatureBatcher, TokenBatcher},
    dataset::{FeatureSample, SampleDataset, TokenSample},
};
use crate::infra::{
    checkpoint::CheckpointManager,
    metrics::{EpochMetrics, MetricsLogger},
};
use crate::ml::model::{BowModel, TransformerClassifier};

/// Number of correct argmax predictions in a batch of logits.
fn count_correct<B: Backend>(logits: Tensor<B, 2>, labels: Tensor<B, 1, Int>) -> usize {
    let predicted = logits.argmax(1).flatten::<1>(0, 1);
    predicted
        .equal(labels)
        .int()
        .sum()
        .into_scalar()
        .elem::<i64>() as usize
}

fn mean(sum: f64, count: usize) -> f64 {
    if count > 0 { sum / count as f64 } else { f64::NAN }
}

// ─── Transformer ──────────────────────────────────────────────────────────────

/// Train the transformer from epoch `completed_epochs + 1` up to `cfg.epochs`.
///
/// Every epoch is validated, logged to metrics.csv and checkpointed, so an
/// interrupted run can be resumed with the epoch numbering carrying on.
#[allow(clippy::too_many_arguments)]
pub fn train_transformer<B: AutodiffBackend>(
    cfg:              &TransformerTrainConfig,
    mut model:        TransformerClassifier<B>,
    completed_epochs: usize,
    train_dataset:    SampleDataset<TokenSample>,
    val_dataset:      SampleDataset<TokenSample>,
    ckpt_manager:     &CheckpointManager,
    metrics:          &MetricsLogger,
    device:           &B::Device,
) -> Result<TransformerClassifier<B>> {
    if completed_epochs >= cfg.epochs {
        tracing::info!(
            "Checkpoint already covers {} of {} epochs, nothing to train",
            completed_epochs, cfg.epochs,
        );
        return Ok(model);
    }

    // ── Adam optimiser ────────────────────────────────────────────────────────
    // m = β1*m + (1-β1)*g        (mean)
    // v = β2*v + (1-β2)*g²       (variance)
    // θ = θ - lr * m / (√v + ε)  (update)
    let mut optim = AdamConfig::new().with_epsilon(1e-8).init();

    // ── Training data loader (AutodiffBackend) ────────────────────────────────
    let train_loader = DataLoaderBuilder::new(TokenBatcher::<B>::new(device.clone()))
        .batch_size(cfg.batch_size)
        .shuffle(cfg.seed)
        .num_workers(1)
        .build(train_dataset);

    // ── Validation data loader (InnerBackend — no autodiff overhead) ──────────
    let val_loader = DataLoaderBuilder::new(TokenBatcher::<B::InnerBackend>::new(device.clone()))
        .batch_size(cfg.batch_size)
        .num_workers(1)
        .build(val_dataset);

    let mut best_val_loss = f64::INFINITY;

    for epoch in (completed_epochs + 1)..=cfg.epochs {

        // ── Training phase ────────────────────────────────────────────────────
        let mut train_loss_sum = 0.0f64;
        let mut train_batches  = 0usize;

        for batch in train_loader.iter() {
            let (loss, _) = model.forward_loss(batch.input_ids, batch.attention_mask, batch.labels);

            train_loss_sum += loss.clone().into_scalar().elem::<f64>();
            train_batches  += 1;

            // Backward pass + Adam update
            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.lr, model, grads);
        }

        // ── Validation phase ──────────────────────────────────────────────────
        // dropout disabled for deterministic evaluation
        let model_valid = model.valid();

        let mut val_loss_sum  = 0.0f64;
        let mut val_batches   = 0usize;
        let mut correct       = 0usize;
        let mut total_samples = 0usize;

        for batch in val_loader.iter() {
            total_samples += batch.labels.dims()[0];
            let (loss, logits) = model_valid.forward_loss(
                batch.input_ids,
                batch.attention_mask,
                batch.labels.clone(),
            );
            val_loss_sum += loss.into_scalar().elem::<f64>();
            val_batches  += 1;
            correct      += count_correct(logits, batch.labels);
        }

        let val_accuracy = if total_samples > 0 { correct as f64 / total_samples as f64 } else { 0.0 };
        let row = EpochMetrics::new(
            epoch,
            mean(train_loss_sum, train_batches),
            mean(val_loss_sum, val_batches),
            val_accuracy,
        );

        println!(
            "Epoch {:>3}/{} | train_loss={:.4} | val_loss={:.4} | val_acc={:.1}%",
            epoch, cfg.epochs, row.train_loss, row.val_loss, row.val_accuracy * 100.0,
        );
        if row.is_improvement(best_val_loss) {
            best_val_loss = row.val_loss;
            tracing::info!("New best validation loss {:.4} at epoch {}", best_val_loss, epoch);
        }

        metrics.log(&row)?;
        ckpt_manager.save_epoch(&model, epoch)?;
        tracing::info!("Checkpoint saved for epoch {}", epoch);
    }

    tracing::info!("Transformer training complete!");
    Ok(model)
}

// ─── Bag-of-words ─────────────────────────────────────────────────────────────

/// Fit the logistic-regression head on dense TF-IDF rows.
pub fn train_bow<B: AutodiffBackend>(
    cfg:           &BowTrainConfig,
    mut model:     BowModel<B>,
    train_dataset: SampleDataset<FeatureSample>,
    device:        &B::Device,
) -> Result<BowModel<B>> {
    let mut optim = AdamConfig::new().init();

    let train_loader = DataLoaderBuilder::new(FeatureBatcher::<B>::new(device.clone()))
        .batch_size(cfg.batch_size)
        .shuffle(cfg.seed)
        .num_workers(1)
        .build(train_dataset);

    for epoch in 1..=cfg.epochs {
        let mut loss_sum = 0.0f64;
        let mut batches  = 0usize;
        let mut correct  = 0usize;
        let mut seen     = 0usize;

        for batch in train_loader.iter() {
            seen += batch.labels.dims()[0];
            let (loss, logits) = model.forward_loss(batch.features, batch.labels.clone());

            loss_sum += loss.clone().into_scalar().elem::<f64>();
            batches  += 1;
            correct  += count_correct(logits, batch.labels);

            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.lr, model, grads);
        }

        tracing::debug!(
            "BoW epoch {}/{}: loss={:.4}, train_acc={:.3}",
            epoch,
            cfg.epochs,
            mean(loss_sum, batches),
            if seen > 0 { correct as f64 / seen as f64 } else { 0.0 },
        );
    }

    tracing::info!("Bag-of-words training complete ({} epochs)", cfg.epochs);
    Ok(model)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::{Autodiff, NdArray};
    use tempfile::tempdir;

    use crate::ml::model::{BowModelConfig, TransformerClassifierConfig};

    type TestBackend = Autodiff<NdArray>;

    fn token_samples() -> Vec<TokenSample> {
        vec![
            TokenSample { input_ids: vec![101, 5, 6, 102], attention_mask: vec![1, 1, 1, 1], label: 1 },
            TokenSample { input_ids: vec![101, 7, 102, 0], attention_mask: vec![1, 1, 1, 0], label: 0 },
            TokenSample { input_ids: vec![101, 5, 102, 0], attention_mask: vec![1, 1, 1, 0], label: 1 },
            TokenSample { input_ids: vec![101, 8, 9, 102], attention_mask: vec![1, 1, 1, 1], label: 0 },
        ]
    }

    fn tiny_transformer_cfg(model_dir: &std::path::Path, epochs: usize) -> TransformerTrainConfig {
        TransformerTrainConfig {
            model_dir:   model_dir.to_path_buf(),
            vocab_size:  110,
            max_seq_len: 4,
            d_model:     8,
            num_heads:   2,
            num_layers:  1,
            d_ff:        16,
            dropout:     0.0,
            epochs,
            batch_size:  2,
            ..TransformerTrainConfig::default()
        }
    }

    #[test]
    fn test_transformer_epochs_are_logged_and_checkpointed() {
        let dir     = tempdir().unwrap();
        let cfg     = tiny_transformer_cfg(dir.path(), 2);
        let device  = Default::default();
        let ckpt    = CheckpointManager::new(dir.path());
        let metrics = MetricsLogger::new(dir.path()).unwrap();

        let model: TransformerClassifier<TestBackend> =
            TransformerClassifierConfig::new(110, 4, 8, 2, 1, 16, 0.0).init(&device);

        train_transformer(
            &cfg, model, 0,
            SampleDataset::new(token_samples()),
            SampleDataset::new(token_samples()),
            &ckpt, &metrics, &device,
        ).unwrap();

        assert_eq!(ckpt.latest_epoch().unwrap(), 2);
        let csv = std::fs::read_to_string(metrics.csv_path()).unwrap();
        assert_eq!(csv.lines().count(), 3);
    }

    #[test]
    fn test_resume_continues_epoch_numbering() {
        let dir     = tempdir().unwrap();
        let cfg     = tiny_transformer_cfg(dir.path(), 3);
        let device  = Default::default();
        let ckpt    = CheckpointManager::new(dir.path());
        let metrics = MetricsLogger::new(dir.path()).unwrap();

        let model: TransformerClassifier<TestBackend> =
            TransformerClassifierConfig::new(110, 4, 8, 2, 1, 16, 0.0).init(&device);

        train_transformer(
            &cfg, model, 2,
            SampleDataset::new(token_samples()),
            SampleDataset::new(token_samples()),
            &ckpt, &metrics, &device,
        ).unwrap();

        // only epoch 3 was run
        assert_eq!(ckpt.latest_epoch().unwrap(), 3);
        let csv = std::fs::read_to_string(metrics.csv_path()).unwrap();
        assert!(csv.lines().nth(1).unwrap().starts_with("3,"));
    }

    #[test]
    fn test_bow_training_separates_classes() {
        let device = Default::default();
        let cfg = BowTrainConfig { epochs: 60, batch_size: 4, lr: 0.1, ..BowTrainConfig::default() };

        let samples = vec![
            FeatureSample { features: vec![1.0, 0.0], label: 1 },
            FeatureSample { features: vec![0.9, 0.1], label: 1 },
            FeatureSample { features: vec![0.0, 1.0], label: 0 },
            FeatureSample { features: vec![0.1, 0.9], label: 0 },
        ];

        let model: BowModel<TestBackend> = BowModelConfig::new(2).init(&device);
        let model = train_bow(&cfg, model, SampleDataset::new(samples), &device).unwrap();

        let inner = model.valid();
        let logits = inner.forward(
            Tensor::<NdArray, 1>::from_floats([1.0, 0.0, 0.0, 1.0], &device).reshape([2, 2]),
        );
        let predicted: Vec<i64> = logits.argmax(1).flatten::<1>(0, 1).into_data().to_vec().unwrap();
        assert_eq!(predicted, vec![1, 0]);
    }
}
