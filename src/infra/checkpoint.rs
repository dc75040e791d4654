// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Saves and restores model weights using Burn's CompactRecorder,
// and the JSON configuration needed to rebuild each model.
//
// Layout of one artifact directory:
//   models/transformer/
//     model_epoch_1.mpk      ← weights after epoch 1
//     model_epoch_2.mpk
//     latest_epoch.json      ← number of the latest epoch
//     train_config.json      ← architecture + hyperparameters
//     tokenizer.json
//     metrics.csv
//   models/bow/
//     model.mpk
//     train_config.json
//     vectorizer.json
//
// Why save the config separately?
//   Loading a record needs a model of the exact same architecture
//   to load into. The inferencer rebuilds it from the config first.

use anyhow::{Context, Result};
use std::{fs, path::{Path, PathBuf}};
use burn::{
    prelude::*,
    record::{CompactRecorder, Recorder},
};
use serde::{de::DeserializeOwned, Serialize};

const LATEST_EPOCH_FILE: &str = "latest_epoch.json";
const CONFIG_FILE:       &str = "train_config.json";

/// Manages saving and loading of model artifacts in one directory.
pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create directory '{}'", self.dir.display()))
    }

    // ── Weights ───────────────────────────────────────────────────────────────

    /// Save a module's record under `{dir}/{name}` (the recorder adds the extension).
    pub fn save_module<B: Backend, M: Module<B>>(&self, module: &M, name: &str) -> Result<()> {
        self.ensure_dir()?;
        let path = self.dir.join(name);

        CompactRecorder::new()
            .record(module.clone().into_record(), path.clone())
            .with_context(|| format!("Failed to save checkpoint to '{}'", path.display()))?;

        tracing::debug!("Saved module record '{}'", path.display());
        Ok(())
    }

    /// Load `{dir}/{name}` into a freshly initialised module of the same architecture.
    pub fn load_module<B: Backend, M: Module<B>>(
        &self,
        module: M,
        name:   &str,
        device: &B::Device,
    ) -> Result<M> {
        let path = self.dir.join(name);
        let record = CompactRecorder::new()
            .load(path.clone(), device)
            .with_context(|| {
                format!("Cannot load checkpoint '{}'. Have you trained the model first?", path.display())
            })?;
        Ok(module.load_record(record))
    }

    /// Save weights for a given epoch and move the latest-epoch pointer.
    pub fn save_epoch<B: Backend, M: Module<B>>(&self, module: &M, epoch: usize) -> Result<()> {
        self.save_module(module, &format!("model_epoch_{epoch}"))?;
        let latest_path = self.dir.join(LATEST_EPOCH_FILE);
        fs::write(&latest_path, serde_json::to_string(&epoch)?)
            .with_context(|| format!("Failed to write '{}'", latest_path.display()))?;
        Ok(())
    }

    /// Load weights from the latest saved epoch; returns the model and that epoch.
    pub fn load_latest<B: Backend, M: Module<B>>(
        &self,
        module: M,
        device: &B::Device,
    ) -> Result<(M, usize)> {
        let epoch = self.latest_epoch()?;
        tracing::info!("Loading checkpoint from epoch {}", epoch);
        let module = self.load_module(module, &format!("model_epoch_{epoch}"), device)?;
        Ok((module, epoch))
    }

    /// Read latest_epoch.json and return the epoch number.
    pub fn latest_epoch(&self) -> Result<usize> {
        let path = self.dir.join(LATEST_EPOCH_FILE);
        let s = fs::read_to_string(&path)
            .with_context(|| format!("Cannot find '{}'. Have you run training first?", path.display()))?;
        Ok(serde_json::from_str::<usize>(&s)?)
    }

    pub fn has_epoch_checkpoint(&self) -> bool {
        self.dir.join(LATEST_EPOCH_FILE).exists()
    }

    // ── JSON side files ───────────────────────────────────────────────────────

    /// Save the training configuration so inference can rebuild the model.
    pub fn save_config<T: Serialize>(&self, cfg: &T) -> Result<()> {
        self.save_json(CONFIG_FILE, cfg)
    }

    pub fn load_config<T: DeserializeOwned>(&self) -> Result<T> {
        self.load_json(CONFIG_FILE)
    }

    pub fn save_json<T: Serialize>(&self, file_name: &str, value: &T) -> Result<()> {
        self.ensure_dir()?;
        let path = self.dir.join(file_name);
        let json = serde_json::to_string_pretty(value)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write '{}'", path.display()))?;
        tracing::debug!("Saved '{}'", path.display());
        Ok(())
    }

    pub fn load_json<T: DeserializeOwned>(&self, file_name: &str) -> Result<T> {
        let path = self.dir.join(file_name);
        let json = fs::read_to_string(&path)
            .with_context(|| {
                format!("Cannot read '{}'. Make sure the model has been trained.", path.display())
            })?;
        serde_json::from_str(&json)
            .with_context(|| format!("Malformed JSON in '{}'", path.display()))
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;
    use serde::Deserialize;
    use tempfile::tempdir;

    use crate::ml::model::{BowModel, BowModelConfig};

    type TestBackend = NdArray;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Dummy {
        epochs: usize,
        lr:     f64,
    }

    #[test]
    fn test_config_round_trip() {
        let dir  = tempdir().unwrap();
        let ckpt = CheckpointManager::new(dir.path().join("nested"));
        let cfg  = Dummy { epochs: 3, lr: 0.01 };
        ckpt.save_config(&cfg).unwrap();
        assert_eq!(ckpt.load_config::<Dummy>().unwrap(), cfg);
    }

    #[test]
    fn test_missing_config_is_an_error() {
        let dir  = tempdir().unwrap();
        let ckpt = CheckpointManager::new(dir.path());
        assert!(ckpt.load_config::<Dummy>().is_err());
        assert!(!ckpt.has_epoch_checkpoint());
        assert!(ckpt.latest_epoch().is_err());
    }

    #[test]
    fn test_epoch_checkpoint_restores_weights() {
        let dir    = tempdir().unwrap();
        let ckpt   = CheckpointManager::new(dir.path());
        let device = Default::default();

        let model: BowModel<TestBackend> = BowModelConfig::new(3).init(&device);
        ckpt.save_epoch(&model, 1).unwrap();
        ckpt.save_epoch(&model, 2).unwrap();
        assert_eq!(ckpt.latest_epoch().unwrap(), 2);

        let fresh: BowModel<TestBackend> = BowModelConfig::new(3).init(&device);
        let (loaded, epoch) = ckpt.load_latest(fresh, &device).unwrap();
        assert_eq!(epoch, 2);

        let features = Tensor::<TestBackend, 1>::from_floats([1.0, 0.0, 0.0], &device).reshape([1, 3]);
        let expected: Vec<f32> = model.forward(features.clone()).into_data().to_vec().unwrap();
        let actual:   Vec<f32> = loaded.forward(features).into_data().to_vec().unwrap();
        for (a, b) in expected.iter().zip(actual.iter()) {
            // CompactRecorder stores half precision
            assert!((a - b).abs() < 1e-2);
        }
    }
}
