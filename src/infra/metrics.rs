// ============================================================
// Layer 6 — Metrics
// ============================================================
// Two kinds of bookkeeping:
//
//   ClassificationReport — per-class precision / recall / F1 on a
//                          held-out set, printed after training
//   MetricsLogger        — one CSV row per transformer epoch
//
// Output file: <artifact dir>/metrics.csv
//
//   epoch,train_loss,val_loss,val_accuracy
//   1,0.693100,0.690200,0.512000
//   2,0.641800,0.655300,0.604000
//
// How to read the metrics:
//   - If val_loss increases while train_loss decreases → overfitting
//   - Accuracy should increase each epoch

use anyhow::Result;
use std::{
    fmt,
    fs::{self, OpenOptions},
    io::Write,
    path::PathBuf,
};
use serde::{Deserialize, Serialize};

use crate::domain::document::Label;

// ─── ClassificationReport ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall:    f64,
    pub f1:        f64,
    pub support:   usize,
}

/// Binary classification summary indexed by class (0 = original, 1 = plagiarised).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub classes:  [ClassMetrics; 2],
    pub accuracy: f64,
    pub total:    usize,
}

impl ClassificationReport {
    /// Build a report from predicted and true class indices.
    /// Undefined ratios (no predictions / no samples of a class) are 0.
    pub fn from_predictions(predicted: &[usize], actual: &[usize]) -> Self {
        let total   = predicted.len().min(actual.len());
        let pairs   = predicted.iter().zip(actual.iter()).take(total);
        let mut tp  = [0usize; 2];
        let mut fp  = [0usize; 2];
        let mut fn_ = [0usize; 2];
        let mut correct = 0usize;

        for (&p, &a) in pairs {
            if p == a {
                correct += 1;
                if a < 2 { tp[a] += 1; }
            } else {
                if p < 2 { fp[p] += 1; }
                if a < 2 { fn_[a] += 1; }
            }
        }

        let ratio = |num: usize, den: usize| if den == 0 { 0.0 } else { num as f64 / den as f64 };
        let class = |c: usize| {
            let precision = ratio(tp[c], tp[c] + fp[c]);
            let recall    = ratio(tp[c], tp[c] + fn_[c]);
            let f1 = if precision + recall == 0.0 {
                0.0
            } else {
                2.0 * precision * recall / (precision + recall)
            };
            ClassMetrics { precision, recall, f1, support: tp[c] + fn_[c] }
        };

        Self {
            classes:  [class(0), class(1)],
            accuracy: ratio(correct, total),
            total,
        }
    }

    pub fn class(&self, label: Label) -> &ClassMetrics {
        &self.classes[label.class_index()]
    }

    /// Unweighted mean F1 over both classes
    pub fn macro_f1(&self) -> f64 {
        (self.classes[0].f1 + self.classes[1].f1) / 2.0
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:>14} {:>10} {:>10} {:>10} {:>10}", "", "precision", "recall", "f1-score", "support")?;
        for label in Label::all() {
            let m = self.class(label);
            writeln!(
                f,
                "{:>14} {:>10.2} {:>10.2} {:>10.2} {:>10}",
                label.to_string(), m.precision, m.recall, m.f1, m.support
            )?;
        }
        writeln!(f)?;
        writeln!(f, "{:>14} {:>10} {:>10} {:>10.2} {:>10}", "accuracy", "", "", self.accuracy, self.total)?;
        write!(f, "{:>14} {:>10} {:>10} {:>10.2} {:>10}", "macro f1", "", "", self.macro_f1(), self.total)
    }
}

// ─── Epoch metrics CSV ───────────────────────────────────────────────────────

/// One row of metrics data for a single training epoch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// The epoch number (starts at 1)
    pub epoch: usize,

    /// Average cross-entropy loss over all training batches
    pub train_loss: f64,

    /// Average cross-entropy loss on the validation set
    pub val_loss: f64,

    /// Fraction of validation samples classified correctly, in [0.0, 1.0]
    pub val_accuracy: f64,
}

impl EpochMetrics {
    pub fn new(epoch: usize, train_loss: f64, val_loss: f64, val_accuracy: f64) -> Self {
        Self { epoch, train_loss, val_loss, val_accuracy }
    }

    /// Returns true if this epoch improved over the previous best val_loss
    pub fn is_improvement(&self, best_val_loss: f64) -> bool {
        self.val_loss < best_val_loss
    }
}

/// Logs epoch metrics to a CSV file for later analysis.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create a new MetricsLogger.
    /// Writes the CSV header if the file doesn't exist yet, so resumed
    /// runs append to the same log.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        let csv_path = dir.join("metrics.csv");

        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)?;
            writeln!(f, "epoch,train_loss,val_loss,val_accuracy")?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    /// Append one epoch's metrics as a new row in the CSV.
    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)?;

        writeln!(
            f,
            "{},{:.6},{:.6},{:.6}",
            m.epoch,
            m.train_loss,
            m.val_loss,
            m.val_accuracy,
        )?;

        tracing::debug!(
            "Logged epoch {} metrics: train_loss={:.4}, val_loss={:.4}",
            m.epoch,
            m.train_loss,
            m.val_loss,
        );

        Ok(())
    }

    pub fn csv_path(&self) -> &PathBuf {
        &self.csv_path
    }
}
