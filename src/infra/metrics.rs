// ============================================================
// Layer 6 — Metrics Logger
// ============================================================
// Records evaluation metrics to a CSV file after each
// evaluation epoch.
//
// Why log metrics to CSV?
//   - Easy to open in Excel or Google Sheets
//   - Can plot learning curves to diagnose training issues
//   - Provides a permanent record of each training run
//
// Metrics recorded per evaluation epoch:
//   - epoch:         the epoch number (1, 2, 3, ...)
//   - train_loss:    average BCE loss on the training set
//   - eval_loss:     average BCE loss on the evaluation set
//   - f1_macro:      macro-averaged F1 at the decision threshold
//   - roc_auc_macro: macro-averaged ROC-AUC on the probabilities
//   - hamming_loss:  fraction of wrong (example, label) slots
//
// Output file: checkpoints/metrics.csv
//
// Example CSV output:
//   epoch,train_loss,eval_loss,f1_macro,roc_auc_macro,hamming_loss
//   1,0.412500,0.389200,0.423000,0.618000,0.112000
//   2,0.290100,0.254300,0.584000,0.772000,0.081000
//   ...
//
// How to read the metrics:
//   - Losses should decrease each epoch (model is learning)
//   - If eval_loss rises while train_loss falls → overfitting
//   - f1_macro and roc_auc_macro should rise, hamming_loss fall
//   - High AUC but low F1 → the ranking is good but the
//     threshold is badly placed
//
// Reference: Rust Book §9 (Error Handling)
//            Rust Book §12 (I/O and File Handling)

use anyhow::Result;
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::PathBuf,
};
use serde::{Deserialize, Serialize};

/// One row of metrics data for a single evaluation epoch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// The epoch number (starts at 1)
    pub epoch: usize,

    /// Average BCE-with-logits loss over all training batches
    pub train_loss: f64,

    /// Average BCE-with-logits loss on the evaluation set
    /// Should track train_loss — divergence indicates overfitting
    pub eval_loss: f64,

    /// Macro-averaged F1 at the decision threshold
    /// Range: [0.0, 1.0] — higher is better
    pub f1_macro: f64,

    /// Macro-averaged ROC-AUC over the label probabilities
    /// Range: [0.0, 1.0] — 0.5 is chance level
    pub roc_auc_macro: f64,

    /// Fraction of wrong (example, label) slots
    /// Range: [0.0, 1.0] — lower is better
    pub hamming_loss: f64,
}

impl EpochMetrics {
    /// Create a new EpochMetrics record
    pub fn new(
        epoch:         usize,
        train_loss:    f64,
        eval_loss:     f64,
        f1_macro:      f64,
        roc_auc_macro: f64,
        hamming_loss:  f64,
    ) -> Self {
        Self { epoch, train_loss, eval_loss, f1_macro, roc_auc_macro, hamming_loss }
    }

    /// Returns true if this epoch beats the previous best macro-F1.
    /// Model selection runs on F1, not loss: F1 is computed with
    /// the same threshold that serves predictions.
    pub fn is_improvement(&self, best_f1: f64) -> bool {
        self.f1_macro > best_f1
    }
}

/// Logs evaluation metrics to a CSV file for later analysis.
pub struct MetricsLogger {
    /// Full path to the CSV file
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create a new MetricsLogger.
    /// Writes the CSV header if the file doesn't exist yet.
    pub fn new(dir: impl Into<String>) -> Result<Self> {
        let dir = PathBuf::from(dir.into());

        // Create directory if it doesn't exist
        fs::create_dir_all(&dir)?;

        let csv_path = dir.join("metrics.csv");

        // Write CSV header only if file is new
        // This allows appending to an existing log across runs
        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)?;
            writeln!(f, "epoch,train_loss,eval_loss,f1_macro,roc_auc_macro,hamming_loss")?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    /// Append one epoch's metrics as a new row in the CSV.
    ///
    /// Uses OpenOptions with append=true so we add to the file
    /// without overwriting previous epochs.
    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        // Open in append mode — adds to end of file
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)?;

        // Write one CSV row with 6 decimal places for each metric
        writeln!(
            f,
            "{},{:.6},{:.6},{:.6},{:.6},{:.6}",
            m.epoch,
            m.train_loss,
            m.eval_loss,
            m.f1_macro,
            m.roc_auc_macro,
            m.hamming_loss,
        )?;

        tracing::debug!(
            "Logged epoch {} metrics: eval_loss={:.4}, f1_macro={:.4}",
            m.epoch,
            m.eval_loss,
            m.f1_macro,
        );

        Ok(())
    }

    /// Return the path to the metrics CSV file
    pub fn csv_path(&self) -> &PathBuf {
        &self.csv_path
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_improvement_on_f1() {
        let m = EpochMetrics::new(2, 0.3, 0.28, 0.55, 0.7, 0.1);
        // 0.55 > 0.4 → improvement
        assert!(m.is_improvement(0.4));
        // 0.55 is NOT greater than 0.6 → not an improvement
        assert!(!m.is_improvement(0.6));
        // Equal F1 does not count as an improvement
        assert!(!m.is_improvement(0.55));
    }

    #[test]
    fn test_log_appends_rows() {
        let dir    = tempfile::tempdir().unwrap();
        let logger = MetricsLogger::new(dir.path().to_str().unwrap()).unwrap();

        logger.log(&EpochMetrics::new(1, 0.5, 0.45, 0.3, 0.6, 0.2)).unwrap();
        logger.log(&EpochMetrics::new(2, 0.4, 0.36, 0.4, 0.7, 0.15)).unwrap();

        let contents = fs::read_to_string(logger.csv_path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3); // header + 2 rows
        assert!(lines[0].starts_with("epoch,train_loss,eval_loss"));
        assert!(lines[2].starts_with("2,"));
    }
}
