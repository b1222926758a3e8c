// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Load training CSV          (Layer 4 - data)
//   Step 2: Clean the text             (Layer 4 - data)
//   Step 3: Load eval CSV or split     (Layer 4 - data)
//   Step 4: Fit label binarizer        (Layer 4 - data)
//   Step 5: Build tokenizer            (Layer 6 - infra)
//   Step 6: Encode samples             (Layer 4 - data)
//   Step 7: Build datasets             (Layer 4 - data)
//   Step 8: Save config + vocabulary   (Layer 6 - infra)
//   Step 9: Run training loop          (Layer 5 - ml)
//
// Order matters in two places:
//   - The binarizer is fitted AFTER the split, on training
//     records only, and then applied unchanged to the
//     evaluation records (no refit).
//   - The tokenizer vocabulary is likewise built from
//     training texts only.
//
// Reference: Rust Book §13 (Iterators and Closures)
//            Burn Book §5 (Training)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tokenizers::Tokenizer;

use crate::data::{
    binarizer::LabelBinarizer,
    dataset::{TagDataset, TagSample},
    loader::CsvLoader,
    preprocessor::Preprocessor,
    splitter::split_train_eval,
};
use crate::domain::record::LabelledText;
use crate::domain::traits::{Persistable, RecordSource};
use crate::infra::checkpoint::CheckpointManager;
use crate::infra::tokenizer_store::TokenizerStore;
use crate::ml::metrics::DEFAULT_THRESHOLD;
use crate::ml::trainer::run_training;

/// Token id reserved for padding slots
const PAD_ID: u32 = 0;

// ─── Training Configuration ──────────────────────────────────────────────────
// All hyperparameters for a training run.
// Serialisable so it can be saved to disk and reloaded for inference —
// in particular the decision threshold travels with the checkpoint,
// so evaluation and inference can never use different cutoffs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub train_file:       String,
    pub eval_file:        Option<String>,
    pub text_column:      String,
    pub label_column:     String,
    pub label_delimiter:  char,
    pub checkpoint_dir:   String,
    pub max_seq_len:      usize,
    pub batch_size:       usize,
    pub epochs:           usize,
    pub eval_every:       usize,
    pub lr:               f64,
    pub threshold:        f32,
    pub holdout_fraction: f64,
    pub seed:             u64,
    pub d_model:          usize,
    pub num_heads:        usize,
    pub num_layers:       usize,
    pub d_ff:             usize,
    pub dropout:          f64,
    pub vocab_size:       usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            train_file:       "data/train.csv".to_string(),
            eval_file:        Some("data/test.csv".to_string()),
            text_column:      "text".to_string(),
            label_column:     "labels".to_string(),
            label_delimiter:  ',',
            checkpoint_dir:   "checkpoints".to_string(),
            max_seq_len:      256,
            batch_size:       8,
            epochs:           5,
            eval_every:       1,
            lr:               2e-4,
            threshold:        DEFAULT_THRESHOLD,
            holdout_fraction: 0.2,
            seed:             42,
            d_model:          256,
            num_heads:        8,
            num_layers:       6,
            d_ff:             1024,
            dropout:          0.1,
            vocab_size:       30522,
        }
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
// Owns the config and runs the full training pipeline.
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    /// Create a new TrainUseCase with the given configuration
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full training pipeline end to end
    pub fn execute(&self) -> Result<()> {
        let cfg = &self.config;

        // ── Step 1: Load training records ─────────────────────────────────────
        tracing::info!("Loading training data from '{}'", cfg.train_file);
        let loader = CsvLoader::new(
            &cfg.train_file,
            &cfg.text_column,
            &cfg.label_column,
            cfg.label_delimiter,
        );
        let raw_records = loader.load_all()?;

        // ── Step 2: Clean / normalise text ────────────────────────────────────
        let preprocessor  = Preprocessor::new();
        let train_records = clean_records(raw_records, &preprocessor);

        // ── Step 3: Evaluation records — second file, or holdout split ────────
        let (train_records, eval_records) = match &cfg.eval_file {
            Some(eval_file) => {
                tracing::info!("Loading evaluation data from '{}'", eval_file);
                let eval_loader = CsvLoader::new(
                    eval_file,
                    &cfg.text_column,
                    &cfg.label_column,
                    cfg.label_delimiter,
                );
                let eval_records = clean_records(eval_loader.load_all()?, &preprocessor);
                (train_records, eval_records)
            }
            None => {
                tracing::info!(
                    "No evaluation file given — holding out {:.0}% of training data",
                    cfg.holdout_fraction * 100.0
                );
                split_train_eval(train_records, 1.0 - cfg.holdout_fraction, cfg.seed)
            }
        };
        tracing::info!(
            "{} training records, {} evaluation records",
            train_records.len(),
            eval_records.len()
        );

        // ── Step 4: Fit the label binarizer on TRAINING records only ──────────
        // Evaluation labels go through the same fitted mapping; any
        // label unseen in training is warned about and ignored.
        let binarizer = LabelBinarizer::fit(&train_records)?;

        // ── Step 5: Build / load tokenizer ────────────────────────────────────
        // If a tokenizer was already built and saved, load it.
        // Otherwise build the word-level vocabulary from the
        // training texts.
        let train_texts: Vec<String> = train_records.iter().map(|r| r.text.clone()).collect();
        let tok_store = TokenizerStore::new(&cfg.checkpoint_dir);
        let tokenizer = tok_store.load_or_build(&train_texts, cfg.vocab_size)?;

        // ── Step 6: Encode both sets into fixed-length samples ────────────────
        let train_samples = encode_records(&train_records, &tokenizer, &binarizer, cfg.max_seq_len)?;
        let eval_samples  = encode_records(&eval_records, &tokenizer, &binarizer, cfg.max_seq_len)?;
        tracing::info!(
            "Encoded {} training and {} evaluation samples",
            train_samples.len(),
            eval_samples.len()
        );

        // ── Step 7: Build Burn datasets ───────────────────────────────────────
        // TagDataset implements Burn's Dataset trait so the DataLoader
        // can call .get(index) and .len() on it
        let num_labels    = binarizer.num_labels();
        let train_dataset = TagDataset::new(train_samples, num_labels);
        let eval_dataset  = TagDataset::new(eval_samples, num_labels);

        // ── Step 8: Save config and label vocabulary for inference ────────────
        let ckpt_manager = CheckpointManager::new(&cfg.checkpoint_dir);
        ckpt_manager.save_config(cfg)?;
        binarizer.save(ckpt_manager.labels_path().to_str().unwrap_or("labels.json"))?;

        // ── Step 9: Run training loop (Layer 5) ───────────────────────────────
        run_training(cfg, train_dataset, eval_dataset, ckpt_manager)?;

        Ok(())
    }
}

/// Run every record's text through the preprocessor.
fn clean_records(records: Vec<LabelledText>, preprocessor: &Preprocessor) -> Vec<LabelledText> {
    records
        .into_iter()
        .map(|r| LabelledText::new(preprocessor.clean(&r.text), r.labels))
        .collect()
}

// ─── Sample Encoding ──────────────────────────────────────────────────────────
// Turns (text, labels) records into fixed-length tensor-ready
// samples: token ids truncated/padded to max_seq_len, a matching
// attention mask, and the binarized label vector.
fn encode_records(
    records:     &[LabelledText],
    tokenizer:   &Tokenizer,
    binarizer:   &LabelBinarizer,
    max_seq_len: usize,
) -> Result<Vec<TagSample>> {
    let mut samples = Vec::with_capacity(records.len());

    for record in records {
        let enc = tokenizer
            .encode(record.text.as_str(), false)
            .map_err(|e| anyhow::anyhow!("Tokenisation error: {e}"))?;

        let mut input_ids: Vec<u32> = enc.get_ids().to_vec();

        // A text that tokenises to nothing gives the model no signal
        if input_ids.is_empty() {
            tracing::warn!("Skipping record with empty encoding: '{}'", record.text);
            continue;
        }

        // Truncate to the maximum allowed length
        input_ids.truncate(max_seq_len);

        // Attention mask: 1 for real tokens, 0 for padding
        let real_len      = input_ids.len();
        let mut attn_mask = vec![1u32; real_len];

        // Pad both input_ids and attention_mask to max_seq_len
        while input_ids.len() < max_seq_len {
            input_ids.push(PAD_ID);
            attn_mask.push(0);
        }

        samples.push(TagSample {
            input_ids,
            attention_mask: attn_mask,
            label_vector:   binarizer.transform(&record.labels),
        });
    }

    Ok(samples)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_records_normalises_text() {
        let p = Preprocessor::new();
        let records = vec![LabelledText::new("  a\t b ", vec!["x".into()])];
        let cleaned = clean_records(records, &p);
        assert_eq!(cleaned[0].text, "a b");
        assert_eq!(cleaned[0].labels, vec!["x"]);
    }

    #[test]
    fn test_default_config_has_unified_threshold() {
        let cfg = TrainConfig::default();
        assert_eq!(cfg.threshold, DEFAULT_THRESHOLD);
    }
}
