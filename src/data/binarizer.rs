// ============================================================
// Layer 4 — Label Binarizer
// ============================================================
// A fitted bijection between label strings and positions in a
// fixed-width binary indicator vector.
//
// How it works:
//   fit:       collect every distinct label seen in the training
//              records, SORT them, assign position 0..n in order.
//   transform: ["battery", "camera"] → [1, 1, 0, ...] where the
//              1s sit at the positions fit assigned.
//   inverse:   position 2 → "delivery" (used at inference time to
//              turn vector slots back into label names).
//
// Sorting at fit time makes the mapping deterministic: two runs
// over the same data always produce the same label order, so a
// saved model and a saved vocabulary can never disagree.
//
// The mapping is fitted ONCE on the training set and then applied
// unchanged to evaluation data. A label that appears only in the
// evaluation file has no vector slot — it is ignored with a
// warning, never added (that would silently change the model's
// output width).
//
// Reference: Rust Book §8 (Collections)
//            Tsoumakas & Katakis (2007) Multi-Label Classification

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use crate::domain::record::LabelledText;
use crate::domain::traits::Persistable;

/// The fitted label ↔ position bijection.
///
/// `labels` holds the sorted vocabulary (position = vector index);
/// `positions` is the reverse map for O(1) transform lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelBinarizer {
    labels: Vec<String>,

    // Rebuilt from `labels` on load, so only `labels` is serialised
    #[serde(skip)]
    positions: HashMap<String, usize>,
}

impl LabelBinarizer {
    /// Fit a binarizer over the labels observed in `records`.
    ///
    /// Fails if no record carries any label — a tagger with an
    /// empty label set cannot be trained.
    pub fn fit(records: &[LabelledText]) -> Result<Self> {
        // BTreeSet gives us dedup + sorted order in one pass
        let vocab: BTreeSet<String> = records
            .iter()
            .flat_map(|r| r.labels.iter().cloned())
            .collect();

        if vocab.is_empty() {
            bail!("No labels found in the training data — check the label column and delimiter");
        }

        let labels: Vec<String> = vocab.into_iter().collect();
        tracing::info!("Fitted label binarizer over {} labels: {:?}", labels.len(), labels);

        Ok(Self::from_vocabulary(labels))
    }

    fn from_vocabulary(labels: Vec<String>) -> Self {
        let positions = labels
            .iter()
            .enumerate()
            .map(|(i, l)| (l.clone(), i))
            .collect();
        Self { labels, positions }
    }

    /// Number of labels in the fitted vocabulary — the width of
    /// every vector this binarizer produces, and of the model head.
    pub fn num_labels(&self) -> usize {
        self.labels.len()
    }

    /// The sorted label vocabulary, position i ↔ labels()[i]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Convert a list of label strings into a 0/1 indicator vector.
    ///
    /// Always returns a vector of exactly num_labels() entries.
    /// Labels not in the fitted vocabulary are ignored with a warning.
    pub fn transform(&self, labels: &[String]) -> Vec<u8> {
        let mut vector = vec![0u8; self.labels.len()];
        for label in labels {
            match self.positions.get(label) {
                Some(&pos) => vector[pos] = 1,
                None => {
                    tracing::warn!("Label '{}' was not seen at fit time — ignoring", label);
                }
            }
        }
        vector
    }

    /// Convert a 0/1 indicator vector back into label strings.
    ///
    /// # Panics
    /// Panics if the vector width does not match num_labels() —
    /// that always indicates a programming error, not bad data.
    pub fn inverse(&self, vector: &[u8]) -> Vec<String> {
        assert_eq!(
            vector.len(),
            self.labels.len(),
            "indicator vector width {} does not match vocabulary size {}",
            vector.len(),
            self.labels.len()
        );
        vector
            .iter()
            .zip(self.labels.iter())
            .filter(|(&bit, _)| bit == 1)
            .map(|(_, label)| label.clone())
            .collect()
    }
}

/// Persist the fitted vocabulary as JSON next to the checkpoints,
/// so inference rebuilds the exact same bijection.
impl Persistable for LabelBinarizer {
    fn save(&self, path: &str) -> Result<()> {
        let json = serde_json::to_string_pretty(&self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Cannot write label vocabulary to '{path}'"))?;
        tracing::debug!("Saved label vocabulary to '{}'", path);
        Ok(())
    }

    fn load(path: &str) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| {
                format!(
                    "Cannot read label vocabulary from '{path}'. \
                     Have you run 'train' first?"
                )
            })?;
        let loaded: LabelBinarizer = serde_json::from_str(&json)?;
        // `positions` is #[serde(skip)] — rebuild it from the vocabulary
        Ok(Self::from_vocabulary(loaded.labels))
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<LabelledText> {
        vec![
            LabelledText::new("t1", vec!["camera".into(), "battery".into()]),
            LabelledText::new("t2", vec!["delivery".into()]),
            LabelledText::new("t3", vec!["battery".into()]),
            LabelledText::new("t4", vec![]),
        ]
    }

    #[test]
    fn test_fit_sorts_vocabulary() {
        let b = LabelBinarizer::fit(&records()).unwrap();
        assert_eq!(b.labels(), &["battery", "camera", "delivery"]);
        assert_eq!(b.num_labels(), 3);
    }

    #[test]
    fn test_transform_sets_correct_positions() {
        let b = LabelBinarizer::fit(&records()).unwrap();
        assert_eq!(b.transform(&["camera".into(), "battery".into()]), vec![1, 1, 0]);
        assert_eq!(b.transform(&["delivery".into()]), vec![0, 0, 1]);
    }

    #[test]
    fn test_transform_of_empty_list_is_all_zero() {
        let b = LabelBinarizer::fit(&records()).unwrap();
        assert_eq!(b.transform(&[]), vec![0, 0, 0]);
    }

    #[test]
    fn test_unknown_label_is_ignored_not_added() {
        let b = LabelBinarizer::fit(&records()).unwrap();
        // "shipping" was never fitted — the width must not change
        let v = b.transform(&["shipping".into(), "camera".into()]);
        assert_eq!(v, vec![0, 1, 0]);
        assert_eq!(b.num_labels(), 3);
    }

    #[test]
    fn test_inverse_round_trip() {
        let b = LabelBinarizer::fit(&records()).unwrap();
        let v = b.transform(&["battery".into(), "delivery".into()]);
        assert_eq!(b.inverse(&v), vec!["battery", "delivery"]);
    }

    #[test]
    fn test_fit_without_labels_fails() {
        let unlabelled = vec![LabelledText::new("t", vec![])];
        assert!(LabelBinarizer::fit(&unlabelled).is_err());
    }

    #[test]
    fn test_save_and_load_preserve_mapping() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("labels.json");
        let path = path.to_str().unwrap();

        let b = LabelBinarizer::fit(&records()).unwrap();
        b.save(path).unwrap();
        let loaded = LabelBinarizer::load(path).unwrap();

        assert_eq!(loaded.labels(), b.labels());
        // The reverse map must be rebuilt and functional after load
        assert_eq!(loaded.transform(&["camera".into()]), vec![0, 1, 0]);
    }
}
