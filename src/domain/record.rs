// ============================================================
// Layer 3 — LabelledText Domain Type
// ============================================================
// Represents one row of the tabular dataset in domain terms:
// a free-text passage and the set of labels assigned to it.
//
// This is multi-LABEL, not multi-CLASS:
//   - Multi-class: exactly one label per text (mutually exclusive)
//   - Multi-label: zero or more labels per text (independent)
//
// Example:
//   Text:   "Great camera but the battery dies in an hour"
//   Labels: ["camera", "battery"]
//
// A text with an empty label list is a valid example — it simply
// belongs to none of the known categories.
//
// Reference: Rust Book §5 (Structs)
//            Tsoumakas & Katakis (2007) Multi-Label Classification

use serde::{Deserialize, Serialize};

/// A labelled training/evaluation example.
///
/// The labels are raw strings exactly as they appeared in the
/// label column, after splitting on the delimiter and trimming.
/// Converting them to a binary vector is the LabelBinarizer's job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelledText {
    /// The free-text content to classify
    pub text: String,

    /// The labels assigned to this text (possibly empty)
    pub labels: Vec<String>,
}

impl LabelledText {
    /// Create a new LabelledText
    pub fn new(text: impl Into<String>, labels: Vec<String>) -> Self {
        Self { text: text.into(), labels }
    }

    /// Returns true if this example carries at least one label
    pub fn is_labelled(&self) -> bool {
        !self.labels.is_empty()
    }
}
