// ============================================================
// Layer 3 — LabelScore Domain Type
// ============================================================
// The tagger's verdict for ONE label on one text.
//
// The model emits one independent probability per label.
// A label is "active" when its probability clears the decision
// threshold. Inference returns one LabelScore per known label
// so callers can inspect the full distribution, not just the
// labels that fired.
//
// Reference: Rust Book §5 (Structs)

use serde::{Deserialize, Serialize};

/// One label's probability and thresholded decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelScore {
    /// The label string, as established by the binarizer at fit time
    pub label: String,

    /// Sigmoid probability in (0, 1) that the label applies
    pub probability: f32,

    /// true when probability >= the decision threshold
    pub active: bool,
}

impl LabelScore {
    /// Create a new LabelScore, deriving `active` from the threshold
    pub fn new(label: impl Into<String>, probability: f32, threshold: f32) -> Self {
        Self {
            label:       label.into(),
            probability,
            active:      probability >= threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_flag_follows_threshold() {
        assert!(LabelScore::new("spam", 0.31, 0.3).active);
        assert!(!LabelScore::new("spam", 0.29, 0.3).active);
        // Exactly at the threshold counts as active
        assert!(LabelScore::new("spam", 0.3, 0.3).active);
    }
}
