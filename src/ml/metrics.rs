// ============================================================
// Layer 5 — Multi-Label Evaluation Metrics
// ============================================================
// Turns raw model scores into the three headline numbers of a
// multi-label classifier. Pure Rust on plain slices — no tensors,
// no GPU, fully unit-testable.
//
// Input layout: one row per example, one column per label.
//   scores[i][j] = raw logit for label j on example i
//   truth[i][j]  = 1 if label j applies to example i, else 0
//
// The computation:
//   1. sigmoid each score → independent per-label probability
//   2. compare each probability to ONE threshold → 0/1 prediction
//   3. from those matrices compute
//        - macro F1        (binary predictions)
//        - macro ROC-AUC   (probabilities — ranking quality is
//                           destroyed by thresholding first)
//        - Hamming loss    (binary predictions)
//
// One threshold is used everywhere: the trainer's evaluation and
// the inference path both read the same configured value, so the
// reported metrics describe the same decision rule that serves
// predictions.
//
// Macro averaging: compute per label, then average unweighted.
// A rare label counts as much as a frequent one, so macro numbers
// are sensitive to tail-label performance.
//
// Reference: Tsoumakas & Katakis (2007) Multi-Label Classification
//            Fawcett (2006) An Introduction to ROC Analysis

use serde::{Deserialize, Serialize};

/// Decision threshold applied to sigmoid probabilities when the
/// user does not configure one.
pub const DEFAULT_THRESHOLD: f32 = 0.3;

// ─── Sigmoid ──────────────────────────────────────────────────────────────────

/// Numerically stable logistic sigmoid: σ(x) = 1 / (1 + e^-x).
///
/// The two-branch form never evaluates exp() of a large positive
/// number, so it cannot overflow for any finite input.
pub fn sigmoid(x: f32) -> f32 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

// ─── EvalReport ───────────────────────────────────────────────────────────────

/// The three evaluation metrics of one pass over an evaluation set.
/// Used purely for reporting and best-checkpoint selection — it
/// never feeds back into the training dynamics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalReport {
    /// Unweighted mean of per-label F1 on the thresholded predictions.
    /// Higher is better; 1.0 is perfect.
    pub f1_macro: f64,

    /// Unweighted mean of per-label ROC-AUC on the probabilities.
    /// 0.5 is chance level, 1.0 is perfect ranking. Labels with no
    /// positives or no negatives in the evaluation set are excluded.
    pub roc_auc_macro: f64,

    /// Fraction of all (example, label) slots predicted wrongly.
    /// Lower is better; 0.0 is perfect.
    pub hamming_loss: f64,
}

impl EvalReport {
    /// Metric name → value pairs, in reporting order
    pub fn entries(&self) -> [(&'static str, f64); 3] {
        [
            ("f1_macro",      self.f1_macro),
            ("roc_auc_macro", self.roc_auc_macro),
            ("hamming_loss",  self.hamming_loss),
        ]
    }
}

// ─── Top-level entry point ────────────────────────────────────────────────────

/// Evaluate raw model scores against the ground-truth label matrix.
///
/// `scores` and `truth` must have the same dimensions: one row per
/// example, one column per label.
///
/// # Panics
/// Panics on mismatched dimensions — the caller built both matrices
/// from the same batches, so a mismatch is a programming error.
pub fn evaluate(scores: &[Vec<f32>], truth: &[Vec<u8>], threshold: f32) -> EvalReport {
    assert_eq!(scores.len(), truth.len(), "row count mismatch between scores and truth");

    // Step 1: logits → probabilities
    let probs: Vec<Vec<f32>> = scores
        .iter()
        .map(|row| row.iter().map(|&s| sigmoid(s)).collect())
        .collect();

    // Step 2: probabilities → 0/1 predictions at the single threshold
    let preds: Vec<Vec<u8>> = probs
        .iter()
        .map(|row| row.iter().map(|&p| u8::from(p >= threshold)).collect())
        .collect();

    // Step 3: the three metrics
    EvalReport {
        f1_macro:      f1_macro(&preds, truth),
        roc_auc_macro: roc_auc_macro(&probs, truth),
        hamming_loss:  hamming_loss(&preds, truth),
    }
}

// ─── Macro F1 ─────────────────────────────────────────────────────────────────

/// Unweighted mean of per-label F1 scores.
///
/// Per label: F1 = 2·TP / (2·TP + FP + FN). A label that is never
/// predicted and never true contributes 0 (the zero-division
/// convention), keeping the mean defined on sparse data.
fn f1_macro(preds: &[Vec<u8>], truth: &[Vec<u8>]) -> f64 {
    let num_labels = match preds.first() {
        Some(row) => row.len(),
        None => return 0.0,
    };
    if num_labels == 0 {
        return 0.0;
    }

    let mut f1_sum = 0.0f64;

    for j in 0..num_labels {
        let mut tp = 0usize;
        let mut fp = 0usize;
        let mut fn_ = 0usize;

        for (pred_row, truth_row) in preds.iter().zip(truth.iter()) {
            match (pred_row[j], truth_row[j]) {
                (1, 1) => tp += 1,
                (1, 0) => fp += 1,
                (0, 1) => fn_ += 1,
                _ => {}
            }
        }

        let denom = 2 * tp + fp + fn_;
        if denom > 0 {
            f1_sum += (2 * tp) as f64 / denom as f64;
        }
        // denom == 0 → no predictions and no positives → F1 counts as 0
    }

    f1_sum / num_labels as f64
}

// ─── Macro ROC-AUC ────────────────────────────────────────────────────────────

/// Unweighted mean of per-label ROC-AUC, computed from the
/// PROBABILITIES. Labels where the evaluation set has no positive
/// or no negative example have no defined ranking and are excluded
/// from the mean; if every label is degenerate the result is 0.0.
fn roc_auc_macro(probs: &[Vec<f32>], truth: &[Vec<u8>]) -> f64 {
    let num_labels = match probs.first() {
        Some(row) => row.len(),
        None => return 0.0,
    };

    let mut auc_sum = 0.0f64;
    let mut defined = 0usize;

    for j in 0..num_labels {
        let col_probs: Vec<f32> = probs.iter().map(|row| row[j]).collect();
        let col_truth: Vec<u8>  = truth.iter().map(|row| row[j]).collect();

        if let Some(auc) = label_auc(&col_probs, &col_truth) {
            auc_sum += auc;
            defined += 1;
        }
    }

    if defined == 0 {
        tracing::warn!("ROC-AUC undefined for every label (single-class evaluation set)");
        return 0.0;
    }
    auc_sum / defined as f64
}

/// ROC-AUC for one label via the Mann-Whitney U statistic:
///
///   AUC = (R⁺ − P(P+1)/2) / (P·N)
///
/// where R⁺ is the rank sum of the positives in the probability
/// ordering (1-based, ties get the average rank of their group),
/// P the positive count and N the negative count.
///
/// Returns None when P == 0 or N == 0 (no ranking exists).
fn label_auc(probs: &[f32], truth: &[u8]) -> Option<f64> {
    let positives = truth.iter().filter(|&&t| t == 1).count();
    let negatives = truth.len() - positives;
    if positives == 0 || negatives == 0 {
        return None;
    }

    // Sort indices by probability ascending
    let mut order: Vec<usize> = (0..probs.len()).collect();
    order.sort_by(|&a, &b| probs[a].total_cmp(&probs[b]));

    // Walk tie groups, assigning each member the average rank of
    // its group, and accumulate the positives' rank sum
    let mut rank_sum_pos = 0.0f64;
    let mut i = 0usize;
    while i < order.len() {
        let mut k = i;
        while k + 1 < order.len() && probs[order[k + 1]] == probs[order[i]] {
            k += 1;
        }
        // Members i..=k share ranks (i+1)..=(k+1) → average
        let avg_rank = (i + 1 + k + 1) as f64 / 2.0;
        for &idx in &order[i..=k] {
            if truth[idx] == 1 {
                rank_sum_pos += avg_rank;
            }
        }
        i = k + 1;
    }

    let p = positives as f64;
    let n = negatives as f64;
    Some((rank_sum_pos - p * (p + 1.0) / 2.0) / (p * n))
}

// ─── Hamming loss ─────────────────────────────────────────────────────────────

/// Fraction of individual label slots — summed over all examples
/// AND all labels — where prediction and truth disagree.
fn hamming_loss(preds: &[Vec<u8>], truth: &[Vec<u8>]) -> f64 {
    let total: usize = preds.iter().map(Vec::len).sum();
    if total == 0 {
        return 0.0;
    }

    let wrong: usize = preds
        .iter()
        .zip(truth.iter())
        .map(|(p_row, t_row)| {
            p_row.iter().zip(t_row.iter()).filter(|(p, t)| p != t).count()
        })
        .sum();

    wrong as f64 / total as f64
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    // ── sigmoid ──────────────────────────────────────────────────────────────

    #[test]
    fn test_sigmoid_midpoint_and_symmetry() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-6);
        // σ(-x) = 1 - σ(x)
        assert!((sigmoid(2.0) + sigmoid(-2.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_sigmoid_extreme_inputs_stay_finite() {
        assert!(sigmoid(1000.0).is_finite());
        assert!(sigmoid(-1000.0).is_finite());
        assert!(sigmoid(1000.0) > 0.999);
        assert!(sigmoid(-1000.0) < 0.001);
    }

    // ── F1 ───────────────────────────────────────────────────────────────────

    #[test]
    fn test_f1_perfect_predictions() {
        let truth = vec![vec![1, 0], vec![0, 1], vec![1, 1]];
        assert!((f1_macro(&truth.clone(), &truth) - 1.0).abs() < EPS);
    }

    #[test]
    fn test_f1_zero_division_label_counts_as_zero() {
        // Label 1 is never true and never predicted → F1 = 0 for it,
        // label 0 is perfect → macro = (1.0 + 0.0) / 2
        let preds = vec![vec![1, 0], vec![1, 0]];
        let truth = vec![vec![1, 0], vec![1, 0]];
        assert!((f1_macro(&preds, &truth) - 0.5).abs() < EPS);
    }

    #[test]
    fn test_f1_macro_weights_rare_labels_equally() {
        // Label 0: 3 examples, all correct → F1 = 1.0
        // Label 1: 1 positive, missed → F1 = 0.0
        // Macro mean ignores frequency: (1.0 + 0.0) / 2 = 0.5
        let preds = vec![vec![1, 0], vec![1, 0], vec![1, 0]];
        let truth = vec![vec![1, 1], vec![1, 0], vec![1, 0]];
        assert!((f1_macro(&preds, &truth) - 0.5).abs() < EPS);
    }

    #[test]
    fn test_f1_half_precision() {
        // Label 0: TP=1, FP=1, FN=0 → F1 = 2/(2+1) = 2/3
        let preds = vec![vec![1], vec![1]];
        let truth = vec![vec![1], vec![0]];
        assert!((f1_macro(&preds, &truth) - 2.0 / 3.0).abs() < EPS);
    }

    // ── ROC-AUC ──────────────────────────────────────────────────────────────

    #[test]
    fn test_auc_perfect_ranking() {
        let probs = vec![0.9, 0.8, 0.2, 0.1];
        let truth = vec![1, 1, 0, 0];
        assert!((label_auc(&probs, &truth).unwrap() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_auc_inverted_ranking() {
        let probs = vec![0.1, 0.2, 0.8, 0.9];
        let truth = vec![1, 1, 0, 0];
        assert!(label_auc(&probs, &truth).unwrap().abs() < EPS);
    }

    #[test]
    fn test_auc_all_tied_is_chance() {
        // Identical scores → ranking carries no information → 0.5
        let probs = vec![0.4, 0.4, 0.4, 0.4];
        let truth = vec![1, 0, 1, 0];
        assert!((label_auc(&probs, &truth).unwrap() - 0.5).abs() < EPS);
    }

    #[test]
    fn test_auc_undefined_without_both_classes() {
        assert!(label_auc(&[0.3, 0.7], &[1, 1]).is_none());
        assert!(label_auc(&[0.3, 0.7], &[0, 0]).is_none());
    }

    #[test]
    fn test_auc_uses_probabilities_not_thresholded_predictions() {
        // Both positives score BELOW 0.3: thresholded predictions would
        // be all-zero (one degenerate operating point), yet the ranking
        // is perfect and the AUC must say so.
        let probs = vec![0.29, 0.28, 0.02, 0.01];
        let truth = vec![1, 1, 0, 0];
        assert!((label_auc(&probs, &truth).unwrap() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_macro_auc_skips_degenerate_labels() {
        // Label 0 is perfectly ranked; label 1 has no positives at all
        // and must not drag the mean down
        let probs = vec![vec![0.9, 0.1], vec![0.1, 0.2]];
        let truth = vec![vec![1, 0], vec![0, 0]];
        assert!((roc_auc_macro(&probs, &truth) - 1.0).abs() < EPS);
    }

    // ── Hamming loss ─────────────────────────────────────────────────────────

    #[test]
    fn test_hamming_counts_slots_not_examples() {
        // 1 wrong slot out of 6 — even though 1 of 2 EXAMPLES is wrong
        let preds = vec![vec![1, 0, 0], vec![0, 1, 0]];
        let truth = vec![vec![1, 0, 0], vec![0, 1, 1]];
        assert!((hamming_loss(&preds, &truth) - 1.0 / 6.0).abs() < EPS);
    }

    #[test]
    fn test_hamming_perfect_and_total() {
        let a = vec![vec![1, 0], vec![0, 1]];
        let b = vec![vec![0, 1], vec![1, 0]];
        assert!(hamming_loss(&a, &a).abs() < EPS);
        assert!((hamming_loss(&a, &b) - 1.0).abs() < EPS);
    }

    // ── evaluate (end to end) ────────────────────────────────────────────────

    #[test]
    fn test_evaluate_thresholds_at_configured_value() {
        // Logit 0.0 → probability 0.5: active at threshold 0.3,
        // inactive at threshold 0.6
        let scores = vec![vec![0.0]];
        let truth  = vec![vec![1]];

        let low  = evaluate(&scores, &truth, 0.3);
        let high = evaluate(&scores, &truth, 0.6);

        assert!((low.f1_macro - 1.0).abs() < EPS);
        assert!(high.f1_macro.abs() < EPS);
    }

    #[test]
    fn test_evaluate_consistent_report() {
        let scores = vec![
            vec![ 3.0, -3.0],
            vec![-3.0,  3.0],
            vec![ 3.0,  3.0],
        ];
        let truth = vec![vec![1, 0], vec![0, 1], vec![1, 1]];

        let report = evaluate(&scores, &truth, DEFAULT_THRESHOLD);
        assert!((report.f1_macro - 1.0).abs() < EPS);
        assert!((report.roc_auc_macro - 1.0).abs() < EPS);
        assert!(report.hamming_loss.abs() < EPS);
    }

    #[test]
    fn test_report_entries_order() {
        let report = EvalReport { f1_macro: 0.5, roc_auc_macro: 0.6, hamming_loss: 0.1 };
        let names: Vec<&str> = report.entries().iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["f1_macro", "roc_auc_macro", "hamming_loss"]);
    }
}
