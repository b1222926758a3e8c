// ============================================================
// Layer 4 — Train/Evaluation Splitter
// ============================================================
// Shuffles records and splits them into two sets:
//   - Training set:   used to update model weights
//   - Evaluation set: used to measure performance on unseen data
//
// Only used when the user supplies a single data file; with a
// separate evaluation file the split comes from the files
// themselves and this module is bypassed.
//
// Why shuffle before splitting?
//   CSV exports are often ordered (e.g. all rows of one category
//   together). Without shuffling, the evaluation set would only
//   contain one kind of row. Shuffling gives both sets a
//   representative label mix.
//
// The shuffle is driven by a SEEDED StdRng, not thread_rng, so
// the same seed always produces the same split — metrics from
// two runs are comparable because they scored the same rows.
//
// Uses Fisher-Yates shuffle via rand::seq::SliceRandom,
// the standard unbiased shuffle algorithm.
//
// Reference: Rust Book §8 (Vectors)
//            rand crate documentation

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Shuffle `records` with the given seed and split into
/// (train, evaluation).
///
/// # Arguments
/// * `records`        - All available records (consumed by this function)
/// * `train_fraction` - Proportion kept for training, e.g. 0.8 = 80%
/// * `seed`           - RNG seed; same seed → same split
///
/// # Returns
/// A tuple (train_records, eval_records)
pub fn split_train_eval<T>(
    mut records:    Vec<T>,
    train_fraction: f64,
    seed:           u64,
) -> (Vec<T>, Vec<T>) {
    let mut rng = StdRng::seed_from_u64(seed);

    // Fisher-Yates shuffle — every permutation is equally likely
    records.shuffle(&mut rng);

    // Calculate the split index
    // e.g. 100 records * 0.8 = 80 → first 80 are training
    let total    = records.len();
    let split_at = ((total as f64) * train_fraction).round() as usize;

    // Clamp to valid range to avoid panics on tiny datasets
    let split_at = split_at.min(total);

    // split_off(n) removes elements [n..] from the Vec and returns them
    // After this: records = [0..split_at], eval = [split_at..total]
    let eval = records.split_off(split_at);

    tracing::debug!(
        "Dataset split: {} training, {} evaluation (seed {})",
        records.len(),
        eval.len(),
        seed,
    );

    (records, eval)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correct_split_sizes() {
        let items: Vec<usize> = (0..100).collect();
        let (train, eval)     = split_train_eval(items, 0.8, 42);
        assert_eq!(train.len(), 80);
        assert_eq!(eval.len(),  20);
    }

    #[test]
    fn test_all_items_preserved() {
        // No items should be lost in the split
        let items: Vec<usize> = (0..50).collect();
        let (train, eval)     = split_train_eval(items, 0.7, 42);
        assert_eq!(train.len() + eval.len(), 50);
    }

    #[test]
    fn test_same_seed_same_split() {
        let items: Vec<usize> = (0..30).collect();
        let (t1, e1) = split_train_eval(items.clone(), 0.8, 7);
        let (t2, e2) = split_train_eval(items, 0.8, 7);
        assert_eq!(t1, t2);
        assert_eq!(e1, e2);
    }

    #[test]
    fn test_different_seed_different_order() {
        let items: Vec<usize> = (0..100).collect();
        let (t1, _) = split_train_eval(items.clone(), 0.8, 1);
        let (t2, _) = split_train_eval(items, 0.8, 2);
        // Same sizes, (almost certainly) different ordering
        assert_eq!(t1.len(), t2.len());
        assert_ne!(t1, t2);
    }

    #[test]
    fn test_empty_dataset() {
        let items: Vec<usize> = Vec::new();
        let (train, eval)     = split_train_eval(items, 0.8, 42);
        assert!(train.is_empty());
        assert!(eval.is_empty());
    }

    #[test]
    fn test_full_training_split() {
        // 1.0 fraction means everything goes to training
        let items: Vec<usize> = (0..10).collect();
        let (train, eval)     = split_train_eval(items, 1.0, 42);
        assert_eq!(train.len(), 10);
        assert!(eval.is_empty());
    }
}
