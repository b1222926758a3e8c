use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

/// One fully tokenised and padded training sample.
/// `label_vector` is the multi-hot target: one 0/1 slot per label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagSample {
    pub input_ids:      Vec<u32>,
    pub attention_mask: Vec<u32>,
    pub label_vector:   Vec<u8>,
}

impl TagSample {
    /// Number of labels this sample is positive for
    pub fn active_labels(&self) -> usize {
        self.label_vector.iter().filter(|&&b| b == 1).count()
    }
}

pub struct TagDataset {
    samples:    Vec<TagSample>,
    num_labels: usize,
}

impl TagDataset {
    /// Wrap samples for Burn's DataLoader.
    ///
    /// # Panics
    /// Panics if any sample's label vector is not `num_labels` wide
    /// or its mask length differs from its id length — either would
    /// corrupt every batch built from this dataset.
    pub fn new(samples: Vec<TagSample>, num_labels: usize) -> Self {
        for (i, s) in samples.iter().enumerate() {
            assert_eq!(
                s.label_vector.len(), num_labels,
                "sample {i}: label vector width {} != {num_labels}",
                s.label_vector.len()
            );
            assert_eq!(
                s.input_ids.len(), s.attention_mask.len(),
                "sample {i}: input_ids and attention_mask lengths differ"
            );
        }
        Self { samples, num_labels }
    }

    pub fn num_labels(&self) -> usize { self.num_labels }

    pub fn sample_count(&self) -> usize { self.samples.len() }
}

impl Dataset<TagSample> for TagDataset {
    fn get(&self, index: usize) -> Option<TagSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(labels: Vec<u8>) -> TagSample {
        TagSample {
            input_ids:      vec![5, 6, 7, 0],
            attention_mask: vec![1, 1, 1, 0],
            label_vector:   labels,
        }
    }

    #[test]
    fn test_len_and_get() {
        let ds = TagDataset::new(vec![sample(vec![1, 0]), sample(vec![0, 1])], 2);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.get(1).unwrap().label_vector, vec![0, 1]);
        assert!(ds.get(2).is_none());
    }

    #[test]
    fn test_active_labels() {
        assert_eq!(sample(vec![1, 0, 1]).active_labels(), 2);
        assert_eq!(sample(vec![0, 0, 0]).active_labels(), 0);
    }

    #[test]
    #[should_panic]
    fn test_wrong_label_width_panics() {
        TagDataset::new(vec![sample(vec![1, 0, 0])], 2);
    }
}
