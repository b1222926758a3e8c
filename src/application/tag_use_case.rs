// ============================================================
// Layer 2 — Tag Use Case
// ============================================================
// The inference workflow: load everything the training run
// persisted (config, tokenizer, label vocabulary, best
// checkpoint), then score new text against every known label.
//
// The text goes through the SAME preprocessor as the training
// data — a cleaning step that happens only at training time
// would make the model see a different token distribution at
// inference.

use anyhow::Result;
use tokenizers::Tokenizer;

use crate::data::binarizer::LabelBinarizer;
use crate::data::preprocessor::Preprocessor;
use crate::domain::prediction::LabelScore;
use crate::domain::traits::{Persistable, TextTagger};
use crate::infra::checkpoint::CheckpointManager;
use crate::infra::tokenizer_store::TokenizerStore;
use crate::ml::inferencer::Inferencer;

pub struct TagUseCase {
    tokenizer:    Tokenizer,
    binarizer:    LabelBinarizer,
    preprocessor: Preprocessor,
    inferencer:   Inferencer,
}

impl TagUseCase {
    /// Load the full inference stack from a checkpoint directory.
    pub fn new(checkpoint_dir: String) -> Result<Self> {
        let tok_store = TokenizerStore::new(&checkpoint_dir);
        let tokenizer = tok_store.load()?;

        let ckpt      = CheckpointManager::new(&checkpoint_dir);
        let binarizer = LabelBinarizer::load(
            ckpt.labels_path().to_str().unwrap_or("labels.json"),
        )?;

        let inferencer = Inferencer::from_checkpoint(&ckpt, &binarizer)?;

        Ok(Self {
            tokenizer,
            binarizer,
            preprocessor: Preprocessor::new(),
            inferencer,
        })
    }
}

impl TextTagger for TagUseCase {
    /// Score every known label against the given text.
    fn tag(&self, text: &str) -> Result<Vec<LabelScore>> {
        let cleaned = self.preprocessor.clean(text);
        self.inferencer.predict(&cleaned, &self.tokenizer, &self.binarizer)
    }
}
