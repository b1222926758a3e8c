// ============================================================
// Layer 5 — Inferencer
// ============================================================
use anyhow::Result;
use burn::prelude::*;
use tokenizers::Tokenizer;

use crate::data::binarizer::LabelBinarizer;
use crate::domain::prediction::LabelScore;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::metrics::sigmoid;
use crate::ml::model::{TransformerTaggerConfig, TransformerTaggerModel};

type InferBackend = burn::backend::Wgpu;

const PAD_ID: u32 = 0;

pub struct Inferencer {
    model:       TransformerTaggerModel<InferBackend>,
    max_seq_len: usize,
    /// The SAME decision threshold the trainer evaluated with —
    /// read from the saved config, never a second constant
    threshold:   f32,
    device:      burn::backend::wgpu::WgpuDevice,
}

impl Inferencer {
    /// Rebuild the trained model from the best checkpoint.
    /// The label count comes from the fitted binarizer, so the head
    /// width always matches the saved weights.
    pub fn from_checkpoint(
        ckpt_manager: &CheckpointManager,
        binarizer:    &LabelBinarizer,
    ) -> Result<Self> {
        let device = burn::backend::wgpu::WgpuDevice::default();
        let cfg    = ckpt_manager.load_config()?;
        let model_cfg = TransformerTaggerConfig::new(
            cfg.vocab_size, cfg.max_seq_len, cfg.d_model,
            cfg.num_heads, cfg.num_layers, cfg.d_ff, 0.0,
            binarizer.num_labels(),
        );
        let model: TransformerTaggerModel<InferBackend> = model_cfg.init(&device);
        let model = ckpt_manager.load_model(model, &device)?;
        tracing::info!("Model loaded from checkpoint");
        Ok(Self {
            model,
            max_seq_len: cfg.max_seq_len,
            threshold:   cfg.threshold,
            device,
        })
    }

    /// Score every known label against one (already cleaned) text.
    pub fn predict(
        &self,
        text:      &str,
        tokenizer: &Tokenizer,
        binarizer: &LabelBinarizer,
    ) -> Result<Vec<LabelScore>> {
        // ── Encode: token ids + attention mask, fixed length ──────────────────
        let enc = tokenizer.encode(text, false)
            .map_err(|e| anyhow::anyhow!("Tokenise: {e}"))?;

        let mut input_ids: Vec<u32> = enc.get_ids().to_vec();
        input_ids.truncate(self.max_seq_len);
        let real_len = input_ids.len();

        let mut attn_mask = vec![1u32; real_len];
        while input_ids.len() < self.max_seq_len {
            input_ids.push(PAD_ID);
            attn_mask.push(0);
        }

        // ── Forward pass on a batch of one ────────────────────────────────────
        let ids_flat:  Vec<i32> = input_ids.iter().map(|&x| x as i32).collect();
        let mask_flat: Vec<i32> = attn_mask.iter().map(|&x| x as i32).collect();

        let ids_tensor = Tensor::<InferBackend, 1, Int>::from_ints(
            ids_flat.as_slice(), &self.device,
        ).unsqueeze::<2>();
        let mask_tensor = Tensor::<InferBackend, 1, Int>::from_ints(
            mask_flat.as_slice(), &self.device,
        ).unsqueeze::<2>();

        let logits = self.model.forward(ids_tensor, mask_tensor); // [1, num_labels]
        let logits: Vec<f32> = logits
            .squeeze::<1>()
            .into_data().to_vec::<f32>().unwrap_or_default();

        // ── Sigmoid + threshold, label names from the binarizer ───────────────
        let scores: Vec<LabelScore> = binarizer
            .labels()
            .iter()
            .zip(logits.iter())
            .map(|(label, &logit)| LabelScore::new(label, sigmoid(logit), self.threshold))
            .collect();

        tracing::debug!(
            "Tagged {} labels, {} active at threshold {:.2}",
            scores.len(),
            scores.iter().filter(|s| s.active).count(),
            self.threshold,
        );

        Ok(scores)
    }
}
