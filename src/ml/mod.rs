// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// This layer contains ALL Burn framework specific code.
// No other layer imports from burn directly — only this one
// (and the thin Dataset/Batcher adapters in Layer 4).
//
// Why isolate Burn code here?
//   - If Burn's API changes, we only update this layer
//   - Other layers are testable without a GPU
//   - The model architecture is clearly separated from
//     data loading and application logic
//
// What's in this layer:
//
//   model.rs     — The transformer encoder architecture
//                  Implements the full encoder with:
//                  • Token embeddings
//                  • Positional embeddings
//                  • Multi-head self-attention (padding-masked)
//                  • Feed-forward networks (GELU activation)
//                  • Layer normalisation
//                  • Residual connections
//                  • Masked mean-pooling
//                  • Sigmoid multi-label classification head
//
//   trainer.rs   — The training loop
//                  Handles forward pass, BCE loss, backward
//                  pass, optimiser step, evaluation cadence,
//                  checkpoint saving and best-epoch selection
//
//   metrics.rs   — Threshold-based multi-label metrics
//                  Sigmoid, thresholding, macro F1,
//                  macro ROC-AUC, Hamming loss
//
//   inferencer.rs — The inference engine
//                  Loads a checkpoint, tokenises input,
//                  runs the model, thresholds the label scores
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)
//            Vaswani et al. (2017) Attention Is All You Need

/// Transformer encoder tagging model architecture
pub mod model;

/// Full training loop with evaluation cadence and checkpointing
pub mod trainer;

/// Multi-label evaluation metrics (pure functions, no tensors)
pub mod metrics;

/// Inference engine — loads checkpoint and scores labels
pub mod inferencer;
