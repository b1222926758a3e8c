// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Full train + evaluation loop using Burn's DataLoader and Adam.
//
// Key Burn 0.20 insight:
//   - Training uses MyBackend (Autodiff<Wgpu>) for gradients
//   - model.valid() returns model on MyInnerBackend (Wgpu)
//   - Evaluation batcher must also use MyInnerBackend
//
// Evaluation cadence: every `eval_every` epochs (and always on the
// final epoch) the model runs over the evaluation set, the logits
// and targets are pulled back to the CPU, and the multi-label
// metrics are computed there. Checkpoints are written every epoch;
// the epoch with the best macro-F1 so far is recorded as "best"
// and is the one inference loads.
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use anyhow::Result;
use burn::{
    data::dataloader::DataLoaderBuilder,
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
};

use crate::application::train_use_case::TrainConfig;
use crate::data::{batcher::TagBatcher, dataset::TagDataset};
use crate::infra::checkpoint::CheckpointManager;
use crate::infra::metrics::{EpochMetrics, MetricsLogger};
use crate::ml::metrics;
use crate::ml::model::{TransformerTaggerConfig, TransformerTaggerModel};

type MyBackend      = burn::backend::Autodiff<burn::backend::Wgpu>;
type MyInnerBackend = burn::backend::Wgpu;

pub fn run_training(
    cfg:           &TrainConfig,
    train_dataset: TagDataset,
    eval_dataset:  TagDataset,
    ckpt_manager:  CheckpointManager,
) -> Result<()> {
    let device = burn::backend::wgpu::WgpuDevice::default();
    tracing::info!("Using WGPU device: {:?}", device);
    train_loop(cfg, train_dataset, eval_dataset, ckpt_manager, device)
}

fn train_loop(
    cfg:           &TrainConfig,
    train_dataset: TagDataset,
    eval_dataset:  TagDataset,
    ckpt_manager:  CheckpointManager,
    device:        burn::backend::wgpu::WgpuDevice,
) -> Result<()> {
    let num_labels = train_dataset.num_labels();

    // ── Build model ───────────────────────────────────────────────────────────
    let model_cfg = TransformerTaggerConfig::new(
        cfg.vocab_size, cfg.max_seq_len, cfg.d_model,
        cfg.num_heads, cfg.num_layers, cfg.d_ff, cfg.dropout,
        num_labels,
    );
    let mut model: TransformerTaggerModel<MyBackend> = model_cfg.init(&device);
    tracing::info!(
        "Model ready: {} layers, d_model={}, {} labels",
        cfg.num_layers, cfg.d_model, num_labels
    );

    // ── Adam optimiser ────────────────────────────────────────────────────────
    // m = β1*m + (1-β1)*g        (mean)
    // v = β2*v + (1-β2)*g²       (variance)
    // θ = θ - lr * m / (√v + ε)  (update)
    let optim_cfg = AdamConfig::new().with_epsilon(1e-8);
    let mut optim = optim_cfg.init();

    // ── Training data loader (AutodiffBackend) ────────────────────────────────
    let train_batcher = TagBatcher::<MyBackend>::new(device.clone());
    let train_loader  = DataLoaderBuilder::new(train_batcher)
        .batch_size(cfg.batch_size)
        .shuffle(cfg.seed)
        .num_workers(1)
        .build(train_dataset);

    // ── Evaluation data loader (InnerBackend — no autodiff overhead) ──────────
    let eval_batcher = TagBatcher::<MyInnerBackend>::new(device.clone());
    let eval_loader  = DataLoaderBuilder::new(eval_batcher)
        .batch_size(cfg.batch_size)
        .num_workers(1)
        .build(eval_dataset);

    let logger = MetricsLogger::new(&cfg.checkpoint_dir)?;

    // Best macro-F1 seen so far — decides which checkpoint `tag` loads
    let mut best_f1 = f64::NEG_INFINITY;

    // A cadence of 0 would mean "never evaluate" — treat it as 1
    let eval_every = cfg.eval_every.max(1);

    // ── Epoch loop ────────────────────────────────────────────────────────────
    for epoch in 1..=cfg.epochs {

        // ── Training phase ────────────────────────────────────────────────────
        let mut train_loss_sum = 0.0f64;
        let mut train_batches  = 0usize;

        for batch in train_loader.iter() {
            let (loss, _) = model.forward_loss(
                batch.input_ids,
                batch.attention_mask,
                batch.targets,
            );

            let loss_val: f64 = loss.clone().into_scalar().elem::<f64>();
            train_loss_sum += loss_val;
            train_batches  += 1;

            // Backward pass + Adam update
            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.lr, model, grads);
        }

        let avg_train_loss = if train_batches > 0 {
            train_loss_sum / train_batches as f64
        } else { f64::NAN };

        // Checkpoint every epoch, evaluate on the cadence
        ckpt_manager.save_model(&model, epoch)?;

        let eval_now = epoch % eval_every == 0 || epoch == cfg.epochs;
        if !eval_now {
            println!(
                "Epoch {:>3}/{} | train_loss={:.4}",
                epoch, cfg.epochs, avg_train_loss,
            );
            continue;
        }

        // ── Evaluation phase ──────────────────────────────────────────────────
        // model.valid() → TransformerTaggerModel<MyInnerBackend>
        // dropout disabled for deterministic evaluation
        let model_valid = model.valid();

        let mut eval_loss_sum = 0.0f64;
        let mut eval_batches  = 0usize;

        // Raw logits and ground truth, one row per example — the
        // metrics module applies the sigmoid and the threshold
        let mut score_rows: Vec<Vec<f32>> = Vec::new();
        let mut truth_rows: Vec<Vec<u8>>  = Vec::new();

        for batch in eval_loader.iter() {
            let logits = model_valid.forward(
                batch.input_ids,
                batch.attention_mask,
            );

            let bce = burn::nn::loss::BinaryCrossEntropyLossConfig::new()
                .with_logits(true)
                .init(&logits.device());
            let batch_loss: f64 = bce
                .forward(logits.clone(), batch.targets.clone())
                .into_scalar().elem::<f64>();
            eval_loss_sum += batch_loss;
            eval_batches  += 1;

            // Pull logits and targets back to the CPU row by row
            let [batch_size, _] = logits.dims();
            let logits_flat: Vec<f32> = logits
                .into_data().to_vec::<f32>().unwrap_or_default();
            let targets_flat: Vec<i32> = batch.targets
                .into_data().to_vec::<i32>().unwrap_or_default();

            for row in 0..batch_size {
                let start = row * num_labels;
                let end   = start + num_labels;
                score_rows.push(logits_flat[start..end].to_vec());
                truth_rows.push(
                    targets_flat[start..end].iter().map(|&t| t as u8).collect()
                );
            }
        }

        let avg_eval_loss = if eval_batches > 0 {
            eval_loss_sum / eval_batches as f64
        } else { f64::NAN };

        let report = metrics::evaluate(&score_rows, &truth_rows, cfg.threshold);

        println!(
            "Epoch {:>3}/{} | train_loss={:.4} | eval_loss={:.4} | f1_macro={:.4} | roc_auc={:.4} | hamming={:.4}",
            epoch, cfg.epochs, avg_train_loss, avg_eval_loss,
            report.f1_macro, report.roc_auc_macro, report.hamming_loss,
        );

        let m = EpochMetrics::new(
            epoch,
            avg_train_loss,
            avg_eval_loss,
            report.f1_macro,
            report.roc_auc_macro,
            report.hamming_loss,
        );
        logger.log(&m)?;

        if m.is_improvement(best_f1) {
            best_f1 = m.f1_macro;
            ckpt_manager.mark_best(epoch)?;
            tracing::info!("New best checkpoint: epoch {} (f1_macro={:.4})", epoch, best_f1);
        }
    }

    tracing::info!("Training complete! Best f1_macro={:.4}", best_f1);
    Ok(())
}
