// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands: `train` and `tag`
// and all their configurable flags.
//
// clap's derive macros automatically generate:
//   - help text (--help)
//   - error messages for missing args
//   - type conversion (string → usize, f64, etc.)
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};
use crate::application::train_use_case::TrainConfig;

/// The two top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the multi-label tagger on a CSV dataset
    Train(TrainArgs),

    /// Tag a new text using a trained checkpoint
    Tag(TagArgs),
}

/// All arguments for the `train` command.
/// Each field becomes a --flag on the command line.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// CSV file with the training rows (header row required)
    #[arg(long, default_value = "data/train.csv")]
    pub train_file: String,

    /// CSV file with the evaluation rows; when omitted, a holdout
    /// fraction of the training file is split off instead
    #[arg(long)]
    pub eval_file: Option<String>,

    /// Header name of the column holding the free text
    #[arg(long, default_value = "text")]
    pub text_column: String,

    /// Header name of the column holding the delimited labels
    #[arg(long, default_value = "labels")]
    pub label_column: String,

    /// Separator between labels inside the label cell
    #[arg(long, default_value_t = ',')]
    pub label_delimiter: char,

    /// Directory to save model checkpoints, tokenizer and vocabulary
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// Maximum number of tokens per input sequence
    /// (longer texts are truncated, shorter ones padded)
    #[arg(long, default_value_t = 256)]
    pub max_seq_len: usize,

    /// Number of samples processed together in one forward pass
    #[arg(long, default_value_t = 8)]
    pub batch_size: usize,

    /// Number of full passes through the training data
    #[arg(long, default_value_t = 5)]
    pub epochs: usize,

    /// Evaluate (and consider the checkpoint for "best") every
    /// N epochs; the final epoch is always evaluated
    #[arg(long, default_value_t = 1)]
    pub eval_every: usize,

    /// How fast the model learns — too high causes instability,
    /// too low causes slow convergence
    #[arg(long, default_value_t = 2e-4)]
    pub lr: f64,

    /// Probability cutoff that turns a label score into a yes/no
    /// decision — the SAME value is used for evaluation metrics
    /// and later inference
    #[arg(long, default_value_t = crate::ml::metrics::DEFAULT_THRESHOLD)]
    pub threshold: f32,

    /// Fraction of training rows held out for evaluation when
    /// no --eval-file is given
    #[arg(long, default_value_t = 0.2)]
    pub holdout_fraction: f64,

    /// Seed for the data shuffle and the holdout split
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Hidden dimension of the transformer (d_model in the paper)
    /// Every token is represented as a vector of this size
    #[arg(long, default_value_t = 256)]
    pub d_model: usize,

    /// Number of attention heads in multi-head attention
    /// d_model must be divisible by num_heads
    #[arg(long, default_value_t = 8)]
    pub num_heads: usize,

    /// Number of stacked encoder layers
    #[arg(long, default_value_t = 6)]
    pub num_layers: usize,

    /// Inner dimension of the feed-forward network
    /// Typically 4x d_model
    #[arg(long, default_value_t = 1024)]
    pub d_ff: usize,

    /// Dropout probability — randomly zeroes activations during training
    /// to prevent overfitting
    #[arg(long, default_value_t = 0.1)]
    pub dropout: f64,

    /// Total number of unique tokens the model can recognise
    #[arg(long, default_value_t = 30522)]
    pub vocab_size: usize,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// This is the boundary between Layer 1 and Layer 2 —
/// the application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            train_file:       a.train_file,
            eval_file:        a.eval_file,
            text_column:      a.text_column,
            label_column:     a.label_column,
            label_delimiter:  a.label_delimiter,
            checkpoint_dir:   a.checkpoint_dir,
            max_seq_len:      a.max_seq_len,
            batch_size:       a.batch_size,
            epochs:           a.epochs,
            eval_every:       a.eval_every,
            lr:               a.lr,
            threshold:        a.threshold,
            holdout_fraction: a.holdout_fraction,
            seed:             a.seed,
            d_model:          a.d_model,
            num_heads:        a.num_heads,
            num_layers:       a.num_layers,
            d_ff:             a.d_ff,
            dropout:          a.dropout,
            vocab_size:       a.vocab_size,
        }
    }
}

/// All arguments for the `tag` command
#[derive(Args, Debug)]
pub struct TagArgs {
    /// The text to tag
    #[arg(long)]
    pub text: String,

    /// Directory where checkpoints were saved during training
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,
}
