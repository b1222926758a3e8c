// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// This is the entry point for all user interaction.
// It uses the `clap` crate to parse command line arguments.
// All business logic is delegated to Layer 2 (application).
//
// Two commands are supported:
//   1. `train` — fine-tunes the tagger on a CSV dataset
//   2. `tag`   — loads a checkpoint and tags a new text
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

// Declare the commands submodule
pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, TagArgs, TrainArgs};

/// The main CLI struct — clap reads the fields and generates
/// argument parsing code automatically via the Parser derive macro.
#[derive(Parser, Debug)]
#[command(
    name = "text-tagger",
    version = "0.1.0",
    about = "Train a transformer multi-label tagger on CSV text data, then tag new text."
)]
pub struct Cli {
    /// The subcommand to run (train or tag)
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    /// This keeps the CLI layer thin — it only routes, never computes.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args) => Self::run_train(args),
            Commands::Tag(args)   => Self::run_tag(args),
        }
    }

    /// Handles the `train` subcommand.
    /// Converts CLI args into a TrainConfig and hands off to Layer 2.
    fn run_train(args: TrainArgs) -> Result<()> {
        use crate::application::train_use_case::TrainUseCase;

        tracing::info!("Starting training on data in: {}", args.train_file);

        // Convert CLI args → application config (separates presentation from domain)
        let use_case = TrainUseCase::new(args.into());
        use_case.execute()?;

        println!("Training complete. Checkpoint saved.");
        Ok(())
    }

    /// Handles the `tag` subcommand.
    /// Loads the model from checkpoint and prints every label's score.
    fn run_tag(args: TagArgs) -> Result<()> {
        use crate::application::tag_use_case::TagUseCase;
        use crate::domain::traits::TextTagger;

        // Build the use case from the saved checkpoint directory
        let use_case = TagUseCase::new(args.checkpoint_dir.clone())?;

        // Score all labels and print the full distribution
        let scores = use_case.tag(&args.text)?;

        println!("\n{:<24} {:>11}  active", "label", "probability");
        for s in &scores {
            println!(
                "{:<24} {:>11.4}  {}",
                s.label,
                s.probability,
                if s.active { "yes" } else { "no" },
            );
        }

        let active: Vec<&str> = scores
            .iter()
            .filter(|s| s.active)
            .map(|s| s.label.as_str())
            .collect();

        if active.is_empty() {
            println!("\nNo label cleared the threshold.");
        } else {
            println!("\nLabels: {}", active.join(", "));
        }
        Ok(())
    }
}
