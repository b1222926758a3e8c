// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// This layer handles everything from raw CSV rows
// all the way to GPU-ready tensor batches.
//
// The pipeline flows in this order:
//
//   train.csv / test.csv
//       │
//       ▼
//   CsvLoader         → reads rows, splits the label column
//       │
//       ▼
//   Preprocessor      → cleans text (whitespace, encoding)
//       │
//       ▼
//   LabelBinarizer    → label strings → fixed-width 0/1 vectors
//       │
//       ▼
//   Tokenizer         → converts words to token ID numbers
//       │
//       ▼
//   TagDataset        → implements Burn's Dataset trait
//       │
//       ▼
//   TagBatcher        → stacks samples into tensor batches
//       │
//       ▼
//   DataLoader        → feeds batches to the training loop
//
// Each module is responsible for exactly one step.
// This makes each step independently testable and replaceable.
//
// Reference: Burn Book §4 (Datasets and Dataloaders)
//            Rust Book §13 (Iterators and Closures)

/// Loads CSV rows of text + delimited labels using the csv crate
pub mod loader;

/// Cleans and normalises raw CSV text
pub mod preprocessor;

/// Fits and applies the label-string ↔ binary-vector bijection
pub mod binarizer;

/// Implements Burn's Dataset trait for tagging samples
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;

/// Shuffles and splits records into train/evaluation sets
pub mod splitter;
