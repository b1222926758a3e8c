// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// Traits are Rust's way of defining shared behaviour —
// similar to interfaces in Java or abstract classes in Python.
//
// By programming against traits instead of concrete types,
// we can swap implementations without changing the code
// that uses them. For example:
//   - CsvLoader implements RecordSource
//   - A future JsonlLoader could also implement RecordSource
//   - The application layer only sees RecordSource
//     and works with both without any changes
//
// This is the Dependency Inversion Principle from SOLID,
// applied using Rust's trait system.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)
//            Rust Book §17 (Object Oriented Patterns)

use anyhow::Result;
use crate::domain::prediction::LabelScore;
use crate::domain::record::LabelledText;

// ─── RecordSource ─────────────────────────────────────────────────────────────
/// Any component that can load labelled text records from a source.
///
/// Implementations:
///   - CsvLoader → loads from a CSV file with text + label columns
///   - (future) JsonlLoader → loads from JSON-lines exports
pub trait RecordSource {
    /// Load all available records from this source.
    /// Returns a Vec of LabelledText or an error.
    fn load_all(&self) -> Result<Vec<LabelledText>>;
}

// ─── TextTagger ───────────────────────────────────────────────────────────────
/// Any component that can assign labels to a piece of text.
///
/// Implementations:
///   - TagUseCase → uses the trained transformer
///   - (future) KeywordTagger → uses handcrafted keyword rules
pub trait TextTagger {
    /// Score every known label against the given text.
    /// Returns one LabelScore per label, in binarizer order.
    fn tag(&self, text: &str) -> Result<Vec<LabelScore>>;
}

// ─── Persistable ──────────────────────────────────────────────────────────────
/// Any component whose state can be saved and restored from disk.
///
/// Implementations:
///   - LabelBinarizer → saves/loads its fitted label vocabulary
pub trait Persistable: Sized {
    /// Save this component's state to the given path
    fn save(&self, path: &str) -> Result<()>;

    /// Load a component's state from the given path.
    /// Returns Self so callers can use the loaded instance directly.
    fn load(path: &str) -> Result<Self>;
}
