// ============================================================
// Layer 4 — CSV Record Loader
// ============================================================
// Loads labelled text rows from a CSV file using the csv crate.
//
// Expected file shape (header row required):
//
//   id,text,labels
//   1,"Great camera but the battery dies in an hour","camera,battery"
//   2,"Arrived on time, well packaged",""
//
// The text column and the label column are found BY HEADER NAME,
// not by position, so extra columns (ids, timestamps) are ignored.
// The label cell is one string containing zero or more labels
// separated by a delimiter ("," above); we split, trim and drop
// empty pieces to get the label list.
//
// An empty label cell is NOT an error — it is a valid example
// that belongs to none of the categories.
//
// Reference: csv crate documentation
//            Rust Book §9 (Error Handling)

use anyhow::{bail, Context, Result};
use std::fs::File;
use std::path::Path;

use crate::domain::record::LabelledText;
use crate::domain::traits::RecordSource;

/// Loads all rows from one CSV file.
/// Implements the RecordSource trait from Layer 3.
pub struct CsvLoader {
    /// Path to the CSV file
    path: String,
    /// Header name of the text column
    text_column: String,
    /// Header name of the label column
    label_column: String,
    /// Separator between labels inside the label cell
    label_delimiter: char,
}

impl CsvLoader {
    pub fn new(
        path:            impl Into<String>,
        text_column:     impl Into<String>,
        label_column:    impl Into<String>,
        label_delimiter: char,
    ) -> Self {
        Self {
            path:         path.into(),
            text_column:  text_column.into(),
            label_column: label_column.into(),
            label_delimiter,
        }
    }

    /// Split a raw label cell into individual label strings.
    /// "camera, battery," → ["camera", "battery"]
    fn parse_label_cell(&self, cell: &str) -> Vec<String> {
        cell.split(self.label_delimiter)
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .collect()
    }
}

/// Implement the RecordSource trait so the application layer
/// can call load_all() without knowing about CSV internals
impl RecordSource for CsvLoader {
    fn load_all(&self) -> Result<Vec<LabelledText>> {
        let path = Path::new(&self.path);
        let file = File::open(path)
            .with_context(|| format!("Cannot open data file '{}'", self.path))?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(file);

        // Resolve both columns to positional indices once, up front.
        // Failing here (rather than per-row) gives one clear error.
        let headers = reader
            .headers()
            .with_context(|| format!("Cannot read header row of '{}'", self.path))?
            .clone();

        let text_idx  = column_index(&headers, &self.text_column, &self.path)?;
        let label_idx = column_index(&headers, &self.label_column, &self.path)?;

        let mut records = Vec::new();
        let mut skipped = 0usize;

        for (row, result) in reader.records().enumerate() {
            let record = result
                .with_context(|| format!("Malformed CSV record {} in '{}'", row, self.path))?;

            let text = record.get(text_idx).unwrap_or("").trim();

            // A row without text cannot be tokenised — skip it, keep going
            if text.is_empty() {
                skipped += 1;
                tracing::warn!("Skipping row {} in '{}': empty text cell", row, self.path);
                continue;
            }

            let labels = self.parse_label_cell(record.get(label_idx).unwrap_or(""));
            records.push(LabelledText::new(text, labels));
        }

        tracing::info!(
            "Loaded {} records from '{}' ({} skipped)",
            records.len(),
            self.path,
            skipped
        );
        Ok(records)
    }
}

/// Find a column index by header name, or fail listing what IS there.
fn column_index(headers: &csv::StringRecord, name: &str, path: &str) -> Result<usize> {
    match headers.iter().position(|h| h == name) {
        Some(idx) => Ok(idx),
        None => {
            let available: Vec<&str> = headers.iter().collect();
            bail!(
                "Column '{}' not found in '{}'. Available columns: {:?}",
                name,
                path,
                available
            )
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> (tempfile::TempDir, String) {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        let mut f = std::fs::File::create(&path).unwrap();
        write!(f, "{contents}").unwrap();
        let path = path.to_str().unwrap().to_string();
        (dir, path)
    }

    #[test]
    fn test_loads_rows_and_splits_labels() {
        let (_dir, path) = write_csv(
            "id,text,labels\n\
             1,first example,\"a,b\"\n\
             2,second example,b\n",
        );
        let loader  = CsvLoader::new(&path, "text", "labels", ',');
        let records = loader.load_all().unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].labels, vec!["a", "b"]);
        assert_eq!(records[1].labels, vec!["b"]);
    }

    #[test]
    fn test_empty_label_cell_is_valid() {
        let (_dir, path) = write_csv("text,labels\nno labels here,\n");
        let loader  = CsvLoader::new(&path, "text", "labels", ',');
        let records = loader.load_all().unwrap();

        assert_eq!(records.len(), 1);
        assert!(records[0].labels.is_empty());
    }

    #[test]
    fn test_labels_are_trimmed_and_empties_dropped() {
        let (_dir, path) = write_csv("text,labels\nhello,\" a , ,b ,\"\n");
        let loader  = CsvLoader::new(&path, "text", "labels", ',');
        let records = loader.load_all().unwrap();

        assert_eq!(records[0].labels, vec!["a", "b"]);
    }

    #[test]
    fn test_empty_text_row_is_skipped() {
        let (_dir, path) = write_csv("text,labels\n,a\nkept,b\n");
        let loader  = CsvLoader::new(&path, "text", "labels", ',');
        let records = loader.load_all().unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].text, "kept");
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let (_dir, path) = write_csv("text,tags\nhello,a\n");
        let loader = CsvLoader::new(&path, "text", "labels", ',');
        let err    = loader.load_all().unwrap_err().to_string();

        // The error should name the missing column and the real ones
        assert!(err.contains("labels"));
        assert!(err.contains("tags"));
    }

    #[test]
    fn test_alternate_delimiter() {
        let (_dir, path) = write_csv("text,labels\nhello,a|b|c\n");
        let loader  = CsvLoader::new(&path, "text", "labels", '|');
        let records = loader.load_all().unwrap();

        assert_eq!(records[0].labels, vec!["a", "b", "c"]);
    }
}
