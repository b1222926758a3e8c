// ============================================================
// Layer 4 — Text Preprocessor
// ============================================================
// Cleans raw text from CSV exports before tokenisation.
//
// Why do we need to clean text?
//   Text columns exported from spreadsheets and web scrapes
//   often contain:
//   - Non-breaking spaces (U+00A0) from HTML
//   - Zero-width spaces (U+200B) from copy-pasting
//   - Carriage returns (\r) and embedded newlines from
//     multi-line cells
//   - Tab characters from table formatting
//   - Control characters from encoding accidents
//
// If we don't clean these, the tokenizer treats them as
// meaningful tokens and wastes vocabulary space on whitespace.
//
// Unlike a document pipeline, a classifier does not care about
// paragraph structure — every text becomes ONE flat line, so
// all whitespace variants (including newlines) collapse to a
// single space.
//
// Reference: Rust Book §8 (Strings in Rust)
//            Rust Book §13 (Iterators)

pub struct Preprocessor;

impl Preprocessor {
    /// Create a new Preprocessor instance
    pub fn new() -> Self {
        Self
    }

    /// Clean a raw text cell for downstream tokenisation.
    /// Takes a &str and returns an owned String — one flat line,
    /// single-spaced, trimmed at both ends.
    pub fn clean(&self, text: &str) -> String {
        let mut out        = String::with_capacity(text.len());
        let mut last_space = true; // swallow leading whitespace

        for c in text.chars() {
            // Every whitespace variant, invisible character and
            // control character counts as a separator
            let is_separator = match c {
                '\t' | '\r' | '\n'             => true,
                '\u{00A0}' | '\u{200B}' | '\u{FEFF}' => true,
                c if c.is_whitespace()         => true,
                c if c.is_control()            => true,
                _                              => false,
            };

            if is_separator {
                // Collapse runs of separators into a single space
                if !last_space {
                    out.push(' ');
                    last_space = true;
                }
            } else {
                out.push(c);
                last_space = false;
            }
        }

        // Drop a trailing separator space, if any
        if out.ends_with(' ') {
            out.pop();
        }
        out
    }
}

/// Implement Default so Preprocessor can be created with Preprocessor::default()
impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
// These tests run with `cargo test` and verify the cleaning logic.
// Reference: Rust Book §11 (Writing Automated Tests)
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_multiple_spaces() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("hello   world"), "hello world");
    }

    #[test]
    fn test_trims_edges() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("  hello world  "), "hello world");
    }

    #[test]
    fn test_newlines_become_spaces() {
        let p = Preprocessor::new();
        // Multi-line CSV cells flatten to one line
        assert_eq!(p.clean("line one\r\nline two\nline three"), "line one line two line three");
    }

    #[test]
    fn test_removes_control_chars() {
        let p = Preprocessor::new();
        // \x01 is a control character that should become a space
        assert_eq!(p.clean("hello\x01world"), "hello world");
    }

    #[test]
    fn test_unicode_whitespace_variants() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("a\u{00A0}b\u{200B}c"), "a b c");
    }

    #[test]
    fn test_empty_string() {
        let p = Preprocessor::new();
        assert_eq!(p.clean(""), "");
    }

    #[test]
    fn test_whitespace_only_string() {
        let p = Preprocessor::new();
        assert_eq!(p.clean(" \t\r\n "), "");
    }
}
