//! `Label : value` extraction.

use regex::Regex;

/// A compiled `Label : value` line pattern.
///
/// The label must open a line (indentation allowed) and is matched
/// case-insensitively. Any run of spaces or tabs may surround the colon. The
/// value is the rest of the line, trimmed; a label line with nothing after the
/// colon does not count as a match.
#[derive(Debug, Clone)]
pub struct FieldPattern {
    label: String,
    regex: Regex,
}

impl FieldPattern {
    /// Compile a pattern for a literal label such as `"Chassis ID"`.
    pub fn new(label: &str) -> Self {
        let pattern = format!(r"(?im)^[ \t]*{}[ \t]*:[ \t]*(\S[^\r\n]*)", regex::escape(label));
        // An escaped literal inside a fixed template always compiles.
        let regex = Regex::new(&pattern).expect("escaped label yields a valid pattern");
        Self {
            label: label.to_string(),
            regex,
        }
    }

    /// The label this pattern looks for.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Return the first value in document order, trimmed.
    pub fn find(&self, text: &str) -> Option<String> {
        self.regex
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
    }

    /// Like [`find`](Self::find), but an absent field becomes an empty string.
    pub fn find_or_empty(&self, text: &str) -> String {
        self.find(text).unwrap_or_default()
    }
}

/// One-shot form of [`FieldPattern::find`].
///
/// Prefer a stored `FieldPattern` when the same label is extracted repeatedly.
pub fn extract_field(text: &str, label: &str) -> Option<String> {
    FieldPattern::new(label).find(text)
}
