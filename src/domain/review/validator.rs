//! Textual Integrity Validator.
//!
//! Classifies editable text as well-formed JSON or not. Parsing is strict:
//! the whole text must be one JSON value, nothing is repaired, and the
//! top-level shape is not compared against the original bundle.

use serde_json::Value;
use std::fmt;

/// Where and why a text failed to parse.
///
/// Positional detail is informational; callers that only need the binary
/// classification can ignore it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIssue {
    /// 1-based line of the failure (0 when the parser reports none).
    pub line: usize,
    /// 1-based column of the failure (0 when the parser reports none).
    pub column: usize,
    pub message: String,
}

impl fmt::Display for ParseIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at line {} column {}", self.message, self.line, self.column)
    }
}

/// Result of checking a text.
#[derive(Debug, Clone, PartialEq)]
pub enum TextCheck {
    Valid(Value),
    Invalid(ParseIssue),
}

impl TextCheck {
    pub fn is_valid(&self) -> bool {
        matches!(self, TextCheck::Valid(_))
    }
}

/// Checks whether `text` is well-formed JSON.
///
/// Runs one full parse; deterministic for a given input.
pub fn check(text: &str) -> TextCheck {
    match serde_json::from_str::<Value>(text) {
        Ok(value) => TextCheck::Valid(value),
        Err(err) => TextCheck::Invalid(ParseIssue {
            line: err.line(),
            column: err.column(),
            message: describe(&err),
        }),
    }
}

fn describe(err: &serde_json::Error) -> String {
    use serde_json::error::Category;
    match err.classify() {
        Category::Eof => "unexpected end of input".to_string(),
        Category::Syntax => "syntax error".to_string(),
        Category::Io => "read error".to_string(),
        Category::Data => "unrepresentable value".to_string(),
    }
}
