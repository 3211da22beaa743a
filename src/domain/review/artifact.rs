//! EditableArtifact - the user-editable text of an extracted bundle.

use serde_json::Value;

use crate::domain::foundation::{DomainError, ErrorCode};

use super::validator::{check, ParseIssue, TextCheck};
use super::ExtractionResult;

/// Validity of the current artifact text.
#[derive(Debug, Clone, PartialEq)]
pub enum Validity {
    /// Text parses; holds the parsed value.
    Valid(Value),
    /// Text does not parse; holds the reason.
    Invalid(ParseIssue),
}

impl From<TextCheck> for Validity {
    fn from(check: TextCheck) -> Self {
        match check {
            TextCheck::Valid(value) => Validity::Valid(value),
            TextCheck::Invalid(issue) => Validity::Invalid(issue),
        }
    }
}

/// Text the user reviews and corrects.
///
/// # Invariants
///
/// - `text` is always exactly what the user last entered, valid or not
/// - `validity` is always the result of checking the current `text`
#[derive(Debug, Clone, PartialEq)]
pub struct EditableArtifact {
    text: String,
    validity: Validity,
}

impl EditableArtifact {
    /// Seeds an artifact from an extraction result.
    ///
    /// The bundle is rendered canonically: object keys sorted, two-space
    /// indentation, no trailing newline.
    pub fn seed(result: &ExtractionResult) -> Result<Self, DomainError> {
        let text = canonical_text(&result.bundle)?;
        Ok(Self {
            text,
            validity: Validity::Valid(result.bundle.clone()),
        })
    }

    /// Creates an artifact from arbitrary text, checking it once.
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let validity = check(&text).into();
        Self { text, validity }
    }

    /// Replaces the text and recomputes validity.
    ///
    /// Returns the new validity flag.
    pub fn edit(&mut self, text: impl Into<String>) -> bool {
        self.text = text.into();
        self.validity = check(&self.text).into();
        self.is_valid()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn validity(&self) -> &Validity {
        &self.validity
    }

    pub fn is_valid(&self) -> bool {
        matches!(self.validity, Validity::Valid(_))
    }

    /// Parsed value of the current text, when valid.
    pub fn parsed(&self) -> Option<&Value> {
        match &self.validity {
            Validity::Valid(value) => Some(value),
            Validity::Invalid(_) => None,
        }
    }

    /// Parse failure of the current text, when invalid.
    pub fn issue(&self) -> Option<&ParseIssue> {
        match &self.validity {
            Validity::Valid(_) => None,
            Validity::Invalid(issue) => Some(issue),
        }
    }
}

/// Renders a bundle as canonical pretty-printed JSON.
pub fn canonical_text(bundle: &Value) -> Result<String, DomainError> {
    // serde_json's default map is ordered by key, so this is stable.
    serde_json::to_string_pretty(bundle).map_err(|e| {
        DomainError::new(
            ErrorCode::InternalError,
            format!("Failed to serialize bundle: {}", e),
        )
    })
}
