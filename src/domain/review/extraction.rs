//! Extraction outcome types as seen by the review workflow.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Structured bundle returned by the extraction service.
///
/// The bundle is opaque: it is only ever serialized for editing, never
/// inspected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub bundle: Value,
    /// Status message reported by the service, if any.
    pub message: Option<String>,
    /// File name echoed back by the service, if any.
    pub filename: Option<String>,
}

impl ExtractionResult {
    pub fn new(bundle: Value) -> Self {
        Self {
            bundle,
            message: None,
            filename: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }
}

/// Which stage of an extraction call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCategory {
    /// The service could not be reached, or the call timed out.
    Transport,
    /// The service answered with a failure status.
    Service,
    /// The service answered with a body that is not a usable bundle.
    Decode,
}

impl fmt::Display for FailureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FailureCategory::Transport => "transport",
            FailureCategory::Service => "service",
            FailureCategory::Decode => "decode",
        };
        write!(f, "{}", s)
    }
}
