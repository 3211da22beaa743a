//! Domain error type and error codes.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;

/// Machine-readable error codes, displayed in SCREAMING_SNAKE_CASE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Validation errors
    ValidationFailed,
    EmptyDocument,

    // State errors
    InvalidStateTransition,
    NoArtifact,
    ArtifactInvalid,

    // Extraction errors
    ExtractionTransport,
    ExtractionService,
    ExtractionDecode,

    // Infrastructure errors
    StorageError,
    InternalError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::EmptyDocument => "EMPTY_DOCUMENT",
            ErrorCode::InvalidStateTransition => "INVALID_STATE_TRANSITION",
            ErrorCode::NoArtifact => "NO_ARTIFACT",
            ErrorCode::ArtifactInvalid => "ARTIFACT_INVALID",
            ErrorCode::ExtractionTransport => "EXTRACTION_TRANSPORT",
            ErrorCode::ExtractionService => "EXTRACTION_SERVICE",
            ErrorCode::ExtractionDecode => "EXTRACTION_DECODE",
            ErrorCode::StorageError => "STORAGE_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", s)
    }
}

/// Error raised by domain constructors and the document store.
#[derive(Debug, Clone)]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
    pub details: HashMap<String, String>,
}

impl DomainError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: HashMap::new(),
        }
    }

    /// `ValidationFailed` error naming the offending field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message).with_detail("field", field.into())
    }

    /// Attaches a key/value pair for logs.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for DomainError {}
