//! Extraction Service Port - Interface to the external bundle extractor.
//!
//! The extractor turns a policy document into an NHCX insurance plan bundle.
//! How it does so is outside this crate; the port only fixes the request
//! (one document) and the three ways a call can fail.
//!
//! # Example
//!
//! ```ignore
//! let service: Arc<dyn ExtractionService> = Arc::new(HttpExtractionService::new(config)?);
//! match service.extract(&document).await {
//!     Ok(result) => println!("{}", result.bundle),
//!     Err(err) => eprintln!("{} failure: {}", err.category(), err),
//! }
//! ```

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::document::SourceDocument;
use crate::domain::foundation::ErrorCode;
use crate::domain::review::{ExtractionResult, FailureCategory};

/// Port for the external extraction service.
#[async_trait]
pub trait ExtractionService: Send + Sync {
    /// Extracts a structured bundle from `document`.
    ///
    /// Each call is an independent request; calls are never deduplicated.
    async fn extract(&self, document: &SourceDocument) -> Result<ExtractionResult, ExtractionError>;

    /// Returns true if the service answers its health check.
    async fn is_available(&self) -> bool;
}

/// Errors from an extraction call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    /// The service could not be reached.
    #[error("network error: {0}")]
    Network(String),

    /// No response within the configured timeout.
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// The service rejected the request (4xx).
    #[error("service rejected request ({status}): {detail}")]
    Rejected { status: u16, detail: String },

    /// The service failed while handling the request (5xx).
    #[error("service failed ({status}): {detail}")]
    Unavailable { status: u16, detail: String },

    /// The response body was not a usable bundle.
    #[error("malformed response: {0}")]
    Decode(String),
}

impl ExtractionError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// Builds a service error from an HTTP status and body detail.
    pub fn from_status(status: u16, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        if (500..600).contains(&status) {
            Self::Unavailable { status, detail }
        } else {
            Self::Rejected { status, detail }
        }
    }

    /// Which stage of the call failed.
    pub fn category(&self) -> FailureCategory {
        match self {
            Self::Network(_) | Self::Timeout { .. } => FailureCategory::Transport,
            Self::Rejected { .. } | Self::Unavailable { .. } => FailureCategory::Service,
            Self::Decode(_) => FailureCategory::Decode,
        }
    }

    /// Returns true if repeating the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::Timeout { .. } | Self::Unavailable { .. }
        )
    }

    pub fn code(&self) -> ErrorCode {
        match self.category() {
            FailureCategory::Transport => ErrorCode::ExtractionTransport,
            FailureCategory::Service => ErrorCode::ExtractionService,
            FailureCategory::Decode => ErrorCode::ExtractionDecode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_errors_are_categorized() {
        assert_eq!(
            ExtractionError::network("refused").category(),
            FailureCategory::Transport
        );
        assert_eq!(
            ExtractionError::Timeout { timeout_secs: 5 }.category(),
            FailureCategory::Transport
        );
    }

    #[test]
    fn status_errors_split_by_class() {
        assert!(matches!(
            ExtractionError::from_status(400, "Only PDF files are supported."),
            ExtractionError::Rejected { status: 400, .. }
        ));
        assert!(matches!(
            ExtractionError::from_status(502, "bad gateway"),
            ExtractionError::Unavailable { status: 502, .. }
        ));
        assert_eq!(
            ExtractionError::from_status(500, "boom").category(),
            FailureCategory::Service
        );
    }

    #[test]
    fn decode_errors_are_categorized() {
        let err = ExtractionError::decode("missing fhir_bundle");
        assert_eq!(err.category(), FailureCategory::Decode);
        assert_eq!(err.code(), ErrorCode::ExtractionDecode);
    }

    #[test]
    fn only_transient_errors_are_retryable() {
        assert!(ExtractionError::network("reset").is_retryable());
        assert!(ExtractionError::Timeout { timeout_secs: 1 }.is_retryable());
        assert!(ExtractionError::from_status(503, "").is_retryable());
        assert!(!ExtractionError::from_status(400, "").is_retryable());
        assert!(!ExtractionError::decode("bad json").is_retryable());
    }

    #[test]
    fn error_messages_include_detail() {
        let err = ExtractionError::from_status(400, "Only PDF files are supported.");
        assert_eq!(
            err.to_string(),
            "service rejected request (400): Only PDF files are supported."
        );
    }

    #[test]
    fn extraction_service_is_object_safe() {
        fn check<T: ExtractionService + ?Sized>() {}
        check::<dyn ExtractionService>();
    }
}
