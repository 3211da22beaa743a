//! ExportArtifactHandler - Command handler for downloading the approved bundle.

use std::sync::Arc;
use thiserror::Error;

use crate::domain::foundation::ErrorCode;
use crate::domain::review::{ReviewError, ReviewSession, FIX_BEFORE_EXPORT_NOTICE};
use crate::ports::{ArtifactSink, SavedArtifact, SinkError};

/// Error type for export.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExportArtifactError {
    /// The session refused the export; nothing was written.
    #[error(transparent)]
    Review(#[from] ReviewError),

    /// The bundle was approved but could not be saved.
    #[error(transparent)]
    Sink(#[from] SinkError),
}

impl ExportArtifactError {
    /// Message to show the user.
    pub fn notice(&self) -> String {
        match self {
            ExportArtifactError::Review(ReviewError::Rejected(_)) => {
                FIX_BEFORE_EXPORT_NOTICE.to_string()
            }
            other => other.to_string(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            ExportArtifactError::Review(err) => err.code(),
            ExportArtifactError::Sink(err) => err.code(),
        }
    }
}

/// Handler for exports.
///
/// # Dependencies
///
/// - `ArtifactSink`: Where approved bundles are saved
pub struct ExportArtifactHandler {
    sink: Arc<dyn ArtifactSink>,
}

impl ExportArtifactHandler {
    pub fn new(sink: Arc<dyn ArtifactSink>) -> Self {
        Self { sink }
    }

    /// Exports the artifact under review and saves it.
    ///
    /// The session is left unchanged either way; exporting twice saves two
    /// copies.
    pub async fn handle(&self, session: &mut ReviewSession) -> Result<SavedArtifact, ExportArtifactError> {
        let exported = session.export().map_err(|err| {
            tracing::info!(session_id = %session.id(), code = %err.code(), "Export refused: {}", err);
            err
        })?;

        let saved = self.sink.save(&exported).await.map_err(|err| {
            tracing::error!(session_id = %session.id(), "Failed to save exported bundle: {}", err);
            err
        })?;

        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryArtifactSink;
    use crate::domain::document::SourceDocument;
    use crate::domain::foundation::ReviewStage;
    use crate::domain::review::{ExtractionResult, EXPORT_FILE_NAME};
    use async_trait::async_trait;
    use serde_json::json;

    fn reviewing_session() -> ReviewSession {
        let mut session = ReviewSession::new();
        let ticket = session.begin_upload(SourceDocument::new("p.pdf", b"%PDF".to_vec()).unwrap());
        session.complete_extraction(ticket.generation, Ok(ExtractionResult::new(json!({"a": 1}))));
        session
    }

    struct FailingSink;

    #[async_trait]
    impl ArtifactSink for FailingSink {
        async fn save(
            &self,
            _artifact: &crate::domain::review::ExportedArtifact,
        ) -> Result<SavedArtifact, SinkError> {
            Err(SinkError::io("disk full"))
        }
    }

    #[tokio::test]
    async fn export_saves_exact_text() {
        let sink = InMemoryArtifactSink::new();
        let handler = ExportArtifactHandler::new(Arc::new(sink.clone()));
        let mut session = reviewing_session();
        session.edit("{ \"a\" : 2 }").unwrap();

        let saved = handler.handle(&mut session).await.unwrap();

        assert_eq!(saved.size_bytes, 11);
        let artifact = sink.last().unwrap();
        assert_eq!(artifact.content, b"{ \"a\" : 2 }");
        assert_eq!(artifact.filename, EXPORT_FILE_NAME);
        assert_eq!(session.stage(), ReviewStage::Reviewing);
    }

    #[tokio::test]
    async fn invalid_text_is_not_saved() {
        let sink = InMemoryArtifactSink::new();
        let handler = ExportArtifactHandler::new(Arc::new(sink.clone()));
        let mut session = reviewing_session();
        session.edit("{\"a\":").unwrap();

        let err = handler.handle(&mut session).await.unwrap_err();

        assert_eq!(err.notice(), FIX_BEFORE_EXPORT_NOTICE);
        assert_eq!(err.code(), ErrorCode::ArtifactInvalid);
        assert!(sink.saved().is_empty());
        assert_eq!(session.artifact().unwrap().text(), "{\"a\":");
    }

    #[tokio::test]
    async fn export_without_artifact_is_refused() {
        let sink = InMemoryArtifactSink::new();
        let handler = ExportArtifactHandler::new(Arc::new(sink.clone()));
        let mut session = ReviewSession::new();

        let err = handler.handle(&mut session).await.unwrap_err();

        assert_eq!(err, ExportArtifactError::Review(ReviewError::NoArtifact));
        assert!(sink.saved().is_empty());
    }

    #[tokio::test]
    async fn sink_failure_is_reported() {
        let handler = ExportArtifactHandler::new(Arc::new(FailingSink));
        let mut session = reviewing_session();

        let err = handler.handle(&mut session).await.unwrap_err();

        assert!(matches!(err, ExportArtifactError::Sink(SinkError::Io(_))));
        assert_eq!(err.code(), ErrorCode::StorageError);
    }
}
