//! UploadDocumentHandler - Command handler for uploading a policy document.
//!
//! Records the document in the session, sends it to the extraction service,
//! and feeds the outcome back into the session's state machine.

use std::sync::Arc;

use crate::domain::foundation::{DocumentId, DomainError, Generation};
use crate::domain::document::SourceDocument;
use crate::domain::review::{
    ExtractionResult, ExtractionTicket, FailureCategory, Outcome, ReviewSession,
};
use crate::ports::ExtractionService;

/// Command to upload a document.
#[derive(Debug, Clone)]
pub struct UploadDocumentCommand {
    /// Name the user picked the file under.
    pub file_name: String,
    /// Raw file bytes.
    pub bytes: Vec<u8>,
}

impl UploadDocumentCommand {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }
}

/// Result of an upload cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadDocumentResult {
    /// The uploaded document.
    pub document_id: DocumentId,
    /// Generation assigned to this upload.
    pub generation: Generation,
    /// What the session did with the extraction outcome.
    pub outcome: Outcome,
}

impl UploadDocumentResult {
    /// Returns true if a fresh artifact is now under review.
    pub fn is_seeded(&self) -> bool {
        matches!(self.outcome, Outcome::Seeded { .. })
    }

    /// Failure notice for the user, if extraction failed.
    pub fn notice(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::ExtractionFailed { notice, .. } => Some(notice),
            _ => None,
        }
    }
}

/// Handler for document uploads.
///
/// # Dependencies
///
/// - `ExtractionService`: Turns the document into a bundle
///
/// # Upload Flow
///
/// 1. Validate the file and record it as the current document
/// 2. Start a new extraction generation
/// 3. Send the document to the extraction service
/// 4. Hand the outcome back to the session, tagged with its generation
///
/// Steps 1-2 and 4 need the session; step 3 does not. Callers that let
/// uploads overlap use [`start`] and [`extract`] directly and complete each
/// ticket themselves; results of superseded tickets come back as
/// `Outcome::Stale`.
///
/// [`start`]: UploadDocumentHandler::start
/// [`extract`]: UploadDocumentHandler::extract
pub struct UploadDocumentHandler {
    extraction_service: Arc<dyn ExtractionService>,
}

impl UploadDocumentHandler {
    pub fn new(extraction_service: Arc<dyn ExtractionService>) -> Self {
        Self { extraction_service }
    }

    /// Runs a full upload cycle against `session`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` if the file is empty or unnamed. The session is
    /// untouched in that case.
    pub async fn handle(
        &self,
        session: &mut ReviewSession,
        cmd: UploadDocumentCommand,
    ) -> Result<UploadDocumentResult, DomainError> {
        let ticket = self.start(session, cmd)?;
        let result = self.extract(&ticket).await;
        let outcome = session.complete_extraction(ticket.generation, result);

        Ok(UploadDocumentResult {
            document_id: ticket.document.id(),
            generation: ticket.generation,
            outcome,
        })
    }

    /// Records the document and opens a new extraction generation.
    pub fn start(
        &self,
        session: &mut ReviewSession,
        cmd: UploadDocumentCommand,
    ) -> Result<ExtractionTicket, DomainError> {
        let document = SourceDocument::new(cmd.file_name, cmd.bytes)?;

        tracing::info!(
            session_id = %session.id(),
            document_id = %document.id(),
            file_name = %document.file_name(),
            size_bytes = document.len(),
            checksum = %document.checksum(),
            "Document uploaded"
        );

        Ok(session.begin_upload(document))
    }

    /// Sends the ticket's document to the extraction service.
    ///
    /// Failure details are logged here; only the category travels on.
    pub async fn extract(&self, ticket: &ExtractionTicket) -> Result<ExtractionResult, FailureCategory> {
        match self.extraction_service.extract(&ticket.document).await {
            Ok(result) => {
                tracing::info!(
                    document_id = %ticket.document.id(),
                    generation = %ticket.generation,
                    message = result.message.as_deref().unwrap_or_default(),
                    "Extraction succeeded"
                );
                Ok(result)
            }
            Err(err) => {
                tracing::error!(
                    document_id = %ticket.document.id(),
                    generation = %ticket.generation,
                    code = %err.code(),
                    category = %err.category(),
                    "Extraction failed: {}",
                    err
                );
                Err(err.category())
            }
        }
    }
}
