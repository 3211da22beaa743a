//! ReviewSession aggregate.
//!
//! Owns the document store, the workflow state, and the generation counter.
//! All mutation goes through `&mut self`, so a session has exactly one
//! writer at a time.

use std::sync::Arc;

use crate::domain::document::{DocumentStore, RenderHandle, SourceDocument};
use crate::domain::foundation::{
    DomainError, Generation, ReviewSessionId, ReviewStage, StateMachine, Timestamp,
};

use super::{
    EditableArtifact, ExportedArtifact, ExtractionResult, FailureCategory, Outcome, ReviewError,
    ReviewEvent, ReviewState,
};

/// Token for one started extraction.
///
/// The application layer sends `document` to the extraction service and
/// hands the outcome back together with `generation`.
#[derive(Debug, Clone)]
pub struct ExtractionTicket {
    pub generation: Generation,
    pub document: Arc<SourceDocument>,
}

/// One user's review workspace.
#[derive(Debug)]
pub struct ReviewSession {
    id: ReviewSessionId,
    documents: DocumentStore,
    state: ReviewState,
    generation: Generation,
    created_at: Timestamp,
}

impl Default for ReviewSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ReviewSession {
    pub fn new() -> Self {
        Self {
            id: ReviewSessionId::new(),
            documents: DocumentStore::new(),
            state: ReviewState::default(),
            generation: Generation::ZERO,
            created_at: Timestamp::now(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> ReviewSessionId {
        self.id
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn state(&self) -> &ReviewState {
        &self.state
    }

    pub fn stage(&self) -> ReviewStage {
        self.state.stage()
    }

    /// Artifact under review, if any.
    pub fn artifact(&self) -> Option<&EditableArtifact> {
        self.state.artifact()
    }

    /// Failure notice from the last extraction, if any.
    pub fn notice(&self) -> Option<&str> {
        self.state.notice()
    }

    /// Document currently selected for display, if any.
    pub fn current_document(&self) -> Option<&Arc<SourceDocument>> {
        self.documents.current()
    }

    /// Opens the current document for display.
    pub fn open_document(&mut self) -> Result<Option<&RenderHandle>, DomainError> {
        self.documents.open()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Workflow
    // ─────────────────────────────────────────────────────────────────────────

    /// Records an uploaded document and starts a new extraction cycle.
    ///
    /// Any artifact under review and any extraction still in flight are
    /// superseded.
    pub fn begin_upload(&mut self, document: SourceDocument) -> ExtractionTicket {
        self.generation = self.generation.next();
        let document = self.documents.select(document);

        let outcome = self.dispatch(ReviewEvent::Upload {
            document_id: document.id(),
            generation: self.generation,
        });
        if let Outcome::ExtractionStarted {
            discarded_artifact: true,
            ..
        } = outcome
        {
            tracing::debug!(session_id = %self.id, "Discarded artifact under review");
        }

        ExtractionTicket {
            generation: self.generation,
            document,
        }
    }

    /// Applies the outcome of an extraction started by [`begin_upload`].
    ///
    /// [`begin_upload`]: ReviewSession::begin_upload
    pub fn complete_extraction(
        &mut self,
        generation: Generation,
        result: Result<ExtractionResult, FailureCategory>,
    ) -> Outcome {
        let event = match result {
            Ok(result) => ReviewEvent::ExtractionSucceeded { generation, result },
            Err(category) => ReviewEvent::ExtractionFailed {
                generation,
                category,
            },
        };
        self.dispatch(event)
    }

    /// Replaces the artifact text and returns the recomputed validity flag.
    ///
    /// # Errors
    ///
    /// - `InvalidStage` if no artifact is under review
    pub fn edit(&mut self, text: impl Into<String>) -> Result<bool, ReviewError> {
        match self.dispatch(ReviewEvent::Edit { text: text.into() }) {
            Outcome::Edited { valid } => Ok(valid),
            Outcome::Rejected(err) => Err(err),
            other => unreachable!("edit produced {:?}", other),
        }
    }

    /// Approves the current artifact for export.
    ///
    /// # Errors
    ///
    /// - `NoArtifact` if no artifact is under review
    /// - `Rejected` if the artifact text is not well-formed
    pub fn export(&mut self) -> Result<ExportedArtifact, ReviewError> {
        match self.dispatch(ReviewEvent::Export) {
            Outcome::ExportReady(exported) => Ok(exported),
            Outcome::Rejected(err) => Err(err),
            other => unreachable!("export produced {:?}", other),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Private helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn dispatch(&mut self, event: ReviewEvent) -> Outcome {
        let from = self.stage();
        let state = std::mem::take(&mut self.state);
        let transition = state.apply(event);
        self.state = transition.state;

        let to = self.stage();
        match &transition.outcome {
            Outcome::Rejected(err) => {
                tracing::debug!(session_id = %self.id, stage = %from, "Event rejected: {}", err);
            }
            Outcome::Stale { generation } => {
                tracing::debug!(
                    session_id = %self.id,
                    %generation,
                    current = %self.generation,
                    "Discarded stale extraction outcome"
                );
            }
            Outcome::Duplicate { generation } => {
                tracing::warn!(
                    session_id = %self.id,
                    %generation,
                    stage = %from,
                    "Ignored repeated outcome for completed extraction"
                );
            }
            _ => {
                debug_assert!(
                    from.can_transition_to(&to),
                    "illegal stage change {:?} -> {:?}",
                    from,
                    to
                );
                if from != to {
                    tracing::info!(session_id = %self.id, %from, %to, "Review stage changed");
                }
            }
        }

        transition.outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document(name: &str) -> SourceDocument {
        SourceDocument::new(name, b"%PDF-1.7".to_vec()).unwrap()
    }

    fn seeded_session(bundle: serde_json::Value) -> ReviewSession {
        let mut session = ReviewSession::new();
        let ticket = session.begin_upload(document("d1.pdf"));
        session.complete_extraction(ticket.generation, Ok(ExtractionResult::new(bundle)));
        session
    }

    #[test]
    fn new_session_is_idle() {
        let session = ReviewSession::new();
        assert_eq!(session.stage(), ReviewStage::Idle);
        assert!(session.artifact().is_none());
        assert!(session.current_document().is_none());
        assert!(session.notice().is_none());
    }

    #[test]
    fn begin_upload_records_document_and_issues_ticket() {
        let mut session = ReviewSession::new();
        let ticket = session.begin_upload(document("d1.pdf"));

        assert_eq!(session.stage(), ReviewStage::Extracting);
        assert_eq!(ticket.generation, Generation::ZERO.next());
        assert_eq!(session.current_document().unwrap().id(), ticket.document.id());
    }

    #[test]
    fn each_upload_gets_a_new_generation() {
        let mut session = ReviewSession::new();
        let first = session.begin_upload(document("d1.pdf"));
        let second = session.begin_upload(document("d2.pdf"));
        assert!(second.generation > first.generation);
    }

    #[test]
    fn failed_extraction_keeps_document_visible() {
        let mut session = ReviewSession::new();
        let ticket = session.begin_upload(document("d1.pdf"));

        let outcome = session.complete_extraction(ticket.generation, Err(FailureCategory::Transport));

        assert!(matches!(outcome, Outcome::ExtractionFailed { .. }));
        assert_eq!(session.stage(), ReviewStage::Idle);
        assert!(session.artifact().is_none());
        assert!(session.notice().is_some());
        assert_eq!(session.current_document().unwrap().id(), ticket.document.id());
        assert!(session.open_document().unwrap().is_some());
    }

    #[test]
    fn edit_then_export_round_trips_text() {
        let mut session = seeded_session(json!({"a": 1}));

        assert_eq!(session.edit("{\"a\":1"), Ok(false));
        assert!(matches!(session.export(), Err(ReviewError::Rejected(_))));
        assert_eq!(session.artifact().unwrap().text(), "{\"a\":1");

        assert_eq!(session.edit("{\"a\":1}"), Ok(true));
        let exported = session.export().unwrap();
        assert_eq!(exported.content, b"{\"a\":1}");
    }

    #[test]
    fn edit_while_idle_is_rejected() {
        let mut session = ReviewSession::new();
        let err = session.edit("{}").unwrap_err();
        assert_eq!(err, ReviewError::invalid_stage(ReviewStage::Idle, "edit"));
        assert_eq!(session.stage(), ReviewStage::Idle);
    }

    #[test]
    fn export_while_extracting_has_no_artifact() {
        let mut session = ReviewSession::new();
        session.begin_upload(document("d1.pdf"));
        assert_eq!(session.export(), Err(ReviewError::NoArtifact));
        assert_eq!(session.stage(), ReviewStage::Extracting);
    }

    #[test]
    fn result_for_superseded_upload_is_ignored() {
        let mut session = ReviewSession::new();
        let first = session.begin_upload(document("d1.pdf"));
        let second = session.begin_upload(document("d2.pdf"));

        let outcome = session.complete_extraction(
            first.generation,
            Ok(ExtractionResult::new(json!({"from": "d1"}))),
        );
        assert_eq!(outcome, Outcome::Stale { generation: first.generation });
        assert_eq!(session.stage(), ReviewStage::Extracting);

        session.complete_extraction(
            second.generation,
            Ok(ExtractionResult::new(json!({"from": "d2"}))),
        );
        assert_eq!(session.artifact().unwrap().parsed(), Some(&json!({"from": "d2"})));
    }

    #[test]
    fn repeated_result_for_current_upload_is_duplicate() {
        let mut session = ReviewSession::new();
        let ticket = session.begin_upload(document("d1.pdf"));
        session.complete_extraction(
            ticket.generation,
            Ok(ExtractionResult::new(json!({"a": 1}))),
        );

        let outcome = session.complete_extraction(ticket.generation, Err(FailureCategory::Service));

        assert_eq!(outcome, Outcome::Duplicate { generation: ticket.generation });
        assert_eq!(session.stage(), ReviewStage::Reviewing);
        assert_eq!(session.artifact().unwrap().parsed(), Some(&json!({"a": 1})));
    }
}
