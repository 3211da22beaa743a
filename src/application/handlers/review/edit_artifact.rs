//! EditArtifactHandler - Command handler for user edits to the bundle text.

use crate::domain::review::{ParseIssue, ReviewError, ReviewSession};

/// Command carrying the full replacement text.
#[derive(Debug, Clone)]
pub struct EditArtifactCommand {
    pub text: String,
}

impl EditArtifactCommand {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Result of an edit.
#[derive(Debug, Clone, PartialEq)]
pub struct EditArtifactResult {
    /// Recomputed validity flag.
    pub valid: bool,
    /// Where parsing stopped, when invalid.
    pub issue: Option<ParseIssue>,
}

/// Handler for artifact edits.
///
/// Edits are accepted whether or not the text parses; validity only gates
/// export.
#[derive(Debug, Default)]
pub struct EditArtifactHandler;

impl EditArtifactHandler {
    pub fn new() -> Self {
        Self
    }

    /// Replaces the artifact text.
    ///
    /// # Errors
    ///
    /// - `InvalidStage` if no artifact is under review
    pub fn handle(
        &self,
        session: &mut ReviewSession,
        cmd: EditArtifactCommand,
    ) -> Result<EditArtifactResult, ReviewError> {
        let valid = session.edit(cmd.text)?;
        let issue = session.artifact().and_then(|a| a.issue()).cloned();

        if let Some(issue) = &issue {
            tracing::debug!(
                session_id = %session.id(),
                line = issue.line,
                column = issue.column,
                "Artifact text is not well-formed"
            );
        }

        Ok(EditArtifactResult { valid, issue })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::document::SourceDocument;
    use crate::domain::foundation::ReviewStage;
    use crate::domain::review::ExtractionResult;
    use serde_json::json;

    fn reviewing_session() -> ReviewSession {
        let mut session = ReviewSession::new();
        let ticket = session.begin_upload(SourceDocument::new("p.pdf", b"%PDF".to_vec()).unwrap());
        session.complete_extraction(ticket.generation, Ok(ExtractionResult::new(json!({"a": 1}))));
        session
    }

    #[test]
    fn valid_edit_reports_no_issue() {
        let mut session = reviewing_session();
        let result = EditArtifactHandler::new()
            .handle(&mut session, EditArtifactCommand::new("{\"a\": 2}"))
            .unwrap();

        assert!(result.valid);
        assert_eq!(result.issue, None);
    }

    #[test]
    fn invalid_edit_is_kept_and_located() {
        let mut session = reviewing_session();
        let result = EditArtifactHandler::new()
            .handle(&mut session, EditArtifactCommand::new("{\n  \"a\": 1,\n}"))
            .unwrap();

        assert!(!result.valid);
        let issue = result.issue.unwrap();
        assert_eq!(issue.line, 3);
        assert_eq!(session.artifact().unwrap().text(), "{\n  \"a\": 1,\n}");
        assert_eq!(session.stage(), ReviewStage::Reviewing);
    }

    #[test]
    fn edit_without_artifact_is_rejected() {
        let mut session = ReviewSession::new();
        let err = EditArtifactHandler::new()
            .handle(&mut session, EditArtifactCommand::new("{}"))
            .unwrap_err();
        assert!(matches!(err, ReviewError::InvalidStage { .. }));
    }
}
