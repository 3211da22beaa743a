//! Review-specific error types.

use thiserror::Error;

use crate::domain::foundation::{ErrorCode, ReviewStage};

use super::ExportRejected;

/// Errors raised when an event is not allowed in the current state.
///
/// None of these change the state they were raised against.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReviewError {
    /// The action is not available in this stage.
    #[error("Cannot {action} while {stage}")]
    InvalidStage {
        stage: ReviewStage,
        action: &'static str,
    },

    /// Export requested before any bundle was extracted.
    #[error("Nothing to export yet; upload a document first")]
    NoArtifact,

    /// Export requested while the text is malformed.
    #[error(transparent)]
    Rejected(#[from] ExportRejected),
}

impl ReviewError {
    pub fn invalid_stage(stage: ReviewStage, action: &'static str) -> Self {
        ReviewError::InvalidStage { stage, action }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            ReviewError::InvalidStage { .. } => ErrorCode::InvalidStateTransition,
            ReviewError::NoArtifact => ErrorCode::NoArtifact,
            ReviewError::Rejected(_) => ErrorCode::ArtifactInvalid,
        }
    }
}
