//! Artifact Sink Port - where exported bundles are saved.
//!
//! The domain produces an [`ExportedArtifact`]; a sink persists it on the
//! user's side (a downloads directory, or memory in tests). Sinks never
//! alter the content.

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

use crate::domain::foundation::ErrorCode;
use crate::domain::review::ExportedArtifact;

/// Port for saving exported artifacts.
#[async_trait]
pub trait ArtifactSink: Send + Sync {
    /// Saves `artifact` and reports where it went.
    async fn save(&self, artifact: &ExportedArtifact) -> Result<SavedArtifact, SinkError>;
}

/// Location of a saved artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedArtifact {
    /// Where the file was written.
    pub location: PathBuf,
    /// Number of bytes written.
    pub size_bytes: u64,
}

/// Errors that can occur while saving.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SinkError {
    /// The target directory could not be prepared.
    #[error("Cannot prepare download location {path}: {reason}")]
    Unavailable { path: String, reason: String },

    /// Writing the file failed.
    #[error("I/O error while saving artifact: {0}")]
    Io(String),
}

impl SinkError {
    pub fn unavailable(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Unavailable {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn io(reason: impl Into<String>) -> Self {
        Self::Io(reason.into())
    }

    pub fn code(&self) -> ErrorCode {
        ErrorCode::StorageError
    }
}
