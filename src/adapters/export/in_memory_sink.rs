//! In-memory artifact sink for tests.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::domain::review::ExportedArtifact;
use crate::ports::{ArtifactSink, SavedArtifact, SinkError};

/// Keeps every saved artifact in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryArtifactSink {
    saved: Arc<Mutex<Vec<ExportedArtifact>>>,
}

impl InMemoryArtifactSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Artifacts saved so far, oldest first.
    pub fn saved(&self) -> Vec<ExportedArtifact> {
        self.saved.lock().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn last(&self) -> Option<ExportedArtifact> {
        self.saved.lock().ok().and_then(|s| s.last().cloned())
    }
}

#[async_trait]
impl ArtifactSink for InMemoryArtifactSink {
    async fn save(&self, artifact: &ExportedArtifact) -> Result<SavedArtifact, SinkError> {
        let mut saved = self
            .saved
            .lock()
            .map_err(|e| SinkError::io(format!("Lock poisoned: {}", e)))?;
        saved.push(artifact.clone());

        Ok(SavedArtifact {
            location: PathBuf::from(&artifact.filename),
            size_bytes: artifact.content.len() as u64,
        })
    }
}
