//! Document Store - holds the currently selected source document.
//!
//! The store owns at most one document at a time. Opening a document
//! produces a [`RenderHandle`]: a temporary on-disk copy addressed by a
//! `file://` URL that a viewer can display. The copy is deleted when the
//! document is replaced, cleared, or the store is dropped.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use tempfile::{Builder, NamedTempFile};

use crate::domain::foundation::{DomainError, ErrorCode};

use super::SourceDocument;

/// Renderable reference to the current document.
#[derive(Debug)]
pub struct RenderHandle {
    file: NamedTempFile,
    url: String,
}

impl RenderHandle {
    fn create(document: &SourceDocument) -> Result<Self, DomainError> {
        let suffix = Path::new(document.file_name())
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();

        let mut file = Builder::new()
            .prefix("bima-review-")
            .suffix(&suffix)
            .tempfile()
            .map_err(|e| storage_error("create render copy", e))?;
        file.write_all(document.bytes())
            .map_err(|e| storage_error("write render copy", e))?;
        file.flush()
            .map_err(|e| storage_error("flush render copy", e))?;

        let url = format!("file://{}", file.path().display());
        Ok(Self { file, url })
    }

    /// Local path of the render copy.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// `file://` URL of the render copy.
    pub fn url(&self) -> &str {
        &self.url
    }
}

fn storage_error(action: &str, err: std::io::Error) -> DomainError {
    DomainError::new(ErrorCode::StorageError, format!("Failed to {}: {}", action, err))
}

struct StoredDocument {
    document: Arc<SourceDocument>,
    handle: Option<RenderHandle>,
}

/// Single-slot holder for the active source document.
#[derive(Default)]
pub struct DocumentStore {
    current: Option<StoredDocument>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the current document, releasing the previous render handle.
    pub fn select(&mut self, document: SourceDocument) -> Arc<SourceDocument> {
        let document = Arc::new(document);
        self.current = Some(StoredDocument {
            document: Arc::clone(&document),
            handle: None,
        });
        document
    }

    /// Returns the current document, if any.
    pub fn current(&self) -> Option<&Arc<SourceDocument>> {
        self.current.as_ref().map(|stored| &stored.document)
    }

    /// Returns a render handle for the current document, creating it on first use.
    ///
    /// Returns `Ok(None)` when no document is selected.
    pub fn open(&mut self) -> Result<Option<&RenderHandle>, DomainError> {
        let Some(stored) = self.current.as_mut() else {
            return Ok(None);
        };
        if stored.handle.is_none() {
            stored.handle = Some(RenderHandle::create(&stored.document)?);
        }
        Ok(stored.handle.as_ref())
    }

    /// Drops the current document and its render handle.
    pub fn clear(&mut self) {
        self.current = None;
    }
}

impl std::fmt::Debug for DocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentStore")
            .field("current", &self.current().map(|d| d.id()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(name: &str, bytes: &[u8]) -> SourceDocument {
        SourceDocument::new(name, bytes.to_vec()).unwrap()
    }

    #[test]
    fn empty_store_has_nothing_to_open() {
        let mut store = DocumentStore::new();
        assert!(store.current().is_none());
        assert!(store.open().unwrap().is_none());
    }

    #[test]
    fn open_writes_render_copy() {
        let mut store = DocumentStore::new();
        store.select(document("policy.pdf", b"%PDF-1.7 body"));

        let handle = store.open().unwrap().unwrap();
        assert!(handle.url().starts_with("file://"));
        assert!(handle.path().to_string_lossy().ends_with(".pdf"));
        assert_eq!(std::fs::read(handle.path()).unwrap(), b"%PDF-1.7 body");
    }

    #[test]
    fn open_reuses_existing_handle() {
        let mut store = DocumentStore::new();
        store.select(document("policy.pdf", b"one"));

        let first = store.open().unwrap().unwrap().path().to_path_buf();
        let second = store.open().unwrap().unwrap().path().to_path_buf();
        assert_eq!(first, second);
    }

    #[test]
    fn selecting_new_document_releases_previous_handle() {
        let mut store = DocumentStore::new();
        store.select(document("d1.pdf", b"first"));
        let old_path = store.open().unwrap().unwrap().path().to_path_buf();
        assert!(old_path.exists());

        let d2 = store.select(document("d2.pdf", b"second"));
        assert!(!old_path.exists());
        assert_eq!(store.current().unwrap().id(), d2.id());
    }

    #[test]
    fn clear_releases_handle() {
        let mut store = DocumentStore::new();
        store.select(document("d1.pdf", b"first"));
        let path = store.open().unwrap().unwrap().path().to_path_buf();

        store.clear();
        assert!(store.current().is_none());
        assert!(!path.exists());
    }
}
