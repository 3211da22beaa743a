//! SourceDocument - the uploaded policy document.

use sha2::{Digest, Sha256};
use std::sync::Arc;

use crate::domain::foundation::{DocumentId, DomainError, ErrorCode, Timestamp};

/// Content type used when a document is sent for extraction.
pub const SOURCE_CONTENT_TYPE: &str = "application/pdf";

/// An uploaded document, immutable once created.
///
/// # Invariants
///
/// - `bytes` is non-empty
/// - `file_name` is non-blank
/// - `checksum` is the SHA-256 of `bytes`, hex encoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    id: DocumentId,
    file_name: String,
    bytes: Arc<[u8]>,
    checksum: String,
    uploaded_at: Timestamp,
}

impl SourceDocument {
    /// Creates a document from uploaded bytes.
    ///
    /// # Errors
    ///
    /// - `EmptyDocument` if `bytes` is empty
    /// - `ValidationFailed` if `file_name` is blank
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Result<Self, DomainError> {
        let file_name = file_name.into();
        let bytes = bytes.into();

        if file_name.trim().is_empty() {
            return Err(DomainError::validation("file_name", "File name cannot be empty"));
        }
        if bytes.is_empty() {
            return Err(DomainError::new(
                ErrorCode::EmptyDocument,
                format!("Document '{}' has no content", file_name),
            ));
        }

        let checksum = hex::encode(Sha256::digest(&bytes));

        Ok(Self {
            id: DocumentId::new(),
            file_name,
            bytes: bytes.into(),
            checksum,
            uploaded_at: Timestamp::now(),
        })
    }

    pub fn id(&self) -> DocumentId {
        self.id
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the size of the document in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Hex-encoded SHA-256 of the document content.
    pub fn checksum(&self) -> &str {
        &self.checksum
    }

    pub fn uploaded_at(&self) -> &Timestamp {
        &self.uploaded_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_document_keeps_bytes_and_name() {
        let doc = SourceDocument::new("policy.pdf", b"%PDF-1.7".to_vec()).unwrap();
        assert_eq!(doc.file_name(), "policy.pdf");
        assert_eq!(doc.bytes(), b"%PDF-1.7");
        assert_eq!(doc.len(), 8);
        assert!(!doc.is_empty());
    }

    #[test]
    fn empty_document_is_rejected() {
        let err = SourceDocument::new("policy.pdf", Vec::new()).unwrap_err();
        assert_eq!(err.code, ErrorCode::EmptyDocument);
    }

    #[test]
    fn blank_file_name_is_rejected() {
        let err = SourceDocument::new("   ", b"data".to_vec()).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn checksum_is_sha256_hex() {
        let doc = SourceDocument::new("a.pdf", b"abc".to_vec()).unwrap();
        assert_eq!(
            doc.checksum(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn each_upload_gets_a_fresh_id() {
        let a = SourceDocument::new("a.pdf", b"same".to_vec()).unwrap();
        let b = SourceDocument::new("a.pdf", b"same".to_vec()).unwrap();
        assert_ne!(a.id(), b.id());
        assert_eq!(a.checksum(), b.checksum());
    }
}
