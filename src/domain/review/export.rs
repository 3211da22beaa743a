//! Export Function - turns an approved artifact into a downloadable file.

use serde::Serialize;

use super::EditableArtifact;

/// File name of every exported bundle.
pub const EXPORT_FILE_NAME: &str = "NHCX_InsurancePlan_Bundle.json";

/// MIME type of every exported bundle.
pub const EXPORT_CONTENT_TYPE: &str = "application/json";

/// Notice shown when export is attempted on invalid text.
pub const FIX_BEFORE_EXPORT_NOTICE: &str =
    "Please fix the JSON formatting errors before downloading.";

/// A file ready to be saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportedArtifact {
    /// Exact bytes of the approved text.
    pub content: Vec<u8>,
    pub content_type: String,
    pub filename: String,
}

impl ExportedArtifact {
    fn from_text(text: &str) -> Self {
        Self {
            content: text.as_bytes().to_vec(),
            content_type: EXPORT_CONTENT_TYPE.to_string(),
            filename: EXPORT_FILE_NAME.to_string(),
        }
    }
}

/// Export refused because the artifact text is not well-formed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{notice}")]
pub struct ExportRejected {
    pub notice: String,
}

impl Default for ExportRejected {
    fn default() -> Self {
        Self {
            notice: FIX_BEFORE_EXPORT_NOTICE.to_string(),
        }
    }
}

/// Exports the artifact text byte-for-byte.
///
/// # Errors
///
/// Returns `ExportRejected` when the artifact is invalid. Nothing is
/// produced and the artifact is untouched.
pub fn export(artifact: &EditableArtifact) -> Result<ExportedArtifact, ExportRejected> {
    if !artifact.is_valid() {
        return Err(ExportRejected::default());
    }
    Ok(ExportedArtifact::from_text(artifact.text()))
}
