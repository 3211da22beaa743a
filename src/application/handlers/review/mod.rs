//! Review workflow handlers.

mod check_service_health;
mod edit_artifact;
mod export_artifact;
mod upload_document;

pub use check_service_health::{CheckServiceHealthHandler, ServiceHealth};
pub use edit_artifact::{EditArtifactCommand, EditArtifactHandler, EditArtifactResult};
pub use export_artifact::{ExportArtifactError, ExportArtifactHandler};
pub use upload_document::{UploadDocumentCommand, UploadDocumentHandler, UploadDocumentResult};
