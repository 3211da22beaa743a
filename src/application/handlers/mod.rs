//! Command and query handlers.

pub mod review;

pub use review::{
    CheckServiceHealthHandler, EditArtifactCommand, EditArtifactHandler, EditArtifactResult,
    ExportArtifactError, ExportArtifactHandler, ServiceHealth, UploadDocumentCommand,
    UploadDocumentHandler, UploadDocumentResult,
};
