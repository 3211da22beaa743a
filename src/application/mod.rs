//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Handlers take the session by `&mut` and talk to the outside world through
//! port trait objects.

pub mod handlers;

pub use handlers::{
    CheckServiceHealthHandler, EditArtifactCommand, EditArtifactHandler, EditArtifactResult,
    ExportArtifactError, ExportArtifactHandler, ServiceHealth, UploadDocumentCommand,
    UploadDocumentHandler, UploadDocumentResult,
};
