//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `ExtractionService` - The external document-to-bundle extractor
//! - `ArtifactSink` - Local destination for exported bundles

mod artifact_sink;
mod extraction_service;

pub use artifact_sink::{ArtifactSink, SavedArtifact, SinkError};
pub use extraction_service::{ExtractionError, ExtractionService};
