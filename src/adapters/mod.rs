//! Adapters - Implementations of port interfaces.
//!
//! - `extraction` - HTTP client for the extraction service, plus a mock
//! - `export` - Downloads directory and in-memory artifact sinks

pub mod export;
pub mod extraction;

pub use export::{DownloadsDirectorySink, InMemoryArtifactSink};
pub use extraction::{HttpExtractionConfig, HttpExtractionService, MockExtractionService, MockResponse};
