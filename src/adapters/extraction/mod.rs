//! Extraction service adapters.

mod http_extraction_service;
mod mock_extraction_service;

pub use http_extraction_service::{HttpExtractionConfig, HttpExtractionService};
pub use mock_extraction_service::{MockExtractionService, MockResponse};
