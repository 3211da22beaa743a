//! Mock Extraction Service for testing.
//!
//! Provides a configurable mock implementation of the ExtractionService
//! port, allowing tests to run without a live extractor.
//!
//! # Features
//!
//! - Pre-configured results and errors, consumed in order
//! - Simulated latency for racing uploads
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let service = MockExtractionService::new()
//!     .with_bundle(json!({"resourceType": "Bundle"}))
//!     .with_error(ExtractionError::network("connection refused"));
//!
//! let first = service.extract(&document).await?;
//! assert!(service.extract(&document).await.is_err());
//! ```

use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::document::SourceDocument;
use crate::domain::review::ExtractionResult;
use crate::ports::{ExtractionError, ExtractionService};

/// A configured mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    Success(ExtractionResult),
    Error(ExtractionError),
}

/// Mock extraction service.
#[derive(Debug, Clone)]
pub struct MockExtractionService {
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    delay: Duration,
    available: Arc<AtomicBool>,
    /// File names of every document sent, in call order.
    calls: Arc<Mutex<Vec<String>>>,
}

impl Default for MockExtractionService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockExtractionService {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            delay: Duration::ZERO,
            available: Arc::new(AtomicBool::new(true)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queues a successful extraction of `bundle`.
    pub fn with_bundle(self, bundle: Value) -> Self {
        self.with_result(ExtractionResult::new(bundle))
    }

    /// Queues a full extraction result.
    pub fn with_result(self, result: ExtractionResult) -> Self {
        self.push(MockResponse::Success(result));
        self
    }

    /// Queues an error.
    pub fn with_error(self, error: ExtractionError) -> Self {
        self.push(MockResponse::Error(error));
        self
    }

    /// Sets simulated latency per call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Sets what the health check reports.
    pub fn with_availability(self, available: bool) -> Self {
        self.available.store(available, Ordering::SeqCst);
        self
    }

    /// File names received so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or_default()
    }

    fn push(&self, response: MockResponse) {
        if let Ok(mut responses) = self.responses.lock() {
            responses.push_back(response);
        }
    }

    fn next_response(&self) -> Option<MockResponse> {
        self.responses.lock().ok().and_then(|mut r| r.pop_front())
    }
}

#[async_trait]
impl ExtractionService for MockExtractionService {
    async fn extract(&self, document: &SourceDocument) -> Result<ExtractionResult, ExtractionError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(document.file_name().to_string());
        }

        // Pop before sleeping so concurrent calls keep queue order
        let response = self.next_response();

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        match response {
            Some(MockResponse::Success(result)) => Ok(result),
            Some(MockResponse::Error(err)) => Err(err),
            None => Err(ExtractionError::network("No mock response configured")),
        }
    }

    async fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }
}
