//! HTTP Extraction Service - Implementation of ExtractionService over HTTP.
//!
//! Uploads the policy document as multipart form data to
//! `{base_url}/api/v1/extract` and reads the bundle from the `fhir_bundle`
//! field of the JSON reply.
//!
//! # Configuration
//!
//! ```ignore
//! let config = HttpExtractionConfig::new("http://127.0.0.1:8000")
//!     .with_timeout(Duration::from_secs(120))
//!     .with_max_retries(2);
//!
//! let service = HttpExtractionService::new(config)?;
//! ```
//!
//! # Retries
//!
//! Transport failures and 5xx replies are retried with exponential backoff
//! starting at `retry_backoff`. 4xx replies and malformed bodies fail
//! immediately.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tokio::time::sleep;

use crate::config::ExtractionConfig;
use crate::domain::document::{SourceDocument, SOURCE_CONTENT_TYPE};
use crate::domain::review::ExtractionResult;
use crate::ports::{ExtractionError, ExtractionService};

const EXTRACT_PATH: &str = "/api/v1/extract";

/// Configuration for the HTTP extraction client.
#[derive(Debug, Clone)]
pub struct HttpExtractionConfig {
    /// Base URL of the service, without a trailing slash.
    pub base_url: String,
    /// Bearer token, if the service requires one.
    api_key: Option<Secret<String>>,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Maximum retries on transient failures.
    pub max_retries: u32,
    /// Delay before the first retry.
    pub retry_backoff: Duration,
}

impl HttpExtractionConfig {
    /// Creates a configuration for the service at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: None,
            timeout: Duration::from_secs(120),
            max_retries: 2,
            retry_backoff: Duration::from_secs(1),
        }
    }

    /// Sets the bearer token.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(Secret::new(api_key.into()));
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the maximum retry count.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the delay before the first retry.
    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_ref()
            .map(|key| key.expose_secret().as_str())
            .filter(|key| !key.is_empty())
    }

    fn extract_url(&self) -> String {
        format!("{}{}", self.base_url, EXTRACT_PATH)
    }

    fn health_url(&self) -> String {
        format!("{}/", self.base_url)
    }

    /// Delay before retry number `attempt` (zero-based).
    fn backoff_for(&self, attempt: u32) -> Duration {
        self.retry_backoff.saturating_mul(1u32 << attempt.min(16))
    }
}

impl From<&ExtractionConfig> for HttpExtractionConfig {
    fn from(config: &ExtractionConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            timeout: config.timeout(),
            max_retries: config.max_retries,
            retry_backoff: config.retry_backoff(),
        }
    }
}

/// Extraction service reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpExtractionService {
    client: Client,
    config: HttpExtractionConfig,
}

impl HttpExtractionService {
    /// Creates a client for the configured service.
    ///
    /// # Errors
    ///
    /// Returns `Network` if the underlying HTTP client cannot be built.
    pub fn new(config: HttpExtractionConfig) -> Result<Self, ExtractionError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ExtractionError::network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &HttpExtractionConfig {
        &self.config
    }

    fn map_transport_error(&self, e: reqwest::Error) -> ExtractionError {
        if e.is_timeout() {
            ExtractionError::Timeout {
                timeout_secs: self.config.timeout.as_secs(),
            }
        } else if e.is_connect() {
            ExtractionError::network(format!("Connection failed: {}", e))
        } else {
            ExtractionError::network(e.to_string())
        }
    }

    /// Sends one upload request.
    async fn send_request(&self, document: &SourceDocument) -> Result<Response, ExtractionError> {
        let part = Part::bytes(document.bytes().to_vec())
            .file_name(document.file_name().to_string())
            .mime_str(SOURCE_CONTENT_TYPE)
            .map_err(|e| ExtractionError::network(format!("Invalid content type: {}", e)))?;
        let form = Form::new().part("file", part);

        let mut request = self.client.post(self.config.extract_url()).multipart(form);
        if let Some(key) = self.config.api_key() {
            request = request.bearer_auth(key);
        }

        request
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))
    }

    /// Turns a non-success status into an error carrying the service's detail.
    async fn handle_response_status(&self, response: Response) -> Result<Response, ExtractionError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();
        Err(ExtractionError::from_status(
            status.as_u16(),
            error_detail(&error_body),
        ))
    }

    async fn parse_response(&self, response: Response) -> Result<ExtractionResult, ExtractionError> {
        let body = response
            .bytes()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        decode_envelope(&body)
    }

    async fn attempt(&self, document: &SourceDocument) -> Result<ExtractionResult, ExtractionError> {
        let response = self.send_request(document).await?;
        let response = self.handle_response_status(response).await?;
        self.parse_response(response).await
    }
}

#[async_trait]
impl ExtractionService for HttpExtractionService {
    async fn extract(&self, document: &SourceDocument) -> Result<ExtractionResult, ExtractionError> {
        let mut retry_count = 0;

        loop {
            tracing::debug!(
                document_id = %document.id(),
                file_name = %document.file_name(),
                attempt = retry_count + 1,
                "Sending document to extraction service"
            );

            match self.attempt(document).await {
                Ok(result) => return Ok(result),
                Err(err) => {
                    if !err.is_retryable() || retry_count >= self.config.max_retries {
                        return Err(err);
                    }

                    let delay = self.config.backoff_for(retry_count);
                    tracing::warn!(
                        document_id = %document.id(),
                        error = %err,
                        retry_in_ms = delay.as_millis() as u64,
                        "Extraction attempt failed, retrying"
                    );
                    sleep(delay).await;
                    retry_count += 1;
                }
            }
        }
    }

    async fn is_available(&self) -> bool {
        match self.client.get(self.config.health_url()).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!(error = %e, "Extraction service health check failed");
                false
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Wire types
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
struct ExtractEnvelope {
    message: Option<String>,
    filename: Option<String>,
    #[serde(default)]
    fhir_bundle: Value,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Value,
}

fn decode_envelope(body: &[u8]) -> Result<ExtractionResult, ExtractionError> {
    let envelope: ExtractEnvelope = serde_json::from_slice(body)
        .map_err(|e| ExtractionError::decode(format!("Response is not an extraction envelope: {}", e)))?;

    if envelope.fhir_bundle.is_null() {
        return Err(ExtractionError::decode("Response has no fhir_bundle"));
    }

    let mut result = ExtractionResult::new(envelope.fhir_bundle);
    result.message = envelope.message;
    result.filename = envelope.filename;
    Ok(result)
}

/// Pulls `detail` out of an error body, falling back to the raw text.
fn error_detail(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            detail: Value::String(detail),
        }) => detail,
        Ok(ErrorBody { detail }) => detail.to_string(),
        Err(_) => body.to_string(),
    }
}
