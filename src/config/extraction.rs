//! Extraction service configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Extraction service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionConfig {
    /// Base URL of the extraction service
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Optional bearer token sent with every request
    pub api_key: Option<Secret<String>>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum retries on transient failures
    #[serde(default = "default_retries")]
    pub max_retries: u32,

    /// Delay before the first retry, doubled on each subsequent retry
    #[serde(default = "default_backoff")]
    pub retry_backoff_ms: u64,
}

impl ExtractionConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Get initial retry backoff as Duration
    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    /// Check if an API key is configured
    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().is_empty())
    }

    /// Validate extraction configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ValidationError::InvalidServiceUrl);
        }
        if self.timeout_secs == 0 || self.timeout_secs > 900 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.max_retries > 10 {
            return Err(ValidationError::TooManyRetries);
        }
        Ok(())
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
            retry_backoff_ms: default_backoff(),
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_timeout() -> u64 {
    120
}

fn default_retries() -> u32 {
    2
}

fn default_backoff() -> u64 {
    1000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraction_config_defaults() {
        let config = ExtractionConfig::default();
        assert_eq!(config.base_url, "http://127.0.0.1:8000");
        assert_eq!(config.timeout(), Duration::from_secs(120));
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.retry_backoff(), Duration::from_millis(1000));
        assert!(!config.has_api_key());
    }

    #[test]
    fn test_validation_default_is_valid() {
        assert!(ExtractionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_url_without_scheme() {
        let config = ExtractionConfig {
            base_url: "127.0.0.1:8000".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidServiceUrl)
        ));
    }

    #[test]
    fn test_validation_rejects_zero_timeout() {
        let config = ExtractionConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ValidationError::InvalidTimeout)));
    }

    #[test]
    fn test_validation_rejects_excessive_retries() {
        let config = ExtractionConfig {
            max_retries: 11,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ValidationError::TooManyRetries)));
    }

    #[test]
    fn test_empty_api_key_counts_as_missing() {
        let config = ExtractionConfig {
            api_key: Some(Secret::new(String::new())),
            ..Default::default()
        };
        assert!(!config.has_api_key());
    }
}
