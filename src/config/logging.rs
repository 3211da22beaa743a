//! Logging configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Tracing subscriber settings
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    #[serde(default = "default_filter")]
    pub filter: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

impl LoggingConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.filter.trim().is_empty() {
            return Err(ValidationError::MissingRequired("LOGGING__FILTER"));
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            json: false,
        }
    }
}

fn default_filter() -> String {
    "bima_review=info".to_string()
}
