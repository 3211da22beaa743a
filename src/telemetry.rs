//! Logging setup using `tracing` and `tracing-subscriber`.
//!
//! Logs go to stderr so stdout stays free for the review console. `RUST_LOG`
//! overrides the configured filter when set.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Installs the global subscriber.
///
/// # Errors
///
/// Fails if the configured filter does not parse or a global subscriber
/// is already installed.
pub fn init(config: &LoggingConfig) -> Result<(), TelemetryError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.filter)
            .map_err(|e| TelemetryError::InvalidFilter(e.to_string()))?,
    };

    let json_layer = config
        .json
        .then(|| fmt::layer().json().with_writer(std::io::stderr));
    let text_layer = (!config.json).then(|| fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .try_init()
        .map_err(|e| TelemetryError::AlreadyInitialized(e.to_string()))
}

/// Errors installing the subscriber.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("invalid log filter: {0}")]
    InvalidFilter(String),

    #[error("logging already initialized: {0}")]
    AlreadyInitialized(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_fails() {
        let config = LoggingConfig::default();
        let _ = init(&config);
        assert!(matches!(
            init(&config),
            Err(TelemetryError::AlreadyInitialized(_))
        ));
    }
}
