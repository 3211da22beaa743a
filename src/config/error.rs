use thiserror::Error;

/// Reading the environment failed, or a value has the wrong type.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read configuration: {0}")]
    Load(#[from] config::ConfigError),
}

/// A loaded value is out of range.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{0} must be set")]
    MissingRequired(&'static str),

    #[error("extraction base URL must start with http:// or https://")]
    InvalidServiceUrl,

    #[error("extraction timeout must be between 1 and 900 seconds")]
    InvalidTimeout,

    #[error("at most 10 extraction retries are allowed")]
    TooManyRetries,
}
