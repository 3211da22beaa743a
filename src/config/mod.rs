//! Typed settings read from `BIMA_REVIEW__*` environment variables.
//!
//! A `.env` file in the working directory is honoured. Sections map to
//! nested keys, so `BIMA_REVIEW__EXPORT__OVERWRITE=true` sets
//! `export.overwrite`.
//!
//! ```no_run
//! use bima_review::config::AppConfig;
//!
//! let config = AppConfig::load()?;
//! config.validate()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod export;
mod extraction;
mod logging;

pub use error::{ConfigError, ValidationError};
pub use export::ExportConfig;
pub use extraction::ExtractionConfig;
pub use logging::LoggingConfig;

use serde::Deserialize;

/// All settings. Every section has defaults, so an empty environment
/// targets a local extraction service at `http://127.0.0.1:8000`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub extraction: ExtractionConfig,

    #[serde(default)]
    pub export: ExportConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Reads `.env` (if any) and the process environment.
    ///
    /// Only type errors fail here; range checks live in [`validate`].
    ///
    /// [`validate`]: AppConfig::validate
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let settings = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("BIMA_REVIEW")
                    .separator("__"),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.extraction.validate()?;
        self.export.validate()?;
        self.logging.validate()
    }
}
