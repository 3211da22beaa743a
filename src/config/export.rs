//! Export configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Where exported bundles are saved
#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    /// Directory exported bundles are written to
    #[serde(default = "default_downloads_dir")]
    pub downloads_dir: PathBuf,

    /// Replace an existing export instead of choosing a numbered name
    #[serde(default)]
    pub overwrite: bool,
}

impl ExportConfig {
    /// Validate export configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.downloads_dir.as_os_str().is_empty() {
            return Err(ValidationError::MissingRequired("EXPORT__DOWNLOADS_DIR"));
        }
        Ok(())
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            downloads_dir: default_downloads_dir(),
            overwrite: false,
        }
    }
}

fn default_downloads_dir() -> PathBuf {
    PathBuf::from("downloads")
}
