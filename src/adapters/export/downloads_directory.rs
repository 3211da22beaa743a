//! Downloads directory sink.
//!
//! Saves exported bundles into a local directory, the way a browser saves a
//! download. Writes go to a hidden temp file first and are renamed into
//! place once synced, so a reader never sees a partial bundle.
//!
//! Unless `overwrite` is set, an existing file is kept and the new one gets
//! a numbered name: `NHCX_InsurancePlan_Bundle (1).json`,
//! `NHCX_InsurancePlan_Bundle (2).json`, ...

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::config::ExportConfig;
use crate::domain::review::ExportedArtifact;
use crate::ports::{ArtifactSink, SavedArtifact, SinkError};

/// Highest numbered suffix tried before giving up.
const MAX_SUFFIX: u32 = 9_999;

/// Sink writing into a downloads directory.
#[derive(Debug, Clone)]
pub struct DownloadsDirectorySink {
    dir: PathBuf,
    overwrite: bool,
}

impl DownloadsDirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            overwrite: false,
        }
    }

    /// Replace existing files instead of numbering new ones.
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn ensure_dir(&self) -> Result<(), SinkError> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| SinkError::unavailable(self.dir.display().to_string(), e.to_string()))
    }

    /// Picks the final path for `file_name`.
    async fn target_path(&self, file_name: &str) -> Result<PathBuf, SinkError> {
        let first = self.dir.join(file_name);
        if self.overwrite || !exists(&first).await {
            return Ok(first);
        }

        let (stem, extension) = split_file_name(file_name);
        for n in 1..=MAX_SUFFIX {
            let candidate = self.dir.join(format!("{} ({}){}", stem, n, extension));
            if !exists(&candidate).await {
                return Ok(candidate);
            }
        }

        Err(SinkError::io(format!(
            "No free file name for {} in {}",
            file_name,
            self.dir.display()
        )))
    }
}

impl From<&ExportConfig> for DownloadsDirectorySink {
    fn from(config: &ExportConfig) -> Self {
        Self::new(config.downloads_dir.clone()).with_overwrite(config.overwrite)
    }
}

#[async_trait]
impl ArtifactSink for DownloadsDirectorySink {
    async fn save(&self, artifact: &ExportedArtifact) -> Result<SavedArtifact, SinkError> {
        let file_name = Path::new(&artifact.filename)
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| SinkError::io(format!("Invalid file name: {:?}", artifact.filename)))?;

        self.ensure_dir().await?;

        let temp_path = self.dir.join(format!(".{}.{}.tmp", file_name, Uuid::new_v4()));
        let final_path = self.target_path(file_name).await?;

        write_temp_file(&temp_path, &artifact.content).await?;

        if let Err(e) = fs::rename(&temp_path, &final_path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(SinkError::io(format!(
                "Failed to rename {} to {}: {}",
                temp_path.display(),
                final_path.display(),
                e
            )));
        }

        tracing::info!(
            location = %final_path.display(),
            size_bytes = artifact.content.len(),
            "Saved exported bundle"
        );

        Ok(SavedArtifact {
            location: final_path,
            size_bytes: artifact.content.len() as u64,
        })
    }
}

/// Writes and syncs `content` at `temp_path`. On failure the partial file
/// is removed before the error is returned.
async fn write_temp_file(temp_path: &Path, content: &[u8]) -> Result<(), SinkError> {
    let result = write_synced(temp_path, content).await;
    if result.is_err() {
        let _ = fs::remove_file(temp_path).await;
    }
    result
}

async fn write_synced(temp_path: &Path, content: &[u8]) -> Result<(), SinkError> {
    let mut file = fs::File::create(temp_path).await.map_err(|e| {
        SinkError::io(format!(
            "Failed to create temp file {}: {}",
            temp_path.display(),
            e
        ))
    })?;

    file.write_all(content).await.map_err(|e| {
        SinkError::io(format!(
            "Failed to write to temp file {}: {}",
            temp_path.display(),
            e
        ))
    })?;

    file.flush().await.map_err(|e| {
        SinkError::io(format!(
            "Failed to write to temp file {}: {}",
            temp_path.display(),
            e
        ))
    })?;

    file.sync_all().await.map_err(|e| {
        SinkError::io(format!(
            "Failed to sync temp file {}: {}",
            temp_path.display(),
            e
        ))
    })
}

async fn exists(path: &Path) -> bool {
    fs::metadata(path).await.is_ok()
}

/// Splits `name.ext` into (`name`, `.ext`); names without a dot keep an
/// empty extension.
fn split_file_name(file_name: &str) -> (&str, &str) {
    match file_name.rfind('.') {
        Some(0) | None => (file_name, ""),
        Some(idx) => file_name.split_at(idx),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::review::{export, EditableArtifact};
    use tempfile::TempDir;

    fn artifact(text: &str) -> ExportedArtifact {
        export(&EditableArtifact::from_text(text)).unwrap()
    }

    fn create_sink() -> (DownloadsDirectorySink, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let sink = DownloadsDirectorySink::new(temp_dir.path().join("downloads"));
        (sink, temp_dir)
    }

    #[tokio::test]
    async fn save_creates_directory_and_file() {
        let (sink, _temp) = create_sink();

        let saved = sink.save(&artifact("{\"a\": 1}")).await.unwrap();

        assert_eq!(
            saved.location,
            sink.dir().join("NHCX_InsurancePlan_Bundle.json")
        );
        assert_eq!(saved.size_bytes, 8);
        let written = std::fs::read(&saved.location).unwrap();
        assert_eq!(written, b"{\"a\": 1}");
    }

    #[tokio::test]
    async fn save_numbers_repeated_downloads() {
        let (sink, _temp) = create_sink();

        let first = sink.save(&artifact("{}")).await.unwrap();
        let second = sink.save(&artifact("[]")).await.unwrap();
        let third = sink.save(&artifact("1")).await.unwrap();

        assert!(first.location.ends_with("NHCX_InsurancePlan_Bundle.json"));
        assert!(second.location.ends_with("NHCX_InsurancePlan_Bundle (1).json"));
        assert!(third.location.ends_with("NHCX_InsurancePlan_Bundle (2).json"));
        assert_eq!(std::fs::read(&first.location).unwrap(), b"{}");
    }

    #[tokio::test]
    async fn save_overwrites_when_configured() {
        let (sink, _temp) = create_sink();
        let sink = sink.with_overwrite(true);

        sink.save(&artifact("{}")).await.unwrap();
        let saved = sink.save(&artifact("[]")).await.unwrap();

        assert!(saved.location.ends_with("NHCX_InsurancePlan_Bundle.json"));
        assert_eq!(std::fs::read(&saved.location).unwrap(), b"[]");
    }

    #[tokio::test]
    async fn save_leaves_no_temp_files() {
        let (sink, _temp) = create_sink();
        sink.save(&artifact("{}")).await.unwrap();

        let names: Vec<_> = std::fs::read_dir(sink.dir())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["NHCX_InsurancePlan_Bundle.json"]);
    }

    #[tokio::test]
    async fn save_fails_when_directory_is_a_file() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("downloads");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let sink = DownloadsDirectorySink::new(&blocker);
        let err = sink.save(&artifact("{}")).await.unwrap_err();
        assert!(matches!(err, SinkError::Unavailable { .. }));
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn failed_write_removes_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let temp_path = temp_dir.path().join(".NHCX_InsurancePlan_Bundle.json.tmp");
        std::os::unix::fs::symlink("/dev/full", &temp_path).unwrap();

        let err = write_temp_file(&temp_path, b"{}").await.unwrap_err();

        assert!(matches!(err, SinkError::Io(_)));
        assert!(std::fs::symlink_metadata(&temp_path).is_err());
        assert!(Path::new("/dev/full").exists());
    }

    #[test]
    fn split_file_name_handles_extensions() {
        assert_eq!(split_file_name("bundle.json"), ("bundle", ".json"));
        assert_eq!(split_file_name("a.b.json"), ("a.b", ".json"));
        assert_eq!(split_file_name("README"), ("README", ""));
        assert_eq!(split_file_name(".hidden"), (".hidden", ""));
    }

    #[test]
    fn sink_reads_export_config() {
        let config = ExportConfig {
            downloads_dir: PathBuf::from("/tmp/out"),
            overwrite: true,
        };
        let sink = DownloadsDirectorySink::from(&config);
        assert_eq!(sink.dir(), Path::new("/tmp/out"));
        assert!(sink.overwrite);
    }
}
