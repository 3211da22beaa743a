use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use bima_review::adapters::{DownloadsDirectorySink, HttpExtractionConfig, HttpExtractionService};
use bima_review::application::{
    CheckServiceHealthHandler, EditArtifactCommand, EditArtifactHandler, ExportArtifactHandler,
    UploadDocumentCommand, UploadDocumentHandler,
};
use bima_review::config::AppConfig;
use bima_review::domain::review::{check, ReviewSession, TextCheck};
use bima_review::ports::{ArtifactSink, ExtractionError, ExtractionService};
use bima_review::telemetry;

#[derive(Parser)]
#[command(
    name = "bima-review",
    about = "Extract, review and export NHCX insurance plan bundles",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a policy document and review the extracted bundle
    Review {
        /// Policy document (PDF)
        document: PathBuf,

        /// File the bundle text is written to for editing
        #[arg(short, long, default_value = "bundle.edit.json")]
        work_file: PathBuf,
    },

    /// Check whether a file is well-formed JSON
    Check {
        /// File to check
        file: PathBuf,
    },

    /// Probe the extraction service
    Health,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = telemetry::init(&config.logging) {
        eprintln!("Failed to initialize logging: {}", e);
        return ExitCode::FAILURE;
    }

    if let Err(e) = config.validate() {
        tracing::error!("Invalid configuration: {}", e);
        return ExitCode::FAILURE;
    }

    match cli.command {
        Commands::Check { file } => check_file(&file).await,
        Commands::Health => health(&config).await,
        Commands::Review {
            document,
            work_file,
        } => match Console::from_config(&config, work_file) {
            Ok(console) => console.run(&document).await,
            Err(e) => {
                tracing::error!("Failed to start extraction client: {}", e);
                ExitCode::FAILURE
            }
        },
    }
}

async fn check_file(file: &Path) -> ExitCode {
    let text = match tokio::fs::read_to_string(file).await {
        Ok(text) => text,
        Err(e) => {
            tracing::error!("Failed to read {}: {}", file.display(), e);
            return ExitCode::FAILURE;
        }
    };

    match check(&text) {
        TextCheck::Valid(_) => {
            println!("{}: valid JSON", file.display());
            ExitCode::SUCCESS
        }
        TextCheck::Invalid(issue) => {
            println!("{}: invalid JSON ({})", file.display(), issue);
            ExitCode::FAILURE
        }
    }
}

async fn health(config: &AppConfig) -> ExitCode {
    let service = match HttpExtractionService::new(HttpExtractionConfig::from(&config.extraction)) {
        Ok(service) => service,
        Err(e) => {
            tracing::error!("Failed to start extraction client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let health = CheckServiceHealthHandler::new(Arc::new(service)).handle().await;
    if health.available {
        println!("Extraction service at {} is running", config.extraction.base_url);
        ExitCode::SUCCESS
    } else {
        println!("Extraction service at {} is not reachable", config.extraction.base_url);
        ExitCode::FAILURE
    }
}

/// Interactive review loop over stdin.
struct Console {
    session: ReviewSession,
    upload: UploadDocumentHandler,
    edit: EditArtifactHandler,
    export: ExportArtifactHandler,
    work_file: PathBuf,
}

impl Console {
    fn new(
        service: Arc<dyn ExtractionService>,
        sink: Arc<dyn ArtifactSink>,
        work_file: PathBuf,
    ) -> Self {
        Self {
            session: ReviewSession::new(),
            upload: UploadDocumentHandler::new(service),
            edit: EditArtifactHandler::new(),
            export: ExportArtifactHandler::new(sink),
            work_file,
        }
    }

    fn from_config(config: &AppConfig, work_file: PathBuf) -> Result<Self, ExtractionError> {
        let service = HttpExtractionService::new(HttpExtractionConfig::from(&config.extraction))?;
        let sink = DownloadsDirectorySink::from(&config.export);
        Ok(Self::new(Arc::new(service), Arc::new(sink), work_file))
    }

    async fn run(mut self, document: &Path) -> ExitCode {
        self.upload_file(document).await;
        println!("Commands: check, export, upload <PDF>, status, quit");

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    tracing::error!("Failed to read command: {}", e);
                    return ExitCode::FAILURE;
                }
            };

            let (command, argument) = match line.trim().split_once(char::is_whitespace) {
                Some((command, argument)) => (command, argument.trim()),
                None => (line.trim(), ""),
            };

            match command {
                "" => {}
                "check" => {
                    self.reload_work_file().await;
                }
                "export" => self.export().await,
                "upload" if !argument.is_empty() => self.upload_file(Path::new(argument)).await,
                "status" => self.status(),
                "quit" | "exit" => break,
                _ => println!("Unknown command: {}", line.trim()),
            }
        }

        ExitCode::SUCCESS
    }

    async fn upload_file(&mut self, path: &Path) {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                println!("Cannot read {}: {}", path.display(), e);
                return;
            }
        };
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        println!("Extracting {}...", file_name);
        let cmd = UploadDocumentCommand::new(file_name, bytes);
        match self.upload.handle(&mut self.session, cmd).await {
            Ok(result) => match result.notice() {
                Some(notice) => println!("{}", notice),
                None => self.write_work_file().await,
            },
            Err(e) => println!("{}", e.message),
        }
    }

    async fn write_work_file(&self) {
        let Some(artifact) = self.session.artifact() else {
            return;
        };
        match tokio::fs::write(&self.work_file, artifact.text()).await {
            Ok(()) => println!(
                "Bundle written to {}. Edit it, then run `check` or `export`.",
                self.work_file.display()
            ),
            Err(e) => println!("Cannot write {}: {}", self.work_file.display(), e),
        }
    }

    /// Copies the working file into the session. Returns false if the file
    /// could not be read or the session refused the edit.
    async fn reload_work_file(&mut self) -> bool {
        let text = match tokio::fs::read_to_string(&self.work_file).await {
            Ok(text) => text,
            Err(e) => {
                println!("Cannot read {}: {}", self.work_file.display(), e);
                return false;
            }
        };

        match self.edit.handle(&mut self.session, EditArtifactCommand::new(text)) {
            Ok(result) => {
                match result.issue {
                    None if result.valid => println!("Valid JSON"),
                    Some(issue) => println!("Invalid JSON: {}", issue),
                    None => println!("Invalid JSON"),
                }
                true
            }
            Err(e) => {
                println!("{}", e);
                false
            }
        }
    }

    /// Exports the working file as it is on disk.
    async fn export(&mut self) {
        if self.session.artifact().is_some() && !self.reload_work_file().await {
            return;
        }

        match self.export.handle(&mut self.session).await {
            Ok(saved) => println!("Saved {}", saved.location.display()),
            Err(e) => println!("{}", e.notice()),
        }
    }

    fn status(&mut self) {
        println!("Stage: {}", self.session.stage());
        if let Some(document) = self.session.current_document() {
            println!("Document: {} ({} bytes)", document.file_name(), document.len());
        }
        match self.session.open_document() {
            Ok(Some(handle)) => println!("View: {}", handle.url()),
            Ok(None) => {}
            Err(e) => println!("Cannot open document: {}", e),
        }
        if let Some(artifact) = self.session.artifact() {
            match artifact.issue() {
                None => println!("Bundle: valid JSON"),
                Some(issue) => println!("Bundle: invalid JSON ({})", issue),
            }
        }
        if let Some(notice) = self.session.notice() {
            println!("{}", notice);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bima_review::adapters::{InMemoryArtifactSink, MockExtractionService};
    use serde_json::json;
    use tempfile::TempDir;

    struct Fixture {
        console: Console,
        sink: InMemoryArtifactSink,
        pdf: PathBuf,
        _dir: TempDir,
    }

    fn fixture(bundle: serde_json::Value) -> Fixture {
        let dir = TempDir::new().unwrap();
        let pdf = dir.path().join("policy.pdf");
        std::fs::write(&pdf, b"%PDF-1.7").unwrap();

        let service = MockExtractionService::new().with_bundle(bundle);
        let sink = InMemoryArtifactSink::new();
        let console = Console::new(
            Arc::new(service),
            Arc::new(sink.clone()),
            dir.path().join("bundle.edit.json"),
        );

        Fixture {
            console,
            sink,
            pdf,
            _dir: dir,
        }
    }

    #[tokio::test]
    async fn upload_writes_seed_to_work_file() {
        let mut f = fixture(json!({"a": 1}));
        f.console.upload_file(&f.pdf).await;

        let text = std::fs::read_to_string(&f.console.work_file).unwrap();
        assert_eq!(text, "{\n  \"a\": 1\n}");
    }

    #[tokio::test]
    async fn export_saves_the_edited_work_file() {
        let mut f = fixture(json!({"a": 1}));
        f.console.upload_file(&f.pdf).await;
        std::fs::write(&f.console.work_file, "{\n  \"a\": 2\n}").unwrap();

        f.console.export().await;

        let saved = f.sink.last().unwrap();
        assert_eq!(saved.content, b"{\n  \"a\": 2\n}");
        assert_eq!(saved.filename, "NHCX_InsurancePlan_Bundle.json");
    }

    #[tokio::test]
    async fn export_refuses_invalid_work_file() {
        let mut f = fixture(json!({"a": 1}));
        f.console.upload_file(&f.pdf).await;
        std::fs::write(&f.console.work_file, "{\"a\": 2").unwrap();

        f.console.export().await;

        assert!(f.sink.saved().is_empty());
        assert_eq!(f.console.session.artifact().unwrap().text(), "{\"a\": 2");
    }

    #[tokio::test]
    async fn export_stops_when_work_file_is_missing() {
        let mut f = fixture(json!({"a": 1}));
        f.console.upload_file(&f.pdf).await;
        std::fs::remove_file(&f.console.work_file).unwrap();

        f.console.export().await;

        assert!(f.sink.saved().is_empty());
    }
}
