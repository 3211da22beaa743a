//! Artifact sink adapters.

mod downloads_directory;
mod in_memory_sink;

pub use downloads_directory::DownloadsDirectorySink;
pub use in_memory_sink::InMemoryArtifactSink;
