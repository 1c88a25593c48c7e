//! Error types for the ingestion pipeline.

use docsum_core::FileKind;
use docsum_process::ProcessError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for ingestion operations.
pub type IngestResult<T> = Result<T, IngestError>;

/// Errors that can occur while handling a file.
///
/// Everything except `Watch` and `QueueClosed` is a per-file failure: the
/// controller logs it and moves on to the next file.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Lifecycle error: {0}")]
    Lifecycle(#[from] docsum_core::CoreError),

    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractError),

    #[error("Prompt error: {0}")]
    Prompt(#[from] docsum_summary::PromptError),

    #[error("Summarization failed: {0}")]
    Summary(#[from] docsum_summary::SummaryError),

    #[error("Move failed: {0}")]
    Move(#[from] MoveError),

    #[error("Summary path already taken: {0}")]
    OutputExists(PathBuf),

    #[error("Failed to write summary {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Watch error: {0}")]
    Watch(String),

    #[error("Ingestion queue is closed")]
    QueueClosed,
}

/// Errors raised by extraction strategies.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Cannot read {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{capability} failed for {path}: {source}")]
    Capability {
        path: PathBuf,
        capability: &'static str,
        #[source]
        source: ProcessError,
    },

    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Failed to write artifact {path}: {source}")]
    ArtifactWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Artifact path already taken: {0}")]
    ArtifactExists(PathBuf),

    #[error("Failed to create scratch directory: {0}")]
    Scratch(#[source] std::io::Error),

    #[error("No extraction strategy for {0} files")]
    Unsupported(FileKind),

    #[error("Extraction aborted for {path}: {message}")]
    Aborted { path: PathBuf, message: String },
}

/// Errors raised when relocating files between lifecycle folders.
#[derive(Error, Debug)]
pub enum MoveError {
    #[error("Source vanished before move: {0}")]
    SourceMissing(PathBuf),

    #[error("Destination already exists: {0}")]
    DestinationExists(PathBuf),

    #[error("Failed to move {from} to {to}: {source}")]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
