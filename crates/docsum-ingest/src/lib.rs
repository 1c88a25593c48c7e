//! Docsum Ingest - Watch-folder ingestion pipeline.
//!
//! This crate provides:
//! - File system watching of the drop folder
//! - Extraction strategies per file kind (PDF with OCR fallback, Word,
//!   plain text, video and audio transcription)
//! - The working/completed folder lifecycle
//! - The per-file pipeline controller and its single-worker queue

mod error;
pub mod extractors;
mod lifecycle;
mod output;
mod pipeline;
mod queue;
mod watcher;

pub use error::{ExtractError, IngestError, IngestResult, MoveError};
pub use extractors::{ExtractionProvider, ExtractorRegistry};
pub use lifecycle::{
    discard_artifacts, ensure_folders, move_to_completed, move_to_working, FolderLifecycle,
    Folders, COMPLETED_DIR, WORKING_DIR,
};
pub use output::{format_markdown, render_summary, summary_path};
pub use pipeline::{PipelineContext, PipelineController};
pub use queue::{IngestQueue, WORKER_COUNT};
pub use watcher::{FileWatcher, WatchEvent, WatcherConfig};
