//! Error types for capability providers.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for processing operations.
pub type ProcessResult<T> = Result<T, ProcessError>;

/// Errors raised by the external text, OCR and transcription capabilities.
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Tool not found: {tool}. Please install it.")]
    ToolNotFound { tool: String },

    #[error("PDF error: {0}")]
    PdfError(String),

    #[error("FFmpeg error: {0}")]
    FfmpegError(String),

    #[error("Transcription error: {0}")]
    TranscriptionError(String),

    #[error("OCR error: {0}")]
    OcrError(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}
