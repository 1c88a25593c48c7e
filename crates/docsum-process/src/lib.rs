//! Docsum Process - Text extraction capabilities for documents and media.
//!
//! This crate provides:
//! - PDF text-layer reading (via pdf-extract)
//! - PDF page rasterization (via pdftoppm)
//! - OCR for images (via Tesseract CLI)
//! - Audio extraction from video (via FFmpeg CLI)
//! - Audio transcription (via Whisper CLI)
//!
//! All but the text layer rely on external tools being installed on the system.

mod error;
mod ffmpeg;
mod ocr;
mod pdf;
mod tools;
mod transcribe;

pub use error::{ProcessError, ProcessResult};
pub use ffmpeg::extract_audio;
pub use ocr::{ocr_image, OcrResult};
pub use pdf::{rasterize_pages, read_text_layer};
pub use tools::{MediaTools, SystemTools};
pub use transcribe::{segments_to_text, transcribe_audio, TranscriptSegment};

/// External tools the pipeline shells out to.
pub const EXTERNAL_TOOLS: [&str; 4] = ["pdftoppm", "tesseract", "ffmpeg", "whisper"];

/// Check if required external tools are available.
pub fn check_dependencies() -> Vec<(&'static str, bool)> {
    EXTERNAL_TOOLS
        .iter()
        .map(|tool| (*tool, which::which(tool).is_ok()))
        .collect()
}

pub(crate) fn require_tool(tool: &str) -> ProcessResult<()> {
    if which::which(tool).is_err() {
        return Err(ProcessError::ToolNotFound {
            tool: tool.to_string(),
        });
    }
    Ok(())
}
