//! The capability seam used by extraction strategies.

use crate::error::ProcessResult;
use crate::ocr::OcrResult;
use crate::transcribe::TranscriptSegment;
use crate::{ffmpeg, ocr, pdf, transcribe};
use std::path::{Path, PathBuf};

/// External text-producing capabilities.
///
/// Extraction strategies only talk to these through this trait, so a test
/// double can stand in for pdf-extract, pdftoppm, tesseract, ffmpeg and whisper.
pub trait MediaTools: Send + Sync {
    /// Embedded text of every page, concatenated in page order.
    fn pdf_text_layer(&self, pdf_path: &Path) -> ProcessResult<String>;

    /// Render each page to an image inside `output_dir`, returned in page order.
    fn rasterize_pdf(&self, pdf_path: &Path, output_dir: &Path) -> ProcessResult<Vec<PathBuf>>;

    /// Recognize the text of one image.
    fn ocr_image(&self, image_path: &Path) -> ProcessResult<OcrResult>;

    /// Write the audio track of `video_path` to `audio_path`.
    fn extract_audio(&self, video_path: &Path, audio_path: &Path) -> ProcessResult<()>;

    /// Transcribe an audio file. `scratch_dir` receives any tool output files.
    fn transcribe(&self, audio_path: &Path, scratch_dir: &Path)
        -> ProcessResult<Vec<TranscriptSegment>>;
}

/// `MediaTools` backed by pdf-extract and the CLI tools installed on the host.
#[derive(Debug, Clone)]
pub struct SystemTools {
    whisper_model: String,
    whisper_language: String,
    ocr_dpi: u32,
}

impl SystemTools {
    pub fn new(
        whisper_model: impl Into<String>,
        whisper_language: impl Into<String>,
        ocr_dpi: u32,
    ) -> Self {
        Self {
            whisper_model: whisper_model.into(),
            whisper_language: whisper_language.into(),
            ocr_dpi,
        }
    }
}

impl Default for SystemTools {
    fn default() -> Self {
        Self::new("base", "en", 300)
    }
}

impl MediaTools for SystemTools {
    fn pdf_text_layer(&self, pdf_path: &Path) -> ProcessResult<String> {
        pdf::read_text_layer(pdf_path)
    }

    fn rasterize_pdf(&self, pdf_path: &Path, output_dir: &Path) -> ProcessResult<Vec<PathBuf>> {
        pdf::rasterize_pages(pdf_path, output_dir, self.ocr_dpi)
    }

    fn ocr_image(&self, image_path: &Path) -> ProcessResult<OcrResult> {
        ocr::ocr_image(image_path)
    }

    fn extract_audio(&self, video_path: &Path, audio_path: &Path) -> ProcessResult<()> {
        ffmpeg::extract_audio(video_path, audio_path)
    }

    fn transcribe(
        &self,
        audio_path: &Path,
        scratch_dir: &Path,
    ) -> ProcessResult<Vec<TranscriptSegment>> {
        transcribe::transcribe_audio(
            audio_path,
            &self.whisper_model,
            &self.whisper_language,
            scratch_dir,
        )
    }
}
