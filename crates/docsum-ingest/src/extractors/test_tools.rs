//! In-memory stand-in for the external capabilities.

use docsum_process::{MediaTools, OcrResult, ProcessError, ProcessResult, TranscriptSegment};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Rasterized "pages" carry their OCR text as file contents.
#[derive(Default)]
pub(crate) struct FakeTools {
    pub text_layer: String,
    pub ocr_pages: Vec<String>,
    pub transcript: Vec<String>,
    pub fail_transcribe: bool,
    pub ocr_calls: AtomicUsize,
}

impl FakeTools {
    pub fn ocr_calls(&self) -> usize {
        self.ocr_calls.load(Ordering::SeqCst)
    }
}

impl MediaTools for FakeTools {
    fn pdf_text_layer(&self, pdf_path: &Path) -> ProcessResult<String> {
        if !pdf_path.exists() {
            return Err(ProcessError::FileNotFound(pdf_path.to_path_buf()));
        }
        Ok(self.text_layer.clone())
    }

    fn rasterize_pdf(&self, _pdf_path: &Path, output_dir: &Path) -> ProcessResult<Vec<PathBuf>> {
        self.ocr_pages
            .iter()
            .enumerate()
            .map(|(i, text)| {
                let page = output_dir.join(format!("page-{}.png", i + 1));
                std::fs::write(&page, text)?;
                Ok(page)
            })
            .collect()
    }

    fn ocr_image(&self, image_path: &Path) -> ProcessResult<OcrResult> {
        self.ocr_calls.fetch_add(1, Ordering::SeqCst);
        Ok(OcrResult {
            text: std::fs::read_to_string(image_path)?,
        })
    }

    fn extract_audio(&self, _video_path: &Path, audio_path: &Path) -> ProcessResult<()> {
        std::fs::write(audio_path, b"ID3 fake mp3")?;
        Ok(())
    }

    fn transcribe(
        &self,
        audio_path: &Path,
        scratch_dir: &Path,
    ) -> ProcessResult<Vec<TranscriptSegment>> {
        if self.fail_transcribe {
            return Err(ProcessError::TranscriptionError("model crashed".to_string()));
        }
        if !audio_path.exists() {
            return Err(ProcessError::FileNotFound(audio_path.to_path_buf()));
        }
        std::fs::write(scratch_dir.join("whisper.json"), b"{}")?;
        Ok(self
            .transcript
            .iter()
            .enumerate()
            .map(|(i, text)| TranscriptSegment {
                text: text.clone(),
                start: i as f64,
                end: i as f64 + 1.0,
            })
            .collect())
    }
}
