//! PDF extraction: text layer first, OCR when the layer is empty.

use super::{capability_error, ensure_readable, sibling_path, ArtifactGuard, ExtractResult};
use super::ExtractionProvider;
use crate::error::ExtractError;
use docsum_core::{ExtractionResult, FileKind};
use docsum_process::MediaTools;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Suffix of the extracted-text sidecar.
pub const EXTRACTED_SUFFIX: &str = "_extracted.txt";

/// Extractor for PDF files.
pub struct PdfExtractor {
    tools: Arc<dyn MediaTools>,
}

impl PdfExtractor {
    pub fn new(tools: Arc<dyn MediaTools>) -> Self {
        Self { tools }
    }

    /// Rasterize every page and OCR the images in page order.
    fn ocr_pages(&self, path: &Path) -> ExtractResult<String> {
        let scratch = tempfile::tempdir().map_err(ExtractError::Scratch)?;

        let pages = self
            .tools
            .rasterize_pdf(path, scratch.path())
            .map_err(capability_error(path, "PDF rasterization"))?;

        info!("Running OCR over {} page(s) of {:?}", pages.len(), path);

        let mut texts = Vec::with_capacity(pages.len());
        for page in &pages {
            let result = self
                .tools
                .ocr_image(page)
                .map_err(capability_error(path, "OCR"))?;
            texts.push(result.text);
        }

        Ok(texts.join("\n"))
    }
}

impl ExtractionProvider for PdfExtractor {
    fn kind(&self) -> FileKind {
        FileKind::Pdf
    }

    fn extract(&self, path: &Path) -> ExtractResult<ExtractionResult> {
        ensure_readable(path)?;
        info!("Extracting text from {:?}", path);

        let mut guard = ArtifactGuard::new();

        let text_layer = self
            .tools
            .pdf_text_layer(path)
            .map_err(capability_error(path, "PDF text layer"))?;

        let text = if text_layer.trim().is_empty() {
            warn!("No extractable text found in {:?}. Falling back to OCR.", path);
            self.ocr_pages(path)?
        } else {
            text_layer
        };

        let sidecar = sibling_path(path, EXTRACTED_SUFFIX);
        guard.write(sidecar.clone(), &text)?;
        info!("Extracted text written to {:?}", sidecar);

        Ok(ExtractionResult::new(text, guard.finish()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::test_tools::FakeTools;
    use tempfile::tempdir;

    fn pdf_in(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("report.pdf");
        std::fs::write(&path, b"%PDF-1.4 fake").unwrap();
        path
    }

    #[test]
    fn test_text_layer_skips_ocr() {
        let dir = tempdir().unwrap();
        let pdf = pdf_in(dir.path());
        let tools = Arc::new(FakeTools {
            text_layer: "Page one.\nPage two.".to_string(),
            ocr_pages: vec!["should not be read".to_string()],
            ..Default::default()
        });

        let result = PdfExtractor::new(tools.clone()).extract(&pdf).unwrap();

        assert_eq!(result.text(), "Page one.\nPage two.");
        assert_eq!(tools.ocr_calls(), 0);

        let sidecar = dir.path().join("report_extracted.txt");
        assert_eq!(result.intermediate_artifacts(), &[sidecar.clone()]);
        assert_eq!(std::fs::read_to_string(sidecar).unwrap(), "Page one.\nPage two.");
    }

    #[test]
    fn test_whitespace_text_layer_falls_back_to_ocr() {
        let dir = tempdir().unwrap();
        let pdf = pdf_in(dir.path());
        let tools = Arc::new(FakeTools {
            text_layer: "  \n\x0c \n".to_string(),
            ocr_pages: vec!["first page".to_string(), "second page".to_string()],
            ..Default::default()
        });

        let result = PdfExtractor::new(tools.clone()).extract(&pdf).unwrap();

        assert_eq!(tools.ocr_calls(), 2);
        assert_eq!(result.text(), "first page\nsecond page");
        let sidecar = dir.path().join("report_extracted.txt");
        assert_eq!(std::fs::read_to_string(sidecar).unwrap(), "first page\nsecond page");
    }

    #[test]
    fn test_missing_source_is_unreadable() {
        let dir = tempdir().unwrap();
        let tools = Arc::new(FakeTools::default());

        let err = PdfExtractor::new(tools)
            .extract(&dir.path().join("gone.pdf"))
            .unwrap_err();

        assert!(matches!(err, ExtractError::Unreadable { .. }));
        assert!(!dir.path().join("gone_extracted.txt").exists());
    }
}
