//! PDF text-layer reading and page rasterization.

use crate::error::{ProcessError, ProcessResult};
use crate::require_tool;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info, warn};

const PAGE_PREFIX: &str = "page";

/// Read the embedded text layer of every page, concatenated in page order.
///
/// Returns an empty (or whitespace-only) string for scanned documents.
pub fn read_text_layer(pdf_path: &Path) -> ProcessResult<String> {
    let bytes = std::fs::read(pdf_path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ProcessError::FileNotFound(pdf_path.to_path_buf()),
        _ => ProcessError::Io(e),
    })?;

    debug!("Reading PDF text layer: {:?} ({} bytes)", pdf_path, bytes.len());

    // pdf-extract can panic on malformed fonts/glyphs
    let text = match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem(&bytes)
    })) {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            return Err(ProcessError::PdfError(format!(
                "Failed to extract text from {:?}: {}",
                pdf_path, e
            )))
        }
        Err(_) => {
            warn!("PDF text extraction panicked for {:?}", pdf_path);
            return Err(ProcessError::PdfError(format!(
                "Text extraction panicked for {:?} (malformed font or glyph)",
                pdf_path
            )));
        }
    };

    debug!("Extracted {} characters from text layer", text.len());
    Ok(text)
}

/// Render every page of a PDF to PNG inside `output_dir`.
///
/// Returns the images in page order.
pub fn rasterize_pages(pdf_path: &Path, output_dir: &Path, dpi: u32) -> ProcessResult<Vec<PathBuf>> {
    if !pdf_path.exists() {
        return Err(ProcessError::FileNotFound(pdf_path.to_path_buf()));
    }

    require_tool("pdftoppm")?;

    info!("Rasterizing {:?} at {} dpi", pdf_path, dpi);

    let output = Command::new("pdftoppm")
        .args(["-png", "-r", &dpi.to_string()])
        .arg(pdf_path)
        .arg(output_dir.join(PAGE_PREFIX))
        .output()?;

    if !output.status.success() {
        return Err(ProcessError::PdfError(
            String::from_utf8_lossy(&output.stderr).to_string(),
        ));
    }

    let pages = collect_page_images(output_dir)?;
    debug!("Rasterized {} pages", pages.len());
    Ok(pages)
}

/// pdftoppm names pages `page-1.png` or `page-01.png` depending on page count.
fn collect_page_images(dir: &Path) -> ProcessResult<Vec<PathBuf>> {
    let mut pages: Vec<(u32, PathBuf)> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter_map(|path| page_number(&path).map(|n| (n, path)))
        .collect();

    pages.sort_by_key(|(n, _)| *n);
    Ok(pages.into_iter().map(|(_, path)| path).collect())
}

fn page_number(path: &Path) -> Option<u32> {
    if path.extension().and_then(|e| e.to_str()) != Some("png") {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    let number = stem.strip_prefix(PAGE_PREFIX)?.strip_prefix('-')?;
    number.parse().ok()
}
