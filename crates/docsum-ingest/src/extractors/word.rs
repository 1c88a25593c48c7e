//! Word (.docx) extraction.

use super::{ensure_readable, ExtractResult, ExtractionProvider};
use crate::error::ExtractError;
use docsum_core::{ExtractionResult, FileKind};
use docx_rs::{DocumentChild, Paragraph, ParagraphChild, RunChild, TableCellContent};
use std::path::Path;
use tracing::{debug, info};

/// Extractor for Word documents. Produces no artifacts.
pub struct WordExtractor;

impl WordExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WordExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractionProvider for WordExtractor {
    fn kind(&self) -> FileKind {
        FileKind::Word
    }

    fn extract(&self, path: &Path) -> ExtractResult<ExtractionResult> {
        ensure_readable(path)?;
        debug!("Extracting DOCX: {:?}", path);

        let bytes = std::fs::read(path).map_err(|source| ExtractError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;

        let doc = docx_rs::read_docx(&bytes).map_err(|e| ExtractError::Parse {
            path: path.to_path_buf(),
            message: format!("Failed to parse DOCX: {}", e),
        })?;

        let mut paragraphs = Vec::new();
        for child in &doc.document.children {
            collect_paragraphs(child, &mut paragraphs);
        }
        let text = paragraphs.join("\n");

        info!(
            "Extracted {} paragraphs ({} chars) from {:?}",
            paragraphs.len(),
            text.len(),
            path
        );

        Ok(ExtractionResult::text_only(text))
    }
}

/// Paragraph texts in document order, including those inside table cells.
fn collect_paragraphs(element: &DocumentChild, out: &mut Vec<String>) {
    match element {
        DocumentChild::Paragraph(para) => out.push(paragraph_text(para)),
        DocumentChild::Table(table) => {
            for row in &table.rows {
                let docx_rs::TableChild::TableRow(tr) = row;
                for cell in &tr.cells {
                    let docx_rs::TableRowChild::TableCell(tc) = cell;
                    for content in &tc.children {
                        if let TableCellContent::Paragraph(para) = content {
                            out.push(paragraph_text(para));
                        }
                    }
                }
            }
        }
        _ => {}
    }
}

fn paragraph_text(para: &Paragraph) -> String {
    let mut text = String::new();
    push_runs(&para.children, &mut text);
    text
}

fn push_runs(children: &[ParagraphChild], out: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => {
                for run_child in &run.children {
                    if let RunChild::Text(t) = run_child {
                        out.push_str(&t.text);
                    }
                }
            }
            ParagraphChild::Hyperlink(link) => push_runs(&link.children, out),
            _ => {}
        }
    }
}
