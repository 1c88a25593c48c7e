//! Plain text passthrough.

use super::{ExtractResult, ExtractionProvider};
use crate::error::ExtractError;
use docsum_core::{ExtractionResult, FileKind};
use std::path::Path;
use tracing::debug;

/// The file content is the text. Produces no artifacts.
pub struct TextExtractor;

impl TextExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractionProvider for TextExtractor {
    fn kind(&self) -> FileKind {
        FileKind::Text
    }

    fn extract(&self, path: &Path) -> ExtractResult<ExtractionResult> {
        let content = std::fs::read_to_string(path).map_err(|source| ExtractError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;

        debug!("Read {} characters from {:?}", content.len(), path);
        Ok(ExtractionResult::text_only(content))
    }
}
