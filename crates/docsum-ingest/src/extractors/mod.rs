//! Extraction strategies, one per supported file kind.

mod audio;
mod pdf;
mod text;
mod video;
mod word;

#[cfg(test)]
pub(crate) mod test_tools;

pub use audio::AudioExtractor;
pub use pdf::PdfExtractor;
pub use text::TextExtractor;
pub use video::VideoExtractor;
pub use word::WordExtractor;

use crate::error::ExtractError;
use docsum_core::{ExtractionResult, FileKind};
use docsum_process::{MediaTools, ProcessError};
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Result type for extraction.
pub type ExtractResult<T> = Result<T, ExtractError>;

/// Turns one kind of file into plain text.
///
/// Implementations are blocking. On error, any artifact already written
/// must be removed before returning.
pub trait ExtractionProvider: Send + Sync {
    /// The kind this strategy handles.
    fn kind(&self) -> FileKind;

    /// Extract the text of the file at `path`.
    fn extract(&self, path: &Path) -> ExtractResult<ExtractionResult>;
}

/// Strategy table keyed by file kind.
#[derive(Clone, Default)]
pub struct ExtractorRegistry {
    extractors: HashMap<FileKind, Arc<dyn ExtractionProvider>>,
}

impl ExtractorRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with a strategy for every supported kind.
    pub fn with_tools(tools: Arc<dyn MediaTools>) -> Self {
        let mut registry = Self::new();
        registry.register(PdfExtractor::new(tools.clone()));
        registry.register(WordExtractor::new());
        registry.register(TextExtractor::new());
        registry.register(VideoExtractor::new(tools.clone()));
        registry.register(AudioExtractor::new(tools));
        registry
    }

    /// Add or replace the strategy for `extractor.kind()`.
    pub fn register(&mut self, extractor: impl ExtractionProvider + 'static) {
        self.extractors.insert(extractor.kind(), Arc::new(extractor));
    }

    /// The strategy for `kind`, if any.
    pub fn get(&self, kind: FileKind) -> Option<Arc<dyn ExtractionProvider>> {
        self.extractors.get(&kind).cloned()
    }

    /// Dispatch `path` to the strategy registered for `kind`.
    pub fn extract(&self, path: &Path, kind: FileKind) -> ExtractResult<ExtractionResult> {
        let extractor = self.get(kind).ok_or(ExtractError::Unsupported(kind))?;
        extractor.extract(path)
    }
}

/// Tracks artifacts written during one extraction.
///
/// Dropping the guard deletes every tracked file; `finish` hands them over
/// instead.
pub(crate) struct ArtifactGuard {
    paths: Vec<PathBuf>,
}

impl ArtifactGuard {
    pub(crate) fn new() -> Self {
        Self { paths: Vec::new() }
    }

    /// Reserve a path an external tool is about to write.
    ///
    /// A file already at `path` is left alone and never tracked.
    pub(crate) fn claim(&mut self, path: PathBuf) -> ExtractResult<()> {
        if path.exists() {
            return Err(ExtractError::ArtifactExists(path));
        }
        self.paths.push(path);
        Ok(())
    }

    /// Create `path` with `contents` as a tracked artifact.
    pub(crate) fn write(&mut self, path: PathBuf, contents: &str) -> ExtractResult<()> {
        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|source| match source.kind() {
                std::io::ErrorKind::AlreadyExists => ExtractError::ArtifactExists(path.clone()),
                _ => ExtractError::ArtifactWrite {
                    path: path.clone(),
                    source,
                },
            })?;
        self.paths.push(path.clone());

        file.write_all(contents.as_bytes())
            .map_err(|source| ExtractError::ArtifactWrite {
                path: path.clone(),
                source,
            })?;
        debug!("Wrote artifact {:?}", path);
        Ok(())
    }

    /// Keep the artifacts, in creation order.
    pub(crate) fn finish(mut self) -> Vec<PathBuf> {
        std::mem::take(&mut self.paths)
    }
}

impl Drop for ArtifactGuard {
    fn drop(&mut self) {
        for path in &self.paths {
            if !path.exists() {
                continue;
            }
            match std::fs::remove_file(path) {
                Ok(()) => debug!("Removed partial artifact {:?}", path),
                Err(e) => warn!("Failed to remove partial artifact {:?}: {}", path, e),
            }
        }
    }
}

/// `dir/{stem}{suffix}` for a source file, e.g. `report_extracted.txt`.
pub(crate) fn sibling_path(source: &Path, suffix: &str) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    source.with_file_name(format!("{}{}", stem, suffix))
}

/// Fail early with `Unreadable` when the source is gone.
pub(crate) fn ensure_readable(path: &Path) -> ExtractResult<()> {
    std::fs::metadata(path)
        .map(|_| ())
        .map_err(|source| ExtractError::Unreadable {
            path: path.to_path_buf(),
            source,
        })
}

pub(crate) fn capability_error(
    path: &Path,
    capability: &'static str,
) -> impl FnOnce(ProcessError) -> ExtractError {
    let path = path.to_path_buf();
    move |source| ExtractError::Capability {
        path,
        capability,
        source,
    }
}
