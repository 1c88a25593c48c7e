//! Audio extraction via transcription.

use super::{capability_error, ensure_readable, sibling_path, ArtifactGuard, ExtractResult};
use super::ExtractionProvider;
use crate::error::ExtractError;
use docsum_core::{ExtractionResult, FileKind};
use docsum_process::{segments_to_text, MediaTools};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Suffix of the transcript sidecar.
pub const TRANSCRIBED_SUFFIX: &str = "_transcribed.md";

/// Extractor for audio files.
pub struct AudioExtractor {
    tools: Arc<dyn MediaTools>,
}

impl AudioExtractor {
    pub fn new(tools: Arc<dyn MediaTools>) -> Self {
        Self { tools }
    }
}

impl ExtractionProvider for AudioExtractor {
    fn kind(&self) -> FileKind {
        FileKind::Audio
    }

    fn extract(&self, path: &Path) -> ExtractResult<ExtractionResult> {
        ensure_readable(path)?;
        info!("Processing audio: {:?}", path);

        let mut guard = ArtifactGuard::new();
        let text = transcribe_to_sidecar(self.tools.as_ref(), path, path, &mut guard)?;

        Ok(ExtractionResult::new(text, guard.finish()))
    }
}

/// Transcribe `audio` and write `{source stem}_transcribed.md` next to `source`.
///
/// Tool output goes to a scratch directory that is removed afterwards.
pub(super) fn transcribe_to_sidecar(
    tools: &dyn MediaTools,
    audio: &Path,
    source: &Path,
    guard: &mut ArtifactGuard,
) -> ExtractResult<String> {
    let scratch = tempfile::tempdir().map_err(ExtractError::Scratch)?;

    let segments = tools
        .transcribe(audio, scratch.path())
        .map_err(capability_error(source, "Transcription"))?;
    info!("Transcribed {} segments", segments.len());

    let text = segments_to_text(&segments);
    let name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let sidecar = sibling_path(source, TRANSCRIBED_SUFFIX);
    guard.write(sidecar.clone(), &transcript_markdown(&name, &text))?;
    info!("Transcript written to {:?}", sidecar);

    Ok(text)
}

fn transcript_markdown(source_name: &str, text: &str) -> String {
    format!("# Transcript of {}\n\n{}\n", source_name, text)
}
