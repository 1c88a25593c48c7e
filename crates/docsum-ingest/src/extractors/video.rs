//! Video extraction: demux the audio track, then transcribe it.

use super::audio::transcribe_to_sidecar;
use super::{capability_error, ensure_readable, sibling_path, ArtifactGuard, ExtractResult};
use super::ExtractionProvider;
use docsum_core::{ExtractionResult, FileKind};
use docsum_process::MediaTools;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Extension of the audio track saved next to the video.
pub const AUDIO_SUFFIX: &str = ".mp3";

/// Extractor for video files.
pub struct VideoExtractor {
    tools: Arc<dyn MediaTools>,
}

impl VideoExtractor {
    pub fn new(tools: Arc<dyn MediaTools>) -> Self {
        Self { tools }
    }
}

impl ExtractionProvider for VideoExtractor {
    fn kind(&self) -> FileKind {
        FileKind::Video
    }

    fn extract(&self, path: &Path) -> ExtractResult<ExtractionResult> {
        ensure_readable(path)?;
        info!("Processing video: {:?}", path);

        let mut guard = ArtifactGuard::new();

        let audio = sibling_path(path, AUDIO_SUFFIX);
        guard.claim(audio.clone())?;
        self.tools
            .extract_audio(path, &audio)
            .map_err(capability_error(path, "Audio extraction"))?;
        info!("Audio track saved to {:?}", audio);

        let text = transcribe_to_sidecar(self.tools.as_ref(), &audio, path, &mut guard)?;

        Ok(ExtractionResult::new(text, guard.finish()))
    }
}
