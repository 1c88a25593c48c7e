//! Audio transcription using Whisper.

use crate::error::{ProcessError, ProcessResult};
use crate::require_tool;
use serde::Deserialize;
use std::path::Path;
use std::process::Command;
use tracing::{debug, info};

/// A segment of transcribed audio.
#[derive(Debug, Clone)]
pub struct TranscriptSegment {
    /// The transcribed text.
    pub text: String,
    /// Start time in seconds.
    pub start: f64,
    /// End time in seconds.
    pub end: f64,
}

#[derive(Debug, Deserialize)]
struct WhisperJsonOutput {
    segments: Vec<WhisperSegment>,
}

#[derive(Debug, Deserialize)]
struct WhisperSegment {
    text: String,
    start: f64,
    end: f64,
}

/// Transcribe an audio file using Whisper.
///
/// Whisper writes its JSON result into `output_dir`; callers pass a scratch
/// directory so nothing is left next to the audio file.
///
/// Requires the `whisper` CLI to be installed (pip install openai-whisper).
pub fn transcribe_audio(
    audio_path: &Path,
    model: &str,
    language: &str,
    output_dir: &Path,
) -> ProcessResult<Vec<TranscriptSegment>> {
    if !audio_path.exists() {
        return Err(ProcessError::FileNotFound(audio_path.to_path_buf()));
    }

    require_tool("whisper")?;

    info!("Transcribing {:?} with model '{}'", audio_path, model);

    let output = Command::new("whisper")
        .arg(audio_path)
        .args(["--model", model])
        .args(["--output_format", "json"])
        .args(["--output_dir"])
        .arg(output_dir)
        .args(["--language", language])
        .output()?;

    if !output.status.success() {
        return Err(ProcessError::TranscriptionError(
            String::from_utf8_lossy(&output.stderr).to_string(),
        ));
    }

    let stem = audio_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("audio");
    let json_path = output_dir.join(format!("{}.json", stem));

    if !json_path.exists() {
        return Err(ProcessError::TranscriptionError(
            "Whisper output file not found".to_string(),
        ));
    }

    let json_content = std::fs::read_to_string(&json_path)?;
    let segments = parse_whisper_json(&json_content)?;

    debug!("Transcribed {} segments", segments.len());
    Ok(segments)
}

fn parse_whisper_json(json: &str) -> ProcessResult<Vec<TranscriptSegment>> {
    let whisper_output: WhisperJsonOutput = serde_json::from_str(json)
        .map_err(|e| ProcessError::ParseError(format!("Failed to parse Whisper output: {}", e)))?;

    Ok(whisper_output
        .segments
        .into_iter()
        .map(|s| TranscriptSegment {
            text: s.text.trim().to_string(),
            start: s.start,
            end: s.end,
        })
        .collect())
}

/// Get the full transcript text from segments.
pub fn segments_to_text(segments: &[TranscriptSegment]) -> String {
    segments
        .iter()
        .map(|s| s.text.as_str())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
