//! FFmpeg integration for pulling the audio track out of a video.

use crate::error::{ProcessError, ProcessResult};
use crate::require_tool;
use std::path::Path;
use std::process::Command;
use tracing::{debug, info};

/// Extract the audio track of `video_path` into `audio_path` as MP3.
///
/// Fails if a file already exists at `audio_path`.
pub fn extract_audio(video_path: &Path, audio_path: &Path) -> ProcessResult<()> {
    if !video_path.exists() {
        return Err(ProcessError::FileNotFound(video_path.to_path_buf()));
    }

    if audio_path.exists() {
        return Err(ProcessError::FfmpegError(format!(
            "refusing to overwrite existing {:?}",
            audio_path
        )));
    }

    require_tool("ffmpeg")?;

    info!("Extracting audio from {:?} to {:?}", video_path, audio_path);

    let output = Command::new("ffmpeg")
        .args(["-i"])
        .arg(video_path)
        .args([
            "-vn",                      // No video
            "-acodec", "libmp3lame",
            "-q:a", "2",
            "-n",                       // Never overwrite
        ])
        .arg(audio_path)
        .output()?;

    if !output.status.success() {
        return Err(ProcessError::FfmpegError(
            String::from_utf8_lossy(&output.stderr).to_string(),
        ));
    }

    if !audio_path.exists() {
        return Err(ProcessError::FfmpegError(format!(
            "ffmpeg reported success but {:?} was not written",
            audio_path
        )));
    }

    debug!("Audio extracted successfully");
    Ok(())
}
