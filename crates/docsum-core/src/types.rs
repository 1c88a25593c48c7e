//! Core domain types for docsum.

use crate::error::{CoreError, CoreResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Kind of a detected file, derived from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Pdf,
    Word,
    Text,
    Video,
    Audio,
    Unknown,
}

impl FileKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Pdf => "pdf",
            FileKind::Word => "word",
            FileKind::Text => "text",
            FileKind::Video => "video",
            FileKind::Audio => "audio",
            FileKind::Unknown => "unknown",
        }
    }

    /// Detect the file kind from an extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "pdf" => FileKind::Pdf,
            "docx" => FileKind::Word,
            "txt" | "text" | "md" | "markdown" | "log" => FileKind::Text,
            "mp4" | "mov" | "mkv" | "webm" | "avi" | "m4v" => FileKind::Video,
            "mp3" | "wav" | "m4a" | "flac" | "ogg" | "aac" => FileKind::Audio,
            _ => FileKind::Unknown,
        }
    }

    /// Detect the file kind of a path.
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|e| e.to_str())
            .map(Self::from_extension)
            .unwrap_or(FileKind::Unknown)
    }

    /// Whether an extraction strategy exists for this kind.
    pub fn is_supported(&self) -> bool {
        !matches!(self, FileKind::Unknown)
    }
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Physical location stage of a watched file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleStage {
    Incoming,
    Working,
    Completed,
}

impl LifecycleStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleStage::Incoming => "incoming",
            LifecycleStage::Working => "working",
            LifecycleStage::Completed => "completed",
        }
    }

    /// The only stage this one may advance to.
    pub fn next(&self) -> Option<LifecycleStage> {
        match self {
            LifecycleStage::Incoming => Some(LifecycleStage::Working),
            LifecycleStage::Working => Some(LifecycleStage::Completed),
            LifecycleStage::Completed => None,
        }
    }
}

impl std::fmt::Display for LifecycleStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A file detected in the watch root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchedFile {
    pub id: Uuid,
    pub path: PathBuf,
    pub kind: FileKind,
    stage: LifecycleStage,
    pub detected_at: DateTime<Utc>,
}

impl WatchedFile {
    /// Classify a freshly detected file. It starts in `Incoming`.
    pub fn detect(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            id: Uuid::new_v4(),
            kind: FileKind::from_path(&path),
            path,
            stage: LifecycleStage::Incoming,
            detected_at: Utc::now(),
        }
    }

    pub fn stage(&self) -> LifecycleStage {
        self.stage
    }

    /// Time since the file was detected.
    pub fn elapsed(&self) -> chrono::Duration {
        Utc::now() - self.detected_at
    }

    /// File name as a string, for logs and artifact naming.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Record that the file now lives at `new_path` in stage `to`.
    ///
    /// Stages only move forward one step at a time.
    pub fn advance(&mut self, to: LifecycleStage, new_path: PathBuf) -> CoreResult<()> {
        if self.stage.next() != Some(to) {
            return Err(CoreError::InvalidTransition {
                from: self.stage,
                to,
            });
        }
        self.stage = to;
        self.path = new_path;
        Ok(())
    }
}

/// Text produced by one extraction strategy plus the files it created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    text: String,
    intermediate_artifacts: Vec<PathBuf>,
}

impl ExtractionResult {
    pub fn new(text: impl Into<String>, intermediate_artifacts: Vec<PathBuf>) -> Self {
        Self {
            text: text.into(),
            intermediate_artifacts,
        }
    }

    /// Result with no intermediate artifacts.
    pub fn text_only(text: impl Into<String>) -> Self {
        Self::new(text, Vec::new())
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Artifacts in creation order.
    pub fn intermediate_artifacts(&self) -> &[PathBuf] {
        &self.intermediate_artifacts
    }
}

/// Per-file state machine stage of the pipeline controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Detected,
    MovedToWorking,
    Extracted,
    Composed,
    Summarized,
    Written,
    Completed,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Detected => "detected",
            PipelineStage::MovedToWorking => "moved_to_working",
            PipelineStage::Extracted => "extracted",
            PipelineStage::Composed => "composed",
            PipelineStage::Summarized => "summarized",
            PipelineStage::Written => "written",
            PipelineStage::Completed => "completed",
        }
    }
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Terminal record for one handled file. Logged, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// Everything reached COMPLETED; `output_path` is the summary file.
    Success { output_path: PathBuf },
    /// Processing halted in `stage`; the file stays where it stopped.
    Failure { reason: String, stage: PipelineStage },
    /// No extraction strategy for this kind; the file was left in WORKING.
    Unsupported { path: PathBuf },
}

impl PipelineOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, PipelineOutcome::Success { .. })
    }
}
