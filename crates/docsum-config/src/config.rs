//! Configuration structures and loading.

use crate::error::{ConfigError, ConfigResult};
use crate::paths::AppPaths;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Main configuration structure.
///
/// `api_url`, `bearer_token` and `model` have no defaults: a config file
/// without them fails to parse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api_url: String,
    pub bearer_token: String,
    pub model: String,

    #[serde(default)]
    pub request: RequestConfig,

    #[serde(default)]
    pub watch: WatchConfig,

    #[serde(default)]
    pub prompt: PromptConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub processing: ProcessingConfig,
}

impl Config {
    /// Load configuration from `$DOCSUM_CONFIG` or the platform default location.
    pub fn load() -> ConfigResult<Self> {
        let path = AppPaths::resolve_config_file().ok_or(ConfigError::NoConfigDir)?;
        Self::load_from(&path)
    }

    /// Load and validate configuration from a specific path.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;

        debug!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Check the values serde cannot.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.api_url.trim().is_empty() {
            return Err(ConfigError::Invalid("api_url must not be empty".to_string()));
        }
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "api_url must be an http(s) URL, got '{}'",
                self.api_url
            )));
        }
        if self.bearer_token.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "bearer_token must not be empty".to_string(),
            ));
        }
        if self.model.trim().is_empty() {
            return Err(ConfigError::Invalid("model must not be empty".to_string()));
        }
        if self.request.summary_field.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "request.summary_field must not be empty".to_string(),
            ));
        }
        if self.request.timeout_seconds == 0 {
            return Err(ConfigError::Invalid(
                "request.timeout_seconds must be at least 1".to_string(),
            ));
        }
        if self.processing.queue_capacity == 0 {
            return Err(ConfigError::Invalid(
                "processing.queue_capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Watch root with `~` expanded.
    pub fn watch_directory(&self) -> PathBuf {
        expand_path(&self.watch.directory)
    }

    /// Prompt template path with `~` expanded.
    pub fn prompt_template_path(&self) -> PathBuf {
        expand_path(&self.prompt.template_path)
    }

    /// Generate an example config file with helpful comments.
    pub fn example_config_string() -> String {
        r#"# docsum configuration

# Summarization endpoint (required)
api_url = "http://localhost:11434/api/generate"
bearer_token = "change-me"
model = "llama3"

[request]
# Request timeout in seconds
timeout_seconds = 300
# JSON field of the response holding the summary
summary_field = "response"

[watch]
# Directory to watch for new files (not recursive)
directory = "/app/incoming"

# File patterns to ignore
ignore_patterns = [
    "*.tmp",
    "*.temp",
    ".DS_Store",
    "._*",
    "*.part",
    "*.crdownload",
]

# Quiet period before a new file is picked up (milliseconds)
debounce_ms = 1000

[prompt]
# Prepended to the extracted text, re-read for every file
template_path = "/app/summarize-notes.md"

[output]
# markdown -> name.ext.summary.md, text -> name.ext.summary.txt
format = "markdown"

[processing]
# Whisper model size: tiny, base, small, medium, large
whisper_model = "base"
whisper_language = "en"
# Resolution used when rasterizing PDF pages for OCR
ocr_dpi = 300
queue_capacity = 64
"#
        .to_string()
    }
}

fn expand_path(path: &str) -> PathBuf {
    let expanded = shellexpand::tilde(path);
    PathBuf::from(expanded.as_ref())
}

/// Summarization request settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestConfig {
    pub timeout_seconds: u64,
    pub summary_field: String,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 300,
            summary_field: "response".to_string(),
        }
    }
}

/// File watching settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    pub directory: String,
    pub ignore_patterns: Vec<String>,
    pub debounce_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            directory: "/app/incoming".to_string(),
            ignore_patterns: vec![
                "*.tmp".to_string(),
                "*.temp".to_string(),
                ".DS_Store".to_string(),
                "._*".to_string(),
                "*.part".to_string(),
                "*.crdownload".to_string(),
            ],
            debounce_ms: 1000,
        }
    }
}

/// Prompt template settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    pub template_path: String,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            template_path: "/app/summarize-notes.md".to_string(),
        }
    }
}

/// How the summary file is rendered and named.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Markdown,
    Text,
}

impl OutputFormat {
    /// Extension appended to the original file name, e.g. `report.pdf.summary.md`.
    pub fn summary_suffix(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "summary.md",
            OutputFormat::Text => "summary.txt",
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

/// Extraction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    pub whisper_model: String,
    pub whisper_language: String,
    pub ocr_dpi: u32,
    pub queue_capacity: usize,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            whisper_model: "base".to_string(),
            whisper_language: "en".to_string(),
            ocr_dpi: 300,
            queue_capacity: 64,
        }
    }
}
