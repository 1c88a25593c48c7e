//! Types for summarization API requests and responses.

use docsum_config::Config;
use serde::Serialize;

/// Used when the response lacks the summary field.
pub const NO_SUMMARY_PLACEHOLDER: &str = "No summary provided";

/// One summarization call, built per file.
#[derive(Clone)]
pub struct SummaryRequest {
    pub api_url: String,
    pub bearer_token: String,
    pub model: String,
    pub prompt_text: String,
}

impl SummaryRequest {
    pub fn new(
        api_url: impl Into<String>,
        bearer_token: impl Into<String>,
        model: impl Into<String>,
        prompt_text: impl Into<String>,
    ) -> Self {
        Self {
            api_url: api_url.into(),
            bearer_token: bearer_token.into(),
            model: model.into(),
            prompt_text: prompt_text.into(),
        }
    }

    /// Build a request for `prompt_text` using the endpoint settings in `config`.
    pub fn from_config(config: &Config, prompt_text: impl Into<String>) -> Self {
        Self::new(
            &config.api_url,
            &config.bearer_token,
            &config.model,
            prompt_text,
        )
    }

    pub(crate) fn body(&self) -> GenerateBody<'_> {
        GenerateBody {
            model: &self.model,
            prompt: &self.prompt_text,
            stream: false,
        }
    }
}

// Keeps the token out of Debug output.
impl std::fmt::Debug for SummaryRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SummaryRequest")
            .field("api_url", &self.api_url)
            .field("bearer_token", &"***")
            .field("model", &self.model)
            .field("prompt_text", &format_args!("<{} chars>", self.prompt_text.len()))
            .finish()
    }
}

/// Wire body of the POST.
#[derive(Debug, Serialize)]
pub(crate) struct GenerateBody<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub stream: bool,
}

/// A successful exchange with the summarization API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryResponse {
    pub status: u16,
    pub raw_body: String,
    /// `None` when the body lacks a string value for the summary field.
    pub parsed_summary: Option<String>,
}

impl SummaryResponse {
    /// Parse a JSON body, pulling the summary from `field`.
    ///
    /// Returns `None` if the body is not JSON at all.
    pub fn from_body(status: u16, raw_body: String, field: &str) -> Option<Self> {
        let value: serde_json::Value = serde_json::from_str(&raw_body).ok()?;
        let parsed_summary = value
            .get(field)
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());

        Some(Self {
            status,
            raw_body,
            parsed_summary,
        })
    }

    /// The summary, or the placeholder when the field was absent.
    pub fn summary(&self) -> &str {
        self.parsed_summary
            .as_deref()
            .unwrap_or(NO_SUMMARY_PLACEHOLDER)
    }

    pub fn is_degraded(&self) -> bool {
        self.parsed_summary.is_none()
    }
}
