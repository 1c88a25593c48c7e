//! Error types for prompt composition and the summarization API.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when calling the summarization API.
#[derive(Error, Debug)]
pub enum SummaryError {
    /// Connection-level failure - the API could not be reached.
    #[error("Summarization API unreachable: {0}")]
    Unreachable(String),

    /// Request timeout.
    #[error("Request timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    /// The API answered with a 4xx/5xx status.
    #[error("HTTP error (status {status}): {body}")]
    HttpError { status: u16, body: String },

    /// The response body is not JSON.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// The request could not be built (bad URL, bad header value).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Result type for summarization calls.
pub type SummaryResult<T> = Result<T, SummaryError>;

/// Errors that can occur while composing the prompt.
#[derive(Error, Debug)]
pub enum PromptError {
    #[error("Prompt template missing at {path}: {source}")]
    TemplateMissing {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
