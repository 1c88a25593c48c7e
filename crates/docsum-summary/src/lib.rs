//! Docsum Summary - Prompt composition and the summarization API client.
//!
//! The remote API takes `{model, prompt, stream: false}` with a bearer token
//! and answers with a JSON object carrying the summary in a named field.

mod client;
mod error;
mod prompt;
mod types;

pub use client::SummaryClient;
pub use error::{PromptError, SummaryError, SummaryResult};
pub use prompt::{compose, PromptComposer};
pub use types::{SummaryRequest, SummaryResponse, NO_SUMMARY_PLACEHOLDER};
