//! Summarization API HTTP client.

use crate::error::{SummaryError, SummaryResult};
use crate::types::{SummaryRequest, SummaryResponse};
use docsum_config::Config;
use reqwest::header::HeaderMap;
use reqwest::Client;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{info, warn};

/// Client for the summarization API.
#[derive(Clone)]
pub struct SummaryClient {
    client: Client,
    timeout: Duration,
    summary_field: String,
}

impl SummaryClient {
    /// Create a new client from configuration.
    pub fn from_config(config: &Config) -> SummaryResult<Self> {
        Self::new(
            Duration::from_secs(config.request.timeout_seconds),
            &config.request.summary_field,
        )
    }

    /// Create a client with an explicit timeout and summary field.
    pub fn new(timeout: Duration, summary_field: impl Into<String>) -> SummaryResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SummaryError::InvalidRequest(e.to_string()))?;

        Ok(Self {
            client,
            timeout,
            summary_field: summary_field.into(),
        })
    }

    pub fn summary_field(&self) -> &str {
        &self.summary_field
    }

    /// POST the prompt and return the parsed response.
    ///
    /// A body without the summary field is still `Ok`; see
    /// [`SummaryResponse::summary`].
    pub async fn summarize(&self, request: &SummaryRequest) -> SummaryResult<SummaryResponse> {
        let body = request.body();
        let payload = serde_json::to_string_pretty(&body)
            .map_err(|e| SummaryError::InvalidRequest(e.to_string()))?;

        info!("Sending request to API: {}", request.api_url);
        info!("Request headers: {}", redacted_request_headers());
        info!("Request payload: {}", payload);

        let response = self
            .client
            .post(&request.api_url)
            .bearer_auth(&request.bearer_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        let headers = format_headers(response.headers());
        let raw_body = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        info!("Response status code: {}", status.as_u16());
        info!("Response headers: {}", headers);
        info!("Response content: {}", raw_body);

        if status.is_client_error() || status.is_server_error() {
            return Err(SummaryError::HttpError {
                status: status.as_u16(),
                body: raw_body,
            });
        }

        let parsed = SummaryResponse::from_body(status.as_u16(), raw_body, &self.summary_field)
            .ok_or_else(|| {
                SummaryError::MalformedResponse(format!(
                    "response from {} is not valid JSON",
                    request.api_url
                ))
            })?;

        if parsed.is_degraded() {
            warn!(
                "Response has no '{}' field, using placeholder summary",
                self.summary_field
            );
        }

        Ok(parsed)
    }

    fn map_transport_error(&self, e: reqwest::Error) -> SummaryError {
        if e.is_timeout() {
            SummaryError::Timeout {
                seconds: self.timeout.as_secs(),
            }
        } else if e.is_builder() {
            SummaryError::InvalidRequest(e.to_string())
        } else {
            SummaryError::Unreachable(e.to_string())
        }
    }
}

fn redacted_request_headers() -> String {
    let headers = BTreeMap::from([
        ("Authorization", "Bearer ***"),
        ("Content-Type", "application/json"),
    ]);
    serde_json::to_string_pretty(&headers).unwrap_or_default()
}

fn format_headers(headers: &HeaderMap) -> String {
    let map: BTreeMap<&str, String> = headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();
    serde_json::to_string_pretty(&map).unwrap_or_default()
}
