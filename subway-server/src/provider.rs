//! Shared plumbing for the external HTTP data providers.
//!
//! Every provider is a keyed JSON-over-GET service. Requests go through a
//! semaphore so a burst of queries cannot exceed the provider's rate limits,
//! and each client has its own timeout.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;
use tracing::debug;

/// Errors from the provider HTTP clients.
///
/// Component boundaries turn all of these into "no data" after logging them.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider returned a non-success HTTP status
    #[error("API error {status}: {message}")]
    Status { status: u16, message: String },

    /// Provider answered 200 but its envelope reports a failure
    #[error("provider error {code}: {message}")]
    Provider { code: String, message: String },

    /// Response body was not the expected JSON
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// No API key is configured for this provider
    #[error("not configured: {0}")]
    NotConfigured(String),
}

/// Rate-limited JSON fetcher shared by the provider clients.
#[derive(Debug, Clone)]
pub(crate) struct HttpProvider {
    http: reqwest::Client,
    semaphore: Arc<Semaphore>,
}

impl HttpProvider {
    pub(crate) fn new(timeout_secs: u64, max_concurrent: usize) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            http,
            semaphore: Arc::new(Semaphore::new(max_concurrent)),
        })
    }

    /// GET `url` with `query` and decode the body as `T`.
    ///
    /// Provider keys travel in the URL, so transport errors are stripped of
    /// it before they can reach a log line.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ProviderError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| ProviderError::Status {
                status: 0,
                message: "semaphore closed".to_string(),
            })?;

        let response = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| ProviderError::Http(e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Http(e.without_url()))?;
        debug!(bytes = body.len(), "provider response");

        parse_body(&body)
    }
}

/// Decode a provider body, keeping a prefix of it for diagnostics.
pub(crate) fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T, ProviderError> {
    serde_json::from_str(body).map_err(|e| ProviderError::Json {
        message: e.to_string(),
        body: Some(body.chars().take(500).collect()),
    })
}
