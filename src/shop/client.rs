//! HTTP client for shop pages using wreq for TLS fingerprint emulation.

use crate::shop::models::Page;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};
use wreq::Client;
use wreq_util::Emulation;

/// Default request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 15_000;

/// Fetch failures surfaced to the caller.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request to {url} timed out after {timeout_ms}ms")]
    Timeout { url: String, timeout_ms: u64 },

    #[error("Failed to send request to {url}")]
    Network {
        url: String,
        #[source]
        source: wreq::Error,
    },

    #[error("Request to {url} failed with status: {status}")]
    Status { url: String, status: u16 },

    #[error("Failed to read response body from {url}")]
    Body {
        url: String,
        #[source]
        source: wreq::Error,
    },
}

impl FetchError {
    /// Returns true if the request hit its timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Timeout { .. })
    }
}

/// A single GET request: target URL, headers, and timeout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub timeout_ms: u64,
}

impl FetchRequest {
    /// Creates a request with no extra headers and the default timeout.
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into(), headers: Vec::new(), timeout_ms: DEFAULT_TIMEOUT_MS }
    }

    /// Adds a header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sets the timeout in milliseconds.
    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

/// Trait for page fetching - enables mocking for tests.
#[async_trait]
pub trait PageFetch: Send + Sync {
    /// Fetches a page body, failing on network errors, timeouts, and non-2xx statuses.
    async fn fetch(&self, request: &FetchRequest) -> Result<Page, FetchError>;
}

/// Shop HTTP client with browser impersonation.
pub struct ShopClient {
    client: Client,
}

impl ShopClient {
    /// Creates a new client.
    pub fn new() -> anyhow::Result<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self { client })
    }

    async fn send(&self, request: &FetchRequest) -> Result<Page, FetchError> {
        let mut builder = self
            .client
            .get(&request.url)
            .emulation(Emulation::Chrome131)
            .header("Accept", "application/json,text/html;q=0.9,*/*;q=0.8")
            .header("Accept-Language", "en-US,en;q=0.9");

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder
            .send()
            .await
            .map_err(|source| FetchError::Network { url: request.url.clone(), source })?;

        let status = response.status();
        debug!("Response status: {}", status);

        if !status.is_success() {
            return Err(FetchError::Status { url: request.url.clone(), status: status.as_u16() });
        }

        let url = response.uri().to_string();
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        let body = response
            .text()
            .await
            .map_err(|source| FetchError::Body { url: request.url.clone(), source })?;

        Ok(Page { body, url, content_type })
    }
}

#[async_trait]
impl PageFetch for ShopClient {
    async fn fetch(&self, request: &FetchRequest) -> Result<Page, FetchError> {
        debug!("GET {} (timeout {}ms)", request.url, request.timeout_ms);

        let timeout = Duration::from_millis(request.timeout_ms);
        match tokio::time::timeout(timeout, self.send(request)).await {
            Ok(result) => result,
            Err(_) => {
                warn!("Request to {} timed out", request.url);
                Err(FetchError::Timeout {
                    url: request.url.clone(),
                    timeout_ms: request.timeout_ms,
                })
            }
        }
    }
}
