//! Fetching raw HTML from upstream pages.
//!
//! [`HtmlFetcher`] is the seam between the extractors and the network.
//! [`HttpFetcher`] is the reqwest implementation used in production;
//! [`crate::testing::StaticFetcher`] serves canned pages in tests.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::{debug, warn};

use crate::error::{Result, ScrapeError};

/// A single GET request for an upstream page.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub url: String,
    pub timeout: Duration,
    pub headers: HeaderMap,
}

impl FetchRequest {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            timeout,
            headers: HeaderMap::new(),
        }
    }

    /// Add a request header.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Replace all request headers.
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }
}

/// Fetches the body of an upstream page as text.
#[async_trait]
pub trait HtmlFetcher: Send + Sync {
    async fn fetch(&self, request: &FetchRequest) -> Result<String>;
}

/// HTTP fetcher backed by a shared `reqwest::Client`.
///
/// The timeout is applied per request, so one client serves both sources.
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(ScrapeError::Client)?;

        Ok(Self { client })
    }

    /// Use a preconfigured client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn map_send_error(request: &FetchRequest, error: reqwest::Error) -> ScrapeError {
        if error.is_timeout() {
            ScrapeError::Timeout {
                url: request.url.clone(),
                timeout: request.timeout,
            }
        } else {
            ScrapeError::Request {
                url: request.url.clone(),
                source: error,
            }
        }
    }
}

#[async_trait]
impl HtmlFetcher for HttpFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<String> {
        debug!(url = %request.url, timeout = ?request.timeout, "HTTP fetch starting");

        let response = self
            .client
            .get(&request.url)
            .headers(request.headers.clone())
            .timeout(request.timeout)
            .send()
            .await
            .map_err(|e| {
                warn!(url = %request.url, error = %e, "HTTP request failed");
                Self::map_send_error(request, e)
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %request.url, status = %status, "HTTP error status");
            return Err(ScrapeError::Status {
                status,
                url: request.url.clone(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| Self::map_send_error(request, e))?;

        debug!(url = %request.url, status = %status, bytes = body.len(), "HTTP fetch complete");
        Ok(body)
    }
}
