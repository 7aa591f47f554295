//! Testing utilities.
//!
//! [`StaticFetcher`] serves canned HTML by URL so the extractors and the
//! HTTP API can be exercised without network access.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::error::{Result, ScrapeError};
use crate::fetcher::{FetchRequest, HtmlFetcher};

#[derive(Debug, Clone)]
enum CannedResponse {
    Page(String),
    Status(reqwest::StatusCode),
    Timeout,
}

/// A fetcher that answers from a fixed table of pages.
///
/// Unknown URLs answer with `404 Not Found`. Every request is recorded for
/// assertions.
#[derive(Default, Clone)]
pub struct StaticFetcher {
    responses: Arc<RwLock<HashMap<String, CannedResponse>>>,
    calls: Arc<RwLock<Vec<FetchRequest>>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `html` for `url`.
    pub fn with_page(self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.insert(url.into(), CannedResponse::Page(html.into()));
        self
    }

    /// Answer `url` with a non-success status.
    pub fn with_status(self, url: impl Into<String>, status: reqwest::StatusCode) -> Self {
        self.insert(url.into(), CannedResponse::Status(status));
        self
    }

    /// Answer `url` as if the request timed out.
    pub fn with_timeout(self, url: impl Into<String>) -> Self {
        self.insert(url.into(), CannedResponse::Timeout);
        self
    }

    /// Requests received so far, oldest first.
    pub fn calls(&self) -> Vec<FetchRequest> {
        self.calls.read().unwrap().clone()
    }

    fn insert(&self, url: String, response: CannedResponse) {
        self.responses.write().unwrap().insert(url, response);
    }
}

#[async_trait]
impl HtmlFetcher for StaticFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<String> {
        self.calls.write().unwrap().push(request.clone());

        let response = self.responses.read().unwrap().get(&request.url).cloned();
        match response {
            Some(CannedResponse::Page(html)) => Ok(html),
            Some(CannedResponse::Status(status)) => Err(ScrapeError::Status {
                status,
                url: request.url.clone(),
            }),
            Some(CannedResponse::Timeout) => Err(ScrapeError::Timeout {
                url: request.url.clone(),
                timeout: request.timeout,
            }),
            None => Err(ScrapeError::Status {
                status: reqwest::StatusCode::NOT_FOUND,
                url: request.url.clone(),
            }),
        }
    }
}
