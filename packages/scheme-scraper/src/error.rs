//! Typed errors for the scheme scraper.
//!
//! The `Display` output of every variant is what ends up in the error
//! placeholder record, so messages are kept short and self-contained.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while fetching an upstream listing page.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Connection, TLS or body read failure
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Upstream did not answer within the configured timeout
    #[error("request to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },

    /// Upstream answered with a non-2xx status
    #[error("HTTP {status} for {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    /// Configured URL could not be parsed
    #[error("invalid URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// HTTP client could not be constructed
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl ScrapeError {
    /// True for failures that happened on the network path (timeouts,
    /// connection errors, upstream status codes).
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Request { .. } | Self::Timeout { .. } | Self::Status { .. }
        )
    }
}

/// Result type alias for scraper operations.
pub type Result<T> = std::result::Result<T, ScrapeError>;
