//! Fetch-then-extract for each scheme category.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, USER_AGENT};
use tracing::info;
use url::Url;

use crate::central::extract_central_schemes;
use crate::error::{Result, ScrapeError};
use crate::fetcher::{FetchRequest, HtmlFetcher};
use crate::regional::extract_regional_schemes;
use crate::types::{CentralScheme, RegionalScheme};

pub const DEFAULT_CENTRAL_BASE_URL: &str = "https://agriwelfare.gov.in";
pub const DEFAULT_CENTRAL_SCHEMES_PATH: &str = "/en/Major";
pub const DEFAULT_CENTRAL_TIMEOUT: Duration = Duration::from_secs(10);

pub const DEFAULT_REGIONAL_SCHEMES_URL: &str = "https://raitamitra.karnataka.gov.in/english";
pub const DEFAULT_REGIONAL_BASE_URL: &str = "https://raitamitra.karnataka.gov.in/";
pub const DEFAULT_REGIONAL_TIMEOUT: Duration = Duration::from_secs(15);

// The regional portal serves a different page to non-browser clients.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const BROWSER_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// Where and how to fetch the national scheme table.
#[derive(Debug, Clone)]
pub struct CentralSourceConfig {
    /// Prefix for both the page URL and every scheme link.
    pub base_url: String,
    pub schemes_path: String,
    pub timeout: Duration,
}

impl CentralSourceConfig {
    pub fn page_url(&self) -> String {
        format!("{}{}", self.base_url, self.schemes_path)
    }
}

impl Default for CentralSourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_CENTRAL_BASE_URL.to_string(),
            schemes_path: DEFAULT_CENTRAL_SCHEMES_PATH.to_string(),
            timeout: DEFAULT_CENTRAL_TIMEOUT,
        }
    }
}

/// Where and how to fetch the regional scheme menu.
#[derive(Debug, Clone)]
pub struct RegionalSourceConfig {
    pub page_url: String,
    /// Base that scheme hrefs are joined against.
    pub base_url: Url,
    pub timeout: Duration,
}

impl RegionalSourceConfig {
    pub fn new(page_url: impl Into<String>, base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|source| ScrapeError::InvalidUrl {
            url: base_url.to_string(),
            source,
        })?;

        Ok(Self {
            page_url: page_url.into(),
            base_url,
            timeout,
        })
    }

    fn browser_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static(BROWSER_ACCEPT_LANGUAGE),
        );
        headers
    }
}

impl Default for RegionalSourceConfig {
    fn default() -> Self {
        Self {
            page_url: DEFAULT_REGIONAL_SCHEMES_URL.to_string(),
            base_url: Url::parse(DEFAULT_REGIONAL_BASE_URL)
                .expect("default regional base URL is valid"),
            timeout: DEFAULT_REGIONAL_TIMEOUT,
        }
    }
}

/// Both scheme sources behind one fetcher.
///
/// Holds no mutable state; every call fetches and parses from scratch.
#[derive(Clone)]
pub struct SchemeSources {
    fetcher: Arc<dyn HtmlFetcher>,
    central: CentralSourceConfig,
    regional: RegionalSourceConfig,
}

impl SchemeSources {
    /// Sources pointing at the live upstream sites.
    pub fn new(fetcher: Arc<dyn HtmlFetcher>) -> Self {
        Self {
            fetcher,
            central: CentralSourceConfig::default(),
            regional: RegionalSourceConfig::default(),
        }
    }

    pub fn with_central(mut self, central: CentralSourceConfig) -> Self {
        self.central = central;
        self
    }

    pub fn with_regional(mut self, regional: RegionalSourceConfig) -> Self {
        self.regional = regional;
        self
    }

    pub fn central_config(&self) -> &CentralSourceConfig {
        &self.central
    }

    pub fn regional_config(&self) -> &RegionalSourceConfig {
        &self.regional
    }

    /// Fetch the national listing and extract its table rows.
    pub async fn central_schemes(&self) -> Result<Vec<CentralScheme>> {
        let request = FetchRequest::new(self.central.page_url(), self.central.timeout);
        let html = self.fetcher.fetch(&request).await?;

        let schemes = extract_central_schemes(&html, &self.central.base_url);
        info!(url = %request.url, count = schemes.len(), "Central schemes scraped");
        Ok(schemes)
    }

    /// Fetch the regional portal and extract its scheme tree.
    pub async fn regional_schemes(&self) -> Result<Vec<RegionalScheme>> {
        let request = FetchRequest::new(self.regional.page_url.clone(), self.regional.timeout)
            .with_headers(RegionalSourceConfig::browser_headers());
        let html = self.fetcher.fetch(&request).await?;

        let schemes = extract_regional_schemes(&html, &self.regional.base_url);
        info!(url = %request.url, count = schemes.len(), "Regional schemes scraped");
        Ok(schemes)
    }
}
