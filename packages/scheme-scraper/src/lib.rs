//! Government scheme scraping library.
//!
//! Fetches the upstream listing pages and turns their HTML into typed scheme
//! records. Two sources are supported:
//!
//! - **Central**: a flat table of national schemes (title, date, link)
//! - **Regional**: a nested menu of state schemes, returned as a tree
//!
//! # Usage
//!
//! ```rust,ignore
//! use scheme_scraper::{HttpFetcher, SchemeSources};
//! use std::sync::Arc;
//!
//! let sources = SchemeSources::new(Arc::new(HttpFetcher::new()?));
//!
//! let central = sources.central_schemes().await?;
//! let regional = sources.regional_schemes().await?;
//! ```
//!
//! # Modules
//!
//! - [`central`] - Flat table extractor
//! - [`regional`] - Recursive nested-list extractor
//! - [`fetcher`] - `HtmlFetcher` trait and the reqwest implementation
//! - [`source`] - Fetch + extract per category
//! - [`testing`] - Canned-response fetcher for tests

pub mod central;
pub mod error;
pub mod fetcher;
pub mod regional;
pub mod source;
pub mod testing;
pub mod types;

mod text;

pub use central::extract_central_schemes;
pub use error::{Result, ScrapeError};
pub use fetcher::{FetchRequest, HtmlFetcher, HttpFetcher};
pub use regional::{extract_regional_schemes, MARKER_PHRASE};
pub use source::{CentralSourceConfig, RegionalSourceConfig, SchemeSources};
pub use types::{Category, CentralScheme, ErrorPlaceholder, RegionalScheme, SchemeListing};
