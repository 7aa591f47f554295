// KrishiSetu - API Core
//
// Serves the central and regional scheme listings scraped by the
// scheme-scraper library, plus the embedded single-page frontend.

pub mod config;
pub mod server;

pub use config::*;
