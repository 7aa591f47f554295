use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use dotenvy::dotenv;
use scheme_scraper::source::{
    DEFAULT_CENTRAL_BASE_URL, DEFAULT_CENTRAL_SCHEMES_PATH, DEFAULT_CENTRAL_TIMEOUT,
    DEFAULT_REGIONAL_BASE_URL, DEFAULT_REGIONAL_SCHEMES_URL, DEFAULT_REGIONAL_TIMEOUT,
};
use scheme_scraper::{CentralSourceConfig, HtmlFetcher, RegionalSourceConfig, SchemeSources};

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: IpAddr,
    pub port: u16,
    pub central_base_url: String,
    pub central_schemes_path: String,
    pub central_timeout: Duration,
    pub regional_schemes_url: String,
    pub regional_base_url: String,
    pub regional_timeout: Duration,
    /// Answer failed scrapes with 502 instead of 200 (payload is unchanged)
    pub failure_status_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8080,
            central_base_url: DEFAULT_CENTRAL_BASE_URL.to_string(),
            central_schemes_path: DEFAULT_CENTRAL_SCHEMES_PATH.to_string(),
            central_timeout: DEFAULT_CENTRAL_TIMEOUT,
            regional_schemes_url: DEFAULT_REGIONAL_SCHEMES_URL.to_string(),
            regional_base_url: DEFAULT_REGIONAL_BASE_URL.to_string(),
            regional_timeout: DEFAULT_REGIONAL_TIMEOUT,
            failure_status_enabled: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup. Missing keys fall
    /// back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            bind_address: ip_or(&lookup, "BIND_ADDRESS", defaults.bind_address)?,
            port: parse_or(&lookup, "PORT", defaults.port)?,
            central_base_url: lookup("CENTRAL_BASE_URL").unwrap_or(defaults.central_base_url),
            central_schemes_path: lookup("CENTRAL_SCHEMES_PATH")
                .unwrap_or(defaults.central_schemes_path),
            central_timeout: timeout_or(&lookup, "CENTRAL_TIMEOUT_SECS", defaults.central_timeout)?,
            regional_schemes_url: lookup("REGIONAL_SCHEMES_URL")
                .unwrap_or(defaults.regional_schemes_url),
            regional_base_url: lookup("REGIONAL_BASE_URL").unwrap_or(defaults.regional_base_url),
            regional_timeout: timeout_or(
                &lookup,
                "REGIONAL_TIMEOUT_SECS",
                defaults.regional_timeout,
            )?,
            failure_status_enabled: flag_or(
                &lookup,
                "FAILURE_STATUS_ENABLED",
                defaults.failure_status_enabled,
            )?,
        })
    }

    pub fn listen_address(&self) -> SocketAddr {
        SocketAddr::from((self.bind_address, self.port))
    }

    /// Scheme sources wired to the configured upstreams.
    pub fn scheme_sources(&self, fetcher: Arc<dyn HtmlFetcher>) -> Result<SchemeSources> {
        let regional = RegionalSourceConfig::new(
            self.regional_schemes_url.clone(),
            &self.regional_base_url,
            self.regional_timeout,
        )
        .context("REGIONAL_BASE_URL must be an absolute URL")?;

        Ok(SchemeSources::new(fetcher)
            .with_central(CentralSourceConfig {
                base_url: self.central_base_url.clone(),
                schemes_path: self.central_schemes_path.clone(),
                timeout: self.central_timeout,
            })
            .with_regional(regional))
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a valid number")),
        None => Ok(default),
    }
}

fn ip_or(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: IpAddr,
) -> Result<IpAddr> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} must be an IP address, got {raw:?}")),
        None => Ok(default),
    }
}

fn timeout_or(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: Duration,
) -> Result<Duration> {
    let secs: u64 = parse_or(lookup, key, default.as_secs())?;
    if secs == 0 {
        bail!("{key} must be greater than zero");
    }
    Ok(Duration::from_secs(secs))
}

fn flag_or(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: bool) -> Result<bool> {
    match lookup(key).map(|raw| raw.trim().to_ascii_lowercase()) {
        None => Ok(default),
        Some(raw) => match raw.as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => bail!("{key} must be true or false, got {raw:?}"),
        },
    }
}
