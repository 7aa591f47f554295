// Main entry point for API server

use std::sync::Arc;

use anyhow::{Context, Result};
use scheme_scraper::HttpFetcher;
use server_core::{
    server::{build_app, AxumAppState},
    Config,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "info,server_core=debug,scheme_scraper=debug,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting KrishiSetu scheme API");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        central = %config.central_base_url,
        regional = %config.regional_schemes_url,
        failure_status_enabled = config.failure_status_enabled,
        "Configuration loaded"
    );

    // One HTTP client shared by both sources
    let fetcher = HttpFetcher::new().context("Failed to create HTTP client")?;
    let sources = config
        .scheme_sources(Arc::new(fetcher))
        .context("Invalid scheme source configuration")?;

    // Build application
    let app = build_app(
        AxumAppState::new(sources).with_failure_status(config.failure_status_enabled),
    );

    // Start server
    let addr = config.listen_address();
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Portal: http://localhost:{}/", config.port);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
