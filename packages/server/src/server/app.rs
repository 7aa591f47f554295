//! Application setup and server configuration.

use std::sync::Arc;

use axum::{extract::Extension, routing::get, Router};
use scheme_scraper::SchemeSources;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::server::routes::{central_schemes_handler, health_handler, karnataka_schemes_handler};
use crate::server::static_files::serve_page;

/// Shared application state
///
/// Read-only after startup; handlers never mutate it.
#[derive(Clone)]
pub struct AxumAppState {
    pub sources: Arc<SchemeSources>,
    pub failure_status_enabled: bool,
}

impl AxumAppState {
    pub fn new(sources: SchemeSources) -> Self {
        Self {
            sources: Arc::new(sources),
            failure_status_enabled: false,
        }
    }

    pub fn with_failure_status(mut self, enabled: bool) -> Self {
        self.failure_status_enabled = enabled;
        self
    }
}

/// Build the Axum application router
pub fn build_app(state: AxumAppState) -> Router {
    // CORS: any origin, method and header, with credentials. Mirroring the
    // request is required because wildcards cannot be combined with
    // credentials.
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true);

    Router::new()
        .route("/schemes/central", get(central_schemes_handler))
        .route("/schemes/karnataka", get(karnataka_schemes_handler))
        .route("/health", get(health_handler))
        .route("/", get(serve_page))
        .fallback(serve_page)
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(Extension(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
