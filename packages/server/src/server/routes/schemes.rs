//! Scheme listing endpoints.
//!
//! Both endpoints always answer with a `{category, schemes}` body. A failed
//! scrape becomes a single placeholder record; the status code stays 200
//! unless `failure_status_enabled` is set, in which case it is 502.

use axum::{extract::Extension, http::StatusCode, Json};
use scheme_scraper::{
    Category, CentralScheme, ErrorPlaceholder, RegionalScheme, SchemeListing, ScrapeError,
};

use crate::server::app::AxumAppState;

/// GET /schemes/central
pub async fn central_schemes_handler(
    Extension(state): Extension<AxumAppState>,
) -> (StatusCode, Json<SchemeListing<CentralScheme>>) {
    let result = state.sources.central_schemes().await;
    listing_response(&state, Category::Central, result)
}

/// GET /schemes/karnataka
pub async fn karnataka_schemes_handler(
    Extension(state): Extension<AxumAppState>,
) -> (StatusCode, Json<SchemeListing<RegionalScheme>>) {
    let result = state.sources.regional_schemes().await;
    listing_response(&state, Category::Karnataka, result)
}

fn listing_response<T: ErrorPlaceholder>(
    state: &AxumAppState,
    category: Category,
    result: Result<Vec<T>, ScrapeError>,
) -> (StatusCode, Json<SchemeListing<T>>) {
    match result {
        Ok(schemes) => (StatusCode::OK, Json(SchemeListing::new(category, schemes))),
        Err(e) => {
            tracing::warn!(
                category = %category,
                error = %e,
                transport = e.is_transport(),
                "Scheme scrape failed"
            );

            let status = if state.failure_status_enabled {
                StatusCode::BAD_GATEWAY
            } else {
                StatusCode::OK
            };
            (status, Json(SchemeListing::failed(category, &e)))
        }
    }
}
