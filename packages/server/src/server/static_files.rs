use axum::{
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use rust_embed::RustEmbed;

const INDEX: &str = "index.html";

// Frontend page (and anything placed next to it), embedded at compile time
#[derive(RustEmbed)]
#[folder = "assets"]
pub struct PageAssets;

/// Serve the scheme portal page from embedded assets
///
/// Unknown paths fall back to index.html so the page can be deep-linked.
pub async fn serve_page(uri: Uri) -> Response {
    let path = uri.path().trim_start_matches('/');
    let path = if path.is_empty() { INDEX } else { path };

    if let Some(content) = PageAssets::get(path) {
        let mime = mime_guess::from_path(path).first_or_octet_stream();
        return ([(header::CONTENT_TYPE, mime.as_ref())], content.data).into_response();
    }

    match PageAssets::get(INDEX) {
        Some(content) => {
            ([(header::CONTENT_TYPE, "text/html; charset=utf-8")], content.data).into_response()
        }
        None => (StatusCode::NOT_FOUND, "404 Not Found").into_response(),
    }
}
