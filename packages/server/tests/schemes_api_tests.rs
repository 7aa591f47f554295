use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use scheme_scraper::regional::MAX_DEPTH;
use scheme_scraper::testing::StaticFetcher;
use scheme_scraper::HttpFetcher;
use serde_json::{json, Value};
use server_core::server::{build_app, AxumAppState};
use server_core::Config;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CENTRAL_URL: &str = "https://central.test/en/Major";
const REGIONAL_URL: &str = "https://regional.test/english";

const CENTRAL_HTML: &str = r#"<table><tr><td/><td/><td/><td/></tr><tr><td>1</td><td>Title</td><td>2024-01-01</td><td><a href="/s/1">x</a></td></tr></table>"#;

const REGIONAL_HTML: &str = r#"
<html><body>
  <nav><ul><li><a href="/home">Home</a></li></ul></nav>
  <h2>e-Services and Schemes</h2>
  <ul>
    <li><a href="/a">A</a>
      <ul>
        <li><a href="/b">B</a>
          <ul><li><a href="c">C</a></li></ul>
        </li>
      </ul>
    </li>
    <li><a href="/d">D</a></li>
  </ul>
</body></html>"#;

fn test_config() -> Config {
    Config {
        central_base_url: "https://central.test".to_string(),
        regional_schemes_url: REGIONAL_URL.to_string(),
        regional_base_url: "https://regional.test/".to_string(),
        ..Config::default()
    }
}

fn app_with(fetcher: StaticFetcher, failure_status_enabled: bool) -> Router {
    let sources = test_config().scheme_sources(Arc::new(fetcher)).unwrap();
    build_app(AxumAppState::new(sources).with_failure_status(failure_status_enabled))
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_central_endpoint_returns_listing() {
    let app = app_with(StaticFetcher::new().with_page(CENTRAL_URL, CENTRAL_HTML), false);

    let (status, body) = get(app, "/schemes/central").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "category": "central",
            "schemes": [{"title": "Title", "date": "2024-01-01", "link": "https://central.test/s/1"}]
        })
    );
}

#[tokio::test]
async fn test_karnataka_endpoint_returns_tree() {
    let app = app_with(StaticFetcher::new().with_page(REGIONAL_URL, REGIONAL_HTML), false);

    let (status, body) = get(app, "/schemes/karnataka").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "category": "karnataka",
            "schemes": [
                {
                    "title": "A",
                    "link": "https://regional.test/a",
                    "children": [{
                        "title": "B",
                        "link": "https://regional.test/b",
                        "children": [{"title": "C", "link": "https://regional.test/c", "children": []}]
                    }]
                },
                {"title": "D", "link": "https://regional.test/d", "children": []}
            ]
        })
    );
}

#[tokio::test]
async fn test_central_timeout_is_placeholder_with_ok_status() {
    let app = app_with(StaticFetcher::new().with_timeout(CENTRAL_URL), false);

    let (status, body) = get(app, "/schemes/central").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "category": "central",
            "schemes": [{
                "title": "Error fetching data: request to https://central.test/en/Major timed out after 10s",
                "date": "",
                "link": "#"
            }]
        })
    );
}

#[tokio::test]
async fn test_karnataka_failure_is_placeholder() {
    let app = app_with(
        StaticFetcher::new().with_status(REGIONAL_URL, StatusCode::FORBIDDEN),
        false,
    );

    let (status, body) = get(app, "/schemes/karnataka").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "category": "karnataka",
            "schemes": [{
                "title": "Error fetching data: HTTP 403 Forbidden for https://regional.test/english",
                "link": "#",
                "children": []
            }]
        })
    );
}

#[tokio::test]
async fn test_failure_status_mode_returns_bad_gateway() {
    let app = app_with(StaticFetcher::new().with_timeout(CENTRAL_URL), true);

    let (status, body) = get(app, "/schemes/central").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["category"], "central");
    assert_eq!(body["schemes"][0]["link"], "#");
}

#[tokio::test]
async fn test_failure_status_mode_keeps_ok_on_success() {
    let app = app_with(StaticFetcher::new().with_page(CENTRAL_URL, CENTRAL_HTML), true);

    let (status, _) = get(app, "/schemes/central").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_structure_mismatch_is_empty_not_error() {
    let app = app_with(
        StaticFetcher::new()
            .with_page(CENTRAL_URL, "<p>Page redesigned</p>")
            .with_page(REGIONAL_URL, "<h2>About us</h2><ul><li><a href='/x'>X</a></li></ul>"),
        false,
    );

    let (_, central) = get(app.clone(), "/schemes/central").await;
    let (_, regional) = get(app, "/schemes/karnataka").await;

    assert_eq!(central, json!({"category": "central", "schemes": []}));
    assert_eq!(regional, json!({"category": "karnataka", "schemes": []}));
}

#[tokio::test]
async fn test_deeply_nested_menu_is_truncated() {
    let html = format!(
        "<h2>SERVICES AND SCHEMES</h2>{}",
        r#"<ul><li><a href="/x">x</a>"#.repeat(10_000)
    );
    let app = app_with(StaticFetcher::new().with_page(REGIONAL_URL, html), false);

    let (status, body) = get(app, "/schemes/karnataka").await;

    assert_eq!(status, StatusCode::OK);
    let mut levels = 0;
    let mut node = &body["schemes"];
    while let Some(first) = node.get(0) {
        assert_eq!(first["link"], "https://regional.test/x");
        levels += 1;
        node = &first["children"];
    }
    assert_eq!(levels, MAX_DEPTH);
}

#[tokio::test]
async fn test_each_request_fetches_again() {
    let fetcher = StaticFetcher::new().with_page(CENTRAL_URL, CENTRAL_HTML);
    let app = app_with(fetcher.clone(), false);

    get(app.clone(), "/schemes/central").await;
    get(app, "/schemes/central").await;

    assert_eq!(fetcher.calls().len(), 2);
}

#[tokio::test]
async fn test_cors_allows_any_origin_with_credentials() {
    let app = app_with(StaticFetcher::new().with_page(CENTRAL_URL, CENTRAL_HTML), false);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/schemes/central")
                .header(header::ORIGIN, "https://farmer.example")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "https://farmer.example"
    );
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
        "true"
    );
}

#[tokio::test]
async fn test_cors_preflight_mirrors_request() {
    let app = app_with(StaticFetcher::new(), false);

    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/schemes/karnataka")
                .header(header::ORIGIN, "https://farmer.example")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "DELETE")
                .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "x-custom")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(headers.get(header::ACCESS_CONTROL_ALLOW_METHODS).unwrap(), "DELETE");
    assert_eq!(headers.get(header::ACCESS_CONTROL_ALLOW_HEADERS).unwrap(), "x-custom");
}

#[tokio::test]
async fn test_health() {
    let (status, body) = get(app_with(StaticFetcher::new(), false), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_index_page_served() {
    let app = app_with(StaticFetcher::new(), false);

    for uri in ["/", "/some/deep/link"] {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers().get(header::CONTENT_TYPE).unwrap();
        assert!(content_type.to_str().unwrap().starts_with("text/html"));

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("/schemes/${category}"));
        assert!(html.contains("loadSchemes('central')"));
    }
}

#[tokio::test]
async fn test_live_http_upstream_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/en/Major"))
        .respond_with(ResponseTemplate::new(200).set_body_string(CENTRAL_HTML))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/english"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(REGIONAL_HTML)
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let config = Config::from_lookup(|key| match key {
        "CENTRAL_BASE_URL" => Some(server.uri()),
        "REGIONAL_SCHEMES_URL" => Some(format!("{}/english", server.uri())),
        "REGIONAL_BASE_URL" => Some(format!("{}/", server.uri())),
        "REGIONAL_TIMEOUT_SECS" => Some("1".to_string()),
        _ => None,
    })
    .unwrap();
    let sources = config
        .scheme_sources(Arc::new(HttpFetcher::new().unwrap()))
        .unwrap();
    let app = build_app(AxumAppState::new(sources));

    let (status, central) = get(app.clone(), "/schemes/central").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(central["schemes"][0]["link"], format!("{}/s/1", server.uri()));

    let (status, regional) = get(app, "/schemes/karnataka").await;
    assert_eq!(status, StatusCode::OK);
    let title = regional["schemes"][0]["title"].as_str().unwrap();
    assert!(title.starts_with("Error fetching data: "), "got {title}");
    assert!(title.contains("timed out after 1s"));
}
