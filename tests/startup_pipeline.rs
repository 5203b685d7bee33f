//! Startup Pipeline Tests
//!
//! Drives a config file through favicon resolution, validation and the router,
//! with a local server standing in for the favicon service.

use std::time::Duration;

use axum::body::Body;
use axum::extract::Path;
use axum::http::{header, Request, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use tower::ServiceExt;

use searchplug::config::Config;
use searchplug::opensearch::{FaviconResolver, Registry, RegistryError, ValidationError};
use searchplug::server::{create_router, AppState};

const CONFIG: &str = r#"
[[engines]]
short_name = "crates"
long_name = "crates.io"
description = "Search Rust crates"
tags = ["rust"]

[engines.url]
template = "https://crates.io/search?q={searchTerms}"

[engines.image]
width = 16
height = 16

[[engines]]
short_name = "docs"
description = "Search docs.rs"

[engines.url]
template = "https://docs.rs/releases/search?query={searchTerms}"

[engines.image]
width = 16
height = 16

[engines.favicon]
source_domain = "rust-lang.org"
"#;

async fn icon(Path(file): Path<String>) -> impl IntoResponse {
    if file == "broken.example.ico" {
        return (StatusCode::INTERNAL_SERVER_ERROR, Vec::new()).into_response();
    }
    ([(header::CONTENT_TYPE, "image/png")], vec![0x89u8, 0x50]).into_response()
}

async fn spawn_icon_service() -> String {
    let app = Router::new().route("/:file", get(icon));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn load_config(contents: &str) -> (Config, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("searchplug.toml");
    std::fs::write(&path, contents).unwrap();
    (Config::load_from_path(&path).await.unwrap(), dir)
}

async fn get_body(app: &Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn test_config_to_served_documents() {
    let (config, _dir) = load_config(CONFIG).await;
    let resolver =
        FaviconResolver::new(spawn_icon_service().await, Some(Duration::from_secs(5))).unwrap();

    let candidates = resolver.resolve_all(config.engines.clone()).await;
    let registry = Registry::load(candidates).unwrap();
    assert_eq!(registry.len(), 2);

    let crates = registry.find_by_short_name("crates").unwrap();
    assert_eq!(crates.image.data, "data:image/png;base64,iVA=");

    let app = create_router(AppState::new(registry));

    let (status, html) = get_body(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(html.matches("<link rel=\"search\"").count(), 2);
    assert!(html.find("title=\"crates.io\"").unwrap() < html.find("title=\"docs\"").unwrap());

    let (status, xml) = get_body(&app, "/descriptor/docs").await;
    assert_eq!(status, StatusCode::OK);
    assert!(xml.contains("<ShortName>docs</ShortName>"));
    assert!(xml.contains("<Description>Search docs.rs</Description>"));
    assert!(xml.contains("base64,iVA=</Image>"));

    let (status, _) = get_body(&app, "/descriptor/crates.io").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_one_failed_favicon_rejects_all_engines() {
    let broken = CONFIG.replace("rust-lang.org", "broken.example");
    let (config, _dir) = load_config(&broken).await;
    let resolver =
        FaviconResolver::new(spawn_icon_service().await, Some(Duration::from_secs(5))).unwrap();

    let candidates = resolver.resolve_all(config.engines.clone()).await;
    assert!(candidates[0].favicon.is_ok());
    assert!(candidates[1].favicon.is_err());

    let err = Registry::load(candidates).unwrap_err();
    let RegistryError::Invalid {
        short_name, source, ..
    } = err;
    assert_eq!(short_name, "docs");
    assert!(matches!(source, ValidationError::Favicon(_)));
}
