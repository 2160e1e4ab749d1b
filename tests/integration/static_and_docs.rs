//! Documentation page, /static/ files, API docs root and 404s.

use crate::helpers::*;
use reqwest::StatusCode;

#[tokio::test]
async fn test_index_page() {
    let server = TestServer::start().await;
    let resp = server.get("/").await;

    assert_status(&resp, StatusCode::OK);
    assert_header(&resp, "content-type", "text/html; charset=utf-8");

    let body = resp.text().await.unwrap();
    assert!(body.contains("tokio_httpbin"));
    assert!(body.contains("href=\"/basic-auth/user/passwd\""));
    assert!(body.contains(tokio_httpbin::PKG_VERSION));
    assert!(!body.contains("{{ route_catalog }}"));
    assert!(!body.contains("{{ version }}"));
}

#[tokio::test]
async fn test_legacy_page_keeps_html_type() {
    let server = TestServer::start().await;
    let resp = server.get("/legacy").await;

    assert_status(&resp, StatusCode::OK);
    assert_header_starts_with(&resp, "content-type", "text/html");
}

#[tokio::test]
async fn test_static_file() {
    let server = TestServer::start().await;
    let resp = server.get("/static/images/svg_logo.svg").await;

    assert_status(&resp, StatusCode::OK);
    assert_header(&resp, "content-type", "image/svg+xml");
    assert_body_contains(resp, "<svg").await;
}

#[tokio::test]
async fn test_api_docs_root() {
    let server = TestServer::start().await;
    let resp = server.get("/index.html").await;

    assert_status(&resp, StatusCode::OK);
    assert_header_starts_with(&resp, "content-type", "text/html");
    assert_body_contains(resp, "API docs").await;
}

#[tokio::test]
async fn test_traversal_is_not_found() {
    let server = TestServer::start().await;
    let resp = server.get("/static/..%2fCargo.toml").await;
    assert_status(&resp, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_path() {
    let server = TestServer::start().await;
    let resp = server.get("/definitely/not/here").await;

    assert_status(&resp, StatusCode::NOT_FOUND);
    assert_header(&resp, "content-type", "text/plain; charset=utf-8");
    assert_eq!(resp.text().await.unwrap(), "Not Found");
}
