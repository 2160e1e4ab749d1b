//! /redirect-to

use crate::helpers::*;
use reqwest::{Method, StatusCode};

#[tokio::test]
async fn test_get_redirect_default_status() {
    let server = TestServer::start().await;
    let resp = server.get("/redirect-to?url=http%3A%2F%2Fexample.com%2F").await;

    assert_status(&resp, StatusCode::FOUND);
    assert_header(&resp, "location", "http://example.com/");
    assert!(resp.bytes().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_get_redirect_custom_status() {
    let server = TestServer::start().await;

    let resp = server.get("/redirect-to?url=/get&status_code=307").await;
    assert_status(&resp, StatusCode::TEMPORARY_REDIRECT);
    assert_header(&resp, "location", "/get");

    // Out of range falls back to 302
    let resp = server.get("/redirect-to?url=/get&status_code=200").await;
    assert_status(&resp, StatusCode::FOUND);
}

#[tokio::test]
async fn test_get_redirect_without_url() {
    let server = TestServer::start().await;

    let resp = server.get("/redirect-to").await;
    assert_status(&resp, StatusCode::NOT_FOUND);

    let resp = server.get("/redirect-to?url=").await;
    assert_status(&resp, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_form_redirect() {
    let server = TestServer::start().await;

    let resp = server
        .send_form(
            Method::POST,
            "/redirect-to",
            &[("url", "https://example.org"), ("status_code", "303")],
        )
        .await;
    assert_status(&resp, StatusCode::SEE_OTHER);
    assert_header(&resp, "location", "https://example.org");

    // Query string is the fallback
    let resp = server
        .request(Method::PUT, "/redirect-to?url=/put")
        .send()
        .await
        .unwrap();
    assert_status(&resp, StatusCode::FOUND);
    assert_header(&resp, "location", "/put");
}

#[tokio::test]
async fn test_form_redirect_without_url_echoes() {
    let server = TestServer::start().await;
    let resp = server
        .send_form(Method::PATCH, "/redirect-to", &[("other", "1")])
        .await;

    assert_status(&resp, StatusCode::OK);
    let json: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(json["data"]["other"], serde_json::json!(["1"]));
}
