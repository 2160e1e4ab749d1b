//! Method echo endpoints: /get, /post, /put, /patch, /delete.

use crate::helpers::*;
use reqwest::{Method, StatusCode};

#[tokio::test]
async fn test_get_echo() {
    let server = TestServer::start().await;
    let resp = server.get("/get?a=1&a=2&b=x%20y").await;

    assert_status(&resp, StatusCode::OK);
    assert_header(&resp, "content-type", "application/json");

    let json: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(json["args"]["a"], "1");
    assert_eq!(json["args"]["b"], "x y");
    assert_eq!(json["origin"], "127.0.0.1");
    assert_eq!(json["url"], server.url("/get?a=1&a=2&b=x%20y"));
    assert!(json["headers"]["Host"].as_str().unwrap().starts_with("127.0.0.1:"));
    assert!(json.get("data").is_none());
}

#[tokio::test]
async fn test_write_methods_echo_form_data() {
    let server = TestServer::start().await;

    for (method, path) in [
        (Method::POST, "/post"),
        (Method::PUT, "/put"),
        (Method::PATCH, "/patch"),
    ] {
        let resp = server
            .send_form(method.clone(), path, &[("name", "alice"), ("tag", "a"), ("tag", "b")])
            .await;
        assert_status(&resp, StatusCode::OK);

        let json: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(json["data"]["name"], serde_json::json!(["alice"]), "{}", method);
        assert_eq!(json["data"]["tag"], serde_json::json!(["a", "b"]), "{}", method);
        assert_eq!(
            json["headers"]["Content-Type"],
            "application/x-www-form-urlencoded"
        );
    }
}

#[tokio::test]
async fn test_non_form_body_gives_empty_data() {
    let server = TestServer::start().await;
    let resp = server
        .request(Method::POST, "/post")
        .header("content-type", "application/json")
        .body(r#"{"a":1}"#)
        .send()
        .await
        .unwrap();

    assert_status(&resp, StatusCode::OK);
    let json: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(json["data"], serde_json::json!({}));
}

#[tokio::test]
async fn test_delete_has_no_data() {
    let server = TestServer::start().await;
    let resp = server
        .request(Method::DELETE, "/delete?x=1")
        .send()
        .await
        .unwrap();

    assert_status(&resp, StatusCode::OK);
    let json: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(json["args"]["x"], "1");
    assert!(json.get("data").is_none());
}

#[tokio::test]
async fn test_method_mismatch_is_not_found() {
    let server = TestServer::start().await;
    let resp = server.send_form(Method::POST, "/get", &[("a", "1")]).await;
    assert_status(&resp, StatusCode::NOT_FOUND);

    let resp = server.get("/post").await;
    assert_status(&resp, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unsupported_method() {
    let server = TestServer::start().await;
    let resp = server.request(Method::TRACE, "/get").send().await.unwrap();

    assert_status(&resp, StatusCode::METHOD_NOT_ALLOWED);
    assert_body_contains(resp, "Method Not Allowed").await;
}

#[tokio::test]
async fn test_head_has_headers_only() {
    let server = TestServer::start().await;
    let resp = server.request(Method::HEAD, "/get").send().await.unwrap();

    assert_status(&resp, StatusCode::OK);
    assert_header(&resp, "content-type", "application/json");
    assert!(resp.bytes().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_body_limit() {
    let server = TestServer::start_with(TestOptions {
        max_body_bytes: 16,
        ..TestOptions::default()
    })
    .await;

    let resp = server
        .request(Method::POST, "/post")
        .body("x".repeat(64))
        .send()
        .await
        .unwrap();
    assert_status(&resp, StatusCode::PAYLOAD_TOO_LARGE);

    let resp = server.send_form(Method::POST, "/post", &[("a", "1")]).await;
    assert_status(&resp, StatusCode::OK);
}
