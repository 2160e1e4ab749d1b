//! Request inspection: /ip, /user-agent, /headers, /uuid, session tokens.

use std::collections::HashMap;

use crate::helpers::*;
use reqwest::StatusCode;

#[tokio::test]
async fn test_ip() {
    let server = TestServer::start().await;

    let json = server.get_json("/ip").await;
    assert_eq!(json, serde_json::json!({"ip": "127.0.0.1"}));

    let resp = server
        .get_with_headers("/ip", &[("x-forwarded-for", "203.0.113.9, 10.0.0.1")])
        .await;
    let json: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(json["ip"], "203.0.113.9, 10.0.0.1");
}

#[tokio::test]
async fn test_user_agent() {
    let server = TestServer::start().await;
    let resp = server
        .get_with_headers("/user-agent", &[("user-agent", "probe/1.0")])
        .await;

    assert_status(&resp, StatusCode::OK);
    let json: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(json, serde_json::json!({"user-agent": "probe/1.0"}));
}

#[tokio::test]
async fn test_headers_are_canonicalized() {
    let server = TestServer::start().await;
    let resp = server
        .get_with_headers("/headers", &[("x-custom-thing", "one")])
        .await;

    assert_status(&resp, StatusCode::OK);
    let json: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(json["X-Custom-Thing"], "one");
    assert!(json["Host"].is_string());
}

#[tokio::test]
async fn test_uuid_is_fresh_v4() {
    let server = TestServer::start().await;
    let a = server.get_json("/uuid").await;
    let b = server.get_json("/uuid").await;

    let a = a["uuid"].as_str().unwrap().to_string();
    let b = b["uuid"].as_str().unwrap().to_string();
    assert_ne!(a, b);

    let parsed = uuid::Uuid::parse_str(&a).unwrap();
    assert_eq!(parsed.get_version_num(), 4);
}

#[tokio::test]
async fn test_request_id() {
    let server = TestServer::start().await;

    let resp = server
        .get_with_headers("/get", &[("x-request-id", "trace-42")])
        .await;
    assert_header(&resp, "x-request-id", "trace-42");

    let resp = server.get("/get").await;
    assert_eq!(resp.headers()["x-request-id"].len(), 32);
}

#[tokio::test]
async fn test_session_token_gate() {
    let mut tokens = HashMap::new();
    tokens.insert("s3cret".to_string(), "alice".to_string());
    let server = TestServer::start_with(TestOptions {
        session_tokens: Some(tokens),
        ..TestOptions::default()
    })
    .await;

    let resp = server.get("/get").await;
    assert_status(&resp, StatusCode::FORBIDDEN);
    assert_eq!(resp.text().await.unwrap(), "UnAuthorized Error\n");

    let resp = server
        .get_with_headers("/get", &[("x-session-token", "wrong")])
        .await;
    assert_status(&resp, StatusCode::FORBIDDEN);

    let resp = server
        .get_with_headers("/get", &[("x-session-token", "s3cret")])
        .await;
    assert_status(&resp, StatusCode::OK);

    // Only the api group is gated
    let resp = server.get("/bytes/4").await;
    assert_status(&resp, StatusCode::OK);
}
