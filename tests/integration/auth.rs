//! /basic-auth/{user}/{passwd}

use crate::helpers::*;
use reqwest::{Method, StatusCode};

#[tokio::test]
async fn test_basic_auth_accepts_matching_credentials() {
    let server = TestServer::start().await;
    let resp = server
        .request(Method::GET, "/basic-auth/user/passwd")
        .basic_auth("user", Some("passwd"))
        .send()
        .await
        .unwrap();

    assert_status(&resp, StatusCode::OK);
    assert_header(&resp, "content-type", "application/json");
    let json: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(json, serde_json::json!({"authenticated": true, "user": "user"}));
}

#[tokio::test]
async fn test_basic_auth_password_with_colon() {
    let server = TestServer::start().await;
    let resp = server
        .request(Method::GET, "/basic-auth/bob/a:b")
        .basic_auth("bob", Some("a:b"))
        .send()
        .await
        .unwrap();

    assert_status(&resp, StatusCode::OK);
}

#[tokio::test]
async fn test_basic_auth_rejects_wrong_or_missing() {
    let server = TestServer::start().await;

    let resp = server
        .request(Method::GET, "/basic-auth/user/passwd")
        .basic_auth("user", Some("nope"))
        .send()
        .await
        .unwrap();
    assert_status(&resp, StatusCode::UNAUTHORIZED);
    assert_header(&resp, "www-authenticate", "Basic realm=\"Fake Realm\"");
    assert_header(&resp, "content-type", "text/plain");
    assert_eq!(resp.text().await.unwrap(), "Incorrect User or Password\n");

    let resp = server.get("/basic-auth/user/passwd").await;
    assert_status(&resp, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_basic_auth_needs_both_segments() {
    let server = TestServer::start().await;
    let resp = server.get("/basic-auth/user").await;
    assert_status(&resp, StatusCode::NOT_FOUND);
}
