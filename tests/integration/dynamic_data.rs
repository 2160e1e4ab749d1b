//! /base64, /bytes, /stream-bytes

use crate::helpers::*;
use futures_util::StreamExt;
use reqwest::StatusCode;
use tokio_httpbin::random;

#[tokio::test]
async fn test_base64_decodes_text() {
    let server = TestServer::start().await;
    let resp = server.get("/base64/SFRUUEJJTiBpcyBhd2Vzb21l").await;

    assert_status(&resp, StatusCode::OK);
    assert_header(&resp, "content-type", "text/plain; charset=utf-8");
    assert_eq!(resp.text().await.unwrap(), "HTTPBIN is awesome");
}

#[tokio::test]
async fn test_base64_invalid_input() {
    let server = TestServer::start().await;
    let resp = server.get("/base64/%25%25%25").await;

    assert_status(&resp, StatusCode::INTERNAL_SERVER_ERROR);
    assert_header(&resp, "content-type", "application/json");
    let json: serde_json::Value = resp.json().await.unwrap();
    assert!(json["message"].is_string());
}

#[tokio::test]
async fn test_bytes_seeded_is_reproducible() {
    let server = TestServer::start().await;

    let a = server.get("/bytes/64?seed=42").await;
    assert_status(&a, StatusCode::OK);
    assert_header(&a, "content-type", "application/octet-stream");
    assert_header(&a, "content-length", "64");
    let a = a.bytes().await.unwrap();

    let b = server.get("/bytes/64?seed=42").await.bytes().await.unwrap();
    assert_eq!(a, b);
    assert_eq!(a.as_ref(), random::generate(64, Some(42)).as_slice());
}

#[tokio::test]
async fn test_bytes_clamped_and_invalid() {
    let server = TestServer::start().await;

    let body = server.get("/bytes/500000").await.bytes().await.unwrap();
    assert_eq!(body.len(), random::MAX_BYTES);

    let body = server.get("/bytes/-5").await.bytes().await.unwrap();
    assert!(body.is_empty());

    let body = server.get("/bytes/%2016").await.bytes().await.unwrap();
    assert_eq!(body.len(), 16);
}

#[tokio::test]
async fn test_stream_bytes_matches_buffered() {
    let server = TestServer::start().await;
    let resp = server
        .get("/stream-bytes/3000?seed=7&chunk_size=1000&filename=sample.bin")
        .await;

    assert_status(&resp, StatusCode::OK);
    assert_header(&resp, "content-disposition", "attachment; filename=sample.bin");
    assert!(resp.headers().get("content-length").is_none());

    let mut stream = resp.bytes_stream();
    let mut body = Vec::new();
    while let Some(chunk) = stream.next().await {
        body.extend_from_slice(&chunk.unwrap());
    }
    assert_eq!(body, random::generate(3000, Some(7)));
}

#[tokio::test]
async fn test_stream_bytes_default_filename() {
    let server = TestServer::start().await;
    let resp = server.get("/stream-bytes/10").await;

    assert_header(&resp, "content-disposition", "attachment; filename=data");
    assert_eq!(resp.bytes().await.unwrap().len(), 10);
}

#[tokio::test]
async fn test_stream_bytes_clamped_total() {
    let server = TestServer::start().await;
    let resp = server
        .get("/stream-bytes/99999999?chunk_size=50000&seed=3")
        .await;
    assert_status(&resp, StatusCode::OK);

    let mut stream = resp.bytes_stream();
    let mut body = Vec::new();
    while let Some(chunk) = stream.next().await {
        body.extend_from_slice(&chunk.unwrap());
    }

    // 100 chunks of the 10240-byte maximum
    assert_eq!(body.len(), random::MAX_CHUNKS * random::MAX_CHUNK_SIZE);
    assert_eq!(body, random::generate(body.len(), Some(3)));
}
