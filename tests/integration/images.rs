//! /image and /image/{format}

use crate::helpers::*;
use reqwest::StatusCode;

#[tokio::test]
async fn test_image_without_accept_is_gif() {
    let server = TestServer::start().await;
    let resp = server.get_with_headers("/image", &[("accept", "")]).await;

    assert_status(&resp, StatusCode::OK);
    assert_header(&resp, "content-type", "image/gif");
    let body = resp.bytes().await.unwrap();
    assert!(body.starts_with(b"GIF8"));
}

#[tokio::test]
async fn test_image_negotiation() {
    let server = TestServer::start().await;

    for (accept, expected) in [
        ("image/webp,image/png", "image/webp"),
        ("image/svg+xml", "image/svg+xml"),
        ("image/jpeg", "image/jpeg"),
        ("image/png", "image/png"),
        ("image/*", "image/png"),
    ] {
        let resp = server.get_with_headers("/image", &[("accept", accept)]).await;
        assert_status(&resp, StatusCode::OK);
        assert_header(&resp, "content-type", expected);
    }
}

#[tokio::test]
async fn test_image_not_acceptable() {
    let server = TestServer::start().await;
    let resp = server
        .get_with_headers("/image", &[("accept", "text/html")])
        .await;

    assert_status(&resp, StatusCode::NOT_ACCEPTABLE);
    assert_eq!(resp.text().await.unwrap(), "Invalid Accept\n");
}

#[tokio::test]
async fn test_fixed_format_routes() {
    let server = TestServer::start().await;

    for (path, expected) in [
        ("/image/png", "image/png"),
        ("/image/jpeg", "image/jpeg"),
        ("/image/webp", "image/webp"),
        ("/image/svg", "image/svg+xml"),
        ("/image/gif", "image/gif"),
    ] {
        let resp = server.get(path).await;
        assert_status(&resp, StatusCode::OK);
        assert_header(&resp, "content-type", expected);
        assert!(!resp.bytes().await.unwrap().is_empty(), "{}", path);
    }
}

#[tokio::test]
async fn test_png_bytes_match_bundled_file() {
    let server = TestServer::start().await;
    let body = server.get("/image/png").await.bytes().await.unwrap();

    let expected = std::fs::read(
        std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("static/images/pig_icon.png"),
    )
    .unwrap();
    assert_eq!(body.as_ref(), expected.as_slice());
}
