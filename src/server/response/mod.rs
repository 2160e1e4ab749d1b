//! HTTP response building and utilities.

pub mod static_file;
pub mod streaming;

use bytes::Bytes;
use http::header::{HeaderValue, CONTENT_LENGTH, CONTENT_TYPE};
use http_body_util::{Either, Full};
use hyper::{Response, StatusCode};

pub use static_file::serve_static_file;
pub use streaming::{
    stream_channel, streaming_response, StreamChunk, StreamingBody, StreamingResponse,
};

/// Response body that can be full (buffered) or streaming (chunked).
pub type FlexibleBody = Either<Full<Bytes>, StreamingBody>;

/// HTTP response with flexible body.
pub type HttpResponse = Response<FlexibleBody>;

/// Convert a full response to a flexible response.
#[inline]
pub fn full_to_flexible(resp: Response<Full<Bytes>>) -> HttpResponse {
    resp.map(Either::Left)
}

/// Convert a streaming response to a flexible response.
#[inline]
pub fn streaming_to_flexible(resp: StreamingResponse) -> HttpResponse {
    resp.map(Either::Right)
}

// Pre-allocated static bytes for common responses
pub static EMPTY_BODY: Bytes = Bytes::from_static(b"");
pub static METHOD_NOT_ALLOWED_BODY: Bytes = Bytes::from_static(b"Method Not Allowed");
pub static BAD_REQUEST_BODY: Bytes = Bytes::from_static(b"Failed to read request body");

/// Static content type values.
pub mod content_types {
    use super::HeaderValue;

    pub static APPLICATION_JSON: HeaderValue = HeaderValue::from_static("application/json");
    pub static OCTET_STREAM: HeaderValue = HeaderValue::from_static("application/octet-stream");
    pub static TEXT_PLAIN: HeaderValue = HeaderValue::from_static("text/plain");
    pub static TEXT_PLAIN_UTF8: HeaderValue = HeaderValue::from_static("text/plain; charset=utf-8");
    pub static TEXT_HTML_UTF8: HeaderValue = HeaderValue::from_static("text/html; charset=utf-8");
}

/// Buffered response with a content type and an exact Content-Length.
#[inline]
pub fn bytes_response(
    status: StatusCode,
    content_type: HeaderValue,
    body: impl Into<Bytes>,
) -> HttpResponse {
    let body = body.into();
    let len = body.len();
    let mut res = Response::new(Either::Left(Full::new(body)));
    *res.status_mut() = status;
    res.headers_mut().insert(CONTENT_TYPE, content_type);
    res.headers_mut().insert(CONTENT_LENGTH, HeaderValue::from(len));
    res
}

/// Plain-text response.
#[inline]
pub fn text_response(status: StatusCode, body: &'static str) -> HttpResponse {
    bytes_response(
        status,
        content_types::TEXT_PLAIN.clone(),
        Bytes::from_static(body.as_bytes()),
    )
}

/// Response with no body and no content type.
#[inline]
pub fn empty_response(status: StatusCode) -> HttpResponse {
    let mut res = Response::new(Either::Left(Full::new(EMPTY_BODY.clone())));
    *res.status_mut() = status;
    res
}

/// Response whose body is the status reason phrase.
#[inline]
pub fn reason_response(status: StatusCode) -> HttpResponse {
    bytes_response(
        status,
        content_types::TEXT_PLAIN_UTF8.clone(),
        Bytes::from_static(status_reason_phrase(status).as_bytes()),
    )
}

/// Reason phrase for an HTTP status code.
pub fn status_reason_phrase(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or(match status.as_u16() {
        400..=499 => "Client Error",
        500..=599 => "Server Error",
        _ => "Unknown",
    })
}
