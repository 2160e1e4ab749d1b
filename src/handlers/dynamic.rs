//! Dynamic data: `/base64/{value}`, `/bytes/{n}`, `/stream-bytes/{n}`.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use http::header::{HeaderValue, CONTENT_DISPOSITION, CONTENT_TYPE};
use http::{HeaderMap, StatusCode};

use super::Handler;
use crate::core::{HandlerError, InboundRequest};
use crate::extract::query_args;
use crate::random::{self, RandomStream};
use crate::router::PathParams;
use crate::server::response::{
    bytes_response, content_types, stream_channel, streaming_response, streaming_to_flexible,
    HttpResponse, StreamChunk,
};

const DEFAULT_FILENAME: &str = "data";

/// Decodes the path segment as standard base64.
pub struct Base64Handler;

#[async_trait]
impl Handler for Base64Handler {
    async fn handle(
        &self,
        _req: &InboundRequest,
        params: &PathParams,
    ) -> Result<HttpResponse, HandlerError> {
        let value = params.get("value").unwrap_or("");
        let decoded = STANDARD
            .decode(value)
            .map_err(|e| HandlerError::Decode(e.to_string()))?;

        let content_type = if std::str::from_utf8(&decoded).is_ok() {
            content_types::TEXT_PLAIN_UTF8.clone()
        } else {
            content_types::OCTET_STREAM.clone()
        };
        Ok(bytes_response(StatusCode::OK, content_type, decoded))
    }
}

/// `n` random bytes in one buffered body.
pub struct BytesHandler;

#[async_trait]
impl Handler for BytesHandler {
    async fn handle(
        &self,
        req: &InboundRequest,
        params: &PathParams,
    ) -> Result<HttpResponse, HandlerError> {
        let len = random::clamp_bytes(params.get("n").unwrap_or(""));
        let args = query_args(req);
        let seed = random::parse_seed(args.get("seed").map(String::as_str));

        let data = random::generate(len, seed);
        Ok(bytes_response(
            StatusCode::OK,
            content_types::OCTET_STREAM.clone(),
            data,
        ))
    }
}

/// `n` random bytes as a chunked body, one frame per chunk.
pub struct StreamBytesHandler;

/// `attachment; filename=<name>`, or the default name when `name` cannot be a header value.
fn content_disposition(name: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("attachment; filename={}", name)).unwrap_or_else(|_| {
        HeaderValue::from_static("attachment; filename=data")
    })
}

#[async_trait]
impl Handler for StreamBytesHandler {
    async fn handle(
        &self,
        req: &InboundRequest,
        params: &PathParams,
    ) -> Result<HttpResponse, HandlerError> {
        let args = query_args(req);
        let chunk_size = random::clamp_chunk_size(
            args.get("chunk_size")
                .or_else(|| args.get("chunk-size"))
                .map(String::as_str),
        );
        let total = random::clamp_stream_total(params.get("n").unwrap_or(""), chunk_size);
        let seed = random::parse_seed(args.get("seed").map(String::as_str));
        let filename = args
            .get("filename")
            .map(String::as_str)
            .filter(|f| !f.is_empty())
            .unwrap_or(DEFAULT_FILENAME);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, content_types::OCTET_STREAM.clone());
        headers.insert(CONTENT_DISPOSITION, content_disposition(filename));

        // Capacity 1: each send waits until the transport took the previous chunk
        let (tx, rx) = stream_channel(1);
        tokio::spawn(async move {
            let mut stream = RandomStream::new(total, seed);
            while let Some(chunk) = stream.next_chunk(chunk_size) {
                if tx.send(StreamChunk::from(chunk)).await.is_err() {
                    tracing::debug!(
                        remaining = stream.remaining(),
                        "stream-bytes receiver closed, stopping"
                    );
                    return;
                }
            }
        });

        Ok(streaming_to_flexible(streaming_response(
            StatusCode::OK,
            headers,
            rx,
        )))
    }
}
