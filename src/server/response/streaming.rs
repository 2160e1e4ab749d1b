//! Streaming response support for chunked transfer.
//!
//! A producer task sends [`StreamChunk`]s into a bounded channel; the
//! response body yields one data frame per chunk as the transport polls it.
//!
//! # Example
//!
//! ```rust,ignore
//! use crate::server::response::streaming::{stream_channel, streaming_response, StreamChunk};
//!
//! let (tx, rx) = stream_channel(1);
//!
//! tokio::spawn(async move {
//!     tx.send(StreamChunk::new(&b"hello"[..])).await.ok();
//!     tx.send(StreamChunk::new(&b"world"[..])).await.ok();
//! });
//!
//! let response = streaming_response(StatusCode::OK, headers, rx);
//! ```

use std::convert::Infallible;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use http_body_util::StreamBody;
use hyper::body::Frame;
use hyper::Response;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::Stream;

/// A chunk of streaming data.
#[derive(Debug, Clone)]
pub struct StreamChunk {
    pub data: Bytes,
}

impl StreamChunk {
    #[inline]
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self { data: data.into() }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl From<Vec<u8>> for StreamChunk {
    fn from(data: Vec<u8>) -> Self {
        Self {
            data: Bytes::from(data),
        }
    }
}

/// Wrapper stream that converts `StreamChunk` to `Frame<Bytes>`.
pub struct ChunkFrameStream {
    inner: ReceiverStream<StreamChunk>,
}

impl ChunkFrameStream {
    pub fn new(rx: mpsc::Receiver<StreamChunk>) -> Self {
        Self {
            inner: ReceiverStream::new(rx),
        }
    }
}

impl Stream for ChunkFrameStream {
    type Item = Result<Frame<Bytes>, Infallible>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            match Pin::new(&mut self.inner).poll_next(cx) {
                // Empty frames would end a chunked body early on some clients
                Poll::Ready(Some(chunk)) if chunk.is_empty() => continue,
                Poll::Ready(Some(chunk)) => return Poll::Ready(Some(Ok(Frame::data(chunk.data)))),
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

/// Streaming body fed by a chunk channel.
pub type StreamingBody = StreamBody<ChunkFrameStream>;

/// Streaming HTTP response.
pub type StreamingResponse = Response<StreamingBody>;

/// Create a streaming response from a receiver channel.
///
/// No Content-Length is set, so HTTP/1.1 uses chunked transfer encoding and
/// every chunk is written as soon as the channel yields it.
pub fn streaming_response(
    status: StatusCode,
    headers: HeaderMap,
    body_rx: mpsc::Receiver<StreamChunk>,
) -> StreamingResponse {
    let body = StreamBody::new(ChunkFrameStream::new(body_rx));

    let mut res = Response::new(body);
    *res.status_mut() = status;
    *res.headers_mut() = headers;
    res
}

/// Create a new streaming channel pair.
#[inline]
pub fn stream_channel(
    buffer_size: usize,
) -> (mpsc::Sender<StreamChunk>, mpsc::Receiver<StreamChunk>) {
    mpsc::channel(buffer_size)
}
