//! TCP/TLS connection handling.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, LazyLock};
use std::time::{Duration, Instant};

use bytes::Bytes;
use http::header::{HeaderName, HeaderValue, CONTENT_LENGTH, CONTENT_TYPE};
use http::{HeaderMap, Method, Request, Response, StatusCode};
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Incoming};
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo, TokioTimer};
use hyper_util::server::conn::auto;
use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio_rustls::TlsAcceptor;
use tracing::debug;

use super::response::{
    bytes_response, content_types, full_to_flexible, reason_response, status_reason_phrase,
    HttpResponse, BAD_REQUEST_BODY, EMPTY_BODY, METHOD_NOT_ALLOWED_BODY,
};
use super::routing::ResolverChain;
use crate::core::InboundRequest;
use crate::logging::{log_access, AccessLogEntry};
use crate::router::MethodSet;

static X_REQUEST_ID: LazyLock<HeaderName> =
    LazyLock::new(|| HeaderName::from_static("x-request-id"));

const TLS_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

mod http_versions {
    pub const HTTP_10: &str = "HTTP/1.0";
    pub const HTTP_11: &str = "HTTP/1.1";
    pub const HTTP_20: &str = "HTTP/2.0";

    #[inline]
    pub fn from_hyper(version: hyper::Version) -> &'static str {
        match version {
            hyper::Version::HTTP_10 => HTTP_10,
            hyper::Version::HTTP_2 => HTTP_20,
            _ => HTTP_11,
        }
    }
}

/// Check if an error is a common connection reset or timeout.
#[inline]
fn is_connection_error(err_str: &str) -> bool {
    err_str.contains("connection reset")
        || err_str.contains("broken pipe")
        || err_str.contains("Connection reset")
        || err_str.contains("os error 104")
        || err_str.contains("os error 32")
        || err_str.contains("timed out")
        || err_str.contains("HeaderTimeout")
}

/// Incoming `X-Request-ID`, or a fresh UUID.
fn request_id(headers: &HeaderMap) -> HeaderValue {
    if let Some(id) = headers.get(&*X_REQUEST_ID).filter(|v| !v.is_empty()) {
        return id.clone();
    }
    let mut buf = uuid::Uuid::encode_buffer();
    let id = uuid::Uuid::new_v4().simple().encode_lower(&mut buf);
    HeaderValue::from_str(id).unwrap_or_else(|_| HeaderValue::from_static("-"))
}

/// Request data kept for the access log after the request is consumed.
struct LogFields {
    method: String,
    path: String,
    query: Option<String>,
    http: &'static str,
    ua: Option<String>,
    referer: Option<String>,
    xff: Option<String>,
}

impl LogFields {
    fn capture<B>(req: &Request<B>) -> Self {
        let header = |name: &str| {
            req.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned)
        };
        Self {
            method: req.method().to_string(),
            path: req.uri().path().to_string(),
            query: req.uri().query().map(str::to_owned),
            http: http_versions::from_hyper(req.version()),
            ua: header("user-agent"),
            referer: header("referer"),
            xff: header("x-forwarded-for"),
        }
    }
}

/// Replace empty 4xx/5xx bodies with the reason phrase and drop HEAD bodies.
fn finalize(response: HttpResponse, is_head: bool) -> HttpResponse {
    let status = response.status();
    let mut response = if (status.is_client_error() || status.is_server_error())
        && response.body().size_hint().exact() == Some(0)
    {
        let reason = status_reason_phrase(status);
        let (mut parts, _) = response.into_parts();
        parts
            .headers
            .insert(CONTENT_TYPE, content_types::TEXT_PLAIN_UTF8.clone());
        parts
            .headers
            .insert(CONTENT_LENGTH, HeaderValue::from(reason.len()));
        full_to_flexible(Response::from_parts(
            parts,
            Full::new(Bytes::from_static(reason.as_bytes())),
        ))
    } else {
        response
    };

    // Headers only; dropping a streaming body also stops its producer
    if is_head {
        let (parts, _) = response.into_parts();
        response = full_to_flexible(Response::from_parts(parts, Full::new(EMPTY_BODY.clone())));
    }
    response
}

/// Per-server state shared by every connection.
pub struct ConnectionContext {
    pub resolver: Arc<ResolverChain>,
    pub active_connections: Arc<AtomicUsize>,
    /// HTTP/1 header read timeout (None = disabled).
    pub header_timeout: Option<Duration>,
    pub max_body_bytes: usize,
    pub access_log_enabled: bool,
    pub service_name: Arc<str>,
}

impl ConnectionContext {
    /// Handle an accepted TCP connection (with optional TLS) until it closes
    /// or the shutdown signal lets it finish gracefully.
    pub async fn handle_connection(
        self: Arc<Self>,
        stream: TcpStream,
        remote_addr: SocketAddr,
        tls_acceptor: Option<TlsAcceptor>,
        shutdown_rx: watch::Receiver<bool>,
    ) {
        self.active_connections.fetch_add(1, Ordering::Relaxed);

        match tls_acceptor {
            Some(acceptor) => {
                match tokio::time::timeout(TLS_HANDSHAKE_TIMEOUT, acceptor.accept(stream)).await {
                    Ok(Ok(tls_stream)) => {
                        Arc::clone(&self)
                            .serve(TokioIo::new(tls_stream), remote_addr, true, shutdown_rx)
                            .await
                    }
                    Ok(Err(e)) => debug!("TLS handshake failed: {:?}", e),
                    Err(_) => debug!("TLS handshake timeout: {:?}", remote_addr),
                }
            }
            None => {
                Arc::clone(&self)
                    .serve(TokioIo::new(stream), remote_addr, false, shutdown_rx)
                    .await
            }
        }

        self.active_connections.fetch_sub(1, Ordering::Relaxed);
    }

    async fn serve<I>(
        self: Arc<Self>,
        io: I,
        remote_addr: SocketAddr,
        tls: bool,
        mut shutdown_rx: watch::Receiver<bool>,
    ) where
        I: hyper::rt::Read + hyper::rt::Write + Unpin + Send + 'static,
    {
        let ctx = Arc::clone(&self);
        let service = service_fn(move |req: Request<Incoming>| {
            let ctx = Arc::clone(&ctx);
            async move { ctx.handle_request(req, remote_addr, tls).await }
        });

        let mut builder = auto::Builder::new(TokioExecutor::new());
        builder
            .http1()
            .timer(TokioTimer::new())
            .header_read_timeout(self.header_timeout)
            .keep_alive(true);
        builder.http2().max_concurrent_streams(250);

        let conn = builder.serve_connection(io, service);
        tokio::pin!(conn);

        let mut draining = false;
        let result = loop {
            tokio::select! {
                res = conn.as_mut() => break res,
                _ = shutdown_rx.changed(), if !draining => {
                    draining = true;
                    conn.as_mut().graceful_shutdown();
                }
            }
        };

        if let Err(err) = result {
            let err_str = format!("{:?}", err);
            if !is_connection_error(&err_str) {
                debug!(tls, "Connection error: {:?}", err);
            }
        }
    }

    /// Turn one HTTP request into a response: method check, body limit,
    /// resolution, response finishing and access logging.
    pub async fn handle_request<B>(
        &self,
        req: Request<B>,
        remote_addr: SocketAddr,
        tls: bool,
    ) -> Result<HttpResponse, Infallible>
    where
        B: Body<Data = Bytes>,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let start = Instant::now();
        let request_id = request_id(req.headers());
        let is_head = req.method() == Method::HEAD;
        let log_fields = self.access_log_enabled.then(|| LogFields::capture(&req));

        let response = if MethodSet::is_supported(req.method()) {
            match self.read_request(req, remote_addr, tls).await {
                Ok(inbound) => self.resolver.resolve(&inbound).await,
                Err(res) => res,
            }
        } else {
            bytes_response(
                StatusCode::METHOD_NOT_ALLOWED,
                content_types::TEXT_PLAIN.clone(),
                METHOD_NOT_ALLOWED_BODY.clone(),
            )
        };

        let mut response = finalize(response, is_head);
        response
            .headers_mut()
            .insert(X_REQUEST_ID.clone(), request_id.clone());

        if let Some(fields) = log_fields {
            let ip = remote_addr.ip().to_string();
            log_access(&AccessLogEntry {
                service: &self.service_name,
                request_id: request_id.to_str().unwrap_or("-"),
                ip: &ip,
                method: &fields.method,
                path: &fields.path,
                query: fields.query.as_deref(),
                http: fields.http,
                status: response.status().as_u16(),
                bytes: response.body().size_hint().exact(),
                duration: start.elapsed(),
                ua: fields.ua.as_deref(),
                referer: fields.referer.as_deref(),
                xff: fields.xff.as_deref(),
                tls,
            });
        }

        Ok(response)
    }

    /// Buffer the body up to the configured limit.
    async fn read_request<B>(
        &self,
        req: Request<B>,
        remote_addr: SocketAddr,
        tls: bool,
    ) -> Result<InboundRequest, HttpResponse>
    where
        B: Body<Data = Bytes>,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let (parts, body) = req.into_parts();

        if body.size_hint().lower() > self.max_body_bytes as u64 {
            debug!(limit = self.max_body_bytes, "declared request body over limit");
            return Err(reason_response(StatusCode::PAYLOAD_TOO_LARGE));
        }

        let body = match Limited::new(body, self.max_body_bytes).collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(err) if err.downcast_ref::<LengthLimitError>().is_some() => {
                debug!(limit = self.max_body_bytes, "request body over limit");
                return Err(reason_response(StatusCode::PAYLOAD_TOO_LARGE));
            }
            Err(err) => {
                debug!("Failed to read request body: {}", err);
                return Err(bytes_response(
                    StatusCode::BAD_REQUEST,
                    content_types::TEXT_PLAIN.clone(),
                    BAD_REQUEST_BODY.clone(),
                ));
            }
        };

        Ok(InboundRequest::from_parts(parts, body)
            .with_remote_addr(remote_addr)
            .with_tls(tls))
    }
}
