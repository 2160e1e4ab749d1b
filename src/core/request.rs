//! Collected inbound request handed to routes and handlers.

use std::net::SocketAddr;

use bytes::Bytes;
use http::header::{self, HeaderName};
use http::{HeaderMap, Method, Uri};

/// Header name constants for fast lookup.
mod header_names {
    use super::*;

    pub static ACCEPT: HeaderName = header::ACCEPT;
    pub static CONTENT_TYPE: HeaderName = header::CONTENT_TYPE;
    pub static HOST: HeaderName = header::HOST;
    pub static USER_AGENT: HeaderName = header::USER_AGENT;
}

static X_FORWARDED_FOR: std::sync::LazyLock<HeaderName> =
    std::sync::LazyLock::new(|| HeaderName::from_static("x-forwarded-for"));

/// HTTP request with its body fully collected.
///
/// Clone is not derived; handlers borrow it.
#[derive(Debug)]
pub struct InboundRequest {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
    remote_addr: SocketAddr,
    tls: bool,
}

impl InboundRequest {
    /// Create a new request from a plain connection on 127.0.0.1:0.
    #[inline]
    pub fn new(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            method,
            uri,
            headers,
            body,
            remote_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            tls: false,
        }
    }

    /// Build from hyper request parts and a collected body.
    #[inline]
    pub fn from_parts(parts: http::request::Parts, body: Bytes) -> Self {
        Self {
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
            body,
            remote_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            tls: false,
        }
    }

    /// Set the transport peer address.
    #[inline]
    pub fn with_remote_addr(mut self, addr: SocketAddr) -> Self {
        self.remote_addr = addr;
        self
    }

    /// Mark the request as received over TLS.
    #[inline]
    pub fn with_tls(mut self, tls: bool) -> Self {
        self.tls = tls;
        self
    }

    #[inline]
    pub fn method(&self) -> &Method {
        &self.method
    }

    #[inline]
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    #[inline]
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    #[inline]
    pub fn query(&self) -> Option<&str> {
        self.uri.query()
    }

    #[inline]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    #[inline]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    #[inline]
    pub fn remote_addr(&self) -> SocketAddr {
        self.remote_addr
    }

    #[inline]
    pub fn is_tls(&self) -> bool {
        self.tls
    }

    #[inline]
    fn header_by_name(&self, name: &HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Get a header value by string name (case-insensitive).
    #[inline]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    #[inline]
    pub fn accept(&self) -> Option<&str> {
        self.header_by_name(&header_names::ACCEPT)
    }

    #[inline]
    pub fn content_type(&self) -> Option<&str> {
        self.header_by_name(&header_names::CONTENT_TYPE)
    }

    #[inline]
    pub fn user_agent(&self) -> Option<&str> {
        self.header_by_name(&header_names::USER_AGENT)
    }

    #[inline]
    pub fn forwarded_for(&self) -> Option<&str> {
        self.header_by_name(&X_FORWARDED_FOR)
    }

    /// Host header, or the URI authority for HTTP/2.
    pub fn host(&self) -> Option<&str> {
        self.header_by_name(&header_names::HOST)
            .or_else(|| self.uri.authority().map(|a| a.as_str()))
    }

    /// Check if the body is form-urlencoded.
    #[inline]
    pub fn is_form_urlencoded(&self) -> bool {
        self.content_type()
            .map(|ct| {
                ct.split(';')
                    .next()
                    .unwrap_or("")
                    .trim()
                    .eq_ignore_ascii_case("application/x-www-form-urlencoded")
            })
            .unwrap_or(false)
    }
}

impl From<http::Request<Bytes>> for InboundRequest {
    fn from(req: http::Request<Bytes>) -> Self {
        let (parts, body) = req.into_parts();
        Self::from_parts(parts, body)
    }
}
