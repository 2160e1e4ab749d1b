//! Request metadata reflected back by the echo endpoints.
//!
//! Pure functions over [`InboundRequest`]; none of them fail.

use std::collections::BTreeMap;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use http::header::AUTHORIZATION;

use crate::core::query::parse_pairs;
use crate::core::InboundRequest;

/// Client address: the raw `X-Forwarded-For` value when present and
/// non-empty, otherwise the transport peer IP without port.
pub fn peer_ip(req: &InboundRequest) -> String {
    match req.forwarded_for() {
        Some(xff) if !xff.trim().is_empty() => xff.to_string(),
        _ => req.remote_addr().ip().to_string(),
    }
}

/// `"https"` when TLS was terminated by this process.
#[inline]
pub fn scheme(req: &InboundRequest) -> &'static str {
    if req.is_tls() {
        "https"
    } else {
        "http"
    }
}

/// Canonical header name: `content-type` → `Content-Type`.
pub fn canonical_header_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = true;
    for c in name.chars() {
        if upper {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c.to_ascii_lowercase());
        }
        upper = c == '-';
    }
    out
}

/// Flat header map: canonical name → first value.
///
/// Later values of a repeated header are dropped. `Host` is always present
/// when the request carried a host, including HTTP/2 `:authority`.
pub fn headers_map(req: &InboundRequest) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();

    for name in req.headers().keys() {
        if let Some(value) = req.headers().get(name) {
            map.insert(
                canonical_header_name(name.as_str()),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            );
        }
    }

    if !map.contains_key("Host") {
        if let Some(host) = req.host() {
            map.insert("Host".to_string(), host.to_string());
        }
    }

    map
}

/// Query parameters: name → first value.
pub fn query_args(req: &InboundRequest) -> BTreeMap<String, String> {
    let mut args = BTreeMap::new();
    if let Some(query) = req.query() {
        for (key, value) in parse_pairs(query) {
            args.entry(key).or_insert(value);
        }
    }
    args
}

/// Form body fields, all values kept in order.
///
/// Empty unless the body is `application/x-www-form-urlencoded`.
pub fn form_values(req: &InboundRequest) -> BTreeMap<String, Vec<String>> {
    let mut values: BTreeMap<String, Vec<String>> = BTreeMap::new();
    if !req.is_form_urlencoded() {
        return values;
    }

    let body = String::from_utf8_lossy(req.body());
    for (key, value) in parse_pairs(&body) {
        values.entry(key).or_default().push(value);
    }
    values
}

/// First value for `key` in the form body, then in the query string.
pub fn form_or_query_value(req: &InboundRequest, key: &str) -> Option<String> {
    if let Some(v) = form_values(req).remove(key).and_then(|v| v.into_iter().next()) {
        return Some(v);
    }
    query_args(req).remove(key)
}

/// Basic credentials from the `Authorization` header.
fn basic_credentials(req: &InboundRequest) -> Option<(String, String)> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let (kind, encoded) = value.trim().split_once(' ')?;
    if !kind.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (user, passwd) = decoded.split_once(':')?;
    Some((user.to_string(), passwd.to_string()))
}

/// `true` only for `Authorization: Basic base64(user:passwd)` with exactly
/// the expected pair.
pub fn basic_auth_check(req: &InboundRequest, user: &str, passwd: &str) -> bool {
    match basic_credentials(req) {
        Some((u, p)) => u == user && p == passwd,
        None => false,
    }
}

/// Absolute URL of the request: `scheme://host` plus the request target.
pub fn request_url(req: &InboundRequest) -> String {
    let target = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    format!("{}://{}{}", scheme(req), req.host().unwrap_or(""), target)
}
