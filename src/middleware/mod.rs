//! Per-route-group middleware.
//!
//! Each route group (api, images, raw) carries one [`MiddlewareChain`].
//! Middleware can:
//! - Inspect the incoming request
//! - Short-circuit with an early response
//! - Modify the outgoing response
//!
//! # Example
//!
//! ```rust,ignore
//! use tokio_httpbin::middleware::{Middleware, MiddlewareChain, MiddlewareResult};
//!
//! struct Tag;
//!
//! impl Middleware for Tag {
//!     fn name(&self) -> &'static str { "tag" }
//!
//!     fn on_response(&self, _req: &InboundRequest, mut res: HttpResponse) -> HttpResponse {
//!         res.headers_mut().insert("x-tag", HeaderValue::from_static("1"));
//!         res
//!     }
//! }
//!
//! let chain = MiddlewareChain::new().add(Tag);
//! ```

mod chain;

pub mod json;
pub mod session_token;

pub use chain::MiddlewareChain;
pub use json::JsonContentType;
pub use session_token::SessionToken;

use crate::core::InboundRequest;
use crate::server::response::HttpResponse;

/// Result of middleware request processing.
pub enum MiddlewareResult {
    /// Continue to the next middleware.
    Next,
    /// Stop the chain and answer with this response.
    Stop(HttpResponse),
}

impl MiddlewareResult {
    pub fn is_next(&self) -> bool {
        matches!(self, MiddlewareResult::Next)
    }

    pub fn is_stop(&self) -> bool {
        matches!(self, MiddlewareResult::Stop(_))
    }
}

/// Request/response hook attached to a route group.
///
/// `on_request` runs in priority order before the handler, `on_response`
/// in reverse order after it.
///
/// ```text
/// Request → MW1.on_request → MW2.on_request → Handler
///                                                ↓
/// Response ← MW1.on_response ← MW2.on_response ←─┘
/// ```
pub trait Middleware: Send + Sync {
    fn name(&self) -> &'static str;

    /// Lower values see the request first and the response last.
    ///
    /// - -100..-50: access control
    /// - 50..100: response rewriting
    fn priority(&self) -> i32 {
        0
    }

    fn on_request(&self, _req: &InboundRequest) -> MiddlewareResult {
        MiddlewareResult::Next
    }

    fn on_response(&self, _req: &InboundRequest, res: HttpResponse) -> HttpResponse {
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::response::text_response;
    use bytes::Bytes;
    use http::StatusCode;

    struct Passive;

    impl Middleware for Passive {
        fn name(&self) -> &'static str {
            "passive"
        }
    }

    #[test]
    fn test_middleware_result() {
        assert!(MiddlewareResult::Next.is_next());
        let stop = MiddlewareResult::Stop(text_response(StatusCode::FORBIDDEN, "no"));
        assert!(stop.is_stop());
        assert!(!stop.is_next());
    }

    #[test]
    fn test_default_implementations() {
        let mw = Passive;
        assert_eq!(mw.priority(), 0);

        let req = InboundRequest::new(
            http::Method::GET,
            http::Uri::from_static("/get"),
            http::HeaderMap::new(),
            Bytes::new(),
        );
        assert!(mw.on_request(&req).is_next());

        let res = mw.on_response(&req, text_response(StatusCode::OK, "ok"));
        assert_eq!(res.status(), StatusCode::OK);
    }
}
