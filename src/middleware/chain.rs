//! Ordered middleware composition.

use std::sync::Arc;

use super::{Middleware, MiddlewareResult};
use crate::core::InboundRequest;
use crate::server::response::HttpResponse;

/// Middleware run in priority order for requests (lowest first) and in
/// reverse for responses.
#[derive(Clone, Default)]
pub struct MiddlewareChain {
    middlewares: Vec<Arc<dyn Middleware>>,
}

impl MiddlewareChain {
    pub fn new() -> Self {
        Self {
            middlewares: Vec::new(),
        }
    }

    /// Add a middleware, keeping the chain sorted by priority.
    pub fn add<M: Middleware + 'static>(self, middleware: M) -> Self {
        self.add_arc(Arc::new(middleware))
    }

    pub fn add_arc(mut self, middleware: Arc<dyn Middleware>) -> Self {
        self.middlewares.push(middleware);
        self.middlewares.sort_by_key(|m| m.priority());
        self
    }

    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }

    /// Middleware names in request order.
    pub fn names(&self) -> Vec<&'static str> {
        self.middlewares.iter().map(|m| m.name()).collect()
    }

    /// Run `on_request` hooks until one stops the chain.
    pub fn process_request(&self, req: &InboundRequest) -> MiddlewareResult {
        for mw in &self.middlewares {
            if let MiddlewareResult::Stop(res) = mw.on_request(req) {
                tracing::debug!(
                    middleware = mw.name(),
                    status = %res.status(),
                    "middleware short-circuited request"
                );
                return MiddlewareResult::Stop(res);
            }
        }
        MiddlewareResult::Next
    }

    /// Run `on_response` hooks in reverse order.
    pub fn process_response(&self, req: &InboundRequest, mut res: HttpResponse) -> HttpResponse {
        for mw in self.middlewares.iter().rev() {
            res = mw.on_response(req, res);
        }
        res
    }
}
