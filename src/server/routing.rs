//! Request resolution: route table, then static roots, then 404.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use http::{Method, StatusCode};

use super::response::{reason_response, serve_static_file, HttpResponse};
use crate::core::{HandlerError, InboundRequest};
use crate::middleware::MiddlewareResult;
use crate::router::{RouteMatch, RouteTable};

/// One step of the resolution chain. `None` passes to the next step.
#[async_trait]
pub trait Resolver: Send + Sync {
    fn name(&self) -> &'static str;

    async fn resolve(&self, req: &InboundRequest) -> Option<HttpResponse>;
}

/// Dispatches through the route table, runs the route group's middleware
/// and converts handler errors into responses.
pub struct RouteResolver {
    table: Arc<RouteTable>,
}

impl RouteResolver {
    pub fn new(table: Arc<RouteTable>) -> Self {
        Self { table }
    }
}

fn log_handler_error(req: &InboundRequest, err: &HandlerError) {
    match err {
        HandlerError::Unauthorized | HandlerError::NotAcceptable => {
            tracing::debug!(path = req.path(), error = %err, "request rejected");
        }
        HandlerError::Encode(_) => {
            tracing::error!(path = req.path(), error = %err, "handler failed");
        }
        _ => {
            tracing::warn!(path = req.path(), error = %err, "handler failed");
        }
    }
}

#[async_trait]
impl Resolver for RouteResolver {
    fn name(&self) -> &'static str {
        "routes"
    }

    async fn resolve(&self, req: &InboundRequest) -> Option<HttpResponse> {
        let RouteMatch { route, params } = self.table.dispatch(req)?;
        let chain = route.middleware();

        let res = match chain.process_request(req) {
            MiddlewareResult::Stop(res) => res,
            MiddlewareResult::Next => match route.handler().handle(req, &params).await {
                Ok(res) => res,
                Err(err) => {
                    log_handler_error(req, &err);
                    err.into_response()
                }
            },
        };

        Some(chain.process_response(req, res))
    }
}

/// Serves files below `root` for paths starting with `prefix`.
pub struct StaticResolver {
    prefix: String,
    root: PathBuf,
}

impl StaticResolver {
    pub fn new(prefix: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            prefix: prefix.into(),
            root: root.into(),
        }
    }
}

#[async_trait]
impl Resolver for StaticResolver {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn resolve(&self, req: &InboundRequest) -> Option<HttpResponse> {
        if req.method() != Method::GET && req.method() != Method::HEAD {
            return None;
        }
        let rest = req.path().strip_prefix(self.prefix.as_str())?;

        let mut path = resolve_uri_to_path(rest, &self.root);
        if tokio::fs::metadata(&path)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
        {
            path.push("index.html");
        }

        serve_static_file(&path).await
    }
}

/// Map a URI path below a static root to a file path.
///
/// Percent-decodes, removes `..` and maps a trailing slash to `index.html`.
pub fn resolve_uri_to_path(uri_path: &str, root: &Path) -> PathBuf {
    let decoded = percent_encoding::percent_decode_str(uri_path).decode_utf8_lossy();
    let stripped = decoded.replace("..", "");
    let clean = stripped.trim_start_matches('/');

    if clean.is_empty() || clean.ends_with('/') {
        root.join(clean).join("index.html")
    } else {
        root.join(clean)
    }
}

/// Ordered resolvers ending in 404.
#[derive(Default)]
pub struct ResolverChain {
    resolvers: Vec<Box<dyn Resolver>>,
}

impl ResolverChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<R: Resolver + 'static>(mut self, resolver: R) -> Self {
        self.resolvers.push(Box::new(resolver));
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.resolvers.iter().map(|r| r.name()).collect()
    }

    pub async fn resolve(&self, req: &InboundRequest) -> HttpResponse {
        for resolver in &self.resolvers {
            if let Some(res) = resolver.resolve(req).await {
                return res;
            }
        }
        reason_response(StatusCode::NOT_FOUND)
    }
}
