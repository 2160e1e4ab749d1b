//! Method + path pattern dispatch.
//!
//! Routes are registered once at startup in a fixed order and the table is
//! shared read-only behind an `Arc`. The first route whose method set, path
//! pattern and query predicate all match wins.

mod pattern;

use std::fmt;
use std::ops::BitOr;
use std::sync::Arc;

use http::Method;

use crate::core::query::{first_value, parse_pairs};
use crate::core::InboundRequest;
use crate::handlers::Handler;
use crate::middleware::MiddlewareChain;

pub use pattern::{PathPattern, PatternError};

/// Set of HTTP methods a route answers.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct MethodSet(u8);

impl MethodSet {
    pub const GET: MethodSet = MethodSet(1);
    pub const HEAD: MethodSet = MethodSet(1 << 1);
    pub const POST: MethodSet = MethodSet(1 << 2);
    pub const PUT: MethodSet = MethodSet(1 << 3);
    pub const PATCH: MethodSet = MethodSet(1 << 4);
    pub const DELETE: MethodSet = MethodSet(1 << 5);
    pub const OPTIONS: MethodSet = MethodSet(1 << 6);

    pub const GET_HEAD: MethodSet = MethodSet(Self::GET.0 | Self::HEAD.0);
    pub const WRITE: MethodSet = MethodSet(Self::POST.0 | Self::PUT.0 | Self::PATCH.0);

    fn bit(method: &Method) -> Option<u8> {
        let set = match *method {
            Method::GET => Self::GET,
            Method::HEAD => Self::HEAD,
            Method::POST => Self::POST,
            Method::PUT => Self::PUT,
            Method::PATCH => Self::PATCH,
            Method::DELETE => Self::DELETE,
            Method::OPTIONS => Self::OPTIONS,
            _ => return None,
        };
        Some(set.0)
    }

    /// Whether the server accepts `method` at all.
    #[inline]
    pub fn is_supported(method: &Method) -> bool {
        Self::bit(method).is_some()
    }

    #[inline]
    pub fn contains(self, method: &Method) -> bool {
        Self::bit(method).is_some_and(|b| self.0 & b != 0)
    }
}

impl BitOr for MethodSet {
    type Output = MethodSet;

    fn bitor(self, rhs: MethodSet) -> MethodSet {
        MethodSet(self.0 | rhs.0)
    }
}

impl fmt::Debug for MethodSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = [
            (Self::GET, "GET"),
            (Self::HEAD, "HEAD"),
            (Self::POST, "POST"),
            (Self::PUT, "PUT"),
            (Self::PATCH, "PATCH"),
            (Self::DELETE, "DELETE"),
            (Self::OPTIONS, "OPTIONS"),
        ];
        let list: Vec<&str> = names
            .iter()
            .filter(|(set, _)| self.0 & set.0 != 0)
            .map(|(_, name)| *name)
            .collect();
        write!(f, "{}", list.join("|"))
    }
}

/// Values bound by a route match: path placeholders plus captured query values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams {
    values: Vec<(String, String)>,
}

impl PathParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.push((name.into(), value.into()));
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Extra match condition on the query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryPredicate {
    /// `key` must be present with a non-empty value; the value is captured
    /// into [`PathParams`] under `key`.
    Require(String),
}

impl QueryPredicate {
    fn check(&self, req: &InboundRequest, params: &mut PathParams) -> bool {
        match self {
            QueryPredicate::Require(key) => {
                let pairs = parse_pairs(req.query().unwrap_or(""));
                match first_value(&pairs, key) {
                    Some(value) if !value.is_empty() => {
                        params.insert(key.clone(), value);
                        true
                    }
                    _ => false,
                }
            }
        }
    }
}

/// One registered route.
pub struct Route {
    methods: MethodSet,
    pattern: PathPattern,
    predicate: Option<QueryPredicate>,
    handler: Arc<dyn Handler>,
    middleware: Arc<MiddlewareChain>,
}

impl Route {
    pub fn new(
        methods: MethodSet,
        pattern: &str,
        handler: Arc<dyn Handler>,
    ) -> Result<Self, PatternError> {
        Ok(Self {
            methods,
            pattern: PathPattern::parse(pattern)?,
            predicate: None,
            handler,
            middleware: Arc::new(MiddlewareChain::new()),
        })
    }

    pub fn with_query(mut self, predicate: QueryPredicate) -> Self {
        self.predicate = Some(predicate);
        self
    }

    pub fn with_middleware(mut self, chain: Arc<MiddlewareChain>) -> Self {
        self.middleware = chain;
        self
    }

    #[inline]
    pub fn methods(&self) -> MethodSet {
        self.methods
    }

    #[inline]
    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    #[inline]
    pub fn handler(&self) -> &Arc<dyn Handler> {
        &self.handler
    }

    #[inline]
    pub fn middleware(&self) -> &MiddlewareChain {
        &self.middleware
    }

    fn matches(&self, req: &InboundRequest) -> Option<PathParams> {
        if !self.methods.contains(req.method()) {
            return None;
        }
        let mut params = self.pattern.matches(req.path())?;
        if let Some(predicate) = &self.predicate {
            if !predicate.check(req, &mut params) {
                return None;
            }
        }
        Some(params)
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("methods", &self.methods)
            .field("pattern", &self.pattern.as_str())
            .field("predicate", &self.predicate)
            .field("middleware", &self.middleware.names())
            .finish()
    }
}

/// Successful dispatch.
pub struct RouteMatch<'a> {
    pub route: &'a Route,
    pub params: PathParams,
}

/// Ordered route list. First match wins.
#[derive(Debug, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a route without middleware.
    pub fn register(
        &mut self,
        methods: MethodSet,
        pattern: &str,
        handler: Arc<dyn Handler>,
        predicate: Option<QueryPredicate>,
    ) -> Result<&mut Self, PatternError> {
        let mut route = Route::new(methods, pattern, handler)?;
        route.predicate = predicate;
        self.routes.push(route);
        Ok(self)
    }

    /// Append a fully built route.
    pub fn add(&mut self, route: Route) -> &mut Self {
        self.routes.push(route);
        self
    }

    pub fn dispatch(&self, req: &InboundRequest) -> Option<RouteMatch<'_>> {
        self.routes.iter().find_map(|route| {
            route
                .matches(req)
                .map(|params| RouteMatch { route, params })
        })
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::HandlerError;
    use crate::server::response::{text_response, HttpResponse};
    use async_trait::async_trait;
    use bytes::Bytes;
    use http::StatusCode;

    struct Named(&'static str);

    #[async_trait]
    impl Handler for Named {
        async fn handle(
            &self,
            _req: &InboundRequest,
            _params: &PathParams,
        ) -> Result<HttpResponse, HandlerError> {
            Ok(text_response(StatusCode::OK, self.0))
        }
    }

    fn req(method: Method, uri: &str) -> InboundRequest {
        InboundRequest::from(
            http::Request::builder()
                .method(method)
                .uri(uri)
                .body(Bytes::new())
                .unwrap(),
        )
    }

    fn matched_pattern(table: &RouteTable, r: &InboundRequest) -> Option<String> {
        table
            .dispatch(r)
            .map(|m| m.route.pattern().as_str().to_string())
    }

    #[test]
    fn test_method_set() {
        let set = MethodSet::GET | MethodSet::HEAD;
        assert_eq!(set, MethodSet::GET_HEAD);
        assert!(set.contains(&Method::GET));
        assert!(set.contains(&Method::HEAD));
        assert!(!set.contains(&Method::POST));
        assert!(!MethodSet::WRITE.contains(&Method::DELETE));
        assert!(MethodSet::WRITE.contains(&Method::PATCH));
        assert!(!set.contains(&Method::TRACE));
        assert!(!MethodSet::is_supported(&Method::TRACE));
        assert!(MethodSet::is_supported(&Method::OPTIONS));
        assert_eq!(format!("{:?}", set), "GET|HEAD");
    }

    #[test]
    fn test_dispatch_by_method_and_path() {
        let mut table = RouteTable::new();
        table
            .register(MethodSet::GET_HEAD, "/get", Arc::new(Named("get")), None)
            .unwrap()
            .register(MethodSet::DELETE, "/delete", Arc::new(Named("delete")), None)
            .unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(
            matched_pattern(&table, &req(Method::HEAD, "/get?x=1")).as_deref(),
            Some("/get")
        );
        assert!(table.dispatch(&req(Method::POST, "/get")).is_none());
        assert!(table.dispatch(&req(Method::GET, "/delete")).is_none());
        assert!(table.dispatch(&req(Method::GET, "/nope")).is_none());
    }

    #[test]
    fn test_query_predicate_captures_value() {
        let mut table = RouteTable::new();
        table.add(
            Route::new(MethodSet::GET_HEAD, "/redirect-to", Arc::new(Named("r")))
                .unwrap()
                .with_query(QueryPredicate::Require("url".to_string())),
        );

        let m = table
            .dispatch(&req(Method::GET, "/redirect-to?url=http%3A%2F%2Fexample.com"))
            .unwrap();
        assert_eq!(m.params.get("url"), Some("http://example.com"));

        assert!(table.dispatch(&req(Method::GET, "/redirect-to")).is_none());
        assert!(table.dispatch(&req(Method::GET, "/redirect-to?url=")).is_none());
        assert!(table
            .dispatch(&req(Method::GET, "/redirect-to?status_code=301"))
            .is_none());
    }

    #[test]
    fn test_first_match_wins() {
        let mut table = RouteTable::new();
        table
            .register(MethodSet::GET, "/image/{kind}", Arc::new(Named("any")), None)
            .unwrap()
            .register(MethodSet::GET, "/image/png", Arc::new(Named("png")), None)
            .unwrap();

        let m = table.dispatch(&req(Method::GET, "/image/png")).unwrap();
        assert_eq!(m.route.pattern().as_str(), "/image/{kind}");
        assert_eq!(m.params.get("kind"), Some("png"));
    }

    #[test]
    fn test_register_rejects_bad_pattern() {
        let mut table = RouteTable::new();
        let err = table
            .register(MethodSet::GET, "/bytes/{n", Arc::new(Named("x")), None)
            .unwrap_err();
        assert!(matches!(err, PatternError::UnbalancedBrace { .. }));
        assert!(table.is_empty());
    }

    #[test]
    fn test_path_params() {
        let mut params = PathParams::new();
        assert!(params.is_empty());
        params.insert("user", "alice");
        params.insert("passwd", "pw");
        assert_eq!(params.len(), 2);
        assert_eq!(params.get("user"), Some("alice"));
        assert_eq!(params.get("missing"), None);
    }
}
