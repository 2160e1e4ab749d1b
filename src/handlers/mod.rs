//! Endpoint handlers and the route table that wires them up.
//!
//! Every endpoint is one [`Handler`] implementation. Handlers are stateless
//! apart from the shared [`HandlerContext`] and report failures as
//! [`HandlerError`]; the route resolver turns those into responses.

mod auth;
pub mod catalog;
mod dynamic;
mod echo;
mod identity;
mod images;
mod index;
mod redirect;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

use crate::core::{HandlerError, InboundRequest};
use crate::middleware::{JsonContentType, MiddlewareChain, SessionToken};
use crate::negotiate::ImageFormat;
use crate::router::{MethodSet, PathParams, PatternError, QueryPredicate, Route, RouteTable};
use crate::server::response::HttpResponse;

pub use auth::BasicAuthHandler;
pub use dynamic::{Base64Handler, BytesHandler, StreamBytesHandler};
pub use echo::{echo_response, EchoHandler};
pub use identity::{HeadersHandler, IpHandler, UserAgentHandler, UuidHandler};
pub use images::ImageHandler;
pub use index::{render_catalog, IndexHandler};
pub use redirect::{RedirectFormHandler, RedirectGetHandler};

/// One endpoint.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(
        &self,
        req: &InboundRequest,
        params: &PathParams,
    ) -> Result<HttpResponse, HandlerError>;
}

/// Startup configuration shared by the handlers that read files.
#[derive(Debug, Clone)]
pub struct HandlerContext {
    /// Root of `/static/*`; images live in `images/` below it.
    pub static_dir: PathBuf,
    /// Directory holding `index.html`.
    pub template_dir: PathBuf,
}

impl HandlerContext {
    pub fn new(static_dir: impl Into<PathBuf>, template_dir: impl Into<PathBuf>) -> Self {
        Self {
            static_dir: static_dir.into(),
            template_dir: template_dir.into(),
        }
    }
}

/// Build the route table.
///
/// Registration order matters (first match wins):
/// 1. `/` (raw)
/// 2. api group: `/legacy`, `/basic-auth`, the method echoes, request
///    inspection, both `/redirect-to` variants
/// 3. images group
/// 4. raw group: `/base64`, then `/uuid` (api), `/bytes`, `/stream-bytes`
///
/// `session_tokens` enables the `X-Session-Token` gate on the api group.
pub fn routes(
    ctx: Arc<HandlerContext>,
    session_tokens: Option<HashMap<String, String>>,
) -> Result<RouteTable, PatternError> {
    let mut api = MiddlewareChain::new().add(JsonContentType);
    if let Some(tokens) = session_tokens {
        api = api.add(SessionToken::new(tokens));
    }
    let api = Arc::new(api);
    let images = Arc::new(MiddlewareChain::new());
    let raw = Arc::new(MiddlewareChain::new());

    let index: Arc<dyn Handler> = Arc::new(IndexHandler::new(ctx.clone()));
    let echo: Arc<dyn Handler> = Arc::new(EchoHandler::new(false));
    let echo_with_data: Arc<dyn Handler> = Arc::new(EchoHandler::new(true));

    let api_route = |methods, pattern: &str, handler: Arc<dyn Handler>| {
        Route::new(methods, pattern, handler).map(|r| r.with_middleware(api.clone()))
    };
    let image_route = |pattern: &str, format: Option<ImageFormat>| {
        Route::new(
            MethodSet::GET_HEAD,
            pattern,
            Arc::new(ImageHandler::new(ctx.clone(), format)),
        )
        .map(|r| r.with_middleware(images.clone()))
    };
    let raw_route = |pattern: &str, handler: Arc<dyn Handler>| {
        Route::new(MethodSet::GET_HEAD, pattern, handler).map(|r| r.with_middleware(raw.clone()))
    };

    let mut table = RouteTable::new();

    table.add(raw_route("/", index.clone())?);

    table
        .add(api_route(MethodSet::GET_HEAD, "/legacy", index)?)
        .add(api_route(
            MethodSet::GET_HEAD,
            "/basic-auth/{user}/{passwd}",
            Arc::new(BasicAuthHandler),
        )?);

    // HTTP methods
    table
        .add(api_route(MethodSet::DELETE, "/delete", echo.clone())?)
        .add(api_route(MethodSet::GET_HEAD, "/get", echo)?)
        .add(api_route(MethodSet::POST, "/post", echo_with_data.clone())?)
        .add(api_route(MethodSet::PUT, "/put", echo_with_data.clone())?)
        .add(api_route(MethodSet::PATCH, "/patch", echo_with_data)?);

    // Request inspection
    table
        .add(api_route(MethodSet::GET_HEAD, "/headers", Arc::new(HeadersHandler))?)
        .add(api_route(MethodSet::GET_HEAD, "/ip", Arc::new(IpHandler))?)
        .add(api_route(
            MethodSet::GET_HEAD,
            "/user-agent",
            Arc::new(UserAgentHandler),
        )?);

    // Redirects
    table
        .add(
            api_route(MethodSet::GET_HEAD, "/redirect-to", Arc::new(RedirectGetHandler))?
                .with_query(QueryPredicate::Require("url".to_string())),
        )
        .add(api_route(
            MethodSet::WRITE,
            "/redirect-to",
            Arc::new(RedirectFormHandler),
        )?);

    // Images
    table
        .add(image_route("/image", None)?)
        .add(image_route("/image/png", Some(ImageFormat::Png))?)
        .add(image_route("/image/jpeg", Some(ImageFormat::Jpeg))?)
        .add(image_route("/image/webp", Some(ImageFormat::Webp))?)
        .add(image_route("/image/svg", Some(ImageFormat::Svg))?)
        .add(image_route("/image/gif", Some(ImageFormat::Gif))?);

    // Dynamic data
    table
        .add(raw_route("/base64/{value}", Arc::new(Base64Handler))?)
        .add(api_route(MethodSet::GET_HEAD, "/uuid", Arc::new(UuidHandler))?)
        .add(raw_route("/bytes/{n}", Arc::new(BytesHandler))?)
        .add(raw_route("/stream-bytes/{n}", Arc::new(StreamBytesHandler))?);

    Ok(table)
}
