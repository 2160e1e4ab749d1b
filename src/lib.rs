//! tokio_httpbin - HTTP request & response testing service on Tokio and hyper.
//!
//! Echoes requests back as JSON, checks Basic credentials, issues redirects,
//! serves sample images with content negotiation and produces random or
//! decoded payloads. Speaks HTTP/1.1 and HTTP/2, optionally over TLS.
//!
//! # Architecture
//!
//! ```text
//! accept loop -> ConnectionContext -> ResolverChain
//!                                       ├─ RouteResolver (RouteTable + MiddlewareChain + Handler)
//!                                       ├─ StaticResolver "/static/"
//!                                       └─ StaticResolver "/" (API docs UI)
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tokio_httpbin::handlers::{routes, HandlerContext};
//! use tokio_httpbin::server::{ResolverChain, RouteResolver, Server, ServerConfig};
//!
//! let table = routes(Arc::new(HandlerContext::new("static", "templates")), None)?;
//! let chain = ResolverChain::new().with(RouteResolver::new(Arc::new(table)));
//! let server = Server::bind(ServerConfig::new("0.0.0.0:8080".parse()?), Arc::new(chain)).await?;
//! server.run().await?;
//! ```

/// Package version from Cargo.toml
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Git commit hash (8 chars) with optional "-dirty" suffix
pub const BUILD_VERSION: &str = env!("BUILD_VERSION");

/// Full version string: "0.1.0 (abc12345)" or "0.1.0 (abc12345-dirty)"
pub const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BUILD_VERSION"), ")");

pub mod config;
pub mod core;
pub mod encode;
pub mod extract;
pub mod handlers;
pub mod logging;
pub mod middleware;
pub mod negotiate;
pub mod random;
pub mod router;
pub mod server;

// Re-exports for convenience
pub use config::Config;
pub use server::{ResolverChain, Server, ServerConfig};
