//! Integration tests for tokio_httpbin
//!
//! Each test starts its own server on 127.0.0.1 with an ephemeral port,
//! serving the bundled `static/` and `templates/` directories.
//!
//! Run with: cargo test --test integration

mod helpers;

mod auth;
mod dynamic_data;
mod http_methods;
mod images;
mod inspection;
mod redirects;
mod static_and_docs;
