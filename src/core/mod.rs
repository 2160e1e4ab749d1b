//! Core types shared by the router, middleware and handlers.
//!
//! - [`InboundRequest`] - collected request with peer and TLS info
//! - [`HandlerError`] - handler failures and their HTTP mapping
//! - [`query`] - form-urlencoded parsing

mod error;
pub mod query;
mod request;

pub use error::{
    HandlerError, BASIC_AUTH_CHALLENGE, NOT_ACCEPTABLE_BODY, UNAUTHORIZED_BODY,
};
pub use request::InboundRequest;
