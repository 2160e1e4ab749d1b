//! `X-Session-Token` gate for the API route group.

use std::collections::HashMap;

use http::StatusCode;

use super::{Middleware, MiddlewareResult};
use crate::core::InboundRequest;
use crate::server::response::text_response;

pub const SESSION_TOKEN_HEADER: &str = "x-session-token";
pub const FORBIDDEN_BODY: &str = "UnAuthorized Error\n";

/// Rejects requests whose session token is not configured.
pub struct SessionToken {
    tokens: HashMap<String, String>,
}

impl SessionToken {
    /// `tokens` maps token to user name.
    pub fn new(tokens: HashMap<String, String>) -> Self {
        Self { tokens }
    }

    /// User owning the request's token, if any.
    pub fn user_for(&self, req: &InboundRequest) -> Option<&str> {
        let token = req.header(SESSION_TOKEN_HEADER)?;
        self.tokens.get(token).map(String::as_str)
    }
}

impl Middleware for SessionToken {
    fn name(&self) -> &'static str {
        "session_token"
    }

    fn priority(&self) -> i32 {
        -100
    }

    fn on_request(&self, req: &InboundRequest) -> MiddlewareResult {
        match self.user_for(req) {
            Some(user) => {
                tracing::debug!(user, path = req.path(), "session token accepted");
                MiddlewareResult::Next
            }
            None => MiddlewareResult::Stop(text_response(StatusCode::FORBIDDEN, FORBIDDEN_BODY)),
        }
    }
}
