//! `/basic-auth/{user}/{passwd}`.

use async_trait::async_trait;
use http::StatusCode;
use serde::Serialize;

use super::Handler;
use crate::core::{HandlerError, InboundRequest};
use crate::encode::write_json;
use crate::extract::basic_auth_check;
use crate::router::PathParams;
use crate::server::response::HttpResponse;

#[derive(Serialize)]
struct Authenticated<'a> {
    authenticated: bool,
    user: &'a str,
}

/// Accepts only the credentials named in the path.
pub struct BasicAuthHandler;

#[async_trait]
impl Handler for BasicAuthHandler {
    async fn handle(
        &self,
        req: &InboundRequest,
        params: &PathParams,
    ) -> Result<HttpResponse, HandlerError> {
        let user = params.get("user").unwrap_or("");
        let passwd = params.get("passwd").unwrap_or("");

        if !basic_auth_check(req, user, passwd) {
            tracing::debug!(user, "basic auth rejected");
            return Err(HandlerError::Unauthorized);
        }

        write_json(
            StatusCode::OK,
            &Authenticated {
                authenticated: true,
                user,
            },
        )
    }
}
