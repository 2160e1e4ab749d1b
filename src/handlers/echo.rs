//! `/get`, `/delete`, `/post`, `/put`, `/patch`.

use std::collections::BTreeMap;

use async_trait::async_trait;
use http::StatusCode;
use serde::Serialize;

use super::Handler;
use crate::core::{HandlerError, InboundRequest};
use crate::encode::write_json;
use crate::extract::{form_values, headers_map, peer_ip, query_args, request_url};
use crate::router::PathParams;
use crate::server::response::HttpResponse;

#[derive(Debug, Serialize)]
struct EchoEnvelope {
    args: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<BTreeMap<String, Vec<String>>>,
    headers: BTreeMap<String, String>,
    origin: String,
    url: String,
}

/// Reflect the request back as JSON.
///
/// `with_data` adds the decoded form body under `data` (possibly `{}`).
pub fn echo_response(req: &InboundRequest, with_data: bool) -> Result<HttpResponse, HandlerError> {
    let envelope = EchoEnvelope {
        args: query_args(req),
        data: with_data.then(|| form_values(req)),
        headers: headers_map(req),
        origin: peer_ip(req),
        url: request_url(req),
    };
    write_json(StatusCode::OK, &envelope)
}

/// Echo envelope handler; `with_data` for the write methods.
pub struct EchoHandler {
    with_data: bool,
}

impl EchoHandler {
    pub fn new(with_data: bool) -> Self {
        Self { with_data }
    }
}

#[async_trait]
impl Handler for EchoHandler {
    async fn handle(
        &self,
        req: &InboundRequest,
        _params: &PathParams,
    ) -> Result<HttpResponse, HandlerError> {
        echo_response(req, self.with_data)
    }
}
