//! Request inspection: `/ip`, `/user-agent`, `/headers`, `/uuid`.

use async_trait::async_trait;
use http::StatusCode;
use serde::Serialize;

use super::Handler;
use crate::core::{HandlerError, InboundRequest};
use crate::encode::write_json;
use crate::extract::{headers_map, peer_ip};
use crate::router::PathParams;
use crate::server::response::HttpResponse;

#[derive(Serialize)]
struct Ip {
    ip: String,
}

#[derive(Serialize)]
struct UserAgent<'a> {
    #[serde(rename = "user-agent")]
    user_agent: &'a str,
}

#[derive(Serialize)]
struct Uuid {
    uuid: String,
}

pub struct IpHandler;

#[async_trait]
impl Handler for IpHandler {
    async fn handle(
        &self,
        req: &InboundRequest,
        _params: &PathParams,
    ) -> Result<HttpResponse, HandlerError> {
        write_json(StatusCode::OK, &Ip { ip: peer_ip(req) })
    }
}

pub struct UserAgentHandler;

#[async_trait]
impl Handler for UserAgentHandler {
    async fn handle(
        &self,
        req: &InboundRequest,
        _params: &PathParams,
    ) -> Result<HttpResponse, HandlerError> {
        let user_agent = req.user_agent().unwrap_or("");
        write_json(StatusCode::OK, &UserAgent { user_agent })
    }
}

pub struct HeadersHandler;

#[async_trait]
impl Handler for HeadersHandler {
    async fn handle(
        &self,
        req: &InboundRequest,
        _params: &PathParams,
    ) -> Result<HttpResponse, HandlerError> {
        write_json(StatusCode::OK, &headers_map(req))
    }
}

/// Fresh random v4 UUID per request.
pub struct UuidHandler;

#[async_trait]
impl Handler for UuidHandler {
    async fn handle(
        &self,
        _req: &InboundRequest,
        _params: &PathParams,
    ) -> Result<HttpResponse, HandlerError> {
        let uuid = uuid::Uuid::new_v4().to_string();
        write_json(StatusCode::OK, &Uuid { uuid })
    }
}
