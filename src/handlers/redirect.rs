//! `/redirect-to`.

use async_trait::async_trait;
use http::header::{HeaderValue, LOCATION};
use http::StatusCode;

use super::{echo_response, Handler};
use crate::core::{HandlerError, InboundRequest};
use crate::extract::{form_or_query_value, query_args};
use crate::router::PathParams;
use crate::server::response::{empty_response, HttpResponse};

/// 3xx from `status_code`, otherwise 302.
pub fn redirect_status(raw: Option<&str>) -> StatusCode {
    raw.and_then(|s| s.trim().parse::<u16>().ok())
        .filter(|code| (300..=399).contains(code))
        .and_then(|code| StatusCode::from_u16(code).ok())
        .unwrap_or(StatusCode::FOUND)
}

fn redirect(url: &str, status: StatusCode) -> Result<HttpResponse, HandlerError> {
    let location = HeaderValue::from_str(url)
        .map_err(|_| HandlerError::Decode(format!("invalid redirect url: {:?}", url)))?;

    let mut res = empty_response(status);
    res.headers_mut().insert(LOCATION, location);
    Ok(res)
}

/// GET/HEAD variant. The route only matches with a non-empty `url` query
/// value, captured into the params.
pub struct RedirectGetHandler;

#[async_trait]
impl Handler for RedirectGetHandler {
    async fn handle(
        &self,
        req: &InboundRequest,
        params: &PathParams,
    ) -> Result<HttpResponse, HandlerError> {
        let url = params.get("url").unwrap_or("");
        let args = query_args(req);
        redirect(url, redirect_status(args.get("status_code").map(String::as_str)))
    }
}

/// POST/PUT/PATCH variant: form body first, then query string.
/// Without `url` it answers like the write-method echo.
pub struct RedirectFormHandler;

#[async_trait]
impl Handler for RedirectFormHandler {
    async fn handle(
        &self,
        req: &InboundRequest,
        _params: &PathParams,
    ) -> Result<HttpResponse, HandlerError> {
        match form_or_query_value(req, "url") {
            Some(url) => {
                let status = form_or_query_value(req, "status_code");
                redirect(&url, redirect_status(status.as_deref()))
            }
            None => echo_response(req, true),
        }
    }
}
