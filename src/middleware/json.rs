//! Default JSON content type for the API route group.

use http::header::CONTENT_TYPE;

use super::Middleware;
use crate::core::InboundRequest;
use crate::server::response::{content_types, HttpResponse};

/// Path whose HTML page keeps its own content type.
pub const LEGACY_PATH: &str = "/legacy";

/// Sets `Content-Type: application/json` on responses that have none.
pub struct JsonContentType;

impl Middleware for JsonContentType {
    fn name(&self) -> &'static str {
        "json_content_type"
    }

    fn priority(&self) -> i32 {
        90
    }

    fn on_response(&self, req: &InboundRequest, mut res: HttpResponse) -> HttpResponse {
        if req.path() != LEGACY_PATH && !res.headers().contains_key(CONTENT_TYPE) {
            res.headers_mut()
                .insert(CONTENT_TYPE, content_types::APPLICATION_JSON.clone());
        }
        res
    }
}
