//! JSON response encoding.

use http::StatusCode;
use serde::Serialize;

use crate::core::HandlerError;
use crate::server::response::{bytes_response, content_types, empty_response, HttpResponse};

#[derive(Serialize)]
struct ErrorEnvelope<'a> {
    message: &'a str,
}

/// Serialize `value` as compact JSON with `Content-Type: application/json`.
pub fn write_json<T: Serialize + ?Sized>(
    status: StatusCode,
    value: &T,
) -> Result<HttpResponse, HandlerError> {
    let body = serde_json::to_vec(value)?;
    Ok(bytes_response(
        status,
        content_types::APPLICATION_JSON.clone(),
        body,
    ))
}

/// `{"message": ...}` with the given status.
///
/// Never fails: if the envelope cannot be encoded an empty 500 is returned.
pub fn error_envelope(status: StatusCode, message: &str) -> HttpResponse {
    match write_json(status, &ErrorEnvelope { message }) {
        Ok(res) => res,
        Err(e) => {
            tracing::error!(error = %e, "failed to encode error envelope");
            empty_response(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
