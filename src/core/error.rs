//! Handler error types.

use std::fmt;
use std::path::PathBuf;

use http::header::{HeaderValue, WWW_AUTHENTICATE};
use http::StatusCode;

use crate::encode::error_envelope;
use crate::server::response::{text_response, HttpResponse};

/// Challenge sent with every basic-auth failure.
pub const BASIC_AUTH_CHALLENGE: &str = "Basic realm=\"Fake Realm\"";

/// Body of a basic-auth failure.
pub const UNAUTHORIZED_BODY: &str = "Incorrect User or Password\n";

/// Body of a failed image negotiation.
pub const NOT_ACCEPTABLE_BODY: &str = "Invalid Accept\n";

/// Errors a handler can return.
///
/// Each variant maps to exactly one status and body via [`HandlerError::into_response`].
#[derive(Debug)]
pub enum HandlerError {
    /// Malformed client input (e.g. invalid base64).
    Decode(String),

    /// JSON serialization failed.
    Encode(serde_json::Error),

    /// Documentation template missing or unusable.
    Template(String),

    /// Bundled asset could not be read.
    Asset {
        path: PathBuf,
        error: std::io::Error,
    },

    /// No acceptable representation for the `Accept` header.
    NotAcceptable,

    /// Basic auth credentials absent or wrong.
    Unauthorized,
}

impl HandlerError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            HandlerError::Decode(_)
            | HandlerError::Encode(_)
            | HandlerError::Template(_)
            | HandlerError::Asset { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            HandlerError::NotAcceptable => StatusCode::NOT_ACCEPTABLE,
            HandlerError::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }

    /// Convert into the response sent to the client.
    pub fn into_response(self) -> HttpResponse {
        match self {
            HandlerError::NotAcceptable => {
                text_response(StatusCode::NOT_ACCEPTABLE, NOT_ACCEPTABLE_BODY)
            }
            HandlerError::Unauthorized => {
                let mut res = text_response(StatusCode::UNAUTHORIZED, UNAUTHORIZED_BODY);
                res.headers_mut().insert(
                    WWW_AUTHENTICATE,
                    HeaderValue::from_static(BASIC_AUTH_CHALLENGE),
                );
                res
            }
            other => error_envelope(other.status(), &other.to_string()),
        }
    }
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerError::Decode(msg) => write!(f, "{}", msg),
            HandlerError::Encode(e) => write!(f, "json encode error: {}", e),
            HandlerError::Template(msg) => write!(f, "template error: {}", msg),
            HandlerError::Asset { path, error } => {
                write!(f, "failed to read {}: {}", path.display(), error)
            }
            HandlerError::NotAcceptable => write!(f, "Invalid Accept"),
            HandlerError::Unauthorized => write!(f, "Incorrect User or Password"),
        }
    }
}

impl std::error::Error for HandlerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HandlerError::Encode(e) => Some(e),
            HandlerError::Asset { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for HandlerError {
    fn from(e: serde_json::Error) -> Self {
        HandlerError::Encode(e)
    }
}
