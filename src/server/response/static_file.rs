//! Static file serving.

use std::io::ErrorKind;
use std::path::Path;

use http::header::HeaderValue;
use hyper::StatusCode;

use super::{bytes_response, HttpResponse};

/// Serve a static file from the filesystem.
///
/// Returns `None` when the file does not exist (or is a directory) so the
/// caller can fall through to the next resolver.
pub async fn serve_static_file(file_path: &Path) -> Option<HttpResponse> {
    match tokio::fs::read(file_path).await {
        Ok(contents) => {
            let mime = mime_guess::from_path(file_path).first_or_octet_stream();
            let content_type = HeaderValue::from_str(mime.as_ref())
                .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));

            Some(bytes_response(StatusCode::OK, content_type, contents))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => None,
        Err(_) if file_path.is_dir() => None,
        Err(e) => {
            tracing::warn!("Failed to read file {:?}: {}", file_path, e);
            None
        }
    }
}
