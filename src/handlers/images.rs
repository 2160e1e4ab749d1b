//! `/image` and `/image/{png,jpeg,webp,svg,gif}`.

use std::sync::Arc;

use async_trait::async_trait;
use http::header::HeaderValue;
use http::StatusCode;

use super::{Handler, HandlerContext};
use crate::core::{HandlerError, InboundRequest};
use crate::negotiate::{negotiate_image, ImageFormat};
use crate::router::PathParams;
use crate::server::response::{bytes_response, HttpResponse};

/// Serves a bundled image. `format: None` negotiates from `Accept`.
pub struct ImageHandler {
    ctx: Arc<HandlerContext>,
    format: Option<ImageFormat>,
}

impl ImageHandler {
    pub fn new(ctx: Arc<HandlerContext>, format: Option<ImageFormat>) -> Self {
        Self { ctx, format }
    }

    async fn serve(&self, format: ImageFormat) -> Result<HttpResponse, HandlerError> {
        let path = self.ctx.static_dir.join("images").join(format.file_name());
        let data = tokio::fs::read(&path)
            .await
            .map_err(|error| HandlerError::Asset { path, error })?;

        Ok(bytes_response(
            StatusCode::OK,
            HeaderValue::from_static(format.content_type()),
            data,
        ))
    }
}

#[async_trait]
impl Handler for ImageHandler {
    async fn handle(
        &self,
        req: &InboundRequest,
        _params: &PathParams,
    ) -> Result<HttpResponse, HandlerError> {
        let format = match self.format {
            Some(format) => format,
            None => negotiate_image(req.accept()).ok_or(HandlerError::NotAcceptable)?,
        };
        self.serve(format).await
    }
}
