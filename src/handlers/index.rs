//! Documentation page.

use std::fmt::Write as _;
use std::sync::Arc;

use async_trait::async_trait;
use http::StatusCode;

use super::catalog::{CatalogGroup, CATALOG};
use super::{Handler, HandlerContext};
use crate::core::{HandlerError, InboundRequest};
use crate::router::PathParams;
use crate::server::response::{bytes_response, content_types, HttpResponse};

pub const TEMPLATE_FILE: &str = "index.html";
pub const CATALOG_PLACEHOLDER: &str = "{{ route_catalog }}";
pub const VERSION_PLACEHOLDER: &str = "{{ version }}";

/// Renders `<template_dir>/index.html` with the route catalog.
pub struct IndexHandler {
    ctx: Arc<HandlerContext>,
}

impl IndexHandler {
    pub fn new(ctx: Arc<HandlerContext>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Handler for IndexHandler {
    async fn handle(
        &self,
        _req: &InboundRequest,
        _params: &PathParams,
    ) -> Result<HttpResponse, HandlerError> {
        let path = self.ctx.template_dir.join(TEMPLATE_FILE);
        let template = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| HandlerError::Template(format!("{}: {}", path.display(), e)))?;

        let page = render_page(&template, CATALOG, crate::VERSION)?;
        Ok(bytes_response(
            StatusCode::OK,
            content_types::TEXT_HTML_UTF8.clone(),
            page,
        ))
    }
}

/// Substitute both placeholders. Either one missing is an error.
pub fn render_page(
    template: &str,
    catalog: &[CatalogGroup],
    version: &str,
) -> Result<String, HandlerError> {
    for placeholder in [CATALOG_PLACEHOLDER, VERSION_PLACEHOLDER] {
        if !template.contains(placeholder) {
            return Err(HandlerError::Template(format!(
                "missing placeholder {}",
                placeholder
            )));
        }
    }

    Ok(template
        .replace(CATALOG_PLACEHOLDER, &render_catalog(catalog))
        .replace(VERSION_PLACEHOLDER, &escape_html(version)))
}

/// HTML for the catalog. Names and links are escaped, descriptions are not.
pub fn render_catalog(catalog: &[CatalogGroup]) -> String {
    let mut html = String::with_capacity(4096);

    for group in catalog {
        let _ = writeln!(html, "<section class=\"route-group\">");
        let _ = writeln!(html, "  <h2>{}</h2>", escape_html(group.title));
        let _ = writeln!(html, "  <ul>");
        for item in group.items {
            let _ = writeln!(
                html,
                "    <li><span class=\"method\">{}</span> <a href=\"{}\">{}</a> <span class=\"description\">{}</span></li>",
                escape_html(item.method),
                escape_html(item.link),
                escape_html(item.name),
                item.description,
            );
        }
        let _ = writeln!(html, "  </ul>");
        let _ = writeln!(html, "</section>");
    }

    html
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
