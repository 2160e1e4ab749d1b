//! Test helpers and utilities

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{redirect, Client, Method, RequestBuilder, Response};
use tokio_httpbin::config::DEFAULT_MAX_BODY_BYTES;
use tokio_httpbin::handlers::{routes, HandlerContext};
use tokio_httpbin::server::{ResolverChain, RouteResolver, Server, ServerConfig, StaticResolver};

/// Knobs a test may change before the server starts.
pub struct TestOptions {
    pub session_tokens: Option<HashMap<String, String>>,
    pub max_body_bytes: usize,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            session_tokens: None,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

/// In-process server on an ephemeral port, wired like the binary.
pub struct TestServer {
    pub base_url: String,
    pub client: Client,
    server: Arc<Server>,
}

fn asset_dir(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(name)
}

#[allow(dead_code)]
impl TestServer {
    pub async fn start() -> Self {
        Self::start_with(TestOptions::default()).await
    }

    pub async fn start_with(options: TestOptions) -> Self {
        let static_dir = asset_dir("static");
        let ctx = Arc::new(HandlerContext::new(
            static_dir.clone(),
            asset_dir("templates"),
        ));
        let table = routes(ctx, options.session_tokens).expect("route table");

        let resolver = ResolverChain::new()
            .with(RouteResolver::new(Arc::new(table)))
            .with(StaticResolver::new("/static/", static_dir.clone()))
            .with(StaticResolver::new("/", static_dir.join("swaggerui").join("dist")));

        let config = ServerConfig::new("127.0.0.1:0".parse().unwrap())
            .with_workers(1)
            .with_access_log(false)
            .with_max_body_bytes(options.max_body_bytes)
            .with_drain_timeout(Duration::from_secs(1));

        let server = Arc::new(
            Server::bind(config, Arc::new(resolver))
                .await
                .expect("Failed to bind test server"),
        );
        let base_url = format!("http://{}", server.local_addr());

        let runner = Arc::clone(&server);
        tokio::spawn(async move {
            let _ = runner.run().await;
        });

        let client = Client::builder()
            .redirect(redirect::Policy::none())
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url,
            client,
            server,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Request builder for any method.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, self.url(path))
    }

    /// Make a GET request to the server
    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request failed")
    }

    /// Make a GET request with custom headers
    pub async fn get_with_headers(&self, path: &str, headers: &[(&str, &str)]) -> Response {
        let mut req = self.client.get(self.url(path));
        for (name, value) in headers {
            req = req.header(*name, *value);
        }
        req.send().await.expect("GET request failed")
    }

    /// Make a request with an urlencoded form body
    pub async fn send_form(&self, method: Method, path: &str, form: &[(&str, &str)]) -> Response {
        self.request(method, path)
            .form(form)
            .send()
            .await
            .expect("form request failed")
    }

    /// GET and parse the body as JSON.
    pub async fn get_json(&self, path: &str) -> serde_json::Value {
        self.get(path).await.json().await.expect("JSON body")
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.server.trigger_shutdown();
    }
}

/// Assert that response has expected status
pub fn assert_status(response: &Response, expected: reqwest::StatusCode) {
    assert_eq!(
        response.status(),
        expected,
        "Expected status {}, got {}",
        expected,
        response.status()
    );
}

/// Assert that response contains header
pub fn assert_header(response: &Response, name: &str, expected: &str) {
    let value = response
        .headers()
        .get(name)
        .unwrap_or_else(|| panic!("Header '{}' not found", name))
        .to_str()
        .unwrap();
    assert_eq!(value, expected, "Header '{}' mismatch", name);
}

/// Assert that response contains header with prefix
pub fn assert_header_starts_with(response: &Response, name: &str, prefix: &str) {
    let value = response
        .headers()
        .get(name)
        .unwrap_or_else(|| panic!("Header '{}' not found", name))
        .to_str()
        .unwrap();
    assert!(
        value.starts_with(prefix),
        "Header '{}' expected to start with '{}', got '{}'",
        name,
        prefix,
        value
    );
}

/// Assert that response body contains substring
pub async fn assert_body_contains(response: Response, substring: &str) {
    let body = response.text().await.expect("Failed to read body");
    assert!(
        body.contains(substring),
        "Body does not contain '{}'. Body: {}",
        substring,
        &body[..body.len().min(500)]
    );
}
