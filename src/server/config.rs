//! Runtime options for [`Server`](super::Server).
//!
//! # Example
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use tokio_httpbin::server::ServerConfig;
//!
//! let config = ServerConfig::new("127.0.0.1:0".parse().unwrap())
//!     .with_workers(2)
//!     .with_access_log(false)
//!     .with_drain_timeout(Duration::from_secs(5));
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::{Config, DEFAULT_MAX_BODY_BYTES};

/// Server configuration.
///
/// Built either with the `with_*` methods or from the environment-backed
/// [`Config`] via [`ServerConfig::from_app_config`].
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    /// Number of accept loops. 0 = CPU count.
    pub num_workers: usize,
    /// TLS certificate file path (PEM format)
    pub tls_cert: Option<PathBuf>,
    /// TLS private key file path (PEM format)
    pub tls_key: Option<PathBuf>,
    /// Graceful shutdown drain timeout
    pub drain_timeout: Duration,
    /// HTTP/1 header read timeout (None = disabled)
    pub header_timeout: Option<Duration>,
    /// Request body limit; larger bodies get 413
    pub max_body_bytes: usize,
    pub access_log: bool,
    /// `service` field of access log lines
    pub service_name: String,
}

impl ServerConfig {
    pub fn new(addr: SocketAddr) -> Self {
        Self {
            addr,
            num_workers: 0,
            tls_cert: None,
            tls_key: None,
            drain_timeout: Duration::from_secs(15),
            header_timeout: Some(Duration::from_secs(5)),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            access_log: true,
            service_name: "tokio_httpbin".to_string(),
        }
    }

    /// Carry over the server-related parts of the loaded configuration.
    pub fn from_app_config(config: &Config) -> Self {
        let mut server = Self::new(config.server.listen_addr)
            .with_workers(config.server.workers)
            .with_drain_timeout(config.server.drain_timeout)
            .with_header_timeout(config.server.header_timeout)
            .with_max_body_bytes(config.server.max_body_bytes)
            .with_access_log(config.middleware.access_log)
            .with_service_name(config.logging.service_name.clone());

        if let (Some(cert), Some(key)) = (&config.server.tls.cert_path, &config.server.tls.key_path)
        {
            server = server.with_tls(cert.clone(), key.clone());
        }
        server
    }

    pub fn with_workers(mut self, num: usize) -> Self {
        self.num_workers = num;
        self
    }

    pub fn with_tls(mut self, cert_path: PathBuf, key_path: PathBuf) -> Self {
        self.tls_cert = Some(cert_path);
        self.tls_key = Some(key_path);
        self
    }

    pub fn with_drain_timeout(mut self, timeout: Duration) -> Self {
        self.drain_timeout = timeout;
        self
    }

    pub fn with_header_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.header_timeout = timeout;
        self
    }

    pub fn with_max_body_bytes(mut self, limit: usize) -> Self {
        self.max_body_bytes = limit;
        self
    }

    pub fn with_access_log(mut self, enabled: bool) -> Self {
        self.access_log = enabled;
        self
    }

    pub fn with_service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = name.into();
        self
    }

    pub fn has_tls(&self) -> bool {
        self.tls_cert.is_some() && self.tls_key.is_some()
    }

    /// Accept loop count (0 = CPU count).
    pub fn worker_count(&self) -> usize {
        if self.num_workers == 0 {
            num_cpus::get()
        } else {
            self.num_workers
        }
    }
}
