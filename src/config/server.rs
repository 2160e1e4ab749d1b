//! Server configuration.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use super::parse::{env_duration, env_opt, env_or, env_parse};
use super::ConfigError;

/// Default request body limit (10 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// TLS configuration.
#[derive(Clone, Debug, Default)]
pub struct TlsConfig {
    /// Path to TLS certificate (PEM format).
    pub cert_path: Option<PathBuf>,
    /// Path to TLS private key (PEM format).
    pub key_path: Option<PathBuf>,
}

impl TlsConfig {
    /// Check if TLS is configured.
    pub fn is_enabled(&self) -> bool {
        self.cert_path.is_some() && self.key_path.is_some()
    }

    /// Load from environment variables.
    pub fn from_env() -> Self {
        Self {
            cert_path: env_opt("TLS_CERT").map(PathBuf::from),
            key_path: env_opt("TLS_KEY").map(PathBuf::from),
        }
    }
}

/// Server configuration loaded from environment.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Listen address (default: 0.0.0.0:8080).
    pub listen_addr: SocketAddr,
    /// Runtime worker threads and accept loops (0 = CPU count).
    pub workers: usize,
    /// Root for `/static/*` and the image assets.
    pub static_dir: PathBuf,
    /// Directory holding `index.html` for the documentation page.
    pub template_dir: PathBuf,
    /// Catch-all static root for the bundled API docs UI.
    pub api_docs_dir: PathBuf,
    /// Graceful shutdown drain timeout.
    pub drain_timeout: Duration,
    /// Header read timeout (None = disabled).
    pub header_timeout: Option<Duration>,
    /// Request body limit in bytes.
    pub max_body_bytes: usize,
    /// TLS configuration.
    pub tls: TlsConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let listen_addr: SocketAddr = env_or("LISTEN_ADDR", "0.0.0.0:8080")
            .parse()
            .map_err(|e| ConfigError::Parse {
                key: "LISTEN_ADDR".into(),
                value: env_or("LISTEN_ADDR", "0.0.0.0:8080"),
                error: format!("{}", e),
            })?;

        let drain_timeout =
            env_duration("DRAIN_TIMEOUT", "15s")?.unwrap_or_else(|| Duration::from_secs(0));

        let max_body_bytes = env_parse("MAX_BODY_BYTES", DEFAULT_MAX_BODY_BYTES)?;
        if max_body_bytes == 0 {
            return Err(ConfigError::Invalid {
                key: "MAX_BODY_BYTES".into(),
                message: "must be greater than zero".into(),
            });
        }

        let tls = TlsConfig::from_env();
        if tls.cert_path.is_some() != tls.key_path.is_some() {
            return Err(ConfigError::Invalid {
                key: "TLS_CERT/TLS_KEY".into(),
                message: "both certificate and key must be set".into(),
            });
        }

        Ok(Self {
            listen_addr,
            workers: env_parse("WORKERS", 0usize)?,
            static_dir: PathBuf::from(env_or("STATIC_DIR", "static")),
            template_dir: PathBuf::from(env_or("TEMPLATE_DIR", "templates")),
            api_docs_dir: PathBuf::from(env_or("API_DOCS_DIR", "static/swaggerui/dist")),
            drain_timeout,
            header_timeout: env_duration("HEADER_TIMEOUT", "5s")?,
            max_body_bytes,
            tls,
        })
    }

    /// Resolve the worker count (0 = CPU count).
    pub fn worker_count(&self) -> usize {
        if self.workers == 0 {
            num_cpus::get()
        } else {
            self.workers
        }
    }
}
