//! Configuration module for tokio_httpbin.
//!
//! All settings come from environment variables.
//!
//! # Example
//!
//! ```rust,ignore
//! use tokio_httpbin::config::Config;
//!
//! let config = Config::from_env()?;
//! println!("Listen address: {}", config.server.listen_addr);
//! println!("Workers: {}", config.server.worker_count());
//! ```

mod error;
mod logging;
mod middleware;
mod parse;
mod server;

pub use error::ConfigError;
pub use logging::LoggingConfig;
pub use middleware::{parse_session_tokens, MiddlewareConfig};
pub use server::{ServerConfig, TlsConfig, DEFAULT_MAX_BODY_BYTES};

/// Complete application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Middleware configuration.
    pub middleware: MiddlewareConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            server: ServerConfig::from_env()?,
            middleware: MiddlewareConfig::from_env()?,
            logging: LoggingConfig::from_env()?,
        })
    }

    /// Print configuration summary to log.
    pub fn log_summary(&self) {
        use tracing::info;

        info!("Configuration loaded:");
        info!("  Listen: {}", self.server.listen_addr);
        info!("  Workers: {}", self.server.worker_count());
        info!("  Static dir: {:?}", self.server.static_dir);
        info!("  Template dir: {:?}", self.server.template_dir);
        info!("  API docs dir: {:?}", self.server.api_docs_dir);
        info!("  Max body: {} bytes", self.server.max_body_bytes);
        info!("  Drain timeout: {}s", self.server.drain_timeout.as_secs());

        match self.server.header_timeout {
            Some(t) => info!("  Header timeout: {}s", t.as_secs()),
            None => info!("  Header timeout: disabled"),
        }

        if self.server.tls.is_enabled() {
            info!("  TLS: enabled");
        }

        if let Some(ref tokens) = self.middleware.session_tokens {
            info!("  Session tokens: {} configured", tokens.len());
        }

        if self.middleware.access_log {
            info!("  Access log: enabled");
        }
    }
}
