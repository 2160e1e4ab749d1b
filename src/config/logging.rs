//! `LOG_LEVEL`, `RUST_LOG` and `SERVICE_NAME`.

use super::parse::{env_opt, env_or};
use super::ConfigError;

/// Target the bare `LOG_LEVEL` shorthand applies to.
const CRATE_TARGET: &str = "tokio_httpbin";

const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Subscriber filter and the service name stamped on every log line.
#[derive(Clone, Debug)]
pub struct LoggingConfig {
    /// `EnvFilter` directive string.
    pub filter: String,
    /// `ctx.service` in JSON log lines.
    pub service_name: String,
}

impl LoggingConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            filter: filter_from(
                env_opt("LOG_LEVEL").as_deref(),
                env_opt("RUST_LOG").as_deref(),
            ),
            service_name: env_or("SERVICE_NAME", CRATE_TARGET),
        })
    }
}

/// `LOG_LEVEL` (a bare level, scoped to this crate) beats `RUST_LOG` (full
/// directive syntax), which beats `tokio_httpbin=info`.
fn filter_from(log_level: Option<&str>, rust_log: Option<&str>) -> String {
    if let Some(level) = log_level {
        let level = level.trim().to_ascii_lowercase();
        if LEVELS.contains(&level.as_str()) {
            return format!("{}={}", CRATE_TARGET, level);
        }
        // Subscriber is not installed yet
        eprintln!(
            "Warning: ignoring LOG_LEVEL '{}', expected one of: {}",
            level,
            LEVELS.join(", ")
        );
    }

    match rust_log {
        Some(filter) => filter.to_string(),
        None => format!("{}=info", CRATE_TARGET),
    }
}
