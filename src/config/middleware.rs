//! Middleware configuration.

use std::collections::HashMap;

use super::parse::{env_bool, env_opt};
use super::ConfigError;

/// Middleware configuration loaded from environment.
#[derive(Clone, Debug)]
pub struct MiddlewareConfig {
    /// Access logging enabled.
    pub access_log: bool,
    /// Accepted `X-Session-Token` values mapped to user names.
    /// `None` leaves the API routes open.
    pub session_tokens: Option<HashMap<String, String>>,
}

impl MiddlewareConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let session_tokens = env_opt("SESSION_TOKENS")
            .map(|raw| parse_session_tokens(&raw))
            .transpose()?;

        Ok(Self {
            access_log: env_bool("ACCESS_LOG", true),
            session_tokens,
        })
    }

    /// Check if the session token layer is enabled.
    pub fn is_session_token_enabled(&self) -> bool {
        self.session_tokens.is_some()
    }
}

/// Parse `token:user,token:user` pairs.
pub fn parse_session_tokens(raw: &str) -> Result<HashMap<String, String>, ConfigError> {
    let mut tokens = HashMap::new();

    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (token, user) = entry.split_once(':').ok_or_else(|| ConfigError::Invalid {
            key: "SESSION_TOKENS".into(),
            message: format!("expected token:user, got '{}'", entry),
        })?;

        let (token, user) = (token.trim(), user.trim());
        if token.is_empty() || user.is_empty() {
            return Err(ConfigError::Invalid {
                key: "SESSION_TOKENS".into(),
                message: format!("empty token or user in '{}'", entry),
            });
        }

        tokens.insert(token.to_string(), user.to_string());
    }

    if tokens.is_empty() {
        return Err(ConfigError::Invalid {
            key: "SESSION_TOKENS".into(),
            message: "no tokens configured".into(),
        });
    }

    Ok(tokens)
}
