//! # configs
//!
//! Typed client configuration. Values come from an optional
//! `corkboard.toml` next to the binary, overridden by `CORKBOARD_*`
//! environment variables; a `.env` file is folded in first.

use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("configuration error: {0}")]
    Invalid(#[from] config::ConfigError),
}

/// Everything the client needs to reach its board.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the board API, without a trailing slash.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Per-request timeout, seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Master switch for the fire-and-forget client telemetry.
    #[serde(default = "default_telemetry_enabled")]
    pub telemetry_enabled: bool,

    /// Where the persisted session (token, cached style) lives.
    #[serde(default = "default_session_path")]
    pub session_path: String,
}

impl ClientConfig {
    pub fn load() -> Result<Self, ConfigError> {
        // A missing .env is fine; an unreadable one is worth a mention.
        if let Err(err) = dotenvy::dotenv() {
            if !err.not_found() {
                tracing::warn!(error = %err, "could not read .env file");
            }
        }

        let raw = config::Config::builder()
            .add_source(config::File::with_name("corkboard").required(false))
            .add_source(config::Environment::with_prefix("CORKBOARD"))
            .build()?;
        Ok(raw.try_deserialize()?)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            telemetry_enabled: default_telemetry_enabled(),
            session_path: default_session_path(),
        }
    }
}

fn default_api_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_telemetry_enabled() -> bool {
    true
}

fn default_session_path() -> String {
    "./data/session.json".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_usable_offline() {
        let config = ClientConfig::default();
        assert_eq!(config.request_timeout_secs, 30);
        assert!(config.telemetry_enabled);
        assert!(config.api_base_url.starts_with("http"));
        assert!(!config.session_path.is_empty());
    }
}
