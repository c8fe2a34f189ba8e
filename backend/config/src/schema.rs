//! Typed configuration for the two processes.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::defaults::*;

/// Recognition service (`grantha serve`) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceConfig {
    pub bind_address: String,
    pub port: u16,
    /// Vision model credential. Required.
    pub api_key: String,
    pub model: String,
    pub static_dir: PathBuf,
    pub body_limit_bytes: usize,
    pub log_level: String,
    /// Rotating JSON log files are written here when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,
}

impl ServiceConfig {
    /// Config with defaults for everything except the credential.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            port: DEFAULT_PORT,
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            body_limit_bytes: DEFAULT_BODY_LIMIT_BYTES,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_dir: None,
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

/// Batch client (`grantha process`) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    pub server_url: String,
    pub max_concurrency: usize,
    /// `0` disables the per-item timeout.
    pub request_timeout_secs: u64,
    pub log_level: String,
}

impl ClientConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_defaults() {
        let config = ServiceConfig::with_api_key("k");
        assert_eq!(config.port, 8080);
        assert_eq!(config.addr(), "0.0.0.0:8080");
        assert!(config.body_limit_bytes >= MIN_BODY_LIMIT_BYTES);
    }

    #[test]
    fn test_client_timeout_zero_disables() {
        let mut config = ClientConfig::default();
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(120)));
        config.request_timeout_secs = 0;
        assert_eq!(config.request_timeout(), None);
    }
}
