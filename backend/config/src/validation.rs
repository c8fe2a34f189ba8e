//! Config validation: checks with user-friendly error messages.

use thiserror::Error;

use crate::defaults::MIN_BODY_LIMIT_BYTES;
use crate::schema::{ClientConfig, ServiceConfig};

/// Concurrency above this is allowed but probably a mistake.
const HIGH_CONCURRENCY: usize = 64;

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the service config.
pub fn validate_service(config: &ServiceConfig) -> ValidationReport {
    let mut report = ValidationReport::default();

    if config.api_key.trim().is_empty() {
        report.error("apiKey", "API key cannot be empty");
    }
    if config.model.trim().is_empty() {
        report.error("model", "Model name cannot be empty");
    }
    if config.port == 0 {
        report.warn("port", "Port 0 binds a random port");
    }
    if config.body_limit_bytes < MIN_BODY_LIMIT_BYTES {
        report.error(
            "bodyLimitBytes",
            format!("Body limit must be at least {MIN_BODY_LIMIT_BYTES} bytes"),
        );
    }
    if !config.static_dir.is_dir() {
        report.warn(
            "staticDir",
            format!("{} does not exist; only the API will be served", config.static_dir.display()),
        );
    }

    report
}

/// Validate the batch client config.
pub fn validate_client(config: &ClientConfig) -> ValidationReport {
    let mut report = ValidationReport::default();

    if !(config.server_url.starts_with("http://") || config.server_url.starts_with("https://")) {
        report.error("serverUrl", "Server URL must start with http:// or https://");
    }
    if config.max_concurrency == 0 {
        report.error("maxConcurrency", "Concurrency must be at least 1");
    } else if config.max_concurrency > HIGH_CONCURRENCY {
        report.warn(
            "maxConcurrency",
            format!("{} concurrent requests may overload the service", config.max_concurrency),
        );
    }
    if config.request_timeout_secs == 0 {
        report.warn("requestTimeoutSecs", "No per-item timeout; a hung request stalls the batch");
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_client_is_valid() {
        let report = validate_client(&ClientConfig::default());
        assert!(report.is_valid());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn zero_concurrency_is_error() {
        let config = ClientConfig {
            max_concurrency: 0,
            ..ClientConfig::default()
        };
        let report = validate_client(&config);
        assert!(!report.is_valid());
        assert_eq!(report.errors[0].path, "maxConcurrency");
    }

    #[test]
    fn bad_url_is_error() {
        let config = ClientConfig {
            server_url: "localhost:8080".into(),
            ..ClientConfig::default()
        };
        assert!(!validate_client(&config).is_valid());
    }

    #[test]
    fn disabled_timeout_warns() {
        let config = ClientConfig {
            request_timeout_secs: 0,
            ..ClientConfig::default()
        };
        let report = validate_client(&config);
        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn small_body_limit_is_error() {
        let mut config = ServiceConfig::with_api_key("k");
        config.body_limit_bytes = 1024;
        let report = validate_service(&config);
        assert!(report.errors.iter().any(|e| e.path == "bodyLimitBytes"));
    }
}
