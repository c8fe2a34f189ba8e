//! `grantha-config`: runtime configuration for the recognition service and
//! the batch client.
//!
//! Provides:
//! - Typed config structs with defaults
//! - Environment loading (with a lookup-function variant for tests)
//! - Validation reports (errors + warnings)
//! - Redaction for safe logging

pub mod defaults;
pub mod env;
pub mod redact;
pub mod schema;
pub mod validation;

pub use env::ConfigError;
pub use redact::redact;
pub use schema::{ClientConfig, ServiceConfig};
pub use validation::{validate_client, validate_service, ConfigValidationError, ValidationReport};

/// Log a validation report and return whether it is free of errors.
pub fn log_report(report: &ValidationReport) -> bool {
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }
    report.is_valid()
}
