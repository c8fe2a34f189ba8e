//! Structured logging for Grantha.
//!
//! Console output, optional rotating NDJSON files, and scrubbing of secrets
//! from text that is about to be logged.

pub mod logger;
pub mod redact;

pub use logger::init_logger;
pub use redact::redact_sensitive_data;
