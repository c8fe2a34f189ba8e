use std::time::Duration;

use thiserror::Error;

/// Top-level error type for the Grantha pipeline.
///
/// Per-item variants (`Encoding`, `Client`, `Timeout`) never escape a single
/// item's pipeline; the orchestrator turns them into that item's error text.
#[derive(Debug, Error)]
pub enum GranthaError {
    #[error("failed to read image '{name}': {message}")]
    Encoding { name: String, message: String },

    #[error("API Error: {0}")]
    Client(String),

    #[error("{0}")]
    Validation(String),

    #[error("upstream model error: {0}")]
    Upstream(String),

    #[error("recognition timed out after {}s", .0.as_secs())]
    Timeout(Duration),
}

impl GranthaError {
    pub fn encoding(name: impl Into<String>, message: impl ToString) -> Self {
        Self::Encoding {
            name: name.into(),
            message: message.to_string(),
        }
    }

    pub fn client(message: impl Into<String>) -> Self {
        Self::Client(message.into())
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream(message.into())
    }
}

pub type Result<T, E = GranthaError> = std::result::Result<T, E>;
