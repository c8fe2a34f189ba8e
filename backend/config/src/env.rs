//! Environment loading.
//!
//! Empty variables count as unset. `from_lookup` takes any key -> value
//! function so tests never touch the process environment.

use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use crate::defaults::*;
use crate::schema::{ClientConfig, ServiceConfig};

pub const API_KEY_VAR: &str = "API_KEY";
pub const PORT_VAR: &str = "PORT";
pub const BIND_VAR: &str = "GRANTHA_BIND";
pub const MODEL_VAR: &str = "GRANTHA_MODEL";
pub const STATIC_DIR_VAR: &str = "GRANTHA_STATIC_DIR";
pub const BODY_LIMIT_VAR: &str = "GRANTHA_BODY_LIMIT_BYTES";
pub const LOG_LEVEL_VAR: &str = "RUST_LOG";
pub const LOG_DIR_VAR: &str = "GRANTHA_LOG_DIR";
pub const SERVER_URL_VAR: &str = "GRANTHA_SERVER_URL";
pub const MAX_CONCURRENCY_VAR: &str = "GRANTHA_MAX_CONCURRENCY";
pub const REQUEST_TIMEOUT_VAR: &str = "GRANTHA_REQUEST_TIMEOUT_SECS";

/// Error loading configuration from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is not set.")]
    MissingVar(&'static str),

    #[error("invalid value {value:?} for {var}: {reason}")]
    InvalidVar {
        var: &'static str,
        value: String,
        reason: String,
    },
}

impl ServiceConfig {
    /// Load from the process environment. A missing `API_KEY` is an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let api_key = get(API_KEY_VAR).ok_or(ConfigError::MissingVar(API_KEY_VAR))?;
        let mut config = ServiceConfig::with_api_key(api_key);

        config.port = parse_or(&get, PORT_VAR, DEFAULT_PORT)?;
        config.body_limit_bytes = parse_or(&get, BODY_LIMIT_VAR, DEFAULT_BODY_LIMIT_BYTES)?;
        if let Some(bind) = get(BIND_VAR) {
            config.bind_address = bind;
        }
        if let Some(model) = get(MODEL_VAR) {
            config.model = model;
        }
        if let Some(dir) = get(STATIC_DIR_VAR) {
            config.static_dir = PathBuf::from(dir);
        }
        if let Some(level) = get(LOG_LEVEL_VAR) {
            config.log_level = level;
        }
        config.log_dir = get(LOG_DIR_VAR).map(PathBuf::from);

        Ok(config)
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        Ok(ClientConfig {
            server_url: get(SERVER_URL_VAR).unwrap_or_else(|| DEFAULT_SERVER_URL.to_string()),
            max_concurrency: parse_or(&get, MAX_CONCURRENCY_VAR, DEFAULT_MAX_CONCURRENCY)?,
            request_timeout_secs: parse_or(&get, REQUEST_TIMEOUT_VAR, DEFAULT_REQUEST_TIMEOUT_SECS)?,
            log_level: get(LOG_LEVEL_VAR).unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        })
    }
}

fn parse_or<T, G>(get: &G, var: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
    G: Fn(&str) -> Option<String>,
{
    match get(var) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidVar {
            var,
            value: raw,
            reason: e.to_string(),
        }),
    }
}
