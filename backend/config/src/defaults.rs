//! Default values for every optional setting.

/// Default HTTP port of the recognition service.
pub const DEFAULT_PORT: u16 = 8080;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";

/// Vision model used for OCR + transliteration.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Directory holding the web UI's static build.
pub const DEFAULT_STATIC_DIR: &str = "public";

/// Smallest request body the service may accept: 10MB of encoded payload.
pub const MIN_BODY_LIMIT_BYTES: usize = 10 * 1024 * 1024;

/// Default request body limit; leaves room for JSON framing around 10MB.
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 16 * 1024 * 1024;

pub const DEFAULT_LOG_LEVEL: &str = "info";

pub const DEFAULT_SERVER_URL: &str = "http://localhost:8080";

/// In-flight recognition requests per batch.
pub const DEFAULT_MAX_CONCURRENCY: usize = 8;

/// Per-item deadline for encode + recognize.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;
