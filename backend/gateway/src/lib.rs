//! Grantha recognition service.
//!
//! Accepts base64 images on `POST /api/generate`, asks the vision model for a
//! Tamil Grantha transliteration and hosts the web client's static files.

pub mod control_ui;
pub mod error;
pub mod generate;
pub mod health_api;
pub mod server;

pub use error::ApiError;
pub use server::{build_router, start_server, GatewayState};
