//! Image blobs as they arrive from the user, and everything derived from them
//! before they reach the recognition service.

pub mod encoder;
pub mod image;
pub mod mime_detect;
pub mod preview;

pub use encoder::encode;
pub use image::ImageBlob;
pub use mime_detect::{detect_mime_type, is_image};
pub use preview::{PreviewRef, PreviewRegistry};
