use async_trait::async_trait;

use crate::error::Result;
use crate::types::EncodedImage;

/// Anything that can turn one encoded image into recognized text.
///
/// Implemented by the HTTP recognition client; tests substitute their own.
#[async_trait]
pub trait Recognizer: Send + Sync {
    /// Short name used in logs (e.g. "http").
    fn name(&self) -> &str;

    /// Recognize and transliterate the text in a single image.
    ///
    /// "Nothing recognized" is a successful result carrying the sentinel text,
    /// not an error.
    async fn recognize(&self, image: &EncodedImage) -> Result<String>;
}
