//! Blob -> base64 transport encoding.

use base64::{engine::general_purpose::STANDARD, Engine};
use grantha_core::{EncodedImage, GranthaError, Result};
use tracing::{debug, warn};

use crate::image::ImageBlob;

/// Encode the full content of `blob` as standard base64 (no line breaks, no
/// `data:` prefix), paired with the blob's media type.
///
/// Fails only when the blob's bytes cannot be read.
pub async fn encode(blob: &ImageBlob) -> Result<EncodedImage> {
    let data = blob.read().await.map_err(|e| {
        warn!(filename = %blob.filename(), error = %e, "Failed to read image");
        GranthaError::encoding(blob.filename(), e)
    })?;

    debug!(filename = %blob.filename(), bytes = data.len(), "Encoded image");
    Ok(EncodedImage::new(STANDARD.encode(&data), blob.mime_type()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn encodes_memory_blob() {
        let blob = ImageBlob::from_bytes("hello.png", "image/png", &b"hello"[..]);
        let encoded = encode(&blob).await.unwrap();
        assert_eq!(encoded.payload, "aGVsbG8=");
        assert_eq!(encoded.mime_type, "image/png");
    }

    #[tokio::test]
    async fn encodes_large_blob_without_line_breaks() {
        let blob = ImageBlob::from_bytes("big.jpg", "image/jpeg", vec![0xABu8; 64 * 1024]);
        let encoded = encode(&blob).await.unwrap();
        assert!(!encoded.payload.contains('\n'));
        assert_eq!(STANDARD.decode(&encoded.payload).unwrap().len(), 64 * 1024);
    }

    #[tokio::test]
    async fn encodes_file_blob() {
        let path = std::env::temp_dir().join(format!("grantha-enc-{}.png", uuid::Uuid::new_v4()));
        tokio::fs::write(&path, b"\x89PNG").await.unwrap();

        let encoded = encode(&ImageBlob::from_path(&path)).await.unwrap();
        assert_eq!(STANDARD.decode(&encoded.payload).unwrap(), b"\x89PNG");
        assert_eq!(encoded.mime_type, "image/png");

        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn unreadable_file_is_encoding_error() {
        let path = std::env::temp_dir().join(format!("grantha-missing-{}.png", uuid::Uuid::new_v4()));
        let err = encode(&ImageBlob::from_path(&path)).await.unwrap_err();
        assert!(matches!(err, GranthaError::Encoding { .. }));
    }
}
