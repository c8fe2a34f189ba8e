use std::path::{Path, PathBuf};

use bytes::Bytes;

use crate::mime_detect::{detect_mime_type, is_image};

/// Where a blob's bytes live.
#[derive(Debug, Clone)]
enum ImageSource {
    /// Bytes already in memory (cheap to clone).
    Memory(Bytes),
    /// A file on disk, read when the item is encoded.
    File(PathBuf),
}

/// One user-supplied image: its bytes (or where to find them), declared media
/// type, and original filename. Immutable once created.
#[derive(Debug, Clone)]
pub struct ImageBlob {
    filename: String,
    mime_type: String,
    source: ImageSource,
}

impl ImageBlob {
    pub fn from_bytes(
        filename: impl Into<String>,
        mime_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            filename: filename.into(),
            mime_type: mime_type.into(),
            source: ImageSource::Memory(data.into()),
        }
    }

    /// Reference a file on disk; the media type is inferred from its extension.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            filename,
            mime_type: detect_mime_type(path).to_string(),
            source: ImageSource::File(path.to_path_buf()),
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn is_image(&self) -> bool {
        is_image(&self.mime_type)
    }

    /// Read the full binary content.
    pub async fn read(&self) -> std::io::Result<Bytes> {
        match &self.source {
            ImageSource::Memory(data) => Ok(data.clone()),
            ImageSource::File(path) => tokio::fs::read(path).await.map(Bytes::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path_infers_name_and_type() {
        let blob = ImageBlob::from_path("/tmp/manuscripts/folio-3.jpeg");
        assert_eq!(blob.filename(), "folio-3.jpeg");
        assert_eq!(blob.mime_type(), "image/jpeg");
        assert!(blob.is_image());
        assert!(matches!(blob.source, ImageSource::File(_)));
    }

    #[test]
    fn test_non_image_is_flagged() {
        let blob = ImageBlob::from_path("readme.txt");
        assert!(!blob.is_image());
    }

    #[tokio::test]
    async fn test_read_memory_blob() {
        let blob = ImageBlob::from_bytes("a.png", "image/png", vec![1u8, 2, 3]);
        let data = blob.read().await.unwrap();
        assert_eq!(&data[..], &[1, 2, 3]);
    }
}
