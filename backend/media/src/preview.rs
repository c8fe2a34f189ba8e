//! Display-only handles for queued images.
//!
//! A preview reference keeps the blob resolvable for rendering until it is
//! released. Every reference created must be released exactly once, which the
//! queue does when it is cleared.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;
use uuid::Uuid;

use crate::image::ImageBlob;

/// Handle to a registered preview.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PreviewRef(Uuid);

impl PreviewRef {
    /// Renderable URI for the preview.
    pub fn uri(&self) -> String {
        format!("preview://{}", self.0)
    }
}

impl fmt::Display for PreviewRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "preview://{}", self.0)
    }
}

/// Registry of live previews. Cloning shares the same registry.
#[derive(Debug, Clone, Default)]
pub struct PreviewRegistry {
    entries: Arc<RwLock<HashMap<PreviewRef, ImageBlob>>>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a preview for `blob`.
    pub fn create(&self, blob: &ImageBlob) -> PreviewRef {
        let preview = PreviewRef(Uuid::new_v4());
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(preview.clone(), blob.clone());
        debug!(preview = %preview, filename = %blob.filename(), "Preview created");
        preview
    }

    /// Release a preview. Returns `false` if it was already released.
    pub fn release(&self, preview: &PreviewRef) -> bool {
        let removed = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(preview)
            .is_some();
        if removed {
            debug!(preview = %preview, "Preview released");
        }
        removed
    }

    /// Number of previews not yet released.
    pub fn live_count(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}
