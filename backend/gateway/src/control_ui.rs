//! Static hosting for the browser client.
//!
//! Files are served from the static directory; any other path gets
//! `index.html` so client-side routes resolve.

use std::path::Path;

use tower_http::services::{ServeDir, ServeFile};

pub fn spa_service(static_dir: &Path) -> ServeDir<ServeFile> {
    ServeDir::new(static_dir).fallback(ServeFile::new(static_dir.join("index.html")))
}
