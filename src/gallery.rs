//! Photo batch loading. Local files become self-contained `data:` references
//! so downstream code never touches the filesystem again. A batch either
//! resolves completely, in selection order, or not at all.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GalleryError {
    Read { path: PathBuf, message: String },
}

impl fmt::Display for GalleryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, message } => {
                write!(f, "read {}: {}", path.display(), message)
            }
        }
    }
}

impl std::error::Error for GalleryError {}

/// Load a batch of image files as embeddable data references. Any failing
/// file fails the whole batch and leaves the caller's gallery untouched.
pub fn load_batch(paths: &[PathBuf]) -> Result<Vec<String>, GalleryError> {
    let mut refs = Vec::with_capacity(paths.len());
    for path in paths {
        let bytes = std::fs::read(path).map_err(|err| GalleryError::Read {
            path: path.clone(),
            message: err.to_string(),
        })?;
        refs.push(data_url(path, &bytes));
    }
    Ok(refs)
}

fn data_url(path: &Path, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_for(path), STANDARD.encode(bytes))
}

fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}
