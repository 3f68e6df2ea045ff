//! Saving the edited document back to disk.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Media type of the saved artifact
pub const MIME_TYPE: &str = "image/svg+xml";

/// File name used when saving into a directory
pub const DEFAULT_FILE_NAME: &str = "validated.svg";

/// Resolve where a save to `target` lands.
///
/// A directory gets `file_name` appended; anything else is taken as the file path.
pub fn resolve_target(target: &Path, file_name: &str) -> PathBuf {
    if target.is_dir() {
        target.join(file_name)
    } else {
        target.to_path_buf()
    }
}

/// Write `content` verbatim as `validated.svg` (or to `target` itself)
pub fn save_document(content: &str, target: &Path) -> Result<PathBuf> {
    save_document_as(content, target, DEFAULT_FILE_NAME)
}

/// Like [`save_document`] with a custom file name for directory targets
pub fn save_document_as(content: &str, target: &Path, file_name: &str) -> Result<PathBuf> {
    let path = resolve_target(target, file_name);
    fs::write(&path, content)
        .with_context(|| format!("Failed to write {} to {}", MIME_TYPE, path.display()))?;
    log::info!("Saved document to {}", path.display());
    Ok(path)
}
