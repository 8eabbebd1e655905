//! Meta header pass
//!
//! Marks source files as declaration-only for the language server by
//! making sure each one starts with the meta header line.

use std::path::Path;
use tracing::info;

use crate::errors::{AnnoError, Result};
use crate::shared::models::SourceStore;
use crate::shared::utils::{discover_files, read_file};

/// Content with `header` prepended, or `None` when it already starts with it
pub fn ensure_meta_header(content: &[u8], header: &str) -> Option<Vec<u8>> {
    if content.starts_with(header.as_bytes()) {
        return None;
    }
    let mut out = Vec::with_capacity(header.len() + 1 + content.len());
    out.extend_from_slice(header.as_bytes());
    out.push(b'\n');
    out.extend_from_slice(content);
    Some(out)
}

/// Apply the header to every file in the snapshot; returns files changed
pub fn prepend_meta_headers(store: &mut SourceStore, header: &str) -> usize {
    let mut changed = 0;
    for file in store.iter_mut() {
        if let Some(updated) = ensure_meta_header(file.content(), header) {
            if file.replace(updated) {
                changed += 1;
            }
        }
    }
    changed
}

/// Apply the header to every `extension` file under `dir`, on disk
pub fn apply_meta_headers(dir: &Path, extension: &str, header: &str) -> Result<usize> {
    let mut changed = 0;
    for path in discover_files(dir, extension)? {
        let content = read_file(&path)?;
        if let Some(updated) = ensure_meta_header(&content, header) {
            std::fs::write(&path, updated).map_err(|e| AnnoError::io(&path, e))?;
            changed += 1;
        }
    }
    info!("Added meta header to {} files in {}", changed, dir.display());
    Ok(changed)
}
