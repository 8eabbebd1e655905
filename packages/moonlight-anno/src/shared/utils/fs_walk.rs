//! File discovery

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::errors::{AnnoError, Result};

/// Discover every file under `root` with the given extension
///
/// Hidden entries are skipped. Results are sorted so that downstream merges
/// are deterministic. A walk error aborts discovery.
pub fn discover_files(root: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'))
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let matches_ext = path
            .extension()
            .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case(extension))
            .unwrap_or(false);
        if matches_ext {
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    Ok(files)
}

/// Read a whole file, attaching the path to any IO error
pub fn read_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| AnnoError::io(path, e))
}
