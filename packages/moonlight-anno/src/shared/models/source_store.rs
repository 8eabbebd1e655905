//! In-memory source snapshot
//!
//! Owned by one run. Scan tasks produce [`SourceFile`]s independently; the
//! store is assembled serially afterwards, mutated only by the rewriter, and
//! flushed once at the end of the run.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::errors::{AnnoError, Result};

/// Content snapshot of one source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    path: PathBuf,
    content: Vec<u8>,
    dirty: bool,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>, content: Vec<u8>) -> Self {
        Self {
            path: path.into(),
            content,
            dirty: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Content as text (lossy for non-UTF-8 bytes)
    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.content)
    }

    /// Replace content; marks the file dirty when it actually changed
    pub fn replace(&mut self, content: Vec<u8>) -> bool {
        if content == self.content {
            return false;
        }
        self.content = content;
        self.dirty = true;
        true
    }

    /// Whether content differs from what was read
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

/// Path-ordered map of source snapshots
#[derive(Debug, Clone, Default)]
pub struct SourceStore {
    files: BTreeMap<PathBuf, SourceFile>,
}

impl SourceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold scan results into a store; a later duplicate path replaces an earlier one
    pub fn from_files(files: impl IntoIterator<Item = SourceFile>) -> Self {
        let mut store = Self::new();
        for file in files {
            store.insert(file);
        }
        store
    }

    pub fn insert(&mut self, file: SourceFile) {
        self.files.insert(file.path.clone(), file);
    }

    pub fn get(&self, path: &Path) -> Option<&SourceFile> {
        self.files.get(path)
    }

    pub fn get_mut(&mut self, path: &Path) -> Option<&mut SourceFile> {
        self.files.get_mut(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SourceFile> {
        self.files.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut SourceFile> {
        self.files.values_mut()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Paths whose content changed during the run, in path order
    pub fn dirty_paths(&self) -> Vec<PathBuf> {
        self.files
            .values()
            .filter(|f| f.dirty)
            .map(|f| f.path.clone())
            .collect()
    }

    /// Write every dirty file back to disk
    ///
    /// Each path is written at most once. Returns the number of files written.
    pub fn persist(&mut self) -> Result<usize> {
        let mut written = 0;
        for file in self.files.values_mut().filter(|f| f.dirty) {
            std::fs::write(&file.path, &file.content)
                .map_err(|e| AnnoError::io(&file.path, e))?;
            file.dirty = false;
            written += 1;
        }
        Ok(written)
    }
}
