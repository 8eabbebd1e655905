//! Construction site model

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One textual occurrence of a mixin construction
///
/// `Name = {` or `Name = CreateFromMixins(A, B)` at the start of a line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConstructionSite {
    pub path: PathBuf,

    /// Byte offset of the match start
    pub offset: usize,

    /// 1-based line of the match start
    pub line: usize,

    /// Bundle identifier being assigned
    pub bundle: String,

    /// Trimmed, de-duplicated composition arguments (in source order)
    pub parents: Vec<String>,
}

impl ConstructionSite {
    pub fn new(
        path: impl Into<PathBuf>,
        offset: usize,
        line: usize,
        bundle: impl Into<String>,
        parents: Vec<String>,
    ) -> Self {
        Self {
            path: path.into(),
            offset,
            line,
            bundle: bundle.into(),
            parents,
        }
    }

    /// Whether the site composes other bundles
    pub fn is_composed(&self) -> bool {
        !self.parents.is_empty()
    }
}

/// Split a raw composition argument list into cleaned parent names
///
/// Whitespace is trimmed, empty entries dropped, duplicates collapsed while
/// keeping first-seen order.
pub fn split_parent_list(raw: &str) -> Vec<String> {
    let mut parents: Vec<String> = Vec::new();
    for part in raw.split(',') {
        let trimmed = part.trim();
        if trimmed.is_empty() || parents.iter().any(|p| p == trimmed) {
            continue;
        }
        parents.push(trimmed.to_string());
    }
    parents
}
