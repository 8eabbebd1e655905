use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::{EmitConfig, RewriteConfig};
use crate::errors::{AnnoError, Result};
use crate::features::annotation::ClassAnnotation;
use crate::features::authoritative::AuthoritativeSet;
use crate::features::hierarchy::HierarchyResolver;

const DEFAULT_META_HEADER: &str = "---@meta";

/// Renders and writes the aggregate declaration file
pub struct AggregateEmitter<'a> {
    emit: &'a EmitConfig,
    marker: &'a str,
    header: &'a str,
}

impl<'a> AggregateEmitter<'a> {
    pub fn new(emit: &'a EmitConfig, rewrite: &'a RewriteConfig) -> Self {
        Self {
            emit,
            marker: &rewrite.annotation_marker,
            header: rewrite.meta_header.as_deref().unwrap_or(DEFAULT_META_HEADER),
        }
    }

    /// Aggregate text for `entities`
    ///
    /// Sigil-prefixed, authoritative and parentless entities are left out.
    /// Returns the text and the number of classes in it.
    pub fn render(
        &self,
        resolver: &mut HierarchyResolver<'_>,
        entities: &BTreeSet<String>,
        authoritative: &AuthoritativeSet,
    ) -> (String, usize) {
        let mut out = format!("{}\n\n", self.header);
        let mut classes = 0;

        for name in entities {
            if name.starts_with(self.emit.synthetic_sigil.as_str()) || authoritative.contains(name) {
                continue;
            }
            let ancestors = resolver.resolve(name);
            if ancestors.is_empty() {
                continue;
            }
            out.push_str(&ClassAnnotation::new(name.clone(), ancestors).line(self.marker));
            out.push('\n');
            classes += 1;
        }

        (out, classes)
    }

    /// Target path under `out_dir`
    pub fn target(&self, out_dir: &Path) -> PathBuf {
        out_dir.join(&self.emit.generated_path)
    }

    /// Overwrite the aggregate file, creating its directory when needed
    pub fn write(&self, out_dir: &Path, content: &str) -> Result<PathBuf> {
        let target = self.target(out_dir);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).map_err(|e| AnnoError::io(parent, e))?;
        }
        std::fs::write(&target, content).map_err(|e| AnnoError::io(&target, e))?;
        info!("Wrote aggregate annotations to {}", target.display());
        Ok(target)
    }
}
