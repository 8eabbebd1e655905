//! Lua construction scanner
//!
//! Loads every source file into memory in parallel and records its
//! construction sites. Each task owns its file; the merge into a
//! [`SourceIndex`] is serial and path-ordered.

use rayon::prelude::*;
use std::path::Path;
use tracing::{debug, info};

use crate::config::ScanConfig;
use crate::errors::Result;
use crate::features::source_scan::domain::{ConstructionPattern, SourceIndex};
use crate::shared::models::{ConstructionSite, SourceFile};
use crate::shared::utils::{discover_files, read_file};

/// Source construction scanner
pub struct SourceScanner {
    config: ScanConfig,
    pattern: ConstructionPattern,
}

impl SourceScanner {
    pub fn new(config: ScanConfig, pattern: ConstructionPattern) -> Self {
        Self { config, pattern }
    }

    /// Scan every source file under `root`
    ///
    /// Runs in the current rayon pool; the first read failure aborts the phase.
    pub fn scan(&self, root: &Path) -> Result<SourceIndex> {
        let files = discover_files(root, &self.config.source_extension)?;
        info!("Loading {} source files into memory", files.len());

        let parts: Vec<(SourceFile, Vec<ConstructionSite>)> = files
            .par_iter()
            .map(|path| self.scan_file(path))
            .collect::<Result<Vec<_>>>()?;

        let index = SourceIndex::from_parts(parts);
        debug!(
            "Found {} construction sites for {} mixins",
            index.site_count(),
            index.sites.len()
        );
        Ok(index)
    }

    /// Read one file and find its sites
    pub fn scan_file(&self, path: &Path) -> Result<(SourceFile, Vec<ConstructionSite>)> {
        let content = read_file(path)?;
        let sites = self.pattern.sites(path, &content);
        Ok((SourceFile::new(path, content), sites))
    }
}
