//! Run report

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::errors::{AnnoError, Result};
use crate::features::annotation::RewriteOutcome;
use crate::shared::models::{Diagnostic, Severity};

/// Counts, pass statistics and diagnostics of one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub markup_files: usize,
    pub source_files: usize,
    pub construction_sites: usize,
    pub authoritative_names: usize,
    pub entities: usize,
    pub direct_edges: usize,

    // Rewriter
    pub passes: usize,
    pub productive_passes: usize,
    pub annotations_inserted: usize,
    pub bound_exceeded: bool,
    pub changed_files: Vec<PathBuf>,

    pub meta_headers_added: usize,
    pub files_written: usize,

    // Aggregate
    pub aggregate_path: PathBuf,
    pub aggregate_classes: usize,
    pub cycle_members: Vec<String>,

    pub diagnostics: Vec<Diagnostic>,
    pub elapsed_ms: u64,
}

impl RunReport {
    pub(crate) fn absorb_rewrite(&mut self, outcome: RewriteOutcome) {
        self.passes = outcome.passes;
        self.productive_passes = outcome.productive_passes;
        self.annotations_inserted = outcome.annotations_inserted;
        self.bound_exceeded = outcome.bound_exceeded;
        self.changed_files = outcome.changed_files;
        self.diagnostics.extend(outcome.diagnostics);
    }

    /// Sites left without an annotation
    pub fn gaps(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_gap())
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity() == Severity::Warning)
            .count()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|e| AnnoError::io(path, e))
    }

    /// Final summary; unannotated sites are listed last
    pub fn log_summary(&self) {
        info!(
            "Annotated {} sites in {} files ({} passes, {} productive), {} classes in aggregate, {}ms",
            self.annotations_inserted,
            self.changed_files.len(),
            self.passes,
            self.productive_passes,
            self.aggregate_classes,
            self.elapsed_ms
        );

        for diag in self.diagnostics.iter().filter(|d| matches!(d, Diagnostic::Unannotated { .. })) {
            warn!("{}", diag);
        }
    }
}
