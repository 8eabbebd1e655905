//! Run diagnostics
//!
//! Structural anomalies found during a run. None of them aborts the run;
//! each is logged when raised and collected into the run report.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Diagnostic severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
}

/// Advisory finding of an annotation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// Inheritance loop; `chain` starts and ends with the repeated entity
    CycleDetected { entity: String, chain: Vec<String> },

    /// A composition argument names nothing the run knows about
    MissingParent {
        bundle: String,
        parent: String,
        path: PathBuf,
    },

    /// Site whose parents never became annotated
    BlockedSite {
        bundle: String,
        path: PathBuf,
        line: usize,
        waiting_on: Vec<String>,
    },

    /// Fixed-point loop was still productive when the pass bound was hit
    PassBoundExceeded { max_passes: usize },

    /// Construction site left without an annotation line
    Unannotated {
        bundle: String,
        path: PathBuf,
        line: usize,
    },

    /// Malformed markup tolerated in non-strict mode
    MarkupRecovered { path: PathBuf, message: String },
}

impl Diagnostic {
    pub fn severity(&self) -> Severity {
        match self {
            Diagnostic::MissingParent { .. } | Diagnostic::MarkupRecovered { .. } => {
                Severity::Info
            }
            _ => Severity::Warning,
        }
    }

    /// Whether the diagnostic marks an annotation gap
    pub fn is_gap(&self) -> bool {
        matches!(
            self,
            Diagnostic::Unannotated { .. } | Diagnostic::BlockedSite { .. }
        )
    }

    /// Emit through `tracing` at the matching level
    pub fn log(&self) {
        match self.severity() {
            Severity::Info => tracing::info!("{}", self),
            Severity::Warning => tracing::warn!("{}", self),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::CycleDetected { entity, chain } => write!(
                f,
                "Circular dependency detected for {} ({})",
                entity,
                chain.join(" -> ")
            ),
            Diagnostic::MissingParent {
                bundle,
                parent,
                path,
            } => write!(
                f,
                "Unknown parent {} of mixin {} in {}",
                parent,
                bundle,
                path.display()
            ),
            Diagnostic::BlockedSite {
                bundle,
                path,
                line,
                waiting_on,
            } => write!(
                f,
                "Mixin {} at {}:{} is waiting on unannotated parents: {}",
                bundle,
                path.display(),
                line,
                waiting_on.join(", ")
            ),
            Diagnostic::PassBoundExceeded { max_passes } => write!(
                f,
                "Exceeded max annotation passes ({}), check for circular dependencies",
                max_passes
            ),
            Diagnostic::Unannotated { bundle, path, line } => write!(
                f,
                "Could not find annotation for mixin variable {} in {}:{}",
                bundle,
                path.display(),
                line
            ),
            Diagnostic::MarkupRecovered { path, message } => {
                write!(f, "Skipped rest of {}: {}", path.display(), message)
            }
        }
    }
}
