//! Error types for moonlight-anno
//!
//! Fatal errors only. Structural anomalies (cycles, missing parents,
//! unannotated sites) are [`Diagnostic`](crate::shared::models::Diagnostic)
//! values and never abort a run.

use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;

/// Main error type for annotation runs
#[derive(Debug, Error)]
pub enum AnnoError {
    /// File could not be read or written
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Directory traversal failed
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Markup file is not well-formed
    #[error("Markup error in {path}: {message}")]
    Markup { path: PathBuf, message: String },

    /// Construction pattern failed to compile
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Worker pool could not be created
    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// Run report could not be serialized
    #[error("Report serialization error: {0}")]
    Report(#[from] serde_json::Error),
}

impl AnnoError {
    /// Wrap an IO error with the path it occurred on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AnnoError::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a markup error
    pub fn markup(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        AnnoError::Markup {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for annotation operations
pub type Result<T> = std::result::Result<T, AnnoError>;
