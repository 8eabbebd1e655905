/*
 * moonlight-anno - Mixin annotation inference for UI source trees
 *
 * Feature-First Architecture:
 * - shared/      : Common models (SourceStore, ConstructionSite, Diagnostic)
 * - features/    : Vertical slices (markup_scan, source_scan → hierarchy → annotation → emit)
 * - pipeline/    : Orchestration
 * - config/      : Validated, versioned configuration
 *
 * Concurrency:
 * - Scans run in a bounded rayon pool, local results, serial merge
 * - Rewriting and resolution are single-threaded over an in-memory snapshot
 */

// ═══════════════════════════════════════════════════════════════════════════
// Module Exports - Feature-First Architecture
// ═══════════════════════════════════════════════════════════════════════════

/// Shared models and utilities
pub mod shared;

/// Feature modules (pipeline stages)
pub mod features;

/// Pipeline orchestration
pub mod pipeline;

/// Configuration system
pub mod config;

/// Error types
pub mod errors;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports for Public API
// ═══════════════════════════════════════════════════════════════════════════

pub use config::{AnnotatorConfig, ValidatedConfig};
pub use errors::{AnnoError, Result};
pub use features::annotation::{apply_meta_headers, RewriteOutcome};
pub use features::authoritative::AuthoritativeSet;
pub use features::hierarchy::{DirectParents, HierarchyResolver};
pub use pipeline::{annotate, MixinAnnotator, RunPaths, RunReport};
pub use shared::models::{Diagnostic, Severity};
