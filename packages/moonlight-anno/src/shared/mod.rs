//! Shared module - Common types and utilities
//!
//! Types shared by every feature: construction sites, diagnostics, the
//! in-memory source store, and filesystem/line helpers.

pub mod models;
pub mod utils;

// Re-exports for convenience
pub use models::*;
