//! Source Construction Scanner
//!
//! Finds mixin construction sites (`Name = {` and
//! `Name = CreateFromMixins(...)`) in Lua source with a line-anchored
//! pattern.

pub mod domain;
pub mod infrastructure;

pub use domain::{is_annotated, ConstructionMatch, ConstructionPattern, SourceIndex};
pub use infrastructure::SourceScanner;
