//! Graph Resolver
//!
//! Builds the direct-parent edge set from markup and source facts, then
//! resolves each entity's full ancestor list with cycle detection.

pub mod domain;
pub mod infrastructure;

pub use domain::DirectParents;
pub use infrastructure::HierarchyResolver;
