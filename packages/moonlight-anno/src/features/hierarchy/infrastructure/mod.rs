//! Hierarchy resolution

mod resolver;

pub use resolver::HierarchyResolver;
