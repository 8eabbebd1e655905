//! Hierarchy domain models

mod edges;

pub use edges::DirectParents;
