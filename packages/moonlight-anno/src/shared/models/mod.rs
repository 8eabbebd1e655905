//! Shared models

mod diagnostic;
mod site;
mod source_store;

pub use diagnostic::{Diagnostic, Severity};
pub use site::{split_parent_list, ConstructionSite};
pub use source_store::{SourceFile, SourceStore};
