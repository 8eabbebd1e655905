//! Markup Relation Scanner
//!
//! Extracts, per named element, the three declarative facts the hierarchy
//! needs: the mixin bundles it is built from, its `inherits` templates, and
//! whether it is a visual frame.

pub mod domain;
pub mod infrastructure;

pub use domain::{ElementFacts, MarkupRelations};
pub use infrastructure::{FileMarkup, MarkupScan, MarkupScanner};
