//! Markup domain models

mod relations;

pub use relations::{ElementFacts, MarkupRelations};
