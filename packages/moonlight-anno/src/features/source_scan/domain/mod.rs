//! Source scanning domain

mod index;
mod pattern;

pub use index::SourceIndex;
pub use pattern::{is_annotated, ConstructionMatch, ConstructionPattern};
