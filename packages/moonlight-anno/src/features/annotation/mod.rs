//! Annotation Rewriter
//!
//! Inserts `---@class` lines above construction sites in the in-memory
//! snapshot, in dependency order, until a fixed point. The verifier and
//! the meta header pass run over the same snapshot before it is persisted.

mod class_line;
mod meta_header;
mod rewriter;
mod verifier;

pub use class_line::ClassAnnotation;
pub use meta_header::{apply_meta_headers, ensure_meta_header, prepend_meta_headers};
pub use rewriter::{AnnotationRewriter, RewriteOutcome};
pub use verifier::AnnotationVerifier;
