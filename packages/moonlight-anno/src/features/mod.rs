//! Feature modules
//!
//! Vertical slices in pipeline order. Larger features split into
//! - domain/         - Pure models (no IO)
//! - infrastructure/ - Scanners and resolvers over them

pub mod markup_scan;
pub mod source_scan;

pub mod hierarchy;

pub mod annotation;
pub mod authoritative;
pub mod emit;
