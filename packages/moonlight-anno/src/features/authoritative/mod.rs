//! Authoritative Set Scanner
//!
//! Names already declared by an external annotation directory (for
//! example a hand-maintained documentation checkout). Bundles in this set
//! are never annotated and never emitted.

mod set;

pub use set::AuthoritativeSet;
