//! Aggregate Emitter
//!
//! Writes one declaration file with a `---@class Name: ancestors` line for
//! every markup entity.

mod aggregate;

pub use aggregate::AggregateEmitter;
