//! Common test utilities for moonlight-anno
//!
//! Temporary corpus fixtures and report assertions shared by the
//! integration tests.

#![allow(dead_code)]

mod assertions;
mod fixtures;

pub use assertions::*;
pub use fixtures::*;
