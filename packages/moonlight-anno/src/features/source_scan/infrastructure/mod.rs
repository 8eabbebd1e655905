//! Source scanning infrastructure

mod lua_scanner;

pub use lua_scanner::SourceScanner;
