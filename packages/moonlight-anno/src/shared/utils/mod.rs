//! Utility modules shared across features
//!
//! - `fs_walk`: sorted, extension-filtered file discovery
//! - `lines`: byte-offset line arithmetic over file content

pub mod fs_walk;
pub mod lines;

// Re-exports for convenience
pub use fs_walk::{discover_files, read_file};
pub use lines::{line_number, line_start, previous_line};
