//! Pipeline orchestration

pub mod orchestrator;
pub mod report;

pub use orchestrator::{annotate, MixinAnnotator, RunPaths};
pub use report::RunReport;
