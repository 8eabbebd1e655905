//! Configuration System
//!
//! Three tiers:
//! - Level 1: Defaults - `ValidatedConfig::default()`
//! - Level 2: Stage Override - closures on [`AnnotatorConfig`]
//! - Level 3: YAML - versioned schema loaded with [`AnnotatorConfig::from_yaml`]
//!
//! # Examples
//!
//! ```rust,ignore
//! use moonlight_anno::config::AnnotatorConfig;
//!
//! let config = AnnotatorConfig::default()
//!     .rewrite(|c| c.max_passes(8))
//!     .build()?;
//!
//! let config = AnnotatorConfig::from_yaml("moonlight.yaml")?;
//! ```

pub mod annotator_config;
pub mod error;
pub mod io;
pub mod stage_configs;
pub mod validation;

// Re-exports
pub use annotator_config::{AnnotatorConfig, ValidatedConfig};
pub use error::{ConfigError, ConfigResult};
pub use io::ConfigExportV1;
pub use stage_configs::{EmitConfig, HierarchyConfig, RewriteConfig, ScanConfig};
pub use validation::Validatable;
