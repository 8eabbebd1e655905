//! Annotator configuration
//!
//! Top-level configuration struct with per-stage defaults and closure-based
//! overrides. `build()` validates every stage and yields a [`ValidatedConfig`],
//! the only form the pipeline accepts.

use super::{
    error::{ConfigError, ConfigResult},
    io::ConfigExportV1,
    stage_configs::*,
    validation::Validatable,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Supported YAML schema versions
const SUPPORTED_VERSIONS: &[u32] = &[1];

/// Annotator configuration (unvalidated)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatorConfig {
    pub scan: ScanConfig,
    pub hierarchy: HierarchyConfig,
    pub rewrite: RewriteConfig,
    pub emit: EmitConfig,
}

impl AnnotatorConfig {
    /// Override scan settings
    pub fn scan<F>(mut self, f: F) -> Self
    where
        F: FnOnce(ScanConfig) -> ScanConfig,
    {
        self.scan = f(self.scan);
        self
    }

    /// Override hierarchy settings
    pub fn hierarchy<F>(mut self, f: F) -> Self
    where
        F: FnOnce(HierarchyConfig) -> HierarchyConfig,
    {
        self.hierarchy = f(self.hierarchy);
        self
    }

    /// Override rewrite settings
    pub fn rewrite<F>(mut self, f: F) -> Self
    where
        F: FnOnce(RewriteConfig) -> RewriteConfig,
    {
        self.rewrite = f(self.rewrite);
        self
    }

    /// Override emit settings
    pub fn emit<F>(mut self, f: F) -> Self
    where
        F: FnOnce(EmitConfig) -> EmitConfig,
    {
        self.emit = f(self.emit);
        self
    }

    /// Validate all stages
    pub fn build(self) -> ConfigResult<ValidatedConfig> {
        self.scan.validate()?;
        self.hierarchy.validate()?;
        self.rewrite.validate()?;
        self.emit.validate()?;
        Ok(ValidatedConfig(self))
    }

    /// Load and validate a YAML v1 configuration file
    pub fn from_yaml(path: impl AsRef<Path>) -> ConfigResult<ValidatedConfig> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&content)
    }

    /// Parse and validate YAML v1 configuration text
    pub fn from_yaml_str(content: &str) -> ConfigResult<ValidatedConfig> {
        let export: ConfigExportV1 = serde_yaml::from_str(content)?;

        let version = export.version.ok_or(ConfigError::MissingVersion)?;
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(ConfigError::UnsupportedVersion {
                found: version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }

        let config = Self {
            scan: export.scan.unwrap_or_default(),
            hierarchy: export.hierarchy.unwrap_or_default(),
            rewrite: export.rewrite.unwrap_or_default(),
            emit: export.emit.unwrap_or_default(),
        };
        config.build()
    }

    /// Export as YAML v1
    pub fn to_yaml(&self) -> ConfigResult<String> {
        let export = ConfigExportV1 {
            version: Some(1),
            scan: Some(self.scan.clone()),
            hierarchy: Some(self.hierarchy.clone()),
            rewrite: Some(self.rewrite.clone()),
            emit: Some(self.emit.clone()),
        };
        Ok(serde_yaml::to_string(&export)?)
    }
}

/// Configuration that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedConfig(AnnotatorConfig);

impl ValidatedConfig {
    /// Unwrap the validated config
    pub fn into_inner(self) -> AnnotatorConfig {
        self.0
    }

    /// Get a reference to the inner config
    pub fn as_inner(&self) -> &AnnotatorConfig {
        &self.0
    }

    pub fn scan(&self) -> &ScanConfig {
        &self.0.scan
    }

    pub fn hierarchy(&self) -> &HierarchyConfig {
        &self.0.hierarchy
    }

    pub fn rewrite(&self) -> &RewriteConfig {
        &self.0.rewrite
    }

    pub fn emit(&self) -> &EmitConfig {
        &self.0.emit
    }

    /// Get a human-readable description of the configuration
    pub fn describe(&self) -> String {
        format!(
            "workers={} max_passes={} compose={} marker={} generated={}",
            self.0.scan.workers,
            self.0.rewrite.max_passes,
            self.0.rewrite.compose_function,
            self.0.rewrite.annotation_marker,
            self.0.emit.generated_path.display()
        )
    }
}

impl Default for ValidatedConfig {
    fn default() -> Self {
        ValidatedConfig(AnnotatorConfig::default())
    }
}
