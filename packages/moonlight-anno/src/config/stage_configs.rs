//! Stage-specific configuration types
//!
//! Each phase of an annotation run has its own configuration struct with
//! validation and builder setters.

use super::error::ConfigResult;
use super::validation::{check_non_empty, check_range, Validatable};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ============================================================================
// Scan: markup + source discovery
// ============================================================================

/// Scan phase configuration (markup and source discovery)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Worker threads for the scan pool (1..=512)
    pub workers: usize,

    /// Extension of declarative markup files
    pub markup_extension: String,

    /// Extension of Lua source files
    pub source_extension: String,

    /// Element tags that denote a visual frame
    pub frame_tags: Vec<String>,

    /// Abort the run on malformed markup
    pub strict_markup: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            workers: num_cpus::get().clamp(1, 512),
            markup_extension: "xml".to_string(),
            source_extension: "lua".to_string(),
            frame_tags: vec!["Frame".to_string(), "EventFrame".to_string()],
            strict_markup: true,
        }
    }
}

impl ScanConfig {
    /// Builder: Set workers
    pub fn workers(mut self, v: usize) -> Self {
        self.workers = v;
        self
    }

    /// Builder: Set strict_markup
    pub fn strict_markup(mut self, v: bool) -> Self {
        self.strict_markup = v;
        self
    }

    /// Builder: Set frame_tags
    pub fn frame_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.frame_tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

impl Validatable for ScanConfig {
    fn validate(&self) -> ConfigResult<()> {
        check_range(
            "scan.workers",
            self.workers,
            1,
            512,
            "The scan pool needs at least one worker",
        )?;
        check_non_empty(
            "scan.markup_extension",
            &self.markup_extension,
            "Markup files are usually 'xml'",
        )?;
        check_non_empty(
            "scan.source_extension",
            &self.source_extension,
            "Source files are usually 'lua'",
        )?;
        Ok(())
    }
}

// ============================================================================
// Hierarchy: direct-parent edges
// ============================================================================

/// Hierarchy configuration (implicit edges)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HierarchyConfig {
    /// Implicit parent of every entity declared with a frame tag
    pub frame_parent: String,
}

impl Default for HierarchyConfig {
    fn default() -> Self {
        Self {
            frame_parent: "Frame".to_string(),
        }
    }
}

impl HierarchyConfig {
    /// Builder: Set frame_parent
    pub fn frame_parent(mut self, v: impl Into<String>) -> Self {
        self.frame_parent = v.into();
        self
    }
}

impl Validatable for HierarchyConfig {
    fn validate(&self) -> ConfigResult<()> {
        check_non_empty(
            "hierarchy.frame_parent",
            &self.frame_parent,
            "Frames need a base class name such as 'Frame'",
        )
    }
}

// ============================================================================
// Rewrite: fixed-point annotation
// ============================================================================

/// Rewrite phase configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewriteConfig {
    /// Safety bound on annotation passes (1..=1024)
    pub max_passes: usize,

    /// Function name of the mixin composition call
    pub compose_function: String,

    /// Marker that starts an annotation line
    pub annotation_marker: String,

    /// Header every source file must start with (`None` disables the pass)
    pub meta_header: Option<String>,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            max_passes: 16,
            compose_function: "CreateFromMixins".to_string(),
            annotation_marker: "---@class".to_string(),
            meta_header: Some("---@meta".to_string()),
        }
    }
}

impl RewriteConfig {
    /// Builder: Set max_passes
    pub fn max_passes(mut self, v: usize) -> Self {
        self.max_passes = v;
        self
    }

    /// Builder: Set compose_function
    pub fn compose_function(mut self, v: impl Into<String>) -> Self {
        self.compose_function = v.into();
        self
    }

    /// Builder: Set meta_header
    pub fn meta_header(mut self, v: Option<String>) -> Self {
        self.meta_header = v;
        self
    }
}

impl Validatable for RewriteConfig {
    fn validate(&self) -> ConfigResult<()> {
        check_range(
            "rewrite.max_passes",
            self.max_passes,
            1,
            1024,
            "Annotation passes must be finite and at least 1",
        )?;
        check_non_empty(
            "rewrite.compose_function",
            &self.compose_function,
            "The default composition call is 'CreateFromMixins'",
        )?;
        check_non_empty(
            "rewrite.annotation_marker",
            &self.annotation_marker,
            "The default marker is '---@class'",
        )?;
        if let Some(header) = &self.meta_header {
            check_non_empty(
                "rewrite.meta_header",
                header,
                "Use null to disable the meta header pass",
            )?;
        }
        Ok(())
    }
}

// ============================================================================
// Emit: aggregate declarative file
// ============================================================================

/// Aggregate emission configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitConfig {
    /// Prefix of synthetic entities that are never emitted
    pub synthetic_sigil: String,

    /// Output path, relative to the run's output root
    pub generated_path: PathBuf,
}

impl Default for EmitConfig {
    fn default() -> Self {
        Self {
            synthetic_sigil: "$".to_string(),
            generated_path: PathBuf::from("generated").join("generated.lua"),
        }
    }
}

impl EmitConfig {
    /// Builder: Set generated_path
    pub fn generated_path(mut self, v: impl Into<PathBuf>) -> Self {
        self.generated_path = v.into();
        self
    }
}

impl Validatable for EmitConfig {
    fn validate(&self) -> ConfigResult<()> {
        check_non_empty(
            "emit.synthetic_sigil",
            &self.synthetic_sigil,
            "Private entities are prefixed with '$'",
        )?;
        if self.generated_path.as_os_str().is_empty() {
            return Err(super::ConfigError::empty(
                "emit.generated_path",
                "The default is 'generated/generated.lua'",
            ));
        }
        Ok(())
    }
}
