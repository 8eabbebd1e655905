//! Construction pattern
//!
//! A line-anchored regex, not a parser:
//!
//! ```text
//! (?m)^([\w]+)\s*=\s*\n?(?:CreateFromMixins\(([^)]+)\);?|\{)
//! ```
//!
//! Known limitations: a matching line inside a long string or block comment
//! is reported as a site, and a composition argument containing `)` is cut
//! short. Both are accepted.

use regex::bytes::Regex;
use std::path::Path;

use crate::errors::Result;
use crate::shared::models::{split_parent_list, ConstructionSite};
use crate::shared::utils::{line_number, line_start, previous_line};

/// One match of the construction pattern in some content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructionMatch {
    /// Byte offset of the match (always a line start)
    pub start: usize,
    pub end: usize,
    pub bundle: String,
    pub parents: Vec<String>,
}

/// Compiled construction pattern
#[derive(Debug, Clone)]
pub struct ConstructionPattern {
    regex: Regex,
}

impl ConstructionPattern {
    /// Compile the pattern for a composition function name
    pub fn new(compose_function: &str) -> Result<Self> {
        let source = format!(
            r"(?m)^([\w]+)\s*=\s*\n?(?:{}\(([^)]+)\);?|\{{)",
            regex::escape(compose_function)
        );
        Ok(Self {
            regex: Regex::new(&source)?,
        })
    }

    /// All matches, in content order
    pub fn find_all(&self, content: &[u8]) -> Vec<ConstructionMatch> {
        self.regex
            .captures_iter(content)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let bundle = String::from_utf8_lossy(caps.get(1)?.as_bytes()).into_owned();
                let parents = caps
                    .get(2)
                    .map(|m| split_parent_list(&String::from_utf8_lossy(m.as_bytes())))
                    .unwrap_or_default();
                Some(ConstructionMatch {
                    start: whole.start(),
                    end: whole.end(),
                    bundle,
                    parents,
                })
            })
            .collect()
    }

    /// Matches as construction sites of `path`
    pub fn sites(&self, path: &Path, content: &[u8]) -> Vec<ConstructionSite> {
        self.find_all(content)
            .into_iter()
            .map(|m| {
                ConstructionSite::new(
                    path,
                    m.start,
                    line_number(content, m.start),
                    m.bundle,
                    m.parents,
                )
            })
            .collect()
    }
}

/// Whether the line directly above `pos` carries `marker`
pub fn is_annotated(content: &[u8], pos: usize, marker: &str) -> bool {
    let start = line_start(content, pos);
    previous_line(content, start)
        .map(|line| contains_marker(line, marker))
        .unwrap_or(false)
}

fn contains_marker(line: &[u8], marker: &str) -> bool {
    let needle = marker.as_bytes();
    !needle.is_empty() && line.windows(needle.len()).any(|w| w == needle)
}
