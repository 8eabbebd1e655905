//! `---@class` line formatting

use std::fmt;

/// One class declaration: `Name` or `Name: P1, P2`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassAnnotation {
    pub name: String,
    pub parents: Vec<String>,
}

impl ClassAnnotation {
    pub fn new(name: impl Into<String>, parents: Vec<String>) -> Self {
        Self {
            name: name.into(),
            parents,
        }
    }

    /// Full line with `marker` and trailing newline
    pub fn line(&self, marker: &str) -> String {
        format!("{} {}\n", marker, self)
    }
}

impl fmt::Display for ClassAnnotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.parents.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}: {}", self.name, self.parents.join(", "))
        }
    }
}
