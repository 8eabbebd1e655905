//! Markup relations
//!
//! The three facts the markup scanner extracts, kept in ordered maps so that
//! a merge over path-ordered file results is deterministic.

use std::collections::{BTreeMap, BTreeSet};

/// Attributes of one start tag that matter to the hierarchy
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementFacts {
    pub tag: String,
    pub name: String,
    pub mixin: String,
    pub inherits: String,
}

/// Relations declared by markup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkupRelations {
    /// Bundle identifier → entity name
    pub bundle_to_name: BTreeMap<String, String>,

    /// Entity name → raw comma-separated `inherits` value
    pub name_to_inherits: BTreeMap<String, String>,

    /// Entities declared with a visual frame tag
    pub frames: BTreeSet<String>,
}

impl MarkupRelations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one element
    ///
    /// Elements without a `name` carry nothing. A `mixin` value may list
    /// several bundles separated by commas; each maps to the element name.
    pub fn record(&mut self, facts: &ElementFacts, frame_tags: &[String]) {
        let name = facts.name.trim();
        if name.is_empty() {
            return;
        }

        if frame_tags.iter().any(|t| t == &facts.tag) {
            self.frames.insert(name.to_string());
        }

        for bundle in facts.mixin.split(',').map(str::trim).filter(|b| !b.is_empty()) {
            self.bundle_to_name
                .insert(bundle.to_string(), name.to_string());
        }

        if !facts.inherits.trim().is_empty() {
            self.name_to_inherits
                .insert(name.to_string(), facts.inherits.clone());
        }
    }

    /// Fold `other` into `self`; `other` wins on key conflicts
    pub fn merge(&mut self, other: MarkupRelations) {
        self.bundle_to_name.extend(other.bundle_to_name);
        self.name_to_inherits.extend(other.name_to_inherits);
        self.frames.extend(other.frames);
    }

    /// Serial merge of per-file results, in iteration order
    pub fn merge_all(parts: impl IntoIterator<Item = MarkupRelations>) -> Self {
        let mut merged = Self::new();
        for part in parts {
            merged.merge(part);
        }
        merged
    }

    /// Names of entities that declare a mixin or an inheritance
    pub fn entity_names(&self) -> BTreeSet<String> {
        self.bundle_to_name
            .values()
            .cloned()
            .chain(self.name_to_inherits.keys().cloned())
            .collect()
    }

    /// Parsed inheritance list of `name`
    pub fn inherits_of(&self, name: &str) -> Vec<String> {
        self.name_to_inherits
            .get(name)
            .map(|raw| crate::shared::models::split_parent_list(raw))
            .unwrap_or_default()
    }

    pub fn is_frame(&self, name: &str) -> bool {
        self.frames.contains(name)
    }

    pub fn is_empty(&self) -> bool {
        self.bundle_to_name.is_empty() && self.name_to_inherits.is_empty() && self.frames.is_empty()
    }
}
