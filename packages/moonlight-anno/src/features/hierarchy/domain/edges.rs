//! Direct-parent edge set

use std::collections::{BTreeMap, BTreeSet};

use crate::features::markup_scan::MarkupRelations;

/// Entity → direct parents
///
/// Set semantics; self-edges are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectParents {
    edges: BTreeMap<String, BTreeSet<String>>,
}

impl DirectParents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Combine markup relations with composition parents found in source
    ///
    /// - each bundle mapped to an entity is a parent of that entity
    /// - each `inherits` entry is a parent
    /// - frames get `frame_parent`
    /// - each composition argument is a parent of the composed bundle
    pub fn build(
        relations: &MarkupRelations,
        declared: &BTreeMap<String, BTreeSet<String>>,
        frame_parent: &str,
    ) -> Self {
        let mut parents = Self::new();

        for (bundle, name) in &relations.bundle_to_name {
            parents.add(name, bundle);
        }
        for name in relations.name_to_inherits.keys() {
            for parent in relations.inherits_of(name) {
                parents.add(name, &parent);
            }
        }
        for name in &relations.frames {
            parents.add(name, frame_parent);
        }
        for (bundle, composed) in declared {
            for parent in composed {
                parents.add(bundle, parent);
            }
        }

        parents
    }

    /// Add an edge `child → parent`; returns false for self or empty edges
    pub fn add(&mut self, child: &str, parent: &str) -> bool {
        let parent = parent.trim();
        if child.is_empty() || parent.is_empty() || child == parent {
            return false;
        }
        self.edges
            .entry(child.to_string())
            .or_default()
            .insert(parent.to_string())
    }

    /// Direct parents of `name`, sorted
    pub fn parents_of(&self, name: &str) -> Vec<String> {
        self.edges
            .get(name)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Entities with at least one parent
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(BTreeSet::len).sum()
    }
}
