//! Construction site index

use std::collections::{BTreeMap, BTreeSet};

use crate::shared::models::{ConstructionSite, SourceStore};

/// Content snapshot plus every construction site found in it
#[derive(Debug, Clone, Default)]
pub struct SourceIndex {
    pub store: SourceStore,

    /// Bundle identifier → its sites, in path then offset order
    pub sites: BTreeMap<String, Vec<ConstructionSite>>,
}

impl SourceIndex {
    /// Serial merge of per-file scan results
    pub fn from_parts(
        parts: impl IntoIterator<Item = (crate::shared::models::SourceFile, Vec<ConstructionSite>)>,
    ) -> Self {
        let mut index = Self::default();
        for (file, sites) in parts {
            for site in sites {
                index.sites.entry(site.bundle.clone()).or_default().push(site);
            }
            index.store.insert(file);
        }
        index
    }

    pub fn sites_of(&self, bundle: &str) -> &[ConstructionSite] {
        self.sites.get(bundle).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn site_count(&self) -> usize {
        self.sites.values().map(Vec::len).sum()
    }

    /// Bundle → union of composition parents over all of its sites
    pub fn declared_parents(&self) -> BTreeMap<String, BTreeSet<String>> {
        let mut parents: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (bundle, sites) in &self.sites {
            for site in sites.iter().filter(|s| s.is_composed()) {
                parents
                    .entry(bundle.clone())
                    .or_default()
                    .extend(site.parents.iter().cloned());
            }
        }
        parents
    }
}
