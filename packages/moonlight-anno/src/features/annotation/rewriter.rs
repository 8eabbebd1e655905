//! Fixed-point annotation rewriter
//!
//! Each pass re-scans the current snapshot of every file (sorted by path)
//! and walks its construction matches in reverse, so an insertion never
//! shifts the offset of a match still to be visited. A match is:
//! - skipped when the line above already carries the marker, or when its
//!   bundle is authoritative
//! - deferred when a parent is a corpus bundle that had no annotation at
//!   the start of the pass
//! - annotated otherwise
//!
//! A pass that inserts nothing while sites are still deferred means the
//! deferred bundles compose each other. The members of each such cycle are
//! released: the next pass annotates them with their full parent list and
//! their descendants follow in dependency order.
//!
//! The loop ends on the first pass that changes nothing with no cycle left
//! to release, or at `max_passes`. Nothing is written to disk here.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use super::ClassAnnotation;
use crate::config::RewriteConfig;
use crate::features::authoritative::AuthoritativeSet;
use crate::features::markup_scan::MarkupRelations;
use crate::features::source_scan::{is_annotated, ConstructionMatch, ConstructionPattern};
use crate::shared::models::{Diagnostic, SourceStore};
use crate::shared::utils::{line_number, line_start};

/// Result of a rewrite run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RewriteOutcome {
    /// Passes executed, the final unproductive one included
    pub passes: usize,
    pub productive_passes: usize,
    pub annotations_inserted: usize,
    /// Files touched by at least one pass, in path order
    pub changed_files: Vec<PathBuf>,
    pub bound_exceeded: bool,
    pub diagnostics: Vec<Diagnostic>,
}

impl RewriteOutcome {
    pub fn converged(&self) -> bool {
        !self.bound_exceeded
    }
}

#[derive(Default)]
struct PassResult {
    inserted: usize,
    changed: Vec<PathBuf>,
    blocked: Vec<Diagnostic>,
}

/// Dependency-ordered annotation inserter
pub struct AnnotationRewriter<'a> {
    config: &'a RewriteConfig,
    pattern: &'a ConstructionPattern,
    relations: &'a MarkupRelations,
    authoritative: &'a AuthoritativeSet,
}

impl<'a> AnnotationRewriter<'a> {
    pub fn new(
        config: &'a RewriteConfig,
        pattern: &'a ConstructionPattern,
        relations: &'a MarkupRelations,
        authoritative: &'a AuthoritativeSet,
    ) -> Self {
        Self {
            config,
            pattern,
            relations,
            authoritative,
        }
    }

    /// Run passes until nothing changes or the pass bound is reached
    pub fn run(&self, store: &mut SourceStore) -> RewriteOutcome {
        let corpus = self.corpus_bundles(store);
        let mut outcome = RewriteOutcome {
            diagnostics: self.missing_parents(store, &corpus),
            ..RewriteOutcome::default()
        };

        let mut changed_files = BTreeSet::new();
        let mut blocked = Vec::new();
        let mut released = BTreeSet::new();
        let mut converged = false;

        for _ in 0..self.config.max_passes {
            outcome.passes += 1;
            let pass = self.pass(store, &corpus, &released);
            blocked = pass.blocked;

            if pass.inserted == 0 {
                let cycles = composition_cycles(&blocked, &released);
                if cycles.is_empty() {
                    converged = true;
                    break;
                }
                for chain in cycles {
                    warn!(
                        "Releasing {} bundles composed in a cycle: {}",
                        chain.len() - 1,
                        chain.join(" -> ")
                    );
                    released.extend(chain.iter().cloned());
                    outcome.diagnostics.push(Diagnostic::CycleDetected {
                        entity: chain[0].clone(),
                        chain,
                    });
                }
                continue;
            }

            debug!(
                "Annotation pass {}: {} inserted, {} deferred",
                outcome.passes,
                pass.inserted,
                blocked.len()
            );
            outcome.productive_passes += 1;
            outcome.annotations_inserted += pass.inserted;
            changed_files.extend(pass.changed);
        }

        if !converged {
            outcome.bound_exceeded = true;
            let diag = Diagnostic::PassBoundExceeded {
                max_passes: self.config.max_passes,
            };
            diag.log();
            outcome.diagnostics.push(diag);
        }

        for diag in blocked {
            diag.log();
            outcome.diagnostics.push(diag);
        }

        outcome.changed_files = changed_files.into_iter().collect();
        info!(
            "Inserted {} annotations in {} files over {} passes",
            outcome.annotations_inserted,
            outcome.changed_files.len(),
            outcome.passes
        );
        outcome
    }

    fn pass(
        &self,
        store: &mut SourceStore,
        corpus: &BTreeSet<String>,
        released: &BTreeSet<String>,
    ) -> PassResult {
        let declared = self.declared_bundles(store);
        let marker = self.config.annotation_marker.as_str();
        let mut result = PassResult::default();

        for file in store.iter_mut() {
            let content = file.content().to_vec();
            let mut updated = content.clone();
            let mut inserted = 0;

            for m in self.pattern.find_all(&content).iter().rev() {
                if is_annotated(&content, m.start, marker) || self.authoritative.contains(&m.bundle)
                {
                    continue;
                }

                let parents = self.parents_for(m);
                let waiting_on: Vec<String> = parents
                    .iter()
                    .filter(|p| {
                        corpus.contains(p.as_str())
                            && !declared.contains(p.as_str())
                            && !self.authoritative.contains(p)
                    })
                    .cloned()
                    .collect();

                if !waiting_on.is_empty() && !released.contains(&m.bundle) {
                    result.blocked.push(Diagnostic::BlockedSite {
                        bundle: m.bundle.clone(),
                        path: file.path().to_path_buf(),
                        line: line_number(&content, m.start),
                        waiting_on,
                    });
                    continue;
                }

                let at = line_start(&content, m.start);
                let line = ClassAnnotation::new(m.bundle.clone(), parents).line(marker);
                let tail = updated.split_off(at);
                updated.extend_from_slice(line.as_bytes());
                updated.extend(tail);
                inserted += 1;
            }

            if inserted > 0 && file.replace(updated) {
                result.inserted += inserted;
                result.changed.push(file.path().to_path_buf());
            }
        }

        result
    }

    /// Composition arguments, or the markup inheritance of a same-named entity
    fn parents_for(&self, m: &ConstructionMatch) -> Vec<String> {
        let parents = if m.parents.is_empty() {
            self.relations.inherits_of(&m.bundle)
        } else {
            m.parents.clone()
        };
        parents.into_iter().filter(|p| *p != m.bundle).collect()
    }

    fn corpus_bundles(&self, store: &SourceStore) -> BTreeSet<String> {
        store
            .iter()
            .flat_map(|file| self.pattern.find_all(file.content()))
            .map(|m| m.bundle)
            .collect()
    }

    /// Bundles with at least one annotated site
    fn declared_bundles(&self, store: &SourceStore) -> BTreeSet<String> {
        let marker = self.config.annotation_marker.as_str();
        let mut declared = BTreeSet::new();
        for file in store.iter() {
            let content = file.content();
            for m in self.pattern.find_all(content) {
                if is_annotated(content, m.start, marker) {
                    declared.insert(m.bundle);
                }
            }
        }
        declared
    }

    /// One diagnostic per composition argument nobody knows about
    fn missing_parents(&self, store: &SourceStore, corpus: &BTreeSet<String>) -> Vec<Diagnostic> {
        let entities = self.relations.entity_names();
        let mut seen = BTreeSet::new();
        let mut diagnostics = Vec::new();

        for file in store.iter() {
            for m in self.pattern.find_all(file.content()) {
                for parent in &m.parents {
                    let known = corpus.contains(parent)
                        || entities.contains(parent)
                        || self.relations.bundle_to_name.contains_key(parent)
                        || self.authoritative.contains(parent);
                    if known || !seen.insert(parent.clone()) {
                        continue;
                    }
                    let diag = Diagnostic::MissingParent {
                        bundle: m.bundle.clone(),
                        parent: parent.clone(),
                        path: file.path().to_path_buf(),
                    };
                    diag.log();
                    diagnostics.push(diag);
                }
            }
        }

        diagnostics
    }
}

/// Cycles in the waiting graph of deferred sites not yet released
///
/// Each chain starts and ends at the same bundle, e.g.
/// `[AMixin, BMixin, AMixin]`. A bundle lies on at most one reported chain.
fn composition_cycles(blocked: &[Diagnostic], released: &BTreeSet<String>) -> Vec<Vec<String>> {
    let mut graph: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for diag in blocked {
        if let Diagnostic::BlockedSite {
            bundle, waiting_on, ..
        } = diag
        {
            if released.contains(bundle) {
                continue;
            }
            graph
                .entry(bundle.as_str())
                .or_default()
                .extend(waiting_on.iter().map(String::as_str));
        }
    }

    let mut on_chain = BTreeSet::new();
    let mut cycles = Vec::new();
    for &start in graph.keys() {
        if on_chain.contains(start) {
            continue;
        }
        if let Some(chain) = cycle_through(&graph, start) {
            if chain.iter().any(|b| on_chain.contains(b.as_str())) {
                continue;
            }
            on_chain.extend(chain.iter().cloned());
            cycles.push(chain);
        }
    }
    cycles
}

/// Shortest path from `start` back to itself, breadth first
fn cycle_through(graph: &BTreeMap<&str, BTreeSet<&str>>, start: &str) -> Option<Vec<String>> {
    let mut prev: BTreeMap<&str, &str> = BTreeMap::new();
    let mut queue = VecDeque::from([start]);

    while let Some(node) = queue.pop_front() {
        for &next in graph.get(node).into_iter().flatten() {
            if next == start {
                let mut chain = vec![node.to_string()];
                let mut cur = node;
                while let Some(&p) = prev.get(cur) {
                    chain.push(p.to_string());
                    cur = p;
                }
                chain.reverse();
                chain.push(start.to_string());
                return Some(chain);
            }
            if !prev.contains_key(next) {
                prev.insert(next, node);
                queue.push_back(next);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::markup_scan::ElementFacts;
    use crate::shared::models::SourceFile;
    use pretty_assertions::assert_eq;

    fn store(files: &[(&str, &str)]) -> SourceStore {
        SourceStore::from_files(
            files
                .iter()
                .map(|(path, text)| SourceFile::new(*path, text.as_bytes().to_vec())),
        )
    }

    fn text(store: &SourceStore, path: &str) -> String {
        store
            .get(std::path::Path::new(path))
            .unwrap()
            .text()
            .into_owned()
    }

    fn run_with(
        config: &RewriteConfig,
        relations: &MarkupRelations,
        authoritative: &AuthoritativeSet,
        store: &mut SourceStore,
    ) -> RewriteOutcome {
        let pattern = ConstructionPattern::new(&config.compose_function).unwrap();
        AnnotationRewriter::new(config, &pattern, relations, authoritative).run(store)
    }

    fn run(store: &mut SourceStore) -> RewriteOutcome {
        run_with(
            &RewriteConfig::default(),
            &MarkupRelations::new(),
            &AuthoritativeSet::new(),
            store,
        )
    }

    #[test]
    fn test_parent_before_child_takes_two_passes() {
        let mut s = store(&[
            ("Child.lua", "ChildMixin = CreateFromMixins(ParentMixin)\n"),
            ("Parent.lua", "ParentMixin = {}\n"),
        ]);
        let outcome = run(&mut s);

        assert_eq!(outcome.productive_passes, 2);
        assert_eq!(outcome.passes, 3);
        assert_eq!(outcome.annotations_inserted, 2);
        assert!(outcome.converged());
        assert!(outcome.diagnostics.is_empty());
        assert_eq!(text(&s, "Parent.lua"), "---@class ParentMixin\nParentMixin = {}\n");
        assert_eq!(
            text(&s, "Child.lua"),
            "---@class ChildMixin: ParentMixin\nChildMixin = CreateFromMixins(ParentMixin)\n"
        );
    }

    #[test]
    fn test_reverse_walk_keeps_offsets() {
        let mut s = store(&[(
            "All.lua",
            "AMixin = {}\n\nBMixin = {}\n\nCMixin = CreateFromMixins(AMixin, BMixin);\n",
        )]);
        let outcome = run(&mut s);

        assert_eq!(outcome.annotations_inserted, 3);
        assert_eq!(
            text(&s, "All.lua"),
            "---@class AMixin\nAMixin = {}\n\n---@class BMixin\nBMixin = {}\n\n\
             ---@class CMixin: AMixin, BMixin\nCMixin = CreateFromMixins(AMixin, BMixin);\n"
        );
    }

    #[test]
    fn test_second_run_is_a_no_op() {
        let mut s = store(&[("A.lua", "AMixin = {}\nBMixin = CreateFromMixins(AMixin)\n")]);
        run(&mut s);
        let before = text(&s, "A.lua");

        let again = run(&mut s);
        assert_eq!(again.passes, 1);
        assert_eq!(again.annotations_inserted, 0);
        assert_eq!(text(&s, "A.lua"), before);
    }

    #[test]
    fn test_authoritative_bundles_are_skipped_and_unblock() {
        let mut s = store(&[(
            "A.lua",
            "CallbackRegistryMixin = {}\nMyMixin = CreateFromMixins(CallbackRegistryMixin)\n",
        )]);
        let outcome = run_with(
            &RewriteConfig::default(),
            &MarkupRelations::new(),
            &AuthoritativeSet::from_names(["CallbackRegistryMixin"]),
            &mut s,
        );

        assert_eq!(outcome.productive_passes, 1);
        assert_eq!(
            text(&s, "A.lua"),
            "CallbackRegistryMixin = {}\n---@class MyMixin: CallbackRegistryMixin\n\
             MyMixin = CreateFromMixins(CallbackRegistryMixin)\n"
        );
    }

    #[test]
    fn test_unknown_parent_does_not_block() {
        let mut s = store(&[(
            "A.lua",
            "AMixin = CreateFromMixins(Nowhere)\nBMixin = CreateFromMixins(Nowhere)\n",
        )]);
        let outcome = run(&mut s);

        assert_eq!(outcome.annotations_inserted, 2);
        assert_eq!(
            outcome.diagnostics,
            vec![Diagnostic::MissingParent {
                bundle: "AMixin".to_string(),
                parent: "Nowhere".to_string(),
                path: PathBuf::from("A.lua"),
            }]
        );
    }

    #[test]
    fn test_composition_cycle_is_released() {
        let mut s = store(&[(
            "A.lua",
            "AMixin = CreateFromMixins(BMixin)\nBMixin = CreateFromMixins(AMixin)\n",
        )]);
        let outcome = run(&mut s);

        assert_eq!(outcome.passes, 3);
        assert_eq!(outcome.productive_passes, 1);
        assert!(outcome.converged());
        assert_eq!(
            outcome.diagnostics,
            vec![Diagnostic::CycleDetected {
                entity: "AMixin".to_string(),
                chain: vec!["AMixin".to_string(), "BMixin".to_string(), "AMixin".to_string()],
            }]
        );
        assert_eq!(
            text(&s, "A.lua"),
            "---@class AMixin: BMixin\nAMixin = CreateFromMixins(BMixin)\n\
             ---@class BMixin: AMixin\nBMixin = CreateFromMixins(AMixin)\n"
        );
    }

    #[test]
    fn test_cycle_descendants_follow_in_order() {
        let mut s = store(&[
            (
                "Cycle.lua",
                "AMixin = CreateFromMixins(BMixin)\nBMixin = CreateFromMixins(AMixin)\n",
            ),
            ("Heirs.lua", "CMixin = CreateFromMixins(AMixin)\nDMixin = CreateFromMixins(CMixin)\n"),
        ]);
        let outcome = run(&mut s);

        // stall, release A and B, then C, then D, then nothing
        assert_eq!(outcome.passes, 5);
        assert_eq!(outcome.productive_passes, 3);
        assert_eq!(outcome.annotations_inserted, 4);
        assert!(!outcome.bound_exceeded);
        assert!(!outcome.diagnostics.iter().any(Diagnostic::is_gap));
        assert_eq!(
            text(&s, "Heirs.lua"),
            "---@class CMixin: AMixin\nCMixin = CreateFromMixins(AMixin)\n\
             ---@class DMixin: CMixin\nDMixin = CreateFromMixins(CMixin)\n"
        );
    }

    #[test]
    fn test_disjoint_cycles_are_each_reported() {
        let mut s = store(&[(
            "A.lua",
            "AMixin = CreateFromMixins(BMixin)\nBMixin = CreateFromMixins(AMixin)\n\
             XMixin = CreateFromMixins(YMixin)\nYMixin = CreateFromMixins(XMixin)\n",
        )]);
        let outcome = run(&mut s);

        let entities: Vec<_> = outcome
            .diagnostics
            .iter()
            .filter_map(|d| match d {
                Diagnostic::CycleDetected { entity, .. } => Some(entity.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(entities, vec!["AMixin", "XMixin"]);
        assert_eq!(outcome.annotations_inserted, 4);
    }

    #[test]
    fn test_pass_bound_exceeded() {
        let mut s = store(&[
            ("Child.lua", "ChildMixin = CreateFromMixins(ParentMixin)\n"),
            ("Parent.lua", "ParentMixin = {}\n"),
        ]);
        let outcome = run_with(
            &RewriteConfig::default().max_passes(1),
            &MarkupRelations::new(),
            &AuthoritativeSet::new(),
            &mut s,
        );

        assert!(outcome.bound_exceeded);
        assert_eq!(outcome.passes, 1);
        assert!(outcome
            .diagnostics
            .contains(&Diagnostic::PassBoundExceeded { max_passes: 1 }));
        assert!(outcome
            .diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::BlockedSite { bundle, .. } if bundle == "ChildMixin")));
    }

    #[test]
    fn test_empty_composition_falls_back_to_markup_inherits() {
        let mut relations = MarkupRelations::new();
        relations.record(
            &ElementFacts {
                tag: "Frame".to_string(),
                name: "ScrollBoxTemplate".to_string(),
                mixin: String::new(),
                inherits: "BackdropTemplate".to_string(),
            },
            &[],
        );
        let mut s = store(&[("S.lua", "ScrollBoxTemplate = {}\n")]);
        run_with(
            &RewriteConfig::default(),
            &relations,
            &AuthoritativeSet::new(),
            &mut s,
        );

        assert_eq!(
            text(&s, "S.lua"),
            "---@class ScrollBoxTemplate: BackdropTemplate\nScrollBoxTemplate = {}\n"
        );
    }

    #[test]
    fn test_self_reference_is_not_a_dependency() {
        let mut s = store(&[("A.lua", "AMixin = CreateFromMixins(AMixin)\n")]);
        let outcome = run(&mut s);
        assert_eq!(outcome.annotations_inserted, 1);
        assert_eq!(text(&s, "A.lua"), "---@class AMixin\nAMixin = CreateFromMixins(AMixin)\n");
    }
}
