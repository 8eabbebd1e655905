//! Hierarchy resolver
//!
//! Transitive ancestor closure over [`DirectParents`].
//!
//! # Algorithm
//! Depth-first traversal on an explicit stack (no recursion), with a
//! "currently visiting" set scoped to one `resolve` call:
//! 1. A parent with a memoized result contributes itself plus that result
//! 2. A parent already on the current path is a cycle: it contributes only
//!    itself, and the loop is recorded as a diagnostic
//! 3. Otherwise the parent is pushed and resolved first
//!
//! Finished entries are memoized, so every later query is a lookup.
//! An entity is always removed from its own list.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use crate::features::hierarchy::domain::DirectParents;
use crate::shared::models::Diagnostic;

/// One entity being resolved
struct Frame {
    name: String,
    parents: Vec<String>,
    next: usize,
    acc: BTreeSet<String>,
}

impl Frame {
    fn new(name: String, parents: Vec<String>) -> Self {
        Self {
            name,
            parents,
            next: 0,
            acc: BTreeSet::new(),
        }
    }
}

/// Memoizing ancestor resolver
pub struct HierarchyResolver<'g> {
    edges: &'g DirectParents,
    memo: HashMap<String, Vec<String>>,
    /// Entity → first cycle chain it was seen on
    cycles: BTreeMap<String, Vec<String>>,
    diagnostics: Vec<Diagnostic>,
}

impl<'g> HierarchyResolver<'g> {
    pub fn new(edges: &'g DirectParents) -> Self {
        Self {
            edges,
            memo: HashMap::new(),
            cycles: BTreeMap::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Sorted, duplicate-free ancestors of `entity`
    pub fn resolve(&mut self, entity: &str) -> Vec<String> {
        if let Some(cached) = self.memo.get(entity) {
            return cached.clone();
        }

        let mut stack = vec![Frame::new(entity.to_string(), self.edges.parents_of(entity))];
        let mut on_path: HashSet<String> = HashSet::new();
        on_path.insert(entity.to_string());

        loop {
            let next_parent = match stack.last_mut() {
                Some(top) if top.next < top.parents.len() => {
                    let parent = top.parents[top.next].clone();
                    top.next += 1;
                    top.acc.insert(parent.clone());
                    Some(parent)
                }
                Some(_) => None,
                None => return Vec::new(),
            };

            match next_parent {
                Some(parent) => {
                    if let Some(cached) = self.memo.get(&parent) {
                        if let Some(top) = stack.last_mut() {
                            top.acc.extend(cached.iter().cloned());
                        }
                        continue;
                    }

                    if on_path.contains(&parent) {
                        self.record_cycle(&stack, &parent);
                        continue;
                    }

                    on_path.insert(parent.clone());
                    let grand_parents = self.edges.parents_of(&parent);
                    stack.push(Frame::new(parent, grand_parents));
                }
                None => {
                    let Some(done) = stack.pop() else {
                        return Vec::new();
                    };
                    on_path.remove(&done.name);

                    let mut acc = done.acc;
                    acc.remove(&done.name);
                    let ancestors: Vec<String> = acc.into_iter().collect();
                    self.memo.insert(done.name, ancestors.clone());

                    match stack.last_mut() {
                        Some(parent_frame) => parent_frame.acc.extend(ancestors),
                        None => return ancestors,
                    }
                }
            }
        }
    }

    /// Resolve many entities; keys are sorted
    pub fn resolve_all<'a, I>(&mut self, entities: I) -> BTreeMap<String, Vec<String>>
    where
        I: IntoIterator<Item = &'a String>,
    {
        entities
            .into_iter()
            .map(|name| (name.clone(), self.resolve(name)))
            .collect()
    }

    fn record_cycle(&mut self, stack: &[Frame], repeated: &str) {
        let Some(start) = stack.iter().position(|f| f.name == repeated) else {
            return;
        };
        let mut chain: Vec<String> = stack[start..].iter().map(|f| f.name.clone()).collect();
        chain.push(repeated.to_string());

        for member in &chain {
            self.cycles
                .entry(member.clone())
                .or_insert_with(|| chain.clone());
        }

        let diag = Diagnostic::CycleDetected {
            entity: repeated.to_string(),
            chain,
        };
        if self.diagnostics.contains(&diag) {
            return;
        }
        diag.log();
        self.diagnostics.push(diag);
    }

    /// Entities seen on a cycle, with the chain they were seen on
    pub fn cycles(&self) -> &BTreeMap<String, Vec<String>> {
        &self.cycles
    }

    pub fn in_cycle(&self, entity: &str) -> bool {
        self.cycles.contains_key(entity)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    pub fn resolved_count(&self) -> usize {
        self.memo.len()
    }
}
