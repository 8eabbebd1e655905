//! Post-fixed-point verification
//!
//! Read-only. Every construction match in the final snapshot without an
//! annotation line directly above it (and not authoritative) is a gap.

use crate::features::authoritative::AuthoritativeSet;
use crate::features::source_scan::{is_annotated, ConstructionPattern};
use crate::shared::models::{Diagnostic, SourceStore};
use crate::shared::utils::line_number;

pub struct AnnotationVerifier<'a> {
    pattern: &'a ConstructionPattern,
    marker: &'a str,
}

impl<'a> AnnotationVerifier<'a> {
    pub fn new(pattern: &'a ConstructionPattern, marker: &'a str) -> Self {
        Self { pattern, marker }
    }

    /// One `Unannotated` diagnostic per gap, in path then offset order
    pub fn verify(&self, store: &SourceStore, exclusions: &AuthoritativeSet) -> Vec<Diagnostic> {
        let mut gaps = Vec::new();
        for file in store.iter() {
            let content = file.content();
            for m in self.pattern.find_all(content) {
                if exclusions.contains(&m.bundle) || is_annotated(content, m.start, self.marker) {
                    continue;
                }
                gaps.push(Diagnostic::Unannotated {
                    bundle: m.bundle,
                    path: file.path().to_path_buf(),
                    line: line_number(content, m.start),
                });
            }
        }
        gaps
    }
}
