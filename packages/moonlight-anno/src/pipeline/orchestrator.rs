//! Pipeline orchestrator
//!
//! Runs one annotation pass over a corpus:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                 MixinAnnotator::run()                    │
//! ├──────────────────────────────────────────────────────────┤
//! │  1. Authoritative set (optional dir)                     │
//! │  2. Markup scan  ┐ (bounded pool, in parallel)           │
//! │     Source scan  ┘                                       │
//! │  3. Direct-parent edges                                  │
//! │  4. Rewriter fixed point (in memory)                     │
//! │  5. Verifier                                             │
//! │  6. Meta headers                                         │
//! │  7. Persist touched files                                │
//! │  8. Resolve + emit aggregate                             │
//! └──────────────────────────────────────────────────────────┘
//! ```

use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

use super::report::RunReport;
use crate::config::ValidatedConfig;
use crate::errors::Result;
use crate::features::annotation::{prepend_meta_headers, AnnotationRewriter, AnnotationVerifier};
use crate::features::authoritative::AuthoritativeSet;
use crate::features::emit::AggregateEmitter;
use crate::features::hierarchy::{DirectParents, HierarchyResolver};
use crate::features::markup_scan::MarkupScanner;
use crate::features::source_scan::{ConstructionPattern, SourceScanner};

/// Directories of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPaths {
    /// Corpus root; markup is read, source is rewritten in place
    pub corpus: PathBuf,

    /// External annotation directory whose classes are left alone
    pub authoritative: Option<PathBuf>,

    /// Root for the aggregate file
    pub output: PathBuf,
}

impl RunPaths {
    pub fn new(corpus: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            corpus: corpus.into(),
            authoritative: None,
            output: output.into(),
        }
    }

    pub fn with_authoritative(mut self, dir: impl Into<PathBuf>) -> Self {
        self.authoritative = Some(dir.into());
        self
    }
}

/// Mixin annotation pipeline
pub struct MixinAnnotator {
    config: ValidatedConfig,
}

impl MixinAnnotator {
    pub fn new(config: ValidatedConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidatedConfig {
        &self.config
    }

    /// Execute the full pipeline
    ///
    /// Fatal errors (IO, malformed markup in strict mode, pool creation)
    /// abort before any file is written. Everything else ends up in the
    /// report's diagnostics.
    pub fn run(&self, paths: &RunPaths) -> Result<RunReport> {
        let start = Instant::now();
        let scan = self.config.scan();
        let rewrite = self.config.rewrite();
        debug!("Annotator config: {}", self.config.describe());

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(scan.workers)
            .build()?;
        let pattern = ConstructionPattern::new(&rewrite.compose_function)?;

        // Phase 1: authoritative names
        let authoritative = match &paths.authoritative {
            Some(dir) => pool.install(|| {
                AuthoritativeSet::scan(dir, &rewrite.annotation_marker, &scan.source_extension)
            })?,
            None => AuthoritativeSet::new(),
        };

        // Phase 2: markup and source scans
        info!("Scanning corpus at {}", paths.corpus.display());
        let markup_scanner = MarkupScanner::new(scan.clone());
        let source_scanner = SourceScanner::new(scan.clone(), pattern.clone());
        let (markup, sources) = pool.install(|| {
            rayon::join(
                || markup_scanner.scan(&paths.corpus),
                || source_scanner.scan(&paths.corpus),
            )
        });
        let markup = markup?;
        let mut sources = sources?;

        // Phase 3: edges
        let edges = DirectParents::build(
            &markup.relations,
            &sources.declared_parents(),
            &self.config.hierarchy().frame_parent,
        );
        debug!(
            "Hierarchy: {} entities, {} direct edges",
            edges.len(),
            edges.edge_count()
        );

        let mut report = RunReport {
            markup_files: markup.files_scanned,
            source_files: sources.store.len(),
            construction_sites: sources.site_count(),
            authoritative_names: authoritative.len(),
            direct_edges: edges.edge_count(),
            ..RunReport::default()
        };
        report.diagnostics.extend(markup.diagnostics);

        // Phase 4-5: rewrite then verify the converged snapshot
        let outcome = AnnotationRewriter::new(rewrite, &pattern, &markup.relations, &authoritative)
            .run(&mut sources.store);
        let gaps = AnnotationVerifier::new(&pattern, &rewrite.annotation_marker)
            .verify(&sources.store, &authoritative);

        // Phase 6-7: headers, then one write per touched file
        report.meta_headers_added = match &rewrite.meta_header {
            Some(header) => prepend_meta_headers(&mut sources.store, header),
            None => 0,
        };
        report.files_written = sources.store.persist()?;

        // Phase 8: aggregate
        let entities = markup.relations.entity_names();
        let mut resolver = HierarchyResolver::new(&edges);
        let emitter = AggregateEmitter::new(self.config.emit(), rewrite);
        let (text, classes) = emitter.render(&mut resolver, &entities, &authoritative);
        report.aggregate_path = emitter.write(&paths.output, &text)?;
        report.aggregate_classes = classes;
        report.entities = entities.len();
        report.cycle_members = resolver.cycles().keys().cloned().collect();

        report.absorb_rewrite(outcome);
        report.diagnostics.extend(resolver.take_diagnostics());
        report.diagnostics.extend(gaps);
        report.elapsed_ms = start.elapsed().as_millis() as u64;

        report.log_summary();
        Ok(report)
    }
}

/// Convenience: run with default configuration
pub fn annotate(corpus: &Path, output: &Path) -> Result<RunReport> {
    MixinAnnotator::new(ValidatedConfig::default()).run(&RunPaths::new(corpus, output))
}
