//! End-to-end annotation runs over temporary corpora
//!
//! Covers:
//! - MyFrame/MyMixin scenario
//! - two-pass Child/Parent convergence
//! - idempotence and determinism
//! - authoritative exclusion
//! - strict/lenient markup, inheritance and composition cycles

#[path = "../common/mod.rs"]
mod common;

use common::*;
use moonlight_anno::{
    AnnoError, AnnotatorConfig, Diagnostic, MixinAnnotator, RunPaths, RunReport, ValidatedConfig,
};
use pretty_assertions::assert_eq;

fn run(corpus: &Corpus) -> RunReport {
    run_with(corpus, ValidatedConfig::default())
}

fn run_with(corpus: &Corpus, config: ValidatedConfig) -> RunReport {
    MixinAnnotator::new(config)
        .run(&RunPaths::new(corpus.root(), corpus.out()))
        .expect("run")
}

const SAMPLE_AGGREGATE: &str = "---@meta\n\n\
    ---@class ChildFrame: ChildMixin, Frame, ParentMixin\n\n\
    ---@class FancyButton: $PrivateTemplate, UIPanelButtonTemplate\n\n\
    ---@class MyFrame: Frame, MyMixin\n\n";

#[test]
fn test_frame_with_mixin() {
    let corpus = Corpus::new();
    corpus
        .file("UI/MyFrame.xml", &frame_xml(&[("MyFrame", "MyMixin")]))
        .file("UI/MyMixin.lua", "MyMixin = {}\n");

    let report = run(&corpus);

    assert_eq!(corpus.read("UI/MyMixin.lua"), "---@meta\n---@class MyMixin\nMyMixin = {}\n");
    assert_eq!(corpus.aggregate(), "---@meta\n\n---@class MyFrame: Frame, MyMixin\n\n");
    assert_eq!(report.aggregate_classes, 1);
    assert_eq!(report.files_written, 1);
    assert!(report.diagnostics.is_empty());
}

#[test]
fn test_sample_corpus_full_run() {
    let corpus = sample_corpus();
    let report = run(&corpus);

    assert_eq!(report.markup_files, 2);
    assert_eq!(report.source_files, 3);
    assert_eq!(report.construction_sites, 3);
    assert_eq!(report.annotations_inserted, 3);
    assert_eq!(report.meta_headers_added, 3);
    assert_no_gaps(&report);

    assert_eq!(
        corpus.read("Addon/Child.lua"),
        "---@meta\n---@class ChildMixin: ParentMixin\nChildMixin = CreateFromMixins(ParentMixin)\n"
    );
    assert_eq!(
        corpus.read("Addon/Parent.lua"),
        "---@meta\n---@class ParentMixin\nParentMixin =\n{\n  value = 1,\n}\n"
    );
    assert_eq!(
        corpus.read("Addon/MyMixin.lua"),
        "---@meta\n---@class MyMixin\nMyMixin = {}\n\nfunction MyMixin:OnLoad() end\n"
    );
    assert_eq!(corpus.aggregate(), SAMPLE_AGGREGATE);
}

#[test]
fn test_child_waits_for_parent() {
    let corpus = Corpus::new();
    corpus
        .file("Child.lua", "ChildMixin = CreateFromMixins(ParentMixin)\n")
        .file("Parent.lua", "ParentMixin = {}\n");

    let report = run(&corpus);

    assert_eq!(report.productive_passes, 2);
    assert_eq!(report.passes, 3);
    assert!(!report.bound_exceeded);
    assert_eq!(report.changed_files.len(), 2);
    assert_line_once(&corpus.read("Child.lua"), "---@class ChildMixin: ParentMixin");
}

#[test]
fn test_second_run_changes_nothing() {
    let corpus = sample_corpus();
    run(&corpus);
    let first_files = corpus.snapshot();
    let first_aggregate = corpus.aggregate();

    let again = run(&corpus);

    assert_eq!(again.annotations_inserted, 0);
    assert_eq!(again.meta_headers_added, 0);
    assert_eq!(again.files_written, 0);
    assert_eq!(again.passes, 1);
    assert_eq!(corpus.snapshot(), first_files);
    assert_eq!(corpus.aggregate(), first_aggregate);
}

#[test]
fn test_worker_count_does_not_change_output() {
    let single = sample_corpus();
    let many = sample_corpus();

    run_with(
        &single,
        AnnotatorConfig::default().scan(|c| c.workers(1)).build().unwrap(),
    );
    run_with(
        &many,
        AnnotatorConfig::default().scan(|c| c.workers(8)).build().unwrap(),
    );

    assert_eq!(single.snapshot(), many.snapshot());
    assert_eq!(single.aggregate(), many.aggregate());
}

#[test]
fn test_authoritative_names_are_left_alone() {
    let corpus = sample_corpus();
    corpus.annotation(
        "Widgets.lua",
        "---@meta\n---@class MyFrame\n---@class ParentMixin\n",
    );

    let paths = RunPaths::new(corpus.root(), corpus.out()).with_authoritative(corpus.authoritative());
    let report = MixinAnnotator::new(ValidatedConfig::default())
        .run(&paths)
        .unwrap();

    assert_eq!(report.authoritative_names, 2);
    assert_eq!(report.productive_passes, 1);
    assert_no_gaps(&report);
    assert_eq!(
        corpus.read("Addon/Parent.lua"),
        "---@meta\nParentMixin =\n{\n  value = 1,\n}\n"
    );
    assert_line_once(&corpus.read("Addon/Child.lua"), "---@class ChildMixin: ParentMixin");

    let aggregate = corpus.aggregate();
    assert!(!aggregate.contains("---@class MyFrame"));
    assert!(aggregate.contains("---@class ChildFrame: ChildMixin, Frame, ParentMixin"));
}

#[test]
fn test_strict_markup_aborts_before_writing() {
    let corpus = sample_corpus();
    corpus.file("Addon/Broken.xml", r#"<Ui><Frame name="Open" mixin="OpenMixin"></Ui>"#);
    let before = corpus.snapshot();

    let err = MixinAnnotator::new(ValidatedConfig::default())
        .run(&RunPaths::new(corpus.root(), corpus.out()))
        .unwrap_err();

    assert!(matches!(err, AnnoError::Markup { .. }));
    assert_eq!(corpus.snapshot(), before);
    assert!(!corpus.out().exists());
}

#[test]
fn test_lenient_markup_recovers() {
    let corpus = sample_corpus();
    corpus.file("Addon/Broken.xml", r#"<Ui><Frame name="Open" mixin="OpenMixin"></Ui>"#);

    let report = run_with(
        &corpus,
        AnnotatorConfig::default()
            .scan(|c| c.strict_markup(false))
            .build()
            .unwrap(),
    );

    assert_has_diagnostic(&report, |d| matches!(d, Diagnostic::MarkupRecovered { .. }));
    assert!(corpus.aggregate().contains("---@class Open: Frame, OpenMixin"));
}

#[test]
fn test_inheritance_cycle_is_contained() {
    let corpus = Corpus::new();
    corpus.file(
        "Loop.xml",
        r#"<Ui><Frame name="A" inherits="B"/><Frame name="B" inherits="A"/></Ui>"#,
    );

    let report = run(&corpus);

    assert_eq!(report.cycle_members, vec!["A", "B"]);
    assert_has_diagnostic(&report, |d| matches!(d, Diagnostic::CycleDetected { .. }));
    assert_eq!(
        corpus.aggregate(),
        "---@meta\n\n---@class A: B, Frame\n\n---@class B: A, Frame\n\n"
    );
}

#[test]
fn test_composition_cycle_is_released() {
    let corpus = Corpus::new();
    corpus
        .file(
            "Twins.lua",
            "AMixin = CreateFromMixins(BMixin)\nBMixin = CreateFromMixins(AMixin)\n",
        )
        .file(
            "Heirs.lua",
            "CMixin = CreateFromMixins(AMixin)\nDMixin = CreateFromMixins(CMixin)\n",
        );

    let report = run(&corpus);

    assert_no_gaps(&report);
    assert!(!report.bound_exceeded);
    assert_eq!(report.annotations_inserted, 4);
    assert_has_diagnostic(&report, |d| {
        matches!(d, Diagnostic::CycleDetected { entity, .. } if entity == "AMixin")
    });
    assert_eq!(
        corpus.read("Twins.lua"),
        "---@meta\n---@class AMixin: BMixin\nAMixin = CreateFromMixins(BMixin)\n\
         ---@class BMixin: AMixin\nBMixin = CreateFromMixins(AMixin)\n"
    );
    assert_line_once(&corpus.read("Heirs.lua"), "---@class DMixin: CMixin");
}

#[test]
fn test_yaml_pass_bound() {
    let corpus = sample_corpus();
    let config = AnnotatorConfig::from_yaml_str("version: 1\nrewrite:\n  max_passes: 1\n").unwrap();

    let report = run_with(&corpus, config);

    assert!(report.bound_exceeded);
    assert_has_diagnostic(&report, |d| {
        matches!(d, Diagnostic::PassBoundExceeded { max_passes: 1 })
    });
    assert_has_diagnostic(&report, |d| {
        matches!(d, Diagnostic::Unannotated { bundle, .. } if bundle == "ChildMixin")
    });
}

#[test]
fn test_meta_header_can_be_disabled() {
    let corpus = sample_corpus();
    let report = run_with(
        &corpus,
        AnnotatorConfig::default()
            .rewrite(|c| c.meta_header(None))
            .build()
            .unwrap(),
    );

    assert_eq!(report.meta_headers_added, 0);
    assert!(corpus.read("Addon/MyMixin.lua").starts_with("---@class MyMixin\n"));
    assert!(corpus.aggregate().starts_with("---@meta\n\n"));
}

#[test]
fn test_report_json_round_trips_counts() {
    let corpus = sample_corpus();
    let report = run(&corpus);
    let path = corpus.out().join("report.json");

    report.write_json(&path).unwrap();
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();

    assert_eq!(json["annotations_inserted"], 3);
    assert_eq!(json["aggregate_classes"], 3);
}
