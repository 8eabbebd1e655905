//! Report assertions

use moonlight_anno::{Diagnostic, RunReport};

/// Assert the run left no unannotated or blocked sites
pub fn assert_no_gaps(report: &RunReport) {
    let gaps: Vec<_> = report.gaps().collect();
    assert!(gaps.is_empty(), "Expected no gaps, got: {:?}", gaps);
}

/// Assert at least one diagnostic satisfies `pred`
pub fn assert_has_diagnostic(report: &RunReport, pred: impl Fn(&Diagnostic) -> bool) {
    assert!(
        report.diagnostics.iter().any(pred),
        "No matching diagnostic in: {:?}",
        report.diagnostics
    );
}

/// Assert `line` appears in `text` exactly once
pub fn assert_line_once(text: &str, line: &str) {
    let count = text.lines().filter(|l| *l == line).count();
    assert_eq!(count, 1, "Expected `{}` once in:\n{}", line, text);
}
