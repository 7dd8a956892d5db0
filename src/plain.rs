use std::fmt::Write;
use std::path::Path;

use crate::models::Report;
use crate::ui::{flag, format_seconds};

/// Render the summary and per-test table of `report` as plain text.
pub fn render_summary(report_path: &Path, report: &Report) -> String {
    let summary = report.summary();
    let desc = report.description();
    let counts = summary.counts;
    let mut out = String::new();

    let _ = writeln!(out, "Test Run Summary");
    let _ = writeln!(out, "- Run Type: {}", desc.run_type());
    let _ = writeln!(out, "- Parallel: {}", flag(desc.parallel));
    let _ = writeln!(out, "- Tracing: {}", flag(desc.tracing));
    let _ = writeln!(out, "- Headed: {}", flag(desc.headed));
    let _ = writeln!(
        out,
        "- Reruns: {} Setting: {}",
        flag(desc.reruns.is_some()),
        desc.reruns
            .map_or_else(|| flag(false).to_string(), |n| n.to_string())
    );
    let _ = writeln!(out, "- Test Report: {}", report_path.display());
    if let Some(dir) = &desc.trace_output {
        let _ = writeln!(out, "- Trace Folder: {}", dir);
    }
    let _ = writeln!(out);

    let _ = writeln!(
        out,
        "Total duration: {}s | Tests: {} | Passed: {} | Failed: {} | Rerun: {} | Incomplete: {}",
        format_seconds(summary.run_duration),
        summary.total_tests(),
        counts.passed,
        counts.failed,
        counts.rerun,
        counts.incomplete,
    );
    let _ = writeln!(out);

    let width = summary
        .test_ids()
        .map(|id| id.chars().count())
        .max()
        .unwrap_or(0)
        .max("Test Case".len());

    let _ = writeln!(
        out,
        "{:<width$}  {:<10}  {:>8}  {:>8}  {:>8}  {:>8}",
        "Test Case", "Outcome", "Setup", "Call", "Teardown", "Total",
    );
    for test in &summary.tests {
        let d = &test.durations;
        let _ = writeln!(
            out,
            "{:<width$}  {:<10}  {:>8}  {:>8}  {:>8}  {:>8}",
            test.nodeid,
            test.outcome.label(),
            format_seconds(d.setup),
            format_seconds(d.call),
            format_seconds(d.teardown),
            format_seconds(Some(test.total_duration())),
        );
    }

    let failures = report.failures();
    if !failures.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Failed tests");
        for failure in failures {
            let location = failure
                .detail
                .as_ref()
                .and_then(|d| {
                    d.path.as_ref().map(|p| match d.lineno {
                        Some(line) => format!(" ({}:{})", p, line),
                        None => format!(" ({})", p),
                    })
                })
                .unwrap_or_default();
            let _ = writeln!(
                out,
                "{} {}{}",
                failure.outcome.icon(),
                failure.nodeid,
                location
            );
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::sample_report;
    use serde_json::json;

    #[test]
    fn renders_counts_table_and_failures() {
        let text = render_summary(Path::new("r/report.json"), &sample_report());

        assert!(text.contains("- Run Type: By markers - smoke"));
        assert!(text.contains("- Reruns: ✅ Setting: 2"));
        assert!(text.contains("Passed: 1 | Failed: 1 | Rerun: 0 | Incomplete: 1"));
        assert!(text.contains("✘ tests/test_cart.py::test_add (tests/test_cart.py:12)"));

        let row = text
            .lines()
            .find(|l| l.starts_with("tests/test_home.py::test_title"))
            .unwrap();
        assert!(row.contains("passed"));
        assert!(row.trim_end().ends_with("0.35"));
        assert!(!text.contains("Trace Folder"));
    }

    #[test]
    fn crash_without_line_prints_path_only() {
        let report = Report::from_value(json!([
            {
                "nodeid": "tests/test_a.py::test_x",
                "when": "call",
                "outcome": "failed",
                "duration": 0.1,
                "longrepr": {"reprcrash": {"path": "tests/test_a.py", "message": "boom"}}
            }
        ]))
        .unwrap();

        let text = render_summary(Path::new("r.json"), &report);
        assert!(text.contains("✘ tests/test_a.py::test_x (tests/test_a.py)"), "{}", text);
        assert!(!text.contains(":0)"));
    }
}
