use std::path::PathBuf;

use crate::{
    app::notifier::Notifier,
    models::{FailureEntry, Report, ReportSummary, RunDescription, TestSummary},
};

pub mod actions;
pub mod notifier;

pub use actions::{handle_action, trigger_action};
pub use notifier::NotificationKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Summary,
    Report,
    Raw,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Summary, Tab::Report, Tab::Raw];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Summary => "Summary",
            Tab::Report => "Report",
            Tab::Raw => "Raw Output",
        }
    }

    pub fn index(&self) -> usize {
        Tab::ALL.iter().position(|t| t == self).unwrap_or(0)
    }

    fn next(&self) -> Tab {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    fn previous(&self) -> Tab {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

/// Focusable panes of the report tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Results,
    Failures,
    Detail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Order in which tests appear in the report.
    Report,
    /// Slowest total duration first.
    Duration,
}

pub struct App {
    pub workspace: PathBuf,
    pub report_path: PathBuf,
    pub report: Report,
    pub summary: ReportSummary,
    pub description: RunDescription,
    pub failures: Vec<FailureEntry>,
    /// Pretty-printed report, one entry per line.
    pub raw_lines: Vec<String>,
    pub active_tab: Tab,
    pub active_panel: Panel,
    pub selected_row: usize,
    pub selected_failure: usize,
    pub results_scroll_offset: usize,
    pub failures_scroll_offset: usize,
    pub results_viewport_height: usize,
    pub failures_viewport_height: usize,
    pub detail_scroll_offset: u16,
    pub raw_scroll_offset: usize,
    pub raw_viewport_height: usize,
    pub sort: SortOrder,
    /// (file_path, line)
    pub pending_editor: Option<(PathBuf, Option<u32>)>,
    pub should_quit: bool,
    pub filter_active: bool,
    pub filter: tui_input::Input,
    pub notifier: Notifier,
}

impl App {
    pub fn new(workspace: PathBuf, report_path: PathBuf, report: Report) -> Self {
        let summary = report.summary();
        let description = report.description();
        let failures = report.failures();
        let raw_lines = serde_json::to_string_pretty(&report.raw)
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect();

        Self {
            workspace,
            report_path,
            report,
            summary,
            description,
            failures,
            raw_lines,
            active_tab: Tab::Report,
            active_panel: Panel::Results,
            selected_row: 0,
            selected_failure: 0,
            results_scroll_offset: 0,
            failures_scroll_offset: 0,
            results_viewport_height: 0,
            failures_viewport_height: 0,
            detail_scroll_offset: 0,
            raw_scroll_offset: 0,
            raw_viewport_height: 0,
            sort: SortOrder::Report,
            pending_editor: None,
            should_quit: false,
            filter_active: false,
            filter: tui_input::Input::default(),
            notifier: Notifier::new(),
        }
    }

    fn matches_filter(&self, nodeid: &str) -> bool {
        let query = self.filter.value();
        query.is_empty() || nodeid.to_lowercase().contains(&query.to_lowercase())
    }

    /// Result rows after applying the filter and sort order.
    pub fn visible_results(&self) -> Vec<&TestSummary> {
        let mut rows: Vec<&TestSummary> = self
            .summary
            .tests
            .iter()
            .filter(|t| self.matches_filter(&t.nodeid))
            .collect();
        if self.sort == SortOrder::Duration {
            rows.sort_by(|a, b| b.total_duration().total_cmp(&a.total_duration()));
        }
        rows
    }

    pub fn visible_failures(&self) -> Vec<&FailureEntry> {
        self.failures
            .iter()
            .filter(|f| self.matches_filter(&f.nodeid))
            .collect()
    }

    /// The failure shown in the detail pane: the selected failure, or the
    /// latest failing attempt of the selected result row.
    pub fn selected_failure_entry(&self) -> Option<&FailureEntry> {
        match self.active_panel {
            Panel::Results => {
                let rows = self.visible_results();
                let nodeid = &rows.get(self.selected_row)?.nodeid;
                self.failures.iter().rev().find(|f| &f.nodeid == nodeid)
            }
            Panel::Failures | Panel::Detail => {
                self.visible_failures().get(self.selected_failure).copied()
            }
        }
    }

    fn reset_selection(&mut self) {
        self.selected_row = 0;
        self.selected_failure = 0;
        self.results_scroll_offset = 0;
        self.failures_scroll_offset = 0;
        self.detail_scroll_offset = 0;
    }

    fn adjust_results_scroll(&mut self) {
        adjust_scroll(
            self.selected_row,
            &mut self.results_scroll_offset,
            self.results_viewport_height,
        );
    }

    fn adjust_failures_scroll(&mut self) {
        adjust_scroll(
            self.selected_failure,
            &mut self.failures_scroll_offset,
            self.failures_viewport_height,
        );
    }

    fn max_raw_scroll(&self) -> usize {
        self.raw_lines
            .len()
            .saturating_sub(self.raw_viewport_height.max(1))
    }
}

fn adjust_scroll(selected: usize, offset: &mut usize, viewport: usize) {
    if viewport == 0 {
        return;
    }
    if selected < *offset {
        *offset = selected;
    } else if selected >= *offset + viewport {
        *offset = selected - viewport + 1;
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::PathBuf;

    use serde_json::json;

    use super::App;
    use crate::models::Report;

    pub fn sample_report() -> Report {
        let rec = |nodeid: &str, when: &str, outcome: &str, duration: f64| {
            json!({"nodeid": nodeid, "when": when, "outcome": outcome, "duration": duration})
        };
        Report::from_value(json!({
            "metadata": [
                {"args": ["--headed", "-v", "tests", "-m", "smoke", "--reruns", "2"]},
                {"total_duration": 3.25}
            ],
            "test_data": [
                rec("tests/test_home.py::test_title", "setup", "passed", 0.1),
                rec("tests/test_home.py::test_title", "call", "passed", 0.2),
                rec("tests/test_home.py::test_title", "teardown", "passed", 0.05),
                rec("tests/test_cart.py::test_add", "setup", "passed", 0.1),
                {
                    "nodeid": "tests/test_cart.py::test_add",
                    "when": "call",
                    "outcome": "failed",
                    "duration": 1.5,
                    "longrepr": {
                        "reprcrash": {"path": "tests/test_cart.py", "lineno": 12, "message": "assert 0 == 1"},
                        "reprtraceback": {"reprentries": [{"data": {"lines": [">       assert count == 1", "E       assert 0 == 1"]}}]}
                    }
                },
                rec("tests/test_cart.py::test_add", "teardown", "passed", 0.05),
                rec("tests/test_login.py::test_ok", "setup", "passed", 0.3),
            ]
        }))
        .expect("sample report is well formed")
    }

    pub fn sample_app() -> App {
        App::new(
            PathBuf::from("/work"),
            PathBuf::from("/work/reports/01-01-2024/10-00-00/report.json"),
            sample_report(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::sample_app;
    use super::*;

    #[test]
    fn new_app_aggregates_report() {
        let app = sample_app();
        assert_eq!(app.summary.total_tests(), 3);
        assert_eq!(app.summary.counts.incomplete, 1);
        assert_eq!(app.failures.len(), 1);
        assert!(app.raw_lines.len() > 10);
        assert!(app.description.headed);
    }

    #[test]
    fn duration_sort_puts_slowest_first() {
        let mut app = sample_app();
        app.sort = SortOrder::Duration;
        assert_eq!(
            app.visible_results()[0].nodeid,
            "tests/test_cart.py::test_add"
        );
    }

    #[test]
    fn selected_row_resolves_its_failure() {
        let mut app = sample_app();
        app.selected_row = 1;
        let failure = app.selected_failure_entry().unwrap();
        assert_eq!(failure.nodeid, "tests/test_cart.py::test_add");

        app.selected_row = 0;
        assert!(app.selected_failure_entry().is_none());
    }

    #[test]
    fn tabs_cycle() {
        assert_eq!(Tab::Raw.next(), Tab::Summary);
        assert_eq!(Tab::Summary.previous(), Tab::Raw);
    }
}
