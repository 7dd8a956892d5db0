use ratatui::style::Color;

use crate::ui::theme;

/// Result of a test as read from its `call` phase.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TestOutcome {
    Passed,
    Failed,
    Rerun,
    /// Any other outcome string written by the runner (`skipped`, `xfailed`, ...).
    Other(String),
    /// No `call` phase was recorded for the test.
    #[default]
    Incomplete,
}

impl TestOutcome {
    pub fn parse(outcome: &str) -> Self {
        match outcome {
            "passed" => TestOutcome::Passed,
            "failed" => TestOutcome::Failed,
            "rerun" => TestOutcome::Rerun,
            other => TestOutcome::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            TestOutcome::Passed => "passed",
            TestOutcome::Failed => "failed",
            TestOutcome::Rerun => "rerun",
            TestOutcome::Other(s) => s,
            TestOutcome::Incomplete => "incomplete",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            TestOutcome::Passed => "✔",
            TestOutcome::Failed => "✘",
            TestOutcome::Rerun => "⟳",
            TestOutcome::Other(_) => "⊘",
            TestOutcome::Incomplete => "◌",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            TestOutcome::Passed => theme::GREEN,
            TestOutcome::Failed => theme::RED,
            TestOutcome::Rerun => theme::YELLOW,
            TestOutcome::Other(_) => theme::OVERLAY0,
            TestOutcome::Incomplete => theme::PEACH,
        }
    }

    pub fn is_passed(&self) -> bool {
        matches!(self, TestOutcome::Passed)
    }
}
