use std::fmt;

use super::run_config::DEFAULT_SELECTOR;

/// How the positional test selector of a run should be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Directory(String),
    File(String),
    Case(String),
    /// The fallback `tests` folder.
    Default,
}

impl Selector {
    fn classify(token: &str) -> Self {
        if token.contains("::") {
            Selector::Case(token.to_string())
        } else if token.ends_with(".py") {
            Selector::File(token.to_string())
        } else if token == DEFAULT_SELECTOR {
            Selector::Default
        } else {
            Selector::Directory(token.to_string())
        }
    }
}

/// What a run selected, as shown on the summary tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunType {
    Directory(String),
    File(String),
    Case(String),
    Markers(String),
    All,
}

impl fmt::Display for RunType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunType::Directory(dir) => write!(f, "By test folder - {}", dir),
            RunType::File(file) => write!(f, "By test file - {}", file),
            RunType::Case(case) => write!(f, "By test case - {}", case),
            RunType::Markers(expr) => write!(f, "By markers - {}", expr),
            RunType::All => write!(f, "All Tests"),
        }
    }
}

/// Typed view of the argument list stored in a report's metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunDescription {
    pub headed: bool,
    pub verbose: bool,
    pub selector: Selector,
    pub markers: Option<String>,
    pub parallel: bool,
    pub tracing: bool,
    pub reruns: Option<u32>,
    pub report_output: Option<String>,
    pub trace_output: Option<String>,
}

impl Default for RunDescription {
    fn default() -> Self {
        Self {
            headed: false,
            verbose: false,
            selector: Selector::Default,
            markers: None,
            parallel: false,
            tracing: false,
            reruns: None,
            report_output: None,
            trace_output: None,
        }
    }
}

impl RunDescription {
    /// Parse the tokens produced by [`super::build_args`]. Unknown flags are skipped.
    pub fn parse<S: AsRef<str>>(args: &[S]) -> Self {
        let mut desc = RunDescription::default();
        let mut tokens = args.iter().map(AsRef::as_ref).peekable();
        let mut selector_seen = false;

        while let Some(token) = tokens.next() {
            match token {
                "--headed" => desc.headed = true,
                "-v" | "--verbose" => desc.verbose = true,
                "-m" => desc.markers = tokens.next().map(str::to_string),
                "--playtest-report" => {
                    desc.report_output = tokens
                        .next_if(|t| !t.starts_with('-'))
                        .map(str::to_string);
                }
                "--numprocesses" | "-n" => {
                    desc.parallel = true;
                    tokens.next();
                }
                "--reruns" => {
                    desc.reruns = tokens.next().and_then(|n| n.parse().ok());
                }
                "--tracing" => {
                    desc.tracing = tokens.next_if(|t| !t.starts_with('-')) != Some("off");
                }
                "--output" => {
                    desc.trace_output = tokens
                        .next_if(|t| !t.starts_with('-'))
                        .map(str::to_string);
                }
                t if !t.starts_with('-') && !selector_seen => {
                    desc.selector = Selector::classify(t);
                    selector_seen = true;
                }
                _ => {}
            }
        }

        desc
    }

    pub fn run_type(&self) -> RunType {
        match (&self.selector, &self.markers) {
            (Selector::Directory(d), _) => RunType::Directory(d.clone()),
            (Selector::File(f), _) => RunType::File(f.clone()),
            (Selector::Case(c), _) => RunType::Case(c.clone()),
            (Selector::Default, Some(expr)) => RunType::Markers(expr.clone()),
            (Selector::Default, None) => RunType::All,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RunConfig, build_args};
    use proptest::prelude::*;

    #[test]
    fn headed_does_not_shift_selector() {
        let desc = RunDescription::parse(&["--headed", "-v", "tests/checkout"]);
        assert!(desc.headed);
        assert!(desc.verbose);
        assert_eq!(desc.run_type(), RunType::Directory("tests/checkout".into()));
    }

    #[test]
    fn classifies_file_and_case() {
        let file = RunDescription::parse(&["tests/test_cart.py"]);
        assert_eq!(file.run_type(), RunType::File("tests/test_cart.py".into()));

        let case = RunDescription::parse(&["tests/test_cart.py::test_add"]);
        assert_eq!(
            case.run_type(),
            RunType::Case("tests/test_cart.py::test_add".into())
        );
    }

    #[test]
    fn markers_on_default_selector() {
        let desc = RunDescription::parse(&["-v", "tests", "-m", "smoke or slow"]);
        assert_eq!(desc.run_type(), RunType::Markers("smoke or slow".into()));
        assert_eq!(desc.run_type().to_string(), "By markers - smoke or slow");
    }

    #[test]
    fn plain_default_is_all_tests() {
        let desc = RunDescription::parse(&["tests"]);
        assert_eq!(desc.run_type(), RunType::All);
        assert!(!desc.parallel);
        assert_eq!(desc.reruns, None);
    }

    #[test]
    fn flags_with_values() {
        let desc = RunDescription::parse(&[
            "tests",
            "--playtest-report",
            "reports/x",
            "--numprocesses",
            "auto",
            "--reruns",
            "3",
            "--tracing",
            "on",
            "--output",
            "reports/x",
        ]);
        assert!(desc.parallel);
        assert!(desc.tracing);
        assert_eq!(desc.reruns, Some(3));
        assert_eq!(desc.report_output.as_deref(), Some("reports/x"));
        assert_eq!(desc.trace_output.as_deref(), Some("reports/x"));
    }

    #[test]
    fn bare_report_flag_does_not_swallow_next_flag() {
        let desc = RunDescription::parse(&["tests", "--playtest-report", "--numprocesses", "auto"]);
        assert_eq!(desc.report_output, None);
        assert!(desc.parallel);
    }

    proptest! {
        #[test]
        fn parses_what_build_args_produces(
            headed: bool,
            verbose: bool,
            parallel: bool,
            tracing: bool,
            rerun in 0u32..6,
            marks in proptest::collection::vec("[a-z]{2,8}", 0..3),
        ) {
            let config = RunConfig {
                headed,
                verbose,
                parallel,
                tracing,
                rerun,
                marks: Some(marks.clone()),
                playtest_report: true,
                ..RunConfig::default()
            };
            let desc = RunDescription::parse(&build_args(&config, Some("out")));

            prop_assert_eq!(desc.headed, headed);
            prop_assert_eq!(desc.verbose, verbose);
            prop_assert_eq!(desc.parallel, parallel);
            prop_assert_eq!(desc.tracing, tracing);
            prop_assert_eq!(desc.reruns, (rerun > 0).then_some(rerun));
            prop_assert_eq!(desc.report_output.as_deref(), Some("out"));
            if marks.is_empty() {
                prop_assert_eq!(desc.run_type(), RunType::All);
            } else {
                prop_assert_eq!(desc.run_type(), RunType::Markers(marks.join(" or ")));
            }
        }
    }
}
