use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::models::RunConfig;

/// Run a pytest suite and browse its JSON reports.
#[derive(Parser, Debug)]
#[command(name = "playtest", version, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the pytest arguments and run the suite
    Run(RunArgs),

    /// List marker names declared in pyproject.toml
    Markers,

    /// List JSON reports, newest first
    Reports {
        /// Only reports from this day (dd-mm-YYYY)
        #[arg(long, value_name = "DATE")]
        date: Option<String>,
    },

    /// Print a plain-text summary of a report
    Summary {
        #[arg(value_name = "REPORT")]
        report: PathBuf,
    },

    /// Open the report dashboard
    View {
        /// Report to open (default: newest report for --date)
        #[arg(value_name = "REPORT")]
        report: Option<PathBuf>,
        /// Day to pick the newest report from (dd-mm-YYYY, default: today)
        #[arg(long, value_name = "DATE", conflicts_with = "report")]
        date: Option<String>,
    },
}

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Run browsers headed
    #[arg(long)]
    pub headed: bool,

    /// Verbose pytest output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run every test in a folder
    #[arg(long = "dir", value_name = "DIR", group = "selector")]
    pub test_dir: Option<String>,

    /// Run a single test file
    #[arg(long = "file", value_name = "FILE", group = "selector")]
    pub test_file: Option<String>,

    /// Run a single test case (path::name)
    #[arg(long = "case", value_name = "NODEID", group = "selector")]
    pub test_case: Option<String>,

    /// Only run tests with this marker (repeatable, combined with `or`)
    #[arg(short = 'm', long = "mark", value_name = "MARK")]
    pub marks: Vec<String>,

    /// Write a JSON report into the run folder
    #[arg(long)]
    pub report: bool,

    /// Distribute tests across all CPUs
    #[arg(long)]
    pub parallel: bool,

    /// Rerun failing tests up to N times
    #[arg(long, value_name = "N", default_value_t = 0)]
    pub reruns: u32,

    /// Record Playwright traces into the run folder
    #[arg(long)]
    pub tracing: bool,

    /// Print the command instead of running it
    #[arg(long)]
    pub dry_run: bool,

    /// Open the dashboard on the new report when the run finishes
    #[arg(long, requires = "report")]
    pub view: bool,
}

impl RunArgs {
    pub fn to_run_config(&self) -> RunConfig {
        RunConfig {
            verbose: self.verbose,
            headed: self.headed,
            test_dir: self.test_dir.clone(),
            test_file: self.test_file.clone(),
            test_case: self.test_case.clone(),
            marks: (!self.marks.is_empty()).then(|| self.marks.clone()),
            playtest_report: self.report,
            parallel: self.parallel,
            rerun: self.reruns,
            tracing: self.tracing,
        }
    }

    /// Whether the run writes anything into an output folder.
    pub fn needs_output_dir(&self) -> bool {
        self.report || self.tracing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("playtest").chain(args.iter().copied()))
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_flags_map_to_config() {
        let cli = parse(&[
            "run", "--headed", "-v", "--file", "tests/test_cart.py", "-m", "smoke", "-m", "slow",
            "--reruns", "2", "--report",
        ])
        .unwrap();
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };

        let config = args.to_run_config();
        assert!(config.headed && config.verbose && config.playtest_report);
        assert_eq!(config.test_file.as_deref(), Some("tests/test_cart.py"));
        assert_eq!(config.marks, Some(vec!["smoke".into(), "slow".into()]));
        assert_eq!(config.rerun, 2);
        assert!(args.needs_output_dir());
    }

    #[test]
    fn selectors_are_exclusive() {
        assert!(parse(&["run", "--dir", "tests/ui", "--file", "tests/a.py"]).is_err());
    }

    #[test]
    fn view_after_run_needs_report() {
        assert!(parse(&["run", "--view"]).is_err());
        assert!(parse(&["run", "--view", "--report"]).is_ok());
    }

    #[test]
    fn no_marks_is_none() {
        let cli = parse(&["run"]).unwrap();
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.to_run_config().marks, None);
        assert!(!args.needs_output_dir());
    }
}
