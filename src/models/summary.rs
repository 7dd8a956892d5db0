use std::collections::HashMap;

use super::outcome::TestOutcome;
use super::report::{Phase, TestPhaseRecord};

/// Per-phase durations of one test, in seconds. Absent phases are `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PhaseDurations {
    pub setup: Option<f64>,
    pub call: Option<f64>,
    pub teardown: Option<f64>,
}

impl PhaseDurations {
    /// Sum of the recorded phases; a missing phase counts as zero.
    pub fn total(&self) -> f64 {
        self.setup.unwrap_or(0.0) + self.call.unwrap_or(0.0) + self.teardown.unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TestSummary {
    pub nodeid: String,
    pub outcome: TestOutcome,
    pub durations: PhaseDurations,
    /// Number of `call` records, more than one when the test was rerun.
    pub attempts: usize,
}

impl TestSummary {
    pub fn total_duration(&self) -> f64 {
        self.durations.total()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutcomeCounts {
    pub passed: usize,
    pub failed: usize,
    pub rerun: usize,
    /// Tests without a `call` record.
    pub incomplete: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportSummary {
    /// One entry per unique node id, in the order ids first appear.
    pub tests: Vec<TestSummary>,
    pub counts: OutcomeCounts,
    /// Run duration taken from the report metadata.
    pub run_duration: Option<f64>,
}

impl ReportSummary {
    pub fn test_ids(&self) -> impl Iterator<Item = &str> {
        self.tests.iter().map(|t| t.nodeid.as_str())
    }

    pub fn total_tests(&self) -> usize {
        self.tests.len()
    }

    pub fn get(&self, nodeid: &str) -> Option<&TestSummary> {
        self.tests.iter().find(|t| t.nodeid == nodeid)
    }
}

/// Aggregate phase records into per-test results and global counts.
pub fn summarize(records: &[TestPhaseRecord]) -> ReportSummary {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut tests: Vec<TestSummary> = Vec::new();
    let mut counts = OutcomeCounts::default();

    for record in records {
        let slot = *index.entry(record.nodeid.as_str()).or_insert_with(|| {
            tests.push(TestSummary {
                nodeid: record.nodeid.clone(),
                outcome: TestOutcome::Incomplete,
                durations: PhaseDurations::default(),
                attempts: 0,
            });
            tests.len() - 1
        });
        let test = &mut tests[slot];

        match record.when {
            Phase::Setup => test.durations.setup = Some(record.duration),
            Phase::Teardown => test.durations.teardown = Some(record.duration),
            Phase::Call => {
                let outcome = TestOutcome::parse(&record.outcome);
                match outcome {
                    TestOutcome::Passed => counts.passed += 1,
                    TestOutcome::Failed => counts.failed += 1,
                    TestOutcome::Rerun => counts.rerun += 1,
                    _ => {}
                }
                // Later attempts replace earlier ones.
                test.outcome = outcome;
                test.durations.call = Some(record.duration);
                test.attempts += 1;
            }
        }
    }

    counts.incomplete = tests
        .iter()
        .filter(|t| t.outcome == TestOutcome::Incomplete)
        .count();

    ReportSummary {
        tests,
        counts,
        run_duration: None,
    }
}
