use serde_json::Value;

use super::outcome::TestOutcome;
use super::report::{Phase, TestPhaseRecord};

/// Crash location and traceback pulled from a record's `longrepr`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FailureDetail {
    pub path: Option<String>,
    pub lineno: Option<u32>,
    pub message: Option<String>,
    pub traceback: Vec<String>,
}

impl FailureDetail {
    pub fn from_longrepr(longrepr: &Value) -> Self {
        match longrepr {
            Value::String(text) => FailureDetail {
                traceback: text.lines().map(str::to_string).collect(),
                ..FailureDetail::default()
            },
            Value::Object(_) => {
                let crash = longrepr.get("reprcrash");
                let traceback = longrepr
                    .pointer("/reprtraceback/reprentries")
                    .and_then(Value::as_array)
                    .map(|entries| {
                        entries
                            .iter()
                            .filter_map(|entry| entry.pointer("/data/lines"))
                            .filter_map(Value::as_array)
                            .flatten()
                            .map(line_text)
                            .collect()
                    })
                    .unwrap_or_default();

                FailureDetail {
                    path: crash
                        .and_then(|c| c.get("path"))
                        .and_then(Value::as_str)
                        .map(str::to_string),
                    lineno: crash
                        .and_then(|c| c.get("lineno"))
                        .and_then(Value::as_u64)
                        .and_then(|n| u32::try_from(n).ok()),
                    message: crash
                        .and_then(|c| c.get("message"))
                        .and_then(Value::as_str)
                        .map(str::to_string),
                    traceback,
                }
            }
            _ => FailureDetail::default(),
        }
    }

    /// Plain-text form used for the clipboard.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        if let Some(path) = &self.path {
            out.push_str(path);
            if let Some(line) = self.lineno {
                out.push_str(&format!(":{}", line));
            }
            out.push('\n');
        }
        if let Some(message) = &self.message {
            out.push_str(message);
            out.push('\n');
        }
        for line in &self.traceback {
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}

fn line_text(line: &Value) -> String {
    match line {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// A non-passing `call` record, one per attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct FailureEntry {
    pub nodeid: String,
    pub outcome: TestOutcome,
    pub detail: Option<FailureDetail>,
}

pub fn failures(records: &[TestPhaseRecord]) -> Vec<FailureEntry> {
    records
        .iter()
        .filter(|r| r.when == Phase::Call && r.outcome != "passed")
        .map(|r| FailureEntry {
            nodeid: r.nodeid.clone(),
            outcome: TestOutcome::parse(&r.outcome),
            detail: r.longrepr.as_ref().map(FailureDetail::from_longrepr),
        })
        .collect()
}
