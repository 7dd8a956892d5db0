use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::failure::{FailureEntry, failures};
use super::invocation::RunDescription;
use super::summary::{ReportSummary, summarize};

/// Errors raised while loading a JSON report.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("report file {0} does not exist")]
    NotFound(PathBuf),

    #[error("failed to read report {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("report {path} is not valid JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed report: {reason}")]
    Malformed { reason: String },
}

impl ReportError {
    fn malformed(reason: impl Into<String>) -> Self {
        ReportError::Malformed {
            reason: reason.into(),
        }
    }
}

/// Lifecycle stage of a single test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Setup,
    Call,
    Teardown,
}

/// One `(nodeid, phase)` row written by the runner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestPhaseRecord {
    pub nodeid: String,
    pub when: Phase,
    pub outcome: String,
    pub duration: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longrepr: Option<Value>,
}

/// A loaded report: run metadata plus the phase records.
#[derive(Debug, Clone)]
pub struct Report {
    /// CLI tokens the run was started with. Empty for reports without metadata.
    pub args: Vec<String>,
    /// Run duration in seconds as recorded by the runner.
    pub total_duration: Option<f64>,
    pub records: Vec<TestPhaseRecord>,
    /// The document as read, for the raw view.
    pub raw: Value,
}

impl Report {
    /// Build a report from an already parsed JSON document.
    ///
    /// Accepts both the `{"metadata": [...], "test_data": [...]}` layout and a
    /// bare array of records.
    pub fn from_value(raw: Value) -> Result<Self, ReportError> {
        let (args, total_duration, records) = match &raw {
            Value::Object(map) => {
                let metadata = map
                    .get("metadata")
                    .ok_or_else(|| ReportError::malformed("missing `metadata`"))?
                    .as_array()
                    .ok_or_else(|| ReportError::malformed("`metadata` is not an array"))?;
                let test_data = map
                    .get("test_data")
                    .ok_or_else(|| ReportError::malformed("missing `test_data`"))?;

                (
                    metadata_args(metadata)?,
                    metadata_duration(metadata)?,
                    parse_records(test_data)?,
                )
            }
            Value::Array(_) => (Vec::new(), None, parse_records(&raw)?),
            _ => {
                return Err(ReportError::malformed(
                    "expected a JSON object or array at the top level",
                ));
            }
        };

        Ok(Self {
            args,
            total_duration,
            records,
            raw,
        })
    }

    pub fn summary(&self) -> ReportSummary {
        let mut summary = summarize(&self.records);
        summary.run_duration = self.total_duration;
        summary
    }

    pub fn description(&self) -> RunDescription {
        RunDescription::parse(&self.args)
    }

    pub fn failures(&self) -> Vec<FailureEntry> {
        failures(&self.records)
    }
}

/// Read and parse the report at `path`.
pub fn load_report(path: &Path) -> Result<Report, ReportError> {
    let content = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ReportError::NotFound(path.to_path_buf())
        } else {
            ReportError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let raw: Value = serde_json::from_str(&content).map_err(|source| ReportError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(path = %path.display(), "loaded report");
    Report::from_value(raw)
}

fn metadata_args(metadata: &[Value]) -> Result<Vec<String>, ReportError> {
    let Some(args) = metadata.iter().find_map(|entry| entry.get("args")) else {
        return Err(ReportError::malformed("metadata has no `args` entry"));
    };

    args.as_array()
        .ok_or_else(|| ReportError::malformed("metadata `args` is not an array"))?
        .iter()
        .map(|arg| {
            arg.as_str()
                .map(str::to_string)
                .ok_or_else(|| ReportError::malformed("metadata `args` holds a non-string value"))
        })
        .collect()
}

fn metadata_duration(metadata: &[Value]) -> Result<Option<f64>, ReportError> {
    match metadata.iter().find_map(|entry| entry.get("total_duration")) {
        None => Err(ReportError::malformed(
            "metadata has no `total_duration` entry",
        )),
        Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_f64()
            .map(Some)
            .ok_or_else(|| ReportError::malformed("metadata `total_duration` is not a number")),
    }
}

fn parse_records(test_data: &Value) -> Result<Vec<TestPhaseRecord>, ReportError> {
    let entries = test_data
        .as_array()
        .ok_or_else(|| ReportError::malformed("`test_data` is not an array"))?;

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            TestPhaseRecord::deserialize(entry).map_err(|e| {
                ReportError::malformed(format!("test_data[{}]: {}", index, e))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(nodeid: &str, when: &str, outcome: &str, duration: f64) -> Value {
        json!({"nodeid": nodeid, "when": when, "outcome": outcome, "duration": duration})
    }

    #[test]
    fn loads_metadata_layout() {
        let raw = json!({
            "metadata": [{"args": ["-v", "tests"]}, {"total_duration": 4.5}],
            "test_data": [record("t::a", "call", "passed", 0.2)],
        });

        let report = Report::from_value(raw).unwrap();
        assert_eq!(report.args, vec!["-v", "tests"]);
        assert_eq!(report.total_duration, Some(4.5));
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].when, Phase::Call);
    }

    #[test]
    fn metadata_found_by_key_not_position() {
        let raw = json!({
            "metadata": [{"total_duration": 1.0}, {"args": ["tests"]}],
            "test_data": [],
        });
        let report = Report::from_value(raw).unwrap();
        assert_eq!(report.args, vec!["tests"]);
        assert_eq!(report.summary().run_duration, Some(1.0));
    }

    #[test]
    fn loads_bare_record_array() {
        let raw = json!([record("t::a", "setup", "passed", 0.1)]);
        let report = Report::from_value(raw).unwrap();
        assert!(report.args.is_empty());
        assert_eq!(report.total_duration, None);
        assert_eq!(report.records.len(), 1);
    }

    #[test]
    fn missing_test_data_is_malformed() {
        let raw = json!({"metadata": [{"args": []}, {"total_duration": 1.0}]});
        let err = Report::from_value(raw).unwrap_err();
        assert!(matches!(err, ReportError::Malformed { .. }));
        assert!(err.to_string().contains("test_data"));
    }

    #[test]
    fn bad_record_names_its_index() {
        let raw = json!({
            "metadata": [{"args": []}, {"total_duration": 1.0}],
            "test_data": [
                record("t::a", "call", "passed", 0.2),
                {"nodeid": "t::b", "when": "call", "outcome": "passed"},
            ],
        });
        let err = Report::from_value(raw).unwrap_err();
        assert!(err.to_string().contains("test_data[1]"), "{}", err);
    }

    #[test]
    fn unknown_phase_is_malformed() {
        let raw = json!([record("t::a", "collect", "passed", 0.0)]);
        assert!(matches!(
            Report::from_value(raw),
            Err(ReportError::Malformed { .. })
        ));
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        assert!(matches!(load_report(&path), Err(ReportError::NotFound(p)) if p == path));
    }

    #[test]
    fn invalid_json_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_report(&path), Err(ReportError::Json { .. })));
    }

    #[test]
    fn loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let raw = json!({
            "metadata": [{"args": ["--headed", "tests"]}, {"total_duration": 2.0}],
            "test_data": [record("t::a", "call", "failed", 0.3)],
        });
        std::fs::write(&path, raw.to_string()).unwrap();

        let report = load_report(&path).unwrap();
        assert!(report.description().headed);
        assert_eq!(report.summary().counts.failed, 1);
    }
}
