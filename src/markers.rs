use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MarkerError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse markers from {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Deserialize)]
struct PyProject {
    tool: Tool,
}

#[derive(Debug, Deserialize)]
struct Tool {
    pytest: Pytest,
}

#[derive(Debug, Deserialize)]
struct Pytest {
    ini_options: IniOptions,
}

#[derive(Debug, Deserialize)]
struct IniOptions {
    markers: Vec<String>,
}

/// Load marker names from `tool.pytest.ini_options.markers` in `pyproject`.
///
/// Each entry reads `"<name>: <description>"`; only the name is kept, in
/// declaration order.
pub fn load_markers(pyproject: &Path) -> Result<Vec<String>, MarkerError> {
    let content = std::fs::read_to_string(pyproject).map_err(|source| MarkerError::Io {
        path: pyproject.to_path_buf(),
        source,
    })?;

    let parsed = parse_markers(&content).map_err(|source| MarkerError::Parse {
        path: pyproject.to_path_buf(),
        source,
    })?;

    tracing::debug!(count = parsed.len(), path = %pyproject.display(), "loaded markers");
    Ok(parsed)
}

fn parse_markers(content: &str) -> Result<Vec<String>, toml::de::Error> {
    let project: PyProject = toml::from_str(content)?;
    Ok(project
        .tool
        .pytest
        .ini_options
        .markers
        .iter()
        .map(|entry| marker_name(entry).to_string())
        .collect())
}

fn marker_name(entry: &str) -> &str {
    entry.split_once(':').map_or(entry, |(name, _)| name).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PYPROJECT: &str = r#"
[project]
name = "shop-e2e"

[tool.pytest.ini_options]
addopts = "--browser chromium"
markers = [
    "smoke: quick checks run on every deploy",
    "slow: long running journeys",
    "checkout",
]
"#;

    #[test]
    fn keeps_names_in_order() {
        assert_eq!(
            parse_markers(PYPROJECT).unwrap(),
            vec!["smoke", "slow", "checkout"]
        );
    }

    #[test]
    fn description_may_contain_colons() {
        assert_eq!(marker_name("api: hits http://localhost:8000"), "api");
    }

    #[test]
    fn missing_key_is_an_error() {
        let content = "[tool.pytest.ini_options]\naddopts = \"-q\"\n";
        assert!(parse_markers(content).is_err());
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pyproject.toml");
        std::fs::write(&path, PYPROJECT).unwrap();
        assert_eq!(load_markers(&path).unwrap().len(), 3);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_markers(&dir.path().join("pyproject.toml")).unwrap_err();
        assert!(matches!(err, MarkerError::Io { .. }));
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pyproject.toml");
        std::fs::write(&path, "[tool.pytest\nmarkers = 1").unwrap();
        assert!(matches!(load_markers(&path), Err(MarkerError::Parse { .. })));
    }
}
