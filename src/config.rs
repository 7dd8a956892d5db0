use std::path::{Path, PathBuf};

use serde::Deserialize;

pub const CONFIG_FILE: &str = "playtest.toml";

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub runner: RunnerConfig,
    #[serde(default)]
    pub reports: ReportsConfig,
    #[serde(default)]
    pub editor: EditorConfig,
}

/// How pytest is launched and where its settings live.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Command prefix the generated arguments are appended to.
    /// Example: "uv run pytest" or "python -m pytest"
    pub command: String,
    /// Project file holding `tool.pytest.ini_options.markers`.
    pub pyproject: PathBuf,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            command: "python -m pytest".to_string(),
            pyproject: PathBuf::from("pyproject.toml"),
        }
    }
}

/// Where JSON reports are written and searched for.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ReportsConfig {
    /// Root folder (relative to the workspace) holding `<date>/<time>/` run folders.
    pub dir: PathBuf,
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("reports"),
        }
    }
}

/// Overrides the editor used when opening failure locations.
#[derive(Debug, Default, Deserialize)]
pub struct EditorConfig {
    /// Binary name or path to use instead of `$EDITOR`.
    /// The argument format is auto-detected from the binary name.
    pub command: Option<String>,
}

impl Config {
    /// Load `playtest.toml` from the workspace root, falling back to defaults if absent, unreadable or invalid.
    pub fn load(workspace: &Path) -> Self {
        let path = workspace.join(CONFIG_FILE);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "cannot read config");
                return Self::default();
            }
        };
        toml::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "ignoring invalid config");
            Self::default()
        })
    }

    pub fn reports_dir(&self, workspace: &Path) -> PathBuf {
        workspace.join(&self.reports.dir)
    }

    pub fn pyproject_path(&self, workspace: &Path) -> PathBuf {
        workspace.join(&self.runner.pyproject)
    }
}
