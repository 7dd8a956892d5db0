use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};

/// Folder name format for the day a run started.
pub const DATE_FORMAT: &str = "%d-%m-%Y";
const TIME_FORMAT: &str = "%H-%M-%S";

/// Folder a new run writes its report and traces into: `<root>/<date>/<time>`.
pub fn run_output_dir(root: &Path, now: DateTime<Local>) -> PathBuf {
    root.join(now.format(DATE_FORMAT).to_string())
        .join(now.format(TIME_FORMAT).to_string())
}

pub fn today() -> String {
    Local::now().format(DATE_FORMAT).to_string()
}

/// JSON reports under `root`, newest first. With `date`, only reports inside a
/// folder of that name are returned.
pub fn list_reports(root: &Path, date: Option<&str>) -> Result<Vec<PathBuf>> {
    let pattern = root.join("**/").join("*.json").to_string_lossy().to_string();

    let mut found: Vec<(PathBuf, SystemTime)> = Vec::new();
    for entry in glob::glob(&pattern).context("invalid report search pattern")?.flatten() {
        let in_date = date.is_none_or(|d| {
            entry
                .strip_prefix(root)
                .unwrap_or(&entry)
                .components()
                .any(|c| c.as_os_str() == d)
        });
        if !in_date {
            continue;
        }
        let modified = entry
            .metadata()
            .and_then(|m| m.modified())
            .unwrap_or(SystemTime::UNIX_EPOCH);
        found.push((entry, modified));
    }

    found.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| b.0.cmp(&a.0)));
    tracing::debug!(root = %root.display(), count = found.len(), "listed reports");
    Ok(found.into_iter().map(|(path, _)| path).collect())
}

/// The newest report under `root` for `date`, if any.
pub fn latest_report(root: &Path, date: Option<&str>) -> Result<Option<PathBuf>> {
    Ok(list_reports(root, date)?.into_iter().next())
}

/// Display label for a report: the run folder it sits in.
pub fn run_label(path: &Path) -> String {
    path.parent()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn touch(path: &Path) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "{}").unwrap();
    }

    #[test]
    fn output_dir_is_date_then_time() {
        let now = Local.with_ymd_and_hms(2024, 3, 7, 9, 5, 1).unwrap();
        assert_eq!(
            run_output_dir(Path::new("reports"), now),
            PathBuf::from("reports/07-03-2024/09-05-01")
        );
    }

    #[test]
    fn filters_by_date_folder() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("07-03-2024/09-05-01/report.json"));
        touch(&root.join("08-03-2024/10-00-00/report.json"));
        touch(&root.join("08-03-2024/10-00-00/notes.txt"));

        let all = list_reports(root, None).unwrap();
        assert_eq!(all.len(), 2);

        let day = list_reports(root, Some("08-03-2024")).unwrap();
        assert_eq!(day, vec![root.join("08-03-2024/10-00-00/report.json")]);
        assert_eq!(run_label(&day[0]), "10-00-00");
    }

    #[test]
    fn empty_root_has_no_latest() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(latest_report(dir.path(), None).unwrap(), None);
    }
}
