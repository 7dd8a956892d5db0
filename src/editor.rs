use std::path::PathBuf;
use std::{io, path::Path};

use anyhow::{Context, Result};
use crossterm::{
    ExecutableCommand,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

/// Suspend the dashboard, open the editor at `path:line`, then restore the screen.
///
/// `command` overrides `$EDITOR`; vim is the last resort.
pub fn open(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    command: Option<&str>,
    path: PathBuf,
    line: Option<u32>,
) -> Result<()> {
    let editor = command
        .map(str::to_string)
        .or_else(|| std::env::var("EDITOR").ok())
        .unwrap_or_else(|| "vim".into());

    terminal::disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;

    let args = editor_args(&editor, &path, line);
    tracing::debug!(%editor, ?args, "opening editor");
    let result = std::process::Command::new(&editor).args(&args).status();

    io::stdout().execute(EnterAlternateScreen)?;
    terminal::enable_raw_mode()?;
    terminal.clear()?;

    result.with_context(|| format!("editor '{}' not found or failed to launch", editor))?;
    Ok(())
}

fn editor_args(editor: &str, path: &Path, line: Option<u32>) -> Vec<String> {
    let path_str = path.to_string_lossy().to_string();

    match (editor_kind(editor), line) {
        // vim +line file
        (EditorKind::Vim, Some(l)) => vec![format!("+{}", l), path_str],
        // hx file:line  |  zed file:line
        (EditorKind::Helix | EditorKind::Zed, Some(l)) => vec![format!("{}:{}", path_str, l)],
        // code --goto file:line
        (EditorKind::VSCode, Some(l)) => vec!["--goto".into(), format!("{}:{}", path_str, l)],
        // pycharm --line n file
        (EditorKind::JetBrains, Some(l)) => vec!["--line".into(), l.to_string(), path_str],
        (_, None) => vec![path_str],
    }
}

#[derive(Debug, PartialEq, Eq)]
enum EditorKind {
    Vim,
    Helix,
    VSCode,
    JetBrains,
    Zed,
}

fn editor_kind(editor: &str) -> EditorKind {
    let bin = Path::new(editor)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(editor);

    match bin {
        "hx" | "helix" => EditorKind::Helix,
        "code" | "code-insiders" | "codium" => EditorKind::VSCode,
        "pycharm" | "pycharm.sh" | "charm" | "idea" => EditorKind::JetBrains,
        "zed" => EditorKind::Zed,
        _ => EditorKind::Vim,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_editor_from_binary_path() {
        assert_eq!(editor_kind("/usr/local/bin/hx"), EditorKind::Helix);
        assert_eq!(editor_kind("code"), EditorKind::VSCode);
        assert_eq!(editor_kind("pycharm"), EditorKind::JetBrains);
        assert_eq!(editor_kind("nvim"), EditorKind::Vim);
    }

    #[test]
    fn builds_goto_arguments() {
        let path = Path::new("tests/test_cart.py");
        assert_eq!(
            editor_args("nvim", path, Some(12)),
            vec!["+12", "tests/test_cart.py"]
        );
        assert_eq!(
            editor_args("code", path, Some(12)),
            vec!["--goto", "tests/test_cart.py:12"]
        );
        assert_eq!(
            editor_args("pycharm", path, Some(12)),
            vec!["--line", "12", "tests/test_cart.py"]
        );
        assert_eq!(editor_args("zed", path, None), vec!["tests/test_cart.py"]);
    }
}
