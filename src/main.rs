mod app;
mod cli;
mod config;
mod editor;
mod markers;
mod models;
mod plain;
mod reports;
mod runner;
mod ui;

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    ExecutableCommand,
    event::{Event, EventStream},
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures_util::StreamExt;
use ratatui::prelude::*;
use tokio::sync::mpsc;
use tokio::time::{Duration, interval};
use tracing_subscriber::EnvFilter;

use app::{App, handle_action, trigger_action};
use cli::{Cli, Command, RunArgs};
use config::Config;
use models::{RunConfig, build_args, load_report};
use runner::{RunEvent, TestRunner, pytest::PytestRunner};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let interactive = match &cli.command {
        Command::View { .. } => true,
        Command::Run(args) => args.view,
        _ => false,
    };
    init_tracing(interactive);

    let workspace = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let config = Config::load(&workspace);

    match cli.command {
        Command::Run(args) => run_suite(&workspace, &config, args).await,

        Command::Markers => {
            for marker in markers::load_markers(&config.pyproject_path(&workspace))? {
                println!("{}", marker);
            }
            Ok(())
        }

        Command::Reports { date } => {
            let root = config.reports_dir(&workspace);
            for path in reports::list_reports(&root, date.as_deref())? {
                println!("{}  {}", reports::run_label(&path), path.display());
            }
            Ok(())
        }

        Command::Summary { report } => {
            let loaded = load_report(&report)?;
            print!("{}", plain::render_summary(&report, &loaded));
            Ok(())
        }

        Command::View { report, date } => {
            let path = match report {
                Some(path) => path,
                None => {
                    let root = config.reports_dir(&workspace);
                    let date = date.unwrap_or_else(reports::today);
                    reports::latest_report(&root, Some(&date))?.with_context(|| {
                        format!("no reports for {} under {}", date, root.display())
                    })?
                }
            };
            view(&workspace, &config, path).await
        }
    }
}

/// Log to `$PLAYTEST_LOG` when set. Otherwise non-interactive commands log to
/// stderr and the dashboard stays silent.
fn init_tracing(interactive: bool) {
    let filter = |default: &str| {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
    };

    let log_file = std::env::var("PLAYTEST_LOG").ok().and_then(|path| {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)
            .ok()
    });

    match log_file {
        Some(file) => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter("debug"))
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .try_init();
        }
        None if !interactive => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter("warn"))
                .with_writer(io::stderr)
                .try_init();
        }
        None => {}
    }
}

async fn run_suite(workspace: &Path, config: &Config, args: RunArgs) -> Result<()> {
    let run_config = args.to_run_config();
    warn_unknown_marks(workspace, config, &run_config);

    let output_dir = args.needs_output_dir().then(|| {
        reports::run_output_dir(&config.reports_dir(workspace), chrono::Local::now())
    });
    let output = output_dir.as_ref().map(|d| d.to_string_lossy().to_string());
    let pytest_args = build_args(&run_config, output.as_deref());

    let runner = PytestRunner::from_command(&config.runner.command)?;
    if args.dry_run {
        println!("{}", shell_words::join(runner.command_line(&pytest_args)));
        return Ok(());
    }

    if let Some(dir) = &output_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
    }

    let (tx, mut rx) = mpsc::unbounded_channel();
    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event {
                RunEvent::Output { line } => println!("{}", line),
                RunEvent::Error { line } => eprintln!("{}", line),
                RunEvent::Finished { .. } => {}
            }
        }
    });

    // Dropping the run future on Ctrl-C kills the runner's process group.
    let code = tokio::select! {
        result = runner.run(workspace, &pytest_args, tx) => result?,
        _ = tokio::signal::ctrl_c() => {
            printer.abort();
            anyhow::bail!("{} run interrupted", runner.name());
        }
    };
    printer.await.ok();

    if args.view
        && let Some(dir) = &output_dir
    {
        match reports::latest_report(dir, None)? {
            Some(path) => view(workspace, config, path).await?,
            None => tracing::warn!(dir = %dir.display(), "run wrote no report"),
        }
    }

    match code {
        Some(0) => Ok(()),
        Some(code) => std::process::exit(code),
        None => anyhow::bail!("{} was terminated by a signal", runner.name()),
    }
}

/// Warn about `-m` values that pyproject.toml does not declare.
fn warn_unknown_marks(workspace: &Path, config: &Config, run_config: &RunConfig) {
    let Some(marks) = run_config.marks.as_deref() else {
        return;
    };
    match markers::load_markers(&config.pyproject_path(workspace)) {
        Ok(known) => {
            for mark in marks.iter().filter(|m| !known.contains(m)) {
                tracing::warn!(%mark, "marker is not declared in pyproject.toml");
            }
        }
        Err(e) => tracing::debug!(error = %e, "skipping marker check"),
    }
}

async fn view(workspace: &Path, config: &Config, report_path: PathBuf) -> Result<()> {
    // Load before touching the terminal so errors print normally.
    let report = load_report(&report_path)?;
    let mut app = App::new(workspace.to_path_buf(), report_path, report);

    // Setup terminal
    terminal::enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let result = run_dashboard(&mut terminal, &mut app, config.editor.command.as_deref()).await;

    // Teardown terminal
    terminal::disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;

    result
}

async fn run_dashboard(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    editor_command: Option<&str>,
) -> Result<()> {
    let mut tick = interval(Duration::from_millis(250));
    let mut event_stream = EventStream::new();

    loop {
        terminal.draw(|frame| ui::draw(frame, app))?;

        tokio::select! {
            maybe_event = event_stream.next() => {
                match maybe_event {
                    None => break,
                    Some(Err(e)) => return Err(e.into()),
                    Some(Ok(Event::Key(key))) => {
                        if let Some(action) = trigger_action(key, app.filter_active) {
                            handle_action(app, action);
                        }
                    }
                    Some(Ok(_)) => {}
                }
            }

            _ = tick.tick() => {
                app.notifier.prune_expired();
            }
        }

        if let Some((path, line)) = app.pending_editor.take()
            && let Err(e) = editor::open(terminal, editor_command, path, line)
        {
            app.notifier.error(e.to_string());
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
