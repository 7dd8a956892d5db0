use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tui_input::InputRequest;

use crate::app::{App, Panel, SortOrder, Tab};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    NextTab,
    PreviousTab,
    SelectTab(Tab),
    FocusNext,
    FocusPrevious,
    NavigateUp,
    NavigateDown,
    ScrollUp,
    ScrollDown,
    JumpToStart,
    JumpToEnd,
    ToggleSort,
    FilterEnter,
    FilterInput(char),
    FilterBackspace,
    FilterExit,
    FilterApply,
    OpenInEditor,
    CopyFailure,
}

/// Process a keyboard action.
pub fn handle_action(app: &mut App, action: Action) {
    match action {
        Action::Quit => app.should_quit = true,

        Action::NextTab => app.active_tab = app.active_tab.next(),

        Action::PreviousTab => app.active_tab = app.active_tab.previous(),

        Action::SelectTab(tab) => app.active_tab = tab,

        Action::FocusNext => {
            app.active_panel = match app.active_panel {
                Panel::Results => Panel::Failures,
                Panel::Failures => Panel::Detail,
                Panel::Detail => Panel::Results,
            };
            app.detail_scroll_offset = 0;
        }

        Action::FocusPrevious => {
            app.active_panel = match app.active_panel {
                Panel::Results => Panel::Detail,
                Panel::Failures => Panel::Results,
                Panel::Detail => Panel::Failures,
            };
            app.detail_scroll_offset = 0;
        }

        Action::NavigateUp => move_selection(app, -1),

        Action::NavigateDown => move_selection(app, 1),

        Action::ScrollUp => {
            let half = half_page(app);
            move_selection(app, -(half as isize));
        }

        Action::ScrollDown => {
            let half = half_page(app);
            move_selection(app, half as isize);
        }

        Action::JumpToStart => move_selection(app, isize::MIN),

        Action::JumpToEnd => move_selection(app, isize::MAX),

        Action::ToggleSort => {
            app.sort = match app.sort {
                SortOrder::Report => SortOrder::Duration,
                SortOrder::Duration => SortOrder::Report,
            };
            app.selected_row = 0;
            app.results_scroll_offset = 0;
        }

        Action::FilterEnter => {
            app.filter_active = true;
            app.active_tab = Tab::Report;
        }

        Action::FilterInput(c) => {
            app.filter.handle(InputRequest::InsertChar(c));
            app.reset_selection();
        }

        Action::FilterBackspace => {
            app.filter.handle(InputRequest::DeletePrevChar);
            app.reset_selection();
        }

        Action::FilterExit => {
            app.filter.reset();
            app.filter_active = false;
            app.reset_selection();
        }

        Action::FilterApply => {
            app.filter_active = false;
        }

        Action::OpenInEditor => {
            let location = app
                .selected_failure_entry()
                .and_then(|f| f.detail.as_ref())
                .and_then(|d| d.path.as_ref().map(|p| (p.clone(), d.lineno)));

            match location {
                Some((path, line)) => {
                    let path = PathBuf::from(path);
                    let path = if path.is_absolute() {
                        path
                    } else {
                        app.workspace.join(path)
                    };
                    app.pending_editor = Some((path, line));
                }
                None => app.notifier.error("No failure location for this test"),
            }
        }

        Action::CopyFailure => {
            let text = app
                .selected_failure_entry()
                .and_then(|f| f.detail.as_ref())
                .map(|d| d.to_text());

            match text {
                Some(text) => match copy_to_clipboard(text) {
                    Ok(()) => app
                        .notifier
                        .info("Failure copied to clipboard", Duration::from_secs(2)),
                    Err(e) => app.notifier.error(e.to_string()),
                },
                None => app.notifier.error("No failure details to copy"),
            }
        }
    }
}

pub fn trigger_action(key: KeyEvent, filter_active: bool) -> Option<Action> {
    if filter_active {
        match key.code {
            KeyCode::Esc => Some(Action::FilterExit),
            KeyCode::Enter => Some(Action::FilterApply),
            KeyCode::Backspace => Some(Action::FilterBackspace),
            KeyCode::Up => Some(Action::NavigateUp),
            KeyCode::Down => Some(Action::NavigateDown),
            KeyCode::Char(c) => Some(Action::FilterInput(c)),
            _ => None,
        }
    } else {
        map_key(key)
    }
}

fn map_key(key: KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Action::Quit),
            KeyCode::Char('u') => Some(Action::ScrollUp),
            KeyCode::Char('d') => Some(Action::ScrollDown),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('1') => Some(Action::SelectTab(Tab::Summary)),
        KeyCode::Char('2') => Some(Action::SelectTab(Tab::Report)),
        KeyCode::Char('3') => Some(Action::SelectTab(Tab::Raw)),
        KeyCode::Char(']') => Some(Action::NextTab),
        KeyCode::Char('[') => Some(Action::PreviousTab),
        KeyCode::Tab => Some(Action::FocusNext),
        KeyCode::BackTab => Some(Action::FocusPrevious),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::NavigateUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::NavigateDown),
        KeyCode::Char('g') | KeyCode::Home => Some(Action::JumpToStart),
        KeyCode::Char('G') | KeyCode::End => Some(Action::JumpToEnd),
        KeyCode::Char('s') => Some(Action::ToggleSort),
        KeyCode::Char('f') | KeyCode::Char('/') => Some(Action::FilterEnter),
        KeyCode::Char('e') => Some(Action::OpenInEditor),
        KeyCode::Char('y') => Some(Action::CopyFailure),
        KeyCode::PageUp => Some(Action::ScrollUp),
        KeyCode::PageDown => Some(Action::ScrollDown),
        _ => None,
    }
}

fn half_page(app: &App) -> usize {
    let viewport = match (app.active_tab, app.active_panel) {
        (Tab::Raw, _) => app.raw_viewport_height,
        (_, Panel::Failures) => app.failures_viewport_height,
        _ => app.results_viewport_height,
    };
    (viewport / 2).max(1)
}

/// Move the cursor of whatever the current tab/panel scrolls, clamped to its bounds.
fn move_selection(app: &mut App, delta: isize) {
    match app.active_tab {
        Tab::Summary => {}

        Tab::Raw => {
            let max = app.max_raw_scroll();
            app.raw_scroll_offset = step(app.raw_scroll_offset, delta, max);
        }

        Tab::Report => match app.active_panel {
            Panel::Results => {
                let max = app.visible_results().len().saturating_sub(1);
                app.selected_row = step(app.selected_row, delta, max);
                app.detail_scroll_offset = 0;
                app.adjust_results_scroll();
            }

            Panel::Failures => {
                let max = app.visible_failures().len().saturating_sub(1);
                app.selected_failure = step(app.selected_failure, delta, max);
                app.detail_scroll_offset = 0;
                app.adjust_failures_scroll();
            }

            Panel::Detail => {
                let current = app.detail_scroll_offset as usize;
                app.detail_scroll_offset = step(current, delta, u16::MAX as usize) as u16;
            }
        },
    }
}

fn step(current: usize, delta: isize, max: usize) -> usize {
    current.saturating_add_signed(delta).min(max)
}

fn copy_to_clipboard(text: String) -> Result<()> {
    let mut clipboard = arboard::Clipboard::new().context("clipboard is not available")?;
    clipboard
        .set_text(text)
        .context("failed to write to clipboard")?;
    Ok(())
}
