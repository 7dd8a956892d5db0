use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Tabs},
};

use crate::app::{App, Tab};

use super::notifications;
use super::raw_panel;
use super::report_tab;
use super::status_bar;
use super::summary_tab;
use super::theme;

pub fn draw(frame: &mut Frame, app: &mut App) {
    let [tabs_area, main_area, status_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let title = format!(" Reports — {} ", crate::reports::run_label(&app.report_path));
    let tabs = Tabs::new(Tab::ALL.iter().map(|t| t.title()))
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme::SURFACE2)),
        )
        .select(app.active_tab.index())
        .style(Style::default().fg(theme::SUBTEXT0))
        .highlight_style(Style::default().fg(theme::BLUE).bold());
    frame.render_widget(tabs, tabs_area);

    match app.active_tab {
        Tab::Summary => summary_tab::draw(frame, app, main_area),
        Tab::Report => report_tab::draw(frame, app, main_area),
        Tab::Raw => raw_panel::draw(frame, app, main_area),
    }

    status_bar::draw(frame, app, status_area);
    notifications::draw(frame, app);
}

#[cfg(test)]
pub(crate) mod test_support {
    use ratatui::{Terminal, backend::TestBackend};

    use crate::app::App;

    /// Render the whole dashboard into an in-memory buffer and return its text.
    pub fn render(app: &mut App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| super::draw(frame, app)).unwrap();
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }
}
