use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Row, Table},
};

use super::{format_seconds, theme};
use crate::app::{App, Panel, SortOrder};

const HEADERS: [&str; 6] = ["Test Case", "Outcome", "Setup", "Call", "Teardown", "Total"];

pub fn draw(frame: &mut Frame, app: &mut App, area: Rect) {
    let focused = app.active_panel == Panel::Results;
    let border_style = if focused {
        Style::default().fg(theme::BLUE)
    } else {
        Style::default().fg(theme::SURFACE2)
    };

    let title = match app.sort {
        SortOrder::Report => " Test Run Report ".to_string(),
        SortOrder::Duration => " Test Run Report — slowest first ".to_string(),
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);

    // Inner height minus the header row
    app.results_viewport_height = block.inner(area).height.saturating_sub(1) as usize;
    let viewport = app.results_viewport_height;

    let visible = app.visible_results();
    let start = app.results_scroll_offset.min(visible.len());
    let end = (start + viewport).min(visible.len());

    let rows: Vec<Row> = visible[start..end]
        .iter()
        .enumerate()
        .map(|(view_i, test)| {
            let absolute_i = view_i + start;
            let d = &test.durations;
            let outcome = if test.attempts > 1 {
                format!("{} {} ({}x)", test.outcome.icon(), test.outcome.label(), test.attempts)
            } else {
                format!("{} {}", test.outcome.icon(), test.outcome.label())
            };

            let mut style = Style::default();
            if !test.outcome.is_passed() {
                style = style.bg(theme::FAILED_ROW);
            }
            if focused && absolute_i == app.selected_row {
                style = style.bg(theme::SURFACE1).bold();
            }

            Row::new(vec![
                Cell::from(test.nodeid.clone()),
                Cell::from(outcome).style(Style::default().fg(test.outcome.color())),
                Cell::from(format_seconds(d.setup)),
                Cell::from(format_seconds(d.call)),
                Cell::from(format_seconds(d.teardown)),
                Cell::from(format_seconds(Some(test.total_duration()))),
            ])
            .style(style)
        })
        .collect();

    let header = Row::new(HEADERS.iter().map(|h| Cell::from(*h)))
        .style(Style::default().fg(theme::YELLOW).bold());

    let widths = [
        Constraint::Fill(1),
        Constraint::Length(16),
        Constraint::Length(8),
        Constraint::Length(8),
        Constraint::Length(9),
        Constraint::Length(8),
    ];

    let table = Table::new(rows, widths).header(header).block(block);
    frame.render_widget(table, area);
}
