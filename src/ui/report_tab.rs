use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use super::detail_panel;
use super::failure_list;
use super::results_table;
use super::search_box;
use super::{format_seconds, theme};
use crate::app::App;

pub fn draw(frame: &mut Frame, app: &mut App, area: Rect) {
    let [info_area, table_area, failures_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Percentage(55),
        Constraint::Percentage(45),
    ])
    .areas(area);

    draw_info(frame, app, info_area);

    if app.filter_active || !app.filter.value().is_empty() {
        let [search_area, filtered_area] =
            Layout::vertical([Constraint::Length(3), Constraint::Min(1)]).areas(table_area);
        search_box::draw(frame, &app.filter, app.filter_active, search_area);
        results_table::draw(frame, app, filtered_area);
    } else {
        results_table::draw(frame, app, table_area);
    }

    let [list_area, detail_area] =
        Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)])
            .areas(failures_area);
    failure_list::draw(frame, app, list_area);
    detail_panel::draw(frame, app, detail_area);
}

/// The row of headline numbers above the results table.
fn draw_info(frame: &mut Frame, app: &App, area: Rect) {
    let counts = app.summary.counts;
    let boxes = [
        (
            format!("⏰ Total duration: {}s", format_seconds(app.summary.run_duration)),
            theme::BLUE,
        ),
        (
            format!("🧮 Number of tests: {}", app.summary.total_tests()),
            theme::BLUE,
        ),
        (format!("✔ Passed: {}", counts.passed), theme::GREEN),
        (format!("✘ Failed: {}", counts.failed), theme::RED),
        (format!("⟳ Rerun: {}", counts.rerun), theme::YELLOW),
        (format!("◌ Incomplete: {}", counts.incomplete), theme::PEACH),
    ];

    let areas = Layout::horizontal([
        Constraint::Ratio(3, 14),
        Constraint::Ratio(3, 14),
        Constraint::Ratio(2, 14),
        Constraint::Ratio(2, 14),
        Constraint::Ratio(2, 14),
        Constraint::Ratio(2, 14),
    ])
    .split(area);

    for ((text, color), box_area) in boxes.into_iter().zip(areas.iter()) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color));
        let paragraph = Paragraph::new(text)
            .style(Style::default().fg(color))
            .block(block);
        frame.render_widget(paragraph, *box_area);
    }
}
