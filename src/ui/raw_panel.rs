use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use super::theme;
use crate::app::App;

pub fn draw(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .title(" Raw Output ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::SURFACE2));

    app.raw_viewport_height = block.inner(area).height as usize;
    let start = app.raw_scroll_offset.min(app.raw_lines.len());
    let end = (start + app.raw_viewport_height).min(app.raw_lines.len());

    let lines: Vec<Line> = app.raw_lines[start..end]
        .iter()
        .map(|line| Line::from(Span::styled(line.as_str(), json_style(line))))
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Colour keys and values of a pretty-printed JSON line.
fn json_style(line: &str) -> Style {
    let trimmed = line.trim_start();
    if trimmed.starts_with('"') && trimmed.contains("\":") {
        Style::default().fg(theme::BLUE)
    } else if trimmed.starts_with('"') {
        Style::default().fg(theme::GREEN)
    } else if trimmed.starts_with(|c: char| c.is_ascii_digit() || c == '-') {
        Style::default().fg(theme::PEACH)
    } else {
        Style::default().fg(theme::SUBTEXT0)
    }
}
