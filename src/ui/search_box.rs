use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};
use tui_input::Input;

use super::theme;

pub fn draw(frame: &mut Frame, input: &Input, active: bool, area: Rect) {
    let (display, border_color, text_style) = if active {
        (
            format!("/ {}│", input.value()),
            theme::TEAL,
            Style::default().fg(theme::TEXT),
        )
    } else {
        (
            format!("/ {}", input.value()),
            theme::SURFACE2,
            Style::default().fg(theme::OVERLAY0),
        )
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" Filter by node id ");
    let paragraph = Paragraph::new(display).style(text_style).block(block);
    frame.render_widget(paragraph, area);
}
