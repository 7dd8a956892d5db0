use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem},
};

use super::theme;
use crate::app::{App, Panel};

pub fn draw(frame: &mut Frame, app: &mut App, area: Rect) {
    let focused = app.active_panel == Panel::Failures;
    let border_style = if focused {
        Style::default().fg(theme::BLUE)
    } else {
        Style::default().fg(theme::SURFACE2)
    };

    let block = Block::default()
        .title(" Failed Tests ")
        .borders(Borders::ALL)
        .border_style(border_style);

    app.failures_viewport_height = block.inner(area).height as usize;
    let inner_height = app.failures_viewport_height;

    let failures = app.visible_failures();
    let start = app.failures_scroll_offset.min(failures.len());
    let end = (start + inner_height).min(failures.len());

    let items: Vec<ListItem> = failures[start..end]
        .iter()
        .enumerate()
        .map(|(view_i, failure)| {
            let absolute_i = view_i + start;
            let color = failure.outcome.color();
            let item = ListItem::new(Line::from(vec![
                Span::styled(format!("{} ", failure.outcome.icon()), Style::default().fg(color)),
                Span::styled(failure.nodeid.clone(), Style::default().fg(color)),
            ]));

            if focused && absolute_i == app.selected_failure {
                item.style(Style::default().bg(theme::SURFACE1))
            } else {
                item
            }
        })
        .collect();

    let list = List::new(items).block(block);
    frame.render_widget(list, area);
}
