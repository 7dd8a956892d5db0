use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::{format_seconds, theme};
use crate::app::{App, Panel};
use crate::models::{FailureDetail, FailureEntry, TestSummary};

pub fn draw(frame: &mut Frame, app: &mut App, area: Rect) {
    let focused = app.active_panel == Panel::Detail;
    let border_style = if focused {
        Style::default().fg(theme::BLUE)
    } else {
        Style::default().fg(theme::SURFACE2)
    };

    let block = Block::default()
        .title(" Detail ")
        .borders(Borders::ALL)
        .border_style(border_style);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let content = match app.selected_failure_entry() {
        Some(failure) => {
            let test = app.summary.get(&failure.nodeid);
            Text::from(build_failure_lines(failure, test))
        }
        None => match app.visible_results().get(app.selected_row) {
            Some(test) if app.active_panel == Panel::Results => {
                Text::from(build_test_lines(test))
            }
            _ => Text::from("Select a failed test to view details."),
        },
    };

    let max_scroll = (content.height() as u16).saturating_sub(inner.height);
    app.detail_scroll_offset = app.detail_scroll_offset.min(max_scroll);

    let paragraph = Paragraph::new(content)
        .wrap(Wrap { trim: false })
        .scroll((app.detail_scroll_offset, 0));
    frame.render_widget(paragraph, inner);
}

fn build_test_lines(test: &TestSummary) -> Vec<Line<'static>> {
    let color = test.outcome.color();
    let d = &test.durations;
    vec![
        Line::from(vec![
            Span::styled(format!("{} ", test.outcome.icon()), Style::default().fg(color)),
            Span::styled(test.nodeid.clone(), Style::default().fg(color).bold()),
        ]),
        Line::from(""),
        Line::from(format!(
            "setup {}s   call {}s   teardown {}s   total {}s",
            format_seconds(d.setup),
            format_seconds(d.call),
            format_seconds(d.teardown),
            format_seconds(Some(test.total_duration())),
        )),
    ]
}

fn build_failure_lines(failure: &FailureEntry, test: Option<&TestSummary>) -> Vec<Line<'static>> {
    let color = failure.outcome.color();
    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                format!("{} {}: ", failure.outcome.icon(), failure.outcome.label()),
                Style::default().fg(color),
            ),
            Span::styled(failure.nodeid.clone(), Style::default().fg(color).bold()),
        ]),
        Line::from(""),
    ];

    if let Some(test) = test.filter(|t| t.attempts > 1) {
        lines.push(Line::from(Span::styled(
            format!("{} attempts, final outcome {}", test.attempts, test.outcome.label()),
            Style::default().fg(theme::OVERLAY0),
        )));
        lines.push(Line::from(""));
    }

    match &failure.detail {
        Some(detail) => lines.extend(detail_lines(detail)),
        None => lines.push(Line::from("No failure details available.")),
    }

    lines
}

fn detail_lines(detail: &FailureDetail) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    if let Some(path) = &detail.path {
        lines.push(Line::from(Span::styled("Path:", Style::default().fg(theme::YELLOW))));
        lines.push(Line::from(path.clone()));
        lines.push(Line::from(""));
    }

    if let Some(line) = detail.lineno {
        lines.push(Line::from(Span::styled(
            "Line Number:",
            Style::default().fg(theme::YELLOW),
        )));
        lines.push(Line::from(line.to_string()));
        lines.push(Line::from(""));
    }

    if let Some(message) = &detail.message {
        lines.push(Line::from(Span::styled(
            message.clone(),
            Style::default().fg(theme::TEXT),
        )));
        lines.push(Line::from(""));
    }

    if !detail.traceback.is_empty() {
        lines.push(Line::from(Span::styled(
            "Error Message:",
            Style::default().fg(theme::YELLOW),
        )));
        for tb_line in &detail.traceback {
            // pytest prefixes assertion output with `E`
            let style = if tb_line.starts_with('E') {
                Style::default().fg(theme::RED)
            } else if tb_line.starts_with('>') {
                Style::default().fg(theme::TEXT).bold()
            } else {
                Style::default().fg(theme::OVERLAY0)
            };
            lines.push(Line::from(Span::styled(tb_line.clone(), style)));
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::sample_app;
    use crate::ui::layout::test_support::render;

    #[test]
    fn failure_detail_lines_include_location() {
        let app = sample_app();
        let lines = detail_lines(app.failures[0].detail.as_ref().unwrap());
        let text: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
        assert!(text.contains(&"tests/test_cart.py".to_string()));
        assert!(text.contains(&"12".to_string()));
        assert!(text.contains(&"E       assert 0 == 1".to_string()));
    }

    #[test]
    fn selecting_failed_row_shows_traceback() {
        let mut app = sample_app();
        app.selected_row = 1;
        let screen = render(&mut app, 140, 50);
        assert!(screen.contains("Line Number:"), "{}", screen);
        assert!(screen.contains("assert 0 == 1"));
    }
}
