use ratatui::{prelude::*, widgets::Paragraph};

use super::{format_seconds, theme};
use crate::app::{App, Tab};

pub fn draw(frame: &mut Frame, app: &App, area: Rect) {
    let key = |k: &'static str| Span::styled(k, Style::default().fg(theme::YELLOW));

    let bar = if app.filter_active {
        Line::from(vec![
            key(" [esc]"),
            Span::raw(" clear  "),
            key("[enter]"),
            Span::raw(" apply"),
        ])
    } else {
        let mut spans = vec![key(" [1-3]"), Span::raw(" tabs  ")];

        match app.active_tab {
            Tab::Report => spans.extend([
                key("[tab]"),
                Span::raw(" focus  "),
                key("[f]"),
                Span::raw(" filter  "),
                key("[s]"),
                Span::raw(" sort  "),
                key("[e]"),
                Span::raw(" edit  "),
                key("[y]"),
                Span::raw(" copy  "),
            ]),
            Tab::Raw => spans.extend([key("[j/k]"), Span::raw(" scroll  ")]),
            Tab::Summary => {}
        }
        spans.extend([key("[q]"), Span::raw(" quit")]);

        let counts = app.summary.counts;
        spans.push(Span::styled(
            format!("  {}s", format_seconds(app.summary.run_duration)),
            Style::default().fg(theme::OVERLAY0),
        ));
        spans.push(Span::styled(" ✔ ", Style::default().fg(theme::GREEN)));
        spans.push(Span::styled(
            counts.passed.to_string(),
            Style::default().fg(theme::GREEN),
        ));
        spans.push(Span::styled("  ✘ ", Style::default().fg(theme::RED)));
        spans.push(Span::styled(
            counts.failed.to_string(),
            Style::default().fg(theme::RED),
        ));
        spans.push(Span::styled("  ⟳ ", Style::default().fg(theme::YELLOW)));
        spans.push(Span::styled(
            counts.rerun.to_string(),
            Style::default().fg(theme::YELLOW),
        ));
        if counts.incomplete > 0 {
            spans.push(Span::styled("  ◌ ", Style::default().fg(theme::PEACH)));
            spans.push(Span::styled(
                counts.incomplete.to_string(),
                Style::default().fg(theme::PEACH),
            ));
        }

        Line::from(spans)
    };

    let paragraph = Paragraph::new(bar).style(Style::default().bg(theme::SURFACE0));
    frame.render_widget(paragraph, area);
}
