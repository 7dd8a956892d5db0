use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::{flag, theme};
use crate::app::App;

pub fn draw(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Test Run Summary ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::SURFACE2));

    let desc = &app.description;
    let reruns = desc
        .reruns
        .map_or_else(|| flag(false).to_string(), |n| n.to_string());

    let mut rows: Vec<(&str, String)> = vec![
        ("Run Type", desc.run_type().to_string()),
        ("Parallel", flag(desc.parallel).to_string()),
        ("Tracing", flag(desc.tracing).to_string()),
        ("Headed", flag(desc.headed).to_string()),
        (
            "Reruns",
            format!("{} Setting: {}", flag(desc.reruns.is_some()), reruns),
        ),
        ("Test Report", app.report_path.display().to_string()),
    ];
    if let Some(dir) = &desc.report_output {
        rows.push(("Report Folder", dir.clone()));
    }
    if let Some(dir) = &desc.trace_output {
        rows.push(("Trace Folder", dir.clone()));
    }

    let mut lines: Vec<Line> = rows
        .into_iter()
        .map(|(label, value)| {
            Line::from(vec![
                Span::styled(format!("- {}: ", label), Style::default().fg(theme::OVERLAY0)),
                Span::styled(value, Style::default().fg(theme::TEXT)),
            ])
        })
        .collect();

    if !app.report.args.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Arguments",
            Style::default().fg(theme::YELLOW),
        )));
        lines.push(Line::from(Span::styled(
            shell_words::join(&app.report.args),
            Style::default().fg(theme::SUBTEXT0),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}
