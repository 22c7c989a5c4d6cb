use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::config::GameConfig;
use crate::settings::SettingsEditor;

pub const HELP: &str =
    "(↑/↓) field / (←/→) adjust / (enter) save / (d)efaults / (r)eset saved / (esc) cancel";

pub fn render<C: GameConfig>(
    title: &str,
    editor: &SettingsEditor<C>,
    area: Rect,
    buf: &mut Buffer,
) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let selected_style = Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let dim_style = Style::default().add_modifier(Modifier::DIM);

    let rows = C::fields().len() as u16;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(rows + 2),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(super::body(area));

    let label_width = C::fields()
        .iter()
        .map(|f| f.label.len())
        .max()
        .unwrap_or(0);

    let lines: Vec<Line> = editor
        .rows()
        .map(|(spec, value, selected)| {
            let text = format!(
                "{:<width$}  {:>6}{:<3}  ({}..{})",
                spec.label,
                value,
                spec.unit,
                spec.min,
                spec.max,
                width = label_width
            );
            if selected {
                Line::from(Span::styled(format!("▶ {text}"), selected_style))
            } else {
                Line::from(vec![Span::raw("  "), Span::raw(text)])
            }
        })
        .collect();

    Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(dim_style)
                .title(Span::styled(format!(" {title} settings "), bold_style)),
        )
        .render(chunks[0], buf);

    if let Some(error) = editor.error() {
        Paragraph::new(Span::styled(
            error.to_string(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);
    }
}
