use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use crate::catalog::{Difficulty, GAMES};

pub const HELP: &str = "(↑/↓) choose / (enter) play / (1-2) jump / (q)uit";

const CARD_HEIGHT: u16 = 6;

fn difficulty_color(difficulty: Difficulty) -> Color {
    match difficulty {
        Difficulty::Easy => Color::Green,
        Difficulty::Medium => Color::Yellow,
        Difficulty::Hard => Color::Red,
    }
}

pub fn render(selected: usize, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let dim_style = Style::default().add_modifier(Modifier::DIM);

    let mut constraints = vec![Constraint::Length(3)];
    constraints.extend(GAMES.iter().map(|_| Constraint::Length(CARD_HEIGHT)));
    constraints.push(Constraint::Min(0));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(super::HORIZONTAL_MARGIN)
        .vertical_margin(1)
        .constraints(constraints)
        .split(area);

    Paragraph::new(vec![
        Line::from(Span::styled("numdrill", bold_style.fg(Color::Magenta))),
        Line::from(Span::styled("pick a game to train with", dim_style)),
    ])
    .alignment(Alignment::Center)
    .render(chunks[0], buf);

    for (i, game) in GAMES.iter().enumerate() {
        let is_selected = i == selected;
        let border_style = if is_selected {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            dim_style
        };
        let title = format!(" {} {} ", game.icon, game.title);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(Span::styled(title, bold_style));

        let card = Paragraph::new(vec![
            Line::from(game.description),
            Line::from(vec![
                Span::styled(
                    game.difficulty.to_string(),
                    Style::default().fg(difficulty_color(game.difficulty)),
                ),
                Span::styled("  ·  ", dim_style),
                Span::styled(
                    game.skills.join(", "),
                    Style::default().add_modifier(Modifier::ITALIC),
                ),
            ]),
            Line::from(if is_selected {
                Span::styled("▶ press enter to play", Style::default().fg(Color::Cyan))
            } else {
                Span::raw("")
            }),
        ])
        .block(block)
        .wrap(Wrap { trim: true });

        card.render(chunks[i + 1], buf);
    }
}
