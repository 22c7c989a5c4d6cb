use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::catalog::{metadata, GameKind};
use crate::sum::countdown::{Light, COUNTDOWN_SEQUENCE};
use crate::sum::{SumConfig, SumGame, SumPhase};

const INPUT_WIDTH: u16 = 24;

pub fn help(phase: &SumPhase) -> &'static str {
    match phase {
        SumPhase::Start => "(enter) start / (s)ettings / (esc) back",
        SumPhase::Settings { .. } => super::settings::HELP,
        SumPhase::Countdown { .. } | SumPhase::Playing { .. } => "(tab) settings / (esc) abandon",
        SumPhase::Input { .. } => "(enter) submit / (tab) settings / (esc) abandon",
        SumPhase::Result { .. } => "(enter) play again / (s)ettings / (esc) start screen",
    }
}

fn light_color(light: Light) -> Color {
    match light {
        Light::Red => Color::Red,
        Light::Yellow => Color::Yellow,
        Light::Green => Color::Green,
    }
}

fn config_summary(config: &SumConfig) -> String {
    format!(
        "{} numbers between {} and {}, {} ms each with {} ms pauses",
        config.number_count,
        config.min_number,
        config.max_number,
        config.display_duration_ms,
        config.pause_duration_ms
    )
}

/// Vertically centred block of `height` lines inside `area`.
fn centered(area: Rect, height: u16) -> Rect {
    let height = height.min(area.height);
    Rect {
        y: area.y + (area.height - height) / 2,
        height,
        ..area
    }
}

/// Renders the Sum Memory screen. Returns where the terminal cursor belongs
/// while an answer is being typed.
pub fn render(game: &SumGame, area: Rect, buf: &mut Buffer) -> Option<Position> {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let dim_style = Style::default().add_modifier(Modifier::DIM);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);
    let body = super::body(area);

    match game.phase() {
        SumPhase::Start => {
            let meta = metadata(GameKind::SumMemory);
            Paragraph::new(vec![
                Line::from(Span::styled(
                    format!("{} {}", meta.icon, meta.title),
                    bold_style.fg(Color::Magenta),
                )),
                Line::from(""),
                Line::from(meta.description),
                Line::from(""),
                Line::from(Span::styled(config_summary(game.config()), italic_style)),
                Line::from(""),
                Line::from(Span::styled("press enter to start", dim_style)),
            ])
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(centered(body, 8), buf);
            None
        }
        SumPhase::Settings { editor, .. } => {
            super::settings::render(metadata(GameKind::SumMemory).title, editor, area, buf);
            None
        }
        SumPhase::Countdown { step, .. } => {
            let current = &COUNTDOWN_SEQUENCE[(*step).min(COUNTDOWN_SEQUENCE.len() - 1)];
            let lights: Vec<Span> = COUNTDOWN_SEQUENCE
                .iter()
                .enumerate()
                .flat_map(|(i, s)| {
                    let style = if i == *step {
                        Style::default().fg(light_color(s.light)).add_modifier(Modifier::BOLD)
                    } else {
                        dim_style
                    };
                    [Span::styled("●", style), Span::raw(" ")]
                })
                .collect();
            Paragraph::new(vec![
                Line::from(lights),
                Line::from(""),
                Line::from(Span::styled(
                    current.text,
                    bold_style.fg(light_color(current.light)),
                )),
            ])
            .alignment(Alignment::Center)
            .render(centered(body, 3), buf);
            None
        }
        SumPhase::Playing {
            challenge, index, ..
        } => {
            let shown = game
                .current_number()
                .map(|n| n.to_string())
                .unwrap_or_default();
            Paragraph::new(vec![
                Line::from(Span::styled(
                    format!("number {} of {}", index + 1, challenge.len()),
                    dim_style,
                )),
                Line::from(""),
                Line::from(Span::styled(shown, bold_style.fg(Color::Cyan))),
            ])
            .alignment(Alignment::Center)
            .render(centered(body, 3), buf);
            None
        }
        SumPhase::Input {
            challenge,
            draft,
            error,
        } => {
            let block_area = centered(body, 6);
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(2),
                    Constraint::Length(3),
                    Constraint::Length(1),
                ])
                .split(block_area);

            Paragraph::new(Span::styled(
                format!("What is the sum of the {} numbers?", challenge.len()),
                bold_style,
            ))
            .alignment(Alignment::Center)
            .render(chunks[0], buf);

            let width = INPUT_WIDTH.min(chunks[1].width);
            let input_area = Rect {
                x: chunks[1].x + (chunks[1].width - width) / 2,
                width,
                ..chunks[1]
            };
            Paragraph::new(Span::styled(draft.clone(), bold_style))
                .block(Block::default().borders(Borders::ALL).title(" answer "))
                .render(input_area, buf);

            if let Some(e) = error {
                Paragraph::new(Span::styled(
                    e.to_string(),
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ))
                .alignment(Alignment::Center)
                .render(chunks[2], buf);
            }

            let max_x = input_area.x + input_area.width.saturating_sub(2);
            Some(Position::new(
                (input_area.x + 1 + draft.width() as u16).min(max_x),
                input_area.y + 1,
            ))
        }
        SumPhase::Result { challenge, result } => {
            let verdict_style = if result.is_correct {
                bold_style.fg(Color::Green)
            } else {
                bold_style.fg(Color::Red)
            };
            let sequence = challenge.numbers().iter().join(" + ");
            Paragraph::new(vec![
                Line::from(Span::styled(
                    format!("{} {}", result.icon, result.title),
                    verdict_style,
                )),
                Line::from(result.message),
                Line::from(""),
                Line::from(vec![
                    Span::raw("Your answer: "),
                    Span::styled(result.user_answer.to_string(), bold_style),
                    Span::raw("   Correct sum: "),
                    Span::styled(result.correct_answer.to_string(), bold_style),
                ]),
                Line::from(""),
                Line::from(Span::styled(
                    format!("{sequence} = {}", result.correct_answer),
                    italic_style,
                )),
            ])
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(centered(body, 7), buf);
            None
        }
    }
}
