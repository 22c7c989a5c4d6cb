use chrono::Local;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Chart, Dataset, GraphType, Paragraph, Widget, Wrap},
};
use time_humanize::{Accuracy, HumanTime, Tense};

use super::charting::{accuracy_points, compute_chart_params, format_label};
use crate::app::bar_cell;
use crate::catalog::{metadata, GameKind};
use crate::position::{
    PositionConfig, PositionGame, PositionPhase, PositionSession, Rating, RoundState,
};

pub fn help(phase: &PositionPhase) -> &'static str {
    match phase {
        PositionPhase::Start => "(enter) start / (s)ettings / (esc) back",
        PositionPhase::Settings { .. } => super::settings::HELP,
        PositionPhase::Playing { round, .. } if round.feedback.is_some() => {
            "(enter) next round / (esc) end session"
        }
        PositionPhase::Playing { .. } => {
            "(←/→) move / (shift) ×10 / (home/end) / click the bar / (enter) submit / (esc) end session"
        }
        PositionPhase::Result { .. } => "(enter) play again / (s)ettings / (esc) start screen",
    }
}

fn rating_color(rating: Rating) -> Color {
    match rating {
        Rating::Excellent => Color::Green,
        Rating::Good => Color::Cyan,
        Rating::NotBad => Color::Yellow,
        Rating::TryAgain => Color::Red,
    }
}

/// Renders the Position the Number screen. Returns the clickable bar area
/// while a round is on screen.
pub fn render(game: &PositionGame, area: Rect, buf: &mut Buffer) -> Option<Rect> {
    let body = super::body(area);
    match game.phase() {
        PositionPhase::Start => {
            render_start(game.config(), body, buf);
            None
        }
        PositionPhase::Settings { editor, .. } => {
            super::settings::render(metadata(GameKind::PositionNumber).title, editor, area, buf);
            None
        }
        PositionPhase::Playing { session, round } => {
            Some(render_round(game.session_config(), session, round, body, buf))
        }
        PositionPhase::Result { session } => {
            render_result(session, body, buf);
            None
        }
    }
}

fn render_start(config: &PositionConfig, area: Rect, buf: &mut Buffer) {
    let meta = metadata(GameKind::PositionNumber);
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let summary = format!(
        "{} rounds, numbers from {} to {}",
        config.round_count, config.min_number, config.max_number
    );
    let height = 7u16.min(area.height);
    Paragraph::new(vec![
        Line::from(Span::styled(
            format!("{} {}", meta.icon, meta.title),
            bold_style.fg(Color::Magenta),
        )),
        Line::from(""),
        Line::from(meta.description),
        Line::from(""),
        Line::from(Span::styled(summary, Style::default().add_modifier(Modifier::ITALIC))),
        Line::from(""),
        Line::from(Span::styled(
            "press enter to start",
            Style::default().add_modifier(Modifier::DIM),
        )),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .render(
        Rect {
            y: area.y + (area.height - height) / 2,
            height,
            ..area
        },
        buf,
    );
}

fn render_round(
    config: &PositionConfig,
    session: &PositionSession,
    state: &RoundState,
    area: Rect,
    buf: &mut Buffer,
) -> Rect {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let dim_style = Style::default().add_modifier(Modifier::DIM);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // round / score
            Constraint::Length(1),
            Constraint::Length(1), // target
            Constraint::Length(1),
            Constraint::Length(1), // guess marker
            Constraint::Length(1), // bar
            Constraint::Length(1), // target marker
            Constraint::Length(1), // range labels
            Constraint::Length(1),
            Constraint::Length(1), // feedback
            Constraint::Min(0),
        ])
        .split(area);

    Paragraph::new(Line::from(vec![
        Span::styled(
            format!("Round {} of {}", state.round.number, session.round_count()),
            bold_style,
        ),
        Span::styled("   ·   ", dim_style),
        Span::raw(format!("Score {}", session.total_score())),
    ]))
    .alignment(Alignment::Center)
    .render(chunks[0], buf);

    Paragraph::new(Line::from(vec![
        Span::raw("Where does "),
        Span::styled(state.round.target.to_string(), bold_style.fg(Color::Cyan)),
        Span::raw(" belong?"),
    ]))
    .alignment(Alignment::Center)
    .render(chunks[2], buf);

    let width = config.bar_width.min(area.width).max(1);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let bar_row = chunks[5].y;

    for i in 0..width {
        if let Some(cell) = buf.cell_mut((x + i, bar_row)) {
            cell.set_symbol("━").set_style(dim_style);
        }
    }

    if let Some(guess) = state.guess {
        let col = x + bar_cell(guess.position(), width);
        if let Some(cell) = buf.cell_mut((col, chunks[4].y)) {
            cell.set_symbol("▼")
                .set_style(bold_style.fg(Color::Cyan));
        }
        if let Some(cell) = buf.cell_mut((col, bar_row)) {
            cell.set_style(Style::default().fg(Color::Cyan));
        }
    }

    let labels = Rect {
        x,
        width,
        ..chunks[7]
    };
    Paragraph::new(config.min_number.to_string())
        .style(dim_style)
        .render(labels, buf);
    Paragraph::new(config.max_number.to_string())
        .style(dim_style)
        .alignment(Alignment::Right)
        .render(labels, buf);

    if let Some(feedback) = &state.feedback {
        let col = x + bar_cell(feedback.result.normalized_target, width);
        if let Some(cell) = buf.cell_mut((col, chunks[6].y)) {
            cell.set_symbol("▲")
                .set_style(bold_style.fg(Color::Green));
        }
        Paragraph::new(Line::from(vec![
            Span::styled(
                feedback.rating.to_string(),
                bold_style.fg(rating_color(feedback.rating)),
            ),
            Span::raw(format!(
                "  {}% accuracy  +{}",
                feedback.result.accuracy, feedback.result.points
            )),
        ]))
        .alignment(Alignment::Center)
        .render(chunks[9], buf);
    }

    Rect {
        x,
        y: chunks[4].y,
        width,
        height: chunks[6].y + 1 - chunks[4].y,
    }
}

fn render_result(session: &PositionSession, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);
    let magenta_style = Style::default().fg(Color::Magenta);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // headline
            Constraint::Length(1),
            Constraint::Length(1), // score
            Constraint::Length(1), // accuracy
            Constraint::Length(1), // best / worst
            Constraint::Length(1), // duration
            Constraint::Length(1),
            Constraint::Min(1), // chart
        ])
        .split(area);

    let played = session.rounds().len() as u32;
    let headline = if played < session.round_count() {
        format!("Session ended early after {played} of {} rounds", session.round_count())
    } else {
        "Session complete".to_string()
    };
    Paragraph::new(Span::styled(headline, bold_style))
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

    Paragraph::new(format!(
        "Score {} / {}",
        session.total_score(),
        session.max_score()
    ))
    .alignment(Alignment::Center)
    .render(chunks[2], buf);

    let average = session.average_accuracy();
    let rating = Rating::from_accuracy(average.round() as u8);
    Paragraph::new(Line::from(vec![
        Span::raw(format!(
            "{average:.1}% average accuracy   {:.1} sd   ",
            session.accuracy_spread()
        )),
        Span::styled(rating.to_string(), bold_style.fg(rating_color(rating))),
    ]))
    .alignment(Alignment::Center)
    .render(chunks[3], buf);

    if let (Some(best), Some(worst)) = (session.best_round(), session.worst_round()) {
        Paragraph::new(format!(
            "best: round {} ({}%)   worst: round {} ({}%)",
            best.round_number, best.accuracy, worst.round_number, worst.accuracy
        ))
        .alignment(Alignment::Center)
        .render(chunks[4], buf);
    }

    let elapsed = session
        .elapsed(Local::now())
        .to_std()
        .unwrap_or_default();
    Paragraph::new(Span::styled(
        format!(
            "played for {}",
            HumanTime::from(elapsed).to_text_en(Accuracy::Precise, Tense::Present)
        ),
        italic_style,
    ))
    .alignment(Alignment::Center)
    .render(chunks[5], buf);

    if session.rounds().is_empty() {
        return;
    }

    let points = accuracy_points(session.rounds());
    let (last_round, top) = compute_chart_params(&points, session.round_count());
    let datasets = vec![Dataset::default()
        .marker(Marker::Braille)
        .style(magenta_style)
        .graph_type(GraphType::Line)
        .data(&points)];

    Chart::new(datasets)
        .x_axis(
            Axis::default()
                .title("round")
                .bounds([1.0, last_round])
                .labels(vec![
                    Span::styled("1", bold_style),
                    Span::styled(format_label(last_round), bold_style),
                ]),
        )
        .y_axis(
            Axis::default()
                .title("accuracy")
                .bounds([0.0, top])
                .labels(vec![
                    Span::styled("0", bold_style),
                    Span::styled(format_label(top), bold_style),
                ]),
        )
        .render(chunks[7], buf);
}

#[cfg(test)]
mod tests {
    use crate::app::App;
    use crate::catalog::GameKind;
    use crate::config::{save_config, MemoryConfigStore};
    use crate::position::{PositionConfig, PositionPhase};
    use crate::timer::Moment;
    use crate::ui::test_support::render_to_string;

    fn app(rounds: u32) -> App {
        let store = MemoryConfigStore::new();
        save_config(
            &store,
            &PositionConfig {
                round_count: rounds,
                ..PositionConfig::default()
            },
        )
        .unwrap();
        let mut app = App::new(store, None, Some(5));
        app.open(GameKind::PositionNumber);
        app
    }

    #[test]
    fn round_screen_registers_bar_for_clicks() {
        let mut app = app(3);
        app.position.start(Moment::now());
        let out = render_to_string(&mut app, 100, 30);
        assert!(out.contains("Round 1 of 3"));
        assert!(out.contains("Where does"));

        let bar = app.bar_area().unwrap();
        assert_eq!(bar.width, 50);
        assert_eq!(bar.height, 3);
    }

    #[test]
    fn narrow_terminal_shrinks_bar() {
        let mut app = app(3);
        app.position.start(Moment::now());
        render_to_string(&mut app, 40, 30);
        assert_eq!(app.bar_area().map(|b| b.width), Some(30));
    }

    #[test]
    fn feedback_shows_rating() {
        let mut app = app(3);
        let t0 = Moment::now();
        app.position.start(t0);
        let target = match app.position.phase() {
            PositionPhase::Playing { round, .. } => round.round.target,
            _ => unreachable!(),
        };
        app.position.select_position(target as f64, t0).unwrap();
        app.position.submit_guess(t0).unwrap();
        let out = render_to_string(&mut app, 100, 30);
        assert!(out.contains("Excellent!"));
        assert!(out.contains("100% accuracy"));
    }

    #[test]
    fn result_screen_after_early_end() {
        let mut app = app(10);
        let t0 = Moment::now();
        app.position.start(t0);
        app.position.select_position(50.0, t0).unwrap();
        app.position.submit_guess(t0).unwrap();
        app.position.quit(t0);

        let out = render_to_string(&mut app, 100, 30);
        assert!(out.contains("Session ended early after 1 of 10 rounds"));
        assert!(out.contains("Score"));
        assert!(app.bar_area().is_none());
    }
}
