pub mod charting;
mod landing;
mod position;
mod settings;
mod sum;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Paragraph, Widget},
    Frame,
};

use crate::{
    app::{App, Screen},
    catalog::GameKind,
};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

/// Draws the focused screen and records where the position bar landed so
/// mouse clicks can be mapped back onto it.
pub fn draw(app: &mut App, f: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(f.area());

    let mut cursor = None;
    app.bar_area = None;
    let help = match app.screen {
        Screen::Landing => {
            landing::render(app.landing_selected, chunks[0], f.buffer_mut());
            landing::HELP
        }
        Screen::Game(GameKind::SumMemory) => {
            cursor = sum::render(&app.sum, chunks[0], f.buffer_mut());
            sum::help(app.sum.phase())
        }
        Screen::Game(GameKind::PositionNumber) => {
            app.bar_area = position::render(&app.position, chunks[0], f.buffer_mut());
            position::help(app.position.phase())
        }
    };

    render_status(app.notice.as_deref(), help, chunks[1], f.buffer_mut());

    if let Some(pos) = cursor {
        f.set_cursor_position(pos);
    }
}

fn render_status(notice: Option<&str>, help: &str, area: Rect, buf: &mut ratatui::buffer::Buffer) {
    let span = match notice {
        Some(msg) => Span::styled(
            msg.to_string(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        None => Span::styled(
            help.to_string(),
            Style::default().add_modifier(Modifier::ITALIC),
        ),
    };
    Paragraph::new(span).render(
        Rect {
            x: area.x + HORIZONTAL_MARGIN.min(area.width),
            width: area.width.saturating_sub(HORIZONTAL_MARGIN),
            ..area
        },
        buf,
    );
}

/// Centred, margin-trimmed body area shared by the game screens.
fn body(area: Rect) -> Rect {
    Layout::default()
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([Constraint::Min(1)])
        .split(area)[0]
}
