//! Terminal rendering of the play field and HUD

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Painter, Shape},
        Block, BorderType, Borders, Clear, Paragraph,
    },
    Frame,
};

use crate::game::entities::Rgb;
use crate::game::physics::{self, FIELD_HEIGHT, FIELD_WIDTH};
use crate::game::GameSession;
use crate::link::LinkStatus;

pub const SERIAL_LEGEND: &str = "Serial: A/B move, C shoot";
pub const KEYBOARD_LEGEND: &str = "Keyboard: A/D + SPACE";

/// Serial link as shown in the HUD
#[derive(Debug, Clone, Copy)]
pub struct LinkView<'a> {
    pub status: LinkStatus,
    pub port: &'a str,
}

impl From<Rgb> for Color {
    fn from(Rgb(r, g, b): Rgb) -> Self {
        Color::Rgb(r, g, b)
    }
}

/// Solid rectangle in field coordinates (y down), clipped to the field
struct Solid {
    rect: physics::Rect,
    color: Color,
}

impl Shape for Solid {
    fn draw(&self, painter: &mut Painter) {
        let w = FIELD_WIDTH as f64;
        let h = FIELD_HEIGHT as f64;
        let left = (self.rect.x as f64).clamp(0.0, w);
        let right = (self.rect.right() as f64).clamp(0.0, w);
        // Canvas y grows upward
        let top = (h - self.rect.y as f64).clamp(0.0, h);
        let bottom = (h - self.rect.bottom() as f64).clamp(0.0, h);
        if right <= left || top <= bottom {
            return;
        }

        let (Some((x0, y0)), Some((x1, y1))) =
            (painter.get_point(left, top), painter.get_point(right, bottom))
        else {
            return;
        };
        for x in x0..=x1 {
            for y in y0..=y1 {
                painter.paint(x, y, self.color);
            }
        }
    }
}

/// Draw one frame
pub fn draw(frame: &mut Frame, session: &GameSession, link: LinkView<'_>) {
    let [hud_area, field_area] =
        Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).areas(frame.area());

    frame.render_widget(hud(session, link), hud_area);
    frame.render_widget(field(session), field_area);

    if session.is_over() {
        let banner = game_over_banner(session.score());
        let area = centered(field_area, 36, 6);
        frame.render_widget(Clear, area);
        frame.render_widget(banner, area);
    }
}

fn hud(session: &GameSession, link: LinkView<'_>) -> Paragraph<'static> {
    let (status, color) = match link.status {
        LinkStatus::Connected => (format!("connected ({})", link.port), Color::Green),
        LinkStatus::Faulted => (format!("read error ({})", link.port), Color::Yellow),
        LinkStatus::Unavailable => (format!("unavailable ({})", link.port), Color::Red),
        LinkStatus::Disabled => ("disabled".to_string(), Color::DarkGray),
    };
    let dim = Style::default().fg(Color::Gray);

    let line = Line::from(vec![
        Span::styled(
            format!("Score: {}", session.score()),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  "),
        Span::styled(SERIAL_LEGEND, dim),
        Span::raw("  |  "),
        Span::styled(KEYBOARD_LEGEND, dim),
        Span::raw("  |  Link: "),
        Span::styled(status, Style::default().fg(color)),
    ]);

    Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded),
    )
}

fn field(session: &GameSession) -> impl ratatui::widgets::Widget + '_ {
    Canvas::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" SKYFALL "),
        )
        .background_color(Color::Black)
        .x_bounds([0.0, FIELD_WIDTH as f64])
        .y_bounds([0.0, FIELD_HEIGHT as f64])
        .paint(move |ctx| {
            for obstacle in session.obstacles() {
                ctx.draw(&Solid {
                    rect: obstacle.rect,
                    color: obstacle.color.into(),
                });
            }
            for bullet in session.bullets() {
                ctx.draw(&Solid {
                    rect: bullet.rect,
                    color: bullet.color.into(),
                });
            }
            ctx.draw(&Solid {
                rect: session.player().rect,
                color: crate::game::entities::PLAYER_COLOR.into(),
            });
        })
}

fn game_over_banner(score: u32) -> Paragraph<'static> {
    let text = vec![
        Line::from(Span::styled(
            "GAME OVER",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("Final score: {score}")),
        Line::from("R restart  |  Q quit"),
    ];
    Paragraph::new(text).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Red)),
    )
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
