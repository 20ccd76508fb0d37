use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::config::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::entities::{ExplosionFrame, ExplosionKind, Rect as WorldRect};
use crate::round::Round;
use crate::screens::{ButtonKind, Page};
use crate::session::{Mode, Session};

/// Everything the renderer needs for one frame
pub struct RenderView<'a> {
    pub session: &'a Session,
    /// Simulation clock, for blinking and explosion frames
    pub now: u64,
    pub area: Rect,
}

/// Maps a point in the 800x600 logical space to a terminal cell inside
/// `area`, or `None` when it falls outside.
pub fn to_cell(area: Rect, x: i32, y: i32) -> Option<(u16, u16)> {
    if area.is_empty() || !(0..SCREEN_WIDTH).contains(&x) || !(0..SCREEN_HEIGHT).contains(&y) {
        return None;
    }
    let col = x as i64 * area.width as i64 / SCREEN_WIDTH as i64;
    let row = y as i64 * area.height as i64 / SCREEN_HEIGHT as i64;
    Some((area.x + col as u16, area.y + row as u16))
}

fn enemy_glyph(row: usize, frame: u8) -> &'static str {
    match (row, frame) {
        (0, 0) => "/o\\",
        (0, _) => "\\o/",
        (1 | 2, 0) => "{@}",
        (1 | 2, _) => "}@{",
        (_, 0) => "/W\\",
        (_, _) => "\\W/",
    }
}

fn enemy_color(row: usize) -> Color {
    match row {
        0 => Color::Magenta,
        1 | 2 => Color::Cyan,
        _ => Color::Green,
    }
}

const SHIP_GLYPH: &str = "/^\\";
const MYSTERY_GLYPH: &str = "<=O=>";

/// Handles all rendering responsibilities for the game
#[derive(Debug, Default)]
pub struct GameRenderer;

impl GameRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Dispatches to the renderer for the current mode
    pub fn render(&self, frame: &mut Frame, view: &RenderView) {
        match view.session.mode() {
            Mode::MainMenu => self.render_main_menu(frame, view),
            Mode::Playing => self.render_game(frame, view),
            Mode::RoundTransition => {
                self.render_game(frame, view);
                self.render_banner(frame, view.area, "NEXT ROUND", Color::Green);
            }
            Mode::GameOver => self.render_game_over(frame, view),
            Mode::NameEntry => self.render_name_entry(frame, view),
            Mode::Leaderboard => self.render_leaderboard(frame, view),
        }
    }

    fn render_main_menu(&self, frame: &mut Frame, view: &RenderView) {
        let points = |glyph: &'static str, color: Color, text: &'static str| {
            Line::from(vec![
                Span::styled(glyph, Style::default().fg(color).add_modifier(Modifier::BOLD)),
                Span::styled(text, Style::default().fg(Color::White)),
            ])
            .centered()
        };

        let text = vec![
            Line::from(""),
            Line::from("SPACE INVADERS").centered().bold().white(),
            Line::from("Press Enter or Space to start").centered().gray(),
            Line::from(""),
            points(enemy_glyph(4, 0), enemy_color(4), "   =   10 pts"),
            points(enemy_glyph(2, 0), enemy_color(2), "   =   20 pts"),
            points(enemy_glyph(0, 0), enemy_color(0), "   =   30 pts"),
            points(MYSTERY_GLYPH, Color::Red, " =   ?????"),
            Line::from(""),
            Line::from("[Arrows/AD: Move] [Space: Fire] [Esc: Quit]")
                .centered()
                .dark_gray(),
        ];

        frame.render_widget(
            Paragraph::new(text)
                .block(Block::default().borders(Borders::ALL))
                .alignment(Alignment::Center),
            view.area,
        );
    }

    /// Renders the playfield with the HUD along the top
    fn render_game(&self, frame: &mut Frame, view: &RenderView) {
        let area = view.area;
        let Some(round) = view.session.round() else {
            return;
        };

        let block = Block::default()
            .borders(Borders::LEFT | Borders::RIGHT)
            .border_style(Style::default().fg(Color::DarkGray));
        let field = block.inner(Rect {
            x: area.x,
            y: area.y + 1,
            width: area.width,
            height: area.height.saturating_sub(2),
        });
        frame.render_widget(block, Rect { y: area.y + 1, height: area.height.saturating_sub(2), ..area });

        self.render_round(frame, field, round, view.now);
        self.render_hud(frame, area, view.session);

        let controls = Line::from(vec![Span::styled(
            "[Arrows/AD: Move] [Space: Fire] [Esc: Quit]",
            Style::default().fg(Color::DarkGray),
        )]);
        let controls_area = Rect {
            x: area.x + 1,
            y: area.y + area.height.saturating_sub(1),
            width: area.width.saturating_sub(2),
            height: 1,
        };
        frame.render_widget(Paragraph::new(controls).centered(), controls_area);
    }

    fn render_round(&self, frame: &mut Frame, field: Rect, round: &Round, now: u64) {
        let buffer = frame.buffer_mut();
        let mut put = |rect: &WorldRect, text: &str, style: Style| {
            let (x, y) = (rect.x + rect.width / 2, rect.y + rect.height / 2);
            let Some((col, row)) = to_cell(field, x, y) else {
                return;
            };
            let width = text.chars().count() as u16;
            let col = col
                .saturating_sub(width / 2)
                .clamp(field.x, field.right().saturating_sub(width).max(field.x));
            buffer.set_stringn(col, row, text, field.right().saturating_sub(col) as usize, style);
        };

        for obstacle in round.obstacles() {
            put(&obstacle.rect, "█", Style::default().fg(Color::Green));
        }

        for enemy in round.formation().iter() {
            put(
                &enemy.rect,
                enemy_glyph(enemy.slot.row, enemy.frame),
                Style::default()
                    .fg(enemy_color(enemy.slot.row))
                    .add_modifier(Modifier::BOLD),
            );
        }

        // Parked off either edge between crossings
        if let Some(mystery) = round.mystery().filter(|m| m.is_on_screen(SCREEN_WIDTH)) {
            put(
                &mystery.rect,
                MYSTERY_GLYPH,
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            );
        }

        if let Some(ship) = round.ship() {
            put(
                &ship.rect,
                SHIP_GLYPH,
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            );
        }

        for bullet in round.player_bullets() {
            put(&bullet.rect, "|", Style::default().fg(Color::Yellow));
        }
        for bullet in round.enemy_bullets() {
            put(&bullet.rect, "!", Style::default().fg(Color::Magenta));
        }

        for explosion in round.explosions() {
            let Some(stage) = explosion.frame(now) else {
                continue;
            };
            let label;
            let (text, color) = match (stage, explosion.kind) {
                (ExplosionFrame::Small, _) => ("*", Color::Yellow),
                (ExplosionFrame::Large, _) => ("\\*/", Color::LightRed),
                (ExplosionFrame::Label, ExplosionKind::Mystery { points }) => {
                    label = points.to_string();
                    (label.as_str(), Color::White)
                }
                (ExplosionFrame::Label, _) => ("?", Color::White),
                (ExplosionFrame::Wreck, _) => ("x#x", Color::Red),
            };
            put(
                &explosion.rect,
                text,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            );
        }
    }

    fn render_hud(&self, frame: &mut Frame, area: Rect, session: &Session) {
        let score = Line::from(vec![
            Span::styled("Score: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{}", session.score()),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
        ]);
        let hud_area = Rect {
            x: area.x + 1,
            y: area.y,
            width: area.width.saturating_sub(2),
            height: 1,
        };
        frame.render_widget(Paragraph::new(score), hud_area);

        let tokens = vec![SHIP_GLYPH; session.lives() as usize].join(" ");
        let lives = Line::from(vec![
            Span::styled("Lives ", Style::default().fg(Color::DarkGray)),
            Span::styled(tokens, Style::default().fg(Color::Green)),
        ]);
        frame.render_widget(Paragraph::new(lives).right_aligned(), hud_area);
    }

    fn render_banner(&self, frame: &mut Frame, area: Rect, text: &str, color: Color) {
        let banner = Rect {
            x: area.x + area.width.saturating_sub(30) / 2,
            y: area.y + area.height.saturating_sub(5) / 2,
            width: area.width.min(30),
            height: area.height.min(5),
        };
        frame.render_widget(
            Paragraph::new(vec![
                Line::from(""),
                Line::from(text.to_string()).centered().bold().fg(color),
            ])
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color)),
            )
            .alignment(Alignment::Center),
            banner,
        );
    }

    /// Game over text, with the final score blinking in and out
    fn render_game_over(&self, frame: &mut Frame, view: &RenderView) {
        let session = view.session;
        let score_line = if session.game_over_score_visible(view.now) {
            Line::from(format!("Final Score: {}", session.score()))
                .centered()
                .yellow()
                .bold()
        } else {
            Line::from("")
        };

        let game_over_text = vec![
            Line::from(""),
            Line::from("╔═══════════════════════════╗").centered().red(),
            Line::from("║         GAME OVER         ║")
                .centered()
                .red()
                .bold(),
            Line::from("╚═══════════════════════════╝").centered().red(),
            Line::from(""),
            score_line,
        ];

        frame.render_widget(
            Paragraph::new(game_over_text)
                .block(Block::default().borders(Borders::ALL))
                .alignment(Alignment::Center),
            view.area,
        );
    }

    fn render_name_entry(&self, frame: &mut Frame, view: &RenderView) {
        let session = view.session;
        let text = vec![
            Line::from(""),
            Line::from("ENTER YOUR NAME").centered().bold().white(),
            Line::from(""),
            Line::from(vec![
                Span::styled(
                    session.name_entry().text().to_string(),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled("_", Style::default().fg(Color::Yellow)),
            ])
            .centered(),
            Line::from(""),
            Line::from(format!("Score: {}", session.score())).centered().gray(),
            Line::from(""),
            Line::from("[Enter: Confirm] [Backspace: Erase]")
                .centered()
                .dark_gray(),
        ];

        frame.render_widget(
            Paragraph::new(text)
                .block(Block::default().borders(Borders::ALL))
                .alignment(Alignment::Center),
            view.area,
        );
    }

    fn render_leaderboard(&self, frame: &mut Frame, view: &RenderView) {
        let board = view.session.leaderboard();
        let mut text = vec![
            Line::from(""),
            Line::from(board.page().title()).centered().bold().white(),
            Line::from(""),
        ];

        match board.page() {
            Page::Credits => {
                text.extend(
                    [
                        "Built on the classic arcade design",
                        "Terminal edition",
                        "",
                        "Thanks for playing!",
                    ]
                    .into_iter()
                    .map(|l| Line::from(l).centered().gray()),
                );
            }
            Page::AllTime | Page::Today => {
                if board.rows().is_empty() {
                    text.push(Line::from("No scores yet").centered().dark_gray());
                }
                for row in board.rows() {
                    let highlight = Some(row.name.as_str()) == view.session.player_name()
                        && row.score == view.session.score();
                    let style = if highlight {
                        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(Color::White)
                    };
                    text.push(
                        Line::styled(
                            format!(
                                "{:>3}. {:<12} {:<10} {:>7}",
                                row.rank,
                                row.name,
                                row.affiliation.as_deref().unwrap_or(""),
                                row.score
                            ),
                            style,
                        )
                        .centered(),
                    );
                }
            }
        }

        let mut buttons = Vec::new();
        for button in board.buttons() {
            let style = if button.kind == board.active_button() {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else if button.disabled {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default().fg(Color::White)
            };
            buttons.push(Span::styled(format!(" {} ", button.label), style));
            if button.kind != ButtonKind::Next {
                buttons.push(Span::raw("   "));
            }
        }

        let area = view.area;
        frame.render_widget(
            Paragraph::new(text).block(Block::default().borders(Borders::ALL)),
            area,
        );
        let buttons_area = Rect {
            x: area.x + 1,
            y: area.y + area.height.saturating_sub(2),
            width: area.width.saturating_sub(2),
            height: 1,
        };
        frame.render_widget(Paragraph::new(Line::from(buttons)).centered(), buttons_area);
    }
}
