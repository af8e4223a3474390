use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Circle, Points},
        Block, Borders, Clear, Paragraph,
    },
    Frame,
};

use crate::game::GameState;
use crate::session::{TIMER_CRITICAL_SECS, TIMER_WARNING_SECS};
use crate::util::{format_secs, mean};
use crate::App;

/// Virtual pixels per terminal cell. A glyph cell is roughly twice as tall as
/// it is wide, so the 2:1 split keeps hit circles visually round.
pub const PX_PER_COL: f64 = 8.0;
pub const PX_PER_ROW: f64 = 16.0;

const HUD_ROWS: u16 = 3;

pub fn draw(app: &App, f: &mut Frame) {
    let area = f.area();

    match app.game.state() {
        GameState::Menu => render_menu(app, f, area),
        GameState::Playing | GameState::GameOver => {
            render_hud(app, f, area);
            render_playfield(app, f, playfield_rect(area));
            if app.game.state() == GameState::GameOver {
                render_game_over(app, f, area);
            }
        }
    }

    if app.show_leaderboard {
        render_leaderboard(app, f, area);
    }
}

/// The cell rect targets live in: everything below the HUD.
pub fn playfield_rect(area: Rect) -> Rect {
    let hud = HUD_ROWS.min(area.height);
    Rect::new(area.x, area.y + hud, area.width, area.height - hud)
}

/// Play-surface size in virtual pixels for a given cell rect.
pub fn surface_size(rect: Rect) -> (f64, f64) {
    (
        rect.width as f64 * PX_PER_COL,
        rect.height as f64 * PX_PER_ROW,
    )
}

/// Translates a terminal cell to surface coordinates at the cell's center,
/// or None for clicks outside the playfield.
pub fn cell_to_surface(rect: Rect, column: u16, row: u16) -> Option<(f64, f64)> {
    if column < rect.x
        || row < rect.y
        || column >= rect.x + rect.width
        || row >= rect.y + rect.height
    {
        return None;
    }
    let x = (column - rect.x) as f64 * PX_PER_COL + PX_PER_COL / 2.0;
    let y = (row - rect.y) as f64 * PX_PER_ROW + PX_PER_ROW / 2.0;
    Some((x, y))
}

fn render_hud(app: &App, f: &mut Frame, area: Rect) {
    let hud = Rect::new(area.x, area.y, area.width, HUD_ROWS.min(area.height));
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(hud);

    let dim_style = Style::default().add_modifier(Modifier::DIM);
    let bold_style = Style::default().add_modifier(Modifier::BOLD);

    let time = app.game.time_remaining();
    let timer_style = if time < TIMER_CRITICAL_SECS {
        Style::default().fg(Color::Red).patch(bold_style)
    } else if time < TIMER_WARNING_SECS {
        Style::default().fg(Color::Yellow).patch(bold_style)
    } else {
        Style::default().fg(Color::Green).patch(bold_style)
    };

    let timer = Paragraph::new(Line::from(vec![
        Span::styled("time ", dim_style),
        Span::styled(format_secs(time), timer_style),
    ]))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::BOTTOM));

    let score = Paragraph::new(Line::from(vec![
        Span::styled("score ", dim_style),
        Span::styled(app.game.score().to_string(), bold_style),
    ]))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::BOTTOM));

    let best = Paragraph::new(Line::from(vec![
        Span::styled("best ", dim_style),
        Span::styled(
            app.game.high_score().max(app.game.score()).to_string(),
            Style::default().fg(Color::Magenta).patch(bold_style),
        ),
    ]))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::BOTTOM));

    f.render_widget(timer, chunks[0]);
    f.render_widget(score, chunks[1]);
    f.render_widget(best, chunks[2]);
}

fn render_playfield(app: &App, f: &mut Frame, rect: Rect) {
    if rect.width == 0 || rect.height == 0 {
        return;
    }

    let (width, height) = surface_size(rect);
    let canvas = Canvas::default()
        .x_bounds([0.0, width])
        .y_bounds([0.0, height])
        .paint(|ctx| {
            for target in app.game.targets().iter().filter(|t| t.active) {
                // canvas y grows upward while surface y grows downward
                let y = height - target.y;
                ctx.draw(&Circle {
                    x: target.x,
                    y,
                    radius: target.radius,
                    color: Color::Red,
                });
                ctx.draw(&Circle {
                    x: target.x,
                    y,
                    radius: target.radius * 0.55,
                    color: Color::LightRed,
                });
                ctx.draw(&Points {
                    coords: &[(target.x, y)],
                    color: Color::White,
                });
            }
        });

    f.render_widget(canvas, rect);
}

fn render_menu(app: &App, f: &mut Frame, area: Rect) {
    let title_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let dim_style = Style::default().add_modifier(Modifier::DIM);
    let key_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    let sound = if app.game.sound_enabled() { "on" } else { "off" };

    let mut lines = vec![
        Line::from(Span::styled("P L I N K", title_style)),
        Line::from(Span::styled(
            "terminal aim trainer",
            Style::default().add_modifier(Modifier::ITALIC),
        )),
        Line::default(),
    ];

    if app.game.high_score() > 0 {
        lines.push(Line::from(vec![
            Span::styled("best score ", dim_style),
            Span::styled(
                app.game.high_score().to_string(),
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            ),
        ]));
        lines.push(Line::default());
    }

    lines.extend([
        Line::from(vec![
            Span::styled("enter", key_style),
            Span::styled("  start", dim_style),
        ]),
        Line::from(vec![
            Span::styled("l", key_style),
            Span::styled("  leaderboard", dim_style),
        ]),
        Line::from(vec![
            Span::styled("s", key_style),
            Span::styled(format!("  sound: {}", sound), dim_style),
        ]),
        Line::from(vec![
            Span::styled("c", key_style),
            Span::styled("  clear scores", dim_style),
        ]),
        Line::from(vec![
            Span::styled("q", key_style),
            Span::styled("  quit", dim_style),
        ]),
        Line::default(),
        Line::from(Span::styled(
            format!("difficulty: {}", app.difficulty),
            dim_style,
        )),
    ]);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(30), Constraint::Min(0)])
        .split(area);

    f.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        vertical[1],
    );
}

fn render_game_over(app: &App, f: &mut Frame, area: Rect) {
    let summary = app.game.summary();
    let popup = centered_rect(38, 9, area);

    let lines = vec![
        Line::from(Span::styled(
            "TIME'S UP",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        stat_line("final score", summary.score.to_string()),
        stat_line("accuracy", format!("{}%", summary.accuracy)),
        stat_line("targets hit", summary.hits.to_string()),
        Line::default(),
        Line::from(Span::styled(
            "r play again   m menu   l scores",
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];

    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL)),
        popup,
    );
}

fn render_leaderboard(app: &App, f: &mut Frame, area: Rect) {
    let board = app.game.leaderboard();
    let dim_style = Style::default().add_modifier(Modifier::DIM);

    let mut lines = vec![Line::default()];
    if board.is_empty() {
        lines.push(Line::from("No scores yet. Be the first!"));
    } else {
        for (rank, entry) in board.ranked() {
            lines.push(Line::from(format!(
                "#{:<2} {:>5}  {:>3}%  {}",
                rank,
                entry.score,
                entry.accuracy,
                entry.timestamp.format("%b %d %H:%M"),
            )));
        }
        let scores: Vec<f64> = board.entries().iter().map(|e| e.score as f64).collect();
        if let Some(avg) = mean(&scores) {
            lines.push(Line::default());
            lines.push(Line::from(Span::styled(
                format!("average score {:.0}", avg),
                dim_style,
            )));
        }
    }
    lines.push(Line::default());

    let popup = centered_rect(40, lines.len() as u16 + 2, area);
    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(Span::styled(
                        " leaderboard ",
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    )),
            ),
        popup,
    );
}

fn stat_line(label: &str, value: String) -> Line<'_> {
    Line::from(vec![
        Span::styled(
            format!("{:<12}", label),
            Style::default().add_modifier(Modifier::DIM),
        ),
        Span::styled(value, Style::default().add_modifier(Modifier::BOLD)),
    ])
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn playfield_sits_below_the_hud() {
        let area = Rect::new(0, 0, 80, 24);
        let rect = playfield_rect(area);
        assert_eq!(rect, Rect::new(0, 3, 80, 21));
    }

    #[test]
    fn playfield_collapses_on_tiny_terminals() {
        let area = Rect::new(0, 0, 80, 2);
        let rect = playfield_rect(area);
        assert_eq!(rect.height, 0);
    }

    #[test]
    fn surface_size_scales_cells_to_virtual_pixels() {
        let rect = Rect::new(0, 3, 80, 21);
        assert_eq!(surface_size(rect), (640.0, 336.0));
    }

    #[test]
    fn clicks_map_to_the_cell_center() {
        let rect = Rect::new(0, 3, 80, 21);
        assert_eq!(cell_to_surface(rect, 0, 3), Some((4.0, 8.0)));
        assert_eq!(cell_to_surface(rect, 10, 5), Some((84.0, 40.0)));
    }

    #[test]
    fn clicks_above_the_playfield_are_rejected() {
        let rect = Rect::new(0, 3, 80, 21);
        assert_eq!(cell_to_surface(rect, 5, 0), None);
        assert_eq!(cell_to_surface(rect, 5, 2), None);
    }

    #[test]
    fn clicks_outside_the_right_and_bottom_edges_are_rejected() {
        let rect = Rect::new(0, 3, 80, 21);
        assert_eq!(cell_to_surface(rect, 80, 10), None);
        assert_eq!(cell_to_surface(rect, 10, 24), None);
    }

    #[test]
    fn centered_rect_is_clamped_to_the_area() {
        let area = Rect::new(0, 0, 20, 5);
        let rect = centered_rect(40, 9, area);
        assert_eq!(rect, Rect::new(0, 0, 20, 5));
    }
}
