//! Terminal UI rendering with ratatui
//!
//! Strictly read-only over the engine: everything here is derived from the
//! accessors the game exposes after a tick.

use crate::board::{BOARD_HEIGHT, BOARD_WIDTH};
use crate::game::{Game, Phase};
use crate::piece::Placement;
use crate::settings::Settings;
use crate::tetromino::Cell;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

const EMPTY: &str = "  ";

/// Board window: 10 double-width columns plus borders
const BOARD_VIEW_WIDTH: u16 = BOARD_WIDTH as u16 * 2 + 2;
/// All 22 rows are shown (the top 2 are the spawn buffer) plus borders
const BOARD_VIEW_HEIGHT: u16 = BOARD_HEIGHT as u16 + 2;
/// Board window plus the stats panel
const GAME_WIDTH: u16 = BOARD_VIEW_WIDTH + 16;

/// Render the entire game UI
pub fn render_game(frame: &mut Frame, game: &Game, settings: &Settings) {
    let area = frame.area();
    let game_area = center_rect(area, GAME_WIDTH, BOARD_VIEW_HEIGHT);

    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(BOARD_VIEW_WIDTH),
            Constraint::Length(16),
        ])
        .split(game_area);

    render_board(frame, layout[0], game, settings);
    render_stats(frame, layout[1], game);

    match game.phase() {
        Phase::Start => {
            let subtitle = format!("Select level: {}", game.start_level());
            render_overlay(frame, area, "PRESS START", &subtitle, "Space: play  Up/Down: level");
        }
        Phase::GameOver => {
            render_overlay(frame, area, "GAME OVER", "", "Space: back to start");
        }
        Phase::Playing | Phase::ClearingLine => {}
    }
}

/// Render the board window: settled cells, the falling piece and its ghost
/// while playing, and white highlight bars over rows about to vanish
fn render_board(frame: &mut Frame, area: Rect, game: &Game, settings: &Settings) {
    let (block_char, ghost_char) = settings.visual.block_chars();

    let block = Block::default()
        .title(" RETRIS ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let playing = game.phase() == Phase::Playing;
    let piece = if playing { game.active_piece().copied() } else { None };
    let piece_cells: Vec<(i32, i32)> = piece
        .iter()
        .flat_map(|p| p.cells().map(|(r, c, _)| (r, c)))
        .collect();
    let ghost_cells: Vec<(i32, i32)> = if playing && settings.visual.show_ghost {
        piece
            .and_then(|p| ghost_placement(game, &p))
            .iter()
            .flat_map(|p| p.cells().map(|(r, c, _)| (r, c)))
            .collect()
    } else {
        Vec::new()
    };
    let highlighting = game.phase() == Phase::ClearingLine;

    let mut lines: Vec<Line> = Vec::new();
    for row in 0..BOARD_HEIGHT {
        if highlighting && game.board().row_marked(row) {
            lines.push(Line::styled(
                block_char.repeat(BOARD_WIDTH),
                Style::default().fg(Color::White),
            ));
            continue;
        }

        let mut spans = Vec::new();
        for col in 0..BOARD_WIDTH {
            let pos = (row as i32, col as i32);
            let (text, style) = if let Some(kind) = piece
                .filter(|_| piece_cells.contains(&pos))
                .map(|p| p.kind)
            {
                (block_char, Style::default().fg(kind.color()))
            } else if ghost_cells.contains(&pos) {
                let color = piece.map(|p| p.kind.color()).unwrap_or(Color::Gray);
                (ghost_char, Style::default().fg(color).dim())
            } else {
                match game.board().get(row, col) {
                    Cell::Piece(kind) => (block_char, Style::default().fg(kind.color())),
                    Cell::Empty => (EMPTY, Style::default()),
                }
            };
            spans.push(Span::styled(text, style));
        }
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Where the active piece would rest if dropped straight down
fn ghost_placement(game: &Game, piece: &Placement) -> Option<Placement> {
    if !game.board().piece_fits(piece) {
        return None;
    }
    let mut ghost = *piece;
    while game.board().piece_fits(&ghost.shifted(1, 0)) {
        ghost = ghost.shifted(1, 0);
    }
    Some(ghost)
}

/// Render the stats panel: level, score, cleared lines
fn render_stats(frame: &mut Frame, area: Rect, game: &Game) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = vec![
        Line::from(Span::styled("LEVEL", Style::default().fg(Color::Gray))),
        Line::from(Span::styled(
            format!("{}", game.level()),
            Style::default().fg(Color::Cyan),
        )),
        Line::raw(""),
        Line::from(Span::styled("SCORE", Style::default().fg(Color::Gray))),
        Line::from(Span::styled(
            format!("{}", game.score()),
            Style::default().fg(Color::Yellow).bold(),
        )),
        Line::raw(""),
        Line::from(Span::styled("LINES", Style::default().fg(Color::Gray))),
        Line::from(Span::styled(
            format!("{}", game.lines()),
            Style::default().fg(Color::Green),
        )),
    ];

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Render a centered overlay box with a title and optional detail lines
fn render_overlay(frame: &mut Frame, area: Rect, title: &str, subtitle: &str, hint: &str) {
    let overlay_area = center_rect(area, 34, 7);
    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    let mut lines = vec![
        Line::raw(""),
        Line::styled(title.to_string(), Style::default().fg(Color::Yellow).bold()),
    ];
    if !subtitle.is_empty() {
        lines.push(Line::styled(
            subtitle.to_string(),
            Style::default().fg(Color::White),
        ));
    }
    lines.push(Line::styled(
        hint.to_string(),
        Style::default().fg(Color::DarkGray),
    ));

    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        inner,
    );
}

/// Center a rect within another rect
fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}
