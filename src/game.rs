//! Game engine: the phase state machine, gravity timing, and progression
//!
//! The engine owns the board and the active placement. A driver pushes
//! elapsed time plus at most one player intent per tick; everything else
//! (presentation, input mapping, pacing) stays outside.

use crate::board::Board;
use crate::piece::Placement;
use crate::score::{drop_interval, lines_for_next_level, score_for};
use crate::tetromino::PieceKind;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// How long cleared rows stay highlighted before compaction
const HIGHLIGHT_SECONDS: f64 = 0.2;

/// Game phases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Start,
    Playing,
    ClearingLine,
    GameOver,
}

/// Player intent for one tick. Multiple inputs within a tick coalesce to
/// the latest one before reaching the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Intent {
    #[default]
    None,
    Left,
    Right,
    Down,
    Rotate,
    HardDrop,
}

/// The game simulation
pub struct Game {
    board: Board,
    piece: Option<Placement>,
    phase: Phase,
    start_level: u32,
    level: u32,
    lines: u32,
    score: u64,
    /// Simulation clock, advanced by the elapsed time of each tick
    time: f64,
    /// When gravity next pulls the piece down
    next_drop: f64,
    /// When the line-clear highlight ends and compaction happens
    highlight_end: f64,
    rng: ChaCha8Rng,
}

impl Game {
    pub fn new() -> Self {
        Self::with_seed(rand::random())
    }

    /// Deterministic piece sequence for a given seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            board: Board::new(),
            piece: None,
            phase: Phase::Start,
            start_level: 0,
            level: 0,
            lines: 0,
            score: 0,
            time: 0.0,
            next_drop: 0.0,
            highlight_end: 0.0,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The falling piece; only present once the first game has started
    pub fn active_piece(&self) -> Option<&Placement> {
        self.piece.as_ref()
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    /// Level selected on the start screen
    pub fn start_level(&self) -> u32 {
        self.start_level
    }

    /// Advance the simulation by `elapsed` seconds, applying one intent
    pub fn tick(&mut self, elapsed: f64, intent: Intent) {
        self.time += elapsed;
        match self.phase {
            Phase::Start => self.tick_start(intent),
            Phase::Playing => self.tick_playing(intent),
            Phase::ClearingLine => self.tick_clearing(),
            Phase::GameOver => self.tick_game_over(intent),
        }
    }

    fn tick_start(&mut self, intent: Intent) {
        match intent {
            Intent::Rotate => self.start_level += 1,
            Intent::Down => self.start_level = self.start_level.saturating_sub(1),
            Intent::HardDrop => {
                self.reset_session();
                self.spawn_piece();
                self.phase = Phase::Playing;
                tracing::info!(start_level = self.start_level, "game started");
            }
            _ => {}
        }
    }

    fn tick_playing(&mut self, intent: Intent) {
        // Spatial intents produce a candidate placement; it is committed
        // only if it fits, otherwise dropped with no kick attempts.
        if let Some(piece) = self.piece {
            let candidate = match intent {
                Intent::Left => Some(piece.shifted(0, -1)),
                Intent::Right => Some(piece.shifted(0, 1)),
                Intent::Rotate => Some(piece.rotated_cw()),
                _ => None,
            };
            if let Some(candidate) = candidate {
                if self.board.piece_fits(&candidate) {
                    self.piece = Some(candidate);
                }
            }
        }

        match intent {
            Intent::Down => {
                self.soft_drop();
            }
            Intent::HardDrop => while self.soft_drop() {},
            _ => {}
        }

        // Gravity: drop whenever the simulation clock has crossed the
        // scheduled drop time, however long the driver's tick was.
        while self.time >= self.next_drop {
            self.soft_drop();
        }

        self.board.mark_filled_rows();
        if self.board.has_marked_rows() {
            self.phase = Phase::ClearingLine;
            self.highlight_end = self.time + HIGHLIGHT_SECONDS;
            tracing::debug!("filled rows detected, highlighting");
        }

        // A merged cell in the top row ends the game, even mid-clear
        if !self.board.row_empty(0) {
            self.phase = Phase::GameOver;
            tracing::info!(score = self.score, lines = self.lines, "game over");
        }
    }

    fn tick_clearing(&mut self) {
        if self.time < self.highlight_end {
            return;
        }
        let cleared = self.board.clear_marked_rows();
        self.lines += cleared as u32;
        self.score += score_for(self.level, cleared);
        tracing::info!(cleared, lines = self.lines, score = self.score, "lines cleared");

        // Checked once per clear event; at most one level per clear.
        if self.lines >= lines_for_next_level(self.start_level, self.level) {
            self.level += 1;
            tracing::info!(level = self.level, "level up");
        }
        self.phase = Phase::Playing;
    }

    fn tick_game_over(&mut self, intent: Intent) {
        if intent == Intent::HardDrop {
            self.phase = Phase::Start;
        }
    }

    /// Drop the piece one row. Returns true if it moved; on false the piece
    /// has been merged into the board and a fresh one spawned.
    fn soft_drop(&mut self) -> bool {
        let Some(piece) = self.piece else {
            return false;
        };
        let dropped = piece.shifted(1, 0);
        if self.board.piece_fits(&dropped) {
            self.piece = Some(dropped);
            self.next_drop = self.time + drop_interval(self.level);
            true
        } else {
            self.board.merge_piece(&piece);
            tracing::debug!(kind = ?piece.kind, row = piece.row, "piece locked");
            self.spawn_piece();
            false
        }
    }

    /// Spawn a uniformly random piece at the top and reschedule gravity
    fn spawn_piece(&mut self) {
        let kinds = PieceKind::all();
        let kind = kinds[self.rng.gen_range(0..kinds.len())];
        self.piece = Some(Placement::spawn(kind));
        self.next_drop = self.time + drop_interval(self.level);
    }

    /// Fresh board and counters for the selected start level. The
    /// simulation clock keeps running across sessions.
    fn reset_session(&mut self) {
        self.board = Board::new();
        self.level = self.start_level;
        self.lines = 0;
        self.score = 0;
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BOARD_HEIGHT, BOARD_WIDTH};
    use crate::tetromino::{Cell, Rotation};

    /// A game ticked out of the start screen, with a parked piece so board
    /// setups below are not disturbed by the spawned one.
    fn started_game() -> Game {
        let mut game = Game::with_seed(7);
        game.tick(0.0, Intent::HardDrop);
        game.piece = Some(Placement {
            kind: PieceKind::I,
            row: 0,
            col: 3,
            rotation: Rotation::R0,
        });
        game
    }

    fn fill_row(game: &mut Game, row: usize) {
        for col in 0..BOARD_WIDTH {
            game.board.set(row, col, Cell::Piece(PieceKind::J));
        }
    }

    #[test]
    fn test_start_screen_level_selection() {
        let mut game = Game::with_seed(1);
        assert_eq!(game.phase(), Phase::Start);

        game.tick(0.0, Intent::Rotate);
        game.tick(0.0, Intent::Rotate);
        game.tick(0.0, Intent::Rotate);
        assert_eq!(game.start_level(), 3);

        game.tick(0.0, Intent::Down);
        assert_eq!(game.start_level(), 2);
        assert_eq!(game.phase(), Phase::Start);
    }

    #[test]
    fn test_start_level_floors_at_zero() {
        let mut game = Game::with_seed(1);
        game.tick(0.0, Intent::Down);
        game.tick(0.0, Intent::Down);
        assert_eq!(game.start_level(), 0);
    }

    #[test]
    fn test_hard_drop_leaves_start_screen() {
        let mut game = Game::with_seed(1);
        game.tick(0.0, Intent::Rotate);
        game.tick(0.0, Intent::HardDrop);

        assert_eq!(game.phase(), Phase::Playing);
        assert_eq!(game.level(), 1);
        assert_eq!(game.score(), 0);
        assert_eq!(game.lines(), 0);

        let piece = game.active_piece().expect("piece spawned");
        assert_eq!(piece.row, 0);
        assert_eq!(piece.col, BOARD_WIDTH as i32 / 2);
        assert_eq!(piece.rotation, Rotation::R0);
    }

    #[test]
    fn test_same_seed_same_piece_sequence() {
        let mut a = Game::with_seed(42);
        let mut b = Game::with_seed(42);
        a.tick(0.0, Intent::HardDrop);
        b.tick(0.0, Intent::HardDrop);
        for _ in 0..5 {
            assert_eq!(
                a.active_piece().unwrap().kind,
                b.active_piece().unwrap().kind
            );
            a.tick(0.0, Intent::HardDrop);
            b.tick(0.0, Intent::HardDrop);
        }
    }

    #[test]
    fn test_horizontal_move_applies_when_it_fits() {
        let mut game = started_game();
        game.tick(0.0, Intent::Left);
        assert_eq!(game.active_piece().unwrap().col, 2);
        game.tick(0.0, Intent::Right);
        assert_eq!(game.active_piece().unwrap().col, 3);
    }

    #[test]
    fn test_move_into_wall_is_rejected() {
        let mut game = started_game();
        // Horizontal I at col 0 touches the left wall
        game.piece = Some(Placement {
            kind: PieceKind::I,
            row: 0,
            col: 0,
            rotation: Rotation::R0,
        });
        game.tick(0.0, Intent::Left);
        assert_eq!(game.active_piece().unwrap().col, 0);
    }

    #[test]
    fn test_blocked_rotation_is_rejected() {
        let mut game = started_game();
        let placement = Placement {
            kind: PieceKind::I,
            row: 0,
            col: 3,
            rotation: Rotation::R0,
        };
        game.piece = Some(placement);
        // Rotating to vertical needs rows 0..4 at col 5; block one of them
        game.board.set(3, 5, Cell::Piece(PieceKind::O));
        game.tick(0.0, Intent::Rotate);
        assert_eq!(*game.active_piece().unwrap(), placement);
    }

    #[test]
    fn test_soft_drop_moves_one_row() {
        let mut game = started_game();
        game.tick(0.0, Intent::Down);
        assert_eq!(game.active_piece().unwrap().row, 1);
    }

    #[test]
    fn test_gravity_alone_locks_piece() {
        let mut game = started_game();
        // Each tick crosses the scheduled drop time (0.8s at level 0), so
        // gravity walks the piece to the floor and locks it, no input needed
        for _ in 0..25 {
            game.tick(1.0, Intent::None);
        }
        let filled: usize = (0..BOARD_HEIGHT)
            .flat_map(|r| (0..BOARD_WIDTH).map(move |c| (r, c)))
            .filter(|&(r, c)| game.board().get(r, c).is_filled())
            .count();
        assert_eq!(filled, 4);
        // Horizontal I rests on the bottom row
        assert!(!game.board().row_empty(BOARD_HEIGHT - 1));
    }

    #[test]
    fn test_hard_drop_locks_immediately() {
        let mut game = started_game();
        game.tick(0.0, Intent::HardDrop);
        assert!(!game.board().row_empty(BOARD_HEIGHT - 1));
        // A fresh piece is already falling
        assert_eq!(game.active_piece().unwrap().row, 0);
    }

    #[test]
    fn test_line_clear_cycle() {
        let mut game = started_game();
        fill_row(&mut game, BOARD_HEIGHT - 1);

        game.tick(0.0, Intent::None);
        assert_eq!(game.phase(), Phase::ClearingLine);
        // Compaction is deferred: the full row is still there, highlighted
        assert!(game.board().row_filled(BOARD_HEIGHT - 1));
        assert!(game.board().row_marked(BOARD_HEIGHT - 1));

        game.tick(0.1, Intent::None);
        assert_eq!(game.phase(), Phase::ClearingLine);

        game.tick(0.1, Intent::None);
        assert_eq!(game.phase(), Phase::Playing);
        assert!(game.board().row_empty(BOARD_HEIGHT - 1));
        assert_eq!(game.lines(), 1);
        assert_eq!(game.score(), 40);
        // Start level 0 levels up after its very first line
        assert_eq!(game.level(), 1);
    }

    #[test]
    fn test_tetris_scores_and_levels_once() {
        let mut game = started_game();
        for row in (BOARD_HEIGHT - 4)..BOARD_HEIGHT {
            fill_row(&mut game, row);
        }

        game.tick(0.0, Intent::None);
        assert_eq!(game.phase(), Phase::ClearingLine);
        game.tick(HIGHLIGHT_SECONDS, Intent::None);

        assert_eq!(game.lines(), 4);
        assert_eq!(game.score(), 1200);
        // Only a single increment per clear event, even though 4 lines
        // could in principle cross more than the first threshold
        assert_eq!(game.level(), 1);
    }

    #[test]
    fn test_top_row_merge_is_game_over() {
        let mut game = started_game();
        game.board.set(0, 9, Cell::Piece(PieceKind::Z));
        game.tick(0.0, Intent::None);
        assert_eq!(game.phase(), Phase::GameOver);
    }

    #[test]
    fn test_restart_cycle_resets_counters() {
        let mut game = started_game();
        game.score = 500;
        game.lines = 3;
        game.board.set(0, 0, Cell::Piece(PieceKind::S));
        game.tick(0.0, Intent::None);
        assert_eq!(game.phase(), Phase::GameOver);

        // Only hard drop leaves game over
        game.tick(0.0, Intent::Rotate);
        assert_eq!(game.phase(), Phase::GameOver);
        game.tick(0.0, Intent::HardDrop);
        assert_eq!(game.phase(), Phase::Start);

        game.tick(0.0, Intent::HardDrop);
        assert_eq!(game.phase(), Phase::Playing);
        assert_eq!(game.score(), 0);
        assert_eq!(game.lines(), 0);
        assert!(game.board().row_empty(0));
    }

    #[test]
    fn test_gravity_reschedules_after_manual_drop() {
        let mut game = started_game();
        game.tick(0.0, Intent::Down);
        let row_after_soft = game.active_piece().unwrap().row;
        // Less than a full drop interval later, gravity has not fired again
        game.tick(0.1, Intent::None);
        assert_eq!(game.active_piece().unwrap().row, row_after_soft);
    }
}
