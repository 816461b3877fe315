//! Game board: the cell grid, collision checks, and line clearing

use crate::piece::Placement;
use crate::tetromino::Cell;

/// Board dimensions: 20 visible rows plus 2 buffer rows at the top where
/// pieces spawn. Row 0 is the topmost (buffer) row.
pub const BOARD_WIDTH: usize = 10;
pub const VISIBLE_HEIGHT: usize = 20;
pub const BUFFER_HEIGHT: usize = 2;
pub const BOARD_HEIGHT: usize = VISIBLE_HEIGHT + BUFFER_HEIGHT;

/// The playing field grid plus the per-row pending-clear markers
#[derive(Debug, Clone)]
pub struct Board {
    /// Grid stored as [row][col], row 0 at the top
    cells: [[Cell; BOARD_WIDTH]; BOARD_HEIGHT],
    /// Rows awaiting removal; only meaningful during the clearing phase
    pending: [bool; BOARD_HEIGHT],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [[Cell::Empty; BOARD_WIDTH]; BOARD_HEIGHT],
            pending: [false; BOARD_HEIGHT],
        }
    }

    /// Get the cell at (row, col). Out-of-range coordinates are a caller
    /// bug and panic.
    pub fn get(&self, row: usize, col: usize) -> Cell {
        assert!(row < BOARD_HEIGHT && col < BOARD_WIDTH, "board cell out of range");
        self.cells[row][col]
    }

    /// Set the cell at (row, col). Same in-bounds contract as `get`.
    pub fn set(&mut self, row: usize, col: usize, cell: Cell) {
        assert!(row < BOARD_HEIGHT && col < BOARD_WIDTH, "board cell out of range");
        self.cells[row][col] = cell;
    }

    /// True iff every cell in the row is filled
    pub fn row_filled(&self, row: usize) -> bool {
        self.cells[row].iter().all(|cell| cell.is_filled())
    }

    /// True iff every cell in the row is empty
    pub fn row_empty(&self, row: usize) -> bool {
        self.cells[row].iter().all(|cell| cell.is_empty())
    }

    /// Recompute the pending-clear marker for every row
    pub fn mark_filled_rows(&mut self) {
        for row in 0..BOARD_HEIGHT {
            self.pending[row] = self.row_filled(row);
        }
    }

    /// Whether any row is currently marked for clearing
    pub fn has_marked_rows(&self) -> bool {
        self.pending.iter().any(|&marked| marked)
    }

    /// Whether a given row is marked for clearing (for the highlight render)
    pub fn row_marked(&self, row: usize) -> bool {
        self.pending[row]
    }

    /// Remove every marked row and shift the rows above it down, filling the
    /// exposed rows at the top with empty cells. Returns the number of rows
    /// removed.
    ///
    /// Done as a single bottom-up copy pass: for each destination row, the
    /// nearest unmarked source row at or above it is copied down; once the
    /// sources run out the remaining destinations become empty.
    pub fn clear_marked_rows(&mut self) -> usize {
        let cleared = self.pending.iter().filter(|&&marked| marked).count();

        let mut src = BOARD_HEIGHT as i32 - 1;
        for dst in (0..BOARD_HEIGHT).rev() {
            while src >= 0 && self.pending[src as usize] {
                src -= 1;
            }
            if src < 0 {
                self.cells[dst] = [Cell::Empty; BOARD_WIDTH];
            } else {
                self.cells[dst] = self.cells[src as usize];
                src -= 1;
            }
        }

        self.pending = [false; BOARD_HEIGHT];
        cleared
    }

    /// Check whether a placement's occupied cells are all in-bounds and on
    /// empty board cells. This is the collision, move-validity, and spawn
    /// check in one.
    pub fn piece_fits(&self, placement: &Placement) -> bool {
        placement.cells().all(|(row, col, _)| {
            row >= 0
                && (row as usize) < BOARD_HEIGHT
                && col >= 0
                && (col as usize) < BOARD_WIDTH
                && self.cells[row as usize][col as usize].is_empty()
        })
    }

    /// Write a placement's occupied cells permanently into the grid.
    /// The placement must fit; callers validate first.
    pub fn merge_piece(&mut self, placement: &Placement) {
        for (row, col, cell) in placement.cells() {
            self.set(row as usize, col as usize, cell);
        }
    }
}
