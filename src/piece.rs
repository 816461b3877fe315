//! Active falling piece placement
//!
//! A placement is a small value type; tentative moves are modeled as
//! compute-candidate, validate against the board, commit-or-discard.

use crate::board::BOARD_WIDTH;
use crate::tetromino::{Cell, PieceKind, Rotation};

/// Where the active piece sits: its kind, the board position of the
/// top-left corner of its bounding square, and its rotation.
///
/// Offsets are signed: a piece whose occupied cells are inset from its
/// bounding square may legally anchor outside the board edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub kind: PieceKind,
    pub row: i32,
    pub col: i32,
    pub rotation: Rotation,
}

impl Placement {
    /// Spawn placement for a kind: top row, horizontally centered, unrotated
    pub fn spawn(kind: PieceKind) -> Self {
        Self {
            kind,
            row: 0,
            col: BOARD_WIDTH as i32 / 2,
            rotation: Rotation::R0,
        }
    }

    /// Candidate placement shifted by (d_row, d_col)
    pub fn shifted(&self, d_row: i32, d_col: i32) -> Self {
        Self {
            row: self.row + d_row,
            col: self.col + d_col,
            ..*self
        }
    }

    /// Candidate placement rotated one step clockwise
    pub fn rotated_cw(&self) -> Self {
        Self {
            rotation: self.rotation.cw(),
            ..*self
        }
    }

    /// Iterate the occupied cells as (board_row, board_col, cell).
    ///
    /// Board coordinates may be out of bounds; callers decide whether that
    /// is a collision (`Board::piece_fits`) or a caller bug.
    pub fn cells(self) -> impl Iterator<Item = (i32, i32, Cell)> {
        let side = self.kind.side();
        (0..side).flat_map(move |row| {
            (0..side).filter_map(move |col| {
                let cell = self.kind.cell_at(row, col, self.rotation);
                if cell.is_empty() {
                    None
                } else {
                    Some((self.row + row as i32, self.col + col as i32, cell))
                }
            })
        })
    }
}
