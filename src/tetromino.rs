//! Tetromino definitions and rotation geometry
//!
//! Each piece is stored as a single canonical grid; rotated cells are read
//! through an index transformation instead of per-rotation shape tables.

use ratatui::style::Color;

/// The 7 tetromino kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    T,
    O,
    L,
    J,
    Z,
    S,
    I,
}

/// Contents of a single cell, on the board or inside a piece grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Piece(PieceKind),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_filled(&self) -> bool {
        matches!(self, Cell::Piece(_))
    }
}

// Canonical (zero-rotation) shapes, row-major, top row first.
const T_SHAPE: &[u8] = &[
    0, 0, 0, //
    1, 1, 1, //
    0, 1, 0,
];
const O_SHAPE: &[u8] = &[
    1, 1, //
    1, 1,
];
const L_SHAPE: &[u8] = &[
    0, 1, 0, //
    0, 1, 0, //
    0, 1, 1,
];
const J_SHAPE: &[u8] = &[
    0, 1, 0, //
    0, 1, 0, //
    1, 1, 0,
];
const Z_SHAPE: &[u8] = &[
    1, 1, 0, //
    0, 1, 1, //
    0, 0, 0,
];
const S_SHAPE: &[u8] = &[
    0, 1, 1, //
    1, 1, 0, //
    0, 0, 0,
];
const I_SHAPE: &[u8] = &[
    0, 0, 0, 0, //
    1, 1, 1, 1, //
    0, 0, 0, 0, //
    0, 0, 0, 0,
];

impl PieceKind {
    /// All kinds, for uniform random selection
    pub fn all() -> [PieceKind; 7] {
        [
            PieceKind::T,
            PieceKind::O,
            PieceKind::L,
            PieceKind::J,
            PieceKind::Z,
            PieceKind::S,
            PieceKind::I,
        ]
    }

    /// Display color for this kind
    pub fn color(&self) -> Color {
        match self {
            PieceKind::T => Color::Cyan,
            PieceKind::O => Color::Yellow,
            PieceKind::L => Color::Magenta,
            PieceKind::J => Color::Green,
            PieceKind::Z => Color::Red,
            PieceKind::S => Color::Blue,
            PieceKind::I => Color::Rgb(255, 165, 0), // Orange
        }
    }

    /// Side length of the canonical bounding square
    pub fn side(&self) -> usize {
        match self {
            PieceKind::I => 4,
            PieceKind::O => 2,
            _ => 3,
        }
    }

    fn shape(&self) -> &'static [u8] {
        match self {
            PieceKind::T => T_SHAPE,
            PieceKind::O => O_SHAPE,
            PieceKind::L => L_SHAPE,
            PieceKind::J => J_SHAPE,
            PieceKind::Z => Z_SHAPE,
            PieceKind::S => S_SHAPE,
            PieceKind::I => I_SHAPE,
        }
    }

    /// Get the cell at (row, col) of this piece's grid under `rotation`.
    ///
    /// Computed by remapping the index into the canonical grid; no rotated
    /// copies are stored. `row` and `col` must be within `[0, side)`.
    pub fn cell_at(&self, row: usize, col: usize, rotation: Rotation) -> Cell {
        let side = self.side();
        assert!(row < side && col < side, "piece cell out of range");

        let index = match rotation {
            Rotation::R0 => row * side + col,
            Rotation::R90 => (side - 1 - col) * side + row,
            Rotation::R180 => (side - 1 - row) * side + (side - 1 - col),
            Rotation::R270 => col * side + (side - 1 - row),
        };

        if self.shape()[index] == 0 {
            Cell::Empty
        } else {
            Cell::Piece(*self)
        }
    }
}

/// Rotation states, clockwise from the canonical orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    #[default]
    R0,
    R90,
    R180,
    R270,
}

impl Rotation {
    /// Next rotation in the clockwise cycle: 0° → 90° → 180° → 270° → 0°
    pub fn cw(&self) -> Rotation {
        match self {
            Rotation::R0 => Rotation::R90,
            Rotation::R90 => Rotation::R180,
            Rotation::R180 => Rotation::R270,
            Rotation::R270 => Rotation::R0,
        }
    }
}
