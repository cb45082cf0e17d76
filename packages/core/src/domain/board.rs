//! Board model: a fixed 19x19 grid of cells.

use std::fmt;

use super::GameError;

/// Number of rows and columns on the board
pub const BOARD_SIZE: usize = 19;

/// Stone color, which doubles as the player role.
///
/// Black always moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stone {
    Black,
    White,
}

impl Stone {
    /// Returns the other role.
    pub fn opponent(self) -> Self {
        match self {
            Stone::Black => Stone::White,
            Stone::White => Stone::Black,
        }
    }

    /// Symbol used in the shared document (`"B"` / `"W"`).
    pub fn symbol(self) -> &'static str {
        match self {
            Stone::Black => "B",
            Stone::White => "W",
        }
    }
}

impl fmt::Display for Stone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stone::Black => f.write_str("black"),
            Stone::White => f.write_str("white"),
        }
    }
}

/// State of a single intersection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Occupied(Stone),
}

/// A coordinate known to lie on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    row: usize,
    col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Result<Self, GameError> {
        if row < BOARD_SIZE && col < BOARD_SIZE {
            Ok(Self { row, col })
        } else {
            Err(GameError::OutOfBounds { row, col })
        }
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn col(&self) -> usize {
        self.col
    }

    /// Step `distance` cells along `(d_row, d_col)`; `None` past the edge.
    pub(crate) fn step(self, d_row: isize, d_col: isize, distance: isize) -> Option<Self> {
        let row = self.row.checked_add_signed(d_row * distance)?;
        let col = self.col.checked_add_signed(d_col * distance)?;
        Self::new(row, col).ok()
    }
}

/// 19x19 board. A cell, once occupied, stays occupied until the board is
/// replaced by a fresh one on restart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: [[Cell; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self {
            cells: [[Cell::Empty; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    /// Rebuilds a board from stored cells.
    pub fn from_cells(cells: [[Cell; BOARD_SIZE]; BOARD_SIZE]) -> Self {
        Self { cells }
    }

    pub fn get(&self, position: Position) -> Cell {
        self.cells[position.row][position.col]
    }

    /// Rows in top-to-bottom order.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell; BOARD_SIZE]> {
        self.cells.iter()
    }

    /// Place a stone on an empty cell.
    pub(crate) fn place(&mut self, position: Position, stone: Stone) -> Result<(), GameError> {
        let cell = &mut self.cells[position.row][position.col];
        if *cell != Cell::Empty {
            return Err(GameError::CellOccupied {
                row: position.row,
                col: position.col,
            });
        }
        *cell = Cell::Occupied(stone);
        Ok(())
    }

    pub fn stone_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|cell| **cell != Cell::Empty)
            .count()
    }

    pub fn is_full(&self) -> bool {
        self.stone_count() == BOARD_SIZE * BOARD_SIZE
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
