//! Win detection for a just-placed stone.

use super::{Board, Cell, Position, Stone};

/// Stones in a row needed to win.
pub const WIN_LENGTH: usize = 5;

/// Horizontal, vertical, and the two diagonals. The opposite direction of
/// each is scanned by negating the step.
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Decide whether the stone just placed at `position` completes a line of
/// five or more.
///
/// `board` must already contain `stone` at `position`. Only the four lines
/// through `position` are scanned, and each scan stops after
/// `WIN_LENGTH - 1` steps, so the cost does not depend on the board size.
/// Lines longer than five also win.
pub fn detect_win(board: &Board, position: Position, stone: Stone) -> Option<Stone> {
    DIRECTIONS
        .iter()
        .any(|&(d_row, d_col)| line_length(board, position, stone, d_row, d_col) >= WIN_LENGTH)
        .then_some(stone)
}

/// Contiguous `stone` cells through `position` along one orientation,
/// counting the placed cell itself.
pub(crate) fn line_length(
    board: &Board,
    position: Position,
    stone: Stone,
    d_row: isize,
    d_col: isize,
) -> usize {
    1 + run_length(board, position, stone, d_row, d_col)
        + run_length(board, position, stone, -d_row, -d_col)
}

fn run_length(board: &Board, position: Position, stone: Stone, d_row: isize, d_col: isize) -> usize {
    (1..WIN_LENGTH as isize)
        .map_while(|distance| position.step(d_row, d_col, distance))
        .take_while(|next| board.get(*next) == Cell::Occupied(stone))
        .count()
}
