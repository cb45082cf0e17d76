//! Text rendering of game sessions for the terminal.

use omok_core::domain::{
    BOARD_SIZE, Board, Cell, GameSession, GameStatus, Outcome, PlayerId, Stone,
};
use omok_shared::time::timestamp_to_rfc3339;

const SEPARATOR: &str = "============================================================";

/// Game formatter for terminal display
pub struct GameFormatter;

impl GameFormatter {
    /// Format a full session: header, board and status line
    ///
    /// `viewer` is marked with "(you)" in the seat list.
    pub fn format_session(session: &GameSession, viewer: &PlayerId) -> String {
        let mut output = String::new();
        output.push_str("\n\n");
        output.push_str(SEPARATOR);
        output.push('\n');
        output.push_str(&Self::format_header(session, viewer));
        output.push_str(&Self::format_board(session.board()));
        output.push_str(&Self::format_status(session, viewer));
        output.push_str(SEPARATOR);
        output.push('\n');
        output
    }

    fn format_header(session: &GameSession, viewer: &PlayerId) -> String {
        let started_at = timestamp_to_rfc3339(session.created_at().value())
            .unwrap_or_else(|| "unknown".to_string());
        let seat = |stone: Stone| match session.player_for(stone) {
            Some(player) if player == viewer => format!("{player} (you)"),
            Some(player) => player.to_string(),
            None => "(waiting)".to_string(),
        };
        format!(
            "Room {} - started at {}\nBlack (B): {}\nWhite (W): {}\n\n",
            session.id(),
            started_at,
            seat(Stone::Black),
            seat(Stone::White)
        )
    }

    /// Format the board as a grid with row and column indices
    pub fn format_board(board: &Board) -> String {
        let mut output = String::from("   ");
        for col in 0..BOARD_SIZE {
            output.push_str(&format!("{col:>3}"));
        }
        output.push('\n');

        for (row, cells) in board.rows().enumerate() {
            output.push_str(&format!("{row:>3}"));
            for cell in cells {
                let symbol = match cell {
                    Cell::Empty => ".",
                    Cell::Occupied(stone) => stone.symbol(),
                };
                output.push_str(&format!("{symbol:>3}"));
            }
            output.push('\n');
        }
        output
    }

    /// Format the one-line status for `viewer`
    pub fn format_status(session: &GameSession, viewer: &PlayerId) -> String {
        let line = match (session.status(), session.outcome()) {
            (GameStatus::Waiting, _) => "Waiting for an opponent to join".to_string(),
            (GameStatus::Playing, _) => {
                let turn = session.turn();
                if session.role_of(viewer) == Some(turn) {
                    format!("Your move ({turn})")
                } else {
                    format!("{turn} to move")
                }
            }
            (GameStatus::Finished, Outcome::Winner(stone)) => {
                if session.role_of(viewer) == Some(stone) {
                    format!("You win! ({stone})")
                } else {
                    format!("{stone} wins")
                }
            }
            (GameStatus::Finished, _) => "Draw: the board is full".to_string(),
        };
        format!("\n{line}\n")
    }
}
