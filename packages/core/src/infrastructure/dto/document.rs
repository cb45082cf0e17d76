//! Shared-store document schema, one document per room.
//!
//! ```text
//! {
//!   board: <string-serialized 19x19 grid, cell ∈ {null,"B","W"}>,
//!   currentPlayer: "B" | "W",
//!   players: { B: <identity|null>, W: <identity|null> },
//!   winner: "B" | "W" | null,
//!   gameStatus: "waiting" | "playing" | "finished",
//!   createdAt: <epoch millis>,
//!   host: <identity>
//! }
//! ```
//!
//! A finished document with a null winner is a draw. `host` may be missing
//! in documents written by older clients; black is the host then.

use serde::{Deserialize, Serialize};

/// Field names used in field-level updates
pub mod field {
    pub const BOARD: &str = "board";
    pub const CURRENT_PLAYER: &str = "currentPlayer";
    pub const PLAYERS: &str = "players";
    pub const PLAYER_WHITE: &str = "players.W";
    pub const WINNER: &str = "winner";
    pub const GAME_STATUS: &str = "gameStatus";
    pub const CREATED_AT: &str = "createdAt";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoneSymbol {
    #[serde(rename = "B")]
    Black,
    #[serde(rename = "W")]
    White,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatusDto {
    Waiting,
    Playing,
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayersDocument {
    #[serde(rename = "B")]
    pub black: Option<String>,
    #[serde(rename = "W")]
    pub white: Option<String>,
}

/// Board grid before string serialization
pub type BoardGrid = Vec<Vec<Option<StoneSymbol>>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameDocument {
    /// JSON-encoded `BoardGrid`
    pub board: String,
    pub current_player: StoneSymbol,
    pub players: PlayersDocument,
    pub winner: Option<StoneSymbol>,
    pub game_status: GameStatusDto,
    pub created_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
}
