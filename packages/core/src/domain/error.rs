//! Domain error types.

use thiserror::Error;

use super::GameStatus;

/// Errors surfaced to the UI collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// No game document exists for the room identifier
    #[error("Game room '{0}' does not exist")]
    NotFound(String),

    /// Both seats are taken by other players
    #[error("Game room is already full")]
    RoomFull,

    /// The operation is not allowed in the current game status
    #[error("Operation not allowed while the game is {0}")]
    IllegalState(GameStatus),

    #[error("It is not your turn")]
    NotYourTurn,

    #[error("Cell ({row}, {col}) is already occupied")]
    CellOccupied { row: usize, col: usize },

    #[error("Cell ({row}, {col}) is outside the board")]
    OutOfBounds { row: usize, col: usize },

    /// Only the host (or the current black player) may restart
    #[error("Only the host can restart the game")]
    Forbidden,

    #[error("No unused room identifier found after {attempts} attempts")]
    AllocationExhausted { attempts: u32 },

    /// The shared document could not be parsed
    #[error("Game state is corrupt: {0}")]
    CorruptState(String),

    #[error("Game store is unavailable: {0}")]
    StoreUnavailable(String),

    /// Room identifier input is not four digits
    #[error("Room identifier '{0}' must be exactly 4 digits")]
    InvalidRoomId(String),

    #[error("Player identifier '{0}' is invalid")]
    InvalidPlayerId(String),

    /// The document changed after it was read; re-derive from the next update
    #[error("Game state changed concurrently: {0}")]
    Conflict(String),
}

/// Errors reported by a `GameStore` implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Document '{0}' not found")]
    NotFound(String),

    #[error("Document '{0}' already exists")]
    AlreadyExists(String),

    #[error("Version conflict (expected {expected}, actual {actual})")]
    VersionConflict { expected: u64, actual: u64 },

    /// The document or patch does not fit the stored document's shape
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
}

impl From<StoreError> for GameError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Unavailable(reason) => GameError::StoreUnavailable(reason),
            StoreError::InvalidDocument(reason) => GameError::CorruptState(reason),
            StoreError::NotFound(room_id) => GameError::NotFound(room_id),
            // A create lost the race against another allocator for the same id.
            StoreError::AlreadyExists(room_id) => {
                GameError::Conflict(format!("room '{room_id}' was created by another player"))
            }
            StoreError::VersionConflict { expected, actual } => GameError::Conflict(format!(
                "expected version {expected}, found {actual}"
            )),
        }
    }
}
