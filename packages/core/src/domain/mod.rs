//! Domain layer: value objects, the board, win detection and the game
//! session state machine, plus the store port the state machine is persisted
//! through.

pub mod allocator;
pub mod board;
pub mod error;
pub mod repository;
pub mod session;
pub mod value_object;
pub mod win;

pub use allocator::{DEFAULT_MAX_ATTEMPTS, RoomIdAllocator};
pub use board::{BOARD_SIZE, Board, Cell, Position, Stone};
pub use error::{GameError, StoreError};
pub use repository::{DocumentChannel, FieldPatch, GameStore, StoredDocument, SubscriberId};
pub use session::{GameSession, GameStatus, Outcome, Transition};
pub use value_object::{PlayerId, RoomId, Timestamp};
pub use win::detect_win;

#[cfg(test)]
pub use repository::MockGameStore;
