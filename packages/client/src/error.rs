//! Error types for the terminal client.

use omok_core::domain::GameError;
use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Unknown command '{0}' (type 'help' for the list of commands)")]
    UnknownCommand(String),

    /// Wrong number or type of arguments
    #[error("Usage: {0}")]
    Usage(&'static str),

    /// A room command was entered outside of a room
    #[error("You are not in a room (use 'create' or 'join <id>')")]
    NotInRoom,

    #[error(transparent)]
    Game(#[from] GameError),

    /// Terminal input could not be set up
    #[error("Readline error: {0}")]
    Readline(String),
}
