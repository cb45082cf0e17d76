//! Value objects of the game domain.

use std::fmt;

use uuid::Uuid;

use super::GameError;

/// Room identifier: exactly four ASCII digits.
///
/// The allocator only hands out 1000..=9999, but any four-digit code is a
/// well-formed identifier, so a code typed by a user is validated by shape
/// only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomId(String);

impl RoomId {
    /// Number of digits in a room identifier
    pub const LEN: usize = 4;
    /// Smallest identifier handed out by the allocator
    pub const MIN: u16 = 1000;
    /// Largest identifier handed out by the allocator
    pub const MAX: u16 = 9999;

    /// Parse a room identifier, rejecting anything that is not four digits.
    pub fn new(value: String) -> Result<Self, GameError> {
        if value.len() == Self::LEN && value.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(value))
        } else {
            Err(GameError::InvalidRoomId(value))
        }
    }

    /// Build an identifier from an allocated number in `MIN..=MAX`.
    pub fn from_number(number: u16) -> Result<Self, GameError> {
        if (Self::MIN..=Self::MAX).contains(&number) {
            Ok(Self(number.to_string()))
        } else {
            Err(GameError::InvalidRoomId(number.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for RoomId {
    type Error = GameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque, client-generated player identity.
///
/// Not authenticated. It only decides move ownership and host privilege.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(value: String) -> Result<Self, GameError> {
        if value.is_empty() || value.trim() != value {
            return Err(GameError::InvalidPlayerId(value));
        }
        Ok(Self(value))
    }

    /// Generate a fresh random identity (UUID v4).
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for PlayerId {
    type Error = GameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unix timestamp in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}
