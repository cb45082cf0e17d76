//! Utilities shared by the omok-sync packages.

pub mod logger;
pub mod time;
