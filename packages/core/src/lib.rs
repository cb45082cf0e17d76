//! Two-player omok (five-in-a-row) played through a shared document store.
//!
//! The crate owns the game state machine and the synchronization protocol.
//! Clients never talk to each other directly: every transition is written to
//! a shared store as a field-level update and fanned back out to every
//! subscriber of the room.

// layers
pub mod domain;
pub mod infrastructure;
pub mod usecase;
