//! Terminal client for omok-sync.
//!
//! Drives the omok-core use cases from a line-based REPL. Several identities
//! can share one terminal (`as <name>`), which makes it possible to play both
//! seats against the in-memory store.

pub mod command;
pub mod error;
pub mod formatter;
pub mod repl;
