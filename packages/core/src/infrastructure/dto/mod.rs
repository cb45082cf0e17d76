//! Data Transfer Objects (DTOs) for the shared store.
//!
//! - `document`: the per-room document as stored and pushed
//! - `conversion`: DTO <-> domain conversion and field patches

pub mod conversion;
pub mod document;
