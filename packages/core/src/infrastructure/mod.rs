//! Infrastructure layer: the shared-store document format, the in-memory
//! store and the synchronization adapter.

pub mod dto;
pub mod store;
pub mod sync;

pub use store::InMemoryGameStore;
pub use sync::{Snapshot, Subscription, SyncAdapter};
