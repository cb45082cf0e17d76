//! `GameStore` implementations
//!
//! - `inmemory`: process-local store with push subscriptions
//! - a hosted document database would be added here

pub mod inmemory;

pub use inmemory::InMemoryGameStore;
