//! Room identifier allocation
//!
//! Draws random four-digit identifiers and checks them against the store.
//! This avoids collisions on a best-effort basis only: another allocator may
//! still claim the same identifier between the existence check and the
//! create. The create then fails with `Conflict` and the user tries again.

use std::sync::Arc;

use rand::{Rng, SeedableRng, rngs::StdRng};
use tokio::sync::Mutex;

use super::{GameError, GameStore, RoomId};

/// Attempts before giving up with `AllocationExhausted`
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// Allocates unused room identifiers against the shared store
pub struct RoomIdAllocator {
    store: Arc<dyn GameStore>,
    rng: Mutex<StdRng>,
    max_attempts: u32,
}

impl RoomIdAllocator {
    /// Allocator seeded from the operating system.
    pub fn new(store: Arc<dyn GameStore>) -> Self {
        Self::with_rng(store, StdRng::from_entropy(), DEFAULT_MAX_ATTEMPTS)
    }

    /// Allocator with a fixed seed, for reproducible identifiers.
    pub fn with_seed(store: Arc<dyn GameStore>, seed: u64) -> Self {
        Self::with_rng(store, StdRng::seed_from_u64(seed), DEFAULT_MAX_ATTEMPTS)
    }

    pub fn with_rng(store: Arc<dyn GameStore>, rng: StdRng, max_attempts: u32) -> Self {
        Self {
            store,
            rng: Mutex::new(rng),
            max_attempts,
        }
    }

    /// Find an identifier with no document in the store.
    ///
    /// Store failures are returned as-is; only collisions are retried.
    pub async fn allocate(&self) -> Result<RoomId, GameError> {
        for attempt in 1..=self.max_attempts {
            let number = self.rng.lock().await.gen_range(RoomId::MIN..=RoomId::MAX);
            let room_id = RoomId::from_number(number)?;

            if !self.store.exists(&room_id).await? {
                tracing::debug!("Allocated room id {} (attempt {})", room_id, attempt);
                return Ok(room_id);
            }
            tracing::debug!(
                "Room id {} already taken (attempt {}/{})",
                room_id,
                attempt,
                self.max_attempts
            );
        }

        tracing::warn!(
            "No unused room id found after {} attempts",
            self.max_attempts
        );
        Err(GameError::AllocationExhausted {
            attempts: self.max_attempts,
        })
    }
}
