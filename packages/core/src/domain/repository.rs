//! Shared store port
//!
//! The game core needs a document store that supports existence checks,
//! creation, versioned field-level updates and push subscriptions. This trait
//! is that interface; the infrastructure layer provides the implementation
//! (dependency inversion).
//!
//! Documents cross this boundary as raw JSON strings. Parsing them into a
//! `GameSession` is the synchronization adapter's job, so a corrupt document
//! is detected on the receiving side.

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{RoomId, StoreError};

/// Channel the store pushes raw document bodies into.
pub type DocumentChannel = mpsc::UnboundedSender<String>;

/// Field-level update: field path to new JSON value.
///
/// Dotted paths (`"players.W"`) address nested fields.
pub type FieldPatch = serde_json::Map<String, serde_json::Value>;

/// Handle of a registered push subscription
pub type SubscriberId = u64;

/// A document as read from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredDocument {
    /// Raw JSON body
    pub body: String,
    /// Incremented on every successful write; starts at 1 on create
    pub version: u64,
}

/// Game document store
///
/// One document per room, keyed by `RoomId`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GameStore: Send + Sync {
    /// Whether a document exists for the room
    async fn exists(&self, room_id: &RoomId) -> Result<bool, StoreError>;

    /// Create the room document. Returns the initial version.
    async fn create(&self, room_id: &RoomId, body: String) -> Result<u64, StoreError>;

    /// Read the room document, `None` when absent
    async fn get(&self, room_id: &RoomId) -> Result<Option<StoredDocument>, StoreError>;

    /// Apply a field-level update if the document is still at `expected_version`.
    ///
    /// Returns the new version and pushes the updated document to every
    /// subscriber of the room, the writer's own subscriptions included.
    async fn update(
        &self,
        room_id: &RoomId,
        expected_version: u64,
        patch: FieldPatch,
    ) -> Result<u64, StoreError>;

    /// Register a push channel. The current document is pushed immediately.
    async fn subscribe(
        &self,
        room_id: &RoomId,
        channel: DocumentChannel,
    ) -> Result<SubscriberId, StoreError>;

    /// Remove a push channel. Unknown ids are ignored.
    async fn unsubscribe(&self, room_id: &RoomId, subscriber_id: SubscriberId);
}
