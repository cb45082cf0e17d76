//! Synchronization adapter
//!
//! Bridges the game session state machine and the shared store.
//!
//! ## 責務
//!
//! - 読み込み: ストアのドキュメントを取得し `GameSession` に変換する
//! - 書き込み: 状態遷移 (`Transition`) をフィールド単位の更新として書き込む。
//!   書き込みには元にしたバージョンを添え、古い状態からの書き込みはストアが拒否する
//! - 購読: ストアからの push を受け取り、その都度パースしてコールバックに渡す。
//!   パースに失敗しても購読は止めず、次の push を待つ
//!
//! 書き込みに失敗してもローカルの状態は更新しない。クライアントは次の push から
//! 状態を再構築する。

use std::sync::Arc;

use tokio::{sync::mpsc, task::JoinHandle};

use crate::{
    domain::{GameError, GameSession, GameStore, RoomId, SubscriberId, Transition},
    infrastructure::dto::conversion::{decode_session, encode_session, transition_patch},
};

/// A parsed document and the version it was read at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub session: GameSession,
    pub version: u64,
}

/// Reads, writes and watches game documents in a `GameStore`
pub struct SyncAdapter {
    store: Arc<dyn GameStore>,
}

impl SyncAdapter {
    pub fn new(store: Arc<dyn GameStore>) -> Self {
        Self { store }
    }

    /// Read and parse the current document of a room.
    pub async fn fetch(&self, room_id: &RoomId) -> Result<Snapshot, GameError> {
        let stored = self
            .store
            .get(room_id)
            .await?
            .ok_or_else(|| GameError::NotFound(room_id.to_string()))?;
        let session = decode_session(room_id, &stored.body)?;
        Ok(Snapshot {
            session,
            version: stored.version,
        })
    }

    /// Write a newly created session as a full document.
    pub async fn create(&self, session: &GameSession) -> Result<u64, GameError> {
        let body = encode_session(session)?;
        let version = self.store.create(session.id(), body).await?;
        tracing::debug!("Published new room '{}'", session.id());
        Ok(version)
    }

    /// Write a transition computed from the document at `expected_version`.
    ///
    /// Returns the new version. Fails with `Conflict` when the document has
    /// moved on since it was read.
    pub async fn publish(
        &self,
        room_id: &RoomId,
        expected_version: u64,
        transition: &Transition,
    ) -> Result<u64, GameError> {
        let patch = transition_patch(transition)?;
        let version = self
            .store
            .update(room_id, expected_version, patch)
            .await?;
        tracing::debug!(
            "Published transition to room '{}' (version {} -> {})",
            room_id,
            expected_version,
            version
        );
        Ok(version)
    }

    /// Watch a room.
    ///
    /// `on_update` is called with the current session right away and again
    /// after every change, including changes written by this client. A
    /// document that cannot be parsed is reported as `CorruptState` and the
    /// subscription keeps listening.
    pub async fn subscribe<F>(&self, room_id: &RoomId, mut on_update: F) -> Result<Subscription, GameError>
    where
        F: FnMut(Result<GameSession, GameError>) + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();
        let subscriber_id = self.store.subscribe(room_id, tx).await?;

        let room_id_for_task = room_id.clone();
        let task = tokio::spawn(async move {
            while let Some(body) = rx.recv().await {
                let update = decode_session(&room_id_for_task, &body);
                if let Err(e) = &update {
                    tracing::warn!(
                        "Failed to parse pushed document for room '{}': {}",
                        room_id_for_task,
                        e
                    );
                }
                on_update(update);
            }
            tracing::debug!("Push channel of room '{}' closed", room_id_for_task);
        });

        tracing::info!("Subscribed to room '{}'", room_id);
        Ok(Subscription {
            room_id: room_id.clone(),
            subscriber_id,
            store: self.store.clone(),
            task,
            unregistered: false,
        })
    }
}

/// Handle of an active room subscription
///
/// `unsubscribe` unregisters from the store before returning. Dropping the
/// handle stops local updates at once and unregisters in a spawned task.
/// Neither retracts published writes.
pub struct Subscription {
    room_id: RoomId,
    subscriber_id: SubscriberId,
    store: Arc<dyn GameStore>,
    task: JoinHandle<()>,
    unregistered: bool,
}

impl Subscription {
    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    /// Cancel the subscription.
    pub async fn unsubscribe(mut self) {
        self.task.abort();
        self.store
            .unsubscribe(&self.room_id, self.subscriber_id)
            .await;
        self.unregistered = true;
        tracing::info!("Unsubscribed from room '{}'", self.room_id);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.task.abort();
        if self.unregistered {
            return;
        }

        // Outside a runtime the store still drops the closed channel on its next push.
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            return;
        };
        let store = self.store.clone();
        let room_id = self.room_id.clone();
        let subscriber_id = self.subscriber_id;
        runtime.spawn(async move {
            store.unsubscribe(&room_id, subscriber_id).await;
            tracing::debug!("Dropped subscription to room '{}'", room_id);
        });
    }
}
