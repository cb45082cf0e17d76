//! InMemory GameStore 実装
//!
//! ドメイン層が定義する GameStore trait の具体的な実装。
//! HashMap をインメモリのドキュメントストアとして使用します。
//!
//! ## 振る舞い
//!
//! - ドキュメントは `serde_json::Value` として保持し、バージョンを付与する
//! - 更新はフィールド単位（`players.W` のようなドット区切りのパスに対応）
//! - 更新が成功するたびに、そのルームの全購読者へドキュメント全体を push する
//!   （書き込んだクライアント自身の購読も含む）
//! - 送信に失敗した購読者（受信側が破棄済み）は push 時に取り除く

use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::domain::{
    DocumentChannel, FieldPatch, GameStore, RoomId, StoreError, StoredDocument, SubscriberId,
};

/// 1 ルーム分の保存データ
struct RoomEntry {
    document: Value,
    version: u64,
    subscribers: HashMap<SubscriberId, DocumentChannel>,
}

impl RoomEntry {
    /// 全購読者にドキュメントを push し、切断済みの購読者を取り除く
    fn push_to_subscribers(&mut self, room_id: &RoomId) {
        let body = self.document.to_string();
        self.subscribers.retain(|subscriber_id, channel| {
            if channel.send(body.clone()).is_err() {
                tracing::warn!(
                    "Subscriber {} of room '{}' is gone, dropping it",
                    subscriber_id,
                    room_id
                );
                false
            } else {
                tracing::debug!("Pushed room '{}' to subscriber {}", room_id, subscriber_id);
                true
            }
        });
    }
}

/// インメモリ GameStore 実装
pub struct InMemoryGameStore {
    rooms: Arc<Mutex<HashMap<RoomId, RoomEntry>>>,
    next_subscriber_id: AtomicU64,
}

impl InMemoryGameStore {
    /// 空のストアを作成
    pub fn new() -> Self {
        Self {
            rooms: Arc::new(Mutex::new(HashMap::new())),
            next_subscriber_id: AtomicU64::new(1),
        }
    }

    /// ルームの購読者数を取得
    pub async fn count_subscribers(&self, room_id: &RoomId) -> usize {
        let rooms = self.rooms.lock().await;
        rooms
            .get(room_id)
            .map_or(0, |entry| entry.subscribers.len())
    }
}

impl Default for InMemoryGameStore {
    fn default() -> Self {
        Self::new()
    }
}

/// ドット区切りのパスに値を書き込む。途中のオブジェクトが無ければ作成する
fn apply_field(document: &mut Value, path: &str, value: Value) -> Result<(), StoreError> {
    let mut segments = path.split('.').peekable();
    let mut current = document;

    while let Some(segment) = segments.next() {
        let object = current.as_object_mut().ok_or_else(|| {
            StoreError::InvalidDocument(format!("field '{path}' does not address an object"))
        })?;
        if segments.peek().is_none() {
            object.insert(segment.to_string(), value);
            return Ok(());
        }
        current = object
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(serde_json::Map::new()));
    }

    Err(StoreError::InvalidDocument(format!("empty field path '{path}'")))
}

#[async_trait]
impl GameStore for InMemoryGameStore {
    async fn exists(&self, room_id: &RoomId) -> Result<bool, StoreError> {
        let rooms = self.rooms.lock().await;
        Ok(rooms.contains_key(room_id))
    }

    async fn create(&self, room_id: &RoomId, body: String) -> Result<u64, StoreError> {
        let document: Value = serde_json::from_str(&body)
            .map_err(|e| StoreError::InvalidDocument(e.to_string()))?;

        let mut rooms = self.rooms.lock().await;
        if rooms.contains_key(room_id) {
            return Err(StoreError::AlreadyExists(room_id.to_string()));
        }
        rooms.insert(
            room_id.clone(),
            RoomEntry {
                document,
                version: 1,
                subscribers: HashMap::new(),
            },
        );
        tracing::debug!("Created document for room '{}'", room_id);
        Ok(1)
    }

    async fn get(&self, room_id: &RoomId) -> Result<Option<StoredDocument>, StoreError> {
        let rooms = self.rooms.lock().await;
        Ok(rooms.get(room_id).map(|entry| StoredDocument {
            body: entry.document.to_string(),
            version: entry.version,
        }))
    }

    async fn update(
        &self,
        room_id: &RoomId,
        expected_version: u64,
        patch: FieldPatch,
    ) -> Result<u64, StoreError> {
        let mut rooms = self.rooms.lock().await;
        let entry = rooms
            .get_mut(room_id)
            .ok_or_else(|| StoreError::NotFound(room_id.to_string()))?;

        if entry.version != expected_version {
            tracing::warn!(
                "Rejected stale write to room '{}' (expected version {}, actual {})",
                room_id,
                expected_version,
                entry.version
            );
            return Err(StoreError::VersionConflict {
                expected: expected_version,
                actual: entry.version,
            });
        }

        // パッチは全てのフィールドが適用できた場合のみ反映する
        let mut document = entry.document.clone();
        for (path, value) in patch {
            apply_field(&mut document, &path, value)?;
        }
        entry.document = document;
        entry.version += 1;
        tracing::debug!(
            "Updated room '{}' to version {}",
            room_id,
            entry.version
        );

        entry.push_to_subscribers(room_id);
        Ok(entry.version)
    }

    async fn subscribe(
        &self,
        room_id: &RoomId,
        channel: DocumentChannel,
    ) -> Result<SubscriberId, StoreError> {
        let mut rooms = self.rooms.lock().await;
        let entry = rooms
            .get_mut(room_id)
            .ok_or_else(|| StoreError::NotFound(room_id.to_string()))?;

        let subscriber_id = self.next_subscriber_id.fetch_add(1, Ordering::Relaxed);
        // 購読開始時点のドキュメントを最初に届ける
        channel
            .send(entry.document.to_string())
            .map_err(|e| StoreError::Unavailable(format!("subscriber closed: {e}")))?;
        entry.subscribers.insert(subscriber_id, channel);
        tracing::debug!(
            "Subscriber {} registered to room '{}'",
            subscriber_id,
            room_id
        );
        Ok(subscriber_id)
    }

    async fn unsubscribe(&self, room_id: &RoomId, subscriber_id: SubscriberId) {
        let mut rooms = self.rooms.lock().await;
        if let Some(entry) = rooms.get_mut(room_id)
            && entry.subscribers.remove(&subscriber_id).is_some()
        {
            tracing::debug!(
                "Subscriber {} unregistered from room '{}'",
                subscriber_id,
                room_id
            );
        }
    }
}
