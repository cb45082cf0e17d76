//! UseCase: 着手
//!
//! 最新のドキュメントを取得して状態遷移を計算し、取得時のバージョンを添えて書き込む。
//! 書き込みに失敗した場合は何も反映されない。

use std::sync::Arc;

use crate::{
    domain::{GameError, Outcome, PlayerId, RoomId},
    infrastructure::SyncAdapter,
};

/// 着手のユースケース
pub struct PlaceStoneUseCase {
    sync: Arc<SyncAdapter>,
}

impl PlaceStoneUseCase {
    pub fn new(sync: Arc<SyncAdapter>) -> Self {
        Self { sync }
    }

    /// `(row, col)` に石を置き、対局結果を返す
    pub async fn execute(
        &self,
        room_id: &RoomId,
        actor: &PlayerId,
        row: usize,
        col: usize,
    ) -> Result<Outcome, GameError> {
        let snapshot = self.sync.fetch(room_id).await?;
        let mut session = snapshot.session;

        let transition = session.place_stone(actor, row, col).inspect_err(|e| {
            tracing::warn!(
                "Rejected move ({}, {}) by '{}' in room '{}': {}",
                row,
                col,
                actor,
                room_id,
                e
            );
        })?;
        self.sync
            .publish(room_id, snapshot.version, &transition)
            .await?;

        let outcome = session.outcome();
        match outcome {
            Outcome::Winner(stone) => {
                tracing::info!("Room '{}' finished: {} wins", room_id, stone)
            }
            Outcome::Draw => tracing::info!("Room '{}' finished in a draw", room_id),
            Outcome::Pending => {
                tracing::debug!("'{}' placed at ({}, {}) in room '{}'", actor, row, col, room_id)
            }
        }
        Ok(outcome)
    }
}
