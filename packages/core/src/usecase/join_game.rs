//! UseCase: 対局ルームへの参加
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinGameUseCase::execute() メソッド
//!
//! ### なぜこのテストが必要か
//! - 不正なルーム ID 入力をストアに問い合わせる前に弾くことを保証
//! - 白番の着席で対局が始まり、ドキュメントに反映されることを確認
//! - 既存の参加者の再参加が何も書き込まないことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：白番として参加、参加済みプレイヤーの再参加
//! - 異常系：不正なルーム ID、存在しないルーム、満席

use std::sync::Arc;

use crate::{
    domain::{GameError, PlayerId, RoomId, Stone},
    infrastructure::SyncAdapter,
};

/// 対局ルーム参加のユースケース
pub struct JoinGameUseCase {
    sync: Arc<SyncAdapter>,
}

impl JoinGameUseCase {
    pub fn new(sync: Arc<SyncAdapter>) -> Self {
        Self { sync }
    }

    /// ルームに参加する
    ///
    /// # Arguments
    ///
    /// * `raw_room_id` - ユーザーが入力したルーム ID（未検証）
    /// * `joiner` - 参加するプレイヤー
    ///
    /// # Returns
    ///
    /// * `Ok(Stone)` - 参加者の手番（作成者の再参加は黒）
    /// * `Err(GameError)` - `InvalidRoomId` / `NotFound` / `RoomFull` / `Conflict` など
    pub async fn execute(&self, raw_room_id: &str, joiner: &PlayerId) -> Result<Stone, GameError> {
        let room_id = RoomId::new(raw_room_id.trim().to_string())?;
        let snapshot = self.sync.fetch(&room_id).await?;
        let mut session = snapshot.session;

        let (stone, transition) = session.join(joiner).inspect_err(|e| {
            tracing::warn!("'{}' could not join room '{}': {}", joiner, room_id, e);
        })?;

        if let Some(transition) = transition {
            self.sync
                .publish(&room_id, snapshot.version, &transition)
                .await?;
            tracing::info!("'{}' joined room '{}' as {}", joiner, room_id, stone);
        } else {
            tracing::debug!("'{}' rejoined room '{}' as {}", joiner, room_id, stone);
        }
        Ok(stone)
    }
}
