//! UseCase: 対局ルームの作成
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - CreateGameUseCase::execute() メソッド
//!
//! ### なぜこのテストが必要か
//! - 作成者が黒番かつホストとして記録されることを保証
//! - ルーム ID の割り当て失敗が作成失敗として返ることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：空きルーム ID でドキュメントが作成される
//! - 異常系：ルーム ID の割り当て枯渇、ストア障害

use std::sync::Arc;

use omok_shared::time::Clock;

use crate::{
    domain::{GameError, GameSession, PlayerId, RoomId, RoomIdAllocator, Timestamp},
    infrastructure::SyncAdapter,
};

/// 対局ルーム作成のユースケース
pub struct CreateGameUseCase {
    sync: Arc<SyncAdapter>,
    allocator: Arc<RoomIdAllocator>,
    clock: Arc<dyn Clock>,
}

impl CreateGameUseCase {
    pub fn new(
        sync: Arc<SyncAdapter>,
        allocator: Arc<RoomIdAllocator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            sync,
            allocator,
            clock,
        }
    }

    /// 新しいルームを作成し、作成者を黒番として着席させる
    ///
    /// # Returns
    ///
    /// * `Ok(RoomId)` - 作成したルームの ID
    /// * `Err(GameError)` - `AllocationExhausted` / `StoreUnavailable` / `Conflict`
    pub async fn execute(&self, creator: PlayerId) -> Result<RoomId, GameError> {
        let room_id = self.allocator.allocate().await?;
        let session = GameSession::create(
            room_id.clone(),
            creator,
            Timestamp::new(self.clock.now_millis()),
        );

        self.sync.create(&session).await?;
        tracing::info!(
            "Room '{}' created by '{}'",
            room_id,
            session.black()
        );
        Ok(room_id)
    }
}
