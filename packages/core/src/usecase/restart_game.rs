//! UseCase: 対局の再開始
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RestartGameUseCase::execute() メソッド
//!
//! ### なぜこのテストが必要か
//! - 再開始できるのはホストか現在の黒番のみであることを保証
//! - 黒番勝利後は席が入れ替わり、敗者が黒番で先手になることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：黒番勝利後の再開始（席の入れ替え）、対局中の再開始
//! - 異常系：権限のないプレイヤー、待機中のルーム

use std::sync::Arc;

use omok_shared::time::Clock;

use crate::{
    domain::{GameError, PlayerId, RoomId, Timestamp},
    infrastructure::SyncAdapter,
};

/// 対局再開始のユースケース
pub struct RestartGameUseCase {
    sync: Arc<SyncAdapter>,
    clock: Arc<dyn Clock>,
}

impl RestartGameUseCase {
    pub fn new(sync: Arc<SyncAdapter>, clock: Arc<dyn Clock>) -> Self {
        Self { sync, clock }
    }

    /// 盤面をクリアして次の対局を始める
    pub async fn execute(&self, room_id: &RoomId, requester: &PlayerId) -> Result<(), GameError> {
        let snapshot = self.sync.fetch(room_id).await?;
        let mut session = snapshot.session;

        let now = Timestamp::new(self.clock.now_millis());
        let transition = session.restart(requester, now).inspect_err(|e| {
            tracing::warn!(
                "'{}' could not restart room '{}': {}",
                requester,
                room_id,
                e
            );
        })?;
        self.sync
            .publish(room_id, snapshot.version, &transition)
            .await?;

        tracing::info!(
            "Room '{}' restarted by '{}' (black: '{}')",
            room_id,
            requester,
            session.black()
        );
        Ok(())
    }
}
