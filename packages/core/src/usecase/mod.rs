//! UseCase 層
//!
//! ユーザー操作ごとに 1 つのユースケースを置き、割り当て・状態遷移・同期を組み合わせる。
//! 観戦（購読）は `SyncAdapter::subscribe` を直接使う。

pub mod create_game;
pub mod join_game;
pub mod place_stone;
pub mod restart_game;

pub use create_game::CreateGameUseCase;
pub use join_game::JoinGameUseCase;
pub use place_stone::PlaceStoneUseCase;
pub use restart_game::RestartGameUseCase;
