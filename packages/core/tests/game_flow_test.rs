//! Integration tests for two clients playing through one shared store.

use std::{sync::Arc, time::Duration};

use omok_core::{
    domain::{
        Cell, GameError, GameSession, GameStatus, GameStore, Outcome, PlayerId, Position,
        RoomId, RoomIdAllocator, Stone,
    },
    infrastructure::{InMemoryGameStore, Subscription, SyncAdapter},
    usecase::{CreateGameUseCase, JoinGameUseCase, PlaceStoneUseCase, RestartGameUseCase},
};
use omok_shared::time::FixedClock;
use tokio::{sync::mpsc, time::timeout};

/// One player's view of the game: its own adapter, use cases and subscription
struct TestClient {
    player: PlayerId,
    create: CreateGameUseCase,
    join: JoinGameUseCase,
    place: PlaceStoneUseCase,
    restart: RestartGameUseCase,
    sync: Arc<SyncAdapter>,
    updates: Option<mpsc::UnboundedReceiver<Result<GameSession, GameError>>>,
    subscription: Option<Subscription>,
}

impl TestClient {
    fn new(store: Arc<dyn GameStore>, name: &str, seed: u64) -> Self {
        let sync = Arc::new(SyncAdapter::new(store.clone()));
        let clock = Arc::new(FixedClock::new(1_700_000_000_000));
        Self {
            player: PlayerId::new(name.to_string()).unwrap(),
            create: CreateGameUseCase::new(
                sync.clone(),
                Arc::new(RoomIdAllocator::with_seed(store, seed)),
                clock.clone(),
            ),
            join: JoinGameUseCase::new(sync.clone()),
            place: PlaceStoneUseCase::new(sync.clone()),
            restart: RestartGameUseCase::new(sync.clone(), clock),
            sync,
            updates: None,
            subscription: None,
        }
    }

    async fn watch(&mut self, room_id: &RoomId) {
        let (tx, rx) = mpsc::unbounded_channel();
        let subscription = self
            .sync
            .subscribe(room_id, move |update| {
                let _ = tx.send(update);
            })
            .await
            .unwrap();
        self.updates = Some(rx);
        self.subscription = Some(subscription);
    }

    async fn play(&self, room_id: &RoomId, row: usize, col: usize) -> Result<Outcome, GameError> {
        self.place.execute(room_id, &self.player, row, col).await
    }

    /// Wait for the first pushed update that matches `condition`
    async fn wait_until(&mut self, condition: impl Fn(&GameSession) -> bool) -> GameSession {
        let rx = self.updates.as_mut().expect("not watching");
        loop {
            let session = timeout(Duration::from_secs(1), rx.recv())
                .await
                .expect("timed out waiting for update")
                .expect("update channel closed")
                .unwrap();
            if condition(&session) {
                return session;
            }
        }
    }
}

fn stone_at(session: &GameSession, row: usize, col: usize) -> Cell {
    session.board().get(Position::new(row, col).unwrap())
}

#[tokio::test]
async fn test_black_wins_vertical_line() {
    // テスト項目: 作成 → 参加 → 黒が縦に 5 つ並べて勝つまでの一連の流れ
    // given (前提条件):
    let store: Arc<dyn GameStore> = Arc::new(InMemoryGameStore::new());
    let mut alice = TestClient::new(store.clone(), "alice", 1);
    let mut bob = TestClient::new(store.clone(), "bob", 2);

    let room_id = alice.create.execute(alice.player.clone()).await.unwrap();
    alice.watch(&room_id).await;
    alice
        .wait_until(|s| s.status() == GameStatus::Waiting)
        .await;

    // when (操作):
    // 白番不在のうちは着手できない
    assert_eq!(
        alice.play(&room_id, 9, 9).await,
        Err(GameError::IllegalState(GameStatus::Waiting))
    );
    let role = bob.join.execute(room_id.as_str(), &bob.player).await;
    assert_eq!(role, Ok(Stone::White));
    bob.watch(&room_id).await;

    assert_eq!(alice.play(&room_id, 9, 9).await, Ok(Outcome::Pending));
    assert_eq!(bob.play(&room_id, 9, 10).await, Ok(Outcome::Pending));
    let mut white_col = 0;
    for row in [8, 7, 6] {
        assert_eq!(alice.play(&room_id, row, 9).await, Ok(Outcome::Pending));
        assert_eq!(bob.play(&room_id, 0, white_col).await, Ok(Outcome::Pending));
        white_col += 2;
    }
    let winning = alice.play(&room_id, 5, 9).await;

    // then (期待する結果):
    assert_eq!(winning, Ok(Outcome::Winner(Stone::Black)));
    for client in [&mut alice, &mut bob] {
        let session = client
            .wait_until(|s| s.status() == GameStatus::Finished)
            .await;
        assert_eq!(session.status(), GameStatus::Finished);
        assert_eq!(session.outcome(), Outcome::Winner(Stone::Black));
        assert_eq!(stone_at(&session, 5, 9), Cell::Occupied(Stone::Black));
        assert_eq!(stone_at(&session, 9, 10), Cell::Occupied(Stone::White));
        assert_eq!(session.board().stone_count(), 9);
    }
    assert_eq!(
        bob.play(&room_id, 10, 10).await,
        Err(GameError::IllegalState(GameStatus::Finished))
    );
}

#[tokio::test]
async fn test_restart_after_black_win_gives_loser_first_move() {
    // テスト項目: 黒番勝利後の再開始で白番だったプレイヤーが黒番で先手になる
    // given (前提条件):
    let store: Arc<dyn GameStore> = Arc::new(InMemoryGameStore::new());
    let mut alice = TestClient::new(store.clone(), "alice", 3);
    let mut bob = TestClient::new(store.clone(), "bob", 4);
    let room_id = alice.create.execute(alice.player.clone()).await.unwrap();
    bob.join.execute(room_id.as_str(), &bob.player).await.unwrap();
    bob.watch(&room_id).await;
    for col in 0..4 {
        alice.play(&room_id, 3, col).await.unwrap();
        bob.play(&room_id, 4, col).await.unwrap();
    }
    alice.play(&room_id, 3, 4).await.unwrap();

    // when (操作): 白番は再開始できず、ホストは再開始できる
    let by_white = bob.restart.execute(&room_id, &bob.player).await;
    let by_host = alice.restart.execute(&room_id, &alice.player).await;

    // then (期待する結果):
    assert_eq!(by_white, Err(GameError::Forbidden));
    assert_eq!(by_host, Ok(()));
    let bob_id = bob.player.clone();
    let session = bob.wait_until(|s| s.black() == &bob_id).await;
    assert_eq!(session.black(), &bob.player);
    assert_eq!(session.white(), Some(&alice.player));
    assert_eq!(session.status(), GameStatus::Playing);
    assert_eq!(session.board().stone_count(), 0);
    assert_eq!(alice.play(&room_id, 9, 9).await, Err(GameError::NotYourTurn));
    assert_eq!(bob.play(&room_id, 9, 9).await, Ok(Outcome::Pending));
}

#[tokio::test]
async fn test_concurrent_joins_only_one_wins() {
    // テスト項目: 同じ状態から計算された 2 つの書き込みのうち、後の方は Conflict
    // given (前提条件): bob と carol が同じバージョンのドキュメントを読む
    let store: Arc<dyn GameStore> = Arc::new(InMemoryGameStore::new());
    let alice = TestClient::new(store.clone(), "alice", 5);
    let room_id = alice.create.execute(alice.player.clone()).await.unwrap();
    let sync = SyncAdapter::new(store.clone());
    let snapshot = sync.fetch(&room_id).await.unwrap();
    let mut seen_by_bob = snapshot.session.clone();
    let mut seen_by_carol = snapshot.session;
    let bob = PlayerId::new("bob".to_string()).unwrap();
    let carol = PlayerId::new("carol".to_string()).unwrap();
    let (_, bob_joins) = seen_by_bob.join(&bob).unwrap();
    let (_, carol_joins) = seen_by_carol.join(&carol).unwrap();

    // when (操作):
    let first = sync
        .publish(&room_id, snapshot.version, &bob_joins.unwrap())
        .await;
    let second = sync
        .publish(&room_id, snapshot.version, &carol_joins.unwrap())
        .await;

    // then (期待する結果): 先に書いた bob だけが着席し、carol は改めて参加しても満席
    assert!(first.is_ok());
    assert!(matches!(second, Err(GameError::Conflict(_))));
    let current = sync.fetch(&room_id).await.unwrap().session;
    assert_eq!(current.white(), Some(&bob));
    let retry = alice.join.execute(room_id.as_str(), &carol).await;
    assert_eq!(retry, Err(GameError::RoomFull));
}

#[tokio::test]
async fn test_leaving_stops_updates() {
    // テスト項目: 購読を解除したクライアントには以降の更新が届かない
    // given (前提条件):
    let store: Arc<dyn GameStore> = Arc::new(InMemoryGameStore::new());
    let mut alice = TestClient::new(store.clone(), "alice", 6);
    let bob = TestClient::new(store.clone(), "bob", 7);
    let room_id = alice.create.execute(alice.player.clone()).await.unwrap();
    alice.watch(&room_id).await;
    alice.wait_until(|_| true).await;

    // when (操作):
    if let Some(subscription) = alice.subscription.take() {
        subscription.unsubscribe().await;
    }
    bob.join.execute(room_id.as_str(), &bob.player).await.unwrap();

    // then (期待する結果):
    let rx = alice.updates.as_mut().unwrap();
    let closed = timeout(Duration::from_secs(1), rx.recv()).await.unwrap();
    assert!(closed.is_none());
}
