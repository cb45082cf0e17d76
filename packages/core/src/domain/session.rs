//! Game session state machine.
//!
//! `GameSession` is the authoritative state of one room. Every legal change
//! goes through one of its transition methods, which validate the request,
//! mutate the session and return the `Transition` describing exactly which
//! document fields changed. Nothing else decides legality.
//!
//! ```text
//! Waiting --join--> Playing --winning/filling move--> Finished
//!                      ^                                 |
//!                      +------------- restart -----------+
//! ```

use std::fmt;

use super::{Board, GameError, PlayerId, Position, RoomId, Stone, Timestamp, detect_win};

/// Lifecycle status of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    /// Created, second player not yet joined
    Waiting,
    /// Both seats filled, moves accepted
    Playing,
    /// Outcome decided
    Finished,
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::Waiting => f.write_str("waiting"),
            GameStatus::Playing => f.write_str("playing"),
            GameStatus::Finished => f.write_str("finished"),
        }
    }
}

/// Result of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Not decided yet
    Pending,
    Winner(Stone),
    /// Board filled without a winner
    Draw,
}

/// Document fields changed by a transition.
///
/// Each variant carries exactly the fields written to the shared store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// White seat taken, game started
    Joined { white: PlayerId, status: GameStatus },
    /// A stone was placed
    StonePlaced {
        board: Board,
        turn: Stone,
        outcome: Outcome,
        status: GameStatus,
    },
    /// Board cleared and seats possibly swapped
    Restarted {
        board: Board,
        black: PlayerId,
        white: Option<PlayerId>,
        turn: Stone,
        outcome: Outcome,
        status: GameStatus,
        created_at: Timestamp,
    },
}

/// Full state of one game room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSession {
    id: RoomId,
    board: Board,
    black: PlayerId,
    white: Option<PlayerId>,
    turn: Stone,
    outcome: Outcome,
    status: GameStatus,
    host: PlayerId,
    created_at: Timestamp,
}

impl GameSession {
    /// Start a new game. The creator takes black and becomes the host.
    pub fn create(id: RoomId, creator: PlayerId, created_at: Timestamp) -> Self {
        Self {
            id,
            board: Board::new(),
            black: creator.clone(),
            white: None,
            turn: Stone::Black,
            outcome: Outcome::Pending,
            status: GameStatus::Waiting,
            host: creator,
            created_at,
        }
    }

    /// Rebuild a session from a stored document.
    ///
    /// Rejects combinations the state machine can never produce.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn restore(
        id: RoomId,
        board: Board,
        black: PlayerId,
        white: Option<PlayerId>,
        turn: Stone,
        outcome: Outcome,
        status: GameStatus,
        host: PlayerId,
        created_at: Timestamp,
    ) -> Result<Self, GameError> {
        let consistent = match status {
            GameStatus::Waiting => white.is_none() && outcome == Outcome::Pending,
            GameStatus::Playing => white.is_some() && outcome == Outcome::Pending,
            GameStatus::Finished => white.is_some() && outcome != Outcome::Pending,
        };
        if !consistent {
            return Err(GameError::CorruptState(format!(
                "room {id}: status {status} is inconsistent with its seats or outcome"
            )));
        }
        Ok(Self {
            id,
            board,
            black,
            white,
            turn,
            outcome,
            status,
            host,
            created_at,
        })
    }

    pub fn id(&self) -> &RoomId {
        &self.id
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn black(&self) -> &PlayerId {
        &self.black
    }

    pub fn white(&self) -> Option<&PlayerId> {
        self.white.as_ref()
    }

    /// Role whose move it is
    pub fn turn(&self) -> Stone {
        self.turn
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Creator of the room; keeps restart authority across seat swaps
    pub fn host(&self) -> &PlayerId {
        &self.host
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Seat held by `player`, if any
    pub fn role_of(&self, player: &PlayerId) -> Option<Stone> {
        if &self.black == player {
            Some(Stone::Black)
        } else if self.white.as_ref() == Some(player) {
            Some(Stone::White)
        } else {
            None
        }
    }

    /// The player seated on `stone`, if any
    pub fn player_for(&self, stone: Stone) -> Option<&PlayerId> {
        match stone {
            Stone::Black => Some(&self.black),
            Stone::White => self.white.as_ref(),
        }
    }

    /// Take a seat in the room.
    ///
    /// Returns the joiner's role and, when a seat was actually assigned, the
    /// transition to publish. Rejoining participants get their existing role
    /// and no transition.
    pub fn join(&mut self, joiner: &PlayerId) -> Result<(Stone, Option<Transition>), GameError> {
        if let Some(stone) = self.role_of(joiner) {
            return Ok((stone, None));
        }
        if self.status != GameStatus::Waiting || self.white.is_some() {
            return Err(GameError::RoomFull);
        }

        self.white = Some(joiner.clone());
        self.status = GameStatus::Playing;
        Ok((
            Stone::White,
            Some(Transition::Joined {
                white: joiner.clone(),
                status: self.status,
            }),
        ))
    }

    /// Place the current player's stone at `(row, col)`.
    ///
    /// A line of five finishes the game for the mover. Filling the last empty
    /// cell without a line finishes it as a draw. Otherwise the turn passes.
    pub fn place_stone(
        &mut self,
        actor: &PlayerId,
        row: usize,
        col: usize,
    ) -> Result<Transition, GameError> {
        if self.status != GameStatus::Playing {
            return Err(GameError::IllegalState(self.status));
        }
        if self.player_for(self.turn) != Some(actor) {
            return Err(GameError::NotYourTurn);
        }
        let position = Position::new(row, col)?;
        self.board.place(position, self.turn)?;

        if let Some(winner) = detect_win(&self.board, position, self.turn) {
            self.outcome = Outcome::Winner(winner);
            self.status = GameStatus::Finished;
        } else if self.board.is_full() {
            self.outcome = Outcome::Draw;
            self.status = GameStatus::Finished;
        } else {
            self.turn = self.turn.opponent();
        }

        Ok(Transition::StonePlaced {
            board: self.board.clone(),
            turn: self.turn,
            outcome: self.outcome,
            status: self.status,
        })
    }

    /// Clear the board and start the next game.
    ///
    /// Only the host or the current black player may restart. The loser of
    /// the previous game plays black and moves first, so after a black win
    /// the seats swap. After a white win or a draw the seats stay.
    pub fn restart(&mut self, requester: &PlayerId, now: Timestamp) -> Result<Transition, GameError> {
        if &self.host != requester && &self.black != requester {
            return Err(GameError::Forbidden);
        }
        if self.status == GameStatus::Waiting {
            return Err(GameError::IllegalState(self.status));
        }

        if self.outcome == Outcome::Winner(Stone::Black)
            && let Some(white) = self.white.take()
        {
            self.white = Some(std::mem::replace(&mut self.black, white));
        }
        self.board = Board::new();
        self.turn = Stone::Black;
        self.outcome = Outcome::Pending;
        self.status = GameStatus::Playing;
        self.created_at = now;

        Ok(Transition::Restarted {
            board: self.board.clone(),
            black: self.black.clone(),
            white: self.white.clone(),
            turn: self.turn,
            outcome: self.outcome,
            status: self.status,
            created_at: self.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BOARD_SIZE, Cell};

    fn player(name: &str) -> PlayerId {
        PlayerId::new(name.to_string()).unwrap()
    }

    fn waiting_session() -> GameSession {
        GameSession::create(
            RoomId::new("1234".to_string()).unwrap(),
            player("alice"),
            Timestamp::new(1000),
        )
    }

    fn playing_session() -> GameSession {
        let mut session = waiting_session();
        session.join(&player("bob")).unwrap();
        session
    }

    /// alice (black) builds a column at col 9, bob answers at col 0.
    fn black_wins(session: &mut GameSession) {
        for row in 5..9 {
            session.place_stone(&player("alice"), row, 9).unwrap();
            session.place_stone(&player("bob"), row, 0).unwrap();
        }
        session.place_stone(&player("alice"), 9, 9).unwrap();
    }

    #[test]
    fn test_create_initial_state() {
        // テスト項目: 作成直後のセッションは待機中で、作成者が黒かつホスト
        // given (前提条件):

        // when (操作):
        let session = waiting_session();

        // then (期待する結果):
        assert_eq!(session.status(), GameStatus::Waiting);
        assert_eq!(session.outcome(), Outcome::Pending);
        assert_eq!(session.turn(), Stone::Black);
        assert_eq!(session.black(), &player("alice"));
        assert_eq!(session.host(), &player("alice"));
        assert_eq!(session.white(), None);
        assert_eq!(session.board().stone_count(), 0);
    }

    #[test]
    fn test_join_assigns_white_and_starts_game() {
        // テスト項目: 2 人目の参加で白が割り当てられ、対局が始まる
        // given (前提条件):
        let mut session = waiting_session();

        // when (操作):
        let (stone, transition) = session.join(&player("bob")).unwrap();

        // then (期待する結果):
        assert_eq!(stone, Stone::White);
        assert_eq!(
            transition,
            Some(Transition::Joined {
                white: player("bob"),
                status: GameStatus::Playing
            })
        );
        assert_eq!(session.status(), GameStatus::Playing);
        assert_eq!(session.white(), Some(&player("bob")));
    }

    #[test]
    fn test_join_by_creator_is_noop() {
        // テスト項目: 作成者自身の参加は何も変更しない
        // given (前提条件):
        let mut session = waiting_session();

        // when (操作):
        let (stone, transition) = session.join(&player("alice")).unwrap();

        // then (期待する結果):
        assert_eq!(stone, Stone::Black);
        assert_eq!(transition, None);
        assert_eq!(session.status(), GameStatus::Waiting);
    }

    #[test]
    fn test_rejoin_is_idempotent() {
        // テスト項目: 既存の参加者の再参加は冪等で、席は変わらない
        // given (前提条件):
        let mut session = playing_session();
        let before = session.clone();

        // when (操作):
        let first = session.join(&player("bob")).unwrap();
        let second = session.join(&player("bob")).unwrap();

        // then (期待する結果):
        assert_eq!(first, (Stone::White, None));
        assert_eq!(second, (Stone::White, None));
        assert_eq!(session, before);
    }

    #[test]
    fn test_join_full_room_fails() {
        // テスト項目: 満席のルームへの第三者の参加は RoomFull になる
        // given (前提条件):
        let mut playing = playing_session();
        let mut finished = playing_session();
        black_wins(&mut finished);

        // when (操作):
        let on_playing = playing.join(&player("carol"));
        let on_finished = finished.join(&player("carol"));

        // then (期待する結果):
        assert_eq!(on_playing, Err(GameError::RoomFull));
        assert_eq!(on_finished, Err(GameError::RoomFull));
    }

    #[test]
    fn test_move_before_opponent_joins_fails() {
        // テスト項目: 待機中の着手は IllegalState になる
        // given (前提条件):
        let mut session = waiting_session();

        // when (操作):
        let result = session.place_stone(&player("alice"), 9, 9);

        // then (期待する結果):
        assert_eq!(result, Err(GameError::IllegalState(GameStatus::Waiting)));
    }

    #[test]
    fn test_move_flips_turn() {
        // テスト項目: 着手すると石が置かれ手番が交代する
        // given (前提条件):
        let mut session = playing_session();

        // when (操作):
        let transition = session.place_stone(&player("alice"), 9, 9).unwrap();

        // then (期待する結果):
        assert_eq!(session.turn(), Stone::White);
        assert_eq!(session.status(), GameStatus::Playing);
        let position = Position::new(9, 9).unwrap();
        assert_eq!(session.board().get(position), Cell::Occupied(Stone::Black));
        assert!(matches!(
            transition,
            Transition::StonePlaced {
                turn: Stone::White,
                outcome: Outcome::Pending,
                status: GameStatus::Playing,
                ..
            }
        ));
    }

    #[test]
    fn test_move_out_of_turn_fails() {
        // テスト項目: 手番でないプレイヤーや部外者の着手は NotYourTurn になる
        // given (前提条件):
        let mut session = playing_session();

        // when (操作):
        let by_white = session.place_stone(&player("bob"), 9, 9);
        let by_stranger = session.place_stone(&player("carol"), 9, 9);

        // then (期待する結果):
        assert_eq!(by_white, Err(GameError::NotYourTurn));
        assert_eq!(by_stranger, Err(GameError::NotYourTurn));
        assert_eq!(session.board().stone_count(), 0);
    }

    #[test]
    fn test_move_on_occupied_cell_fails() {
        // テスト項目: 石のあるマスへの着手は CellOccupied になり、手番は変わらない
        // given (前提条件):
        let mut session = playing_session();
        session.place_stone(&player("alice"), 9, 9).unwrap();

        // when (操作):
        let result = session.place_stone(&player("bob"), 9, 9);

        // then (期待する結果):
        assert_eq!(result, Err(GameError::CellOccupied { row: 9, col: 9 }));
        assert_eq!(session.turn(), Stone::White);
    }

    #[test]
    fn test_move_out_of_bounds_fails() {
        // テスト項目: 盤面外への着手は OutOfBounds になる
        // given (前提条件):
        let mut session = playing_session();

        // when (操作):
        let bad_row = session.place_stone(&player("alice"), BOARD_SIZE, 0);
        let bad_col = session.place_stone(&player("alice"), 0, 42);

        // then (期待する結果):
        assert_eq!(bad_row, Err(GameError::OutOfBounds { row: 19, col: 0 }));
        assert_eq!(bad_col, Err(GameError::OutOfBounds { row: 0, col: 42 }));
        assert_eq!(session.turn(), Stone::Black);
    }

    #[test]
    fn test_winning_move_finishes_game() {
        // テスト項目: 5 連を作る着手で対局が終了し、以降の着手は IllegalState になる
        // given (前提条件):
        let mut session = playing_session();

        // when (操作):
        black_wins(&mut session);

        // then (期待する結果):
        assert_eq!(session.outcome(), Outcome::Winner(Stone::Black));
        assert_eq!(session.status(), GameStatus::Finished);
        assert_eq!(
            session.place_stone(&player("bob"), 0, 18),
            Err(GameError::IllegalState(GameStatus::Finished))
        );
    }

    #[test]
    fn test_filling_board_is_draw() {
        // テスト項目: 勝者なしで最後の空きマスが埋まると引き分けで終了する
        // given (前提条件): (18, 18) 以外が埋まった盤面。(18, 18) に黒を置いても 5 連にならない
        let mut session = playing_session();
        let mut cells = [[Cell::Empty; BOARD_SIZE]; BOARD_SIZE];
        for (row, line) in cells.iter_mut().enumerate() {
            for (col, cell) in line.iter_mut().enumerate() {
                // 2 列ごと・行ごとにずらした縞模様は 5 連を作らない
                let stone = if ((col / 2) + row) % 2 == 0 {
                    Stone::Black
                } else {
                    Stone::White
                };
                *cell = Cell::Occupied(stone);
            }
        }
        cells[18][18] = Cell::Empty;
        session.board = Board::from_cells(cells);

        // when (操作):
        let transition = session.place_stone(&player("alice"), 18, 18).unwrap();

        // then (期待する結果):
        assert_eq!(session.outcome(), Outcome::Draw);
        assert_eq!(session.status(), GameStatus::Finished);
        assert!(matches!(
            transition,
            Transition::StonePlaced {
                outcome: Outcome::Draw,
                status: GameStatus::Finished,
                ..
            }
        ));
    }

    #[test]
    fn test_restart_after_draw_keeps_seats() {
        // テスト項目: 白の着手で引き分けになった後の再開では、席はそのままで黒が先手になる
        // given (前提条件): (18, 18) だけが空いた 5 連のない盤面で、白の手番
        let mut session = playing_session();
        let mut cells = [[Cell::Empty; BOARD_SIZE]; BOARD_SIZE];
        for (row, line) in cells.iter_mut().enumerate() {
            for (col, cell) in line.iter_mut().enumerate() {
                let stone = if ((col / 2) + row) % 2 == 0 {
                    Stone::Black
                } else {
                    Stone::White
                };
                *cell = Cell::Occupied(stone);
            }
        }
        cells[18][18] = Cell::Empty;
        session.board = Board::from_cells(cells);
        session.turn = Stone::White;
        session.place_stone(&player("bob"), 18, 18).unwrap();
        assert_eq!(session.outcome(), Outcome::Draw);
        assert_eq!(session.turn(), Stone::White);

        // when (操作):
        let transition = session.restart(&player("alice"), Timestamp::new(2000));

        // then (期待する結果):
        assert!(transition.is_ok());
        assert_eq!(session.black(), &player("alice"));
        assert_eq!(session.white(), Some(&player("bob")));
        assert_eq!(session.turn(), Stone::Black);
        assert_eq!(session.status(), GameStatus::Playing);
        assert_eq!(session.outcome(), Outcome::Pending);
        assert_eq!(session.board().stone_count(), 0);
    }

    #[test]
    fn test_restart_after_black_win_swaps_seats() {
        // テスト項目: 黒の勝利後の再開では、元の白が黒になり先手を打つ
        // given (前提条件):
        let mut session = playing_session();
        black_wins(&mut session);

        // when (操作):
        session
            .restart(&player("alice"), Timestamp::new(2000))
            .unwrap();

        // then (期待する結果):
        assert_eq!(session.black(), &player("bob"));
        assert_eq!(session.white(), Some(&player("alice")));
        assert_eq!(session.turn(), Stone::Black);
        assert_eq!(session.status(), GameStatus::Playing);
        assert_eq!(session.outcome(), Outcome::Pending);
        assert_eq!(session.board().stone_count(), 0);
        assert_eq!(session.created_at(), Timestamp::new(2000));
        assert!(session.place_stone(&player("bob"), 9, 9).is_ok());
    }

    #[test]
    fn test_restart_after_white_win_keeps_seats() {
        // テスト項目: 白の勝利後の再開では席は変わらず、黒 (敗者) が先手
        // given (前提条件):
        let mut session = playing_session();
        session.place_stone(&player("alice"), 0, 18).unwrap();
        for row in 5..9 {
            session.place_stone(&player("bob"), row, 9).unwrap();
            session.place_stone(&player("alice"), row, 0).unwrap();
        }
        session.place_stone(&player("bob"), 9, 9).unwrap();
        assert_eq!(session.outcome(), Outcome::Winner(Stone::White));

        // when (操作):
        session
            .restart(&player("alice"), Timestamp::new(2000))
            .unwrap();

        // then (期待する結果):
        assert_eq!(session.black(), &player("alice"));
        assert_eq!(session.white(), Some(&player("bob")));
        assert_eq!(session.turn(), Stone::Black);
    }

    #[test]
    fn test_host_keeps_restart_authority_after_swap() {
        // テスト項目: 席が入れ替わった後もホストは再開でき、現在の黒も再開できる
        // given (前提条件):
        let mut session = playing_session();
        black_wins(&mut session);
        session.restart(&player("alice"), Timestamp::new(2000)).unwrap();

        // when (操作):
        let by_host = session.restart(&player("alice"), Timestamp::new(3000));
        let by_black = session.restart(&player("bob"), Timestamp::new(4000));

        // then (期待する結果):
        assert_eq!(session.black(), &player("bob"));
        assert!(by_host.is_ok());
        assert!(by_black.is_ok());
    }

    #[test]
    fn test_restart_by_non_host_fails() {
        // テスト項目: ホストでも黒でもないプレイヤーの再開は Forbidden になる
        // given (前提条件):
        let mut session = playing_session();
        black_wins(&mut session);
        let before = session.clone();

        // when (操作):
        let by_white = session.restart(&player("bob"), Timestamp::new(2000));
        let by_stranger = session.restart(&player("carol"), Timestamp::new(2000));

        // then (期待する結果):
        assert_eq!(by_white, Err(GameError::Forbidden));
        assert_eq!(by_stranger, Err(GameError::Forbidden));
        assert_eq!(session, before);
    }

    #[test]
    fn test_restart_while_waiting_fails() {
        // テスト項目: 相手が未参加の状態での再開は IllegalState になる
        // given (前提条件):
        let mut session = waiting_session();

        // when (操作):
        let result = session.restart(&player("alice"), Timestamp::new(2000));

        // then (期待する結果):
        assert_eq!(result, Err(GameError::IllegalState(GameStatus::Waiting)));
    }

    #[test]
    fn test_restore_rejects_inconsistent_state() {
        // テスト項目: 状態と席・結果が矛盾するドキュメントは CorruptState になる
        // given (前提条件):
        let id = RoomId::new("1234".to_string()).unwrap();

        // when (操作):
        let result = GameSession::restore(
            id,
            Board::new(),
            player("alice"),
            None,
            Stone::Black,
            Outcome::Pending,
            GameStatus::Playing,
            player("alice"),
            Timestamp::new(1000),
        );

        // then (期待する結果):
        assert!(matches!(result, Err(GameError::CorruptState(_))));
    }
}
