//! Conversion logic between DTOs and domain entities.

use serde_json::{Value, json};

use crate::domain::{
    BOARD_SIZE, Board, Cell, FieldPatch, GameError, GameSession, GameStatus, Outcome, PlayerId,
    RoomId, Stone, Timestamp, Transition,
};
use crate::infrastructure::dto::document::{
    BoardGrid, GameDocument, GameStatusDto, PlayersDocument, StoneSymbol, field,
};

// ========================================
// Value conversions
// ========================================

impl From<Stone> for StoneSymbol {
    fn from(stone: Stone) -> Self {
        match stone {
            Stone::Black => StoneSymbol::Black,
            Stone::White => StoneSymbol::White,
        }
    }
}

impl From<StoneSymbol> for Stone {
    fn from(symbol: StoneSymbol) -> Self {
        match symbol {
            StoneSymbol::Black => Stone::Black,
            StoneSymbol::White => Stone::White,
        }
    }
}

impl From<GameStatus> for GameStatusDto {
    fn from(status: GameStatus) -> Self {
        match status {
            GameStatus::Waiting => GameStatusDto::Waiting,
            GameStatus::Playing => GameStatusDto::Playing,
            GameStatus::Finished => GameStatusDto::Finished,
        }
    }
}

impl From<GameStatusDto> for GameStatus {
    fn from(status: GameStatusDto) -> Self {
        match status {
            GameStatusDto::Waiting => GameStatus::Waiting,
            GameStatusDto::Playing => GameStatus::Playing,
            GameStatusDto::Finished => GameStatus::Finished,
        }
    }
}

fn corrupt(reason: impl std::fmt::Display) -> GameError {
    GameError::CorruptState(reason.to_string())
}

// ========================================
// Board <-> string
// ========================================

/// Serialize the board to its transportable string form.
pub fn encode_board(board: &Board) -> Result<String, GameError> {
    let grid: BoardGrid = board
        .rows()
        .map(|row| {
            row.iter()
                .map(|cell| match cell {
                    Cell::Empty => None,
                    Cell::Occupied(stone) => Some(StoneSymbol::from(*stone)),
                })
                .collect()
        })
        .collect();
    serde_json::to_string(&grid).map_err(corrupt)
}

/// Parse the board string, requiring exactly 19x19 cells.
pub fn decode_board(encoded: &str) -> Result<Board, GameError> {
    let grid: BoardGrid = serde_json::from_str(encoded).map_err(corrupt)?;
    if grid.len() != BOARD_SIZE {
        return Err(corrupt(format!("board has {} rows", grid.len())));
    }

    let mut cells = [[Cell::Empty; BOARD_SIZE]; BOARD_SIZE];
    for (row_index, row) in grid.into_iter().enumerate() {
        if row.len() != BOARD_SIZE {
            return Err(corrupt(format!(
                "board row {} has {} cells",
                row_index,
                row.len()
            )));
        }
        for (col_index, symbol) in row.into_iter().enumerate() {
            if let Some(symbol) = symbol {
                cells[row_index][col_index] = Cell::Occupied(symbol.into());
            }
        }
    }
    Ok(Board::from_cells(cells))
}

// ========================================
// Outcome <-> (winner, gameStatus)
// ========================================

fn winner_of(outcome: Outcome) -> Option<StoneSymbol> {
    match outcome {
        Outcome::Winner(stone) => Some(stone.into()),
        Outcome::Pending | Outcome::Draw => None,
    }
}

fn outcome_of(status: GameStatus, winner: Option<StoneSymbol>) -> Result<Outcome, GameError> {
    match (status, winner) {
        (GameStatus::Finished, Some(symbol)) => Ok(Outcome::Winner(symbol.into())),
        (GameStatus::Finished, None) => Ok(Outcome::Draw),
        (_, None) => Ok(Outcome::Pending),
        (status, Some(_)) => Err(corrupt(format!("winner recorded while {status}"))),
    }
}

// ========================================
// Domain Entity -> DTO
// ========================================

impl TryFrom<&GameSession> for GameDocument {
    type Error = GameError;

    fn try_from(session: &GameSession) -> Result<Self, Self::Error> {
        Ok(Self {
            board: encode_board(session.board())?,
            current_player: session.turn().into(),
            players: PlayersDocument {
                black: Some(session.black().as_str().to_string()),
                white: session.white().map(|id| id.as_str().to_string()),
            },
            winner: winner_of(session.outcome()),
            game_status: session.status().into(),
            created_at: session.created_at().value(),
            host: Some(session.host().as_str().to_string()),
        })
    }
}

/// Serialize a session as a complete document body.
pub fn encode_session(session: &GameSession) -> Result<String, GameError> {
    let document = GameDocument::try_from(session)?;
    serde_json::to_string(&document).map_err(corrupt)
}

// ========================================
// DTO -> Domain Entity
// ========================================

fn player_id(raw: String) -> Result<PlayerId, GameError> {
    PlayerId::new(raw).map_err(corrupt)
}

impl GameDocument {
    /// Convert into the domain model. The room id is the document key and
    /// is not part of the body.
    pub fn into_session(self, room_id: RoomId) -> Result<GameSession, GameError> {
        let board = decode_board(&self.board)?;
        let black = self
            .players
            .black
            .ok_or_else(|| corrupt("black seat is empty"))
            .and_then(player_id)?;
        let white = self.players.white.map(player_id).transpose()?;
        let host = match self.host {
            Some(host) => player_id(host)?,
            None => black.clone(),
        };
        let status = GameStatus::from(self.game_status);
        let outcome = outcome_of(status, self.winner)?;

        GameSession::restore(
            room_id,
            board,
            black,
            white,
            self.current_player.into(),
            outcome,
            status,
            host,
            Timestamp::new(self.created_at),
        )
    }
}

/// Parse a raw document body pushed or read from the store.
pub fn decode_session(room_id: &RoomId, body: &str) -> Result<GameSession, GameError> {
    let document: GameDocument = serde_json::from_str(body).map_err(corrupt)?;
    document.into_session(room_id.clone())
}

// ========================================
// Transition -> field patch
// ========================================

fn player_value(player: Option<&PlayerId>) -> Value {
    player.map_or(Value::Null, |id| Value::String(id.as_str().to_string()))
}

/// Field-level update that applies `transition` to the stored document.
pub fn transition_patch(transition: &Transition) -> Result<FieldPatch, GameError> {
    let mut patch = FieldPatch::new();
    match transition {
        Transition::Joined { white, status } => {
            patch.insert(field::PLAYER_WHITE.into(), player_value(Some(white)));
            patch.insert(field::GAME_STATUS.into(), json!(GameStatusDto::from(*status)));
        }
        Transition::StonePlaced {
            board,
            turn,
            outcome,
            status,
        } => {
            patch.insert(field::BOARD.into(), Value::String(encode_board(board)?));
            patch.insert(field::CURRENT_PLAYER.into(), json!(StoneSymbol::from(*turn)));
            patch.insert(field::WINNER.into(), json!(winner_of(*outcome)));
            patch.insert(field::GAME_STATUS.into(), json!(GameStatusDto::from(*status)));
        }
        Transition::Restarted {
            board,
            black,
            white,
            turn,
            outcome,
            status,
            created_at,
        } => {
            patch.insert(field::BOARD.into(), Value::String(encode_board(board)?));
            patch.insert(
                field::PLAYERS.into(),
                json!({ "B": player_value(Some(black)), "W": player_value(white.as_ref()) }),
            );
            patch.insert(field::CURRENT_PLAYER.into(), json!(StoneSymbol::from(*turn)));
            patch.insert(field::WINNER.into(), json!(winner_of(*outcome)));
            patch.insert(field::GAME_STATUS.into(), json!(GameStatusDto::from(*status)));
            patch.insert(field::CREATED_AT.into(), json!(created_at.value()));
        }
    }
    Ok(patch)
}
