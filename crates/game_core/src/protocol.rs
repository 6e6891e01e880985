//! JSON messages exchanged between clients and the relay.
//!
//! Every message is an object tagged by `"type"` with camelCase fields.
//! `Action`s are posted by clients and answered synchronously with a `Reply`;
//! `Push`es are queued by the relay for a player and drained by polling.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::board::Board;
use crate::executor::Applied;
use crate::types::*;

pub const NAME_MIN_LEN: usize = 2;
pub const NAME_MAX_LEN: usize = 12;

/// Input problems caught before anything is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("name must be at least {} characters", NAME_MIN_LEN)]
    NameTooShort,
    #[error("name must be at most {} characters", NAME_MAX_LEN)]
    NameTooLong,
    #[error("room code must be exactly 5 digits, got {0:?}")]
    MalformedRoomCode(String),
}

/// Trimmed display name, checked against the length limits.
pub fn validate_name(raw: &str) -> Result<String, ValidationError> {
    let name = raw.trim();
    let len = name.chars().count();
    if len < NAME_MIN_LEN {
        return Err(ValidationError::NameTooShort);
    }
    if len > NAME_MAX_LEN {
        return Err(ValidationError::NameTooLong);
    }
    Ok(name.to_string())
}

/// Exactly five ASCII digits, 10000..=99999.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoomCode(String);

impl RoomCode {
    pub const MIN: u32 = 10_000;
    pub const MAX: u32 = 99_999;

    pub fn from_number(n: u32) -> Option<Self> {
        (Self::MIN..=Self::MAX)
            .contains(&n)
            .then(|| RoomCode(n.to_string()))
    }

    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let code = raw.trim();
        let valid = code.len() == 5
            && code.bytes().all(|b| b.is_ascii_digit())
            && !code.starts_with('0');
        if valid {
            Ok(RoomCode(code.to_string()))
        } else {
            Err(ValidationError::MalformedRoomCode(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RoomCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        RoomCode::parse(&value)
    }
}

impl From<RoomCode> for String {
    fn from(code: RoomCode) -> Self {
        code.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque client-generated identity, stable for one client session.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        PlayerId(id.into())
    }

    pub fn generate() -> Self {
        PlayerId(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which seat of a room a player holds. The host plays the game's first
/// color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Host,
    Guest,
}

impl Role {
    pub fn other(self) -> Role {
        match self {
            Role::Host => Role::Guest,
            Role::Guest => Role::Host,
        }
    }

    pub fn color(self, game: GameKind) -> Color {
        let first = game.rules().first_player();
        match self {
            Role::Host => first,
            Role::Guest => first.other(),
        }
    }
}

/// Machine-readable rejection reasons.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    RoomNotFound,
    RoomFull,
    NotHost,
    NoGuest,
    NotInRoom,
    GameNotStarted,
    InvalidRequest,
}

impl ErrorCode {
    pub fn default_message(self) -> &'static str {
        match self {
            ErrorCode::RoomNotFound => "room not found",
            ErrorCode::RoomFull => "room full",
            ErrorCode::NotHost => "only the host can do that",
            ErrorCode::NoGuest => "no opponent has joined yet",
            ErrorCode::NotInRoom => "you are not in this room",
            ErrorCode::GameNotStarted => "the game has not started",
            ErrorCode::InvalidRequest => "invalid request",
        }
    }
}

/// A move as sent to the opponent. Carries the full board so the receiver
/// replaces its own copy instead of replaying the move.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveMessage {
    pub room_code: RoomCode,
    pub player_id: PlayerId,
    /// Absent for omok placements.
    pub from_row: Option<u8>,
    pub from_col: Option<u8>,
    pub to_row: u8,
    pub to_col: u8,
    pub captured_piece: Option<Piece>,
    pub next_player: Color,
    pub winner: Option<Color>,
    pub board: Board,
}

impl MoveMessage {
    pub fn new(
        room_code: RoomCode,
        player_id: PlayerId,
        mv: Move,
        mover: Color,
        applied: &Applied,
    ) -> Self {
        let from = mv.from();
        let to = mv.to();
        Self {
            room_code,
            player_id,
            from_row: from.map(|sq| sq.row),
            from_col: from.map(|sq| sq.col),
            to_row: to.row,
            to_col: to.col,
            captured_piece: applied.captured,
            next_player: mover.other(),
            winner: applied.result.winner(),
            board: applied.board.clone(),
        }
    }

    pub fn mv(&self) -> Move {
        let to = Square::new(self.to_row, self.to_col);
        match (self.from_row, self.from_col) {
            (Some(r), Some(c)) => Move::step(Square::new(r, c), to),
            _ => Move::place(to),
        }
    }

    pub fn result(&self) -> GameResult {
        match self.winner {
            Some(c) => GameResult::Won(c),
            None => GameResult::InProgress,
        }
    }
}

/// Client -> relay.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum Action {
    CreateRoom {
        host_name: String,
        player_id: PlayerId,
        game: GameKind,
    },
    JoinRoom {
        room_code: RoomCode,
        guest_name: String,
        player_id: PlayerId,
    },
    StartGame {
        room_code: RoomCode,
        player_id: PlayerId,
    },
    GameMove(MoveMessage),
    ResetGame {
        room_code: RoomCode,
        player_id: PlayerId,
    },
    LeaveRoom {
        room_code: RoomCode,
        player_id: PlayerId,
    },
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::CreateRoom { .. } => "create_room",
            Action::JoinRoom { .. } => "join_room",
            Action::StartGame { .. } => "start_game",
            Action::GameMove(_) => "game_move",
            Action::ResetGame { .. } => "reset_game",
            Action::LeaveRoom { .. } => "leave_room",
        }
    }
}

/// Relay -> client, synchronous answer to an `Action`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum Reply {
    RoomCreated {
        room_code: RoomCode,
        host_name: String,
        game: GameKind,
    },
    /// Also returned when a participant rejoins its own slot; `role` then
    /// tells which one, and `board`, `current_player` and `winner` carry the
    /// stored snapshot.
    RoomJoined {
        room_code: RoomCode,
        role: Role,
        host_name: String,
        guest_name: Option<String>,
        game: GameKind,
        started: bool,
        board: Option<Board>,
        current_player: Option<Color>,
        winner: Option<Color>,
    },
    GameStart {
        room_code: RoomCode,
    },
    Accepted,
    Error {
        code: ErrorCode,
        message: String,
    },
}

impl Reply {
    pub fn error(code: ErrorCode) -> Self {
        Reply::Error {
            code,
            message: code.default_message().to_string(),
        }
    }
}

/// Relay -> client, queued until the next poll.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum Push {
    PlayerJoined { guest_name: String },
    GameStart { room_code: RoomCode },
    GameMove(MoveMessage),
    GameReset { room_code: RoomCode },
    /// The guest left; its seat is free and the game is back to unstarted.
    GuestLeft { name: String },
    PeerDisconnected { name: String },
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod protocol_tests;
