use game_core::{MoveError, ValidationError};
use thiserror::Error;

use crate::session::SessionState;

/// Why a session operation was refused. None of these change session state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("not available while {0}")]
    WrongState(SessionState),
    #[error("only the host can do that")]
    NotHost,
    #[error("no opponent has joined yet")]
    NoOpponent,
    #[error("it is not your turn")]
    NotYourTurn,
    #[error("a move is already being sent")]
    MovePending,
    #[error(transparent)]
    Move(#[from] MoveError),
}
