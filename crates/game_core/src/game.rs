//! The single active game record: board, whose turn it is, captures, last
//! move and result.

use thiserror::Error;

use crate::board::Board;
use crate::executor::{apply_move, Applied};
use crate::ledger::CapturedLedger;
use crate::rules::{legal_destinations, Rules};
use crate::types::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("the game is already over")]
    GameOver,
    #[error("illegal move {0}")]
    Illegal(Move),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    kind: GameKind,
    board: Board,
    current: Color,
    ledger: CapturedLedger,
    last_move: Option<Move>,
    result: GameResult,
}

impl Game {
    pub fn new(kind: GameKind) -> Self {
        let rules = kind.rules();
        Self {
            kind,
            board: rules.initial_board(),
            current: rules.first_player(),
            ledger: CapturedLedger::new(),
            last_move: None,
            result: GameResult::InProgress,
        }
    }

    /// Start from an arbitrary position.
    pub fn from_board(kind: GameKind, board: Board, current: Color) -> Self {
        Self {
            board,
            current,
            ..Self::new(kind)
        }
    }

    pub fn kind(&self) -> GameKind {
        self.kind
    }

    pub fn rules(&self) -> &'static dyn Rules {
        self.kind.rules()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_player(&self) -> Color {
        self.current
    }

    pub fn ledger(&self) -> &CapturedLedger {
        &self.ledger
    }

    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    pub fn result(&self) -> GameResult {
        self.result
    }

    pub fn is_legal(&self, mv: Move) -> bool {
        !self.result.ended() && self.rules().is_legal(&self.board, mv, self.current)
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        if self.result.ended() {
            return Vec::new();
        }
        self.rules().legal_moves(&self.board, self.current)
    }

    /// Destinations the current player's piece on `from` may reach.
    pub fn legal_destinations(&self, from: Square) -> Vec<Square> {
        match self.board.get(from) {
            Some(pc) if pc.color == self.current && !self.result.ended() => {
                legal_destinations(self.kind, &self.board, from)
            }
            _ => Vec::new(),
        }
    }

    /// Validate and apply a move for the current player, then hand the turn
    /// to the other side.
    pub fn play(&mut self, mv: Move) -> Result<Applied, MoveError> {
        if self.result.ended() {
            return Err(MoveError::GameOver);
        }
        if !self.rules().is_legal(&self.board, mv, self.current) {
            return Err(MoveError::Illegal(mv));
        }
        let mover = self.current;
        let applied = apply_move(self.rules(), &self.board, mv, mover);
        if let Some(pc) = applied.captured {
            self.ledger.record(mover, pc);
        }
        self.board = applied.board.clone();
        self.last_move = Some(mv);
        self.result = applied.result;
        self.current = mover.other();
        Ok(applied)
    }

    /// Replace local state with an authoritative update from the peer. A
    /// capture is credited to the side that moved, i.e. not `next_player`.
    pub fn mirror(
        &mut self,
        board: Board,
        next_player: Color,
        last_move: Option<Move>,
        captured: Option<Piece>,
        result: GameResult,
    ) {
        if let Some(pc) = captured {
            self.ledger.record(next_player.other(), pc);
        }
        self.board = board;
        self.current = next_player;
        self.last_move = last_move;
        self.result = result;
    }

    pub fn reset(&mut self) {
        *self = Game::new(self.kind);
    }
}

#[cfg(test)]
#[path = "game_tests.rs"]
mod game_tests;
