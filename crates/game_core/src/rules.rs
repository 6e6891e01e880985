//! Move legality shared by every game.
//!
//! Each [`GameKind`] has one static [`Rules`] strategy. Step games (chess,
//! janggi) only implement [`Rules::piece_can_move`]; the universal
//! preconditions and move enumeration live here.

use crate::board::Board;
use crate::types::*;

pub trait Rules: Send + Sync {
    fn kind(&self) -> GameKind;

    /// (rows, cols)
    fn dimensions(&self) -> (u8, u8);

    /// Color that moves first.
    fn first_player(&self) -> Color;

    fn initial_board(&self) -> Board;

    /// Piece-specific movement rule. Called only after the universal
    /// preconditions hold, so `to` is on the board, differs from `from`, and
    /// does not hold a piece of `piece.color`.
    fn piece_can_move(&self, board: &Board, piece: Piece, from: Square, to: Square) -> bool;

    /// Outcome after `mv` has been applied to `board`.
    fn outcome(&self, board: &Board, mv: Move, mover: Color, captured: Option<Piece>)
        -> GameResult;

    /// Pure legality check. Never mutates the board.
    fn is_legal(&self, board: &Board, mv: Move, mover: Color) -> bool {
        match mv {
            Move::Step { from, to } => {
                let piece = match step_preconditions(board, from, to, mover) {
                    Some(p) => p,
                    None => return false,
                };
                self.piece_can_move(board, piece, from, to)
            }
            Move::Place { .. } => false,
        }
    }

    /// All legal moves for `color`: row-major over sources, then row-major
    /// over destinations.
    fn legal_moves(&self, board: &Board, color: Color) -> Vec<Move> {
        let mut out = Vec::new();
        for (from, piece) in board.occupied() {
            if piece.color != color {
                continue;
            }
            for to in board.squares() {
                let mv = Move::step(from, to);
                if self.is_legal(board, mv, color) {
                    out.push(mv);
                }
            }
        }
        out
    }
}

/// Checks shared by every step game; returns the moving piece when they hold.
fn step_preconditions(board: &Board, from: Square, to: Square, mover: Color) -> Option<Piece> {
    if !board.contains(to) || from == to {
        return None;
    }
    let piece = board.get(from)?;
    if piece.color != mover {
        return None;
    }
    if let Some(target) = board.get(to) {
        if target.color == mover {
            return None;
        }
    }
    Some(piece)
}

/// `isLegalMove(board, from, to, mover)` for step games.
pub fn is_legal_move(kind: GameKind, board: &Board, from: Square, to: Square, mover: Color) -> bool {
    kind.rules().is_legal(board, Move::step(from, to), mover)
}

pub fn all_legal_moves(kind: GameKind, board: &Board, color: Color) -> Vec<Move> {
    kind.rules().legal_moves(board, color)
}

/// Legal destinations for the piece on `from`, for highlighting.
pub fn legal_destinations(kind: GameKind, board: &Board, from: Square) -> Vec<Square> {
    let piece = match board.get(from) {
        Some(p) => p,
        None => return Vec::new(),
    };
    let rules = kind.rules();
    board
        .squares()
        .filter(|&to| rules.is_legal(board, Move::step(from, to), piece.color))
        .collect()
}

// =============================================================================
// Line helpers
// =============================================================================

/// Unit step from `from` toward `to` when both lie on one rank, file or
/// diagonal.
pub(crate) fn line_step(from: Square, to: Square) -> Option<(i8, i8)> {
    let (dr, dc) = from.delta_to(to);
    if (dr, dc) == (0, 0) {
        return None;
    }
    if dr == 0 || dc == 0 || dr.abs() == dc.abs() {
        Some((dr.signum(), dc.signum()))
    } else {
        None
    }
}

/// Squares strictly between `from` and `to`. Empty when they are not on a line.
pub(crate) fn squares_between(from: Square, to: Square) -> Vec<Square> {
    let mut out = Vec::new();
    let (dr, dc) = match line_step(from, to) {
        Some(step) => step,
        None => return out,
    };
    let mut cur = from;
    while let Some(next) = cur.offset(dr, dc) {
        if next == to {
            break;
        }
        out.push(next);
        cur = next;
    }
    out
}

/// Every square strictly between `from` and `to` is empty.
pub(crate) fn path_clear(board: &Board, from: Square, to: Square) -> bool {
    squares_between(from, to)
        .into_iter()
        .all(|sq| board.is_empty_at(sq))
}

#[cfg(test)]
#[path = "rules_tests.rs"]
mod rules_tests;
