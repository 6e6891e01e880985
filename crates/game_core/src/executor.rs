use crate::board::Board;
use crate::rules::Rules;
use crate::types::*;

/// Result of applying a move: the new board, the captured piece (if any) and
/// whether the game ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Applied {
    pub board: Board,
    pub captured: Option<Piece>,
    pub result: GameResult,
}

/// Apply an already validated move to a copy of `board`.
///
/// A step lifts the piece from its source, removes any occupant of the
/// destination (the capture) and puts the same piece down. A placement adds a
/// stone of `mover`'s color.
pub fn apply_move(rules: &dyn Rules, board: &Board, mv: Move, mover: Color) -> Applied {
    let mut next = board.clone();
    let captured = match mv {
        Move::Step { from, to } => {
            let piece = next.take(from);
            next.put(to, piece)
        }
        Move::Place { at } => next.put(at, Some(Piece::stone(mover))),
    };
    let result = rules.outcome(&next, mv, mover, captured);
    Applied {
        board: next,
        captured,
        result,
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod executor_tests;
