use crate::board::Board;
use crate::rules::Rules;
use crate::types::*;

pub const SIZE: u8 = 15;
pub const WIN_LENGTH: usize = 5;

const AXES: [(i8, i8); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Five-in-a-row. Nothing moves; a turn places one stone on an empty cell.
/// Black places first.
#[derive(Debug, Clone, Copy, Default)]
pub struct OmokRules;

impl Rules for OmokRules {
    fn kind(&self) -> GameKind {
        GameKind::Omok
    }

    fn dimensions(&self) -> (u8, u8) {
        (SIZE, SIZE)
    }

    fn first_player(&self) -> Color {
        Color::Black
    }

    fn initial_board(&self) -> Board {
        Board::empty(SIZE, SIZE)
    }

    fn piece_can_move(&self, _board: &Board, _piece: Piece, _from: Square, _to: Square) -> bool {
        false
    }

    fn outcome(
        &self,
        board: &Board,
        mv: Move,
        mover: Color,
        _captured: Option<Piece>,
    ) -> GameResult {
        let at = mv.to();
        let longest = AXES
            .iter()
            .map(|&axis| run_length(board, at, mover, axis))
            .max()
            .unwrap_or(0);
        if longest >= WIN_LENGTH {
            GameResult::Won(mover)
        } else {
            GameResult::InProgress
        }
    }

    fn is_legal(&self, board: &Board, mv: Move, _mover: Color) -> bool {
        match mv {
            Move::Place { at } => board.contains(at) && board.is_empty_at(at),
            Move::Step { .. } => false,
        }
    }

    fn legal_moves(&self, board: &Board, _color: Color) -> Vec<Move> {
        board
            .squares()
            .filter(|&sq| board.is_empty_at(sq))
            .map(Move::place)
            .collect()
    }
}

/// Contiguous stones of `color` through `at` along `axis`, counting both ways.
pub fn run_length(board: &Board, at: Square, color: Color, axis: (i8, i8)) -> usize {
    let stone = Piece::stone(color);
    if board.get(at) != Some(stone) {
        return 0;
    }
    let mut count = 1;
    for (dr, dc) in [axis, (-axis.0, -axis.1)] {
        let mut cur = at;
        while let Some(next) = cur.offset(dr, dc) {
            if board.get(next) != Some(stone) {
                break;
            }
            count += 1;
            cur = next;
        }
    }
    count
}

#[cfg(test)]
#[path = "omok_tests.rs"]
mod omok_tests;
