use crate::board::Board;
use crate::rules::{path_clear, Rules};
use crate::types::*;

/// Chess without check, castling, en passant or promotion. White starts on
/// rows 6-7 and advances toward row 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChessRules;

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

impl Rules for ChessRules {
    fn kind(&self) -> GameKind {
        GameKind::Chess
    }

    fn dimensions(&self) -> (u8, u8) {
        (8, 8)
    }

    fn first_player(&self) -> Color {
        Color::White
    }

    fn initial_board(&self) -> Board {
        let mut board = Board::empty(8, 8);
        for (c, &kind) in BACK_RANK.iter().enumerate() {
            let c = c as u8;
            board.put(Square::new(0, c), Some(Piece::new(kind, Color::Black)));
            board.put(Square::new(1, c), Some(Piece::new(PieceKind::Pawn, Color::Black)));
            board.put(Square::new(6, c), Some(Piece::new(PieceKind::Pawn, Color::White)));
            board.put(Square::new(7, c), Some(Piece::new(kind, Color::White)));
        }
        board
    }

    fn piece_can_move(&self, board: &Board, piece: Piece, from: Square, to: Square) -> bool {
        let (dr, dc) = from.delta_to(to);
        match piece.kind {
            PieceKind::Pawn => pawn_can_move(board, piece.color, from, to),
            PieceKind::Rook => (dr == 0 || dc == 0) && path_clear(board, from, to),
            PieceKind::Bishop => dr.abs() == dc.abs() && path_clear(board, from, to),
            PieceKind::Queen => {
                (dr == 0 || dc == 0 || dr.abs() == dc.abs()) && path_clear(board, from, to)
            }
            PieceKind::Knight => matches!((dr.abs(), dc.abs()), (1, 2) | (2, 1)),
            PieceKind::King => dr.abs() <= 1 && dc.abs() <= 1,
            _ => false,
        }
    }

    // Capturing the king does not end the game; there is no terminal rule.
    fn outcome(
        &self,
        _board: &Board,
        _mv: Move,
        _mover: Color,
        _captured: Option<Piece>,
    ) -> GameResult {
        GameResult::InProgress
    }
}

fn pawn_can_move(board: &Board, color: Color, from: Square, to: Square) -> bool {
    let (dir, start_row): (i8, u8) = match color {
        Color::White => (-1, board.rows() - 2),
        Color::Black => (1, 1),
    };
    let (dr, dc) = from.delta_to(to);
    let target = board.get(to);

    // forward 1
    if dc == 0 && dr == dir {
        return target.is_none();
    }
    // forward 2 from start
    if dc == 0 && dr == 2 * dir {
        let through = match from.offset(dir, 0) {
            Some(sq) => sq,
            None => return false,
        };
        return from.row == start_row && target.is_none() && board.is_empty_at(through);
    }
    // diagonal capture
    if dc.abs() == 1 && dr == dir {
        return matches!(target, Some(pc) if pc.color != color);
    }
    false
}

#[cfg(test)]
#[path = "chess_tests.rs"]
mod chess_tests;
