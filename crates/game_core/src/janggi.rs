//! Janggi (Korean chess) movement rules.
//!
//! White is the bottom side (Cho, rows 6-9) and advances toward row 0; Black
//! is the top side (Han, rows 0-3). Each side has a 3x3 palace on columns 3-5
//! whose two diagonals through the center are extra lines for the general,
//! guards, chariots, cannons and soldiers.

use crate::board::Board;
use crate::rules::{path_clear, squares_between, Rules};
use crate::types::*;

#[derive(Debug, Clone, Copy, Default)]
pub struct JanggiRules;

const ROWS: u8 = 10;
const COLS: u8 = 9;

/// Inner-elephant arrangement: chariot, horse, elephant, guard, -, guard,
/// elephant, horse, chariot.
const BACK_ROW: [Option<PieceKind>; 9] = [
    Some(PieceKind::Chariot),
    Some(PieceKind::Horse),
    Some(PieceKind::Elephant),
    Some(PieceKind::Guard),
    None,
    Some(PieceKind::Guard),
    Some(PieceKind::Elephant),
    Some(PieceKind::Horse),
    Some(PieceKind::Chariot),
];

/// One of the two palaces, identified by its top row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palace {
    top: u8,
}

impl Palace {
    pub const TOP: Palace = Palace { top: 0 };
    pub const BOTTOM: Palace = Palace { top: ROWS - 3 };

    pub fn containing(sq: Square) -> Option<Palace> {
        if !(3..=5).contains(&sq.col) {
            return None;
        }
        [Palace::TOP, Palace::BOTTOM]
            .into_iter()
            .find(|p| (p.top..p.top + 3).contains(&sq.row))
    }

    pub fn center(self) -> Square {
        Square::new(self.top + 1, 4)
    }

    /// Corners and center: the points joined by the palace diagonals.
    pub fn on_diagonal(self, sq: Square) -> bool {
        let (dr, dc) = self.center().delta_to(sq);
        Palace::containing(sq) == Some(self) && dr.abs() == dc.abs()
    }
}

/// `from` and `to` lie on one palace diagonal of the same palace.
fn palace_diagonal(from: Square, to: Square) -> bool {
    let (dr, dc) = from.delta_to(to);
    if dr == 0 || dr.abs() != dc.abs() {
        return false;
    }
    match Palace::containing(from) {
        Some(p) => p.on_diagonal(from) && p.on_diagonal(to),
        None => false,
    }
}

fn forward(color: Color) -> i8 {
    match color {
        Color::White => -1,
        Color::Black => 1,
    }
}

impl Rules for JanggiRules {
    fn kind(&self) -> GameKind {
        GameKind::Janggi
    }

    fn dimensions(&self) -> (u8, u8) {
        (ROWS, COLS)
    }

    fn first_player(&self) -> Color {
        Color::White
    }

    fn initial_board(&self) -> Board {
        let mut board = Board::empty(ROWS, COLS);
        for (color, back, general, cannons, soldiers) in [
            (Color::Black, 0u8, 1u8, 2u8, 3u8),
            (Color::White, ROWS - 1, ROWS - 2, ROWS - 3, ROWS - 4),
        ] {
            for (c, kind) in BACK_ROW.iter().enumerate() {
                if let Some(kind) = kind {
                    board.put(Square::new(back, c as u8), Some(Piece::new(*kind, color)));
                }
            }
            board.put(Square::new(general, 4), Some(Piece::new(PieceKind::General, color)));
            for c in [1, 7] {
                board.put(Square::new(cannons, c), Some(Piece::new(PieceKind::Cannon, color)));
            }
            for c in (0..COLS).step_by(2) {
                board.put(Square::new(soldiers, c), Some(Piece::new(PieceKind::Soldier, color)));
            }
        }
        board
    }

    fn piece_can_move(&self, board: &Board, piece: Piece, from: Square, to: Square) -> bool {
        match piece.kind {
            PieceKind::General | PieceKind::Guard => palace_step(from, to),
            PieceKind::Horse => horse_can_move(board, from, to),
            PieceKind::Elephant => elephant_can_move(board, from, to),
            PieceKind::Chariot => chariot_can_move(board, from, to),
            PieceKind::Cannon => cannon_can_move(board, from, to),
            PieceKind::Soldier => soldier_can_move(piece.color, from, to),
            _ => false,
        }
    }

    fn outcome(
        &self,
        _board: &Board,
        _mv: Move,
        mover: Color,
        captured: Option<Piece>,
    ) -> GameResult {
        match captured {
            Some(pc) if pc.kind == PieceKind::General => GameResult::Won(mover),
            _ => GameResult::InProgress,
        }
    }
}

/// General and guard: one step inside their palace; diagonal steps only on a
/// palace diagonal, i.e. to or from the center.
fn palace_step(from: Square, to: Square) -> bool {
    let palace = match Palace::containing(from) {
        Some(p) => p,
        None => return false,
    };
    if Palace::containing(to) != Some(palace) {
        return false;
    }
    let (dr, dc) = from.delta_to(to);
    if dr.abs() > 1 || dc.abs() > 1 {
        return false;
    }
    if dr == 0 || dc == 0 {
        return true;
    }
    from == palace.center() || to == palace.center()
}

/// One orthogonal step then one diagonal step; the orthogonal square must be
/// empty.
fn horse_can_move(board: &Board, from: Square, to: Square) -> bool {
    let (dr, dc) = from.delta_to(to);
    let leg = match (dr.abs(), dc.abs()) {
        (2, 1) => (dr.signum(), 0),
        (1, 2) => (0, dc.signum()),
        _ => return false,
    };
    from.offset(leg.0, leg.1)
        .map(|sq| board.is_empty_at(sq))
        .unwrap_or(false)
}

/// One orthogonal step then two diagonal steps; both intermediate squares
/// must be empty.
fn elephant_can_move(board: &Board, from: Square, to: Square) -> bool {
    let (dr, dc) = from.delta_to(to);
    let leg = match (dr.abs(), dc.abs()) {
        (3, 2) => (dr.signum(), 0),
        (2, 3) => (0, dc.signum()),
        _ => return false,
    };
    let first = match from.offset(leg.0, leg.1) {
        Some(sq) => sq,
        None => return false,
    };
    let second = match first.offset(dr.signum(), dc.signum()) {
        Some(sq) => sq,
        None => return false,
    };
    board.is_empty_at(first) && board.is_empty_at(second)
}

fn chariot_can_move(board: &Board, from: Square, to: Square) -> bool {
    let (dr, dc) = from.delta_to(to);
    let on_line = dr == 0 || dc == 0 || palace_diagonal(from, to);
    on_line && path_clear(board, from, to)
}

/// Jumps exactly one non-cannon screen along an orthogonal line or palace
/// diagonal, and never captures a cannon.
fn cannon_can_move(board: &Board, from: Square, to: Square) -> bool {
    let (dr, dc) = from.delta_to(to);
    if !(dr == 0 || dc == 0 || palace_diagonal(from, to)) {
        return false;
    }
    if matches!(board.get(to), Some(pc) if pc.kind == PieceKind::Cannon) {
        return false;
    }
    let screens: Vec<Piece> = squares_between(from, to)
        .into_iter()
        .filter_map(|sq| board.get(sq))
        .collect();
    screens.len() == 1 && screens[0].kind != PieceKind::Cannon
}

/// Forward or sideways one step; diagonally forward along a palace diagonal.
fn soldier_can_move(color: Color, from: Square, to: Square) -> bool {
    let (dr, dc) = from.delta_to(to);
    let fwd = forward(color);
    match (dr, dc.abs()) {
        (0, 1) => true,
        (r, 0) if r == fwd => true,
        (r, 1) if r == fwd => palace_diagonal(from, to),
        _ => false,
    }
}

#[cfg(test)]
#[path = "janggi_tests.rs"]
mod janggi_tests;
