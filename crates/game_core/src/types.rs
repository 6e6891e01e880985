use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::rules::Rules;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}
impl Color {
    pub const ALL: [Color; 2] = [Color::White, Color::Black];

    pub fn other(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
    pub fn idx(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

/// The three supported games. Each selects a static [`Rules`] strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameKind {
    Chess,
    Janggi,
    Omok,
}

impl GameKind {
    pub const ALL: [GameKind; 3] = [GameKind::Chess, GameKind::Janggi, GameKind::Omok];

    pub fn rules(self) -> &'static dyn Rules {
        match self {
            GameKind::Chess => &crate::chess::ChessRules,
            GameKind::Janggi => &crate::janggi::JanggiRules,
            GameKind::Omok => &crate::omok::OmokRules,
        }
    }

    /// (rows, cols)
    pub fn dimensions(self) -> (u8, u8) {
        self.rules().dimensions()
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameKind::Chess => write!(f, "chess"),
            GameKind::Janggi => write!(f, "janggi"),
            GameKind::Omok => write!(f, "omok"),
        }
    }
}

impl FromStr for GameKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "chess" => Ok(GameKind::Chess),
            "janggi" => Ok(GameKind::Janggi),
            "omok" | "gomoku" => Ok(GameKind::Omok),
            other => Err(format!("unknown game: {other}")),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    // chess
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
    // janggi
    General,
    Guard,
    Chariot,
    Cannon,
    Horse,
    Elephant,
    Soldier,
    // omok: a stone is identified by its color alone
    Stone,
}

impl PieceKind {
    pub fn game(self) -> GameKind {
        use PieceKind::*;
        match self {
            King | Queen | Rook | Bishop | Knight | Pawn => GameKind::Chess,
            General | Guard | Chariot | Cannon | Horse | Elephant | Soldier => GameKind::Janggi,
            Stone => GameKind::Omok,
        }
    }

    /// Diagram letter; upper case is used for white pieces.
    pub fn letter(self) -> char {
        use PieceKind::*;
        match self {
            King => 'k',
            Queen => 'q',
            Rook => 'r',
            Bishop => 'b',
            Knight => 'n',
            Pawn => 'p',
            General => 'g',
            Guard => 'a',
            Chariot => 'r',
            Cannon => 'c',
            Horse => 'h',
            Elephant => 'e',
            Soldier => 's',
            Stone => 'o',
        }
    }

    pub fn from_letter(game: GameKind, letter: char) -> Option<PieceKind> {
        use PieceKind::*;
        let kind = match (game, letter.to_ascii_lowercase()) {
            (GameKind::Chess, 'k') => King,
            (GameKind::Chess, 'q') => Queen,
            (GameKind::Chess, 'r') => Rook,
            (GameKind::Chess, 'b') => Bishop,
            (GameKind::Chess, 'n') => Knight,
            (GameKind::Chess, 'p') => Pawn,
            (GameKind::Janggi, 'g') => General,
            (GameKind::Janggi, 'a') => Guard,
            (GameKind::Janggi, 'r') => Chariot,
            (GameKind::Janggi, 'c') => Cannon,
            (GameKind::Janggi, 'h') => Horse,
            (GameKind::Janggi, 'e') => Elephant,
            (GameKind::Janggi, 's') => Soldier,
            (GameKind::Omok, 'o') => Stone,
            _ => return None,
        };
        Some(kind)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
}

impl Piece {
    pub fn new(kind: PieceKind, color: Color) -> Self {
        Self { kind, color }
    }

    pub fn stone(color: Color) -> Self {
        Self {
            kind: PieceKind::Stone,
            color,
        }
    }

    pub fn letter(self) -> char {
        let c = self.kind.letter();
        match self.color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Square {
    pub row: u8,
    pub col: u8,
}

impl Square {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Offset by a signed delta. Only rejects negative coordinates; the board
    /// decides the upper bound.
    pub fn offset(self, dr: i8, dc: i8) -> Option<Square> {
        let row = self.row as i16 + dr as i16;
        let col = self.col as i16 + dc as i16;
        if (0..=u8::MAX as i16).contains(&row) && (0..=u8::MAX as i16).contains(&col) {
            Some(Square::new(row as u8, col as u8))
        } else {
            None
        }
    }

    /// Signed (row, col) displacement from `self` to `to`.
    pub fn delta_to(self, to: Square) -> (i8, i8) {
        (
            (to.row as i16 - self.row as i16) as i8,
            (to.col as i16 - self.col as i16) as i8,
        )
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// A move is a transient value: either a piece stepping between squares
/// (chess, janggi) or a new stone placed on an empty cell (omok).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Move {
    Step { from: Square, to: Square },
    Place { at: Square },
}

impl Move {
    pub fn step(from: Square, to: Square) -> Self {
        Move::Step { from, to }
    }

    pub fn place(at: Square) -> Self {
        Move::Place { at }
    }

    pub fn from(self) -> Option<Square> {
        match self {
            Move::Step { from, .. } => Some(from),
            Move::Place { .. } => None,
        }
    }

    pub fn to(self) -> Square {
        match self {
            Move::Step { to, .. } => to,
            Move::Place { at } => at,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Step { from, to } => write!(f, "{from}->{to}"),
            Move::Place { at } => write!(f, "@{at}"),
        }
    }
}

/// Result of a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GameResult {
    InProgress,
    Won(Color),
}

impl GameResult {
    pub fn ended(self) -> bool {
        matches!(self, GameResult::Won(_))
    }

    pub fn winner(self) -> Option<Color> {
        match self {
            GameResult::InProgress => None,
            GameResult::Won(c) => Some(c),
        }
    }
}
