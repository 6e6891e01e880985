use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::types::*;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("board has no cells")]
    Empty,
    #[error("board is {rows}x{cols}, at most 255 per side")]
    TooLarge { rows: usize, cols: usize },
    #[error("row {row} has {len} cells, expected {expected}")]
    Ragged { row: usize, len: usize, expected: usize },
    #[error("board is {rows}x{cols}, expected {expected_rows}x{expected_cols}")]
    WrongDimensions {
        rows: usize,
        cols: usize,
        expected_rows: u8,
        expected_cols: u8,
    },
    #[error("invalid piece letter '{0}'")]
    InvalidLetter(char),
}

/// Fixed-size grid of optional pieces, stored row-major.
///
/// Dimensions never change after creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BoardSnapshot", into = "BoardSnapshot")]
pub struct Board {
    rows: u8,
    cols: u8,
    cells: Vec<Option<Piece>>,
}

/// Wire form of a board: one inner vector per row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub cells: Vec<Vec<Option<Piece>>>,
}

impl Board {
    pub fn empty(rows: u8, cols: u8) -> Self {
        Self {
            rows,
            cols,
            cells: vec![None; rows as usize * cols as usize],
        }
    }

    pub fn initial(kind: GameKind) -> Self {
        kind.rules().initial_board()
    }

    /// Parse a diagram: one line per row, `.` for empty, piece letters as in
    /// [`PieceKind::letter`], upper case for white. Whitespace inside a line is
    /// ignored.
    pub fn from_diagram(kind: GameKind, diagram: &str) -> Result<Self, BoardError> {
        let mut grid = Vec::new();
        for line in diagram.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let mut row = Vec::new();
            for ch in line.chars().filter(|c| !c.is_whitespace()) {
                if ch == '.' {
                    row.push(None);
                    continue;
                }
                let piece_kind =
                    PieceKind::from_letter(kind, ch).ok_or(BoardError::InvalidLetter(ch))?;
                let color = if ch.is_ascii_uppercase() {
                    Color::White
                } else {
                    Color::Black
                };
                row.push(Some(Piece::new(piece_kind, color)));
            }
            grid.push(row);
        }

        let board = Board::try_from(BoardSnapshot { cells: grid })?;
        let (rows, cols) = kind.dimensions();
        if board.rows != rows || board.cols != cols {
            return Err(BoardError::WrongDimensions {
                rows: board.rows as usize,
                cols: board.cols as usize,
                expected_rows: rows,
                expected_cols: cols,
            });
        }
        Ok(board)
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }

    pub fn cols(&self) -> u8 {
        self.cols
    }

    #[inline]
    pub fn contains(&self, sq: Square) -> bool {
        sq.row < self.rows && sq.col < self.cols
    }

    #[inline]
    fn index(&self, sq: Square) -> usize {
        sq.row as usize * self.cols as usize + sq.col as usize
    }

    /// Occupant of `sq`; `None` for empty or out-of-bounds squares.
    #[inline]
    pub fn get(&self, sq: Square) -> Option<Piece> {
        if self.contains(sq) {
            self.cells[self.index(sq)]
        } else {
            None
        }
    }

    #[inline]
    pub fn is_empty_at(&self, sq: Square) -> bool {
        self.get(sq).is_none()
    }

    /// Place `piece` (or clear the cell) and return the previous occupant.
    ///
    /// Panics if `sq` is outside the board.
    pub fn put(&mut self, sq: Square, piece: Option<Piece>) -> Option<Piece> {
        assert!(self.contains(sq), "square {sq} outside {}x{} board", self.rows, self.cols);
        let idx = self.index(sq);
        std::mem::replace(&mut self.cells[idx], piece)
    }

    pub fn take(&mut self, sq: Square) -> Option<Piece> {
        self.put(sq, None)
    }

    /// All squares in row-major order.
    pub fn squares(&self) -> impl Iterator<Item = Square> + '_ {
        (0..self.rows).flat_map(move |r| (0..self.cols).map(move |c| Square::new(r, c)))
    }

    /// Occupied squares in row-major order.
    pub fn occupied(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.squares()
            .filter_map(move |sq| self.get(sq).map(|pc| (sq, pc)))
    }

    pub fn piece_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    pub fn find(&self, piece: Piece) -> Option<Square> {
        self.occupied().find(|&(_, pc)| pc == piece).map(|(sq, _)| sq)
    }
}

impl TryFrom<BoardSnapshot> for Board {
    type Error = BoardError;

    fn try_from(snapshot: BoardSnapshot) -> Result<Self, Self::Error> {
        let rows = snapshot.cells.len();
        let cols = snapshot.cells.first().map(Vec::len).unwrap_or(0);
        if rows == 0 || cols == 0 {
            return Err(BoardError::Empty);
        }
        if rows > u8::MAX as usize || cols > u8::MAX as usize {
            return Err(BoardError::TooLarge { rows, cols });
        }
        let mut cells = Vec::with_capacity(rows * cols);
        for (row, line) in snapshot.cells.into_iter().enumerate() {
            if line.len() != cols {
                return Err(BoardError::Ragged {
                    row,
                    len: line.len(),
                    expected: cols,
                });
            }
            cells.extend(line);
        }
        Ok(Board {
            rows: rows as u8,
            cols: cols as u8,
            cells,
        })
    }
}

impl From<Board> for BoardSnapshot {
    fn from(board: Board) -> Self {
        let cols = board.cols as usize;
        let cells = board.cells.chunks(cols).map(<[_]>::to_vec).collect();
        BoardSnapshot { cells }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.rows {
            for c in 0..self.cols {
                let ch = self
                    .get(Square::new(r, c))
                    .map(Piece::letter)
                    .unwrap_or('.');
                write!(f, "{ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "board_tests.rs"]
mod board_tests;
