use serde::{Deserialize, Serialize};

use crate::types::{Color, Piece};

/// Pieces each side has captured, in capture order. Display only; no rule
/// reads it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedLedger {
    by_color: [Vec<Piece>; 2],
}

impl CapturedLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, capturer: Color, piece: Piece) {
        self.by_color[capturer.idx()].push(piece);
    }

    pub fn captured_by(&self, capturer: Color) -> &[Piece] {
        &self.by_color[capturer.idx()]
    }

    pub fn clear(&mut self) {
        for list in &mut self.by_color {
            list.clear();
        }
    }

    pub fn is_empty(&self) -> bool {
        self.by_color.iter().all(Vec::is_empty)
    }
}
