//! The falling letter: the single letter descending under gravity.

use serde::{Deserialize, Serialize};

use crate::grid::Grid;
use crate::types::Position;

/// Active falling letter
///
/// `col` always stays within `[0, cols - 1]`; `row` only increases until the
/// letter is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FallingLetter {
    pub letter: char,
    pub col: usize,
    pub row: usize,
}

impl FallingLetter {
    /// Create a letter at the spawn row
    pub fn new(letter: char, col: usize) -> Self {
        Self { letter, col, row: 0 }
    }

    pub fn position(&self) -> Position {
        Position::new(self.row, self.col)
    }

    /// Whether the letter may move one row down
    pub fn can_descend(&self, grid: &Grid) -> bool {
        grid.is_free(self.row + 1, self.col)
    }

    /// The letter shifted by one column, if the target is in bounds and free
    pub fn shifted(&self, grid: &Grid, right: bool) -> Option<Self> {
        let col = if right {
            self.col.checked_add(1)?
        } else {
            self.col.checked_sub(1)?
        };
        grid.is_free(self.row, col).then_some(Self { col, ..*self })
    }

    /// The letter one row lower
    pub fn descended(&self) -> Self {
        Self {
            row: self.row + 1,
            ..*self
        }
    }

    /// Row the letter would land on if dropped now
    pub fn landing_row(&self, grid: &Grid) -> usize {
        grid.landing_row(self.row, self.col).unwrap_or(self.row)
    }
}
