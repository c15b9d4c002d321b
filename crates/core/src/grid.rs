//! Grid module - manages the letter grid
//!
//! The grid is a rows x columns field where each cell is empty or holds one
//! uppercase letter. Uses a flat row-major vector for cache locality; the
//! dimensions are fixed when the grid is built and never change afterwards.
//! Coordinates are `(row, col)` with row 0 at the top.
//!
//! A placed cell is never overwritten: `place` refuses occupied cells and only
//! `clear_cell` / `clear_match` return a cell to empty.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Cell, Position, WordMatch};

/// Errors raised when a grid is built from externally supplied rows
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("grid must have at least one row and one column")]
    Empty,
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("cell ({row}, {col}) holds {ch:?}, which is not a letter")]
    NotALetter { row: usize, col: usize, ch: char },
}

/// The letter grid
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<Cell>>", into = "Vec<Vec<Cell>>")]
pub struct Grid {
    rows: usize,
    cols: usize,
    /// Flat array of cells, row-major order (row * cols + col)
    cells: Vec<Cell>,
}

impl Grid {
    /// Create a new empty grid. Zero dimensions are bumped to 1.
    pub fn new(rows: usize, cols: usize) -> Self {
        let rows = rows.max(1);
        let cols = cols.max(1);
        Self {
            rows,
            cols,
            cells: vec![None; rows * cols],
        }
    }

    /// Build a grid from nested rows, rejecting ragged or empty input.
    ///
    /// Letters are upper-cased; any non-alphabetic character is rejected.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Result<Self, GridError> {
        let height = rows.len();
        let width = rows.first().map(Vec::len).unwrap_or(0);
        if height == 0 || width == 0 {
            return Err(GridError::Empty);
        }

        let mut cells = Vec::with_capacity(height * width);
        for (r, row) in rows.into_iter().enumerate() {
            if row.len() != width {
                return Err(GridError::RaggedRow {
                    row: r,
                    expected: width,
                    found: row.len(),
                });
            }
            for (c, cell) in row.into_iter().enumerate() {
                match cell {
                    None => cells.push(None),
                    Some(ch) => match normalize_letter(ch) {
                        Some(letter) => cells.push(Some(letter)),
                        None => return Err(GridError::NotALetter { row: r, col: c, ch }),
                    },
                }
            }
        }

        Ok(Self {
            rows: height,
            cols: width,
            cells,
        })
    }

    /// Build a grid from text rows where `.` (or a space) is an empty cell.
    ///
    /// ```
    /// use letter_cascade_core::Grid;
    ///
    /// let grid = Grid::parse(&["CAT", "...", "..."]).unwrap();
    /// assert_eq!(grid.letter_at(0, 1), Some('A'));
    /// assert_eq!(grid.letter_at(1, 1), None);
    /// ```
    pub fn parse(lines: &[&str]) -> Result<Self, GridError> {
        let rows = lines
            .iter()
            .map(|line| {
                line.chars()
                    .map(|ch| if ch == '.' || ch == ' ' { None } else { Some(ch) })
                    .collect()
            })
            .collect();
        Self::from_rows(rows)
    }

    #[inline(always)]
    fn index(&self, row: usize, col: usize) -> Option<usize> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        Some(row * self.cols + col)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Get cell at `(row, col)`; `None` when out of bounds
    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        self.index(row, col).map(|idx| self.cells[idx])
    }

    /// Letter at `(row, col)`. Out-of-range access reads as an empty cell.
    pub fn letter_at(&self, row: usize, col: usize) -> Option<char> {
        self.get(row, col).flatten()
    }

    /// Check if position is within bounds and empty
    pub fn is_free(&self, row: usize, col: usize) -> bool {
        matches!(self.get(row, col), Some(None))
    }

    pub fn in_bounds(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols
    }

    /// Place a letter into an empty in-bounds cell.
    ///
    /// Returns false (and leaves the grid untouched) when the cell is out of
    /// bounds, already occupied, or `letter` is not an ASCII letter.
    pub fn place(&mut self, row: usize, col: usize, letter: char) -> bool {
        let Some(letter) = normalize_letter(letter) else {
            return false;
        };
        match self.index(row, col) {
            Some(idx) if self.cells[idx].is_none() => {
                self.cells[idx] = Some(letter);
                true
            }
            _ => false,
        }
    }

    /// Clear a single cell back to empty. Returns true if a letter was removed.
    pub fn clear_cell(&mut self, row: usize, col: usize) -> bool {
        match self.index(row, col) {
            Some(idx) => self.cells[idx].take().is_some(),
            None => false,
        }
    }

    /// Clear every cell covered by a match; returns how many letters were removed.
    ///
    /// Cells already emptied by an overlapping match are skipped.
    pub fn clear_match(&mut self, word: &WordMatch) -> usize {
        word.cells()
            .filter(|p| self.clear_cell(p.row, p.col))
            .count()
    }

    /// Lowest empty row at or below `from_row` reachable by falling straight down
    /// in `col`, or `None` if `(from_row, col)` itself is not free.
    pub fn landing_row(&self, from_row: usize, col: usize) -> Option<usize> {
        if !self.is_free(from_row, col) {
            return None;
        }
        let mut row = from_row;
        while self.is_free(row + 1, col) {
            row += 1;
        }
        Some(row)
    }

    /// Number of occupied cells
    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Occupancy as a whole percentage of all cells
    pub fn fill_percent(&self) -> u32 {
        ((self.occupied() * 100) / self.cells.len()) as u32
    }

    /// Whether occupancy reached `threshold_percent`
    pub fn is_nearly_full(&self, threshold_percent: u32) -> bool {
        self.fill_percent() >= threshold_percent
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    /// One row of cells, or `None` when out of range
    pub fn row(&self, row: usize) -> Option<&[Cell]> {
        if row >= self.rows {
            return None;
        }
        let start = row * self.cols;
        Some(&self.cells[start..start + self.cols])
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Iterate over occupied cells as `(position, letter)`
    pub fn letters(&self) -> impl Iterator<Item = (Position, char)> + '_ {
        self.cells.iter().enumerate().filter_map(|(idx, cell)| {
            cell.map(|ch| (Position::new(idx / self.cols, idx % self.cols), ch))
        })
    }

    /// Clear the entire grid
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = None;
        }
    }

    /// Convert to nested rows
    pub fn to_rows(&self) -> Vec<Vec<Cell>> {
        self.cells.chunks(self.cols).map(<[Cell]>::to_vec).collect()
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(crate::types::DEFAULT_ROWS, crate::types::DEFAULT_COLUMNS)
    }
}

impl TryFrom<Vec<Vec<Cell>>> for Grid {
    type Error = GridError;

    fn try_from(rows: Vec<Vec<Cell>>) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

impl From<Grid> for Vec<Vec<Cell>> {
    fn from(grid: Grid) -> Self {
        grid.to_rows()
    }
}

/// Upper-case an ASCII letter; `None` for anything else.
pub(crate) fn normalize_letter(ch: char) -> Option<char> {
    ch.is_ascii_alphabetic().then(|| ch.to_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Direction;

    #[test]
    fn test_grid_index_calculation() {
        let grid = Grid::new(8, 8);
        assert_eq!(grid.index(0, 0), Some(0));
        assert_eq!(grid.index(0, 7), Some(7));
        assert_eq!(grid.index(1, 0), Some(8));
        assert_eq!(grid.index(7, 7), Some(63));
        assert_eq!(grid.index(8, 0), None);
        assert_eq!(grid.index(0, 8), None);
    }

    #[test]
    fn test_place_never_overwrites() {
        let mut grid = Grid::new(4, 4);
        assert!(grid.place(1, 1, 'a'));
        assert_eq!(grid.letter_at(1, 1), Some('A'));

        assert!(!grid.place(1, 1, 'B'));
        assert_eq!(grid.letter_at(1, 1), Some('A'));

        assert!(!grid.place(4, 0, 'C'));
        assert!(!grid.place(0, 0, '7'));
        assert_eq!(grid.occupied(), 1);
    }

    #[test]
    fn test_out_of_range_reads_as_empty() {
        let grid = Grid::parse(&["AB", "CD"]).unwrap();
        assert_eq!(grid.letter_at(5, 5), None);
        assert!(!grid.is_free(2, 0));
    }

    #[test]
    fn test_only_ascii_letters_are_accepted() {
        let mut grid = Grid::new(2, 2);
        assert!(!grid.place(0, 0, 'É'));
        assert!(!grid.place(0, 0, 'ß'));
        assert!(grid.place(0, 0, 'z'));
        assert_eq!(grid.letter_at(0, 0), Some('Z'));

        let err = Grid::from_rows(vec![vec![Some('A'), Some('é')]]).unwrap_err();
        assert_eq!(err, GridError::NotALetter { row: 0, col: 1, ch: 'é' });
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        let err = Grid::from_rows(vec![vec![None, None], vec![None]]).unwrap_err();
        assert_eq!(
            err,
            GridError::RaggedRow {
                row: 1,
                expected: 2,
                found: 1
            }
        );
        assert_eq!(Grid::from_rows(vec![]).unwrap_err(), GridError::Empty);
    }

    #[test]
    fn test_clear_match_skips_empty_cells() {
        let mut grid = Grid::parse(&["CAT.", "....", "....", "...."]).unwrap();
        let word = WordMatch::new("CAT", Position::new(0, 0), Direction::Horizontal);
        assert_eq!(grid.clear_match(&word), 3);
        assert!(grid.is_empty());
        assert_eq!(grid.clear_match(&word), 0);
    }

    #[test]
    fn test_landing_row() {
        let grid = Grid::parse(&["....", "....", ".X..", "...."]).unwrap();
        assert_eq!(grid.landing_row(0, 0), Some(3));
        assert_eq!(grid.landing_row(0, 1), Some(1));
        assert_eq!(grid.landing_row(2, 1), None);
    }

    #[test]
    fn test_fill_percent() {
        let grid = Grid::parse(&["AB", "C."]).unwrap();
        assert_eq!(grid.fill_percent(), 75);
        assert!(grid.is_nearly_full(75));
        assert!(!grid.is_nearly_full(85));
    }

    #[test]
    fn test_serde_roundtrip_validates_shape() {
        let grid = Grid::parse(&["AB", ".C"]).unwrap();
        let json = serde_json::to_string(&grid).unwrap();
        assert_eq!(json, r#"[["A","B"],[null,"C"]]"#);
        let back: Grid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, grid);

        assert!(serde_json::from_str::<Grid>(r#"[["A","B"],["C"]]"#).is_err());
    }
}
