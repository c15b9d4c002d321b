//! Word detection over a grid snapshot.
//!
//! For every starting cell and every direction, candidate strings of length
//! `MIN_WORD_LEN..=MAX_WORD_LEN` are read along the direction and tested
//! against the dictionary. An empty cell ends the run: no candidate ever spans
//! one. Scan order is all horizontal candidates, then vertical, then diagonal;
//! overlapping matches are all reported in that order.
//!
//! Only the top-left to bottom-right diagonal is scanned.

use arrayvec::ArrayString;

use crate::dictionary::Dictionary;
use crate::grid::Grid;
use crate::types::{Direction, Position, WordMatch, MAX_WORD_LEN, MIN_WORD_LEN};

/// Candidate buffer: up to `MAX_WORD_LEN` chars of at most 4 UTF-8 bytes each
type Candidate = ArrayString<{ MAX_WORD_LEN * 4 }>;

/// Find every dictionary word laid out in the grid.
///
/// ```
/// use letter_cascade_core::{find_words, Dictionary, Grid};
/// use letter_cascade_core::types::{Direction, Position};
///
/// let grid = Grid::parse(&["CAT", "...", "..."]).unwrap();
/// let found = find_words(&grid, &Dictionary::from_words(["cat"]));
/// assert_eq!(found.len(), 1);
/// assert_eq!(found[0].start, Position::new(0, 0));
/// assert_eq!(found[0].end, Position::new(0, 2));
/// assert_eq!(found[0].direction, Direction::Horizontal);
/// ```
pub fn find_words(grid: &Grid, dictionary: &Dictionary) -> Vec<WordMatch> {
    let mut found = Vec::new();
    if dictionary.is_empty() || grid.is_empty() {
        return found;
    }

    for direction in Direction::ALL {
        for row in 0..grid.rows() {
            for col in 0..grid.cols() {
                scan_from(grid, dictionary, Position::new(row, col), direction, &mut found);
            }
        }
    }

    found
}

/// Remaining cells from `start` to the grid edge along `direction`
fn extent(grid: &Grid, start: Position, direction: Direction) -> usize {
    let to_right = grid.cols() - start.col;
    let to_bottom = grid.rows() - start.row;
    match direction {
        Direction::Horizontal => to_right,
        Direction::Vertical => to_bottom,
        Direction::DiagonalDown => to_right.min(to_bottom),
    }
}

fn scan_from(
    grid: &Grid,
    dictionary: &Dictionary,
    start: Position,
    direction: Direction,
    out: &mut Vec<WordMatch>,
) {
    let max_len = MAX_WORD_LEN.min(extent(grid, start, direction));
    if max_len < MIN_WORD_LEN {
        return;
    }

    let (dr, dc) = direction.step();
    let mut candidate = Candidate::new();
    for i in 0..max_len {
        let Some(letter) = grid.letter_at(start.row + dr * i, start.col + dc * i) else {
            // Every longer candidate would span this empty cell.
            return;
        };
        if candidate.try_push(letter).is_err() {
            return;
        }
        let len = i + 1;
        if len >= MIN_WORD_LEN && dictionary.contains_upper(&candidate) {
            out.push(WordMatch::new(candidate.as_str(), start, direction));
        }
    }
}
