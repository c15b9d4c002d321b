//! Snapshot module - JSON export/import of the game state
//!
//! The exported document is `{"state": <GameState>, "timestamp": <RFC 3339>}`.
//! Imports are validated against the live session before anything is
//! replaced: the grid must have the session's dimensions, a falling letter
//! must sit inside it on a free cell, and every queued letter must be an
//! uppercase letter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::state::GameState;

/// Why an import was rejected
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("malformed snapshot: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("snapshot grid is {found_rows}x{found_cols}, session grid is {rows}x{cols}")]
    GridShape {
        rows: usize,
        cols: usize,
        found_rows: usize,
        found_cols: usize,
    },
    #[error("falling letter at ({row}, {col}) is outside the grid or on an occupied cell")]
    FallingLetterOutOfBounds { row: usize, col: usize },
    #[error("{0:?} is not an uppercase letter")]
    NotALetter(char),
}

/// Serialized form of a saved game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedGame {
    pub state: GameState,
    pub timestamp: DateTime<Utc>,
}

impl SavedGame {
    /// Capture `state` with the current wall-clock time
    pub fn capture(state: &GameState) -> Self {
        Self {
            state: state.clone(),
            timestamp: Utc::now(),
        }
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse and validate a snapshot for a `rows` x `cols` session
    pub fn from_json(json: &str, rows: usize, cols: usize) -> Result<Self, SnapshotError> {
        let saved: SavedGame = serde_json::from_str(json)?;
        validate(&saved.state, rows, cols)?;
        Ok(saved)
    }
}

/// Check an incoming state against the session's grid dimensions
pub fn validate(state: &GameState, rows: usize, cols: usize) -> Result<(), SnapshotError> {
    let grid = &state.grid;
    if grid.rows() != rows || grid.cols() != cols {
        return Err(SnapshotError::GridShape {
            rows,
            cols,
            found_rows: grid.rows(),
            found_cols: grid.cols(),
        });
    }

    if let Some(falling) = state.falling_letter {
        if !grid.is_free(falling.row, falling.col) {
            return Err(SnapshotError::FallingLetterOutOfBounds {
                row: falling.row,
                col: falling.col,
            });
        }
        if !falling.letter.is_ascii_uppercase() {
            return Err(SnapshotError::NotALetter(falling.letter));
        }
    }

    if let Some(&bad) = state.letter_queue.iter().find(|c| !c.is_ascii_uppercase()) {
        return Err(SnapshotError::NotALetter(bad));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use crate::letter::FallingLetter;

    #[test]
    fn test_capture_roundtrip() {
        let mut state = GameState::new(4, 4);
        state.grid.place(3, 1, 'c');
        state.score = 30;
        let json = SavedGame::capture(&state).to_json().unwrap();
        assert!(json.contains("\"timestamp\""));

        let restored = SavedGame::from_json(&json, 4, 4).unwrap();
        assert_eq!(restored.state, state);
        assert_eq!(restored.state.grid.letter_at(3, 1), Some('C'));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(
            SavedGame::from_json("not json", 8, 8),
            Err(SnapshotError::Parse(_))
        ));
        assert!(matches!(
            SavedGame::from_json("{\"state\": 3}", 8, 8),
            Err(SnapshotError::Parse(_))
        ));
    }

    #[test]
    fn test_rejects_wrong_shape() {
        let json = SavedGame::capture(&GameState::new(5, 5)).to_json().unwrap();
        assert!(matches!(
            SavedGame::from_json(&json, 8, 8),
            Err(SnapshotError::GridShape { found_rows: 5, .. })
        ));
    }

    #[test]
    fn test_rejects_ragged_grid() {
        let mut doc = serde_json::to_value(SavedGame::capture(&GameState::new(2, 2))).unwrap();
        doc["state"]["grid"] = serde_json::json!([[null], [null, null]]);
        assert!(matches!(
            SavedGame::from_json(&doc.to_string(), 2, 2),
            Err(SnapshotError::Parse(_))
        ));
    }

    #[test]
    fn test_rejects_falling_letter_outside_grid() {
        let mut state = GameState::new(3, 3);
        state.falling_letter = Some(FallingLetter {
            letter: 'A',
            col: 5,
            row: 0,
        });
        assert!(matches!(
            validate(&state, 3, 3),
            Err(SnapshotError::FallingLetterOutOfBounds { col: 5, .. })
        ));

        state.falling_letter = None;
        state.grid = Grid::parse(&["...", "...", "..."]).unwrap();
        state.letter_queue.push_back('7');
        assert!(matches!(
            validate(&state, 3, 3),
            Err(SnapshotError::NotALetter('7'))
        ));
    }
}
