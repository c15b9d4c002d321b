//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the game.
//! All types are plain data with no game logic attached, making them usable in
//! any context (core logic, terminal rendering, input mapping, persistence).
//!
//! # Grid Dimensions
//!
//! The default playfield is an 8x8 grid:
//!
//! - **Columns**: 8 (indexed 0-7, left to right)
//! - **Rows**: 8 (indexed 0-7, top to bottom)
//! - **Spawn row**: 0
//!
//! Dimensions are fixed for the lifetime of one game session but may be chosen
//! per session through the engine configuration.
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Scheduling interval (~60 FPS) |
//! | `BASE_FALL_MS` | 1000 | Fall interval at level 1 |
//! | `FALL_STEP_MS` | 50 | Fall interval reduction per level |
//! | `MIN_FALL_MS` | 200 | Fall interval floor |
//!
//! # Scoring Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `POINTS_PER_LETTER` | 10 | Word score is `length * 10` |
//! | `POINTS_PER_LEVEL` | 100 | Level is `score / 100 + 1` |
//! | `MIN_WORD_LEN` | 3 | Shortest detectable word |
//! | `MAX_WORD_LEN` | 8 | Longest detectable word |
//!
//! # Examples
//!
//! ```
//! use letter_cascade_types::{Direction, GameCommand, DEFAULT_COLUMNS, DEFAULT_ROWS};
//!
//! // Parse a command (case-insensitive)
//! let command = GameCommand::from_str("moveLeft").unwrap();
//! assert_eq!(command, GameCommand::MoveLeft);
//!
//! // Directions have a stable wire name
//! assert_eq!(Direction::DiagonalDown.as_str(), "diagonal");
//!
//! // Grid dimensions
//! assert_eq!(DEFAULT_COLUMNS, 8);
//! assert_eq!(DEFAULT_ROWS, 8);
//! ```

use serde::{Deserialize, Serialize};

/// Default grid width in cells (8 columns)
pub const DEFAULT_COLUMNS: usize = 8;

/// Default grid height in cells (8 rows)
pub const DEFAULT_ROWS: usize = 8;

/// Scheduling interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Fall interval at level 1 (1000ms = 1 second per row)
pub const BASE_FALL_MS: u32 = 1000;

/// Fall interval reduction per level above 1
pub const FALL_STEP_MS: u32 = 50;

/// Fall interval floor
pub const MIN_FALL_MS: u32 = 200;

/// Points awarded per letter of a found word
pub const POINTS_PER_LETTER: u32 = 10;

/// Score span of one level
pub const POINTS_PER_LEVEL: u32 = 100;

/// Shortest word the detector tests
pub const MIN_WORD_LEN: usize = 3;

/// Longest word the detector tests
pub const MAX_WORD_LEN: usize = 8;

/// Number of letters appended to the queue on each refill
pub const QUEUE_REFILL_BATCH: usize = 10;

/// Number of pre-mutation snapshots kept for undo/redo
pub const HISTORY_CAPACITY: usize = 50;

/// Occupancy (percent of all cells) at which the grid counts as nearly full
pub const NEARLY_FULL_PERCENT: u32 = 85;

/// A cell on the game grid
///
/// - `None`: Empty cell
/// - `Some(char)`: Cell holding a placed uppercase letter
pub type Cell = Option<char>;

/// A grid coordinate (row 0 is the top row, col 0 the leftmost column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Scan direction of a detected word
///
/// - **Horizontal**: left to right along a row
/// - **Vertical**: top to bottom along a column
/// - **DiagonalDown**: top-left to bottom-right
///
/// The anti-diagonal (top-right to bottom-left) is not a scan direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    Horizontal,
    Vertical,
    #[serde(rename = "diagonal")]
    DiagonalDown,
}

impl Direction {
    /// All scanned directions, in detection order
    pub const ALL: [Direction; 3] = [
        Direction::Horizontal,
        Direction::Vertical,
        Direction::DiagonalDown,
    ];

    /// Per-step `(row, col)` offset
    pub const fn step(&self) -> (usize, usize) {
        match self {
            Direction::Horizontal => (0, 1),
            Direction::Vertical => (1, 0),
            Direction::DiagonalDown => (1, 1),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Horizontal => "horizontal",
            Direction::Vertical => "vertical",
            Direction::DiagonalDown => "diagonal",
        }
    }
}

/// A contiguous run of grid letters equal to a dictionary word
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WordMatch {
    pub word: String,
    pub start: Position,
    pub end: Position,
    pub direction: Direction,
}

impl WordMatch {
    /// Build a match from its start cell, deriving the end cell from the word length.
    ///
    /// `word` must be non-empty.
    pub fn new(word: impl Into<String>, start: Position, direction: Direction) -> Self {
        let word = word.into();
        let span = word.chars().count().saturating_sub(1);
        let (dr, dc) = direction.step();
        let end = Position::new(start.row + dr * span, start.col + dc * span);
        Self {
            word,
            start,
            end,
            direction,
        }
    }

    /// Number of letters in the match
    pub fn len(&self) -> usize {
        self.word.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.word.is_empty()
    }

    /// Every cell covered by the match, from start to end
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        let (dr, dc) = self.direction.step();
        let start = self.start;
        (0..self.len()).map(move |i| Position::new(start.row + dr * i, start.col + dc * i))
    }
}

/// Lifecycle status of a game session
///
/// ```text
/// Idle --start--> Playing <--pause--> Paused
/// Playing --(grid nearly full | time limit)--> GameOver --reset--> Idle
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    Idle,
    Playing,
    Paused,
    GameOver,
}

impl GameStatus {
    /// Derive the status from the `running` / `paused` / `over` state flags
    pub fn from_flags(running: bool, paused: bool, over: bool) -> Self {
        match (running, paused, over) {
            (_, _, true) => GameStatus::GameOver,
            (true, true, false) => GameStatus::Paused,
            (true, false, false) => GameStatus::Playing,
            (false, _, false) => GameStatus::Idle,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Idle => "idle",
            GameStatus::Playing => "playing",
            GameStatus::Paused => "paused",
            GameStatus::GameOver => "gameOver",
        }
    }
}

/// Screen the presentation layer should show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Screen {
    #[default]
    Game,
    Menu,
    Pause,
    GameOver,
}

/// Abstract player commands
///
/// Input adapters translate raw device events into these commands and deliver
/// them through the event bus; the engine never sees device-specific keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GameCommand {
    /// Move the falling letter one column left
    MoveLeft,
    /// Move the falling letter one column right
    MoveRight,
    /// Drop the falling letter to the lowest free cell and place it
    Drop,
    /// Toggle pause state
    Pause,
    /// Start a new game from the idle state
    Start,
    /// Reset the session back to idle
    Reset,
}

impl GameCommand {
    /// Parse a command from its camelCase name (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use letter_cascade_types::GameCommand;
    ///
    /// assert_eq!(GameCommand::from_str("moveRight"), Some(GameCommand::MoveRight));
    /// assert_eq!(GameCommand::from_str("DROP"), Some(GameCommand::Drop));
    /// assert_eq!(GameCommand::from_str("rotate"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(GameCommand::MoveLeft),
            "moveright" => Some(GameCommand::MoveRight),
            "drop" => Some(GameCommand::Drop),
            "pause" => Some(GameCommand::Pause),
            "start" => Some(GameCommand::Start),
            "reset" => Some(GameCommand::Reset),
            _ => None,
        }
    }

    /// Convert to camelCase name
    pub fn as_str(&self) -> &'static str {
        match self {
            GameCommand::MoveLeft => "moveLeft",
            GameCommand::MoveRight => "moveRight",
            GameCommand::Drop => "drop",
            GameCommand::Pause => "pause",
            GameCommand::Start => "start",
            GameCommand::Reset => "reset",
        }
    }
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GameOverReason {
    /// Occupancy reached the nearly-full threshold
    GridFull,
    /// The spawn cell of a new letter was already occupied
    SpawnBlocked,
    /// Accumulated play time reached the configured limit
    TimeLimit,
}

impl GameOverReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameOverReason::GridFull => "gridFull",
            GameOverReason::SpawnBlocked => "spawnBlocked",
            GameOverReason::TimeLimit => "timeLimit",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leveling_defaults() {
        assert_eq!(BASE_FALL_MS, 1000);
        assert_eq!(FALL_STEP_MS, 50);
        assert_eq!(MIN_FALL_MS, 200);
        assert_eq!(POINTS_PER_LEVEL, 100);
        assert_eq!(POINTS_PER_LETTER, 10);
        assert_eq!(HISTORY_CAPACITY, 50);
    }

    #[test]
    fn word_match_cells_follow_direction() {
        let m = WordMatch::new("CAT", Position::new(1, 2), Direction::DiagonalDown);
        assert_eq!(m.end, Position::new(3, 4));
        let cells: Vec<_> = m.cells().collect();
        assert_eq!(
            cells,
            vec![Position::new(1, 2), Position::new(2, 3), Position::new(3, 4)]
        );

        let v = WordMatch::new("DOG", Position::new(0, 3), Direction::Vertical);
        assert_eq!(v.end, Position::new(2, 3));
    }

    #[test]
    fn status_flags_roundtrip() {
        assert_eq!(GameStatus::from_flags(false, false, false), GameStatus::Idle);
        assert_eq!(GameStatus::from_flags(true, false, false), GameStatus::Playing);
        assert_eq!(GameStatus::from_flags(true, true, false), GameStatus::Paused);
        assert_eq!(GameStatus::from_flags(false, false, true), GameStatus::GameOver);
    }
}
