//! Game state module - the canonical game state aggregate
//!
//! `GameState` is plain data: the `StateContainer` owns the only live copy and
//! funnels every change through a `StatePatch`. Fields are public so renderers
//! and tests can read them off the `&GameState` the container hands out.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::grid::Grid;
use crate::letter::FallingLetter;
use crate::types::{GameStatus, Screen, BASE_FALL_MS};

/// Presentation hints carried alongside the game state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiFlags {
    pub show_pause_menu: bool,
    pub show_game_over: bool,
    pub show_level_up: bool,
    pub current_screen: Screen,
}

/// Complete game state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub running: bool,
    pub paused: bool,
    pub over: bool,
    pub level: u32,
    pub score: u32,
    pub combo: u32,
    pub max_combo: u32,
    pub grid: Grid,
    pub letter_queue: VecDeque<char>,
    pub falling_letter: Option<FallingLetter>,
    pub words_found: Vec<String>,
    pub letters_placed: u32,
    pub words_completed: u32,
    pub total_score: u32,
    /// Accumulated time spent in the playing state
    pub play_time_ms: u64,
    /// Unix timestamp (milliseconds) of the last start
    pub started_at_ms: Option<i64>,
    /// Current fall interval
    pub fall_speed_ms: u32,
    pub ui: UiFlags,
}

impl GameState {
    /// Fresh idle state with an empty `rows` x `cols` grid
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            running: false,
            paused: false,
            over: false,
            level: 1,
            score: 0,
            combo: 0,
            max_combo: 0,
            grid: Grid::new(rows, cols),
            letter_queue: VecDeque::new(),
            falling_letter: None,
            words_found: Vec::new(),
            letters_placed: 0,
            words_completed: 0,
            total_score: 0,
            play_time_ms: 0,
            started_at_ms: None,
            fall_speed_ms: BASE_FALL_MS,
            ui: UiFlags::default(),
        }
    }

    /// Lifecycle status derived from the flags
    pub fn status(&self) -> GameStatus {
        GameStatus::from_flags(self.running, self.paused, self.over)
    }

    /// Whether gravity and input currently apply
    pub fn playable(&self) -> bool {
        self.status() == GameStatus::Playing
    }

    /// Up to `count` upcoming letters, front first
    pub fn upcoming(&self, count: usize) -> impl Iterator<Item = char> + '_ {
        self.letter_queue.iter().copied().take(count)
    }

    pub fn stats(&self) -> GameStats {
        GameStats {
            score: self.score,
            level: self.level,
            combo: self.combo,
            max_combo: self.max_combo,
            words_found: self.words_found.len(),
            words_completed: self.words_completed,
            letters_placed: self.letters_placed,
            total_score: self.total_score,
            play_time_ms: self.play_time_ms,
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(crate::types::DEFAULT_ROWS, crate::types::DEFAULT_COLUMNS)
    }
}

/// Summary statistics for a session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStats {
    pub score: u32,
    pub level: u32,
    pub combo: u32,
    pub max_combo: u32,
    pub words_found: usize,
    pub words_completed: u32,
    pub letters_placed: u32,
    pub total_score: u32,
    pub play_time_ms: u64,
}

/// A partial update; `None` fields are left unchanged.
///
/// `falling_letter` and `started_at_ms` are doubly optional: `Some(None)`
/// clears the value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatePatch {
    pub running: Option<bool>,
    pub paused: Option<bool>,
    pub over: Option<bool>,
    pub level: Option<u32>,
    pub score: Option<u32>,
    pub combo: Option<u32>,
    pub max_combo: Option<u32>,
    pub grid: Option<Grid>,
    pub letter_queue: Option<VecDeque<char>>,
    pub falling_letter: Option<Option<FallingLetter>>,
    pub words_found: Option<Vec<String>>,
    pub letters_placed: Option<u32>,
    pub words_completed: Option<u32>,
    pub total_score: Option<u32>,
    pub play_time_ms: Option<u64>,
    pub started_at_ms: Option<Option<i64>>,
    pub fall_speed_ms: Option<u32>,
    pub ui: Option<UiFlags>,
}

impl StatePatch {
    /// Merge the set fields into `state`
    pub fn apply(self, state: &mut GameState) {
        if let Some(v) = self.running {
            state.running = v;
        }
        if let Some(v) = self.paused {
            state.paused = v;
        }
        if let Some(v) = self.over {
            state.over = v;
        }
        if let Some(v) = self.level {
            state.level = v;
        }
        if let Some(v) = self.score {
            state.score = v;
        }
        if let Some(v) = self.combo {
            state.combo = v;
        }
        if let Some(v) = self.max_combo {
            state.max_combo = v;
        }
        if let Some(v) = self.grid {
            state.grid = v;
        }
        if let Some(v) = self.letter_queue {
            state.letter_queue = v;
        }
        if let Some(v) = self.falling_letter {
            state.falling_letter = v;
        }
        if let Some(v) = self.words_found {
            state.words_found = v;
        }
        if let Some(v) = self.letters_placed {
            state.letters_placed = v;
        }
        if let Some(v) = self.words_completed {
            state.words_completed = v;
        }
        if let Some(v) = self.total_score {
            state.total_score = v;
        }
        if let Some(v) = self.play_time_ms {
            state.play_time_ms = v;
        }
        if let Some(v) = self.started_at_ms {
            state.started_at_ms = v;
        }
        if let Some(v) = self.fall_speed_ms {
            state.fall_speed_ms = v;
        }
        if let Some(v) = self.ui {
            state.ui = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_idle() {
        let state = GameState::new(8, 8);
        assert_eq!(state.status(), GameStatus::Idle);
        assert_eq!(state.level, 1);
        assert_eq!(state.fall_speed_ms, BASE_FALL_MS);
        assert!(state.grid.is_empty());
        assert!(!state.playable());
    }

    #[test]
    fn test_patch_merges_only_set_fields() {
        let mut state = GameState::default();
        state.score = 40;
        StatePatch {
            level: Some(3),
            falling_letter: Some(Some(FallingLetter::new('Q', 2))),
            ..Default::default()
        }
        .apply(&mut state);
        assert_eq!(state.score, 40);
        assert_eq!(state.level, 3);
        assert_eq!(state.falling_letter.map(|l| l.letter), Some('Q'));

        StatePatch {
            falling_letter: Some(None),
            ..Default::default()
        }
        .apply(&mut state);
        assert_eq!(state.falling_letter, None);
    }

    #[test]
    fn test_serde_uses_camel_case() {
        let json = serde_json::to_value(GameState::new(2, 3)).unwrap();
        assert!(json.get("maxCombo").is_some());
        assert!(json.get("letterQueue").is_some());
        assert_eq!(json["grid"].as_array().map(Vec::len), Some(2));
        assert_eq!(json["ui"]["currentScreen"], "game");
    }

    #[test]
    fn test_upcoming_preview() {
        let mut state = GameState::default();
        state.letter_queue.extend(['A', 'B', 'C']);
        assert_eq!(state.upcoming(2).collect::<String>(), "AB");
        assert_eq!(state.upcoming(10).count(), 3);
    }
}
