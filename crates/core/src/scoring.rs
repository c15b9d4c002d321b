//! Scoring module - word scores, level thresholds and fall speed
//!
//! Rules:
//! - A found word scores `length * POINTS_PER_LETTER` (so a 3-letter word is 30).
//! - The level for a score is `score / POINTS_PER_LEVEL + 1`.
//! - Fall interval is `BASE_FALL_MS - (level - 1) * FALL_STEP_MS`, floored at
//!   `MIN_FALL_MS`.
//!
//! The accumulators below are plain counters; the leveling policy lives with
//! the engine.

use crate::types::{BASE_FALL_MS, FALL_STEP_MS, MIN_FALL_MS, POINTS_PER_LETTER};

/// Score for a found word
pub fn word_score(word: &str) -> u32 {
    word.chars().count() as u32 * POINTS_PER_LETTER
}

/// Level reached at `score`, for a given level span
pub fn level_for_score(score: u32, points_per_level: u32) -> u32 {
    score / points_per_level.max(1) + 1
}

/// Fall interval parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallCurve {
    pub base_ms: u32,
    pub step_ms: u32,
    pub min_ms: u32,
}

impl FallCurve {
    /// Fall interval (in milliseconds) at `level`
    pub fn interval_ms(&self, level: u32) -> u32 {
        let reduction = level.saturating_sub(1).saturating_mul(self.step_ms);
        self.base_ms.saturating_sub(reduction).max(self.min_ms)
    }
}

impl Default for FallCurve {
    fn default() -> Self {
        Self {
            base_ms: BASE_FALL_MS,
            step_ms: FALL_STEP_MS,
            min_ms: MIN_FALL_MS,
        }
    }
}

/// Running score total
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreManager {
    score: u32,
}

impl ScoreManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_points(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn reset(&mut self) {
        self.score = 0;
    }
}

/// Current level, starting at 1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelManager {
    level: u32,
}

impl LevelManager {
    pub fn new() -> Self {
        Self { level: 1 }
    }

    /// Advance by exactly one level
    pub fn next_level(&mut self) {
        self.level += 1;
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn reset(&mut self) {
        self.level = 1;
    }
}

impl Default for LevelManager {
    fn default() -> Self {
        Self::new()
    }
}
