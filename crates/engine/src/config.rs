//! Engine configuration structures and loaders.

use std::env;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use letter_cascade_core::{FallCurve, LetterDistribution};
use letter_cascade_types::{
    BASE_FALL_MS, DEFAULT_COLUMNS, DEFAULT_ROWS, FALL_STEP_MS, HISTORY_CAPACITY, MIN_FALL_MS,
    NEARLY_FULL_PERCENT, POINTS_PER_LEVEL, QUEUE_REFILL_BATCH,
};

/// Rejected configuration values
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("grid must be at least 1x1, got {rows}x{columns}")]
    EmptyGrid { rows: usize, columns: usize },
    #[error("minimum fall interval {min_ms}ms exceeds base interval {base_ms}ms")]
    FallFloorAboveBase { base_ms: u32, min_ms: u32 },
    #[error("minimum fall interval must be positive")]
    ZeroFallFloor,
    #[error("queue refill batch must be positive")]
    ZeroRefillBatch,
    #[error("points per level must be positive")]
    ZeroPointsPerLevel,
    #[error("nearly-full threshold {0}% is outside 1..=100")]
    Threshold(u32),
    #[error("spawn column {col} is outside a {columns}-column grid")]
    SpawnColumn { col: usize, columns: usize },
}

/// Column a new falling letter appears in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpawnPolicy {
    /// Uniformly random column drawn from the letter generator
    #[default]
    Random,
    /// Middle column (left of centre for even widths)
    Center,
    /// Always the same column
    Fixed(usize),
}

impl SpawnPolicy {
    /// Parse `random`, `center` or a column number
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "random" => Some(SpawnPolicy::Random),
            "center" | "centre" => Some(SpawnPolicy::Center),
            other => other.parse().ok().map(SpawnPolicy::Fixed),
        }
    }
}

/// Engine-wide settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub columns: usize,
    pub rows: usize,
    pub seed: u32,
    pub distribution: LetterDistribution,
    pub spawn: SpawnPolicy,
    pub refill_batch: usize,
    pub base_fall_ms: u32,
    pub fall_step_ms: u32,
    pub min_fall_ms: u32,
    pub points_per_level: u32,
    pub nearly_full_percent: u32,
    /// Session ends once play time reaches this; `None` disables the limit
    pub time_limit_ms: Option<u64>,
    pub history_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS,
            rows: DEFAULT_ROWS,
            seed: 1,
            distribution: LetterDistribution::default(),
            spawn: SpawnPolicy::default(),
            refill_batch: QUEUE_REFILL_BATCH,
            base_fall_ms: BASE_FALL_MS,
            fall_step_ms: FALL_STEP_MS,
            min_fall_ms: MIN_FALL_MS,
            points_per_level: POINTS_PER_LEVEL,
            nearly_full_percent: NEARLY_FULL_PERCENT,
            time_limit_ms: None,
            history_capacity: HISTORY_CAPACITY,
        }
    }
}

impl EngineConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables (unparsable values are ignored):
    /// - `LETTER_CASCADE_COLUMNS` / `LETTER_CASCADE_ROWS` - Grid size (default: 8x8)
    /// - `LETTER_CASCADE_SEED` - RNG seed (default: 1)
    /// - `LETTER_CASCADE_DISTRIBUTION` - `uniform` or `weighted` (default: weighted)
    /// - `LETTER_CASCADE_SPAWN` - `random`, `center` or a column (default: random)
    /// - `LETTER_CASCADE_BASE_FALL_MS` - Fall interval at level 1 (default: 1000)
    /// - `LETTER_CASCADE_MIN_FALL_MS` - Fall interval floor (default: 200)
    /// - `LETTER_CASCADE_TIME_LIMIT_MS` - Session time limit (default: none)
    /// - `LETTER_CASCADE_HISTORY` - Undo history capacity (default: 50)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(columns) = read_env::<usize>("LETTER_CASCADE_COLUMNS") {
            config.columns = columns.max(1);
        }
        if let Some(rows) = read_env::<usize>("LETTER_CASCADE_ROWS") {
            config.rows = rows.max(1);
        }
        if let Some(seed) = read_env::<u32>("LETTER_CASCADE_SEED") {
            config.seed = seed;
        }
        if let Some(distribution) =
            read_env_with("LETTER_CASCADE_DISTRIBUTION", LetterDistribution::from_str)
        {
            config.distribution = distribution;
        }
        if let Some(spawn) = read_env_with("LETTER_CASCADE_SPAWN", SpawnPolicy::from_str) {
            config.spawn = spawn;
        }
        if let Some(ms) = read_env::<u32>("LETTER_CASCADE_BASE_FALL_MS") {
            config.base_fall_ms = ms;
        }
        if let Some(ms) = read_env::<u32>("LETTER_CASCADE_MIN_FALL_MS") {
            config.min_fall_ms = ms;
        }
        if let Some(ms) = read_env::<u64>("LETTER_CASCADE_TIME_LIMIT_MS") {
            config.time_limit_ms = (ms > 0).then_some(ms);
        }
        if let Some(capacity) = read_env::<usize>("LETTER_CASCADE_HISTORY") {
            config.history_capacity = capacity.max(1);
        }

        config
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.columns == 0 {
            return Err(ConfigError::EmptyGrid {
                rows: self.rows,
                columns: self.columns,
            });
        }
        if self.min_fall_ms == 0 {
            return Err(ConfigError::ZeroFallFloor);
        }
        if self.min_fall_ms > self.base_fall_ms {
            return Err(ConfigError::FallFloorAboveBase {
                base_ms: self.base_fall_ms,
                min_ms: self.min_fall_ms,
            });
        }
        if self.refill_batch == 0 {
            return Err(ConfigError::ZeroRefillBatch);
        }
        if self.points_per_level == 0 {
            return Err(ConfigError::ZeroPointsPerLevel);
        }
        if !(1..=100).contains(&self.nearly_full_percent) {
            return Err(ConfigError::Threshold(self.nearly_full_percent));
        }
        if let SpawnPolicy::Fixed(col) = self.spawn {
            if col >= self.columns {
                return Err(ConfigError::SpawnColumn {
                    col,
                    columns: self.columns,
                });
            }
        }
        Ok(())
    }

    pub fn fall_curve(&self) -> FallCurve {
        FallCurve {
            base_ms: self.base_fall_ms,
            step_ms: self.fall_step_ms,
            min_ms: self.min_fall_ms,
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

fn read_env_with<T>(key: &str, parse: impl FnOnce(&str) -> Option<T>) -> Option<T> {
    parse(&env::var(key).ok()?)
}
