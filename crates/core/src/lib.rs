//! Core game logic module - pure, deterministic, and testable
//!
//! This crate contains the game rules and the state plumbing around them.
//! It has **no dependencies** on terminals, input devices or the scheduling
//! loop, making it:
//!
//! - **Deterministic**: Same seed produces the same letter sequence
//! - **Testable**: Every rule is reachable without a renderer
//! - **Portable**: Runs in a terminal, headless, or inside a test harness
//!
//! # Module Structure
//!
//! - [`grid`]: Rectangular letter grid; cells are never overwritten, only cleared
//! - [`letter`]: The single falling letter and its movement rules
//! - [`rng`]: Seeded LCG and uniform / frequency-weighted letter batches
//! - [`dictionary`]: Upper-cased word set with case-insensitive lookup
//! - [`detector`]: `find_words` over a grid snapshot
//! - [`scoring`]: Word score, level thresholds, fall curve, accumulators
//! - [`state`]: The `GameState` aggregate and partial updates
//! - [`history`]: Bounded undo/redo ring buffer
//! - [`store`]: `StateContainer`, the single writer of the game state
//! - [`events`]: Named event bus with one-shot listeners
//! - [`snapshot`]: JSON export/import with validation
//!
//! # Game Rules
//!
//! - **Gravity**: The falling letter descends one row per fall interval and is
//!   placed when the cell below is occupied or it reaches the bottom row
//! - **Words**: After every placement the whole grid is scanned horizontally,
//!   vertically and along the top-left to bottom-right diagonal for words of
//!   3 to 8 letters; every match is cleared and scores `length * 10`
//! - **Levels**: Level is `score / 100 + 1`; each level shortens the fall
//!   interval by 50ms down to a 200ms floor
//!
//! # Example
//!
//! ```
//! use letter_cascade_core::{find_words, Dictionary, StateContainer, GameState};
//! use letter_cascade_core::types::Position;
//!
//! let mut store = StateContainer::new(GameState::new(8, 8));
//! store.place_letter('D', Position::new(7, 0));
//! store.place_letter('O', Position::new(7, 1));
//! store.place_letter('G', Position::new(7, 2));
//!
//! let found = find_words(&store.state().grid, &Dictionary::from_words(["dog"]));
//! assert_eq!(found.len(), 1);
//! assert_eq!(store.clear_word(&found[0]), 3);
//! assert!(store.state().grid.is_empty());
//! ```

pub mod detector;
pub mod dictionary;
mod dispatch;
pub mod events;
pub mod grid;
pub mod history;
pub mod letter;
pub mod rng;
pub mod scoring;
pub mod snapshot;
pub mod state;
pub mod store;

pub use letter_cascade_types as types;

// Re-export commonly used types for convenience
pub use detector::find_words;
pub use dictionary::Dictionary;
pub use dispatch::install_panic_hook;
pub use events::{names, EventBus, GameEvent, ListenerId};
pub use grid::{Grid, GridError};
pub use history::History;
pub use letter::FallingLetter;
pub use rng::{LetterDistribution, LetterGenerator, SimpleRng};
pub use scoring::{level_for_score, word_score, FallCurve, LevelManager, ScoreManager};
pub use snapshot::{SavedGame, SnapshotError};
pub use state::{GameState, GameStats, StatePatch, UiFlags};
pub use store::{StateContainer, SubscriptionId};
