//! Terminal input module (engine-facing).
//!
//! This module is independent of any UI framework. It maps `crossterm` key
//! events into [`crate::types::GameCommand`]s, which the front end delivers
//! to the engine as `keyPress` events.

pub mod map;

pub use letter_cascade_types as types;

pub use map::{handle_key_event, history_step, should_quit, HistoryStep};
