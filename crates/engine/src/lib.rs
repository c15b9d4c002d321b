//! Game engine module - scheduling, input and collaborator wiring
//!
//! Builds on the pure rules in `letter_cascade_core`:
//!
//! - [`config`]: `EngineConfig` with defaults, validation and env overrides
//! - [`engine`]: the `Engine` state machine and per-tick loop
//! - [`ports`]: `Renderer`, `AudioSink` and `ParticleSink` interfaces
//! - [`app`]: `GameApp`, the composition root that wires them together
//!
//! # Example
//!
//! ```
//! use letter_cascade_core::Dictionary;
//! use letter_cascade_engine::{Engine, EngineConfig};
//! use letter_cascade_types::{GameCommand, GameStatus, TICK_MS};
//!
//! let mut engine = Engine::new(EngineConfig::default(), Dictionary::builtin()).unwrap();
//! engine.start();
//! engine.tick(TICK_MS); // spawns the first letter
//! engine.send(GameCommand::Drop);
//! assert_eq!(engine.state().letters_placed, 1);
//! assert_eq!(engine.status(), GameStatus::Playing);
//! ```

pub mod app;
pub mod config;
pub mod engine;
pub mod ports;

pub use letter_cascade_core as core;
pub use letter_cascade_types as types;

pub use app::GameApp;
pub use config::{ConfigError, EngineConfig, SpawnPolicy};
pub use engine::Engine;
pub use ports::{
    wire_audio, wire_particles, AudioSink, ParticleOptions, ParticleSink, Renderer, Sound,
};
