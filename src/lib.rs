//! Letter Cascade (workspace facade crate).
//!
//! Re-exports the member crates under short paths so the binary, benches and
//! integration tests can write `letter_cascade::{core,engine,...}`.

pub use letter_cascade_core as core;
pub use letter_cascade_engine as engine;
pub use letter_cascade_input as input;
pub use letter_cascade_term as term;
pub use letter_cascade_types as types;
