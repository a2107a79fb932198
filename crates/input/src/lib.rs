//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events onto [`crate::types::Command`]s. Each key press
//! yields at most one command; repeats and releases are filtered by the caller.

pub mod map;

pub use tetris_cli_types as types;

pub use map::map_key;
