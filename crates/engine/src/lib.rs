//! Scheduling layer between the outside world and the rule engine.
//!
//! Owns the single event queue that serializes timer ticks and player
//! commands, and the fall timer that produces the ticks. Nothing here decides
//! game rules; it only decides *when* the session is asked to act.

pub mod dispatcher;
pub mod timer;

pub use tetris_cli_core as core;
pub use tetris_cli_types as types;

pub use dispatcher::{Dispatcher, Event, Flow};
pub use timer::FallTimer;
