//! Core game logic - the rule engine, pure and testable
//!
//! This crate owns every rule of the game: piece geometry, collision legality,
//! locking, row clearing, scoring and the session lifecycle. It has **zero
//! dependencies** on terminals, input devices or timers, which makes it:
//!
//! - **Deterministic**: same seed, same command sequence, same game
//! - **Testable**: every rule can be exercised without a terminal
//! - **Portable**: renderers and schedulers only see [`GameSnapshot`]s
//!
//! # Module Structure
//!
//! - [`pieces`]: the shape catalog (seven kinds, fixed rotation tables)
//! - [`board`]: 10x20 grid of locked cells with row clearing
//! - [`game_state`]: [`GameSession`], the single mutator of the board
//! - [`scoring`]: points per lock
//! - [`rng`]: seeded uniform piece selection
//! - [`snapshot`]: copy-on-read state handed to renderers
//! - [`error`]: internal invariant violations
//!
//! # Game Rules
//!
//! - **Uniform randomizer**: every spawn picks one of the seven kinds with equal odds
//! - **Rotation**: one direction, in place, no wall kicks
//! - **Gravity**: one row per timer tick; a piece that cannot fall locks immediately
//! - **Scoring**: `n * 100 * 2^(n-1)` for `n` rows cleared by one lock
//! - **Game over**: a spawn collides, or a piece locks with a mino above row 0
//!
//! # Example
//!
//! ```
//! use tetris_cli_core::{GameSession, SessionPhase};
//! use tetris_cli_types::Command;
//!
//! let mut game = GameSession::new(12345);
//! assert!(game.start());
//!
//! game.apply_command(Command::MoveRight);
//! game.apply_command(Command::Rotate);
//! game.apply_command(Command::HardDrop);
//!
//! assert_eq!(game.phase(), SessionPhase::Falling);
//! assert_eq!(game.board().filled_count(), 4);
//! ```

pub mod board;
pub mod error;
pub mod game_state;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use tetris_cli_types as types;

pub use board::{Board, ClearedRows};
pub use error::CatalogError;
pub use game_state::{GameSession, LockOutcome, SessionPhase, Tetromino};
pub use pieces::{rotation_count, shape_cells, spawn_position, PieceShape};
pub use rng::{PiecePicker, SimpleRng};
pub use scoring::line_clear_score;
pub use snapshot::{ActiveSnapshot, GameSnapshot};
