//! Terminal Tetris (workspace facade crate).
//!
//! The rule engine, scheduler, key map and renderer live in dedicated crates
//! under `crates/`; this package re-exports them as
//! `tetris_cli::{core,engine,input,term,types}` and hosts the binary.

pub mod config;

pub use tetris_cli_core as core;
pub use tetris_cli_engine as engine;
pub use tetris_cli_input as input;
pub use tetris_cli_term as term;
pub use tetris_cli_types as types;
