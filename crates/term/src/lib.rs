//! Terminal presentation for the game.
//!
//! Snapshots are laid out into a plain framebuffer (two terminal columns per
//! board cell) and flushed through crossterm, redrawing only changed runs.
//!
//! - [`fb`]: styled character grid
//! - [`game_view`]: pure snapshot-to-framebuffer layout
//! - [`renderer`]: the [`Renderer`] contract and [`TerminalRenderer`]

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use tetris_cli_core as core;
pub use tetris_cli_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{GameView, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, Renderer, TerminalRenderer};
