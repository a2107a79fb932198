//! Core types module - shared data structures and constants
//!
//! Pure data types used by every other crate in the workspace: the rule engine,
//! the dispatcher, the key mapping and the terminal renderer. Nothing here
//! depends on I/O.
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 rows (indexed 0-19, row 0 at the top)
//!
//! Rows above the visible board (`y < 0`) exist only transiently while a piece
//! passes through them; the board never stores them.
//!
//! # Timing
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `FALL_INTERVAL_MS` | 1000 | Period of the automatic fall timer |
//!
//! # Examples
//!
//! ```
//! use tetris_cli_types::{Cell, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! let kind = PieceKind::from_code(6).unwrap();
//! assert_eq!(kind, PieceKind::T);
//! assert!(Cell::Filled(kind).is_filled());
//! assert_eq!(Cell::Filled(kind).code(), 6);
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 20);
//! ```

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;
/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: u8 = 20;

/// Default period of the automatic fall (milliseconds per row).
pub const FALL_INTERVAL_MS: u64 = 1000;

/// Base points for a single cleared row. Multi-row clears double per extra row.
pub const LINE_CLEAR_BASE: u32 = 100;

/// Tetromino piece kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

impl PieceKind {
    /// Every kind, in catalog order.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::S,
        PieceKind::T,
        PieceKind::Z,
    ];

    /// Stable 1-based code used in snapshot grids (0 means empty).
    pub fn code(&self) -> u8 {
        match self {
            PieceKind::I => 1,
            PieceKind::J => 2,
            PieceKind::L => 3,
            PieceKind::O => 4,
            PieceKind::S => 5,
            PieceKind::T => 6,
            PieceKind::Z => 7,
        }
    }

    /// Inverse of [`PieceKind::code`].
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(PieceKind::I),
            2 => Some(PieceKind::J),
            3 => Some(PieceKind::L),
            4 => Some(PieceKind::O),
            5 => Some(PieceKind::S),
            6 => Some(PieceKind::T),
            7 => Some(PieceKind::Z),
            _ => None,
        }
    }
}

/// State of a single board position.
///
/// A filled cell remembers which kind locked it so the renderer can color it;
/// the rules only ever look at empty vs filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    Filled(PieceKind),
}

impl Cell {
    pub fn is_filled(&self) -> bool {
        matches!(self, Cell::Filled(_))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Snapshot code: 0 for empty, [`PieceKind::code`] otherwise.
    pub fn code(&self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Filled(kind) => kind.code(),
        }
    }
}

/// Discrete player commands delivered by the input source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveLeft,
    MoveRight,
    SoftDrop,
    Rotate,
    HardDrop,
    Restart,
    Quit,
}
