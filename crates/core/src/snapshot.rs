use crate::error::CatalogError;
use crate::game_state::{SessionPhase, Tetromino};
use crate::types::{PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub rotation: u8,
    pub x: i8,
    pub y: i8,
    /// Absolute positions of the four minos; rows may be negative.
    pub cells: [(i8, i8); 4],
}

impl TryFrom<Tetromino> for ActiveSnapshot {
    type Error = CatalogError;

    fn try_from(value: Tetromino) -> Result<Self, Self::Error> {
        Ok(Self {
            kind: value.kind,
            rotation: value.rotation,
            x: value.x,
            y: value.y,
            cells: value.cells()?,
        })
    }
}

/// Read-only copy of everything a renderer may show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameSnapshot {
    /// Locked cells, `[row][col]`; 0 is empty, otherwise [`PieceKind::code`].
    pub board: [[u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
    pub active: Option<ActiveSnapshot>,
    pub score: u32,
    pub lines: u32,
    pub pieces: u32,
    pub running: bool,
    pub phase: SessionPhase,
}

impl GameSnapshot {
    pub fn playable(&self) -> bool {
        self.running && self.active.is_some()
    }

    pub fn game_over(&self) -> bool {
        self.phase == SessionPhase::GameOver
    }

    /// Board with the active piece drawn in, clipped to the visible rows.
    pub fn composite(&self) -> [[u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize] {
        let mut grid = self.board;
        if let Some(active) = self.active {
            for &(x, y) in &active.cells {
                if (0..BOARD_WIDTH as i8).contains(&x) && (0..BOARD_HEIGHT as i8).contains(&y) {
                    grid[y as usize][x as usize] = active.kind.code();
                }
            }
        }
        grid
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            board: [[0u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
            active: None,
            score: 0,
            lines: 0,
            pieces: 0,
            running: false,
            phase: SessionPhase::Idle,
        }
    }
}
