//! Pieces module - the shape catalog
//!
//! Every piece kind owns an ordered list of rotation states; each state is a
//! fixed set of four `(dx, dy)` offsets from the piece anchor. The tables are
//! the game's rule contract and are reproduced exactly, including the S, Z and
//! I states 2 and 3 that only shift the two distinct orientations by one cell.
//! There is no wall-kick table: a rotation either fits in place or is rejected.

use crate::error::CatalogError;
use crate::types::{PieceKind, BOARD_WIDTH};

/// Offset of a single mino relative to piece origin
pub type MinoOffset = (i8, i8);

/// Shape of a piece - 4 mino offsets from piece origin
pub type PieceShape = [MinoOffset; 4];

const I_SHAPES: [PieceShape; 4] = [
    [(0, 1), (1, 1), (2, 1), (3, 1)],
    [(1, 0), (1, 1), (1, 2), (1, 3)],
    [(0, 2), (1, 2), (2, 2), (3, 2)],
    [(2, 0), (2, 1), (2, 2), (2, 3)],
];

const J_SHAPES: [PieceShape; 4] = [
    [(0, 0), (0, 1), (1, 1), (2, 1)],
    [(1, 0), (2, 0), (1, 1), (1, 2)],
    [(0, 1), (1, 1), (2, 1), (2, 2)],
    [(1, 0), (1, 1), (0, 2), (1, 2)],
];

const L_SHAPES: [PieceShape; 4] = [
    [(0, 1), (1, 1), (2, 1), (2, 0)],
    [(1, 0), (1, 1), (1, 2), (2, 2)],
    [(0, 2), (0, 1), (1, 1), (2, 1)],
    [(0, 0), (1, 0), (1, 1), (1, 2)],
];

const O_SHAPES: [PieceShape; 1] = [[(0, 0), (1, 0), (0, 1), (1, 1)]];

const S_SHAPES: [PieceShape; 4] = [
    [(1, 0), (2, 0), (0, 1), (1, 1)],
    [(1, 0), (1, 1), (2, 1), (2, 2)],
    [(1, 1), (2, 1), (0, 2), (1, 2)],
    [(0, 0), (0, 1), (1, 1), (1, 2)],
];

const T_SHAPES: [PieceShape; 4] = [
    [(0, 1), (1, 1), (2, 1), (1, 0)],
    [(1, 0), (1, 1), (1, 2), (2, 1)],
    [(0, 1), (1, 1), (2, 1), (1, 2)],
    [(0, 1), (1, 1), (1, 0), (1, 2)],
];

const Z_SHAPES: [PieceShape; 4] = [
    [(0, 0), (1, 0), (1, 1), (2, 1)],
    [(2, 0), (1, 1), (2, 1), (1, 2)],
    [(0, 1), (1, 1), (1, 2), (2, 2)],
    [(1, 0), (0, 1), (1, 1), (0, 2)],
];

/// All rotation states of a kind, in rotation order.
pub fn rotations(kind: PieceKind) -> &'static [PieceShape] {
    match kind {
        PieceKind::I => &I_SHAPES,
        PieceKind::J => &J_SHAPES,
        PieceKind::L => &L_SHAPES,
        PieceKind::O => &O_SHAPES,
        PieceKind::S => &S_SHAPES,
        PieceKind::T => &T_SHAPES,
        PieceKind::Z => &Z_SHAPES,
    }
}

/// Number of valid rotation indices for a kind (1 for O, 4 otherwise).
pub fn rotation_count(kind: PieceKind) -> u8 {
    rotations(kind).len() as u8
}

/// Get the shape (mino offsets) for a piece kind and rotation index
pub fn shape_cells(kind: PieceKind, rotation: u8) -> Result<PieceShape, CatalogError> {
    rotations(kind)
        .get(rotation as usize)
        .copied()
        .ok_or(CatalogError::InvalidRotation {
            kind,
            rotation,
            count: rotation_count(kind),
        })
}

/// Rotation index reached by one clockwise step from `rotation`.
pub fn next_rotation(kind: PieceKind, rotation: u8) -> u8 {
    rotation.wrapping_add(1) % rotation_count(kind)
}

/// Spawn anchor `(x, y)` for rotation 0.
///
/// Horizontally centered on the board using the widest column of the shape,
/// vertically placed so the topmost occupied row lands on board row 0.
pub fn spawn_position(kind: PieceKind) -> (i8, i8) {
    let shape = &rotations(kind)[0];
    let piece_width = shape.iter().map(|&(dx, _)| dx).max().unwrap_or(0) + 1;
    let min_dy = shape.iter().map(|&(_, dy)| dy).min().unwrap_or(0);
    let x = (BOARD_WIDTH as i8 - piece_width).div_euclid(2);
    (x, -min_dy)
}
