//! Error types for the rule engine.
//!
//! Ordinary gameplay never produces an error: rejected moves are reported as
//! `false`. These variants describe internal invariant violations only.

use thiserror::Error;

use crate::types::PieceKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// Rotation index outside `0..rotation_count(kind)`.
    #[error("invalid rotation {rotation} for piece {kind:?} (has {count} rotations)")]
    InvalidRotation {
        kind: PieceKind,
        rotation: u8,
        count: u8,
    },
}
