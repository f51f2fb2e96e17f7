//! Move records.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Piece, Square};

/// The most recent half-move: which piece moved, from where, to where.
///
/// Only the latest record is kept. It exists so en passant can tell whether
/// the previous move was a pawn double-step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveRecord {
    /// The moved piece as it stood after the move.
    pub piece: Piece,
    pub from: Square,
    pub to: Square,
}

impl MoveRecord {
    pub const fn new(piece: Piece, from: Square, to: Square) -> Self {
        MoveRecord { piece, from, to }
    }

    /// Number of ranks travelled (always non-negative).
    #[inline]
    pub const fn rank_distance(&self) -> i8 {
        (self.to.rank() - self.from.rank()).abs()
    }

    /// Returns true if this was a pawn advancing two ranks.
    #[inline]
    pub const fn is_double_step(&self) -> bool {
        matches!(self.piece.role(), crate::Role::Pawn) && self.rank_distance() == 2
    }
}

impl fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} -> {}", self.piece.id(), self.from, self.to)
    }
}
