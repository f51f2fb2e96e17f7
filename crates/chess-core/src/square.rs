//! Board coordinates and board geometry.
//!
//! A [`Square`] is a plain `(file, rank)` pair with no knowledge of the board.
//! Which pairs are on the board is decided by a [`Geometry`], which owns the
//! coordinate convention (0-based or 1-based) and the single [`BOARD_SIZE`]
//! constant every range check derives from.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::Color;

/// Number of files and ranks on the board.
pub const BOARD_SIZE: i8 = 8;

/// A `(file, rank)` coordinate pair.
///
/// Squares are immutable values. A square may lie off the board; use
/// [`Geometry::contains`] to check.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "(i8, i8)", into = "(i8, i8)")]
pub struct Square {
    file: i8,
    rank: i8,
}

impl Square {
    /// Creates a square from file and rank.
    #[inline]
    pub const fn new(file: i8, rank: i8) -> Self {
        Square { file, rank }
    }

    /// Returns the file (column).
    #[inline]
    pub const fn file(self) -> i8 {
        self.file
    }

    /// Returns the rank (row).
    #[inline]
    pub const fn rank(self) -> i8 {
        self.rank
    }

    /// Returns the square shifted by the given deltas. The result may be off the board.
    #[inline]
    pub const fn offset(self, df: i8, dr: i8) -> Self {
        Square {
            file: self.file.saturating_add(df),
            rank: self.rank.saturating_add(dr),
        }
    }
}

impl From<(i8, i8)> for Square {
    fn from((file, rank): (i8, i8)) -> Self {
        Square::new(file, rank)
    }
}

impl From<Square> for (i8, i8) {
    fn from(sq: Square) -> Self {
        (sq.file, sq.rank)
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Square({}, {})", self.file, self.rank)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.file, self.rank)
    }
}

/// Errors from building a [`Geometry`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeometryError {
    #[error("board origin {0} is out of range (expected {min}..={max})", min = Geometry::MIN_ORIGIN, max = Geometry::MAX_ORIGIN)]
    OriginOutOfRange(i8),
}

/// The valid coordinate range of the board.
///
/// Both files and ranks run from `origin` to `origin + BOARD_SIZE - 1`
/// inclusive. White starts on the low ranks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Geometry {
    origin: i8,
}

impl Default for Geometry {
    fn default() -> Self {
        Geometry::ZERO_BASED
    }
}

impl Geometry {
    /// Files and ranks `0..=7`.
    pub const ZERO_BASED: Geometry = Geometry { origin: 0 };
    /// Files and ranks `1..=8`.
    pub const ONE_BASED: Geometry = Geometry { origin: 1 };

    pub const MIN_ORIGIN: i8 = -100;
    pub const MAX_ORIGIN: i8 = 100;

    /// Creates a geometry whose lowest file and rank is `origin`.
    pub const fn new(origin: i8) -> Result<Self, GeometryError> {
        if origin < Self::MIN_ORIGIN || origin > Self::MAX_ORIGIN {
            return Err(GeometryError::OriginOutOfRange(origin));
        }
        Ok(Geometry { origin })
    }

    /// Lowest valid file/rank.
    #[inline]
    pub const fn min(self) -> i8 {
        self.origin
    }

    /// Highest valid file/rank.
    #[inline]
    pub const fn max(self) -> i8 {
        self.origin + BOARD_SIZE - 1
    }

    /// Returns true if the square lies on the board.
    #[inline]
    pub const fn contains(self, sq: Square) -> bool {
        sq.file >= self.min() && sq.file <= self.max() && sq.rank >= self.min() && sq.rank <= self.max()
    }

    /// Builds a square from 0-based file/rank indices relative to the origin.
    #[inline]
    pub const fn at(self, file_index: i8, rank_index: i8) -> Square {
        Square::new(
            self.origin.saturating_add(file_index),
            self.origin.saturating_add(rank_index),
        )
    }

    /// Returns the 0-based `(file, rank)` indices of a square.
    #[inline]
    pub const fn indices(self, sq: Square) -> (i8, i8) {
        (
            sq.file.saturating_sub(self.origin),
            sq.rank.saturating_sub(self.origin),
        )
    }

    /// Rank the color's pieces start on.
    #[inline]
    pub const fn back_rank(self, color: Color) -> i8 {
        match color {
            Color::White => self.min(),
            Color::Black => self.max(),
        }
    }

    /// Rank the color's pawns start on (and may double-step from).
    #[inline]
    pub const fn pawn_rank(self, color: Color) -> i8 {
        self.back_rank(color) + color.pawn_direction()
    }

    /// Rank a pawn of this color promotes on.
    #[inline]
    pub const fn promotion_rank(self, color: Color) -> i8 {
        self.back_rank(color.opposite())
    }

    /// Rank a pawn of this color must stand on to capture en passant.
    #[inline]
    pub const fn en_passant_rank(self, color: Color) -> i8 {
        self.back_rank(color) + 4 * color.pawn_direction()
    }

    /// Iterates over every square on the board, rank by rank.
    pub fn squares(self) -> impl Iterator<Item = Square> {
        (self.min()..=self.max())
            .flat_map(move |rank| (self.min()..=self.max()).map(move |file| Square::new(file, rank)))
    }
}
