//! Core types for chess.
//!
//! This crate provides the fundamental types used across the rules engine:
//! - [`Color`] for the two sides
//! - [`Square`] coordinates and the [`Geometry`] that decides which are on the board
//! - [`Role`], [`PieceKind`], [`PieceId`] and [`Piece`] for piece representation
//! - [`MoveRecord`] for the most recent half-move

mod color;
mod mov;
mod piece;
mod square;

pub use color::Color;
pub use mov::MoveRecord;
pub use piece::{Piece, PieceId, PieceIdError, PieceKind, Role};
pub use square::{Geometry, GeometryError, Square, BOARD_SIZE};
