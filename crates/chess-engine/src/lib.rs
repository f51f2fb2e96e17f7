//! Chess rules engine.
//!
//! This crate decides whether a requested move is legal, applies it, and
//! reports what happened. It does not choose moves.
//!
//! - [`pattern`] - where each piece could move on an empty board
//! - [`legality`] - blocking, captures, king safety, castling and en passant
//! - [`Game`] - the state machine that owns the pieces and the turn
//! - [`GameEvent`] - notifications pushed to registered observers
//!
//! # Example
//!
//! ```
//! use chess_engine::{EventKind, Game};
//! use chess_core::Square;
//!
//! let mut game = Game::new();
//! game.on(EventKind::TurnChanged, |event| println!("{}", event));
//!
//! let pawn = "whitePawn5".parse().unwrap();
//! assert_eq!(game.legal_moves_for(pawn).len(), 2);
//! game.apply_move(pawn, Square::new(4, 3)).unwrap();
//! ```

mod board;
mod config;
mod events;
mod game;
pub mod legality;
pub mod pattern;

pub use board::{Board, SetupError};
pub use config::EngineConfig;
pub use events::{EventKind, GameEvent, Observer, Observers};
pub use game::{Game, GameError, GameStatus};
pub use pattern::{move_pattern, MoveFamily, MoveGroup};
