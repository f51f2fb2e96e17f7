//! State-change notifications.
//!
//! The game pushes a [`GameEvent`] to every observer registered for that
//! event's [`EventKind`]. Payloads are owned copies, so observers never see
//! into the game's internals. Observers return nothing and cannot veto.

use std::collections::HashMap;
use std::fmt;
use std::sync::mpsc;

use chess_core::{Color, Piece, PieceId, Square};
use serde::Serialize;

/// Something that happened while applying a move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    /// A piece arrived on a new square. `piece` is the moved piece as it
    /// stands afterwards.
    PieceMoved { piece: Piece, from: Square },
    /// A piece was taken off the board.
    Captured { piece: Piece },
    /// The side to move is in check.
    Check { color: Color },
    /// The side to move is checkmated; `winner` delivered the mate.
    Checkmate { winner: Color },
    /// The side to move has no legal move but is not in check.
    Stalemate { color: Color },
    /// It is now `color`'s turn.
    TurnChanged { color: Color },
    /// A pawn reached the far rank and was replaced by `queen`.
    Promoted { pawn: PieceId, queen: Piece },
    /// King and rook castled; both are shown on their new squares.
    Castled { king: Piece, rook: Piece },
    /// A pawn captured en passant; the passed pawn stood on `captured_square`.
    EnPassant { piece: Piece, captured_square: Square },
}

/// The kinds of [`GameEvent`], used as observer registration keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    PieceMoved,
    Captured,
    Check,
    Checkmate,
    Stalemate,
    TurnChanged,
    Promoted,
    Castled,
    EnPassant,
}

impl EventKind {
    pub const ALL: [EventKind; 9] = [
        EventKind::PieceMoved,
        EventKind::Captured,
        EventKind::Check,
        EventKind::Checkmate,
        EventKind::Stalemate,
        EventKind::TurnChanged,
        EventKind::Promoted,
        EventKind::Castled,
        EventKind::EnPassant,
    ];
}

impl GameEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            GameEvent::PieceMoved { .. } => EventKind::PieceMoved,
            GameEvent::Captured { .. } => EventKind::Captured,
            GameEvent::Check { .. } => EventKind::Check,
            GameEvent::Checkmate { .. } => EventKind::Checkmate,
            GameEvent::Stalemate { .. } => EventKind::Stalemate,
            GameEvent::TurnChanged { .. } => EventKind::TurnChanged,
            GameEvent::Promoted { .. } => EventKind::Promoted,
            GameEvent::Castled { .. } => EventKind::Castled,
            GameEvent::EnPassant { .. } => EventKind::EnPassant,
        }
    }
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameEvent::PieceMoved { piece, from } => {
                write!(f, "{} moved {} -> {}", piece.id(), from, piece.square())
            }
            GameEvent::Captured { piece } => write!(f, "{} captured", piece),
            GameEvent::Check { color } => write!(f, "{} is in check", color),
            GameEvent::Checkmate { winner } => write!(f, "checkmate, {} wins", winner),
            GameEvent::Stalemate { color } => write!(f, "stalemate, {} has no moves", color),
            GameEvent::TurnChanged { color } => write!(f, "{} to move", color),
            GameEvent::Promoted { pawn, queen } => write!(f, "{} promoted to {}", pawn, queen),
            GameEvent::Castled { king, rook } => write!(f, "{} castled with {}", king, rook),
            GameEvent::EnPassant {
                piece,
                captured_square,
            } => write!(f, "{} captured en passant on {}", piece, captured_square),
        }
    }
}

/// A registered callback.
pub type Observer = Box<dyn FnMut(&GameEvent) + Send>;

/// Observer registry keyed by event kind.
#[derive(Default)]
pub struct Observers {
    slots: HashMap<EventKind, Vec<Observer>>,
}

impl Observers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a callback for one kind of event.
    pub fn on<F>(&mut self, kind: EventKind, callback: F)
    where
        F: FnMut(&GameEvent) + Send + 'static,
    {
        self.slots.entry(kind).or_default().push(Box::new(callback));
    }

    /// Registers a channel that receives every event of every kind.
    pub fn subscribe(&mut self) -> mpsc::Receiver<GameEvent> {
        let (tx, rx) = mpsc::channel();
        for kind in EventKind::ALL {
            let tx = tx.clone();
            // A dropped receiver just means nobody is listening any more.
            self.on(kind, move |event| {
                let _ = tx.send(event.clone());
            });
        }
        rx
    }

    /// Calls every observer registered for the event's kind, in registration order.
    pub fn emit(&mut self, event: &GameEvent) {
        if let Some(observers) = self.slots.get_mut(&event.kind()) {
            for observer in observers.iter_mut() {
                observer(event);
            }
        }
    }

    /// Drops every registration.
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Total number of registered callbacks.
    pub fn len(&self) -> usize {
        self.slots.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("registered", &self.len())
            .finish()
    }
}
