//! Piece collection and occupancy queries.

use chess_core::{Color, Geometry, Piece, PieceId, Role, Square};
use thiserror::Error;

/// Errors that can occur when building a board from a list of pieces.
///
/// These are invariant violations: a board that passes construction keeps
/// every invariant for the rest of the game.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SetupError {
    #[error("duplicate piece name: {0}")]
    DuplicateId(PieceId),

    #[error("{first} and {second} both stand on {square}")]
    SquareTaken {
        square: Square,
        first: PieceId,
        second: PieceId,
    },

    #[error("{0} stands off the board")]
    OffBoard(PieceId),

    #[error("{color} must have exactly one king, found {count}")]
    KingCount { color: Color, count: usize },

    #[error("{0} stands on its promotion rank")]
    UnpromotedPawn(PieceId),

    #[error("{0} is in check but it is not {0}'s turn")]
    OpponentInCheck(Color),
}

/// Back-rank order from the lowest file up, with each piece's ordinal.
const BACK_RANK: [(Role, Option<u8>); 8] = [
    (Role::Rook, Some(1)),
    (Role::Knight, Some(1)),
    (Role::Bishop, Some(1)),
    (Role::Queen, None),
    (Role::King, None),
    (Role::Bishop, Some(2)),
    (Role::Knight, Some(2)),
    (Role::Rook, Some(2)),
];

/// The set of pieces currently on the board.
///
/// Pieces are kept in an unordered list; at most one piece stands on any
/// square and every color has exactly one king.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    geometry: Geometry,
    pieces: Vec<Piece>,
}

impl Board {
    /// Builds a board, checking the placement invariants.
    pub fn new(geometry: Geometry, pieces: Vec<Piece>) -> Result<Self, SetupError> {
        for (i, piece) in pieces.iter().enumerate() {
            if !geometry.contains(piece.square()) {
                return Err(SetupError::OffBoard(piece.id()));
            }
            if piece.role() == Role::Pawn
                && piece.square().rank() == geometry.promotion_rank(piece.color())
            {
                return Err(SetupError::UnpromotedPawn(piece.id()));
            }
            for earlier in &pieces[..i] {
                if earlier.id() == piece.id() {
                    return Err(SetupError::DuplicateId(piece.id()));
                }
                if earlier.square() == piece.square() {
                    return Err(SetupError::SquareTaken {
                        square: piece.square(),
                        first: earlier.id(),
                        second: piece.id(),
                    });
                }
            }
        }

        for color in Color::ALL {
            let count = pieces
                .iter()
                .filter(|p| p.color() == color && p.is_king())
                .count();
            if count != 1 {
                return Err(SetupError::KingCount { color, count });
            }
        }

        Ok(Board { geometry, pieces })
    }

    /// The standard 32-piece starting position.
    pub fn standard(geometry: Geometry) -> Self {
        let mut pieces = Vec::with_capacity(32);
        for color in Color::ALL {
            let back = geometry.back_rank(color);
            let pawns = geometry.pawn_rank(color);
            for (file_index, &(role, ordinal)) in (0i8..).zip(BACK_RANK.iter()) {
                let file = geometry.min() + file_index;
                let id = PieceId::new(color, role, ordinal);
                pieces.push(Piece::new(id, Square::new(file, back)));
            }
            for ordinal in 1..=8u8 {
                let file = geometry.min() + ordinal as i8 - 1;
                let id = PieceId::new(color, Role::Pawn, Some(ordinal));
                pieces.push(Piece::new(id, Square::new(file, pawns)));
            }
        }
        Board { geometry, pieces }
    }

    #[inline]
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// All pieces, in no particular order.
    #[inline]
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// Looks up a piece by name.
    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.iter().find(|p| p.id() == id)
    }

    /// Returns the piece standing on a square, if any.
    pub fn piece_at(&self, sq: Square) -> Option<&Piece> {
        self.pieces.iter().find(|p| p.square() == sq)
    }

    #[inline]
    pub fn is_occupied(&self, sq: Square) -> bool {
        self.piece_at(sq).is_some()
    }

    /// Iterates over the pieces of one color.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = &Piece> + '_ {
        self.pieces.iter().filter(move |p| p.color() == color)
    }

    /// Returns the king of the given color.
    pub fn king(&self, color: Color) -> Option<&Piece> {
        self.pieces_of(color).find(|p| p.is_king())
    }

    pub(crate) fn piece_mut(&mut self, id: PieceId) -> Option<&mut Piece> {
        self.pieces.iter_mut().find(|p| p.id() == id)
    }

    /// Removes and returns the piece on a square.
    pub(crate) fn remove_at(&mut self, sq: Square) -> Option<Piece> {
        let index = self.pieces.iter().position(|p| p.square() == sq)?;
        Some(self.pieces.swap_remove(index))
    }

    /// Removes and returns a piece by name.
    pub(crate) fn remove(&mut self, id: PieceId) -> Option<Piece> {
        let index = self.pieces.iter().position(|p| p.id() == id)?;
        Some(self.pieces.swap_remove(index))
    }

    pub(crate) fn insert(&mut self, piece: Piece) {
        debug_assert!(self.piece(piece.id()).is_none());
        debug_assert!(self.piece_at(piece.square()).is_none());
        self.pieces.push(piece);
    }

    /// Returns a copy of the board with a move played out, without touching
    /// castling rights or moving a castling rook.
    ///
    /// Whatever stands on `dest` is removed unless it is the mover's enemy
    /// king, and so is whatever stands on `captured` (the passed pawn for en
    /// passant). Returns `None` if `id` is not on the board.
    pub(crate) fn with_move(
        &self,
        id: PieceId,
        dest: Square,
        captured: Option<Square>,
    ) -> Option<Board> {
        let color = self.piece(id)?.color();
        let mut next = self.clone();
        if let Some(sq) = captured {
            next.remove_at(sq);
        }
        if next
            .piece_at(dest)
            .is_some_and(|p| p.id() != id && !(p.is_king() && p.color() != color))
        {
            next.remove_at(dest);
        }
        next.piece_mut(id)?.place(dest);
        Some(next)
    }
}
