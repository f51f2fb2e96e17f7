//! Chess piece representation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::{Color, Square};

/// The six types of chess pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl Role {
    /// All roles in order.
    pub const ALL: [Role; 6] = [
        Role::Pawn,
        Role::Knight,
        Role::Bishop,
        Role::Rook,
        Role::Queen,
        Role::King,
    ];

    /// Capitalized word used inside piece names (`"Pawn"`, `"Knight"`, ...).
    pub const fn word(self) -> &'static str {
        match self {
            Role::Pawn => "Pawn",
            Role::Knight => "Knight",
            Role::Bishop => "Bishop",
            Role::Rook => "Rook",
            Role::Queen => "Queen",
            Role::King => "King",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.word())
    }
}

/// A role together with the state only that role carries.
///
/// Rooks and kings remember whether they may still castle. The flag starts
/// `true` and is cleared for good the first time the piece moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook { can_castle: bool },
    Queen,
    King { can_castle: bool },
}

impl PieceKind {
    /// The kind of a piece that has not moved yet.
    pub const fn unmoved(role: Role) -> Self {
        match role {
            Role::Pawn => PieceKind::Pawn,
            Role::Knight => PieceKind::Knight,
            Role::Bishop => PieceKind::Bishop,
            Role::Rook => PieceKind::Rook { can_castle: true },
            Role::Queen => PieceKind::Queen,
            Role::King => PieceKind::King { can_castle: true },
        }
    }

    #[inline]
    pub const fn role(self) -> Role {
        match self {
            PieceKind::Pawn => Role::Pawn,
            PieceKind::Knight => Role::Knight,
            PieceKind::Bishop => Role::Bishop,
            PieceKind::Rook { .. } => Role::Rook,
            PieceKind::Queen => Role::Queen,
            PieceKind::King { .. } => Role::King,
        }
    }

    /// Returns true for a rook or king that still holds castling rights.
    #[inline]
    pub const fn can_castle(self) -> bool {
        matches!(
            self,
            PieceKind::Rook { can_castle: true } | PieceKind::King { can_castle: true }
        )
    }

    /// Same kind with castling rights cleared.
    #[inline]
    pub const fn without_castling(self) -> Self {
        match self {
            PieceKind::Rook { .. } => PieceKind::Rook { can_castle: false },
            PieceKind::King { .. } => PieceKind::King { can_castle: false },
            other => other,
        }
    }
}

/// Errors that can occur when parsing piece names.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PieceIdError {
    #[error("invalid piece name '{0}': expected a color prefix ('white' or 'black')")]
    MissingColor(String),

    #[error("invalid piece name '{0}': unknown role")]
    UnknownRole(String),

    #[error("invalid piece name '{0}': ordinal must be a number from 1 to 255")]
    InvalidOrdinal(String),
}

/// Unique identity of a piece, rendered as its name (`whitePawn3`, `blackKing`).
///
/// The ordinal tells apart pieces of the same color and role. Kings and the
/// original queens have none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PieceId {
    color: Color,
    role: Role,
    ordinal: Option<u8>,
}

impl PieceId {
    pub const fn new(color: Color, role: Role, ordinal: Option<u8>) -> Self {
        PieceId {
            color,
            role,
            ordinal,
        }
    }

    #[inline]
    pub const fn color(self) -> Color {
        self.color
    }

    #[inline]
    pub const fn role(self) -> Role {
        self.role
    }

    #[inline]
    pub const fn ordinal(self) -> Option<u8> {
        self.ordinal
    }

    /// The identity a pawn takes on when it promotes: same color and ordinal, queen role.
    pub const fn promoted(self) -> Self {
        PieceId {
            color: self.color,
            role: Role::Queen,
            ordinal: self.ordinal,
        }
    }

    /// Same color and role with a different ordinal.
    pub const fn with_ordinal(self, ordinal: u8) -> Self {
        PieceId {
            color: self.color,
            role: self.role,
            ordinal: Some(ordinal),
        }
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.color.word(), self.role.word())?;
        if let Some(n) = self.ordinal {
            write!(f, "{}", n)?;
        }
        Ok(())
    }
}

impl FromStr for PieceId {
    type Err = PieceIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (color, rest) = Color::ALL
            .iter()
            .find_map(|&c| s.strip_prefix(c.word()).map(|rest| (c, rest)))
            .ok_or_else(|| PieceIdError::MissingColor(s.to_string()))?;

        let (role, digits) = Role::ALL
            .iter()
            .find_map(|&r| rest.strip_prefix(r.word()).map(|digits| (r, digits)))
            .ok_or_else(|| PieceIdError::UnknownRole(s.to_string()))?;

        let ordinal = if digits.is_empty() {
            None
        } else {
            match digits.parse::<u8>() {
                Ok(n) if n > 0 && digits.bytes().all(|b| b.is_ascii_digit()) => Some(n),
                _ => return Err(PieceIdError::InvalidOrdinal(s.to_string())),
            }
        };

        Ok(PieceId::new(color, role, ordinal))
    }
}

impl TryFrom<String> for PieceId {
    type Error = PieceIdError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<PieceId> for String {
    fn from(id: PieceId) -> Self {
        id.to_string()
    }
}

/// A piece on the board: identity, kind, and current square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    id: PieceId,
    kind: PieceKind,
    square: Square,
}

impl Piece {
    /// Creates an unmoved piece whose kind follows from its id's role.
    pub const fn new(id: PieceId, square: Square) -> Self {
        Piece {
            id,
            kind: PieceKind::unmoved(id.role()),
            square,
        }
    }

    #[inline]
    pub const fn id(&self) -> PieceId {
        self.id
    }

    #[inline]
    pub const fn color(&self) -> Color {
        self.id.color()
    }

    #[inline]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    #[inline]
    pub const fn role(&self) -> Role {
        self.kind.role()
    }

    #[inline]
    pub const fn square(&self) -> Square {
        self.square
    }

    #[inline]
    pub const fn is_king(&self) -> bool {
        matches!(self.kind, PieceKind::King { .. })
    }

    #[inline]
    pub const fn can_castle(&self) -> bool {
        self.kind.can_castle()
    }

    /// Same piece with castling rights cleared, for building positions where
    /// a rook or king has already moved.
    pub const fn without_castling(mut self) -> Self {
        self.kind = self.kind.without_castling();
        self
    }

    /// Moves the piece and clears any castling rights it held.
    pub fn relocate(&mut self, square: Square) {
        self.square = square;
        self.kind = self.kind.without_castling();
    }

    /// Places the piece on a square without touching its rights. Used for
    /// hypothetical moves that are never committed.
    pub fn place(&mut self, square: Square) {
        self.square = square;
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.id, self.square)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn piece_id_display() {
        let id = PieceId::new(Color::White, Role::Pawn, Some(3));
        assert_eq!(id.to_string(), "whitePawn3");
        let king = PieceId::new(Color::Black, Role::King, None);
        assert_eq!(king.to_string(), "blackKing");
    }

    #[test]
    fn piece_id_parse() {
        assert_eq!(
            "whiteRook2".parse::<PieceId>(),
            Ok(PieceId::new(Color::White, Role::Rook, Some(2)))
        );
        assert_eq!(
            "blackQueen".parse::<PieceId>(),
            Ok(PieceId::new(Color::Black, Role::Queen, None))
        );
        assert!(matches!(
            "redPawn1".parse::<PieceId>(),
            Err(PieceIdError::MissingColor(_))
        ));
        assert!(matches!(
            "whiteDragon".parse::<PieceId>(),
            Err(PieceIdError::UnknownRole(_))
        ));
        assert!(matches!(
            "whitePawn0".parse::<PieceId>(),
            Err(PieceIdError::InvalidOrdinal(_))
        ));
        assert!(matches!(
            "whitePawn+1".parse::<PieceId>(),
            Err(PieceIdError::InvalidOrdinal(_))
        ));
    }

    #[test]
    fn promoted_id_keeps_ordinal() {
        let pawn = PieceId::new(Color::Black, Role::Pawn, Some(5));
        assert_eq!(pawn.promoted().to_string(), "blackQueen5");
    }

    #[test]
    fn unmoved_rooks_and_kings_can_castle() {
        for role in Role::ALL {
            let kind = PieceKind::unmoved(role);
            assert_eq!(kind.role(), role);
            assert_eq!(kind.can_castle(), matches!(role, Role::Rook | Role::King));
        }
    }

    #[test]
    fn relocate_clears_castling_rights() {
        let id = PieceId::new(Color::White, Role::Rook, Some(1));
        let mut rook = Piece::new(id, Square::new(0, 0));
        assert!(rook.can_castle());
        rook.place(Square::new(0, 3));
        assert!(rook.can_castle());
        rook.relocate(Square::new(0, 4));
        assert!(!rook.can_castle());
        assert_eq!(rook.square(), Square::new(0, 4));
    }
}
