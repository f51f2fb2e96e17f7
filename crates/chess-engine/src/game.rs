//! Game state machine.
//!
//! The [`Game`] struct owns the pieces, whose turn it is, and the last move.
//! It answers legality queries, applies moves with all their side effects
//! (captures, en passant, castling, promotion), detects check, checkmate and
//! stalemate, and notifies observers.

use chess_core::{Color, Geometry, GeometryError, MoveRecord, Piece, PieceId, Role, Square};
use std::sync::mpsc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::board::SetupError;
use crate::events::{EventKind, GameEvent, Observers};
use crate::legality;
use crate::{Board, EngineConfig};

/// Where the game stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameStatus {
    /// Moves are being accepted.
    Active,
    /// The side to move was checkmated.
    Checkmate { winner: Color },
    /// The side to move (`color`) has no legal move and is not in check.
    Stalemate { color: Color },
}

impl GameStatus {
    /// Returns true once the game no longer accepts moves.
    #[inline]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, GameStatus::Active)
    }
}

/// Error type for move requests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// No piece with this name is on the board.
    #[error("no piece named {0}")]
    UnknownPiece(PieceId),
    /// The piece belongs to the side not on move.
    #[error("{piece} cannot move: it is {turn}'s turn")]
    NotYourTurn { piece: PieceId, turn: Color },
    /// The destination is not among the piece's legal moves.
    #[error("illegal move: {piece} to {to}")]
    IllegalMove { piece: PieceId, to: Square },
    /// The game has already ended.
    #[error("game has already ended")]
    GameOver,
}

/// A chess game between two sides.
///
/// Callers read state through the query methods and change it only through
/// [`Game::apply_move`]. Every query takes `&self` and leaves the game as
/// it found it.
#[derive(Debug)]
pub struct Game {
    board: Board,
    turn: Color,
    last_move: Option<MoveRecord>,
    status: GameStatus,
    observers: Observers,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Creates a new game with the standard starting position on a 0-based board.
    pub fn new() -> Self {
        Self::standard(Geometry::ZERO_BASED)
    }

    /// Creates a new game with the standard starting position.
    pub fn standard(geometry: Geometry) -> Self {
        Game {
            board: Board::standard(geometry),
            turn: Color::White,
            last_move: None,
            status: GameStatus::Active,
            observers: Observers::new(),
        }
    }

    /// Creates a standard game using the board geometry from `config`.
    pub fn with_config(config: &EngineConfig) -> Result<Self, GeometryError> {
        Ok(Self::standard(config.geometry()?))
    }

    /// Creates a game from an arbitrary placement with `turn` to move.
    ///
    /// The placement is validated (see [`SetupError`]), and the side not on
    /// move may not be in check. If the side to move is already checkmated
    /// or stalemated the game starts out terminal.
    pub fn from_pieces(
        geometry: Geometry,
        pieces: Vec<Piece>,
        turn: Color,
    ) -> Result<Self, SetupError> {
        let board = Board::new(geometry, pieces)?;
        if legality::is_king_attacked(&board, turn.opposite()) {
            return Err(SetupError::OpponentInCheck(turn.opposite()));
        }
        let status = terminal_status(&board, turn, None).unwrap_or(GameStatus::Active);
        Ok(Game {
            board,
            turn,
            last_move: None,
            status,
            observers: Observers::new(),
        })
    }

    /// Returns the current board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn geometry(&self) -> Geometry {
        self.board.geometry()
    }

    /// The side to move.
    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Returns true if the game has ended.
    pub fn is_game_over(&self) -> bool {
        self.status.is_terminal()
    }

    /// The most recent half-move, if any.
    pub fn last_move(&self) -> Option<&MoveRecord> {
        self.last_move.as_ref()
    }

    /// All pieces on the board, in no particular order.
    pub fn pieces(&self) -> &[Piece] {
        self.board.pieces()
    }

    /// Looks up a piece by name.
    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.board.piece(id)
    }

    /// Returns the piece on a square, if any.
    pub fn piece_at(&self, sq: Square) -> Option<&Piece> {
        self.board.piece_at(sq)
    }

    /// Returns the pieces of one color.
    pub fn pieces_of(&self, color: Color) -> Vec<&Piece> {
        self.board.pieces_of(color).collect()
    }

    /// Registers an observer for one kind of event.
    pub fn on<F>(&mut self, kind: EventKind, callback: F)
    where
        F: FnMut(&GameEvent) + Send + 'static,
    {
        self.observers.on(kind, callback);
    }

    /// Returns a channel receiving every event from now until the game ends.
    pub fn subscribe(&mut self) -> mpsc::Receiver<GameEvent> {
        self.observers.subscribe()
    }

    /// Legal destinations for a piece of the side to move.
    ///
    /// Returns an empty list if the piece does not exist, belongs to the
    /// other side, or the game is over.
    pub fn legal_moves_for(&self, id: PieceId) -> Vec<Square> {
        if self.status.is_terminal() {
            debug!(piece = %id, status = ?self.status, "game is over");
            return Vec::new();
        }
        let Some(piece) = self.board.piece(id) else {
            warn!(piece = %id, "legal moves requested for unknown piece");
            return Vec::new();
        };
        if piece.color() != self.turn {
            debug!(piece = %id, turn = %self.turn, "not this piece's turn");
            return Vec::new();
        }
        legality::legal_moves(&self.board, piece, self.last_move.as_ref())
    }

    /// Castling destinations currently open to a king.
    ///
    /// Empty for anything that is not a king with castling rights.
    pub fn castling_destinations(&self, king: PieceId) -> Vec<Square> {
        match self.board.piece(king) {
            Some(piece) => legality::castling_destinations(&self.board, piece),
            None => Vec::new(),
        }
    }

    /// Returns true if moving the piece to `dest` would leave its own king
    /// attacked. Unknown pieces expose nothing.
    pub fn would_expose_king(&self, id: PieceId, dest: Square) -> bool {
        let Some(piece) = self.board.piece(id) else {
            return false;
        };
        let passed = self.en_passant_capture(piece, dest);
        legality::exposes_king(&self.board, piece, dest, passed)
    }

    /// Returns true if `color`'s king is attacked.
    pub fn is_king_attacked(&self, color: Color) -> bool {
        legality::is_king_attacked(&self.board, color)
    }

    /// Returns true if the side to move is in check.
    pub fn is_check(&self) -> bool {
        self.is_king_attacked(self.turn)
    }

    /// Returns true if any piece of `color` has a legal move.
    pub fn has_any_legal_move(&self, color: Color) -> bool {
        legality::has_any_legal_move(&self.board, color, self.last_move.as_ref())
    }

    /// Moves a piece of the side to move to `dest`.
    ///
    /// Nothing changes unless the move is legal. On success the side
    /// effects run in order: en-passant capture, capture on the
    /// destination, the move itself (with the rook for castling), promotion,
    /// turn change, then check / checkmate / stalemate detection. Each step
    /// notifies observers.
    pub fn apply_move(&mut self, id: PieceId, dest: Square) -> Result<(), GameError> {
        if self.status.is_terminal() {
            return Err(GameError::GameOver);
        }
        let Some(&piece) = self.board.piece(id) else {
            warn!(piece = %id, "move requested for unknown piece");
            return Err(GameError::UnknownPiece(id));
        };
        if piece.color() != self.turn {
            return Err(GameError::NotYourTurn {
                piece: id,
                turn: self.turn,
            });
        }
        if !self.legal_moves_for(id).contains(&dest) {
            debug!(piece = %id, to = %dest, "rejected illegal move");
            return Err(GameError::IllegalMove { piece: id, to: dest });
        }

        let from = piece.square();
        let passed = self.en_passant_capture(&piece, dest);
        let castle_rook = if piece.is_king() && (dest.file() - from.file()).abs() == 2 {
            legality::castling_rook(&self.board, &piece, (dest.file() - from.file()).signum())
                .copied()
        } else {
            None
        };

        self.board.remove(id);

        if let Some(sq) = passed {
            if let Some(captured) = self.board.remove_at(sq) {
                self.emit(GameEvent::Captured { piece: captured });
            }
            self.emit(GameEvent::EnPassant {
                piece,
                captured_square: sq,
            });
        }

        if let Some(captured) = self.board.remove_at(dest) {
            self.emit(GameEvent::Captured { piece: captured });
        }

        let mut moved = piece;
        moved.relocate(dest);

        match castle_rook {
            Some(rook) if piece.can_castle() => {
                let mut castled_rook = rook;
                castled_rook.relocate(from.offset((dest.file() - from.file()).signum(), 0));
                self.board.remove(rook.id());
                self.board.insert(castled_rook);
                self.emit(GameEvent::PieceMoved {
                    piece: castled_rook,
                    from: rook.square(),
                });
                self.board.insert(moved);
                self.emit(GameEvent::Castled {
                    king: moved,
                    rook: castled_rook,
                });
            }
            _ => self.board.insert(moved),
        }

        self.last_move = Some(MoveRecord::new(moved, from, dest));
        debug!(piece = %id, from = %from, to = %dest, "applied move");
        self.emit(GameEvent::PieceMoved { piece: moved, from });

        if moved.role() == Role::Pawn && dest.rank() == self.geometry().promotion_rank(moved.color()) {
            self.promote(moved);
        }

        self.turn = self.turn.opposite();
        self.emit(GameEvent::TurnChanged { color: self.turn });

        self.detect_game_end();
        Ok(())
    }

    /// For a pawn moving diagonally onto an en-passant target, the square
    /// of the pawn it takes.
    fn en_passant_capture(&self, piece: &Piece, dest: Square) -> Option<Square> {
        if piece.role() != Role::Pawn || self.board.is_occupied(dest) {
            return None;
        }
        legality::en_passant_targets(&self.board, piece, self.last_move.as_ref())
            .contains(&dest)
            .then(|| Square::new(dest.file(), piece.square().rank()))
    }

    /// Replaces a pawn on its promotion rank with a queen of the same color.
    fn promote(&mut self, pawn: Piece) {
        let queen = Piece::new(self.promotion_id(pawn.id()), pawn.square());
        self.board.remove(pawn.id());
        self.board.insert(queen);
        debug!(pawn = %pawn.id(), queen = %queen.id(), "promoted");
        self.emit(GameEvent::Promoted {
            pawn: pawn.id(),
            queen,
        });
    }

    /// Name for a promoted queen: the pawn's name with the queen role,
    /// moved to the next free ordinal if that name is taken.
    fn promotion_id(&self, pawn: PieceId) -> PieceId {
        let base = pawn.promoted();
        if self.board.piece(base).is_none() {
            return base;
        }
        let start = base.ordinal().unwrap_or(0);
        (start.saturating_add(1)..=u8::MAX)
            .chain(1..=start)
            .map(|n| base.with_ordinal(n))
            .find(|&candidate| self.board.piece(candidate).is_none())
            .unwrap_or(base)
    }

    /// Checks the side to move for check, checkmate and stalemate.
    fn detect_game_end(&mut self) {
        let side = self.turn;
        let in_check = self.is_king_attacked(side);
        if in_check {
            self.emit(GameEvent::Check { color: side });
        }
        let Some(status) = terminal_status(&self.board, side, self.last_move.as_ref()) else {
            return;
        };
        self.status = status;
        match status {
            GameStatus::Checkmate { winner } => {
                info!(winner = %winner, "checkmate");
                self.emit(GameEvent::Checkmate { winner });
            }
            GameStatus::Stalemate { color } => {
                info!(color = %color, "stalemate");
                self.emit(GameEvent::Stalemate { color });
            }
            GameStatus::Active => {}
        }
        self.observers.clear();
    }

    fn emit(&mut self, event: GameEvent) {
        self.observers.emit(&event);
    }
}

/// The terminal status for `turn` to move, or `None` if it has a legal move.
fn terminal_status(board: &Board, turn: Color, last_move: Option<&MoveRecord>) -> Option<GameStatus> {
    if legality::has_any_legal_move(board, turn, last_move) {
        return None;
    }
    Some(if legality::is_king_attacked(board, turn) {
        GameStatus::Checkmate {
            winner: turn.opposite(),
        }
    } else {
        GameStatus::Stalemate { color: turn }
    })
}
