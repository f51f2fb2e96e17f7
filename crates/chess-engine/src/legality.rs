//! Move legality.
//!
//! Turns the geometric candidates from [`crate::pattern`] into legal
//! destinations: rays stop at the first occupied square, friendly squares
//! are never targets, pawns capture only diagonally and push only onto empty
//! squares, and (when enforced) no move may leave the mover's own king
//! attacked.
//!
//! King safety is tested by playing the move out on a copy of the board,
//! so every query here leaves the board it was given untouched.
//!
//! Attack coverage for check detection runs the same filter with king
//! safety switched off. Switching it off is what keeps the recursion finite:
//! an enemy move that would expose the enemy king still attacks our king.

use chess_core::{Color, MoveRecord, Piece, Role, Square};
use tracing::debug;

use crate::pattern::{move_pattern, MoveFamily, MoveGroup};
use crate::Board;

/// Filters candidate groups down to a flat list of legal destinations.
///
/// With `enforce_king_safety` off the result is the piece's attack coverage,
/// which is what check detection needs.
pub fn filter_legal(
    board: &Board,
    piece: &Piece,
    groups: &[MoveGroup],
    enforce_king_safety: bool,
) -> Vec<Square> {
    let color = piece.color();
    // With king safety on, the enemy king's square is never a destination.
    let exposes = |dest: Square, captured: Option<Square>| {
        enforce_king_safety
            && (board
                .piece_at(dest)
                .is_some_and(|p| p.is_king() && p.color() != color)
                || exposes_king(board, piece, dest, captured))
    };

    let mut legal = Vec::new();
    for group in groups {
        match group.family {
            MoveFamily::Leap | MoveFamily::Step | MoveFamily::Castle => {
                for &sq in &group.squares {
                    if board.piece_at(sq).is_some_and(|p| p.color() == color) {
                        continue;
                    }
                    if exposes(sq, None) {
                        continue;
                    }
                    legal.push(sq);
                }
            }
            MoveFamily::Slide => {
                for &sq in &group.squares {
                    let occupant = board.piece_at(sq);
                    if occupant.is_some_and(|p| p.color() == color) {
                        break;
                    }
                    if exposes(sq, None) {
                        if occupant.is_some() {
                            break;
                        }
                        continue;
                    }
                    legal.push(sq);
                    if occupant.is_some() {
                        break;
                    }
                }
            }
            MoveFamily::PawnAttack => {
                for &sq in &group.squares {
                    let enemy = board.piece_at(sq).is_some_and(|p| p.color() != color);
                    if enemy && !exposes(sq, None) {
                        legal.push(sq);
                    }
                }
            }
            MoveFamily::EnPassant => {
                for &sq in &group.squares {
                    let passed = Square::new(sq.file(), piece.square().rank());
                    if !exposes(sq, Some(passed)) {
                        legal.push(sq);
                    }
                }
            }
            MoveFamily::PawnAdvance => {
                for &sq in &group.squares {
                    if board.is_occupied(sq) {
                        break;
                    }
                    if exposes(sq, None) {
                        continue;
                    }
                    legal.push(sq);
                }
            }
        }
    }

    let geometry = board.geometry();
    legal.retain(|&sq| geometry.contains(sq));
    legal
}

/// Returns true if moving `piece` to `dest` would leave its own king attacked.
///
/// `en_passant_capture` names the square of a pawn taken en passant, which is
/// not the destination. An enemy king on `dest` stays on the board during the
/// simulation, so its attacks still count.
pub fn exposes_king(
    board: &Board,
    piece: &Piece,
    dest: Square,
    en_passant_capture: Option<Square>,
) -> bool {
    match board.with_move(piece.id(), dest, en_passant_capture) {
        Some(next) => is_king_attacked(&next, piece.color()),
        None => false,
    }
}

/// Returns true if any enemy piece's attack coverage includes `color`'s king.
pub fn is_king_attacked(board: &Board, color: Color) -> bool {
    let Some(king) = board.king(color) else {
        return false;
    };
    let target = king.square();
    board.pieces_of(color.opposite()).any(|enemy| {
        let groups = move_pattern(enemy, board.geometry());
        filter_legal(board, enemy, &groups, false).contains(&target)
    })
}

/// Squares a pawn may capture onto en passant, given the previous half-move.
///
/// The previous move must be an enemy pawn's double step that ended right
/// beside this pawn, and that pawn must still be standing there.
pub fn en_passant_targets(
    board: &Board,
    piece: &Piece,
    last_move: Option<&MoveRecord>,
) -> Vec<Square> {
    if piece.role() != Role::Pawn {
        return Vec::new();
    }
    let Some(last) = last_move else {
        return Vec::new();
    };

    let color = piece.color();
    let from = piece.square();
    let geometry = board.geometry();
    let eligible = last.piece.color() != color
        && last.is_double_step()
        && from.rank() == geometry.en_passant_rank(color)
        && last.to.rank() == from.rank()
        && (last.to.file() - from.file()).abs() == 1
        && board.piece_at(last.to).map(|p| p.id()) == Some(last.piece.id());
    if !eligible {
        return Vec::new();
    }

    let target = Square::new(last.to.file(), from.rank() + color.pawn_direction());
    if !geometry.contains(target) || board.is_occupied(target) {
        return Vec::new();
    }
    debug!(pawn = %piece.id(), passed = %last.piece.id(), target = %target, "en passant available");
    vec![target]
}

/// The rook a king would castle with toward `dir` (+1 or -1 along its rank).
///
/// That is the first piece along the rank, provided it is a friendly rook
/// that still has castling rights and stands at least three files away, so
/// the squares the king crosses are all empty.
pub fn castling_rook<'a>(board: &'a Board, king: &Piece, dir: i8) -> Option<&'a Piece> {
    let from = king.square();
    let geometry = board.geometry();
    let mut sq = from.offset(dir, 0);
    while geometry.contains(sq) {
        if let Some(p) = board.piece_at(sq) {
            let ok = p.color() == king.color()
                && p.role() == Role::Rook
                && p.can_castle()
                && (sq.file() - from.file()).abs() >= 3;
            return ok.then_some(p);
        }
        sq = sq.offset(dir, 0);
    }
    None
}

/// Castling destinations for a king: two files toward each eligible rook.
///
/// Needs an unmoved king and rook, nothing between them, and none of the
/// king's current square, the square it crosses, or its destination under
/// attack.
pub fn castling_destinations(board: &Board, king: &Piece) -> Vec<Square> {
    if !king.is_king() || !king.can_castle() {
        return Vec::new();
    }
    if is_king_attacked(board, king.color()) {
        debug!(king = %king.id(), "cannot castle out of check");
        return Vec::new();
    }

    let from = king.square();
    let mut destinations = Vec::new();
    // Short side (toward the higher files) first.
    for dir in [1i8, -1] {
        let Some(rook) = castling_rook(board, king, dir) else {
            debug!(king = %king.id(), dir, "no rook available to castle with");
            continue;
        };
        let transit = from.offset(dir, 0);
        let dest = from.offset(2 * dir, 0);
        if exposes_king(board, king, transit, None) || exposes_king(board, king, dest, None) {
            debug!(king = %king.id(), rook = %rook.id(), "castling path is attacked");
            continue;
        }
        debug!(king = %king.id(), rook = %rook.id(), dest = %dest, "castling allowed");
        destinations.push(dest);
    }
    destinations
}

/// All legal destinations for a piece, including castling and en passant.
pub fn legal_moves(board: &Board, piece: &Piece, last_move: Option<&MoveRecord>) -> Vec<Square> {
    let mut groups = move_pattern(piece, board.geometry());
    match piece.role() {
        Role::King => groups.push(MoveGroup::new(
            MoveFamily::Castle,
            castling_destinations(board, piece),
        )),
        Role::Pawn => groups.push(MoveGroup::new(
            MoveFamily::EnPassant,
            en_passant_targets(board, piece, last_move),
        )),
        _ => {}
    }
    filter_legal(board, piece, &groups, true)
}

/// Returns true if any piece of `color` has at least one legal move.
pub fn has_any_legal_move(board: &Board, color: Color, last_move: Option<&MoveRecord>) -> bool {
    board
        .pieces_of(color)
        .any(|piece| !legal_moves(board, piece, last_move).is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::{Geometry, PieceId};

    fn id(s: &str) -> PieceId {
        s.parse().unwrap()
    }

    fn at(name: &str, file: i8, rank: i8) -> Piece {
        Piece::new(id(name), Square::new(file, rank))
    }

    fn board(pieces: Vec<Piece>) -> Board {
        Board::new(Geometry::ZERO_BASED, pieces).unwrap()
    }

    fn sorted(mut squares: Vec<Square>) -> Vec<Square> {
        squares.sort();
        squares
    }

    #[test]
    fn starting_position_has_twenty_moves_for_white() {
        let b = Board::standard(Geometry::ZERO_BASED);
        let total: usize = b
            .pieces_of(Color::White)
            .map(|p| legal_moves(&b, p, None).len())
            .sum();
        assert_eq!(total, 20);
    }

    #[test]
    fn rook_ray_stops_before_friend_and_on_enemy() {
        let b = board(vec![
            at("whiteKing", 7, 0),
            at("blackKing", 7, 7),
            at("whiteRook1", 0, 0),
            at("whiteKnight1", 1, 0),
            at("blackPawn1", 0, 3),
        ]);
        let rook = b.piece(id("whiteRook1")).unwrap();
        let moves = sorted(legal_moves(&b, rook, None));
        assert_eq!(
            moves,
            vec![Square::new(0, 1), Square::new(0, 2), Square::new(0, 3)]
        );
    }

    #[test]
    fn knight_jumps_over_pieces() {
        let b = Board::standard(Geometry::ZERO_BASED);
        let knight = b.piece(id("whiteKnight1")).unwrap();
        assert_eq!(
            sorted(legal_moves(&b, knight, None)),
            vec![Square::new(0, 2), Square::new(2, 2)]
        );
    }

    #[test]
    fn pawn_push_blocked_by_any_piece() {
        let b = board(vec![
            at("whiteKing", 7, 0),
            at("blackKing", 7, 7),
            at("whitePawn5", 4, 1),
            at("blackKnight1", 4, 2),
        ]);
        let pawn = b.piece(id("whitePawn5")).unwrap();
        assert!(legal_moves(&b, pawn, None).is_empty());
    }

    #[test]
    fn pawn_captures_only_enemies_diagonally() {
        let b = board(vec![
            at("whiteKing", 7, 0),
            at("blackKing", 7, 7),
            at("whitePawn5", 4, 3),
            at("blackPawn4", 3, 4),
            at("whitePawn6", 5, 4),
        ]);
        let pawn = b.piece(id("whitePawn5")).unwrap();
        assert_eq!(
            sorted(legal_moves(&b, pawn, None)),
            vec![Square::new(3, 4), Square::new(4, 4)]
        );
    }

    #[test]
    fn pinned_piece_may_only_move_along_the_pin() {
        let b = board(vec![
            at("whiteKing", 4, 0),
            at("whiteRook1", 4, 2),
            at("blackQueen", 4, 6),
            at("blackKing", 0, 7),
        ]);
        let rook = b.piece(id("whiteRook1")).unwrap();
        let moves = sorted(legal_moves(&b, rook, None));
        assert_eq!(
            moves,
            vec![
                Square::new(4, 1),
                Square::new(4, 3),
                Square::new(4, 4),
                Square::new(4, 5),
                Square::new(4, 6),
            ]
        );
        for sq in moves {
            assert!(!exposes_king(&b, rook, sq, None));
        }
    }

    #[test]
    fn king_cannot_step_into_attack() {
        let b = board(vec![
            at("whiteKing", 4, 0),
            at("blackRook1", 0, 1),
            at("blackKing", 7, 7),
        ]);
        let king = b.piece(id("whiteKing")).unwrap();
        let moves = sorted(legal_moves(&b, king, None));
        assert_eq!(moves, vec![Square::new(3, 0), Square::new(5, 0)]);
    }

    #[test]
    fn king_attack_detection() {
        let b = board(vec![
            at("whiteKing", 4, 0),
            at("blackBishop1", 0, 4),
            at("blackKing", 7, 7),
        ]);
        assert!(is_king_attacked(&b, Color::White));
        assert!(!is_king_attacked(&b, Color::Black));
    }

    #[test]
    fn attack_coverage_ignores_own_king_safety() {
        // The black rook is pinned to its king along the f-file, yet it
        // still gives check along the fifth rank.
        let b = board(vec![
            at("whiteKing", 0, 4),
            at("whiteQueen", 5, 0),
            at("blackRook1", 5, 4),
            at("blackKing", 5, 7),
        ]);
        assert!(is_king_attacked(&b, Color::White));

        let rook = b.piece(id("blackRook1")).unwrap();
        let moves = legal_moves(&b, rook, None);
        assert!(!moves.contains(&Square::new(0, 4)));
        assert_eq!(moves.len(), 6);
        assert!(moves.iter().all(|sq| sq.file() == 5));
    }

    #[test]
    fn pinned_piece_taking_the_king_still_exposes_its_own() {
        let b = board(vec![
            at("whiteKing", 0, 4),
            at("whiteQueen", 5, 0),
            at("blackRook1", 5, 4),
            at("blackKing", 5, 7),
        ]);
        let rook = b.piece(id("blackRook1")).unwrap();
        assert!(exposes_king(&b, rook, Square::new(0, 4), None));

        // Unpinned, the capture is attack coverage but still never a legal move.
        let free = board(vec![
            at("whiteKing", 0, 4),
            at("blackRook1", 5, 4),
            at("blackKing", 7, 7),
        ]);
        let rook = free.piece(id("blackRook1")).unwrap();
        assert!(!exposes_king(&free, rook, Square::new(0, 4), None));
        let groups = move_pattern(rook, free.geometry());
        assert!(filter_legal(&free, rook, &groups, false).contains(&Square::new(0, 4)));
        assert!(!filter_legal(&free, rook, &groups, true).contains(&Square::new(0, 4)));
    }

    #[test]
    fn castling_rook_needs_rights_and_distance() {
        let b = board(vec![
            at("whiteKing", 4, 0),
            at("whiteRook1", 0, 0),
            at("whiteRook2", 7, 0),
            at("blackKing", 4, 7),
        ]);
        let king = b.piece(id("whiteKing")).unwrap();
        assert_eq!(castling_rook(&b, king, 1).map(|r| r.id()), Some(id("whiteRook2")));
        assert_eq!(castling_rook(&b, king, -1).map(|r| r.id()), Some(id("whiteRook1")));
        assert_eq!(
            sorted(castling_destinations(&b, king)),
            vec![Square::new(2, 0), Square::new(6, 0)]
        );

        let moved = board(vec![
            at("whiteKing", 4, 0),
            at("whiteRook1", 0, 0).without_castling(),
            at("whiteRook2", 7, 0),
            at("blackKing", 4, 7),
        ]);
        let king = moved.piece(id("whiteKing")).unwrap();
        assert_eq!(castling_destinations(&moved, king), vec![Square::new(6, 0)]);
    }

    #[test]
    fn long_castle_blocked_by_knight_on_b_file() {
        let b = board(vec![
            at("whiteKing", 4, 0),
            at("whiteRook1", 0, 0),
            at("whiteKnight1", 1, 0),
            at("blackKing", 4, 7),
        ]);
        let king = b.piece(id("whiteKing")).unwrap();
        assert!(castling_destinations(&b, king).is_empty());
    }

    #[test]
    fn en_passant_requires_fresh_double_step() {
        let b = board(vec![
            at("whiteKing", 4, 0),
            at("blackKing", 4, 7),
            at("whitePawn5", 4, 4),
            at("blackPawn4", 3, 4),
        ]);
        let pawn = b.piece(id("whitePawn5")).unwrap();
        let black_pawn = *b.piece(id("blackPawn4")).unwrap();

        let double = MoveRecord::new(black_pawn, Square::new(3, 6), Square::new(3, 4));
        assert_eq!(
            en_passant_targets(&b, pawn, Some(&double)),
            vec![Square::new(3, 5)]
        );

        let single = MoveRecord::new(black_pawn, Square::new(3, 5), Square::new(3, 4));
        assert!(en_passant_targets(&b, pawn, Some(&single)).is_empty());
        assert!(en_passant_targets(&b, pawn, None).is_empty());
    }

    #[test]
    fn en_passant_that_exposes_king_is_rejected() {
        // Capturing would clear the fifth rank between the white king and the rook.
        let b = board(vec![
            at("whiteKing", 0, 4),
            at("whitePawn5", 4, 4),
            at("blackPawn4", 3, 4),
            at("blackRook1", 7, 4),
            at("blackKing", 7, 7),
        ]);
        let pawn = b.piece(id("whitePawn5")).unwrap();
        let black_pawn = *b.piece(id("blackPawn4")).unwrap();
        let double = MoveRecord::new(black_pawn, Square::new(3, 6), Square::new(3, 4));
        assert_eq!(en_passant_targets(&b, pawn, Some(&double)).len(), 1);
        let moves = legal_moves(&b, pawn, Some(&double));
        assert_eq!(moves, vec![Square::new(4, 5)]);
    }

    #[test]
    fn queries_do_not_mutate_board() {
        let b = Board::standard(Geometry::ZERO_BASED);
        let before = b.clone();
        for piece in b.pieces_of(Color::White) {
            let _ = legal_moves(&b, piece, None);
        }
        assert!(has_any_legal_move(&b, Color::White, None));
        assert_eq!(b, before);
    }
}
