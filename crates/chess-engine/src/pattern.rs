//! Geometric move patterns.
//!
//! [`move_pattern`] lists where a piece could go on an empty board, grouped
//! by movement family. Board contents are not consulted here: blocking,
//! captures and king safety are the job of [`crate::legality`].

use chess_core::{Geometry, Piece, PieceKind, Square};
use serde::Serialize;

/// How the squares of a [`MoveGroup`] are reached, which decides how the
/// legality filter treats them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveFamily {
    /// One ray of a bishop, rook or queen, nearest square first.
    Slide,
    /// Knight jumps; never blocked by pieces in between.
    Leap,
    /// King steps to adjacent squares.
    Step,
    /// Forward diagonals of a pawn; need an enemy occupant.
    PawnAttack,
    /// Straight pawn pushes, nearest first; need an empty path.
    PawnAdvance,
    /// En-passant landing squares; the captured pawn sits beside the pawn.
    EnPassant,
    /// Two-file king hops, already checked by the castling rules.
    Castle,
}

/// Candidate destinations sharing one movement family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveGroup {
    pub family: MoveFamily,
    pub squares: Vec<Square>,
}

impl MoveGroup {
    pub fn new(family: MoveFamily, squares: Vec<Square>) -> Self {
        MoveGroup { family, squares }
    }
}

pub const ROOK_DIRS: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

pub const BISHOP_DIRS: [(i8, i8); 4] = [(1, 1), (-1, 1), (1, -1), (-1, -1)];

pub const QUEEN_DIRS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (-1, 1),
    (0, -1),
    (1, -1),
    (-1, -1),
    (1, 0),
    (-1, 0),
];

pub const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
];

pub const KING_DELTAS: [(i8, i8); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (-1, -1),
    (1, -1),
    (-1, 1),
];

/// Squares along one direction, nearest first, stopping at the board edge.
pub fn ray(from: Square, (df, dr): (i8, i8), geometry: Geometry) -> Vec<Square> {
    let mut squares = Vec::with_capacity(7);
    let mut sq = from.offset(df, dr);
    while geometry.contains(sq) {
        squares.push(sq);
        sq = sq.offset(df, dr);
    }
    squares
}

fn slides(from: Square, dirs: &[(i8, i8)], geometry: Geometry) -> Vec<MoveGroup> {
    dirs.iter()
        .map(|&dir| MoveGroup::new(MoveFamily::Slide, ray(from, dir, geometry)))
        .collect()
}

fn offsets(from: Square, deltas: &[(i8, i8)], geometry: Geometry) -> Vec<Square> {
    deltas
        .iter()
        .map(|&(df, dr)| from.offset(df, dr))
        .filter(|&sq| geometry.contains(sq))
        .collect()
}

/// Returns the geometric candidates for a piece, grouped by movement family.
///
/// Pawns yield an attack group followed by an advance group. Castling and
/// en-passant squares depend on game history and are added by the game, not
/// here.
pub fn move_pattern(piece: &Piece, geometry: Geometry) -> Vec<MoveGroup> {
    let from = piece.square();
    match piece.kind() {
        PieceKind::Bishop => slides(from, &BISHOP_DIRS, geometry),
        PieceKind::Rook { .. } => slides(from, &ROOK_DIRS, geometry),
        PieceKind::Queen => slides(from, &QUEEN_DIRS, geometry),
        PieceKind::Knight => vec![MoveGroup::new(
            MoveFamily::Leap,
            offsets(from, &KNIGHT_DELTAS, geometry),
        )],
        PieceKind::King { .. } => vec![MoveGroup::new(
            MoveFamily::Step,
            offsets(from, &KING_DELTAS, geometry),
        )],
        PieceKind::Pawn => {
            let color = piece.color();
            let dir = color.pawn_direction();
            let attacks = offsets(from, &[(-1, dir), (1, dir)], geometry);
            let mut advances = offsets(from, &[(0, dir)], geometry);
            if from.rank() == geometry.pawn_rank(color) {
                advances.extend(offsets(from, &[(0, 2 * dir)], geometry));
            }
            vec![
                MoveGroup::new(MoveFamily::PawnAttack, attacks),
                MoveGroup::new(MoveFamily::PawnAdvance, advances),
            ]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::{Color, PieceId, Role};
    use proptest::prelude::*;

    fn piece(color: Color, role: Role, sq: Square) -> Piece {
        Piece::new(PieceId::new(color, role, Some(1)), sq)
    }

    fn all_squares(groups: &[MoveGroup]) -> Vec<Square> {
        groups.iter().flat_map(|g| g.squares.iter().copied()).collect()
    }

    #[test]
    fn rook_rays_are_ordered_nearest_first() {
        let g = Geometry::ZERO_BASED;
        let groups = move_pattern(&piece(Color::White, Role::Rook, Square::new(0, 0)), g);
        assert_eq!(groups.len(), 4);
        assert!(groups.iter().all(|grp| grp.family == MoveFamily::Slide));
        let up = &groups[0].squares;
        assert_eq!(up.len(), 7);
        assert_eq!(up[0], Square::new(0, 1));
        assert_eq!(up[6], Square::new(0, 7));
        assert!(groups[1].squares.is_empty());
        assert_eq!(all_squares(&groups).len(), 14);
    }

    #[test]
    fn queen_in_centre_covers_27_squares() {
        let g = Geometry::ZERO_BASED;
        let groups = move_pattern(&piece(Color::Black, Role::Queen, Square::new(3, 3)), g);
        assert_eq!(groups.len(), 8);
        assert_eq!(all_squares(&groups).len(), 27);
    }

    #[test]
    fn bishop_diagonals() {
        let g = Geometry::ONE_BASED;
        let groups = move_pattern(&piece(Color::White, Role::Bishop, Square::new(3, 1)), g);
        assert_eq!(groups.len(), 4);
        assert_eq!(all_squares(&groups).len(), 7);
        assert!(all_squares(&groups).contains(&Square::new(8, 6)));
        assert!(all_squares(&groups).contains(&Square::new(1, 3)));
    }

    #[test]
    fn knight_in_corner_has_two_targets() {
        let g = Geometry::ZERO_BASED;
        let groups = move_pattern(&piece(Color::White, Role::Knight, Square::new(0, 0)), g);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].family, MoveFamily::Leap);
        let mut squares = groups[0].squares.clone();
        squares.sort();
        assert_eq!(squares, vec![Square::new(1, 2), Square::new(2, 1)]);
    }

    #[test]
    fn king_on_edge() {
        let g = Geometry::ONE_BASED;
        let groups = move_pattern(&piece(Color::Black, Role::King, Square::new(5, 8)), g);
        assert_eq!(groups[0].family, MoveFamily::Step);
        assert_eq!(groups[0].squares.len(), 5);
    }

    #[test]
    fn pawn_from_start_rank_can_double_step() {
        let g = Geometry::ZERO_BASED;
        let groups = move_pattern(&piece(Color::White, Role::Pawn, Square::new(4, 1)), g);
        assert_eq!(groups[0].family, MoveFamily::PawnAttack);
        assert_eq!(groups[0].squares, vec![Square::new(3, 2), Square::new(5, 2)]);
        assert_eq!(groups[1].family, MoveFamily::PawnAdvance);
        assert_eq!(groups[1].squares, vec![Square::new(4, 2), Square::new(4, 3)]);
    }

    #[test]
    fn black_pawn_moves_down_and_single_steps_later() {
        let g = Geometry::ZERO_BASED;
        let groups = move_pattern(&piece(Color::Black, Role::Pawn, Square::new(0, 5)), g);
        assert_eq!(groups[0].squares, vec![Square::new(1, 4)]);
        assert_eq!(groups[1].squares, vec![Square::new(0, 4)]);
    }

    #[test]
    fn both_edges_are_reachable() {
        for g in [Geometry::ZERO_BASED, Geometry::ONE_BASED] {
            let rook = piece(Color::White, Role::Rook, g.at(3, 3));
            let squares = all_squares(&move_pattern(&rook, g));
            assert!(squares.contains(&Square::new(g.min(), g.at(3, 3).rank())));
            assert!(squares.contains(&Square::new(g.max(), g.at(3, 3).rank())));
            assert!(squares.contains(&Square::new(g.at(3, 3).file(), g.min())));
            assert!(squares.contains(&Square::new(g.at(3, 3).file(), g.max())));
        }
    }

    fn any_role() -> impl Strategy<Value = Role> {
        prop::sample::select(Role::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn candidates_never_leave_the_board(
            origin in -3i8..4,
            f in 0i8..8,
            r in 1i8..7,
            role in any_role(),
            white in any::<bool>(),
        ) {
            let g = Geometry::new(origin).unwrap();
            let color = if white { Color::White } else { Color::Black };
            let p = piece(color, role, g.at(f, r));
            for sq in all_squares(&move_pattern(&p, g)) {
                prop_assert!(g.contains(sq), "{:?} outside {:?}", sq, g);
                prop_assert_ne!(sq, p.square());
            }
        }
    }
}
