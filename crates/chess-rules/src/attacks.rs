//! Attack detection.
//!
//! The oracle scans the whole board and asks, piece by piece, whether
//! the attacker could capture on the target square under its movement
//! rules. Used for check detection, legality filtering, and the
//! attacked-transit-square conditions of castling.

use chess_core::{Color, Piece, Square};

use crate::board::{Board, Occupant};

/// Rook and queen ray directions.
pub(crate) const ORTHOGONAL: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Bishop and queen ray directions.
pub(crate) const DIAGONAL: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// Queen and king directions.
pub(crate) const ALL_DIRECTIONS: [(i8, i8); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

/// Knight jump offsets.
pub(crate) const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

/// Returns true if any piece of color `by` attacks the target square.
///
/// A square is attacked when a piece could capture on it: pawn
/// diagonals count, pawn pushes do not, and a sliding piece's ray stops
/// at the first occupied square. Occupancy of the target itself is
/// irrelevant.
pub fn is_attacked(board: &Board, target: Square, by: Color) -> bool {
    board.squares().any(|(from, occ)| match occ {
        Occupant::Piece(color, piece) if color == by => {
            attacks_square(board, from, color, piece, target)
        }
        _ => false,
    })
}

fn attacks_square(board: &Board, from: Square, color: Color, piece: Piece, target: Square) -> bool {
    match piece {
        Piece::Pawn => {
            let dir = color.pawn_direction();
            from.offset(-1, dir) == Some(target) || from.offset(1, dir) == Some(target)
        }
        Piece::Knight => KNIGHT_JUMPS
            .iter()
            .any(|&(df, dr)| from.offset(df, dr) == Some(target)),
        Piece::King => ALL_DIRECTIONS
            .iter()
            .any(|&(df, dr)| from.offset(df, dr) == Some(target)),
        Piece::Bishop => ray_reaches(board, from, &DIAGONAL, target),
        Piece::Rook => ray_reaches(board, from, &ORTHOGONAL, target),
        Piece::Queen => ray_reaches(board, from, &ALL_DIRECTIONS, target),
    }
}

/// Returns true if a slider at `from` reaches `target` along one of the
/// given directions with every intervening square empty.
pub(crate) fn ray_reaches(board: &Board, from: Square, dirs: &[(i8, i8)], target: Square) -> bool {
    for &(df, dr) in dirs {
        let mut cur = from;
        while let Some(next) = cur.offset(df, dr) {
            if next == target {
                return true;
            }
            if !board.occupant(next).is_empty() {
                break;
            }
            cur = next;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::Color::{Black, White};

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn board_with(pieces: &[(&str, Color, Piece)]) -> Board {
        let mut board = Board::empty();
        for &(s, color, piece) in pieces {
            board.set(sq(s), Occupant::Piece(color, piece));
        }
        board
    }

    #[test]
    fn pawn_attacks_diagonals_only() {
        let board = board_with(&[("e4", White, Piece::Pawn)]);
        assert!(is_attacked(&board, sq("d5"), White));
        assert!(is_attacked(&board, sq("f5"), White));
        assert!(!is_attacked(&board, sq("e5"), White));
        assert!(!is_attacked(&board, sq("d3"), White));

        let board = board_with(&[("e4", Black, Piece::Pawn)]);
        assert!(is_attacked(&board, sq("d3"), Black));
        assert!(is_attacked(&board, sq("f3"), Black));
        assert!(!is_attacked(&board, sq("e3"), Black));
    }

    #[test]
    fn knight_jumps() {
        let board = board_with(&[("d4", White, Piece::Knight)]);
        for target in ["b3", "b5", "c2", "c6", "e2", "e6", "f3", "f5"] {
            assert!(is_attacked(&board, sq(target), White), "{target}");
        }
        assert!(!is_attacked(&board, sq("d5"), White));
        assert!(!is_attacked(&board, sq("f4"), White));
    }

    #[test]
    fn slider_rays_stop_at_blockers() {
        let board = board_with(&[
            ("a1", White, Piece::Rook),
            ("a4", Black, Piece::Pawn),
            ("c1", White, Piece::Bishop),
        ]);
        // The blocker square itself is attacked; squares beyond are not.
        assert!(is_attacked(&board, sq("a3"), White));
        assert!(is_attacked(&board, sq("a4"), White));
        assert!(!is_attacked(&board, sq("a5"), White));
        // Rook ray along the rank stops at the bishop.
        assert!(is_attacked(&board, sq("b1"), White));
        assert!(!is_attacked(&board, sq("d1"), White));
        // Bishop diagonal.
        assert!(is_attacked(&board, sq("f4"), White));
        assert!(!is_attacked(&board, sq("c4"), White));
    }

    #[test]
    fn queen_covers_both_ray_sets() {
        let board = board_with(&[("d4", White, Piece::Queen)]);
        assert!(is_attacked(&board, sq("d8"), White));
        assert!(is_attacked(&board, sq("h8"), White));
        assert!(is_attacked(&board, sq("a1"), White));
        assert!(!is_attacked(&board, sq("e6"), White));
    }

    #[test]
    fn king_attacks_neighbors() {
        let board = board_with(&[("e1", White, Piece::King)]);
        assert!(is_attacked(&board, sq("d1"), White));
        assert!(is_attacked(&board, sq("f2"), White));
        assert!(!is_attacked(&board, sq("e3"), White));
    }

    #[test]
    fn target_occupancy_is_irrelevant() {
        let board = board_with(&[
            ("a1", White, Piece::Rook),
            ("a8", Black, Piece::King),
        ]);
        assert!(is_attacked(&board, sq("a8"), White));
    }
}
