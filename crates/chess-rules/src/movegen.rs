//! Trial application and legal-move enumeration.
//!
//! Moves are applied to a clone of the board, never in place: the
//! legality filter inspects the clone and the caller commits it only on
//! success, so the authoritative board is never left mid-move.

use chess_core::{Piece, Square};
use thiserror::Error;

use crate::attacks::{is_attacked, ALL_DIRECTIONS, DIAGONAL, KNIGHT_JUMPS, ORTHOGONAL};
use crate::board::{Board, CastlingRights, EnPassantFiles, Occupant};
use crate::resolver::{castle_move, ResolvedMove, Wing};

/// The applied move left the mover's own king attacked.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("that move would leave your king in check")]
pub struct KingExposed;

/// Applies a resolved move to a fresh clone of the board.
///
/// Carries out the from-to relocation plus the move's side effects: the
/// extra cleared square of en passant and the rook relocation of
/// castling. Side to move and promotion are the caller's business.
pub fn apply(board: &Board, mv: &ResolvedMove) -> Board {
    let mut next = board.clone();
    let piece = next.occupant(mv.from);
    if let Some(sq) = mv.clears {
        next.clear(sq);
    }
    next.clear(mv.from);
    next.set(mv.to, piece);
    if let Some((rook_from, rook_to)) = mv.rook_move {
        let rook = next.occupant(rook_from);
        next.clear(rook_from);
        next.set(rook_to, rook);
    }
    next
}

/// Applies a resolved move and runs the legality filter: the resulting
/// board is returned only if the side to move's king is not attacked on
/// it.
///
/// Panics if the side to move has no king; a kingless side is a
/// corrupted session and play cannot meaningfully continue.
pub fn try_apply(board: &Board, mv: &ResolvedMove) -> Result<Board, KingExposed> {
    let mover = board.side_to_move();
    let next = apply(board, mv);
    let king = next
        .king_square(mover)
        .unwrap_or_else(|| panic!("{mover} has no king on the board"));
    if is_attacked(&next, king, mover.opposite()) {
        Err(KingExposed)
    } else {
        Ok(next)
    }
}

/// Enumerates every pseudo-legal move for the side to move: correct
/// geometry, path, and capture shape, with king safety left to the
/// legality filter.
///
/// Promotion is represented by the pawn reaching the last rank; the
/// replacement choice never affects legality.
pub fn enumerate(board: &Board, rights: CastlingRights, ep: &EnPassantFiles) -> Vec<ResolvedMove> {
    let mover = board.side_to_move();
    let mut moves = Vec::new();

    for (from, piece) in board.pieces_of(mover) {
        match piece {
            Piece::Pawn => pawn_moves(board, ep, from, &mut moves),
            Piece::Knight => leaper_moves(board, from, &KNIGHT_JUMPS, &mut moves),
            Piece::King => {
                leaper_moves(board, from, &ALL_DIRECTIONS, &mut moves);
                castle_moves(board, rights, &mut moves);
            }
            Piece::Bishop => slider_moves(board, from, &DIAGONAL, &mut moves),
            Piece::Rook => slider_moves(board, from, &ORTHOGONAL, &mut moves),
            Piece::Queen => slider_moves(board, from, &ALL_DIRECTIONS, &mut moves),
        }
    }

    moves
}

/// Returns true if the side to move has at least one fully legal move.
/// The difference between check and checkmate, and between a playable
/// position and stalemate.
pub fn has_legal_move(board: &Board, rights: CastlingRights, ep: &EnPassantFiles) -> bool {
    enumerate(board, rights, ep)
        .iter()
        .any(|mv| try_apply(board, mv).is_ok())
}

fn pawn_moves(board: &Board, ep: &EnPassantFiles, from: Square, moves: &mut Vec<ResolvedMove>) {
    let mover = board.side_to_move();
    let dir = mover.pawn_direction();

    if let Some(one) = from.offset(0, dir) {
        if board.occupant(one).is_empty() {
            moves.push(ResolvedMove::normal(from, one));
            if from.rank().index() == mover.pawn_home_rank() {
                if let Some(two) = from.offset(0, 2 * dir) {
                    if board.occupant(two).is_empty() {
                        moves.push(ResolvedMove::pawn_double(from, two));
                    }
                }
            }
        }
    }

    let opponent = mover.opposite();
    let passed_rank = (opponent.pawn_home_rank() as i8 - dir) as u8;
    for df in [-1, 1] {
        let Some(dest) = from.offset(df, dir) else {
            continue;
        };
        if board.occupant(dest).is_color(opponent) {
            moves.push(ResolvedMove::normal(from, dest));
        } else if board.occupant(dest).is_empty()
            && dest.rank().index() == passed_rank
            && ep.flagged(opponent, dest.file())
        {
            let captured = dest
                .offset(0, -dir)
                .filter(|&sq| board.occupant(sq) == Occupant::Piece(opponent, Piece::Pawn));
            if let Some(captured) = captured {
                moves.push(ResolvedMove::en_passant(from, dest, captured));
            }
        }
    }
}

fn leaper_moves(board: &Board, from: Square, jumps: &[(i8, i8)], moves: &mut Vec<ResolvedMove>) {
    let mover = board.side_to_move();
    for &(df, dr) in jumps {
        if let Some(dest) = from.offset(df, dr) {
            if !board.occupant(dest).is_color(mover) {
                moves.push(ResolvedMove::normal(from, dest));
            }
        }
    }
}

fn slider_moves(board: &Board, from: Square, dirs: &[(i8, i8)], moves: &mut Vec<ResolvedMove>) {
    let mover = board.side_to_move();
    for &(df, dr) in dirs {
        let mut cur = from;
        while let Some(dest) = cur.offset(df, dr) {
            match board.occupant(dest).color() {
                None => moves.push(ResolvedMove::normal(from, dest)),
                Some(color) => {
                    if color != mover {
                        moves.push(ResolvedMove::normal(from, dest));
                    }
                    break;
                }
            }
            cur = dest;
        }
    }
}

/// Castling goes through the resolver's shared precondition check so
/// stalemate detection sees a castle-only position as playable.
fn castle_moves(board: &Board, rights: CastlingRights, moves: &mut Vec<ResolvedMove>) {
    let mover = board.side_to_move();
    for wing in [Wing::Kingside, Wing::Queenside] {
        if let Some(mv) = castle_move(board, rights, mover, wing) {
            moves.push(mv);
        }
    }
}
