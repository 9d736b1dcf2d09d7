//! Move resolution.
//!
//! The resolver turns a structured request ("a knight to f3") into a
//! concrete move by searching the board for every piece of the
//! requested kind and color that could reach the destination under its
//! movement rules. All candidates are collected before judging: none
//! rejects the request, exactly one resolves it, and more than one is
//! an ambiguity the player must settle with a disambiguator.
//!
//! The resolver checks movement geometry, path obstruction, castling
//! permissions, and the attacked-square conditions of castling. It does
//! not check whether the move leaves the mover's own king attacked;
//! that is the legality filter's job.

use chess_core::{Color, File, MoveRequest, Piece, Rank, Square};
use thiserror::Error;

use crate::attacks::{is_attacked, ray_reaches, ALL_DIRECTIONS, DIAGONAL, KNIGHT_JUMPS, ORTHOGONAL};
use crate::board::{Board, CastlingRights, EnPassantFiles, Occupant};

/// Why a request failed to resolve.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// No piece of the requested kind can reach the destination.
    #[error("no piece can make that move")]
    NoCandidate,

    /// More than one piece matches; the request needs a disambiguator.
    #[error("more than one piece can make that move")]
    Ambiguous,
}

/// A fully resolved move: a concrete origin plus the side effects the
/// board mutator must carry out along with the from-to relocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedMove {
    pub from: Square,
    pub to: Square,
    /// Extra square cleared beyond the destination (the captured pawn
    /// of an en passant capture).
    pub clears: Option<Square>,
    /// Rook relocation carried by a castling move.
    pub rook_move: Option<(Square, Square)>,
    /// True for a two-square pawn advance, which arms the en passant
    /// flag on its file.
    pub double_push: bool,
}

impl ResolvedMove {
    pub(crate) const fn normal(from: Square, to: Square) -> Self {
        ResolvedMove {
            from,
            to,
            clears: None,
            rook_move: None,
            double_push: false,
        }
    }

    pub(crate) const fn pawn_double(from: Square, to: Square) -> Self {
        ResolvedMove {
            from,
            to,
            clears: None,
            rook_move: None,
            double_push: true,
        }
    }

    pub(crate) const fn en_passant(from: Square, to: Square, captured: Square) -> Self {
        ResolvedMove {
            from,
            to,
            clears: Some(captured),
            rook_move: None,
            double_push: false,
        }
    }

    pub(crate) const fn castle(from: Square, to: Square, rook: (Square, Square)) -> Self {
        ResolvedMove {
            from,
            to,
            clears: None,
            rook_move: Some(rook),
            double_push: false,
        }
    }
}

/// Resolves a request against the current position.
///
/// The request's color is taken as the mover; turn order is enforced by
/// the caller.
pub fn resolve(
    board: &Board,
    rights: CastlingRights,
    ep: &EnPassantFiles,
    request: &MoveRequest,
) -> Result<ResolvedMove, Rejection> {
    let mover = request.color;
    let dest = request.dest;
    if board.occupant(dest).is_color(mover) {
        return Err(Rejection::NoCandidate);
    }

    match request.piece {
        Piece::Pawn => resolve_pawn(board, ep, request),
        Piece::King => resolve_king(board, rights, request),
        Piece::Knight => {
            let candidates = leaper_candidates(board, mover, Piece::Knight, dest, &KNIGHT_JUMPS);
            pick_unique(candidates, request).map(|from| ResolvedMove::normal(from, dest))
        }
        piece => {
            let dirs: &[(i8, i8)] = match piece {
                Piece::Bishop => &DIAGONAL,
                Piece::Rook => &ORTHOGONAL,
                _ => &ALL_DIRECTIONS,
            };
            let candidates = board
                .pieces_of(mover)
                .filter(|&(_, kind)| kind == piece)
                .filter(|&(from, _)| ray_reaches(board, from, dirs, dest))
                .map(|(from, _)| from)
                .collect();
            pick_unique(candidates, request).map(|from| ResolvedMove::normal(from, dest))
        }
    }
}

/// Collects the squares of `mover`'s pieces of the given kind standing
/// one leap away from the destination.
fn leaper_candidates(
    board: &Board,
    mover: Color,
    piece: Piece,
    dest: Square,
    jumps: &[(i8, i8)],
) -> Vec<Square> {
    jumps
        .iter()
        .filter_map(|&(df, dr)| dest.offset(df, dr))
        .filter(|&from| board.occupant(from) == Occupant::Piece(mover, piece))
        .collect()
}

/// Applies the disambiguator filter and judges the candidate count.
fn pick_unique(candidates: Vec<Square>, request: &MoveRequest) -> Result<Square, Rejection> {
    let mut matching = candidates
        .into_iter()
        .filter(|&from| match request.disambiguator {
            Some(d) => d.matches(from),
            None => true,
        });
    match (matching.next(), matching.next()) {
        (None, _) => Err(Rejection::NoCandidate),
        (Some(from), None) => Ok(from),
        (Some(_), Some(_)) => Err(Rejection::Ambiguous),
    }
}

fn resolve_pawn(
    board: &Board,
    ep: &EnPassantFiles,
    request: &MoveRequest,
) -> Result<ResolvedMove, Rejection> {
    let mover = request.color;
    let dir = mover.pawn_direction();
    let dest = request.dest;
    let own_pawn = Occupant::Piece(mover, Piece::Pawn);

    if board.occupant(dest).color() == Some(mover.opposite()) {
        // Diagonal capture.
        let candidates: Vec<Square> = [dest.offset(-1, -dir), dest.offset(1, -dir)]
            .into_iter()
            .flatten()
            .filter(|&from| board.occupant(from) == own_pawn)
            .collect();
        let from = pick_unique(candidates, request)?;
        return Ok(ResolvedMove::normal(from, dest));
    }

    // Empty destination: a push, or an en passant capture. A matching
    // push takes precedence.
    if let Some(from) = dest.offset(0, -dir).filter(|&from| board.occupant(from) == own_pawn) {
        let from = pick_unique(vec![from], request)?;
        return Ok(ResolvedMove::normal(from, dest));
    }
    // A double push needs the pawn on its home rank and the square it
    // jumps over empty.
    let intervening_clear = dest
        .offset(0, -dir)
        .is_some_and(|sq| board.occupant(sq).is_empty());
    let double_from = dest.offset(0, -2 * dir).filter(|&from| {
        intervening_clear
            && board.occupant(from) == own_pawn
            && from.rank().index() == mover.pawn_home_rank()
    });
    if let Some(from) = double_from {
        let from = pick_unique(vec![from], request)?;
        return Ok(ResolvedMove::pawn_double(from, dest));
    }

    // En passant: the opponent double-pushed on this file last ply and
    // the destination is the square that pawn passed over.
    let opponent = mover.opposite();
    let passed_rank = (opponent.pawn_home_rank() as i8 - dir) as u8;
    if ep.flagged(opponent, dest.file()) && dest.rank().index() == passed_rank {
        let captured = dest
            .offset(0, -dir)
            .filter(|&sq| board.occupant(sq) == Occupant::Piece(opponent, Piece::Pawn));
        if let Some(captured) = captured {
            let candidates: Vec<Square> = [dest.offset(-1, -dir), dest.offset(1, -dir)]
                .into_iter()
                .flatten()
                .filter(|&from| board.occupant(from) == own_pawn)
                .collect();
            let from = pick_unique(candidates, request)?;
            return Ok(ResolvedMove::en_passant(from, dest, captured));
        }
    }

    Err(Rejection::NoCandidate)
}

fn resolve_king(
    board: &Board,
    rights: CastlingRights,
    request: &MoveRequest,
) -> Result<ResolvedMove, Rejection> {
    let mover = request.color;
    let dest = request.dest;
    let from = match board.king_square(mover) {
        Some(sq) => sq,
        None => return Err(Rejection::NoCandidate),
    };
    if let Some(d) = request.disambiguator {
        if !d.matches(from) {
            return Err(Rejection::NoCandidate);
        }
    }

    let adjacent = ALL_DIRECTIONS
        .iter()
        .any(|&(df, dr)| from.offset(df, dr) == Some(dest));
    if adjacent {
        // A king may not step onto an attacked square. The post-move
        // legality filter re-checks on the applied board, which also
        // catches retreats along an attacker's ray.
        if is_attacked(board, dest, mover.opposite()) {
            return Err(Rejection::NoCandidate);
        }
        return Ok(ResolvedMove::normal(from, dest));
    }

    resolve_castle(board, rights, mover, from, dest).ok_or(Rejection::NoCandidate)
}

/// Tries to read the request as castling: the king on its home square
/// asked to move two files toward a rook it may still castle with.
fn resolve_castle(
    board: &Board,
    rights: CastlingRights,
    mover: Color,
    from: Square,
    dest: Square,
) -> Option<ResolvedMove> {
    let back = Rank::from_index(mover.back_rank())?;
    if from != Square::new(File::E, back) || dest.rank() != back {
        return None;
    }
    let wing = match dest.file() {
        File::G => Wing::Kingside,
        File::C => Wing::Queenside,
        _ => return None,
    };
    castle_move(board, rights, mover, wing)
}

/// The two castling wings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Wing {
    Kingside,
    Queenside,
}

/// Builds the castling move for one wing if every precondition holds:
/// the right is intact, the king and rook stand on their home squares,
/// the squares between them are empty, and neither the king's square
/// nor any square it crosses is attacked. Shared by request resolution
/// and move enumeration so the two cannot disagree.
pub(crate) fn castle_move(
    board: &Board,
    rights: CastlingRights,
    mover: Color,
    wing: Wing,
) -> Option<ResolvedMove> {
    let back = Rank::from_index(mover.back_rank())?;
    let at = |file: File| Square::new(file, back);

    let (allowed, rook_home, between, transit, king_to, rook_to): (
        bool,
        File,
        &[File],
        [File; 3],
        File,
        File,
    ) = match wing {
        Wing::Kingside => (
            rights.can_kingside(mover),
            File::H,
            &[File::F, File::G],
            [File::E, File::F, File::G],
            File::G,
            File::F,
        ),
        Wing::Queenside => (
            rights.can_queenside(mover),
            File::A,
            &[File::B, File::C, File::D],
            [File::E, File::D, File::C],
            File::C,
            File::D,
        ),
    };

    if !allowed
        || board.occupant(at(File::E)) != Occupant::Piece(mover, Piece::King)
        || board.occupant(at(rook_home)) != Occupant::Piece(mover, Piece::Rook)
    {
        return None;
    }
    if between.iter().any(|&f| !board.occupant(at(f)).is_empty()) {
        return None;
    }
    let enemy = mover.opposite();
    if transit.iter().any(|&f| is_attacked(board, at(f), enemy)) {
        return None;
    }

    Some(ResolvedMove::castle(
        at(File::E),
        at(king_to),
        (at(rook_home), at(rook_to)),
    ))
}
