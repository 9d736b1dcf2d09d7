//! Game session: turn order, move submission, and termination.

use chess_core::{Color, File, MoveRequest, Piece, Square};
use thiserror::Error;

use crate::attacks::is_attacked;
use crate::board::{Board, CastlingRights, EnPassantFiles, Occupant, Placement};
use crate::movegen::{has_legal_move, try_apply, KingExposed};
use crate::resolver::{resolve, Rejection};

/// The state of a game after any number of plies.
///
/// The three non-ongoing states are terminal: once reached, the session
/// accepts no further moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Play continues; `check` reports whether the side to move's king
    /// is attacked.
    Ongoing { check: bool },
    /// The side to move is in check with no legal reply.
    Checkmate { winner: Color },
    /// The side to move is not in check but has no legal move.
    Stalemate,
    /// The same piece placement occurred for the third time.
    DrawByRepetition,
}

impl Status {
    /// Returns true once the game has ended.
    #[inline]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Status::Ongoing { .. })
    }
}

/// Why a submitted move was refused. The session state is unchanged
/// after any of these.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    /// No piece of the requested kind can reach the destination.
    #[error("no piece can make that move")]
    NoCandidate,

    /// More than one piece matches; the request needs a disambiguator.
    #[error("more than one piece can make that move")]
    Ambiguous,

    /// The move would leave the mover's own king attacked.
    #[error("that move would leave your king in check")]
    OwnKingExposed,

    /// The request came from the player whose turn it is not.
    #[error("it is not your turn")]
    OutOfTurn,

    /// The game has already ended.
    #[error("the game is over")]
    GameOver,
}

impl From<Rejection> for MoveError {
    fn from(rejection: Rejection) -> Self {
        match rejection {
            Rejection::NoCandidate => MoveError::NoCandidate,
            Rejection::Ambiguous => MoveError::Ambiguous,
        }
    }
}

impl From<KingExposed> for MoveError {
    fn from(_: KingExposed) -> Self {
        MoveError::OwnKingExposed
    }
}

/// One distinct piece placement seen during the game and how many times
/// it has occurred.
#[derive(Debug, Clone)]
struct SeenPosition {
    placement: Placement,
    count: u32,
}

/// A chess session: the authoritative board plus the rule state that
/// lives outside it.
///
/// Castling permissions, en passant flags, and the repetition history
/// are session state rather than board state, so two boards with
/// identical placements compare equal for repetition purposes no matter
/// how the sessions reached them.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    rights: CastlingRights,
    en_passant: EnPassantFiles,
    history: Vec<SeenPosition>,
    status: Status,
}

impl Game {
    /// Starts a game from the standard opening position. The opening
    /// placement counts as the first occurrence toward repetition.
    pub fn new() -> Self {
        Self::from_board(Board::startpos())
    }

    /// Starts a game from an arbitrary position with full castling
    /// permissions and no en passant flags. The position's status is
    /// evaluated immediately, so a board constructed in a mate or
    /// stalemate shape starts terminal.
    pub fn from_board(board: Board) -> Self {
        let mut game = Game {
            history: vec![SeenPosition {
                placement: board.placement(),
                count: 1,
            }],
            status: Status::Ongoing { check: false },
            board,
            rights: CastlingRights::all(),
            en_passant: EnPassantFiles::new(),
        };
        game.status = game.position_status();
        game
    }

    /// The current board.
    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The player whose turn it is.
    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.board.side_to_move()
    }

    /// The game status after the last accepted move.
    #[inline]
    pub fn status(&self) -> Status {
        self.status
    }

    /// Returns true once the game has ended.
    #[inline]
    pub fn is_over(&self) -> bool {
        self.status.is_terminal()
    }

    /// Submits one move request.
    ///
    /// On acceptance the move is committed, the turn passes, and the
    /// resulting status is returned. On rejection the session is
    /// unchanged and the same player may try again.
    ///
    /// `promotion` is consulted only after an accepted move lands a
    /// pawn on the promotion rank; it is re-invoked until it returns a
    /// queen, rook, bishop, or knight.
    pub fn submit(
        &mut self,
        request: &MoveRequest,
        mut promotion: impl FnMut() -> Piece,
    ) -> Result<Status, MoveError> {
        if self.is_over() {
            return Err(MoveError::GameOver);
        }
        let mover = request.color;
        if mover != self.board.side_to_move() {
            return Err(MoveError::OutOfTurn);
        }

        let resolved = resolve(&self.board, self.rights, &self.en_passant, request)?;
        let moved = self
            .board
            .occupant(resolved.from)
            .piece()
            .ok_or(MoveError::NoCandidate)?;
        let mut next = try_apply(&self.board, &resolved)?;

        // The move is legal; everything below commits it.
        if moved == Piece::Pawn && resolved.to.rank().index() == mover.promotion_rank() {
            let replacement = loop {
                let choice = promotion();
                if choice.is_promotion_choice() {
                    break choice;
                }
            };
            next.set(resolved.to, Occupant::Piece(mover, replacement));
        }

        self.update_castling_rights(mover, moved, resolved.from);

        // En passant flags live for exactly one opponent ply: the side
        // about to move loses its flags, and a double push arms one.
        self.en_passant.clear(mover.opposite());
        if resolved.double_push {
            self.en_passant.set(mover, resolved.to.file());
        }

        next.set_side_to_move(mover.opposite());
        self.board = next;
        self.status = self.evaluate();
        Ok(self.status)
    }

    /// Forfeits castling permissions when the king or a rook leaves its
    /// home square. Flags never return to true, even if the piece moves
    /// back.
    fn update_castling_rights(&mut self, mover: Color, moved: Piece, from: Square) {
        let back = mover.back_rank();
        match moved {
            Piece::King => self.rights.forfeit_all(mover),
            Piece::Rook if from.rank().index() == back => match from.file() {
                File::A => self.rights.forfeit_queenside(mover),
                File::H => self.rights.forfeit_kingside(mover),
                _ => {}
            },
            _ => {}
        }
    }

    /// Records the new placement in the repetition history, then
    /// evaluates the position. A third occurrence of any placement is
    /// an immediate draw, checked before mate or stalemate.
    fn evaluate(&mut self) -> Status {
        let placement = self.board.placement();
        match self
            .history
            .iter_mut()
            .find(|seen| seen.placement == placement)
        {
            Some(seen) => {
                seen.count += 1;
                if seen.count >= 3 {
                    return Status::DrawByRepetition;
                }
            }
            None => self.history.push(SeenPosition { placement, count: 1 }),
        }
        self.position_status()
    }

    /// Classifies the position for the side to move: ongoing (with or
    /// without check), checkmate, or stalemate.
    ///
    /// Panics if the side to move has no king; a kingless side is a
    /// corrupted session and play cannot meaningfully continue.
    fn position_status(&self) -> Status {
        let to_move = self.board.side_to_move();
        let king = self
            .board
            .king_square(to_move)
            .unwrap_or_else(|| panic!("{to_move} has no king on the board"));
        let check = is_attacked(&self.board, king, to_move.opposite());
        if has_legal_move(&self.board, self.rights, &self.en_passant) {
            Status::Ongoing { check }
        } else if check {
            Status::Checkmate {
                winner: to_move.opposite(),
            }
        } else {
            Status::Stalemate
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
