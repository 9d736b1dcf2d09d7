//! Chess rules engine.
//!
//! Plays arbiter between two players: it resolves compact move requests
//! against the current position, enforces every legality rule, carries
//! out special moves, and recognizes the ends of the game.
//!
//! - [`Board`] holds the 64-square placement and the side to move
//! - [`resolve`] turns a [`chess_core::MoveRequest`] into a concrete
//!   [`ResolvedMove`], or rejects it
//! - [`is_attacked`] answers attack queries for check detection
//! - [`Game`] owns a full session: turn order, castling permissions,
//!   en passant flags, repetition history, and termination

mod attacks;
mod board;
mod game;
mod movegen;
mod resolver;

pub use attacks::is_attacked;
pub use board::{Board, CastlingRights, EnPassantFiles, Occupant, Placement};
pub use game::{Game, MoveError, Status};
pub use movegen::{apply, enumerate, has_legal_move, try_apply, KingExposed};
pub use resolver::{resolve, Rejection, ResolvedMove};
