//! Core types for chess.
//!
//! This crate provides the fundamental types used across the rules
//! engine and the terminal front end:
//! - [`Piece`] and [`Color`] for piece representation
//! - [`Square`], [`File`], and [`Rank`] for board coordinates
//! - [`MoveRequest`] and [`Token`] for structured move input

mod color;
mod piece;
mod request;
mod square;

pub use color::Color;
pub use piece::Piece;
pub use request::{Disambiguator, MoveRequest, ParseError, Token};
pub use square::{File, Rank, Square};
