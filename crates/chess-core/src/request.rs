//! Structured move requests and the compact move-token grammar.
//!
//! A raw token names a destination and optionally a piece letter and a
//! disambiguator, e.g. `e4`, `de5`, `nf3`, `rfh3`, `n1e2`. The parser
//! turns one token into a [`MoveRequest`] for the side to move; the
//! rules engine decides whether any piece can actually honor it.

use crate::{Color, File, Piece, Rank, Square};
use thiserror::Error;

/// Extra file or rank used to select among several same-kind pieces
/// that could reach the same destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disambiguator {
    File(File),
    Rank(Rank),
}

impl Disambiguator {
    /// Parses a single disambiguator character ('a'-'h' or '1'-'8').
    pub const fn from_char(c: char) -> Option<Self> {
        if let Some(file) = File::from_char(c) {
            Some(Disambiguator::File(file))
        } else if let Some(rank) = Rank::from_char(c) {
            Some(Disambiguator::Rank(rank))
        } else {
            None
        }
    }

    /// Returns true if the given source square matches this disambiguator.
    #[inline]
    pub fn matches(self, source: Square) -> bool {
        match self {
            Disambiguator::File(file) => source.file() == file,
            Disambiguator::Rank(rank) => source.rank() == rank,
        }
    }
}

/// A structured move request: which player wants to move which kind of
/// piece to which square. The promotion choice is not part of the
/// request; it is supplied through a callback only after the move has
/// been accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRequest {
    /// The player making the request.
    pub color: Color,
    /// The kind of piece to move (pawn when the token has no piece letter).
    pub piece: Piece,
    /// The destination square.
    pub dest: Square,
    /// Optional origin file or rank selecting among multiple candidates.
    pub disambiguator: Option<Disambiguator>,
}

/// One token of player input: either a move request or the quit signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    Move(MoveRequest),
    Quit,
}

/// Errors produced by the token parser.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty move token")]
    Empty,

    #[error("invalid piece letter '{0}'")]
    InvalidPieceLetter(char),

    #[error("invalid destination square in \"{0}\"")]
    InvalidSquare(String),

    #[error("invalid disambiguator '{0}'")]
    InvalidDisambiguator(char),

    #[error("unrecognized move syntax \"{0}\"")]
    Syntax(String),
}

impl Token {
    /// Parses one move token for the given player.
    ///
    /// Grammar:
    /// - `dest` — pawn move, e.g. `e4`
    /// - `origin-file dest` — pawn move with origin file, e.g. `de5`
    /// - `piece-letter dest` — e.g. `nf3`
    /// - `piece-letter disambiguator dest` — e.g. `rfh3`, `n1e2`
    /// - `quit` (case-insensitive)
    ///
    /// Piece letters are accepted in either case, with one exception: a
    /// lowercase leading `b` on a three-character token reads as a pawn
    /// origin file (`bxc4`-style captures), while `B` selects a bishop.
    pub fn parse(input: &str, color: Color) -> Result<Token, ParseError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ParseError::Empty);
        }
        if input.eq_ignore_ascii_case("quit") {
            return Ok(Token::Quit);
        }

        let chars: Vec<char> = input.chars().collect();
        let request = match chars.len() {
            // Bare destination: a pawn move.
            2 => MoveRequest {
                color,
                piece: Piece::Pawn,
                dest: parse_dest(input, chars[0], chars[1])?,
                disambiguator: None,
            },
            3 => {
                let dest = parse_dest(input, chars[1], chars[2])?;
                if chars[0] == 'b' || Piece::from_letter(chars[0]).is_none() {
                    // Pawn move with an origin file, e.g. "de5".
                    let file = File::from_char(chars[0])
                        .ok_or(ParseError::InvalidPieceLetter(chars[0]))?;
                    MoveRequest {
                        color,
                        piece: Piece::Pawn,
                        dest,
                        disambiguator: Some(Disambiguator::File(file)),
                    }
                } else {
                    MoveRequest {
                        color,
                        piece: piece_letter(chars[0])?,
                        dest,
                        disambiguator: None,
                    }
                }
            }
            4 => MoveRequest {
                color,
                piece: piece_letter(chars[0])?,
                dest: parse_dest(input, chars[2], chars[3])?,
                disambiguator: Some(
                    Disambiguator::from_char(chars[1])
                        .ok_or(ParseError::InvalidDisambiguator(chars[1]))?,
                ),
            },
            _ => return Err(ParseError::Syntax(input.to_string())),
        };

        Ok(Token::Move(request))
    }
}

fn piece_letter(c: char) -> Result<Piece, ParseError> {
    Piece::from_letter(c).ok_or(ParseError::InvalidPieceLetter(c))
}

fn parse_dest(input: &str, file: char, rank: char) -> Result<Square, ParseError> {
    match (File::from_char(file), Rank::from_char(rank)) {
        (Some(f), Some(r)) => Ok(Square::new(f, r)),
        _ => Err(ParseError::InvalidSquare(input.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(input: &str) -> MoveRequest {
        match Token::parse(input, Color::White).unwrap() {
            Token::Move(request) => request,
            Token::Quit => panic!("expected a move token"),
        }
    }

    #[test]
    fn parse_pawn_push() {
        let r = request("e4");
        assert_eq!(r.piece, Piece::Pawn);
        assert_eq!(r.dest, Square::from_algebraic("e4").unwrap());
        assert_eq!(r.disambiguator, None);
    }

    #[test]
    fn parse_pawn_with_origin_file() {
        let r = request("de5");
        assert_eq!(r.piece, Piece::Pawn);
        assert_eq!(r.dest, Square::from_algebraic("e5").unwrap());
        assert_eq!(r.disambiguator, Some(Disambiguator::File(File::D)));
    }

    #[test]
    fn parse_piece_move() {
        let r = request("nf3");
        assert_eq!(r.piece, Piece::Knight);
        assert_eq!(r.dest, Square::from_algebraic("f3").unwrap());
        assert_eq!(r.disambiguator, None);
    }

    #[test]
    fn parse_piece_with_file_disambiguator() {
        let r = request("rfh3");
        assert_eq!(r.piece, Piece::Rook);
        assert_eq!(r.dest, Square::from_algebraic("h3").unwrap());
        assert_eq!(r.disambiguator, Some(Disambiguator::File(File::F)));
    }

    #[test]
    fn parse_piece_with_rank_disambiguator() {
        let r = request("n1e2");
        assert_eq!(r.piece, Piece::Knight);
        assert_eq!(r.dest, Square::from_algebraic("e2").unwrap());
        assert_eq!(r.disambiguator, Some(Disambiguator::Rank(Rank::R1)));
    }

    #[test]
    fn lowercase_b_is_pawn_file_uppercase_is_bishop() {
        let r = request("bc4");
        assert_eq!(r.piece, Piece::Pawn);
        assert_eq!(r.disambiguator, Some(Disambiguator::File(File::B)));

        let r = request("Bc4");
        assert_eq!(r.piece, Piece::Bishop);
        assert_eq!(r.disambiguator, None);
    }

    #[test]
    fn parse_quit() {
        assert_eq!(Token::parse("quit", Color::White), Ok(Token::Quit));
        assert_eq!(Token::parse("QUIT", Color::Black), Ok(Token::Quit));
        assert_eq!(Token::parse("Quit", Color::White), Ok(Token::Quit));
    }

    #[test]
    fn parse_errors() {
        assert_eq!(Token::parse("", Color::White), Err(ParseError::Empty));
        assert_eq!(Token::parse("   ", Color::White), Err(ParseError::Empty));
        assert!(matches!(
            Token::parse("e9", Color::White),
            Err(ParseError::InvalidSquare(_))
        ));
        assert!(matches!(
            Token::parse("xf3", Color::White),
            Err(ParseError::InvalidPieceLetter('x'))
        ));
        assert!(matches!(
            Token::parse("nxf3q", Color::White),
            Err(ParseError::Syntax(_))
        ));
        assert!(matches!(
            Token::parse("nxe2", Color::White),
            Err(ParseError::InvalidDisambiguator('x'))
        ));
    }

    proptest::proptest! {
        /// The parser never panics, and every move it accepts names a
        /// real square.
        #[test]
        fn parse_is_total(input in ".{0,8}") {
            if let Ok(Token::Move(request)) = Token::parse(&input, Color::White) {
                proptest::prop_assert!(request.dest.index() < 64);
            }
        }
    }

    #[test]
    fn disambiguator_matches() {
        let e2 = Square::from_algebraic("e2").unwrap();
        assert!(Disambiguator::File(File::E).matches(e2));
        assert!(!Disambiguator::File(File::D).matches(e2));
        assert!(Disambiguator::Rank(Rank::R2).matches(e2));
        assert!(!Disambiguator::Rank(Rank::R3).matches(e2));
    }
}
