//! Chess piece representation.

/// The six kinds of chess pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Piece {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

impl Piece {
    /// All piece kinds in order.
    pub const ALL: [Piece; 6] = [
        Piece::Pawn,
        Piece::Knight,
        Piece::Bishop,
        Piece::Rook,
        Piece::Queen,
        Piece::King,
    ];

    /// The four kinds a pawn may promote to.
    pub const PROMOTIONS: [Piece; 4] = [Piece::Queen, Piece::Rook, Piece::Bishop, Piece::Knight];

    /// Returns the index of this piece kind (0-5).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Parses a move-token piece letter. Only the five non-pawn kinds
    /// have letters; a missing letter in a token means a pawn.
    pub const fn from_letter(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'n' => Some(Piece::Knight),
            'b' => Some(Piece::Bishop),
            'r' => Some(Piece::Rook),
            'q' => Some(Piece::Queen),
            'k' => Some(Piece::King),
            _ => None,
        }
    }

    /// Returns the letter used for this kind in move tokens, if any.
    pub const fn letter(self) -> Option<char> {
        match self {
            Piece::Pawn => None,
            Piece::Knight => Some('n'),
            Piece::Bishop => Some('b'),
            Piece::Rook => Some('r'),
            Piece::Queen => Some('q'),
            Piece::King => Some('k'),
        }
    }

    /// Returns true if this is a valid promotion choice.
    #[inline]
    pub const fn is_promotion_choice(self) -> bool {
        matches!(
            self,
            Piece::Queen | Piece::Rook | Piece::Bishop | Piece::Knight
        )
    }

    /// Returns true if this piece is a sliding piece (bishop, rook, or queen).
    #[inline]
    pub const fn is_slider(self) -> bool {
        matches!(self, Piece::Bishop | Piece::Rook | Piece::Queen)
    }
}

impl std::fmt::Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Piece::Pawn => "Pawn",
            Piece::Knight => "Knight",
            Piece::Bishop => "Bishop",
            Piece::Rook => "Rook",
            Piece::Queen => "Queen",
            Piece::King => "King",
        };
        write!(f, "{}", name)
    }
}
