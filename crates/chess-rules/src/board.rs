//! Board state and per-session rule flags.

use chess_core::{Color, File, Piece, Rank, Square};

/// The contents of one board square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Occupant {
    #[default]
    Empty,
    Piece(Color, Piece),
}

impl Occupant {
    /// Returns true if the square is empty.
    #[inline]
    pub const fn is_empty(self) -> bool {
        matches!(self, Occupant::Empty)
    }

    /// Returns the color of the occupying piece, if any.
    #[inline]
    pub const fn color(self) -> Option<Color> {
        match self {
            Occupant::Empty => None,
            Occupant::Piece(color, _) => Some(color),
        }
    }

    /// Returns the kind of the occupying piece, if any.
    #[inline]
    pub const fn piece(self) -> Option<Piece> {
        match self {
            Occupant::Empty => None,
            Occupant::Piece(_, piece) => Some(piece),
        }
    }

    /// Returns true if the square holds a piece of the given color.
    #[inline]
    pub fn is_color(self, color: Color) -> bool {
        self.color() == Some(color)
    }
}

/// A piece-placement snapshot: the 64 occupants with no side-to-move,
/// castling, or en-passant metadata. Used for repetition comparison.
pub type Placement = [Occupant; 64];

/// The 64-square placement plus side to move.
///
/// The board is owned exclusively by the engine and cloned wholesale
/// whenever a trial move must be evaluated without risk to the
/// authoritative state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    squares: Placement,
    side_to_move: Color,
}

/// Piece order of the back rank in the standard opening placement.
const BACK_RANK: [Piece; 8] = [
    Piece::Rook,
    Piece::Knight,
    Piece::Bishop,
    Piece::Queen,
    Piece::King,
    Piece::Bishop,
    Piece::Knight,
    Piece::Rook,
];

impl Board {
    /// Creates an empty board with White to move.
    pub fn empty() -> Self {
        Board {
            squares: [Occupant::Empty; 64],
            side_to_move: Color::White,
        }
    }

    /// Creates the standard opening placement with White to move.
    pub fn startpos() -> Self {
        let mut board = Board::empty();
        for (color, back, home) in [
            (Color::White, Rank::R1, Rank::R2),
            (Color::Black, Rank::R8, Rank::R7),
        ] {
            for (file, &piece) in File::ALL.iter().zip(BACK_RANK.iter()) {
                board.set(Square::new(*file, back), Occupant::Piece(color, piece));
                board.set(Square::new(*file, home), Occupant::Piece(color, Piece::Pawn));
            }
        }
        board
    }

    /// Returns the occupant of the given square.
    #[inline]
    pub fn occupant(&self, sq: Square) -> Occupant {
        self.squares[sq.index() as usize]
    }

    /// Places or clears a square. Exposed so tests and setup code can
    /// build custom positions; during play only the engine mutates the
    /// board.
    #[inline]
    pub fn set(&mut self, sq: Square, occupant: Occupant) {
        self.squares[sq.index() as usize] = occupant;
    }

    /// Clears a square.
    #[inline]
    pub fn clear(&mut self, sq: Square) {
        self.set(sq, Occupant::Empty);
    }

    /// Returns the side to move.
    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// Sets the side to move.
    #[inline]
    pub fn set_side_to_move(&mut self, color: Color) {
        self.side_to_move = color;
    }

    /// Returns the square of the given color's king, if it is on the board.
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.squares()
            .find(|&(_, occ)| occ == Occupant::Piece(color, Piece::King))
            .map(|(sq, _)| sq)
    }

    /// Returns the piece-placement snapshot for repetition comparison.
    #[inline]
    pub fn placement(&self) -> Placement {
        self.squares
    }

    /// Iterates over all squares and their occupants, a1 through h8.
    pub fn squares(&self) -> impl Iterator<Item = (Square, Occupant)> + '_ {
        Square::all().map(move |sq| (sq, self.occupant(sq)))
    }

    /// Iterates over the squares holding pieces of the given color.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.squares().filter_map(move |(sq, occ)| match occ {
            Occupant::Piece(c, piece) if c == color => Some((sq, piece)),
            _ => None,
        })
    }
}

/// Per-color castling permissions.
///
/// Flags start true and transition to false the first time the king or
/// the corresponding rook leaves its home square; they never return to
/// true. Session state rather than board state: it survives across the
/// board snapshots used for repetition comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastlingRights(u8);

impl CastlingRights {
    const WHITE_KINGSIDE: u8 = 0b0001;
    const WHITE_QUEENSIDE: u8 = 0b0010;
    const BLACK_KINGSIDE: u8 = 0b0100;
    const BLACK_QUEENSIDE: u8 = 0b1000;

    /// All four permissions, the state at game start.
    pub const fn all() -> Self {
        CastlingRights(0b1111)
    }

    const fn kingside_flag(color: Color) -> u8 {
        match color {
            Color::White => Self::WHITE_KINGSIDE,
            Color::Black => Self::BLACK_KINGSIDE,
        }
    }

    const fn queenside_flag(color: Color) -> u8 {
        match color {
            Color::White => Self::WHITE_QUEENSIDE,
            Color::Black => Self::BLACK_QUEENSIDE,
        }
    }

    /// Returns true if the given side may still castle kingside.
    #[inline]
    pub const fn can_kingside(self, color: Color) -> bool {
        self.0 & Self::kingside_flag(color) != 0
    }

    /// Returns true if the given side may still castle queenside.
    #[inline]
    pub const fn can_queenside(self, color: Color) -> bool {
        self.0 & Self::queenside_flag(color) != 0
    }

    /// Permanently forfeits both of a color's castling options.
    #[inline]
    pub fn forfeit_all(&mut self, color: Color) {
        self.0 &= !(Self::kingside_flag(color) | Self::queenside_flag(color));
    }

    /// Permanently forfeits a color's kingside castling.
    #[inline]
    pub fn forfeit_kingside(&mut self, color: Color) {
        self.0 &= !Self::kingside_flag(color);
    }

    /// Permanently forfeits a color's queenside castling.
    #[inline]
    pub fn forfeit_queenside(&mut self, color: Color) {
        self.0 &= !Self::queenside_flag(color);
    }
}

impl Default for CastlingRights {
    fn default() -> Self {
        Self::all()
    }
}

/// Per-color record of the files on which a pawn advanced two squares
/// on the immediately preceding ply.
///
/// Set only by a qualifying double push and cleared in full at the end
/// of the opponent's very next ply, used or not: its lifetime is
/// exactly one opponent turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EnPassantFiles {
    files: [[bool; 8]; 2],
}

impl EnPassantFiles {
    /// Creates the empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the given color's pawn double-pushed on this
    /// file last ply.
    #[inline]
    pub fn flagged(&self, color: Color, file: File) -> bool {
        self.files[color.index()][file.index() as usize]
    }

    /// Records a double push by the given color on the given file.
    #[inline]
    pub fn set(&mut self, color: Color, file: File) {
        self.files[color.index()][file.index() as usize] = true;
    }

    /// Clears every flag for the given color.
    #[inline]
    pub fn clear(&mut self, color: Color) {
        self.files[color.index()] = [false; 8];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startpos_layout() {
        let board = Board::startpos();
        assert_eq!(board.side_to_move(), Color::White);
        assert_eq!(
            board.occupant(Square::from_algebraic("e1").unwrap()),
            Occupant::Piece(Color::White, Piece::King)
        );
        assert_eq!(
            board.occupant(Square::from_algebraic("d8").unwrap()),
            Occupant::Piece(Color::Black, Piece::Queen)
        );
        assert_eq!(
            board.occupant(Square::from_algebraic("a2").unwrap()),
            Occupant::Piece(Color::White, Piece::Pawn)
        );
        assert_eq!(
            board.occupant(Square::from_algebraic("e4").unwrap()),
            Occupant::Empty
        );
        assert_eq!(board.squares().filter(|(_, o)| !o.is_empty()).count(), 32);
    }

    #[test]
    fn king_square() {
        let board = Board::startpos();
        assert_eq!(
            board.king_square(Color::White),
            Square::from_algebraic("e1")
        );
        assert_eq!(
            board.king_square(Color::Black),
            Square::from_algebraic("e8")
        );
        assert_eq!(Board::empty().king_square(Color::White), None);
    }

    #[test]
    fn placement_ignores_side_to_move() {
        let mut a = Board::startpos();
        let b = Board::startpos();
        a.set_side_to_move(Color::Black);
        assert_eq!(a.placement(), b.placement());
        assert_ne!(a, b);
    }

    #[test]
    fn castling_rights_monotonic() {
        let mut rights = CastlingRights::all();
        assert!(rights.can_kingside(Color::White));
        assert!(rights.can_queenside(Color::Black));

        rights.forfeit_kingside(Color::White);
        assert!(!rights.can_kingside(Color::White));
        assert!(rights.can_queenside(Color::White));

        rights.forfeit_all(Color::Black);
        assert!(!rights.can_kingside(Color::Black));
        assert!(!rights.can_queenside(Color::Black));
        assert!(rights.can_queenside(Color::White));
    }

    #[test]
    fn en_passant_files() {
        let mut ep = EnPassantFiles::new();
        assert!(!ep.flagged(Color::White, File::E));

        ep.set(Color::White, File::E);
        ep.set(Color::Black, File::D);
        assert!(ep.flagged(Color::White, File::E));
        assert!(ep.flagged(Color::Black, File::D));

        ep.clear(Color::White);
        assert!(!ep.flagged(Color::White, File::E));
        assert!(ep.flagged(Color::Black, File::D));
    }
}
