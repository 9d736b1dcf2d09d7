//! Two-player terminal chess.
//!
//! Both players share one keyboard and enter moves as compact tokens
//! (`e4`, `nf3`, `rfh3`, `de5`). The rules engine arbitrates; this
//! binary only renders the board, prompts, and relays messages.

use std::io::{self, BufRead, Write};

use chess_core::{Color, File, Piece, Rank, Square, Token};
use chess_rules::{Board, Game, Occupant, Status};

fn main() -> io::Result<()> {
    let stdin = io::stdin();
    let mut words = Words::new(stdin.lock());
    let mut game = Game::new();

    println!("Two-player chess. Enter moves like e4, nf3, rfh3, or de5; quit ends the game.");
    render(game.board());

    loop {
        if game.is_over() {
            announce(game.status());
            break;
        }

        let side = game.side_to_move();
        print!("{side}, enter your move: ");
        io::stdout().flush()?;

        let Some(word) = words.next_word()? else {
            // Input closed; treat it like a quit.
            break;
        };
        let request = match Token::parse(&word, side) {
            Ok(Token::Quit) => {
                println!("{side} quits.");
                break;
            }
            Ok(Token::Move(request)) => request,
            Err(e) => {
                println!("{e}. Try again.");
                continue;
            }
        };

        let outcome = game.submit(&request, || prompt_promotion(&mut words));
        match outcome {
            Ok(status) => {
                render(game.board());
                if matches!(status, Status::Ongoing { check: true }) {
                    println!("Check!");
                }
            }
            Err(e) => println!("{e}. Try again."),
        }
    }

    Ok(())
}

/// Asks for a promotion piece by name until a valid one is entered.
/// Falls back to a queen if input closes mid-prompt.
fn prompt_promotion<R: BufRead>(words: &mut Words<R>) -> Piece {
    loop {
        print!("Promote the pawn to (queen, rook, bishop, knight): ");
        let _ = io::stdout().flush();
        let word = match words.next_word() {
            Ok(Some(word)) => word,
            _ => return Piece::Queen,
        };
        match word.to_ascii_lowercase().as_str() {
            "queen" => return Piece::Queen,
            "rook" => return Piece::Rook,
            "bishop" => return Piece::Bishop,
            "knight" => return Piece::Knight,
            other => println!("\"{other}\" is not a promotion piece."),
        }
    }
}

fn announce(status: Status) {
    match status {
        Status::Checkmate { winner } => println!("Checkmate. {winner} wins!"),
        Status::Stalemate => println!("Stalemate. The game is a draw."),
        Status::DrawByRepetition => {
            println!("The same position occurred three times. The game is a draw.")
        }
        Status::Ongoing { .. } => {}
    }
}

/// Prints the board from White's point of view: rank 8 on top, file
/// letters along the top edge, dark empty squares marked with a dash.
fn render(board: &Board) {
    println!();
    println!("    a b c d e f g h");
    println!("    ---------------");
    for rank in Rank::ALL.iter().rev() {
        print!("{} | ", rank.to_char());
        for file in File::ALL {
            print!("{} ", square_char(board, Square::new(file, *rank)));
        }
        println!("| {}", rank.to_char());
    }
    println!("    ---------------");
    println!("    a b c d e f g h");
    println!();
}

fn square_char(board: &Board, sq: Square) -> char {
    match board.occupant(sq) {
        Occupant::Piece(color, piece) => {
            let c = match piece {
                Piece::Pawn => 'p',
                Piece::Knight => 'n',
                Piece::Bishop => 'b',
                Piece::Rook => 'r',
                Piece::Queen => 'q',
                Piece::King => 'k',
            };
            match color {
                Color::White => c.to_ascii_uppercase(),
                Color::Black => c,
            }
        }
        Occupant::Empty => {
            if (sq.file().index() + sq.rank().index()) % 2 == 0 {
                '-'
            } else {
                ' '
            }
        }
    }
}

/// Whitespace-separated words pulled lazily from a reader.
struct Words<R> {
    reader: R,
    pending: Vec<String>,
}

impl<R: BufRead> Words<R> {
    fn new(reader: R) -> Self {
        Words {
            reader,
            pending: Vec::new(),
        }
    }

    /// Returns the next word, or `None` once the reader is exhausted.
    fn next_word(&mut self) -> io::Result<Option<String>> {
        loop {
            if let Some(word) = self.pending.pop() {
                return Ok(Some(word));
            }
            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            self.pending
                .extend(line.split_whitespace().rev().map(str::to_owned));
        }
    }
}
