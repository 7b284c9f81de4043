//! Chess position representation.

use chess_core::{Color, FenError, FenParser, Piece, Square};

use crate::attacks::pawn_attacks;
use crate::zobrist::ZOBRIST;
use crate::Bitboard;

/// Castling rights flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const WHITE_KINGSIDE: u8 = 0b0001;
    pub const WHITE_QUEENSIDE: u8 = 0b0010;
    pub const BLACK_KINGSIDE: u8 = 0b0100;
    pub const BLACK_QUEENSIDE: u8 = 0b1000;
    pub const ALL: CastlingRights = CastlingRights(0b1111);

    #[inline]
    pub const fn new(flags: u8) -> Self {
        CastlingRights(flags & 0b1111)
    }

    /// Parses a FEN castling field such as `"KQkq"` or `"-"`.
    pub fn from_fen_field(field: &str) -> Self {
        let flags = field.chars().fold(0u8, |acc, c| {
            acc | match c {
                'K' => Self::WHITE_KINGSIDE,
                'Q' => Self::WHITE_QUEENSIDE,
                'k' => Self::BLACK_KINGSIDE,
                'q' => Self::BLACK_QUEENSIDE,
                _ => 0,
            }
        });
        CastlingRights::new(flags)
    }

    #[inline]
    pub const fn can_castle_kingside(self, color: Color) -> bool {
        let flag = match color {
            Color::White => Self::WHITE_KINGSIDE,
            Color::Black => Self::BLACK_KINGSIDE,
        };
        (self.0 & flag) != 0
    }

    #[inline]
    pub const fn can_castle_queenside(self, color: Color) -> bool {
        let flag = match color {
            Color::White => Self::WHITE_QUEENSIDE,
            Color::Black => Self::BLACK_QUEENSIDE,
        };
        (self.0 & flag) != 0
    }

    #[inline]
    pub fn remove_color(&mut self, color: Color) {
        self.remove_kingside(color);
        self.remove_queenside(color);
    }

    #[inline]
    pub fn remove_kingside(&mut self, color: Color) {
        self.0 &= !match color {
            Color::White => Self::WHITE_KINGSIDE,
            Color::Black => Self::BLACK_KINGSIDE,
        };
    }

    #[inline]
    pub fn remove_queenside(&mut self, color: Color) {
        self.0 &= !match color {
            Color::White => Self::WHITE_QUEENSIDE,
            Color::Black => Self::BLACK_QUEENSIDE,
        };
    }

    /// Swaps White's rights with Black's.
    #[inline]
    pub const fn swapped(self) -> Self {
        CastlingRights(((self.0 & 0b0011) << 2) | ((self.0 & 0b1100) >> 2))
    }

    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Renders the FEN castling field.
    pub fn to_fen_field(self) -> String {
        if self.0 == 0 {
            return "-".to_string();
        }
        let mut out = String::with_capacity(4);
        for (flag, c) in [
            (Self::WHITE_KINGSIDE, 'K'),
            (Self::WHITE_QUEENSIDE, 'Q'),
            (Self::BLACK_KINGSIDE, 'k'),
            (Self::BLACK_QUEENSIDE, 'q'),
        ] {
            if self.0 & flag != 0 {
                out.push(c);
            }
        }
        out
    }
}

/// Complete chess position state.
///
/// Positions are values: move application copies and returns a new one
/// (see [`crate::make_move`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Position {
    /// Bitboards for each piece type, indexed by [`Piece::index`].
    pub pieces: [Bitboard; 6],
    /// Bitboards for each color's pieces.
    pub colors: [Bitboard; 2],
    pub side_to_move: Color,
    pub castling: CastlingRights,
    /// En passant target square (if any).
    pub en_passant: Option<Square>,
    /// Halfmoves since the last capture or pawn move.
    pub halfmove_clock: u32,
    /// Starts at 1, increments after Black's move.
    pub fullmove_number: u32,
}

impl Position {
    /// Creates an empty board with White to move.
    pub fn empty() -> Self {
        Position {
            pieces: [Bitboard::EMPTY; 6],
            colors: [Bitboard::EMPTY; 2],
            side_to_move: Color::White,
            castling: CastlingRights::NONE,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// Creates the standard starting position.
    pub fn startpos() -> Self {
        let mut position = Position::empty();
        let back_rank = [
            Piece::Rook,
            Piece::Knight,
            Piece::Bishop,
            Piece::Queen,
            Piece::King,
            Piece::Bishop,
            Piece::Knight,
            Piece::Rook,
        ];
        for (file, piece) in back_rank.into_iter().enumerate() {
            let white = Square::from_index_wrapping(file as u8);
            position.put(white, piece, Color::White);
            position.put(white.flip_rank(), piece, Color::Black);
            let pawn = Square::from_index_wrapping(8 + file as u8);
            position.put(pawn, Piece::Pawn, Color::White);
            position.put(pawn.flip_rank(), Piece::Pawn, Color::Black);
        }
        position.castling = CastlingRights::ALL;
        position
    }

    /// Creates a position from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let parsed = FenParser::parse(fen)?;
        let mut position = Position::empty();
        for &(square, piece, color) in &parsed.pieces {
            position.put(square, piece, color);
        }
        position.side_to_move = parsed.side_to_move;
        position.castling = CastlingRights::from_fen_field(&parsed.castling);
        position.en_passant = parsed.en_passant;
        position.halfmove_clock = parsed.halfmove_clock;
        position.fullmove_number = parsed.fullmove_number;
        Ok(position)
    }

    /// Converts the position to a FEN string.
    pub fn to_fen(&self) -> String {
        let pieces = Square::all()
            .filter_map(|sq| self.piece_at(sq).map(|(piece, color)| (sq, piece, color)))
            .collect();
        FenParser {
            pieces,
            side_to_move: self.side_to_move,
            castling: self.castling.to_fen_field(),
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
        }
        .to_fen()
    }

    /// Places a piece, replacing nothing. The square must be empty.
    #[inline]
    pub(crate) fn put(&mut self, sq: Square, piece: Piece, color: Color) {
        self.pieces[piece.index()].set(sq);
        self.colors[color.index()].set(sq);
    }

    #[inline]
    pub(crate) fn remove(&mut self, sq: Square, piece: Piece, color: Color) {
        self.pieces[piece.index()].clear(sq);
        self.colors[color.index()].clear(sq);
    }

    /// Returns the piece and color at the given square, if any.
    pub fn piece_at(&self, sq: Square) -> Option<(Piece, Color)> {
        let color = if self.colors[Color::White.index()].contains(sq) {
            Color::White
        } else if self.colors[Color::Black.index()].contains(sq) {
            Color::Black
        } else {
            return None;
        };
        Piece::ALL
            .into_iter()
            .find(|piece| self.pieces[piece.index()].contains(sq))
            .map(|piece| (piece, color))
    }

    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.colors[0] | self.colors[1]
    }

    /// Returns a bitboard of pieces of the given type and color.
    #[inline]
    pub fn pieces_of(&self, piece: Piece, color: Color) -> Bitboard {
        self.pieces[piece.index()] & self.colors[color.index()]
    }

    /// Returns the square of `color`'s king, or `None` if it has none.
    #[inline]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces_of(Piece::King, color).lsb()
    }

    /// Returns the color-reflected position.
    ///
    /// Ranks are flipped and colors swapped, so White's pieces become Black's
    /// pieces on the mirrored squares. The side to move, castling rights and
    /// en passant square follow. Evaluations of a position and its mirror
    /// are exact negations of each other.
    pub fn mirror(&self) -> Position {
        let mut mirrored = Position::empty();
        for sq in self.occupied() {
            if let Some((piece, color)) = self.piece_at(sq) {
                mirrored.put(sq.flip_rank(), piece, color.opposite());
            }
        }
        mirrored.side_to_move = self.side_to_move.opposite();
        mirrored.castling = self.castling.swapped();
        mirrored.en_passant = self.en_passant.map(Square::flip_rank);
        mirrored.halfmove_clock = self.halfmove_clock;
        mirrored.fullmove_number = self.fullmove_number;
        mirrored
    }

    /// Computes the Zobrist hash from scratch.
    ///
    /// The en passant file only contributes when a pawn of the side to move
    /// could actually capture there, so transpositions that differ only in a
    /// dead en passant square hash identically.
    pub fn zobrist_hash(&self) -> u64 {
        let mut hash = 0u64;
        for color in Color::BOTH {
            for piece in Piece::ALL {
                for sq in self.pieces_of(piece, color) {
                    hash ^= ZOBRIST.piece_key(piece, color, sq);
                }
            }
        }
        if self.side_to_move == Color::Black {
            hash ^= ZOBRIST.black_to_move;
        }
        for right in 0..4 {
            if self.castling.raw() & (1 << right) != 0 {
                hash ^= ZOBRIST.castling_key(right);
            }
        }
        if let Some(ep) = self.en_passant {
            let us = self.side_to_move;
            let capturers = pawn_attacks(ep, us.opposite()) & self.pieces_of(Piece::Pawn, us);
            if capturers.is_not_empty() {
                hash ^= ZOBRIST.en_passant_key(ep.file().index() as usize);
            }
        }
        hash
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}
