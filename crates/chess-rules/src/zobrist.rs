//! Zobrist keys for position identification.
//!
//! The board's repetition history stores one hash per ply; see
//! [`crate::Position::zobrist_hash`].

use chess_core::{Color, Piece, Square};

/// Zobrist hash keys, generated at compile time from a fixed seed.
pub struct ZobristKeys {
    /// Keys for pieces: [piece][color][square]
    pieces: [[[u64; 64]; 2]; 6],
    /// XORed in when Black is to move.
    pub black_to_move: u64,
    castling: [u64; 4],
    en_passant: [u64; 8],
}

const fn xorshift(state: u64) -> u64 {
    let mut x = state;
    x ^= x << 13;
    x ^= x >> 7;
    x ^= x << 17;
    x
}

impl ZobristKeys {
    const fn new() -> Self {
        let mut state = 0x9E37_79B9_7F4A_7C15u64;
        let mut pieces = [[[0u64; 64]; 2]; 6];
        let mut castling = [0u64; 4];
        let mut en_passant = [0u64; 8];

        let mut piece = 0;
        while piece < 6 {
            let mut color = 0;
            while color < 2 {
                let mut square = 0;
                while square < 64 {
                    state = xorshift(state);
                    pieces[piece][color][square] = state;
                    square += 1;
                }
                color += 1;
            }
            piece += 1;
        }

        state = xorshift(state);
        let black_to_move = state;

        let mut i = 0;
        while i < 4 {
            state = xorshift(state);
            castling[i] = state;
            i += 1;
        }

        let mut i = 0;
        while i < 8 {
            state = xorshift(state);
            en_passant[i] = state;
            i += 1;
        }

        ZobristKeys {
            pieces,
            black_to_move,
            castling,
            en_passant,
        }
    }

    #[inline]
    pub const fn piece_key(&self, piece: Piece, color: Color, square: Square) -> u64 {
        self.pieces[piece.index()][color.index()][square.index() as usize]
    }

    /// Returns the key for castling-right bit `right` (0-3).
    #[inline]
    pub const fn castling_key(&self, right: usize) -> u64 {
        self.castling[right]
    }

    /// Returns the key for an en passant file (0-7).
    #[inline]
    pub const fn en_passant_key(&self, file: usize) -> u64 {
        self.en_passant[file]
    }
}

pub static ZOBRIST: ZobristKeys = ZobristKeys::new();
