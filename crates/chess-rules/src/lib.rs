//! Chess rules engine with bitboard representation.
//!
//! This crate provides:
//! - [`Bitboard`] - 64-bit square sets
//! - [`Position`] - immutable board state with FEN, mirroring and Zobrist hashing
//! - [`Board`] - mutable handle with apply/undo and checkmate/stalemate/draw queries
//! - Legal move generation with capture and check annotations
//! - [`perft`] for validating the generator
//!
//! # Example
//!
//! ```
//! use chess_rules::Board;
//!
//! let mut board = Board::startpos();
//! assert_eq!(board.legal_moves().len(), 20);
//! board.play_uci("e2e4").unwrap();
//! board.undo_move().unwrap();
//! assert_eq!(board.ply(), 0);
//! ```

mod attacks;
mod bitboard;
mod board;
mod error;
mod movegen;
mod perft;
mod position;
mod zobrist;

pub use attacks::{
    bishop_attacks, king_attacks, knight_attacks, pawn_attacks, queen_attacks, rook_attacks,
};
pub use bitboard::Bitboard;
pub use board::Board;
pub use error::RulesError;
pub use movegen::{
    generate_moves, has_legal_move, is_king_attacked, is_square_attacked, make_move, MoveList,
};
pub use perft::{perft, perft_divide};
pub use position::{CastlingRights, Position};
