//! Evaluation weights.
//!
//! Piece-square tables are written the way a board diagram reads: the first
//! row is the eighth rank, from White's point of view. Black looks them up
//! through its relative rank, so both colors share one set of tables.

use chess_core::{Color, Piece, Square};

/// Piece values in centipawns, indexed by [`Piece::index`].
///
/// The king's value only marks it as beyond any trade; it never enters the
/// material sum.
pub const PIECE_VALUES: [i32; 6] = [100, 320, 330, 500, 900, 20_000];

pub const DOUBLED_PAWN_PENALTY: i32 = 20;
pub const ISOLATED_PAWN_PENALTY: i32 = 15;

/// Passed pawn bonus by rank relative to the pawn's owner.
pub const PASSED_PAWN_BONUS: [i32; 8] = [0, 5, 10, 20, 35, 60, 100, 0];

/// Applied against the side to move when it is in check.
pub const CHECK_PENALTY: i32 = 30;

pub const MOBILITY_WEIGHT: i32 = 1;

/// Per friendly pawn on the rank directly in front of the king.
pub const KING_SHELTER_BONUS: i32 = 10;

/// Middlegame penalty for a king standing on d4, e4, d5 or e5.
pub const CENTRAL_KING_PENALTY: i32 = 20;

/// Middlegame bonus for a king still on its own back rank.
pub const BACK_RANK_KING_BONUS: i32 = 10;

/// Non-king material (both sides) at or below which the king switches to the
/// endgame table.
pub const ENDGAME_MATERIAL_THRESHOLD: i32 = 2_600;

#[inline]
pub const fn piece_value(piece: Piece) -> i32 {
    PIECE_VALUES[piece.index()]
}

#[rustfmt::skip]
pub const PAWN_PST: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
    50, 50, 50, 50, 50, 50, 50, 50,
    10, 10, 20, 30, 30, 20, 10, 10,
     5,  5, 10, 25, 25, 10,  5,  5,
     0,  0,  0, 20, 20,  0,  0,  0,
     5, -5,-10,  0,  0,-10, -5,  5,
     5, 10, 10,-20,-20, 10, 10,  5,
     0,  0,  0,  0,  0,  0,  0,  0,
];

#[rustfmt::skip]
pub const KNIGHT_PST: [i32; 64] = [
    -50,-40,-30,-30,-30,-30,-40,-50,
    -40,-20,  0,  0,  0,  0,-20,-40,
    -30,  0, 10, 15, 15, 10,  0,-30,
    -30,  5, 15, 20, 20, 15,  5,-30,
    -30,  0, 15, 20, 20, 15,  0,-30,
    -30,  5, 10, 15, 15, 10,  5,-30,
    -40,-20,  0,  5,  5,  0,-20,-40,
    -50,-40,-30,-30,-30,-30,-40,-50,
];

#[rustfmt::skip]
pub const BISHOP_PST: [i32; 64] = [
    -20,-10,-10,-10,-10,-10,-10,-20,
    -10,  0,  0,  0,  0,  0,  0,-10,
    -10,  0,  5, 10, 10,  5,  0,-10,
    -10,  5,  5, 10, 10,  5,  5,-10,
    -10,  0, 10, 10, 10, 10,  0,-10,
    -10, 10, 10, 10, 10, 10, 10,-10,
    -10,  5,  0,  0,  0,  0,  5,-10,
    -20,-10,-10,-10,-10,-10,-10,-20,
];

#[rustfmt::skip]
pub const ROOK_PST: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
     5, 10, 10, 10, 10, 10, 10,  5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
     0,  0,  0,  5,  5,  0,  0,  0,
];

#[rustfmt::skip]
pub const QUEEN_PST: [i32; 64] = [
    -20,-10,-10, -5, -5,-10,-10,-20,
    -10,  0,  0,  0,  0,  0,  0,-10,
    -10,  0,  5,  5,  5,  5,  0,-10,
     -5,  0,  5,  5,  5,  5,  0, -5,
      0,  0,  5,  5,  5,  5,  0,  0,
    -10,  5,  5,  5,  5,  5,  0,-10,
    -10,  0,  5,  0,  0,  0,  0,-10,
    -20,-10,-10, -5, -5,-10,-10,-20,
];

#[rustfmt::skip]
pub const KING_MIDDLEGAME_PST: [i32; 64] = [
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -20,-30,-30,-40,-40,-30,-30,-20,
    -10,-20,-20,-20,-20,-20,-20,-10,
     20, 20,  0,  0,  0,  0, 20, 20,
     20, 30, 10,  0,  0, 10, 30, 20,
];

#[rustfmt::skip]
pub const KING_ENDGAME_PST: [i32; 64] = [
    -50,-40,-30,-20,-20,-30,-40,-50,
    -30,-20,-10,  0,  0,-10,-20,-30,
    -30,-10, 20, 30, 30, 20,-10,-30,
    -30,-10, 30, 40, 40, 30,-10,-30,
    -30,-10, 30, 40, 40, 30,-10,-30,
    -30,-10, 20, 30, 30, 20,-10,-30,
    -30,-30,  0,  0,  0,  0,-30,-30,
    -50,-30,-30,-30,-30,-30,-30,-50,
];

/// Table index of `sq` for a piece owned by `color`.
#[inline]
pub const fn pst_index(sq: Square, color: Color) -> usize {
    let rank = sq.rank().relative_to(color).index() as usize;
    (7 - rank) * 8 + sq.file().index() as usize
}

/// Piece-square bonus for a non-king piece, or for the king in the
/// middlegame unless `endgame` is set.
pub fn pst_value(piece: Piece, sq: Square, color: Color, endgame: bool) -> i32 {
    let table = match piece {
        Piece::Pawn => &PAWN_PST,
        Piece::Knight => &KNIGHT_PST,
        Piece::Bishop => &BISHOP_PST,
        Piece::Rook => &ROOK_PST,
        Piece::Queen => &QUEEN_PST,
        Piece::King if endgame => &KING_ENDGAME_PST,
        Piece::King => &KING_MIDDLEGAME_PST,
    };
    table[pst_index(sq, color)]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn index_reads_like_a_diagram() {
        assert_eq!(pst_index(Square::A8, Color::White), 0);
        assert_eq!(pst_index(Square::H1, Color::White), 63);
        assert_eq!(pst_index(Square::A1, Color::Black), 0);
        assert_eq!(pst_index(Square::H8, Color::Black), 63);
    }

    #[test]
    fn colors_share_tables_through_the_mirror() {
        for square in Square::all() {
            for piece in Piece::ALL {
                for endgame in [false, true] {
                    assert_eq!(
                        pst_value(piece, square, Color::White, endgame),
                        pst_value(piece, square.flip_rank(), Color::Black, endgame),
                    );
                }
            }
        }
    }

    #[test]
    fn known_entries() {
        assert_eq!(pst_value(Piece::Pawn, sq("d2"), Color::White, false), -20);
        assert_eq!(pst_value(Piece::Pawn, sq("e7"), Color::Black, false), -20);
        assert_eq!(pst_value(Piece::Knight, sq("e4"), Color::White, false), 20);
        assert_eq!(pst_value(Piece::King, sq("g1"), Color::White, false), 30);
        assert_eq!(pst_value(Piece::King, sq("g8"), Color::Black, false), 30);
        assert_eq!(pst_value(Piece::King, sq("e4"), Color::White, true), 40);
        assert_eq!(pst_value(Piece::Rook, sq("a7"), Color::White, false), 5);
    }

    #[test]
    fn values_are_ordered() {
        assert!(PIECE_VALUES.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(piece_value(Piece::Queen), 900);
    }
}
