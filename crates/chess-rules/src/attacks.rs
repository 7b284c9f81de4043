//! Attack tables for every piece type.
//!
//! Leaper attacks are precomputed per square. Slider attacks are derived from
//! precomputed rays: the first blocker along a ray is found with a bit scan
//! and everything past it is masked off.

use crate::Bitboard;
use chess_core::{Color, Square};

const KNIGHT_ATTACKS: [Bitboard; 64] = leaper_table(&[
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
]);

const KING_ATTACKS: [Bitboard; 64] = leaper_table(&[
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
]);

const PAWN_ATTACKS: [[Bitboard; 64]; 2] = [
    leaper_table(&[(-1, 1), (1, 1)]),
    leaper_table(&[(-1, -1), (1, -1)]),
];

/// Ray directions as (file step, rank step). The first four increase the
/// square index, the last four decrease it.
const DIRECTIONS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (-1, 1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (1, -1),
];

const ORTHOGONAL: [usize; 4] = [0, 2, 4, 6];
const DIAGONAL: [usize; 4] = [1, 3, 5, 7];

const RAYS: [[Bitboard; 64]; 8] = ray_table();

const fn leaper_table(offsets: &[(i8, i8)]) -> [Bitboard; 64] {
    let mut table = [Bitboard::EMPTY; 64];
    let mut sq = 0u8;
    while sq < 64 {
        let mut bits = 0u64;
        let mut i = 0;
        while i < offsets.len() {
            let (df, dr) = offsets[i];
            if let Some(target) = Square::from_index_wrapping(sq).offset(df, dr) {
                bits |= 1u64 << target.index();
            }
            i += 1;
        }
        table[sq as usize] = Bitboard(bits);
        sq += 1;
    }
    table
}

const fn ray_table() -> [[Bitboard; 64]; 8] {
    let mut table = [[Bitboard::EMPTY; 64]; 8];
    let mut dir = 0;
    while dir < 8 {
        let (df, dr) = DIRECTIONS[dir];
        let mut sq = 0u8;
        while sq < 64 {
            let mut bits = 0u64;
            let mut current = Square::from_index_wrapping(sq).offset(df, dr);
            while let Some(next) = current {
                bits |= 1u64 << next.index();
                current = next.offset(df, dr);
            }
            table[dir][sq as usize] = Bitboard(bits);
            sq += 1;
        }
        dir += 1;
    }
    table
}

#[inline]
fn ray_attacks(sq: Square, occupied: Bitboard, dir: usize) -> Bitboard {
    let ray = RAYS[dir][sq.index() as usize];
    let blockers = ray & occupied;
    let first = if dir < 4 { blockers.lsb() } else { blockers.msb() };
    match first {
        Some(blocker) => ray ^ RAYS[dir][blocker.index() as usize],
        None => ray,
    }
}

#[inline]
pub fn knight_attacks(sq: Square) -> Bitboard {
    KNIGHT_ATTACKS[sq.index() as usize]
}

#[inline]
pub fn king_attacks(sq: Square) -> Bitboard {
    KING_ATTACKS[sq.index() as usize]
}

/// Returns the squares a pawn of `color` on `sq` attacks.
#[inline]
pub fn pawn_attacks(sq: Square, color: Color) -> Bitboard {
    PAWN_ATTACKS[color.index()][sq.index() as usize]
}

/// Returns rook attacks from `sq`, stopping at (and including) the first blocker.
pub fn rook_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    ORTHOGONAL
        .iter()
        .fold(Bitboard::EMPTY, |acc, &dir| acc | ray_attacks(sq, occupied, dir))
}

/// Returns bishop attacks from `sq`, stopping at (and including) the first blocker.
pub fn bishop_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    DIAGONAL
        .iter()
        .fold(Bitboard::EMPTY, |acc, &dir| acc | ray_attacks(sq, occupied, dir))
}

#[inline]
pub fn queen_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    rook_attacks(sq, occupied) | bishop_attacks(sq, occupied)
}
