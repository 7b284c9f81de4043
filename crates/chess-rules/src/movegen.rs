//! Legal move generation.
//!
//! Moves are generated pseudo-legally per piece type, then filtered by
//! applying each one and testing whether the mover's king is attacked. The
//! same trial application tells whether the move checks the opponent, so
//! every returned move carries its moving piece, captured piece and
//! gives-check annotations.

use crate::attacks::{
    bishop_attacks, king_attacks, knight_attacks, pawn_attacks, queen_attacks, rook_attacks,
};
use crate::{Bitboard, Position, RulesError};
use chess_core::{Color, Move, MoveFlag, Piece, Rank, Square};

/// A list of moves with a fixed maximum capacity.
///
/// Chess positions have at most 218 legal moves, so a fixed-size array
/// avoids heap allocation during generation.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; Self::MAX_MOVES],
    len: usize,
}

impl MoveList {
    pub const MAX_MOVES: usize = 256;

    #[inline]
    pub const fn new() -> Self {
        MoveList {
            moves: [Move::NULL; Self::MAX_MOVES],
            len: 0,
        }
    }

    #[inline]
    pub fn push(&mut self, m: Move) {
        debug_assert!(self.len < Self::MAX_MOVES);
        self.moves[self.len] = m;
        self.len += 1;
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.as_slice().iter()
    }

    pub fn to_vec(&self) -> Vec<Move> {
        self.as_slice().to_vec()
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Index<usize> for MoveList {
    type Output = Move;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.as_slice()[index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// Generates all legal moves for the given position, fully annotated.
pub fn generate_moves(position: &Position) -> MoveList {
    let mut pseudo = MoveList::new();
    generate_pseudo_legal(position, &mut pseudo);

    let us = position.side_to_move;
    let mut legal = MoveList::new();
    for &m in &pseudo {
        let Ok(next) = make_move(position, m) else {
            continue;
        };
        if is_king_attacked(&next, us) {
            continue;
        }
        if is_king_attacked(&next, us.opposite()) {
            legal.push(m.with_check());
        } else {
            legal.push(m);
        }
    }
    legal
}

/// Returns true if the side to move has at least one legal move.
///
/// Stops at the first legal move found and skips check annotation, which
/// makes it cheaper than `!generate_moves(..).is_empty()`.
pub fn has_legal_move(position: &Position) -> bool {
    let mut pseudo = MoveList::new();
    generate_pseudo_legal(position, &mut pseudo);
    let us = position.side_to_move;
    pseudo.iter().any(|&m| match make_move(position, m) {
        Ok(next) => !is_king_attacked(&next, us),
        Err(_) => false,
    })
}

fn generate_pseudo_legal(position: &Position, moves: &mut MoveList) {
    generate_pawn_moves(position, moves);
    let occupied = position.occupied();
    for piece in [Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen, Piece::King] {
        generate_piece_moves(position, piece, moves, |from| match piece {
            Piece::Knight => knight_attacks(from),
            Piece::Bishop => bishop_attacks(from, occupied),
            Piece::Rook => rook_attacks(from, occupied),
            Piece::Queen => queen_attacks(from, occupied),
            _ => king_attacks(from),
        });
    }
    generate_castling_moves(position, moves);
}

/// Returns the kind of piece standing on `sq`, if any.
#[inline]
fn victim_on(position: &Position, sq: Square) -> Option<Piece> {
    position.piece_at(sq).map(|(piece, _)| piece)
}

fn push_annotated(moves: &mut MoveList, m: Move, victim: Option<Piece>) {
    match victim {
        Some(victim) => moves.push(m.with_capture(victim)),
        None => moves.push(m),
    }
}

fn push_pawn_move(moves: &mut MoveList, from: Square, to: Square, victim: Option<Piece>) {
    if matches!(to.rank(), Rank::R1 | Rank::R8) {
        for piece in Piece::PROMOTIONS {
            if let Some(flag) = MoveFlag::promotion(piece) {
                let m = Move::new(from, to, flag).with_piece(Piece::Pawn);
                push_annotated(moves, m, victim);
            }
        }
    } else {
        push_annotated(moves, Move::normal(from, to).with_piece(Piece::Pawn), victim);
    }
}

fn generate_pawn_moves(position: &Position, moves: &mut MoveList) {
    let us = position.side_to_move;
    let their_pieces = position.colors[us.opposite().index()];
    let empty = !position.occupied();
    let pawns = position.pieces_of(Piece::Pawn, us);
    let dir = us.pawn_direction();

    let (single_pushes, start_rank) = match us {
        Color::White => (pawns.north() & empty, Bitboard::RANK_2),
        Color::Black => (pawns.south() & empty, Bitboard::RANK_7),
    };

    for to in single_pushes {
        if let Some(from) = to.offset(0, -dir) {
            push_pawn_move(moves, from, to, None);
        }
    }

    for from in pawns & start_rank {
        let (Some(mid), Some(to)) = (from.offset(0, dir), from.offset(0, 2 * dir)) else {
            continue;
        };
        if empty.contains(mid) && empty.contains(to) {
            moves.push(Move::new(from, to, MoveFlag::DoublePush).with_piece(Piece::Pawn));
        }
    }

    for from in pawns {
        for to in pawn_attacks(from, us) & their_pieces {
            push_pawn_move(moves, from, to, victim_on(position, to));
        }
    }

    if let Some(ep_square) = position.en_passant {
        for from in pawns {
            if pawn_attacks(from, us).contains(ep_square) {
                let m = Move::new(from, ep_square, MoveFlag::EnPassant)
                    .with_piece(Piece::Pawn)
                    .with_capture(Piece::Pawn);
                moves.push(m);
            }
        }
    }
}

fn generate_piece_moves(
    position: &Position,
    piece: Piece,
    moves: &mut MoveList,
    attacks: impl Fn(Square) -> Bitboard,
) {
    let us = position.side_to_move;
    let our_pieces = position.colors[us.index()];
    for from in position.pieces_of(piece, us) {
        for to in attacks(from) & !our_pieces {
            let m = Move::normal(from, to).with_piece(piece);
            push_annotated(moves, m, victim_on(position, to));
        }
    }
}

/// Rook origin and destination for a castling move by `color`.
fn castle_rook_squares(flag: MoveFlag, color: Color) -> Option<(Square, Square)> {
    let (from, to) = match flag {
        MoveFlag::CastleKingside => (Square::H1, Square::F1),
        MoveFlag::CastleQueenside => (Square::A1, Square::D1),
        _ => return None,
    };
    match color {
        Color::White => Some((from, to)),
        Color::Black => Some((from.flip_rank(), to.flip_rank())),
    }
}

fn generate_castling_moves(position: &Position, moves: &mut MoveList) {
    let us = position.side_to_move;
    let them = us.opposite();
    let home = match us {
        Color::White => Square::E1,
        Color::Black => Square::E8,
    };
    if !position.pieces_of(Piece::King, us).contains(home) || is_king_attacked(position, us) {
        return;
    }

    let occupied = position.occupied();
    let rooks = position.pieces_of(Piece::Rook, us);
    // (flag, allowed, king destination, squares that must be empty, square the king crosses)
    let sides = [
        (
            MoveFlag::CastleKingside,
            position.castling.can_castle_kingside(us),
            [Square::G1, Square::F1, Square::F1],
            Square::F1,
        ),
        (
            MoveFlag::CastleQueenside,
            position.castling.can_castle_queenside(us),
            [Square::C1, Square::D1, Square::B1],
            Square::D1,
        ),
    ];

    for (flag, allowed, between, crossing) in sides {
        let Some((rook_from, _)) = castle_rook_squares(flag, us) else {
            continue;
        };
        if !allowed || !rooks.contains(rook_from) {
            continue;
        }
        let relative = |sq: Square| match us {
            Color::White => sq,
            Color::Black => sq.flip_rank(),
        };
        if between.iter().any(|&sq| occupied.contains(relative(sq))) {
            continue;
        }
        if is_square_attacked(position, relative(crossing), them) {
            continue;
        }
        moves.push(Move::new(home, relative(between[0]), flag).with_piece(Piece::King));
    }
}

/// Returns true if the given square is attacked by the given color.
pub fn is_square_attacked(position: &Position, sq: Square, by_color: Color) -> bool {
    let occupied = position.occupied();

    if (pawn_attacks(sq, by_color.opposite()) & position.pieces_of(Piece::Pawn, by_color))
        .is_not_empty()
    {
        return true;
    }
    if (knight_attacks(sq) & position.pieces_of(Piece::Knight, by_color)).is_not_empty() {
        return true;
    }
    if (king_attacks(sq) & position.pieces_of(Piece::King, by_color)).is_not_empty() {
        return true;
    }

    let queens = position.pieces_of(Piece::Queen, by_color);
    let diagonal = position.pieces_of(Piece::Bishop, by_color) | queens;
    if (bishop_attacks(sq, occupied) & diagonal).is_not_empty() {
        return true;
    }
    let orthogonal = position.pieces_of(Piece::Rook, by_color) | queens;
    (rook_attacks(sq, occupied) & orthogonal).is_not_empty()
}

/// Returns true if the king of the given color is in check.
///
/// A side without a king is never in check.
pub fn is_king_attacked(position: &Position, king_color: Color) -> bool {
    match position.king_square(king_color) {
        Some(king) => is_square_attacked(position, king, king_color.opposite()),
        None => false,
    }
}

/// Applies a move and returns the resulting position (copy-make).
///
/// Only the origin square is validated: it must hold a piece of the side to
/// move, and the destination must not hold one. Legality (king safety,
/// piece movement rules) is the caller's concern; moves taken from
/// [`generate_moves`] always satisfy it.
pub fn make_move(position: &Position, m: Move) -> Result<Position, RulesError> {
    let us = position.side_to_move;
    let them = us.opposite();
    let from = m.from();
    let to = m.to();

    let piece = match position.piece_at(from) {
        Some((piece, color)) if color == us => piece,
        _ => return Err(RulesError::NoPieceToMove(from)),
    };

    let mut next = position.clone();
    next.remove(from, piece, us);

    let mut is_capture = false;
    if let Some((captured, color)) = position.piece_at(to) {
        if color == us {
            return Err(RulesError::IllegalMove(format!(
                "{} lands on a friendly piece",
                m
            )));
        }
        next.remove(to, captured, them);
        is_capture = true;
    }

    if m.flag() == MoveFlag::EnPassant {
        if let Some(victim) = to.offset(0, -us.pawn_direction()) {
            next.remove(victim, Piece::Pawn, them);
        }
        is_capture = true;
    }

    next.put(to, m.promotion().unwrap_or(piece), us);

    if let Some((rook_from, rook_to)) = castle_rook_squares(m.flag(), us) {
        next.remove(rook_from, Piece::Rook, us);
        next.put(rook_to, Piece::Rook, us);
    }

    if piece == Piece::King {
        next.castling.remove_color(us);
    }
    // A rook leaving its corner, or anything landing on one, ends that right.
    for sq in [from, to] {
        match sq {
            s if s == Square::H1 => next.castling.remove_kingside(Color::White),
            s if s == Square::A1 => next.castling.remove_queenside(Color::White),
            s if s == Square::H8 => next.castling.remove_kingside(Color::Black),
            s if s == Square::A8 => next.castling.remove_queenside(Color::Black),
            _ => {}
        }
    }

    next.en_passant = if m.flag() == MoveFlag::DoublePush {
        to.offset(0, -us.pawn_direction())
    } else {
        None
    };

    if piece == Piece::Pawn || is_capture {
        next.halfmove_clock = 0;
    } else {
        next.halfmove_clock += 1;
    }
    if us == Color::Black {
        next.fullmove_number += 1;
    }
    next.side_to_move = them;

    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn find(moves: &MoveList, uci: &str) -> Option<Move> {
        moves.iter().copied().find(|m| m.to_uci() == uci)
    }

    #[test]
    fn movelist_push_and_index() {
        let mut list = MoveList::new();
        assert!(list.is_empty());
        let m1 = Move::normal(sq("e2"), sq("e4"));
        let m2 = Move::normal(sq("d2"), sq("d4"));
        list.push(m1);
        list.push(m2);
        assert_eq!(list.len(), 2);
        assert_eq!(list[0], m1);
        assert_eq!(list.to_vec(), vec![m1, m2]);
    }

    #[test]
    fn startpos_has_twenty_moves() {
        let moves = generate_moves(&Position::startpos());
        assert_eq!(moves.len(), 20);
        assert!(moves.iter().all(|m| m.piece().is_some()));
        assert!(moves.iter().all(|m| !m.is_capture() && !m.gives_check()));
    }

    #[test]
    fn captures_are_annotated_with_victim() {
        let pos =
            Position::from_fen("rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2")
                .unwrap();
        let moves = generate_moves(&pos);
        let exd5 = find(&moves, "e4d5").unwrap();
        assert_eq!(exd5.piece(), Some(Piece::Pawn));
        assert_eq!(exd5.captured(), Some(Piece::Pawn));
        assert_eq!(moves.iter().filter(|m| m.is_capture()).count(), 1);
    }

    #[test]
    fn checks_are_annotated() {
        let pos = Position::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
        let moves = generate_moves(&pos);
        assert!(find(&moves, "a1a8").unwrap().gives_check());
        assert!(!find(&moves, "a1a7").unwrap().gives_check());
        assert_eq!(moves.iter().filter(|m| m.gives_check()).count(), 1);
    }

    #[test]
    fn en_passant_is_a_pawn_capture() {
        let pos =
            Position::from_fen("rnbqkbnr/pppp1ppp/8/4pP2/8/8/PPPPP1PP/RNBQKBNR w KQkq e6 0 1")
                .unwrap();
        let moves = generate_moves(&pos);
        let ep = moves
            .iter()
            .copied()
            .find(|m| m.flag() == MoveFlag::EnPassant)
            .unwrap();
        assert_eq!(ep.captured(), Some(Piece::Pawn));

        let next = make_move(&pos, ep).unwrap();
        assert_eq!(next.piece_at(sq("e5")), None);
        assert_eq!(next.piece_at(sq("e6")), Some((Piece::Pawn, Color::White)));
    }

    #[test]
    fn promotions_generate_four_moves() {
        let pos = Position::from_fen("8/P7/8/8/8/8/8/4K2k w - - 0 1").unwrap();
        let moves = generate_moves(&pos);
        let promos: Vec<Move> = moves.iter().copied().filter(|m| m.promotion().is_some()).collect();
        assert_eq!(promos.len(), 4);
        assert!(promos.iter().all(|m| m.piece() == Some(Piece::Pawn)));
    }

    #[test]
    fn castling_both_sides() {
        let pos = Position::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1").unwrap();
        let moves = generate_moves(&pos);
        assert!(moves.iter().any(|m| m.flag() == MoveFlag::CastleKingside));
        assert!(moves.iter().any(|m| m.flag() == MoveFlag::CastleQueenside));

        let castled = make_move(&pos, find(&moves, "e1c1").unwrap()).unwrap();
        assert_eq!(castled.piece_at(Square::D1), Some((Piece::Rook, Color::White)));
        assert_eq!(castled.piece_at(Square::A1), None);
        assert!(!castled.castling.can_castle_kingside(Color::White));
        assert!(castled.castling.can_castle_kingside(Color::Black));
    }

    #[test]
    fn no_castling_through_attacked_square() {
        let pos = Position::from_fen("r3k2r/pppp1ppp/8/8/8/8/PPPP1P1P/R3K2R w KQkq - 0 1").unwrap();
        let attacked =
            Position::from_fen("r3k2r/pppp1ppp/8/6r1/8/8/PPPP1P1P/R3K2R w KQkq - 0 1").unwrap();
        assert!(generate_moves(&pos)
            .iter()
            .any(|m| m.flag() == MoveFlag::CastleKingside));
        assert!(!generate_moves(&attacked)
            .iter()
            .any(|m| m.flag() == MoveFlag::CastleKingside));
    }

    #[test]
    fn no_castling_without_rook() {
        let pos = Position::from_fen("4k3/8/8/8/8/8/8/4K3 w KQ - 0 1").unwrap();
        assert!(!generate_moves(&pos).iter().any(|m| m.flag().is_castling()));
    }

    #[test]
    fn pinned_piece_cannot_move() {
        let pos = Position::from_fen("4r1k1/8/8/8/8/8/4N3/4K3 w - - 0 1").unwrap();
        let moves = generate_moves(&pos);
        assert!(moves.iter().all(|m| m.from() != sq("e2")));
    }

    #[test]
    fn has_legal_move_agrees_with_generation() {
        let stalemate = Position::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert!(!has_legal_move(&stalemate));
        assert!(generate_moves(&stalemate).is_empty());
        assert!(has_legal_move(&Position::startpos()));
    }

    #[test]
    fn make_move_updates_state() {
        let pos = Position::startpos();
        let m = Move::new(sq("e2"), sq("e4"), MoveFlag::DoublePush);
        let next = make_move(&pos, m).unwrap();
        assert_eq!(next.side_to_move, Color::Black);
        assert_eq!(next.piece_at(sq("e4")), Some((Piece::Pawn, Color::White)));
        assert_eq!(next.piece_at(sq("e2")), None);
        assert_eq!(next.en_passant, Some(sq("e3")));
        assert_eq!(next.halfmove_clock, 0);
    }

    #[test]
    fn make_move_rejects_wrong_origin() {
        let pos = Position::startpos();
        assert_eq!(
            make_move(&pos, Move::normal(sq("e4"), sq("e5"))),
            Err(RulesError::NoPieceToMove(sq("e4")))
        );
        assert_eq!(
            make_move(&pos, Move::normal(sq("e7"), sq("e5"))),
            Err(RulesError::NoPieceToMove(sq("e7")))
        );
        assert!(matches!(
            make_move(&pos, Move::normal(Square::A1, Square::A1.offset(0, 1).unwrap())),
            Err(RulesError::IllegalMove(_))
        ));
    }

    #[test]
    fn square_attack_queries() {
        let pos = Position::startpos();
        assert!(is_square_attacked(&pos, sq("e3"), Color::White));
        assert!(!is_square_attacked(&pos, sq("e4"), Color::White));
        assert!(!is_king_attacked(&pos, Color::White));
        assert!(!is_king_attacked(&Position::empty(), Color::Black));
    }
}
