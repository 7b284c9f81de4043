//! Move ordering.
//!
//! Good ordering is what makes alpha-beta prune: captures of valuable pieces
//! by cheap ones first (MVV-LVA), then checks and promotions, then the rest
//! in generation order.

use std::cmp::Reverse;

use chess_core::{Move, Piece};

use crate::tables::piece_value;

/// Added to every capture so even a losing capture sorts before quiet moves.
pub const CAPTURE_BASE: i32 = 1_000;
pub const CHECK_BONUS: i32 = 500;
pub const PROMOTION_BONUS: i32 = 800;

/// Heuristic priority of a move for its mover; higher is searched first.
///
/// Check detection relies on the move's gives-check annotation, which the
/// rules engine sets by trial application.
pub fn move_priority(m: Move) -> i32 {
    let mut priority = 0;
    if let Some(victim) = m.captured() {
        let attacker = match m.piece() {
            Some(Piece::King) | None => 0,
            Some(piece) => piece_value(piece),
        };
        priority += CAPTURE_BASE + piece_value(victim) - attacker;
    }
    if m.gives_check() {
        priority += CHECK_BONUS;
    }
    if m.promotion().is_some() {
        priority += PROMOTION_BONUS;
    }
    priority
}

/// Sorts by descending priority. Stable, so equal moves keep generation order.
pub fn order_moves(moves: &mut [Move]) {
    moves.sort_by_key(|&m| Reverse(move_priority(m)));
}

#[inline]
pub fn is_tactical(m: Move) -> bool {
    m.is_capture() || m.gives_check() || m.promotion().is_some()
}

/// Keeps captures, checks and promotions, most valuable victim first.
pub fn order_tactical(mut moves: Vec<Move>) -> Vec<Move> {
    moves.retain(|&m| is_tactical(m));
    moves.sort_by_key(|&m| {
        let victim = m.captured().map_or(0, piece_value);
        Reverse((victim, move_priority(m)))
    });
    moves
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::{MoveFlag, Square};

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn capture(from: &str, to: &str, attacker: Piece, victim: Piece) -> Move {
        Move::normal(sq(from), sq(to))
            .with_piece(attacker)
            .with_capture(victim)
    }

    fn quiet(from: &str, to: &str, piece: Piece) -> Move {
        Move::normal(sq(from), sq(to)).with_piece(piece)
    }

    #[test]
    fn mvv_lva_priorities() {
        assert_eq!(
            move_priority(capture("e4", "d5", Piece::Pawn, Piece::Queen)),
            1_000 + 900 - 100
        );
        assert_eq!(
            move_priority(capture("d1", "d5", Piece::Queen, Piece::Pawn)),
            1_000 + 100 - 900
        );
        assert_eq!(
            move_priority(capture("e1", "d2", Piece::King, Piece::Queen)),
            1_000 + 900
        );
        assert_eq!(move_priority(quiet("g1", "f3", Piece::Knight)), 0);
    }

    #[test]
    fn bonuses_stack() {
        let check = quiet("d1", "h5", Piece::Queen).with_check();
        assert_eq!(move_priority(check), CHECK_BONUS);

        let promo = Move::new(sq("b7"), sq("a8"), MoveFlag::PromoteQueen)
            .with_piece(Piece::Pawn)
            .with_capture(Piece::Rook)
            .with_check();
        assert_eq!(
            move_priority(promo),
            CAPTURE_BASE + 500 - 100 + CHECK_BONUS + PROMOTION_BONUS
        );
    }

    #[test]
    fn ordering_is_descending_and_stable() {
        let a = quiet("a2", "a3", Piece::Pawn);
        let b = quiet("b2", "b3", Piece::Pawn);
        let pxq = capture("e4", "d5", Piece::Pawn, Piece::Queen);
        let qxp = capture("d1", "d7", Piece::Queen, Piece::Pawn);
        let check = quiet("f1", "b5", Piece::Bishop).with_check();
        let mut moves = vec![a, qxp, b, check, pxq];
        order_moves(&mut moves);
        assert_eq!(moves, vec![pxq, check, qxp, a, b]);
    }

    #[test]
    fn tactical_keeps_only_forcing_moves() {
        let a = quiet("a2", "a3", Piece::Pawn);
        let nxr = capture("c3", "d5", Piece::Knight, Piece::Rook);
        let pxr = capture("e4", "d5", Piece::Pawn, Piece::Rook);
        let bxq = capture("c4", "f7", Piece::Bishop, Piece::Queen);
        let check = quiet("f1", "b5", Piece::Bishop).with_check();
        let ordered = order_tactical(vec![a, check, nxr, bxq, pxr]);
        assert_eq!(ordered, vec![bxq, pxr, nxr, check]);
        assert!(!ordered.iter().any(|&m| m == a));
    }
}
