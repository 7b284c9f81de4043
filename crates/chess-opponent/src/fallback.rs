//! Last-resort move choice for when the search fails.

use chess_core::Move;
use chess_rules::RulesError;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::position::GamePosition;
use crate::tables::piece_value;

/// Bonus for a checking move in the one-ply greedy choice.
pub const FALLBACK_CHECK_BONUS: i32 = 50;

/// Picks the move with the highest captured value plus check bonus, judged
/// one ply deep. Checks are found by playing the move, so this does not
/// depend on the rules engine's annotations. Ties keep the earliest move.
pub fn greedy_move<P: GamePosition + ?Sized>(
    pos: &mut P,
    moves: &[Move],
) -> Result<Option<Move>, RulesError> {
    let mut best: Option<(Move, i32)> = None;
    for &m in moves {
        pos.apply_move(m)?;
        let check = pos.is_check();
        pos.undo_move()?;

        let mut value = m.captured().map_or(0, piece_value);
        if check {
            value += FALLBACK_CHECK_BONUS;
        }
        if best.map_or(true, |(_, v)| value > v) {
            best = Some((m, value));
        }
    }
    Ok(best.map(|(m, _)| m))
}

/// Uniformly random choice.
pub fn random_move<R: Rng + ?Sized>(moves: &[Move], rng: &mut R) -> Option<Move> {
    moves.choose(rng).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_rules::Board;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn moves_of(board: &Board) -> Vec<Move> {
        GamePosition::legal_moves(board).unwrap()
    }

    #[test]
    fn greedy_prefers_the_biggest_capture() {
        let mut board = Board::from_fen("4k3/8/8/3q4/8/1n6/3R4/4K3 w - - 0 1").unwrap();
        let moves = moves_of(&board);
        let chosen = greedy_move(&mut board, &moves).unwrap().unwrap();
        assert_eq!(chosen.to_uci(), "d2d5");
        assert_eq!(board.ply(), 0);
    }

    #[test]
    fn greedy_counts_checks() {
        let mut board = Board::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
        let moves = moves_of(&board);
        let chosen = greedy_move(&mut board, &moves).unwrap().unwrap();
        let mut probe = board.clone();
        probe.apply_move(chosen).unwrap();
        assert!(probe.is_check());
    }

    #[test]
    fn greedy_on_no_moves_is_none() {
        let mut board = Board::startpos();
        assert_eq!(greedy_move(&mut board, &[]), Ok(None));
    }

    #[test]
    fn random_stays_within_the_list() {
        let board = Board::startpos();
        let moves = moves_of(&board);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let m = random_move(&moves, &mut rng).unwrap();
            assert!(moves.contains(&m));
        }
        assert_eq!(random_move(&[], &mut rng), None);
    }
}
