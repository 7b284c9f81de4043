//! Perft (performance test) for move generator validation.
//!
//! Counts leaf nodes at a given depth through the [`Board`] apply/undo
//! path, so it checks generation and the undo stack together.

use crate::{Board, RulesError};

/// Counts the leaf nodes at the given depth.
pub fn perft(board: &mut Board, depth: u32) -> Result<u64, RulesError> {
    if depth == 0 {
        return Ok(1);
    }

    let moves = board.legal_moves();
    if depth == 1 {
        return Ok(moves.len() as u64);
    }

    let mut nodes = 0u64;
    for &m in &moves {
        board.apply_move(m)?;
        let result = perft(board, depth - 1);
        board.undo_move()?;
        nodes += result?;
    }
    Ok(nodes)
}

/// Per-move node counts at `depth`, sorted by UCI string.
pub fn perft_divide(board: &mut Board, depth: u32) -> Result<Vec<(String, u64)>, RulesError> {
    let moves = board.legal_moves();
    let mut results = Vec::with_capacity(moves.len());
    for &m in &moves {
        board.apply_move(m)?;
        let nodes = perft(board, depth.saturating_sub(1));
        board.undo_move()?;
        results.push((m.to_uci(), nodes?));
    }
    results.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startpos_shallow() {
        let mut board = Board::startpos();
        assert_eq!(perft(&mut board, 0).unwrap(), 1);
        assert_eq!(perft(&mut board, 1).unwrap(), 20);
        assert_eq!(perft(&mut board, 2).unwrap(), 400);
        assert_eq!(board.ply(), 0);
    }

    #[test]
    fn divide_sums_to_perft() {
        let mut board = Board::startpos();
        let results = perft_divide(&mut board, 2).unwrap();
        assert_eq!(results.len(), 20);
        assert_eq!(results.iter().map(|(_, n)| n).sum::<u64>(), 400);
        assert_eq!(results[0].0, "a2a3");
    }
}
