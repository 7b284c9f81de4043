//! The capabilities the opponent needs from a rules engine.

use chess_core::{Color, Move, Piece, Square};
use chess_rules::{Board, RulesError};

/// A mutable, navigable chess position.
///
/// The search owns the position exclusively for the duration of a call and
/// relies on one guarantee: after any sequence of successful `apply_move`
/// calls followed by the same number of successful `undo_move` calls, the
/// observable state is unchanged.
///
/// Enumeration, apply and undo are fallible so that a misbehaving rules
/// engine surfaces as an error the opponent can recover from.
pub trait GamePosition {
    fn side_to_move(&self) -> Color;

    /// Legal moves in any order, annotated with the moving piece, the
    /// captured piece and whether they give check.
    fn legal_moves(&self) -> Result<Vec<Move>, RulesError>;

    fn apply_move(&mut self, m: Move) -> Result<(), RulesError>;

    fn undo_move(&mut self) -> Result<(), RulesError>;

    fn is_check(&self) -> bool;

    fn is_checkmate(&self) -> bool;

    fn is_stalemate(&self) -> bool;

    /// Any drawn state, stalemate included.
    fn is_draw(&self) -> bool;

    fn piece_at(&self, sq: Square) -> Option<(Piece, Color)>;
}

impl GamePosition for Board {
    #[inline]
    fn side_to_move(&self) -> Color {
        Board::side_to_move(self)
    }

    fn legal_moves(&self) -> Result<Vec<Move>, RulesError> {
        Ok(Board::legal_moves(self).to_vec())
    }

    fn apply_move(&mut self, m: Move) -> Result<(), RulesError> {
        Board::apply_move(self, m)
    }

    fn undo_move(&mut self) -> Result<(), RulesError> {
        Board::undo_move(self)
    }

    fn is_check(&self) -> bool {
        Board::is_check(self)
    }

    fn is_checkmate(&self) -> bool {
        Board::is_checkmate(self)
    }

    fn is_stalemate(&self) -> bool {
        Board::is_stalemate(self)
    }

    fn is_draw(&self) -> bool {
        Board::is_draw(self)
    }

    #[inline]
    fn piece_at(&self, sq: Square) -> Option<(Piece, Color)> {
        Board::piece_at(self, sq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn through_trait<P: GamePosition>(pos: &mut P) -> usize {
        let moves = pos.legal_moves().unwrap();
        pos.apply_move(moves[0]).unwrap();
        pos.undo_move().unwrap();
        moves.len()
    }

    #[test]
    fn board_implements_the_capabilities() {
        let mut board = Board::startpos();
        assert_eq!(through_trait(&mut board), 20);
        assert_eq!(GamePosition::side_to_move(&board), Color::White);
        assert_eq!(
            GamePosition::piece_at(&board, Square::E1),
            Some((Piece::King, Color::White))
        );
        assert!(GamePosition::undo_move(&mut board).is_err());
    }
}
