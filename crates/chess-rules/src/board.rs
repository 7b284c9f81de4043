//! Mutable position handle with apply/undo and terminal-state queries.

use chess_core::{Color, Move, Piece, Square};

use crate::movegen::{generate_moves, has_legal_move, is_king_attacked, make_move, MoveList};
use crate::{Bitboard, Position, RulesError};

/// A position plus the history needed to undo moves and detect repetition.
///
/// Every successful [`Board::apply_move`] pushes one snapshot, and every
/// successful [`Board::undo_move`] pops one, so N applies followed by N
/// undos leave the board exactly as it was.
#[derive(Debug, Clone)]
pub struct Board {
    position: Position,
    undo_stack: Vec<Position>,
    /// Zobrist hash of every position reached, current one last.
    hashes: Vec<u64>,
}

impl Board {
    pub fn new(position: Position) -> Self {
        let hash = position.zobrist_hash();
        Board {
            position,
            undo_stack: Vec::new(),
            hashes: vec![hash],
        }
    }

    pub fn startpos() -> Self {
        Self::new(Position::startpos())
    }

    pub fn from_fen(fen: &str) -> Result<Self, RulesError> {
        Ok(Self::new(Position::from_fen(fen)?))
    }

    #[inline]
    pub fn position(&self) -> &Position {
        &self.position
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.position.side_to_move
    }

    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<(Piece, Color)> {
        self.position.piece_at(sq)
    }

    /// Number of moves applied since construction and not yet undone.
    #[inline]
    pub fn ply(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn to_fen(&self) -> String {
        self.position.to_fen()
    }

    pub fn legal_moves(&self) -> MoveList {
        generate_moves(&self.position)
    }

    /// Applies a move, recording an undo snapshot.
    ///
    /// The move is trusted to be legal; only its origin square is checked.
    pub fn apply_move(&mut self, m: Move) -> Result<(), RulesError> {
        let next = make_move(&self.position, m)?;
        let previous = std::mem::replace(&mut self.position, next);
        self.undo_stack.push(previous);
        self.hashes.push(self.position.zobrist_hash());
        Ok(())
    }

    /// Restores the position before the last applied move.
    pub fn undo_move(&mut self) -> Result<(), RulesError> {
        let previous = self.undo_stack.pop().ok_or(RulesError::NothingToUndo)?;
        self.position = previous;
        self.hashes.pop();
        Ok(())
    }

    /// Resolves a UCI string against the legal moves and plays it.
    pub fn play_uci(&mut self, uci: &str) -> Result<Move, RulesError> {
        let typed = Move::from_uci(uci).ok_or_else(|| RulesError::InvalidUci(uci.to_string()))?;
        let m = self
            .legal_moves()
            .iter()
            .copied()
            .find(|m| m.matches_uci(typed))
            .ok_or_else(|| RulesError::IllegalMove(uci.to_string()))?;
        self.apply_move(m)?;
        Ok(m)
    }

    #[inline]
    pub fn is_check(&self) -> bool {
        is_king_attacked(&self.position, self.position.side_to_move)
    }

    pub fn is_checkmate(&self) -> bool {
        self.is_check() && !has_legal_move(&self.position)
    }

    pub fn is_stalemate(&self) -> bool {
        !self.is_check() && !has_legal_move(&self.position)
    }

    /// Returns true for any drawn position: stalemate, insufficient material,
    /// the fifty-move rule or threefold repetition.
    pub fn is_draw(&self) -> bool {
        self.is_insufficient_material()
            || self.is_fifty_move_draw()
            || self.is_threefold_repetition()
            || self.is_stalemate()
    }

    pub fn is_fifty_move_draw(&self) -> bool {
        self.position.halfmove_clock >= 100
    }

    /// Number of times the current position occurred since the last
    /// irreversible move, counting the current occurrence.
    pub fn repetition_count(&self) -> usize {
        let Some(&current) = self.hashes.last() else {
            return 0;
        };
        let window = self.position.halfmove_clock as usize + 1;
        self.hashes
            .iter()
            .rev()
            .take(window)
            .filter(|&&h| h == current)
            .count()
    }

    pub fn is_threefold_repetition(&self) -> bool {
        self.repetition_count() >= 3
    }

    /// Neither side can possibly mate: bare kings, a single minor piece, or
    /// only bishops that all stand on one square color.
    pub fn is_insufficient_material(&self) -> bool {
        let pos = &self.position;
        let heavy = pos.pieces[Piece::Pawn.index()]
            | pos.pieces[Piece::Rook.index()]
            | pos.pieces[Piece::Queen.index()];
        if heavy.is_not_empty() {
            return false;
        }
        let knights = pos.pieces[Piece::Knight.index()];
        let bishops = pos.pieces[Piece::Bishop.index()];
        if (knights | bishops).count() <= 1 {
            return true;
        }
        knights.is_empty()
            && ((bishops & Bitboard::LIGHT_SQUARES).is_empty()
                || (bishops & !Bitboard::LIGHT_SQUARES).is_empty())
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::startpos()
    }
}
