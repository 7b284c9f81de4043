use chess_core::{FenError, Square};
use thiserror::Error;

/// Errors raised by the rules engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RulesError {
    #[error("illegal move: {0}")]
    IllegalMove(String),

    #[error("no piece of the side to move on {0}")]
    NoPieceToMove(Square),

    #[error("no move to undo")]
    NothingToUndo,

    #[error("invalid UCI move: {0}")]
    InvalidUci(String),

    #[error(transparent)]
    Fen(#[from] FenError),
}
