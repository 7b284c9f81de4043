//! Static position evaluation.
//!
//! The evaluator reads the board through [`GamePosition::piece_at`] and
//! combines material, piece-square tables, pawn structure, king safety,
//! mobility and a check term. Scores are White-relative.

use chess_core::{Color, File, Piece, Rank, Square};
use chess_rules::RulesError;
use thiserror::Error;
use tracing::warn;

use crate::position::GamePosition;
use crate::score::{Score, EVAL_FAILURE_PENALTY, MATE};
use crate::tables::{
    piece_value, pst_value, BACK_RANK_KING_BONUS, CENTRAL_KING_PENALTY, CHECK_PENALTY,
    DOUBLED_PAWN_PENALTY, ENDGAME_MATERIAL_THRESHOLD, ISOLATED_PAWN_PENALTY, KING_SHELTER_BONUS,
    MOBILITY_WEIGHT, PASSED_PAWN_BONUS,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("position query failed: {0}")]
    Position(#[from] RulesError),

    #[error("no {0:?} king on the board")]
    MissingKing(Color),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GamePhase {
    Middlegame,
    Endgame,
}

/// White-relative score for a node whose evaluation failed.
#[inline]
pub const fn failure_score(side_to_move: Color) -> Score {
    side_to_move.sign() * EVAL_FAILURE_PENALTY
}

/// One read of the board, so the terms below don't query the position
/// square by square more than once.
pub(crate) struct Snapshot {
    squares: [Option<(Piece, Color)>; 64],
    kings: [Option<Square>; 2],
    /// Pawn count per file, per color.
    pawn_files: [[i32; 8]; 2],
}

impl Snapshot {
    pub(crate) fn read<P: GamePosition + ?Sized>(pos: &P) -> Self {
        let mut snapshot = Snapshot {
            squares: [None; 64],
            kings: [None; 2],
            pawn_files: [[0; 8]; 2],
        };
        for sq in Square::all() {
            let Some((piece, color)) = pos.piece_at(sq) else {
                continue;
            };
            snapshot.squares[sq.index() as usize] = Some((piece, color));
            match piece {
                Piece::King => snapshot.kings[color.index()] = Some(sq),
                Piece::Pawn => snapshot.pawn_files[color.index()][sq.file().index() as usize] += 1,
                _ => {}
            }
        }
        snapshot
    }

    #[inline]
    fn at(&self, sq: Square) -> Option<(Piece, Color)> {
        self.squares[sq.index() as usize]
    }

    fn pieces(&self) -> impl Iterator<Item = (Square, Piece, Color)> + '_ {
        Square::all().filter_map(|sq| self.at(sq).map(|(piece, color)| (sq, piece, color)))
    }

    fn pawns(&self, color: Color) -> impl Iterator<Item = Square> + '_ {
        self.pieces()
            .filter(move |&(_, piece, c)| piece == Piece::Pawn && c == color)
            .map(|(sq, _, _)| sq)
    }

    /// No enemy pawn ahead of `sq` on its own or an adjacent file.
    fn is_passed(&self, sq: Square, color: Color) -> bool {
        let file = sq.file().index() as i32;
        let rank = sq.rank().relative_to(color);
        !self.pawns(color.opposite()).any(|enemy| {
            (enemy.file().index() as i32 - file).abs() <= 1
                && enemy.rank().relative_to(color) > rank
        })
    }
}

/// Position evaluator.
///
/// Weights are fixed; the only knob is where the endgame begins for the
/// purpose of the king's piece-square table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluator {
    endgame_material_threshold: i32,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new(ENDGAME_MATERIAL_THRESHOLD)
    }
}

impl Evaluator {
    pub const fn new(endgame_material_threshold: i32) -> Self {
        Evaluator {
            endgame_material_threshold,
        }
    }

    /// Endgame once non-king material on the board is at or below the
    /// threshold, or once both queens are gone.
    pub fn phase<P: GamePosition + ?Sized>(&self, pos: &P) -> GamePhase {
        self.phase_of(&Snapshot::read(pos))
    }

    fn phase_of(&self, board: &Snapshot) -> GamePhase {
        let mut material = 0;
        let mut queens = 0;
        for (_, piece, _) in board.pieces() {
            match piece {
                Piece::King => continue,
                Piece::Queen => queens += 1,
                _ => {}
            }
            material += piece_value(piece);
        }
        if material <= self.endgame_material_threshold || queens == 0 {
            GamePhase::Endgame
        } else {
            GamePhase::Middlegame
        }
    }

    /// Evaluates the position. Never fails: an evaluation error yields a
    /// very unfavorable score for the side to move.
    pub fn evaluate<P: GamePosition + ?Sized>(&self, pos: &P) -> Score {
        self.try_evaluate(pos).unwrap_or_else(|err| {
            warn!(%err, "evaluation failed, scoring against the side to move");
            failure_score(pos.side_to_move())
        })
    }

    pub fn try_evaluate<P: GamePosition + ?Sized>(&self, pos: &P) -> Result<Score, EvalError> {
        let move_count = pos.legal_moves()?.len();
        self.try_evaluate_with_mobility(pos, move_count)
    }

    /// Like [`Evaluator::evaluate`], for callers that already enumerated
    /// the legal moves.
    pub fn evaluate_with_mobility<P: GamePosition + ?Sized>(
        &self,
        pos: &P,
        move_count: usize,
    ) -> Score {
        self.try_evaluate_with_mobility(pos, move_count)
            .unwrap_or_else(|err| {
                warn!(%err, "evaluation failed, scoring against the side to move");
                failure_score(pos.side_to_move())
            })
    }

    pub fn try_evaluate_with_mobility<P: GamePosition + ?Sized>(
        &self,
        pos: &P,
        move_count: usize,
    ) -> Result<Score, EvalError> {
        let side = pos.side_to_move();
        if move_count == 0 {
            return Ok(if pos.is_check() {
                -side.sign() * MATE
            } else {
                0
            });
        }
        if pos.is_draw() {
            return Ok(0);
        }
        self.positional(pos, move_count)
    }

    /// Every term except the terminal checks. Quiescence uses this for its
    /// stand-pat score, where it has already handled terminal nodes.
    pub(crate) fn positional<P: GamePosition + ?Sized>(
        &self,
        pos: &P,
        move_count: usize,
    ) -> Result<Score, EvalError> {
        let board = Snapshot::read(pos);
        for color in Color::BOTH {
            if board.kings[color.index()].is_none() {
                return Err(EvalError::MissingKing(color));
            }
        }
        let endgame = self.phase_of(&board) == GamePhase::Endgame;

        let mut score = 0;
        for (sq, piece, color) in board.pieces() {
            let mut value = pst_value(piece, sq, color, endgame);
            if piece != Piece::King {
                value += piece_value(piece);
            }
            score += color.sign() * value;
        }
        for color in Color::BOTH {
            let structure = pawn_structure(&board, color) + king_safety(&board, color, endgame);
            score += color.sign() * structure;
        }

        let side = pos.side_to_move();
        score += side.sign() * MOBILITY_WEIGHT * move_count as Score;
        if pos.is_check() {
            score -= side.sign() * CHECK_PENALTY;
        }
        Ok(score)
    }
}

/// Doubled, isolated and passed pawns for one side, from that side's view.
fn pawn_structure(board: &Snapshot, color: Color) -> Score {
    let files = &board.pawn_files[color.index()];
    let mut score = 0;
    for &count in files {
        if count > 1 {
            score -= DOUBLED_PAWN_PENALTY * (count - 1);
        }
    }
    for sq in board.pawns(color) {
        let file = sq.file().index() as usize;
        let left = file > 0 && files[file - 1] > 0;
        let right = file < 7 && files[file + 1] > 0;
        if !left && !right {
            score -= ISOLATED_PAWN_PENALTY;
        }
        if board.is_passed(sq, color) {
            score += PASSED_PAWN_BONUS[sq.rank().relative_to(color).index() as usize];
        }
    }
    score
}

/// Pawn shelter in all phases; centralization and back-rank terms only in
/// the middlegame.
fn king_safety(board: &Snapshot, color: Color, endgame: bool) -> Score {
    let Some(king) = board.kings[color.index()] else {
        return 0;
    };
    let mut score = 0;
    for df in -1..=1 {
        if let Some(sq) = king.offset(df, color.pawn_direction()) {
            if board.at(sq) == Some((Piece::Pawn, color)) {
                score += KING_SHELTER_BONUS;
            }
        }
    }
    if !endgame {
        let central_file = matches!(king.file(), File::D | File::E);
        let central_rank = matches!(king.rank(), Rank::R4 | Rank::R5);
        if central_file && central_rank {
            score -= CENTRAL_KING_PENALTY;
        }
        if king.rank().relative_to(color) == Rank::R1 {
            score += BACK_RANK_KING_BONUS;
        }
    }
    score
}
