//! Negamax alpha-beta search with quiescence.
//!
//! All scores inside the search are relative to the side to move at the
//! node; the public entry points convert back to White-relative scores.
//!
//! Every `apply_move` is followed by exactly one `undo_move` before any
//! error from the subtree is propagated, so a failed search still leaves
//! the position where it found it.

use chess_core::Move;
use chess_rules::RulesError;
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::config::SearchConfig;
use crate::depth::root_width;
use crate::eval::Evaluator;
use crate::ordering::{order_moves, order_tactical};
use crate::position::GamePosition;
use crate::score::{mated_in, Score, EVAL_FAILURE_PENALTY, INFINITY, MATE_THRESHOLD};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("rules engine failed during search: {0}")]
    Rules(#[from] RulesError),

    #[error("no legal moves at the root")]
    NoMoves,
}

/// Result of a completed root search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RootOutcome {
    pub best_move: Move,
    /// White-relative.
    pub score: Score,
    pub depth: u32,
    pub nodes: u64,
    /// Root moves actually searched before the loop ended.
    pub searched: usize,
}

/// Search state for one move decision.
pub struct Searcher<'a> {
    config: &'a SearchConfig,
    evaluator: Evaluator,
    nodes: u64,
}

impl<'a> Searcher<'a> {
    pub fn new(config: &'a SearchConfig) -> Self {
        Searcher {
            config,
            evaluator: Evaluator::new(config.endgame_material_threshold),
            nodes: 0,
        }
    }

    /// Nodes visited so far, quiescence nodes included.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Searches the given root moves to `depth` and returns the best one.
    ///
    /// Moves are ordered, then cut to the root width; checking moves past
    /// the cut are kept, since every mate in one is a check. Among equal
    /// scores the earliest ordered move wins. A forced mate ends the loop.
    pub fn search_root<P: GamePosition + ?Sized>(
        &mut self,
        pos: &mut P,
        mut moves: Vec<Move>,
        depth: u32,
    ) -> Result<RootOutcome, SearchError> {
        let total = moves.len();
        order_moves(&mut moves);
        let width = root_width(self.config, total);
        let mut rank = 0;
        moves.retain(|m| {
            rank += 1;
            rank <= width || m.gives_check()
        });
        let Some(&first) = moves.first() else {
            return Err(SearchError::NoMoves);
        };
        debug!(depth, total, candidates = moves.len(), "searching root");

        self.nodes += 1;
        let side = pos.side_to_move();
        let mut best_move = first;
        let mut best = -INFINITY;
        let mut alpha = -INFINITY;
        let beta = INFINITY;
        let mut searched = 0;

        for &m in &moves {
            searched += 1;
            pos.apply_move(m)?;
            let result = self.negamax(pos, depth.saturating_sub(1), 1, -beta, -alpha);
            pos.undo_move()?;
            let score = -result?;
            trace!(mv = %m, score, "root move");

            if score > best {
                best = score;
                best_move = m;
            }
            if score > alpha {
                alpha = score;
            }
            if score >= MATE_THRESHOLD {
                debug!(mv = %best_move, "forced mate found, stopping root search");
                break;
            }
        }

        Ok(RootOutcome {
            best_move,
            score: side.sign() * best,
            depth,
            nodes: self.nodes,
            searched,
        })
    }

    /// White-relative value of `pos` searched to `depth`, without root
    /// width limiting. Depth 0 is the quiescence value.
    pub fn evaluate_at_depth<P: GamePosition + ?Sized>(
        &mut self,
        pos: &mut P,
        depth: u32,
    ) -> Result<Score, SearchError> {
        let side = pos.side_to_move();
        let score = self.negamax(pos, depth, 0, -INFINITY, INFINITY)?;
        Ok(side.sign() * score)
    }

    fn negamax<P: GamePosition + ?Sized>(
        &mut self,
        pos: &mut P,
        depth: u32,
        ply: u32,
        mut alpha: Score,
        beta: Score,
    ) -> Result<Score, SearchError> {
        if depth == 0 {
            return self.quiescence(pos, 0, ply, alpha, beta);
        }
        self.nodes += 1;

        let mut moves = pos.legal_moves()?;
        if moves.is_empty() {
            return Ok(if pos.is_check() { mated_in(ply) } else { 0 });
        }
        if ply > 0 && pos.is_draw() {
            return Ok(0);
        }

        order_moves(&mut moves);
        let mut best = -INFINITY;
        for m in moves {
            pos.apply_move(m)?;
            let result = self.negamax(pos, depth - 1, ply + 1, -beta, -alpha);
            pos.undo_move()?;
            let score = -result?;

            if score > best {
                best = score;
            }
            if score > alpha {
                alpha = score;
            }
            if self.config.alpha_beta && alpha >= beta {
                break;
            }
        }
        Ok(best)
    }

    /// Captures, checks and promotions only, capped at the configured
    /// quiescence depth.
    fn quiescence<P: GamePosition + ?Sized>(
        &mut self,
        pos: &mut P,
        qdepth: u32,
        ply: u32,
        mut alpha: Score,
        beta: Score,
    ) -> Result<Score, SearchError> {
        self.nodes += 1;

        let moves = pos.legal_moves()?;
        if moves.is_empty() {
            return Ok(if pos.is_check() { mated_in(ply) } else { 0 });
        }
        if ply > 0 && pos.is_draw() {
            return Ok(0);
        }

        let side = pos.side_to_move();
        let stand_pat = match self.evaluator.positional(pos, moves.len()) {
            Ok(score) => side.sign() * score,
            Err(err) => {
                warn!(%err, ply, "evaluation failed during search");
                EVAL_FAILURE_PENALTY
            }
        };
        if qdepth >= self.config.quiescence_depth {
            return Ok(stand_pat);
        }
        if self.config.alpha_beta {
            if stand_pat >= beta {
                return Ok(stand_pat);
            }
            alpha = alpha.max(stand_pat);
        }

        let mut best = stand_pat;
        for m in order_tactical(moves) {
            pos.apply_move(m)?;
            let result = self.quiescence(pos, qdepth + 1, ply + 1, -beta, -alpha);
            pos.undo_move()?;
            let score = -result?;

            if score > best {
                best = score;
            }
            if score > alpha {
                alpha = score;
            }
            if self.config.alpha_beta && alpha >= beta {
                break;
            }
        }
        Ok(best)
    }
}
