//! Automated chess opponent.
//!
//! This crate provides:
//! - [`Evaluator`] - static evaluation from material, piece-square tables,
//!   pawn structure, king safety and mobility
//! - [`Searcher`] - negamax with alpha-beta pruning and quiescence search
//! - [`Opponent`] / [`select_move`] - the move decision, with depth and
//!   root-width selection and a fallback when the search fails
//! - [`OpponentPool`] - searches on tokio's blocking pool
//!
//! The opponent works on anything implementing [`GamePosition`];
//! [`chess_rules::Board`] is the standard implementation.
//!
//! # Example
//!
//! ```
//! use chess_opponent::{Opponent, SearchConfig, Selection};
//! use chess_rules::Board;
//!
//! let mut board = Board::startpos();
//! let opponent = Opponent::new(SearchConfig::default().with_fixed_depth(2));
//! let result = opponent.select_move(&mut board).unwrap();
//! assert_eq!(result.selection, Selection::Search);
//! assert_eq!(board.ply(), 0);
//! ```

pub mod config;
pub mod depth;
pub mod eval;
pub mod fallback;
pub mod ordering;
pub mod position;
pub mod score;
pub mod search;
pub mod tables;
pub mod worker;

use chess_core::Move;
use serde::{Serialize, Serializer};
use tracing::{debug, info, warn};

pub use config::{ConfigError, SearchConfig};
pub use eval::{EvalError, Evaluator, GamePhase};
pub use position::GamePosition;
pub use score::{is_mate, mate_distance, Score, MATE};
pub use search::{RootOutcome, SearchError, Searcher};
pub use worker::{OpponentPool, WorkerError};

use depth::select_depth;
use fallback::{greedy_move, random_move};

/// How the move in a [`SearchResult`] was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection {
    /// Full alpha-beta search.
    Search,
    /// The only legal move, returned without searching.
    OnlyMove,
    /// One-ply capture/check heuristic after a failed search.
    Greedy,
    /// Uniform random choice after the greedy pass also failed.
    Random,
}

/// A chosen move and its root evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    #[serde(rename = "move", serialize_with = "serialize_uci")]
    pub best_move: Move,
    /// White-relative. For non-search selections this is the static
    /// evaluation of the position.
    pub score: Score,
    pub depth: u32,
    pub nodes: u64,
    pub selection: Selection,
}

fn serialize_uci<S: Serializer>(m: &Move, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&m.to_uci())
}

/// The move decision: configuration plus the evaluator it implies.
#[derive(Debug, Clone)]
pub struct Opponent {
    config: SearchConfig,
    evaluator: Evaluator,
}

impl Default for Opponent {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

impl Opponent {
    pub fn new(config: SearchConfig) -> Self {
        let evaluator = Evaluator::new(config.endgame_material_threshold);
        Opponent { config, evaluator }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    /// Chooses a move for the side to move.
    ///
    /// Returns `None` only when there is no legal move (or the moves cannot
    /// be enumerated at all). Search failures never escape: they degrade to
    /// a greedy one-ply choice, then to a random legal move. The position is
    /// left as it was found whenever the rules engine honors undo.
    pub fn select_move<P: GamePosition + ?Sized>(&self, pos: &mut P) -> Option<SearchResult> {
        let moves = match pos.legal_moves() {
            Ok(moves) => moves,
            Err(err) => {
                warn!(%err, "cannot enumerate root moves");
                return None;
            }
        };

        match moves.as_slice() {
            [] => {
                debug!("no legal moves");
                return None;
            }
            &[only] => {
                debug!(mv = %only, "single legal move, skipping search");
                return Some(SearchResult {
                    best_move: only,
                    score: self.evaluator.evaluate_with_mobility(pos, 1),
                    depth: 0,
                    nodes: 0,
                    selection: Selection::OnlyMove,
                });
            }
            _ => {}
        }

        let phase = self.evaluator.phase(pos);
        let depth = select_depth(&self.config, moves.len(), phase);
        debug!(depth, root_moves = moves.len(), ?phase, "selected depth");

        let mut searcher = Searcher::new(&self.config);
        match searcher.search_root(pos, moves.clone(), depth) {
            Ok(outcome) => {
                info!(
                    mv = %outcome.best_move,
                    score = outcome.score,
                    depth,
                    nodes = outcome.nodes,
                    "selected move"
                );
                Some(SearchResult {
                    best_move: outcome.best_move,
                    score: outcome.score,
                    depth,
                    nodes: outcome.nodes,
                    selection: Selection::Search,
                })
            }
            Err(err) => {
                warn!(%err, nodes = searcher.nodes(), "search failed, falling back");
                self.fallback(pos, &moves, depth, searcher.nodes())
            }
        }
    }

    fn fallback<P: GamePosition + ?Sized>(
        &self,
        pos: &mut P,
        moves: &[Move],
        depth: u32,
        nodes: u64,
    ) -> Option<SearchResult> {
        let (best_move, selection) = match greedy_move(pos, moves) {
            Ok(Some(m)) => (m, Selection::Greedy),
            Ok(None) => return None,
            Err(err) => {
                warn!(%err, "greedy fallback failed, choosing at random");
                (random_move(moves, &mut rand::thread_rng())?, Selection::Random)
            }
        };
        info!(mv = %best_move, ?selection, "selected fallback move");
        Some(SearchResult {
            best_move,
            score: self.evaluator.evaluate_with_mobility(pos, moves.len()),
            depth,
            nodes,
            selection,
        })
    }
}

/// Chooses a move with the default configuration.
pub fn select_move<P: GamePosition + ?Sized>(pos: &mut P) -> Option<SearchResult> {
    Opponent::default().select_move(pos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_rules::Board;

    #[test]
    fn single_legal_move_skips_search() {
        // Black king in the corner, only Kh7 is legal.
        let mut board = Board::from_fen("7k/8/5K2/8/8/8/8/6R1 b - - 0 1").unwrap();
        let moves = GamePosition::legal_moves(&board).unwrap();
        assert_eq!(moves.len(), 1);
        let result = select_move(&mut board).unwrap();
        assert_eq!(result.best_move, moves[0]);
        assert_eq!(result.selection, Selection::OnlyMove);
        assert_eq!(result.nodes, 0);
    }

    #[test]
    fn result_serializes_with_uci_move() {
        let mut board = Board::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
        let opponent = Opponent::new(SearchConfig::default().with_fixed_depth(2));
        let result = opponent.select_move(&mut board).unwrap();
        let json = serde_json::to_value(result).unwrap();
        assert_eq!(json["move"], "a1a8");
        assert_eq!(json["selection"], "search");
        assert_eq!(json["score"], MATE - 1);
        assert_eq!(json["depth"], 2);
    }
}
