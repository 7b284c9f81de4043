//! Score representation and mate sentinels.

/// Centipawn score. Positive values favor White unless a function documents
/// that it returns a mover-relative score.
pub type Score = i32;

/// Score of the side to move being mated on the current ply.
pub const MATE: Score = 100_000;

/// Scores at or beyond this magnitude are forced mates.
pub const MATE_THRESHOLD: Score = MATE - 1_000;

/// Wider than any reachable score; used as the initial search window.
pub const INFINITY: Score = MATE + 1;

/// Mover-relative score given to a node whose evaluation failed.
///
/// Worse than any material imbalance but still inside the mate threshold,
/// so a genuine forced mate always dominates it.
pub const EVAL_FAILURE_PENALTY: Score = -20_000;

/// Score for the side to move when it is mated `ply` half-moves from the root.
#[inline]
pub const fn mated_in(ply: u32) -> Score {
    -(MATE - ply as Score)
}

#[inline]
pub const fn is_mate(score: Score) -> bool {
    score >= MATE_THRESHOLD || score <= -MATE_THRESHOLD
}

/// Number of plies until the mate, if `score` is a mate score.
pub fn mate_distance(score: Score) -> Option<u32> {
    if is_mate(score) {
        Some((MATE - score.abs()) as u32)
    } else {
        None
    }
}
