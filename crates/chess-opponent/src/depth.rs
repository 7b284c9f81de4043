//! Depth and root-width selection from the branching factor.

use crate::config::SearchConfig;
use crate::eval::GamePhase;

/// Search depth for a root with `root_moves` legal moves.
///
/// Busy positions get the reduced depth; endgames with few moves and any
/// position with very few moves get one extra ply.
pub fn select_depth(config: &SearchConfig, root_moves: usize, phase: GamePhase) -> u32 {
    if let Some(depth) = config.fixed_depth {
        return depth;
    }
    if root_moves > config.complex_root_moves {
        return config.reduced_depth;
    }
    let quiet_endgame = phase == GamePhase::Endgame && root_moves < config.endgame_root_moves;
    if quiet_endgame || root_moves < config.simple_root_moves {
        config.base_depth + 1
    } else {
        config.base_depth
    }
}

/// How many of the ordered root moves get a full search.
pub fn root_width(config: &SearchConfig, root_moves: usize) -> usize {
    if root_moves < config.root_full_width {
        root_moves
    } else {
        root_moves.min(config.root_move_cap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_table() {
        let config = SearchConfig::default();
        assert_eq!(select_depth(&config, 20, GamePhase::Middlegame), 4);
        assert_eq!(select_depth(&config, 25, GamePhase::Middlegame), 4);
        assert_eq!(select_depth(&config, 26, GamePhase::Middlegame), 3);
        assert_eq!(select_depth(&config, 40, GamePhase::Endgame), 3);
        assert_eq!(select_depth(&config, 9, GamePhase::Middlegame), 5);
        assert_eq!(select_depth(&config, 10, GamePhase::Middlegame), 4);
        assert_eq!(select_depth(&config, 14, GamePhase::Endgame), 5);
        assert_eq!(select_depth(&config, 15, GamePhase::Endgame), 4);
    }

    #[test]
    fn fixed_depth_wins() {
        let config = SearchConfig::default().with_fixed_depth(2);
        assert_eq!(select_depth(&config, 40, GamePhase::Middlegame), 2);
        assert_eq!(select_depth(&config, 3, GamePhase::Endgame), 2);
    }

    #[test]
    fn width_table() {
        let config = SearchConfig::default();
        assert_eq!(root_width(&config, 1), 1);
        assert_eq!(root_width(&config, 14), 14);
        assert_eq!(root_width(&config, 15), 12);
        assert_eq!(root_width(&config, 40), 12);
    }
}
