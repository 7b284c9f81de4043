//! Search configuration.
//!
//! Every knob has a default, so an empty TOML file (or no file at all)
//! yields the standard opponent. Evaluation weights are deliberately absent:
//! they are fixed tables, not configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::tables::ENDGAME_MATERIAL_THRESHOLD;

/// Errors that can occur when loading or validating a search configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    /// The configuration parsed but describes an unusable search.
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Depth, width and pruning settings for the opponent.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Depth used for ordinary positions. Defaults to 4.
    #[serde(default = "default_base_depth")]
    pub base_depth: u32,
    /// Depth used when the root has more than `complex_root_moves` moves.
    /// Defaults to 3.
    #[serde(default = "default_reduced_depth")]
    pub reduced_depth: u32,
    /// Root move count above which the reduced depth applies. Defaults to 25.
    #[serde(default = "default_complex_root_moves")]
    pub complex_root_moves: usize,
    /// In an endgame, root move counts below this search one ply deeper.
    /// Defaults to 15.
    #[serde(default = "default_endgame_root_moves")]
    pub endgame_root_moves: usize,
    /// In any phase, root move counts below this search one ply deeper.
    /// Defaults to 10.
    #[serde(default = "default_simple_root_moves")]
    pub simple_root_moves: usize,
    /// Maximum plies of captures and checks searched past the horizon.
    /// Defaults to 4.
    #[serde(default = "default_quiescence_depth")]
    pub quiescence_depth: u32,
    /// Root move counts below this are searched in full. Defaults to 15.
    #[serde(default = "default_root_full_width")]
    pub root_full_width: usize,
    /// Number of best-ordered root moves searched otherwise. Defaults to 12.
    #[serde(default = "default_root_move_cap")]
    pub root_move_cap: usize,
    /// Overrides depth selection entirely when set.
    #[serde(default)]
    pub fixed_depth: Option<u32>,
    /// Turning pruning off gives plain minimax with identical results,
    /// only slower. Defaults to true.
    #[serde(default = "default_alpha_beta")]
    pub alpha_beta: bool,
    /// Non-king material at or below which the king uses its endgame table.
    /// Defaults to 2600.
    #[serde(default = "default_endgame_material_threshold")]
    pub endgame_material_threshold: i32,
}

fn default_base_depth() -> u32 {
    4
}

fn default_reduced_depth() -> u32 {
    3
}

fn default_complex_root_moves() -> usize {
    25
}

fn default_endgame_root_moves() -> usize {
    15
}

fn default_simple_root_moves() -> usize {
    10
}

fn default_quiescence_depth() -> u32 {
    4
}

fn default_root_full_width() -> usize {
    15
}

fn default_root_move_cap() -> usize {
    12
}

fn default_alpha_beta() -> bool {
    true
}

fn default_endgame_material_threshold() -> i32 {
    ENDGAME_MATERIAL_THRESHOLD
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            base_depth: default_base_depth(),
            reduced_depth: default_reduced_depth(),
            complex_root_moves: default_complex_root_moves(),
            endgame_root_moves: default_endgame_root_moves(),
            simple_root_moves: default_simple_root_moves(),
            quiescence_depth: default_quiescence_depth(),
            root_full_width: default_root_full_width(),
            root_move_cap: default_root_move_cap(),
            fixed_depth: None,
            alpha_beta: default_alpha_beta(),
            endgame_material_threshold: default_endgame_material_threshold(),
        }
    }
}

impl SearchConfig {
    /// Loads and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file cannot be read,
    /// [`ConfigError::ParseError`] if it is not valid TOML, or
    /// [`ConfigError::Invalid`] if [`Self::validate`] rejects it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: SearchConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Same settings, searching exactly `depth` plies.
    pub fn with_fixed_depth(mut self, depth: u32) -> Self {
        self.fixed_depth = Some(depth);
        self
    }

    /// Rejects settings under which the search could not produce a move.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_depth == 0 || self.reduced_depth == 0 {
            return Err(ConfigError::Invalid(
                "search depths must be at least 1".to_string(),
            ));
        }
        if self.fixed_depth == Some(0) {
            return Err(ConfigError::Invalid(
                "fixed_depth must be at least 1".to_string(),
            ));
        }
        if self.root_move_cap == 0 {
            return Err(ConfigError::Invalid(
                "root_move_cap must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_toml_is_the_default() {
        let config = SearchConfig::from_toml_str("").unwrap();
        assert_eq!(config, SearchConfig::default());
        assert_eq!(config.base_depth, 4);
        assert_eq!(config.reduced_depth, 3);
        assert_eq!(config.root_move_cap, 12);
        assert!(config.alpha_beta);
        assert_eq!(config.fixed_depth, None);
    }

    #[test]
    fn partial_toml_overrides_only_what_it_names() {
        let config = SearchConfig::from_toml_str(
            r#"
fixed_depth = 2
alpha_beta = false
quiescence_depth = 6
"#,
        )
        .unwrap();
        assert_eq!(config.fixed_depth, Some(2));
        assert!(!config.alpha_beta);
        assert_eq!(config.quiescence_depth, 6);
        assert_eq!(config.base_depth, 4);
    }

    #[test]
    fn invalid_values_are_rejected() {
        for toml in ["base_depth = 0", "fixed_depth = 0", "root_move_cap = 0"] {
            assert!(
                matches!(
                    SearchConfig::from_toml_str(toml),
                    Err(ConfigError::Invalid(_))
                ),
                "{}",
                toml
            );
        }
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let result = SearchConfig::from_toml_str("base_depth = \"deep\"");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn load_reads_from_disk() {
        let path = std::env::temp_dir().join(format!(
            "chess-opponent-config-{}.toml",
            std::process::id()
        ));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "base_depth = 5").unwrap();
        drop(file);

        let config = SearchConfig::load(&path).unwrap();
        assert_eq!(config.base_depth, 5);
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(
            SearchConfig::load(&path),
            Err(ConfigError::ReadError(_))
        ));
    }

    #[test]
    fn round_trips_through_toml() {
        let config = SearchConfig::default().with_fixed_depth(3);
        let text = toml::to_string(&config).unwrap();
        assert_eq!(SearchConfig::from_toml_str(&text).unwrap(), config);
    }
}
