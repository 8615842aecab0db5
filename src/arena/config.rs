//! Tournament configuration loaded from TOML.
//!
//! ```toml
//! games_per_pairing = 10
//! seed = 7
//!
//! [[players]]
//! selection_method = "uct"
//! exploration_constant = 1.0
//! max_iterations = 500
//!
//! [[players]]
//! player_type = "random"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::mcts::MCTSConfig;

use super::ArenaError;

/// Round-robin tournament settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TournamentConfig {
    /// One search configuration per player.
    pub players: Vec<MCTSConfig>,

    /// Matches per ordered pairing.
    pub games_per_pairing: u32,

    /// Base seed every match seed is derived from.
    pub seed: u64,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            players: Vec::new(),
            games_per_pairing: 10,
            seed: 42,
        }
    }
}

impl TournamentConfig {
    /// Create a config for the given players with default settings.
    pub fn new(players: Vec<MCTSConfig>) -> Self {
        Self {
            players,
            ..Self::default()
        }
    }

    /// Set matches per ordered pairing.
    pub fn with_games_per_pairing(mut self, games: u32) -> Self {
        self.games_per_pairing = games;
        self
    }

    /// Set the base seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Parse a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ArenaError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ArenaError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        info!(
            path = %path.display(),
            players = config.players.len(),
            "loaded tournament config"
        );
        Ok(config)
    }

    /// Check that there is a player and every player config is valid.
    pub fn validate(&self) -> Result<(), ArenaError> {
        if self.players.is_empty() {
            return Err(ArenaError::NoPlayers);
        }
        for player in &self.players {
            player.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcts::{CapMethod, ConfigError, PlayerType, SelectionMethod};

    #[test]
    fn test_parse_toml() {
        let content = r#"
            games_per_pairing = 4
            seed = 7

            [[players]]
            selection_method = "uct"
            exploration_constant = 1.5
            max_iterations = 300

            [[players]]
            player_type = "random"

            [[players]]
            cap_method = "time"
            wall_clock_budget_seconds = 0.5
        "#;

        let config = TournamentConfig::from_toml_str(content).unwrap();

        assert_eq!(config.games_per_pairing, 4);
        assert_eq!(config.seed, 7);
        assert_eq!(config.players.len(), 3);
        assert_eq!(config.players[0].selection_method, SelectionMethod::Uct);
        assert_eq!(config.players[0].exploration_constant, 1.5);
        assert_eq!(config.players[0].max_iterations, 300);
        assert_eq!(config.players[1].player_type, PlayerType::Random);
        assert_eq!(config.players[2].cap_method, CapMethod::Time);
    }

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config = TournamentConfig::from_toml_str("[[players]]\n").unwrap();

        assert_eq!(config.games_per_pairing, 10);
        assert_eq!(config.seed, 42);
        assert_eq!(config.players[0], MCTSConfig::default());
    }

    #[test]
    fn test_rejects_empty_players() {
        let result = TournamentConfig::from_toml_str("seed = 1\n");
        assert!(matches!(result, Err(ArenaError::NoPlayers)));
    }

    #[test]
    fn test_rejects_invalid_player() {
        let result = TournamentConfig::from_toml_str("[[players]]\nrollouts_per_simulation = 0\n");
        assert!(matches!(result, Err(ArenaError::Config(ConfigError::ZeroRollouts))));
    }

    #[test]
    fn test_rejects_unknown_option() {
        let result = TournamentConfig::from_toml_str("[[players]]\nselection_method = \"puct\"\n");
        assert!(matches!(result, Err(ArenaError::Toml(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tournament.toml");
        std::fs::write(&path, "games_per_pairing = 2\n\n[[players]]\nmax_iterations = 5\n").unwrap();

        let config = TournamentConfig::load(&path).unwrap();
        assert_eq!(config.games_per_pairing, 2);
        assert_eq!(config.players[0].max_iterations, 5);

        let missing = TournamentConfig::load(dir.path().join("missing.toml"));
        assert!(matches!(missing, Err(ArenaError::Io(_))));
    }
}
