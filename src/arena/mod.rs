//! Matches and tournaments between search engines.
//!
//! - `game`: play one match between two engines
//! - `config`: tournament settings loaded from TOML
//! - `tournament`: parallel round-robin and result persistence

pub mod config;
pub mod game;
pub mod tournament;

use thiserror::Error;

use crate::mcts::{ConfigError, SearchError};

pub use config::TournamentConfig;
pub use game::{play_configured_match, play_match, MatchRecord};
pub use tournament::{Tournament, TournamentResults, RESULTS_BIN, RESULTS_JSON};

/// Errors from running or persisting matches and tournaments.
#[derive(Debug, Error)]
pub enum ArenaError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("bincode error: {0}")]
    Bincode(#[from] bincode::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("search failed: {0}")]
    Search(#[from] SearchError),

    #[error("invalid player config: {0}")]
    Config(#[from] ConfigError),

    #[error("tournament has no players")]
    NoPlayers,
}
