//! MCTS configuration parameters.

use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while building or validating a configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("unknown {option}: {value:?}")]
    UnknownOption { option: &'static str, value: String },

    #[error("rollouts_per_simulation must be at least 1")]
    ZeroRollouts,

    #[error("exploration constant must be finite and non-negative, got {0}")]
    InvalidExploration(f64),

    #[error("wall-clock budget must be finite and positive, got {0}")]
    InvalidTimeBudget(f64),
}

/// How a child is picked while descending the tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMethod {
    /// Mean reward plus exploration bonus; unvisited children first.
    #[serde(alias = "UCT")]
    Uct,
    /// Uniform choice among children, ignoring statistics.
    #[serde(alias = "RANDOM")]
    Random,
}

/// Whether the engine searches at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerType {
    /// Full MCTS.
    #[serde(alias = "mcts", alias = "MCTS")]
    Search,
    /// Uniform random legal move, no search.
    #[serde(alias = "RANDOM")]
    Random,
}

/// What bounds a search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapMethod {
    /// Stop after `max_iterations` iterations.
    #[serde(alias = "iter")]
    Iterations,
    /// Stop once `wall_clock_budget_seconds` has elapsed, checked between
    /// iterations.
    Time,
}

impl FromStr for SelectionMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "uct" => Ok(SelectionMethod::Uct),
            "random" => Ok(SelectionMethod::Random),
            _ => Err(ConfigError::UnknownOption {
                option: "selection_method",
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for PlayerType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "search" | "mcts" => Ok(PlayerType::Search),
            "random" => Ok(PlayerType::Random),
            _ => Err(ConfigError::UnknownOption {
                option: "player_type",
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for CapMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "iter" | "iterations" => Ok(CapMethod::Iterations),
            "time" => Ok(CapMethod::Time),
            _ => Err(ConfigError::UnknownOption {
                option: "cap_method",
                value: s.to_string(),
            }),
        }
    }
}

/// MCTS configuration parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MCTSConfig {
    /// Iteration budget under [`CapMethod::Iterations`].
    pub max_iterations: u32,

    /// UCT exploration constant C.
    /// Higher values favor exploration over exploitation.
    pub exploration_constant: f64,

    /// In-tree selection strategy.
    pub selection_method: SelectionMethod,

    /// Search, or play uniformly random legal moves.
    pub player_type: PlayerType,

    /// Independent random rollouts per simulation step.
    pub rollouts_per_simulation: u32,

    /// Budget under [`CapMethod::Time`], in seconds.
    pub wall_clock_budget_seconds: f64,

    /// Which budget bounds the search.
    pub cap_method: CapMethod,

    /// Random seed for the engine RNG.
    /// Same seed produces deterministic searches.
    pub seed: u64,
}

impl Default for MCTSConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            exploration_constant: 10.0,
            selection_method: SelectionMethod::Random,
            player_type: PlayerType::Search,
            rollouts_per_simulation: 1,
            wall_clock_budget_seconds: 5.0,
            cap_method: CapMethod::Iterations,
            seed: 42,
        }
    }
}

impl MCTSConfig {
    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rollouts_per_simulation == 0 {
            return Err(ConfigError::ZeroRollouts);
        }
        let c = self.exploration_constant;
        if !c.is_finite() || c < 0.0 {
            return Err(ConfigError::InvalidExploration(c));
        }
        let budget = self.wall_clock_budget_seconds;
        let representable = budget.is_finite() && budget <= Duration::MAX.as_secs_f64();
        if self.cap_method == CapMethod::Time && (!representable || budget <= 0.0) {
            return Err(ConfigError::InvalidTimeBudget(budget));
        }
        Ok(())
    }

    /// Wall-clock budget as a `Duration`.
    ///
    /// Only meaningful once [`MCTSConfig::validate`] has passed. Budgets
    /// too large for a `Duration` saturate at `Duration::MAX`.
    #[must_use]
    pub fn time_budget(&self) -> Duration {
        Duration::try_from_secs_f64(self.wall_clock_budget_seconds.max(0.0))
            .unwrap_or(Duration::MAX)
    }

    /// Cap by iteration count.
    pub fn with_max_iterations(mut self, iterations: u32) -> Self {
        self.max_iterations = iterations;
        self.cap_method = CapMethod::Iterations;
        self
    }

    /// Cap by wall-clock time.
    pub fn with_time_budget(mut self, seconds: f64) -> Self {
        self.wall_clock_budget_seconds = seconds;
        self.cap_method = CapMethod::Time;
        self
    }

    /// Create a new config with custom exploration constant.
    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration_constant = c;
        self
    }

    /// Set the selection strategy.
    pub fn with_selection(mut self, method: SelectionMethod) -> Self {
        self.selection_method = method;
        self
    }

    /// Set the player type.
    pub fn with_player_type(mut self, player_type: PlayerType) -> Self {
        self.player_type = player_type;
        self
    }

    /// Set rollouts per simulation.
    pub fn with_rollouts(mut self, rollouts: u32) -> Self {
        self.rollouts_per_simulation = rollouts;
        self
    }

    /// Create a new config with custom seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}
