//! # othello-mcts
//!
//! An Othello engine on a 72-bit bitboard with a Monte Carlo Tree Search
//! player and a tournament harness for comparing search configurations.
//!
//! ## Design Principles
//!
//! 1. **Value-Type State**: `BoardState` and `Board` are `Copy`. Snapshots
//!    and restores are plain assignments.
//!
//! 2. **Injected Randomness**: every random decision draws from a seeded
//!    `GameRng` owned by the caller. The same seed replays the same game.
//!
//! 3. **Fresh Trees**: each search builds its tree from scratch in an arena
//!    and drops it with the next call.
//!
//! ## Modules
//!
//! - `core`: sides and the deterministic RNG
//! - `board`: bitboard move generation, move application, scoring, rendering
//! - `mcts`: Monte Carlo Tree Search
//! - `arena`: matches, tournaments and result persistence

pub mod arena;
pub mod board;
pub mod core;
pub mod mcts;

// Re-export commonly used types
pub use crate::core::{GameRng, Side};

pub use crate::board::{Board, BoardError, BoardState, GameResult, LegalMoves, Move};

pub use crate::mcts::{
    CapMethod, ConfigError, MCTSConfig, MCTSSearch, PlayerType, SearchError, SearchStats,
    SelectionMethod,
};

pub use crate::arena::{
    play_configured_match, play_match, ArenaError, MatchRecord, Tournament, TournamentConfig,
    TournamentResults,
};
