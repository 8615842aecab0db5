//! Monte Carlo Tree Search for Othello.
//!
//! ## Overview
//!
//! The search rebuilds its tree on every move. Each iteration:
//!
//! - **Select**: descend with the configured policy (UCT or uniform random),
//!   stopping at the first never-visited child
//! - **Expand**: give a reached leaf one child per legal move, then enter one
//!   of them at random
//! - **Simulate**: play `rollouts_per_simulation` random games to the end
//! - **Backpropagate**: add the reward and rollout count up to the root
//!
//! The chosen move is the root child with the largest total value.
//!
//! ## Usage
//!
//! ```rust
//! use othello_mcts::board::BoardState;
//! use othello_mcts::mcts::{MCTSConfig, MCTSSearch, SelectionMethod};
//!
//! let config = MCTSConfig::default()
//!     .with_selection(SelectionMethod::Uct)
//!     .with_max_iterations(200);
//! let mut search = MCTSSearch::new(config).unwrap();
//!
//! let mv = search.run_search(&BoardState::initial()).unwrap();
//! println!("Best move: {}", mv);
//!
//! for (mv, value, visits) in search.root_children() {
//!     println!("{}: {:.1} over {} rollouts", mv, value, visits);
//! }
//! ```
//!
//! ## Custom Policies
//!
//! ```rust,ignore
//! use othello_mcts::mcts::{MCTSSearch, MCTSConfig, Uct};
//!
//! let search = MCTSSearch::new(config)?
//!     .with_selection(Uct);
//! ```

pub mod config;
pub mod node;
pub mod policy;
pub mod search;
pub mod stats;
pub mod tree;

// Re-export main types
pub use config::{CapMethod, ConfigError, MCTSConfig, PlayerType, SelectionMethod};
pub use node::{MCTSNode, NodeId};
pub use policy::{
    best_root_move, rollout_reward, selection_policy, RandomRollout, RandomSelection,
    SelectionPolicy, SimulationPolicy, Uct,
};
pub use search::{MCTSSearch, SearchError};
pub use stats::SearchStats;
pub use tree::{MCTSTree, TreeStats};
