//! Core MCTS search algorithm.
//!
//! Each call to [`MCTSSearch::run_search`] rebuilds the tree from scratch and
//! runs select → expand → simulate → backpropagate until the configured cap,
//! then plays the root child with the largest total value.

use std::time::Instant;

use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::board::{Board, BoardError, BoardState, Move};
use crate::core::{GameRng, Side};

use super::config::{CapMethod, ConfigError, MCTSConfig, PlayerType};
use super::node::NodeId;
use super::policy::{
    best_root_move, rollout_reward, selection_policy, RandomRollout, SelectionPolicy,
    SimulationPolicy,
};
use super::stats::SearchStats;
use super::tree::MCTSTree;

/// Errors that can occur during MCTS search.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("no legal moves available")]
    NoLegalMoves,

    #[error("invalid state: {0}")]
    InvalidState(#[from] BoardError),
}

/// Main MCTS search context.
///
/// Owns the search tree, a private board that is rewound to the root
/// snapshot on every iteration, and the RNG behind every random choice.
pub struct MCTSSearch {
    /// Search configuration.
    config: MCTSConfig,

    /// The search tree.
    tree: MCTSTree,

    /// Board replayed along the current path.
    board: Board,

    /// Root position of the current search.
    root_board: Board,

    /// Side the rewards are computed for.
    searcher: Side,

    /// RNG for selection ties, expansion and rollouts.
    rng: GameRng,

    /// Selection policy.
    selection: Box<dyn SelectionPolicy>,

    /// Simulation policy.
    simulation: Box<dyn SimulationPolicy>,

    /// Search statistics.
    stats: SearchStats,
}

impl MCTSSearch {
    /// Create a new MCTS search context.
    ///
    /// The RNG is seeded from `config.seed` and the selection policy follows
    /// `config.selection_method`.
    pub fn new(config: MCTSConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            tree: MCTSTree::new(),
            board: Board::new(),
            root_board: Board::new(),
            searcher: Side::Black,
            rng: GameRng::new(config.seed),
            selection: selection_policy(config.selection_method),
            simulation: Box::new(RandomRollout),
            stats: SearchStats::default(),
            config,
        })
    }

    /// Replace the RNG.
    pub fn with_rng(mut self, rng: GameRng) -> Self {
        self.rng = rng;
        self
    }

    /// Set a custom selection policy.
    pub fn with_selection<S: SelectionPolicy + 'static>(mut self, selection: S) -> Self {
        self.selection = Box::new(selection);
        self
    }

    /// Set a custom simulation policy.
    pub fn with_simulation<S: SimulationPolicy + 'static>(mut self, simulation: S) -> Self {
        self.simulation = Box::new(simulation);
        self
    }

    /// Pick a move for the side to move in `state`.
    ///
    /// Random players return a uniformly random legal move without searching.
    /// A search that ends with an unexpanded root (zero budget) also falls
    /// back to a random legal move.
    pub fn run_search(&mut self, state: &BoardState) -> Result<Move, SearchError> {
        let board = Board::from_state(*state)?;
        if board.is_terminal() {
            return Err(SearchError::NoLegalMoves);
        }

        self.stats.reset();
        if self.config.player_type == PlayerType::Random {
            return self.random_move(&board);
        }

        let start = Instant::now();
        self.tree.reset();
        self.root_board = board;
        self.board = board;
        self.searcher = board.turn();

        match self.config.cap_method {
            CapMethod::Iterations => {
                for _ in 0..self.config.max_iterations {
                    self.iteration();
                }
            }
            CapMethod::Time => {
                let budget = self.config.time_budget();
                while start.elapsed() < budget {
                    self.iteration();
                }
            }
        }

        self.stats.time_us = start.elapsed().as_micros() as u64;

        let mv = match best_root_move(&self.tree, &mut self.rng) {
            Some(mv) => mv,
            None => {
                warn!(
                    iterations = self.stats.iterations,
                    "search left the root unexpanded, playing a random move"
                );
                self.random_move(&board)?
            }
        };

        debug!(
            side = %self.searcher,
            chosen = %mv,
            iterations = self.stats.iterations,
            rollouts = self.stats.rollouts,
            nodes = self.tree.len(),
            time_us = self.stats.time_us,
            iterations_per_sec = self.stats.iterations_per_second(),
            rollouts_per_sec = self.stats.rollouts_per_second(),
            nodes_per_iteration = self.stats.avg_nodes_per_iteration(),
            "search finished"
        );

        Ok(mv)
    }

    /// Single MCTS iteration: select, expand, simulate, backpropagate.
    fn iteration(&mut self) {
        let node = self.select();
        let reward = self.simulate();
        self.tree
            .backpropagate(node, reward, self.config.rollouts_per_simulation);
        self.stats.iterations += 1;

        trace!(node = %node, depth = self.tree.get(node).depth, reward, "iteration");
    }

    /// Descend from the root, replaying moves into the private board.
    ///
    /// Stops at the first never-visited child. A leaf reached with a live
    /// position is expanded, and one of its new children is entered.
    fn select(&mut self) -> NodeId {
        self.board = self.root_board;
        let mut node = self.tree.root();

        while !self.tree.get(node).is_leaf() {
            let Some(child) = self
                .selection
                .select(&self.tree, node, &self.config, &mut self.rng)
            else {
                break;
            };
            self.replay(child);
            node = child;
            if self.tree.get(child).is_unvisited() {
                return node;
            }
        }

        if self.expand(node) {
            if let Some(&child) = self.rng.choose(self.tree.children(node)) {
                self.replay(child);
                node = child;
            }
        }

        node
    }

    /// Play the move that leads to `child` on the private board.
    fn replay(&mut self, child: NodeId) {
        let mv = self.tree.get(child).mv;
        debug_assert!(self.board.is_legal(mv), "{} is not legal on the replayed board", mv);
        self.board.play(mv, &mut self.rng);
    }

    /// Add one child per legal move. Returns false on a finished game.
    fn expand(&mut self, node: NodeId) -> bool {
        if self.board.is_terminal() {
            return false;
        }

        let moves = self.board.legal_moves();
        let created = self.tree.expand(node, moves.iter());

        self.stats
            .record_expansion(created, self.tree.get(node).depth + 1);

        true
    }

    /// Total reward of the configured number of rollouts from the current
    /// board.
    fn simulate(&mut self) -> f64 {
        let rollouts = self.config.rollouts_per_simulation;
        self.stats.rollouts += u64::from(rollouts);

        if let Some(result) = self.board.winner() {
            return f64::from(rollouts) * rollout_reward(self.searcher, result);
        }

        let leaf = self.board;
        let mut total = 0.0;
        for _ in 0..rollouts {
            self.board = leaf;
            let result = self.simulation.rollout(&mut self.board, &mut self.rng);
            total += rollout_reward(self.searcher, result);
        }
        total
    }

    fn random_move(&mut self, board: &Board) -> Result<Move, SearchError> {
        self.rng
            .choose_bit(board.legal_moves().all)
            .map(|position| Move::new(position as u8))
            .ok_or(SearchError::NoLegalMoves)
    }

    /// Get search statistics.
    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Get the search tree.
    #[must_use]
    pub fn tree(&self) -> &MCTSTree {
        &self.tree
    }

    /// Get the configuration.
    pub fn config(&self) -> &MCTSConfig {
        &self.config
    }

    /// Root children as (move, total value, visits).
    pub fn root_children(&self) -> Vec<(Move, f64, u64)> {
        self.tree
            .children(self.tree.root())
            .iter()
            .map(|&child| {
                let node = self.tree.get(child);
                (node.mv, node.value, node.visits)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::IN_BOARD_MASK;
    use crate::mcts::config::SelectionMethod;

    fn uct_config(iterations: u32) -> MCTSConfig {
        MCTSConfig::default()
            .with_selection(SelectionMethod::Uct)
            .with_exploration(1.0)
            .with_max_iterations(iterations)
    }

    #[test]
    fn test_search_returns_legal_move() {
        let state = BoardState::initial();
        let legal = Board::new().legal_move_list();

        let mut search = MCTSSearch::new(uct_config(200)).unwrap();
        let mv = search.run_search(&state).unwrap();

        assert!(legal.contains(&mv));
    }

    #[test]
    fn test_search_stats() {
        let mut search = MCTSSearch::new(uct_config(50).with_rollouts(3)).unwrap();
        search.run_search(&BoardState::initial()).unwrap();

        let stats = search.stats();
        assert_eq!(stats.iterations, 50);
        assert_eq!(stats.rollouts, 150);
        assert!(stats.nodes_expanded > 0);
        assert_eq!(stats.nodes_expanded as usize, search.tree().len() - 1);
        assert_eq!(stats.max_depth, search.tree().stats().max_depth);
    }

    #[test]
    fn test_root_visits_count_rollouts() {
        let mut search = MCTSSearch::new(uct_config(40).with_rollouts(2)).unwrap();
        search.run_search(&BoardState::initial()).unwrap();

        assert_eq!(search.tree().root_node().visits, 80);
    }

    #[test]
    fn test_root_expanded_with_every_legal_move() {
        let mut search = MCTSSearch::new(uct_config(10)).unwrap();
        search.run_search(&BoardState::initial()).unwrap();

        let mut moves: Vec<Move> = search.root_children().iter().map(|c| c.0).collect();
        moves.sort();
        assert_eq!(moves, Board::new().legal_move_list());
    }

    #[test]
    fn test_visits_cover_children() {
        let mut search = MCTSSearch::new(uct_config(300)).unwrap();
        search.run_search(&BoardState::initial()).unwrap();

        let tree = search.tree();
        for (_, node) in tree.iter() {
            let child_visits: u64 = node.children.iter().map(|&c| tree.get(c).visits).sum();
            assert!(node.visits >= child_visits);
        }
    }

    #[test]
    fn test_zero_iterations_returns_legal_move() {
        let mut search = MCTSSearch::new(uct_config(0)).unwrap();
        let mv = search.run_search(&BoardState::initial()).unwrap();

        assert!(Board::new().is_legal(mv));
        assert_eq!(search.stats().iterations, 0);
        assert_eq!(search.tree().len(), 1);
    }

    #[test]
    fn test_random_player_skips_search() {
        let config = MCTSConfig::default().with_player_type(PlayerType::Random);
        let mut search = MCTSSearch::new(config).unwrap();

        for _ in 0..20 {
            let mv = search.run_search(&BoardState::initial()).unwrap();
            assert!(Board::new().is_legal(mv));
        }
        assert_eq!(search.stats().iterations, 0);
        assert_eq!(search.tree().len(), 1);
    }

    #[test]
    fn test_random_player_resets_stats() {
        let mut search = MCTSSearch::new(uct_config(30)).unwrap();
        search.run_search(&BoardState::initial()).unwrap();
        assert_eq!(search.stats().iterations, 30);

        search.config.player_type = PlayerType::Random;
        search.run_search(&BoardState::initial()).unwrap();

        assert_eq!(search.stats().iterations, 0);
        assert_eq!(search.stats().rollouts, 0);
        assert_eq!(search.stats().nodes_expanded, 0);
    }

    #[test]
    fn test_oversized_time_budget_rejected() {
        let config = MCTSConfig::default().with_time_budget(1e20);
        assert!(matches!(
            MCTSSearch::new(config),
            Err(ConfigError::InvalidTimeBudget(_))
        ));
    }

    #[test]
    fn test_terminal_state_errors() {
        let full = BoardState::new(IN_BOARD_MASK, 0, Side::Black).unwrap();
        let mut search = MCTSSearch::new(uct_config(10)).unwrap();

        assert_eq!(search.run_search(&full), Err(SearchError::NoLegalMoves));
    }

    #[test]
    fn test_stranded_state_errors() {
        let a8 = Move::from_coords(0, 0).unwrap().bit();
        let b8 = Move::from_coords(0, 1).unwrap().bit();
        let state = BoardState::new(a8, b8, Side::White).unwrap();
        let mut search = MCTSSearch::new(uct_config(10)).unwrap();

        assert_eq!(
            search.run_search(&state),
            Err(SearchError::InvalidState(BoardError::StrandedTurn(Side::White)))
        );
    }

    #[test]
    fn test_search_deterministic() {
        let config = uct_config(150).with_seed(12345);
        let mut search1 = MCTSSearch::new(config.clone()).unwrap();
        let mut search2 = MCTSSearch::new(config).unwrap();

        let state = BoardState::initial();
        let move1 = search1.run_search(&state).unwrap();
        let move2 = search2.run_search(&state).unwrap();

        assert_eq!(move1, move2);
        assert_eq!(search1.root_children(), search2.root_children());
    }

    #[test]
    fn test_terminal_leaf_reward() {
        // Black takes c8 and the game ends 3-1 for Black.
        let black = Move::from_coords(0, 0).unwrap().bit();
        let white = Move::from_coords(0, 1).unwrap().bit() | Move::from_coords(7, 7).unwrap().bit();
        let state = BoardState::new(black, white, Side::Black).unwrap();

        let mut search = MCTSSearch::new(uct_config(5).with_rollouts(2)).unwrap();
        let mv = search.run_search(&state).unwrap();

        assert_eq!(mv, Move::from_coords(0, 2).unwrap());
        // Every iteration scores a terminal win for both rollouts
        assert_eq!(search.tree().root_node().value, 10.0);
        assert_eq!(search.tree().root_node().visits, 10);
    }

    #[test]
    fn test_time_cap() {
        let config = uct_config(0).with_time_budget(0.05);
        let mut search = MCTSSearch::new(config).unwrap();

        let mv = search.run_search(&BoardState::initial()).unwrap();

        assert!(Board::new().is_legal(mv));
        assert!(search.stats().iterations > 0);
        assert!(search.stats().time_us >= 50_000);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = MCTSConfig::default().with_rollouts(0);
        assert!(matches!(MCTSSearch::new(config), Err(ConfigError::ZeroRollouts)));
    }

    #[test]
    fn test_search_as_white() {
        let mut board = Board::new();
        let mut rng = GameRng::new(4);
        board.play_random(&mut rng);
        assert_eq!(board.turn(), Side::White);

        let mut search = MCTSSearch::new(uct_config(100)).unwrap();
        let mv = search.run_search(&board.get_state()).unwrap();

        assert!(board.is_legal(mv));
    }
}
