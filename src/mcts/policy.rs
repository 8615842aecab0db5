//! MCTS policies for selection and simulation.
//!
//! Policies are trait-based to allow customization:
//! - `SelectionPolicy`: How to choose which child to explore (UCT, random)
//! - `SimulationPolicy`: How to play a rollout to the end of the game

use smallvec::SmallVec;

use crate::board::{Board, GameResult, Move};
use crate::core::{GameRng, Side};

use super::config::{MCTSConfig, SelectionMethod};
use super::node::NodeId;
use super::tree::MCTSTree;

// =============================================================================
// Selection Policy
// =============================================================================

/// Policy for selecting which child node to explore.
pub trait SelectionPolicy: Send + Sync {
    /// Pick a child of `node`.
    ///
    /// Returns `None` if `node` has no children.
    fn select(
        &self,
        tree: &MCTSTree,
        node: NodeId,
        config: &MCTSConfig,
        rng: &mut GameRng,
    ) -> Option<NodeId>;
}

/// UCT (Upper Confidence bound for Trees) selection policy.
///
/// Formula: value(c) / n(c) + C * sqrt(ln(N) / n(c)).
/// Unvisited children score infinity, so any unvisited child beats every
/// visited sibling. Ties at the maximum are broken uniformly at random.
#[derive(Clone, Debug, Default)]
pub struct Uct;

impl SelectionPolicy for Uct {
    fn select(
        &self,
        tree: &MCTSTree,
        node: NodeId,
        config: &MCTSConfig,
        rng: &mut GameRng,
    ) -> Option<NodeId> {
        let parent = tree.get(node);
        let ln_parent = (parent.visits.max(1) as f64).ln();

        let scored = parent.children.iter().map(|&child| {
            let stats = tree.get(child);
            let score = if stats.is_unvisited() {
                f64::INFINITY
            } else {
                stats.mean_value()
                    + config.exploration_constant * (ln_parent / stats.visits as f64).sqrt()
            };
            (child, score)
        });

        choose_max(scored, rng)
    }
}

/// Uniform random selection policy.
///
/// Ignores all statistics.
#[derive(Clone, Debug, Default)]
pub struct RandomSelection;

impl SelectionPolicy for RandomSelection {
    fn select(
        &self,
        tree: &MCTSTree,
        node: NodeId,
        _config: &MCTSConfig,
        rng: &mut GameRng,
    ) -> Option<NodeId> {
        rng.choose(tree.children(node)).copied()
    }
}

/// Boxed policy for a configured selection method.
pub fn selection_policy(method: SelectionMethod) -> Box<dyn SelectionPolicy> {
    match method {
        SelectionMethod::Uct => Box::new(Uct),
        SelectionMethod::Random => Box::new(RandomSelection),
    }
}

// =============================================================================
// Simulation Policy
// =============================================================================

/// Policy for running simulations (rollouts) from a leaf node.
pub trait SimulationPolicy: Send + Sync {
    /// Play `board` to the end of the game and return the result.
    ///
    /// The board is modified during simulation.
    fn rollout(&self, board: &mut Board, rng: &mut GameRng) -> GameResult;
}

/// Random simulation policy.
///
/// Plays uniformly random legal moves until the game ends.
#[derive(Clone, Debug, Default)]
pub struct RandomRollout;

impl SimulationPolicy for RandomRollout {
    fn rollout(&self, board: &mut Board, rng: &mut GameRng) -> GameResult {
        loop {
            if let Some(result) = board.winner() {
                return result;
            }
            board.play_random(rng);
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Reward of a finished game for `searcher`.
///
/// `((sign(searcher) * winner + 1) / 2)^3`: a loss scores 0, a draw 1/8
/// and a win 1.
#[must_use]
pub fn rollout_reward(searcher: Side, result: GameResult) -> f64 {
    let outcome = f64::from(searcher.sign()) * f64::from(result.sign());
    let scaled = (outcome + 1.0) / 2.0;
    scaled * scaled * scaled
}

/// Move of the root child holding the largest total value.
///
/// Ranks by accumulated value, not mean value. Ties are broken uniformly at
/// random. Returns `None` if the root has no children.
pub fn best_root_move(tree: &MCTSTree, rng: &mut GameRng) -> Option<Move> {
    let root = tree.root();
    let scored = tree
        .children(root)
        .iter()
        .map(|&child| (child, tree.get(child).value));

    choose_max(scored, rng).map(|child| tree.get(child).mv)
}

/// Uniform choice among the items sharing the maximum score.
fn choose_max(
    scored: impl Iterator<Item = (NodeId, f64)>,
    rng: &mut GameRng,
) -> Option<NodeId> {
    let mut best = f64::NEG_INFINITY;
    let mut ties: SmallVec<[NodeId; 16]> = SmallVec::new();

    for (id, score) in scored {
        if score > best {
            best = score;
            ties.clear();
            ties.push(id);
        } else if score == best {
            ties.push(id);
        }
    }

    rng.choose(&ties).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardState;

    /// Root with three children: two visited, one unvisited.
    fn make_test_tree() -> MCTSTree {
        let mut tree = MCTSTree::new();
        let root = tree.root();
        tree.expand(root, [Move::new(22), Move::new(32), Move::new(38)]);

        let children = tree.children(root).to_vec();
        tree.backpropagate(children[0], 80.0, 100);
        tree.backpropagate(children[1], 7.0, 10);
        tree
    }

    #[test]
    fn test_uct_selects_unvisited() {
        let tree = make_test_tree();
        let config = MCTSConfig::default();
        let unvisited = tree.children(tree.root())[2];

        for seed in 0..20 {
            let mut rng = GameRng::new(seed);
            assert_eq!(Uct.select(&tree, tree.root(), &config, &mut rng), Some(unvisited));
        }
    }

    #[test]
    fn test_uct_all_visited() {
        let mut tree = make_test_tree();
        let root = tree.root();
        let third = tree.children(root)[2];
        tree.backpropagate(third, 2.0, 5);

        let mut rng = GameRng::new(0);

        // With no exploration the best mean wins: 0.8 vs 0.7 vs 0.4
        let greedy = MCTSConfig::default().with_exploration(0.0);
        assert_eq!(
            Uct.select(&tree, root, &greedy, &mut rng),
            Some(tree.children(root)[0])
        );

        // With heavy exploration the least visited child wins
        let explore = MCTSConfig::default().with_exploration(100.0);
        assert_eq!(Uct.select(&tree, root, &explore, &mut rng), Some(third));
    }

    #[test]
    fn test_uct_ties_between_unvisited() {
        let mut tree = MCTSTree::new();
        let root = tree.root();
        tree.expand(root, [Move::new(22), Move::new(32)]);
        let config = MCTSConfig::default();

        let mut rng = GameRng::new(5);
        let mut counts = [0u32; 2];
        for _ in 0..400 {
            let picked = Uct.select(&tree, root, &config, &mut rng).unwrap();
            counts[(picked.raw() - 1) as usize] += 1;
        }
        assert!(counts.iter().all(|&c| c > 120), "{:?}", counts);
    }

    #[test]
    fn test_select_without_children() {
        let tree = MCTSTree::new();
        let config = MCTSConfig::default();
        let mut rng = GameRng::new(0);

        assert_eq!(Uct.select(&tree, tree.root(), &config, &mut rng), None);
        assert_eq!(RandomSelection.select(&tree, tree.root(), &config, &mut rng), None);
    }

    #[test]
    fn test_random_selection_ignores_stats() {
        let tree = make_test_tree();
        let config = MCTSConfig::default();
        let mut rng = GameRng::new(1);

        let mut seen = [false; 3];
        for _ in 0..100 {
            let picked = RandomSelection.select(&tree, tree.root(), &config, &mut rng).unwrap();
            seen[(picked.raw() - 1) as usize] = true;
        }
        assert_eq!(seen, [true, true, true]);
    }

    #[test]
    fn test_rollout_reward() {
        let win = GameResult::Winner(Side::Black);
        let loss = GameResult::Winner(Side::White);

        assert_eq!(rollout_reward(Side::Black, win), 1.0);
        assert_eq!(rollout_reward(Side::Black, loss), 0.0);
        assert_eq!(rollout_reward(Side::White, loss), 1.0);
        assert_eq!(rollout_reward(Side::White, win), 0.0);
        assert_eq!(rollout_reward(Side::Black, GameResult::Draw), 0.125);
        assert_eq!(rollout_reward(Side::White, GameResult::Draw), 0.125);
    }

    #[test]
    fn test_random_rollout_reaches_terminal() {
        let mut board = Board::new();
        let mut rng = GameRng::new(17);

        let result = RandomRollout.rollout(&mut board, &mut rng);

        assert!(board.is_terminal());
        assert_eq!(board.winner(), Some(result));
    }

    #[test]
    fn test_random_rollout_on_terminal_board() {
        let full = BoardState::new(crate::board::IN_BOARD_MASK, 0, Side::Black).unwrap();
        let mut board = Board::from_state(full).unwrap();
        let mut rng = GameRng::new(0);

        assert_eq!(RandomRollout.rollout(&mut board, &mut rng), GameResult::Winner(Side::Black));
    }

    #[test]
    fn test_best_root_move_by_total_value() {
        let mut tree = MCTSTree::new();
        let root = tree.root();
        tree.expand(root, [Move::new(22), Move::new(32)]);
        let children = tree.children(root).to_vec();

        // Higher mean (1.0) but lower total than the other child (0.5 mean)
        tree.backpropagate(children[0], 3.0, 3);
        tree.backpropagate(children[1], 5.0, 10);

        let mut rng = GameRng::new(0);
        assert_eq!(best_root_move(&tree, &mut rng), Some(Move::new(32)));
    }

    #[test]
    fn test_best_root_move_empty_root() {
        let tree = MCTSTree::new();
        let mut rng = GameRng::new(0);
        assert_eq!(best_root_move(&tree, &mut rng), None);
    }

    #[test]
    fn test_selection_policy_factory() {
        let tree = make_test_tree();
        let config = MCTSConfig::default();
        let mut rng = GameRng::new(0);
        let unvisited = tree.children(tree.root())[2];

        let uct = selection_policy(SelectionMethod::Uct);
        assert_eq!(uct.select(&tree, tree.root(), &config, &mut rng), Some(unvisited));

        let random = selection_policy(SelectionMethod::Random);
        assert!(random.select(&tree, tree.root(), &config, &mut rng).is_some());
    }
}
