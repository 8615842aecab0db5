//! Arena-based MCTS tree.
//!
//! Uses a flat `Vec<MCTSNode>` with index-based references for efficiency,
//! cache-friendliness, and serializability. The whole arena is cleared at
//! the start of every search; nodes are never freed individually.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::node::{MCTSNode, NodeId};
use crate::board::Move;

/// Arena-based MCTS tree.
///
/// Nodes are stored in a flat vector and referenced by `NodeId` indices.
/// This avoids reference counting overhead and enables serialization.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MCTSTree {
    /// All nodes in the tree.
    nodes: Vec<MCTSNode>,

    /// The root node ID (always 0 after initialization).
    root: NodeId,
}

impl Default for MCTSTree {
    fn default() -> Self {
        Self::new()
    }
}

impl MCTSTree {
    /// Create a new tree with a root node.
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    /// Create a tree with custom initial capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut tree = Self {
            nodes: Vec::with_capacity(capacity.max(1)),
            root: NodeId::new(0),
        };
        tree.nodes.push(MCTSNode::root());
        tree
    }

    /// Get the root node ID.
    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get a node by ID.
    #[inline]
    #[must_use]
    pub fn get(&self, id: NodeId) -> &MCTSNode {
        &self.nodes[id.0 as usize]
    }

    /// Get a mutable node by ID.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut MCTSNode {
        &mut self.nodes[id.0 as usize]
    }

    /// Allocate a new node, returning its ID.
    pub fn alloc(&mut self, node: MCTSNode) -> NodeId {
        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Number of nodes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Clear the tree and reset with a new root.
    pub fn reset(&mut self) {
        self.nodes.clear();
        self.nodes.push(MCTSNode::root());
        self.root = NodeId::new(0);
    }

    /// Get the root node.
    #[must_use]
    pub fn root_node(&self) -> &MCTSNode {
        self.get(self.root)
    }

    /// Children of `id`.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.get(id).children
    }

    /// Child of `id` reached by `mv`, if expanded.
    #[must_use]
    pub fn child_for_move(&self, id: NodeId, mv: Move) -> Option<NodeId> {
        self.children(id).iter().copied().find(|&c| self.get(c).mv == mv)
    }

    /// Create one child of `parent` per move. Returns the number created.
    ///
    /// `parent` must be a leaf; each node is expanded at most once.
    pub fn expand(&mut self, parent: NodeId, moves: impl IntoIterator<Item = Move>) -> usize {
        debug_assert!(self.get(parent).is_leaf(), "{} expanded twice", parent);

        let depth = self.get(parent).depth + 1;
        let mut children: SmallVec<[NodeId; 16]> = SmallVec::new();
        for mv in moves {
            children.push(self.alloc(MCTSNode::new(mv, parent, depth)));
        }

        let count = children.len();
        self.get_mut(parent).children = children;
        count
    }

    /// Add `reward` and `visits` to `from` and every ancestor up to the root.
    pub fn backpropagate(&mut self, from: NodeId, reward: f64, visits: u32) {
        let mut current = from;
        while !current.is_none() {
            let node = self.get_mut(current);
            node.visits = node.visits.saturating_add(u64::from(visits));
            node.value += reward;
            current = node.parent;
        }
    }

    /// Iterate over all nodes.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &MCTSNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId::new(i as u32), n))
    }

    /// Get statistics about the tree.
    #[must_use]
    pub fn stats(&self) -> TreeStats {
        let max_depth = self.nodes.iter().map(|n| n.depth).max().unwrap_or(0);
        let expanded_count = self.nodes.iter().filter(|n| !n.is_leaf()).count();
        let visited_count = self.nodes.iter().filter(|n| !n.is_unvisited()).count();

        TreeStats {
            node_count: self.nodes.len(),
            max_depth,
            expanded_count,
            leaf_count: self.nodes.len() - expanded_count,
            visited_count,
        }
    }
}

/// Statistics about the MCTS tree.
#[derive(Clone, Debug, Default)]
pub struct TreeStats {
    /// Total number of nodes.
    pub node_count: usize,

    /// Maximum depth reached.
    pub max_depth: u16,

    /// Nodes with children.
    pub expanded_count: usize,

    /// Nodes without children.
    pub leaf_count: usize,

    /// Nodes with at least one rollout through them.
    pub visited_count: usize,
}

impl TreeStats {
    /// Get the branching factor (average children per expanded node).
    #[must_use]
    pub fn branching_factor(&self) -> f64 {
        if self.expanded_count == 0 {
            0.0
        } else {
            (self.node_count - 1) as f64 / self.expanded_count as f64
        }
    }
}
