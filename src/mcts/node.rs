//! MCTS node structure.
//!
//! Uses arena-based allocation with index references (NodeId). A node only
//! points up to its parent for backpropagation; children are owned by the
//! arena and listed by id.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::board::Move;

/// Index into the MCTSTree node arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel value representing no node.
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Create a new node ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Check if this is the NONE sentinel.
    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    /// Get the raw index value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_none() {
            write!(f, "NodeId(NONE)")
        } else {
            write!(f, "NodeId({})", self.0)
        }
    }
}

/// A node in the MCTS tree.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MCTSNode {
    /// Move that led here from the parent ([`Move::NONE`] for the root).
    pub mv: Move,

    /// Parent node (NONE for root).
    pub parent: NodeId,

    /// Depth in tree (root = 0).
    pub depth: u16,

    /// Rollouts counted through this node.
    pub visits: u64,

    /// Total reward accumulated through this node.
    pub value: f64,

    /// One child per legal move at expansion time.
    /// SmallVec covers the usual Othello branching factor without a heap
    /// allocation.
    pub children: SmallVec<[NodeId; 16]>,
}

impl MCTSNode {
    /// Create a new node.
    pub fn new(mv: Move, parent: NodeId, depth: u16) -> Self {
        Self {
            mv,
            parent,
            depth,
            visits: 0,
            value: 0.0,
            children: SmallVec::new(),
        }
    }

    /// Create a root node.
    pub fn root() -> Self {
        Self::new(Move::NONE, NodeId::NONE, 0)
    }

    /// Check if this is the root.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Check if this node has not been expanded.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Check if no rollout has passed through this node.
    #[must_use]
    pub fn is_unvisited(&self) -> bool {
        self.visits == 0
    }

    /// Mean reward per rollout, 0 when unvisited.
    #[must_use]
    pub fn mean_value(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.value / self.visits as f64
        }
    }
}
