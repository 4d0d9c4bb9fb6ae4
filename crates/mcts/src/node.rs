//! Search tree node types.
//!
//! Uses arena allocation with indices; the parent link is a plain index and
//! never owns anything.

use mosaic_core::{Player, Rewards};

/// Index into the node arena.
///
/// This is a lightweight handle that references a node in the tree.
/// Using indices instead of pointers avoids Rc/RefCell overhead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// The root node is always at index 0.
    pub const ROOT: NodeId = NodeId(0);

    /// Position of the node in the arena.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Statistics backed up through a node.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeStats {
    /// Number of rollouts that passed through this node.
    pub visit_count: u32,

    /// Discounted rewards summed per player, independent of who owns the node.
    pub reward_sum: Rewards,
}

impl NodeStats {
    /// Record one discounted rollout result.
    pub fn record(&mut self, rewards: Rewards) {
        self.visit_count += 1;
        self.reward_sum += rewards;
    }

    /// Mean reward of `player` over all visits, 0.0 if never visited.
    pub fn mean_reward(&self, player: Player) -> f64 {
        if self.visit_count == 0 {
            0.0
        } else {
            self.reward_sum[player] / self.visit_count as f64
        }
    }
}

/// A node in the search tree.
///
/// `owner` is the player to move in `state`. Children belong to the
/// opponent: ownership alternates with depth.
#[derive(Clone, Debug)]
pub struct Node<S, A> {
    /// Player to move in this state.
    pub owner: Player,

    /// Game position reached at this node. Owned exclusively by the node.
    pub state: S,

    /// Action that led here from the parent (None for root).
    pub action: Option<A>,

    /// Visit and reward statistics.
    pub stats: NodeStats,

    /// Parent node (None for root). Used for backpropagation only.
    pub parent: Option<NodeId>,

    /// Children in expansion order.
    pub children: Vec<NodeId>,
}

impl<S, A> Node<S, A> {
    /// Create the root node.
    pub fn root(owner: Player, state: S) -> Self {
        Self {
            owner,
            state,
            action: None,
            stats: NodeStats::default(),
            parent: None,
            children: Vec::new(),
        }
    }

    /// Create an unexpanded child reached by `action`.
    pub fn child(parent: NodeId, owner: Player, state: S, action: A) -> Self {
        Self {
            owner,
            state,
            action: Some(action),
            stats: NodeStats::default(),
            parent: Some(parent),
            children: Vec::new(),
        }
    }

    /// The player whose move produced this node.
    pub fn mover(&self) -> Player {
        self.owner.opponent()
    }

    pub fn is_expanded(&self) -> bool {
        !self.children.is_empty()
    }
}
