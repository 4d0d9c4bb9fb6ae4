//! Arena-allocated search tree.
//!
//! A tree lives for exactly one top-level decision. Dropping it releases
//! every copied game state at once.

use crate::node::{Node, NodeId};
use crate::pruning::PruningRules;
use mosaic_core::{Game, Player, Result, Rewards, TileAction};

/// Arena-allocated search tree.
///
/// Nodes are stored in a contiguous vector and referenced by index.
/// Children are owned through the arena; the parent link is only an index.
#[derive(Debug)]
pub struct Tree<S, A> {
    nodes: Vec<Node<S, A>>,
}

impl<S, A> Tree<S, A> {
    /// Create a tree holding a single unexpanded root.
    pub fn new(owner: Player, state: S) -> Self {
        Self {
            nodes: vec![Node::root(owner, state)],
        }
    }

    /// Get a reference to a node by ID.
    ///
    /// # Panics
    /// Panics if the NodeId is invalid.
    pub fn get(&self, id: NodeId) -> &Node<S, A> {
        &self.nodes[id.0]
    }

    /// Get a mutable reference to a node by ID.
    ///
    /// # Panics
    /// Panics if the NodeId is invalid.
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node<S, A> {
        &mut self.nodes[id.0]
    }

    /// Children of a node in expansion order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.get(id).children
    }

    /// Get the number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree is empty (never true, the root always exists).
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get the root node.
    pub fn root(&self) -> &Node<S, A> {
        self.get(NodeId::ROOT)
    }

    fn add(&mut self, node: Node<S, A>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Add `rewards` and one visit to `id` and every ancestor up to the root.
    pub fn backpropagate(&mut self, id: NodeId, rewards: Rewards) {
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.get_mut(node_id);
            node.stats.record(rewards);
            current = node.parent;
        }
    }

    /// Add `rewards` and one visit to `id` and its immediate parent only.
    pub fn update_leaf_and_parent(&mut self, id: NodeId, rewards: Rewards) {
        let node = self.get_mut(id);
        node.stats.record(rewards);
        if let Some(parent) = node.parent {
            self.get_mut(parent).stats.record(rewards);
        }
    }

    /// Expand a node with one child per (pruned) legal move.
    ///
    /// Moves come from `moves` when given, otherwise from the game for the
    /// node's owner. Each child holds its own copy of the post-move state
    /// and belongs to the opponent. Returns the number of children added,
    /// which is 0 for a node that was already expanded.
    pub fn expand<G>(
        &mut self,
        game: &G,
        id: NodeId,
        moves: Option<Vec<A>>,
        rules: &PruningRules,
    ) -> Result<usize>
    where
        G: Game<State = S, Action = A>,
        A: TileAction,
    {
        let node = self.get(id);
        if node.is_expanded() {
            return Ok(0);
        }

        let owner = node.owner;
        let candidates = match moves {
            Some(moves) => moves,
            None => game.legal_actions(&node.state, owner),
        };

        let mut children = Vec::new();
        for action in rules.prune(candidates) {
            let next = game.apply(&node.state, owner, &action)?;
            children.push(Node::child(id, owner.opponent(), next, action));
        }

        let ids: Vec<NodeId> = children.into_iter().map(|child| self.add(child)).collect();
        let added = ids.len();
        self.get_mut(id).children = ids;
        Ok(added)
    }
}
