//! Multi-armed bandit policies used to descend the tree.
//!
//! Every policy honours the same contract: a child that has never been
//! visited is returned before any scoring happens, so each child is
//! sampled once before the statistics are trusted.

use crate::node::NodeId;
use crate::qfunc::QFunction;
use crate::tree::Tree;
use mosaic_core::{MosaicError, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Strategy for picking the child to descend into.
pub trait Bandit {
    /// Pick a child of `node`, scoring children with `q_func`.
    ///
    /// # Panics
    /// Panics if `node` has no children. Callers expand before selecting.
    fn select_child<S, A, R>(
        &self,
        tree: &Tree<S, A>,
        node: NodeId,
        q_func: QFunction,
        rng: &mut R,
    ) -> NodeId
    where
        R: Rng + ?Sized;
}

/// First unvisited child, if any.
fn first_unvisited<S, A>(tree: &Tree<S, A>, children: &[NodeId]) -> Option<NodeId> {
    children
        .iter()
        .copied()
        .find(|&id| tree.get(id).stats.visit_count == 0)
}

fn expanded_children<S, A>(tree: &Tree<S, A>, node: NodeId) -> &[NodeId] {
    let children = tree.children(node);
    assert!(
        !children.is_empty(),
        "BUG: select_child called on node without children"
    );
    children
}

/// Upper confidence bound (UCB1) selection.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ucb1 {
    /// Weight of the exploration term.
    pub exploration_constant: f64,
}

impl Ucb1 {
    pub fn new(exploration_constant: f64) -> Self {
        Self {
            exploration_constant,
        }
    }

    /// UCB1 score: `q + C * sqrt(ln(N_parent) / N_child)`.
    ///
    /// An unvisited child scores +infinity.
    pub fn score(&self, parent_visits: u32, q_value: f64, child_visits: u32) -> f64 {
        if child_visits == 0 {
            return f64::INFINITY;
        }
        let exploration = ((parent_visits as f64).ln() / child_visits as f64).sqrt();
        q_value + self.exploration_constant * exploration
    }
}

impl Bandit for Ucb1 {
    fn select_child<S, A, R>(
        &self,
        tree: &Tree<S, A>,
        node: NodeId,
        q_func: QFunction,
        _rng: &mut R,
    ) -> NodeId
    where
        R: Rng + ?Sized,
    {
        let children = expanded_children(tree, node);
        if let Some(unvisited) = first_unvisited(tree, children) {
            return unvisited;
        }

        let parent_visits = tree.get(node).stats.visit_count;
        let mut best = children[0];
        let mut best_score = f64::NEG_INFINITY;

        // Strict comparison: the first child reaching the maximum wins.
        for &id in children {
            let child = tree.get(id);
            let score = self.score(parent_visits, q_func.value(child), child.stats.visit_count);
            if score > best_score {
                best_score = score;
                best = id;
            }
        }
        best
    }
}

/// Epsilon-greedy selection.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EpsilonGreedy {
    /// Probability of picking a uniformly random child.
    pub epsilon: f64,
}

impl EpsilonGreedy {
    pub fn new(epsilon: f64) -> Self {
        Self { epsilon }
    }
}

impl Bandit for EpsilonGreedy {
    fn select_child<S, A, R>(
        &self,
        tree: &Tree<S, A>,
        node: NodeId,
        q_func: QFunction,
        rng: &mut R,
    ) -> NodeId
    where
        R: Rng + ?Sized,
    {
        let children = expanded_children(tree, node);
        if let Some(unvisited) = first_unvisited(tree, children) {
            return unvisited;
        }

        if rng.gen::<f64>() < self.epsilon {
            // INVARIANT: children is non-empty (checked above)
            return *children
                .choose(rng)
                .expect("BUG: choose on non-empty children returned None");
        }

        let mut best = children[0];
        let mut best_q = f64::NEG_INFINITY;
        for &id in children {
            let q = q_func.value(tree.get(id));
            if q > best_q {
                best_q = q;
                best = id;
            }
        }
        best
    }
}

/// Configurable bandit policy.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BanditPolicy {
    Ucb1(Ucb1),
    EpsilonGreedy(EpsilonGreedy),
}

impl BanditPolicy {
    pub fn ucb1(exploration_constant: f64) -> Self {
        BanditPolicy::Ucb1(Ucb1::new(exploration_constant))
    }

    pub fn epsilon_greedy(epsilon: f64) -> Self {
        BanditPolicy::EpsilonGreedy(EpsilonGreedy::new(epsilon))
    }

    /// Check the policy parameters.
    pub fn validate(&self) -> Result<()> {
        match self {
            BanditPolicy::Ucb1(ucb) if !(ucb.exploration_constant >= 0.0) => {
                Err(MosaicError::InvalidConfig(format!(
                    "exploration constant {} must be non-negative",
                    ucb.exploration_constant
                )))
            }
            BanditPolicy::EpsilonGreedy(eg) if !(0.0..=1.0).contains(&eg.epsilon) => {
                Err(MosaicError::InvalidConfig(format!(
                    "epsilon {} is outside [0, 1]",
                    eg.epsilon
                )))
            }
            _ => Ok(()),
        }
    }
}

impl Default for BanditPolicy {
    fn default() -> Self {
        BanditPolicy::ucb1(0.5)
    }
}

impl Bandit for BanditPolicy {
    fn select_child<S, A, R>(
        &self,
        tree: &Tree<S, A>,
        node: NodeId,
        q_func: QFunction,
        rng: &mut R,
    ) -> NodeId
    where
        R: Rng + ?Sized,
    {
        match self {
            BanditPolicy::Ucb1(ucb) => ucb.select_child(tree, node, q_func, rng),
            BanditPolicy::EpsilonGreedy(eg) => eg.select_child(tree, node, q_func, rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pruning::PruningRules;
    use crate::testing::{ScriptedAction, ScriptedGame, ScriptedState};
    use mosaic_core::{Player, Rewards};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn expanded_tree(size: usize) -> Tree<ScriptedState, ScriptedAction> {
        let game = ScriptedGame::with_menu_size(size);
        let mut tree = Tree::new(Player::First, ScriptedState::new(5));
        tree.expand(&game, NodeId::ROOT, None, &PruningRules::disabled())
            .unwrap();
        tree
    }

    /// Give each root child `visits[i]` visits with First scoring `rewards[i]` per visit.
    fn visit_children(tree: &mut Tree<ScriptedState, ScriptedAction>, visits: &[u32], rewards: &[f64]) {
        let children = tree.children(NodeId::ROOT).to_vec();
        for (i, id) in children.into_iter().enumerate() {
            for _ in 0..visits[i] {
                tree.backpropagate(id, Rewards::new(rewards[i], 0.0));
            }
        }
    }

    #[test]
    fn test_ucb_returns_unvisited_first() {
        let mut tree = expanded_tree(3);
        visit_children(&mut tree, &[5, 0, 2], &[100.0, 0.0, 50.0]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let chosen = Ucb1::new(0.5).select_child(&tree, NodeId::ROOT, QFunction::Average, &mut rng);
        assert_eq!(chosen, tree.children(NodeId::ROOT)[1]);
    }

    #[test]
    fn test_ucb_prefers_higher_q() {
        let mut tree = expanded_tree(3);
        visit_children(&mut tree, &[4, 4, 4], &[1.0, 9.0, 3.0]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let chosen = Ucb1::new(0.5).select_child(&tree, NodeId::ROOT, QFunction::Average, &mut rng);
        assert_eq!(chosen, tree.children(NodeId::ROOT)[1]);
    }

    #[test]
    fn test_ucb_tie_goes_to_first() {
        let mut tree = expanded_tree(3);
        visit_children(&mut tree, &[2, 2, 2], &[5.0, 5.0, 5.0]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let chosen = Ucb1::new(0.5).select_child(&tree, NodeId::ROOT, QFunction::Average, &mut rng);
        assert_eq!(chosen, tree.children(NodeId::ROOT)[0]);
    }

    #[test]
    fn test_ucb_exploration_favours_rarely_visited() {
        let mut tree = expanded_tree(2);
        visit_children(&mut tree, &[50, 1], &[1.0, 0.9]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let chosen = Ucb1::new(2.0).select_child(&tree, NodeId::ROOT, QFunction::Average, &mut rng);
        assert_eq!(chosen, tree.children(NodeId::ROOT)[1]);
    }

    #[test]
    fn test_epsilon_zero_is_greedy() {
        let mut tree = expanded_tree(3);
        visit_children(&mut tree, &[1, 1, 1], &[2.0, 1.0, 7.0]);
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        for _ in 0..20 {
            let chosen =
                EpsilonGreedy::new(0.0).select_child(&tree, NodeId::ROOT, QFunction::Average, &mut rng);
            assert_eq!(chosen, tree.children(NodeId::ROOT)[2]);
        }
    }

    #[test]
    fn test_epsilon_one_explores() {
        let mut tree = expanded_tree(4);
        visit_children(&mut tree, &[1, 1, 1, 1], &[9.0, 1.0, 1.0, 1.0]);
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        let picks: std::collections::HashSet<NodeId> = (0..200)
            .map(|_| {
                EpsilonGreedy::new(1.0).select_child(&tree, NodeId::ROOT, QFunction::Average, &mut rng)
            })
            .collect();
        assert!(picks.len() > 1);
    }

    #[test]
    #[should_panic(expected = "BUG")]
    fn test_select_on_childless_node_panics() {
        let tree: Tree<ScriptedState, ScriptedAction> =
            Tree::new(Player::First, ScriptedState::new(1));
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        Ucb1::new(0.5).select_child(&tree, NodeId::ROOT, QFunction::Average, &mut rng);
    }

    #[test]
    fn test_policy_validation() {
        assert!(BanditPolicy::ucb1(0.5).validate().is_ok());
        assert!(BanditPolicy::ucb1(-1.0).validate().is_err());
        assert!(BanditPolicy::epsilon_greedy(0.1).validate().is_ok());
        assert!(BanditPolicy::epsilon_greedy(1.5).validate().is_err());
    }

    proptest! {
        /// Any unvisited child wins over arbitrary statistics, for both policies.
        #[test]
        fn prop_unvisited_first(
            visits in proptest::collection::vec(0u32..6, 1..8),
            rewards in proptest::collection::vec(-50.0f64..50.0, 8),
            epsilon in 0.0f64..=1.0,
            seed in any::<u64>(),
        ) {
            let mut tree = expanded_tree(visits.len());
            visit_children(&mut tree, &visits, &rewards);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let any_unvisited = visits.contains(&0);

            for policy in [BanditPolicy::ucb1(0.5), BanditPolicy::epsilon_greedy(epsilon)] {
                for q in [QFunction::Average, QFunction::Aggressive] {
                    let chosen = policy.select_child(&tree, NodeId::ROOT, q, &mut rng);
                    if any_unvisited {
                        prop_assert_eq!(tree.get(chosen).stats.visit_count, 0);
                    }
                }
            }
        }

        /// Raising the parent's visit count never lowers a child's UCB score.
        #[test]
        fn prop_ucb_monotone_in_parent_visits(
            q in -100.0f64..100.0,
            child_visits in 1u32..1000,
            parent_visits in 1u32..10_000,
            extra in 0u32..10_000,
            c in 0.0f64..4.0,
        ) {
            let ucb = Ucb1::new(c);
            let before = ucb.score(parent_visits, q, child_visits);
            let after = ucb.score(parent_visits + extra, q, child_visits);
            prop_assert!(after >= before);
        }
    }
}
