//! Monte Carlo Tree Search controller.
//!
//! Each call builds a fresh tree rooted at the current position, runs
//! select -> expand -> simulate -> backpropagate until the deadline (or the
//! optional iteration cap) is reached, and then picks a root child with a
//! two-level Q-value tie-break.

use crate::{
    bandit::Bandit,
    config::{SearchConfig, SearchMode},
    heuristic::structural_order,
    node::NodeId,
    qfunc::QFunction,
    rollout::{Rollout, Simulator},
    tree::Tree,
};
use mosaic_core::{Game, MosaicError, Player, Result, TileAction};
use rand::seq::SliceRandom;
use rand::Rng;
use std::cmp::Ordering;
use std::marker::PhantomData;
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};

/// Per-child statistics at the root after a search.
#[derive(Clone, Debug, PartialEq)]
pub struct ChildSummary<A> {
    pub action: A,
    pub visits: u32,
    /// Primary Q-value from the root player's point of view.
    pub primary_q: f64,
}

/// Result of an MCTS search.
#[derive(Clone, Debug)]
pub struct SearchResult<A> {
    /// Chosen move.
    pub best_action: A,

    /// Completed select/simulate/backpropagate iterations.
    pub iterations: u32,

    /// Nodes allocated in the tree.
    pub tree_size: usize,

    /// Wall-clock time spent, including the final choice.
    pub elapsed: Duration,

    /// Statistics of every root child in expansion order.
    pub root_children: Vec<ChildSummary<A>>,
}

/// Monte Carlo Tree Search over a self-play tree.
///
/// Generic over:
/// - `G`: The game being played
/// - `R`: The random number generator used for selection
pub struct Mcts<G: Game, R: Rng> {
    config: SearchConfig,
    simulator: Simulator<R>,
    rng: R,
    _game: PhantomData<G>,
}

impl<G, R> Mcts<G, R>
where
    G: Game,
    R: Rng,
{
    /// Create a new MCTS instance.
    pub fn new(config: SearchConfig, simulator: Simulator<R>, rng: R) -> Self {
        Self {
            config,
            simulator,
            rng,
            _game: PhantomData,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Search for `player`'s move from `state`, choosing among `moves`.
    ///
    /// The root is expanded before the loop starts, so a zero budget still
    /// yields a move (picked by the structural tie-break alone).
    pub fn search(
        &mut self,
        game: &G,
        state: &G::State,
        player: Player,
        moves: Vec<G::Action>,
        time_budget: Duration,
    ) -> Result<SearchResult<G::Action>> {
        if self.config.mode == SearchMode::Minimax {
            return Err(MosaicError::InvalidConfig(
                "MCTS controller cannot run in minimax mode".to_string(),
            ));
        }
        if moves.is_empty() {
            return Err(MosaicError::NoLegalMoves);
        }

        let start = Instant::now();
        let deadline = start.checked_add(time_budget);

        let mut tree = Tree::new(player, state.clone());
        tree.expand(game, NodeId::ROOT, Some(moves), &self.config.pruning)?;
        if tree.children(NodeId::ROOT).is_empty() {
            return Err(MosaicError::NoLegalMoves);
        }

        let mut iterations = 0;
        while !self.budget_exhausted(iterations, deadline) {
            match self.config.mode {
                SearchMode::MctsLight => self.light_iteration(game, &mut tree)?,
                _ => self.full_iteration(game, &mut tree)?,
            }
            iterations += 1;
        }

        let best = choose_best_child(
            &tree,
            NodeId::ROOT,
            self.config.primary_q,
            self.config.secondary_q,
        );
        let result = self.summarize(&tree, best, iterations, start.elapsed());

        debug!(
            mode = ?self.config.mode,
            iterations,
            tree_size = result.tree_size,
            elapsed_ms = result.elapsed.as_millis() as u64,
            "MCTS search complete"
        );
        if !time_budget.is_zero() && result.elapsed > time_budget + time_budget / 2 {
            warn!(
                budget_ms = time_budget.as_millis() as u64,
                elapsed_ms = result.elapsed.as_millis() as u64,
                "MCTS search overran its time budget"
            );
        }

        Ok(result)
    }

    fn budget_exhausted(&self, iterations: u32, deadline: Option<Instant>) -> bool {
        if let Some(cap) = self.config.max_iterations {
            if iterations >= cap {
                return true;
            }
        }
        deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }

    /// One iteration of the full variant.
    fn full_iteration(&mut self, game: &G, tree: &mut Tree<G::State, G::Action>) -> Result<()> {
        let leaf = self.select(tree);

        // Expand only on the second revisit of a leaf, and never past the
        // end of the round.
        let mut target = leaf;
        let node = tree.get(leaf);
        if node.stats.visit_count > 1 && game.has_remaining_material(&node.state) {
            tree.expand(game, leaf, None, &self.config.pruning)?;
            if let Some(&child) = tree.children(leaf).choose(&mut self.rng) {
                target = child;
            }
        }

        let rollout = self.simulate(game, tree, target)?;
        self.back_up(tree, target, rollout);
        Ok(())
    }

    /// One iteration of the light variant: root children only.
    fn light_iteration(&mut self, game: &G, tree: &mut Tree<G::State, G::Action>) -> Result<()> {
        let child =
            self.config
                .bandit
                .select_child(tree, NodeId::ROOT, self.config.primary_q, &mut self.rng);
        let rollout = self.simulate(game, tree, child)?;
        self.back_up(tree, child, rollout);
        Ok(())
    }

    /// Descend with the bandit policy until reaching a node without children.
    fn select(&mut self, tree: &Tree<G::State, G::Action>) -> NodeId {
        let mut current = NodeId::ROOT;
        while tree.get(current).is_expanded() {
            current =
                self.config
                    .bandit
                    .select_child(tree, current, self.config.primary_q, &mut self.rng);
        }
        current
    }

    fn simulate(
        &self,
        game: &G,
        tree: &Tree<G::State, G::Action>,
        id: NodeId,
    ) -> Result<Rollout> {
        let node = tree.get(id);
        self.simulator.simulate(game, &node.state, node.owner)
    }

    /// Discount a rollout and add it to the tree.
    ///
    /// The full variant updates every ancestor; the light variant only the
    /// simulated node and its parent (the root).
    fn back_up(&self, tree: &mut Tree<G::State, G::Action>, id: NodeId, rollout: Rollout) {
        let rewards = rollout
            .rewards
            .discounted(self.config.discount_factor, rollout.move_count);
        trace!(
            node = id.index(),
            moves = rollout.move_count,
            %rewards,
            "backing up rollout"
        );
        match self.config.mode {
            SearchMode::MctsLight => tree.update_leaf_and_parent(id, rewards),
            _ => tree.backpropagate(id, rewards),
        }
    }

    fn summarize(
        &self,
        tree: &Tree<G::State, G::Action>,
        best: NodeId,
        iterations: u32,
        elapsed: Duration,
    ) -> SearchResult<G::Action> {
        let root_children = tree
            .children(NodeId::ROOT)
            .iter()
            .filter_map(|&id| {
                let child = tree.get(id);
                child.action.clone().map(|action| ChildSummary {
                    action,
                    visits: child.stats.visit_count,
                    primary_q: self.config.primary_q.value(child),
                })
            })
            .collect();

        SearchResult {
            // INVARIANT: every non-root node carries the action that created it
            best_action: tree
                .get(best)
                .action
                .clone()
                .expect("BUG: best child has no originating action"),
            iterations,
            tree_size: tree.len(),
            elapsed,
            root_children,
        }
    }
}

/// Pick the best child of `node`.
///
/// Children are ranked by `primary`; exact ties fall to `secondary` (when
/// given) and then to the structural order of their moves: more tiles into
/// a pattern line, then fewer onto the floor. Remaining ties keep the
/// earliest child.
///
/// # Panics
/// Panics if `node` has no children.
pub fn choose_best_child<S, A: TileAction>(
    tree: &Tree<S, A>,
    node: NodeId,
    primary: QFunction,
    secondary: Option<QFunction>,
) -> NodeId {
    let children = tree.children(node);
    let (&first, rest) = children
        .split_first()
        .expect("BUG: choose_best_child called on node without children");

    let mut best = first;
    for &id in rest {
        if compare_children(tree, id, best, primary, secondary) == Ordering::Greater {
            best = id;
        }
    }
    best
}

fn compare_children<S, A: TileAction>(
    tree: &Tree<S, A>,
    a: NodeId,
    b: NodeId,
    primary: QFunction,
    secondary: Option<QFunction>,
) -> Ordering {
    let (a, b) = (tree.get(a), tree.get(b));
    let by_q = |q: QFunction| q.value(a).partial_cmp(&q.value(b)).unwrap_or(Ordering::Equal);

    by_q(primary)
        .then_with(|| secondary.map_or(Ordering::Equal, by_q))
        .then_with(|| match (&a.action, &b.action) {
            (Some(x), Some(y)) => structural_order(x, y),
            _ => Ordering::Equal,
        })
}
