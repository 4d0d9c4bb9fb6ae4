//! Depth-limited alpha-beta search with rollout leaf evaluation.
//!
//! A node is scored by the reward of the player who moved into it, signed
//! so that the first player maximizes and the second minimizes: `r0` after
//! a first-player move, `-r1` after a second-player move. Equal scores fall
//! back to the `r0 - r1` differential. Leaf values come from randomized
//! rollouts, which makes the search non-deterministic across seeds and the
//! alpha-beta cutoffs only approximate.

use crate::{
    node::NodeId,
    pruning::PruningRules,
    rollout::Simulator,
    tree::Tree,
};
use mosaic_core::{Game, MosaicError, Player, Result, Rewards};
use rand::Rng;
use std::marker::PhantomData;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Depth used when the position is small enough to search to the end of the round.
pub const UNBOUNDED_DEPTH: u32 = 100;

/// Search depth for a root with `branching` children.
pub fn depth_for_branching(branching: usize) -> u32 {
    match branching {
        b if b > 17 => 0,
        b if b > 7 => 1,
        _ => UNBOUNDED_DEPTH,
    }
}

/// Result of a minimax search.
#[derive(Clone, Debug)]
pub struct MinimaxResult<A> {
    pub best_action: A,

    /// Depth chosen from the root branching factor.
    pub depth: u32,

    /// Number of alpha-beta calls, leaves included.
    pub nodes_visited: u64,

    /// Rollout rewards backing the chosen line.
    pub best_rewards: Rewards,

    pub elapsed: Duration,
}

/// Alpha-beta searcher sharing the rollout engine with MCTS.
pub struct Minimax<G: Game, R: Rng> {
    simulator: Simulator<R>,
    pruning: PruningRules,
    _game: PhantomData<G>,
}

impl<G, R> Minimax<G, R>
where
    G: Game,
    R: Rng,
{
    pub fn new(simulator: Simulator<R>, pruning: PruningRules) -> Self {
        Self {
            simulator,
            pruning,
            _game: PhantomData,
        }
    }

    /// Choose `player`'s move from `state` among `moves`.
    ///
    /// Every root child is searched to the full depth with a fresh window.
    pub fn search(
        &self,
        game: &G,
        state: &G::State,
        player: Player,
        moves: Vec<G::Action>,
    ) -> Result<MinimaxResult<G::Action>> {
        if moves.is_empty() {
            return Err(MosaicError::NoLegalMoves);
        }

        let start = Instant::now();
        let mut tree = Tree::new(player, state.clone());
        tree.expand(game, NodeId::ROOT, Some(moves), &self.pruning)?;

        let root_children = tree.children(NodeId::ROOT).to_vec();
        let depth = depth_for_branching(root_children.len());
        let mut nodes_visited = 0;

        let mut best: Option<(NodeId, f64, Rewards)> = None;
        for child in root_children {
            let (score, rewards) = self.alpha_beta(
                game,
                &mut tree,
                child,
                depth,
                f64::NEG_INFINITY,
                f64::INFINITY,
                &mut nodes_visited,
            )?;
            let better = match &best {
                None => true,
                Some((_, best_score, best_rewards)) => {
                    prefers(player, score, &rewards, *best_score, best_rewards)
                }
            };
            if better {
                best = Some((child, score, rewards));
            }
        }

        let (best_child, _, best_rewards) = best.ok_or(MosaicError::NoLegalMoves)?;
        let best_action = tree
            .get(best_child)
            .action
            .clone()
            .ok_or(MosaicError::NoLegalMoves)?;
        let elapsed = start.elapsed();

        debug!(
            %player,
            depth,
            nodes_visited,
            tree_size = tree.len(),
            %best_rewards,
            elapsed_ms = elapsed.as_millis() as u64,
            "minimax search complete"
        );

        Ok(MinimaxResult {
            best_action,
            depth,
            nodes_visited,
            best_rewards,
            elapsed,
        })
    }

    /// Score `id` for the player to move there.
    ///
    /// Returns the mover's signed score together with the rollout rewards
    /// backing it, so callers can tie-break on the raw differential.
    #[allow(clippy::too_many_arguments)]
    fn alpha_beta(
        &self,
        game: &G,
        tree: &mut Tree<G::State, G::Action>,
        id: NodeId,
        depth: u32,
        mut alpha: f64,
        mut beta: f64,
        nodes_visited: &mut u64,
    ) -> Result<(f64, Rewards)> {
        *nodes_visited += 1;

        if depth == 0 || !game.has_remaining_material(&tree.get(id).state) {
            return self.evaluate(game, tree, id);
        }

        tree.expand(game, id, None, &self.pruning)?;
        let children = tree.children(id).to_vec();
        if children.is_empty() {
            return self.evaluate(game, tree, id);
        }

        let to_move = tree.get(id).owner;
        let maximizing = to_move == Player::First;
        let mut best: Option<(f64, Rewards)> = None;

        for child in children {
            let (score, rewards) =
                self.alpha_beta(game, tree, child, depth - 1, alpha, beta, nodes_visited)?;
            let better = match &best {
                None => true,
                Some((best_score, best_rewards)) => {
                    prefers(to_move, score, &rewards, *best_score, best_rewards)
                }
            };
            if better {
                best = Some((score, rewards));
            }

            if maximizing {
                alpha = alpha.max(score);
            } else {
                beta = beta.min(score);
            }
            if beta <= alpha {
                trace!(node = id.index(), alpha, beta, "alpha-beta cutoff");
                break;
            }
        }

        // INVARIANT: children is non-empty, so the loop ran at least once
        let (_, rewards) = best.expect("BUG: alpha-beta finished without scoring a child");
        Ok((mover_score(tree.get(id).mover(), &rewards), rewards))
    }

    fn evaluate(
        &self,
        game: &G,
        tree: &Tree<G::State, G::Action>,
        id: NodeId,
    ) -> Result<(f64, Rewards)> {
        let node = tree.get(id);
        let rollout = self.simulator.simulate(game, &node.state, node.owner)?;
        Ok((mover_score(node.mover(), &rollout.rewards), rollout.rewards))
    }
}

/// Score of a position reached by `mover`, on the first player's scale.
fn mover_score(mover: Player, rewards: &Rewards) -> f64 {
    match mover {
        Player::First => rewards[Player::First],
        Player::Second => -rewards[Player::Second],
    }
}

/// Whether `player` prefers a candidate over the current best.
///
/// The first player wants a higher score, the second a lower one. On equal
/// scores the larger own-minus-opponent differential wins.
fn prefers(player: Player, score: f64, rewards: &Rewards, best_score: f64, best: &Rewards) -> bool {
    let improves = match player {
        Player::First => score > best_score,
        Player::Second => score < best_score,
    };
    improves || (score == best_score && rewards.differential(player) > best.differential(player))
}
