//! Simulation engine.
//!
//! A rollout copies a position, plays the rest of the round with a cheap
//! default policy and scores both players: round score plus the heuristic
//! estimate of future rounds.

use crate::heuristic::{future_reward, structural_order};
use mosaic_core::{Game, Player, Result, Rewards};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::cmp::Ordering;
use tracing::debug;

/// Default policy used to pick moves during a rollout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RolloutPolicy {
    /// Uniformly random legal move.
    Random,

    /// Most tiles into a pattern line, then fewest onto the floor, random among equals.
    Naive,
}

/// Outcome of one rollout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rollout {
    /// Undiscounted rewards for both players.
    pub rewards: Rewards,

    /// Moves played from the starting position to the end of the round.
    pub move_count: u32,
}

/// Runs rollouts with its own random number generator.
pub struct Simulator<R: Rng> {
    /// Random number generator (wrapped in RefCell for interior mutability).
    rng: RefCell<R>,

    policy: RolloutPolicy,
}

impl<R: Rng> Simulator<R> {
    /// Create a new simulator.
    ///
    /// # Arguments
    /// * `rng` - Random number generator for move choices
    /// * `policy` - Default policy for both players
    pub fn new(rng: R, policy: RolloutPolicy) -> Self {
        Self {
            rng: RefCell::new(rng),
            policy,
        }
    }

    pub fn policy(&self) -> RolloutPolicy {
        self.policy
    }

    /// Play out the round from `state` with `to_move` moving first.
    ///
    /// `state` is never modified; the rollout works on its own copy.
    pub fn simulate<G: Game>(
        &self,
        game: &G,
        state: &G::State,
        to_move: Player,
    ) -> Result<Rollout> {
        let mut current = state.clone();
        let mut player = to_move;
        let mut move_count = 0;

        while game.has_remaining_material(&current) {
            let moves = game.legal_actions(&current, player);
            let Some(selected) = self.pick(&moves) else {
                debug!(%player, move_count, "rollout stopped: material left but no legal moves");
                break;
            };
            current = game.apply(&current, player, selected)?;
            player = player.opponent();
            move_count += 1;
        }

        Ok(Rollout {
            rewards: terminal_rewards(game, &current),
            move_count,
        })
    }

    fn pick<'a, A: mosaic_core::TileAction>(&self, moves: &'a [A]) -> Option<&'a A> {
        let mut rng = self.rng.borrow_mut();
        match self.policy {
            RolloutPolicy::Random => moves.choose(&mut *rng),
            RolloutPolicy::Naive => naive_choice(moves, &mut *rng),
        }
    }
}

/// Round score plus future estimate for both players.
pub fn terminal_rewards<G: Game>(game: &G, state: &G::State) -> Rewards {
    let mut rewards = Rewards::ZERO;
    for player in Player::ALL {
        rewards[player] = game.round_score(state, player) + future_reward(game, state, player);
    }
    rewards
}

/// Pick uniformly among the structurally best moves.
pub fn naive_choice<'a, A, R>(moves: &'a [A], rng: &mut R) -> Option<&'a A>
where
    A: mosaic_core::TileAction,
    R: Rng + ?Sized,
{
    let mut best: Vec<&A> = Vec::new();
    for mv in moves {
        match best.first().map(|current| structural_order(mv, *current)) {
            None | Some(Ordering::Equal) => best.push(mv),
            Some(Ordering::Greater) => {
                best.clear();
                best.push(mv);
            }
            Some(Ordering::Less) => {}
        }
    }
    best.choose(rng).copied()
}
