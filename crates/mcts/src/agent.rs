//! The per-turn decision function.
//!
//! An [`Agent`] is what a game loop talks to: hand it the position and the
//! legal moves, get a move back. Each call builds a fresh search tree and
//! drops it before returning.

use crate::{
    config::{SearchConfig, SearchMode},
    minimax::Minimax,
    rollout::Simulator,
    search::Mcts,
};
use mosaic_core::{Game, MosaicError, Player, Result};
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::debug;

/// Diagnostics for one decision.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct DecisionStats {
    /// MCTS iterations, or 0 for minimax and forced moves.
    pub iterations: u32,

    /// Nodes allocated (MCTS) or alpha-beta calls (minimax).
    pub nodes: u64,

    /// Minimax depth, when minimax ran.
    pub depth: Option<u32>,

    /// Whether a search ran at all.
    pub searched: bool,

    #[serde(with = "crate::config::duration_secs")]
    pub elapsed: Duration,
}

/// A chosen move with its diagnostics.
#[derive(Clone, Debug)]
pub struct Decision<A> {
    pub action: A,
    pub stats: DecisionStats,
}

/// Search-based move selector for one player.
pub struct Agent<R> {
    config: SearchConfig,
    rng: R,
}

impl<R> Agent<R>
where
    R: Rng + SeedableRng,
{
    /// Create an agent, rejecting invalid configurations.
    pub fn new(config: SearchConfig, rng: R) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, rng })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Pick a move for `player` using the configured time limit.
    pub fn select_move<G: Game>(
        &mut self,
        game: &G,
        state: &G::State,
        player: Player,
        legal_moves: Vec<G::Action>,
    ) -> Result<G::Action> {
        let budget = self.config.time_limit;
        self.find_next_move(game, state, player, legal_moves, budget)
    }

    /// Pick a move for `player` within `time_budget`.
    ///
    /// # Errors
    /// `NoLegalMoves` when `legal_moves` is empty; adapter errors from
    /// applying moves during the search are passed through.
    pub fn find_next_move<G: Game>(
        &mut self,
        game: &G,
        state: &G::State,
        player: Player,
        legal_moves: Vec<G::Action>,
        time_budget: Duration,
    ) -> Result<G::Action> {
        self.decide(game, state, player, legal_moves, time_budget)
            .map(|decision| decision.action)
    }

    /// Like [`Agent::find_next_move`], also returning search diagnostics.
    pub fn decide<G: Game>(
        &mut self,
        game: &G,
        state: &G::State,
        player: Player,
        mut legal_moves: Vec<G::Action>,
        time_budget: Duration,
    ) -> Result<Decision<G::Action>> {
        let start = Instant::now();
        match legal_moves.len() {
            0 => return Err(MosaicError::NoLegalMoves),
            1 => {
                debug!(%player, "single legal move, skipping search");
                return Ok(Decision {
                    action: legal_moves.swap_remove(0),
                    stats: DecisionStats {
                        elapsed: start.elapsed(),
                        ..DecisionStats::default()
                    },
                });
            }
            _ => {}
        }

        // Rollouts and selection draw from independent streams.
        let simulator = Simulator::new(self.fork_rng(), self.config.rollout_policy);

        match self.config.mode {
            SearchMode::Minimax => {
                let minimax = Minimax::new(simulator, self.config.pruning.clone());
                let result = minimax.search(game, state, player, legal_moves)?;
                Ok(Decision {
                    action: result.best_action,
                    stats: DecisionStats {
                        iterations: 0,
                        nodes: result.nodes_visited,
                        depth: Some(result.depth),
                        searched: true,
                        elapsed: result.elapsed,
                    },
                })
            }
            SearchMode::MctsFull | SearchMode::MctsLight => {
                let mut mcts = Mcts::new(self.config.clone(), simulator, self.fork_rng());
                let result = mcts.search(game, state, player, legal_moves, time_budget)?;
                Ok(Decision {
                    action: result.best_action,
                    stats: DecisionStats {
                        iterations: result.iterations,
                        nodes: result.tree_size as u64,
                        depth: None,
                        searched: true,
                        elapsed: result.elapsed,
                    },
                })
            }
        }
    }

    fn fork_rng(&mut self) -> R {
        R::seed_from_u64(self.rng.gen())
    }
}
