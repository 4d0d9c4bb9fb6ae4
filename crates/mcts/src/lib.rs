//! Monte Carlo Tree Search and minimax for two-player tile-drafting games.
//!
//! This crate provides the move-search engine. It works with any game that
//! implements [`mosaic_core::Game`] and never looks inside the game state
//! beyond that trait.
//!
//! # Features
//!
//! - **Self-play tree**: one arena tree per decision, node ownership
//!   alternating between the players with depth
//! - **Bandits**: UCB1 and epsilon-greedy child selection
//! - **Q-functions**: average reward and aggressive (differential) values,
//!   used as a primary value plus an optional tie-break
//! - **Rollouts**: random or naive default policy, scored with a
//!   future-reward heuristic
//! - **Three controllers**: full MCTS, light (one-layer) MCTS, and
//!   depth-limited alpha-beta with rollout leaves
//!
//! # Example
//!
//! ```
//! use mosaic_core::Game;
//! use mosaic_game::MosaicGame;
//! use mosaic_mcts::{Agent, SearchConfig};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//! use std::time::Duration;
//!
//! let game = MosaicGame::default();
//! let state = game.new_game(42);
//! let player = state.to_move();
//! let moves = game.legal_actions(&state, player);
//!
//! let config = SearchConfig::with_iterations(200);
//! let mut agent = Agent::new(config, ChaCha8Rng::seed_from_u64(42)).unwrap();
//!
//! let action = agent
//!     .find_next_move(&game, &state, player, moves.clone(), Duration::from_secs(5))
//!     .unwrap();
//! assert!(moves.contains(&action));
//! ```

pub mod agent;
pub mod bandit;
pub mod config;
pub mod heuristic;
pub mod minimax;
pub mod node;
pub mod pruning;
pub mod qfunc;
pub mod rollout;
pub mod search;
pub mod tree;

#[cfg(test)]
mod testing;

pub use agent::{Agent, Decision, DecisionStats};
pub use bandit::{Bandit, BanditPolicy, EpsilonGreedy, Ucb1};
pub use config::{SearchConfig, SearchMode};
pub use minimax::{depth_for_branching, Minimax, MinimaxResult};
pub use node::{Node, NodeId, NodeStats};
pub use pruning::PruningRules;
pub use qfunc::QFunction;
pub use rollout::{Rollout, RolloutPolicy, Simulator};
pub use search::{choose_best_child, ChildSummary, Mcts, SearchResult};
pub use tree::Tree;
