//! Search configuration parameters.
//!
//! Defaults reproduce the tuned tournament agent: full MCTS with UCB1
//! (C = 0.5), no discounting, average-reward selection with the aggressive
//! Q-function as tie-break, and a 0.9 s budget per move.

use crate::bandit::BanditPolicy;
use crate::pruning::PruningRules;
use crate::qfunc::QFunction;
use crate::rollout::RolloutPolicy;
use mosaic_core::{MosaicError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Which controller answers a decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    /// Select, expand on the second visit, simulate, back up to the root.
    MctsFull,

    /// One-layer bandit over the root's children, updating child and root only.
    MctsLight,

    /// Depth-limited alpha-beta with rollouts at the leaves.
    Minimax,
}

/// Search configuration parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Controller used for each decision.
    pub mode: SearchMode,

    /// Wall-clock budget for the MCTS loop.
    /// Checked between iterations; a rollout in flight is never interrupted.
    #[serde(with = "duration_secs")]
    pub time_limit: Duration,

    /// Optional cap on MCTS iterations, applied together with the deadline.
    pub max_iterations: Option<u32>,

    /// Rewards are scaled by `discount_factor ^ rollout_moves` before backup.
    pub discount_factor: f64,

    /// Child selection during descent.
    pub bandit: BanditPolicy,

    /// Q-function used by the bandit and for the final choice.
    pub primary_q: QFunction,

    /// Q-function breaking ties on the primary value at the root.
    pub secondary_q: Option<QFunction>,

    /// Default policy for rollouts.
    pub rollout_policy: RolloutPolicy,

    /// Move-list pruning at expansion.
    pub pruning: PruningRules,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            mode: SearchMode::MctsFull,
            time_limit: Duration::from_millis(900),
            max_iterations: None,
            discount_factor: 1.0,
            bandit: BanditPolicy::default(),
            primary_q: QFunction::Average,
            secondary_q: Some(QFunction::Aggressive),
            rollout_policy: RolloutPolicy::Naive,
            pruning: PruningRules::default(),
        }
    }
}

impl SearchConfig {
    /// Light MCTS: one-layer bandit with random rollouts and a 0.95 s budget.
    pub fn light() -> Self {
        Self {
            mode: SearchMode::MctsLight,
            time_limit: Duration::from_millis(950),
            rollout_policy: RolloutPolicy::Random,
            ..Default::default()
        }
    }

    /// Alpha-beta search with naive rollouts at the leaves.
    pub fn minimax() -> Self {
        Self {
            mode: SearchMode::Minimax,
            ..Default::default()
        }
    }

    /// Full MCTS bounded by an iteration count instead of the clock.
    pub fn with_iterations(iterations: u32) -> Self {
        Self {
            time_limit: Duration::from_secs(3600),
            max_iterations: Some(iterations),
            ..Default::default()
        }
    }

    /// Check that the parameters describe a usable search.
    pub fn validate(&self) -> Result<()> {
        if !(self.discount_factor > 0.0 && self.discount_factor <= 1.0) {
            return Err(MosaicError::InvalidConfig(format!(
                "discount factor {} is outside (0, 1]",
                self.discount_factor
            )));
        }
        self.bandit.validate()
    }
}

/// Serialize a `Duration` as fractional seconds.
pub(crate) mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(duration.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}
