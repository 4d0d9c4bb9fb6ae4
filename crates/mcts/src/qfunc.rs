//! Q-functions: scalar value of a child from its parent's point of view.
//!
//! Selection always picks on behalf of the parent, whose move produced the
//! child, so every Q-function reads the child's statistics for the mover.

use crate::node::Node;
use serde::{Deserialize, Serialize};

/// How a child's accumulated statistics are turned into a value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QFunction {
    /// Mean reward of the mover.
    Average,

    /// Mean reward of the mover minus mean reward of the child's owner.
    Aggressive,
}

impl QFunction {
    /// Value of `child` for the player who moved into it. 0.0 when unvisited.
    pub fn value<S, A>(self, child: &Node<S, A>) -> f64 {
        let stats = &child.stats;
        if stats.visit_count == 0 {
            return 0.0;
        }
        let mover = child.mover();
        let visits = stats.visit_count as f64;
        match self {
            QFunction::Average => stats.reward_sum[mover] / visits,
            QFunction::Aggressive => {
                (stats.reward_sum[mover] - stats.reward_sum[child.owner]) / visits
            }
        }
    }
}
