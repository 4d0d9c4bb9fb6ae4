//! Move-list pruning applied at expansion time.
//!
//! Large move lists are thinned with two cheap rules so the search spends
//! its budget on plausible moves. Thresholds compare the size of the
//! incoming list, so the rules switch themselves off as the round empties.

use mosaic_core::TileAction;
use serde::{Deserialize, Serialize};

/// Pruning thresholds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PruningRules {
    /// Above this many candidates, single tiles sent to a long line are dropped.
    pub speculative_threshold: usize,

    /// First pattern line index considered too long to start with one tile.
    pub speculative_from_line: usize,

    /// Above this many candidates, moves that send every tile to the floor are dropped.
    pub floor_only_threshold: usize,
}

impl Default for PruningRules {
    fn default() -> Self {
        Self {
            speculative_threshold: 50,
            speculative_from_line: 3,
            floor_only_threshold: 30,
        }
    }
}

impl PruningRules {
    /// Rules that keep every move.
    pub fn disabled() -> Self {
        Self {
            speculative_threshold: usize::MAX,
            speculative_from_line: usize::MAX,
            floor_only_threshold: usize::MAX,
        }
    }

    /// Filter a candidate list, preserving the order of surviving moves.
    pub fn prune<A: TileAction>(&self, moves: Vec<A>) -> Vec<A> {
        let total = moves.len();
        let drop_speculative = total > self.speculative_threshold;
        let drop_floor_only = total > self.floor_only_threshold;

        if !drop_speculative && !drop_floor_only {
            return moves;
        }

        moves
            .into_iter()
            .filter(|mv| !(drop_speculative && self.is_speculative(mv)))
            .filter(|mv| !(drop_floor_only && is_floor_only(mv)))
            .collect()
    }

    fn is_speculative<A: TileAction>(&self, mv: &A) -> bool {
        matches!(mv.destination_line(), Some(line) if line >= self.speculative_from_line)
            && mv.to_pattern_line() == 1
    }
}

fn is_floor_only<A: TileAction>(mv: &A) -> bool {
    mv.to_floor_line() == mv.tile_count()
}
