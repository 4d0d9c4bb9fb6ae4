//! Hand-tuned estimates used at the end of a rollout.
//!
//! A rollout only plays out the current round, so the final score misses
//! what the position is worth for the rounds that follow. The estimate adds
//! completed bonus structures and the first-player token, and subtracts a
//! penalty for pattern lines that are left half full.

use mosaic_core::{Game, Player, TileAction};
use std::cmp::Ordering;

/// Bonus for holding the first-player position next round.
pub const FIRST_PLAYER_BONUS: f64 = 1.0;

/// Pattern lines (by index) penalised when left non-empty and unfinished.
const UNFINISHED_LINES: std::ops::RangeInclusive<usize> = 1..=4;

/// Extra penalty for the fourth line, indexed by its fill level.
const FOURTH_LINE_PENALTY: [f64; 3] = [0.0, 1.5, 0.5];

/// Extra penalty for the fifth line, indexed by its fill level.
const FIFTH_LINE_PENALTY: [f64; 3] = [0.0, 2.0, 1.0];

/// Estimated value of future rounds for `player`: bonus minus penalty.
pub fn future_reward<G: Game>(game: &G, state: &G::State, player: Player) -> f64 {
    future_bonus(game, state, player) - future_penalty(game, state, player)
}

/// Completed bonus structures plus the first-player bonus.
pub fn future_bonus<G: Game>(game: &G, state: &G::State, player: Player) -> f64 {
    let structures: f64 = game
        .completed_bonuses(state, player)
        .iter()
        .map(|tally| tally.points())
        .sum();

    let first_player = if game.next_first_player(state) == Some(player) {
        FIRST_PLAYER_BONUS
    } else {
        0.0
    };

    structures + first_player
}

/// Penalty for unfinished pattern lines. Full lines are never penalised.
pub fn future_penalty<G: Game>(game: &G, state: &G::State, player: Player) -> f64 {
    let mut penalty = 0.0;
    for line in UNFINISHED_LINES {
        let fill = game.pattern_line_fill(state, player, line);
        if fill > 0 && fill < line as u32 + 1 {
            penalty += 1.0;
        }
    }

    penalty += occupancy_penalty(&FOURTH_LINE_PENALTY, game.pattern_line_fill(state, player, 3));
    penalty += occupancy_penalty(&FIFTH_LINE_PENALTY, game.pattern_line_fill(state, player, 4));
    penalty
}

fn occupancy_penalty(table: &[f64], fill: u32) -> f64 {
    table.get(fill as usize).copied().unwrap_or(0.0)
}

/// Structural preference between two moves.
///
/// `Greater` means `a` is better: more tiles into a pattern line, then
/// fewer tiles onto the floor.
pub fn structural_order<A: TileAction>(a: &A, b: &A) -> Ordering {
    a.to_pattern_line()
        .cmp(&b.to_pattern_line())
        .then_with(|| b.to_floor_line().cmp(&a.to_floor_line()))
}
