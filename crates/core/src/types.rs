//! Shared value types for the search engine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{AddAssign, Index, IndexMut};

/// One of the two seats at the table.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Player {
    First,
    Second,
}

impl Player {
    /// Both players in seat order.
    pub const ALL: [Player; 2] = [Player::First, Player::Second];

    /// Seat index (0 or 1).
    pub fn index(self) -> usize {
        match self {
            Player::First => 0,
            Player::Second => 1,
        }
    }

    /// Player for a seat index, `None` for anything other than 0 or 1.
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Player::First),
            1 => Some(Player::Second),
            _ => None,
        }
    }

    /// Get the opposing player.
    pub fn opponent(self) -> Self {
        match self {
            Player::First => Player::Second,
            Player::Second => Player::First,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.index())
    }
}

/// Reward pair, one entry per player.
///
/// Both players are always tracked: a single rollout scores both boards.
#[derive(Clone, Copy, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct Rewards([f64; 2]);

impl Rewards {
    /// Rewards of zero for both players.
    pub const ZERO: Self = Self([0.0, 0.0]);

    /// Create a reward pair from per-seat values.
    pub fn new(first: f64, second: f64) -> Self {
        Self([first, second])
    }

    /// Apply `gamma^move_count` to both components.
    pub fn discounted(self, gamma: f64, move_count: u32) -> Self {
        let factor = gamma.powi(i32::try_from(move_count).unwrap_or(i32::MAX));
        Self([self.0[0] * factor, self.0[1] * factor])
    }

    /// Own reward minus the opponent's.
    pub fn differential(self, player: Player) -> f64 {
        self[player] - self[player.opponent()]
    }

    /// The raw per-seat array.
    pub fn as_array(self) -> [f64; 2] {
        self.0
    }
}

impl Index<Player> for Rewards {
    type Output = f64;

    fn index(&self, player: Player) -> &Self::Output {
        &self.0[player.index()]
    }
}

impl IndexMut<Player> for Rewards {
    fn index_mut(&mut self, player: Player) -> &mut Self::Output {
        &mut self.0[player.index()]
    }
}

impl AddAssign for Rewards {
    fn add_assign(&mut self, rhs: Self) {
        self.0[0] += rhs.0[0];
        self.0[1] += rhs.0[1];
    }
}

impl fmt::Display for Rewards {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.3}, {:.3}]", self.0[0], self.0[1])
    }
}

/// Completed bonus structures of one category (e.g. wall columns).
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct BonusTally {
    /// Number of completed structures.
    pub completed: u32,

    /// Points awarded per completed structure.
    pub points_per_unit: f64,
}

impl BonusTally {
    pub fn new(completed: u32, points_per_unit: f64) -> Self {
        Self {
            completed,
            points_per_unit,
        }
    }

    /// Points this category is worth.
    pub fn points(&self) -> f64 {
        self.completed as f64 * self.points_per_unit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_opponent() {
        assert_eq!(Player::First.opponent(), Player::Second);
        assert_eq!(Player::Second.opponent(), Player::First);
    }

    #[test]
    fn test_player_index_roundtrip() {
        for player in Player::ALL {
            assert_eq!(Player::from_index(player.index()), Some(player));
        }
        assert_eq!(Player::from_index(2), None);
    }

    #[test]
    fn test_rewards_discounted() {
        let rewards = Rewards::new(10.0, 4.0).discounted(0.5, 2);
        assert!((rewards[Player::First] - 2.5).abs() < 1e-12);
        assert!((rewards[Player::Second] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_rewards_no_discount_at_zero_moves() {
        let rewards = Rewards::new(3.0, -1.0).discounted(0.9, 0);
        assert_eq!(rewards, Rewards::new(3.0, -1.0));
    }

    #[test]
    fn test_rewards_discount_saturates_on_long_rollouts() {
        let rewards = Rewards::new(10.0, 4.0).discounted(0.5, u32::MAX);
        assert_eq!(rewards, Rewards::ZERO);

        let rewards = Rewards::new(10.0, 4.0).discounted(1.0, u32::MAX);
        assert_eq!(rewards, Rewards::new(10.0, 4.0));
    }

    #[test]
    fn test_rewards_differential() {
        let rewards = Rewards::new(10.0, 4.0);
        assert_eq!(rewards.differential(Player::First), 6.0);
        assert_eq!(rewards.differential(Player::Second), -6.0);
    }

    #[test]
    fn test_rewards_add_assign() {
        let mut total = Rewards::ZERO;
        total += Rewards::new(1.0, 2.0);
        total += Rewards::new(0.5, -1.0);
        assert_eq!(total, Rewards::new(1.5, 1.0));
    }

    #[test]
    fn test_bonus_tally_points() {
        assert_eq!(BonusTally::new(2, 7.0).points(), 14.0);
        assert_eq!(BonusTally::new(0, 10.0).points(), 0.0);
    }
}
