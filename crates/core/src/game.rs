use std::fmt::Debug;

use crate::{BonusTally, Player, Result};

/// Number of pattern lines on a player board. Line `i` holds up to `i + 1` tiles.
pub const PATTERN_LINES: usize = 5;

/// Metadata a move carries so search heuristics can inspect it without
/// going back to the rules.
pub trait TileAction {
    /// Pattern line the tiles are sent to, or `None` when everything goes to the floor.
    fn destination_line(&self) -> Option<usize>;

    /// Tiles that land in the pattern line.
    fn to_pattern_line(&self) -> u32;

    /// Tiles that overflow (or are sent directly) to the floor line.
    fn to_floor_line(&self) -> u32;

    /// Total tiles taken by the move.
    fn tile_count(&self) -> u32;
}

/// A two-player tile-drafting game as seen by the search engine.
///
/// The engine never implements rules itself. Everything it knows about a
/// position comes through this trait, and it only ever applies moves that
/// `legal_actions` produced.
pub trait Game: Clone + Send + Sync {
    /// The full game position for both players.
    type State: Clone + Send;

    /// A legal action for one player.
    type Action: TileAction + Clone + PartialEq + Debug + Send;

    /// Returns all legal actions for `player` in the given state.
    ///
    /// May be empty only once the round has ended.
    fn legal_actions(&self, state: &Self::State, player: Player) -> Vec<Self::Action>;

    /// Applies an action for `player`, returning a new independent state.
    ///
    /// Must not mutate `state`.
    fn apply(&self, state: &Self::State, player: Player, action: &Self::Action)
        -> Result<Self::State>;

    /// Returns false once the round has run out of tiles to draft.
    fn has_remaining_material(&self, state: &Self::State) -> bool;

    /// Score contribution of the round that just ended for `player`.
    fn round_score(&self, state: &Self::State, player: Player) -> f64;

    /// Completed bonus structures for `player`, one tally per bonus category.
    fn completed_bonuses(&self, state: &Self::State, player: Player) -> Vec<BonusTally>;

    /// Tiles currently waiting in pattern line `line` (capacity `line + 1`).
    fn pattern_line_fill(&self, state: &Self::State, player: Player, line: usize) -> u32;

    /// The player slated to move first next round, if already decided.
    fn next_first_player(&self, state: &Self::State) -> Option<Player>;
}
