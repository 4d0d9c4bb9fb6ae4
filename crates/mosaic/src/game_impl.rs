//! Implementation of the engine's `Game` trait for the mosaic rules.

use mosaic_core::{BonusTally, Game, Player, Result, PATTERN_LINES};
use std::cmp::Ordering;

use crate::{
    board::{COLUMN_BONUS, SET_BONUS},
    MosaicMove, MosaicState,
};

/// Mosaic rules object.
#[derive(Clone, Copy, Debug, Default)]
pub struct MosaicGame;

impl MosaicGame {
    /// A fresh game whose bag is shuffled from `seed`.
    pub fn new_game(&self, seed: u64) -> MosaicState {
        MosaicState::new(seed)
    }

    /// Score the finished round and deal the next one.
    pub fn finish_round(&self, state: &MosaicState) -> Result<MosaicState> {
        state.finish_round()
    }

    pub fn is_game_over(&self, state: &MosaicState) -> bool {
        state.is_game_over()
    }

    /// End-of-game bonus `player` would receive for the current wall.
    pub fn final_bonus(&self, state: &MosaicState, player: Player) -> i32 {
        state.board(player).final_bonus()
    }

    /// Winner by score, then by completed rows. `None` is a draw.
    pub fn winner(&self, state: &MosaicState) -> Option<Player> {
        let (first, second) = (state.board(Player::First), state.board(Player::Second));
        match first
            .score()
            .cmp(&second.score())
            .then(first.completed_rows().cmp(&second.completed_rows()))
        {
            Ordering::Greater => Some(Player::First),
            Ordering::Less => Some(Player::Second),
            Ordering::Equal => None,
        }
    }
}

impl Game for MosaicGame {
    type State = MosaicState;
    type Action = MosaicMove;

    fn legal_actions(&self, state: &MosaicState, player: Player) -> Vec<MosaicMove> {
        if state.is_game_over() {
            return Vec::new();
        }
        state.legal_moves(player)
    }

    fn apply(&self, state: &MosaicState, player: Player, action: &MosaicMove) -> Result<MosaicState> {
        let mut next = state.clone();
        next.apply_move(player, action)?;
        Ok(next)
    }

    fn has_remaining_material(&self, state: &MosaicState) -> bool {
        state.has_tiles_to_draft()
    }

    /// The player's total once the current round is scored.
    fn round_score(&self, state: &MosaicState, player: Player) -> f64 {
        f64::from(state.preview_round(player).board.score())
    }

    /// Completed columns and colour sets once the round is scored. Rows end
    /// the game, so they carry no future value.
    fn completed_bonuses(&self, state: &MosaicState, player: Player) -> Vec<BonusTally> {
        let board = state.preview_round(player).board;
        vec![
            BonusTally::new(board.completed_columns(), f64::from(COLUMN_BONUS)),
            BonusTally::new(board.completed_sets(), f64::from(SET_BONUS)),
        ]
    }

    /// Tiles left on a pattern line after the round is scored; full lines
    /// have moved to the wall by then.
    fn pattern_line_fill(&self, state: &MosaicState, player: Player, line: usize) -> u32 {
        if line < PATTERN_LINES {
            state.preview_round(player).board.line(line).count
        } else {
            0
        }
    }

    fn next_first_player(&self, state: &MosaicState) -> Option<Player> {
        state.next_first_player()
    }
}
