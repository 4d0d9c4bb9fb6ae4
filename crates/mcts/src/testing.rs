//! Scripted game used by unit tests.
//!
//! Every turn offers the same action menu. Each action consumes one tile from
//! a shared pool and scores `to_pattern_line - to_floor_line` for the mover,
//! which makes rollout values easy to predict.

use mosaic_core::{
    BonusTally, Game, MosaicError, Player, Result, TileAction, PATTERN_LINES,
};

#[derive(Clone, Debug, PartialEq)]
pub struct ScriptedAction {
    pub line: Option<usize>,
    pub to_line: u32,
    pub to_floor: u32,
}

impl ScriptedAction {
    pub fn to_line(line: usize, to_line: u32, to_floor: u32) -> Self {
        Self {
            line: Some(line),
            to_line,
            to_floor,
        }
    }

    pub fn to_floor(count: u32) -> Self {
        Self {
            line: None,
            to_line: 0,
            to_floor: count,
        }
    }
}

impl TileAction for ScriptedAction {
    fn destination_line(&self) -> Option<usize> {
        self.line
    }

    fn to_pattern_line(&self) -> u32 {
        self.to_line
    }

    fn to_floor_line(&self) -> u32 {
        self.to_floor
    }

    fn tile_count(&self) -> u32 {
        self.to_line + self.to_floor
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScriptedState {
    pub remaining: u32,
    pub scores: [f64; 2],
    pub lines: [[u32; PATTERN_LINES]; 2],
    pub completed_columns: [u32; 2],
    pub first_next: Option<Player>,
}

impl ScriptedState {
    pub fn new(remaining: u32) -> Self {
        Self {
            remaining,
            scores: [0.0, 0.0],
            lines: [[0; PATTERN_LINES]; 2],
            completed_columns: [0, 0],
            first_next: None,
        }
    }

    /// A round that has already ended with the given scores.
    pub fn finished(first: f64, second: f64) -> Self {
        Self {
            scores: [first, second],
            ..Self::new(0)
        }
    }
}

#[derive(Clone, Debug)]
pub struct ScriptedGame {
    pub menu: Vec<ScriptedAction>,
}

impl ScriptedGame {
    pub fn new(menu: Vec<ScriptedAction>) -> Self {
        Self { menu }
    }

    /// A menu of `count` actions with distinct values.
    pub fn with_menu_size(count: usize) -> Self {
        let menu = (0..count)
            .map(|i| ScriptedAction::to_line(i % PATTERN_LINES, (i % 3) as u32 + 1, (i % 2) as u32))
            .collect();
        Self::new(menu)
    }
}

impl Game for ScriptedGame {
    type State = ScriptedState;
    type Action = ScriptedAction;

    fn legal_actions(&self, state: &ScriptedState, _player: Player) -> Vec<ScriptedAction> {
        if state.remaining == 0 {
            Vec::new()
        } else {
            self.menu.clone()
        }
    }

    fn apply(
        &self,
        state: &ScriptedState,
        player: Player,
        action: &ScriptedAction,
    ) -> Result<ScriptedState> {
        if action.tile_count() == 0 {
            return Err(MosaicError::IllegalMove("empty grab".to_string()));
        }
        let mut next = state.clone();
        next.remaining = next.remaining.saturating_sub(1);
        next.scores[player.index()] += action.to_line as f64 - action.to_floor as f64;
        if let Some(line) = action.line {
            next.lines[player.index()][line] += action.to_line;
        }
        Ok(next)
    }

    fn has_remaining_material(&self, state: &ScriptedState) -> bool {
        state.remaining > 0
    }

    fn round_score(&self, state: &ScriptedState, player: Player) -> f64 {
        state.scores[player.index()]
    }

    fn completed_bonuses(&self, state: &ScriptedState, player: Player) -> Vec<BonusTally> {
        vec![BonusTally::new(state.completed_columns[player.index()], 7.0)]
    }

    fn pattern_line_fill(&self, state: &ScriptedState, player: Player, line: usize) -> u32 {
        state.lines[player.index()][line]
    }

    fn next_first_player(&self, state: &ScriptedState) -> Option<Player> {
        state.first_next
    }
}
