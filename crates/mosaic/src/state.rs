//! Full game position: shared tiles, both boards and whose turn it is.

use crate::{
    board::{PlayerBoard, RoundScoring},
    Colour, Destination, MosaicMove, TileCounts, TileSource, TILES_PER_COLOUR,
};
use mosaic_core::{MosaicError, Player, Result, PATTERN_LINES};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Factories in a two-player game.
pub const FACTORIES: usize = 5;

/// Tiles drawn onto each factory at the start of a round.
pub const TILES_PER_FACTORY: usize = 4;

/// Tiles in the game.
pub const TOTAL_TILES: u32 = TILES_PER_COLOUR * crate::COLOURS as u32;

/// A game position.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct MosaicState {
    /// Draw pile; tiles are drawn from the end.
    bag: Vec<Colour>,
    /// Discarded tiles waiting to be returned to the bag.
    lid: TileCounts,
    factories: [TileCounts; FACTORIES],
    centre: TileCounts,
    first_token_in_centre: bool,
    boards: [PlayerBoard; 2],
    to_move: Player,
    round_starter: Player,
    next_first_player: Option<Player>,
    round: u32,
    game_over: bool,
    seed: u64,
}

impl MosaicState {
    /// Start a game with a bag shuffled from `seed`.
    pub fn new(seed: u64) -> Self {
        let mut bag: Vec<Colour> = Colour::ALL
            .into_iter()
            .flat_map(|colour| std::iter::repeat(colour).take(TILES_PER_COLOUR as usize))
            .collect();
        bag.shuffle(&mut ChaCha8Rng::seed_from_u64(seed));

        let mut state = Self {
            bag,
            lid: TileCounts::EMPTY,
            factories: [TileCounts::EMPTY; FACTORIES],
            centre: TileCounts::EMPTY,
            first_token_in_centre: true,
            boards: [PlayerBoard::new(), PlayerBoard::new()],
            to_move: Player::First,
            round_starter: Player::First,
            next_first_player: None,
            round: 1,
            game_over: false,
            seed,
        };
        state.refill_factories();
        state
    }

    pub fn to_move(&self) -> Player {
        self.to_move
    }

    pub fn board(&self, player: Player) -> &PlayerBoard {
        &self.boards[player.index()]
    }

    #[cfg(test)]
    pub(crate) fn board_mut(&mut self, player: Player) -> &mut PlayerBoard {
        &mut self.boards[player.index()]
    }

    pub fn factories(&self) -> &[TileCounts; FACTORIES] {
        &self.factories
    }

    pub fn centre(&self) -> &TileCounts {
        &self.centre
    }

    pub fn first_token_in_centre(&self) -> bool {
        self.first_token_in_centre
    }

    pub fn next_first_player(&self) -> Option<Player> {
        self.next_first_player
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn score(&self, player: Player) -> i32 {
        self.board(player).score()
    }

    /// Whether any factory or the centre still holds tiles.
    pub fn has_tiles_to_draft(&self) -> bool {
        !self.centre.is_empty() || self.factories.iter().any(|f| !f.is_empty())
    }

    /// Tiles anywhere in the game. Always [`TOTAL_TILES`].
    pub fn tile_total(&self) -> u32 {
        self.bag.len() as u32
            + self.lid.total()
            + self.centre.total()
            + self.factories.iter().map(TileCounts::total).sum::<u32>()
            + self.boards.iter().map(PlayerBoard::tile_count).sum::<u32>()
    }

    fn source(&self, source: TileSource) -> Option<&TileCounts> {
        match source {
            TileSource::Factory(i) => self.factories.get(i),
            TileSource::Centre => Some(&self.centre),
        }
    }

    /// Every legal move for `player`.
    ///
    /// Factories come first in order, then the centre. For each colour on a
    /// source there is one move per accepting pattern line and one move
    /// sending everything to the floor.
    pub fn legal_moves(&self, player: Player) -> Vec<MosaicMove> {
        let board = self.board(player);
        let sources = (0..FACTORIES)
            .map(TileSource::Factory)
            .chain(std::iter::once(TileSource::Centre));

        let mut moves = Vec::new();
        for source in sources {
            let Some(tiles) = self.source(source) else {
                continue;
            };
            for colour in tiles.present() {
                let number = tiles.get(colour);
                for line in 0..PATTERN_LINES {
                    if board.accepts(line, colour) {
                        let (to_line, _) = board.split(line, number);
                        moves.push(MosaicMove::to_line(source, colour, line, number, to_line));
                    }
                }
                moves.push(MosaicMove::to_floor(source, colour, number));
            }
        }
        moves
    }

    /// Apply `mv` for `player` in place.
    ///
    /// # Errors
    /// `IllegalMove` if it is not `player`'s turn, the source does not hold
    /// the stated tiles, or the destination cannot take the colour.
    pub fn apply_move(&mut self, player: Player, mv: &MosaicMove) -> Result<()> {
        if self.game_over {
            return Err(MosaicError::IllegalMove("game is over".to_string()));
        }
        if player != self.to_move {
            return Err(MosaicError::IllegalMove(format!(
                "{player} moved out of turn"
            )));
        }
        let available = self.source(mv.source).map_or(0, |tiles| tiles.get(mv.colour));
        if mv.number == 0 || available != mv.number {
            return Err(MosaicError::IllegalMove(format!(
                "{mv}: source holds {available} {}",
                mv.colour
            )));
        }

        let board = &self.boards[player.index()];
        let expected = match mv.destination {
            Destination::Line(line) => {
                if !board.accepts(line, mv.colour) {
                    return Err(MosaicError::IllegalMove(format!(
                        "{mv}: line cannot take {}",
                        mv.colour
                    )));
                }
                board.split(line, mv.number)
            }
            Destination::Floor => (0, mv.number),
        };
        if expected != (mv.to_pattern_line, mv.to_floor_line) {
            return Err(MosaicError::IllegalMove(format!("{mv}: stale tile split")));
        }

        // Take the tiles; a factory's leftovers go to the centre.
        match mv.source {
            TileSource::Factory(i) => {
                let factory = &mut self.factories[i];
                factory.take_all(mv.colour);
                factory.drain_into(&mut self.centre);
            }
            TileSource::Centre => {
                self.centre.take_all(mv.colour);
                if self.first_token_in_centre {
                    self.first_token_in_centre = false;
                    self.next_first_player = Some(player);
                    self.boards[player.index()].take_first_token();
                }
            }
        }

        let board = &mut self.boards[player.index()];
        let to_floor = match mv.destination {
            Destination::Line(line) => board.fill_line(line, mv.colour, mv.number),
            Destination::Floor => mv.number,
        };
        let spilled = board.add_to_floor(mv.colour, to_floor);
        self.lid.add(mv.colour, spilled);

        self.to_move = player.opponent();
        Ok(())
    }

    /// Round scoring for `player` as it would happen now.
    pub fn preview_round(&self, player: Player) -> RoundScoring {
        self.board(player).score_round()
    }

    /// Score the round and set up the next one.
    ///
    /// The game ends when a wall row is complete or no tiles are left to
    /// deal; end-of-game bonuses are then added to the scores.
    pub fn finish_round(&self) -> Result<MosaicState> {
        if self.has_tiles_to_draft() {
            return Err(MosaicError::IllegalMove(
                "round still has tiles to draft".to_string(),
            ));
        }
        if self.game_over {
            return Err(MosaicError::IllegalMove("game is over".to_string()));
        }

        let mut next = self.clone();
        for player in Player::ALL {
            let scoring = next.preview_round(player);
            scoring.discarded.0.iter().zip(Colour::ALL).for_each(|(&n, colour)| {
                next.lid.add(colour, n);
            });
            next.boards[player.index()] = scoring.board;
        }

        let starter = next.next_first_player.take().unwrap_or(next.round_starter);
        next.round_starter = starter;
        next.to_move = starter;
        next.first_token_in_centre = true;
        next.round += 1;

        let row_complete = next.boards.iter().any(|b| b.completed_rows() > 0);
        if !row_complete {
            next.refill_factories();
        }
        if row_complete || !next.has_tiles_to_draft() {
            next.game_over = true;
            for board in &mut next.boards {
                let bonus = board.final_bonus();
                board.add_score(bonus);
            }
        }
        Ok(next)
    }

    /// Deal tiles onto empty factories, refilling the bag from the lid when
    /// it runs out. Factories stay short if both are empty.
    fn refill_factories(&mut self) {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed.wrapping_add(u64::from(self.round)));
        for factory in 0..FACTORIES {
            for _ in 0..TILES_PER_FACTORY {
                if self.bag.is_empty() {
                    self.refill_bag(&mut rng);
                }
                let Some(colour) = self.bag.pop() else {
                    return;
                };
                self.factories[factory].add(colour, 1);
            }
        }
    }

    fn refill_bag(&mut self, rng: &mut ChaCha8Rng) {
        for colour in Colour::ALL {
            let count = self.lid.take_all(colour);
            self.bag
                .extend(std::iter::repeat(colour).take(count as usize));
        }
        self.bag.shuffle(rng);
    }
}

impl fmt::Display for MosaicState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "round {}, {} to move", self.round, self.to_move)?;
        for (i, factory) in self.factories.iter().enumerate() {
            let tiles: String = factory
                .present()
                .flat_map(|c| std::iter::repeat(c.symbol()).take(factory.get(c) as usize))
                .collect();
            writeln!(f, "factory {i}: {tiles}")?;
        }
        let centre: String = self
            .centre
            .present()
            .flat_map(|c| std::iter::repeat(c.symbol()).take(self.centre.get(c) as usize))
            .collect();
        let token = if self.first_token_in_centre { "1" } else { "" };
        writeln!(f, "centre: {token}{centre}")?;
        for player in Player::ALL {
            writeln!(f, "{player}:\n{}", self.board(player))?;
        }
        Ok(())
    }
}
