//! A player's board: pattern lines, wall, floor line and score.
//!
//! The wall is the standard diagonal layout where row `r`, column `c`
//! holds colour `(c - r) mod 5`, so every row and every column contains
//! each colour exactly once.

use crate::{Colour, TileCounts, COLOURS};
use mosaic_core::PATTERN_LINES;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rows and columns of the wall.
pub const WALL_SIZE: usize = 5;

/// Points lost per occupied floor slot, left to right.
pub const FLOOR_PENALTIES: [i32; 7] = [-1, -1, -2, -2, -2, -3, -3];

/// Floor slots available.
pub const FLOOR_CAPACITY: usize = FLOOR_PENALTIES.len();

/// End-of-game bonus per completed row.
pub const ROW_BONUS: i32 = 2;

/// End-of-game bonus per completed column.
pub const COLUMN_BONUS: i32 = 7;

/// End-of-game bonus per colour placed five times.
pub const SET_BONUS: i32 = 10;

/// Colour of the wall cell at (`row`, `col`).
#[inline]
pub const fn wall_colour(row: usize, col: usize) -> Colour {
    Colour::ALL[(col + WALL_SIZE - row % WALL_SIZE) % WALL_SIZE]
}

/// Column where `colour` goes in `row`.
#[inline]
pub const fn wall_column(row: usize, colour: Colour) -> usize {
    (row + colour.index()) % WALL_SIZE
}

/// One pattern line. Line `i` holds up to `i + 1` tiles of a single colour.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug, Serialize, Deserialize)]
pub struct PatternLine {
    pub colour: Option<Colour>,
    pub count: u32,
}

/// Result of scoring a board at the end of a round.
#[derive(Clone, Debug, PartialEq)]
pub struct RoundScoring {
    /// The board after tiling, with lines and floor cleared.
    pub board: PlayerBoard,

    /// Net score change (after clamping the total at zero).
    pub gained: i32,

    /// Tiles that leave the board for the lid.
    pub discarded: TileCounts,
}

/// A single player's board.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct PlayerBoard {
    score: i32,
    lines: [PatternLine; PATTERN_LINES],
    wall: [[bool; WALL_SIZE]; WALL_SIZE],
    floor: Vec<Colour>,
    first_token: bool,
}

impl PlayerBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn line(&self, line: usize) -> PatternLine {
        self.lines[line]
    }

    pub fn lines(&self) -> &[PatternLine; PATTERN_LINES] {
        &self.lines
    }

    pub fn is_tiled(&self, row: usize, col: usize) -> bool {
        self.wall[row][col]
    }

    pub fn floor(&self) -> &[Colour] {
        &self.floor
    }

    /// Whether the first-player token sits on this floor line.
    pub fn has_first_token(&self) -> bool {
        self.first_token
    }

    /// Whether `colour` may be started or continued on `line`.
    ///
    /// The line must be empty or already hold `colour`, must not be full,
    /// and the matching wall cell must still be free.
    pub fn accepts(&self, line: usize, colour: Colour) -> bool {
        let Some(pattern) = self.lines.get(line) else {
            return false;
        };
        let colour_fits = pattern.colour.map_or(true, |c| c == colour);
        colour_fits
            && pattern.count < line as u32 + 1
            && !self.wall[line][wall_column(line, colour)]
    }

    /// How `count` tiles sent to `line` split between the line and the floor.
    pub fn split(&self, line: usize, count: u32) -> (u32, u32) {
        let free = (line as u32 + 1).saturating_sub(self.lines[line].count);
        let to_line = count.min(free);
        (to_line, count - to_line)
    }

    /// Put `count` tiles of `colour` on `line`, returning the overflow count.
    ///
    /// The caller checks [`PlayerBoard::accepts`] first.
    pub(crate) fn fill_line(&mut self, line: usize, colour: Colour, count: u32) -> u32 {
        let (to_line, overflow) = self.split(line, count);
        let pattern = &mut self.lines[line];
        pattern.colour = Some(colour);
        pattern.count += to_line;
        overflow
    }

    /// Put tiles on the floor line. Returns how many did not fit.
    pub(crate) fn add_to_floor(&mut self, colour: Colour, count: u32) -> u32 {
        let used = self.floor.len() + usize::from(self.first_token);
        let free = FLOOR_CAPACITY.saturating_sub(used) as u32;
        let placed = count.min(free);
        self.floor
            .extend(std::iter::repeat(colour).take(placed as usize));
        count - placed
    }

    pub(crate) fn take_first_token(&mut self) {
        self.first_token = true;
    }

    /// Penalty for the occupied floor slots (zero or negative).
    pub fn floor_penalty(&self) -> i32 {
        let used = (self.floor.len() + usize::from(self.first_token)).min(FLOOR_CAPACITY);
        FLOOR_PENALTIES[..used].iter().sum()
    }

    /// Points for a tile just placed at (`row`, `col`).
    ///
    /// Counts the horizontal and vertical runs through the tile; a tile with
    /// no neighbours scores 1.
    pub fn adjacency_score(&self, row: usize, col: usize) -> i32 {
        let horizontal = 1
            + run((0..col).rev().map(|c| self.wall[row][c]))
            + run((col + 1..WALL_SIZE).map(|c| self.wall[row][c]));
        let vertical = 1
            + run((0..row).rev().map(|r| self.wall[r][col]))
            + run((row + 1..WALL_SIZE).map(|r| self.wall[r][col]));

        match (horizontal > 1, vertical > 1) {
            (true, true) => horizontal + vertical,
            (true, false) => horizontal,
            (false, true) => vertical,
            (false, false) => 1,
        }
    }

    /// Score the round without touching `self`.
    ///
    /// Full lines are tiled top to bottom, so a tile placed earlier counts
    /// towards the adjacency of later ones. The total never drops below zero.
    pub fn score_round(&self) -> RoundScoring {
        let mut board = self.clone();
        let mut discarded = TileCounts::EMPTY;
        let mut delta = 0;

        for row in 0..PATTERN_LINES {
            let pattern = board.lines[row];
            let Some(colour) = pattern.colour else {
                continue;
            };
            if pattern.count < row as u32 + 1 {
                continue;
            }
            let col = wall_column(row, colour);
            board.wall[row][col] = true;
            delta += board.adjacency_score(row, col);
            discarded.add(colour, pattern.count - 1);
            board.lines[row] = PatternLine::default();
        }

        delta += board.floor_penalty();
        for colour in board.floor.drain(..) {
            discarded.add(colour, 1);
        }
        board.first_token = false;

        let before = board.score;
        board.score = (before + delta).max(0);
        RoundScoring {
            gained: board.score - before,
            board,
            discarded,
        }
    }

    pub fn completed_rows(&self) -> u32 {
        self.wall.iter().filter(|row| row.iter().all(|&t| t)).count() as u32
    }

    pub fn completed_columns(&self) -> u32 {
        (0..WALL_SIZE)
            .filter(|&col| (0..WALL_SIZE).all(|row| self.wall[row][col]))
            .count() as u32
    }

    /// Colours placed in every row of the wall.
    pub fn completed_sets(&self) -> u32 {
        Colour::ALL
            .into_iter()
            .filter(|&colour| (0..WALL_SIZE).all(|row| self.wall[row][wall_column(row, colour)]))
            .count() as u32
    }

    /// End-of-game bonus for completed rows, columns and colour sets.
    pub fn final_bonus(&self) -> i32 {
        self.completed_rows() as i32 * ROW_BONUS
            + self.completed_columns() as i32 * COLUMN_BONUS
            + self.completed_sets() as i32 * SET_BONUS
    }

    pub(crate) fn add_score(&mut self, points: i32) {
        self.score = (self.score + points).max(0);
    }

    /// Tiles held on this board (lines, floor and wall).
    pub fn tile_count(&self) -> u32 {
        let lines: u32 = self.lines.iter().map(|l| l.count).sum();
        let wall = self.wall.iter().flatten().filter(|&&t| t).count() as u32;
        lines + wall + self.floor.len() as u32
    }

    #[cfg(test)]
    pub(crate) fn set_tiled(&mut self, row: usize, col: usize) {
        self.wall[row][col] = true;
    }
}

impl fmt::Display for PlayerBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..WALL_SIZE {
            let pattern = self.lines[row];
            let symbol = pattern.colour.map_or('.', Colour::symbol);
            for slot in (0..PATTERN_LINES).rev() {
                let c = if slot > row {
                    ' '
                } else if (slot as u32) < pattern.count {
                    symbol
                } else {
                    '.'
                };
                write!(f, "{c}")?;
            }
            write!(f, " | ")?;
            for col in 0..WALL_SIZE {
                let colour = wall_colour(row, col);
                let c = if self.wall[row][col] {
                    colour.symbol()
                } else {
                    colour.symbol().to_ascii_lowercase()
                };
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        let floor: String = self.floor.iter().map(|c| c.symbol()).collect();
        let token = if self.first_token { "1" } else { "" };
        write!(f, "floor: {token}{floor}  score: {}", self.score)
    }
}

/// Length of the run of tiled cells at the start of `cells`.
fn run(cells: impl Iterator<Item = bool>) -> i32 {
    cells.take_while(|&tiled| tiled).count() as i32
}

// Colour sets must be checkable on every diagonal.
const _: () = assert!(COLOURS == WALL_SIZE);
