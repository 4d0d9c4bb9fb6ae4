//! Mosaic - two-player factory/pattern-line tile drafting
//!
//! This crate implements the game rules the search engine is exercised
//! against: factories and a centre pool to draft from, pattern lines of
//! capacity 1 to 5, a 5x5 wall, and a seven-slot floor line.
//!
//! # Types
//!
//! - [`MosaicGame`] - Rules object implementing [`mosaic_core::Game`]
//! - [`MosaicState`] - Full game position
//! - [`MosaicMove`] - A drafting move with its tile split
//! - [`PlayerBoard`] - One player's lines, wall, floor and score

pub mod board;
mod game_impl;
mod moves;
mod state;
mod tile;

pub use board::{PatternLine, PlayerBoard, RoundScoring};
pub use game_impl::MosaicGame;
pub use moves::{Destination, MosaicMove, TileSource};
pub use state::{MosaicState, FACTORIES, TILES_PER_FACTORY, TOTAL_TILES};
pub use tile::{Colour, TileCounts, COLOURS, TILES_PER_COLOUR};
