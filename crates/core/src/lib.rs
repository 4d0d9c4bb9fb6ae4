//! Mosaic Core - game adapter boundary and common types
//!
//! This crate defines what the search engine needs from a tile-drafting
//! game and nothing more. Rules live behind the [`Game`] trait.
//!
//! # Types
//!
//! - [`Game`] - Trait for game implementations
//! - [`TileAction`] - Move metadata inspected by pruning and tie-breaks
//! - [`Player`] - One of the two seats
//! - [`Rewards`] - Per-player reward pair

mod error;
mod game;
mod types;

pub use error::{MosaicError, Result};
pub use game::{Game, TileAction, PATTERN_LINES};
pub use types::{BonusTally, Player, Rewards};
