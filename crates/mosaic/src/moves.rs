//! Drafting moves.
//!
//! A move takes every tile of one colour from a factory or the centre and
//! sends them to a pattern line (overflow spills onto the floor) or
//! straight to the floor.

use crate::Colour;
use mosaic_core::TileAction;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where the tiles are taken from.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum TileSource {
    Factory(usize),
    Centre,
}

/// Where the tiles are sent.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Destination {
    Line(usize),
    Floor,
}

/// A drafting move with its tile split precomputed.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct MosaicMove {
    pub source: TileSource,
    pub colour: Colour,
    pub destination: Destination,

    /// Tiles taken from the source.
    pub number: u32,

    /// Tiles that land in the pattern line.
    pub to_pattern_line: u32,

    /// Tiles that end up on the floor line.
    pub to_floor_line: u32,
}

impl MosaicMove {
    /// Send `number` tiles to `line`, `to_line` of which fit.
    pub fn to_line(source: TileSource, colour: Colour, line: usize, number: u32, to_line: u32) -> Self {
        Self {
            source,
            colour,
            destination: Destination::Line(line),
            number,
            to_pattern_line: to_line,
            to_floor_line: number - to_line,
        }
    }

    /// Send all `number` tiles to the floor.
    pub fn to_floor(source: TileSource, colour: Colour, number: u32) -> Self {
        Self {
            source,
            colour,
            destination: Destination::Floor,
            number,
            to_pattern_line: 0,
            to_floor_line: number,
        }
    }
}

impl TileAction for MosaicMove {
    fn destination_line(&self) -> Option<usize> {
        match self.destination {
            Destination::Line(line) => Some(line),
            Destination::Floor => None,
        }
    }

    fn to_pattern_line(&self) -> u32 {
        self.to_pattern_line
    }

    fn to_floor_line(&self) -> u32 {
        self.to_floor_line
    }

    fn tile_count(&self) -> u32 {
        self.number
    }
}

impl fmt::Display for TileSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TileSource::Factory(i) => write!(f, "factory {i}"),
            TileSource::Centre => f.write_str("centre"),
        }
    }
}

impl fmt::Display for MosaicMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x{} from {} -> ", self.colour, self.number, self.source)?;
        match self.destination {
            Destination::Line(line) if self.to_floor_line > 0 => {
                write!(f, "line {} (+{} floor)", line + 1, self.to_floor_line)
            }
            Destination::Line(line) => write!(f, "line {}", line + 1),
            Destination::Floor => f.write_str("floor"),
        }
    }
}
