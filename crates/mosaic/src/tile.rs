use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of tile colours.
pub const COLOURS: usize = 5;

/// Tiles of each colour in a full bag.
pub const TILES_PER_COLOUR: u32 = 20;

/// A tile colour
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Colour {
    Blue = 0,
    Yellow = 1,
    Red = 2,
    Black = 3,
    White = 4,
}

impl Colour {
    pub const ALL: [Colour; COLOURS] = [
        Colour::Blue,
        Colour::Yellow,
        Colour::Red,
        Colour::Black,
        Colour::White,
    ];

    /// Returns the index (0..5)
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Create a colour from its index
    #[inline]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Single-character symbol used in board diagrams
    pub const fn symbol(self) -> char {
        match self {
            Colour::Blue => 'B',
            Colour::Yellow => 'Y',
            Colour::Red => 'R',
            Colour::Black => 'K',
            Colour::White => 'W',
        }
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Colour::Blue => "blue",
            Colour::Yellow => "yellow",
            Colour::Red => "red",
            Colour::Black => "black",
            Colour::White => "white",
        };
        f.write_str(name)
    }
}

/// Tile counts indexed by colour.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug, Serialize, Deserialize)]
pub struct TileCounts(pub [u32; COLOURS]);

impl TileCounts {
    pub const EMPTY: Self = Self([0; COLOURS]);

    #[inline]
    pub fn get(&self, colour: Colour) -> u32 {
        self.0[colour.index()]
    }

    #[inline]
    pub fn add(&mut self, colour: Colour, count: u32) {
        self.0[colour.index()] += count;
    }

    /// Remove every tile of `colour`, returning how many there were.
    #[inline]
    pub fn take_all(&mut self, colour: Colour) -> u32 {
        std::mem::take(&mut self.0[colour.index()])
    }

    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Move every tile into `other`, leaving `self` empty.
    pub fn drain_into(&mut self, other: &mut TileCounts) {
        for colour in Colour::ALL {
            other.add(colour, self.take_all(colour));
        }
    }

    /// Colours with at least one tile, in colour order.
    pub fn present(&self) -> impl Iterator<Item = Colour> + '_ {
        Colour::ALL.into_iter().filter(|&c| self.get(c) > 0)
    }
}

impl FromIterator<Colour> for TileCounts {
    fn from_iter<I: IntoIterator<Item = Colour>>(iter: I) -> Self {
        let mut counts = TileCounts::EMPTY;
        for colour in iter {
            counts.add(colour, 1);
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colour_index_roundtrip() {
        for colour in Colour::ALL {
            assert_eq!(Colour::from_index(colour.index()), Some(colour));
        }
        assert_eq!(Colour::from_index(5), None);
    }

    #[test]
    fn test_take_all_empties_colour() {
        let mut counts: TileCounts = [Colour::Red, Colour::Red, Colour::Blue].into_iter().collect();
        assert_eq!(counts.take_all(Colour::Red), 2);
        assert_eq!(counts.get(Colour::Red), 0);
        assert_eq!(counts.total(), 1);
        assert_eq!(counts.present().collect::<Vec<_>>(), vec![Colour::Blue]);
    }

    #[test]
    fn test_drain_into() {
        let mut a: TileCounts = [Colour::White, Colour::Black].into_iter().collect();
        let mut b: TileCounts = [Colour::White].into_iter().collect();
        a.drain_into(&mut b);
        assert!(a.is_empty());
        assert_eq!(b.get(Colour::White), 2);
        assert_eq!(b.total(), 3);
    }
}
