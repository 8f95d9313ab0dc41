//! Tile definitions

use serde::{Deserialize, Serialize};

/// A single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Tile {
    #[default]
    Wall,
    Floor,
}

impl Tile {
    pub fn is_walkable(&self) -> bool {
        matches!(self, Tile::Floor)
    }

    /// Walls stop field-of-view rays
    pub fn is_opaque(&self) -> bool {
        matches!(self, Tile::Wall)
    }

    pub fn glyph(&self) -> char {
        match self {
            Tile::Wall => '#',
            Tile::Floor => '.',
        }
    }

    #[cfg(test)]
    pub fn from_glyph(ch: char) -> Option<Self> {
        match ch {
            '#' => Some(Tile::Wall),
            '.' => Some(Tile::Floor),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glyphs() {
        assert_eq!(Tile::Wall.glyph(), '#');
        assert_eq!(Tile::Floor.glyph(), '.');
        assert_eq!(Tile::from_glyph('.'), Some(Tile::Floor));
        assert_eq!(Tile::from_glyph('x'), None);
    }

    #[test]
    fn test_default_is_wall() {
        assert_eq!(Tile::default(), Tile::Wall);
        assert!(!Tile::default().is_walkable());
    }
}
