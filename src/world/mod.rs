//! World module
//!
//! Level geometry, tiles, generation and visibility.

pub mod dungeon;
pub mod fov;
pub mod geometry;
pub mod tile;

pub use dungeon::Dungeon;
pub use fov::update_fov;
pub use geometry::{Position, Rect};
pub use tile::Tile;
