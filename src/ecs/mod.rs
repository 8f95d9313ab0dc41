//! Entity Component System module
//!
//! Sparse component tables keyed by entity id, and the systems that drive
//! monsters through them.

pub mod components;
pub mod registry;
pub mod systems;

pub use components::*;
pub use registry::Registry;
pub use systems::{move_monsters, MonsterAction};
