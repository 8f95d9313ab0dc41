//! Terminal front-end
//!
//! ratatui rendering and crossterm key mapping. The game core never
//! depends on anything in here.

pub mod app;
pub mod colors;
pub mod input;

pub use app::App;
pub use colors::Palette;
pub use input::map_key;
