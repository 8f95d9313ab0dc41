//! Gloomcrawl - A script-driven, turn-based terminal dungeon crawler
//!
//! The core (dungeon, registry, initiative, combat, phases) is independent
//! of the terminal; monsters, classes, items, spells and levels are Lua
//! scripts loaded at runtime.

pub mod combat;
pub mod config;
pub mod ecs;
pub mod error;
pub mod game;
pub mod progression;
pub mod scripting;
pub mod ui;
pub mod world;

// Re-export commonly used types
pub use config::GameConfig;
pub use ecs::components::*;
pub use error::{ConfigError, DiceError, ScriptError};
pub use game::{Event, Game, Key, StateMachine};
pub use scripting::{LuaScripts, Scripts};
pub use world::{Dungeon, Position, Rect, Tile};
