//! Content scripting
//!
//! Stat tables, AI decisions, level layouts and item/spell effects live in
//! external scripts. The core only talks to them through [`Scripts`], so a
//! deterministic double can stand in for the Lua engine in tests.

pub mod dice;
pub mod lua;
pub mod weights;

#[cfg(test)]
pub mod stub;

pub use dice::roll;
pub use lua::LuaScripts;
pub use weights::{pick_weighted, pick_with_draw, Weights};

use crate::ecs::{ItemKind, Renderable, Stats};
use crate::error::ScriptError;
use crate::game::MessageLog;
use crate::world::Position;

/// Default ticks between actions when a script does not say
pub const DEFAULT_PLAYER_DELAY: u32 = 3;
pub const DEFAULT_MONSTER_DELAY: u32 = 4;
pub const DEFAULT_PROJECTILE_DELAY: u32 = 1;

/// Initial stats and looks for a class or monster (`get_init_stats`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityConfig {
    pub name: Option<String>,
    /// `"boss"` marks the level boss
    pub archetype: String,
    pub hp: i32,
    pub mana: i32,
    pub damage: i32,
    pub glyph: char,
    pub color: String,
    pub fov: Option<i32>,
    pub delay: Option<u32>,
    /// Spell script cast with the spell key (classes only)
    pub spell: Option<String>,
}

impl Default for EntityConfig {
    fn default() -> Self {
        Self {
            name: None,
            archetype: "monster".to_string(),
            hp: 10,
            mana: 0,
            damage: 1,
            glyph: '?',
            color: "ui_default".to_string(),
            fov: None,
            delay: None,
            spell: None,
        }
    }
}

impl EntityConfig {
    pub fn is_boss(&self) -> bool {
        self.archetype == "boss"
    }

    pub fn renderable(&self) -> Renderable {
        Renderable::new(self.glyph, self.color.clone())
    }

    /// Fresh level-1 stats for a player of this class
    pub fn player_stats(&self, default_fov: i32) -> Stats {
        Stats {
            archetype: self.archetype.clone(),
            hp: self.hp,
            max_hp: self.hp,
            mana: self.mana,
            max_mana: self.mana,
            damage: self.damage,
            xp: 0,
            level: 1,
            fov_range: self.fov.unwrap_or(default_fov),
            gold: 0,
            action_delay: self.delay.unwrap_or(DEFAULT_PLAYER_DELAY),
            action_timer: 0,
        }
    }

    pub fn monster_stats(&self) -> Stats {
        Stats {
            archetype: self.archetype.clone(),
            hp: self.hp,
            max_hp: self.hp,
            mana: self.mana,
            max_mana: self.mana,
            damage: self.damage,
            xp: 0,
            level: 1,
            fov_range: self.fov.unwrap_or(0),
            gold: 0,
            action_delay: self.delay.unwrap_or(DEFAULT_MONSTER_DELAY),
            action_timer: 0,
        }
    }
}

/// Partial stats returned by a class's `level_up`; absent fields keep
/// their current value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelUp {
    pub max_hp: Option<i32>,
    pub max_mana: Option<i32>,
    pub damage: Option<i32>,
    pub delay: Option<u32>,
}

/// Returned by `get_start_config`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartConfig {
    pub start_level: String,
    pub initial_log_message: String,
}

impl Default for StartConfig {
    fn default() -> Self {
        Self {
            start_level: "levels/dungeon.lua".to_string(),
            initial_log_message: "Welcome!".to_string(),
        }
    }
}

/// Returned by a level's `get_level_config(depth)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelConfig {
    pub width: i32,
    pub height: i32,
    pub is_boss_level: bool,
    pub name: String,
    pub wall_color: String,
    pub floor_color: String,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            width: 80,
            height: 24,
            is_boss_level: false,
            name: "Unknown".to_string(),
            wall_color: "asset_wall".to_string(),
            floor_color: "asset_floor".to_string(),
        }
    }
}

/// An item script's `item_data` table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemData {
    pub name: String,
    pub glyph: char,
    pub color: String,
    pub kind: ItemKind,
    pub value: i32,
}

/// A spell script's `spell_data` table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpellData {
    pub name: String,
    pub mana_cost: i32,
    pub damage: i32,
    pub range: i32,
    pub delay: u32,
    pub glyph: char,
    pub color: String,
}

/// Capability interface to the content-scripting layer.
///
/// Every call is synchronous. Script paths are relative to the scripts
/// root. Failures come back as [`ScriptError`] and are never fatal.
pub trait Scripts {
    /// `get_start_config()` from the game script
    fn start_config(&mut self) -> Result<StartConfig, ScriptError>;

    /// `help_text` from the game script
    fn help_text(&mut self) -> Option<String>;

    /// `game_colors`: symbolic color name to `#rrggbb`
    fn theme(&mut self) -> Vec<(String, String)>;

    /// Selectable player classes (script paths)
    fn class_templates(&self) -> Vec<String>;

    fn init_stats(&mut self, script: &str) -> Result<EntityConfig, ScriptError>;

    fn level_up(&mut self, script: &str, current: &Stats) -> Result<LevelUp, ScriptError>;

    /// Desired `(dx, dy)` for a monster
    fn update_ai(&mut self, script: &str, monster: Position, player: Position) -> Result<(i32, i32), ScriptError>;

    /// Adjusted `(dx, dy)` for a projectile in flight
    fn update_projectile(&mut self, script: &str, pos: Position, dir: (i32, i32)) -> Result<(i32, i32), ScriptError>;

    fn level_config(&mut self, level: &str, depth: u32) -> Result<LevelConfig, ScriptError>;

    fn spawn_odds(&mut self, level: &str, depth: u32) -> Result<Weights, ScriptError>;

    fn loot_odds(&mut self, level: &str, depth: u32) -> Result<Weights, ScriptError>;

    fn next_level(&mut self, level: &str, depth: u32) -> Result<String, ScriptError>;

    fn boss_script(&mut self, level: &str, depth: u32) -> Result<String, ScriptError>;

    fn item_data(&mut self, script: &str) -> Result<ItemData, ScriptError>;

    /// Returns whether the picked-up item goes into the inventory
    fn on_pick(&mut self, script: &str, stats: &mut Stats, log: &mut MessageLog) -> Result<bool, ScriptError>;

    fn on_use(&mut self, script: &str, stats: &mut Stats, log: &mut MessageLog) -> Result<(), ScriptError>;

    fn spell_data(&mut self, script: &str) -> Result<SpellData, ScriptError>;
}
