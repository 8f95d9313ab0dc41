//! Deterministic [`Scripts`] double for tests

use std::collections::HashMap;

use super::{EntityConfig, ItemData, LevelConfig, LevelUp, Scripts, SpellData, StartConfig, Weights};
use crate::ecs::{ItemKind, Stats};
use crate::error::ScriptError;
use crate::game::MessageLog;
use crate::world::Position;

/// Fixed tables and decisions keyed by script path. Anything not
/// registered behaves like a missing script.
#[derive(Debug, Default)]
pub struct StubScripts {
    pub start: StartConfig,
    pub classes: Vec<String>,
    pub entities: HashMap<String, EntityConfig>,
    pub ai: HashMap<String, (i32, i32)>,
    pub steering: HashMap<String, (i32, i32)>,
    pub level_ups: HashMap<String, LevelUp>,
    pub levels: HashMap<String, LevelConfig>,
    pub spawn_odds: Weights,
    pub loot_odds: Weights,
    pub next_level: Option<String>,
    pub boss: Option<String>,
    pub items: HashMap<String, ItemData>,
    /// `on_pick` result; absent means the hook is missing
    pub keep_on_pick: HashMap<String, bool>,
    /// Amount `on_use` heals; absent means the hook is missing
    pub heals: HashMap<String, i32>,
    pub spells: HashMap<String, SpellData>,
    /// Every `(script, function)` called, in order
    pub calls: Vec<(String, String)>,
}

fn missing(script: &str, function: &str) -> ScriptError {
    ScriptError::MissingFunction {
        script: script.to_string(),
        function: function.to_string(),
    }
}

impl StubScripts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entity(mut self, script: &str, config: EntityConfig) -> Self {
        self.entities.insert(script.to_string(), config);
        self
    }

    pub fn with_ai(mut self, script: &str, step: (i32, i32)) -> Self {
        self.ai.insert(script.to_string(), step);
        self
    }

    pub fn with_level(mut self, level: &str, config: LevelConfig) -> Self {
        self.levels.insert(level.to_string(), config);
        self
    }

    pub fn with_spell(mut self, script: &str, spell: SpellData) -> Self {
        self.spells.insert(script.to_string(), spell);
        self
    }

    pub fn with_item(mut self, script: &str, item: ItemData) -> Self {
        self.items.insert(script.to_string(), item);
        self
    }

    pub fn called(&self, function: &str) -> usize {
        self.calls.iter().filter(|(_, f)| f == function).count()
    }

    fn record(&mut self, script: &str, function: &str) {
        self.calls.push((script.to_string(), function.to_string()));
    }
}

/// A plain consumable called `name`
pub fn potion(name: &str) -> ItemData {
    ItemData {
        name: name.to_string(),
        glyph: '!',
        color: "ui_default".to_string(),
        kind: ItemKind::Consumable,
        value: 0,
    }
}

/// A basic fireball
pub fn fireball(mana_cost: i32, damage: i32, range: i32) -> SpellData {
    SpellData {
        name: "Fireball".to_string(),
        mana_cost,
        damage,
        range,
        delay: 1,
        glyph: '*',
        color: "fx_fire".to_string(),
    }
}

impl Scripts for StubScripts {
    fn start_config(&mut self) -> Result<StartConfig, ScriptError> {
        self.record("game.lua", "get_start_config");
        Ok(self.start.clone())
    }

    fn help_text(&mut self) -> Option<String> {
        Some("Arrows move. f casts.".to_string())
    }

    fn theme(&mut self) -> Vec<(String, String)> {
        vec![("ui_gold".to_string(), "#ffd700".to_string())]
    }

    fn class_templates(&self) -> Vec<String> {
        self.classes.clone()
    }

    fn init_stats(&mut self, script: &str) -> Result<EntityConfig, ScriptError> {
        self.record(script, "get_init_stats");
        self.entities
            .get(script)
            .cloned()
            .ok_or_else(|| missing(script, "get_init_stats"))
    }

    fn level_up(&mut self, script: &str, _current: &Stats) -> Result<LevelUp, ScriptError> {
        self.record(script, "level_up");
        self.level_ups
            .get(script)
            .cloned()
            .ok_or_else(|| missing(script, "level_up"))
    }

    fn update_ai(&mut self, script: &str, _monster: Position, _player: Position) -> Result<(i32, i32), ScriptError> {
        self.record(script, "update_ai");
        self.ai.get(script).copied().ok_or_else(|| missing(script, "update_ai"))
    }

    fn update_projectile(&mut self, script: &str, _pos: Position, dir: (i32, i32)) -> Result<(i32, i32), ScriptError> {
        self.record(script, "update_projectile");
        Ok(self.steering.get(script).copied().unwrap_or(dir))
    }

    fn level_config(&mut self, level: &str, _depth: u32) -> Result<LevelConfig, ScriptError> {
        self.record(level, "get_level_config");
        self.levels
            .get(level)
            .cloned()
            .ok_or_else(|| missing(level, "get_level_config"))
    }

    fn spawn_odds(&mut self, level: &str, _depth: u32) -> Result<Weights, ScriptError> {
        self.record(level, "get_spawn_odds");
        Ok(self.spawn_odds.clone())
    }

    fn loot_odds(&mut self, level: &str, _depth: u32) -> Result<Weights, ScriptError> {
        self.record(level, "get_loot_odds");
        Ok(self.loot_odds.clone())
    }

    fn next_level(&mut self, level: &str, _depth: u32) -> Result<String, ScriptError> {
        self.record(level, "get_next_level");
        self.next_level.clone().ok_or_else(|| missing(level, "get_next_level"))
    }

    fn boss_script(&mut self, level: &str, _depth: u32) -> Result<String, ScriptError> {
        self.record(level, "get_boss_script");
        self.boss.clone().ok_or_else(|| missing(level, "get_boss_script"))
    }

    fn item_data(&mut self, script: &str) -> Result<ItemData, ScriptError> {
        self.record(script, "item_data");
        self.items.get(script).cloned().ok_or_else(|| ScriptError::NotFound {
            path: script.to_string(),
            reason: "not registered".to_string(),
        })
    }

    fn on_pick(&mut self, script: &str, _stats: &mut Stats, log: &mut MessageLog) -> Result<bool, ScriptError> {
        self.record(script, "on_pick");
        let keep = *self.keep_on_pick.get(script).ok_or_else(|| missing(script, "on_pick"))?;
        log.add(format!("Picked up via {}", script));
        Ok(keep)
    }

    fn on_use(&mut self, script: &str, stats: &mut Stats, log: &mut MessageLog) -> Result<(), ScriptError> {
        self.record(script, "on_use");
        let heal = *self.heals.get(script).ok_or_else(|| missing(script, "on_use"))?;
        stats.hp = (stats.hp + heal).min(stats.max_hp);
        log.add(format!("You recover {} HP", heal));
        Ok(())
    }

    fn spell_data(&mut self, script: &str) -> Result<SpellData, ScriptError> {
        self.record(script, "spell_data");
        self.spells.get(script).cloned().ok_or_else(|| ScriptError::NotFound {
            path: script.to_string(),
            reason: "not registered".to_string(),
        })
    }
}
