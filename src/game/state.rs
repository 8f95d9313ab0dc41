//! Game world
//!
//! Owns everything a run needs: the registry, the current dungeon, the
//! message log, the inventory, the random source and the script layer.
//! Phases drive it through the methods here.

use std::collections::BTreeMap;
use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::messages::{tags, MessageLog};
use super::turn;
use crate::combat::{attack, cast_spell, update_projectiles};
use crate::config::GameConfig;
use crate::ecs::{move_monsters, EntityId, ItemKind, ItemTag, Registry, Renderable, Stats};
use crate::error::ScriptError;
use crate::scripting::{pick_weighted, EntityConfig, LevelConfig, Scripts};
use crate::world::{Dungeon, Position};

/// Player glyph and color
const PLAYER_GLYPH: char = '@';
const PLAYER_COLOR: &str = "player";
/// Stairs glyph
const STAIRS_GLYPH: char = '>';

/// Room roll in `0..=ROOM_ROLL_MAX`: below `LOOT_BELOW` drops loot, below
/// `MONSTER_BELOW` spawns a monster, anything else stays empty
const ROOM_ROLL_MAX: u32 = 10;
const LOOT_BELOW: u32 = 3;
const MONSTER_BELOW: u32 = 7;

/// What a directional input did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepResult {
    /// Wall in the way; no turn spent
    Blocked,
    /// Meleed whatever was there
    Attacked,
    /// Walked (and picked up anything on the cell)
    Moved,
    /// Took the stairs; a new level was built
    Descended,
}

impl StepResult {
    /// Whether the step costs the player's turn
    pub fn acted(&self) -> bool {
        matches!(self, Self::Attacked | Self::Moved)
    }
}

/// The main game struct that holds all run data
pub struct Game {
    pub registry: Registry,
    pub dungeon: Dungeon,
    pub log: MessageLog,
    pub inventory: Vec<ItemTag>,
    /// Levels descended this run, starting at 1
    pub depth: u32,
    /// Script path of the current level
    pub current_level: String,
    /// Config the current level was built from
    pub level: LevelConfig,
    /// Last movement direction; spells fly this way
    pub last_dir: (i32, i32),
    /// Ticks left before a freshly opened modal accepts input
    pub menu_lock: u32,
    /// Single-slot key buffer filled while the player is busy
    pub buffered: Option<super::Key>,
    pub player_name: String,
    /// Script path of the chosen class
    pub player_class: String,
    /// Spell script cast with the spell key
    pub player_spell: Option<String>,
    pub config: GameConfig,
    rng: StdRng,
    scripts: Box<dyn Scripts>,
    running: bool,
}

impl Game {
    /// Create a game with nothing built yet; the setup phase fills in the
    /// player and starts the run
    pub fn new(config: GameConfig, scripts: Box<dyn Scripts>) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            registry: Registry::new(),
            dungeon: Dungeon::new(0, 0),
            log: MessageLog::new(config.log_capacity),
            inventory: Vec::new(),
            depth: 0,
            current_level: String::new(),
            level: LevelConfig::default(),
            last_dir: (1, 0),
            menu_lock: 0,
            buffered: None,
            player_name: String::new(),
            player_class: String::new(),
            player_spell: None,
            config,
            rng,
            scripts,
            running: true,
        }
    }

    pub fn scripts(&mut self) -> &mut dyn Scripts {
        self.scripts.as_mut()
    }

    /// Selectable class scripts
    pub fn class_templates(&self) -> Vec<String> {
        self.scripts.class_templates()
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn stop(&mut self) {
        log::info!("Stopping run at depth {}", self.depth);
        self.running = false;
    }

    pub fn player_stats(&self) -> Option<&Stats> {
        self.registry.player_stats()
    }

    pub fn player_dead(&self) -> bool {
        self.registry.player_stats().is_some_and(|s| s.is_dead())
    }

    /// This level's boss has been killed
    pub fn victory(&self) -> bool {
        self.registry.is_boss_defeated()
    }

    /// Start a new run: greet, then build the start level from scratch
    pub fn start_run(&mut self) {
        let start = self.scripts.start_config().unwrap_or_else(|e| {
            log::warn!("get_start_config failed, using defaults: {}", e);
            Default::default()
        });
        self.log.add(start.initial_log_message);
        self.reset(true, &start.start_level);
    }

    /// Build a level.
    ///
    /// A full reset starts over at depth 1 with fresh class stats and an
    /// empty inventory. Otherwise the player's stats carry over and depth
    /// goes up by one. An empty `level` keeps the current level script.
    pub fn reset(&mut self, full: bool, level: &str) {
        let carried = if full {
            self.depth = 1;
            self.inventory.clear();
            self.last_dir = (1, 0);
            None
        } else {
            self.depth += 1;
            self.registry.player_stats().cloned()
        };
        if !level.is_empty() {
            self.current_level = level.to_string();
        }

        self.registry.clear();
        self.buffered = None;
        self.menu_lock = 0;

        let current = self.current_level.clone();
        self.level = self.scripts.level_config(&current, self.depth).unwrap_or_else(|e| {
            log::warn!("{}", e);
            self.log.add_colored(format!("Script Error: {}", e), tags::EMPHASIS);
            LevelConfig::default()
        });

        self.dungeon = Dungeon::new(self.level.width, self.level.height);
        if (self.dungeon.width, self.dungeon.height) != (self.level.width, self.level.height) {
            log::warn!(
                "{} asked for a {}x{} level, using {}x{}",
                current,
                self.level.width,
                self.level.height,
                self.dungeon.width,
                self.dungeon.height
            );
            self.level.width = self.dungeon.width;
            self.level.height = self.dungeon.height;
        }
        self.dungeon.generate(&mut self.rng);
        let (Some(spawn), Some(exit)) = (self.dungeon.spawn_room(), self.dungeon.exit_room()) else {
            panic!("generated dungeon has no rooms");
        };
        let (spawn, exit) = (spawn.center(), exit.center());

        self.spawn_player(spawn, carried);
        self.place_exit(exit);
        self.populate_rooms();
        self.refresh_fov();

        log::info!(
            "Built {} ({}) at depth {}: {}x{}, {} rooms, {} monsters",
            self.level.name,
            self.current_level,
            self.depth,
            self.dungeon.width,
            self.dungeon.height,
            self.dungeon.rooms.len(),
            self.registry.monsters.len()
        );
    }

    fn spawn_player(&mut self, pos: Position, carried: Option<Stats>) {
        let id = self.registry.spawn(
            pos,
            Renderable::new(PLAYER_GLYPH, PLAYER_COLOR),
            self.player_name.clone(),
        );
        self.registry.player_id = id;
        self.registry.scripts.insert(id, self.player_class.clone());

        let stats = match carried {
            Some(mut stats) => {
                stats.action_timer = 0;
                stats
            }
            None => {
                let class = self.player_class.clone();
                let config = self.scripts.init_stats(&class).unwrap_or_else(|e| {
                    log::warn!("{}", e);
                    self.log.add_colored(format!("Script Error: {}", e), tags::EMPHASIS);
                    EntityConfig::default()
                });
                self.player_spell = config.spell.clone();
                config.player_stats(self.config.default_fov)
            }
        };
        self.registry.stats.insert(id, stats);
    }

    /// Boss on boss levels, otherwise stairs to the next level
    fn place_exit(&mut self, pos: Position) {
        if self.level.is_boss_level {
            let current = self.current_level.clone();
            match self.scripts.boss_script(&current, self.depth) {
                Ok(boss) => {
                    if self.spawn_monster(pos, &boss).is_some() {
                        return;
                    }
                }
                Err(e) => log::warn!("{}", e),
            }
            log::warn!("No boss for {}, placing stairs instead", current);
        }

        let next = self.next_level_path();
        let id = self
            .registry
            .spawn(pos, Renderable::new(STAIRS_GLYPH, tags::GOLD), "Stairs");
        self.registry.items.insert(
            id,
            ItemTag {
                kind: ItemKind::Stairs,
                value: 0,
                name: next,
                script: String::new(),
            },
        );
    }

    /// Roll every room between the first and the last for loot or a monster
    fn populate_rooms(&mut self) {
        let current = self.current_level.clone();
        let monster_odds = self.scripts.spawn_odds(&current, self.depth).unwrap_or_else(|e| {
            log::warn!("{}", e);
            Vec::new()
        });
        let loot_odds = self.scripts.loot_odds(&current, self.depth).unwrap_or_else(|e| {
            log::warn!("{}", e);
            Vec::new()
        });

        let centers: Vec<Position> = self.dungeon.inner_rooms().iter().map(|r| r.center()).collect();
        let mut spawned: BTreeMap<String, u32> = BTreeMap::new();

        for center in centers {
            let roll = self.rng.gen_range(0..=ROOM_ROLL_MAX);
            if roll < LOOT_BELOW {
                let path = pick_weighted(&loot_odds, &mut self.rng);
                if !path.is_empty() {
                    self.spawn_item(center, &path);
                }
            } else if roll < MONSTER_BELOW {
                let path = pick_weighted(&monster_odds, &mut self.rng);
                if !path.is_empty() && self.spawn_monster(center, &path).is_some() {
                    *spawned.entry(stem(&path)).or_default() += 1;
                }
            }
        }

        if self.config.debug {
            let summary: Vec<String> = spawned.iter().map(|(name, n)| format!("{} x{}", name, n)).collect();
            self.log
                .add_colored(format!("Debug Spawn: {}", summary.join(" ")), tags::GOLD);
        }
    }

    /// Spawn a monster from its script. Returns `None` (and logs why) when
    /// the script cannot provide stats.
    pub fn spawn_monster(&mut self, pos: Position, script: &str) -> Option<EntityId> {
        if self.config.debug {
            self.log.add_colored(format!("Spawning: {}", script), tags::EMPHASIS);
        }
        let config = match self.scripts.init_stats(script) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("{}", e);
                self.log.add_colored(format!("Script Error: {}", e), tags::EMPHASIS);
                return None;
            }
        };

        let name = config.name.clone().unwrap_or_else(|| stem(script));
        let id = self.registry.spawn(pos, config.renderable(), name);
        self.registry.stats.insert(id, config.monster_stats());
        self.registry.scripts.insert(id, script.to_string());
        self.registry.monsters.push(id);
        if config.is_boss() {
            self.registry.set_boss(id);
        }
        Some(id)
    }

    /// Spawn an item from its script's `item_data`
    pub fn spawn_item(&mut self, pos: Position, script: &str) -> Option<EntityId> {
        let data = match self.scripts.item_data(script) {
            Ok(data) => data,
            Err(e) => {
                log::warn!("{}", e);
                return None;
            }
        };
        let id = self
            .registry
            .spawn(pos, Renderable::new(data.glyph, data.color), data.name.clone());
        self.registry.items.insert(
            id,
            ItemTag {
                kind: data.kind,
                value: data.value,
                name: data.name,
                script: script.to_string(),
            },
        );
        Some(id)
    }

    /// Where the current level's stairs lead; the current level on failure
    pub fn next_level_path(&mut self) -> String {
        let current = self.current_level.clone();
        self.scripts.next_level(&current, self.depth).unwrap_or_else(|e| {
            log::warn!("{}", e);
            current
        })
    }

    /// Move or attack in a direction. Does not arm the player's timer.
    pub fn player_step(&mut self, dir: (i32, i32)) -> StepResult {
        self.last_dir = dir;
        let player = self.registry.player_id;
        let Some(pos) = self.registry.player_position() else {
            return StepResult::Blocked;
        };
        let target = pos.offset(dir.0, dir.1);

        if let Some(enemy) = self.registry.actor_at(target, player) {
            attack(&mut self.registry, player, enemy, &mut self.log, self.scripts.as_mut());
            return StepResult::Attacked;
        }
        if !self.dungeon.is_walkable(target.x, target.y) {
            return StepResult::Blocked;
        }

        self.registry.positions.insert(player, target);
        if let Some(item) = self.registry.item_at(target) {
            if self.pick_up(item) {
                return StepResult::Descended;
            }
        }
        StepResult::Moved
    }

    /// Take whatever item is under the player. Returns true for stairs, after
    /// the next level has been built.
    fn pick_up(&mut self, item: EntityId) -> bool {
        let Some(tag) = self.registry.items.get(&item).cloned() else {
            return false;
        };

        match tag.kind {
            ItemKind::Stairs => {
                log::debug!("Taking stairs to {}", tag.name);
                self.reset(false, &tag.name);
                return true;
            }
            ItemKind::Gold => {
                if let Some(stats) = self.registry.player_stats_mut() {
                    stats.gold += tag.value;
                }
                self.log
                    .add_colored(format!("You pick up {} gold.", tag.value), tags::GOLD);
            }
            ItemKind::Consumable => {
                let player = self.registry.player_id;
                let keep = match self.registry.stats.get_mut(&player) {
                    Some(stats) => match self.scripts.on_pick(&tag.script, stats, &mut self.log) {
                        Ok(keep) => keep,
                        Err(e) if e.is_missing_function() => true,
                        Err(e) => {
                            log::warn!("{}", e);
                            self.log.add_colored(format!("Script Error: {}", e), tags::EMPHASIS);
                            true
                        }
                    },
                    None => true,
                };
                if keep {
                    self.log.add(format!("Picked up {}", tag.name));
                    self.inventory.push(tag);
                }
            }
        }
        self.registry.destroy_entity(item);
        false
    }

    /// Cast the class spell toward the last movement direction
    pub fn cast(&mut self) -> bool {
        let Some(spell) = self.player_spell.clone() else {
            self.log.add_colored("You don't know any spells.", tags::EMPHASIS);
            return false;
        };
        let player = self.registry.player_id;
        cast_spell(
            &mut self.registry,
            &mut self.log,
            self.scripts.as_mut(),
            &spell,
            player,
            self.last_dir,
        )
    }

    /// Use inventory slot `slot` (0-based). The item is consumed only when
    /// its `on_use` succeeds.
    pub fn use_item(&mut self, slot: usize) -> Result<(), ScriptError> {
        let Some(item) = self.inventory.get(slot).cloned() else {
            return Err(ScriptError::invalid("inventory", format!("no item in slot {}", slot + 1)));
        };
        let player = self.registry.player_id;
        let Some(stats) = self.registry.stats.get_mut(&player) else {
            return Err(ScriptError::invalid(&item.script, "player has no stats"));
        };
        self.scripts.on_use(&item.script, stats, &mut self.log)?;
        self.inventory.remove(slot);
        Ok(())
    }

    /// The player spends their turn
    pub fn arm_player(&mut self) {
        if let Some(stats) = self.registry.player_stats_mut() {
            stats.arm();
        }
    }

    pub fn player_ready(&self) -> bool {
        turn::player_ready(&self.registry)
    }

    /// One unit of simulated time: the modal debounce and every actor's timer
    pub fn tick(&mut self) {
        self.menu_lock = self.menu_lock.saturating_sub(1);
        turn::tick_timers(&mut self.registry);
    }

    pub fn advance_projectiles(&mut self) {
        update_projectiles(&mut self.registry, &self.dungeon, &mut self.log, self.scripts.as_mut());
    }

    pub fn run_monsters(&mut self) {
        move_monsters(
            &mut self.registry,
            &self.dungeon,
            &mut self.log,
            self.scripts.as_mut(),
            self.config.debug,
        );
    }

    pub fn refresh_fov(&mut self) {
        let Some(pos) = self.registry.player_position() else {
            return;
        };
        let range = self
            .registry
            .player_stats()
            .map(|s| s.fov_range)
            .unwrap_or(self.config.default_fov);
        self.dungeon.update_fov(pos.x, pos.y, range);
    }

    pub fn help_text(&mut self) -> String {
        self.scripts
            .help_text()
            .unwrap_or_else(|| "No help text defined.".to_string())
    }
}

fn stem(script: &str) -> String {
    Path::new(script)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| script.to_string())
}
