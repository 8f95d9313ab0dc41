//! Lua content layer
//!
//! Each call loads the script file into the shared global environment and
//! calls the named global function, so every content file can define the
//! same hooks (`get_init_stats`, `update_ai`, ...) without clashing.

use std::cell::Cell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use mlua::{Function, FromLuaMulti, HookTriggers, IntoLuaMulti, Lua, Table, Value, VmState};
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::{
    EntityConfig, ItemData, LevelConfig, LevelUp, Scripts, SpellData, StartConfig, Weights,
    DEFAULT_PROJECTILE_DELAY,
};
use crate::ecs::{ItemKind, Stats};
use crate::error::ScriptError;
use crate::game::{tags, MessageLog};
use crate::world::Position;

/// Game-wide script holding the start config, help text and colors
pub const GAME_SCRIPT: &str = "game.lua";
/// Directory (under the scripts root) holding player classes
pub const CLASS_DIR: &str = "class";

/// Instructions between budget checks
const HOOK_INTERVAL: u32 = 1_000;
/// Instructions one script call may run before it is aborted
pub const INSTRUCTION_BUDGET: u64 = 10_000_000;

/// [`Scripts`] backed by an embedded Lua 5.4 interpreter
pub struct LuaScripts {
    lua: Lua,
    root: PathBuf,
    sources: HashMap<String, String>,
    classes: Vec<String>,
}

impl LuaScripts {
    /// Create the interpreter and discover the class templates under `root`.
    /// `seed` drives the scripts' `roll(expr)` global; `SCRIPTS_DIR` holds the
    /// root so scripts can `dofile` shared helpers.
    pub fn new(root: impl Into<PathBuf>, seed: u64) -> Result<Self, ScriptError> {
        let root = root.into();
        let lua = Lua::new();
        lua.set_app_data(StdRng::seed_from_u64(seed));

        let roll = lua
            .create_function(|lua, expr: String| {
                let mut rng = lua
                    .app_data_mut::<StdRng>()
                    .ok_or_else(|| mlua::Error::RuntimeError("roll: no random source".into()))?;
                super::roll(&expr, &mut *rng).map_err(|e| mlua::Error::RuntimeError(e.to_string()))
            })
            .map_err(|e| ScriptError::runtime("<prelude>", e))?;
        lua.globals()
            .set("roll", roll)
            .map_err(|e| ScriptError::runtime("<prelude>", e))?;
        lua.globals()
            .set("SCRIPTS_DIR", root.to_string_lossy().into_owned())
            .map_err(|e| ScriptError::runtime("<prelude>", e))?;

        let classes = discover(&root, CLASS_DIR);
        log::info!("Discovered {} class template(s) under {}", classes.len(), root.display());

        Ok(Self {
            lua,
            root,
            sources: HashMap::new(),
            classes,
        })
    }

    /// Start a fresh instruction budget for the next script call. A hook
    /// that runs past it fails with a runtime error instead of hanging.
    fn arm_budget(&self) {
        let checks = Cell::new(0u64);
        let limit = INSTRUCTION_BUDGET / u64::from(HOOK_INTERVAL);
        self.lua.set_hook(
            HookTriggers::new().every_nth_instruction(HOOK_INTERVAL),
            move |_lua, _debug| {
                checks.set(checks.get() + 1);
                if checks.get() > limit {
                    return Err(mlua::Error::RuntimeError(format!(
                        "script exceeded its budget of {} instructions",
                        INSTRUCTION_BUDGET
                    )));
                }
                Ok(VmState::Continue)
            },
        );
    }

    /// Run a script file so its globals are defined. Also arms the
    /// instruction budget, which covers the load and the call after it.
    fn load(&mut self, script: &str) -> Result<(), ScriptError> {
        if !self.sources.contains_key(script) {
            let path = self.root.join(script);
            let source = fs::read_to_string(&path).map_err(|e| ScriptError::NotFound {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
            self.sources.insert(script.to_string(), source);
        }
        self.arm_budget();
        let source = &self.sources[script];
        self.lua
            .load(source.as_str())
            .set_name(script)
            .exec()
            .map_err(|e| ScriptError::runtime(script, e))
    }

    /// Load `script`, then call its global `function`. The global is cleared
    /// first so a hook left over from another file is never called.
    fn call<A, R>(&mut self, script: &str, function: &str, args: A) -> Result<R, ScriptError>
    where
        A: IntoLuaMulti,
        R: FromLuaMulti,
    {
        let globals = self.lua.globals();
        globals
            .set(function, Value::Nil)
            .map_err(|e| ScriptError::runtime(script, e))?;
        self.load(script)?;

        let func: Option<Function> = globals
            .get(function)
            .map_err(|e| ScriptError::invalid(script, e))?;
        let func = func.ok_or_else(|| ScriptError::MissingFunction {
            script: script.to_string(),
            function: function.to_string(),
        })?;
        func.call(args).map_err(|e| ScriptError::runtime(script, e))
    }

    /// Load `script`, then read its global table `name`
    fn table(&mut self, script: &str, name: &str) -> Result<Table, ScriptError> {
        let globals = self.lua.globals();
        globals
            .set(name, Value::Nil)
            .map_err(|e| ScriptError::runtime(script, e))?;
        self.load(script)?;
        let table: Option<Table> = globals.get(name).map_err(|e| ScriptError::invalid(script, e))?;
        table.ok_or_else(|| ScriptError::invalid(script, format!("missing table {}", name)))
    }

    fn stats_table(&self, stats: &Stats) -> mlua::Result<Table> {
        let t = self.lua.create_table()?;
        t.set("type", stats.archetype.as_str())?;
        t.set("hp", stats.hp)?;
        t.set("max_hp", stats.max_hp)?;
        t.set("mana", stats.mana)?;
        t.set("max_mana", stats.max_mana)?;
        t.set("damage", stats.damage)?;
        t.set("xp", stats.xp)?;
        t.set("level", stats.level)?;
        t.set("fov", stats.fov_range)?;
        t.set("gold", stats.gold)?;
        t.set("delay", stats.action_delay)?;
        Ok(t)
    }

    /// A `log` object whose `add(self, text [, color])` appends to `entries`
    fn log_table(&self) -> mlua::Result<Table> {
        let log = self.lua.create_table()?;
        log.set("entries", self.lua.create_table()?)?;
        let add = self
            .lua
            .create_function(|lua, (this, text, color): (Table, String, Option<String>)| {
                let entries: Table = this.get("entries")?;
                let entry = lua.create_table()?;
                entry.set("text", text)?;
                entry.set("color", color)?;
                entries.push(entry)
            })?;
        log.set("add", add)?;
        Ok(log)
    }

    /// Run an effect hook with a stats table and a log object. Log entries
    /// are always copied back; stats only when the hook succeeded.
    fn effect<R: FromLuaMulti>(
        &mut self,
        script: &str,
        function: &str,
        stats: &mut Stats,
        log: &mut MessageLog,
    ) -> Result<R, ScriptError> {
        let (table, log_obj) = self
            .stats_table(stats)
            .and_then(|t| Ok((t, self.log_table()?)))
            .map_err(|e| ScriptError::runtime(script, e))?;

        let result = self.call(script, function, (table.clone(), log_obj.clone()));

        read_back(&log_obj, log).map_err(|e| ScriptError::invalid(script, e))?;
        let value = result?;
        read_stats(&table, stats).map_err(|e| ScriptError::invalid(script, e))?;
        Ok(value)
    }

    fn weights(&mut self, level: &str, function: &str, depth: u32) -> Result<Weights, ScriptError> {
        let table: Table = self.call(level, function, depth)?;
        let mut weights = Vec::new();
        for pair in table.pairs::<String, u32>() {
            let (choice, weight) = pair.map_err(|e| ScriptError::invalid(level, e))?;
            weights.push((choice, weight));
        }
        // Lua table iteration order is unspecified
        weights.sort();
        Ok(weights)
    }
}

impl Scripts for LuaScripts {
    fn start_config(&mut self) -> Result<StartConfig, ScriptError> {
        let t: Table = self.call(GAME_SCRIPT, "get_start_config", ())?;
        let defaults = StartConfig::default();
        let field = |key: &str| -> Result<Option<String>, ScriptError> {
            t.get(key).map_err(|e| ScriptError::invalid(GAME_SCRIPT, e))
        };
        Ok(StartConfig {
            start_level: field("start_level")?.unwrap_or(defaults.start_level),
            initial_log_message: field("initial_log_message")?.unwrap_or(defaults.initial_log_message),
        })
    }

    fn help_text(&mut self) -> Option<String> {
        let globals = self.lua.globals();
        let _ = globals.set("help_text", Value::Nil);
        if let Err(e) = self.load(GAME_SCRIPT) {
            log::warn!("{}", e);
            return None;
        }
        globals.get::<Option<String>>("help_text").ok().flatten()
    }

    fn theme(&mut self) -> Vec<(String, String)> {
        let table = match self.table(GAME_SCRIPT, "game_colors") {
            Ok(t) => t,
            Err(e) => {
                log::warn!("No theme: {}", e);
                return Vec::new();
            }
        };
        let mut theme: Vec<(String, String)> = table
            .pairs::<String, String>()
            .filter_map(|pair| pair.ok())
            .collect();
        theme.sort();
        theme
    }

    fn class_templates(&self) -> Vec<String> {
        self.classes.clone()
    }

    fn init_stats(&mut self, script: &str) -> Result<EntityConfig, ScriptError> {
        let t: Table = self.call(script, "get_init_stats", ())?;
        entity_config(&t).map_err(|e| ScriptError::invalid(script, e))
    }

    fn level_up(&mut self, script: &str, current: &Stats) -> Result<LevelUp, ScriptError> {
        let table = self.stats_table(current).map_err(|e| ScriptError::runtime(script, e))?;
        let t: Table = self.call(script, "level_up", table)?;
        let read = || -> mlua::Result<LevelUp> {
            Ok(LevelUp {
                max_hp: t.get("max_hp")?,
                max_mana: t.get("max_mana")?,
                damage: t.get("damage")?,
                delay: t.get("delay")?,
            })
        };
        read().map_err(|e| ScriptError::invalid(script, e))
    }

    fn update_ai(&mut self, script: &str, monster: Position, player: Position) -> Result<(i32, i32), ScriptError> {
        self.call(script, "update_ai", (monster.x, monster.y, player.x, player.y))
    }

    fn update_projectile(&mut self, script: &str, pos: Position, dir: (i32, i32)) -> Result<(i32, i32), ScriptError> {
        self.call(script, "update_projectile", (pos.x, pos.y, dir.0, dir.1))
    }

    fn level_config(&mut self, level: &str, depth: u32) -> Result<LevelConfig, ScriptError> {
        let t: Table = self.call(level, "get_level_config", depth)?;
        let defaults = LevelConfig::default();
        let read = || -> mlua::Result<LevelConfig> {
            Ok(LevelConfig {
                width: t.get::<Option<i32>>("width")?.unwrap_or(defaults.width),
                height: t.get::<Option<i32>>("height")?.unwrap_or(defaults.height),
                is_boss_level: t.get::<Option<bool>>("is_boss_level")?.unwrap_or(false),
                name: t.get::<Option<String>>("name")?.unwrap_or(defaults.name.clone()),
                wall_color: t.get::<Option<String>>("wall_color")?.unwrap_or(defaults.wall_color.clone()),
                floor_color: t.get::<Option<String>>("floor_color")?.unwrap_or(defaults.floor_color.clone()),
            })
        };
        read().map_err(|e| ScriptError::invalid(level, e))
    }

    fn spawn_odds(&mut self, level: &str, depth: u32) -> Result<Weights, ScriptError> {
        self.weights(level, "get_spawn_odds", depth)
    }

    fn loot_odds(&mut self, level: &str, depth: u32) -> Result<Weights, ScriptError> {
        self.weights(level, "get_loot_odds", depth)
    }

    fn next_level(&mut self, level: &str, depth: u32) -> Result<String, ScriptError> {
        self.call(level, "get_next_level", depth)
    }

    fn boss_script(&mut self, level: &str, depth: u32) -> Result<String, ScriptError> {
        self.call(level, "get_boss_script", depth)
    }

    fn item_data(&mut self, script: &str) -> Result<ItemData, ScriptError> {
        let t = self.table(script, "item_data")?;
        let read = || -> mlua::Result<ItemData> {
            let kind = match t.get::<Option<String>>("type")?.as_deref() {
                Some("gold") => ItemKind::Gold,
                _ => ItemKind::Consumable,
            };
            Ok(ItemData {
                name: t.get::<Option<String>>("name")?.unwrap_or_else(|| stem(script)),
                glyph: first_char(t.get("glyph")?),
                color: t.get::<Option<String>>("color")?.unwrap_or_else(|| tags::DEFAULT.to_string()),
                kind,
                value: t.get::<Option<i32>>("value")?.unwrap_or(0),
            })
        };
        read().map_err(|e| ScriptError::invalid(script, e))
    }

    fn on_pick(&mut self, script: &str, stats: &mut Stats, log: &mut MessageLog) -> Result<bool, ScriptError> {
        let keep: Option<bool> = self.effect(script, "on_pick", stats, log)?;
        Ok(keep.unwrap_or(true))
    }

    fn on_use(&mut self, script: &str, stats: &mut Stats, log: &mut MessageLog) -> Result<(), ScriptError> {
        let ok: Option<bool> = self.effect(script, "on_use", stats, log)?;
        match ok {
            Some(false) => Err(ScriptError::runtime(script, "on_use reported failure")),
            _ => Ok(()),
        }
    }

    fn spell_data(&mut self, script: &str) -> Result<SpellData, ScriptError> {
        let t = self.table(script, "spell_data")?;
        let read = || -> mlua::Result<SpellData> {
            Ok(SpellData {
                name: t.get::<Option<String>>("name")?.unwrap_or_else(|| stem(script)),
                mana_cost: t.get::<Option<i32>>("mana_cost")?.unwrap_or(0),
                damage: t.get::<Option<i32>>("damage")?.unwrap_or(0),
                range: t.get::<Option<i32>>("range")?.unwrap_or(0),
                delay: t.get::<Option<u32>>("delay")?.unwrap_or(DEFAULT_PROJECTILE_DELAY),
                glyph: first_char(t.get("glyph")?),
                color: t.get::<Option<String>>("color")?.unwrap_or_else(|| tags::FIRE.to_string()),
            })
        };
        read().map_err(|e| ScriptError::invalid(script, e))
    }
}

fn entity_config(t: &Table) -> mlua::Result<EntityConfig> {
    let defaults = EntityConfig::default();
    Ok(EntityConfig {
        name: t.get("name")?,
        archetype: t.get::<Option<String>>("type")?.unwrap_or(defaults.archetype),
        hp: t.get::<Option<i32>>("hp")?.unwrap_or(defaults.hp),
        mana: t.get::<Option<i32>>("mana")?.unwrap_or(defaults.mana),
        damage: t.get::<Option<i32>>("damage")?.unwrap_or(defaults.damage),
        glyph: first_char(t.get("glyph")?),
        color: t.get::<Option<String>>("color")?.unwrap_or(defaults.color),
        fov: t.get("fov")?,
        delay: t.get("delay")?,
        spell: t.get("spell")?,
    })
}

/// Copy the fields an effect hook may change back into `stats`
fn read_stats(t: &Table, stats: &mut Stats) -> mlua::Result<()> {
    let fields: [(&str, &mut i32); 8] = [
        ("hp", &mut stats.hp),
        ("max_hp", &mut stats.max_hp),
        ("mana", &mut stats.mana),
        ("max_mana", &mut stats.max_mana),
        ("damage", &mut stats.damage),
        ("xp", &mut stats.xp),
        ("fov", &mut stats.fov_range),
        ("gold", &mut stats.gold),
    ];
    for (key, slot) in fields {
        if let Some(v) = t.get::<Option<i32>>(key)? {
            *slot = v;
        }
    }
    if let Some(delay) = t.get::<Option<u32>>("delay")? {
        stats.action_delay = delay;
    }
    Ok(())
}

fn read_back(log_obj: &Table, log: &mut MessageLog) -> mlua::Result<()> {
    let entries: Table = log_obj.get("entries")?;
    for entry in entries.sequence_values::<Table>() {
        let entry = entry?;
        let text: String = entry.get("text")?;
        match entry.get::<Option<String>>("color")? {
            Some(color) => log.add_colored(text, color),
            None => log.add(text),
        }
    }
    Ok(())
}

fn first_char(s: Option<String>) -> char {
    s.and_then(|s| s.chars().next()).unwrap_or('?')
}

fn stem(script: &str) -> String {
    Path::new(script)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| script.to_string())
}

/// `.lua` files directly under `root/dir`, as script paths relative to
/// `root`, sorted
fn discover(root: &Path, dir: &str) -> Vec<String> {
    let Ok(entries) = fs::read_dir(root.join(dir)) else {
        return Vec::new();
    };
    let mut found: Vec<String> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "lua"))
        .filter_map(|p| p.file_name().map(|n| format!("{}/{}", dir, n.to_string_lossy())))
        .collect();
    found.sort();
    found
}
