//! Experience and leveling
//!
//! Linear thresholds: reaching `level * 100` XP grants the next level. The
//! player's class script decides the new stats.

use crate::ecs::Registry;
use crate::game::{tags, MessageLog};
use crate::scripting::Scripts;

/// XP needed to leave `level`
pub fn xp_for_next_level(level: i32) -> i32 {
    level * 100
}

/// Grant at most one level to the player if they have the XP for it.
///
/// The level always goes up once the threshold is met. New maxima come from
/// the class's `level_up`; when that fails the stats stay as they were.
/// Returns whether a level was gained.
pub fn check_level_up(registry: &mut Registry, log: &mut MessageLog, scripts: &mut dyn Scripts) -> bool {
    let class = registry.scripts.get(&registry.player_id).cloned();
    let Some(stats) = registry.player_stats_mut() else {
        return false;
    };
    if stats.xp < xp_for_next_level(stats.level) {
        return false;
    }
    stats.level += 1;

    let result = match class {
        Some(class) => scripts.level_up(&class, stats),
        None => {
            log::warn!("player has no class script, level {} grants nothing", stats.level);
            log.add_colored(format!("You are now Level {}", stats.level), tags::GOLD);
            return true;
        }
    };

    match result {
        Ok(up) => {
            if let Some(max_hp) = up.max_hp {
                stats.max_hp = max_hp;
            }
            if let Some(max_mana) = up.max_mana {
                stats.max_mana = max_mana;
            }
            if let Some(damage) = up.damage {
                stats.damage = damage;
            }
            if let Some(delay) = up.delay {
                stats.action_delay = delay;
            }
            stats.hp = stats.max_hp;
            stats.mana = stats.max_mana;
            log.add_colored(format!("Level Up! You are now Level {}", stats.level), tags::GOLD);
        }
        Err(e) => {
            log::warn!("level_up failed: {}", e);
            log.add_colored(format!("Script Error: {}", e), tags::EMPHASIS);
        }
    }
    true
}
