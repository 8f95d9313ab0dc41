//! ECS Systems
//!
//! The monster behavior driver: each ready monster asks its script for a
//! step, and the step is resolved with the same rules as the player's.

use crate::combat::attack;
use crate::ecs::{EntityId, Registry};
use crate::game::turn::ready_monsters;
use crate::game::{tags, MessageLog};
use crate::scripting::Scripts;
use crate::world::{Dungeon, Position};

/// What a monster does with its turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonsterAction {
    /// Melee the player
    Attack,
    /// Step into an open cell
    Move(Position),
    /// Blocked, or chose not to move
    Wait,
}

/// Resolve a desired step against the map and the occupants
pub fn resolve_step(registry: &Registry, dungeon: &Dungeon, from: Position, step: (i32, i32), player: Position) -> MonsterAction {
    if step == (0, 0) {
        return MonsterAction::Wait;
    }
    let target = from.offset(step.0, step.1);
    if target == player {
        MonsterAction::Attack
    } else if dungeon.is_walkable(target.x, target.y) && registry.entity_at(target).is_none() {
        MonsterAction::Move(target)
    } else {
        MonsterAction::Wait
    }
}

/// Run one turn for every monster whose timer is at zero, in spawn order.
///
/// A monster whose script fails does nothing this turn. Returns the
/// monsters that acted.
pub fn move_monsters(
    registry: &mut Registry,
    dungeon: &Dungeon,
    log: &mut MessageLog,
    scripts: &mut dyn Scripts,
    debug: bool,
) -> Vec<EntityId> {
    let mut acted = Vec::new();

    for id in ready_monsters(registry) {
        let Some(player_pos) = registry.player_position() else {
            break;
        };
        if registry.player_stats().is_some_and(|s| s.is_dead()) {
            break;
        }
        let (Some(pos), Some(script)) = (registry.positions.get(&id).copied(), registry.scripts.get(&id).cloned()) else {
            continue;
        };
        if let Some(stats) = registry.stats.get_mut(&id) {
            stats.arm();
        }

        let step = match scripts.update_ai(&script, pos, player_pos) {
            Ok(step) => step,
            Err(e) => {
                log::warn!("AI for {} skipped: {}", id, e);
                if debug {
                    log.add_colored(format!("AI Error: {}", e), tags::EMPHASIS);
                }
                continue;
            }
        };

        match resolve_step(registry, dungeon, pos, step, player_pos) {
            MonsterAction::Attack => {
                let player = registry.player_id;
                attack(registry, id, player, log, scripts);
            }
            MonsterAction::Move(target) => {
                registry.positions.insert(id, target);
            }
            MonsterAction::Wait => {}
        }
        acted.push(id);
    }

    acted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{Renderable, Stats};
    use crate::scripting::stub::StubScripts;

    const ROWS: [&str; 5] = [
        "#######",
        "#.....#",
        "#.....#",
        "#.....#",
        "#######",
    ];

    fn world() -> (Registry, Dungeon, MessageLog) {
        let mut reg = Registry::new();
        let player = reg.spawn(Position::new(1, 2), Renderable::new('@', "ui_default"), "Hero");
        reg.stats.insert(player, Stats { hp: 20, max_hp: 20, damage: 2, level: 1, action_delay: 3, ..Default::default() });
        reg.player_id = player;
        (reg, Dungeon::from_rows(&ROWS), MessageLog::default())
    }

    fn monster(reg: &mut Registry, pos: Position, script: &str) -> EntityId {
        let id = reg.spawn(pos, Renderable::new('z', "ui_default"), "Zombie");
        reg.stats.insert(id, Stats { hp: 5, max_hp: 5, damage: 3, action_delay: 4, ..Default::default() });
        reg.scripts.insert(id, script.to_string());
        reg.monsters.push(id);
        id
    }

    #[test]
    fn test_monster_walks_toward_player() {
        let (mut reg, map, mut log) = world();
        let mut scripts = StubScripts::new().with_ai("monsters/zombie.lua", (-1, 0));
        let z = monster(&mut reg, Position::new(4, 2), "monsters/zombie.lua");

        let acted = move_monsters(&mut reg, &map, &mut log, &mut scripts, false);
        assert_eq!(acted, vec![z]);
        assert_eq!(reg.positions[&z], Position::new(3, 2));
        assert_eq!(reg.stats[&z].action_timer, 4);

        // Not ready again until its timer runs down
        let acted = move_monsters(&mut reg, &map, &mut log, &mut scripts, false);
        assert!(acted.is_empty());
    }

    #[test]
    fn test_monster_attacks_adjacent_player() {
        let (mut reg, map, mut log) = world();
        let mut scripts = StubScripts::new().with_ai("monsters/zombie.lua", (-1, 0));
        let z = monster(&mut reg, Position::new(2, 2), "monsters/zombie.lua");

        move_monsters(&mut reg, &map, &mut log, &mut scripts, false);
        assert_eq!(reg.positions[&z], Position::new(2, 2));
        assert_eq!(reg.player_stats().unwrap().hp, 17);
        assert!(log.contains("The Zombie hits you for 3"));
    }

    #[test]
    fn test_blocked_by_wall_and_monsters() {
        let (mut reg, map, mut log) = world();
        let mut scripts = StubScripts::new()
            .with_ai("monsters/wall.lua", (0, -1))
            .with_ai("monsters/crowd.lua", (1, 0));
        let a = monster(&mut reg, Position::new(3, 1), "monsters/wall.lua");
        let b = monster(&mut reg, Position::new(4, 3), "monsters/crowd.lua");
        // c blocks b, then steps away on its own turn
        let c = monster(&mut reg, Position::new(5, 3), "monsters/wall.lua");

        let acted = move_monsters(&mut reg, &map, &mut log, &mut scripts, false);
        assert_eq!(acted, vec![a, b, c]);
        assert_eq!(reg.positions[&a], Position::new(3, 1));
        assert_eq!(reg.positions[&b], Position::new(4, 3));
        assert_eq!(reg.positions[&c], Position::new(5, 2));
    }

    #[test]
    fn test_script_failure_skips_monster() {
        let (mut reg, map, mut log) = world();
        let mut scripts = StubScripts::new();
        let z = monster(&mut reg, Position::new(4, 2), "monsters/broken.lua");

        let acted = move_monsters(&mut reg, &map, &mut log, &mut scripts, true);
        assert!(acted.is_empty());
        assert_eq!(reg.positions[&z], Position::new(4, 2));
        assert!(log.last().unwrap().text.starts_with("AI Error"));
    }

    #[test]
    fn test_zero_step_waits() {
        let (reg, map, _) = world();
        let from = Position::new(3, 2);
        assert_eq!(resolve_step(&reg, &map, from, (0, 0), Position::new(1, 2)), MonsterAction::Wait);
        assert_eq!(resolve_step(&reg, &map, from, (-1, 0), Position::new(2, 2)), MonsterAction::Attack);
    }
}
