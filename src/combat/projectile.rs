//! Spell projectiles
//!
//! A cast spends mana and drops a projectile entity on the caster's cell.
//! Each time the projectile is due it either fizzles (range spent), turns
//! (script), hits a wall, hits an actor, or moves one cell.

use crate::ecs::{EntityId, Projectile, Registry, Renderable};
use crate::game::{tags, MessageLog};
use crate::scripting::Scripts;
use crate::world::Dungeon;

/// Cast `spell` from `caster` toward `dir`.
///
/// Returns whether the cast happened. A failed cast (unknown spell, not
/// enough mana) creates nothing and leaves mana untouched.
pub fn cast_spell(
    registry: &mut Registry,
    log: &mut MessageLog,
    scripts: &mut dyn Scripts,
    spell: &str,
    caster: EntityId,
    dir: (i32, i32),
) -> bool {
    let data = match scripts.spell_data(spell) {
        Ok(data) => data,
        Err(e) => {
            log::warn!("{}", e);
            log.add_colored(format!("Script Error: {}", e), tags::EMPHASIS);
            return false;
        }
    };
    let Some(pos) = registry.positions.get(&caster).copied() else {
        return false;
    };
    let Some(stats) = registry.stats.get_mut(&caster) else {
        return false;
    };
    if stats.mana < data.mana_cost {
        log.add_colored("Not enough mana!", tags::EMPHASIS);
        return false;
    }
    stats.mana -= data.mana_cost;

    let id = registry.spawn(pos, Renderable::new(data.glyph, data.color), data.name.clone());
    registry.projectiles.insert(
        id,
        Projectile {
            dx: dir.0,
            dy: dir.1,
            damage: data.damage,
            range: data.range,
            owner: caster,
            action_delay: data.delay,
            action_timer: 0,
        },
    );
    registry.scripts.insert(id, spell.to_string());
    log.add_colored(format!("You cast {}!", data.name), tags::FIRE);
    log::debug!("{} spawned projectile {} toward {:?}", caster, id, dir);
    true
}

/// Advance every projectile whose timer has run out by one action
pub fn update_projectiles(
    registry: &mut Registry,
    dungeon: &Dungeon,
    log: &mut MessageLog,
    scripts: &mut dyn Scripts,
) {
    for id in registry.projectile_ids() {
        // An earlier projectile this pass may have removed this one
        let Some(projectile) = registry.projectiles.get_mut(&id) else {
            continue;
        };
        if !projectile.is_ready() {
            continue;
        }
        projectile.arm();
        let mut proj = projectile.clone();
        let name = registry.name_of(id).to_string();

        if proj.range <= 0 {
            log.add_colored(format!("The {} fizzles out.", name), tags::DEFAULT);
            registry.destroy_entity(id);
            continue;
        }

        let Some(pos) = registry.positions.get(&id).copied() else {
            registry.destroy_entity(id);
            continue;
        };

        if let Some(script) = registry.scripts.get(&id).cloned() {
            match scripts.update_projectile(&script, pos, (proj.dx, proj.dy)) {
                Ok(dir) => (proj.dx, proj.dy) = dir,
                Err(e) if e.is_missing_function() => {}
                Err(e) => log::warn!("{}", e),
            }
        }

        let target = pos.offset(proj.dx, proj.dy);
        if !dungeon.is_walkable(target.x, target.y) {
            log.add_colored(format!("The {} hits a wall.", name), tags::DEFAULT);
            registry.destroy_entity(id);
            continue;
        }

        if let Some(victim) = registry.actor_at(target, proj.owner) {
            strike(registry, log, &name, victim, proj.damage);
            registry.destroy_entity(id);
            continue;
        }

        proj.range -= 1;
        registry.positions.insert(id, target);
        registry.projectiles.insert(id, proj);
    }
}

fn strike(registry: &mut Registry, log: &mut MessageLog, name: &str, victim: EntityId, damage: i32) {
    let player = registry.player_id;
    let victim_name = registry.name_of(victim).to_string();
    let Some(stats) = registry.stats.get_mut(&victim) else {
        return;
    };
    stats.hp -= damage;
    let dead = stats.is_dead();

    if victim == player {
        log.add_colored(format!("The {} hits you for {}!", name, damage), tags::EMPHASIS);
        return;
    }
    log.add_colored(format!("The {} burns the {} for {}!", name, victim_name, damage), tags::FIRE);
    if dead {
        log.add_colored(format!("The {} is incinerated.", victim_name), tags::GOLD);
        registry.destroy_entity(victim);
    }
}
