//! Initiative timing
//!
//! Every actor (player, monster, projectile) carries its own
//! `action_delay` / `action_timer`. A tick lowers every running timer by one;
//! an actor with a zero timer may act, and acting re-arms the timer. Lower
//! delay means more turns.

use crate::ecs::{EntityId, Registry};

/// Advance simulated time by one tick for every actor
pub fn tick_timers(registry: &mut Registry) {
    for stats in registry.stats.values_mut() {
        stats.action_timer = stats.action_timer.saturating_sub(1);
    }
    for projectile in registry.projectiles.values_mut() {
        projectile.action_timer = projectile.action_timer.saturating_sub(1);
    }
}

/// Whether the player may act now
pub fn player_ready(registry: &Registry) -> bool {
    registry.player_stats().is_some_and(|s| s.is_ready())
}

/// Monsters whose timer has run out, in spawn order
pub fn ready_monsters(registry: &Registry) -> Vec<EntityId> {
    registry
        .monsters
        .iter()
        .copied()
        .filter(|id| registry.stats.get(id).is_some_and(|s| s.is_ready()))
        .collect()
}

/// Whether any monster is waiting to act
pub fn any_monster_due(registry: &Registry) -> bool {
    !ready_monsters(registry).is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{Renderable, Stats};
    use crate::world::Position;

    fn actor(reg: &mut Registry, delay: u32) -> EntityId {
        let id = reg.spawn(Position::new(0, 0), Renderable::new('m', "monster"), "m");
        reg.stats.insert(id, Stats { hp: 1, action_delay: delay, ..Default::default() });
        reg.monsters.push(id);
        id
    }

    /// Act whenever ready, then tick; count actions over a window
    fn count_actions(delay: u32, ticks: u32) -> Vec<u32> {
        let mut reg = Registry::new();
        let id = actor(&mut reg, delay);
        let mut acted_at = Vec::new();
        for t in 0..ticks {
            tick_timers(&mut reg);
            if ready_monsters(&reg).contains(&id) {
                acted_at.push(t);
                reg.stats.get_mut(&id).unwrap().arm();
            }
        }
        acted_at
    }

    #[test]
    fn test_actor_acts_exactly_every_delay_ticks() {
        for delay in 1..=5 {
            let acted = count_actions(delay, 40);
            for pair in acted.windows(2) {
                assert_eq!(pair[1] - pair[0], delay, "delay {delay}: {acted:?}");
            }
            assert_eq!(acted.len() as u32, 40_u32.div_ceil(delay));
        }
    }

    #[test]
    fn test_faster_actor_acts_more_often() {
        assert!(count_actions(2, 30).len() > count_actions(5, 30).len());
    }

    #[test]
    fn test_timer_never_underflows() {
        let mut reg = Registry::new();
        let id = actor(&mut reg, 0);
        tick_timers(&mut reg);
        tick_timers(&mut reg);
        assert_eq!(reg.stats[&id].action_timer, 0);
        assert!(any_monster_due(&reg));
    }
}
