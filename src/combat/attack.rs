//! Melee resolution
//!
//! Every attack connects for the attacker's full damage. There is no armor,
//! miss chance or variance.

use crate::ecs::{EntityId, Registry};
use crate::game::{tags, MessageLog};
use crate::progression::check_level_up;
use crate::scripting::Scripts;

/// XP the player earns for each kill
pub const KILL_XP: i32 = 50;

/// Result of an attack
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttackOutcome {
    /// Damage dealt
    pub damage: i32,
    /// Whether the defender dropped to 0 HP or below
    pub killed: bool,
}

/// `attacker` hits `defender` for its damage.
///
/// A defender at `hp <= 0` is destroyed, unless it is the player: the
/// player entity stays in the registry so the run can end on the game over
/// screen. A player kill awards [`KILL_XP`] and checks for a level-up.
pub fn attack(
    registry: &mut Registry,
    attacker: EntityId,
    defender: EntityId,
    log: &mut MessageLog,
    scripts: &mut dyn Scripts,
) -> AttackOutcome {
    let Some(damage) = registry.stats.get(&attacker).map(|s| s.damage) else {
        log::error!("attack from {} which has no stats", attacker);
        return AttackOutcome::default();
    };
    let Some(target) = registry.stats.get_mut(&defender) else {
        log::error!("attack on {} which has no stats", defender);
        return AttackOutcome::default();
    };
    target.hp -= damage;
    let killed = target.is_dead();

    let player = registry.player_id;
    let attacker_name = registry.name_of(attacker).to_string();
    let defender_name = registry.name_of(defender).to_string();

    if attacker == player {
        log.add_colored(format!("You hit the {} for {}", defender_name, damage), tags::DEFAULT);
    } else if defender == player {
        log.add_colored(format!("The {} hits you for {}", attacker_name, damage), tags::EMPHASIS);
    }

    if killed {
        if attacker == player {
            log.add_colored(
                format!("You defeated the {}! +{} XP", defender_name, KILL_XP),
                tags::GOLD,
            );
            if let Some(stats) = registry.player_stats_mut() {
                stats.xp += KILL_XP;
            }
            check_level_up(registry, log, scripts);
        } else if defender == player {
            log.add_colored(
                format!("{} was defeated by the {}", defender_name, attacker_name),
                tags::EMPHASIS,
            );
        }

        if defender != player {
            log::debug!("{} ({}) destroyed by {}", defender_name, defender, attacker_name);
            registry.destroy_entity(defender);
        }
    }

    AttackOutcome { damage, killed }
}
