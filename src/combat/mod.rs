//! Combat system
//!
//! Stateless resolution rules over registry entries: melee attacks and the
//! spell projectiles that share the entity space.

pub mod attack;
pub mod projectile;

pub use attack::{attack, AttackOutcome, KILL_XP};
pub use projectile::{cast_spell, update_projectiles};
