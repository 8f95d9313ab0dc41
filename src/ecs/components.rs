//! ECS Components
//!
//! Plain data stored in the registry's per-component tables.

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Identity
// ============================================================================

/// Opaque entity identifier. Allocated from 1 upward; 0 means "no entity".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct EntityId(u32);

impl EntityId {
    /// The reserved "no entity" id
    pub const NONE: EntityId = EntityId(0);

    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub fn is_none(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ============================================================================
// Rendering
// ============================================================================

/// Visual representation of an entity. The color is a symbolic name that
/// the front-end resolves through its theme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Renderable {
    pub glyph: char,
    pub color: String,
}

impl Renderable {
    pub fn new(glyph: char, color: impl Into<String>) -> Self {
        Self {
            glyph,
            color: color.into(),
        }
    }
}

// ============================================================================
// Combat Stats
// ============================================================================

/// Combat, progression and initiative numbers for an actor.
///
/// `hp` may go negative; death is `hp <= 0`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Stats {
    pub archetype: String,
    pub hp: i32,
    pub max_hp: i32,
    pub mana: i32,
    pub max_mana: i32,
    pub damage: i32,
    pub xp: i32,
    pub level: i32,
    pub fov_range: i32,
    pub gold: i32,
    /// Ticks needed before acting again
    pub action_delay: u32,
    /// Counts down to zero; zero means ready
    pub action_timer: u32,
}

impl Stats {
    pub fn is_dead(&self) -> bool {
        self.hp <= 0
    }

    pub fn is_ready(&self) -> bool {
        self.action_timer == 0
    }

    /// Start the cooldown after acting
    pub fn arm(&mut self) {
        self.action_timer = self.action_delay;
    }
}

// ============================================================================
// Items
// ============================================================================

/// What kind of pickup an item entity is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    Gold,
    Consumable,
    Stairs,
}

/// An item lying in the dungeon or carried in the inventory.
///
/// For stairs, `name` holds the path of the level they lead to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemTag {
    pub kind: ItemKind,
    pub value: i32,
    pub name: String,
    pub script: String,
}

// ============================================================================
// Projectiles
// ============================================================================

/// A moving, timed area effect (a fireball in flight)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projectile {
    pub dx: i32,
    pub dy: i32,
    pub damage: i32,
    /// Steps left before it fizzles out
    pub range: i32,
    pub owner: EntityId,
    pub action_delay: u32,
    pub action_timer: u32,
}

impl Projectile {
    pub fn is_ready(&self) -> bool {
        self.action_timer == 0
    }

    pub fn arm(&mut self) {
        self.action_timer = self.action_delay;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arm_and_ready() {
        let mut stats = Stats {
            action_delay: 3,
            ..Default::default()
        };
        assert!(stats.is_ready());
        stats.arm();
        assert_eq!(stats.action_timer, 3);
        assert!(!stats.is_ready());
    }

    #[test]
    fn test_dead_at_zero_or_below() {
        let mut stats = Stats {
            hp: 1,
            ..Default::default()
        };
        assert!(!stats.is_dead());
        stats.hp = 0;
        assert!(stats.is_dead());
        stats.hp = -4;
        assert!(stats.is_dead());
    }

    #[test]
    fn test_none_id() {
        assert!(EntityId::NONE.is_none());
        assert!(!EntityId::new(1).is_none());
        assert_eq!(EntityId::new(7).to_string(), "#7");
    }
}
