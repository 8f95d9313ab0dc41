//! Entity registry
//!
//! Sparse per-component tables keyed by [`EntityId`]. Entity counts are in
//! the tens, so ordered maps are plenty and keep iteration deterministic.

use std::collections::BTreeMap;

use super::components::{EntityId, ItemTag, Projectile, Renderable, Stats};
use crate::world::Position;

/// All entity data for the current level
#[derive(Debug, Clone)]
pub struct Registry {
    pub positions: BTreeMap<EntityId, Position>,
    pub renderables: BTreeMap<EntityId, Renderable>,
    pub stats: BTreeMap<EntityId, Stats>,
    pub items: BTreeMap<EntityId, ItemTag>,
    pub projectiles: BTreeMap<EntityId, Projectile>,
    pub names: BTreeMap<EntityId, String>,
    /// Script driving the entity (class, monster AI or spell)
    pub scripts: BTreeMap<EntityId, String>,
    /// Monsters in spawn order
    pub monsters: Vec<EntityId>,
    pub player_id: EntityId,
    boss_id: EntityId,
    boss_defeated: bool,
    next_id: u32,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            positions: BTreeMap::new(),
            renderables: BTreeMap::new(),
            stats: BTreeMap::new(),
            items: BTreeMap::new(),
            projectiles: BTreeMap::new(),
            names: BTreeMap::new(),
            scripts: BTreeMap::new(),
            monsters: Vec::new(),
            player_id: EntityId::NONE,
            boss_id: EntityId::NONE,
            boss_defeated: false,
            next_id: 1,
        }
    }

    /// Allocate a fresh id. Ids are never reused until [`Registry::clear`].
    pub fn create_entity(&mut self) -> EntityId {
        let id = EntityId::new(self.next_id);
        self.next_id += 1;
        id
    }

    /// Remove an entity from every table
    pub fn destroy_entity(&mut self, id: EntityId) {
        self.positions.remove(&id);
        self.renderables.remove(&id);
        self.stats.remove(&id);
        self.items.remove(&id);
        self.projectiles.remove(&id);
        self.names.remove(&id);
        self.scripts.remove(&id);
        self.monsters.retain(|&m| m != id);

        if !self.boss_id.is_none() && id == self.boss_id {
            self.boss_id = EntityId::NONE;
            self.boss_defeated = true;
        }
    }

    /// Drop every entity and restart ids at 1 (level transition)
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// An entity is in the world while it has a position
    pub fn contains(&self, id: EntityId) -> bool {
        self.positions.contains_key(&id)
    }

    pub fn boss_id(&self) -> EntityId {
        self.boss_id
    }

    pub fn set_boss(&mut self, id: EntityId) {
        self.boss_id = id;
        self.boss_defeated = false;
    }

    /// True once this level's boss has been spawned and then destroyed
    pub fn is_boss_defeated(&self) -> bool {
        self.boss_defeated
    }

    pub fn player_stats(&self) -> Option<&Stats> {
        self.stats.get(&self.player_id)
    }

    pub fn player_stats_mut(&mut self) -> Option<&mut Stats> {
        self.stats.get_mut(&self.player_id)
    }

    pub fn player_position(&self) -> Option<Position> {
        self.positions.get(&self.player_id).copied()
    }

    /// Display name, with a fallback for unnamed entities
    pub fn name_of(&self, id: EntityId) -> &str {
        self.names.get(&id).map(String::as_str).unwrap_or("Unknown")
    }

    /// First solid (non-projectile) entity on a cell
    pub fn entity_at(&self, pos: Position) -> Option<EntityId> {
        self.positions
            .iter()
            .find(|(id, p)| **p == pos && !self.projectiles.contains_key(id))
            .map(|(id, _)| *id)
    }

    /// First entity with stats on a cell, ignoring `exclude`
    pub fn actor_at(&self, pos: Position, exclude: EntityId) -> Option<EntityId> {
        self.positions
            .iter()
            .find(|(id, p)| **p == pos && **id != exclude && self.stats.contains_key(id))
            .map(|(id, _)| *id)
    }

    /// Item lying on a cell
    pub fn item_at(&self, pos: Position) -> Option<EntityId> {
        self.items
            .keys()
            .find(|id| self.positions.get(id) == Some(&pos))
            .copied()
    }

    pub fn has_projectiles(&self) -> bool {
        !self.projectiles.is_empty()
    }

    pub fn projectile_ids(&self) -> Vec<EntityId> {
        self.projectiles.keys().copied().collect()
    }

    /// Spawn an entity that has a position, glyph and name
    pub fn spawn(&mut self, pos: Position, renderable: Renderable, name: impl Into<String>) -> EntityId {
        let id = self.create_entity();
        self.positions.insert(id, pos);
        self.renderables.insert(id, renderable);
        self.names.insert(id, name.into());
        id
    }

    /// Whether `id` appears in any table
    #[cfg(test)]
    pub fn has_trace(&self, id: EntityId) -> bool {
        self.positions.contains_key(&id)
            || self.renderables.contains_key(&id)
            || self.stats.contains_key(&id)
            || self.items.contains_key(&id)
            || self.projectiles.contains_key(&id)
            || self.names.contains_key(&id)
            || self.scripts.contains_key(&id)
            || self.monsters.contains(&id)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
