//! Dungeon level
//!
//! The tile grid for one level plus the explored and visible sets, and the
//! room-and-corridor generator that fills it.

use std::collections::BTreeSet;

use rand::Rng;

use super::geometry::{Position, Rect};
use super::tile::Tile;

/// Candidate rooms tried per level
pub const ROOM_ATTEMPTS: usize = 50;
/// Room width range (inclusive)
pub const ROOM_WIDTH: (i32, i32) = (6, 12);
/// Room height range (inclusive)
pub const ROOM_HEIGHT: (i32, i32) = (4, 7);

/// Smallest grid that fits the largest room inside the margins
pub const MIN_WIDTH: i32 = ROOM_WIDTH.1 + 2;
pub const MIN_HEIGHT: i32 = ROOM_HEIGHT.1 + 2;
/// Largest grid a level may ask for
pub const MAX_WIDTH: i32 = 512;
pub const MAX_HEIGHT: i32 = 512;

/// One dungeon level
#[derive(Debug, Clone)]
pub struct Dungeon {
    pub width: i32,
    pub height: i32,
    tiles: Vec<Tile>,
    explored: Vec<bool>,
    pub visible_tiles: BTreeSet<Position>,
    /// Accepted rooms in acceptance order: first is the spawn room, last
    /// hosts the exit.
    pub rooms: Vec<Rect>,
}

impl Dungeon {
    /// Create an all-wall level. Dimensions are clamped to
    /// `MIN_WIDTH..=MAX_WIDTH` and `MIN_HEIGHT..=MAX_HEIGHT`.
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.clamp(MIN_WIDTH, MAX_WIDTH);
        let height = height.clamp(MIN_HEIGHT, MAX_HEIGHT);
        let cells = (width * height) as usize;
        Self {
            width,
            height,
            tiles: vec![Tile::Wall; cells],
            explored: vec![false; cells],
            visible_tiles: BTreeSet::new(),
            rooms: Vec::new(),
        }
    }

    /// Build a dungeon from rows of `'#'` / `'.'` characters
    #[cfg(test)]
    pub fn from_rows(rows: &[&str]) -> Self {
        let height = rows.len() as i32;
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0) as i32;
        let mut dungeon = Self {
            width,
            height,
            tiles: vec![Tile::Wall; (width * height) as usize],
            explored: vec![false; (width * height) as usize],
            visible_tiles: BTreeSet::new(),
            rooms: Vec::new(),
        };
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                if let Some(tile) = Tile::from_glyph(ch) {
                    dungeon.set_tile(x as i32, y as i32, tile);
                }
            }
        }
        dungeon
    }

    #[inline]
    fn xy_to_idx(&self, x: i32, y: i32) -> usize {
        (y * self.width + x) as usize
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    pub fn tile(&self, x: i32, y: i32) -> Option<Tile> {
        self.in_bounds(x, y).then(|| self.tiles[self.xy_to_idx(x, y)])
    }

    pub fn set_tile(&mut self, x: i32, y: i32, tile: Tile) {
        if self.in_bounds(x, y) {
            let idx = self.xy_to_idx(x, y);
            self.tiles[idx] = tile;
        }
    }

    /// False outside the grid, true only on floor
    pub fn is_walkable(&self, x: i32, y: i32) -> bool {
        self.tile(x, y).is_some_and(|t| t.is_walkable())
    }

    pub fn is_explored(&self, x: i32, y: i32) -> bool {
        self.in_bounds(x, y) && self.explored[self.xy_to_idx(x, y)]
    }

    pub fn is_visible(&self, x: i32, y: i32) -> bool {
        self.visible_tiles.contains(&Position::new(x, y))
    }

    /// Mark a cell lit this turn (and therefore explored)
    pub(crate) fn reveal(&mut self, x: i32, y: i32) {
        if self.in_bounds(x, y) {
            let idx = self.xy_to_idx(x, y);
            self.explored[idx] = true;
            self.visible_tiles.insert(Position::new(x, y));
        }
    }

    /// Spawn room (precondition: at least one room was accepted)
    pub fn spawn_room(&self) -> Option<&Rect> {
        self.rooms.first()
    }

    /// Exit room (precondition: at least one room was accepted)
    pub fn exit_room(&self) -> Option<&Rect> {
        self.rooms.last()
    }

    /// Rooms strictly between the spawn room and the exit room
    pub fn inner_rooms(&self) -> &[Rect] {
        if self.rooms.len() <= 2 {
            &[]
        } else {
            &self.rooms[1..self.rooms.len() - 1]
        }
    }

    /// Regenerate the whole level: reset to wall, place rooms, connect each
    /// new room to the previous one with an L-shaped corridor.
    pub fn generate(&mut self, rng: &mut impl Rng) {
        self.tiles.fill(Tile::Wall);
        self.explored.fill(false);
        self.visible_tiles.clear();
        self.rooms.clear();

        let max_x = self.width - ROOM_WIDTH.1 - 1;
        let max_y = self.height - ROOM_HEIGHT.1 - 1;

        for _ in 0..ROOM_ATTEMPTS {
            let room = Rect::new(
                rng.gen_range(1..=max_x),
                rng.gen_range(1..=max_y),
                rng.gen_range(ROOM_WIDTH.0..=ROOM_WIDTH.1),
                rng.gen_range(ROOM_HEIGHT.0..=ROOM_HEIGHT.1),
            );

            if self.rooms.iter().any(|r| room.intersects(r)) {
                continue;
            }

            self.carve_room(&room);

            if let Some(prev) = self.rooms.last() {
                let (from, to) = (prev.center(), room.center());
                if rng.gen_bool(0.5) {
                    self.carve_h(from.x, to.x, from.y);
                    self.carve_v(from.y, to.y, to.x);
                } else {
                    self.carve_v(from.y, to.y, from.x);
                    self.carve_h(from.x, to.x, to.y);
                }
            }

            self.rooms.push(room);
        }

        log::debug!(
            "Generated {}x{} dungeon with {} rooms",
            self.width,
            self.height,
            self.rooms.len()
        );
    }

    fn carve_room(&mut self, room: &Rect) {
        for y in room.y..room.y + room.h {
            for x in room.x..room.x + room.w {
                self.set_tile(x, y, Tile::Floor);
            }
        }
    }

    fn carve_h(&mut self, x1: i32, x2: i32, y: i32) {
        for x in x1.min(x2)..=x1.max(x2) {
            self.set_tile(x, y, Tile::Floor);
        }
    }

    fn carve_v(&mut self, y1: i32, y2: i32, x: i32) {
        for y in y1.min(y2)..=y1.max(y2) {
            self.set_tile(x, y, Tile::Floor);
        }
    }
}
