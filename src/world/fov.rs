//! Field of View calculation
//!
//! Fixed-step raycasting: 180 rays at 2° intervals from the observer's cell
//! centre. Cheap, and at long range the angular sampling can skip cells; that
//! is accepted rather than replaced with exact shadowcasting.

use super::Dungeon;

/// Degrees between rays
pub const RAY_STEP_DEGREES: usize = 2;

const DEG_TO_RAD: f64 = std::f64::consts::PI / 180.0;

/// Recompute `visible_tiles` from scratch and extend the explored set.
///
/// Each ray advances one unit per step for up to `range` steps, marking every
/// cell it enters. The first wall stops the ray but is itself marked.
pub fn update_fov(dungeon: &mut Dungeon, px: i32, py: i32, range: i32) {
    dungeon.visible_tiles.clear();

    for degrees in (0..360).step_by(RAY_STEP_DEGREES) {
        let rad = degrees as f64 * DEG_TO_RAD;
        let (dx, dy) = (rad.cos(), rad.sin());
        let mut cur_x = px as f64 + 0.5;
        let mut cur_y = py as f64 + 0.5;

        for _ in 0..range {
            let ix = cur_x.floor() as i32;
            let iy = cur_y.floor() as i32;
            if !dungeon.in_bounds(ix, iy) {
                break;
            }

            dungeon.reveal(ix, iy);
            if dungeon.tile(ix, iy).is_some_and(|t| t.is_opaque()) {
                break;
            }

            cur_x += dx;
            cur_y += dy;
        }
    }
}

impl Dungeon {
    /// See [`update_fov`]
    pub fn update_fov(&mut self, px: i32, py: i32, range: i32) {
        update_fov(self, px, py, range);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::Position;

    fn corridor() -> Dungeon {
        Dungeon::from_rows(&[
            "###########",
            "#.....#...#",
            "###########",
        ])
    }

    #[test]
    fn test_wall_is_visible_but_stops_ray() {
        let mut dungeon = corridor();
        dungeon.update_fov(1, 1, 10);
        assert!(dungeon.is_visible(5, 1));
        assert!(dungeon.is_visible(6, 1), "blocking wall itself is lit");
        assert!(!dungeon.is_visible(7, 1), "cells behind the wall stay dark");
        assert!(!dungeon.is_explored(8, 1));
    }

    #[test]
    fn test_range_limits_sight() {
        let mut dungeon = corridor();
        dungeon.update_fov(1, 1, 2);
        assert!(dungeon.is_visible(2, 1));
        assert!(!dungeon.is_visible(4, 1));
    }

    #[test]
    fn test_zero_range_sees_nothing() {
        let mut dungeon = corridor();
        dungeon.update_fov(1, 1, 0);
        assert!(dungeon.visible_tiles.is_empty());
    }

    #[test]
    fn test_visible_implies_explored_and_explored_persists() {
        let mut dungeon = Dungeon::from_rows(&[
            "############",
            "#..........#",
            "#..........#",
            "############",
        ]);
        dungeon.update_fov(1, 1, 4);
        let first: Vec<Position> = dungeon.visible_tiles.iter().copied().collect();
        for p in &first {
            assert!(dungeon.is_explored(p.x, p.y));
        }

        dungeon.update_fov(10, 2, 3);
        for p in &dungeon.visible_tiles {
            assert!(dungeon.is_explored(p.x, p.y));
        }
        for p in &first {
            assert!(dungeon.is_explored(p.x, p.y), "explored cell {p:?} was forgotten");
        }
        assert!(!dungeon.is_visible(1, 1), "visibility is recomputed from scratch");
    }
}
