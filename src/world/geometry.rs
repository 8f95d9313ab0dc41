//! Grid geometry: positions and rectangular rooms

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Integer grid coordinates
///
/// Ordering is row-major (y first, then x) so ordered sets of positions walk
/// the map the same way the renderer does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The neighbouring cell in direction `(dx, dy)`
    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.y.cmp(&other.y).then(self.x.cmp(&other.x))
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// An axis-aligned room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn center(&self) -> Position {
        Position::new(self.x + self.w / 2, self.y + self.h / 2)
    }

    /// Inclusive bounding-box overlap: rooms that merely touch intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x <= other.x + other.w
            && self.x + self.w >= other.x
            && self.y <= other.y + other.h
            && self.y + self.h >= other.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_row_major_ordering() {
        let set: BTreeSet<Position> = [
            Position::new(5, 1),
            Position::new(0, 2),
            Position::new(1, 1),
        ]
        .into_iter()
        .collect();
        let ordered: Vec<_> = set.into_iter().collect();
        assert_eq!(
            ordered,
            vec![Position::new(1, 1), Position::new(5, 1), Position::new(0, 2)]
        );
    }

    #[test]
    fn test_touching_rooms_intersect() {
        let a = Rect::new(0, 0, 5, 5);
        let b = Rect::new(5, 0, 5, 5);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));

        let c = Rect::new(6, 6, 3, 3);
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_center() {
        assert_eq!(Rect::new(2, 4, 6, 4).center(), Position::new(5, 6));
    }
}
