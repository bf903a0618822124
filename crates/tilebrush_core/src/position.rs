//! Tile positions

use serde::{Deserialize, Serialize};

/// Position of a tile on the map: column, row and floor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: u32,
    pub y: u32,
    pub z: u8,
}

impl Position {
    pub const fn new(x: u32, y: u32, z: u8) -> Self {
        Self { x, y, z }
    }

    /// Offset on the same floor.
    ///
    /// Returns `None` when the result would have a negative coordinate
    /// (or overflow), so callers never wrap around the map edge.
    pub fn offset(self, dx: i32, dy: i32) -> Option<Position> {
        Some(Position {
            x: self.x.checked_add_signed(dx)?,
            y: self.y.checked_add_signed(dy)?,
            z: self.z,
        })
    }
}

/// A rectangular area on a single floor, inclusive on both corners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
    pub z: u8,
}

impl Area {
    /// Build an area from two corners in any order
    pub fn new(a: Position, b: Position) -> Self {
        Self {
            min_x: a.x.min(b.x),
            min_y: a.y.min(b.y),
            max_x: a.x.max(b.x),
            max_y: a.y.max(b.y),
            z: a.z,
        }
    }

    /// The 3x3 block centred on `center`, clipped at the top-left map edge
    pub fn around(center: Position) -> Self {
        Self {
            min_x: center.x.saturating_sub(1),
            min_y: center.y.saturating_sub(1),
            max_x: center.x.saturating_add(1),
            max_y: center.y.saturating_add(1),
            z: center.z,
        }
    }

    pub fn contains(&self, position: Position) -> bool {
        position.z == self.z
            && (self.min_x..=self.max_x).contains(&position.x)
            && (self.min_y..=self.max_y).contains(&position.y)
    }

    /// All positions in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (self.min_y..=self.max_y)
            .flat_map(move |y| (self.min_x..=self.max_x).map(move |x| Position::new(x, y, self.z)))
    }
}
