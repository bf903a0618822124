//! A single floor of tiles

use crate::position::Position;
use crate::tile::Tile;
use serde::{Deserialize, Serialize};

/// One floor (z level) of the map, stored row-major
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Floor {
    pub z: u8,
    pub width: u32,
    pub height: u32,
    /// Tile data - None means no tile has been created at that cell
    pub tiles: Vec<Option<Tile>>,
}

impl Floor {
    /// Create an empty floor
    pub fn new(z: u8, width: u32, height: u32) -> Self {
        let size = (width as usize) * (height as usize);
        Self {
            z,
            width,
            height,
            tiles: vec![None; size],
        }
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    pub fn tile(&self, x: u32, y: u32) -> Option<&Tile> {
        self.index(x, y).and_then(|idx| self.tiles[idx].as_ref())
    }

    pub fn tile_mut(&mut self, x: u32, y: u32) -> Option<&mut Tile> {
        self.index(x, y).and_then(|idx| self.tiles[idx].as_mut())
    }

    /// Get the tile at `(x, y)`, creating an empty one first if needed.
    /// Returns `None` outside the floor.
    pub fn tile_or_create(&mut self, x: u32, y: u32) -> Option<&mut Tile> {
        let idx = self.index(x, y)?;
        let z = self.z;
        Some(self.tiles[idx].get_or_insert_with(|| Tile::new(Position::new(x, y, z))))
    }

    /// Replace the cell at `(x, y)`. Returns `false` outside the floor.
    pub fn set_tile(&mut self, x: u32, y: u32, tile: Option<Tile>) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                let position = Position::new(x, y, self.z);
                self.tiles[idx] = tile.map(|mut t| {
                    t.position = position;
                    t
                });
                true
            }
            None => false,
        }
    }

    /// Number of cells that hold a tile
    pub fn tile_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.is_some()).count()
    }

    /// Rows of cells, top row first
    pub fn rows(&self) -> std::slice::Chunks<'_, Option<Tile>> {
        self.tiles.chunks(self.width.max(1) as usize)
    }
}
