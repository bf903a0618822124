//! The map: a stack of floors

use crate::floor::Floor;
use crate::item::ItemId;
use crate::position::Position;
use crate::storage::TileStorage;
use crate::tile::Tile;
use serde::{Deserialize, Serialize};

/// Floors used by a map unless another count is requested
pub const DEFAULT_FLOOR_COUNT: u8 = 16;

/// A complete map
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Map {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub floors: Vec<Floor>,
}

impl Map {
    /// Create a map with [`DEFAULT_FLOOR_COUNT`] empty floors
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self::with_floors(name, width, height, DEFAULT_FLOOR_COUNT)
    }

    pub fn with_floors(name: impl Into<String>, width: u32, height: u32, floors: u8) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            floors: (0..floors).map(|z| Floor::new(z, width, height)).collect(),
        }
    }

    pub fn floor(&self, z: u8) -> Option<&Floor> {
        self.floors.get(z as usize)
    }

    pub fn floor_mut(&mut self, z: u8) -> Option<&mut Floor> {
        self.floors.get_mut(z as usize)
    }

    pub fn in_bounds(&self, position: Position) -> bool {
        position.x < self.width
            && position.y < self.height
            && (position.z as usize) < self.floors.len()
    }

    /// Replace the tile at `position`. Returns `false` outside the map.
    pub fn set_tile(&mut self, position: Position, tile: Option<Tile>) -> bool {
        self.floor_mut(position.z)
            .map(|floor| floor.set_tile(position.x, position.y, tile))
            .unwrap_or(false)
    }

    /// Set the ground item at `position`, creating the tile if needed.
    /// Returns `false` outside the map.
    pub fn set_ground(&mut self, position: Position, ground: Option<ItemId>) -> bool {
        match self.create_tile(position) {
            Some(tile) => {
                tile.ground = ground.map(crate::item::Item::new);
                true
            }
            None => false,
        }
    }

    /// Total number of tiles across all floors
    pub fn tile_count(&self) -> usize {
        self.floors.iter().map(Floor::tile_count).sum()
    }

    /// Iterate over every existing tile, floor by floor in row-major order
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.floors
            .iter()
            .flat_map(|floor| floor.tiles.iter().filter_map(Option::as_ref))
    }
}

impl TileStorage for Map {
    fn tile(&self, position: Position) -> Option<&Tile> {
        self.floor(position.z)?.tile(position.x, position.y)
    }

    fn tile_mut(&mut self, position: Position) -> Option<&mut Tile> {
        self.floor_mut(position.z)?.tile_mut(position.x, position.y)
    }

    fn create_tile(&mut self, position: Position) -> Option<&mut Tile> {
        self.floor_mut(position.z)?
            .tile_or_create(position.x, position.y)
    }
}
