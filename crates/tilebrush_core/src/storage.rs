//! Tile storage interface consumed by map algorithms

use crate::position::Position;
use crate::tile::Tile;

/// Read and write access to tiles by position.
///
/// Implementors decide how tiles are stored; algorithms only ever ask for
/// single tiles, so a sparse or chunked storage works as well as [`Map`](crate::Map).
pub trait TileStorage {
    /// The tile at `position`, if one exists
    fn tile(&self, position: Position) -> Option<&Tile>;

    /// Mutable access to an existing tile
    fn tile_mut(&mut self, position: Position) -> Option<&mut Tile>;

    /// The tile at `position`, creating an empty one if the cell is inside the
    /// storage but has no tile yet
    fn create_tile(&mut self, position: Position) -> Option<&mut Tile>;
}
