//! Neighbor scan around one tile

use crate::context::BorderContext;
use crate::pattern::NEIGHBOR_OFFSETS;
use crate::terrain::TerrainCategory;
use tilebrush_core::{Position, TileStorage};

/// Terrain found next to the tile being bordered
#[derive(Debug, Clone, Copy, Default)]
pub struct Neighbor<'a> {
    /// Already folded into an alignment mask during resolution
    pub visited: bool,
    pub terrain: Option<&'a TerrainCategory>,
}

impl Neighbor<'_> {
    pub fn terrain_id(&self) -> Option<tilebrush_core::TerrainId> {
        self.terrain.map(|terrain| terrain.id)
    }
}

/// Look up the terrain of the eight neighbors of `position`, in
/// [`NEIGHBOR_OFFSETS`] order.
///
/// Neighbors off the low edge of the map, missing tiles, tiles without ground
/// and ground without a terrain category all count as no terrain.
pub fn scan_neighbors<'a, S>(storage: &S, ctx: &'a BorderContext, position: Position) -> [Neighbor<'a>; 8]
where
    S: TileStorage + ?Sized,
{
    let mut neighbors = [Neighbor::default(); 8];
    for (neighbor, (dx, dy)) in neighbors.iter_mut().zip(NEIGHBOR_OFFSETS) {
        neighbor.terrain = position
            .offset(dx, dy)
            .and_then(|at| storage.tile(at))
            .and_then(|tile| tile.ground_terrain(&ctx.items))
            .and_then(|terrain| ctx.terrain(terrain));
    }
    neighbors
}
