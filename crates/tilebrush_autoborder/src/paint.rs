//! Map level border operations
//!
//! [`do_borders`] recomputes the borders of one tile. Painting or erasing
//! ground changes what the surrounding tiles see, so both re-border the 3x3
//! area around the edited position.

use crate::apply::apply_borders;
use crate::context::BorderContext;
use crate::resolver::resolve;
use crate::specific::apply_specific_cases;
use rand::Rng;
use tilebrush_core::{Area, Position, TerrainId, TileStorage};

/// Recompute the border items of the tile at `position`.
///
/// Returns `false` if there is no tile there.
pub fn do_borders<S>(storage: &mut S, ctx: &BorderContext, position: Position) -> bool
where
    S: TileStorage + ?Sized,
{
    if storage.tile(position).is_none() {
        return false;
    }

    let resolution = resolve(&*storage, ctx, position);
    let Some(tile) = storage.tile_mut(position) else {
        return false;
    };

    tile.optional_border = resolution.optional_border;
    let clusters = resolution.clusters.len();
    let placed = apply_borders(tile, &ctx.items, resolution.clusters);
    let fired = apply_specific_cases(tile, &ctx.items, &resolution.specific_cases);

    tracing::debug!(
        "bordered ({}, {}, {}): {} clusters, {} pieces, {} specific cases",
        position.x,
        position.y,
        position.z,
        clusters,
        placed,
        fired
    );
    true
}

/// Re-border every existing tile in `area`. Returns how many were visited.
pub fn border_area<S>(storage: &mut S, ctx: &BorderContext, area: Area) -> usize
where
    S: TileStorage + ?Sized,
{
    area.positions()
        .filter(|position| do_borders(storage, ctx, *position))
        .count()
}

/// Paint ground of `terrain` at `position` and re-border around it.
///
/// Returns `false` if the terrain is unknown, has no fill items, or the
/// position is outside the storage.
pub fn paint_ground<S>(
    storage: &mut S,
    ctx: &BorderContext,
    position: Position,
    terrain: TerrainId,
    rng: &mut impl Rng,
) -> bool
where
    S: TileStorage + ?Sized,
{
    let Some(category) = ctx.terrain(terrain) else {
        return false;
    };
    let Some(ground) = category
        .pick_ground_item(rng)
        .and_then(|id| ctx.items.create_item(id))
    else {
        return false;
    };
    let Some(tile) = storage.create_tile(position) else {
        return false;
    };

    tile.ground = Some(ground);
    border_area(storage, ctx, Area::around(position));
    true
}

/// Remove the ground at `position` and re-border around it.
///
/// Returns `false` if there was no ground to remove.
pub fn erase_ground<S>(storage: &mut S, ctx: &BorderContext, position: Position) -> bool
where
    S: TileStorage + ?Sized,
{
    let Some(tile) = storage.tile_mut(position) else {
        return false;
    };
    if !tile.has_ground() {
        return false;
    }
    tile.ground = None;

    border_area(storage, ctx, Area::around(position));
    true
}
