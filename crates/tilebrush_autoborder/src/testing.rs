//! Test fixtures shared by the `#[cfg(test)]` modules of this crate.
//!
//! The base setup is two terrains: grass (z 1, ground item 100) and water
//! (z 2, ground item 200) whose outer border against everything is border 5
//! with `s = 301`, `n = 302`, `w = 303`, `e = 304` and no diagonals.
#![allow(dead_code)]

use crate::border::{BorderDefinition, BorderRef};
use crate::context::BorderContext;
use crate::terrain::{BorderRule, BorderTarget, TerrainCategory};
use tilebrush_core::{BorderEdge, ItemId, ItemType, ItemTypes, Map, Position};

pub const GRASS: ItemId = 100;
pub const WATER: ItemId = 200;
/// Ground item that belongs to no terrain
pub const UNBRUSHED: ItemId = 150;
pub const WATER_BORDER: u32 = 5;

/// Item types for the fixture terrains plus border pieces 301..=320
pub fn item_types() -> ItemTypes {
    let mut types: ItemTypes = (301..=320)
        .map(|id| ItemType::new(id).with_border(true))
        .collect();
    for ground in [GRASS, WATER, UNBRUSHED] {
        types.insert(ItemType::ground(ground));
    }
    types.insert(ItemType::new(500).with_name("torch"));
    types
}

pub fn water_border() -> BorderDefinition {
    BorderDefinition::new(WATER_BORDER)
        .with_item(BorderEdge::South, 301)
        .with_item(BorderEdge::North, 302)
        .with_item(BorderEdge::West, 303)
        .with_item(BorderEdge::East, 304)
}

/// Grass and water, registered as terrains 1 and 2
pub fn grass_and_water() -> BorderContext {
    let mut ctx = BorderContext::new(item_types());
    ctx.add_border(water_border());

    ctx.add_terrain(TerrainCategory::new("grass").with_z_order(1).with_ground_item(GRASS, 1));
    ctx.add_terrain(
        TerrainCategory::new("water")
            .with_z_order(2)
            .with_ground_item(WATER, 1)
            .with_border(BorderRule::outer(BorderTarget::All).with_border(BorderRef::Registry(WATER_BORDER))),
    );
    ctx
}

/// Build a single floor map from rows of `G` (grass), `W` (water),
/// `U` (unbrushed ground) and anything else for no tile.
pub fn map_from_rows(rows: &[&str]) -> Map {
    let width = rows.iter().map(|row| row.len()).max().unwrap_or(0) as u32;
    let mut map = Map::with_floors("Fixture", width, rows.len() as u32, 1);

    for (y, row) in rows.iter().enumerate() {
        for (x, cell) in row.chars().enumerate() {
            let ground = match cell {
                'G' => GRASS,
                'W' => WATER,
                'U' => UNBRUSHED,
                _ => continue,
            };
            map.set_ground(Position::new(x as u32, y as u32, 0), Some(ground));
        }
    }
    map
}
