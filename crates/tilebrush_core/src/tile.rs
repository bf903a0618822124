//! A single map tile: ground plus an ordered item stack

use crate::item::{Item, ItemId, ItemTypes, TerrainId};
use crate::position::Position;
use serde::{Deserialize, Serialize};

/// A tile on the map.
///
/// `items` is ordered bottom first. Border items are kept as a contiguous
/// prefix of the stack by the border engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ground: Option<Item>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<Item>,
    /// Whether optional (mountain style) borders may be placed here
    #[serde(default)]
    pub optional_border: bool,
}

impl Tile {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            ground: None,
            items: Vec::new(),
            optional_border: false,
        }
    }

    pub fn with_ground(mut self, id: ItemId) -> Self {
        self.ground = Some(Item::new(id));
        self
    }

    pub fn with_items(mut self, ids: &[ItemId]) -> Self {
        self.items.extend(ids.iter().copied().map(Item::new));
        self
    }

    pub fn with_optional_border(mut self, optional_border: bool) -> Self {
        self.optional_border = optional_border;
        self
    }

    pub fn has_ground(&self) -> bool {
        self.ground.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.ground.is_none() && self.items.is_empty()
    }

    /// Terrain category of the ground item
    pub fn ground_terrain(&self, types: &ItemTypes) -> Option<TerrainId> {
        self.ground.and_then(|ground| types.terrain_of(ground.id))
    }

    /// Put an item on top of the stack
    pub fn add_item(&mut self, item: Item) {
        self.items.push(item);
    }

    /// Put a border item at the very bottom of the stack
    pub fn add_border_item(&mut self, item: Item) {
        self.items.insert(0, item);
    }

    /// Number of border items at the bottom of the stack
    pub fn border_count(&self, types: &ItemTypes) -> usize {
        self.items
            .iter()
            .take_while(|item| types.is_border(item.id))
            .count()
    }

    /// Ids of the border items at the bottom of the stack, bottom first
    pub fn border_ids(&self, types: &ItemTypes) -> Vec<ItemId> {
        self.items[..self.border_count(types)]
            .iter()
            .map(|item| item.id)
            .collect()
    }

    /// Remove every border item from the stack. Returns how many were removed.
    pub fn clean_borders(&mut self, types: &ItemTypes) -> usize {
        let before = self.items.len();
        self.items.retain(|item| !types.is_border(item.id));
        before - self.items.len()
    }
}
