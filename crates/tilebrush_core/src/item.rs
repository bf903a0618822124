//! Items and static item metadata

use crate::edge::BorderEdge;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Item type identifier. `0` is never a valid item.
pub type ItemId = u16;

/// Identifier of a terrain category (ground brush). `0` means "no terrain".
pub type TerrainId = u32;

/// An item instance placed on a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
}

impl Item {
    pub const fn new(id: ItemId) -> Self {
        Self { id }
    }
}

/// Static properties shared by every item of one id
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemType {
    pub id: ItemId,
    #[serde(default)]
    pub name: String,
    /// Whether this item can be a tile's ground
    #[serde(default)]
    pub is_ground: bool,
    /// Whether this item is a border piece placed by the border engine
    #[serde(default)]
    pub is_border: bool,
    /// Border piece belonging to an optional (mountain style) border
    #[serde(default)]
    pub is_optional_border: bool,
    /// Never place other items underneath this one
    #[serde(default)]
    pub always_on_bottom: bool,
    /// Orientation this border piece was first declared with
    #[serde(default)]
    pub border_alignment: BorderEdge,
    /// Border group used by group-matching specific cases (0 = none)
    #[serde(default)]
    pub border_group: u16,
    /// Ground item this border piece stands in for (0 = none)
    #[serde(default)]
    pub ground_equivalent: ItemId,
    /// Terrain category this item belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terrain: Option<TerrainId>,
}

impl ItemType {
    pub fn new(id: ItemId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// A ground item type
    pub fn ground(id: ItemId) -> Self {
        Self::new(id).with_ground(true)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_ground(mut self, is_ground: bool) -> Self {
        self.is_ground = is_ground;
        self
    }

    pub fn with_border(mut self, is_border: bool) -> Self {
        self.is_border = is_border;
        self
    }

    pub fn with_border_group(mut self, group: u16) -> Self {
        self.border_group = group;
        self
    }
}

/// Item metadata registry and item factory
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemTypes {
    types: HashMap<ItemId, ItemType>,
}

impl ItemTypes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON array of item types
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let types: Vec<ItemType> = serde_json::from_str(json)?;
        Ok(types.into_iter().collect())
    }

    /// Register an item type, replacing any previous type with the same id.
    /// Returns `false` for the reserved id `0`.
    pub fn insert(&mut self, item_type: ItemType) -> bool {
        if item_type.id == 0 {
            return false;
        }
        self.types.insert(item_type.id, item_type);
        true
    }

    pub fn get(&self, id: ItemId) -> Option<&ItemType> {
        self.types.get(&id)
    }

    pub fn get_mut(&mut self, id: ItemId) -> Option<&mut ItemType> {
        self.types.get_mut(&id)
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.types.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn is_border(&self, id: ItemId) -> bool {
        self.get(id).map(|t| t.is_border).unwrap_or(false)
    }

    pub fn is_ground(&self, id: ItemId) -> bool {
        self.get(id).map(|t| t.is_ground).unwrap_or(false)
    }

    /// Terrain category the item belongs to, if any
    pub fn terrain_of(&self, id: ItemId) -> Option<TerrainId> {
        self.get(id).and_then(|t| t.terrain)
    }

    /// Create a new item instance. Unknown ids produce nothing.
    pub fn create_item(&self, id: ItemId) -> Option<Item> {
        self.contains(id).then(|| Item::new(id))
    }
}

impl FromIterator<ItemType> for ItemTypes {
    fn from_iter<I: IntoIterator<Item = ItemType>>(iter: I) -> Self {
        let mut types = ItemTypes::new();
        for item_type in iter {
            types.insert(item_type);
        }
        types
    }
}
