//! Registries the border engine reads from
//!
//! A [`BorderContext`] is built once (usually by the loader) and then passed
//! by reference into every border operation. Nothing in it changes while
//! borders are being resolved.

use crate::border::{BorderDefinition, BorderId};
use crate::terrain::TerrainCategory;
use std::collections::HashMap;
use tilebrush_core::{ItemId, ItemTypes, TerrainId};

/// Item metadata plus the border and terrain registries
#[derive(Debug, Clone, Default)]
pub struct BorderContext {
    pub items: ItemTypes,
    borders: HashMap<BorderId, BorderDefinition>,
    /// Terrain `id` lives at index `id - 1`
    terrains: Vec<TerrainCategory>,
    names: HashMap<String, TerrainId>,
}

impl BorderContext {
    pub fn new(items: ItemTypes) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }

    pub fn border(&self, id: BorderId) -> Option<&BorderDefinition> {
        self.borders.get(&id)
    }

    /// Register a border definition. Id `0` and ids already in use are
    /// rejected.
    pub fn add_border(&mut self, border: BorderDefinition) -> bool {
        if border.id == 0 || self.borders.contains_key(&border.id) {
            return false;
        }
        self.borders.insert(border.id, border);
        true
    }

    pub fn border_count(&self) -> usize {
        self.borders.len()
    }

    /// Register a terrain category under a fresh id and link its fill items
    /// back to it. Returns `None` if the name is already taken.
    pub fn add_terrain(&mut self, mut terrain: TerrainCategory) -> Option<TerrainId> {
        if self.names.contains_key(&terrain.name) {
            return None;
        }

        let id = self.terrains.len() as TerrainId + 1;
        terrain.id = id;
        for ground in &terrain.ground_items {
            if let Some(item_type) = self.items.get_mut(ground.id) {
                item_type.terrain = Some(id);
            }
        }

        self.names.insert(terrain.name.clone(), id);
        self.terrains.push(terrain);
        Some(id)
    }

    pub fn terrain(&self, id: TerrainId) -> Option<&TerrainCategory> {
        let index = (id as usize).checked_sub(1)?;
        self.terrains.get(index)
    }

    pub fn terrain_mut(&mut self, id: TerrainId) -> Option<&mut TerrainCategory> {
        let index = (id as usize).checked_sub(1)?;
        self.terrains.get_mut(index)
    }

    pub fn terrain_by_name(&self, name: &str) -> Option<&TerrainCategory> {
        self.names.get(name).and_then(|id| self.terrain(*id))
    }

    /// Terrain category an item (normally a ground item) belongs to
    pub fn terrain_of_item(&self, id: ItemId) -> Option<&TerrainCategory> {
        self.items.terrain_of(id).and_then(|terrain| self.terrain(terrain))
    }

    pub fn terrains(&self) -> impl Iterator<Item = &TerrainCategory> {
        self.terrains.iter()
    }

    pub fn terrain_count(&self) -> usize {
        self.terrains.len()
    }
}
