//! Border definitions
//!
//! A border definition is a named set of up to twelve directional items used
//! to draw the transition between two terrains (or a terrain and nothing).

use crate::context::BorderContext;
use tilebrush_core::{BorderEdge, ItemId};

/// Border registry identifier. `0` marks an inline (ground equivalent) border.
pub type BorderId = u32;

/// One border definition: an item id per orientation slot (0 = absent)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BorderDefinition {
    pub id: BorderId,
    /// Group tag used by group-matching specific cases (0 = none)
    pub group: u16,
    /// Declared inline through `ground_equivalent` rather than in the registry
    pub ground: bool,
    tiles: [ItemId; BorderEdge::COUNT],
}

impl BorderDefinition {
    pub fn new(id: BorderId) -> Self {
        Self {
            id,
            group: 0,
            ground: false,
            tiles: [0; BorderEdge::COUNT],
        }
    }

    /// An anonymous border owned by the terrain category that declares it
    pub fn ground_equivalent() -> Self {
        Self {
            ground: true,
            ..Self::new(0)
        }
    }

    pub fn with_group(mut self, group: u16) -> Self {
        self.group = group;
        self
    }

    pub fn with_item(mut self, edge: BorderEdge, item: ItemId) -> Self {
        self.set_item(edge, item);
        self
    }

    /// Item placed for `edge`, if the definition has one
    pub fn item(&self, edge: BorderEdge) -> Option<ItemId> {
        match edge {
            BorderEdge::None => None,
            _ => Some(self.tiles[edge.index()]).filter(|&id| id != 0),
        }
    }

    pub fn set_item(&mut self, edge: BorderEdge, item: ItemId) {
        if edge != BorderEdge::None {
            self.tiles[edge.index()] = item;
        }
    }

    /// Every `(edge, item)` pair that is set, in slot order
    pub fn items(&self) -> impl Iterator<Item = (BorderEdge, ItemId)> + '_ {
        BorderEdge::ALL
            .into_iter()
            .filter_map(|edge| self.item(edge).map(|id| (edge, id)))
    }
}

/// How a terrain category refers to a border definition.
///
/// Registry borders are shared and looked up by id; inline ground-equivalent
/// borders belong to the declaring category and die with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BorderRef {
    Registry(BorderId),
    Owned(Box<BorderDefinition>),
}

impl BorderRef {
    /// The definition this reference points at. A dangling registry id
    /// resolves to nothing.
    pub fn resolve<'a>(&'a self, ctx: &'a BorderContext) -> Option<&'a BorderDefinition> {
        match self {
            BorderRef::Registry(id) => ctx.border(*id),
            BorderRef::Owned(border) => Some(border.as_ref()),
        }
    }

    pub fn is_owned(&self) -> bool {
        matches!(self, BorderRef::Owned(_))
    }
}
