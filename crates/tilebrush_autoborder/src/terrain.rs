//! Terrain categories (ground brushes) and their border rules
//!
//! A terrain category owns the fill items painted as ground, the border rules
//! that decide what is drawn where it meets other terrain, and the friend or
//! enemy list that can suppress those borders.

use crate::border::BorderRef;
use crate::context::BorderContext;
use rand::Rng;
use tilebrush_core::{BorderEdge, ItemId, TerrainId};

/// What a border rule is declared against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderTarget {
    /// Tiles without any terrain
    Nothing,
    /// Any other terrain
    All,
    Terrain(TerrainId),
}

impl BorderTarget {
    /// Whether a neighbor of terrain `other` (or no terrain) is covered.
    /// `All` does not cover empty neighbors.
    pub fn matches(self, other: Option<TerrainId>) -> bool {
        match (self, other) {
            (BorderTarget::Nothing, None) => true,
            (BorderTarget::All, Some(_)) => true,
            (BorderTarget::Terrain(id), Some(other)) => id == other,
            _ => false,
        }
    }
}

/// Which side of the transition a rule draws on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderAlign {
    /// This terrain extends outward onto the neighbor
    #[default]
    Outer,
    /// This terrain recedes and shows the neighbor's edge
    Inner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FriendTarget {
    All,
    Terrain(TerrainId),
}

/// One match condition of a specific case
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchCondition {
    /// A border item with exactly this id
    Item(ItemId),
    /// A border item of this group placed with this orientation
    Group { group: u16, edge: BorderEdge },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Replacement {
    pub from: ItemId,
    pub with: ItemId,
}

/// Post-processing rule run over a tile's resolved border items
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecificCaseRule {
    pub conditions: Vec<MatchCondition>,
    /// Group match in effect. Set by a group condition, cleared by a later
    /// item condition.
    pub match_group: Option<(u16, BorderEdge)>,
    pub replace: Option<Replacement>,
    pub delete_all: bool,
    pub keep_border: bool,
}

impl SpecificCaseRule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_condition(mut self, condition: MatchCondition) -> Self {
        self.add_condition(condition);
        self
    }

    pub fn add_condition(&mut self, condition: MatchCondition) {
        self.match_group = match condition {
            MatchCondition::Item(_) => None,
            MatchCondition::Group { group, edge } => Some((group, edge)),
        };
        self.conditions.push(condition);
    }

    /// Item condition taken from a border definition's piece. Unlike
    /// [`Self::add_condition`] it leaves the group match in effect.
    pub fn add_border_condition(&mut self, id: ItemId) {
        self.conditions.push(MatchCondition::Item(id));
    }

    pub fn with_replacement(mut self, from: ItemId, with: ItemId) -> Self {
        self.replace = Some(Replacement { from, with });
        self
    }

    pub fn with_delete_all(mut self) -> Self {
        self.delete_all = true;
        self
    }

    pub fn with_keep_border(mut self, keep_border: bool) -> Self {
        self.keep_border = keep_border;
        self
    }

    /// Number of literal item conditions equal to `id`
    pub fn item_matches(&self, id: ItemId) -> usize {
        self.conditions
            .iter()
            .filter(|condition| **condition == MatchCondition::Item(id))
            .count()
    }
}

/// A border block declared on a terrain category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BorderRule {
    pub target: BorderTarget,
    pub align: BorderAlign,
    /// Parsed and kept, but resolution never consults it
    pub is_super: bool,
    /// `None` declares the relationship without drawing anything
    pub border: Option<BorderRef>,
    pub specific_cases: Vec<SpecificCaseRule>,
}

impl BorderRule {
    pub fn new(target: BorderTarget, align: BorderAlign) -> Self {
        Self {
            target,
            align,
            is_super: false,
            border: None,
            specific_cases: Vec::new(),
        }
    }

    pub fn outer(target: BorderTarget) -> Self {
        Self::new(target, BorderAlign::Outer)
    }

    pub fn inner(target: BorderTarget) -> Self {
        Self::new(target, BorderAlign::Inner)
    }

    pub fn with_border(mut self, border: BorderRef) -> Self {
        self.border = Some(border);
        self
    }

    pub fn with_super(mut self, is_super: bool) -> Self {
        self.is_super = is_super;
        self
    }

    pub fn with_specific_case(mut self, case: SpecificCaseRule) -> Self {
        self.specific_cases.push(case);
        self
    }
}

/// A fill item with its cumulative chance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroundItemChance {
    pub id: ItemId,
    /// Running total of chances up to and including this item
    pub chance: u32,
}

/// A ground brush: a named class of terrain such as grass or water
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerrainCategory {
    pub id: TerrainId,
    pub name: String,
    pub look_id: ItemId,
    pub z_order: i32,
    pub ground_items: Vec<GroundItemChance>,
    pub total_chance: u32,
    pub randomize: bool,
    pub has_outer_border: bool,
    pub has_inner_border: bool,
    pub has_zilch_outer_border: bool,
    pub has_zilch_inner_border: bool,
    /// Where the optional border applies, draw nothing else
    pub solo_optional: bool,
    pub optional_border: Option<BorderRef>,
    pub borders: Vec<BorderRule>,
    pub friends: Vec<FriendTarget>,
    /// Inverts `friends` into an enemy list
    pub hate_friends: bool,
}

impl TerrainCategory {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            look_id: 0,
            z_order: 0,
            ground_items: Vec::new(),
            total_chance: 0,
            randomize: true,
            has_outer_border: false,
            has_inner_border: false,
            has_zilch_outer_border: false,
            has_zilch_inner_border: false,
            solo_optional: false,
            optional_border: None,
            borders: Vec::new(),
            friends: Vec::new(),
            hate_friends: false,
        }
    }

    pub fn with_z_order(mut self, z_order: i32) -> Self {
        self.z_order = z_order;
        self
    }

    pub fn with_ground_item(mut self, id: ItemId, chance: u32) -> Self {
        self.add_ground_item(id, chance);
        self
    }

    pub fn with_border(mut self, rule: BorderRule) -> Self {
        self.add_border(rule);
        self
    }

    pub fn with_friend(mut self, friend: FriendTarget) -> Self {
        self.friends.push(friend);
        self
    }

    pub fn with_optional_border(mut self, border: BorderRef, solo: bool) -> Self {
        self.optional_border = Some(border);
        self.solo_optional = solo;
        self
    }

    pub fn add_ground_item(&mut self, id: ItemId, chance: u32) {
        self.total_chance += chance;
        self.ground_items.push(GroundItemChance {
            id,
            chance: self.total_chance,
        });
        if self.look_id == 0 {
            self.look_id = id;
        }
    }

    /// Append a border rule and update the `has_*_border` flags
    pub fn add_border(&mut self, rule: BorderRule) {
        match (rule.align, rule.target) {
            (BorderAlign::Outer, BorderTarget::Nothing) => self.has_zilch_outer_border = true,
            (BorderAlign::Outer, _) => self.has_outer_border = true,
            (BorderAlign::Inner, BorderTarget::Nothing) => self.has_zilch_inner_border = true,
            (BorderAlign::Inner, _) => self.has_inner_border = true,
        }
        self.borders.push(rule);
    }

    /// Drop every border rule. The `has_*_border` flags are left as they are.
    pub fn clear_borders(&mut self) {
        self.borders.clear();
    }

    pub fn clear_friends(&mut self) {
        self.friends.clear();
        self.hate_friends = false;
    }

    pub fn has_optional_border(&self) -> bool {
        self.optional_border.is_some()
    }

    /// Whether borders against `other` are suppressed from this side
    pub fn friend_of(&self, other: &TerrainCategory) -> bool {
        let listed = self.friends.iter().any(|friend| match friend {
            FriendTarget::All => true,
            FriendTarget::Terrain(id) => *id == other.id,
        });
        listed != self.hate_friends
    }

    /// First rule with `align` covering `target`, in declaration order
    pub fn find_rule(&self, target: Option<TerrainId>, align: BorderAlign) -> Option<&BorderRule> {
        self.borders
            .iter()
            .find(|rule| rule.align == align && rule.target.matches(target))
    }

    /// Pick a fill item by weight.
    ///
    /// Without randomization (or with no weight at all) the first item is used.
    pub fn pick_ground_item(&self, rng: &mut impl Rng) -> Option<ItemId> {
        let first = self.ground_items.first()?;
        if !self.randomize || self.total_chance == 0 {
            return Some(first.id);
        }

        let roll = rng.gen_range(0..self.total_chance);
        let picked = self
            .ground_items
            .iter()
            .find(|item| roll < item.chance)
            .unwrap_or(first);
        Some(picked.id)
    }

    /// Every item this brush can place: fill items, border pieces and
    /// specific case replacements, without duplicates.
    pub fn related_items(&self, ctx: &BorderContext) -> Vec<ItemId> {
        let mut items: Vec<ItemId> = self.ground_items.iter().map(|item| item.id).collect();

        let borders = self
            .borders
            .iter()
            .filter_map(|rule| rule.border.as_ref())
            .chain(self.optional_border.as_ref())
            .filter_map(|border| border.resolve(ctx));
        for border in borders {
            items.extend(border.items().map(|(_, id)| id));
        }

        for case in self.borders.iter().flat_map(|rule| &rule.specific_cases) {
            items.extend(case.conditions.iter().filter_map(|condition| match condition {
                MatchCondition::Item(id) => Some(*id),
                MatchCondition::Group { .. } => None,
            }));
            if let Some(replace) = case.replace {
                items.extend([replace.from, replace.with]);
            }
        }

        let mut seen = std::collections::HashSet::new();
        items.retain(|id| *id != 0 && seen.insert(*id));
        items
    }
}
