//! Building a [`BorderContext`] from configuration documents
//!
//! Loading never fails on bad content. Every problem (unknown ids, dangling
//! references, bad edge names) is logged, recorded in [`LoadReport`] and the
//! offending declaration is skipped.
//!
//! Loading also updates item metadata: every border piece is flagged as a
//! border that always stays at the bottom of the stack, remembers the first
//! orientation and group it was declared with, and pieces of inline borders
//! point back at their ground item and brush.

use crate::border::{BorderDefinition, BorderId, BorderRef};
use crate::config::{
    read_config_file, ActionDef, BorderConfig, BorderRuleDef, ConditionDef, ConfigError, EdgeItemDef,
    GroundBrushDef, OptionalDef, SpecificCaseDef,
};
use crate::context::BorderContext;
use crate::terrain::{
    BorderAlign, BorderRule, BorderTarget, FriendTarget, MatchCondition, SpecificCaseRule, TerrainCategory,
};
use std::path::Path;
use tilebrush_core::{BorderEdge, ItemId, ItemTypes, TerrainId};

/// Outcome of a load
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub warnings: Vec<String>,
    /// Registry borders added
    pub borders: usize,
    /// Brush declarations processed (a redefinition counts again)
    pub brushes: usize,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Build a fresh context from `items` and `config`
pub fn load_config(items: ItemTypes, config: &BorderConfig) -> (BorderContext, LoadReport) {
    let mut ctx = BorderContext::new(items);
    let report = load_into(&mut ctx, config);
    (ctx, report)
}

/// Read a configuration file (JSON or TOML by extension) and build a context
pub fn load_config_file(items: ItemTypes, path: &Path) -> Result<(BorderContext, LoadReport), ConfigError> {
    let config = read_config_file(path)?;
    Ok(load_config(items, &config))
}

/// Add `config` to an existing context. Brushes whose name is already
/// registered are merged into the existing category.
pub fn load_into(ctx: &mut BorderContext, config: &BorderConfig) -> LoadReport {
    let mut loader = Loader {
        items: std::mem::take(&mut ctx.items),
        report: LoadReport::default(),
    };

    for def in &config.borders {
        if def.id == 0 {
            loader.warn("Border id 0 is reserved".to_string());
            continue;
        }
        if ctx.border(def.id).is_some() {
            loader.warn(format!("Duplicate border id {}", def.id));
            continue;
        }
        let border = loader.build_border(BorderDefinition::new(def.id), def.group, &def.items, def.optional, None);
        ctx.add_border(border);
        loader.report.borders += 1;
    }

    // Names first, so rules and friend lists can refer to brushes declared later
    for def in &config.brushes {
        if ctx.terrain_by_name(&def.name).is_none() {
            ctx.add_terrain(TerrainCategory::new(def.name.clone()));
        }
    }

    for def in &config.brushes {
        let Some(mut terrain) = ctx.terrain_by_name(&def.name).cloned() else {
            continue;
        };
        loader.load_brush(ctx, def, &mut terrain);
        if let Some(slot) = ctx.terrain_mut(terrain.id) {
            *slot = terrain;
        }
        loader.report.brushes += 1;
    }

    ctx.items = loader.items;
    tracing::debug!(
        "loaded {} borders and {} brushes with {} warnings",
        loader.report.borders,
        loader.report.brushes,
        loader.report.warnings.len()
    );
    loader.report
}

struct Loader {
    items: ItemTypes,
    report: LoadReport,
}

impl Loader {
    fn warn(&mut self, message: String) {
        tracing::warn!("{}", message);
        self.report.warnings.push(message);
    }

    fn edge(&mut self, name: &str, context: &str) -> Option<BorderEdge> {
        let edge = BorderEdge::from_name(name);
        if edge.is_none() {
            self.warn(format!("Invalid edge name '{}' in {}", name, context));
        }
        edge
    }

    /// Fill `border` from its piece list, updating the metadata of each piece.
    /// `owner` is set for inline borders: the owning terrain and ground item.
    fn build_border(
        &mut self,
        mut border: BorderDefinition,
        group: u16,
        pieces: &[EdgeItemDef],
        optional: bool,
        owner: Option<(TerrainId, ItemId)>,
    ) -> BorderDefinition {
        border.group = group;
        let context = format!("border {}", border.id);

        for piece in pieces {
            if !self.items.contains(piece.item) {
                self.warn(format!("Invalid item id {} for border {}", piece.item, border.id));
                continue;
            }
            let Some(edge) = self.edge(&piece.edge, &context) else {
                continue;
            };
            let Some(item_type) = self.items.get_mut(piece.item) else {
                continue;
            };

            if let Some((terrain, ground)) = owner {
                item_type.ground_equivalent = ground;
                item_type.terrain = Some(terrain);
            }
            item_type.always_on_bottom = true;
            item_type.is_border = true;
            item_type.is_optional_border |= optional;
            if group != 0 && item_type.border_group == 0 {
                item_type.border_group = group;
            }
            if item_type.border_alignment == BorderEdge::None {
                item_type.border_alignment = edge;
            }
            border.set_item(edge, piece.item);
        }
        border
    }

    /// Check the ground item an inline border stands in for
    fn ground_equivalent(&mut self, id: ItemId, terrain: TerrainId) -> Option<ItemId> {
        let Some(item_type) = self.items.get(id) else {
            self.warn(format!("Invalid ground equivalent item {}", id));
            return None;
        };
        if !item_type.is_ground {
            self.warn(format!("Ground equivalent {} is not a ground item", id));
            return None;
        }
        if item_type.terrain.is_some_and(|owner| owner != terrain) {
            self.warn(format!("Ground equivalent {} belongs to another brush", id));
            return None;
        }
        Some(id)
    }

    fn inline_border(
        &mut self,
        ground: ItemId,
        group: u16,
        pieces: &[EdgeItemDef],
        optional: bool,
        terrain: TerrainId,
    ) -> Option<BorderRef> {
        let ground = self.ground_equivalent(ground, terrain)?;
        let border = self.build_border(
            BorderDefinition::ground_equivalent(),
            group,
            pieces,
            optional,
            Some((terrain, ground)),
        );
        Some(BorderRef::Owned(Box::new(border)))
    }

    fn registry_border(&mut self, ctx: &BorderContext, id: BorderId) -> Option<BorderRef> {
        if ctx.border(id).is_none() {
            self.warn(format!("Could not find border id {}", id));
            return None;
        }
        Some(BorderRef::Registry(id))
    }

    fn load_brush(&mut self, ctx: &BorderContext, def: &GroundBrushDef, terrain: &mut TerrainCategory) {
        if let Some(look_id) = def.look_id {
            terrain.look_id = look_id;
        }
        if let Some(z_order) = def.z_order {
            terrain.z_order = z_order;
        }
        if let Some(solo) = def.solo_optional {
            terrain.solo_optional = solo;
        }
        if let Some(randomize) = def.randomize {
            terrain.randomize = randomize;
        }
        if def.clear_borders {
            terrain.clear_borders();
        }
        if def.clear_friends {
            terrain.clear_friends();
        }

        for item in &def.items {
            self.load_ground_item(terrain, item.id, item.chance);
        }
        if let Some(optional) = &def.optional {
            self.load_optional(ctx, terrain, optional);
        }
        for rule in &def.borders {
            if let Some(rule) = self.load_rule(ctx, terrain.id, rule) {
                terrain.add_border(rule);
            }
        }
        self.load_friends(ctx, terrain, def);

        if terrain.total_chance == 0 {
            terrain.randomize = false;
        }
    }

    fn load_ground_item(&mut self, terrain: &mut TerrainCategory, id: ItemId, chance: i32) {
        let chance = if chance < 0 {
            self.warn(format!("Chance for ground item {} is negative, using 0", id));
            0
        } else {
            chance as u32
        };

        let Some(item_type) = self.items.get(id) else {
            self.warn(format!("Invalid item id {}", id));
            return;
        };
        if !item_type.is_ground {
            self.warn(format!("Item {} is not a ground item", id));
            return;
        }
        if item_type.terrain.is_some_and(|owner| owner != terrain.id) {
            self.warn(format!("Item {} can not be a member of two brushes", id));
            return;
        }

        if let Some(item_type) = self.items.get_mut(id) {
            item_type.terrain = Some(terrain.id);
        }
        terrain.add_ground_item(id, chance);
    }

    fn load_optional(&mut self, ctx: &BorderContext, terrain: &mut TerrainCategory, def: &OptionalDef) {
        if terrain.optional_border.is_some() {
            self.warn(format!("Duplicate optional border on brush '{}'", terrain.name));
            return;
        }

        let border = match (def.ground_equivalent, def.id) {
            (Some(ground), _) => self.inline_border(ground, def.group, &def.items, true, terrain.id),
            (None, Some(id)) => self.registry_border(ctx, id),
            (None, None) => {
                self.warn(format!("Optional border on brush '{}' has no id", terrain.name));
                None
            }
        };
        terrain.optional_border = border;
    }

    fn load_rule(&mut self, ctx: &BorderContext, terrain: TerrainId, def: &BorderRuleDef) -> Option<BorderRule> {
        let target = match def.to.as_str() {
            "all" => BorderTarget::All,
            "none" => BorderTarget::Nothing,
            name => match ctx.terrain_by_name(name) {
                Some(other) => BorderTarget::Terrain(other.id),
                None => {
                    self.warn(format!("Target brush '{}' does not exist", name));
                    return None;
                }
            },
        };

        let align = match def.align.as_deref() {
            None | Some("outer") => BorderAlign::Outer,
            Some("inner") => BorderAlign::Inner,
            Some(other) => {
                self.warn(format!("Unknown border align '{}', using outer", other));
                BorderAlign::Outer
            }
        };

        let border = match (def.id, def.ground_equivalent) {
            (Some(0), _) => None,
            (Some(id), _) => Some(self.registry_border(ctx, id)?),
            (None, Some(ground)) => Some(self.inline_border(ground, def.group, &def.items, false, terrain)?),
            (None, None) => return None,
        };

        let mut rule = BorderRule::new(target, align).with_super(def.is_super);
        rule.border = border;
        for case in &def.specific {
            if let Some(case) = self.load_specific_case(ctx, case)? {
                rule.specific_cases.push(case);
            }
        }
        Some(rule)
    }

    /// `None` drops the whole rule (an invalid replacement item), `Some(None)`
    /// drops only this case because it declared nothing usable.
    fn load_specific_case(
        &mut self,
        ctx: &BorderContext,
        def: &SpecificCaseDef,
    ) -> Option<Option<SpecificCaseRule>> {
        let mut case = SpecificCaseRule::new().with_keep_border(def.keep_border);
        let mut declared = false;

        for condition in &def.conditions {
            match condition {
                ConditionDef::MatchBorder { id, edge } => {
                    let Some(border) = ctx.border(*id) else {
                        self.warn(format!("Unknown border id {} in specific case", id));
                        continue;
                    };
                    let Some(edge) = self.edge(edge, "specific case") else {
                        continue;
                    };
                    case.add_border_condition(border.item(edge).unwrap_or(0));
                }
                ConditionDef::MatchGroup { group, edge } => {
                    let Some(edge) = self.edge(edge, "specific case") else {
                        continue;
                    };
                    case.add_condition(MatchCondition::Group { group: *group, edge });
                }
                ConditionDef::MatchItem { id } => case.add_condition(MatchCondition::Item(*id)),
            }
            declared = true;
        }

        for action in &def.actions {
            match action {
                ActionDef::ReplaceBorder { id, edge, with } => {
                    let Some(border) = ctx.border(*id) else {
                        self.warn(format!("Unknown border id {} in specific case", id));
                        continue;
                    };
                    let Some(edge) = self.edge(edge, "specific case") else {
                        continue;
                    };
                    let from = border.item(edge).unwrap_or(0);
                    self.replacement_item(*with)?;
                    case = case.with_replacement(from, *with);
                }
                ActionDef::ReplaceItem { id, with } => {
                    self.replacement_item(*with)?;
                    case = case.with_replacement(*id, *with);
                }
                ActionDef::DeleteBorders => case = case.with_delete_all(),
            }
            declared = true;
        }

        Some(declared.then_some(case))
    }

    /// Replacement items are drawn as border pieces
    fn replacement_item(&mut self, id: ItemId) -> Option<()> {
        match self.items.get_mut(id) {
            Some(item_type) => {
                item_type.is_border = true;
                Some(())
            }
            None => {
                self.warn(format!("Invalid replacement item id {}", id));
                None
            }
        }
    }

    fn load_friends(&mut self, ctx: &BorderContext, terrain: &mut TerrainCategory, def: &GroundBrushDef) {
        if !def.friends.is_empty() && !def.enemies.is_empty() {
            self.warn(format!(
                "Brush '{}' lists both friends and enemies, treating all as enemies",
                terrain.name
            ));
        }

        for name in def.friends.iter().chain(&def.enemies) {
            let friend = if name == "all" {
                FriendTarget::All
            } else if let Some(other) = ctx.terrain_by_name(name) {
                FriendTarget::Terrain(other.id)
            } else {
                self.warn(format!("Brush '{}' is not defined", name));
                continue;
            };
            terrain.friends.push(friend);
        }

        if !def.enemies.is_empty() {
            terrain.hate_friends = true;
        } else if !def.friends.is_empty() {
            terrain.hate_friends = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{parse_config_json, BorderDef, GroundItemDef};
    use crate::paint::do_borders;
    use crate::specific::apply_specific_cases;
    use crate::testing;
    use tilebrush_core::{Position, Tile, TileStorage};

    fn edge(edge: &str, item: ItemId) -> EdgeItemDef {
        EdgeItemDef {
            edge: edge.to_string(),
            item,
        }
    }

    fn raw_items() -> ItemTypes {
        let mut items = testing::item_types();
        // the loader decides what is a border
        for id in 301..=320 {
            if let Some(t) = items.get_mut(id) {
                t.is_border = false;
            }
        }
        items
    }

    const SCENARIO: &str = r#"{
        "borders": [
            {"id": 5, "items": [
                {"edge": "s", "item": 301}, {"edge": "n", "item": 302},
                {"edge": "w", "item": 303}, {"edge": "e", "item": 304}
            ]}
        ],
        "brushes": [
            {"name": "grass", "z_order": 1, "items": [{"id": 100}]},
            {"name": "water", "z_order": 2, "items": [{"id": 200}],
             "borders": [{"id": 5, "align": "outer", "to": "all"}]}
        ]
    }"#;

    #[test]
    fn test_scenario_loads_and_borders() {
        let config = parse_config_json(SCENARIO).unwrap();
        let (ctx, report) = load_config(raw_items(), &config);
        assert!(report.is_clean(), "{:?}", report.warnings);
        assert_eq!((report.borders, report.brushes), (1, 2));

        let piece = ctx.items.get(302).unwrap();
        assert!(piece.is_border && piece.always_on_bottom);
        assert_eq!(piece.border_alignment, BorderEdge::North);
        assert_eq!(ctx.terrain_of_item(200).unwrap().name, "water");
        assert!(ctx.terrain_by_name("water").unwrap().has_outer_border);

        let mut map = testing::map_from_rows(&[".W.", ".G.", "..."]);
        let center = Position::new(1, 1, 0);
        do_borders(&mut map, &ctx, center);
        assert_eq!(map.tile(center).unwrap().border_ids(&ctx.items), vec![302]);
    }

    #[test]
    fn test_forward_references_and_friends() {
        let config = BorderConfig {
            borders: Vec::new(),
            brushes: vec![
                GroundBrushDef {
                    name: "sand".to_string(),
                    friends: vec!["dirt".to_string()],
                    borders: vec![BorderRuleDef {
                        id: Some(0),
                        to: "dirt".to_string(),
                        ..BorderRuleDef::default()
                    }],
                    ..GroundBrushDef::default()
                },
                GroundBrushDef {
                    name: "dirt".to_string(),
                    enemies: vec!["all".to_string()],
                    ..GroundBrushDef::default()
                },
            ],
        };
        let (ctx, report) = load_config(raw_items(), &config);
        assert!(report.is_clean(), "{:?}", report.warnings);

        let sand = ctx.terrain_by_name("sand").unwrap();
        let dirt = ctx.terrain_by_name("dirt").unwrap();
        assert_eq!(sand.borders[0].target, BorderTarget::Terrain(dirt.id));
        assert!(sand.borders[0].border.is_none());
        assert!(sand.friend_of(dirt));
        assert!(dirt.hate_friends);
        assert!(!dirt.friend_of(sand));
        // no fill items
        assert!(!sand.randomize);
    }

    #[test]
    fn test_bad_declarations_warn_and_skip() {
        let config = BorderConfig {
            borders: vec![
                BorderDef {
                    id: 0,
                    ..BorderDef::default()
                },
                BorderDef {
                    id: 7,
                    items: vec![edge("n", 999), edge("north", 305), edge("e", 306)],
                    ..BorderDef::default()
                },
                BorderDef {
                    id: 7,
                    ..BorderDef::default()
                },
            ],
            brushes: vec![
                GroundBrushDef {
                    name: "grass".to_string(),
                    items: vec![
                        GroundItemDef { id: 100, chance: -3 },
                        GroundItemDef { id: 998, chance: 1 },
                        GroundItemDef { id: 305, chance: 1 },
                    ],
                    borders: vec![
                        BorderRuleDef {
                            id: Some(42),
                            ..BorderRuleDef::default()
                        },
                        BorderRuleDef {
                            id: Some(7),
                            to: "lava".to_string(),
                            ..BorderRuleDef::default()
                        },
                        BorderRuleDef {
                            id: Some(7),
                            align: Some("sideways".to_string()),
                            ..BorderRuleDef::default()
                        },
                    ],
                    friends: vec!["nobody".to_string()],
                    ..GroundBrushDef::default()
                },
                GroundBrushDef {
                    name: "water".to_string(),
                    items: vec![GroundItemDef { id: 100, chance: 1 }],
                    ..GroundBrushDef::default()
                },
            ],
        };

        let (ctx, report) = load_config(raw_items(), &config);
        let expected = [
            "Border id 0 is reserved",
            "Invalid item id 999 for border 7",
            "Invalid edge name 'north' in border 7",
            "Duplicate border id 7",
            "Chance for ground item 100 is negative, using 0",
            "Invalid item id 998",
            "Item 305 is not a ground item",
            "Could not find border id 42",
            "Target brush 'lava' does not exist",
            "Unknown border align 'sideways', using outer",
            "Brush 'nobody' is not defined",
            "Item 100 can not be a member of two brushes",
        ];
        assert_eq!(report.warnings, expected);

        let border = ctx.border(7).unwrap();
        assert_eq!(border.items().collect::<Vec<_>>(), vec![(BorderEdge::East, 306)]);
        let grass = ctx.terrain_by_name("grass").unwrap();
        assert_eq!(grass.borders.len(), 1);
        assert_eq!(grass.borders[0].align, BorderAlign::Outer);
        assert_eq!(grass.total_chance, 0);
        assert!(!grass.randomize);
        assert!(ctx.terrain_by_name("water").unwrap().ground_items.is_empty());
    }

    #[test]
    fn test_specific_cases_resolve_border_edges() {
        let mut config = parse_config_json(SCENARIO).unwrap();
        config.brushes[1].borders[0].specific = vec![
            SpecificCaseDef {
                conditions: vec![
                    ConditionDef::MatchBorder {
                        id: 5,
                        edge: "w".to_string(),
                    },
                    ConditionDef::MatchItem { id: 302 },
                ],
                actions: vec![ActionDef::ReplaceBorder {
                    id: 5,
                    edge: "n".to_string(),
                    with: 313,
                }],
                keep_border: false,
            },
            SpecificCaseDef {
                conditions: vec![ConditionDef::MatchItem { id: 301 }],
                actions: vec![ActionDef::ReplaceItem { id: 301, with: 9999 }],
                keep_border: false,
            },
        ];

        let (ctx, report) = load_config(raw_items(), &config);
        assert_eq!(report.warnings, vec!["Invalid replacement item id 9999"]);
        // the invalid replacement drops the whole rule
        assert!(ctx.terrain_by_name("water").unwrap().borders.is_empty());

        config.brushes[1].borders[0].specific.pop();
        let (ctx, report) = load_config(raw_items(), &config);
        assert!(report.is_clean(), "{:?}", report.warnings);
        assert!(ctx.items.is_border(313));

        let water = ctx.terrain_by_name("water").unwrap();
        let case = &water.borders[0].specific_cases[0];
        assert_eq!(case.conditions, vec![MatchCondition::Item(303), MatchCondition::Item(302)]);
        assert_eq!(case.replace.map(|r| (r.from, r.with)), Some((302, 313)));

        let mut map = testing::map_from_rows(&["WW.", "WG.", "..."]);
        let center = Position::new(1, 1, 0);
        do_borders(&mut map, &ctx, center);
        assert_eq!(map.tile(center).unwrap().border_ids(&ctx.items), vec![313]);
    }

    #[test]
    fn test_inline_borders_and_optional() {
        let config = BorderConfig {
            borders: Vec::new(),
            brushes: vec![GroundBrushDef {
                name: "water".to_string(),
                items: vec![GroundItemDef { id: 200, chance: 1 }],
                optional: Some(OptionalDef {
                    ground_equivalent: Some(200),
                    group: 3,
                    items: vec![edge("n", 311)],
                    ..OptionalDef::default()
                }),
                borders: vec![BorderRuleDef {
                    ground_equivalent: Some(200),
                    items: vec![edge("s", 312)],
                    ..BorderRuleDef::default()
                }],
                ..GroundBrushDef::default()
            }],
        };

        let (ctx, report) = load_config(raw_items(), &config);
        assert!(report.is_clean(), "{:?}", report.warnings);

        let water = ctx.terrain_by_name("water").unwrap();
        assert!(water.optional_border.as_ref().unwrap().is_owned());
        assert!(water.borders[0].border.as_ref().unwrap().is_owned());

        let mountain = ctx.items.get(311).unwrap();
        assert!(mountain.is_optional_border);
        assert_eq!(mountain.border_group, 3);
        assert_eq!(mountain.ground_equivalent, 200);
        assert_eq!(mountain.terrain, Some(water.id));
        assert!(!ctx.items.get(312).unwrap().is_optional_border);
    }

    #[test]
    fn test_border_condition_keeps_group_match() {
        let mut config = parse_config_json(SCENARIO).unwrap();
        config.borders[0].group = 4;
        config.brushes[1].borders[0].specific = vec![SpecificCaseDef {
            conditions: vec![
                ConditionDef::MatchGroup {
                    group: 4,
                    edge: "e".to_string(),
                },
                ConditionDef::MatchBorder {
                    id: 5,
                    edge: "n".to_string(),
                },
            ],
            actions: vec![ActionDef::ReplaceItem { id: 302, with: 310 }],
            keep_border: false,
        }];

        let (ctx, report) = load_config(raw_items(), &config);
        assert!(report.is_clean(), "{:?}", report.warnings);

        let rule = &ctx.terrain_by_name("water").unwrap().borders[0];
        assert_eq!(rule.specific_cases[0].match_group, Some((4, BorderEdge::East)));

        // 304 is the group 4 east piece, 302 the north piece of border 5
        let mut tile = Tile::new(Position::new(0, 0, 0)).with_items(&[304, 302]);
        assert_eq!(apply_specific_cases(&mut tile, &ctx.items, &[rule]), 1);
        assert_eq!(tile.border_ids(&ctx.items), vec![304, 310]);
    }

    #[test]
    fn test_redefinition_merges() {
        let first = parse_config_json(SCENARIO).unwrap();
        let (mut ctx, _) = load_config(raw_items(), &first);

        let second = BorderConfig {
            borders: Vec::new(),
            brushes: vec![GroundBrushDef {
                name: "water".to_string(),
                z_order: Some(8),
                clear_borders: true,
                ..GroundBrushDef::default()
            }],
        };
        let report = load_into(&mut ctx, &second);
        assert!(report.is_clean());
        assert_eq!(ctx.terrain_count(), 2);

        let water = ctx.terrain_by_name("water").unwrap();
        assert_eq!(water.z_order, 8);
        assert!(water.borders.is_empty());
        assert_eq!(water.ground_items.len(), 1);
    }

    #[test]
    fn test_load_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("borders.json");
        std::fs::write(&path, SCENARIO).unwrap();

        let (ctx, report) = load_config_file(raw_items(), &path).unwrap();
        assert!(report.is_clean());
        assert_eq!(ctx.border_count(), 1);
    }
}
