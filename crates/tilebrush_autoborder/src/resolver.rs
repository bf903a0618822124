//! Border resolution for a single tile
//!
//! Walks the eight neighbors of a tile and groups them into clusters: one per
//! border definition, each with the mask of neighbors it borders against and a
//! z value used to order drawing. Neighbors already folded into a mask are
//! marked visited so they are never counted twice.

use crate::border::BorderDefinition;
use crate::context::BorderContext;
use crate::neighbors::{scan_neighbors, Neighbor};
use crate::terrain::{BorderAlign, BorderRule, TerrainCategory};
use tilebrush_core::{Position, TerrainId, TileStorage};

/// z of borders against nothing: drawn before everything else
pub const Z_FIRST: i32 = i32::MIN;
/// z of optional borders: drawn after everything else
pub const Z_LAST: i32 = i32::MAX;

/// One border definition to draw, with the neighbors it faces
#[derive(Debug, Clone, Copy)]
pub struct BorderCluster<'a> {
    pub alignment: u8,
    pub z: i32,
    pub border: &'a BorderDefinition,
}

/// Result of resolving one tile
#[derive(Debug, Clone, Default)]
pub struct Resolution<'a> {
    pub clusters: Vec<BorderCluster<'a>>,
    /// Rules whose specific cases run after the borders are placed.
    /// May contain the same rule more than once.
    pub specific_cases: Vec<&'a BorderRule>,
    /// Optional border eligibility to store back on the tile
    pub optional_border: bool,
}

impl<'a> Resolution<'a> {
    fn queue_cases(&mut self, rule: &'a BorderRule) {
        if !rule.specific_cases.is_empty() {
            self.specific_cases.push(rule);
        }
    }

    /// Fold `alignment` into the cluster for `border`, or start a new one.
    /// The z of an existing cluster is raised to `z`, never lowered.
    fn raise_cluster(&mut self, border: &'a BorderDefinition, alignment: u8, z: i32) {
        match self.find_cluster(border) {
            Some(cluster) => {
                cluster.alignment |= alignment;
                cluster.z = cluster.z.max(z);
            }
            None => self.clusters.push(BorderCluster { alignment, z, border }),
        }
    }

    /// Like [`Self::raise_cluster`] but the cluster is forced to draw first
    fn bottom_cluster(&mut self, border: &'a BorderDefinition, alignment: u8) {
        match self.find_cluster(border) {
            Some(cluster) => {
                cluster.alignment |= alignment;
                cluster.z = Z_FIRST;
            }
            None => self.clusters.push(BorderCluster {
                alignment,
                z: Z_FIRST,
                border,
            }),
        }
    }

    fn find_cluster(&mut self, border: &BorderDefinition) -> Option<&mut BorderCluster<'a>> {
        self.clusters
            .iter_mut()
            .find(|cluster| std::ptr::eq(cluster.border, border))
    }
}

/// Work out which borders the tile at `position` needs.
///
/// Never fails: a missing tile or missing data yields an empty resolution.
pub fn resolve<'a, S>(storage: &S, ctx: &'a BorderContext, position: Position) -> Resolution<'a>
where
    S: TileStorage + ?Sized,
{
    let Some(tile) = storage.tile(position) else {
        return Resolution::default();
    };

    let own = tile.ground_terrain(&ctx.items).and_then(|terrain| ctx.terrain(terrain));
    let mut neighbors = scan_neighbors(storage, ctx, position);
    let mut resolution = Resolution {
        optional_border: tile.optional_border,
        ..Resolution::default()
    };

    for i in 0..neighbors.len() {
        if neighbors[i].visited {
            continue;
        }
        let other = neighbors[i].terrain;

        match (own, other) {
            (Some(own), other) => {
                if let Some(other) = other {
                    if other.id == own.id {
                        continue;
                    }
                    if !border_against(ctx, &mut resolution, &mut neighbors, i, own, other) {
                        continue;
                    }
                }
                border_against_nothing(ctx, &mut resolution, &mut neighbors, i, own);
                continue;
            }
            (None, Some(other)) if other.has_zilch_outer_border => {
                let alignment = collect(&mut neighbors, i, Some(other.id));
                if alignment != 0 {
                    if let Some(rule) = rule_between(None, Some(other)) {
                        if let Some(border) = rule.border.as_ref().and_then(|b| b.resolve(ctx)) {
                            resolution.raise_cluster(border, alignment, other.z_order);
                        }
                        resolution.queue_cases(rule);
                    }

                    let optional = optional_border(ctx, other);
                    match optional {
                        Some(border) if resolution.optional_border => {
                            resolution.clusters.push(BorderCluster {
                                alignment,
                                z: Z_LAST,
                                border,
                            });
                        }
                        _ => resolution.optional_border = false,
                    }
                }
            }
            (None, _) => {}
        }
        neighbors[i].visited = true;
    }

    resolution
}

/// Border between the tile's own terrain and a different neighbor terrain.
/// Returns `false` when the pair are friends with nothing to draw, in which
/// case the rest of this neighbor's pass is skipped.
fn border_against<'a>(
    ctx: &'a BorderContext,
    resolution: &mut Resolution<'a>,
    neighbors: &mut [Neighbor<'a>; 8],
    i: usize,
    own: &'a TerrainCategory,
    other: &'a TerrainCategory,
) -> bool {
    if !(other.has_outer_border || own.has_inner_border) {
        return true;
    }

    let mut only_optional = false;
    if other.friend_of(own) || own.friend_of(other) {
        if !other.has_optional_border() {
            return false;
        }
        only_optional = true;
    }

    let alignment = collect(neighbors, i, Some(other.id));
    if alignment == 0 {
        return true;
    }

    if other.has_optional_border() && resolution.optional_border {
        if let Some(border) = optional_border(ctx, other) {
            resolution.clusters.push(BorderCluster {
                alignment,
                z: Z_LAST,
                border,
            });
        }
        if other.solo_optional {
            only_optional = true;
        }
    }

    if !only_optional {
        if let Some(rule) = rule_between(Some(own), Some(other)) {
            if let Some(border) = rule.border.as_ref().and_then(|b| b.resolve(ctx)) {
                resolution.raise_cluster(border, alignment, other.z_order);
            }
            resolution.queue_cases(rule);
        }
    }
    true
}

fn border_against_nothing<'a>(
    ctx: &'a BorderContext,
    resolution: &mut Resolution<'a>,
    neighbors: &mut [Neighbor<'a>; 8],
    i: usize,
    own: &'a TerrainCategory,
) {
    let alignment = collect(neighbors, i, None);
    if alignment == 0 {
        return;
    }

    if let Some(rule) = rule_between(Some(own), None) {
        if let Some(border) = rule.border.as_ref().and_then(|b| b.resolve(ctx)) {
            resolution.bottom_cluster(border, alignment);
        }
        resolution.queue_cases(rule);
    }
}

fn optional_border<'a>(ctx: &'a BorderContext, terrain: &'a TerrainCategory) -> Option<&'a BorderDefinition> {
    terrain.optional_border.as_ref().and_then(|border| border.resolve(ctx))
}

/// Mark every unvisited neighbor from `start` on with terrain `terrain`
/// visited and return their bits.
fn collect(neighbors: &mut [Neighbor<'_>; 8], start: usize, terrain: Option<TerrainId>) -> u8 {
    let mut alignment = 0u8;
    for (j, neighbor) in neighbors.iter_mut().enumerate().skip(start) {
        if !neighbor.visited && neighbor.terrain_id() == terrain {
            neighbor.visited = true;
            alignment |= 1 << j;
        }
    }
    alignment
}

/// The rule that draws the border between `first` (the tile's terrain) and
/// `second` (its neighbor's). Either side may be missing.
///
/// When `second` sits above `first` and has outer borders, an inner rule on
/// `first` is preferred, then an outer rule on `second`. Otherwise only an
/// inner rule on `first` is considered. Equal z favors `first`.
pub fn rule_between<'a>(
    first: Option<&'a TerrainCategory>,
    second: Option<&'a TerrainCategory>,
) -> Option<&'a BorderRule> {
    match (first, second) {
        (Some(first), Some(second)) => {
            if first.z_order < second.z_order && second.has_outer_border {
                let inner = first
                    .has_inner_border
                    .then(|| first.find_rule(Some(second.id), BorderAlign::Inner))
                    .flatten();
                inner.or_else(|| second.find_rule(Some(first.id), BorderAlign::Outer))
            } else if first.has_inner_border {
                first.find_rule(Some(second.id), BorderAlign::Inner)
            } else {
                None
            }
        }
        (Some(first), None) if first.has_zilch_inner_border => {
            first.find_rule(None, BorderAlign::Inner)
        }
        (None, Some(second)) if second.has_zilch_outer_border => {
            second.find_rule(None, BorderAlign::Outer)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::border::{BorderDefinition, BorderRef};
    use crate::terrain::{BorderTarget, FriendTarget};
    use crate::testing;
    use tilebrush_core::{BorderEdge, Map};

    fn terrain(id: TerrainId, z: i32) -> TerrainCategory {
        let mut terrain = TerrainCategory::new(format!("t{}", id)).with_z_order(z);
        terrain.id = id;
        terrain
    }

    #[test]
    fn test_rule_between_higher_neighbor_outer_rule() {
        let a = terrain(1, 5).with_border(BorderRule::inner(BorderTarget::Terrain(2)).with_super(true));
        let b = terrain(2, 10).with_border(BorderRule::outer(BorderTarget::Terrain(1)));

        // a's inner rule is tried first when b sits above it
        let rule = rule_between(Some(&a), Some(&b)).unwrap();
        assert_eq!(rule.align, BorderAlign::Inner);

        let a = terrain(1, 5).with_border(BorderRule::inner(BorderTarget::Terrain(3)));
        let rule = rule_between(Some(&a), Some(&b)).unwrap();
        assert_eq!(rule.align, BorderAlign::Outer);
        assert_eq!(rule.target, BorderTarget::Terrain(1));
    }

    #[test]
    fn test_rule_between_equal_z_favors_first() {
        let a = terrain(1, 5).with_border(BorderRule::inner(BorderTarget::All));
        let b = terrain(2, 5).with_border(BorderRule::outer(BorderTarget::All));

        let rule = rule_between(Some(&a), Some(&b)).unwrap();
        assert_eq!(rule.align, BorderAlign::Inner);
        assert!(rule_between(Some(&b), Some(&a)).is_none());
    }

    #[test]
    fn test_rule_between_nothing() {
        let a = terrain(1, 0).with_border(BorderRule::inner(BorderTarget::Nothing));
        let b = terrain(2, 0).with_border(BorderRule::outer(BorderTarget::Nothing));

        assert!(rule_between(Some(&a), None).is_some());
        assert!(rule_between(Some(&b), None).is_none());
        assert!(rule_between(None, Some(&b)).is_some());
        assert!(rule_between(None, Some(&a)).is_none());
        assert!(rule_between(None, None).is_none());
    }

    #[test]
    fn test_missing_tile_resolves_to_nothing() {
        let ctx = testing::grass_and_water();
        let map = Map::with_floors("Test", 3, 3, 1);
        let resolution = resolve(&map, &ctx, Position::new(1, 1, 0));
        assert!(resolution.clusters.is_empty());
        assert!(resolution.specific_cases.is_empty());
    }

    #[test]
    fn test_grass_below_water() {
        let ctx = testing::grass_and_water();
        let map = testing::map_from_rows(&[".W.", ".G.", "..."]);

        let resolution = resolve(&map, &ctx, Position::new(1, 1, 0));
        assert_eq!(resolution.clusters.len(), 1);
        let cluster = resolution.clusters[0];
        assert_eq!(cluster.alignment, crate::pattern::neighbors::N);
        assert_eq!(cluster.z, 2);
        assert_eq!(cluster.border.id, testing::WATER_BORDER);
    }

    #[test]
    fn test_same_terrain_neighbors_merge_into_one_mask() {
        let ctx = testing::grass_and_water();
        let map = testing::map_from_rows(&["WWW", "WGG", "GGG"]);

        let resolution = resolve(&map, &ctx, Position::new(1, 1, 0));
        assert_eq!(resolution.clusters.len(), 1);
        let alignment = resolution.clusters[0].alignment;
        assert_eq!(alignment.count_ones(), 4);
        use crate::pattern::neighbors::*;
        assert_eq!(alignment, NW | N | NE | W);
    }

    #[test]
    fn test_friends_suppress_borders() {
        let mut ctx = testing::grass_and_water();
        let grass = ctx.terrain_by_name("grass").unwrap().id;
        let water = ctx.terrain_by_name("water").unwrap().id;
        ctx.terrain_mut(water).unwrap().friends.push(FriendTarget::Terrain(grass));

        let map = testing::map_from_rows(&["WWW", "WGW", "WWW"]);
        let resolution = resolve(&map, &ctx, Position::new(1, 1, 0));
        assert!(resolution.clusters.is_empty());
    }

    #[test]
    fn test_enemy_list_does_not_suppress() {
        let mut ctx = testing::grass_and_water();
        let water = ctx.terrain_by_name("water").unwrap().id;
        let terrain = ctx.terrain_mut(water).unwrap();
        terrain.friends.push(FriendTarget::All);
        terrain.hate_friends = true;

        let map = testing::map_from_rows(&["WWW", "WGW", "WWW"]);
        let resolution = resolve(&map, &ctx, Position::new(1, 1, 0));
        assert_eq!(resolution.clusters.len(), 1);
        assert_eq!(resolution.clusters[0].alignment, 0xFF);
    }

    #[test]
    fn test_nothing_border_is_first_and_optional_is_last() {
        let mut ctx = testing::grass_and_water();
        let grass = ctx.terrain_by_name("grass").unwrap().id;
        let water = ctx.terrain_by_name("water").unwrap().id;

        let edge = BorderDefinition::ground_equivalent().with_item(BorderEdge::South, 401);
        ctx.terrain_mut(grass)
            .unwrap()
            .add_border(BorderRule::inner(BorderTarget::Nothing).with_border(BorderRef::Owned(Box::new(edge))));
        let mountain = BorderDefinition::ground_equivalent().with_item(BorderEdge::North, 501);
        ctx.terrain_mut(water).unwrap().optional_border = Some(BorderRef::Owned(Box::new(mountain)));

        // grass all around except water to the north and nothing to the south
        let mut map = testing::map_from_rows(&["GWG", "GGG", "..."]);
        let center = Position::new(1, 1, 0);
        map.tile_mut(center).unwrap().optional_border = true;

        let resolution = resolve(&map, &ctx, center);
        let zs: Vec<i32> = resolution.clusters.iter().map(|c| c.z).collect();
        assert_eq!(zs.len(), 3);
        assert!(zs.contains(&Z_FIRST));
        assert!(zs.contains(&Z_LAST));
        assert!(zs.contains(&2));
        assert!(resolution.optional_border);

        use crate::pattern::neighbors::*;
        let bottom = resolution.clusters.iter().find(|c| c.z == Z_FIRST).unwrap();
        assert_eq!(bottom.alignment, SW | S | SE);
    }

    #[test]
    fn test_solo_optional_skips_regular_border() {
        let mut ctx = testing::grass_and_water();
        let water = ctx.terrain_by_name("water").unwrap().id;
        let mountain = BorderDefinition::ground_equivalent().with_item(BorderEdge::North, 501);
        let terrain = ctx.terrain_mut(water).unwrap();
        terrain.optional_border = Some(BorderRef::Owned(Box::new(mountain)));
        terrain.solo_optional = true;

        let mut map = testing::map_from_rows(&[".W.", ".G.", "..."]);
        let center = Position::new(1, 1, 0);
        map.tile_mut(center).unwrap().optional_border = true;

        let resolution = resolve(&map, &ctx, center);
        assert_eq!(resolution.clusters.len(), 1);
        assert_eq!(resolution.clusters[0].z, Z_LAST);
    }

    #[test]
    fn test_empty_tile_uses_neighbor_outer_nothing_rule() {
        let mut ctx = testing::grass_and_water();
        let water = ctx.terrain_by_name("water").unwrap().id;
        let shore = BorderDefinition::ground_equivalent().with_item(BorderEdge::North, 601);
        ctx.terrain_mut(water)
            .unwrap()
            .add_border(BorderRule::outer(BorderTarget::Nothing).with_border(BorderRef::Owned(Box::new(shore))));

        let mut map = testing::map_from_rows(&[".W.", "...", "..."]);
        let center = Position::new(1, 1, 0);
        map.create_tile(center).unwrap().optional_border = true;

        let resolution = resolve(&map, &ctx, center);
        assert_eq!(resolution.clusters.len(), 1);
        assert_eq!(resolution.clusters[0].z, 2);
        // water has no optional border, so the tile loses eligibility
        assert!(!resolution.optional_border);
    }

    /// Grass and water both border against nothing; only water has an
    /// optional border.
    fn shores_with_water_mountain() -> BorderContext {
        let mut ctx = testing::grass_and_water();
        let grass = ctx.terrain_by_name("grass").unwrap().id;
        let water = ctx.terrain_by_name("water").unwrap().id;

        let grass_shore = BorderDefinition::ground_equivalent().with_item(BorderEdge::North, 602);
        ctx.terrain_mut(grass)
            .unwrap()
            .add_border(BorderRule::outer(BorderTarget::Nothing).with_border(BorderRef::Owned(Box::new(grass_shore))));

        let water_shore = BorderDefinition::ground_equivalent().with_item(BorderEdge::North, 601);
        let mountain = BorderDefinition::ground_equivalent().with_item(BorderEdge::North, 603);
        let terrain = ctx.terrain_mut(water).unwrap();
        terrain.add_border(BorderRule::outer(BorderTarget::Nothing).with_border(BorderRef::Owned(Box::new(water_shore))));
        terrain.optional_border = Some(BorderRef::Owned(Box::new(mountain)));
        ctx
    }

    #[test]
    fn test_empty_tile_gets_neighbor_optional_border_last() {
        let ctx = shores_with_water_mountain();
        let mut map = testing::map_from_rows(&[".W.", "...", "..."]);
        let center = Position::new(1, 1, 0);
        map.create_tile(center).unwrap().optional_border = true;

        let resolution = resolve(&map, &ctx, center);
        let z: Vec<i32> = resolution.clusters.iter().map(|cluster| cluster.z).collect();
        assert_eq!(z, vec![2, Z_LAST]);
        assert_eq!(resolution.clusters[1].alignment, crate::pattern::neighbors::N);
        assert_eq!(resolution.clusters[1].border.item(BorderEdge::North), Some(603));
        assert!(resolution.optional_border);
    }

    #[test]
    fn test_lost_eligibility_applies_to_later_neighbors() {
        let ctx = shores_with_water_mountain();
        let center = Position::new(1, 1, 0);

        // grass (NW) comes first and clears eligibility before water (N) is seen
        let mut map = testing::map_from_rows(&["GW.", "...", "..."]);
        map.create_tile(center).unwrap().optional_border = true;
        let resolution = resolve(&map, &ctx, center);
        assert_eq!(resolution.clusters.len(), 2);
        assert!(resolution.clusters.iter().all(|cluster| cluster.z != Z_LAST));
        assert!(!resolution.optional_border);

        // water first: its optional cluster is already placed when grass clears the flag
        let mut map = testing::map_from_rows(&["WG.", "...", "..."]);
        map.create_tile(center).unwrap().optional_border = true;
        let resolution = resolve(&map, &ctx, center);
        let z: Vec<i32> = resolution.clusters.iter().map(|cluster| cluster.z).collect();
        assert_eq!(z, vec![2, Z_LAST, 1]);
        assert!(!resolution.optional_border);
    }
}
