//! Placing resolved border clusters on a tile

use crate::border::BorderDefinition;
use crate::pattern::border_pattern;
use crate::resolver::BorderCluster;
use tilebrush_core::{BorderEdge, ItemId, ItemTypes, Tile};

/// Replace the border items of `tile` with the pieces for `clusters`.
///
/// Clusters are drawn in ascending z, so the highest z ends up on top. All
/// border items form the bottom of the stack afterwards; other items keep
/// their relative order above them. Returns the number of pieces placed.
pub fn apply_borders(tile: &mut Tile, items: &ItemTypes, mut clusters: Vec<BorderCluster<'_>>) -> usize {
    tile.clean_borders(items);
    clusters.sort_by_key(|cluster| cluster.z);

    let placed: Vec<_> = clusters
        .iter()
        .flat_map(cluster_pieces)
        .filter_map(|id| items.create_item(id))
        .collect();

    let count = placed.len();
    tile.items.splice(0..0, placed);
    count
}

/// Item ids for one cluster, bottom first.
///
/// Pieces keep pattern slot order and a diagonal fallback yields W before N
/// (or S before W, S before E, E before N). The caller splices the whole list
/// under the stack at once, so this order is not reversed by inserting piece
/// by piece at the front: NW fallback gives `[w, n]`, not `[n, w]`.
fn cluster_pieces(cluster: &BorderCluster<'_>) -> Vec<ItemId> {
    let mut pieces = Vec::new();
    for edge in border_pattern(cluster.alignment).edges() {
        pieces.extend(edge_pieces(cluster.border, edge));
    }
    pieces
}

/// The piece for `edge`, or for a diagonal without its own piece, both
/// straight edges it is made of. A diagonal missing either edge draws nothing.
fn edge_pieces(border: &BorderDefinition, edge: BorderEdge) -> Vec<ItemId> {
    if let Some(id) = border.item(edge) {
        return vec![id];
    }

    edge.diagonal_fallback()
        .and_then(|[first, second]| Some(vec![border.item(first)?, border.item(second)?]))
        .unwrap_or_default()
}
