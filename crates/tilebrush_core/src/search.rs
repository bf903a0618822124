//! Parallel read-only item search over a whole map
//!
//! Rows of every floor are scanned independently; each worker collects its own
//! result list and the lists are merged and sorted afterwards, so the output
//! never depends on scheduling.

use crate::item::Item;
use crate::map::Map;
use crate::position::Position;
use crate::tile::Tile;
use rayon::prelude::*;

/// Upper bound on worker threads used by [`search_items`]
pub const MAX_SEARCH_THREADS: usize = 8;

/// Below this many cells the search runs on the calling thread
pub const MIN_PARALLEL_TILES: usize = 4096;

/// Where a matched item sits on its tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ItemSlot {
    Ground,
    /// Index into the tile's item stack, bottom first
    Stack(usize),
}

/// One item found by [`search_items`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemMatch {
    pub position: Position,
    pub slot: ItemSlot,
    pub item: Item,
}

impl ItemMatch {
    fn sort_key(&self) -> (u8, u32, u32, ItemSlot) {
        (self.position.z, self.position.y, self.position.x, self.slot)
    }
}

/// Find every item on the map accepted by `predicate`.
///
/// Results are ordered by floor, row, column, then ground before stack items.
pub fn search_items<F>(map: &Map, predicate: F) -> Vec<ItemMatch>
where
    F: Fn(&Item) -> bool + Sync,
{
    let cells: usize = map.floors.iter().map(|floor| floor.tiles.len()).sum();
    let threads = worker_count(cells);

    let mut results: Vec<ItemMatch> = if threads <= 1 {
        map.tiles()
            .flat_map(|tile| matches_on_tile(tile, &predicate))
            .collect()
    } else {
        match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
            Ok(pool) => {
                tracing::debug!("searching {} cells on {} workers", cells, threads);
                pool.install(|| search_rows_parallel(map, &predicate))
            }
            Err(err) => {
                tracing::warn!("search thread pool unavailable, scanning serially: {}", err);
                map.tiles()
                    .flat_map(|tile| matches_on_tile(tile, &predicate))
                    .collect()
            }
        }
    };

    results.sort_by_key(ItemMatch::sort_key);
    results
}

/// Number of workers for a search over `cells` cells
pub fn worker_count(cells: usize) -> usize {
    if cells < MIN_PARALLEL_TILES {
        return 1;
    }
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .min(MAX_SEARCH_THREADS)
}

fn search_rows_parallel<F>(map: &Map, predicate: &F) -> Vec<ItemMatch>
where
    F: Fn(&Item) -> bool + Sync,
{
    let rows: Vec<&[Option<Tile>]> = map.floors.iter().flat_map(|floor| floor.rows()).collect();

    rows.par_iter()
        .map(|row| {
            row.iter()
                .flatten()
                .flat_map(|tile| matches_on_tile(tile, predicate))
                .collect::<Vec<_>>()
        })
        .reduce(Vec::new, |mut acc, mut part| {
            acc.append(&mut part);
            acc
        })
}

fn matches_on_tile<F>(tile: &Tile, predicate: &F) -> Vec<ItemMatch>
where
    F: Fn(&Item) -> bool,
{
    let ground = tile
        .ground
        .filter(|ground| predicate(ground))
        .map(|item| ItemMatch {
            position: tile.position,
            slot: ItemSlot::Ground,
            item,
        });

    let stack = tile
        .items
        .iter()
        .enumerate()
        .filter(|(_, item)| predicate(item))
        .map(|(index, item)| ItemMatch {
            position: tile.position,
            slot: ItemSlot::Stack(index),
            item: *item,
        });

    ground.into_iter().chain(stack).collect()
}
