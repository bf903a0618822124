//! Core data structures for tilebrush
//!
//! This crate provides the plain-data types the map algorithms work on:
//! - `Map` / `Floor` - Tile grids, one floor per z level
//! - `Tile` - Ground item plus an ordered item stack
//! - `ItemTypes` - Static item metadata and the item factory
//! - `BorderEdge` - Orientation of a border piece on its tile
//! - `TileStorage` - The tile access interface algorithms are written against
//! - `search_items` - Parallel read-only item search

mod edge;
mod floor;
mod item;
mod map;
mod position;
mod search;
mod storage;
mod tile;

pub use edge::BorderEdge;
pub use floor::Floor;
pub use item::{Item, ItemId, ItemType, ItemTypes, TerrainId};
pub use map::{Map, DEFAULT_FLOOR_COUNT};
pub use position::{Area, Position};
pub use search::{search_items, worker_count, ItemMatch, ItemSlot, MAX_SEARCH_THREADS, MIN_PARALLEL_TILES};
pub use storage::TileStorage;
pub use tile::Tile;
