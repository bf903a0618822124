//! Ground brush autoborder engine
//!
//! This crate decides which border items a tile needs from the terrain of its
//! eight neighbors and writes them into the tile's item stack.
//!
//! # Features
//! - Outer, inner and "nothing" border rules with z-ordered stacking
//! - Friend and enemy lists between terrain categories
//! - Optional (mountain style) borders driven by a per-tile flag
//! - Specific cases that rewrite the placed borders afterwards
//! - JSON or TOML border configuration with a warning-collecting loader
//!
//! # Example
//!
//! ```rust,ignore
//! use tilebrush_autoborder::{load_config_file, paint_ground};
//! use tilebrush_core::{ItemTypes, Map, Position};
//!
//! let items = ItemTypes::from_json(&std::fs::read_to_string("items.json")?)?;
//! let (ctx, report) = load_config_file(items, "borders.toml".as_ref())?;
//! for warning in &report.warnings {
//!     eprintln!("{warning}");
//! }
//!
//! let mut map = Map::with_floors("World", 64, 64, 1);
//! let water = ctx.terrain_by_name("water").unwrap().id;
//! paint_ground(&mut map, &ctx, Position::new(5, 5, 0), water, &mut rand::thread_rng());
//! ```

pub mod apply;
pub mod border;
pub mod config;
pub mod context;
pub mod loader;
pub mod neighbors;
pub mod paint;
pub mod pattern;
pub mod resolver;
pub mod specific;
pub mod terrain;

#[cfg(test)]
mod testing;

// Re-export main types at crate root
pub use border::{BorderDefinition, BorderId, BorderRef};
pub use config::{parse_config_json, parse_config_toml, read_config_file, BorderConfig, ConfigError};
pub use context::BorderContext;
pub use loader::{load_config, load_config_file, load_into, LoadReport};
pub use paint::{border_area, do_borders, erase_ground, paint_ground};
pub use pattern::{border_pattern, BorderPattern, BORDER_PATTERNS};
pub use resolver::{resolve, rule_between, BorderCluster, Resolution};
pub use terrain::{
    BorderAlign, BorderRule, BorderTarget, FriendTarget, MatchCondition, Replacement, SpecificCaseRule,
    TerrainCategory,
};

// Re-export tilebrush_core
pub use tilebrush_core;
