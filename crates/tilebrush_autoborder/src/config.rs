//! Border configuration documents
//!
//! The serde shape of a border configuration file: a border registry plus a
//! list of ground brushes. Documents can be written as JSON or TOML. They are
//! only parsed here; [`crate::loader`] validates them and builds the runtime
//! registries.
//!
//! Orientation names are `n`, `e`, `s`, `w`, `cnw`, `cne`, `csw`, `cse`,
//! `dnw`, `dne`, `dsw` and `dse`.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tilebrush_core::ItemId;

/// Error type for configuration files that cannot be read or parsed
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),
}

/// A complete border configuration document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BorderConfig {
    #[serde(default)]
    pub borders: Vec<BorderDef>,
    #[serde(default)]
    pub brushes: Vec<GroundBrushDef>,
}

/// A registry border
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BorderDef {
    pub id: u32,
    #[serde(default)]
    pub group: u16,
    /// Pieces of this border are optional (mountain) border pieces
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub items: Vec<EdgeItemDef>,
}

/// One border piece: the item drawn for an orientation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeItemDef {
    pub edge: String,
    pub item: ItemId,
}

/// A ground brush (terrain category).
///
/// Declaring the same name twice merges the second declaration into the
/// first; unset attributes keep their earlier values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroundBrushDef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub look_id: Option<ItemId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_order: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solo_optional: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub randomize: Option<bool>,
    /// Drop borders from earlier declarations before adding these
    #[serde(default)]
    pub clear_borders: bool,
    /// Drop friends and enemies from earlier declarations
    #[serde(default)]
    pub clear_friends: bool,
    #[serde(default)]
    pub items: Vec<GroundItemDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optional: Option<OptionalDef>,
    #[serde(default)]
    pub borders: Vec<BorderRuleDef>,
    /// Brush names (or `all`) this brush blends into without a border
    #[serde(default)]
    pub friends: Vec<String>,
    /// Brush names (or `all`) this brush always borders against
    #[serde(default)]
    pub enemies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundItemDef {
    pub id: ItemId,
    #[serde(default = "default_chance")]
    pub chance: i32,
}

fn default_chance() -> i32 {
    1
}

/// The optional (mountain) border of a brush: a registry id or an inline
/// border tied to a ground item.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OptionalDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ground_equivalent: Option<ItemId>,
    #[serde(default)]
    pub group: u16,
    #[serde(default)]
    pub items: Vec<EdgeItemDef>,
}

/// A border rule of a brush.
///
/// `id = 0` declares the relationship without drawing any border.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BorderRuleDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ground_equivalent: Option<ItemId>,
    #[serde(default)]
    pub group: u16,
    #[serde(default)]
    pub items: Vec<EdgeItemDef>,
    /// `all`, `none` or a brush name
    #[serde(default = "default_target")]
    pub to: String,
    /// `outer` or `inner`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<String>,
    #[serde(default, rename = "super")]
    pub is_super: bool,
    #[serde(default)]
    pub specific: Vec<SpecificCaseDef>,
}

fn default_target() -> String {
    "all".to_string()
}

impl Default for BorderRuleDef {
    fn default() -> Self {
        Self {
            id: None,
            ground_equivalent: None,
            group: 0,
            items: Vec::new(),
            to: default_target(),
            align: None,
            is_super: false,
            specific: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpecificCaseDef {
    #[serde(default)]
    pub conditions: Vec<ConditionDef>,
    #[serde(default)]
    pub actions: Vec<ActionDef>,
    #[serde(default)]
    pub keep_border: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConditionDef {
    /// The piece a registry border uses for `edge`
    MatchBorder { id: u32, edge: String },
    MatchGroup { group: u16, edge: String },
    MatchItem { id: ItemId },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionDef {
    /// Replace the piece a registry border uses for `edge`
    ReplaceBorder { id: u32, edge: String, with: ItemId },
    ReplaceItem { id: ItemId, with: ItemId },
    DeleteBorders,
}

/// Parse a configuration from a JSON string
pub fn parse_config_json(json: &str) -> Result<BorderConfig, ConfigError> {
    Ok(serde_json::from_str(json)?)
}

/// Parse a configuration from a TOML string
pub fn parse_config_toml(text: &str) -> Result<BorderConfig, ConfigError> {
    Ok(toml::from_str(text)?)
}

/// Read a configuration file, choosing the format from its extension
pub fn read_config_file(path: &Path) -> Result<BorderConfig, ConfigError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "json" => parse_config_json(&std::fs::read_to_string(path)?),
        "toml" => parse_config_toml(&std::fs::read_to_string(path)?),
        _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
    }
}
