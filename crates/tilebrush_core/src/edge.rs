//! Border orientations

use serde::{Deserialize, Serialize};

/// Position a border piece occupies on its tile.
///
/// Four straight edges, four outer corners and four diagonals, plus `None`.
/// The discriminant is the slot index inside a border definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum BorderEdge {
    #[default]
    #[serde(rename = "none")]
    None = 0,
    #[serde(rename = "n")]
    North = 1,
    #[serde(rename = "e")]
    East = 2,
    #[serde(rename = "s")]
    South = 3,
    #[serde(rename = "w")]
    West = 4,
    #[serde(rename = "cnw")]
    NorthWestCorner = 5,
    #[serde(rename = "cne")]
    NorthEastCorner = 6,
    #[serde(rename = "csw")]
    SouthWestCorner = 7,
    #[serde(rename = "cse")]
    SouthEastCorner = 8,
    #[serde(rename = "dnw")]
    NorthWestDiagonal = 9,
    #[serde(rename = "dne")]
    NorthEastDiagonal = 10,
    #[serde(rename = "dse")]
    SouthEastDiagonal = 11,
    #[serde(rename = "dsw")]
    SouthWestDiagonal = 12,
}

impl BorderEdge {
    /// Number of slots in a border definition (including the unused `None` slot)
    pub const COUNT: usize = 13;

    /// Every real orientation, in slot order
    pub const ALL: [BorderEdge; 12] = [
        BorderEdge::North,
        BorderEdge::East,
        BorderEdge::South,
        BorderEdge::West,
        BorderEdge::NorthWestCorner,
        BorderEdge::NorthEastCorner,
        BorderEdge::SouthWestCorner,
        BorderEdge::SouthEastCorner,
        BorderEdge::NorthWestDiagonal,
        BorderEdge::NorthEastDiagonal,
        BorderEdge::SouthEastDiagonal,
        BorderEdge::SouthWestDiagonal,
    ];

    /// Parse a configuration edge name (`n`, `cnw`, `dse`, ...)
    pub fn from_name(name: &str) -> Option<Self> {
        let edge = match name {
            "n" => BorderEdge::North,
            "e" => BorderEdge::East,
            "s" => BorderEdge::South,
            "w" => BorderEdge::West,
            "cnw" => BorderEdge::NorthWestCorner,
            "cne" => BorderEdge::NorthEastCorner,
            "csw" => BorderEdge::SouthWestCorner,
            "cse" => BorderEdge::SouthEastCorner,
            "dnw" => BorderEdge::NorthWestDiagonal,
            "dne" => BorderEdge::NorthEastDiagonal,
            "dse" => BorderEdge::SouthEastDiagonal,
            "dsw" => BorderEdge::SouthWestDiagonal,
            _ => return None,
        };
        Some(edge)
    }

    /// Configuration name of this edge
    pub fn name(self) -> &'static str {
        match self {
            BorderEdge::None => "none",
            BorderEdge::North => "n",
            BorderEdge::East => "e",
            BorderEdge::South => "s",
            BorderEdge::West => "w",
            BorderEdge::NorthWestCorner => "cnw",
            BorderEdge::NorthEastCorner => "cne",
            BorderEdge::SouthWestCorner => "csw",
            BorderEdge::SouthEastCorner => "cse",
            BorderEdge::NorthWestDiagonal => "dnw",
            BorderEdge::NorthEastDiagonal => "dne",
            BorderEdge::SouthEastDiagonal => "dse",
            BorderEdge::SouthWestDiagonal => "dsw",
        }
    }

    /// Slot index inside a border definition
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn is_diagonal(self) -> bool {
        matches!(
            self,
            BorderEdge::NorthWestDiagonal
                | BorderEdge::NorthEastDiagonal
                | BorderEdge::SouthEastDiagonal
                | BorderEdge::SouthWestDiagonal
        )
    }

    /// The two straight edges that stand in for a missing diagonal piece,
    /// in the order they are placed.
    pub const fn diagonal_fallback(self) -> Option<[BorderEdge; 2]> {
        match self {
            BorderEdge::NorthWestDiagonal => Some([BorderEdge::West, BorderEdge::North]),
            BorderEdge::NorthEastDiagonal => Some([BorderEdge::East, BorderEdge::North]),
            BorderEdge::SouthWestDiagonal => Some([BorderEdge::South, BorderEdge::West]),
            BorderEdge::SouthEastDiagonal => Some([BorderEdge::South, BorderEdge::East]),
            _ => None,
        }
    }
}

impl std::fmt::Display for BorderEdge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
