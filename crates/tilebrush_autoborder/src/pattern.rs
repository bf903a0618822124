//! Neighbor bitmask to border orientation lookup
//!
//! Bit `i` of an alignment mask is set when neighbor `i` (in
//! [`NEIGHBOR_OFFSETS`] order) holds the terrain being bordered against.
//! [`border_pattern`] turns such a mask into the orientations to draw.

use tilebrush_core::BorderEdge;

/// Neighbor direction flags for alignment masks
pub mod neighbors {
    pub const NW: u8 = 0b0000_0001; // Northwest (corner)
    pub const N: u8 = 0b0000_0010;  // North
    pub const NE: u8 = 0b0000_0100; // Northeast (corner)
    pub const W: u8 = 0b0000_1000;  // West
    pub const E: u8 = 0b0001_0000;  // East
    pub const SW: u8 = 0b0010_0000; // Southwest (corner)
    pub const S: u8 = 0b0100_0000;  // South
    pub const SE: u8 = 0b1000_0000; // Southeast (corner)
}

/// `(dx, dy)` of each neighbor, in bit order. North is `-y`.
pub const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, -1), // NW
    (0, -1),  // N
    (1, -1),  // NE
    (-1, 0),  // W
    (1, 0),   // E
    (-1, 1),  // SW
    (0, 1),   // S
    (1, 1),   // SE
];

/// Up to four orientations to draw for one alignment mask, padded with `None`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderPattern {
    slots: [BorderEdge; 4],
}

impl BorderPattern {
    const EMPTY: Self = BorderPattern {
        slots: [BorderEdge::None; 4],
    };

    const fn with(mut self, edge: BorderEdge) -> Self {
        let mut i = 0;
        while i < self.slots.len() {
            if matches!(self.slots[i], BorderEdge::None) {
                self.slots[i] = edge;
                return self;
            }
            i += 1;
        }
        self
    }

    /// Orientations in drawing order, stopping at the first empty slot
    pub fn edges(&self) -> impl Iterator<Item = BorderEdge> + '_ {
        self.slots
            .iter()
            .copied()
            .take_while(|edge| *edge != BorderEdge::None)
    }

    pub fn len(&self) -> usize {
        self.edges().count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots[0] == BorderEdge::None
    }
}

/// Precomputed pattern for every possible alignment mask
pub static BORDER_PATTERNS: [BorderPattern; 256] = build_patterns();

/// Orientations to draw for `alignment`
pub fn border_pattern(alignment: u8) -> &'static BorderPattern {
    &BORDER_PATTERNS[alignment as usize]
}

const fn build_patterns() -> [BorderPattern; 256] {
    let mut table = [BorderPattern::EMPTY; 256];
    let mut mask = 0;
    while mask < 256 {
        table[mask] = pattern_for(mask as u8);
        mask += 1;
    }
    table
}

/// Two touching straight sides merge into the diagonal between them; a corner
/// neighbor only counts when neither of its adjacent sides is set.
const fn pattern_for(mask: u8) -> BorderPattern {
    use neighbors::*;
    use BorderEdge::*;

    let n = mask & N != 0;
    let e = mask & E != 0;
    let s = mask & S != 0;
    let w = mask & W != 0;

    let p = BorderPattern::EMPTY;
    let p = match (n, e, s, w) {
        (true, true, true, true) => p.with(NorthWestDiagonal).with(SouthEastDiagonal),
        (true, true, false, true) => p.with(NorthWestDiagonal).with(NorthEastDiagonal),
        (true, true, true, false) => p.with(NorthEastDiagonal).with(SouthEastDiagonal),
        (false, true, true, true) => p.with(SouthWestDiagonal).with(SouthEastDiagonal),
        (true, false, true, true) => p.with(NorthWestDiagonal).with(SouthWestDiagonal),
        (true, true, false, false) => p.with(NorthEastDiagonal),
        (false, true, true, false) => p.with(SouthEastDiagonal),
        (false, false, true, true) => p.with(SouthWestDiagonal),
        (true, false, false, true) => p.with(NorthWestDiagonal),
        (true, false, true, false) => p.with(North).with(South),
        (false, true, false, true) => p.with(East).with(West),
        (true, false, false, false) => p.with(North),
        (false, true, false, false) => p.with(East),
        (false, false, true, false) => p.with(South),
        (false, false, false, true) => p.with(West),
        (false, false, false, false) => p,
    };

    let p = if mask & NW != 0 && !n && !w {
        p.with(NorthWestCorner)
    } else {
        p
    };
    let p = if mask & NE != 0 && !n && !e {
        p.with(NorthEastCorner)
    } else {
        p
    };
    let p = if mask & SW != 0 && !s && !w {
        p.with(SouthWestCorner)
    } else {
        p
    };
    if mask & SE != 0 && !s && !e {
        p.with(SouthEastCorner)
    } else {
        p
    }
}
