//! Block kinds.

use serde::{Deserialize, Serialize};

/// Kind of block occupying a grid cell.
///
/// Air is not a kind: an empty cell is simply absent from the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum BlockKind {
    Grass,
    Dirt,
    Stone,
    Wood,
    Glass,
}

impl BlockKind {
    /// Every block kind, in declaration order.
    pub const ALL: [Self; 5] = [Self::Grass, Self::Dirt, Self::Stone, Self::Wood, Self::Glass];

    /// Returns true if the player collides with this block.
    #[inline]
    pub const fn is_solid(self) -> bool {
        match self {
            Self::Grass | Self::Dirt | Self::Stone | Self::Wood | Self::Glass => true,
        }
    }

    /// Returns true if this block hides what is behind it.
    #[inline]
    pub const fn is_opaque(self) -> bool {
        !matches!(self, Self::Glass)
    }

    /// Lowercase name, as used in configuration and logs.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Grass => "grass",
            Self::Dirt => "dirt",
            Self::Stone => "stone",
            Self::Wood => "wood",
            Self::Glass => "glass",
        }
    }

    /// Parse a lowercase kind name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl std::fmt::Display for BlockKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
