//! Terrain types that make up a map.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single map tile.
///
/// The discriminants are the integer codes used by map files and by any
/// downstream renderer, so they must stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum TerrainType {
    Grass = 1,
    River = 2,
    Mountain = 3,
}

impl TerrainType {
    /// All terrain types, in fitness-evaluation order.
    pub const ALL: [TerrainType; 3] = [TerrainType::Grass, TerrainType::River, TerrainType::Mountain];

    /// Integer code of this terrain.
    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Terrain for an integer code, if the code is known.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(TerrainType::Grass),
            2 => Some(TerrainType::River),
            3 => Some(TerrainType::Mountain),
            _ => None,
        }
    }

    /// Position in [`TerrainType::ALL`], for per-terrain tables.
    #[inline]
    pub fn index(self) -> usize {
        self as usize - 1
    }
}

impl fmt::Display for TerrainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TerrainType::Grass => "grass",
            TerrainType::River => "river",
            TerrainType::Mountain => "mountain",
        };
        f.write_str(name)
    }
}

impl From<TerrainType> for u8 {
    fn from(terrain: TerrainType) -> Self {
        terrain.code()
    }
}

impl TryFrom<u8> for TerrainType {
    type Error = UnknownTerrainCode;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or(UnknownTerrainCode(code))
    }
}

/// An integer that is not a terrain code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Unknown terrain code {0} (expected 1, 2 or 3)")]
pub struct UnknownTerrainCode(pub u8);
