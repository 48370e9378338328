use glam::{IVec3, UVec3};
use serde::{Deserialize, Serialize};

/// Interned category handle. Handles are assigned in lexicographic order of
/// the category names, so `Ord` on handles matches `Ord` on names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CategoryId(pub u16);

impl CategoryId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Index into the configured cover variant list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CoverVariantId(pub u16);

impl CoverVariantId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Global voxel coordinate. z grows with depth; z = 0 is the surface.
pub type WorldCoord = IVec3;

/// Coordinate inside a chunk, each axis in `0..size`.
pub type LocalCoord = UVec3;
