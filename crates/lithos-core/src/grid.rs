use crate::category::CategoryTable;
use crate::types::{CategoryId, CoverVariantId, LocalCoord};

/// Flat index of a local coordinate. Layout is `[x][y][z]` with z fastest,
/// so a column `(x, y)` is one contiguous run of `size` cells.
#[inline]
pub fn cell_index(size: u32, x: u32, y: u32, z: u32) -> usize {
    let s = size as usize;
    (x as usize * s + y as usize) * s + z as usize
}

/// Number of cells in a cubic chunk of the given edge length.
#[inline]
pub fn cell_count(size: u32) -> usize {
    let s = size as usize;
    s * s * s
}

/// Generated material labels for one chunk. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterialGrid {
    size: u32,
    cells: Vec<CategoryId>,
}

impl MaterialGrid {
    /// Wrap generated cells. Returns None if `cells.len() != size^3`.
    pub fn from_cells(size: u32, cells: Vec<CategoryId>) -> Option<Self> {
        (cells.len() == cell_count(size)).then_some(Self { size, cells })
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Material at a local coordinate, None when out of bounds.
    pub fn get(&self, pos: LocalCoord) -> Option<CategoryId> {
        self.in_bounds(pos)
            .then(|| self.cells[cell_index(self.size, pos.x, pos.y, pos.z)])
    }

    pub fn in_bounds(&self, pos: LocalCoord) -> bool {
        pos.x < self.size && pos.y < self.size && pos.z < self.size
    }

    /// Materials of column `(x, y)`, ordered by depth.
    pub fn column(&self, x: u32, y: u32) -> &[CategoryId] {
        let start = cell_index(self.size, x, y, 0);
        &self.cells[start..start + self.size as usize]
    }

    pub fn cells(&self) -> &[CategoryId] {
        &self.cells
    }

    /// Distinct non-void categories present in the grid, in name order.
    pub fn used_categories(&self, table: &CategoryTable) -> Vec<CategoryId> {
        let mut seen = vec![false; table.len()];
        for &id in &self.cells {
            if let Some(slot) = seen.get_mut(id.index()) {
                *slot = true;
            }
        }
        seen.iter()
            .enumerate()
            .filter(|(_, &present)| present)
            .map(|(i, _)| CategoryId(i as u16))
            .filter(|&id| !table.is_void(id))
            .collect()
    }

    /// Nested `[x][y][z]` name representation used on the wire.
    pub fn to_names(&self, table: &CategoryTable) -> Vec<Vec<Vec<String>>> {
        (0..self.size)
            .map(|x| {
                (0..self.size)
                    .map(|y| {
                        self.column(x, y)
                            .iter()
                            .map(|&id| table.name_or_void(id).to_string())
                            .collect()
                    })
                    .collect()
            })
            .collect()
    }
}

/// Excavation state of one voxel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VoxelState {
    /// No material. Terminal, not interactive.
    #[default]
    Void,
    /// Overburden hiding the material below. The only non-terminal state.
    Covered(CoverVariantId),
    /// Revealed material. Terminal.
    Exposed(CategoryId),
}

impl VoxelState {
    pub fn is_covered(self) -> bool {
        matches!(self, Self::Covered(_))
    }

    pub fn is_terminal(self) -> bool {
        !self.is_covered()
    }
}

/// Per-voxel excavation state, same dimensions as its material grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverGrid {
    size: u32,
    cells: Vec<VoxelState>,
}

impl CoverGrid {
    /// A grid with every voxel `Void`.
    pub fn new(size: u32) -> Self {
        Self {
            size,
            cells: vec![VoxelState::Void; cell_count(size)],
        }
    }

    /// Wrap decoded cells. Returns None if `cells.len() != size^3`.
    pub fn from_cells(size: u32, cells: Vec<VoxelState>) -> Option<Self> {
        (cells.len() == cell_count(size)).then_some(Self { size, cells })
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn in_bounds(&self, pos: LocalCoord) -> bool {
        pos.x < self.size && pos.y < self.size && pos.z < self.size
    }

    pub fn get(&self, pos: LocalCoord) -> Option<VoxelState> {
        self.in_bounds(pos)
            .then(|| self.cells[cell_index(self.size, pos.x, pos.y, pos.z)])
    }

    /// Overwrite one voxel, returning the previous state.
    /// Returns None and changes nothing when out of bounds.
    pub fn replace(&mut self, pos: LocalCoord, state: VoxelState) -> Option<VoxelState> {
        if !self.in_bounds(pos) {
            return None;
        }
        let idx = cell_index(self.size, pos.x, pos.y, pos.z);
        Some(std::mem::replace(&mut self.cells[idx], state))
    }

    pub fn column(&self, x: u32, y: u32) -> &[VoxelState] {
        let start = cell_index(self.size, x, y, 0);
        &self.cells[start..start + self.size as usize]
    }

    pub fn column_mut(&mut self, x: u32, y: u32) -> &mut [VoxelState] {
        let start = cell_index(self.size, x, y, 0);
        &mut self.cells[start..start + self.size as usize]
    }

    /// Whether any column still has cover at local depth `z`.
    pub fn has_cover_at_depth(&self, z: u32) -> bool {
        if z >= self.size {
            return false;
        }
        let s = self.size as usize;
        self.cells
            .iter()
            .skip(z as usize)
            .step_by(s)
            .any(|v| v.is_covered())
    }

    pub fn covered_count(&self) -> usize {
        self.cells.iter().filter(|v| v.is_covered()).count()
    }

    pub fn cells(&self) -> &[VoxelState] {
        &self.cells
    }
}
