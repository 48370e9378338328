use std::sync::Arc;
use std::time::Instant;

use glam::IVec3;
use lithos_config::Catalog;
use lithos_core::grid::cell_count;
use lithos_core::{CategoryId, CategoryTable, GenerationKey, LithosError, MaterialGrid, WorldCoord};
use rayon::prelude::*;

use crate::categorical::{can_yield_solid, select, Adjustments};
use crate::hash::sample;

/// Material generator over a compiled catalog.
///
/// Every material lookup in the crate goes through here: whole chunks,
/// single cells, depth slices and the cells the cover initializer reads
/// above a chunk window. Cloning shares the catalog.
#[derive(Debug, Clone)]
pub struct ChunkGenerator {
    catalog: Arc<Catalog>,
}

impl ChunkGenerator {
    pub fn new(catalog: Catalog) -> Self {
        Self::shared(Arc::new(catalog))
    }

    pub fn shared(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn categories(&self) -> &CategoryTable {
        self.catalog.categories()
    }

    /// Resolve a key's offsets and allow-list against the catalog.
    pub fn adjustments(&self, key: &GenerationKey) -> Adjustments {
        Adjustments::resolve(self.categories(), &key.offsets, key.allow.as_deref())
    }

    /// Key of the depth layer covering global depth `z`, None in a gap.
    pub fn layer_key(&self, z: i32) -> Option<&str> {
        self.catalog.layers().lookup(z).map(|layer| layer.key.as_str())
    }

    /// Depth ranges `[low, high)` whose layer can produce a non-void material
    /// under `adjustments`. Every other depth always samples void.
    pub fn solid_ranges(&self, adjustments: &Adjustments) -> Vec<(i32, Option<i32>)> {
        let void = self.categories().void();
        self.catalog
            .layers()
            .layers()
            .iter()
            .filter(|layer| can_yield_solid(&layer.base, adjustments, void))
            .map(|layer| (layer.z_low, layer.z_high))
            .collect()
    }

    /// Material of one global cell.
    pub fn sample_cell(&self, seed: &str, pos: WorldCoord, adjustments: &Adjustments) -> CategoryId {
        let void = self.categories().void();
        let Some(layer) = self.catalog.layers().lookup(pos.z) else {
            return void;
        };
        select(&layer.base, adjustments, sample(seed, pos.x, pos.y, pos.z)).unwrap_or(void)
    }

    /// Generate the material grid for a key. One x-slab per rayon task.
    pub fn generate(&self, key: &GenerationKey) -> Result<MaterialGrid, LithosError> {
        key.validate()?;
        let start = Instant::now();
        let adjustments = self.adjustments(key);
        let s = key.size as usize;

        let mut cells = vec![self.categories().void(); cell_count(key.size)];
        cells
            .par_chunks_mut(s * s)
            .enumerate()
            .for_each(|(lx, slab)| {
                for ly in 0..s {
                    for lz in 0..s {
                        let pos = key.origin + IVec3::new(lx as i32, ly as i32, lz as i32);
                        slab[ly * s + lz] = self.sample_cell(&key.seed, pos, &adjustments);
                    }
                }
            });

        let grid = MaterialGrid::from_cells(key.size, cells).ok_or_else(|| {
            LithosError::InvalidKey(format!("cannot build a grid of size {}", key.size))
        })?;
        log::info!(
            "Generated {}^3 chunk at {} in {:.1}ms",
            key.size,
            key.origin,
            start.elapsed().as_secs_f64() * 1000.0
        );
        Ok(grid)
    }

    /// Horizontal slice at global depth `z`, indexed `[y][x]`.
    ///
    /// With `zoom > 1` each sampled cell is repeated `zoom` times along both
    /// axes; the `size / zoom` sampled cells start at the offsets and the
    /// remainder of the image is void.
    pub fn generate_slice(
        &self,
        key: &GenerationKey,
        z: i32,
        zoom: u32,
    ) -> Result<Vec<Vec<CategoryId>>, LithosError> {
        key.validate()?;
        if zoom == 0 {
            return Err(LithosError::InvalidKey("slice zoom must be at least 1".into()));
        }
        let size = key.size as usize;
        let effective = (key.size / zoom) as usize;
        let adjustments = self.adjustments(key);
        let void = self.categories().void();

        let sampled: Vec<Vec<CategoryId>> = (0..effective)
            .into_par_iter()
            .map(|sy| {
                (0..effective)
                    .map(|sx| {
                        let pos = IVec3::new(
                            key.origin.x + sx as i32,
                            key.origin.y + sy as i32,
                            z,
                        );
                        self.sample_cell(&key.seed, pos, &adjustments)
                    })
                    .collect::<Vec<_>>()
            })
            .collect();

        let zoom = zoom as usize;
        Ok((0..size)
            .map(|y| {
                (0..size)
                    .map(|x| {
                        sampled
                            .get(y / zoom)
                            .and_then(|row| row.get(x / zoom))
                            .copied()
                            .unwrap_or(void)
                    })
                    .collect()
            })
            .collect())
    }
}
