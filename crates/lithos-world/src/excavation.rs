use lithos_core::{
    CategoryId, CategoryTable, CoverGrid, CoverStore, GenerationKey, LithosError, LocalCoord,
    MaterialGrid, VoxelState,
};

use crate::cover::initialize;
use crate::generator::ChunkGenerator;
use crate::state_machine;

/// One chunk being excavated: its material grid, its cover, and the store
/// key the cover is persisted under.
#[derive(Debug, Clone)]
pub struct Excavation {
    key: GenerationKey,
    crust_class: String,
    store_key: String,
    material: MaterialGrid,
    cover: CoverGrid,
    frontier: u32,
}

impl Excavation {
    /// Generate the chunk and restore its cover from the store, or build a
    /// fresh cover and persist it when none is cached.
    pub fn open<S: CoverStore + ?Sized>(
        generator: &ChunkGenerator,
        key: GenerationKey,
        crust_class: &str,
        store: &mut S,
    ) -> Result<Self, LithosError> {
        let material = generator.generate(&key)?;
        let store_key = key.store_key(crust_class);

        let cached = match store.get(&store_key) {
            Ok(Some(cover)) if matches_material(&cover, &material, generator.categories()) => {
                log::info!(
                    "Rehydrated excavation {} ({} covered voxels)",
                    short(&store_key),
                    cover.covered_count()
                );
                Some(cover)
            }
            Ok(Some(_)) => {
                log::warn!(
                    "Cached cover {} does not match its chunk, rebuilding",
                    short(&store_key)
                );
                None
            }
            Ok(None) => None,
            Err(e) => {
                log::warn!("Cover store read failed for {}: {e}", short(&store_key));
                None
            }
        };

        let cover = match cached {
            Some(cover) => cover,
            None => {
                let cover = initialize(generator, &key, &material, crust_class)?;
                if let Err(e) = store.put(&store_key, &cover) {
                    log::warn!("Failed to persist new cover {}: {e}", short(&store_key));
                }
                cover
            }
        };

        let frontier = state_machine::frontier(&cover);
        Ok(Self {
            key,
            crust_class: crust_class.to_string(),
            store_key,
            material,
            cover,
            frontier,
        })
    }

    /// Reveal a voxel and persist the whole cover. A failed write rolls the
    /// voxel back, so the in-memory grid always matches the last stored one.
    pub fn reveal<S: CoverStore + ?Sized>(
        &mut self,
        store: &mut S,
        pos: LocalCoord,
    ) -> Result<CategoryId, LithosError> {
        let previous = self.cover.get(pos);
        let mineral = state_machine::reveal(&mut self.cover, &self.material, pos)?;

        if let Err(e) = store.put(&self.store_key, &self.cover) {
            if let Some(previous) = previous {
                self.cover.replace(pos, previous);
            }
            log::warn!("Reveal at {pos} rolled back: {e}");
            return Err(e);
        }

        self.frontier = state_machine::frontier(&self.cover);
        log::debug!(
            "Revealed {pos} in {}, frontier now {}",
            short(&self.store_key),
            self.frontier
        );
        Ok(mineral)
    }

    pub fn key(&self) -> &GenerationKey {
        &self.key
    }

    pub fn crust_class(&self) -> &str {
        &self.crust_class
    }

    pub fn store_key(&self) -> &str {
        &self.store_key
    }

    pub fn material(&self) -> &MaterialGrid {
        &self.material
    }

    pub fn cover(&self) -> &CoverGrid {
        &self.cover
    }

    pub fn frontier(&self) -> u32 {
        self.frontier
    }

    /// Whether every cover has been removed.
    pub fn is_complete(&self) -> bool {
        self.frontier == self.cover.size()
    }

    /// Whether this excavation was opened for these parameters.
    pub fn matches(&self, key: &GenerationKey, crust_class: &str) -> bool {
        &self.key == key && self.crust_class == crust_class
    }
}

/// A stored cover is usable only if it has the chunk's dimensions, exposes
/// exactly the chunk's materials and covers only solid cells.
fn matches_material(cover: &CoverGrid, material: &MaterialGrid, categories: &CategoryTable) -> bool {
    cover.size() == material.size()
        && cover
            .cells()
            .iter()
            .zip(material.cells())
            .all(|(state, &mineral)| match state {
                VoxelState::Void => true,
                VoxelState::Covered(_) => !categories.is_void(mineral),
                VoxelState::Exposed(id) => *id == mineral,
            })
}

fn short(store_key: &str) -> &str {
    store_key.get(..12).unwrap_or(store_key)
}
