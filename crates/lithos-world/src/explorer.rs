use glam::IVec3;
use lithos_core::{
    CategoryId, CoverStore, GenerationKey, LithosError, LocalCoord, LocationResolver,
    RevealRejection,
};

use crate::excavation::Excavation;
use crate::generator::ChunkGenerator;

/// Session front end: owns the generator, the cover store and the chunk
/// currently being excavated. Opening a chunk with different parameters
/// replaces the current one.
pub struct Explorer<S: CoverStore> {
    generator: ChunkGenerator,
    store: S,
    current: Option<Excavation>,
}

impl<S: CoverStore> Explorer<S> {
    pub fn new(generator: ChunkGenerator, store: S) -> Self {
        Self {
            generator,
            store,
            current: None,
        }
    }

    /// Open the chunk for `key` under a crust class. Reopening the current
    /// parameters is a no-op; a failed open keeps the previous chunk.
    pub fn open(
        &mut self,
        key: GenerationKey,
        crust_class: &str,
    ) -> Result<&Excavation, LithosError> {
        match self.current.take() {
            Some(current) if current.matches(&key, crust_class) => {
                Ok(&*self.current.insert(current))
            }
            previous => match Excavation::open(&self.generator, key, crust_class, &mut self.store) {
                Ok(excavation) => Ok(&*self.current.insert(excavation)),
                Err(e) => {
                    self.current = previous;
                    Err(e)
                }
            },
        }
    }

    /// Resolve a named location and open the chunk at its offsets.
    pub fn open_location<R: LocationResolver + ?Sized>(
        &mut self,
        resolver: &R,
        query: &str,
        seed: &str,
        size: u32,
        allow: Option<Vec<String>>,
    ) -> Result<&Excavation, LithosError> {
        let location = resolver.resolve(query)?;
        log::info!(
            "Resolved '{}' to ({}, {}, {}) on {} crust",
            query.trim(),
            location.x_offset,
            location.y_offset,
            location.z_offset,
            location.crust_class
        );
        let key = GenerationKey::new(
            seed,
            IVec3::new(location.x_offset, location.y_offset, location.z_offset),
            size,
        )
        .with_offsets(location.probability_offsets)
        .with_allow(allow);
        self.open(key, &location.crust_class)
    }

    /// Reveal a voxel of the current chunk.
    pub fn reveal(&mut self, pos: LocalCoord) -> Result<CategoryId, LithosError> {
        let Some(excavation) = self.current.as_mut() else {
            return Err(LithosError::InvalidReveal {
                x: pos.x,
                y: pos.y,
                z: pos.z,
                reason: RevealRejection::NoActiveChunk,
            });
        };
        excavation.reveal(&mut self.store, pos)
    }

    pub fn current(&self) -> Option<&Excavation> {
        self.current.as_ref()
    }

    pub fn generator(&self) -> &ChunkGenerator {
        &self.generator
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
