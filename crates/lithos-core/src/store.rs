use crate::error::LithosError;
use crate::grid::CoverGrid;

/// Whole-object key-value store for cover grids.
///
/// `put` replaces the stored grid for a key in one step: a reader sees either
/// the previous grid or the new one, never a mix. `get` returning `Ok(None)`
/// means "not cached"; implementations report unreadable entries the same way.
pub trait CoverStore {
    fn get(&self, key: &str) -> Result<Option<CoverGrid>, LithosError>;
    fn put(&mut self, key: &str, grid: &CoverGrid) -> Result<(), LithosError>;
}

impl<S: CoverStore + ?Sized> CoverStore for &mut S {
    fn get(&self, key: &str) -> Result<Option<CoverGrid>, LithosError> {
        (**self).get(key)
    }

    fn put(&mut self, key: &str, grid: &CoverGrid) -> Result<(), LithosError> {
        (**self).put(key, grid)
    }
}

impl<S: CoverStore + ?Sized> CoverStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<CoverGrid>, LithosError> {
        (**self).get(key)
    }

    fn put(&mut self, key: &str, grid: &CoverGrid) -> Result<(), LithosError> {
        (**self).put(key, grid)
    }
}
