//! Fixtures shared by the in-crate tests.

use std::collections::HashMap;

use lithos_config::defaults::default_catalog;
use lithos_config::{load_config_from_str, Catalog};
use lithos_core::{CoverGrid, CoverStore, LithosError};

use crate::generator::ChunkGenerator;

/// Void at depths 0 and 1, quartz everywhere from depth 2 down.
pub const SMALL: &str = r#"(
    layers: [
        (key: "top", z_low: 0, z_high: Some(2), void_probability: 1.0),
        (key: "rest", z_low: 2, void_probability: 0.0),
    ],
    minerals: [(name: "quartz", prob_layers: {"rest": 1.0})],
    cover_variants: [(id: "clayey_mudflat"), (id: "coral_reef_sand")],
    cover_rules: (
        default: "clayey_mudflat",
        crust_overrides: {"oceanic": "coral_reef_sand"},
    ),
)"#;

pub fn small_generator() -> ChunkGenerator {
    let config = load_config_from_str(SMALL).expect("parse small config");
    ChunkGenerator::new(Catalog::from_config(config).expect("compile small config"))
}

pub fn default_generator() -> ChunkGenerator {
    ChunkGenerator::new(default_catalog().expect("built-in config"))
}

#[derive(Debug, Default)]
pub struct MapStore {
    grids: HashMap<String, CoverGrid>,
    pub puts: usize,
}

impl MapStore {
    pub fn len(&self) -> usize {
        self.grids.len()
    }
}

impl CoverStore for MapStore {
    fn get(&self, key: &str) -> Result<Option<CoverGrid>, LithosError> {
        Ok(self.grids.get(key).cloned())
    }

    fn put(&mut self, key: &str, grid: &CoverGrid) -> Result<(), LithosError> {
        self.grids.insert(key.to_string(), grid.clone());
        self.puts += 1;
        Ok(())
    }
}

/// A map store whose reads or writes can be switched to fail.
#[derive(Debug, Default)]
pub struct FailingStore {
    inner: MapStore,
    pub fail_gets: bool,
    pub fail_puts: bool,
}

impl FailingStore {
    pub fn failing_gets() -> Self {
        Self {
            fail_gets: true,
            ..Self::default()
        }
    }
}

impl CoverStore for FailingStore {
    fn get(&self, key: &str) -> Result<Option<CoverGrid>, LithosError> {
        if self.fail_gets {
            return Err(LithosError::StoreFailure("read refused".into()));
        }
        self.inner.get(key)
    }

    fn put(&mut self, key: &str, grid: &CoverGrid) -> Result<(), LithosError> {
        if self.fail_puts {
            return Err(LithosError::StoreFailure("write refused".into()));
        }
        self.inner.put(key, grid)
    }
}
