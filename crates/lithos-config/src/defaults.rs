//! Built-in configuration shipped under `data/`.

use crate::{load_config_from_str, load_locations_from_str, Catalog, LoadError, LocationTable};

pub const DEFAULT_MINERALS_RON: &str = include_str!("../../../data/minerals.ron");
pub const DEFAULT_LOCATIONS_RON: &str = include_str!("../../../data/locations.ron");

/// Compile the built-in mineral configuration.
pub fn default_catalog() -> Result<Catalog, LoadError> {
    Catalog::from_config(load_config_from_str(DEFAULT_MINERALS_RON)?)
}

/// Parse the built-in location table.
pub fn default_locations() -> Result<LocationTable, LoadError> {
    load_locations_from_str(DEFAULT_LOCATIONS_RON)
}
