use serde::{Deserialize, Serialize};

use crate::error::LithosError;
use crate::key::ProbabilityOffsets;

/// Output of resolving a free-text or lat/lon location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationOffsets {
    pub x_offset: i32,
    pub y_offset: i32,
    pub z_offset: i32,
    /// Crust classification, e.g. "oceanic" or "continental".
    pub crust_class: String,
    #[serde(default)]
    pub probability_offsets: ProbabilityOffsets,
}

/// Maps a location query to chunk offsets and a crust class.
/// Failures use `LithosError::LocationResolutionFailure` and never touch grids.
pub trait LocationResolver {
    fn resolve(&self, query: &str) -> Result<LocationOffsets, LithosError>;
}
