//! Shared types for Lithos: category interning, material and cover grids,
//! generation keys, the error taxonomy and the external collaborator traits.

pub mod category;
pub mod constants;
pub mod error;
pub mod grid;
pub mod key;
pub mod location;
pub mod store;
pub mod types;

pub use category::CategoryTable;
pub use error::{LithosError, RevealRejection};
pub use grid::{CoverGrid, MaterialGrid, VoxelState};
pub use key::{GenerationKey, ProbabilityOffsets};
pub use location::{LocationOffsets, LocationResolver};
pub use store::CoverStore;
pub use types::{CategoryId, CoverVariantId, LocalCoord, WorldCoord};
