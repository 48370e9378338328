//! Shared constants. Layer ranges, void baselines and cover mappings are
//! configuration, not constants, and live in `data/minerals.ron`.

/// Reserved category name meaning "no material".
pub const VOID_NAME: &str = "void";

/// Seed used when the caller does not provide one.
pub const DEFAULT_SEED: &str = "default_seed";

/// Default chunk edge length in voxels.
pub const DEFAULT_CHUNK_SIZE: u32 = 32;

/// Largest accepted chunk edge length (256^3 cells).
pub const MAX_CHUNK_SIZE: u32 = 256;

/// Upper bound on distinct categories, including void.
pub const MAX_CATEGORIES: usize = u16::MAX as usize;
