use lithos_core::constants::MAX_CHUNK_SIZE;
use lithos_core::grid::cell_count;

use crate::error::PersistError;
use crate::format::{CoverHeader, FORMAT_VERSION, MAGIC};

/// Validate a cover file header against the running configuration.
///
/// Unlike world saves, a config hash mismatch is fatal: category and cover
/// handles are positions in the configured tables and would be reinterpreted.
pub fn validate_header(header: &CoverHeader, current_config_hash: u64) -> Result<(), PersistError> {
    if header.magic != MAGIC {
        return Err(PersistError::InvalidMagic);
    }

    if header.version != FORMAT_VERSION {
        return Err(PersistError::UnsupportedVersion(header.version));
    }

    if header.config_hash != current_config_hash {
        return Err(PersistError::StaleConfig {
            saved: header.config_hash,
            current: current_config_hash,
        });
    }

    let size_ok = (1..=MAX_CHUNK_SIZE).contains(&header.size)
        && cell_count(header.size) == header.voxel_count as usize;
    if !size_ok {
        return Err(PersistError::InvalidGridSize {
            size: header.size,
            voxel_count: header.voxel_count,
        });
    }

    Ok(())
}
