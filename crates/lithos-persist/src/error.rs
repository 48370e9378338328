use lithos_core::LithosError;

/// Errors that can occur while encoding or decoding cover files.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("invalid magic bytes (expected LITH)")]
    InvalidMagic,

    #[error("unsupported cover format version {0}")]
    UnsupportedVersion(u16),

    #[error("file too small ({0} bytes, minimum {1})")]
    FileTooSmall(usize, usize),

    #[error("truncated file: expected {expected} bytes, got {actual}")]
    TruncatedFile { expected: usize, actual: usize },

    #[error("cover was saved under config {saved:016x}, current config is {current:016x}")]
    StaleConfig { saved: u64, current: u64 },

    #[error("invalid grid size {size} for {voxel_count} voxels")]
    InvalidGridSize { size: u32, voxel_count: u32 },

    #[error("LZ4 decompression failed: {0}")]
    DecompressError(String),

    #[error("invalid payload size: expected {expected}, got {actual}")]
    InvalidPayloadSize { expected: usize, actual: usize },

    #[error("invalid voxel tag {tag} at index {index}")]
    InvalidTag { index: usize, tag: u8 },
}

impl From<PersistError> for LithosError {
    fn from(err: PersistError) -> Self {
        LithosError::StoreFailure(err.to_string())
    }
}
