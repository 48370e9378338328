use lithos_core::{CategoryId, CoverVariantId, VoxelState};

use crate::error::PersistError;
use crate::format::{TAG_COVERED, TAG_EXPOSED, TAG_VOID, VOXEL_BYTES};

/// Encode one voxel as `[tag, 0, id_lo, id_hi]`.
pub fn encode_voxel(state: VoxelState) -> [u8; VOXEL_BYTES] {
    let (tag, id) = match state {
        VoxelState::Void => (TAG_VOID, 0u16),
        VoxelState::Covered(variant) => (TAG_COVERED, variant.0),
        VoxelState::Exposed(category) => (TAG_EXPOSED, category.0),
    };
    let id = id.to_le_bytes();
    [tag, 0, id[0], id[1]]
}

/// Decode one voxel. `index` is only used for error reporting.
pub fn decode_voxel(bytes: &[u8], index: usize) -> Result<VoxelState, PersistError> {
    let [tag, _, lo, hi] = bytes else {
        return Err(PersistError::InvalidPayloadSize {
            expected: VOXEL_BYTES,
            actual: bytes.len(),
        });
    };
    let id = u16::from_le_bytes([*lo, *hi]);
    match *tag {
        TAG_VOID => Ok(VoxelState::Void),
        TAG_COVERED => Ok(VoxelState::Covered(CoverVariantId(id))),
        TAG_EXPOSED => Ok(VoxelState::Exposed(CategoryId(id))),
        tag => Err(PersistError::InvalidTag { index, tag }),
    }
}

/// Encode every voxel in grid order.
pub fn encode_voxels(cells: &[VoxelState]) -> Vec<u8> {
    let mut out = Vec::with_capacity(cells.len() * VOXEL_BYTES);
    for &state in cells {
        out.extend_from_slice(&encode_voxel(state));
    }
    out
}

pub fn decode_voxels(data: &[u8]) -> Result<Vec<VoxelState>, PersistError> {
    data.chunks_exact(VOXEL_BYTES)
        .enumerate()
        .map(|(i, bytes)| decode_voxel(bytes, i))
        .collect()
}

/// Compress raw voxel bytes using LZ4.
pub fn compress_payload(data: &[u8]) -> Vec<u8> {
    lz4_flex::compress_prepend_size(data)
}

/// Decompress an LZ4 payload, validating the output size.
pub fn decompress_payload(compressed: &[u8], expected: usize) -> Result<Vec<u8>, PersistError> {
    let decompressed = lz4_flex::decompress_size_prepended(compressed)
        .map_err(|e| PersistError::DecompressError(e.to_string()))?;

    if decompressed.len() != expected {
        return Err(PersistError::InvalidPayloadSize {
            expected,
            actual: decompressed.len(),
        });
    }

    Ok(decompressed)
}

/// The shared state if every voxel is identical.
pub fn detect_fill(cells: &[VoxelState]) -> Option<VoxelState> {
    let (&first, rest) = cells.split_first()?;
    rest.iter().all(|&v| v == first).then_some(first)
}
