use lithos_core::CoverGrid;

use crate::compress;
use crate::format::*;

/// Serialize a cover grid into the Lithos cover binary format.
///
/// Layout: header (32B) + payload. Uniform grids store one 4-byte voxel and
/// set `FLAG_FILL`; everything else stores LZ4-compressed voxels.
pub fn encode(cover: &CoverGrid, config_hash: u64) -> Vec<u8> {
    let cells = cover.cells();

    let (flags, payload) = match compress::detect_fill(cells) {
        Some(state) => (FLAG_FILL, compress::encode_voxel(state).to_vec()),
        None => (0, compress::compress_payload(&compress::encode_voxels(cells))),
    };

    let header = CoverHeader {
        magic: MAGIC,
        version: FORMAT_VERSION,
        flags,
        config_hash,
        size: cover.size(),
        voxel_count: cells.len() as u32,
        payload_len: payload.len() as u32,
        _pad: 0,
    };

    let mut output = Vec::with_capacity(HEADER_SIZE + payload.len());
    output.extend_from_slice(bytemuck::bytes_of(&header));
    output.extend_from_slice(&payload);
    output
}
