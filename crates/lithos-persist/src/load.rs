use lithos_core::CoverGrid;

use crate::compat;
use crate::compress;
use crate::error::PersistError;
use crate::format::*;

/// Parse a cover file from raw bytes.
pub fn decode(bytes: &[u8], current_config_hash: u64) -> Result<CoverGrid, PersistError> {
    if bytes.len() < HEADER_SIZE {
        return Err(PersistError::FileTooSmall(bytes.len(), HEADER_SIZE));
    }

    let header: CoverHeader = bytemuck::pod_read_unaligned(&bytes[..HEADER_SIZE]);
    compat::validate_header(&header, current_config_hash)?;

    let payload_end = HEADER_SIZE + header.payload_len as usize;
    if bytes.len() < payload_end {
        return Err(PersistError::TruncatedFile {
            expected: payload_end,
            actual: bytes.len(),
        });
    }
    let payload = &bytes[HEADER_SIZE..payload_end];
    let voxel_count = header.voxel_count as usize;

    let cells = if header.is_fill() {
        let state = compress::decode_voxel(payload, 0)?;
        vec![state; voxel_count]
    } else {
        let raw = compress::decompress_payload(payload, voxel_count * VOXEL_BYTES)?;
        compress::decode_voxels(&raw)?
    };

    CoverGrid::from_cells(header.size, cells).ok_or(PersistError::InvalidGridSize {
        size: header.size,
        voxel_count: header.voxel_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::save::encode;
    use glam::UVec3;
    use lithos_core::{CategoryId, CoverVariantId, VoxelState};

    fn sample_cover() -> CoverGrid {
        let mut cover = CoverGrid::new(4);
        for x in 0..4 {
            for y in 0..4 {
                cover.replace(UVec3::new(x, y, 2), VoxelState::Covered(CoverVariantId(0)));
                cover.replace(UVec3::new(x, y, 3), VoxelState::Exposed(CategoryId(x as u16)));
            }
        }
        cover
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let cover = sample_cover();
        let loaded = decode(&encode(&cover, 0xABCD), 0xABCD).expect("load should succeed");
        assert_eq!(loaded, cover);
    }

    #[test]
    fn test_fill_roundtrip() {
        let cover = CoverGrid::new(3);
        let saved = encode(&cover, 7);
        assert_eq!(saved.len(), HEADER_SIZE + VOXEL_BYTES);
        assert_eq!(decode(&saved, 7).expect("load"), cover);
    }

    #[test]
    fn test_stale_config_rejected() {
        let saved = encode(&sample_cover(), 0xAAAA);
        assert!(matches!(
            decode(&saved, 0xBBBB),
            Err(PersistError::StaleConfig { .. })
        ));
    }

    #[test]
    fn test_invalid_magic_rejected() {
        let mut data = encode(&sample_cover(), 0);
        data[0..4].copy_from_slice(b"NOPE");
        assert!(matches!(decode(&data, 0), Err(PersistError::InvalidMagic)));
    }

    #[test]
    fn test_truncated_file_rejected() {
        let saved = encode(&sample_cover(), 0);
        let result = decode(&saved[..saved.len() - 1], 0);
        assert!(matches!(result, Err(PersistError::TruncatedFile { .. })));
    }

    #[test]
    fn test_corrupt_payload_rejected() {
        let mut saved = encode(&sample_cover(), 0);
        // Claim a larger grid than the payload holds.
        saved[16..20].copy_from_slice(&5u32.to_le_bytes());
        saved[20..24].copy_from_slice(&125u32.to_le_bytes());
        assert!(decode(&saved, 0).is_err());
    }

    #[test]
    fn test_file_too_small_rejected() {
        let result = decode(&[0u8; 10], 0);
        assert!(matches!(result, Err(PersistError::FileTooSmall(10, 32))));
    }
}
