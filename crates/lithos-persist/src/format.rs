/// Magic bytes identifying a Lithos cover file.
pub const MAGIC: [u8; 4] = *b"LITH";

/// Current cover format version.
pub const FORMAT_VERSION: u16 = 1;

/// Size of the file header in bytes.
pub const HEADER_SIZE: usize = 32;

/// Encoded size of one voxel: tag, reserved byte, u16 handle (LE).
pub const VOXEL_BYTES: usize = 4;

/// Header flag: the payload is a single voxel repeated across the grid.
pub const FLAG_FILL: u16 = 0x0001;

/// Voxel tags.
pub const TAG_VOID: u8 = 0;
pub const TAG_COVERED: u8 = 1;
pub const TAG_EXPOSED: u8 = 2;

/// Cover file header. Fixed 32 bytes, repr(C) for byte-level serialization.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CoverHeader {
    pub magic: [u8; 4],
    pub version: u16,
    pub flags: u16,
    /// Hash of the configuration the category and cover handles refer to.
    pub config_hash: u64,
    pub size: u32,
    pub voxel_count: u32,
    pub payload_len: u32,
    pub _pad: u32,
}

impl CoverHeader {
    pub fn is_fill(&self) -> bool {
        self.flags & FLAG_FILL != 0
    }
}
