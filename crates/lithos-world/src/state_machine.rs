use lithos_core::{CategoryId, CoverGrid, LithosError, LocalCoord, MaterialGrid, RevealRejection, VoxelState};
use thiserror::Error;

/// A refused reveal. The cover grid is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot reveal ({}, {}, {}): {reason}", .pos.x, .pos.y, .pos.z)]
pub struct RevealError {
    pub pos: LocalCoord,
    pub reason: RevealRejection,
}

impl From<RevealError> for LithosError {
    fn from(err: RevealError) -> Self {
        LithosError::InvalidReveal {
            x: err.pos.x,
            y: err.pos.y,
            z: err.pos.z,
            reason: err.reason,
        }
    }
}

/// Shallowest local depth holding any covered voxel, or `size` when none do.
pub fn frontier(cover: &CoverGrid) -> u32 {
    let s = cover.size() as usize;
    cover
        .cells()
        .iter()
        .enumerate()
        .filter(|(_, state)| state.is_covered())
        .map(|(i, _)| (i % s) as u32)
        .min()
        .unwrap_or(cover.size())
}

/// Reveal one covered voxel at or above the frontier, exposing the material
/// beneath it.
///
/// Covered -> Exposed is the only transition; Void and Exposed are terminal.
pub fn reveal(
    cover: &mut CoverGrid,
    material: &MaterialGrid,
    pos: LocalCoord,
) -> Result<CategoryId, RevealError> {
    let reject = |reason| RevealError { pos, reason };

    let (Some(state), Some(mineral)) = (cover.get(pos), material.get(pos)) else {
        return Err(reject(RevealRejection::OutOfBounds));
    };
    let frontier = frontier(cover);
    if pos.z > frontier {
        return Err(reject(RevealRejection::BeyondFrontier { frontier }));
    }
    match state {
        VoxelState::Covered(_) => {
            cover.replace(pos, VoxelState::Exposed(mineral));
            Ok(mineral)
        }
        VoxelState::Exposed(_) => Err(reject(RevealRejection::AlreadyExposed)),
        VoxelState::Void => Err(reject(RevealRejection::Void)),
    }
}
