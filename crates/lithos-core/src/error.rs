use thiserror::Error;

/// Why a reveal was refused. The cover grid is untouched in every case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealRejection {
    /// The coordinate lies outside the chunk.
    OutOfBounds,
    /// The depth is below the current excavation frontier.
    BeyondFrontier { frontier: u32 },
    /// The voxel holds no material.
    Void,
    /// The voxel was already revealed.
    AlreadyExposed,
    /// No chunk is loaded.
    NoActiveChunk,
}

impl std::fmt::Display for RevealRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfBounds => write!(f, "outside the chunk"),
            Self::BeyondFrontier { frontier } => {
                write!(f, "below the excavation frontier at depth {frontier}")
            }
            Self::Void => write!(f, "voxel is empty"),
            Self::AlreadyExposed => write!(f, "voxel is already exposed"),
            Self::NoActiveChunk => write!(f, "no chunk is loaded"),
        }
    }
}

/// Errors surfaced by the Lithos pipeline.
#[derive(Debug, Error)]
pub enum LithosError {
    #[error("mineral configuration unavailable: {0}")]
    ConfigUnavailable(String),

    #[error("cannot reveal ({x}, {y}, {z}): {reason}")]
    InvalidReveal {
        x: u32,
        y: u32,
        z: u32,
        reason: RevealRejection,
    },

    #[error("chunk generation transport failed: {0}")]
    GenerationTransportFailure(String),

    #[error("location resolution failed: {0}")]
    LocationResolutionFailure(String),

    #[error("cover store failed: {0}")]
    StoreFailure(String),

    #[error("invalid generation parameters: {0}")]
    InvalidKey(String),
}

impl LithosError {
    /// Whether re-issuing the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::GenerationTransportFailure(_) | Self::StoreFailure(_)
        )
    }
}
