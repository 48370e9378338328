pub mod boundary;
pub mod categorical;
pub mod cover;
pub mod excavation;
pub mod explorer;
pub mod generator;
pub mod hash;
pub mod state_machine;

#[cfg(test)]
pub(crate) mod test_support;

pub use boundary::{ChunkDebugInfo, ChunkRequest, ChunkResponse, ChunkSource, LocalChunkSource};
pub use categorical::{select, Adjustments};
pub use cover::initialize;
pub use excavation::Excavation;
pub use explorer::Explorer;
pub use generator::ChunkGenerator;
pub use hash::sample;
pub use state_machine::{frontier, reveal, RevealError};
