pub mod compat;
pub mod compress;
pub mod error;
pub mod format;
pub mod load;
pub mod save;
pub mod store;

pub use error::PersistError;
pub use format::CoverHeader;
pub use load::decode;
pub use save::encode;
pub use store::{DirStore, MemoryStore};
