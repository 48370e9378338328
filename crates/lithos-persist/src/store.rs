use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use lithos_core::{CoverGrid, CoverStore, LithosError};

use crate::load::decode;
use crate::save::encode;

/// File extension of stored cover grids.
pub const COVER_EXTENSION: &str = "lith";

/// In-process cover store. Grids are kept encoded so reads exercise the
/// same validation as the file store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, Vec<u8>>,
    config_hash: u64,
}

impl MemoryStore {
    pub fn new(config_hash: u64) -> Self {
        Self {
            entries: HashMap::new(),
            config_hash,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Raw encoded bytes for a key.
    pub fn raw(&self, key: &str) -> Option<&[u8]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    pub fn insert_raw(&mut self, key: &str, bytes: Vec<u8>) {
        self.entries.insert(key.to_string(), bytes);
    }
}

impl CoverStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<CoverGrid>, LithosError> {
        Ok(self
            .entries
            .get(key)
            .and_then(|bytes| decode_or_miss(key, bytes, self.config_hash)))
    }

    fn put(&mut self, key: &str, grid: &CoverGrid) -> Result<(), LithosError> {
        self.entries
            .insert(key.to_string(), encode(grid, self.config_hash));
        Ok(())
    }
}

/// One `<key>.lith` file per cover grid under a root directory.
///
/// Writes go to `<key>.lith.tmp`, are synced, then renamed over the final
/// file, so a crash leaves either the old grid or the new one.
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
    config_hash: u64,
}

impl DirStore {
    pub fn new(root: impl Into<PathBuf>, config_hash: u64) -> Self {
        Self {
            root: root.into(),
            config_hash,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Final path of a key. Keys are restricted to `[A-Za-z0-9_-]`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, LithosError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(LithosError::StoreFailure(format!(
                "invalid store key '{key}'"
            )));
        }
        Ok(self.root.join(format!("{key}.{COVER_EXTENSION}")))
    }
}

impl CoverStore for DirStore {
    fn get(&self, key: &str) -> Result<Option<CoverGrid>, LithosError> {
        let path = self.path_for(key)?;
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(LithosError::StoreFailure(format!(
                    "failed to read {}: {e}",
                    path.display()
                )))
            }
        };
        Ok(decode_or_miss(key, &bytes, self.config_hash))
    }

    fn put(&mut self, key: &str, grid: &CoverGrid) -> Result<(), LithosError> {
        let path = self.path_for(key)?;
        write_atomic(&self.root, &path, &encode(grid, self.config_hash)).map_err(|e| {
            LithosError::StoreFailure(format!("failed to write {}: {e}", path.display()))
        })
    }
}

fn write_atomic(root: &Path, final_path: &Path, bytes: &[u8]) -> io::Result<()> {
    std::fs::create_dir_all(root)?;
    let mut tmp_name = final_path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);
    let written = File::create(&tmp_path).and_then(|mut file| {
        file.write_all(bytes)?;
        file.sync_all()
    });
    let result = written.and_then(|()| std::fs::rename(&tmp_path, final_path));
    if result.is_err() {
        let _ = std::fs::remove_file(&tmp_path);
    }
    result
}

/// Undecodable or stale entries read as a cache miss.
fn decode_or_miss(key: &str, bytes: &[u8], config_hash: u64) -> Option<CoverGrid> {
    match decode(bytes, config_hash) {
        Ok(grid) => Some(grid),
        Err(e) => {
            log::warn!("Ignoring stored cover '{key}': {e}");
            None
        }
    }
}
