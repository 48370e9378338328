use std::collections::BTreeMap;
use std::fmt::Write as _;

use glam::IVec3;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::constants::MAX_CHUNK_SIZE;
use crate::error::LithosError;

/// Sparse per-category probability deltas, keyed by category name.
pub type ProbabilityOffsets = BTreeMap<String, f64>;

/// Everything a material grid is a pure function of.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationKey {
    pub seed: String,
    /// Global coordinate of local `(0, 0, 0)`.
    pub origin: IVec3,
    /// Edge length of the cubic chunk.
    pub size: u32,
    #[serde(default)]
    pub offsets: ProbabilityOffsets,
    /// Optional allow-list of category names. `Some(vec![])` behaves like None.
    #[serde(default)]
    pub allow: Option<Vec<String>>,
}

impl GenerationKey {
    pub fn new(seed: impl Into<String>, origin: IVec3, size: u32) -> Self {
        Self {
            seed: seed.into(),
            origin,
            size,
            offsets: ProbabilityOffsets::new(),
            allow: None,
        }
    }

    pub fn with_offsets(mut self, offsets: ProbabilityOffsets) -> Self {
        self.offsets = offsets;
        self
    }

    pub fn with_allow(mut self, allow: Option<Vec<String>>) -> Self {
        self.allow = allow;
        self
    }

    /// Reject sizes outside `1..=MAX_CHUNK_SIZE`, windows whose far corner
    /// overflows `i32`, and non-finite offsets.
    pub fn validate(&self) -> Result<(), LithosError> {
        if self.size == 0 || self.size > MAX_CHUNK_SIZE {
            return Err(LithosError::InvalidKey(format!(
                "chunk size {} outside 1..={MAX_CHUNK_SIZE}",
                self.size
            )));
        }
        let extent = self.size as i32 - 1;
        for (axis, v) in [("x", self.origin.x), ("y", self.origin.y), ("z", self.origin.z)] {
            if v.checked_add(extent).is_none() {
                return Err(LithosError::InvalidKey(format!(
                    "{axis} offset {v} overflows with size {}",
                    self.size
                )));
            }
        }
        if let Some((name, delta)) = self.offsets.iter().find(|(_, d)| !d.is_finite()) {
            return Err(LithosError::InvalidKey(format!(
                "offset for '{name}' is not finite ({delta})"
            )));
        }
        Ok(())
    }

    /// Whether an allow-list is in effect.
    pub fn has_filter(&self) -> bool {
        self.allow.as_ref().is_some_and(|a| !a.is_empty())
    }

    /// Stable hex digest of every generation parameter.
    pub fn fingerprint(&self) -> String {
        hex(&self.digest(None))
    }

    /// Persistence key for the cover grid of this chunk under a crust class.
    pub fn store_key(&self, crust_class: &str) -> String {
        hex(&self.digest(Some(crust_class)))
    }

    fn digest(&self, crust_class: Option<&str>) -> [u8; 32] {
        let mut hasher = Sha256::new();
        feed_str(&mut hasher, &self.seed);
        for v in self.origin.to_array() {
            hasher.update(v.to_le_bytes());
        }
        hasher.update(self.size.to_le_bytes());
        hasher.update((self.offsets.len() as u64).to_le_bytes());
        for (name, delta) in &self.offsets {
            feed_str(&mut hasher, name);
            hasher.update(delta.to_bits().to_le_bytes());
        }
        // Empty allow-lists hash like absent ones since they sample identically.
        match self.allow.as_deref() {
            Some(list) if !list.is_empty() => {
                let mut sorted: Vec<&str> = list.iter().map(String::as_str).collect();
                sorted.sort_unstable();
                sorted.dedup();
                hasher.update([1u8]);
                hasher.update((sorted.len() as u64).to_le_bytes());
                for name in sorted {
                    feed_str(&mut hasher, name);
                }
            }
            _ => hasher.update([0u8]),
        }
        if let Some(crust) = crust_class {
            hasher.update([2u8]);
            feed_str(&mut hasher, crust);
        }
        hasher.finalize().into()
    }
}

fn feed_str(hasher: &mut Sha256, s: &str) {
    hasher.update((s.len() as u64).to_le_bytes());
    hasher.update(s.as_bytes());
}

fn hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(out, "{byte:02x}");
    }
    out
}
