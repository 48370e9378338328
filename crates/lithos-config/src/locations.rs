use std::collections::BTreeMap;

use lithos_core::{LithosError, LocationOffsets, LocationResolver};

/// Static named-location resolver backed by a RON table.
/// Lookups ignore case and surrounding whitespace.
#[derive(Debug, Clone, Default)]
pub struct LocationTable {
    entries: BTreeMap<String, LocationOffsets>,
}

impl LocationTable {
    pub fn new(entries: BTreeMap<String, LocationOffsets>) -> Self {
        let entries = entries
            .into_iter()
            .map(|(name, offsets)| (normalize(&name), offsets))
            .collect();
        Self { entries }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl LocationResolver for LocationTable {
    fn resolve(&self, query: &str) -> Result<LocationOffsets, LithosError> {
        let key = normalize(query);
        if key.is_empty() {
            return Err(LithosError::LocationResolutionFailure(
                "missing location".into(),
            ));
        }
        self.entries.get(&key).cloned().ok_or_else(|| {
            LithosError::LocationResolutionFailure(format!("unknown location '{}'", query.trim()))
        })
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}
