use lithos_core::{CategoryId, CategoryTable};

use crate::model::MineralConfig;

/// Base weights of one depth layer, sorted by category handle (and therefore
/// by category name). Weights are strictly positive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Distribution {
    entries: Vec<(CategoryId, f64)>,
}

impl Distribution {
    /// Build from `(category, weight)` pairs. Non-positive weights are dropped
    /// and later duplicates replace earlier ones.
    pub fn new(pairs: impl IntoIterator<Item = (CategoryId, f64)>) -> Self {
        let mut entries: Vec<(CategoryId, f64)> = Vec::new();
        for (id, weight) in pairs {
            entries.retain(|(existing, _)| *existing != id);
            if weight > 0.0 {
                entries.push((id, weight));
            }
        }
        entries.sort_by_key(|(id, _)| *id);
        Self { entries }
    }

    pub fn entries(&self) -> &[(CategoryId, f64)] {
        &self.entries
    }

    pub fn weight(&self, id: CategoryId) -> Option<f64> {
        self.entries
            .binary_search_by_key(&id, |(c, _)| *c)
            .ok()
            .map(|i| self.entries[i].1)
    }

    pub fn contains(&self, id: CategoryId) -> bool {
        self.weight(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One compiled depth layer.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthLayer {
    pub key: String,
    pub z_low: i32,
    /// Exclusive upper bound. None = unbounded.
    pub z_high: Option<i32>,
    pub base: Distribution,
}

impl DepthLayer {
    pub fn contains(&self, z: i32) -> bool {
        z >= self.z_low && self.z_high.map_or(true, |high| z < high)
    }
}

/// Ordered depth layers. Ranges never overlap but may leave gaps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DepthLayerTable {
    layers: Vec<DepthLayer>,
}

impl DepthLayerTable {
    pub fn new(layers: Vec<DepthLayer>) -> Self {
        Self { layers }
    }

    /// Compile layers from configuration. Each layer gets every mineral with a
    /// positive weight under its key plus its void baseline.
    pub fn from_config(config: &MineralConfig, table: &CategoryTable) -> Self {
        let layers = config
            .layers
            .iter()
            .map(|def| {
                let minerals = config.minerals.iter().filter_map(|m| {
                    let weight = *m.prob_layers.get(&def.key)?;
                    let id = table.id(&m.name)?;
                    Some((id, weight))
                });
                let base = Distribution::new(
                    minerals.chain(std::iter::once((table.void(), def.void_probability))),
                );
                DepthLayer {
                    key: def.key.clone(),
                    z_low: def.z_low,
                    z_high: def.z_high,
                    base,
                }
            })
            .collect();
        Self { layers }
    }

    /// Layer covering depth `z`, or None in a gap.
    pub fn lookup(&self, z: i32) -> Option<&DepthLayer> {
        self.layers.iter().find(|layer| layer.contains(z))
    }

    pub fn layers(&self) -> &[DepthLayer] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}
