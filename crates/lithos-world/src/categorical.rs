use lithos_config::Distribution;
use lithos_core::{CategoryId, CategoryTable, ProbabilityOffsets};

/// Per-request weight adjustments resolved against a category table.
///
/// Offsets naming unknown categories are ignored; an allow-list is only in
/// effect when it names at least one entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Adjustments {
    deltas: Vec<f64>,
    allow: Option<Vec<bool>>,
}

impl Adjustments {
    /// No offsets, no filter.
    pub fn none(table: &CategoryTable) -> Self {
        Self {
            deltas: vec![0.0; table.len()],
            allow: None,
        }
    }

    pub fn resolve(
        table: &CategoryTable,
        offsets: &ProbabilityOffsets,
        allow: Option<&[String]>,
    ) -> Self {
        let mut adjustments = Self::none(table);
        for (name, delta) in offsets {
            if let Some(id) = table.id(name) {
                adjustments.deltas[id.index()] = *delta;
            }
        }
        if let Some(list) = allow.filter(|list| !list.is_empty()) {
            let mut mask = vec![false; table.len()];
            for id in list.iter().filter_map(|name| table.id(name)) {
                mask[id.index()] = true;
            }
            adjustments.allow = Some(mask);
        }
        adjustments
    }

    pub fn has_filter(&self) -> bool {
        self.allow.is_some()
    }

    /// Adjusted weight of a category already present in a base distribution.
    /// None when the allow-list excludes it.
    #[inline]
    pub fn apply(&self, id: CategoryId, base: f64) -> Option<f64> {
        if let Some(mask) = &self.allow {
            if !mask.get(id.index()).copied().unwrap_or(false) {
                return None;
            }
        }
        Some(base + self.deltas.get(id.index()).copied().unwrap_or(0.0))
    }
}

/// Pick a category from `base` for a draw in `[0, 1)`. None means void.
///
/// Weights are adjusted, filtered and normalised, then walked in name order
/// accumulating `weight / total`; the first category whose running sum
/// exceeds the draw wins. A non-positive total yields void, and a draw that
/// outruns the accumulated sum through rounding falls back to the last
/// category.
pub fn select(base: &Distribution, adjustments: &Adjustments, draw: f64) -> Option<CategoryId> {
    let weights = || {
        base.entries()
            .iter()
            .filter_map(|&(id, w)| adjustments.apply(id, w).map(|w| (id, w)))
    };

    let total: f64 = weights().map(|(_, w)| w).sum();
    if !(total > 0.0) {
        return None;
    }

    let mut cumulative = 0.0;
    let mut last = None;
    for (id, weight) in weights() {
        cumulative += weight / total;
        if draw < cumulative {
            return Some(id);
        }
        last = Some(id);
    }
    last
}

/// Whether `select` can return something other than `void` for any draw.
///
/// A non-void category wins only with a positive adjusted weight, or as the
/// rounding fallback when it is the last entry walked.
pub fn can_yield_solid(base: &Distribution, adjustments: &Adjustments, void: CategoryId) -> bool {
    let weights: Vec<(CategoryId, f64)> = base
        .entries()
        .iter()
        .filter_map(|&(id, w)| adjustments.apply(id, w).map(|w| (id, w)))
        .collect();
    let total: f64 = weights.iter().map(|(_, w)| w).sum();
    if !(total > 0.0) {
        return false;
    }
    weights.iter().any(|&(id, w)| id != void && w > 0.0)
        || weights.last().map_or(false, |&(id, _)| id != void)
}
