use std::collections::HashSet;

use lithos_core::constants::{MAX_CATEGORIES, VOID_NAME};
use thiserror::Error;

use crate::model::MineralConfig;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Duplicate layer key '{0}'")]
    DuplicateLayerKey(String),
    #[error("Layer '{key}' range [{z_low}, {z_high}) is empty")]
    EmptyLayerRange { key: String, z_low: i32, z_high: i32 },
    #[error("Layers '{a}' and '{b}' overlap")]
    OverlappingLayers { a: String, b: String },
    #[error("Layer '{key}' void probability {value} must be finite and non-negative")]
    InvalidVoidProbability { key: String, value: f64 },
    #[error("Duplicate mineral '{0}'")]
    DuplicateMineral(String),
    #[error("Mineral name '{0}' is reserved")]
    ReservedMineralName(String),
    #[error("Mineral '{name}' probability {value} for layer '{layer}' must be finite and non-negative")]
    InvalidProbability { name: String, layer: String, value: f64 },
    #[error("Mineral '{name}' references unknown layer '{layer}'")]
    UnknownLayerRef { name: String, layer: String },
    #[error("Duplicate cover variant '{0}'")]
    DuplicateCoverVariant(String),
    #[error("Cover rule for '{crust}' references unknown cover variant '{variant}'")]
    UnknownCoverVariant { crust: String, variant: String },
    #[error("{0} categories exceed the limit of {max}", max = MAX_CATEGORIES)]
    TooManyCategories(usize),
}

/// Validate a configuration document. Collects every problem instead of
/// stopping at the first.
pub fn validate_config(config: &MineralConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    validate_layers(config, &mut errors);
    validate_minerals(config, &mut errors);
    validate_covers(config, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_layers(config: &MineralConfig, errors: &mut Vec<ValidationError>) {
    let mut seen = HashSet::new();
    for layer in &config.layers {
        if !seen.insert(layer.key.as_str()) {
            errors.push(ValidationError::DuplicateLayerKey(layer.key.clone()));
        }
        if let Some(high) = layer.z_high {
            if high <= layer.z_low {
                errors.push(ValidationError::EmptyLayerRange {
                    key: layer.key.clone(),
                    z_low: layer.z_low,
                    z_high: high,
                });
            }
        }
        if !layer.void_probability.is_finite() || layer.void_probability < 0.0 {
            errors.push(ValidationError::InvalidVoidProbability {
                key: layer.key.clone(),
                value: layer.void_probability,
            });
        }
    }

    // Overlap check on ranges sorted by lower bound; empty ranges were reported above.
    let mut ranges: Vec<_> = config
        .layers
        .iter()
        .filter(|l| l.z_high.map_or(true, |h| h > l.z_low))
        .collect();
    ranges.sort_by_key(|l| l.z_low);
    for pair in ranges.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if a.z_high.map_or(true, |high| high > b.z_low) {
            errors.push(ValidationError::OverlappingLayers {
                a: a.key.clone(),
                b: b.key.clone(),
            });
        }
    }
}

fn validate_minerals(config: &MineralConfig, errors: &mut Vec<ValidationError>) {
    let layer_keys: HashSet<&str> = config.layers.iter().map(|l| l.key.as_str()).collect();
    let mut seen = HashSet::new();

    for mineral in &config.minerals {
        if mineral.name == VOID_NAME {
            errors.push(ValidationError::ReservedMineralName(mineral.name.clone()));
        }
        if !seen.insert(mineral.name.as_str()) {
            errors.push(ValidationError::DuplicateMineral(mineral.name.clone()));
        }
        for (layer, &value) in &mineral.prob_layers {
            if !layer_keys.contains(layer.as_str()) {
                errors.push(ValidationError::UnknownLayerRef {
                    name: mineral.name.clone(),
                    layer: layer.clone(),
                });
            }
            if !value.is_finite() || value < 0.0 {
                errors.push(ValidationError::InvalidProbability {
                    name: mineral.name.clone(),
                    layer: layer.clone(),
                    value,
                });
            }
        }
    }

    // +1 for void
    if seen.len() + 1 > MAX_CATEGORIES {
        errors.push(ValidationError::TooManyCategories(seen.len() + 1));
    }
}

fn validate_covers(config: &MineralConfig, errors: &mut Vec<ValidationError>) {
    let mut ids = HashSet::new();
    for variant in &config.cover_variants {
        if !ids.insert(variant.id.as_str()) {
            errors.push(ValidationError::DuplicateCoverVariant(variant.id.clone()));
        }
    }

    let rules = &config.cover_rules;
    if !ids.contains(rules.default.as_str()) {
        errors.push(ValidationError::UnknownCoverVariant {
            crust: "<default>".into(),
            variant: rules.default.clone(),
        });
    }
    for (crust, variant) in &rules.crust_overrides {
        if !ids.contains(variant.as_str()) {
            errors.push(ValidationError::UnknownCoverVariant {
                crust: crust.clone(),
                variant: variant.clone(),
            });
        }
    }
}
