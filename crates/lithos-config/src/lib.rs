pub mod catalog;
pub mod cover;
pub mod defaults;
pub mod layers;
pub mod locations;
pub mod model;
pub mod validator;

pub use catalog::Catalog;
pub use cover::CoverRules;
pub use layers::{DepthLayer, DepthLayerTable, Distribution};
pub use locations::LocationTable;
pub use model::{CoverRulesDef, CoverVariantDef, LayerDef, MineralConfig, MineralDef};
pub use validator::ValidationError;

use std::collections::BTreeMap;
use std::path::Path;

use lithos_core::{LithosError, LocationOffsets};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read {path}: {message}")]
    Io { path: String, message: String },
    #[error("Failed to parse mineral config RON: {0}")]
    ConfigParseError(String),
    #[error("Failed to parse mineral pack RON: {0}")]
    MineralParseError(String),
    #[error("Failed to parse locations RON: {0}")]
    LocationParseError(String),
    #[error("Invalid mineral config: {}", join_errors(.0))]
    Invalid(Vec<ValidationError>),
    #[error("Failed to compile mineral config: {0}")]
    CompileError(String),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<LoadError> for LithosError {
    fn from(err: LoadError) -> Self {
        LithosError::ConfigUnavailable(err.to_string())
    }
}

/// Parse a complete configuration document.
pub fn load_config_from_str(ron_str: &str) -> Result<MineralConfig, LoadError> {
    let options = ron::Options::default();
    options
        .from_str(ron_str)
        .map_err(|e| LoadError::ConfigParseError(e.to_string()))
}

/// Parse a mineral pack: a bare list of mineral definitions.
pub fn load_minerals_from_str(ron_str: &str) -> Result<Vec<MineralDef>, LoadError> {
    let options = ron::Options::default();
    options
        .from_str(ron_str)
        .map_err(|e| LoadError::MineralParseError(e.to_string()))
}

/// Parse a location table: name → offsets.
pub fn load_locations_from_str(ron_str: &str) -> Result<LocationTable, LoadError> {
    let options = ron::Options::default();
    let entries: BTreeMap<String, LocationOffsets> = options
        .from_str(ron_str)
        .map_err(|e| LoadError::LocationParseError(e.to_string()))?;
    Ok(LocationTable::new(entries))
}

/// Load a base document and append the minerals of each pack, in order.
/// Duplicate names are left for validation to report.
pub fn load_config_with_packs(
    config_src: &str,
    pack_sources: &[&str],
) -> Result<MineralConfig, LoadError> {
    let mut config = load_config_from_str(config_src)?;
    for source in pack_sources {
        config.minerals.extend(load_minerals_from_str(source)?);
    }
    Ok(config)
}

/// Read, parse, validate and compile a configuration file.
pub fn load_catalog_from_path(path: &Path) -> Result<Catalog, LoadError> {
    let contents = std::fs::read_to_string(path).map_err(|e| LoadError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    Catalog::from_config(load_config_from_str(&contents)?)
}

/// Read and parse a location table file.
pub fn load_locations_from_path(path: &Path) -> Result<LocationTable, LoadError> {
    let contents = std::fs::read_to_string(path).map_err(|e| LoadError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    load_locations_from_str(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = r#"(
        layers: [(key: "0-10", z_low: 0, z_high: Some(10), void_probability: 0.1)],
        minerals: [(name: "quartz", prob_layers: {"0-10": 0.3})],
        cover_variants: [(id: "clayey_mudflat", roughness: 0.9)],
        cover_rules: (default: "clayey_mudflat"),
    )"#;

    #[test]
    fn test_load_config() {
        let config = load_config_from_str(BASE).expect("should parse");
        assert_eq!(config.layers.len(), 1);
        assert_eq!(config.layers[0].z_high, Some(10));
        assert_eq!(config.minerals[0].name, "quartz");
        assert_eq!(config.cover_variants[0].roughness, 0.9);
        assert!(config.cover_rules.crust_overrides.is_empty());
    }

    #[test]
    fn test_malformed_ron_rejected() {
        let result = load_config_from_str(r#"[this is not valid RON {"#);
        assert!(matches!(result, Err(LoadError::ConfigParseError(_))));
    }

    #[test]
    fn test_packs_append_minerals() {
        let pack = r#"[
            (name: "gold", prob_layers: {"0-10": 0.01}, formula: "Au"),
            (name: "mica", prob_layers: {"0-10": 0.1}),
        ]"#;
        let config = load_config_with_packs(BASE, &[pack]).expect("should merge");
        assert_eq!(config.minerals.len(), 3);
        assert_eq!(config.mineral("gold").map(|m| m.formula.as_str()), Some("Au"));
    }

    #[test]
    fn test_bad_pack_reports_pack_error() {
        let result = load_config_with_packs(BASE, &["{ nope }"]);
        assert!(matches!(result, Err(LoadError::MineralParseError(_))));
    }

    #[test]
    fn test_load_error_maps_to_config_unavailable() {
        let err: LithosError = LoadError::CompileError("boom".into()).into();
        assert!(matches!(err, LithosError::ConfigUnavailable(msg) if msg.contains("boom")));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = load_catalog_from_path(Path::new("/definitely/not/here.ron"));
        assert!(matches!(result, Err(LoadError::Io { .. })));
    }
}
