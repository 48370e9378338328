use lithos_core::{CategoryId, CategoryTable};
use sha2::{Digest, Sha256};

use crate::cover::CoverRules;
use crate::layers::DepthLayerTable;
use crate::model::{MineralConfig, MineralDef};
use crate::validator::validate_config;
use crate::LoadError;

/// Everything generation needs, compiled once from a validated configuration
/// and shared read-only for the process lifetime.
#[derive(Debug, Clone)]
pub struct Catalog {
    config: MineralConfig,
    categories: CategoryTable,
    layers: DepthLayerTable,
    covers: CoverRules,
    config_hash: u64,
}

impl Catalog {
    /// Validate and compile a configuration document.
    pub fn from_config(config: MineralConfig) -> Result<Self, LoadError> {
        validate_config(&config).map_err(LoadError::Invalid)?;

        let categories = CategoryTable::new(config.minerals.iter().map(|m| m.name.clone()))
            .map_err(|e| LoadError::CompileError(e.to_string()))?;
        let layers = DepthLayerTable::from_config(&config, &categories);
        let covers = CoverRules::from_config(&config).ok_or_else(|| {
            LoadError::CompileError(format!(
                "default cover variant '{}' not found",
                config.cover_rules.default
            ))
        })?;
        let config_hash = config_hash(&config)?;

        log::info!(
            "Compiled mineral catalog: {} categories, {} depth layers, {} cover variants (hash {:016x})",
            categories.len(),
            layers.len(),
            covers.variants().len(),
            config_hash
        );

        Ok(Self {
            config,
            categories,
            layers,
            covers,
            config_hash,
        })
    }

    pub fn categories(&self) -> &CategoryTable {
        &self.categories
    }

    pub fn layers(&self) -> &DepthLayerTable {
        &self.layers
    }

    pub fn covers(&self) -> &CoverRules {
        &self.covers
    }

    pub fn config(&self) -> &MineralConfig {
        &self.config
    }

    /// Identifies the configuration that category and cover handles refer to.
    pub fn config_hash(&self) -> u64 {
        self.config_hash
    }

    /// Definition behind a category handle. None for void.
    pub fn mineral(&self, id: CategoryId) -> Option<&MineralDef> {
        let name = self.categories.name(id)?;
        self.config.mineral(name)
    }
}

/// First 8 bytes (LE) of SHA-256 over the canonical RON form of the document.
pub fn config_hash(config: &MineralConfig) -> Result<u64, LoadError> {
    let canonical = ron::to_string(config).map_err(|e| LoadError::CompileError(e.to_string()))?;
    let digest = Sha256::digest(canonical.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    Ok(u64::from_le_bytes(bytes))
}
