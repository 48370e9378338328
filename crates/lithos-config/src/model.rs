use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A depth tier loaded from RON data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerDef {
    /// Identifier that minerals use in `prob_layers`, e.g. "0-10".
    pub key: String,
    /// First depth covered by the layer (inclusive).
    pub z_low: i32,
    /// End of the layer (exclusive). None = unbounded.
    #[serde(default)]
    pub z_high: Option<i32>,
    /// Baseline weight of the void category in this tier.
    pub void_probability: f64,
}

impl LayerDef {
    pub fn contains(&self, z: i32) -> bool {
        z >= self.z_low && self.z_high.map_or(true, |high| z < high)
    }
}

/// A single mineral definition loaded from RON data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MineralDef {
    /// Category name. Must not be "void".
    pub name: String,
    /// Base weight per layer key. Missing or non-positive means absent.
    #[serde(default)]
    pub prob_layers: BTreeMap<String, f64>,
    /// Chemical formula for display, e.g. "SiO2".
    #[serde(default)]
    pub formula: String,
    /// Short description shown when the mineral is revealed.
    #[serde(default)]
    pub description: String,
    /// RGB fallback color (0–255 per channel).
    #[serde(default)]
    pub color: (u8, u8, u8),
    #[serde(default)]
    pub roughness: Option<f32>,
    #[serde(default)]
    pub metalness: Option<f32>,
}

/// Overburden appearance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverVariantDef {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub color: (u8, u8, u8),
    #[serde(default = "default_cover_roughness")]
    pub roughness: f32,
    #[serde(default)]
    pub metalness: f32,
}

fn default_cover_roughness() -> f32 {
    0.8
}

/// Crust classification to cover variant mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverRulesDef {
    /// Variant id used for every crust class without an override.
    pub default: String,
    /// Crust class → variant id.
    #[serde(default)]
    pub crust_overrides: BTreeMap<String, String>,
}

/// The complete mineral/cover configuration document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MineralConfig {
    pub layers: Vec<LayerDef>,
    pub minerals: Vec<MineralDef>,
    pub cover_variants: Vec<CoverVariantDef>,
    pub cover_rules: CoverRulesDef,
}

impl MineralConfig {
    /// Look up a mineral by name.
    pub fn mineral(&self, name: &str) -> Option<&MineralDef> {
        self.minerals.iter().find(|m| m.name == name)
    }

    /// Look up a layer by key.
    pub fn layer(&self, key: &str) -> Option<&LayerDef> {
        self.layers.iter().find(|l| l.key == key)
    }
}
