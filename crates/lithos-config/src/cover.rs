use std::collections::BTreeMap;

use lithos_core::CoverVariantId;

use crate::model::{CoverVariantDef, MineralConfig};

/// Compiled crust classification → cover variant mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverRules {
    variants: Vec<CoverVariantDef>,
    default: CoverVariantId,
    overrides: BTreeMap<String, CoverVariantId>,
}

impl CoverRules {
    /// Compile from a validated configuration. Returns None if the default
    /// variant is missing; overrides naming unknown variants are skipped.
    pub fn from_config(config: &MineralConfig) -> Option<Self> {
        let variants = config.cover_variants.clone();
        let find = |id: &str| {
            variants
                .iter()
                .position(|v| v.id == id)
                .map(|i| CoverVariantId(i as u16))
        };

        let default = find(&config.cover_rules.default)?;
        let overrides = config
            .cover_rules
            .crust_overrides
            .iter()
            .filter_map(|(crust, variant)| Some((crust.clone(), find(variant)?)))
            .collect();

        Some(Self {
            variants,
            default,
            overrides,
        })
    }

    /// Variant for a crust class. Unlisted classes get the default.
    pub fn resolve(&self, crust_class: &str) -> CoverVariantId {
        self.overrides
            .get(crust_class)
            .copied()
            .unwrap_or(self.default)
    }

    pub fn variant(&self, id: CoverVariantId) -> Option<&CoverVariantDef> {
        self.variants.get(id.index())
    }

    /// Variant id string, e.g. "clayey_mudflat".
    pub fn variant_name(&self, id: CoverVariantId) -> &str {
        self.variant(id).map_or("unknown", |v| v.id.as_str())
    }

    pub fn variants(&self) -> &[CoverVariantDef] {
        &self.variants
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CoverRulesDef;

    fn variant(id: &str) -> CoverVariantDef {
        CoverVariantDef {
            id: id.into(),
            name: String::new(),
            color: (0, 0, 0),
            roughness: 0.8,
            metalness: 0.0,
        }
    }

    fn config() -> MineralConfig {
        MineralConfig {
            layers: vec![],
            minerals: vec![],
            cover_variants: vec![variant("clayey_mudflat"), variant("coral_reef_sand")],
            cover_rules: CoverRulesDef {
                default: "clayey_mudflat".into(),
                crust_overrides: BTreeMap::from([
                    ("oceanic".to_string(), "coral_reef_sand".to_string()),
                    ("volcanic_subduction".to_string(), "coral_reef_sand".to_string()),
                ]),
            },
        }
    }

    #[test]
    fn test_crust_overrides_and_default() {
        let rules = CoverRules::from_config(&config()).expect("rules");
        assert_eq!(rules.variant_name(rules.resolve("oceanic")), "coral_reef_sand");
        assert_eq!(
            rules.variant_name(rules.resolve("volcanic_subduction")),
            "coral_reef_sand"
        );
        assert_eq!(rules.variant_name(rules.resolve("continental")), "clayey_mudflat");
        assert_eq!(rules.variant_name(rules.resolve("")), "clayey_mudflat");
    }

    #[test]
    fn test_missing_default_rejected() {
        let mut cfg = config();
        cfg.cover_rules.default = "nope".into();
        assert!(CoverRules::from_config(&cfg).is_none());
    }
}
