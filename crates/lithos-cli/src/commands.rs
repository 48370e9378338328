use std::path::Path;

use glam::{IVec3, UVec3};
use lithos_config::defaults::{default_catalog, default_locations};
use lithos_config::{load_catalog_from_path, load_locations_from_path, LocationTable};
use lithos_core::{
    CoverStore, GenerationKey, LithosError, LocationResolver, ProbabilityOffsets, RevealRejection,
};
use lithos_world::{
    Adjustments, ChunkGenerator, ChunkRequest, ChunkSource, Explorer, LocalChunkSource,
};

use crate::report;

/// Loaded configuration shared by every command.
pub struct Context {
    pub generator: ChunkGenerator,
    pub locations: LocationTable,
}

impl Context {
    /// Load the mineral config and location table, falling back to the
    /// built-in copies when no path is given.
    pub fn load(config: Option<&Path>, locations: Option<&Path>) -> Result<Self, LithosError> {
        let catalog = match config {
            Some(path) => load_catalog_from_path(path)?,
            None => default_catalog()?,
        };
        let locations = match locations {
            Some(path) => load_locations_from_path(path)?,
            None => default_locations()?,
        };
        log::info!("Loaded {} named locations", locations.len());
        Ok(Self {
            generator: ChunkGenerator::new(catalog),
            locations,
        })
    }

    pub fn config_hash(&self) -> u64 {
        self.generator.catalog().config_hash()
    }
}

/// Which chunk an excavation opens.
#[derive(Debug, Clone)]
pub enum Target {
    Location(String),
    Origin {
        origin: IVec3,
        crust_class: String,
        offsets: ProbabilityOffsets,
    },
}

/// Mineral name at one global cell.
pub fn mineral(
    ctx: &Context,
    seed: &str,
    pos: IVec3,
    offsets: &ProbabilityOffsets,
    allow: Option<&[String]>,
) -> String {
    let categories = ctx.generator.categories();
    let adjustments = Adjustments::resolve(categories, offsets, allow);
    let id = ctx.generator.sample_cell(seed, pos, &adjustments);
    categories.name_or_void(id).to_string()
}

/// Generate a chunk through the local chunk source. Emits the JSON response
/// when `json` is set, otherwise a table of category counts.
pub fn chunk(ctx: &Context, request: &ChunkRequest, json: bool) -> Result<String, LithosError> {
    let source = LocalChunkSource::new(ctx.generator.clone());
    if json {
        return source.fetch(request)?.to_json();
    }
    let mut request = request.clone();
    request.debug = true;
    let response = source.fetch(&request)?;
    let info = response.debug_info.ok_or_else(|| {
        LithosError::GenerationTransportFailure("chunk source returned no debug info".into())
    })?;

    let mut out = format!(
        "chunk {} at ({}, {}, {}) size {}\n\n",
        &info.fingerprint[..info.fingerprint.len().min(12)],
        request.x_offset,
        request.y_offset,
        request.z_offset,
        request.size
    );
    out.push_str(&report::format_counts(&info));
    let gaps: Vec<String> = info
        .depth_layers
        .iter()
        .filter(|d| d.layer.is_none())
        .map(|d| d.z.to_string())
        .collect();
    if !gaps.is_empty() {
        out.push_str(&format!("\nvoid gap depths: {}\n", gaps.join(", ")));
    }
    Ok(out)
}

/// Render a horizontal slice at depth `z`.
pub fn slice(
    ctx: &Context,
    key: &GenerationKey,
    z: i32,
    zoom: u32,
) -> Result<String, LithosError> {
    let rows = ctx.generator.generate_slice(key, z, zoom)?;
    Ok(report::format_slice(ctx.generator.catalog(), &rows))
}

/// Describe a named location and the cover its crust class maps to.
pub fn locate(ctx: &Context, query: &str) -> Result<String, LithosError> {
    let location = ctx.locations.resolve(query)?;
    let covers = ctx.generator.catalog().covers();
    let variant = covers.variant_name(covers.resolve(&location.crust_class));
    let mut out = format!(
        "offsets ({}, {}, {})\ncrust {} -> cover {}\n",
        location.x_offset, location.y_offset, location.z_offset, location.crust_class, variant
    );
    for (name, delta) in &location.probability_offsets {
        out.push_str(&format!("offset {name} {delta:+}\n"));
    }
    Ok(out)
}

/// Open a chunk, apply reveals in order and report the result. Stops at the
/// first failed reveal; earlier reveals stay persisted.
pub fn excavate<S: CoverStore>(
    ctx: &Context,
    store: S,
    target: &Target,
    seed: &str,
    size: u32,
    allow: Option<Vec<String>>,
    reveals: &[UVec3],
) -> Result<String, LithosError> {
    let mut explorer = Explorer::new(ctx.generator.clone(), store);
    match target {
        Target::Location(query) => {
            explorer.open_location(&ctx.locations, query, seed, size, allow)?;
        }
        Target::Origin {
            origin,
            crust_class,
            offsets,
        } => {
            let key = GenerationKey::new(seed, *origin, size)
                .with_offsets(offsets.clone())
                .with_allow(allow);
            explorer.open(key, crust_class)?;
        }
    }

    let mut out = String::new();
    for &pos in reveals {
        let id = explorer.reveal(pos)?;
        out.push_str(&report::format_reveal(ctx.generator.catalog(), id, pos));
    }

    let excavation = explorer.current().ok_or_else(|| LithosError::InvalidReveal {
        x: 0,
        y: 0,
        z: 0,
        reason: RevealRejection::NoActiveChunk,
    })?;
    out.push_str(&report::format_excavation(ctx.generator.catalog(), excavation));
    Ok(out)
}

/// Parse `name=delta` into a probability offset.
pub fn parse_offset(s: &str) -> Result<(String, f64), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=DELTA, got '{s}'"))?;
    let delta: f64 = value
        .trim()
        .parse()
        .map_err(|e| format!("invalid delta '{value}': {e}"))?;
    if !delta.is_finite() {
        return Err(format!("delta for '{name}' must be finite"));
    }
    Ok((name.trim().to_string(), delta))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lithos_persist::MemoryStore;

    fn ctx() -> Context {
        Context::load(None, None).expect("built-in context")
    }

    #[test]
    fn test_parse_offset() {
        assert_eq!(parse_offset("gold=0.25"), Ok(("gold".to_string(), 0.25)));
        assert_eq!(parse_offset(" mica = -0.1"), Ok(("mica".to_string(), -0.1)));
        assert!(parse_offset("gold").is_err());
        assert!(parse_offset("gold=abc").is_err());
        assert!(parse_offset("gold=inf").is_err());
    }

    #[test]
    fn test_mineral_in_gap_is_void() {
        let ctx = ctx();
        let offsets = ProbabilityOffsets::new();
        let name = mineral(&ctx, "default_seed", IVec3::new(3, 4, 10), &offsets, None);
        assert_eq!(name, "void");
    }

    #[test]
    fn test_mineral_respects_allow_list() {
        let ctx = ctx();
        let allow = vec!["gold".to_string()];
        let offsets = ProbabilityOffsets::new();
        for z in [0, 5, 20, 40] {
            let name = mineral(&ctx, "s", IVec3::new(1, 1, z), &offsets, Some(&allow));
            assert!(name == "gold" || name == "void", "{name} at z={z}");
        }
    }

    #[test]
    fn test_chunk_json_parses_back() {
        let ctx = ctx();
        let request = ChunkRequest::from_key(&GenerationKey::new("json", IVec3::ZERO, 3));
        let json = chunk(&ctx, &request, true).expect("chunk");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
        assert_eq!(value["chunk"].as_array().map(Vec::len), Some(3));
        assert!(value.get("debug_info").is_none());
    }

    #[test]
    fn test_chunk_summary_reports_gaps() {
        let ctx = ctx();
        let request = ChunkRequest::from_key(&GenerationKey::new("gaps", IVec3::new(0, 0, 9), 3));
        let text = chunk(&ctx, &request, false).expect("chunk");
        assert!(text.contains("void gap depths: 10"));
    }

    #[test]
    fn test_locate() {
        let ctx = ctx();
        let text = locate(&ctx, "honolulu").expect("locate");
        assert!(text.contains("crust oceanic -> cover coral_reef_sand"));
        assert!(matches!(
            locate(&ctx, "nowhere"),
            Err(LithosError::LocationResolutionFailure(_))
        ));
    }

    #[test]
    fn test_excavate_reveals_and_persists() {
        let ctx = ctx();
        let mut store = MemoryStore::new(ctx.config_hash());
        let target = Target::Origin {
            origin: IVec3::ZERO,
            crust_class: "continental".into(),
            offsets: ProbabilityOffsets::new(),
        };
        let first = excavate(&ctx, &mut store, &target, "default_seed", 4, None, &[])
            .expect("excavate");
        assert!(first.contains("frontier"));
        assert_eq!(store.len(), 1);

        // Reveal every covered voxel at the frontier reported by the library.
        let key = GenerationKey::new("default_seed", IVec3::ZERO, 4);
        let cover = store
            .get(&key.store_key("continental"))
            .expect("get")
            .expect("stored cover");
        let frontier = lithos_world::frontier(&cover);
        let targets: Vec<UVec3> = (0..4)
            .flat_map(|x| (0..4).map(move |y| UVec3::new(x, y, frontier)))
            .filter(|&p| cover.get(p).is_some_and(|v| v.is_covered()))
            .collect();
        let text = excavate(&ctx, &mut store, &target, "default_seed", 4, None, &targets)
            .expect("excavate");
        assert_eq!(text.matches("revealed").count(), targets.len());
        assert_eq!(text.matches(" at [").count(), targets.len());

        let after = store
            .get(&key.store_key("continental"))
            .expect("get")
            .expect("stored cover");
        assert!(lithos_world::frontier(&after) > frontier);
    }

    #[test]
    fn test_excavate_rejects_bad_reveal() {
        let ctx = ctx();
        let target = Target::Location("Paris".into());
        let result = excavate(
            &ctx,
            MemoryStore::new(ctx.config_hash()),
            &target,
            "default_seed",
            4,
            None,
            &[UVec3::new(9, 9, 9)],
        );
        assert!(matches!(result, Err(LithosError::InvalidReveal { .. })));
    }
}
