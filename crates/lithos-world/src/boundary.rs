use std::collections::BTreeMap;

use glam::IVec3;
use lithos_core::constants::{DEFAULT_CHUNK_SIZE, DEFAULT_SEED};
use lithos_core::{CategoryId, CategoryTable, GenerationKey, LithosError, MaterialGrid, ProbabilityOffsets};
use serde::{Deserialize, Serialize};

use crate::generator::ChunkGenerator;

/// Chunk generation request as exchanged over JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkRequest {
    #[serde(default = "default_seed")]
    pub seed: String,
    #[serde(default)]
    pub x_offset: i32,
    #[serde(default)]
    pub y_offset: i32,
    #[serde(default)]
    pub z_offset: i32,
    #[serde(default = "default_size")]
    pub size: u32,
    #[serde(default)]
    pub probability_offsets: ProbabilityOffsets,
    #[serde(default)]
    pub allowed_minerals: Option<Vec<String>>,
    #[serde(default)]
    pub debug: bool,
}

fn default_seed() -> String {
    DEFAULT_SEED.to_string()
}

fn default_size() -> u32 {
    DEFAULT_CHUNK_SIZE
}

impl ChunkRequest {
    pub fn from_key(key: &GenerationKey) -> Self {
        Self {
            seed: key.seed.clone(),
            x_offset: key.origin.x,
            y_offset: key.origin.y,
            z_offset: key.origin.z,
            size: key.size,
            probability_offsets: key.offsets.clone(),
            allowed_minerals: key.allow.clone(),
            debug: false,
        }
    }

    pub fn key(&self) -> GenerationKey {
        GenerationKey::new(
            self.seed.clone(),
            IVec3::new(self.x_offset, self.y_offset, self.z_offset),
            self.size,
        )
        .with_offsets(self.probability_offsets.clone())
        .with_allow(self.allowed_minerals.clone())
    }

    pub fn to_json(&self) -> Result<String, LithosError> {
        serde_json::to_string(self).map_err(|e| transport(&e))
    }

    pub fn from_json(json: &str) -> Result<Self, LithosError> {
        serde_json::from_str(json).map_err(|e| transport(&e))
    }
}

/// Generated chunk as nested `[x][y][z]` category names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkResponse {
    pub chunk: Vec<Vec<Vec<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_info: Option<ChunkDebugInfo>,
}

impl ChunkResponse {
    pub fn to_json(&self) -> Result<String, LithosError> {
        serde_json::to_string(self).map_err(|e| transport(&e))
    }

    pub fn from_json(json: &str) -> Result<Self, LithosError> {
        serde_json::from_str(json).map_err(|e| transport(&e))
    }

    /// Intern the names back into a grid. A response of the wrong shape or
    /// naming unknown categories is a transport failure.
    pub fn to_grid(&self, table: &CategoryTable, size: u32) -> Result<MaterialGrid, LithosError> {
        let s = size as usize;
        let mut cells: Vec<CategoryId> = Vec::with_capacity(s * s * s);
        if self.chunk.len() != s {
            return Err(shape_error(size));
        }
        for plane in &self.chunk {
            if plane.len() != s {
                return Err(shape_error(size));
            }
            for column in plane {
                if column.len() != s {
                    return Err(shape_error(size));
                }
                for name in column {
                    let id = table.id(name).ok_or_else(|| {
                        LithosError::GenerationTransportFailure(format!(
                            "unknown category '{name}' in response"
                        ))
                    })?;
                    cells.push(id);
                }
            }
        }
        MaterialGrid::from_cells(size, cells).ok_or_else(|| shape_error(size))
    }
}

/// Diagnostic payload attached when a request sets `debug`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkDebugInfo {
    pub fingerprint: String,
    /// Cell count per category name, void included.
    pub category_counts: BTreeMap<String, u64>,
    pub depth_layers: Vec<DepthLayerInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepthLayerInfo {
    pub z: i32,
    /// None where the depth falls in a gap between layers.
    pub layer: Option<String>,
}

impl ChunkDebugInfo {
    pub fn collect(generator: &ChunkGenerator, key: &GenerationKey, grid: &MaterialGrid) -> Self {
        let categories = generator.categories();
        let mut counts = vec![0u64; categories.len()];
        for id in grid.cells() {
            if let Some(count) = counts.get_mut(id.index()) {
                *count += 1;
            }
        }
        let category_counts = categories
            .iter()
            .zip(counts)
            .filter(|(_, count)| *count > 0)
            .map(|((_, name), count)| (name.to_string(), count))
            .collect();
        let depth_layers = (0..key.size as i32)
            .map(|lz| {
                let z = key.origin.z + lz;
                DepthLayerInfo {
                    z,
                    layer: generator.layer_key(z).map(str::to_string),
                }
            })
            .collect();
        Self {
            fingerprint: key.fingerprint(),
            category_counts,
            depth_layers,
        }
    }
}

/// Anything that can answer chunk requests. Remote transports map their
/// failures to `GenerationTransportFailure`.
pub trait ChunkSource {
    fn fetch(&self, request: &ChunkRequest) -> Result<ChunkResponse, LithosError>;
}

/// Answers requests in-process with a shared generator.
#[derive(Debug, Clone)]
pub struct LocalChunkSource {
    generator: ChunkGenerator,
}

impl LocalChunkSource {
    pub fn new(generator: ChunkGenerator) -> Self {
        Self { generator }
    }
}

impl ChunkSource for LocalChunkSource {
    fn fetch(&self, request: &ChunkRequest) -> Result<ChunkResponse, LithosError> {
        let key = request.key();
        let grid = self.generator.generate(&key)?;
        let debug_info = request
            .debug
            .then(|| ChunkDebugInfo::collect(&self.generator, &key, &grid));
        Ok(ChunkResponse {
            chunk: grid.to_names(self.generator.categories()),
            debug_info,
        })
    }
}

/// Fetch a chunk through any source and intern it against `table`.
pub fn fetch_grid<C: ChunkSource + ?Sized>(
    source: &C,
    key: &GenerationKey,
    table: &CategoryTable,
) -> Result<MaterialGrid, LithosError> {
    source
        .fetch(&ChunkRequest::from_key(key))?
        .to_grid(table, key.size)
}

fn transport(err: &serde_json::Error) -> LithosError {
    LithosError::GenerationTransportFailure(err.to_string())
}

fn shape_error(size: u32) -> LithosError {
    LithosError::GenerationTransportFailure(format!("response is not a {size}^3 chunk"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::default_generator;

    /// Routes every request and response through JSON text.
    struct JsonWire(LocalChunkSource);

    impl ChunkSource for JsonWire {
        fn fetch(&self, request: &ChunkRequest) -> Result<ChunkResponse, LithosError> {
            let request = ChunkRequest::from_json(&request.to_json()?)?;
            ChunkResponse::from_json(&self.0.fetch(&request)?.to_json()?)
        }
    }

    struct Garbage;

    impl ChunkSource for Garbage {
        fn fetch(&self, _: &ChunkRequest) -> Result<ChunkResponse, LithosError> {
            ChunkResponse::from_json(r#"{"chunk": [[["quartz"]]], "extra": 1}"#)
        }
    }

    #[test]
    fn test_json_transport_is_bit_exact() {
        let generator = default_generator();
        let wire = JsonWire(LocalChunkSource::new(generator.clone()));
        let key = GenerationKey::new("wire", IVec3::new(-7, 3, 8), 6)
            .with_offsets(ProbabilityOffsets::from([("gold".to_string(), 0.25)]))
            .with_allow(Some(vec!["gold".into(), "quartz".into(), "void".into()]));
        let remote = fetch_grid(&wire, &key, generator.categories()).expect("fetch");
        assert_eq!(remote, generator.generate(&key).expect("generate"));
    }

    #[test]
    fn test_request_defaults() {
        let request = ChunkRequest::from_json("{}").expect("parse");
        assert_eq!(request.seed, DEFAULT_SEED);
        assert_eq!(request.size, DEFAULT_CHUNK_SIZE);
        assert!(request.allowed_minerals.is_none());
        assert!(!request.debug);
    }

    #[test]
    fn test_malformed_payloads_are_transport_failures() {
        assert!(matches!(
            ChunkRequest::from_json("{not json"),
            Err(LithosError::GenerationTransportFailure(_))
        ));
        let generator = default_generator();
        let key = GenerationKey::new("s", IVec3::ZERO, 2);
        assert!(matches!(
            fetch_grid(&Garbage, &key, generator.categories()),
            Err(LithosError::GenerationTransportFailure(_))
        ));
        let unknown = ChunkResponse {
            chunk: vec![vec![vec!["unobtainium".to_string()]]],
            debug_info: None,
        };
        assert!(matches!(
            unknown.to_grid(generator.categories(), 1),
            Err(LithosError::GenerationTransportFailure(_))
        ));
    }

    #[test]
    fn test_debug_info() {
        let generator = default_generator();
        let source = LocalChunkSource::new(generator.clone());
        let mut request = ChunkRequest::from_key(&GenerationKey::new("dbg", IVec3::new(0, 0, 8), 4));
        request.debug = true;
        let response = source.fetch(&request).expect("fetch");
        let info = response.debug_info.expect("debug info");
        assert_eq!(info.category_counts.values().sum::<u64>(), 64);
        assert_eq!(info.depth_layers.len(), 4);
        assert_eq!(info.depth_layers[1].layer.as_deref(), Some("0-10"));
        assert_eq!(info.depth_layers[2].layer, None);
        assert_eq!(info.depth_layers[3].layer.as_deref(), Some("11-35"));
        assert_eq!(info.fingerprint, request.key().fingerprint());

        request.debug = false;
        assert!(source.fetch(&request).expect("fetch").debug_info.is_none());
    }
}
