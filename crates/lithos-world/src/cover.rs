use glam::IVec3;
use lithos_core::grid::cell_count;
use lithos_core::{CoverGrid, GenerationKey, LithosError, MaterialGrid, VoxelState};
use rayon::prelude::*;

use crate::generator::ChunkGenerator;

/// Build the initial cover for a freshly generated chunk.
///
/// Each column is scanned from global depth 0 down to the bottom of the
/// window, reading the grid inside the window and the generator above it.
/// Depths in gaps or in layers that can only yield void under the key's
/// adjustments are skipped without sampling. The first solid cell found is covered when it lies inside the window;
/// everything else starts exposed, or void where there is no material.
pub fn initialize(
    generator: &ChunkGenerator,
    key: &GenerationKey,
    grid: &MaterialGrid,
    crust_class: &str,
) -> Result<CoverGrid, LithosError> {
    if grid.size() != key.size {
        return Err(LithosError::InvalidKey(format!(
            "material grid size {} does not match key size {}",
            grid.size(),
            key.size
        )));
    }

    let categories = generator.categories();
    let variant = generator.catalog().covers().resolve(crust_class);
    let adjustments = generator.adjustments(key);
    let size = key.size;
    let s = size as usize;
    let z0 = i64::from(key.origin.z);
    let end = z0 + i64::from(size);

    let solid_ranges = generator.solid_ranges(&adjustments);

    let mut cells = vec![VoxelState::Void; cell_count(size)];
    cells
        .par_chunks_mut(s * s)
        .enumerate()
        .for_each(|(lx, slab)| {
            for ly in 0..s {
                let column = grid.column(lx as u32, ly as u32);
                let gx = key.origin.x + lx as i32;
                let gy = key.origin.y + ly as i32;

                let mut first_solid = None;
                let mut gz = 0i64;
                while gz < z0 {
                    match next_solid_depth(&solid_ranges, gz) {
                        Some(next) if next < z0 => gz = next,
                        _ => break,
                    }
                    let material =
                        generator.sample_cell(&key.seed, IVec3::new(gx, gy, gz as i32), &adjustments);
                    if !categories.is_void(material) {
                        first_solid = Some(gz);
                        break;
                    }
                    gz += 1;
                }
                if first_solid.is_none() {
                    first_solid = (z0.max(0)..end)
                        .find(|&gz| !categories.is_void(column[(gz - z0) as usize]));
                }

                let out = &mut slab[ly * s..(ly + 1) * s];
                for (lz, (state, &material)) in out.iter_mut().zip(column).enumerate() {
                    *state = if first_solid == Some(z0 + lz as i64) {
                        VoxelState::Covered(variant)
                    } else if categories.is_void(material) {
                        VoxelState::Void
                    } else {
                        VoxelState::Exposed(material)
                    };
                }
            }
        });

    let cover = CoverGrid::from_cells(size, cells).ok_or_else(|| {
        LithosError::InvalidKey(format!("cannot build a cover grid of size {size}"))
    })?;
    log::debug!(
        "Initialized cover for {} ({crust_class}): {} covered voxels, variant {}",
        key.origin,
        cover.covered_count(),
        generator.catalog().covers().variant_name(variant)
    );
    Ok(cover)
}

/// Smallest depth at or after `z` inside one of `ranges`.
fn next_solid_depth(ranges: &[(i32, Option<i32>)], z: i64) -> Option<i64> {
    ranges
        .iter()
        .filter(|(_, high)| high.map_or(true, |high| z < i64::from(high)))
        .map(|(low, _)| z.max(i64::from(*low)))
        .min()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{default_generator, small_generator};
    use lithos_core::CoverVariantId;

    fn build(generator: &ChunkGenerator, key: &GenerationKey, crust: &str) -> CoverGrid {
        let grid = generator.generate(key).expect("generate");
        initialize(generator, key, &grid, crust).expect("initialize")
    }

    #[test]
    fn test_small_scenario_covers_first_solid_layer() {
        let generator = small_generator();
        let quartz = generator.categories().id("quartz").expect("quartz");
        let key = GenerationKey::new("default_seed", IVec3::ZERO, 4);
        let cover = build(&generator, &key, "continental");
        let variant = CoverVariantId(0);
        for x in 0..4 {
            for y in 0..4 {
                assert_eq!(
                    cover.column(x, y),
                    &[
                        VoxelState::Void,
                        VoxelState::Void,
                        VoxelState::Covered(variant),
                        VoxelState::Exposed(quartz),
                    ]
                );
            }
        }
    }

    #[test]
    fn test_at_most_one_cover_per_column() {
        let generator = default_generator();
        for origin in [
            IVec3::ZERO,
            IVec3::new(17, -4, 0),
            IVec3::new(0, 0, 9),
            IVec3::new(-30, 12, -3),
            IVec3::new(5, 5, 34),
        ] {
            let key = GenerationKey::new("columns", origin, 8);
            let cover = build(&generator, &key, "oceanic");
            for x in 0..8 {
                for y in 0..8 {
                    let covered = cover.column(x, y).iter().filter(|v| v.is_covered()).count();
                    assert!(covered <= 1, "column ({x}, {y}) at {origin} has {covered}");
                }
            }
        }
    }

    #[test]
    fn test_window_below_first_solid_has_no_cover() {
        // The solid layer starts at z=2, above a window beginning at z=3.
        let generator = small_generator();
        let key = GenerationKey::new("default_seed", IVec3::new(0, 0, 3), 4);
        let cover = build(&generator, &key, "continental");
        assert_eq!(cover.covered_count(), 0);
        assert!(cover
            .cells()
            .iter()
            .all(|v| matches!(v, VoxelState::Exposed(_))));
    }

    #[test]
    fn test_window_straddling_surface() {
        let generator = small_generator();
        let key = GenerationKey::new("default_seed", IVec3::new(0, 0, -2), 6);
        let cover = build(&generator, &key, "continental");
        // local depth 4 is global depth 2
        assert!(cover.column(0, 0)[..4].iter().all(|v| *v == VoxelState::Void));
        assert!(cover.column(0, 0)[4].is_covered());
        assert_eq!(cover.covered_count(), 36);
    }

    #[test]
    fn test_crust_selects_variant() {
        let generator = default_generator();
        let covers = generator.catalog().covers();
        let key = GenerationKey::new("crust", IVec3::ZERO, 4);
        for (crust, expected) in [
            ("oceanic", "coral_reef_sand"),
            ("volcanic_subduction", "coral_reef_sand"),
            ("continental", "clayey_mudflat"),
        ] {
            let cover = build(&generator, &key, crust);
            for state in cover.cells() {
                if let VoxelState::Covered(variant) = state {
                    assert_eq!(covers.variant_name(*variant), expected);
                }
            }
        }
    }

    #[test]
    fn test_exposed_cells_carry_their_material() {
        let generator = default_generator();
        let key = GenerationKey::new("exposed", IVec3::new(2, 2, 0), 8);
        let grid = generator.generate(&key).expect("generate");
        let cover = initialize(&generator, &key, &grid, "continental").expect("initialize");
        for (state, &material) in cover.cells().iter().zip(grid.cells()) {
            match state {
                VoxelState::Exposed(id) => assert_eq!(*id, material),
                VoxelState::Void => assert!(generator.categories().is_void(material)),
                VoxelState::Covered(_) => assert!(!generator.categories().is_void(material)),
            }
        }
    }

    /// Cell-by-cell scan from depth 0, sampling every depth above the window.
    fn first_solid_by_sampling(
        generator: &ChunkGenerator,
        key: &GenerationKey,
        lx: i32,
        ly: i32,
    ) -> Option<i32> {
        let adjustments = generator.adjustments(key);
        let pos = |z| IVec3::new(key.origin.x + lx, key.origin.y + ly, z);
        (0..key.origin.z + key.size as i32).find(|&z| {
            !generator
                .categories()
                .is_void(generator.sample_cell(&key.seed, pos(z), &adjustments))
        })
    }

    #[test]
    fn test_skipping_void_layers_matches_full_scan() {
        let generator = default_generator();
        for (origin, allow) in [
            (IVec3::new(0, 0, 30), vec!["olivine"]),
            (IVec3::new(3, -2, 40), vec!["diamond"]),
            (IVec3::new(-5, 5, 20), vec!["pyrite", "void"]),
            (IVec3::new(1, 1, 0), vec!["gypsum"]),
        ] {
            let key = GenerationKey::new("skip", origin, 8)
                .with_allow(Some(allow.iter().map(|s| s.to_string()).collect()));
            let cover = build(&generator, &key, "continental");
            for x in 0..8u32 {
                for y in 0..8u32 {
                    let expected = first_solid_by_sampling(&generator, &key, x as i32, y as i32)
                        .filter(|&z| z >= origin.z)
                        .map(|z| (z - origin.z) as usize);
                    let actual = cover.column(x, y).iter().position(|v| v.is_covered());
                    assert_eq!(actual, expected, "column ({x}, {y}) at {origin}");
                }
            }
        }
    }

    #[test]
    fn test_deep_window_with_void_only_allow_list() {
        let generator = default_generator();
        let key = GenerationKey::new("deep", IVec3::new(0, 0, 200_000_000), 8)
            .with_allow(Some(vec!["void".to_string()]));
        let cover = build(&generator, &key, "oceanic");
        assert_eq!(cover.covered_count(), 0);
        assert!(cover.cells().iter().all(|v| *v == VoxelState::Void));
    }

    #[test]
    fn test_next_solid_depth_jumps_gaps() {
        let ranges = [(0, Some(10)), (11, Some(35)), (36, None)];
        assert_eq!(next_solid_depth(&ranges, 4), Some(4));
        assert_eq!(next_solid_depth(&ranges, 10), Some(11));
        assert_eq!(next_solid_depth(&ranges, 35), Some(36));
        assert_eq!(next_solid_depth(&ranges, 9_000), Some(9_000));
        assert_eq!(next_solid_depth(&[(11, Some(35))], 35), None);
        assert_eq!(next_solid_depth(&[], 0), None);
    }

    #[test]
    fn test_size_mismatch_rejected() {
        let generator = small_generator();
        let grid = generator
            .generate(&GenerationKey::new("s", IVec3::ZERO, 2))
            .expect("generate");
        let key = GenerationKey::new("s", IVec3::ZERO, 3);
        assert!(matches!(
            initialize(&generator, &key, &grid, "continental"),
            Err(LithosError::InvalidKey(_))
        ));
    }
}
