// World generation: terrain, initial resources and the starting roster.
//
// Runs once when a `SimState` is created from a seed. All randomness comes
// from the sim's `GameRng`, so the same seed and config always yield the same
// map. Generation happens in three passes:
//
// 1. Terrain. A smooth sin/cos field offset by a per-world phase drawn from
//    the RNG, thresholded into stone, deep water, shallow water, marsh and
//    soil. Then a small lava lake is dropped at a random spot (each cell
//    lava with `lava_cell_chance`), and finally the landing zone is forced
//    back to soil so the colonists always arrive on solid ground.
// 2. Resources. For each `(kind, count)` in `initial_resources`, in order,
//    up to `placement_attempts` random cells are tried per instance. A cell
//    is rejected if another structure already has its origin there, the
//    terrain is not fertile (water, lava), or it lies in the landing zone.
//    An instance that finds no cell is skipped. Growing structures start
//    fully grown.
// 3. Pawns. Each `StartingPawn` profile becomes a pawn at its position,
//    arriving with the Joy effect.
//
// See also: `sim.rs` which calls `generate()` from `SimState::with_config`,
// `config.rs` for `WorldGenConfig`, `recruit.rs` for `pawn_from_profile`.

use crate::config::GameConfig;
use crate::pawn::Pawn;
use crate::prng::GameRng;
use crate::recruit::pawn_from_profile;
use crate::structure::{GROWTH_MAX, Structure};
use crate::types::*;
use crate::world::TileGrid;
use std::collections::BTreeMap;
use tracing::debug;

/// Output of world generation, moved into a fresh `SimState`.
#[derive(Clone, Debug)]
pub struct GeneratedWorld {
    pub grid: TileGrid,
    pub structures: BTreeMap<StructureId, Structure>,
    pub pawns: BTreeMap<PawnId, Pawn>,
}

pub fn generate(rng: &mut GameRng, config: &GameConfig) -> GeneratedWorld {
    let grid = generate_terrain(rng, config);
    let structures = place_resources(rng, &grid, config);
    let pawns = starting_pawns(rng, config);
    debug!(
        structures = structures.len(),
        pawns = pawns.len(),
        "world generated"
    );
    GeneratedWorld {
        grid,
        structures,
        pawns,
    }
}

fn classify(value: f64, config: &GameConfig) -> TerrainKind {
    let wg = &config.worldgen;
    if value > wg.stone_above {
        TerrainKind::Stone
    } else if value < wg.deep_water_below {
        TerrainKind::DeepWater
    } else if value < wg.shallow_water_below {
        TerrainKind::ShallowWater
    } else if value < wg.marsh_below {
        TerrainKind::Marsh
    } else {
        TerrainKind::Soil
    }
}

pub fn generate_terrain(rng: &mut GameRng, config: &GameConfig) -> TileGrid {
    let wg = &config.worldgen;
    let mut grid = TileGrid::new(config.map_width, config.map_height, TerrainKind::Soil);

    let phase = rng.next_f64();
    for c in grid.coords() {
        let value = (f64::from(c.x) * wg.noise_scale + phase * 10.0).sin()
            * (f64::from(c.y) * wg.noise_scale + phase * 20.0).cos();
        grid.set(c, classify(value, config));
    }

    if wg.lava_lake_size > 0 {
        let span = |extent: u32| {
            let room = extent.saturating_sub(wg.lava_lake_size + 1).max(1);
            i32::try_from(room).unwrap_or(1)
        };
        let origin = GridCoord::new(
            rng.range_i32(0, span(config.map_width)),
            rng.range_i32(0, span(config.map_height)),
        );
        let size = wg.lava_lake_size as i32;
        for dy in 0..size {
            for dx in 0..size {
                if rng.chance(wg.lava_cell_chance) {
                    grid.set(origin.offset(dx, dy), TerrainKind::Lava);
                }
            }
        }
        debug!(at = %origin, size, "lava lake placed");
    }

    for c in grid.coords() {
        if wg.in_landing_zone(c) {
            grid.set(c, TerrainKind::Soil);
        }
    }
    grid
}

fn place_resources(
    rng: &mut GameRng,
    grid: &TileGrid,
    config: &GameConfig,
) -> BTreeMap<StructureId, Structure> {
    let wg = &config.worldgen;
    let mut structures = BTreeMap::new();
    let width = i32::try_from(grid.width).unwrap_or(i32::MAX);
    let height = i32::try_from(grid.height).unwrap_or(i32::MAX);
    if width == 0 || height == 0 {
        return structures;
    }

    for &(kind, count) in &wg.initial_resources {
        let grows = config.structure_def(kind).is_some_and(|d| d.grows);
        let mut placed = 0;
        for _ in 0..count {
            let mut spot = None;
            for _ in 0..wg.placement_attempts {
                let c = GridCoord::new(rng.range_i32(0, width), rng.range_i32(0, height));
                let fertile = grid
                    .get(c)
                    .and_then(|t| config.terrain_def(t))
                    .is_some_and(|d| d.fertile);
                let occupied = structures.values().any(|s: &Structure| s.origin == c);
                if fertile && !occupied && !wg.in_landing_zone(c) {
                    spot = Some(c);
                    break;
                }
            }
            let Some(origin) = spot else { continue };
            let id = StructureId::new(rng);
            let mut structure = Structure::new(id, kind, origin);
            if grows {
                structure.growth = Some(GROWTH_MAX);
            }
            structures.insert(id, structure);
            placed += 1;
        }
        debug!(kind = ?kind, requested = count, placed, "initial resources");
    }
    structures
}

fn starting_pawns(rng: &mut GameRng, config: &GameConfig) -> BTreeMap<PawnId, Pawn> {
    let mut pawns = BTreeMap::new();
    for start in &config.worldgen.starting_pawns {
        let mut pawn = pawn_from_profile(rng, Some(&start.profile), start.position);
        pawn.grant_effect(EffectKind::Joy, config.effects.joy_ticks);
        pawns.insert(pawn.id, pawn);
    }
    pawns
}
