// Data-driven game configuration.
//
// Every tunable the simulation reads lives in `GameConfig`: map size, need
// decay and thresholds, skill progression, effect durations, world
// generation parameters, and the catalog tables from `catalog.rs`. The sim
// never hardcodes a balance number; it asks the config. `Default` carries
// the stock colony; `from_json` / `load` read an override file and run
// `validate()` so a bad file is rejected up front instead of surfacing as
// odd behaviour mid-run.
//
// Parameters are grouped into nested structs (`NeedsConfig`,
// `SkillConfig`, `EffectConfig`, `WorldGenConfig`) so a JSON override can
// replace one group without restating the rest (`#[serde(default)]`).
//
// See also: `catalog.rs` for the structure/terrain/crop/food tables,
// `recruit.rs` for `PawnProfile` used by the starting roster, `sim.rs`
// which owns the config as part of `SimState`.
//
// **Critical constraint: determinism.** Two runs only match if they use
// identical configs.

use crate::catalog::{
    CropDef, FoodDef, StructureDef, TerrainDef, default_crops, default_food, default_structures,
    default_terrain,
};
use crate::error::ConfigError;
use crate::recruit::PawnProfile;
use crate::types::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

// ---------------------------------------------------------------------------
// Parameter groups
// ---------------------------------------------------------------------------

/// Need decay, replenishment and the thresholds that drive emergencies.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NeedsConfig {
    pub food_decay_per_tick: f32,
    pub sleep_decay_per_tick: f32,
    pub recreation_decay_per_tick: f32,
    pub sleep_replenish_per_tick: f32,
    /// Recreation restored per tick while a pawn performs a recreation activity.
    pub recreation_replenish_per_tick: f32,
    /// Below this a pawn is Hungry and goes looking for food.
    pub food_critical: f32,
    /// Below this a pawn is Tired and collapses into sleep.
    pub sleep_critical: f32,
    /// Below this a pawn is Bored and seeks recreation.
    pub recreation_critical: f32,
    /// Recreation level under which idle pawns roll the higher boredom chance.
    pub boredom_threshold: f32,
    pub bored_roll_chance: f64,
    pub content_roll_chance: f64,
    /// Consecutive Hungry ticks before a pawn dies.
    pub starvation_death_ticks: u32,
    /// Nutrition assumed for edible items missing from the food table.
    pub default_nutrition: f32,
}

impl Default for NeedsConfig {
    fn default() -> Self {
        Self {
            food_decay_per_tick: 0.08,
            sleep_decay_per_tick: 0.05,
            recreation_decay_per_tick: 0.06,
            sleep_replenish_per_tick: 0.5,
            recreation_replenish_per_tick: 1.5,
            food_critical: 15.0,
            sleep_critical: 10.0,
            recreation_critical: 20.0,
            boredom_threshold: 80.0,
            bored_roll_chance: 0.1,
            content_roll_chance: 0.01,
            starvation_death_ticks: 300,
            default_nutrition: 50.0,
        }
    }
}

/// XP, levelling and how skill level scales work speed and yield.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillConfig {
    pub xp_per_work_tick: u32,
    /// XP to leave level 0.
    pub xp_level_base: u32,
    /// Extra XP required per level already gained.
    pub xp_level_step: u32,
    /// Progress multiplier gained per skill level (`1 + level * bonus`).
    pub progress_bonus_per_level: f32,
    /// Yield multiplier at level 0.
    pub yield_base: f32,
    /// Extra yield multiplier reached at the maximum level.
    pub yield_at_max_level: f32,
}

impl Default for SkillConfig {
    fn default() -> Self {
        Self {
            xp_per_work_tick: 5,
            xp_level_base: 100,
            xp_level_step: 50,
            progress_bonus_per_level: 0.1,
            yield_base: 0.5,
            yield_at_max_level: 1.5,
        }
    }
}

impl SkillConfig {
    /// XP needed to advance from `level` to `level + 1`.
    pub fn xp_to_next_level(&self, level: u8) -> u32 {
        self.xp_level_base + self.xp_level_step * u32::from(level)
    }

    /// Yield multiplier for a gathering or harvest at `level`.
    pub fn yield_multiplier(&self, level: u8) -> f32 {
        self.yield_base + f32::from(level) / f32::from(MAX_SKILL_LEVEL) * self.yield_at_max_level
    }

    /// Progress multiplier for work at `level`.
    pub fn progress_multiplier(&self, level: u8) -> f32 {
        1.0 + f32::from(level) * self.progress_bonus_per_level
    }
}

/// Effect durations and movement speed modifiers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectConfig {
    pub base_speed: f32,
    /// Speed added or removed per active speed-affecting effect.
    pub speed_step: f32,
    pub min_speed: f32,
    pub well_rested_ticks: u32,
    pub sated_ticks: u32,
    pub joy_ticks: u32,
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            base_speed: 1.0,
            speed_step: 0.1,
            min_speed: 0.1,
            well_rested_ticks: 600,
            sated_ticks: 600,
            joy_ticks: 400,
        }
    }
}

/// One entry of the starting roster.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StartingPawn {
    pub profile: PawnProfile,
    pub position: GridCoord,
}

/// Terrain noise, landing zone, initial resources and starting pawns.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldGenConfig {
    /// Noise frequency applied to cell coordinates.
    pub noise_scale: f64,
    pub stone_above: f64,
    pub deep_water_below: f64,
    pub shallow_water_below: f64,
    pub marsh_below: f64,
    /// Side of the square lava lake (0 disables it).
    pub lava_lake_size: u32,
    /// Chance each lava lake cell actually becomes lava.
    pub lava_cell_chance: f64,
    /// Inclusive corners of the zone kept clear of obstacles and forced to soil.
    pub landing_zone_min: GridCoord,
    pub landing_zone_max: GridCoord,
    pub placement_attempts: u32,
    /// Natural structures placed at world creation, in placement order.
    pub initial_resources: Vec<(StructureKind, u32)>,
    pub starting_pawns: Vec<StartingPawn>,
}

impl Default for WorldGenConfig {
    fn default() -> Self {
        let skills = |levels: [i64; SKILL_COUNT]| -> BTreeMap<SkillKind, i64> {
            SkillKind::ALL.into_iter().zip(levels).collect()
        };
        Self {
            noise_scale: 0.1,
            stone_above: 0.6,
            deep_water_below: -0.7,
            shallow_water_below: -0.5,
            marsh_below: -0.3,
            lava_lake_size: 3,
            lava_cell_chance: 0.8,
            landing_zone_min: GridCoord::new(10, 10),
            landing_zone_max: GridCoord::new(15, 15),
            placement_attempts: 50,
            initial_resources: vec![
                (StructureKind::Tree, 20),
                (StructureKind::BerryBush, 12),
                (StructureKind::Boulder, 10),
                (StructureKind::SteelVein, 5),
                (StructureKind::SilverVein, 2),
                (StructureKind::GoldVein, 1),
                (StructureKind::UraniumVein, 1),
            ],
            starting_pawns: vec![
                StartingPawn {
                    profile: PawnProfile {
                        name: "Crash".to_string(),
                        backstory: "A former demolition engineer who walked away from the \
                                    blast unscathed."
                            .to_string(),
                        skills: skills([5, 2, 1, 3, 3, 0, 4]),
                        color: Some("#ef4444".to_string()),
                    },
                    position: GridCoord::new(12, 12),
                },
                StartingPawn {
                    profile: PawnProfile {
                        name: "Serenity".to_string(),
                        backstory: "A botanist who tended the hydroponics bay until the landing."
                            .to_string(),
                        skills: skills([2, 5, 8, 1, 5, 2, 1]),
                        color: Some("#22c55e".to_string()),
                    },
                    position: GridCoord::new(13, 12),
                },
            ],
        }
    }
}

impl WorldGenConfig {
    pub fn in_landing_zone(&self, c: GridCoord) -> bool {
        c.x >= self.landing_zone_min.x
            && c.x <= self.landing_zone_max.x
            && c.y >= self.landing_zone_min.y
            && c.y <= self.landing_zone_max.y
    }

    /// Centre of the landing zone, where recruits without a position arrive.
    pub fn landing_site(&self) -> GridCoord {
        GridCoord::new(
            (self.landing_zone_min.x + self.landing_zone_max.x) / 2,
            (self.landing_zone_min.y + self.landing_zone_max.y) / 2,
        )
    }
}

// ---------------------------------------------------------------------------
// GameConfig
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub map_width: u32,
    pub map_height: u32,
    pub needs: NeedsConfig,
    pub skills: SkillConfig,
    pub effects: EffectConfig,
    pub worldgen: WorldGenConfig,
    /// Per-tick chance that a tree or bush springs up somewhere.
    pub natural_spawn_chance: f64,
    /// Fraction of natural spawns that are trees (the rest are berry bushes).
    pub natural_spawn_tree_fraction: f64,
    /// Growth added per tick to immature trees and bushes.
    pub natural_growth_per_tick: f32,
    /// Berry bushes must reach this growth before batch harvest picks them up.
    pub berry_harvest_min_growth: f32,
    /// Upper bound on structures a single batch order can target.
    pub batch_limit: usize,
    pub construction_duration_ticks: u32,
    /// Number of log entries kept on `SimState`.
    pub log_history_len: usize,
    pub structures: BTreeMap<StructureKind, StructureDef>,
    pub terrain: BTreeMap<TerrainKind, TerrainDef>,
    pub crops: BTreeMap<CropKind, CropDef>,
    pub food: BTreeMap<ItemKind, FoodDef>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            map_width: 32,
            map_height: 32,
            needs: NeedsConfig::default(),
            skills: SkillConfig::default(),
            effects: EffectConfig::default(),
            worldgen: WorldGenConfig::default(),
            natural_spawn_chance: 0.01,
            natural_spawn_tree_fraction: 0.4,
            natural_growth_per_tick: 0.2,
            berry_harvest_min_growth: 80.0,
            batch_limit: 20,
            construction_duration_ticks: 20,
            log_history_len: 50,
            structures: default_structures(),
            terrain: default_terrain(),
            crops: default_crops(),
            food: default_food(),
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json(&text)?;
        tracing::info!(path = %path.display(), "loaded game config");
        Ok(config)
    }

    /// Check internal consistency: every enum key present, positive durations,
    /// sane map and batch sizes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.map_width == 0 || self.map_height == 0 {
            return Err(ConfigError::OutOfRange {
                field: "map_width/map_height",
                reason: "map must be at least 1x1",
            });
        }
        if self.batch_limit == 0 {
            return Err(ConfigError::OutOfRange {
                field: "batch_limit",
                reason: "must be at least 1",
            });
        }
        if self.construction_duration_ticks == 0 {
            return Err(ConfigError::OutOfRange {
                field: "construction_duration_ticks",
                reason: "must be positive",
            });
        }
        if self.needs.starvation_death_ticks == 0 {
            return Err(ConfigError::OutOfRange {
                field: "needs.starvation_death_ticks",
                reason: "must be positive",
            });
        }
        if !(0.0..=1.0).contains(&self.natural_spawn_chance) {
            return Err(ConfigError::OutOfRange {
                field: "natural_spawn_chance",
                reason: "must be a probability",
            });
        }
        for kind in StructureKind::ALL {
            let def = self
                .structures
                .get(&kind)
                .ok_or(ConfigError::MissingStructure(kind))?;
            if def.width == 0 || def.height == 0 {
                return Err(ConfigError::OutOfRange {
                    field: "structures.width/height",
                    reason: "footprint must be at least 1x1",
                });
            }
            if let Some(act) = def.activities.iter().find(|a| a.duration_ticks == 0) {
                return Err(ConfigError::ZeroDuration {
                    structure: kind,
                    activity: act.id,
                });
            }
        }
        if let Some(missing) = TerrainKind::ALL
            .iter()
            .find(|t| !self.terrain.contains_key(t))
        {
            return Err(ConfigError::IncompleteTable(format!("terrain {missing:?}")));
        }
        if let Some(missing) = CropKind::ALL.iter().find(|c| !self.crops.contains_key(c)) {
            return Err(ConfigError::IncompleteTable(format!("crop {missing:?}")));
        }
        Ok(())
    }

    pub fn structure_def(&self, kind: StructureKind) -> Option<&StructureDef> {
        self.structures.get(&kind)
    }

    pub fn terrain_def(&self, kind: TerrainKind) -> Option<&TerrainDef> {
        self.terrain.get(&kind)
    }

    /// Nutrition for an item, or `None` if it is not food.
    pub fn nutrition(&self, item: ItemKind) -> Option<f32> {
        self.food.get(&item).map(|f| f.nutrition)
    }

    pub fn is_cooked(&self, item: ItemKind) -> bool {
        self.food.get(&item).is_some_and(|f| f.cooked)
    }
}
