// Static game data: structure, terrain, crop and food definitions.
//
// The catalog is plain data owned by `GameConfig` (see `config.rs`) and
// keyed by the closed enums in `types.rs`. Nothing here mutates at runtime.
// The `default_*` constructors build the stock catalog the colony ships
// with; a JSON config can replace any table wholesale.
//
// A `StructureDef` describes footprint, placement layer, build cost,
// passability and the activities a built structure offers. Activities carry
// their action kind, the skill and minimum level they need, a duration in
// ticks, and input/output item lists. Construction is not listed: every
// blueprint implicitly offers `ActivityId::Construct` with the structure's
// `cost` as its inputs.
//
// See also: `structure_sim.rs` which executes activities, `assignment.rs`
// which resolves an activity's inputs before handing a job to a pawn,
// `worldgen.rs` which places the natural structures defined here.

use crate::inventory::ItemStack;
use crate::types::*;
use serde::{Deserialize, Serialize};
use smallvec::{SmallVec, smallvec};
use std::collections::BTreeMap;

/// Cost, input and output lists rarely exceed two entries.
pub type ItemList = SmallVec<[ItemStack; 2]>;

// ---------------------------------------------------------------------------
// Structures and activities
// ---------------------------------------------------------------------------

/// Broad behaviour class of a structure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StructureRole {
    /// Walls, floors and workstations.
    Building,
    /// Holds items that assignment can withdraw from.
    Storage,
    /// Grows one planted crop at a time; never destroyed by harvesting.
    FarmPlot,
    /// Map resources. Destroyed by their gathering activity.
    Natural,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActivityDef {
    pub id: ActivityId,
    pub name: String,
    pub action: ActionKind,
    /// Skill that gains XP and scales progress and yield.
    pub skill: SkillKind,
    /// Minimum level of `skill` a pawn needs to be assigned the activity.
    pub required_level: u8,
    pub duration_ticks: u32,
    #[serde(default)]
    pub inputs: ItemList,
    #[serde(default)]
    pub outputs: ItemList,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StructureDef {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub layer: Layer,
    pub role: StructureRole,
    /// Whether pawns can walk through the footprint once built.
    pub passable: bool,
    /// Movement multiplier for pawns standing on this structure (floors).
    #[serde(default = "default_walk_multiplier")]
    pub walk_speed_multiplier: f32,
    /// Whether the structure carries a 0–100 growth value that scales its
    /// gathered yield (trees and bushes).
    #[serde(default)]
    pub grows: bool,
    #[serde(default)]
    pub cost: ItemList,
    #[serde(default)]
    pub activities: Vec<ActivityDef>,
}

fn default_walk_multiplier() -> f32 {
    1.0
}

impl StructureDef {
    pub fn activity(&self, id: ActivityId) -> Option<&ActivityDef> {
        self.activities.iter().find(|a| a.id == id)
    }

    /// Every cell covered when the structure's origin is at `origin`.
    pub fn footprint(&self, origin: GridCoord) -> Vec<GridCoord> {
        let (w, h) = (self.width as i32, self.height as i32);
        (0..h)
            .flat_map(|dy| (0..w).map(move |dx| origin.offset(dx, dy)))
            .collect()
    }

    pub fn activities_of(&self, action: ActionKind) -> impl Iterator<Item = &ActivityDef> + '_ {
        self.activities.iter().filter(move |a| a.action == action)
    }
}

#[allow(clippy::too_many_arguments)]
fn activity(
    id: ActivityId,
    name: &str,
    action: ActionKind,
    skill: SkillKind,
    required_level: u8,
    duration_ticks: u32,
    inputs: ItemList,
    outputs: ItemList,
) -> ActivityDef {
    ActivityDef {
        id,
        name: name.to_string(),
        action,
        skill,
        required_level,
        duration_ticks,
        inputs,
        outputs,
    }
}

fn structure(
    name: &str,
    (width, height): (u32, u32),
    layer: Layer,
    role: StructureRole,
    passable: bool,
    cost: ItemList,
    activities: Vec<ActivityDef>,
) -> StructureDef {
    StructureDef {
        name: name.to_string(),
        width,
        height,
        layer,
        role,
        passable,
        walk_speed_multiplier: 1.0,
        grows: false,
        cost,
        activities,
    }
}

fn stack(item: ItemKind, quantity: u32) -> ItemStack {
    ItemStack::new(item, quantity)
}

/// The stock structure catalog.
pub fn default_structures() -> BTreeMap<StructureKind, StructureDef> {
    use ActionKind::*;
    use ActivityId as A;
    use ItemKind as I;
    use SkillKind as S;
    use StructureRole::*;

    // Activities that take no items and produce none.
    let plain = |id: A, name: &str, action: ActionKind, skill: S, level: u8, ticks: u32| {
        activity(id, name, action, skill, level, ticks, smallvec![], smallvec![])
    };
    let gather = |id: A, name: &str, skill: S, level: u8, ticks: u32, out: ItemStack| {
        activity(id, name, Gather, skill, level, ticks, smallvec![], smallvec![out])
    };
    let mine = |id: A, name: &str, level: u8, ticks: u32, out: ItemStack| {
        gather(id, name, S::Mining, level, ticks, out)
    };
    let vein = |name: &str, act: ActivityDef| {
        structure(name, (1, 1), Layer::Object, Natural, false, smallvec![], vec![act])
    };
    let wall = |name: &str, cost: ItemStack| {
        structure(name, (1, 1), Layer::Object, Building, false, smallvec![cost], vec![])
    };

    let mut wood_floor = structure(
        "Wood Floor",
        (1, 1),
        Layer::Floor,
        Building,
        true,
        smallvec![stack(I::Wood, 2)],
        vec![],
    );
    wood_floor.walk_speed_multiplier = 1.2;
    let mut stone_floor = structure(
        "Stone Floor",
        (1, 1),
        Layer::Floor,
        Building,
        true,
        smallvec![stack(I::Stone, 2)],
        vec![],
    );
    stone_floor.walk_speed_multiplier = 1.3;

    let mut tree = structure(
        "Tree",
        (1, 1),
        Layer::Object,
        Natural,
        false,
        smallvec![],
        vec![
            gather(A::ChopWood, "Chop Wood", S::Plants, 0, 20, stack(I::Wood, 15)),
            plain(A::ClimbTree, "Climb Tree", Recreation, S::Melee, 0, 25),
            plain(A::HugTree, "Hug Tree", Recreation, S::Social, 0, 15),
        ],
    );
    tree.grows = true;
    let mut bush = structure(
        "Berry Bush",
        (1, 1),
        Layer::Object,
        Natural,
        true,
        smallvec![],
        vec![
            gather(A::HarvestBerry, "Harvest Berries", S::Plants, 0, 10, stack(I::Berries, 8)),
            plain(A::HideInBush, "Hide in Bush", Recreation, S::Plants, 0, 20),
        ],
    );
    bush.grows = true;

    BTreeMap::from([
        (StructureKind::WoodWall, wall("Wood Wall", stack(I::Wood, 5))),
        (StructureKind::StoneWall, wall("Stone Wall", stack(I::Stone, 5))),
        (StructureKind::SteelWall, wall("Steel Wall", stack(I::Steel, 5))),
        (StructureKind::WoodFloor, wood_floor),
        (StructureKind::StoneFloor, stone_floor),
        (
            StructureKind::Campfire,
            structure(
                "Campfire",
                (1, 1),
                Layer::Object,
                Building,
                true,
                smallvec![stack(I::Wood, 10)],
                vec![
                    activity(
                        A::CookSimple,
                        "Cook Simple Meal",
                        Craft,
                        S::Cooking,
                        0,
                        10,
                        smallvec![stack(I::Berries, 5)],
                        smallvec![stack(I::SimpleMeal, 1)],
                    ),
                    activity(
                        A::CookFine,
                        "Cook Fine Meal",
                        Craft,
                        S::Cooking,
                        5,
                        20,
                        smallvec![stack(I::RawMeat, 5)],
                        smallvec![stack(I::FineMeal, 1)],
                    ),
                ],
            ),
        ),
        (
            StructureKind::ButcherTable,
            structure(
                "Butcher Table",
                (2, 1),
                Layer::Object,
                Building,
                false,
                smallvec![stack(I::Wood, 20)],
                vec![activity(
                    A::ButcherCreature,
                    "Butcher Creature",
                    Craft,
                    S::Cooking,
                    2,
                    15,
                    smallvec![],
                    smallvec![stack(I::RawMeat, 10)],
                )],
            ),
        ),
        (
            StructureKind::ResearchBench,
            structure(
                "Research Bench",
                (2, 2),
                Layer::Object,
                Building,
                false,
                smallvec![stack(I::Wood, 30), stack(I::Steel, 10)],
                vec![plain(A::ResearchBasic, "Basic Research", Craft, S::Intellectual, 3, 40)],
            ),
        ),
        (
            StructureKind::Workbench,
            structure(
                "Workbench",
                (2, 1),
                Layer::Object,
                Building,
                false,
                smallvec![stack(I::Wood, 25)],
                vec![activity(
                    A::CraftClub,
                    "Craft Wooden Club",
                    Craft,
                    S::Construction,
                    2,
                    30,
                    smallvec![stack(I::Wood, 10)],
                    smallvec![stack(I::WoodenClub, 1)],
                )],
            ),
        ),
        (
            StructureKind::ChessTable,
            structure(
                "Chess Table",
                (1, 1),
                Layer::Object,
                Building,
                false,
                smallvec![stack(I::Wood, 20), stack(I::Steel, 5)],
                vec![plain(A::PlayChess, "Play Chess", Recreation, S::Intellectual, 0, 40)],
            ),
        ),
        (
            StructureKind::WoodenPole,
            structure(
                "Wooden Pole",
                (1, 1),
                Layer::Object,
                Building,
                false,
                smallvec![stack(I::Wood, 20)],
                vec![plain(A::PracticeKungfu, "Practice Kung Fu", Recreation, S::Melee, 0, 30)],
            ),
        ),
        (
            StructureKind::Chest,
            structure(
                "Chest",
                (1, 1),
                Layer::Object,
                Storage,
                false,
                smallvec![stack(I::Wood, 15)],
                vec![plain(A::StockItems, "Stock Items", Store, S::Social, 0, 5)],
            ),
        ),
        (
            StructureKind::FarmPlot,
            structure(
                "Farm Plot",
                (1, 1),
                Layer::Floor,
                FarmPlot,
                true,
                smallvec![],
                vec![
                    plain(A::PlantRice, "Plant Rice", Work, S::Plants, 0, 10),
                    plain(A::PlantPotato, "Plant Potato", Work, S::Plants, 3, 12),
                    plain(A::PlantCorn, "Plant Corn", Work, S::Plants, 5, 15),
                    plain(A::HarvestCrop, "Harvest Crop", Gather, S::Plants, 0, 15),
                ],
            ),
        ),
        (StructureKind::Tree, tree),
        (StructureKind::BerryBush, bush),
        (
            StructureKind::Boulder,
            structure(
                "Boulder",
                (1, 1),
                Layer::Object,
                Natural,
                false,
                smallvec![],
                vec![
                    mine(A::MineStone, "Mine Stone", 0, 25, stack(I::Stone, 20)),
                    plain(A::ClimbBoulder, "Climb Boulder", Recreation, S::Melee, 0, 25),
                    plain(A::WatchClouds, "Watch Clouds", Recreation, S::Intellectual, 0, 30),
                ],
            ),
        ),
        (
            StructureKind::SteelVein,
            vein("Steel Vein", mine(A::MineSteel, "Mine Steel", 2, 30, stack(I::Steel, 15))),
        ),
        (
            StructureKind::SilverVein,
            vein("Silver Vein", mine(A::MineSilver, "Mine Silver", 4, 35, stack(I::Silver, 10))),
        ),
        (
            StructureKind::GoldVein,
            vein("Gold Vein", mine(A::MineGold, "Mine Gold", 6, 40, stack(I::Gold, 5))),
        ),
        (
            StructureKind::UraniumVein,
            vein("Uranium Vein", mine(A::MineUranium, "Mine Uranium", 8, 50, stack(I::Uranium, 5))),
        ),
    ])
}

// ---------------------------------------------------------------------------
// Terrain, crops, food
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TerrainDef {
    pub name: String,
    pub speed_multiplier: f32,
    pub passable: bool,
    /// Whether structures may be placed here.
    pub buildable: bool,
    /// Whether trees and bushes may spring up here.
    pub fertile: bool,
}

pub fn default_terrain() -> BTreeMap<TerrainKind, TerrainDef> {
    let def = |name: &str, speed_multiplier, passable, buildable, fertile| TerrainDef {
        name: name.to_string(),
        speed_multiplier,
        passable,
        buildable,
        fertile,
    };
    BTreeMap::from([
        (TerrainKind::Soil, def("Soil", 1.0, true, true, true)),
        (TerrainKind::Stone, def("Stone", 1.0, true, true, true)),
        (TerrainKind::Marsh, def("Marsh", 0.6, true, true, true)),
        (TerrainKind::ShallowWater, def("Shallow Water", 0.5, true, true, false)),
        (TerrainKind::DeepWater, def("Deep Water", 0.3, false, false, false)),
        (TerrainKind::Lava, def("Lava", 0.2, false, false, false)),
    ])
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CropDef {
    pub name: String,
    /// Item produced at harvest.
    pub item: ItemKind,
    /// Growth added per tick while planted (growth runs 0–100).
    pub grow_rate: f32,
    /// Harvest quantity before skill scaling.
    pub base_yield: u32,
}

pub fn default_crops() -> BTreeMap<CropKind, CropDef> {
    let def = |name: &str, item, grow_rate, base_yield| CropDef {
        name: name.to_string(),
        item,
        grow_rate,
        base_yield,
    };
    BTreeMap::from([
        (CropKind::Rice, def("Rice", ItemKind::Rice, 2.5, 6)),
        (CropKind::Potato, def("Potato", ItemKind::Potato, 1.5, 10)),
        (CropKind::Corn, def("Corn", ItemKind::Corn, 0.8, 22)),
    ])
}

/// Nutrition of an edible item. Cooked meals outrank raw food when a pawn
/// goes looking for something to eat.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FoodDef {
    pub nutrition: f32,
    pub cooked: bool,
}

pub fn default_food() -> BTreeMap<ItemKind, FoodDef> {
    let raw = |nutrition| FoodDef { nutrition, cooked: false };
    let cooked = |nutrition| FoodDef { nutrition, cooked: true };
    BTreeMap::from([
        (ItemKind::Berries, raw(40.0)),
        (ItemKind::RawMeat, raw(40.0)),
        (ItemKind::Rice, raw(45.0)),
        (ItemKind::Potato, raw(50.0)),
        (ItemKind::Corn, raw(50.0)),
        (ItemKind::SimpleMeal, cooked(100.0)),
        (ItemKind::FineMeal, cooked(100.0)),
    ])
}
