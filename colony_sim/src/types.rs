// Core types shared across the simulation.
//
// Grid coordinates (`GridCoord`, `GridRect`), deterministic entity IDs
// (UUID v4 wrappers drawn from the sim PRNG), and the closed vocabularies
// the rest of the crate matches on: skills, terrain, layers, items, crops,
// activity actions, effects, structure kinds and activity identifiers.
// Every enum here is exhaustive so adding a variant forces every match in
// the crate to be revisited.
//
// All types derive `Serialize`/`Deserialize`; enum variants double as JSON
// map keys in `GameConfig` catalog tables.
//
// **Critical constraint: determinism.** Entity IDs come from the sim's
// `GameRng`. Never use OS entropy or an external UUID crate here.

use crate::prng::GameRng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

// ---------------------------------------------------------------------------
// Spatial types
// ---------------------------------------------------------------------------

/// A cell on the colony grid. `x` grows east, `y` grows south.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCoord {
    pub x: i32,
    pub y: i32,
}

impl GridCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance, the pathfinder's heuristic and the batch sort key.
    pub fn manhattan_distance(self, other: Self) -> u32 {
        (self.x - other.x).unsigned_abs() + (self.y - other.y).unsigned_abs()
    }

    /// Chebyshev distance. Pawns work on anything at distance <= 1.
    pub fn chebyshev_distance(self, other: Self) -> u32 {
        (self.x - other.x)
            .unsigned_abs()
            .max((self.y - other.y).unsigned_abs())
    }

    /// The four orthogonal neighbours in N, E, S, W order.
    pub fn neighbors4(self) -> [GridCoord; 4] {
        [
            GridCoord::new(self.x, self.y - 1),
            GridCoord::new(self.x + 1, self.y),
            GridCoord::new(self.x, self.y + 1),
            GridCoord::new(self.x - 1, self.y),
        ]
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        GridCoord::new(self.x + dx, self.y + dy)
    }
}

impl fmt::Display for GridCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Inclusive axis-aligned rectangle, used by area commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridRect {
    pub min: GridCoord,
    pub max: GridCoord,
}

impl GridRect {
    /// Build from two arbitrary corners (a drag can go in any direction).
    pub fn from_corners(a: GridCoord, b: GridCoord) -> Self {
        Self {
            min: GridCoord::new(a.x.min(b.x), a.y.min(b.y)),
            max: GridCoord::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    pub fn contains(&self, c: GridCoord) -> bool {
        c.x >= self.min.x && c.x <= self.max.x && c.y >= self.min.y && c.y <= self.max.y
    }
}

// ---------------------------------------------------------------------------
// Entity IDs: deterministic UUID v4
// ---------------------------------------------------------------------------

/// A UUID v4 generated from the simulation PRNG.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SimUuid([u8; 16]);

impl SimUuid {
    pub fn new_v4(rng: &mut GameRng) -> Self {
        let mut bytes = rng.next_bytes_16();
        // RFC 4122: version 4, variant 10.
        bytes[6] = (bytes[6] & 0x0F) | 0x40;
        bytes[8] = (bytes[8] & 0x3F) | 0x80;
        Self(bytes)
    }

    /// Parse the 8-4-4-4-12 hex form.
    pub fn parse(s: &str) -> Option<Self> {
        let hex: Vec<u8> = s.bytes().filter(|b| *b != b'-').collect();
        if hex.len() != 32 {
            return None;
        }
        let mut bytes = [0u8; 16];
        for (i, pair) in hex.chunks(2).enumerate() {
            let text = std::str::from_utf8(pair).ok()?;
            bytes[i] = u8::from_str_radix(text, 16).ok()?;
        }
        Some(Self(bytes))
    }
}

// Serialized as the hex string so IDs can key JSON maps.
impl Serialize for SimUuid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for SimUuid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        SimUuid::parse(&s).ok_or_else(|| serde::de::Error::custom("invalid UUID format"))
    }
}

impl fmt::Debug for SimUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SimUuid({self})")
    }
}

impl fmt::Display for SimUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, b) in self.0.iter().enumerate() {
            if matches!(i, 4 | 6 | 8 | 10) {
                f.write_str("-")?;
            }
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub SimUuid);

        impl $name {
            pub fn new(rng: &mut GameRng) -> Self {
                Self(SimUuid::new_v4(rng))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

entity_id!(/// Unique identifier for a pawn.
PawnId);
entity_id!(/// Unique identifier for a placed structure or blueprint.
StructureId);
entity_id!(/// Unique identifier for a job.
JobId);

// ---------------------------------------------------------------------------
// Skills
// ---------------------------------------------------------------------------

/// Number of skills every pawn carries.
pub const SKILL_COUNT: usize = 7;

/// Highest reachable skill level.
pub const MAX_SKILL_LEVEL: u8 = 20;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SkillKind {
    Construction,
    Cooking,
    Plants,
    Mining,
    Social,
    Intellectual,
    Melee,
}

impl SkillKind {
    pub const ALL: [SkillKind; SKILL_COUNT] = [
        SkillKind::Construction,
        SkillKind::Cooking,
        SkillKind::Plants,
        SkillKind::Mining,
        SkillKind::Social,
        SkillKind::Intellectual,
        SkillKind::Melee,
    ];

    /// Slot in a pawn's skill arrays.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for SkillKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// ---------------------------------------------------------------------------
// Terrain and layers
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TerrainKind {
    Soil,
    Stone,
    Marsh,
    ShallowWater,
    DeepWater,
    Lava,
}

impl TerrainKind {
    pub const ALL: [TerrainKind; 6] = [
        TerrainKind::Soil,
        TerrainKind::Stone,
        TerrainKind::Marsh,
        TerrainKind::ShallowWater,
        TerrainKind::DeepWater,
        TerrainKind::Lava,
    ];
}

/// Placement layer. A cell holds at most one structure per layer, so a
/// floor can sit under a workbench.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Layer {
    Floor,
    Object,
}

// ---------------------------------------------------------------------------
// Items and crops
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ItemKind {
    Wood,
    Stone,
    Steel,
    Silver,
    Gold,
    Uranium,
    Berries,
    RawMeat,
    SimpleMeal,
    FineMeal,
    WoodenClub,
    Rice,
    Potato,
    Corn,
}

impl ItemKind {
    pub fn label(self) -> &'static str {
        match self {
            ItemKind::Wood => "Wood",
            ItemKind::Stone => "Stone",
            ItemKind::Steel => "Steel",
            ItemKind::Silver => "Silver",
            ItemKind::Gold => "Gold",
            ItemKind::Uranium => "Uranium",
            ItemKind::Berries => "Berries",
            ItemKind::RawMeat => "Raw Meat",
            ItemKind::SimpleMeal => "Simple Meal",
            ItemKind::FineMeal => "Fine Meal",
            ItemKind::WoodenClub => "Wooden Club",
            ItemKind::Rice => "Rice",
            ItemKind::Potato => "Potato",
            ItemKind::Corn => "Corn",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CropKind {
    Rice,
    Potato,
    Corn,
}

impl CropKind {
    pub const ALL: [CropKind; 3] = [CropKind::Rice, CropKind::Potato, CropKind::Corn];
}

// ---------------------------------------------------------------------------
// Activities and effects
// ---------------------------------------------------------------------------

/// What finishing an activity does.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    /// Consume inputs, produce the declared outputs.
    Craft,
    /// Harvest outputs from the structure itself, scaled by skill.
    Gather,
    /// Pass the time; restores recreation.
    Recreation,
    /// Deposit the worker's inventory into the structure.
    Store,
    /// Generic labour: construction and planting.
    Work,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EffectKind {
    WellRested,
    Sated,
    Hungry,
    Tired,
    Bored,
    Joy,
}

impl EffectKind {
    /// Signed step applied to movement speed while the effect is active.
    /// Sated carries no speed modifier.
    pub fn speed_sign(self) -> f32 {
        match self {
            EffectKind::WellRested | EffectKind::Joy => 1.0,
            EffectKind::Hungry | EffectKind::Tired | EffectKind::Bored => -1.0,
            EffectKind::Sated => 0.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EffectKind::WellRested => "Well Rested",
            EffectKind::Sated => "Sated",
            EffectKind::Hungry => "Hungry",
            EffectKind::Tired => "Tired",
            EffectKind::Bored => "Bored",
            EffectKind::Joy => "Joy",
        }
    }
}

// ---------------------------------------------------------------------------
// Structures
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StructureKind {
    WoodWall,
    StoneWall,
    SteelWall,
    WoodFloor,
    StoneFloor,
    Campfire,
    ButcherTable,
    ResearchBench,
    Workbench,
    ChessTable,
    WoodenPole,
    Chest,
    FarmPlot,
    Tree,
    BerryBush,
    Boulder,
    SteelVein,
    SilverVein,
    GoldVein,
    UraniumVein,
}

impl StructureKind {
    pub const ALL: [StructureKind; 20] = [
        StructureKind::WoodWall,
        StructureKind::StoneWall,
        StructureKind::SteelWall,
        StructureKind::WoodFloor,
        StructureKind::StoneFloor,
        StructureKind::Campfire,
        StructureKind::ButcherTable,
        StructureKind::ResearchBench,
        StructureKind::Workbench,
        StructureKind::ChessTable,
        StructureKind::WoodenPole,
        StructureKind::Chest,
        StructureKind::FarmPlot,
        StructureKind::Tree,
        StructureKind::BerryBush,
        StructureKind::Boulder,
        StructureKind::SteelVein,
        StructureKind::SilverVein,
        StructureKind::GoldVein,
        StructureKind::UraniumVein,
    ];
}

/// Identifies an activity across the catalog. `Construct` is implicit on
/// every blueprint and never listed in a structure definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ActivityId {
    Construct,
    CookSimple,
    CookFine,
    ButcherCreature,
    ResearchBasic,
    CraftClub,
    PlayChess,
    PracticeKungfu,
    StockItems,
    PlantRice,
    PlantPotato,
    PlantCorn,
    HarvestCrop,
    ChopWood,
    ClimbTree,
    HugTree,
    HarvestBerry,
    HideInBush,
    MineStone,
    ClimbBoulder,
    WatchClouds,
    MineSteel,
    MineSilver,
    MineGold,
    MineUranium,
}

impl ActivityId {
    /// The crop a planting activity puts in the ground.
    pub fn planted_crop(self) -> Option<CropKind> {
        match self {
            ActivityId::PlantRice => Some(CropKind::Rice),
            ActivityId::PlantPotato => Some(CropKind::Potato),
            ActivityId::PlantCorn => Some(CropKind::Corn),
            _ => None,
        }
    }
}
