// Placed structures and their runtime state.
//
// A `Structure` is an instance of a catalog `StructureDef` at an origin
// cell: a wall, a workbench, a farm plot, a tree. It starts either as a
// blueprint (waiting for construction) or built (natural resources and
// anything placed by world generation). Runtime state is the inventory,
// an optional planted crop (farm plots), an optional growth value (trees
// and bushes) and at most one running activity with its worker.
//
// See also: `catalog.rs` for the definitions, `structure_sim.rs` for the
// per-tick state machine, `sim.rs` for placement and the position index.

use crate::inventory::Inventory;
use crate::types::*;
use serde::{Deserialize, Serialize};

/// Growth ceiling for crops and natural resources.
pub const GROWTH_MAX: f32 = 100.0;

/// Progress ceiling for activities.
pub const PROGRESS_MAX: f32 = 100.0;

/// A crop planted in a farm plot.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CropState {
    pub kind: CropKind,
    pub growth: f32,
}

impl CropState {
    pub fn is_mature(&self) -> bool {
        self.growth >= GROWTH_MAX
    }
}

/// The activity currently running on a structure.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActivityState {
    pub activity: ActivityId,
    pub progress: f32,
    pub worker: PawnId,
    pub repeats_left: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    pub id: StructureId,
    pub kind: StructureKind,
    pub origin: GridCoord,
    pub inventory: Inventory,
    pub is_blueprint: bool,
    pub crop: Option<CropState>,
    /// 0–100 maturity for structures that grow; `None` otherwise.
    pub growth: Option<f32>,
    pub activity: Option<ActivityState>,
}

impl Structure {
    pub fn new(id: StructureId, kind: StructureKind, origin: GridCoord) -> Self {
        Self {
            id,
            kind,
            origin,
            inventory: Inventory::new(),
            is_blueprint: false,
            crop: None,
            growth: None,
            activity: None,
        }
    }

    pub fn blueprint(id: StructureId, kind: StructureKind, origin: GridCoord) -> Self {
        Self {
            is_blueprint: true,
            ..Self::new(id, kind, origin)
        }
    }

    pub fn is_built(&self) -> bool {
        !self.is_blueprint
    }

    /// Multiplier applied to gathered yield: the growth fraction for
    /// structures that grow, 1 otherwise.
    pub fn growth_fraction(&self) -> f32 {
        self.growth.map_or(1.0, |g| (g / GROWTH_MAX).clamp(0.0, 1.0))
    }

    pub fn has_mature_crop(&self) -> bool {
        self.crop.is_some_and(|c| c.is_mature())
    }
}
