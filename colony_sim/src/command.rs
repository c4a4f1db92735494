// Commands that mutate simulation state.
//
// Every external change to the colony goes through `SimCommand`: the sim is
// a function `(state, commands) -> (new_state, events)` and commands are its
// only input. A command carries the tick it applies on and a `SimAction`:
//
// - `MovePawn`: overwrite a pawn's chain with a MOVE (or append one to its
//   personal queue).
// - `PlaceBuild`: validate a footprint and drop a blueprint.
// - `OrderWork`: queue WORK jobs on a structure, optionally on its whole
//   connected batch, optionally offering the first one to a named pawn.
// - `AreaCommand`: harvest / chop / mine everything suitable in a rectangle.
// - `RecruitPawn`: add a colonist from an (optional) generated profile.
//
// Invalid commands are no-ops that leave a warning in the event log.
//
// See also: `sim.rs` for `apply_command()` which dispatches these,
// `assignment.rs` for batch and area target selection.
//
// **Critical constraint: determinism.** Commands are the sole external input
// to the sim.

use crate::assignment::AreaMode;
use crate::recruit::PawnProfile;
use crate::types::*;
use serde::{Deserialize, Serialize};

/// An action scheduled for a specific tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimCommand {
    pub tick: u64,
    pub action: SimAction,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SimAction {
    /// Send a pawn to a cell. Replaces its current chain and clears its
    /// personal queue, unless `queue` is set, in which case the move is
    /// appended to the personal queue instead.
    MovePawn {
        pawn: PawnId,
        dest: GridCoord,
        #[serde(default)]
        queue: bool,
    },
    /// Place a blueprint with its origin at `origin`.
    PlaceBuild { kind: StructureKind, origin: GridCoord },
    /// Order `activity` on `structure`, `repeats` times per target.
    OrderWork {
        pawn: Option<PawnId>,
        structure: StructureId,
        activity: ActivityId,
        repeats: u32,
        /// Expand to the connected batch of similar structures.
        batch: bool,
    },
    AreaCommand { rect: GridRect, mode: AreaMode },
    /// Recruit a colonist. `None` profile gives a fallback colonist; `None`
    /// position lands them at the landing site.
    RecruitPawn {
        profile: Option<PawnProfile>,
        position: Option<GridCoord>,
    },
}
