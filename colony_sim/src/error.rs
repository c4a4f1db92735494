// Error types for the simulation crate.
//
// Simulation-level failures (a pawn can't reach its target, a job's
// ingredients ran out) are not errors in the `Result` sense: they become
// log entries and the tick carries on. The enums here cover the cases a
// caller can act on: loading a bad config, handing a job to a pawn that
// can't take it, and commands the sim refuses.

use crate::types::{ActivityId, GridCoord, ItemKind, PawnId, StructureId, StructureKind};

/// Problems loading or validating a `GameConfig`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("could not read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("catalog has no definition for structure {0:?}")]
    MissingStructure(StructureKind),

    #[error("config value out of range: {field} ({reason})")]
    OutOfRange {
        field: &'static str,
        reason: &'static str,
    },

    #[error("activity {activity:?} on {structure:?} has a zero duration")]
    ZeroDuration {
        structure: StructureKind,
        activity: ActivityId,
    },

    #[error("terrain, crop or food table is incomplete: {0}")]
    IncompleteTable(String),
}

/// Reasons `assign_job` refuses a job. The pawn is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssignError {
    #[error("target structure {0} no longer exists")]
    MissingTarget(StructureId),

    #[error("structure {0} is not a blueprint")]
    NotABlueprint(StructureId),

    #[error("structure {structure} does not offer {activity:?}")]
    UnknownActivity {
        structure: StructureId,
        activity: ActivityId,
    },

    #[error("pawn {pawn} needs level {required} for {activity:?}")]
    SkillTooLow {
        pawn: PawnId,
        activity: ActivityId,
        required: u8,
    },

    #[error("colony storage holds only {available} of the {missing} {item} needed")]
    UnresolvableResources {
        item: ItemKind,
        missing: u32,
        available: u32,
    },
}

/// Commands the sim refuses to apply. These are reported as warnings in
/// the event log; the command is otherwise a no-op.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CommandError {
    #[error("pawn {0} does not exist")]
    UnknownPawn(PawnId),

    #[error("pawn {0} is dead")]
    DeadPawn(PawnId),

    #[error("structure {0} does not exist")]
    UnknownStructure(StructureId),

    #[error("cell {0} is outside the map")]
    OutOfBounds(GridCoord),

    #[error("cell {0} is already occupied")]
    Occupied(GridCoord),

    #[error("cannot build on the terrain at {0}")]
    Unbuildable(GridCoord),

    #[error("no catalog entry for {0:?}")]
    UnknownKind(StructureKind),

    #[error("order could not be issued: {0}")]
    Assign(#[from] AssignError),
}
