// colony_sim: pure Rust colony simulation library.
//
// This crate contains all simulation logic for the colony: terrain, pawns,
// structures, the job system, pathfinding, the PRNG and the command
// interface. It has no rendering or UI dependencies and can be tested and
// run headless.
//
// Module overview:
// - `sim.rs`:          Top-level SimState, tick loop, command processing.
// - `command.rs`:      SimCommand / SimAction, all external sim mutations.
// - `worldgen.rs`:     Terrain noise, lava lake, landing zone, initial resources and pawns.
// - `world.rs`:        Terrain grid and the per-tick walkability map.
// - `pathfinding.rs`:  A* over a 4-connected grid.
// - `pawn.rs`:         Pawn data model: skills, needs, effects, status.
// - `pawn_sim.rs`:     Agent phase: needs, emergencies, queue intake, job execution.
// - `structure.rs`:    Placed structures and their runtime state.
// - `structure_sim.rs`: Structure phase: growth, withdrawals, activities.
// - `job.rs`:          Job kinds and job chains.
// - `assignment.rs`:   assign_job, resource resolution, batch and area targets.
// - `catalog.rs`:      Structure, terrain, crop and food definitions.
// - `config.rs`:       GameConfig, all tunable parameters plus the catalog.
// - `inventory.rs`:    Item stacks keyed by ItemKind.
// - `recruit.rs`:      Turns an external pawn profile into a Pawn.
// - `snapshot.rs`:     Serializable read-only views and resource totals.
// - `event.rs`:        Narrative log entries and the bounded history.
// - `error.rs`:        ConfigError, AssignError, CommandError.
// - `prng`:            Re-exported from `colony_prng`, xoshiro256++ with SplitMix64 seeding.
// - `types.rs`:        GridCoord, entity IDs, and the closed enums (skills, items, structures...).
//
// **Critical constraint: determinism.** The simulation is a pure function:
// `(state, commands) -> (new_state, events)`. All randomness comes from a
// seeded xoshiro256++ PRNG (re-exported from `colony_prng`). No `HashMap`
// iteration, no system time, no OS entropy. Use `BTreeMap` for ordered
// collections.

pub mod assignment;
pub mod catalog;
pub mod command;
pub mod config;
pub mod error;
pub mod event;
pub mod inventory;
pub mod job;
pub mod pathfinding;
pub mod pawn;
pub mod pawn_sim;
pub use colony_prng as prng;
pub mod recruit;
pub mod sim;
pub mod snapshot;
pub mod structure;
pub mod structure_sim;
pub mod types;
pub mod world;
pub mod worldgen;
