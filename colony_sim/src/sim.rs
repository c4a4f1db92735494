// Core simulation state and tick loop.
//
// `SimState` is the single source of truth for the colony. It owns the
// terrain grid, every pawn and structure, the global job queue, the event
// history, the PRNG and the game config. The sim is a pure function:
// `(state, commands) -> (new_state, events)`.
//
// On construction (`new()`/`with_config()`) the world is generated from the
// seed via `worldgen.rs`. `blank()` skips generation and gives an empty soil
// map, which is what tests and scripted scenarios start from.
//
// ## Tick order
//
// `step(commands, target_tick)` advances one tick at a time. For each tick:
//
//   1. Apply every command scheduled at or before the tick, in slice order.
//      A rejected command is a no-op that leaves a warning in the log.
//   2. Natural spawn: with `natural_spawn_chance`, a tree or berry bush
//      sprouts (growth 0) on a random fertile cell with no object-layer
//      structure on it.
//   3. Agent phase (`pawn_sim.rs`). Walkability is built once, up front,
//      from the terrain and the structures as they stand after the spawn.
//   4. Structure phase (`structure_sim.rs`), which may edit pawns (XP,
//      inventories, finishing jobs) and remove depleted structures.
//   5. The tick's log entries (commands, agent phase, structure phase, in
//      that order) are appended to the bounded history and returned.
//
// Pawns are processed in `PawnId` order and structures in `StructureId`
// order. Both are `BTreeMap`s, so iteration order is a function of the seed.
//
// ## Job flow
//
// The global queue only grows through `PlaceBuild` (one construct job per
// blueprint), `OrderWork` and `AreaCommand`. The agent phase is the only
// consumer. A pawn's personal queue is fed by queued `MovePawn` commands.
//
// See also: `command.rs` for the command surface, `assignment.rs` for
// `assign_job` and target selection, `snapshot.rs` for observation.
//
// **Critical constraint: determinism.** All randomness comes from `rng`;
// no `HashMap` iteration, no wall-clock time.

use crate::assignment::{area_targets, assign_job, find_batch_targets};
use crate::command::{SimAction, SimCommand};
use crate::config::GameConfig;
use crate::error::{AssignError, CommandError};
use crate::event::{EventLog, LogEntry, LogSink};
use crate::job::{Job, JobChain, JobKind};
use crate::pawn::{Pawn, PawnStatus, Skills};
use crate::pawn_sim::AgentPhase;
use crate::prng::GameRng;
use crate::recruit::pawn_from_profile;
use crate::snapshot::{ColonySnapshot, PawnView, StructureView, colony_resources};
use crate::structure::{GROWTH_MAX, Structure};
use crate::structure_sim::StructurePhase;
use crate::types::*;
use crate::world::{TileGrid, Walkability};
use crate::worldgen;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};
use tracing::{debug, warn};

/// Top-level simulation state. This is the entire colony.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimState {
    /// Current simulation tick (the next tick to be processed).
    pub tick: u64,

    /// The simulation's deterministic PRNG.
    pub rng: GameRng,

    /// Game configuration (immutable after initialization).
    pub config: GameConfig,

    /// Terrain, one kind per cell.
    pub grid: TileGrid,

    /// All pawns, keyed by ID. Dead pawns stay.
    pub pawns: BTreeMap<PawnId, Pawn>,

    /// All structures, keyed by ID.
    pub structures: BTreeMap<StructureId, Structure>,

    /// Unclaimed jobs, oldest first.
    pub job_queue: VecDeque<Job>,

    /// Most recent log entries.
    pub log: EventLog,
}

/// The result of processing commands and advancing the simulation.
pub struct StepResult {
    /// Log entries emitted during this step, oldest first.
    pub events: Vec<LogEntry>,
}

impl SimState {
    /// Create a new simulation with default config and the given seed.
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, GameConfig::default())
    }

    /// Create a new simulation with a generated world.
    pub fn with_config(seed: u64, config: GameConfig) -> Self {
        let mut rng = GameRng::new(seed);
        let world = worldgen::generate(&mut rng, &config);
        let log = EventLog::new(config.log_history_len);
        Self {
            tick: 0,
            rng,
            config,
            grid: world.grid,
            pawns: world.pawns,
            structures: world.structures,
            job_queue: VecDeque::new(),
            log,
        }
    }

    /// An all-soil map with no pawns or structures.
    pub fn blank(seed: u64, config: GameConfig) -> Self {
        let grid = TileGrid::new(config.map_width, config.map_height, TerrainKind::Soil);
        let log = EventLog::new(config.log_history_len);
        Self {
            tick: 0,
            rng: GameRng::new(seed),
            config,
            grid,
            pawns: BTreeMap::new(),
            structures: BTreeMap::new(),
            job_queue: VecDeque::new(),
            log,
        }
    }

    /// Apply a batch of commands and advance the sim to the target tick.
    ///
    /// Commands must be sorted by tick. Commands with tick >= `target_tick`
    /// are left for a later call.
    pub fn step(&mut self, commands: &[SimCommand], target_tick: u64) -> StepResult {
        let mut events = Vec::new();
        let mut cmd_idx = 0;

        while self.tick < target_tick {
            let mut sink = LogSink::new(self.tick);
            while let Some(cmd) = commands.get(cmd_idx).filter(|c| c.tick <= self.tick) {
                cmd_idx += 1;
                if let Err(err) = self.apply_command(&cmd.action, &mut sink) {
                    warn!(tick = self.tick, %err, "command rejected");
                    sink.warning(format!("Command ignored: {err}."));
                }
            }

            let mut entries = sink.into_entries();
            entries.extend(self.run_tick());
            self.log.extend(entries.iter().cloned());
            events.extend(entries);
            self.tick += 1;
        }

        StepResult { events }
    }

    fn run_tick(&mut self) -> Vec<LogEntry> {
        self.natural_spawn();

        let walk = Walkability::build(&self.grid, self.structures.values(), &self.config);
        let mut agent_log = LogSink::new(self.tick);
        AgentPhase {
            config: &self.config,
            structures: &self.structures,
            walk: &walk,
            rng: &mut self.rng,
            job_queue: &mut self.job_queue,
            log: &mut agent_log,
        }
        .run(&mut self.pawns);

        let mut structure_log = LogSink::new(self.tick);
        StructurePhase {
            config: &self.config,
            log: &mut structure_log,
        }
        .run(&mut self.structures, &mut self.pawns);

        let mut entries = agent_log.into_entries();
        entries.extend(structure_log.into_entries());
        entries
    }

    fn natural_spawn(&mut self) {
        if !self.rng.chance(self.config.natural_spawn_chance) {
            return;
        }
        let kind = if self.rng.chance(self.config.natural_spawn_tree_fraction) {
            StructureKind::Tree
        } else {
            StructureKind::BerryBush
        };
        let (Ok(w), Ok(h)) = (
            i32::try_from(self.grid.width),
            i32::try_from(self.grid.height),
        ) else {
            return;
        };
        if w == 0 || h == 0 {
            return;
        }
        let cell = GridCoord::new(self.rng.range_i32(0, w), self.rng.range_i32(0, h));
        let fertile = self
            .grid
            .get(cell)
            .and_then(|t| self.config.terrain_def(t))
            .is_some_and(|d| d.fertile);
        if !fertile || self.layer_occupied(cell, Layer::Object) {
            return;
        }
        let id = self.insert_structure(kind, cell);
        if let Some(s) = self.structures.get_mut(&id) {
            s.growth = Some(0.0);
        }
        debug!(tick = self.tick, kind = ?kind, at = %cell, "natural spawn");
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    fn apply_command(&mut self, action: &SimAction, log: &mut LogSink) -> Result<(), CommandError> {
        match action {
            SimAction::MovePawn { pawn, dest, queue } => self.move_pawn(*pawn, *dest, *queue, log),
            SimAction::PlaceBuild { kind, origin } => self.place_build(*kind, *origin, log),
            SimAction::OrderWork {
                pawn,
                structure,
                activity,
                repeats,
                batch,
            } => self.order_work(*pawn, *structure, *activity, *repeats, *batch, log),
            SimAction::AreaCommand { rect, mode } => {
                let claimed = self.claimed_work();
                let targets = area_targets(*rect, *mode, &self.structures, &claimed, &self.config);
                if targets.is_empty() {
                    log.warning(format!("Nothing to {} in that area.", mode.label()));
                    return Ok(());
                }
                for &(structure, activity) in &targets {
                    let job = Job::work(&mut self.rng, structure, activity, 1);
                    self.job_queue.push_back(job);
                }
                log.success(format!("Queued {} {} orders.", targets.len(), mode.label()));
                Ok(())
            }
            SimAction::RecruitPawn { profile, position } => {
                let at = position.unwrap_or_else(|| self.config.worldgen.landing_site());
                if !self.grid.in_bounds(at) {
                    return Err(CommandError::OutOfBounds(at));
                }
                let pawn = pawn_from_profile(&mut self.rng, profile.as_ref(), at);
                log.success(format!("Recruited {}: {}", pawn.name, pawn.backstory));
                self.pawns.insert(pawn.id, pawn);
                Ok(())
            }
        }
    }

    fn live_pawn_mut(&mut self, id: PawnId) -> Result<&mut Pawn, CommandError> {
        let pawn = self
            .pawns
            .get_mut(&id)
            .ok_or(CommandError::UnknownPawn(id))?;
        if pawn.is_dead() {
            return Err(CommandError::DeadPawn(id));
        }
        Ok(pawn)
    }

    fn move_pawn(
        &mut self,
        id: PawnId,
        dest: GridCoord,
        queue: bool,
        log: &mut LogSink,
    ) -> Result<(), CommandError> {
        if !self.grid.in_bounds(dest) {
            return Err(CommandError::OutOfBounds(dest));
        }
        self.live_pawn_mut(id)?;
        let job = Job::new(&mut self.rng, JobKind::Move { dest });
        let pawn = self.live_pawn_mut(id)?;
        if queue {
            pawn.queue.push_back(job);
            log.info(format!("[{}] Queued move to {dest}", pawn.name));
        } else {
            pawn.install_chain(JobChain::new(job));
            pawn.queue.clear();
            pawn.status = PawnStatus::Moving;
            log.info(format!("[{}] Moving to {dest}", pawn.name));
        }
        Ok(())
    }

    fn place_build(
        &mut self,
        kind: StructureKind,
        origin: GridCoord,
        log: &mut LogSink,
    ) -> Result<(), CommandError> {
        let def = self
            .config
            .structure_def(kind)
            .ok_or(CommandError::UnknownKind(kind))?;
        for cell in def.footprint(origin) {
            let terrain = self.grid.get(cell).ok_or(CommandError::OutOfBounds(cell))?;
            if !self.config.terrain_def(terrain).is_some_and(|t| t.buildable) {
                return Err(CommandError::Unbuildable(cell));
            }
            if self.layer_occupied(cell, def.layer) {
                return Err(CommandError::Occupied(cell));
            }
        }
        let name = def.name.clone();

        let id = StructureId::new(&mut self.rng);
        self.structures
            .insert(id, Structure::blueprint(id, kind, origin));
        let job = Job::work(&mut self.rng, id, ActivityId::Construct, 1);
        self.job_queue.push_back(job);
        log.info(format!("Placed & queued {name}"));
        Ok(())
    }

    fn order_work(
        &mut self,
        pawn: Option<PawnId>,
        structure: StructureId,
        activity: ActivityId,
        repeats: u32,
        batch: bool,
        log: &mut LogSink,
    ) -> Result<(), CommandError> {
        let target = self
            .structures
            .get(&structure)
            .ok_or(CommandError::UnknownStructure(structure))?;
        let activity_name = match activity {
            ActivityId::Construct if target.is_blueprint => "Construct".to_string(),
            ActivityId::Construct => return Err(AssignError::NotABlueprint(structure).into()),
            _ => self
                .config
                .structure_def(target.kind)
                .and_then(|d| d.activity(activity))
                .map(|a| a.name.clone())
                .ok_or(AssignError::UnknownActivity {
                    structure,
                    activity,
                })?,
        };

        let targets = if batch {
            find_batch_targets(structure, activity, &self.structures, &self.config)
        } else {
            vec![structure]
        };
        if targets.is_empty() {
            log.warning(format!("Nothing to {activity_name} there."));
            return Ok(());
        }
        let repeats = repeats.max(1);
        let mut jobs: VecDeque<Job> = targets
            .iter()
            .map(|&t| Job::work(&mut self.rng, t, activity, repeats))
            .collect();

        let mut message = format!("Ordered: {activity_name}");
        if let Some(pawn_id) = pawn
            && let Some(first) = jobs.front()
        {
            let config = &self.config;
            let structures = &self.structures;
            match self.pawns.get_mut(&pawn_id) {
                Some(p) if !p.is_dead() => {
                    match assign_job(&mut self.rng, p, first, structures, config) {
                        Ok(()) => {
                            message.push_str(&format!(" (assigned to {})", p.name));
                            jobs.pop_front();
                        }
                        Err(err) => {
                            log.warning(format!("{} can't take the order: {err}.", p.name));
                        }
                    }
                }
                Some(_) => log.warning(format!("{} is dead; order left for anyone.", pawn_id)),
                None => log.warning(format!("{} does not exist; order left for anyone.", pawn_id)),
            }
        }
        if targets.len() > 1 {
            message.push_str(&format!(" on {} targets", targets.len()));
        }
        self.job_queue.extend(jobs);
        log.success(message);
        Ok(())
    }

    /// Every `(structure, activity)` pair already queued, held by a pawn,
    /// or being worked.
    fn claimed_work(&self) -> FxHashSet<(StructureId, ActivityId)> {
        let mut claimed: FxHashSet<(StructureId, ActivityId)> = self
            .job_queue
            .iter()
            .filter_map(Job::work_target)
            .collect();
        for pawn in self.pawns.values() {
            let chain = pawn.job.iter().flat_map(|c| c.iter());
            claimed.extend(chain.chain(pawn.queue.iter()).filter_map(Job::work_target));
        }
        claimed.extend(
            self.structures
                .values()
                .filter_map(|s| s.activity.as_ref().map(|a| (s.id, a.activity))),
        );
        claimed
    }

    // -----------------------------------------------------------------------
    // Queries and setup helpers
    // -----------------------------------------------------------------------

    /// Structures whose footprint covers `cell`.
    pub fn structures_at(&self, cell: GridCoord) -> impl Iterator<Item = &Structure> + '_ {
        self.structures.values().filter(move |s| {
            self.config
                .structure_def(s.kind)
                .is_some_and(|d| d.footprint(s.origin).contains(&cell))
        })
    }

    fn layer_occupied(&self, cell: GridCoord, layer: Layer) -> bool {
        self.structures_at(cell).any(|s| {
            self.config
                .structure_def(s.kind)
                .is_some_and(|d| d.layer == layer)
        })
    }

    /// Add a built structure at `origin` without validation. Growing
    /// structures start fully grown.
    pub fn insert_structure(&mut self, kind: StructureKind, origin: GridCoord) -> StructureId {
        let id = StructureId::new(&mut self.rng);
        let mut structure = Structure::new(id, kind, origin);
        if self.config.structure_def(kind).is_some_and(|d| d.grows) {
            structure.growth = Some(GROWTH_MAX);
        }
        self.structures.insert(id, structure);
        id
    }

    /// Add a pawn with the given skill levels. Returns its id.
    pub fn spawn_pawn(
        &mut self,
        name: &str,
        position: GridCoord,
        levels: [u8; SKILL_COUNT],
    ) -> PawnId {
        let id = PawnId::new(&mut self.rng);
        let pawn = Pawn::new(id, name.to_string(), position, Skills::from_levels(levels));
        self.pawns.insert(id, pawn);
        id
    }

    pub fn colony_resources(&self) -> BTreeMap<ItemKind, u32> {
        colony_resources(self.structures.values(), self.pawns.values())
    }

    pub fn snapshot(&self) -> ColonySnapshot {
        ColonySnapshot {
            tick: self.tick,
            map_width: self.grid.width,
            map_height: self.grid.height,
            pawns: self
                .pawns
                .values()
                .map(|p| PawnView::of(p, &self.structures, &self.config))
                .collect(),
            structures: self
                .structures
                .values()
                .map(|s| StructureView::of(s, &self.config))
                .collect(),
            resources: self.colony_resources(),
            queued_jobs: self.job_queue.len(),
            log: self.log.iter().cloned().collect(),
        }
    }

    /// Serialize the simulation state to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn living_pawns(&self) -> usize {
        self.pawns.values().filter(|p| !p.is_dead()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assignment::AreaMode;
    use crate::event::Severity;
    use crate::recruit::PawnProfile;
    use crate::structure::CropState;

    fn quiet_config() -> GameConfig {
        GameConfig {
            map_width: 16,
            map_height: 16,
            natural_spawn_chance: 0.0,
            ..GameConfig::default()
        }
    }

    fn cmd(tick: u64, action: SimAction) -> SimCommand {
        SimCommand { tick, action }
    }

    #[test]
    fn new_sim_has_generated_world() {
        let sim = SimState::new(42);
        assert_eq!(sim.grid.width, 32);
        assert_eq!(sim.pawns.len(), 2);
        assert!(!sim.structures.is_empty());
        assert!(sim.job_queue.is_empty());
    }

    #[test]
    fn step_advances_tick() {
        let mut sim = SimState::new(42);
        sim.step(&[], 100);
        assert_eq!(sim.tick, 100);
    }

    #[test]
    fn move_command_replaces_chain_and_queue() {
        let mut sim = SimState::blank(1, quiet_config());
        let ada = sim.spawn_pawn("Ada", GridCoord::new(0, 0), [0; SKILL_COUNT]);
        let queued = cmd(
            0,
            SimAction::MovePawn {
                pawn: ada,
                dest: GridCoord::new(5, 5),
                queue: true,
            },
        );
        let direct = cmd(
            0,
            SimAction::MovePawn {
                pawn: ada,
                dest: GridCoord::new(0, 2),
                queue: false,
            },
        );
        // Queue a far move, then override it in the same tick.
        let mut sink = LogSink::new(0);
        sim.apply_command(&queued.action, &mut sink).unwrap();
        assert_eq!(sim.pawns[&ada].queue.len(), 1);
        sim.apply_command(&direct.action, &mut sink).unwrap();
        assert!(sim.pawns[&ada].queue.is_empty());

        sim.step(&[], 2);
        let pawn = &sim.pawns[&ada];
        assert_eq!(pawn.position, GridCoord::new(0, 2));
        assert_eq!(pawn.status, PawnStatus::Idle);
    }

    #[test]
    fn queued_moves_run_in_order() {
        let mut sim = SimState::blank(1, quiet_config());
        let ada = sim.spawn_pawn("Ada", GridCoord::new(0, 0), [0; SKILL_COUNT]);
        let commands: Vec<SimCommand> = [GridCoord::new(2, 0), GridCoord::new(2, 2)]
            .into_iter()
            .map(|dest| {
                cmd(
                    0,
                    SimAction::MovePawn {
                        pawn: ada,
                        dest,
                        queue: true,
                    },
                )
            })
            .collect();
        sim.step(&commands, 2);
        assert_eq!(sim.pawns[&ada].position, GridCoord::new(2, 0));
        sim.step(&[], 4);
        assert_eq!(sim.pawns[&ada].position, GridCoord::new(2, 2));
    }

    #[test]
    fn rejected_commands_warn_and_change_nothing() {
        let mut sim = SimState::blank(1, quiet_config());
        let ada = sim.spawn_pawn("Ada", GridCoord::new(0, 0), [0; SKILL_COUNT]);
        let before = sim.structures.len();
        let commands = vec![
            cmd(
                0,
                SimAction::MovePawn {
                    pawn: ada,
                    dest: GridCoord::new(40, 0),
                    queue: false,
                },
            ),
            cmd(
                0,
                SimAction::PlaceBuild {
                    kind: StructureKind::WoodWall,
                    origin: GridCoord::new(-1, 3),
                },
            ),
        ];
        let result = sim.step(&commands, 1);
        let warnings = result
            .events
            .iter()
            .filter(|e| e.severity == Severity::Warning)
            .count();
        assert_eq!(warnings, 2);
        assert_eq!(sim.structures.len(), before);
        assert!(sim.pawns[&ada].job.is_none());
        assert!(sim.job_queue.is_empty());
    }

    #[test]
    fn placement_checks_layer_and_terrain() {
        let mut sim = SimState::blank(1, quiet_config());
        sim.grid.set(GridCoord::new(5, 5), TerrainKind::DeepWater);
        sim.grid.set(GridCoord::new(6, 5), TerrainKind::ShallowWater);
        let mut log = LogSink::new(0);

        let place = |sim: &mut SimState, kind, x, y, log: &mut LogSink| {
            sim.apply_command(
                &SimAction::PlaceBuild {
                    kind,
                    origin: GridCoord::new(x, y),
                },
                log,
            )
        };
        assert_eq!(
            place(&mut sim, StructureKind::WoodWall, 5, 5, &mut log),
            Err(CommandError::Unbuildable(GridCoord::new(5, 5)))
        );
        assert!(place(&mut sim, StructureKind::WoodWall, 6, 5, &mut log).is_ok());
        assert_eq!(
            place(&mut sim, StructureKind::StoneWall, 6, 5, &mut log),
            Err(CommandError::Occupied(GridCoord::new(6, 5)))
        );
        // Floors sit on their own layer under walls.
        assert!(place(&mut sim, StructureKind::WoodFloor, 6, 5, &mut log).is_ok());
        assert_eq!(sim.structures.len(), 2);
        assert_eq!(sim.job_queue.len(), 2);
        assert!(sim.structures.values().all(|s| s.is_blueprint));
    }

    #[test]
    fn order_work_offers_first_target_to_named_pawn() {
        let mut sim = SimState::blank(3, quiet_config());
        let ada = sim.spawn_pawn("Ada", GridCoord::new(0, 0), [0; SKILL_COUNT]);
        let trees: Vec<StructureId> = (0..3)
            .map(|x| sim.insert_structure(StructureKind::Tree, GridCoord::new(4 + x, 4)))
            .collect();
        let order = SimAction::OrderWork {
            pawn: Some(ada),
            structure: trees[0],
            activity: ActivityId::ChopWood,
            repeats: 1,
            batch: true,
        };
        let mut log = LogSink::new(0);
        sim.apply_command(&order, &mut log).unwrap();

        let pawn = &sim.pawns[&ada];
        assert_eq!(pawn.status, PawnStatus::StartingAssignedJob);
        assert_eq!(
            pawn.current_job().and_then(Job::work_target),
            Some((trees[0], ActivityId::ChopWood))
        );
        assert_eq!(sim.job_queue.len(), 2);
        let entries = log.into_entries();
        assert!(entries[0].message.contains("assigned to Ada"));
        assert!(entries[0].message.contains("on 3 targets"));
    }

    #[test]
    fn order_for_unknown_activity_is_rejected() {
        let mut sim = SimState::blank(3, quiet_config());
        let tree = sim.insert_structure(StructureKind::Tree, GridCoord::new(4, 4));
        let order = SimAction::OrderWork {
            pawn: None,
            structure: tree,
            activity: ActivityId::MineGold,
            repeats: 1,
            batch: false,
        };
        let mut log = LogSink::new(0);
        assert!(matches!(
            sim.apply_command(&order, &mut log),
            Err(CommandError::Assign(AssignError::UnknownActivity { .. }))
        ));
        assert!(sim.job_queue.is_empty());
    }

    #[test]
    fn batch_order_on_an_unripe_plot_queues_nothing() {
        let mut sim = SimState::blank(3, quiet_config());
        let plot = sim.insert_structure(StructureKind::FarmPlot, GridCoord::new(2, 2));
        sim.structures.get_mut(&plot).unwrap().crop = Some(CropState {
            kind: CropKind::Potato,
            growth: 20.0,
        });
        let order = SimAction::OrderWork {
            pawn: None,
            structure: plot,
            activity: ActivityId::HarvestCrop,
            repeats: 1,
            batch: true,
        };
        let mut log = LogSink::new(0);
        sim.apply_command(&order, &mut log).unwrap();
        assert!(sim.job_queue.is_empty());
        let entries = log.into_entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].severity, Severity::Warning);
    }

    #[test]
    fn area_command_skips_already_queued_work() {
        let mut sim = SimState::blank(5, quiet_config());
        for x in 0..3 {
            sim.insert_structure(StructureKind::Boulder, GridCoord::new(x, 0));
        }
        sim.insert_structure(StructureKind::Tree, GridCoord::new(1, 1));
        let mine = SimAction::AreaCommand {
            rect: GridRect::from_corners(GridCoord::new(0, 0), GridCoord::new(3, 3)),
            mode: AreaMode::Mine,
        };
        let mut log = LogSink::new(0);
        sim.apply_command(&mine, &mut log).unwrap();
        assert_eq!(sim.job_queue.len(), 3);
        sim.apply_command(&mine, &mut log).unwrap();
        assert_eq!(sim.job_queue.len(), 3);
        let entries = log.into_entries();
        assert_eq!(entries[1].severity, Severity::Warning);
    }

    #[test]
    fn recruits_land_at_the_landing_site() {
        let mut sim = SimState::blank(8, GameConfig::default());
        let profile: PawnProfile = PawnProfile::from_json(
            r#"{ "name": "Rook", "backstory": "Ex-miner.", "skills": { "Mining": 35 } }"#,
        )
        .unwrap();
        let commands = vec![
            cmd(
                0,
                SimAction::RecruitPawn {
                    profile: Some(profile),
                    position: None,
                },
            ),
            cmd(
                0,
                SimAction::RecruitPawn {
                    profile: None,
                    position: Some(GridCoord::new(1, 1)),
                },
            ),
        ];
        sim.step(&commands, 1);
        assert_eq!(sim.pawns.len(), 2);
        let rook = sim.pawns.values().find(|p| p.name == "Rook").unwrap();
        assert_eq!(rook.position, sim.config.worldgen.landing_site());
        assert_eq!(rook.skills.level(SkillKind::Mining), 20);
        assert!(
            sim.pawns
                .values()
                .any(|p| p.position == GridCoord::new(1, 1) && !p.name.is_empty())
        );
    }

    #[test]
    fn natural_spawn_respects_terrain_and_layer() {
        let mut config = quiet_config();
        config.natural_spawn_chance = 1.0;
        config.map_width = 4;
        config.map_height = 4;
        let mut sim = SimState::blank(9, config);
        for c in sim.grid.coords().collect::<Vec<_>>() {
            if c.x < 2 {
                sim.grid.set(c, TerrainKind::DeepWater);
            }
        }
        sim.step(&[], 200);
        assert!(!sim.structures.is_empty());
        let mut origins = std::collections::BTreeSet::new();
        for s in sim.structures.values() {
            assert!(s.origin.x >= 2, "spawned on water at {}", s.origin);
            assert!(matches!(s.kind, StructureKind::Tree | StructureKind::BerryBush));
            assert!(origins.insert(s.origin));
        }
    }

    #[test]
    fn log_history_is_capped() {
        let mut config = quiet_config();
        config.log_history_len = 3;
        let mut sim = SimState::blank(1, config);
        let ada = sim.spawn_pawn("Ada", GridCoord::new(0, 0), [0; SKILL_COUNT]);
        let commands: Vec<SimCommand> = (0..5)
            .map(|i| {
                cmd(
                    i,
                    SimAction::MovePawn {
                        pawn: ada,
                        dest: GridCoord::new(0, 1),
                        queue: false,
                    },
                )
            })
            .collect();
        let result = sim.step(&commands, 5);
        assert!(result.events.len() >= 5);
        assert_eq!(sim.log.len(), 3);
        assert_eq!(sim.log.latest().map(|e| e.tick), result.events.last().map(|e| e.tick));
    }

    #[test]
    fn determinism_after_stepping() {
        let mut sim_a = SimState::new(42);
        let mut sim_b = SimState::new(42);
        sim_a.step(&[], 300);
        sim_b.step(&[], 300);
        assert_eq!(sim_a.to_json().unwrap(), sim_b.to_json().unwrap());
        assert_eq!(sim_a.rng.next_u64(), sim_b.rng.next_u64());
    }

    #[test]
    fn serialization_roundtrip() {
        let mut sim = SimState::new(7);
        sim.step(&[], 50);
        let json = sim.to_json().unwrap();
        let restored = SimState::from_json(&json).unwrap();
        assert_eq!(restored.tick, sim.tick);
        assert_eq!(restored.grid, sim.grid);
        let ids = |s: &SimState| -> Vec<PawnId> { s.pawns.keys().copied().collect() };
        assert_eq!(ids(&restored), ids(&sim));
        assert_eq!(restored.structures.len(), sim.structures.len());
        assert_eq!(restored.log.len(), sim.log.len());
    }
}
