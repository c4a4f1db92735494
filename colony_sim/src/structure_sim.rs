// The structure phase: one tick of every structure.
//
// Runs after the agent phase, in structure id order. For each structure:
//
//   1. growth: planted crops and immature trees/bushes grow toward 100
//   2. withdrawal fulfilment: pawns standing by in Withdrawing status with
//      a WITHDRAW job on this structure get their items and move on
//   3. stale release: an activity whose worker no longer holds the matching
//      WORK job (died, preempted, reassigned) is dropped
//   4. initiation: with no activity running, the first adjacent pawn (id
//      order) with a WORK job here starts one
//   5. progress: the worker earns XP and pushes progress; on 100 the
//      activity completes (construction, planting, harvest, gather, craft,
//      store, recreation), then repeats or ends
//
// Gathering a natural structure to completion removes it from the map;
// removals are applied after the loop so ids stay stable while iterating.
//
// Completion failures (missing construction cost or ingredients) are game
// events, not errors: an error entry is logged, the activity is cleared and
// the worker goes Idle. Nothing is rolled back.
//
// See also: `structure.rs` for the data model, `pawn_sim.rs` which walks
// pawns into Withdrawing / Working, `catalog.rs` for activity definitions.

use crate::catalog::{ActivityDef, StructureDef, StructureRole};
use crate::config::GameConfig;
use crate::event::LogSink;
use crate::job::JobKind;
use crate::pawn::{Pawn, PawnStatus, clamp_need};
use crate::structure::{ActivityState, CropState, GROWTH_MAX, PROGRESS_MAX, Structure};
use crate::types::*;
use std::collections::BTreeMap;
use tracing::debug;

/// Progress within this distance of the cap counts as complete, so
/// durations that don't divide 100 evenly finish on their nominal tick.
const PROGRESS_EPSILON: f32 = 1e-3;

pub struct StructurePhase<'a> {
    pub config: &'a GameConfig,
    pub log: &'a mut LogSink,
}

fn structure_name(config: &GameConfig, kind: StructureKind) -> &str {
    config
        .structure_def(kind)
        .map_or("structure", |d| d.name.as_str())
}

impl StructurePhase<'_> {
    pub fn run(
        &mut self,
        structures: &mut BTreeMap<StructureId, Structure>,
        pawns: &mut BTreeMap<PawnId, Pawn>,
    ) {
        let ids: Vec<StructureId> = structures.keys().copied().collect();
        let mut depleted = Vec::new();
        for id in ids {
            let Some(structure) = structures.get_mut(&id) else {
                continue;
            };
            if self.tick_structure(structure, pawns) {
                depleted.push(id);
            }
        }
        for id in depleted {
            if let Some(s) = structures.remove(&id) {
                debug!(
                    structure = %id,
                    kind = ?s.kind,
                    at = %s.origin,
                    "depleted structure removed"
                );
            }
        }
    }

    /// Returns `true` if the structure was used up and should be removed.
    fn tick_structure(&mut self, s: &mut Structure, pawns: &mut BTreeMap<PawnId, Pawn>) -> bool {
        self.grow(s);
        self.fulfil_withdrawals(s, pawns);
        release_stale_activity(s, pawns);
        if s.activity.is_none() {
            self.start_activity(s, pawns);
        }
        self.progress_activity(s, pawns)
    }

    fn grow(&self, s: &mut Structure) {
        if let Some(crop) = s.crop.as_mut()
            && !crop.is_mature()
            && let Some(def) = self.config.crops.get(&crop.kind)
        {
            crop.growth = (crop.growth + def.grow_rate).min(GROWTH_MAX);
        }
        if let Some(growth) = s.growth.as_mut()
            && *growth < GROWTH_MAX
        {
            *growth = (*growth + self.config.natural_growth_per_tick).min(GROWTH_MAX);
        }
    }

    fn fulfil_withdrawals(&mut self, s: &mut Structure, pawns: &mut BTreeMap<PawnId, Pawn>) {
        let config = self.config;
        for pawn in pawns.values_mut() {
            if pawn.status != PawnStatus::Withdrawing {
                continue;
            }
            let items = match pawn.current_job().map(|j| &j.kind) {
                Some(JobKind::Withdraw { source, items }) if *source == s.id => items.clone(),
                _ => continue,
            };
            let mut moved_any = false;
            for want in &items {
                let got = s.inventory.take(want.item, want.quantity);
                if got > 0 {
                    pawn.inventory.add(want.item, got);
                    self.log
                        .info(format!("{} picked up {got} {}.", pawn.name, want.item));
                    moved_any = true;
                }
            }
            if !moved_any && let Some(first) = items.first() {
                self.log.warning(format!(
                    "{} could not find {} in {}.",
                    pawn.name,
                    first.item,
                    structure_name(config, s.kind)
                ));
            }
            pawn.finish_job();
        }
    }

    /// Whether `activity` can run on `s` in its current state.
    fn can_host(&self, s: &Structure, activity: ActivityId) -> bool {
        if activity == ActivityId::Construct {
            return s.is_blueprint;
        }
        s.is_built()
            && self
                .config
                .structure_def(s.kind)
                .is_some_and(|d| d.activity(activity).is_some())
    }

    fn start_activity(&mut self, s: &mut Structure, pawns: &mut BTreeMap<PawnId, Pawn>) {
        for pawn in pawns.values_mut() {
            if !matches!(pawn.status, PawnStatus::Working | PawnStatus::MovingToWork)
                || pawn.position.chebyshev_distance(s.origin) > 1
            {
                continue;
            }
            let Some((activity, repeats)) = pawn.current_job().and_then(|j| match j.kind {
                JobKind::Work {
                    target,
                    activity,
                    repeats,
                } if target == s.id => Some((activity, repeats)),
                _ => None,
            }) else {
                continue;
            };
            if !self.can_host(s, activity) {
                self.log.warning(format!(
                    "{} gave up on {activity:?}: the {} no longer allows it.",
                    pawn.name,
                    structure_name(self.config, s.kind)
                ));
                pawn.abandon_job();
                continue;
            }
            s.activity = Some(ActivityState {
                activity,
                progress: 0.0,
                worker: pawn.id,
                repeats_left: repeats.max(1),
            });
            debug!(structure = %s.id, worker = %pawn.name, ?activity, "activity started");
            return;
        }
    }

    /// Push the running activity forward one tick. Returns `true` if the
    /// structure was consumed.
    fn progress_activity(&mut self, s: &mut Structure, pawns: &mut BTreeMap<PawnId, Pawn>) -> bool {
        let Some(mut act) = s.activity else {
            return false;
        };
        let Some(worker) = pawns.get_mut(&act.worker) else {
            return false;
        };
        if worker.status != PawnStatus::Working
            || worker.working_on(s.id) != Some(act.activity)
            || worker.position.chebyshev_distance(s.origin) > 1
        {
            return false;
        }

        let config = self.config;
        let Some(def) = config.structure_def(s.kind) else {
            s.activity = None;
            return false;
        };
        let act_def = if act.activity == ActivityId::Construct {
            None
        } else {
            let Some(a) = def.activity(act.activity) else {
                s.activity = None;
                return false;
            };
            Some(a)
        };
        let (skill, duration) = match act_def {
            Some(a) => (a.skill, a.duration_ticks),
            None => (SkillKind::Construction, config.construction_duration_ticks),
        };

        let gained = worker
            .skills
            .add_xp(skill, config.skills.xp_per_work_tick, &config.skills);
        if gained > 0 {
            self.log.info(format!(
                "{} reached {skill} level {}.",
                worker.name,
                worker.skills.level(skill)
            ));
        }
        let level = worker.skills.level(skill);
        let gain = PROGRESS_MAX / duration.max(1) as f32 * config.skills.progress_multiplier(level);
        act.progress = (act.progress + gain).min(PROGRESS_MAX);

        if let Some(a) = act_def
            && a.action == ActionKind::Recreation
        {
            worker.needs.recreation = clamp_need(
                worker.needs.recreation + config.needs.recreation_replenish_per_tick,
            );
        }

        if act.progress < PROGRESS_MAX - PROGRESS_EPSILON {
            s.activity = Some(act);
            return false;
        }
        act.progress = PROGRESS_MAX;

        match act_def {
            None => {
                self.complete_construction(s, worker, def);
                false
            }
            Some(a) => self.complete_cycle(s, worker, act, def, a),
        }
    }

    fn complete_construction(&mut self, s: &mut Structure, worker: &mut Pawn, def: &StructureDef) {
        s.activity = None;
        if worker.inventory.remove_all(&def.cost) {
            s.is_blueprint = false;
            self.log
                .success(format!("{} finished constructing {}.", worker.name, def.name));
            worker.finish_job();
        } else {
            self.log.error(format!(
                "{} failed to construct {}: missing resources.",
                worker.name, def.name
            ));
            worker.abandon_job();
        }
    }

    /// Finish one cycle of a catalog activity, then repeat or stop. Returns
    /// `true` if the structure was gathered away.
    fn complete_cycle(
        &mut self,
        s: &mut Structure,
        worker: &mut Pawn,
        mut act: ActivityState,
        def: &StructureDef,
        a: &ActivityDef,
    ) -> bool {
        if !worker.inventory.remove_all(&a.inputs) {
            self.log.error(format!(
                "{} couldn't finish {}: missing ingredients.",
                worker.name, a.name
            ));
            s.activity = None;
            worker.abandon_job();
            return false;
        }

        let is_farm = def.role == StructureRole::FarmPlot;
        if is_farm {
            self.finish_farm_work(s, worker, a);
        } else {
            self.produce(s, worker, a);
        }

        act.repeats_left = act.repeats_left.saturating_sub(1);
        if act.repeats_left > 0 && !is_farm {
            if worker.inventory.has_all(&a.inputs) {
                act.progress = 0.0;
                s.activity = Some(act);
                return false;
            }
            self.log.warning(format!(
                "{} stopped {}: missing ingredients.",
                worker.name, a.name
            ));
            s.activity = None;
            worker.abandon_job();
            return false;
        }

        s.activity = None;
        worker.finish_job();
        a.action == ActionKind::Gather && !is_farm
    }

    fn finish_farm_work(&mut self, s: &mut Structure, worker: &mut Pawn, a: &ActivityDef) {
        let config = self.config;
        if let Some(kind) = a.id.planted_crop() {
            if s.crop.is_some() {
                self.log
                    .warning(format!("{} found the plot already planted.", worker.name));
                return;
            }
            s.crop = Some(CropState { kind, growth: 0.0 });
            let name = config.crops.get(&kind).map_or("a crop", |c| c.name.as_str());
            self.log.success(format!("{} planted {name}.", worker.name));
            return;
        }
        if a.id != ActivityId::HarvestCrop {
            self.log.success(format!("{} finished {}.", worker.name, a.name));
            return;
        }
        let Some(crop) = s.crop.filter(CropState::is_mature) else {
            self.log
                .warning(format!("{} found nothing ripe to harvest.", worker.name));
            return;
        };
        s.crop = None;
        let Some(crop_def) = config.crops.get(&crop.kind) else {
            return;
        };
        let level = worker.skills.level(a.skill);
        let scale = config.skills.yield_multiplier(level);
        let qty = (crop_def.base_yield as f32 * scale).floor() as u32;
        if qty > 0 {
            worker.inventory.add(crop_def.item, qty);
        }
        self.log.success(format!(
            "{} harvested {qty}x {}.",
            worker.name, crop_def.name
        ));
    }

    fn produce(&mut self, s: &mut Structure, worker: &mut Pawn, a: &ActivityDef) {
        let config = self.config;
        let mut gained = Vec::new();
        match a.action {
            ActionKind::Gather => {
                let scale = config.skills.yield_multiplier(worker.skills.level(a.skill))
                    * s.growth_fraction();
                for out in &a.outputs {
                    let qty = (out.quantity as f32 * scale).floor() as u32;
                    if qty > 0 {
                        worker.inventory.add(out.item, qty);
                        gained.push(format!("{qty}x {}", out.item));
                    }
                }
            }
            ActionKind::Craft => {
                // At least one of each output per cycle.
                let scale = config.skills.yield_multiplier(worker.skills.level(a.skill));
                for out in &a.outputs {
                    let qty = ((out.quantity as f32 * scale).floor() as u32).max(1);
                    worker.inventory.add(out.item, qty);
                    gained.push(format!("{qty}x {}", out.item));
                }
            }
            ActionKind::Store => {
                let count = worker.inventory.drain_into(&mut s.inventory);
                self.log
                    .success(format!("{} stored {count} items.", worker.name));
                return;
            }
            ActionKind::Recreation => {
                worker.grant_effect(EffectKind::Joy, config.effects.joy_ticks);
                self.log
                    .info(format!("{} enjoyed {}.", worker.name, a.name));
                return;
            }
            ActionKind::Work => {}
        }
        if gained.is_empty() {
            self.log.success(format!("{} finished {}.", worker.name, a.name));
        } else {
            self.log.success(format!(
                "{} finished {} -> {}.",
                worker.name,
                a.name,
                gained.join(", ")
            ));
        }
    }
}

/// Drop an activity whose worker no longer holds the matching WORK job.
fn release_stale_activity(s: &mut Structure, pawns: &BTreeMap<PawnId, Pawn>) {
    let Some(act) = s.activity else {
        return;
    };
    let held = pawns
        .get(&act.worker)
        .is_some_and(|p| !p.is_dead() && p.working_on(s.id) == Some(act.activity));
    if !held {
        debug!(structure = %s.id, activity = ?act.activity, "released abandoned activity");
        s.activity = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{LogEntry, Severity};
    use crate::inventory::ItemStack;
    use crate::job::{Job, JobChain};
    use crate::pawn::Skills;
    use crate::prng::GameRng;
    use smallvec::smallvec;

    struct Harness {
        config: GameConfig,
        rng: GameRng,
        structures: BTreeMap<StructureId, Structure>,
        pawns: BTreeMap<PawnId, Pawn>,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                config: GameConfig::default(),
                rng: GameRng::new(5),
                structures: BTreeMap::new(),
                pawns: BTreeMap::new(),
            }
        }

        fn structure(&mut self, kind: StructureKind, at: GridCoord) -> StructureId {
            let id = StructureId::new(&mut self.rng);
            self.structures.insert(id, Structure::new(id, kind, at));
            id
        }

        fn blueprint(&mut self, kind: StructureKind, at: GridCoord) -> StructureId {
            let id = StructureId::new(&mut self.rng);
            self.structures.insert(id, Structure::blueprint(id, kind, at));
            id
        }

        /// A pawn next to `target`, already Working on `activity`.
        fn worker(
            &mut self,
            target: StructureId,
            activity: ActivityId,
            repeats: u32,
            levels: [u8; SKILL_COUNT],
        ) -> PawnId {
            let at = self.structures[&target].origin.offset(1, 0);
            let id = PawnId::new(&mut self.rng);
            let mut pawn = Pawn::new(id, "Bo".into(), at, Skills::from_levels(levels));
            pawn.install_chain(JobChain::new(Job::work(&mut self.rng, target, activity, repeats)));
            pawn.status = PawnStatus::Working;
            self.pawns.insert(id, pawn);
            id
        }

        fn tick(&mut self) -> Vec<LogEntry> {
            let mut log = LogSink::new(0);
            StructurePhase {
                config: &self.config,
                log: &mut log,
            }
            .run(&mut self.structures, &mut self.pawns);
            log.into_entries()
        }

        fn ticks(&mut self, n: usize) -> Vec<LogEntry> {
            (0..n).flat_map(|_| self.tick()).collect()
        }
    }

    #[test]
    fn construction_takes_twenty_ticks_at_skill_zero() {
        let mut h = Harness::new();
        let wall = h.blueprint(StructureKind::WoodWall, GridCoord::new(4, 4));
        let pawn = h.worker(wall, ActivityId::Construct, 1, [0; SKILL_COUNT]);
        h.pawns.get_mut(&pawn).unwrap().inventory.add(ItemKind::Wood, 7);

        h.ticks(19);
        assert!(h.structures[&wall].is_blueprint);
        assert_eq!(h.structures[&wall].activity.map(|a| a.progress), Some(95.0));
        let logs = h.tick();
        assert!(!h.structures[&wall].is_blueprint);
        assert!(h.structures[&wall].activity.is_none());
        let worker = &h.pawns[&pawn];
        assert_eq!(worker.inventory.count(ItemKind::Wood), 2);
        assert_eq!(worker.status, PawnStatus::Idle);
        assert_eq!(worker.skills.level(SkillKind::Construction), 1);
        assert!(logs.iter().any(|e| e.severity == Severity::Success));
    }

    #[test]
    fn construction_without_materials_fails_cleanly() {
        let mut h = Harness::new();
        let wall = h.blueprint(StructureKind::StoneWall, GridCoord::new(4, 4));
        let pawn = h.worker(wall, ActivityId::Construct, 1, [20, 0, 0, 0, 0, 0, 0]);
        // Level 20 works at 3x: 100 / 20 * 3 = 15 per tick, done on tick 7.
        let logs = h.ticks(7);
        assert!(h.structures[&wall].is_blueprint);
        assert!(h.structures[&wall].activity.is_none());
        assert_eq!(h.pawns[&pawn].status, PawnStatus::Idle);
        assert!(h.pawns[&pawn].job.is_none());
        assert!(logs.iter().any(|e| e.severity == Severity::Error));
    }

    #[test]
    fn withdrawal_moves_items_and_advances_chain() {
        let mut h = Harness::new();
        let chest = h.structure(StructureKind::Chest, GridCoord::new(2, 2));
        h.structures
            .get_mut(&chest)
            .unwrap()
            .inventory
            .add(ItemKind::Stone, 3);
        let bench = h.blueprint(StructureKind::StoneWall, GridCoord::new(6, 2));
        let id = PawnId::new(&mut h.rng);
        let mut pawn = Pawn::new(id, "Cy".into(), GridCoord::new(3, 2), Skills::default());
        let withdraw = Job::new(
            &mut h.rng,
            JobKind::Withdraw {
                source: chest,
                items: smallvec![ItemStack::new(ItemKind::Stone, 5)],
            },
        );
        let work = Job::work(&mut h.rng, bench, ActivityId::Construct, 1);
        pawn.install_chain(JobChain::new(withdraw).then(work.clone()));
        pawn.status = PawnStatus::Withdrawing;
        h.pawns.insert(id, pawn);

        h.tick();
        let pawn = &h.pawns[&id];
        assert_eq!(pawn.inventory.count(ItemKind::Stone), 3);
        assert!(h.structures[&chest].inventory.is_empty());
        assert_eq!(pawn.current_job(), Some(&work));
        assert_eq!(pawn.status, PawnStatus::Moving);
    }

    #[test]
    fn empty_withdrawal_warns_and_moves_on() {
        let mut h = Harness::new();
        let chest = h.structure(StructureKind::Chest, GridCoord::new(2, 2));
        let id = PawnId::new(&mut h.rng);
        let mut pawn = Pawn::new(id, "Cy".into(), GridCoord::new(2, 3), Skills::default());
        let withdraw = Job::new(
            &mut h.rng,
            JobKind::Withdraw {
                source: chest,
                items: smallvec![ItemStack::new(ItemKind::Gold, 1)],
            },
        );
        pawn.install_chain(JobChain::new(withdraw));
        pawn.status = PawnStatus::Withdrawing;
        h.pawns.insert(id, pawn);
        let logs = h.tick();
        assert!(logs.iter().any(|e| e.severity == Severity::Warning));
        assert_eq!(h.pawns[&id].status, PawnStatus::Idle);
        assert!(h.pawns[&id].job.is_none());
    }

    #[test]
    fn crafting_repeats_while_ingredients_last() {
        let mut h = Harness::new();
        let fire = h.structure(StructureKind::Campfire, GridCoord::new(3, 3));
        let pawn = h.worker(fire, ActivityId::CookSimple, 3, [0; SKILL_COUNT]);
        h.pawns
            .get_mut(&pawn)
            .unwrap()
            .inventory
            .add(ItemKind::Berries, 12);

        // 10 ticks per meal at skill 0 (XP levels don't arrive before tick 20).
        h.ticks(10);
        assert_eq!(h.pawns[&pawn].inventory.count(ItemKind::SimpleMeal), 1);
        assert_eq!(h.structures[&fire].activity.map(|a| a.repeats_left), Some(2));

        let logs = h.ticks(10);
        let worker = &h.pawns[&pawn];
        assert_eq!(worker.inventory.count(ItemKind::SimpleMeal), 2);
        assert_eq!(worker.inventory.count(ItemKind::Berries), 2);
        // Third meal needs 5 berries; only 2 left.
        assert!(h.structures[&fire].activity.is_none());
        assert_eq!(worker.status, PawnStatus::Idle);
        assert!(logs.iter().any(|e| e.message.contains("missing ingredients")));
        // Campfires are not consumed by cooking.
        assert!(h.structures.contains_key(&fire));
    }

    #[test]
    fn cooking_output_scales_with_skill() {
        let mut h = Harness::new();
        let novice_fire = h.structure(StructureKind::Campfire, GridCoord::new(2, 2));
        let expert_fire = h.structure(StructureKind::Campfire, GridCoord::new(8, 2));
        let novice = h.worker(novice_fire, ActivityId::CookSimple, 1, [0; SKILL_COUNT]);
        let expert = h.worker(expert_fire, ActivityId::CookSimple, 1, [0, 20, 0, 0, 0, 0, 0]);
        for id in [novice, expert] {
            h.pawns
                .get_mut(&id)
                .unwrap()
                .inventory
                .add(ItemKind::Berries, 5);
        }

        h.ticks(40);
        // Skill 0: floor(1 * 0.5) rounds up to the single declared meal.
        let cook = &h.pawns[&novice];
        assert_eq!(cook.inventory.count(ItemKind::SimpleMeal), 1);
        assert_eq!(cook.inventory.count(ItemKind::Berries), 0);
        // Skill 20: 1 * (0.5 + 1.5) = 2.
        let cook = &h.pawns[&expert];
        assert_eq!(cook.inventory.count(ItemKind::SimpleMeal), 2);
        assert_eq!(cook.inventory.count(ItemKind::Berries), 0);
        assert!(h.structures[&expert_fire].activity.is_none());
    }

    #[test]
    fn gathering_scales_yield_and_removes_the_resource() {
        let mut h = Harness::new();
        let boulder = h.structure(StructureKind::Boulder, GridCoord::new(5, 5));
        // Mining 10: multiplier 0.5 + 10/20 * 1.5 = 1.25, progress 2x.
        let pawn = h.worker(boulder, ActivityId::MineStone, 1, [0, 0, 0, 10, 0, 0, 0]);
        h.ticks(13);
        assert!(!h.structures.contains_key(&boulder));
        let worker = &h.pawns[&pawn];
        assert_eq!(worker.inventory.count(ItemKind::Stone), 25);
        assert!(worker.job.is_none());
    }

    #[test]
    fn young_bushes_yield_in_proportion_to_growth() {
        let mut h = Harness::new();
        let bush = h.structure(StructureKind::BerryBush, GridCoord::new(5, 5));
        h.structures.get_mut(&bush).unwrap().growth = Some(50.0);
        h.config.natural_growth_per_tick = 0.0;
        let pawn = h.worker(bush, ActivityId::HarvestBerry, 1, [0, 0, 10, 0, 0, 0, 0]);
        // Plants 10 -> 2x progress on a 10 tick activity.
        h.ticks(5);
        // 8 * 1.25 * 0.5 = 5
        assert_eq!(h.pawns[&pawn].inventory.count(ItemKind::Berries), 5);
        assert!(!h.structures.contains_key(&bush));
    }

    #[test]
    fn farm_plot_plant_grow_harvest() {
        let mut h = Harness::new();
        let plot = h.structure(StructureKind::FarmPlot, GridCoord::new(2, 2));
        let planter = h.worker(plot, ActivityId::PlantRice, 1, [0; SKILL_COUNT]);
        h.ticks(10);
        let crop = h.structures[&plot].crop.unwrap();
        assert_eq!(crop.kind, CropKind::Rice);
        assert_eq!(h.pawns[&planter].status, PawnStatus::Idle);

        // Rice grows 2.5 per tick: 40 ticks to maturity.
        h.ticks(40);
        assert!(h.structures[&plot].has_mature_crop());

        let harvester = h.worker(plot, ActivityId::HarvestCrop, 1, [0, 0, 4, 0, 0, 0, 0]);
        // Plants 4: 1.4x progress on 15 ticks -> 11 ticks.
        h.ticks(11);
        // floor(6 * (0.5 + 4/20 * 1.5)) = floor(4.8) = 4
        assert_eq!(h.pawns[&harvester].inventory.count(ItemKind::Rice), 4);
        assert!(h.structures[&plot].crop.is_none());
        assert!(h.structures.contains_key(&plot));
    }

    #[test]
    fn storing_empties_the_worker() {
        let mut h = Harness::new();
        let chest = h.structure(StructureKind::Chest, GridCoord::new(1, 1));
        let pawn = h.worker(chest, ActivityId::StockItems, 1, [0; SKILL_COUNT]);
        {
            let worker = h.pawns.get_mut(&pawn).unwrap();
            worker.inventory.add(ItemKind::Wood, 4);
            worker.inventory.add(ItemKind::Gold, 1);
        }
        h.ticks(5);
        assert!(h.pawns[&pawn].inventory.is_empty());
        assert_eq!(h.structures[&chest].inventory.total(), 5);
    }

    #[test]
    fn recreation_restores_and_grants_joy() {
        let mut h = Harness::new();
        let tree = h.structure(StructureKind::Tree, GridCoord::new(3, 3));
        let pawn = h.worker(tree, ActivityId::HugTree, 1, [0; SKILL_COUNT]);
        h.pawns.get_mut(&pawn).unwrap().needs.recreation = 10.0;
        h.ticks(15);
        let worker = &h.pawns[&pawn];
        assert!(worker.has_effect(EffectKind::Joy));
        assert!(worker.needs.recreation > 30.0);
        // Recreation never consumes the structure.
        assert!(h.structures.contains_key(&tree));
    }

    #[test]
    fn stale_activity_is_released() {
        let mut h = Harness::new();
        let fire = h.structure(StructureKind::Campfire, GridCoord::new(3, 3));
        let pawn = h.worker(fire, ActivityId::CookSimple, 1, [0; SKILL_COUNT]);
        h.pawns
            .get_mut(&pawn)
            .unwrap()
            .inventory
            .add(ItemKind::Berries, 5);
        h.tick();
        assert!(h.structures[&fire].activity.is_some());
        h.pawns.get_mut(&pawn).unwrap().abandon_job();
        h.tick();
        assert!(h.structures[&fire].activity.is_none());
    }

    #[test]
    fn growth_is_capped() {
        let mut h = Harness::new();
        let tree = h.structure(StructureKind::Tree, GridCoord::new(0, 0));
        h.structures.get_mut(&tree).unwrap().growth = Some(99.9);
        h.ticks(3);
        assert_eq!(h.structures[&tree].growth, Some(GROWTH_MAX));
    }

    #[test]
    fn second_builder_gives_up_once_the_blueprint_is_built() {
        let mut h = Harness::new();
        let wall = h.blueprint(StructureKind::WoodWall, GridCoord::new(4, 4));
        let a = h.worker(wall, ActivityId::Construct, 1, [0; SKILL_COUNT]);
        let b = h.worker(wall, ActivityId::Construct, 1, [0; SKILL_COUNT]);
        for id in [a, b] {
            h.pawns.get_mut(&id).unwrap().inventory.add(ItemKind::Wood, 5);
        }
        h.ticks(20);
        assert!(!h.structures[&wall].is_blueprint);
        h.tick();
        // The lower id did the work; the other pawn dropped its stale order.
        let (builder, waiter) = (a.min(b), a.max(b));
        assert_eq!(h.pawns[&builder].inventory.count(ItemKind::Wood), 0);
        assert_eq!(h.pawns[&waiter].inventory.count(ItemKind::Wood), 5);
        assert!(h.pawns[&waiter].job.is_none());
        assert_eq!(h.pawns[&waiter].status, PawnStatus::Idle);
    }
}
