// Job assignment, batch target discovery and area commands.
//
// `assign_job` is the only way a WORK job reaches a pawn, whether the pawn
// was named in an order, picked the job off the global queue, or chose
// something fun to do. It checks the target still exists and offers the
// activity, checks the pawn's skill, then works out what the job consumes
// (construction cost, or activity inputs times repeats). For every item the
// pawn isn't already carrying it withdraws from built storage structures in
// id order, one WITHDRAW job per (item, source) pair, until the shortfall
// is covered. The resulting chain is `[Withdraw.., Work]`. If colony storage
// can't cover an item the whole assignment fails and the pawn is untouched;
// the caller leaves the job where it was.
//
// `find_batch_targets` turns one clicked structure into a bulk order: a
// breadth-first flood over 4-neighbouring structure origins, admitting only
// structures the activity makes sense for, capped at `batch_limit`, sorted
// by distance from the click.
//
// `area_targets` backs drag-select commands (harvest / chop / mine every
// suitable structure in a rectangle), skipping anything already queued or
// being worked.
//
// See also: `sim.rs` for the commands that call into this module,
// `pawn_sim.rs` for queue intake and recreation picks, `job.rs` for the
// chain type.

use crate::catalog::{ItemList, StructureRole};
use crate::config::GameConfig;
use crate::error::AssignError;
use crate::inventory::ItemStack;
use crate::job::{Job, JobChain, JobKind};
use crate::pawn::{Pawn, PawnStatus};
use crate::prng::GameRng;
use crate::structure::Structure;
use crate::types::*;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use smallvec::{SmallVec, smallvec};
use std::collections::{BTreeMap, VecDeque};
use tracing::debug;

// ---------------------------------------------------------------------------
// Assignment
// ---------------------------------------------------------------------------

/// Items a WORK job consumes, after checking that the target can host the
/// activity and the pawn is skilled enough.
fn work_requirements(
    pawn: &Pawn,
    structure: &Structure,
    activity: ActivityId,
    repeats: u32,
    config: &GameConfig,
) -> Result<ItemList, AssignError> {
    let unknown = AssignError::UnknownActivity {
        structure: structure.id,
        activity,
    };
    let def = config.structure_def(structure.kind).ok_or(unknown.clone())?;

    if activity == ActivityId::Construct {
        if !structure.is_blueprint {
            return Err(AssignError::NotABlueprint(structure.id));
        }
        return Ok(def.cost.clone());
    }

    if structure.is_blueprint {
        return Err(unknown);
    }
    let act = def.activity(activity).ok_or(unknown)?;
    if pawn.skills.level(act.skill) < act.required_level {
        return Err(AssignError::SkillTooLow {
            pawn: pawn.id,
            activity,
            required: act.required_level,
        });
    }
    Ok(act
        .inputs
        .iter()
        .map(|s| ItemStack::new(s.item, s.quantity * repeats.max(1)))
        .collect())
}

/// Build the chain a pawn would run for `job` without touching the pawn.
pub fn plan_chain(
    rng: &mut GameRng,
    pawn: &Pawn,
    job: &Job,
    structures: &BTreeMap<StructureId, Structure>,
    config: &GameConfig,
) -> Result<JobChain, AssignError> {
    let JobKind::Work {
        target,
        activity,
        repeats,
    } = &job.kind
    else {
        return Ok(JobChain::new(job.clone()));
    };
    let structure = structures
        .get(target)
        .ok_or(AssignError::MissingTarget(*target))?;
    let needs = work_requirements(pawn, structure, *activity, *repeats, config)?;

    let mut pulls: Vec<(StructureId, ItemStack)> = Vec::new();
    for need in &needs {
        let shortfall = need.quantity.saturating_sub(pawn.inventory.count(need.item));
        let mut missing = shortfall;
        if missing == 0 {
            continue;
        }
        let sources = structures.values().filter(|s| {
            s.id != *target
                && s.is_built()
                && config
                    .structure_def(s.kind)
                    .is_some_and(|d| d.role == StructureRole::Storage)
        });
        for source in sources {
            let held = source.inventory.count(need.item);
            if held == 0 {
                continue;
            }
            let take = held.min(missing);
            pulls.push((source.id, ItemStack::new(need.item, take)));
            missing -= take;
            if missing == 0 {
                break;
            }
        }
        if missing > 0 {
            return Err(AssignError::UnresolvableResources {
                item: need.item,
                missing: shortfall,
                available: shortfall - missing,
            });
        }
    }

    let mut jobs: Vec<Job> = pulls
        .into_iter()
        .map(|(source, stack)| {
            Job::new(
                rng,
                JobKind::Withdraw {
                    source,
                    items: smallvec![stack],
                },
            )
        })
        .collect();
    jobs.push(job.clone());
    Ok(JobChain::from_jobs(jobs).unwrap_or_else(|| JobChain::new(job.clone())))
}

/// Hand `job` to `pawn`, prefixed with whatever withdrawals it needs.
/// On error the pawn is left exactly as it was.
pub fn assign_job(
    rng: &mut GameRng,
    pawn: &mut Pawn,
    job: &Job,
    structures: &BTreeMap<StructureId, Structure>,
    config: &GameConfig,
) -> Result<(), AssignError> {
    let chain = plan_chain(rng, pawn, job, structures, config)?;
    debug!(
        pawn = %pawn.name,
        job = ?job.kind,
        chain_len = chain.len(),
        "assigned job"
    );
    pawn.install_chain(chain);
    pawn.status = PawnStatus::StartingAssignedJob;
    Ok(())
}

// ---------------------------------------------------------------------------
// Batch targets
// ---------------------------------------------------------------------------

/// Index of structure ids by origin cell.
pub fn origin_index(
    structures: &BTreeMap<StructureId, Structure>,
) -> BTreeMap<GridCoord, SmallVec<[StructureId; 2]>> {
    let mut index: BTreeMap<GridCoord, SmallVec<[StructureId; 2]>> = BTreeMap::new();
    for s in structures.values() {
        index.entry(s.origin).or_default().push(s.id);
    }
    index
}

/// Whether `candidate` belongs in a batch of `activity` seeded from
/// `seed`. Activities that never spread match only the seed itself.
fn batch_eligible(
    candidate: &Structure,
    seed: &Structure,
    activity: ActivityId,
    config: &GameConfig,
) -> bool {
    let is_farm = config
        .structure_def(candidate.kind)
        .is_some_and(|d| d.role == StructureRole::FarmPlot);
    match activity {
        ActivityId::Construct => candidate.is_blueprint && candidate.kind == seed.kind,
        ActivityId::HarvestCrop => is_farm && candidate.is_built() && candidate.has_mature_crop(),
        ActivityId::PlantRice | ActivityId::PlantPotato | ActivityId::PlantCorn => {
            is_farm && candidate.is_built() && candidate.crop.is_none()
        }
        ActivityId::ChopWood => candidate.kind == StructureKind::Tree && candidate.is_built(),
        ActivityId::HarvestBerry => {
            candidate.kind == StructureKind::BerryBush
                && candidate.is_built()
                && candidate
                    .growth
                    .is_none_or(|g| g >= config.berry_harvest_min_growth)
        }
        _ => candidate.id == seed.id,
    }
}

/// Flood-fill from `origin` over neighbouring structures that suit
/// `activity`. Empty when the origin itself doesn't suit `activity`;
/// otherwise the origin comes first in BFS order and the result holds at
/// most `config.batch_limit` ids sorted by Manhattan distance from the
/// origin (ties keep BFS order).
pub fn find_batch_targets(
    origin: StructureId,
    activity: ActivityId,
    structures: &BTreeMap<StructureId, Structure>,
    config: &GameConfig,
) -> Vec<StructureId> {
    let Some(seed) = structures.get(&origin) else {
        return Vec::new();
    };
    if !batch_eligible(seed, seed, activity, config) {
        return Vec::new();
    }
    let index = origin_index(structures);
    let limit = config.batch_limit.max(1);

    let mut batch = vec![origin];
    let mut visited: FxHashSet<StructureId> = FxHashSet::default();
    visited.insert(origin);
    let mut frontier = VecDeque::from([origin]);

    'search: while let Some(id) = frontier.pop_front() {
        let Some(current) = structures.get(&id) else {
            continue;
        };
        for cell in current.origin.neighbors4() {
            let Some(ids) = index.get(&cell) else { continue };
            for &candidate_id in ids {
                if batch.len() >= limit {
                    break 'search;
                }
                if !visited.insert(candidate_id) {
                    continue;
                }
                let Some(candidate) = structures.get(&candidate_id) else {
                    continue;
                };
                if batch_eligible(candidate, seed, activity, config) {
                    batch.push(candidate_id);
                    frontier.push_back(candidate_id);
                }
            }
        }
    }

    batch.sort_by_key(|id| {
        structures
            .get(id)
            .map_or(u32::MAX, |s| s.origin.manhattan_distance(seed.origin))
    });
    batch
}

// ---------------------------------------------------------------------------
// Area commands
// ---------------------------------------------------------------------------

/// What a drag-select area command asks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AreaMode {
    /// Ripe berry bushes and mature farm plots.
    Harvest,
    /// Trees.
    Chop,
    /// Boulders and ore veins.
    Mine,
}

impl AreaMode {
    pub fn label(self) -> &'static str {
        match self {
            AreaMode::Harvest => "harvest",
            AreaMode::Chop => "chop",
            AreaMode::Mine => "mine",
        }
    }
}

/// The activity `mode` implies for `structure`, if any.
pub fn area_activity(
    mode: AreaMode,
    structure: &Structure,
    config: &GameConfig,
) -> Option<ActivityId> {
    if structure.is_blueprint {
        return None;
    }
    let def = config.structure_def(structure.kind)?;
    match mode {
        AreaMode::Harvest => {
            if def.role == StructureRole::FarmPlot {
                structure
                    .has_mature_crop()
                    .then_some(ActivityId::HarvestCrop)
            } else {
                let ripe = structure
                    .growth
                    .is_none_or(|g| g >= config.berry_harvest_min_growth);
                (ripe && def.activity(ActivityId::HarvestBerry).is_some())
                    .then_some(ActivityId::HarvestBerry)
            }
        }
        AreaMode::Chop => def.activity(ActivityId::ChopWood).map(|a| a.id),
        AreaMode::Mine => def
            .activities_of(ActionKind::Gather)
            .find(|a| a.skill == SkillKind::Mining)
            .map(|a| a.id),
    }
}

/// Every `(structure, activity)` in `rect` that `mode` applies to and that
/// isn't in `claimed`, in structure id order.
pub fn area_targets(
    rect: GridRect,
    mode: AreaMode,
    structures: &BTreeMap<StructureId, Structure>,
    claimed: &FxHashSet<(StructureId, ActivityId)>,
    config: &GameConfig,
) -> Vec<(StructureId, ActivityId)> {
    structures
        .values()
        .filter(|s| rect.contains(s.origin) && s.activity.is_none())
        .filter_map(|s| area_activity(mode, s, config).map(|a| (s.id, a)))
        .filter(|pair| !claimed.contains(pair))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pawn::Skills;
    use crate::structure::CropState;

    struct Fixture {
        rng: GameRng,
        config: GameConfig,
        structures: BTreeMap<StructureId, Structure>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                rng: GameRng::new(42),
                config: GameConfig::default(),
                structures: BTreeMap::new(),
            }
        }

        fn add(&mut self, kind: StructureKind, at: GridCoord) -> StructureId {
            let id = StructureId::new(&mut self.rng);
            self.structures.insert(id, Structure::new(id, kind, at));
            id
        }

        fn add_blueprint(&mut self, kind: StructureKind, at: GridCoord) -> StructureId {
            let id = StructureId::new(&mut self.rng);
            self.structures.insert(id, Structure::blueprint(id, kind, at));
            id
        }

        fn pawn(&mut self, levels: [u8; SKILL_COUNT]) -> Pawn {
            Pawn::new(
                PawnId::new(&mut self.rng),
                "Worker".into(),
                GridCoord::new(0, 0),
                Skills::from_levels(levels),
            )
        }
    }

    #[test]
    fn missing_inputs_become_a_withdraw_then_work_chain() {
        let mut fx = Fixture::new();
        let chest = fx.add(StructureKind::Chest, GridCoord::new(1, 1));
        fx.structures
            .get_mut(&chest)
            .unwrap()
            .inventory
            .add(ItemKind::Wood, 30);
        let wall = fx.add_blueprint(StructureKind::WoodWall, GridCoord::new(5, 5));
        let mut pawn = fx.pawn([0; SKILL_COUNT]);
        let job = Job::work(&mut fx.rng, wall, ActivityId::Construct, 1);

        assign_job(&mut fx.rng, &mut pawn, &job, &fx.structures, &fx.config).unwrap();

        let chain = pawn.job.as_ref().unwrap();
        assert_eq!(chain.len(), 2);
        match &chain.current().kind {
            JobKind::Withdraw { source, items } => {
                assert_eq!(*source, chest);
                assert_eq!(items.as_slice(), &[ItemStack::new(ItemKind::Wood, 5)]);
            }
            other => panic!("expected withdraw, got {other:?}"),
        }
        assert_eq!(chain.upcoming(), Some(&job));
        assert_eq!(pawn.status, PawnStatus::StartingAssignedJob);
    }

    #[test]
    fn carried_items_reduce_the_withdrawal() {
        let mut fx = Fixture::new();
        let chest = fx.add(StructureKind::Chest, GridCoord::new(1, 1));
        fx.structures
            .get_mut(&chest)
            .unwrap()
            .inventory
            .add(ItemKind::Wood, 30);
        let wall = fx.add_blueprint(StructureKind::WoodWall, GridCoord::new(5, 5));
        let mut pawn = fx.pawn([0; SKILL_COUNT]);
        pawn.inventory.add(ItemKind::Wood, 3);
        let job = Job::work(&mut fx.rng, wall, ActivityId::Construct, 1);
        let chain = plan_chain(&mut fx.rng, &pawn, &job, &fx.structures, &fx.config).unwrap();
        assert!(matches!(
            &chain.current().kind,
            JobKind::Withdraw { items, .. } if items[0].quantity == 2
        ));

        pawn.inventory.add(ItemKind::Wood, 2);
        let chain = plan_chain(&mut fx.rng, &pawn, &job, &fx.structures, &fx.config).unwrap();
        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn shortfall_is_split_across_storage() {
        let mut fx = Fixture::new();
        let a = fx.add(StructureKind::Chest, GridCoord::new(1, 1));
        let b = fx.add(StructureKind::Chest, GridCoord::new(2, 1));
        for id in [a, b] {
            fx.structures
                .get_mut(&id)
                .unwrap()
                .inventory
                .add(ItemKind::Wood, 15);
        }
        let bench = fx.add_blueprint(StructureKind::Workbench, GridCoord::new(6, 6));
        let pawn = fx.pawn([0; SKILL_COUNT]);
        let job = Job::work(&mut fx.rng, bench, ActivityId::Construct, 1);
        let chain = plan_chain(&mut fx.rng, &pawn, &job, &fx.structures, &fx.config).unwrap();
        // 25 wood from two chests of 15: two withdrawals plus the work.
        assert_eq!(chain.len(), 3);
        let pulled: u32 = chain
            .iter()
            .filter_map(|j| match &j.kind {
                JobKind::Withdraw { items, .. } => Some(items[0].quantity),
                _ => None,
            })
            .sum();
        assert_eq!(pulled, 25);
    }

    #[test]
    fn unresolvable_resources_leave_pawn_untouched() {
        let mut fx = Fixture::new();
        let wall = fx.add_blueprint(StructureKind::SteelWall, GridCoord::new(3, 3));
        let mut pawn = fx.pawn([0; SKILL_COUNT]);
        let before = pawn.clone();
        let job = Job::work(&mut fx.rng, wall, ActivityId::Construct, 1);
        let err = assign_job(&mut fx.rng, &mut pawn, &job, &fx.structures, &fx.config).unwrap_err();
        assert_eq!(
            err,
            AssignError::UnresolvableResources {
                item: ItemKind::Steel,
                missing: 5,
                available: 0,
            }
        );
        assert_eq!(pawn, before);
    }

    #[test]
    fn assignment_rejections() {
        let mut fx = Fixture::new();
        let built_wall = fx.add(StructureKind::WoodWall, GridCoord::new(0, 0));
        let vein = fx.add(StructureKind::GoldVein, GridCoord::new(4, 4));
        let pawn = fx.pawn([0; SKILL_COUNT]);

        let gone = StructureId::new(&mut fx.rng);
        let job = Job::work(&mut fx.rng, gone, ActivityId::ChopWood, 1);
        assert_eq!(
            plan_chain(&mut fx.rng, &pawn, &job, &fx.structures, &fx.config).unwrap_err(),
            AssignError::MissingTarget(gone)
        );

        let job = Job::work(&mut fx.rng, built_wall, ActivityId::Construct, 1);
        assert_eq!(
            plan_chain(&mut fx.rng, &pawn, &job, &fx.structures, &fx.config).unwrap_err(),
            AssignError::NotABlueprint(built_wall)
        );

        let job = Job::work(&mut fx.rng, built_wall, ActivityId::ChopWood, 1);
        assert!(matches!(
            plan_chain(&mut fx.rng, &pawn, &job, &fx.structures, &fx.config),
            Err(AssignError::UnknownActivity { .. })
        ));

        let job = Job::work(&mut fx.rng, vein, ActivityId::MineGold, 1);
        assert!(matches!(
            plan_chain(&mut fx.rng, &pawn, &job, &fx.structures, &fx.config),
            Err(AssignError::SkillTooLow { required: 6, .. })
        ));
        let miner = fx.pawn([0, 0, 0, 6, 0, 0, 0]);
        assert!(plan_chain(&mut fx.rng, &miner, &job, &fx.structures, &fx.config).is_ok());
    }

    #[test]
    fn repeats_multiply_inputs() {
        let mut fx = Fixture::new();
        let chest = fx.add(StructureKind::Chest, GridCoord::new(0, 0));
        fx.structures
            .get_mut(&chest)
            .unwrap()
            .inventory
            .add(ItemKind::Berries, 12);
        let fire = fx.add(StructureKind::Campfire, GridCoord::new(3, 0));
        let pawn = fx.pawn([0; SKILL_COUNT]);
        let job = Job::work(&mut fx.rng, fire, ActivityId::CookSimple, 3);
        // 15 berries needed, 12 available.
        assert!(matches!(
            plan_chain(&mut fx.rng, &pawn, &job, &fx.structures, &fx.config),
            Err(AssignError::UnresolvableResources { missing: 15, available: 12, .. })
        ));
        let job = Job::work(&mut fx.rng, fire, ActivityId::CookSimple, 2);
        assert_eq!(
            plan_chain(&mut fx.rng, &pawn, &job, &fx.structures, &fx.config)
                .unwrap()
                .len(),
            2
        );
    }

    #[test]
    fn batch_collects_connected_mature_plots_only() {
        let mut fx = Fixture::new();
        let mut plots = Vec::new();
        for x in 0..5 {
            let id = fx.add(StructureKind::FarmPlot, GridCoord::new(x, 0));
            fx.structures.get_mut(&id).unwrap().crop = Some(CropState {
                kind: CropKind::Rice,
                growth: 100.0,
            });
            plots.push(id);
        }
        // Immature plot continuing the row, and a mature one that is not connected.
        let young = fx.add(StructureKind::FarmPlot, GridCoord::new(5, 0));
        fx.structures.get_mut(&young).unwrap().crop = Some(CropState {
            kind: CropKind::Rice,
            growth: 40.0,
        });
        let island = fx.add(StructureKind::FarmPlot, GridCoord::new(8, 0));
        fx.structures.get_mut(&island).unwrap().crop = Some(CropState {
            kind: CropKind::Rice,
            growth: 100.0,
        });

        let batch = find_batch_targets(
            plots[2],
            ActivityId::HarvestCrop,
            &fx.structures,
            &fx.config,
        );
        assert_eq!(batch.len(), 5);
        assert_eq!(batch[0], plots[2]);
        for id in &plots {
            assert!(batch.contains(id));
        }
        assert!(!batch.contains(&young));
        assert!(!batch.contains(&island));
        let dists: Vec<u32> = batch
            .iter()
            .map(|id| fx.structures[id].origin.manhattan_distance(GridCoord::new(2, 0)))
            .collect();
        assert!(dists.windows(2).all(|w| w[0] <= w[1]), "not sorted: {dists:?}");
    }

    #[test]
    fn batch_never_exceeds_limit() {
        let mut fx = Fixture::new();
        let mut first = None;
        for y in 0..10 {
            for x in 0..10 {
                let id = fx.add_blueprint(StructureKind::WoodWall, GridCoord::new(x, y));
                first.get_or_insert(id);
            }
        }
        let Some(first) = first else { unreachable!() };
        let batch = find_batch_targets(first, ActivityId::Construct, &fx.structures, &fx.config);
        assert_eq!(batch.len(), fx.config.batch_limit);
        assert!(batch.iter().all(|id| {
            let s = &fx.structures[id];
            s.is_blueprint && s.kind == StructureKind::WoodWall
        }));
    }

    #[test]
    fn batch_skips_other_blueprint_kinds_and_unlisted_activities() {
        let mut fx = Fixture::new();
        let a = fx.add_blueprint(StructureKind::WoodWall, GridCoord::new(0, 0));
        fx.add_blueprint(StructureKind::StoneWall, GridCoord::new(1, 0));
        let batch = find_batch_targets(a, ActivityId::Construct, &fx.structures, &fx.config);
        assert_eq!(batch, vec![a]);

        let fire = fx.add(StructureKind::Campfire, GridCoord::new(5, 5));
        fx.add(StructureKind::Campfire, GridCoord::new(6, 5));
        let batch = find_batch_targets(fire, ActivityId::CookSimple, &fx.structures, &fx.config);
        assert_eq!(batch, vec![fire]);
    }

    #[test]
    fn batch_is_empty_when_the_origin_does_not_qualify() {
        let mut fx = Fixture::new();
        let unripe = fx.add(StructureKind::FarmPlot, GridCoord::new(0, 0));
        fx.structures.get_mut(&unripe).unwrap().crop = Some(CropState {
            kind: CropKind::Corn,
            growth: 30.0,
        });
        let ripe = fx.add(StructureKind::FarmPlot, GridCoord::new(1, 0));
        fx.structures.get_mut(&ripe).unwrap().crop = Some(CropState {
            kind: CropKind::Corn,
            growth: 100.0,
        });
        let batch = find_batch_targets(unripe, ActivityId::HarvestCrop, &fx.structures, &fx.config);
        assert!(batch.is_empty());

        // A finished wall is no longer a construction target.
        let wall = fx.add(StructureKind::WoodWall, GridCoord::new(5, 5));
        fx.add_blueprint(StructureKind::WoodWall, GridCoord::new(6, 5));
        let batch = find_batch_targets(wall, ActivityId::Construct, &fx.structures, &fx.config);
        assert!(batch.is_empty());
    }

    #[test]
    fn area_targets_filter_by_mode_and_claims() {
        let mut fx = Fixture::new();
        let tree = fx.add(StructureKind::Tree, GridCoord::new(1, 1));
        let bush = fx.add(StructureKind::BerryBush, GridCoord::new(2, 1));
        fx.structures.get_mut(&bush).unwrap().growth = Some(90.0);
        let sapling = fx.add(StructureKind::BerryBush, GridCoord::new(3, 1));
        fx.structures.get_mut(&sapling).unwrap().growth = Some(10.0);
        let vein = fx.add(StructureKind::SteelVein, GridCoord::new(2, 2));
        let outside = fx.add(StructureKind::Tree, GridCoord::new(9, 9));
        let rect = GridRect::from_corners(GridCoord::new(0, 0), GridCoord::new(4, 4));

        let mut claimed = FxHashSet::default();
        let chop = area_targets(rect, AreaMode::Chop, &fx.structures, &claimed, &fx.config);
        assert_eq!(chop, vec![(tree, ActivityId::ChopWood)]);
        assert!(!chop.iter().any(|(id, _)| *id == outside));

        let harvest = area_targets(rect, AreaMode::Harvest, &fx.structures, &claimed, &fx.config);
        assert_eq!(harvest, vec![(bush, ActivityId::HarvestBerry)]);

        let mine = area_targets(rect, AreaMode::Mine, &fx.structures, &claimed, &fx.config);
        assert_eq!(mine, vec![(vein, ActivityId::MineSteel)]);

        claimed.insert((vein, ActivityId::MineSteel));
        let mine = area_targets(rect, AreaMode::Mine, &fx.structures, &claimed, &fx.config);
        assert!(mine.is_empty());
    }
}
