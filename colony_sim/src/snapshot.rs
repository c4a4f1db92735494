// Read-only views of the colony for renderers and the headless runner.
//
// A `ColonySnapshot` flattens `SimState` into plain serializable records:
// one `PawnView` per pawn (dead ones included), one `StructureView` per
// structure, the colony-wide resource totals, the global queue length and
// the retained log. Views carry display names resolved from the catalog so
// consumers never need the config.
//
// See also: `sim.rs` for `SimState::snapshot()`.

use crate::config::GameConfig;
use crate::event::LogEntry;
use crate::job::{Job, JobKind};
use crate::pawn::{Needs, Pawn, PawnStatus};
use crate::structure::Structure;
use crate::types::*;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PawnView {
    pub id: PawnId,
    pub name: String,
    pub backstory: String,
    pub color: String,
    pub position: GridCoord,
    pub status: PawnStatus,
    pub needs: Needs,
    pub effects: Vec<EffectKind>,
    pub skills: BTreeMap<SkillKind, u8>,
    pub inventory: BTreeMap<ItemKind, u32>,
    /// Human-readable summary of the current job, if any.
    pub job: Option<String>,
    pub queued_jobs: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StructureView {
    pub id: StructureId,
    pub kind: StructureKind,
    pub name: String,
    pub origin: GridCoord,
    pub is_blueprint: bool,
    pub growth: Option<f32>,
    pub crop: Option<(CropKind, f32)>,
    pub activity: Option<ActivityView>,
    pub inventory: BTreeMap<ItemKind, u32>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ActivityView {
    pub activity: ActivityId,
    pub progress: f32,
    pub worker: PawnId,
    pub repeats_left: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ColonySnapshot {
    pub tick: u64,
    pub map_width: u32,
    pub map_height: u32,
    pub pawns: Vec<PawnView>,
    pub structures: Vec<StructureView>,
    pub resources: BTreeMap<ItemKind, u32>,
    pub queued_jobs: usize,
    pub log: Vec<LogEntry>,
}

/// Sum of every item held by structures and pawns.
pub fn colony_resources<'a>(
    structures: impl IntoIterator<Item = &'a Structure>,
    pawns: impl IntoIterator<Item = &'a Pawn>,
) -> BTreeMap<ItemKind, u32> {
    let mut totals = BTreeMap::new();
    let inventories = structures
        .into_iter()
        .map(|s| &s.inventory)
        .chain(pawns.into_iter().map(|p| &p.inventory));
    for inv in inventories {
        for (item, qty) in inv.iter() {
            *totals.entry(item).or_insert(0) += qty;
        }
    }
    totals
}

pub fn describe_job(
    job: &Job,
    structures: &BTreeMap<StructureId, Structure>,
    config: &GameConfig,
) -> String {
    let name_of = |id: &StructureId| {
        structures
            .get(id)
            .and_then(|s| config.structure_def(s.kind))
            .map_or("structure", |d| d.name.as_str())
    };
    match &job.kind {
        JobKind::Move { dest } => format!("Moving to {dest}"),
        JobKind::Work {
            target,
            activity,
            repeats,
        } => {
            let activity_name = structures
                .get(target)
                .and_then(|s| config.structure_def(s.kind))
                .and_then(|d| d.activity(*activity))
                .map_or_else(|| format!("{activity:?}"), |a| a.name.clone());
            if *repeats > 1 {
                format!("{activity_name} x{repeats} at {}", name_of(target))
            } else {
                format!("{activity_name} at {}", name_of(target))
            }
        }
        JobKind::Withdraw { source, items } => {
            let list: Vec<String> = items
                .iter()
                .map(|s| format!("{} {}", s.quantity, s.item))
                .collect();
            format!("Fetching {} from {}", list.join(", "), name_of(source))
        }
        JobKind::Sleep => "Sleeping".to_string(),
        JobKind::Eat { item } => format!("Eating {item}"),
    }
}

impl PawnView {
    pub fn of(
        pawn: &Pawn,
        structures: &BTreeMap<StructureId, Structure>,
        config: &GameConfig,
    ) -> Self {
        Self {
            id: pawn.id,
            name: pawn.name.clone(),
            backstory: pawn.backstory.clone(),
            color: pawn.color.clone(),
            position: pawn.position,
            status: pawn.status,
            needs: pawn.needs,
            effects: pawn.effects.iter().map(|e| e.kind).collect(),
            skills: SkillKind::ALL
                .into_iter()
                .map(|k| (k, pawn.skills.level(k)))
                .collect(),
            inventory: pawn.inventory.iter().collect(),
            job: pawn
                .current_job()
                .map(|j| describe_job(j, structures, config)),
            queued_jobs: pawn.queue.len(),
        }
    }
}

impl StructureView {
    pub fn of(structure: &Structure, config: &GameConfig) -> Self {
        Self {
            id: structure.id,
            kind: structure.kind,
            name: config
                .structure_def(structure.kind)
                .map_or_else(|| format!("{:?}", structure.kind), |d| d.name.clone()),
            origin: structure.origin,
            is_blueprint: structure.is_blueprint,
            growth: structure.growth,
            crop: structure.crop.map(|c| (c.kind, c.growth)),
            activity: structure.activity.as_ref().map(|a| ActivityView {
                activity: a.activity,
                progress: a.progress,
                worker: a.worker,
                repeats_left: a.repeats_left,
            }),
            inventory: structure.inventory.iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::JobChain;
    use crate::pawn::Skills;
    use crate::prng::GameRng;
    use smallvec::smallvec;
    use crate::inventory::ItemStack;

    #[test]
    fn resources_sum_structures_and_pawns() {
        let mut rng = GameRng::new(1);
        let chest_id = StructureId::new(&mut rng);
        let mut chest = Structure::new(chest_id, StructureKind::Chest, GridCoord::new(1, 1));
        chest.inventory.add(ItemKind::Wood, 30);
        chest.inventory.add(ItemKind::Stone, 4);
        let pawn_id = PawnId::new(&mut rng);
        let mut pawn = Pawn::new(pawn_id, "Ada".into(), GridCoord::new(0, 0), Skills::default());
        pawn.inventory.add(ItemKind::Wood, 5);
        pawn.inventory.add(ItemKind::Berries, 2);

        let totals = colony_resources([&chest], [&pawn]);
        assert_eq!(totals.get(&ItemKind::Wood), Some(&35));
        assert_eq!(totals.get(&ItemKind::Stone), Some(&4));
        assert_eq!(totals.get(&ItemKind::Berries), Some(&2));
        assert_eq!(totals.get(&ItemKind::Gold), None);
    }

    #[test]
    fn pawn_view_describes_current_job() {
        let config = GameConfig::default();
        let mut rng = GameRng::new(2);
        let chest_id = StructureId::new(&mut rng);
        let structures = BTreeMap::from([(
            chest_id,
            Structure::new(chest_id, StructureKind::Chest, GridCoord::new(2, 2)),
        )]);
        let pawn_id = PawnId::new(&mut rng);
        let mut pawn = Pawn::new(pawn_id, "Ada".into(), GridCoord::new(0, 0), Skills::default());
        let fetch = Job::new(
            &mut rng,
            JobKind::Withdraw {
                source: chest_id,
                items: smallvec![ItemStack {
                    item: ItemKind::Wood,
                    quantity: 5
                }],
            },
        );
        pawn.install_chain(JobChain::new(fetch));
        let view = PawnView::of(&pawn, &structures, &config);
        assert_eq!(view.job.as_deref(), Some("Fetching 5 Wood from Chest"));
        assert_eq!(view.skills.len(), SKILL_COUNT);
    }

    #[test]
    fn snapshot_serializes() {
        let config = GameConfig::default();
        let mut rng = GameRng::new(3);
        let id = StructureId::new(&mut rng);
        let tree = Structure::new(id, StructureKind::Tree, GridCoord::new(4, 4));
        let snap = ColonySnapshot {
            tick: 9,
            map_width: 8,
            map_height: 8,
            pawns: Vec::new(),
            structures: vec![StructureView::of(&tree, &config)],
            resources: BTreeMap::new(),
            queued_jobs: 0,
            log: Vec::new(),
        };
        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["structures"][0]["name"], "Tree");
        assert_eq!(json["tick"], 9);
    }
}
