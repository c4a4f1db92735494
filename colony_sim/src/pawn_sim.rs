// The agent phase: one tick of every living pawn.
//
// Each pawn runs the same fixed sequence, in id order:
//
//   1. effect upkeep (timed effects tick down, Hungry/Tired/Bored synced)
//   2. starvation check (death ends the pawn's tick)
//   3. needs decay
//   4. emergencies: collapse into sleep, go eat, or find something fun
//   5. queue intake: an unoccupied, rested pawn claims the first job in
//      the global queue that `assign_job` accepts
//   6. idle boredom roll
//   7. personal queue advance
//   8. execution of the current job (sleep, eat, move, withdraw, work)
//
// Withdrawals and activities only *arrive* here: the pawn walks until it is
// adjacent (Chebyshev distance 1) and flips to Withdrawing / Working. The
// structure phase (`structure_sim.rs`) does the actual item transfer and
// progress, and advances the pawn's chain when they finish.
//
// Movement accumulates fractional speed in `move_buffer`; every whole unit
// is one step along an A* path over the phase's `Walkability`. No path
// means the pawn stalls and retries next tick; it never teleports.
//
// See also: `pawn.rs` for the data model, `assignment.rs` for
// `assign_job`, `sim.rs` which builds the `AgentPhase` from split borrows
// of `SimState`.

use crate::assignment::assign_job;
use crate::config::GameConfig;
use crate::event::LogSink;
use crate::job::{Job, JobChain, JobKind};
use crate::pathfinding::find_path;
use crate::pawn::{NEED_MAX, Pawn, PawnStatus, clamp_need};
use crate::prng::GameRng;
use crate::structure::Structure;
use crate::types::*;
use crate::world::Walkability;
use smallvec::smallvec;
use std::collections::{BTreeMap, VecDeque};
use tracing::debug;

/// Everything the agent phase reads or mutates besides the pawns.
pub struct AgentPhase<'a> {
    pub config: &'a GameConfig,
    pub structures: &'a BTreeMap<StructureId, Structure>,
    pub walk: &'a Walkability,
    pub rng: &'a mut GameRng,
    pub job_queue: &'a mut VecDeque<Job>,
    pub log: &'a mut LogSink,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MoveOutcome {
    Arrived,
    EnRoute,
    Stalled,
}

impl AgentPhase<'_> {
    pub fn run(&mut self, pawns: &mut BTreeMap<PawnId, Pawn>) {
        for pawn in pawns.values_mut() {
            if !pawn.is_dead() {
                self.tick_pawn(pawn);
            }
        }
    }

    fn tick_pawn(&mut self, pawn: &mut Pawn) {
        let config = self.config;
        let needs = &config.needs;
        pawn.upkeep_effects(needs);

        if pawn.has_effect(EffectKind::Hungry) {
            pawn.starvation_ticks += 1;
        } else {
            pawn.starvation_ticks = 0;
        }
        if pawn.starvation_ticks >= needs.starvation_death_ticks {
            self.kill(pawn);
            return;
        }

        pawn.needs.decay(needs);
        self.handle_emergencies(pawn);

        if pawn.is_unoccupied() && pawn.needs.sleep > needs.sleep_critical {
            self.take_from_global_queue(pawn);
        }

        if pawn.is_unoccupied()
            && pawn.status == PawnStatus::Idle
            && self.job_queue.is_empty()
        {
            self.boredom_roll(pawn);
        }

        if pawn.job.is_none()
            && let Some(job) = pawn.queue.pop_front()
        {
            pawn.install_chain(JobChain::new(job));
            pawn.status = PawnStatus::StartingNextTask;
        }

        self.execute(pawn);

        if pawn.job.is_none() {
            pawn.status = PawnStatus::Idle;
        }
    }

    fn kill(&mut self, pawn: &mut Pawn) {
        pawn.status = PawnStatus::Dead;
        pawn.job = None;
        pawn.queue.clear();
        pawn.effects.clear();
        self.log.error(format!("{} has died of starvation.", pawn.name));
        tracing::info!(pawn = %pawn.name, id = %pawn.id, "pawn starved");
    }

    // -----------------------------------------------------------------------
    // Emergencies and job intake
    // -----------------------------------------------------------------------

    fn handle_emergencies(&mut self, pawn: &mut Pawn) {
        let config = self.config;
        let needs = &config.needs;
        if pawn.needs.sleep < needs.sleep_critical && !pawn.is_sleeping() {
            pawn.queue.clear();
            pawn.install_chain(JobChain::new(Job::new(self.rng, JobKind::Sleep)));
            self.log
                .warning(format!("{} collapsed from exhaustion!", pawn.name));
        } else if pawn.needs.food < needs.food_critical {
            if pawn.is_seeking_food() || pawn.is_sleeping() {
                return;
            }
            match find_food(self.rng, pawn, self.structures, self.config) {
                Some(chain) => {
                    pawn.queue.clear();
                    pawn.install_chain(chain);
                    self.log
                        .warning(format!("{} is starving, seeking food.", pawn.name));
                }
                None => debug!(pawn = %pawn.name, "hungry but no food anywhere"),
            }
        } else if pawn.needs.recreation < needs.recreation_critical && pawn.job.is_none() {
            let Some(job) = pick_recreation(self.rng, self.structures, self.config) else {
                return;
            };
            if assign_job(self.rng, pawn, &job, self.structures, self.config).is_ok() {
                self.log
                    .info(format!("{} needs recreation desperately.", pawn.name));
            }
        }
    }

    /// First-fit scan of the global queue. The claimed job is removed only
    /// once `assign_job` accepts it.
    fn take_from_global_queue(&mut self, pawn: &mut Pawn) {
        for i in 0..self.job_queue.len() {
            match assign_job(
                self.rng,
                pawn,
                &self.job_queue[i],
                self.structures,
                self.config,
            ) {
                Ok(()) => {
                    self.job_queue.remove(i);
                    return;
                }
                Err(e) => debug!(pawn = %pawn.name, reason = %e, "skipped queued job"),
            }
        }
    }

    fn boredom_roll(&mut self, pawn: &mut Pawn) {
        let needs = &self.config.needs;
        let chance = if pawn.needs.recreation < needs.boredom_threshold {
            needs.bored_roll_chance
        } else {
            needs.content_roll_chance
        };
        if !self.rng.chance(chance) {
            return;
        }
        let Some(job) = pick_recreation(self.rng, self.structures, self.config) else {
            return;
        };
        if assign_job(self.rng, pawn, &job, self.structures, self.config).is_ok() {
            self.log.info(format!("{} decided to relax.", pawn.name));
        }
    }

    // -----------------------------------------------------------------------
    // Job execution
    // -----------------------------------------------------------------------

    fn execute(&mut self, pawn: &mut Pawn) {
        let Some(job) = pawn.current_job().cloned() else {
            return;
        };
        match job.kind {
            JobKind::Sleep => self.sleep(pawn),
            JobKind::Eat { item } => self.eat(pawn, item),
            JobKind::Move { dest } => match self.advance_toward(pawn, dest, false) {
                MoveOutcome::Arrived => pawn.finish_job(),
                MoveOutcome::EnRoute | MoveOutcome::Stalled => pawn.status = PawnStatus::Moving,
            },
            JobKind::Withdraw { source, .. } => {
                let Some(origin) = self.structures.get(&source).map(|s| s.origin) else {
                    self.log.error(format!(
                        "{} gave up fetching items: the source is gone.",
                        pawn.name
                    ));
                    pawn.abandon_job();
                    return;
                };
                if pawn.position.chebyshev_distance(origin) > 1 {
                    pawn.status = PawnStatus::FetchingItems;
                    self.advance_toward(pawn, origin, true);
                } else {
                    pawn.status = PawnStatus::Withdrawing;
                }
            }
            JobKind::Work { target, .. } => {
                let Some(origin) = self.structures.get(&target).map(|s| s.origin) else {
                    pawn.abandon_job();
                    return;
                };
                if pawn.position.chebyshev_distance(origin) > 1 {
                    pawn.status = PawnStatus::MovingToWork;
                    self.advance_toward(pawn, origin, true);
                } else {
                    pawn.status = PawnStatus::Working;
                }
            }
        }
    }

    fn sleep(&mut self, pawn: &mut Pawn) {
        pawn.status = PawnStatus::Sleeping;
        let rested = pawn.needs.sleep + self.config.needs.sleep_replenish_per_tick;
        pawn.needs.sleep = clamp_need(rested);
        if pawn.needs.sleep >= NEED_MAX {
            pawn.grant_effect(
                EffectKind::WellRested,
                self.config.effects.well_rested_ticks,
            );
            self.log.info(format!("{} woke up fully rested.", pawn.name));
            pawn.finish_job();
        }
    }

    fn eat(&mut self, pawn: &mut Pawn, item: ItemKind) {
        pawn.status = PawnStatus::Eating;
        if pawn.inventory.take(item, 1) == 0 {
            self.log
                .error(format!("{} couldn't find {item} to eat!", pawn.name));
            pawn.abandon_job();
            return;
        }
        let nutrition = self
            .config
            .nutrition(item)
            .unwrap_or(self.config.needs.default_nutrition);
        pawn.needs.food = clamp_need(pawn.needs.food + nutrition);
        self.log.success(format!("{} ate {item}.", pawn.name));
        if pawn.needs.food >= NEED_MAX && self.config.is_cooked(item) {
            pawn.grant_effect(EffectKind::Sated, self.config.effects.sated_ticks);
        }
        pawn.finish_job();
    }

    /// Spend the pawn's movement for this tick walking toward `goal`. With
    /// `stop_adjacent` the pawn halts next to the goal and the goal cell
    /// itself is exempt from the passability check.
    fn advance_toward(
        &mut self,
        pawn: &mut Pawn,
        goal: GridCoord,
        stop_adjacent: bool,
    ) -> MoveOutcome {
        let reached = |c: GridCoord| {
            if stop_adjacent {
                c.chebyshev_distance(goal) <= 1
            } else {
                c == goal
            }
        };
        if reached(pawn.position) {
            pawn.move_buffer = 0.0;
            return MoveOutcome::Arrived;
        }

        let speed = pawn.speed_multiplier(&self.config.effects) * self.walk.speed_at(pawn.position);
        pawn.move_buffer += speed;
        if pawn.move_buffer < 1.0 {
            return MoveOutcome::EnRoute;
        }

        let walk = self.walk;
        let path = find_path(walk.size(), pawn.position, goal, |c| {
            (stop_adjacent && c == goal) || walk.is_walkable(c)
        });
        let Some(path) = path else {
            pawn.move_buffer = 0.0;
            debug!(pawn = %pawn.name, from = %pawn.position, to = %goal, "no path, stalling");
            return MoveOutcome::Stalled;
        };

        for &cell in path.iter().skip(1) {
            if pawn.move_buffer < 1.0 || reached(pawn.position) {
                break;
            }
            pawn.position = cell;
            pawn.move_buffer -= 1.0;
        }

        if reached(pawn.position) {
            pawn.move_buffer = 0.0;
            MoveOutcome::Arrived
        } else {
            MoveOutcome::EnRoute
        }
    }
}

// ---------------------------------------------------------------------------
// Food and fun
// ---------------------------------------------------------------------------

/// Rank food: cooked meals first, then anything edible.
fn food_rank(item: ItemKind, config: &GameConfig) -> Option<u8> {
    config.nutrition(item)?;
    Some(if config.is_cooked(item) { 2 } else { 1 })
}

/// The best food a hungry pawn can reach: eat from its own inventory if it
/// carries any, otherwise withdraw one unit from a built structure and eat
/// that. Cooked meals outrank raw food; ties go to the first found.
pub fn find_food(
    rng: &mut GameRng,
    pawn: &Pawn,
    structures: &BTreeMap<StructureId, Structure>,
    config: &GameConfig,
) -> Option<JobChain> {
    let best_in = |inventory: &crate::inventory::Inventory| {
        inventory
            .iter()
            .filter_map(|(item, _)| food_rank(item, config).map(|rank| (rank, item)))
            .fold(None, |best: Option<(u8, ItemKind)>, cand| match best {
                Some(b) if b.0 >= cand.0 => Some(b),
                _ => Some(cand),
            })
    };

    if let Some((_, item)) = best_in(&pawn.inventory) {
        return Some(JobChain::new(Job::new(rng, JobKind::Eat { item })));
    }

    let mut best: Option<(u8, StructureId, ItemKind)> = None;
    for s in structures.values().filter(|s| s.is_built()) {
        if let Some((rank, item)) = best_in(&s.inventory)
            && best.is_none_or(|b| rank > b.0)
        {
            best = Some((rank, s.id, item));
        }
    }
    let (_, source, item) = best?;
    let withdraw = Job::new(
        rng,
        JobKind::Withdraw {
            source,
            items: smallvec![crate::inventory::ItemStack::new(item, 1)],
        },
    );
    let eat = Job::new(rng, JobKind::Eat { item });
    Some(JobChain::new(withdraw).then(eat))
}

/// A random recreation job on a random built, unoccupied structure that
/// offers one.
pub fn pick_recreation(
    rng: &mut GameRng,
    structures: &BTreeMap<StructureId, Structure>,
    config: &GameConfig,
) -> Option<Job> {
    let candidates: Vec<(StructureId, Vec<ActivityId>)> = structures
        .values()
        .filter(|s| s.is_built() && s.activity.is_none())
        .filter_map(|s| {
            let def = config.structure_def(s.kind)?;
            let acts: Vec<ActivityId> = def
                .activities_of(ActionKind::Recreation)
                .map(|a| a.id)
                .collect();
            (!acts.is_empty()).then_some((s.id, acts))
        })
        .collect();
    let (target, acts) = rng.choose(&candidates)?;
    let activity = *rng.choose(acts)?;
    Some(Job::work(rng, *target, activity, 1))
}
