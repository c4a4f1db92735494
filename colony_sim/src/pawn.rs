// Pawn data model: skills, needs, effects, status.
//
// A `Pawn` is one colonist. Its mutable state is grouped the way the tick
// loop touches it: `Needs` (food/sleep/recreation gauges clamped to
// [0, 100]), `Skills` (fixed arrays of level and XP indexed by `SkillKind`),
// a list of `Effect`s, an `Inventory`, the current `JobChain` plus a
// personal FIFO queue, and the fractional movement buffer.
//
// The per-tick behaviour lives in `pawn_sim.rs`; this file holds the pieces
// that are pure functions of a single pawn (effect upkeep, speed, XP gain)
// so they can be tested in isolation.
//
// See also: `pawn_sim.rs` for the agent phase, `recruit.rs` for building
// pawns from external profiles, `config.rs` for the thresholds used here.

use crate::config::{EffectConfig, NeedsConfig, SkillConfig};
use crate::inventory::Inventory;
use crate::job::{Job, JobChain};
use crate::types::*;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

// ---------------------------------------------------------------------------
// Skills
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skills {
    levels: [u8; SKILL_COUNT],
    xp: [u32; SKILL_COUNT],
}

impl Skills {
    /// Skills at the given levels with no XP, clamped to the level cap.
    pub fn from_levels(levels: [u8; SKILL_COUNT]) -> Self {
        Self {
            levels: levels.map(|l| l.min(MAX_SKILL_LEVEL)),
            xp: [0; SKILL_COUNT],
        }
    }

    pub fn level(&self, skill: SkillKind) -> u8 {
        self.levels[skill.index()]
    }

    pub fn xp(&self, skill: SkillKind) -> u32 {
        self.xp[skill.index()]
    }

    /// Add XP, levelling up (with carry-over) as thresholds are crossed.
    /// XP stops accumulating at the level cap. Returns the number of levels
    /// gained.
    pub fn add_xp(&mut self, skill: SkillKind, amount: u32, config: &SkillConfig) -> u8 {
        let i = skill.index();
        if self.levels[i] >= MAX_SKILL_LEVEL {
            return 0;
        }
        self.xp[i] += amount;
        let mut gained = 0;
        while self.levels[i] < MAX_SKILL_LEVEL {
            let needed = config.xp_to_next_level(self.levels[i]);
            if self.xp[i] < needed {
                break;
            }
            self.xp[i] -= needed;
            self.levels[i] += 1;
            gained += 1;
        }
        if self.levels[i] >= MAX_SKILL_LEVEL {
            self.xp[i] = 0;
        }
        gained
    }
}

// ---------------------------------------------------------------------------
// Needs
// ---------------------------------------------------------------------------

pub const NEED_MAX: f32 = 100.0;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Needs {
    pub food: f32,
    pub sleep: f32,
    pub recreation: f32,
}

impl Default for Needs {
    fn default() -> Self {
        Self {
            food: NEED_MAX,
            sleep: NEED_MAX,
            recreation: NEED_MAX,
        }
    }
}

impl Needs {
    pub fn decay(&mut self, config: &NeedsConfig) {
        self.food = clamp_need(self.food - config.food_decay_per_tick);
        self.sleep = clamp_need(self.sleep - config.sleep_decay_per_tick);
        self.recreation = clamp_need(self.recreation - config.recreation_decay_per_tick);
    }
}

pub fn clamp_need(v: f32) -> f32 {
    v.clamp(0.0, NEED_MAX)
}

// ---------------------------------------------------------------------------
// Effects
// ---------------------------------------------------------------------------

/// An active modifier. `remaining_ticks == None` means the effect is tied
/// to a condition (Hungry, Tired, Bored) and lasts while it holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Effect {
    pub kind: EffectKind,
    pub remaining_ticks: Option<u32>,
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PawnStatus {
    Idle,
    Moving,
    MovingToWork,
    FetchingItems,
    Withdrawing,
    Working,
    Sleeping,
    Eating,
    StartingAssignedJob,
    StartingNextTask,
    Dead,
}

impl fmt::Display for PawnStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PawnStatus::Idle => "Idle",
            PawnStatus::Moving => "Moving",
            PawnStatus::MovingToWork => "Moving to Work",
            PawnStatus::FetchingItems => "Fetching Items",
            PawnStatus::Withdrawing => "Withdrawing",
            PawnStatus::Working => "Working",
            PawnStatus::Sleeping => "Sleeping",
            PawnStatus::Eating => "Eating",
            PawnStatus::StartingAssignedJob => "Starting Assigned Job",
            PawnStatus::StartingNextTask => "Starting Next Task",
            PawnStatus::Dead => "Dead",
        })
    }
}

// ---------------------------------------------------------------------------
// Pawn
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pawn {
    pub id: PawnId,
    pub name: String,
    pub backstory: String,
    pub color: String,
    pub position: GridCoord,
    pub skills: Skills,
    pub needs: Needs,
    pub effects: Vec<Effect>,
    pub inventory: Inventory,
    pub job: Option<JobChain>,
    /// Personal FIFO queue, drained when the current chain finishes.
    pub queue: VecDeque<Job>,
    pub status: PawnStatus,
    /// Consecutive ticks spent Hungry.
    pub starvation_ticks: u32,
    /// Fractional movement carried between ticks; each whole unit is one cell.
    pub move_buffer: f32,
}

impl Pawn {
    pub fn new(id: PawnId, name: String, position: GridCoord, skills: Skills) -> Self {
        Self {
            id,
            name,
            backstory: String::new(),
            color: String::new(),
            position,
            skills,
            needs: Needs::default(),
            effects: Vec::new(),
            inventory: Inventory::new(),
            job: None,
            queue: VecDeque::new(),
            status: PawnStatus::Idle,
            starvation_ticks: 0,
            move_buffer: 0.0,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.status == PawnStatus::Dead
    }

    pub fn current_job(&self) -> Option<&Job> {
        self.job.as_ref().map(JobChain::current)
    }

    /// Whether the pawn has nothing to do at all.
    pub fn is_unoccupied(&self) -> bool {
        self.job.is_none() && self.queue.is_empty()
    }

    /// Replace whatever the pawn was doing with `chain`.
    pub fn install_chain(&mut self, chain: JobChain) {
        self.job = Some(chain);
    }

    /// Finish the current job. Returns `true` if another job in the chain
    /// follows; otherwise the chain is dropped.
    pub fn advance_job(&mut self) -> bool {
        let more = self.job.as_mut().is_some_and(JobChain::advance);
        if !more {
            self.job = None;
        }
        more
    }

    /// Drop the current chain and go Idle.
    pub fn abandon_job(&mut self) {
        self.job = None;
        self.status = PawnStatus::Idle;
    }

    /// Advance past a finished job, setting status to Moving when another
    /// job follows and Idle otherwise.
    pub fn finish_job(&mut self) {
        self.status = if self.advance_job() {
            PawnStatus::Moving
        } else {
            PawnStatus::Idle
        };
    }

    /// Whether the pawn is on its way to eat or already eating.
    pub fn is_seeking_food(&self) -> bool {
        self.job
            .as_ref()
            .is_some_and(|chain| chain.iter().take(2).any(Job::is_eat))
    }

    pub fn is_sleeping(&self) -> bool {
        self.current_job().is_some_and(Job::is_sleep)
    }

    /// The WORK job on `structure` this pawn is currently performing, if any.
    pub fn working_on(&self, structure: StructureId) -> Option<ActivityId> {
        self.current_job()
            .and_then(Job::work_target)
            .filter(|(target, _)| *target == structure)
            .map(|(_, activity)| activity)
    }

    pub fn has_effect(&self, kind: EffectKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    /// Grant a timed effect, refreshing its duration if already active.
    pub fn grant_effect(&mut self, kind: EffectKind, ticks: u32) {
        match self.effects.iter_mut().find(|e| e.kind == kind) {
            Some(existing) => existing.remaining_ticks = Some(ticks),
            None => self.effects.push(Effect {
                kind,
                remaining_ticks: Some(ticks),
            }),
        }
    }

    /// Tick down timed effects and sync the condition-driven ones with the
    /// current needs. Condition effects are set, never stacked.
    pub fn upkeep_effects(&mut self, config: &NeedsConfig) {
        self.effects.retain_mut(|e| match e.remaining_ticks.as_mut() {
            Some(left) => {
                *left = left.saturating_sub(1);
                *left > 0
            }
            None => true,
        });
        let conditions = [
            (EffectKind::Hungry, self.needs.food < config.food_critical),
            (EffectKind::Tired, self.needs.sleep < config.sleep_critical),
            (
                EffectKind::Bored,
                self.needs.recreation < config.recreation_critical,
            ),
        ];
        for (kind, active) in conditions {
            let present = self.has_effect(kind);
            if active && !present {
                self.effects.push(Effect {
                    kind,
                    remaining_ticks: None,
                });
            } else if !active && present {
                self.effects.retain(|e| e.kind != kind);
            }
        }
    }

    /// Movement speed from effects alone, before terrain and floors.
    pub fn speed_multiplier(&self, config: &EffectConfig) -> f32 {
        let delta: f32 = self
            .effects
            .iter()
            .map(|e| e.kind.speed_sign() * config.speed_step)
            .sum();
        (config.base_speed + delta).max(config.min_speed)
    }
}
